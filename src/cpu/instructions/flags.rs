// CLC/SEC/CLI/SEI/CLD/SED/CLV - direct flag set/clear with no other effect.
// There is no SEV; overflow can only ever be cleared explicitly, never set
// by one of these.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::flags;
use crate::cpu::Cpu;

macro_rules! flag_instruction {
    ($name:ident, $op:ident, $flag:path) => {
        pub fn $name(&mut self, _bus: &mut Bus, _addr_result: &AddressingResult) -> u8 {
            self.$op($flag);
            0
        }
    };
}

impl Cpu {
    flag_instruction!(clc, clear_flag, flags::CARRY);
    flag_instruction!(sec, set_flag, flags::CARRY);
    flag_instruction!(cli, clear_flag, flags::INTERRUPT_DISABLE);
    flag_instruction!(sei, set_flag, flags::INTERRUPT_DISABLE);
    /// CLD/SED still flip the D flag on the NES's 2A03, even though ADC/SBC
    /// never consult it - there's no BCD mode to switch into.
    flag_instruction!(cld, clear_flag, flags::DECIMAL);
    flag_instruction!(sed, set_flag, flags::DECIMAL);
    flag_instruction!(clv, clear_flag, flags::OVERFLOW);
}
