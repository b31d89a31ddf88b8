// BCC/BCS/BEQ/BNE/BMI/BPL/BVC/BVS. Every branch is a one-line flag/polarity
// check that feeds the shared `branch` helper; the extra cycle on a taken
// branch that crosses a page boundary is reported back up through the
// return value, not applied here.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

macro_rules! branch_instruction {
    ($name:ident, $flag_method:ident, $negate:expr) => {
        pub fn $name(&mut self, _bus: &mut Bus, addr_result: &AddressingResult) -> u8 {
            let condition = self.$flag_method();
            let condition = if $negate { !condition } else { condition };
            self.branch(condition, addr_result)
        }
    };
}

impl Cpu {
    branch_instruction!(bcc, get_carry, true);
    branch_instruction!(bcs, get_carry, false);
    branch_instruction!(beq, get_zero, false);
    branch_instruction!(bne, get_zero, true);
    branch_instruction!(bmi, get_negative, false);
    branch_instruction!(bpl, get_negative, true);
    branch_instruction!(bvc, get_overflow, true);
    branch_instruction!(bvs, get_overflow, false);

    /// Taken branches cost an extra cycle on top of the opcode's base cost,
    /// and a second extra cycle if the new PC lands on a different page.
    #[inline]
    fn branch(&mut self, condition: bool, addr_result: &AddressingResult) -> u8 {
        if condition {
            self.pc = addr_result.address;
            if addr_result.page_crossed { 2 } else { 1 }
        } else {
            0
        }
    }
}
