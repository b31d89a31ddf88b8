// Shift/rotate instructions. All four share the same read-transform-write
// shape; only the bit that feeds Carry and the bit Carry feeds back differ.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    fn read_for_shift(&self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool) -> u8 {
        if is_accumulator {
            self.a
        } else {
            bus.read(addr_result.address)
        }
    }

    fn write_back(&mut self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool, result: u8) {
        if is_accumulator {
            self.a = result;
        } else {
            bus.write(addr_result.address, result);
        }
        self.update_zero_and_negative_flags(result);
    }

    /// ASL: `C <- [76543210] <- 0`.
    pub fn asl(&mut self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool) {
        let value = self.read_for_shift(bus, addr_result, is_accumulator);
        self.set_carry((value & 0x80) != 0);
        self.write_back(bus, addr_result, is_accumulator, value << 1);
    }

    /// LSR: `0 -> [76543210] -> C`. N is always clear afterward since bit 7
    /// is always 0.
    pub fn lsr(&mut self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool) {
        let value = self.read_for_shift(bus, addr_result, is_accumulator);
        self.set_carry((value & 0x01) != 0);
        self.write_back(bus, addr_result, is_accumulator, value >> 1);
    }

    /// ROL: like ASL but the vacated bit 0 takes the old Carry instead of 0.
    pub fn rol(&mut self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool) {
        let value = self.read_for_shift(bus, addr_result, is_accumulator);
        let old_carry = self.get_carry() as u8;
        self.set_carry((value & 0x80) != 0);
        self.write_back(bus, addr_result, is_accumulator, (value << 1) | old_carry);
    }

    /// ROR: like LSR but the vacated bit 7 takes the old Carry instead of 0.
    pub fn ror(&mut self, bus: &mut Bus, addr_result: &AddressingResult, is_accumulator: bool) {
        let value = self.read_for_shift(bus, addr_result, is_accumulator);
        let old_carry = if self.get_carry() { 0x80 } else { 0 };
        self.set_carry((value & 0x01) != 0);
        self.write_back(bus, addr_result, is_accumulator, (value >> 1) | old_carry);
    }
}
