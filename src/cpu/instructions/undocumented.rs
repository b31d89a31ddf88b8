// Undocumented ("illegal") 6502 opcodes.
//
// The 2A03 decodes every one of the 256 possible opcode bytes; official assemblers only
// ever emit a subset, but ROMs that rely on the rest (notably a few commercial titles and
// most test suites) need them interpreted correctly. Each of these is a composition of the
// documented read-modify-write and ALU operations on the same memory cell, so they are
// written as such rather than as independent implementations.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

impl Cpu {
    /// LAX - Load Accumulator and X (LDA + LDX fused)
    pub fn lax(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = self.read_operand(bus, addr_result);
        self.a = value;
        self.x = value;
        self.update_zero_and_negative_flags(value);
    }

    /// SAX - Store A AND X. Does not touch any flags.
    pub fn sax(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        bus.write(addr_result.address, self.a & self.x);
    }

    /// DCP - DEC the operand, then CMP it against A.
    pub fn dcp(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = bus.read(addr_result.address).wrapping_sub(1);
        bus.write(addr_result.address, value);
        let result = self.a.wrapping_sub(value);
        self.set_carry(self.a >= value);
        self.update_zero_and_negative_flags(result);
    }

    /// ISB/ISC - INC the operand, then SBC it from A.
    pub fn isb(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let value = bus.read(addr_result.address).wrapping_add(1);
        bus.write(addr_result.address, value);
        self.sbc_value(value);
    }

    /// SLO - ASL the operand, then ORA it into A.
    pub fn slo(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let original = bus.read(addr_result.address);
        let shifted = original << 1;
        bus.write(addr_result.address, shifted);
        self.set_carry(original & 0x80 != 0);
        self.a |= shifted;
        self.update_zero_and_negative_flags(self.a);
    }

    /// RLA - ROL the operand, then AND it into A.
    pub fn rla(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let original = bus.read(addr_result.address);
        let carry_in = if self.get_carry() { 1 } else { 0 };
        let rotated = (original << 1) | carry_in;
        bus.write(addr_result.address, rotated);
        self.set_carry(original & 0x80 != 0);
        self.a &= rotated;
        self.update_zero_and_negative_flags(self.a);
    }

    /// SRE - LSR the operand, then EOR it into A.
    pub fn sre(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let original = bus.read(addr_result.address);
        let shifted = original >> 1;
        bus.write(addr_result.address, shifted);
        self.set_carry(original & 0x01 != 0);
        self.a ^= shifted;
        self.update_zero_and_negative_flags(self.a);
    }

    /// RRA - ROR the operand, then ADC it into A.
    pub fn rra(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
        let original = bus.read(addr_result.address);
        let carry_in = if self.get_carry() { 0x80 } else { 0 };
        let rotated = (original >> 1) | carry_in;
        bus.write(addr_result.address, rotated);
        self.set_carry(original & 0x01 != 0);
        self.adc_value(rotated);
    }

    /// Shared ADC core, reused by RRA so the composed add uses the exact same
    /// carry/overflow arithmetic as the documented ADC.
    fn adc_value(&mut self, value: u8) {
        let carry = if self.get_carry() { 1 } else { 0 };
        let sum = self.a as u16 + value as u16 + carry as u16;
        self.set_carry(sum > 0xFF);
        let result = sum as u8;
        let overflow = (self.a ^ result) & (value ^ result) & 0x80 != 0;
        self.set_overflow(overflow);
        self.a = result;
        self.update_zero_and_negative_flags(result);
    }

    /// Shared SBC core, reused by ISB so the composed subtract uses the exact same
    /// carry/overflow arithmetic as the documented SBC.
    fn sbc_value(&mut self, value: u8) {
        self.adc_value(!value);
    }
}
