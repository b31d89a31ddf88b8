// LDA/LDX/LDY read a byte into a register and update Z/N; STA/STX/STY do the
// reverse and touch no flags at all.

use crate::bus::Bus;
use crate::cpu::addressing::AddressingResult;
use crate::cpu::Cpu;

macro_rules! load_instruction {
    ($name:ident, $reg:ident) => {
        pub fn $name(&mut self, bus: &mut Bus, addr_result: &AddressingResult) {
            let value = self.read_operand(bus, addr_result);
            self.$reg = value;
            self.update_zero_and_negative_flags(value);
        }
    };
}

macro_rules! store_instruction {
    ($name:ident, $reg:ident) => {
        pub fn $name(&self, bus: &mut Bus, addr_result: &AddressingResult) {
            bus.write(addr_result.address, self.$reg);
        }
    };
}

impl Cpu {
    load_instruction!(lda, a);
    load_instruction!(ldx, x);
    load_instruction!(ldy, y);

    store_instruction!(sta, a);
    store_instruction!(stx, x);
    store_instruction!(sty, y);
}

#[cfg(test)]
mod tests {
    use super::*;

    type LoadOp = fn(&mut Cpu, &mut Bus, &AddressingResult);
    type ReadReg = fn(&Cpu) -> u8;

    #[test]
    fn each_load_sets_its_register_and_the_zero_negative_flags() {
        let cases: [(LoadOp, ReadReg); 3] = [
            (Cpu::lda, |c| c.a),
            (Cpu::ldx, |c| c.x),
            (Cpu::ldy, |c| c.y),
        ];
        for (load, read) in cases {
            let mut cpu = Cpu::new();
            let mut bus = Bus::new();
            load(&mut cpu, &mut bus, &AddressingResult::immediate(0x42));
            assert_eq!(read(&cpu), 0x42);
            assert!(!cpu.get_zero());
            assert!(!cpu.get_negative());

            load(&mut cpu, &mut bus, &AddressingResult::immediate(0x00));
            assert!(cpu.get_zero());

            load(&mut cpu, &mut bus, &AddressingResult::immediate(0x80));
            assert!(cpu.get_negative());
        }
    }

    #[test]
    fn lda_reads_through_memory_addressing_as_well_as_immediate() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        bus.write(0x1234, 0x7E);
        cpu.lda(&mut bus, &AddressingResult::new(0x1234));
        assert_eq!(cpu.a, 0x7E);
    }

    #[test]
    fn each_store_writes_its_register_and_touches_no_flags() {
        type StoreOp = fn(&Cpu, &mut Bus, &AddressingResult);
        let cases: [(StoreOp, fn(&mut Cpu, u8)); 3] = [
            (Cpu::sta, |c, v| c.a = v),
            (Cpu::stx, |c, v| c.x = v),
            (Cpu::sty, |c, v| c.y = v),
        ];
        for (store, set_register) in cases {
            let mut cpu = Cpu::new();
            let mut bus = Bus::new();
            set_register(&mut cpu, 0x42);
            cpu.set_zero(true);
            cpu.set_negative(true);
            store(&cpu, &mut bus, &AddressingResult::new(0x1234));
            assert_eq!(bus.read(0x1234), 0x42);
            assert!(cpu.get_zero(), "store must not touch flags it doesn't own");
            assert!(cpu.get_negative());
        }
    }

    #[test]
    fn storing_zero_does_not_set_the_zero_flag() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.a = 0x00;
        cpu.sta(&mut bus, &AddressingResult::new(0x1234));
        assert_eq!(bus.read(0x1234), 0x00);
        assert!(!cpu.get_zero(), "STA never updates flags");
    }

    #[test]
    fn a_value_survives_a_load_store_load_round_trip() {
        let mut cpu = Cpu::new();
        let mut bus = Bus::new();
        cpu.lda(&mut bus, &AddressingResult::immediate(0x42));
        let dest = AddressingResult::new(0x1234);
        cpu.sta(&mut bus, &dest);
        cpu.a = 0x00;
        cpu.lda(&mut bus, &dest);
        assert_eq!(cpu.a, 0x42);
    }
}
