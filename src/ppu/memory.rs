// PPU memory access methods

use super::constants::NAMETABLE_SIZE;
use super::Ppu;
use crate::cartridge::{Mapper, Mirroring};

impl Ppu {
    /// Maps a nametable address ($2000-$2FFF) to its physical VRAM offset (0-2047),
    /// collapsing the four logical nametables down to the 2KB actually present per
    /// the cartridge's mirroring mode.
    pub(super) fn mirror_nametable_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x0FFF) as usize;
        let table = addr / NAMETABLE_SIZE;
        let offset = addr % NAMETABLE_SIZE;

        let mirrored_table = match self.mirroring {
            Mirroring::Horizontal => match table {
                0 | 1 => 0,
                2 | 3 => 1,
                _ => unreachable!(),
            },
            Mirroring::Vertical => match table {
                0 | 2 => 0,
                1 | 3 => 1,
                _ => unreachable!(),
            },
            Mirroring::SingleScreen => 0,
            Mirroring::FourScreen => {
                // TODO: carry 4 independent KB of VRAM once a mapper needs it.
                match table {
                    0 | 1 => 0,
                    2 | 3 => 1,
                    _ => unreachable!(),
                }
            }
        };

        mirrored_table * NAMETABLE_SIZE + offset
    }

    /// Maps a palette address ($3F00-$3FFF) down to 0-31, folding the four sprite
    /// backdrop-color mirrors ($3F10/$14/$18/$1C) onto their background counterparts.
    pub(super) fn mirror_palette_addr(&self, addr: u16) -> usize {
        let addr = (addr & 0x001F) as usize;
        if addr >= 16 && addr.is_multiple_of(4) {
            addr - 16
        } else {
            addr
        }
    }

    /// Reads the PPU's 14-bit address space: pattern tables through the mapper,
    /// nametables and palette RAM locally.
    pub(super) fn read_ppu_memory(&self, addr: u16, mapper: Option<&dyn Mapper>) -> u8 {
        let addr = addr & 0x3FFF;

        match addr {
            0x0000..=0x1FFF => mapper.map(|m| m.ppu_read(addr)).unwrap_or(0),
            0x2000..=0x2FFF => self.nametables[self.mirror_nametable_addr(addr)],
            0x3000..=0x3EFF => self.nametables[self.mirror_nametable_addr(addr - 0x1000)],
            0x3F00..=0x3FFF => self.palette_ram[self.mirror_palette_addr(addr)],
            _ => unreachable!(),
        }
    }

    /// Writes the PPU's 14-bit address space. Pattern-table writes only take effect
    /// when the cartridge has CHR-RAM; the mapper itself is responsible for ignoring
    /// writes to CHR-ROM.
    pub(super) fn write_ppu_memory(
        &mut self,
        addr: u16,
        data: u8,
        mapper: Option<&mut (dyn Mapper + 'static)>,
    ) {
        let addr = addr & 0x3FFF;

        match addr {
            0x0000..=0x1FFF => {
                if let Some(m) = mapper {
                    m.ppu_write(addr, data);
                }
            }
            0x2000..=0x2FFF => {
                let i = self.mirror_nametable_addr(addr);
                self.nametables[i] = data;
            }
            0x3000..=0x3EFF => {
                let i = self.mirror_nametable_addr(addr - 0x1000);
                self.nametables[i] = data;
            }
            0x3F00..=0x3FFF => {
                let i = self.mirror_palette_addr(addr);
                self.palette_ram[i] = data;
            }
            _ => unreachable!(),
        }
    }
}
