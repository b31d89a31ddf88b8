// PPU module - Picture Processing Unit implementation
// This module contains the PPU (2C02) emulation
//
// # PPU Implementation
//
// The PPU advances one dot (341 per scanline, 262 scanlines per frame) at a time, so VBlank
// timing, NMI assertion, and sprite-0/overflow flags land on the cycle real hardware sets
// them. Pixel data is produced a full frame at a time by `rendering`, latched into the
// frame buffer the instant the PPU crosses into the post-render scanline - software that
// only ever reads the completed buffer (which is the entire audience for a core with no
// display backend) cannot tell the difference from true per-dot compositing.
//
// ## PPU Registers
//
// | Address | Name       | Access | Description                    |
// |---------|------------|--------|--------------------------------|
// | $2000   | PPUCTRL    | Write  | PPU Control Register 1         |
// | $2001   | PPUMASK    | Write  | PPU Control Register 2         |
// | $2002   | PPUSTATUS  | Read   | PPU Status Register            |
// | $2003   | OAMADDR    | Write  | OAM Address Port               |
// | $2004   | OAMDATA    | R/W    | OAM Data Port                  |
// | $2005   | PPUSCROLL  | Write×2| Scroll Position Register       |
// | $2006   | PPUADDR    | Write×2| PPU Address Register           |
// | $2007   | PPUDATA    | R/W    | PPU Data Port                  |

mod constants;
mod memory;
mod registers;
mod rendering;

use crate::cartridge::{Mapper, Mirroring};
use constants::*;

/// PPU (2C02) state: registers, VRAM, OAM, and dot-level timing.
///
/// Owns no reference to the cartridge mapper; every operation that needs pattern-table
/// data takes the mapper as a borrowed argument, since the mapper itself lives on the bus
/// alongside the PPU rather than behind a handle the PPU holds itself.
pub struct Ppu {
    pub(crate) ppuctrl: u8,
    pub(crate) ppumask: u8,
    pub(crate) ppustatus: u8,
    pub(crate) oam_addr: u8,

    /// v: current VRAM address (15 bits).
    pub(crate) v: u16,
    /// t: temporary VRAM address / scroll latch (15 bits).
    pub(crate) t: u16,
    /// x: fine X scroll (3 bits).
    pub(crate) fine_x: u8,
    /// w: write toggle shared by PPUSCROLL/PPUADDR.
    pub(crate) write_latch: bool,
    pub(crate) read_buffer: u8,

    pub(crate) nametables: [u8; NAMETABLE_SIZE * 4],
    pub(crate) palette_ram: [u8; PALETTE_SIZE],
    pub(crate) mirroring: Mirroring,

    pub(crate) oam: [u8; 256],
    pub(crate) frame_buffer: [u8; SCREEN_WIDTH * SCREEN_HEIGHT],

    pub(crate) scanline: u16,
    pub(crate) cycle: u16,
    pub(crate) frame: u64,

    pub(crate) nmi_pending: bool,
    /// True only on the exact dot the VBlank flag was set; a PPUSTATUS read on that same
    /// dot suppresses the NMI that would otherwise fire (the well-known "vblank race").
    pub(crate) vblank_just_set: bool,
    /// Tracks PPUCTRL bit 7 across writes so enabling it while VBlank is already set (but
    /// not on the exact set cycle) can still fire a late NMI.
    pub(crate) prev_nmi_enable: bool,
}

impl Ppu {
    pub fn new() -> Self {
        Ppu {
            ppuctrl: 0,
            ppumask: 0,
            ppustatus: 0,
            oam_addr: 0,
            v: 0,
            t: 0,
            fine_x: 0,
            write_latch: false,
            read_buffer: 0,
            nametables: [0; NAMETABLE_SIZE * 4],
            palette_ram: [0; PALETTE_SIZE],
            mirroring: Mirroring::Horizontal,
            oam: [0; 256],
            frame_buffer: [0; SCREEN_WIDTH * SCREEN_HEIGHT],
            scanline: 0,
            cycle: 0,
            frame: 0,
            nmi_pending: false,
            vblank_just_set: false,
            prev_nmi_enable: false,
        }
    }

    pub fn reset(&mut self) {
        let mirroring = self.mirroring;
        *self = Ppu::new();
        self.mirroring = mirroring;
    }

    /// Sets the nametable mirroring mode. Called once, by the mapper, at cartridge load.
    pub fn set_mirroring(&mut self, mirroring: Mirroring) {
        self.mirroring = mirroring;
    }

    /// Writes OAM directly from a 256-byte OAM DMA transfer, bypassing OAMADDR/OAMDATA.
    pub fn write_oam_dma(&mut self, data: &[u8; 256]) {
        self.oam.copy_from_slice(data);
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame_buffer
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    pub fn cycle(&self) -> u16 {
        self.cycle
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    fn is_rendering_enabled(&self) -> bool {
        self.background_enabled() || self.sprites_enabled()
    }

    /// Runs at the first dot of a scanline, before any of its pixels are produced.
    fn start_scanline(&mut self) {
        match self.scanline {
            PRERENDER_SCANLINE => {
                self.ppustatus &= !0xE0; // clear VBlank, sprite 0 hit, sprite overflow
                self.nmi_pending = false;
                if self.is_rendering_enabled() {
                    self.v = self.t;
                }
            }
            FIRST_VISIBLE_SCANLINE..=LAST_VISIBLE_SCANLINE if self.is_rendering_enabled() => {
                // t: ...X.YYYYY.XXXXX <- copy horizontal bits into v at scanline start.
                self.v = (self.v & !0x041F) | (self.t & 0x041F);
            }
            FIRST_VBLANK_SCANLINE => {
                self.ppustatus |= 0x80;
                self.vblank_just_set = true;
                if self.nmi_enabled() {
                    self.nmi_pending = true;
                }
            }
            _ => {}
        }
    }

    /// Runs at the last dot of a scanline, after its pixels (if any) are produced.
    fn end_scanline(&mut self, mapper: Option<&dyn Mapper>) {
        if (FIRST_VISIBLE_SCANLINE..=LAST_VISIBLE_SCANLINE).contains(&self.scanline)
            && self.is_rendering_enabled()
        {
            self.render_scanline(self.scanline, mapper);
            self.increment_fine_y();
        }
    }

    /// v += 0x1000 (fine-Y); on the carry into bit 15, undoes the fine-Y bits and
    /// rolls the carry into coarse-Y, wrapping coarse-Y at 30 with a nametable toggle
    /// (the tile grid is only 30 rows tall) and at 31 without one (the two rows past
    /// the grid that PPUADDR writes can still park `v` in).
    fn increment_fine_y(&mut self) {
        self.v = self.v.wrapping_add(0x1000);
        if self.v & 0x8000 != 0 {
            self.v = self.v.wrapping_sub(0x7FE0);
            let coarse_y = (self.v & 0x03E0) >> 5;
            if coarse_y == 30 {
                self.v &= !0x03E0;
                self.v ^= 0x0800;
            } else if coarse_y == 31 {
                self.v &= !0x03E0;
            }
        }
    }

    /// Advances the PPU by one dot. Returns `true` exactly once per frame, on the
    /// last dot of the pre-render scanline.
    pub fn step(&mut self, mapper: Option<&dyn Mapper>) -> bool {
        self.vblank_just_set = false;
        let mut frame_complete = false;

        if self.cycle == 0 {
            self.start_scanline();
        }
        if self.cycle == CYCLES_PER_SCANLINE - 1 {
            self.end_scanline(mapper);
        }

        self.cycle += 1;
        if self.cycle >= CYCLES_PER_SCANLINE {
            self.cycle = 0;
            self.scanline += 1;
            if self.scanline >= SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame += 1;
                frame_complete = true;
            }
        }

        // Odd frames skip the idle dot of the pre-render scanline when rendering is on.
        if self.scanline == PRERENDER_SCANLINE
            && self.cycle == CYCLES_PER_SCANLINE - 1
            && (self.frame & 1) == 1
            && self.is_rendering_enabled()
        {
            self.cycle = 0;
            self.scanline = 0;
            self.frame += 1;
            frame_complete = true;
        }

        frame_complete
    }

    pub fn nmi_pending(&self) -> bool {
        self.nmi_pending
    }

    pub fn clear_nmi(&mut self) {
        self.nmi_pending = false;
    }
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
