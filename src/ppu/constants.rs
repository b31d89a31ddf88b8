// PPU hardware constants (NTSC timing).

pub(super) const PPU_REGISTER_MASK: u16 = 0x0007;

pub(super) const NAMETABLE_SIZE: usize = 1024;
pub(super) const PALETTE_SIZE: usize = 32;

pub(super) const SCREEN_WIDTH: usize = 256;
pub(super) const SCREEN_HEIGHT: usize = 240;
pub(super) const NAMETABLE_WIDTH: usize = 32;
pub(super) const NAMETABLE_HEIGHT: usize = 30;
pub(super) const TILE_SIZE: usize = 8;

pub(super) const CYCLES_PER_SCANLINE: u16 = 341;
pub(super) const SCANLINES_PER_FRAME: u16 = 262;

/// 341 cycles/scanline * 262 scanlines.
#[allow(dead_code)]
pub(super) const CYCLES_PER_FRAME: u32 = (CYCLES_PER_SCANLINE as u32) * (SCANLINES_PER_FRAME as u32);

/// Scanline 261, sometimes documented as -1.
pub(super) const PRERENDER_SCANLINE: u16 = 261;
pub(super) const FIRST_VISIBLE_SCANLINE: u16 = 0;
pub(super) const LAST_VISIBLE_SCANLINE: u16 = 239;
pub(super) const POSTRENDER_SCANLINE: u16 = 240;
pub(super) const FIRST_VBLANK_SCANLINE: u16 = 241;
pub(super) const LAST_VBLANK_SCANLINE: u16 = 260;
