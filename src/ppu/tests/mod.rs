use super::Ppu;

#[test]
fn vblank_flag_sets_at_scanline_241_cycle_1() {
    let mut ppu = Ppu::new();
    // step() fires the scanline-241/cycle-0 side effect, then advances to cycle 1.
    for _ in 0..(241 * 341 + 1) {
        ppu.step(None);
    }
    assert_eq!(ppu.scanline(), 241);
    assert_ne!(ppu.ppustatus & 0x80, 0);
}

#[test]
fn nmi_fires_only_when_enabled() {
    let mut ppu = Ppu::new();
    ppu.ppuctrl = 0; // NMI disabled
    for _ in 0..(241 * 341 + 1) {
        ppu.step(None);
    }
    assert!(!ppu.nmi_pending());
}

#[test]
fn nmi_fires_when_enabled_at_vblank() {
    let mut ppu = Ppu::new();
    ppu.ppuctrl = 0x80; // NMI enabled
    for _ in 0..(241 * 341 + 1) {
        ppu.step(None);
    }
    assert!(ppu.nmi_pending());
}

#[test]
fn prerender_scanline_clears_status_flags() {
    let mut ppu = Ppu::new();
    ppu.ppustatus = 0xE0;
    for _ in 0..(261 * 341 + 1) {
        ppu.step(None);
    }
    assert_eq!(ppu.ppustatus & 0xE0, 0);
}

#[test]
fn reading_ppustatus_clears_vblank_and_resets_write_latch() {
    let mut ppu = Ppu::new();
    ppu.ppustatus = 0x80;
    ppu.write_latch = true;
    let status = ppu.read_register(2, None);
    assert_eq!(status, 0x80);
    assert_eq!(ppu.ppustatus & 0x80, 0);
    assert!(!ppu.write_latch);
}

#[test]
fn ppustatus_read_on_vblank_set_cycle_suppresses_nmi() {
    let mut ppu = Ppu::new();
    ppu.ppuctrl = 0x80;
    for _ in 0..(241 * 341) {
        ppu.step(None);
    }
    // This step is the exact dot VBlank/NMI get set.
    ppu.step(None);
    assert!(ppu.nmi_pending());
    ppu.read_register(2, None);
    assert!(!ppu.nmi_pending());
}

#[test]
fn oam_dma_writes_land_in_oam() {
    let mut ppu = Ppu::new();
    let mut data = [0u8; 256];
    data[0] = 0xAB;
    data[255] = 0xCD;
    ppu.write_oam_dma(&data);
    assert_eq!(ppu.oam[0], 0xAB);
    assert_eq!(ppu.oam[255], 0xCD);
}

#[test]
fn ppuscroll_double_write_sets_coarse_and_fine_scroll() {
    let mut ppu = Ppu::new();
    ppu.write_register(5, 0b0001_0011, None); // X: coarse=2, fine=3
    assert_eq!(ppu.fine_x, 0x03);
    ppu.write_register(5, 0b0010_1000, None); // Y scroll
    assert_ne!(ppu.t & 0x03E0, 0);
}

#[test]
fn ppuaddr_double_write_sets_v() {
    let mut ppu = Ppu::new();
    ppu.write_register(6, 0x21, None); // high byte
    ppu.write_register(6, 0x08, None); // low byte
    assert_eq!(ppu.v, 0x2108);
}

#[test]
fn loopy_v_copies_horizontal_bits_from_t_at_visible_scanline_start() {
    let mut ppu = Ppu::new();
    ppu.ppumask = 0x08; // background on
    ppu.t = 0x0415; // nametable-X set, coarse-X = 0x15
    ppu.v = 0x0000;
    ppu.step(None); // cycle 0 of scanline 0 runs start_scanline
    assert_eq!(ppu.v & 0x041F, 0x0415);
}

#[test]
fn loopy_v_fine_y_increments_at_end_of_visible_scanline() {
    let mut ppu = Ppu::new();
    ppu.ppumask = 0x08;
    ppu.v = 0x0000; // fine-Y = 0, coarse-Y = 0
    for _ in 0..341 {
        ppu.step(None);
    }
    assert_eq!((ppu.v >> 12) & 0x07, 1);
}

#[test]
fn loopy_v_coarse_y_wraps_with_nametable_toggle_after_eight_fine_y_increments() {
    let mut ppu = Ppu::new();
    ppu.ppumask = 0x08;
    ppu.v = 0x03A0; // coarse-Y = 29, fine-Y = 0
    for _ in 0..(341 * 8) {
        ppu.step(None);
    }
    assert_eq!((ppu.v >> 5) & 0x1F, 0);
    assert_eq!((ppu.v >> 11) & 0x01, 1);
}

#[test]
fn reset_preserves_mirroring() {
    use crate::cartridge::Mirroring;
    let mut ppu = Ppu::new();
    ppu.set_mirroring(Mirroring::Vertical);
    ppu.ppuctrl = 0xFF;
    ppu.reset();
    assert_eq!(ppu.mirroring, Mirroring::Vertical);
    assert_eq!(ppu.ppuctrl, 0);
}
