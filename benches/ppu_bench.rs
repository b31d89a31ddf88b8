// PPU Benchmarks
// Performance benchmarks for PPU rendering and register access

use criterion::{criterion_group, criterion_main, Criterion};
use nes_core::cartridge::mappers::Mapper0;
use nes_core::{Bus, Cartridge, Mapper, Mirroring};
use std::hint::black_box;

fn create_test_cartridge() -> Cartridge {
    let mut cart = Cartridge::new();
    cart.prg_rom = vec![0; 16 * 1024];
    cart.chr_rom = vec![0xAA; 8 * 1024];
    cart.mirroring = Mirroring::Horizontal;
    cart
}

fn bus_with_mapper() -> Bus {
    let mut bus = Bus::new();
    let mapper = Box::new(Mapper0::new(create_test_cartridge()));
    mapper.connect(&mut bus);
    bus
}

/// Benchmark a full frame of PPU steps (262 scanlines * 341 dots = 89,342 dots).
fn bench_ppu_rendering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_rendering");
    group.sample_size(20);

    group.bench_function("full_frame_via_step", |b| {
        let mut bus = bus_with_mapper();
        bus.write(0x2001, 0b0001_1110); // PPUMASK: show bg + sprites

        b.iter(|| {
            for _ in 0..89342 {
                black_box(bus.step_ppu());
            }
        });
    });

    group.finish();
}

fn bench_ppu_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_step");

    group.bench_function("single_step", |b| {
        let mut bus = bus_with_mapper();
        b.iter(|| {
            black_box(bus.step_ppu());
        });
    });

    group.bench_function("scanline_341_cycles", |b| {
        let mut bus = bus_with_mapper();
        b.iter(|| {
            for _ in 0..341 {
                black_box(bus.step_ppu());
            }
        });
    });

    group.finish();
}

fn bench_ppu_registers(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_registers");

    group.bench_function("ppuctrl_write", |b| {
        let mut bus = bus_with_mapper();
        b.iter(|| {
            bus.write(black_box(0x2000), black_box(0b1001_0000));
        });
    });

    group.bench_function("ppustatus_read", |b| {
        let mut bus = bus_with_mapper();
        b.iter(|| {
            black_box(bus.read(0x2002));
        });
    });

    group.bench_function("ppudata_write_sequence", |b| {
        let mut bus = bus_with_mapper();
        b.iter(|| {
            bus.write(0x2006, 0x20);
            bus.write(0x2006, 0x00);
            for i in 0..32 {
                bus.write(0x2007, i);
            }
        });
    });

    group.finish();
}

fn bench_ppu_oam(c: &mut Criterion) {
    let mut group = c.benchmark_group("ppu_oam");

    group.bench_function("oam_write", |b| {
        let mut bus = bus_with_mapper();
        b.iter(|| {
            bus.write(0x2003, 0);
            for i in 0..=255u8 {
                bus.write(0x2004, i);
            }
        });
    });

    group.bench_function("oam_read", |b| {
        let mut bus = bus_with_mapper();
        b.iter(|| {
            black_box(bus.read(0x2004));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_ppu_rendering,
    bench_ppu_step,
    bench_ppu_registers,
    bench_ppu_oam
);
criterion_main!(benches);
