// Palette-index to PNG conversion for offline debug dumps (nametable/pattern-table
// snapshots, final-frame dumps). Never touches the per-frame hot path.

use std::fs;
use std::io;
use std::path::Path;

/// The NES master palette: 64 entries, index -> 0xRRGGBB.
pub const NES_PALETTE: [u32; 64] = [
    0x666666, 0x002A88, 0x1412A7, 0x3B00A4, 0x5C007E, 0x6E0040, 0x6C0600, 0x561D00, 0x333500,
    0x0B4800, 0x005200, 0x004F08, 0x00404D, 0x000000, 0x000000, 0x000000, 0xADADAD, 0x155FD9,
    0x4240FF, 0x7527FE, 0xA01ACC, 0xB71E7B, 0xB53120, 0x994E00, 0x6B6D00, 0x388700, 0x0C9300,
    0x008F32, 0x007C8D, 0x000000, 0x000000, 0x000000, 0xFFFEFF, 0x64B0FF, 0x9290FF, 0xC676FF,
    0xF36AFF, 0xFE6ECC, 0xFE8170, 0xEA9E22, 0xBCBE00, 0x88D800, 0x5CE430, 0x45E082, 0x48CDDE,
    0x4F4F4F, 0x000000, 0x000000, 0xFFFEFF, 0xC0DFFF, 0xD3D2FF, 0xE8C8FF, 0xFBC2FF, 0xFEC4EA,
    0xFECCC5, 0xF7D8A5, 0xE4E594, 0xCFEF96, 0xBDF4AB, 0xB3F3CC, 0xB5EBF2, 0xB8B8B8, 0x000000,
    0x000000,
];

/// Errors from converting a palette-index buffer to a PNG file.
#[derive(Debug)]
pub enum RenderError {
    Io(io::Error),
    PngEncoding(png::EncodingError),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "I/O error: {e}"),
            RenderError::PngEncoding(e) => write!(f, "PNG encoding error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<io::Error> for RenderError {
    fn from(e: io::Error) -> Self {
        RenderError::Io(e)
    }
}

impl From<png::EncodingError> for RenderError {
    fn from(e: png::EncodingError) -> Self {
        RenderError::PngEncoding(e)
    }
}

fn palette_indices_to_rgb(indices: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(indices.len() * 3);
    for &index in indices {
        let color = NES_PALETTE[index as usize % NES_PALETTE.len()];
        rgb.push(((color >> 16) & 0xFF) as u8);
        rgb.push(((color >> 8) & 0xFF) as u8);
        rgb.push((color & 0xFF) as u8);
    }
    rgb
}

/// Writes a palette-index buffer (e.g. `Ppu::frame()`, `PpuDebugger::nametable_snapshot`,
/// `PpuDebugger::pattern_table_snapshot`) to `path` as an RGB8 PNG.
pub fn save_indexed_png(
    path: &Path,
    indices: &[u8],
    width: u32,
    height: u32,
) -> Result<(), RenderError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&palette_indices_to_rgb(indices))?;
    Ok(())
}
