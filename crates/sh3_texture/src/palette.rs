//! Color palettes of 8 bit textures

use sh3_arc::Resource;
use tracing::{trace, warn};

use crate::{
    error::{Error, Result},
    header::{PaletteHeader, COLOR_SIZE},
};

/// Index of the first color moved by [`swap_color_blocks`]
const SWAP_START: usize = 8;

/// Distance between the starts of two swapped runs
const SWAP_DISTANCE: usize = 32;

/// Number of colors exchanged per run
const SWAP_SIZE: usize = 8;

/// Most colors an 8 bit index can address
pub const MAX_COLORS: usize = 256;

/// A palette color as stored on disk
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }
}

/// Reorder colors the way the game expects them
///
/// Starting at color 8, the first 8 colors of every run of 32 are swapped with the 8 colors
/// after them. Stops with a warning if a run does not have enough colors left.
pub fn swap_color_blocks(colors: &mut [Rgba]) {
    for start in (SWAP_START..colors.len()).step_by(SWAP_DISTANCE) {
        if colors.len() < start + 2 * SWAP_SIZE {
            warn!(
                colors = colors.len(),
                start, "palette doesn't have enough colors left for swapping"
            );
            break;
        }

        let (run, rest) = colors[start..].split_at_mut(SWAP_SIZE);
        run.swap_with_slice(&mut rest[..SWAP_SIZE]);
    }
}

/// The ordered colors of a paletted texture
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Rgba>,
}

impl Palette {
    /// Build a palette from colors in their stored order, reordering them with
    /// [`swap_color_blocks`]
    pub fn from_colors(mut colors: Vec<Rgba>) -> Result<Palette> {
        if colors.len() > MAX_COLORS {
            return Err(Error::PaletteTooLarge { len: colors.len() });
        }
        swap_color_blocks(&mut colors);
        Ok(Palette { colors })
    }

    /// Collect the colors of every block of a palette resource
    pub fn from_resource(resource: &Resource<PaletteHeader>) -> Result<Palette> {
        let header = resource.header()?;

        let len = header.block_count().saturating_mul(header.colors_per_block());
        if len > MAX_COLORS {
            return Err(Error::PaletteTooLarge { len });
        }

        let mut colors = Vec::with_capacity(len);
        for block in 0..header.block_count() {
            let data = resource.raw_data(block)?;
            colors.extend(data.chunks_exact(COLOR_SIZE).map(Rgba::from_bytes));
        }
        trace!(
            blocks = header.block_count(),
            colors = colors.len(),
            "read palette"
        );

        Self::from_colors(colors)
    }

    /// Get a color
    pub fn get(&self, index: u8) -> Option<Rgba> {
        self.colors.get(index as usize).copied()
    }

    /// Number of colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All colors in lookup order
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Map indices to packed RGB triplets, dropping the alpha channel
    pub fn depalettize(&self, indices: &[u8]) -> Result<Vec<u8>> {
        let mut rgb = Vec::with_capacity(indices.len() * 3);
        for &index in indices {
            let color = self.get(index).ok_or(Error::PaletteIndexOutOfRange {
                index,
                len: self.len(),
            })?;
            rgb.extend_from_slice(&[color.r, color.g, color.b]);
        }
        Ok(rgb)
    }
}
