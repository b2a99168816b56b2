//! Storage order of wide paletted textures
//!
//! Paletted textures wider than [`DISTORTION_WIDTH`] store their indices in tiles of 16x2 pixels,
//! each 32 byte group interleaving one row with the row two lines below it. Two stored rows make
//! up four rows of the image, and every other pair of rows has its columns shifted by 4.

use tracing::warn;

use crate::error::{Error, Result};

/// Textures wider than this use the distorted layout
pub const DISTORTION_WIDTH: u16 = 96;

/// Width of a tile in pixels, also the width alignment
pub const TILE_WIDTH: u16 = 16;

/// Height alignment of distorted textures
pub const ROW_ALIGNMENT: u16 = 4;

/// Number of indices in one tile
const GROUP_SIZE: usize = 32;

/// Whether a texture of this width stores its indices distorted
pub fn is_distorted(width: u16) -> bool {
    width > DISTORTION_WIDTH
}

/// Round the dimensions of a distorted texture down to the tile alignment
pub fn clamp_dimensions(width: u16, height: u16) -> (u16, u16) {
    let clamped_width = width - width % TILE_WIDTH;
    if clamped_width != width {
        warn!(width, clamped_width, "texture width not divisible by 16");
    }

    let clamped_height = height - height % ROW_ALIGNMENT;
    if clamped_height != height {
        warn!(height, clamped_height, "texture height not divisible by 4");
    }

    (clamped_width, clamped_height)
}

fn x_offset(i: usize, flip: bool) -> usize {
    let mut offset = ((i << 2) & 0xF) + ((i >> 2) & 0xF);
    if i > 16 && i % 2 == 1 {
        offset = (offset ^ 8) & 0xF;
    }
    if flip {
        offset ^= 4;
    }
    offset
}

/// Walk the destination of every index of a `width` x `height` distorted texture in stored order
///
/// Both dimensions must already be aligned, see [`clamp_dimensions`]. `f` receives the position
/// in the stream and the destination index in the row-major image.
pub fn for_each_destination(width: u16, height: u16, mut f: impl FnMut(usize, usize)) {
    let (width, height) = (width as usize, height as usize);
    if width == 0 {
        return;
    }

    let (mut x, mut y) = (0, 0);
    let mut flip = false;
    let mut consumed = 0;
    while y < height {
        for i in 0..GROUP_SIZE {
            let row = y + if i % 2 == 1 { 2 } else { 0 };
            f(consumed + i, width * row + (x + x_offset(i, flip)) % width);
        }
        consumed += GROUP_SIZE;

        x += TILE_WIDTH as usize;
        if x >= width {
            x = 0;
            y += 1;
            if y % 2 == 0 {
                y += 2;
                flip = !flip;
            }
        }
    }
}

/// Reorder the indices of a distorted texture into row-major order
///
/// The dimensions are clamped with [`clamp_dimensions`] first, the returned dimensions are the
/// clamped ones. `indices` has to be consumed exactly.
pub fn undistort(indices: &[u8], width: u16, height: u16) -> Result<(u16, u16, Vec<u8>)> {
    let (width, height) = clamp_dimensions(width, height);
    if width == 0 || height < ROW_ALIGNMENT {
        return Err(Error::InvalidDimensions { width, height });
    }

    let needed = width as usize * height as usize;
    if indices.len() < needed {
        return Err(Error::IndexStreamExhausted {
            consumed: indices.len(),
            needed,
        });
    }

    let mut pixels = vec![0; needed];
    let mut consumed = 0;
    for_each_destination(width, height, |src, dst| {
        pixels[dst] = indices[src];
        consumed = src + 1;
    });

    if consumed != indices.len() {
        return Err(Error::IndexStreamMismatch {
            consumed,
            len: indices.len(),
        });
    }

    Ok((width, height, pixels))
}
