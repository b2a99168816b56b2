//! Minimal uncompressed TGA output used to dump decoded textures

use binrw::{io::NoSeek, BinWrite};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::{debug, instrument, warn};

use crate::error::Result;

/// Uncompressed true color image
pub const TYPE_RGB: u8 = 2;

/// Image origin in the upper left corner
pub const FLAGS_FLIP: u8 = 0x20;

#[derive(BinWrite, Debug, Copy, Clone, PartialEq)]
#[bw(little)]
struct TgaHeader {
    id_size: u8,
    colormap: u8,
    kind: u8,
    unused: [u8; 5],
    x_origin: u16,
    y_origin: u16,
    width: u16,
    height: u16,
    bpp: u8,
    flags: u8,
}

/// Whether a dump can be written for data with `bpp` bits per pixel
pub fn is_supported(bpp: u8) -> bool {
    matches!(bpp, 16 | 24 | 32)
}

/// Write a TGA image with an 18 byte header followed by `data` as is
pub fn write_tga<W: Write>(
    writer: &mut W,
    width: u16,
    height: u16,
    bpp: u8,
    data: &[u8],
) -> Result<()> {
    let header = TgaHeader {
        id_size: 0,
        colormap: 0,
        kind: TYPE_RGB,
        unused: [0; 5],
        x_origin: 0,
        y_origin: 0,
        width,
        height,
        bpp,
        flags: FLAGS_FLIP,
    };
    header.write(&mut NoSeek::new(&mut *writer))?;
    writer.write_all(data)?;
    Ok(())
}

/// Dump a decoded texture to `path`
///
/// Failures are logged and otherwise ignored, the dump is only a debugging aid.
#[instrument(skip(path, data), fields(path = %path.as_ref().display()))]
pub fn dump_tga(path: impl AsRef<Path>, width: u16, height: u16, bpp: u8, data: &[u8]) {
    if !is_supported(bpp) {
        warn!(bpp, "invalid bpp for a texture dump, not writing image data");
        return;
    }

    let write = || -> Result<()> {
        let mut file = BufWriter::new(File::create(path.as_ref())?);
        write_tga(&mut file, width, height, bpp, data)?;
        file.flush()?;
        Ok(())
    };
    match write() {
        Ok(()) => debug!("wrote texture dump"),
        Err(e) => warn!("unable to write texture dump: {e}"),
    }
}
