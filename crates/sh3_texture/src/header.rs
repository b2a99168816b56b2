//! Header schemas of texture assets
//!
//! A texture asset is an optional [`TexturePreheader`], a [`TextureHeader`] and the pixel data.
//! Paletted textures carry a [`PaletteHeader`] and its color blocks after the pixel data.

use binrw::BinRead;
use sh3_arc::{error::Result, Header, SubHeader};
use std::io::Cursor;

/// Magic number of a [`TexturePreheader`]
pub const PREHEADER_MAGIC: u32 = 0xA7A7_A7A7;

/// Marker at the start of the batch and texture info parts of a [`TextureHeader`]
pub const HEADER_MARKER: u32 = 0xFFFF_FFFF;

/// Distance between the starts of two palette color blocks
pub const PALETTE_BLOCK_STRIDE: usize = 256;

/// Size of one color record in a palette block
pub const COLOR_SIZE: usize = 4;

/// Optional record in front of some texture headers
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct TexturePreheader {
    /// Always zero
    pub zero: u32,

    /// Should always be [`PREHEADER_MAGIC`]
    #[br(pad_before = 8, pad_after = 48)]
    pub magic: u32,
}

impl Header for TexturePreheader {
    const SIZE: usize = 64;
    type DataArgs = ();

    fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self::read(&mut Cursor::new(bytes))?)
    }

    fn check(&self) -> bool {
        self.zero == 0 && self.magic == PREHEADER_MAGIC
    }
}

impl SubHeader<TextureHeader> for TexturePreheader {
    fn sub_header_offset(&self) -> usize {
        Self::SIZE
    }
}

/// Batch and texture info header
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct TextureHeader {
    /// Should be [`HEADER_MARKER`]
    pub batch_marker: u32,

    /// Size of the batch part of the header
    #[br(pad_before = 4)]
    pub batch_header_size: u32,

    pub batch_size: u32,

    /// Number of textures in the batch
    #[br(pad_before = 4)]
    pub batch_count: u32,

    /// Should be [`HEADER_MARKER`]
    #[br(pad_before = 8)]
    pub info_marker: u32,

    #[br(pad_before = 4)]
    pub width: u16,

    pub height: u16,

    /// Declared bits per pixel, see [`TextureHeader::real_bpp`]
    pub bpp: u8,

    pub data_offset_hint: u8,

    /// Size of the pixel data in bytes
    #[br(pad_before = 2)]
    pub data_size: u32,

    /// Size of the pixel data plus everything in front of it
    pub file_size: u32,

    #[br(pad_before = 4)]
    pub unknown1: u32,

    #[br(pad_after = 60)]
    pub unknown2: u32,
}

impl TextureHeader {
    fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// The bits per pixel the data actually uses
    ///
    /// The declared value is unreliable, data sized for 32 bits per pixel is always RGBA.
    pub fn real_bpp(&self) -> u8 {
        if self.data_size as u64 == self.pixels() * 4 {
            32
        } else {
            self.bpp
        }
    }

    /// Whether the pixel data is palette indices
    pub fn is_paletted(&self) -> bool {
        self.real_bpp() == 8
    }
}

impl Header for TextureHeader {
    const SIZE: usize = 128;
    type DataArgs = ();

    fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self::read(&mut Cursor::new(bytes))?)
    }

    fn check(&self) -> bool {
        let expected = self.pixels() * self.real_bpp() as u64 / 8;
        expected == self.data_size as u64 && (!self.is_paletted() || self.file_size >= self.data_size)
    }

    fn data_offset(&self, _args: ()) -> usize {
        if self.is_paletted() {
            self.file_size.saturating_sub(self.data_size) as usize
        } else {
            Self::SIZE
        }
    }

    fn data_size(&self, _remaining: usize, _args: ()) -> usize {
        self.data_size as usize
    }
}

impl SubHeader<PaletteHeader> for TextureHeader {
    fn sub_header_offset(&self) -> usize {
        self.batch_header_size as usize + self.file_size as usize
    }
}

/// Header of the palette following the pixel data of a paletted texture
///
/// The colors are stored in blocks with a stride of [`PALETTE_BLOCK_STRIDE`] bytes, only the
/// start of each block holds colors. The data arguments select a block.
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct PaletteHeader {
    /// Size of the palette in bytes, padding between blocks included
    pub palette_size: u32,

    #[br(pad_before = 8)]
    pub bytes_per_color: u8,

    /// Size of the colors of one block in bytes
    #[br(pad_before = 1)]
    pub block_size: u8,

    #[br(pad_before = 17, pad_after = 15)]
    pub distortion: u8,
}

impl PaletteHeader {
    /// Number of color blocks
    pub fn block_count(&self) -> usize {
        if self.bytes_per_color == 0 || self.block_size == 0 {
            return 0;
        }
        self.palette_size as usize / self.block_size as usize / self.bytes_per_color as usize
    }

    /// Number of colors in each block
    pub fn colors_per_block(&self) -> usize {
        match self.bytes_per_color {
            0 => 0,
            bpc => (self.block_size / bpc) as usize,
        }
    }
}

impl Header for PaletteHeader {
    const SIZE: usize = 48;
    type DataArgs = usize;

    fn parse(bytes: &[u8]) -> Result<Self> {
        Ok(Self::read(&mut Cursor::new(bytes))?)
    }

    fn check(&self) -> bool {
        self.bytes_per_color != 0 && self.block_size != 0
    }

    fn data_offset(&self, block: usize) -> usize {
        Self::SIZE + PALETTE_BLOCK_STRIDE * block
    }

    fn data_size(&self, _remaining: usize, _block: usize) -> usize {
        self.colors_per_block() * COLOR_SIZE
    }
}

#[cfg(test)]
mod test {
    use binrw::BinRead;
    use pretty_assertions::assert_eq;
    use sh3_arc::{error::Result, Header, Resource};
    use std::io::Cursor;

    use crate::header::{PaletteHeader, TextureHeader, TexturePreheader, HEADER_MARKER};

    #[rustfmt::skip]
    fn texture_header() -> Vec<u8> {
        vec![
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x20, 0x00, 0x00, 0x00, 0xA0, 0x10, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x20, 0x00, 0x08, 0x60, 0x00, 0x00,
            0x00, 0x08, 0x00, 0x00, 0x80, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ]
    }

    #[test]
    fn read_texture_header() -> Result<()> {
        let header = TextureHeader::read(&mut Cursor::new(texture_header()))?;

        let expected = TextureHeader {
            batch_marker: HEADER_MARKER,
            batch_header_size: 0x20,
            batch_size: 0x10A0,
            batch_count: 1,
            info_marker: HEADER_MARKER,
            width: 64,
            height: 32,
            bpp: 8,
            data_offset_hint: 0x60,
            data_size: 0x800,
            file_size: 0x880,
            unknown1: 7,
            unknown2: 1,
        };
        assert_eq!(header, expected);

        assert_eq!(header.real_bpp(), 8);
        assert!(header.check());
        assert_eq!(header.data_offset(()), 0x80);
        assert_eq!(header.data_size(0, ()), 0x800);

        Ok(())
    }

    #[test]
    fn real_bpp_follows_the_data_size() {
        let header = TextureHeader {
            width: 16,
            height: 16,
            bpp: 8,
            data_size: 16 * 16 * 4,
            file_size: 16 * 16 * 4 + 128,
            ..Default::default()
        };
        assert_eq!(header.real_bpp(), 32);
        assert!(!header.is_paletted());
        assert!(header.check());
        assert_eq!(header.data_offset(()), 128);
    }

    #[test]
    fn texture_header_check() {
        let mut header = TextureHeader {
            width: 16,
            height: 8,
            bpp: 24,
            data_size: 16 * 8 * 3,
            ..Default::default()
        };
        assert!(header.check());

        header.data_size += 1;
        assert!(!header.check());

        // no room for the pixel data in front of the palette
        let header = TextureHeader {
            width: 16,
            height: 8,
            bpp: 8,
            data_size: 16 * 8,
            file_size: 16,
            ..Default::default()
        };
        assert!(!header.check());
    }

    #[test]
    fn check_does_not_overflow() {
        let header = TextureHeader {
            width: u16::MAX,
            height: u16::MAX,
            bpp: 32,
            data_size: u32::MAX,
            ..Default::default()
        };
        assert!(!header.check());
    }

    #[test]
    fn preheader_check() -> Result<()> {
        #[rustfmt::skip]
        let mut raw = vec![
            0x00, 0x00, 0x00, 0x00, 0x11, 0x11, 0x11, 0x11, 0x22, 0x22, 0x22, 0x22, 0xA7, 0xA7, 0xA7, 0xA7,
        ];
        raw.resize(64, 0x33);

        let resource = Resource::<TexturePreheader>::from_bytes(raw.clone())?;
        assert!(resource.check());

        raw[0] = 0x01;
        let resource = Resource::<TexturePreheader>::from_bytes(raw)?;
        assert!(!resource.check());

        Ok(())
    }

    #[test]
    fn palette_blocks() -> Result<()> {
        #[rustfmt::skip]
        let mut raw = vec![
            0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x00, 0x40, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        ];
        raw.resize(48 + 4 * 256, 0x00);

        let resource = Resource::<PaletteHeader>::from_bytes(raw)?;
        let header = resource.header()?;
        assert_eq!(header.palette_size, 0x400);
        assert_eq!(header.bytes_per_color, 4);
        assert_eq!(header.block_size, 0x40);
        assert_eq!(header.distortion, 1);
        assert!(header.check());

        assert_eq!(header.block_count(), 4);
        assert_eq!(header.colors_per_block(), 16);
        assert_eq!(header.data_offset(3), 48 + 3 * 256);
        assert_eq!(resource.raw_data(3)?.len(), 64);

        Ok(())
    }

    #[test]
    fn empty_palette_header() {
        let header = PaletteHeader::default();
        assert!(!header.check());
        assert_eq!(header.block_count(), 0);
        assert_eq!(header.colors_per_block(), 0);
    }
}
