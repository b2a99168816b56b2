//! Decoding texture assets into pixel data

use bon::Builder;
use sh3_arc::{FileSource, Resource};
use std::path::PathBuf;
use tracing::{debug, instrument};

use crate::{
    distortion::{is_distorted, undistort},
    error::{Error, Result},
    header::{PaletteHeader, TextureHeader, TexturePreheader},
    palette::Palette,
    tga::dump_tga,
};

/// Layout of decoded pixel data, the discriminant is the real bpp it is decoded from
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelFormat {
    /// 32 bit RGBA
    Rgba = 32,
    /// 24 bit BGR
    Bgr = 24,
    /// 16 bit RGBA, passed through as stored
    Rgba16 = 16,
    /// 8 bit palette indices, decoded to 24 bit RGB
    Palette = 8,
}

impl TryFrom<u8> for PixelFormat {
    type Error = Error;

    fn try_from(bpp: u8) -> Result<Self> {
        match bpp {
            32 => Ok(PixelFormat::Rgba),
            24 => Ok(PixelFormat::Bgr),
            16 => Ok(PixelFormat::Rgba16),
            8 => Ok(PixelFormat::Palette),
            other => Err(Error::UnsupportedFormat(other)),
        }
    }
}

impl PixelFormat {
    /// Bits per pixel of the stored data
    pub fn bpp(self) -> u8 {
        self as u8
    }

    /// Bytes per pixel of the decoded data
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba => 4,
            PixelFormat::Bgr | PixelFormat::Palette => 3,
            PixelFormat::Rgba16 => 2,
        }
    }

    /// Bits per pixel of the decoded data
    pub fn dump_bpp(self) -> u8 {
        (self.bytes_per_pixel() * 8) as u8
    }
}

/// A decoded texture ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTexture {
    pub width: u16,
    pub height: u16,
    pub format: PixelFormat,
    /// Row-major pixels, [`PixelFormat::Palette`] textures hold packed RGB
    pub pixels: Vec<u8>,
}

/// Receives decoded textures, usually to upload them to the GPU
pub trait TextureSink {
    fn upload(
        &mut self,
        texture: &DecodedTexture,
    ) -> core::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<F> TextureSink for F
where
    F: FnMut(&DecodedTexture) -> core::result::Result<(), Box<dyn std::error::Error + Send + Sync>>,
{
    fn upload(
        &mut self,
        texture: &DecodedTexture,
    ) -> core::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self(texture)
    }
}

/// Settings for a [`TextureDecoder`]
#[derive(Debug, Clone, Builder)]
pub struct DecoderOptions {
    /// Write every decoded texture to [`DecoderOptions::dump_path`]
    #[builder(default = true)]
    pub dump: bool,

    /// Where the diagnostic TGA dump is written
    #[builder(into, default = PathBuf::from("output.tga"))]
    pub dump_path: PathBuf,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Decodes texture assets loaded from a [`FileSource`]
///
/// ```no_run
/// use sh3_arc::{Archive, ArchiveOptions};
/// use sh3_texture::{DecoderOptions, TextureDecoder};
///
/// fn decode(name: &str) -> miette::Result<()> {
///     let archive = Archive::open(ArchiveOptions::default())?;
///     let decoder = TextureDecoder::new(DecoderOptions::builder().dump(false).build());
///
///     let texture = decoder.decode(&archive, name)?;
///     println!("{}x{} {:?}", texture.width, texture.height, texture.format);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextureDecoder {
    options: DecoderOptions,
}

impl TextureDecoder {
    pub fn new(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// Decode the texture `name`
    ///
    /// A failed header check is an error, there is no fallback texture.
    #[instrument(skip(self, source), err)]
    pub fn decode<S: FileSource + ?Sized>(&self, source: &S, name: &str) -> Result<DecodedTexture> {
        let header_rc = load_header(source, name)?;
        if !header_rc.check() {
            return Err(Error::HeaderCheckFailed { name: name.into() });
        }

        let header = *header_rc.header()?;
        let format = PixelFormat::try_from(header.real_bpp())?;
        let texture = match format {
            PixelFormat::Palette => decode_paletted(&header_rc, &header, name)?,
            _ => DecodedTexture {
                width: header.width,
                height: header.height,
                format,
                pixels: header_rc.raw_data(())?.to_vec(),
            },
        };
        debug!(
            width = texture.width,
            height = texture.height,
            format = ?texture.format,
            "decoded texture"
        );

        if self.options.dump {
            dump_tga(
                &self.options.dump_path,
                texture.width,
                texture.height,
                texture.format.dump_bpp(),
                &texture.pixels,
            );
        }

        Ok(texture)
    }

    /// Decode the texture `name` and hand it to `sink`
    pub fn load<S: FileSource + ?Sized>(
        &self,
        source: &S,
        name: &str,
        sink: &mut impl TextureSink,
    ) -> Result<DecodedTexture> {
        let texture = self.decode(source, name)?;
        sink.upload(&texture).map_err(Error::Upload)?;
        Ok(texture)
    }
}

/// Load the texture header, from behind a preheader if the file has one
fn load_header<S: FileSource + ?Sized>(source: &S, name: &str) -> Result<Resource<TextureHeader>> {
    let mut preheader = Resource::<TexturePreheader>::default();
    if preheader.load_from_file(source, name)?.is_none() {
        return Err(Error::TextureNotFound { name: name.into() });
    }
    if preheader.check() {
        debug!("texture has a preheader");
        return Ok(preheader.sub_header()?);
    }

    // no preheader, the file is likely just the texture itself
    let mut header = Resource::<TextureHeader>::default();
    header.load_from_file(source, name)?;
    Ok(header)
}

fn decode_paletted(
    header_rc: &Resource<TextureHeader>,
    header: &TextureHeader,
    name: &str,
) -> Result<DecodedTexture> {
    let palette_rc: Resource<PaletteHeader> = header_rc.sub_header()?;
    if !palette_rc.check() {
        return Err(Error::PaletteCheckFailed { name: name.into() });
    }
    let palette = Palette::from_resource(&palette_rc)?;

    let indices = header_rc.raw_data(())?;
    let (width, height, pixels) = if is_distorted(header.width) {
        let (width, height, indices) = undistort(indices, header.width, header.height)?;
        (width, height, palette.depalettize(&indices)?)
    } else {
        (header.width, header.height, palette.depalettize(indices)?)
    };

    Ok(DecodedTexture {
        width,
        height,
        format: PixelFormat::Palette,
        pixels,
    })
}
