//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`sh3_arc::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    ArcError(#[from] sh3_arc::error::Error),

    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// no file with the texture name exists in the archive
    #[error("texture {name} was not found")]
    #[diagnostic(code(sh3_texture::E00101))]
    TextureNotFound { name: String },

    /// the texture header failed its size check
    #[error("tried to load texture {name}, but header-check failed")]
    #[diagnostic(
        code(sh3_texture::E00102),
        help("there is no fallback texture, the asset is corrupt or not a texture")
    )]
    HeaderCheckFailed { name: String },

    /// the palette header of a paletted texture is unusable
    #[error("palette of texture {name} failed its header check")]
    #[diagnostic(code(sh3_texture::E00103))]
    PaletteCheckFailed { name: String },

    /// the real bpp of the texture is not one of 8, 16, 24 or 32
    #[error("unknown pixel format, {0} bits per pixel")]
    #[diagnostic(code(sh3_texture::E00104))]
    UnsupportedFormat(u8),

    /// the dimensions are too small to hold a single distorted tile row
    #[error("texture of {width}x{height} is too small for the distorted layout")]
    #[diagnostic(code(sh3_texture::E00105))]
    InvalidDimensions { width: u16, height: u16 },

    /// the index stream ran out before every pixel was placed
    #[error("index stream exhausted after {consumed} bytes, {needed} needed")]
    #[diagnostic(code(sh3_texture::E00106))]
    IndexStreamExhausted { consumed: usize, needed: usize },

    /// the index stream held more bytes than there are pixels
    #[error("index stream of {len} bytes was not exactly consumed ({consumed} used)")]
    #[diagnostic(code(sh3_texture::E00107))]
    IndexStreamMismatch { consumed: usize, len: usize },

    /// a pixel refers to a color past the end of the palette
    #[error("palette index {index} is out of range for a palette of {len} colors")]
    #[diagnostic(code(sh3_texture::E00108))]
    PaletteIndexOutOfRange { index: u8, len: usize },

    /// more colors than an 8 bit index can address
    #[error("palette holds {len} colors, at most 256 can be addressed")]
    #[diagnostic(code(sh3_texture::E00109))]
    PaletteTooLarge { len: usize },

    /// the upload collaborator rejected the decoded texture
    #[error("texture upload failed: {0}")]
    #[diagnostic(code(sh3_texture::E00110))]
    Upload(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
