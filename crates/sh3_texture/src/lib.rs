//! This library decodes the textures stored in the **arc** archives of *Silent Hill 3*.
//!
//! # Texture Format Documentation
//!
//! A texture asset may start with a 64 byte preheader, followed by the texture header and the
//! pixel data. All multi-byte integers are little-endian.
//!
//! ## Preheader
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Zero                   | 4 bytes: Always 0                                          |
//! | 0x0004         | Unknown                | 8 bytes                                                    |
//! | 0x000C         | Magic number           | 4 bytes: 0xA7A7A7A7                                        |
//! | 0x0010         | Unknown                | 48 bytes                                                   |
//!
//! ## Texture Header
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Batch Marker           | 4 bytes: 0xFFFFFFFF                                        |
//! | 0x0008         | Batch Header Size      | 4 bytes                                                    |
//! | 0x000C         | Batch Size             | 4 bytes                                                    |
//! | 0x0014         | Batched Textures       | 4 bytes: Number of textures in the batch                   |
//! | 0x0020         | Info Marker            | 4 bytes: 0xFFFFFFFF                                        |
//! | 0x0028         | Width                  | 2 bytes                                                    |
//! | 0x002A         | Height                 | 2 bytes                                                    |
//! | 0x002C         | Bits Per Pixel         | 1 byte: Declared, see below                                |
//! | 0x002D         | Data Offset            | 1 byte                                                     |
//! | 0x0030         | Data Size              | 4 bytes: Size of the pixel data                            |
//! | 0x0034         | File Size              | 4 bytes: Size of the pixel data plus everything before it  |
//! | 0x003C         | Unknown                | 4 bytes                                                    |
//! | 0x0040         | Unknown                | 4 bytes: Usually 1                                         |
//!
//! The header is 128 bytes, unlisted bytes are unused. The declared bits per pixel are not
//! reliable: if the data size equals `width * height * 4` the texture is 32 bit RGBA regardless.
//! Otherwise 24 is BGR, 16 is RGBA16 and 8 is paletted.
//!
//! The pixel data follows the header, except for paletted textures where it starts at
//! `File Size - Data Size`.
//!
//! ## Palette
//!
//! Paletted textures have a 48 byte palette header at `Batch Header Size + File Size`:
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Palette Size           | 4 bytes: Size in bytes, padding between blocks included    |
//! | 0x000C         | Bytes Per Color        | 1 byte                                                     |
//! | 0x000E         | Block Size             | 1 byte: Size of the colors of one block                    |
//! | 0x0020         | Distortion             | 1 byte                                                     |
//!
//! Color blocks follow the header every 256 bytes, each starting with `Block Size` bytes of RGBA
//! colors. The assembled palette has runs of 8 colors swapped, see
//! [`palette::swap_color_blocks`].
//!
//! Paletted textures wider than 96 pixels store their indices in a distorted order, see
//! [`distortion`].
//!

pub mod decode;
pub mod distortion;
pub mod error;
pub mod header;
pub mod palette;
pub mod tga;

pub use decode::{DecodedTexture, DecoderOptions, PixelFormat, TextureDecoder, TextureSink};
pub use palette::{Palette, Rgba};
