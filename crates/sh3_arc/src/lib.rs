//! This library handles reading the **arc** archives used by *Silent Hill 3*.
//!
//! # Arc Archive Format Documentation
//!
//! Game assets are split into named *sections*. Each section is backed by one uncompressed
//! `<section>.arc` file, and a single gzip compressed master index (`arc.arc`) lists every section
//! together with the names of the files stored in it.
//!
//! ## Master Index
//!
//! The master index is a gzip stream. Once decompressed it starts with a header and a descriptor:
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x20030417                                        |
//! | 0x0004         | Unused                 | 4 bytes                                                    |
//! | 0x0008         | Kind                   | 4 bytes                                                    |
//! | 0x000C         | Header Size            | 4 bytes                                                    |
//! | 0x0010         | Descriptor Kind        | 4 bytes                                                    |
//! | 0x0014         | Descriptor Size        | 4 bytes                                                    |
//! | 0x0018         | Section Count          | 4 bytes: Number of section records that follow             |
//! | 0x001C         | Unused                 | 4 bytes                                                    |
//!
//! ### Section Records
//!
//! Each section record is a 16 byte header followed by its name:
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Kind                   | 4 bytes                                                    |
//! | 0x0004         | Record Size            | 4 bytes: Size of this header plus the name                 |
//! | 0x0008         | File Count             | 4 bytes: Number of file entries that follow the name       |
//! | 0x000C         | Unused                 | 4 bytes                                                    |
//!
//! The name occupies `Record Size - 16` bytes. It is NUL terminated and may be padded with
//! additional NUL bytes, all of which are trimmed.
//!
//! ### File Entries
//!
//! Every section record is followed by `File Count` file entries:
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Kind                   | 4 bytes                                                    |
//! | 0x0004         | Entry Size             | 2 bytes: Size of this header plus the name                 |
//! | 0x0006         | Local Index            | 2 bytes: Index of the file inside the section file         |
//!
//! The name occupies `Entry Size - 8` bytes, with the same NUL rules as section names.
//!
//! ## Section Files
//!
//! A section file is uncompressed and is memory mapped when opened.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: 0x20030507                                        |
//! | 0x0004         | File Count             | 4 bytes: Number of entries in the file table               |
//! | 0x0008         | Data Pointer           | 4 bytes: Offset to the start of the payload                |
//! | 0x000C         | Unused                 | 4 bytes                                                    |
//!
//! The file table starts at `0x0010`, one 16 byte entry per local index:
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Offset                 | 4 bytes: Offset of the file data from the start of the file|
//! | 0x0004         | Id                     | 4 bytes                                                    |
//! | 0x0008         | Length                 | 4 bytes: Length of the file data                           |
//! | 0x000C         | Length (copy)          | 4 bytes: Duplicate of the length                           |
//!
//! ## Additional Information
//!
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Compression**: Only the master index is compressed (gzip)
//!

pub mod archive;
pub mod cache;
pub mod error;
pub mod mft;
pub mod resource;
pub mod stream;
pub mod subarc;
pub mod types;

pub use archive::{Archive, ArchiveOptions, FileSource};
pub use mft::MasterIndex;
pub use resource::{Header, Resource, SubHeader};
pub use subarc::SubArchive;
