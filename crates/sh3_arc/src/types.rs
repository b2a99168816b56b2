//! Base types for structure of the master index and section files.

use binrw::BinRead;
use byteorder::{ByteOrder, LittleEndian};

/// Magic number at the start of the decompressed master index
pub const ARC_MAGIC: u32 = 0x2003_0417;

/// Magic number at the start of every section file
pub const SUBARC_MAGIC: u32 = 0x2003_0507;

/// A record with a fixed size on disk
pub trait Record: for<'a> BinRead<Args<'a> = ()> {
    /// Number of bytes the record occupies
    const SIZE: usize;
}

/// Master index header
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct ArcHeader {
    /// Should always be [`ARC_MAGIC`]
    pub magic: u32,

    #[allow(dead_code)]
    pub unused: u32,

    pub kind: u32,

    /// Size of this header
    pub header_size: u32,
}

impl Record for ArcHeader {
    const SIZE: usize = 16;
}

/// Describes the archive as a whole, follows [`ArcHeader`]
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct ArcDescriptor {
    pub kind: u32,

    /// Size of this descriptor
    pub header_size: u32,

    /// The number of section records following the descriptor
    pub section_count: u32,

    #[allow(dead_code)]
    pub unused: u32,
}

impl Record for ArcDescriptor {
    const SIZE: usize = 16;
}

/// Header of a section record in the master index
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct SectionHeader {
    pub kind: u32,

    /// Size of this header plus the section name following it
    pub record_size: u32,

    /// The number of file entries following the section name
    pub file_count: u32,

    #[allow(dead_code)]
    pub unused: u32,
}

impl Record for SectionHeader {
    const SIZE: usize = 16;
}

/// Header of a file entry in the master index
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct FileEntryHeader {
    pub kind: u32,

    /// Size of this header plus the file name following it
    pub entry_size: u16,

    /// Index of the file inside the section file
    pub arc_index: u16,
}

impl Record for FileEntryHeader {
    const SIZE: usize = 8;
}

/// Section file header
#[derive(BinRead, Debug, Default, Copy, Clone, PartialEq)]
#[br(little)]
pub struct SubArcHeader {
    /// Should always be [`SUBARC_MAGIC`]
    pub magic: u32,

    /// The number of entries in the file table
    pub file_count: u32,

    /// Offset to the beginning of the payload
    pub data_pointer: u32,

    #[allow(dead_code)]
    pub unused: u32,
}

impl Record for SubArcHeader {
    const SIZE: usize = 16;
}

/// Section file table entry
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SubArcEntry {
    /// Offset of the file data from the start of the section file
    pub offset: u32,

    pub id: u32,

    /// Length of the file data
    pub length: u32,

    /// Always a copy of `length`
    pub length2: u32,
}

impl SubArcEntry {
    pub const SIZE: usize = 16;

    /// Decode an entry from the start of `bytes`, which must hold at least [`SubArcEntry::SIZE`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            offset: LittleEndian::read_u32(&bytes[0..4]),
            id: LittleEndian::read_u32(&bytes[4..8]),
            length: LittleEndian::read_u32(&bytes[8..12]),
            length2: LittleEndian::read_u32(&bytes[12..16]),
        }
    }

    /// The end of the file data, relative to the start of the section file
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }
}
