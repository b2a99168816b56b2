//! Error types that can be emitted from this library

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Classification of a read from a [`crate::stream::CompressedStream`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// Exactly the requested amount of bytes was read
    Success,
    /// No bytes could be read, the stream is exhausted
    EndOfFile,
    /// Some, but not all of the requested bytes were read
    PartialRead,
    /// The decompressor (or the OS below it) reported an error
    DecompressionError,
}

/// Error returned by reads from a compressed stream
#[derive(Error, Diagnostic, Debug)]
pub enum StreamError {
    /// end of file
    #[error("end of file")]
    EndOfFile,

    /// partial read of {read} out of {requested} bytes
    #[error("partial read of {read} out of {requested} bytes")]
    PartialRead { read: usize, requested: usize },

    /// gzip error: {0}
    #[error("gzip error: {0}")]
    Decompression(#[source] std::io::Error),

    /// the bytes read could not be decoded into the requested record
    #[error(transparent)]
    Layout(#[from] binrw::Error),
}

impl StreamError {
    /// Classify this error the same way a successful read would be classified
    pub fn result(&self) -> ReadResult {
        match self {
            StreamError::EndOfFile => ReadResult::EndOfFile,
            StreamError::PartialRead { .. } => ReadResult::PartialRead,
            StreamError::Decompression(_) | StreamError::Layout(_) => {
                ReadResult::DecompressionError
            }
        }
    }

    /// The OS error number behind a decompression failure, if there is one
    pub fn os_error(&self) -> Option<i32> {
        match self {
            StreamError::Decompression(e) => e.raw_os_error(),
            _ => None,
        }
    }
}

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// unable to open the master index
    #[error("unable to open master index {}", path.display())]
    #[diagnostic(
        code(sh3_arc::E00001),
        help("the master index is required, check the data directory")
    )]
    MasterIndexMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// error reading the master index header
    #[error("error reading master index header: {0}")]
    #[diagnostic(code(sh3_arc::E00002))]
    HeaderRead(#[source] StreamError),

    /// the master index does not start with the expected marker
    #[error("master index has an invalid file marker {found:#010x}")]
    #[diagnostic(code(sh3_arc::E00003))]
    InvalidMarker { found: u32 },

    /// error reading the archive descriptor
    #[error("invalid read of archive descriptor: {0}")]
    #[diagnostic(code(sh3_arc::E00004))]
    DescriptorRead(#[source] StreamError),

    /// a section record is too small to hold its header
    #[error("section record size {record_size} is smaller than its header ({header_size})")]
    #[diagnostic(code(sh3_arc::E00005))]
    SectionRecordTooSmall { record_size: u32, header_size: usize },

    /// error reading a section record
    #[error("invalid read of section record: {0}")]
    #[diagnostic(code(sh3_arc::E00006))]
    SectionRead(#[source] StreamError),

    /// a section name is not NUL terminated
    #[error("garbage read when reading section name (NUL terminator missing): {name}")]
    #[diagnostic(code(sh3_arc::E00007))]
    SectionNameUnterminated { name: String },

    /// a file name is not NUL terminated
    #[error("garbage read when reading file name in section {section} (NUL terminator missing): {name}")]
    #[diagnostic(code(sh3_arc::E00008))]
    FileNameUnterminated { section: String, name: String },

    /// error reading a file entry
    #[error("invalid read of file entry in section {section}: {source}")]
    #[diagnostic(code(sh3_arc::E00009))]
    FileEntryRead {
        section: String,
        #[source]
        source: StreamError,
    },

    /// a file entry is too small to hold its header
    #[error("file entry size {entry_size} in section {section} is smaller than its header ({header_size})")]
    #[diagnostic(code(sh3_arc::E00010))]
    FileEntryTooSmall {
        section: String,
        entry_size: u16,
        header_size: usize,
    },

    /// a section file does not start with the expected marker
    #[error("section file {} has incorrect header magic {found:#010x}", path.display())]
    #[diagnostic(code(sh3_arc::E00011))]
    InvalidSubArchive { path: PathBuf, found: u32 },

    /// a section file is too small to hold its header
    #[error("section file {} is truncated ({len} bytes)", path.display())]
    #[diagnostic(code(sh3_arc::E00012))]
    SubArchiveTruncated { path: PathBuf, len: usize },

    /// the file table entry for an index lies outside of the mapped section file
    #[error("file table entry {index} lies outside of {mapped} mapped bytes")]
    #[diagnostic(code(sh3_arc::E00013))]
    EntryOutOfRange { index: u16, mapped: usize },

    /// a file entry points outside of the mapped section file
    #[error("file {index} at offset {offset} with length {length} exceeds {mapped} mapped bytes")]
    #[diagnostic(code(sh3_arc::E00014))]
    EntryExceedsMapping {
        index: u16,
        offset: u32,
        length: u32,
        mapped: usize,
    },

    /// the insertion point is past the end of the destination buffer
    #[error("insertion point {insert} is past the end of a {len} byte buffer")]
    #[diagnostic(code(sh3_arc::E00015))]
    InsertOutOfRange { insert: usize, len: usize },

    /// a resource was loaded twice
    #[error("resource is already loaded")]
    #[diagnostic(code(sh3_arc::E00016))]
    AlreadyLoaded,

    /// a resource was accessed before being loaded
    #[error("resource is not loaded")]
    #[diagnostic(code(sh3_arc::E00017))]
    NotLoaded,

    /// a buffer is too small to contain its header
    #[error("buffer of {available} bytes cannot hold a {needed} byte header")]
    #[diagnostic(code(sh3_arc::E00018))]
    HeaderTruncated { needed: usize, available: usize },

    /// a header derived range lies outside of the resource buffer
    #[error("range at offset {offset} with size {size} exceeds the {available} byte resource")]
    #[diagnostic(code(sh3_arc::E00019))]
    RangeOutOfBounds {
        offset: usize,
        size: usize,
        available: usize,
    },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
