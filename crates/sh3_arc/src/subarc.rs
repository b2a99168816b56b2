//! Random access into memory mapped section files
//!

use binrw::BinRead;
use memmap2::Mmap;
use std::{
    fmt::{self, Debug},
    fs::File,
    io::Cursor,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

use crate::{
    archive::FileSource,
    error::{Error, Result},
    mft::FileTable,
    types::{Record, SubArcEntry, SubArcHeader, SUBARC_MAGIC},
};

/// A single section file of the archive
///
/// The section file is memory mapped read-only and the file table is decoded straight from the
/// mapping. A section that fails to open stays usable as a value: every lookup on it reports the
/// file as not found.
///
/// ```no_run
/// use sh3_arc::{mft::FileTable, SubArchive};
///
/// fn read_first(files: FileTable) -> sh3_arc::error::Result<Vec<u8>> {
///     let subarc = SubArchive::open("data/pic.arc", "pic", files);
///
///     let mut buffer = Vec::new();
///     subarc.load_index(0, &mut buffer)?;
///     Ok(buffer)
/// }
/// ```
pub struct SubArchive {
    name: Box<str>,
    path: PathBuf,
    map: Option<Mmap>,
    files: FileTable,
}

impl Debug for SubArchive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SubArchive")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("mapped", &self.map.as_ref().map(|m| m.len()))
            .field("files", &self.files)
            .finish()
    }
}

impl SubArchive {
    /// Create a section and try to map its file
    ///
    /// Failing to open or validate the file is logged, the section is still returned.
    pub fn open(path: impl Into<PathBuf>, name: impl Into<Box<str>>, files: FileTable) -> Self {
        let mut subarc = SubArchive {
            name: name.into(),
            path: path.into(),
            map: None,
            files,
        };
        if let Err(e) = subarc.reopen() {
            warn!(path = %subarc.path.display(), "failed to open section file: {e}");
        }
        subarc
    }

    /// Map the section file again and validate its header
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn reopen(&mut self) -> Result<()> {
        self.map = None;

        let file = File::open(&self.path)?;
        // SAFETY: the mapping is read-only and section files are not modified while the game runs
        let map = unsafe { Mmap::map(&file)? };

        if map.len() < SubArcHeader::SIZE {
            return Err(Error::SubArchiveTruncated {
                path: self.path.clone(),
                len: map.len(),
            });
        }

        let header = SubArcHeader::read(&mut Cursor::new(&map[..SubArcHeader::SIZE]))?;
        if header.magic != SUBARC_MAGIC {
            return Err(Error::InvalidSubArchive {
                path: self.path.clone(),
                found: header.magic,
            });
        }

        debug!(files = header.file_count, size = map.len(), "mapped section file");
        self.map = Some(map);
        Ok(())
    }

    /// Whether the section file is mapped and valid
    pub fn is_open(&self) -> bool {
        self.map.is_some()
    }

    /// Name of the section
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the section file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name lookup table of the section
    pub fn files(&self) -> &FileTable {
        &self.files
    }

    /// Number of entries the section file header claims, zero if it is not open
    pub fn len(&self) -> usize {
        self.map.as_ref().map_or(0, |map| {
            SubArcHeader::read(&mut Cursor::new(&map[..SubArcHeader::SIZE]))
                .map_or(0, |h| h.file_count as usize)
        })
    }

    /// Whether the section file holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the index of a file by name, if it's present.
    pub fn index_for_name(&self, name: &str) -> Option<u16> {
        self.files.get(name)
    }

    /// Read the file table entry for an index straight from the mapping
    ///
    /// Returns `Ok(None)` if the section is not open.
    pub fn entry(&self, index: u16) -> Result<Option<SubArcEntry>> {
        let Some(map) = &self.map else {
            return Ok(None);
        };

        let start = SubArcHeader::SIZE + index as usize * SubArcEntry::SIZE;
        let end = start + SubArcEntry::SIZE;
        if map.len() < end {
            return Err(Error::EntryOutOfRange {
                index,
                mapped: map.len(),
            });
        }

        let entry = SubArcEntry::from_bytes(&map[start..end]);
        if entry.end() > map.len() as u64 {
            return Err(Error::EntryExceedsMapping {
                index,
                offset: entry.offset,
                length: entry.length,
                mapped: map.len(),
            });
        }
        if entry.length != entry.length2 {
            warn!(index, length = entry.length, length2 = entry.length2, "file entry lengths differ");
        }

        Ok(Some(entry))
    }

    /// Append a file, found by name, to `buffer`
    ///
    /// Returns the number of bytes copied, or `None` if the file is not part of this section.
    pub fn load_file(&self, name: &str, buffer: &mut Vec<u8>) -> Result<Option<usize>> {
        let mut insert = buffer.len();
        self.load_file_at(name, buffer, &mut insert)
    }

    /// Copy a file, found by name, into `buffer` at `insert`
    ///
    /// The buffer grows if the space after `insert` is too small and `insert` is moved past the
    /// copied bytes.
    pub fn load_file_at(
        &self,
        name: &str,
        buffer: &mut Vec<u8>,
        insert: &mut usize,
    ) -> Result<Option<usize>> {
        let Some(index) = self.files.get(name) else {
            return Ok(None);
        };
        self.load_index_at(index, buffer, insert)
    }

    /// Append a file, found by its index, to `buffer`
    pub fn load_index(&self, index: u16, buffer: &mut Vec<u8>) -> Result<Option<usize>> {
        let mut insert = buffer.len();
        self.load_index_at(index, buffer, &mut insert)
    }

    /// Copy a file, found by its index, into `buffer` at `insert`
    #[instrument(skip(self, buffer, insert), fields(section = %self.name), err)]
    pub fn load_index_at(
        &self,
        index: u16,
        buffer: &mut Vec<u8>,
        insert: &mut usize,
    ) -> Result<Option<usize>> {
        let (Some(map), Some(entry)) = (&self.map, self.entry(index)?) else {
            return Ok(None);
        };

        if *insert > buffer.len() {
            return Err(Error::InsertOutOfRange {
                insert: *insert,
                len: buffer.len(),
            });
        }

        let length = entry.length as usize;
        let space = buffer.len() - *insert;
        if space < length {
            buffer.resize(buffer.len() + (length - space), 0);
        }

        let data = &map[entry.offset as usize..entry.end() as usize];
        buffer[*insert..*insert + length].copy_from_slice(data);
        *insert += length;

        Ok(Some(length))
    }
}

impl FileSource for SubArchive {
    fn load_file(&self, name: &str, buffer: &mut Vec<u8>) -> Result<Option<usize>> {
        SubArchive::load_file(self, name, buffer)
    }
}
