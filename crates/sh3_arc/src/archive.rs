//! The complete archive: master index plus every section file
//!

use bon::Builder;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::{error::Result, mft::MasterIndex, subarc::SubArchive};

/// Something files can be loaded from by name
pub trait FileSource {
    /// Append the contents of the file `name` to `buffer`
    ///
    /// Returns the number of bytes appended, or `None` if no such file exists.
    fn load_file(&self, name: &str, buffer: &mut Vec<u8>) -> Result<Option<usize>>;
}

impl<T: FileSource + ?Sized> FileSource for &T {
    fn load_file(&self, name: &str, buffer: &mut Vec<u8>) -> Result<Option<usize>> {
        (**self).load_file(name, buffer)
    }
}

/// Where the archive lives on disk
#[derive(Debug, Clone, Builder)]
pub struct ArchiveOptions {
    /// Directory holding the master index and the section files
    #[builder(into, default = PathBuf::from("data"))]
    pub data_dir: PathBuf,

    /// File name of the master index inside the data directory
    #[builder(into, default = String::from("arc.arc"))]
    pub master_index: String,

    /// Extension of the section files
    #[builder(into, default = String::from("arc"))]
    pub section_extension: String,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ArchiveOptions {
    /// Full path of the master index
    pub fn master_index_path(&self) -> PathBuf {
        self.data_dir.join(&self.master_index)
    }

    /// Full path of the file backing a section
    pub fn section_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", name, self.section_extension))
    }
}

/// Every section of an archive, opened through its master index
///
/// ```no_run
/// use sh3_arc::{Archive, ArchiveOptions, FileSource};
///
/// fn load(name: &str) -> sh3_arc::error::Result<Option<Vec<u8>>> {
///     let archive = Archive::open(ArchiveOptions::builder().data_dir("/games/sh3/data").build())?;
///
///     let mut buffer = Vec::new();
///     Ok(archive.load_file(name, &mut buffer)?.map(|_| buffer))
/// }
/// ```
#[derive(Debug)]
pub struct Archive {
    options: ArchiveOptions,
    sections: Vec<SubArchive>,
}

impl Archive {
    /// Load the master index and map every section it lists
    ///
    /// A missing or corrupt master index is an error. Section files that fail to open are logged
    /// and behave as empty.
    #[instrument(skip_all, fields(data_dir = %options.data_dir.display()), err)]
    pub fn open(options: ArchiveOptions) -> Result<Archive> {
        let mft = MasterIndex::open(options.master_index_path())?;

        let sections = mft
            .into_sections()
            .into_iter()
            .map(|section| {
                SubArchive::open(
                    options.section_path(&section.name),
                    section.name,
                    section.files,
                )
            })
            .collect::<Vec<_>>();

        let open = sections.iter().filter(|s| s.is_open()).count();
        if open < sections.len() {
            warn!(open, total = sections.len(), "not every section file could be opened");
        }
        info!(sections = sections.len(), "opened archive");

        Ok(Archive { options, sections })
    }

    /// Options this archive was opened with
    pub fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Directory holding the archive
    pub fn data_dir(&self) -> &Path {
        &self.options.data_dir
    }

    /// All sections in master index order
    pub fn sections(&self) -> &[SubArchive] {
        &self.sections
    }

    /// Find a section by name
    pub fn section(&self, name: &str) -> Option<&SubArchive> {
        self.sections.iter().find(|s| s.name() == name)
    }

    /// Find a section by name for reopening
    pub fn section_mut(&mut self, name: &str) -> Option<&mut SubArchive> {
        self.sections.iter_mut().find(|s| s.name() == name)
    }

    /// Returns an iterator over every file name in every section
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|s| s.files().iter().map(|(name, _)| name))
    }
}

impl FileSource for Archive {
    /// Search the sections in master index order, the first one holding `name` wins
    fn load_file(&self, name: &str, buffer: &mut Vec<u8>) -> Result<Option<usize>> {
        for section in &self.sections {
            if let Some(length) = section.load_file(name, buffer)? {
                return Ok(Some(length));
            }
        }
        Ok(None)
    }
}
