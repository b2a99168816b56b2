use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use sh3_arc::{Archive, ArchiveOptions};
use std::{
    fs::File,
    io::Write,
    path::{Component, Path, PathBuf},
};
use tracing::{info, warn};

#[derive(Args)]
pub struct ExtractArgs {
    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

/// Whether a file name stays inside the directory it is joined to
fn is_contained(name: &Path) -> bool {
    name.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

impl ExtractArgs {
    pub fn handle(&self, options: &ArchiveOptions) -> Result<()> {
        let archive = Archive::open(options.clone())?;

        let mut buffer = Vec::new();
        for section in archive.sections().iter().filter(|s| s.is_open()) {
            let target = self.directory.join(section.name());

            for (name, index) in section.files().iter() {
                if !is_contained(Path::new(name)) {
                    warn!(section = section.name(), name, "skipping file outside of the target");
                    continue;
                }

                buffer.clear();
                if section.load_index(index, &mut buffer)?.is_none() {
                    continue;
                }

                let p = target.join(name);
                info!("writing {}", p.display());

                if let Some(parent) = p.parent() {
                    std::fs::create_dir_all(parent)
                        .into_diagnostic()
                        .context(format!("creating {}", parent.display()))?;
                }
                let mut out = if !self.overwrite {
                    File::create_new(&p)
                        .into_diagnostic()
                        .context(format!("creating {}", &p.display()))?
                } else {
                    File::create(&p)
                        .into_diagnostic()
                        .context(format!("creating {}", &p.display()))?
                };

                out.write_all(&buffer).into_diagnostic()?;
            }
        }
        Ok(())
    }
}
