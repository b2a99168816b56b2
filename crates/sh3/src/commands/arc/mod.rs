use sh3_arc::ArchiveOptions;

pub mod extract;
pub mod list;

#[derive(clap::Subcommand)]
pub enum ArcCommands {
    /// List the sections and files of the archive
    List(list::ListArgs),
    /// Extract every file of the archive into a directory
    Extract(extract::ExtractArgs),
}

impl ArcCommands {
    pub fn handle(&self, options: &ArchiveOptions) -> miette::Result<()> {
        match self {
            ArcCommands::List(list) => list.handle(options),
            ArcCommands::Extract(extract) => extract.handle(options),
        }
    }
}
