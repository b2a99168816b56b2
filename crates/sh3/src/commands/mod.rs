use sh3_arc::ArchiveOptions;

pub mod arc;
pub mod texture;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Inspect and extract arc archives
    Arc {
        #[command(subcommand)]
        command: arc::ArcCommands,
    },
    /// Decode textures
    Texture {
        #[command(subcommand)]
        command: texture::TextureCommands,
    },
}

impl Commands {
    pub fn handle(&self, options: &ArchiveOptions) -> miette::Result<()> {
        match self {
            Commands::Arc { command } => command.handle(options),
            Commands::Texture { command } => command.handle(options),
        }
    }
}
