use sh3_arc::ArchiveOptions;

pub mod decode;

#[derive(clap::Subcommand)]
pub enum TextureCommands {
    /// Decode a texture into a TGA file
    Decode(decode::DecodeArgs),
}

impl TextureCommands {
    pub fn handle(&self, options: &ArchiveOptions) -> miette::Result<()> {
        match self {
            TextureCommands::Decode(decode) => decode.handle(options),
        }
    }
}
