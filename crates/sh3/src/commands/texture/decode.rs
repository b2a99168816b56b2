use clap::Args;
use miette::Result;
use sh3_arc::{Archive, ArchiveOptions};
use sh3_texture::{DecoderOptions, TextureDecoder};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct DecodeArgs {
    /// Name of the texture in the archive
    #[arg(short, long)]
    name: String,

    /// Where to write the decoded texture
    #[arg(short, long, value_name = "FILE", default_value = "output.tga")]
    output: PathBuf,
}

impl DecodeArgs {
    pub fn handle(&self, options: &ArchiveOptions) -> Result<()> {
        let archive = Archive::open(options.clone())?;
        let decoder = TextureDecoder::new(
            DecoderOptions::builder()
                .dump_path(self.output.clone())
                .build(),
        );

        let texture = decoder.decode(&archive, &self.name)?;
        info!(
            "decoded {} ({}x{}, {:?}) to {}",
            self.name,
            texture.width,
            texture.height,
            texture.format,
            self.output.display()
        );
        Ok(())
    }
}
