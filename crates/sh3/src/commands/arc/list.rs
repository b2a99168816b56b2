use clap::Args;
use itertools::Itertools;
use miette::{miette, Result};
use owo_colors::{OwoColorize, Stream::Stdout};
use sh3_arc::{Archive, ArchiveOptions, SubArchive};

#[derive(Args)]
pub struct ListArgs {
    /// Only list the files of this section
    #[arg(short, long, value_name = "NAME")]
    section: Option<String>,
}

impl ListArgs {
    pub fn handle(&self, options: &ArchiveOptions) -> Result<()> {
        let archive = Archive::open(options.clone())?;

        match &self.section {
            Some(name) => {
                let section = archive
                    .section(name)
                    .ok_or_else(|| miette!("no section named {name} in the master index"))?;
                print_section(section);
            }
            None => archive.sections().iter().for_each(print_section),
        }
        Ok(())
    }
}

fn print_section(section: &SubArchive) {
    let state = if section.is_open() { "open" } else { "missing" };
    println!(
        "{} ({} files, {})",
        section.name().if_supports_color(Stdout, |t| t.bold()),
        section.files().len(),
        state
    );

    for (name, index) in section.files().iter().sorted_by_key(|(_, index)| *index) {
        println!("  {index:>5} {name}");
    }
}
