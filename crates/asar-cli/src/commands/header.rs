use asar::prelude::*;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1";

/// This command prints the JSON header of an archive
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let archive_path = match args.value_of(key_names::ARCHIVE) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an input archive"),
		};

		let archive = Archive::open(archive_path)?;
		log::debug!("{}", archive);

		println!("{}", archive.header_json(args.is_present(key_names::PRETTY))?);
		Ok(())
	}
}
