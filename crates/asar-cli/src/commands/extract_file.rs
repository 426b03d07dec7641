use std::{
	fs,
	io::{self, Write},
};

use asar::prelude::*;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1";

/// This command writes a single file from an archive to stdout, or to the given output file
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let archive_path = match args.value_of(key_names::ARCHIVE) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an input archive"),
		};

		let entry = match args.value_of(key_names::ENTRY) {
			Some(entry) => entry,
			None => anyhow::bail!("Please provide the path of a file within the archive"),
		};

		let mut archive = Archive::open(archive_path)?;
		let data = archive.read_file(entry)?;

		match args.value_of(key_names::OUTPUT) {
			Some(output) => {
				fs::write(output, &data)?;
				log::info!("Wrote {} bytes from {} to {}", data.len(), entry, output);
			},
			None => {
				let mut stdout = io::stdout().lock();
				stdout.write_all(&data)?;
				stdout.flush()?;
			},
		}

		Ok(())
	}
}
