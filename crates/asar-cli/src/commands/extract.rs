use std::{fs, path::Path, time::Instant};

use asar::prelude::*;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1";

/// This command extracts an archive, or a single path within it, into the specified directory
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let archive_path = match args.value_of(key_names::ARCHIVE) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an input archive"),
		};

		let dest = match args.value_of(key_names::DEST) {
			Some(path) => Path::new(path),
			None => anyhow::bail!("Please provide a destination directory"),
		};

		if dest.is_file() {
			anyhow::bail!("{} is a file, please provide a directory to extract into", dest.display())
		};

		let mut archive = Archive::open(archive_path)?;
		let path = args.value_of(key_names::PATH).unwrap_or("/");

		if !archive.exists(path) {
			anyhow::bail!("{} does not exist in {}", path, archive_path)
		}

		// For measuring the time difference
		let time = Instant::now();
		fs::create_dir_all(dest)?;

		let spinner = super::spinner(format!("Extracting {} from {}", path, archive_path))?;
		let result = archive.extract(path, dest);

		match result {
			Ok(()) => spinner.finish_and_clear(),
			Err(err) => {
				spinner.abandon();
				return Err(err.into());
			},
		}

		log::info!(
			"Extracted {} from {} into {} in {:?}",
			path,
			archive_path,
			dest.display(),
			time.elapsed()
		);

		archive.close();
		Ok(())
	}
}
