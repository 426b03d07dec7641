use std::{path::Path, time::Instant};

use asar::prelude::*;
use indicatif::HumanBytes;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1";

/// This command packs a directory into an archive
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let source = match args.value_of(key_names::SOURCE) {
			Some(path) => Path::new(path),
			None => anyhow::bail!("Please provide a directory to pack"),
		};

		let target = match args.value_of(key_names::TARGET) {
			Some(path) => Path::new(path),
			None => anyhow::bail!("Please provide an output path for the archive"),
		};

		if !source.is_dir() {
			anyhow::bail!("{} is not a directory", source.display())
		};

		let mut config = PackConfig::default();
		if let Some(pattern) = args.value_of(key_names::UNPACK) {
			config = config.unpack(pattern)?;
			log::debug!("Leaving paths matching {} unpacked", pattern);
		}

		// For measuring the time difference
		let time = Instant::now();
		let spinner = super::spinner(format!("Packing {}", source.display()))?;

		let bytes_written = match pack(source, target, &config) {
			Ok(bytes) => bytes,
			Err(err) => {
				spinner.abandon();
				return Err(err.into());
			},
		};

		spinner.finish_and_clear();
		log::info!(
			"Packed {} into {} ({}) in {:?}",
			source.display(),
			target.display(),
			HumanBytes(bytes_written),
			time.elapsed()
		);

		Ok(())
	}
}
