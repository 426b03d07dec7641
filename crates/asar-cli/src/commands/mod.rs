use std::collections::HashMap;

use clap::ArgMatches;
use anyhow::Result;

// A common spinner style for all commands
const SPINNER_STYLE: &str = "{spinner:.green} [{elapsed_precise}] {msg}";
const SPINNER_TICKS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

// Trait that must be implemented by all subcommands
pub trait CommandTrait: Sync {
	fn evaluate(&self, args: &ArgMatches) -> Result<()>;
}

// All sub-commands are defined in the below modules
pub mod extract;
pub mod extract_file;
pub mod header;
pub mod list;
pub mod pack;

pub fn build_commands() -> HashMap<&'static str, Box<dyn CommandTrait>> {
	let mut map: HashMap<&'static str, Box<dyn CommandTrait>> = HashMap::new();

	map.insert("pack", Box::new(pack::Evaluator));
	map.insert("list", Box::new(list::Evaluator));
	map.insert("extract", Box::new(extract::Evaluator));
	map.insert("extract-file", Box::new(extract_file::Evaluator));
	map.insert("header", Box::new(header::Evaluator));

	map
}

pub(crate) fn spinner(message: String) -> Result<indicatif::ProgressBar> {
	let spinner = indicatif::ProgressBar::new_spinner();
	spinner.set_style(
		indicatif::ProgressStyle::default_spinner()
			.template(SPINNER_STYLE)?
			.tick_chars(SPINNER_TICKS),
	);

	spinner.enable_steady_tick(std::time::Duration::from_millis(80));
	spinner.set_message(message);

	Ok(spinner)
}
