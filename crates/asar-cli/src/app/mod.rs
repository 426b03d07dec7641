use std::collections::HashMap;
use clap::{Command, Arg};

use crate::keys::key_names;
use crate::commands;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

pub fn build_app<'a>(key_map: HashMap<&'static str, Arg<'a>>) -> Command<'a> {
	Command::new("asar")
		.author(self::AUTHORS)
		.about("A command-line interface for packing, inspecting and extracting asar archives")
		.version(self::VERSION)
		.subcommand_required(true)
		.arg_required_else_help(true)
		.arg(key_map.get(key_names::VERBOSE).unwrap())
		.subcommand(
			Command::new("pack")
				.author(AUTHORS)
				.version(commands::pack::VERSION)
				.about("Packs a directory into an archive")
				// Files
				.arg(key_map.get(key_names::SOURCE).unwrap())
				.arg(key_map.get(key_names::TARGET).unwrap())
				// Modifiers
				.arg(key_map.get(key_names::UNPACK).unwrap()),
		)
		.subcommand(
			Command::new("list")
				.author(AUTHORS)
				.version(commands::list::VERSION)
				.about("Lists every path in an archive")
				.arg(key_map.get(key_names::ARCHIVE).unwrap())
				.arg(key_map.get(key_names::TABLE).unwrap()),
		)
		.subcommand(
			Command::new("extract")
				.author(AUTHORS)
				.version(commands::extract::VERSION)
				.about("Extracts an archive, or a single path from it, into a directory")
				.arg(key_map.get(key_names::ARCHIVE).unwrap())
				.arg(key_map.get(key_names::DEST).unwrap())
				.arg(key_map.get(key_names::PATH).unwrap()),
		)
		.subcommand(
			Command::new("extract-file")
				.author(AUTHORS)
				.version(commands::extract_file::VERSION)
				.about("Writes the contents of a single file in an archive to stdout, or to a file")
				.arg(key_map.get(key_names::ARCHIVE).unwrap())
				.arg(key_map.get(key_names::ENTRY).unwrap())
				.arg(key_map.get(key_names::OUTPUT).unwrap()),
		)
		.subcommand(
			Command::new("header")
				.author(AUTHORS)
				.version(commands::header::VERSION)
				.about("Prints the JSON header of an archive")
				.arg(key_map.get(key_names::ARCHIVE).unwrap())
				.arg(key_map.get(key_names::PRETTY).unwrap()),
		)
}
