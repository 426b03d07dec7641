use clap::Arg;
use std::collections::HashMap;

pub mod key_names {
	pub(crate) const VERBOSE: &str = "VERBOSE";

	pub(crate) const SOURCE: &str = "SOURCE";
	pub(crate) const TARGET: &str = "TARGET";
	pub(crate) const ARCHIVE: &str = "ARCHIVE";
	pub(crate) const DEST: &str = "DEST";
	pub(crate) const ENTRY: &str = "ENTRY";

	pub(crate) const PATH: &str = "PATH";
	pub(crate) const OUTPUT: &str = "OUTPUT";
	pub(crate) const UNPACK: &str = "UNPACK";

	pub(crate) const TABLE: &str = "TABLE";
	pub(crate) const PRETTY: &str = "PRETTY";
}

pub fn build_keys<'a>() -> HashMap<&'static str, Arg<'a>> {
	/* please only use this function once during the lifecycle of the program */
	let mut map = HashMap::with_capacity(12);

	/* The various keys usable in the CLI */
	// Raise the log level to debug
	map.insert(
		key_names::VERBOSE,
		Arg::new(key_names::VERBOSE)
			.short('v')
			.long("verbose")
			.help("Print debug output, overrides RUST_LOG")
			.global(true)
			.required(false)
			.takes_value(false),
	);

	// The directory to be packed
	map.insert(
		key_names::SOURCE,
		Arg::new(key_names::SOURCE)
			.value_name("DIR")
			.help("The directory to pack")
			.index(1)
			.required(true)
			.takes_value(true),
	);

	// Where the packed archive is written
	map.insert(
		key_names::TARGET,
		Arg::new(key_names::TARGET)
			.value_name(key_names::OUTPUT)
			.help("Where to write the archive, unpacked files land in <OUTPUT>.unpacked")
			.index(2)
			.required(true)
			.takes_value(true),
	);

	// An archive to be read
	map.insert(
		key_names::ARCHIVE,
		Arg::new(key_names::ARCHIVE)
			.value_name(key_names::ARCHIVE)
			.help("Path to the archive")
			.index(1)
			.required(true)
			.takes_value(true),
	);

	// The directory to extract into
	map.insert(
		key_names::DEST,
		Arg::new(key_names::DEST)
			.value_name(key_names::DEST)
			.help("The directory to extract into, created if missing")
			.index(2)
			.required(true)
			.takes_value(true),
	);

	// A single file inside the archive
	map.insert(
		key_names::ENTRY,
		Arg::new(key_names::ENTRY)
			.value_name(key_names::PATH)
			.help("Path of the file inside the archive")
			.index(2)
			.required(true)
			.takes_value(true),
	);

	// Limits extraction to a single path
	map.insert(
		key_names::PATH,
		Arg::new(key_names::PATH)
			.short('p')
			.long("path")
			.value_name(key_names::PATH)
			.help("Only extract this path from the archive, it lands as <DEST>/<basename of PATH>")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// A general output target
	map.insert(
		key_names::OUTPUT,
		Arg::new(key_names::OUTPUT)
			.short('o')
			.long("output")
			.value_name("FILE")
			.help("Write to this file instead of stdout")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// Files matching this pattern are left out of the archive
	map.insert(
		key_names::UNPACK,
		Arg::new(key_names::UNPACK)
			.short('u')
			.long("unpack")
			.value_name("REGEX")
			.help("Leave files whose path, relative to <DIR>, fully matches this regex out of the archive")
			.required(false)
			.takes_value(true)
			.number_of_values(1),
	);

	// Tabulated listing
	map.insert(
		key_names::TABLE,
		Arg::new(key_names::TABLE)
			.short('t')
			.long("table")
			.help("Print a table of every entry and its metadata, instead of plain paths")
			.required(false)
			.takes_value(false),
	);

	// Indent the header
	map.insert(
		key_names::PRETTY,
		Arg::new(key_names::PRETTY)
			.long("pretty")
			.help("Pretty-print the header")
			.required(false)
			.takes_value(false),
	);

	map
}
