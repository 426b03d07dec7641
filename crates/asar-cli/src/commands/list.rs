use tabled::{
	Table, Tabled,
	settings::{*, object::Columns},
};
use asar::prelude::*;
use indicatif::HumanBytes;

use super::CommandTrait;
use crate::keys::key_names;

pub const VERSION: &str = "0.1";

/// This command lists every path in an archive, optionally in tabulated form
pub struct Evaluator;

impl CommandTrait for Evaluator {
	fn evaluate(&self, args: &clap::ArgMatches) -> anyhow::Result<()> {
		let archive_path = match args.value_of(key_names::ARCHIVE) {
			Some(path) => path,
			None => anyhow::bail!("Please provide an input archive"),
		};

		let archive = Archive::open(archive_path)?;
		let paths = archive.list();

		if !args.is_present(key_names::TABLE) {
			for path in paths {
				println!("/{}", path);
			}

			return Ok(());
		}

		// log basic metadata
		println!("{}", archive);

		let table_entries: Vec<EntryTableRow> = paths
			.iter()
			.filter_map(|path| archive.get_node(path).map(|node| EntryTableRow::new(path, node)))
			.collect();

		let mut table = Table::new(table_entries);
		table
			.with(Style::rounded())
			.with(Modify::list(Columns::new(..1), Alignment::left()));

		println!("{}", table);

		Ok(())
	}
}

#[derive(Tabled)]
struct EntryTableRow {
	path: String,
	kind: &'static str,
	size: String,
	offset: String,
	flags: String,
}

impl EntryTableRow {
	fn new(path: &str, node: &Node) -> EntryTableRow {
		let path = format!("/{}", path);

		match node {
			Node::Directory(dir) => EntryTableRow {
				path,
				kind: "directory",
				size: format!("{} entries", dir.files.len()),
				offset: "-".to_string(),
				flags: String::new(),
			},
			Node::Link(link) => EntryTableRow {
				path,
				kind: "link",
				size: "-".to_string(),
				offset: "-".to_string(),
				flags: format!("-> /{}", link.link),
			},
			Node::File(file) => {
				let mut flags = vec![];
				if file.unpacked {
					flags.push("unpacked");
				}
				if file.executable {
					flags.push("executable");
				}

				EntryTableRow {
					path,
					kind: "file",
					size: HumanBytes(file.size as u64).to_string(),
					offset: file.offset.map(|o| o.to_string()).unwrap_or_else(|| "-".to_string()),
					flags: flags.join(", "),
				}
			},
		}
	}
}
