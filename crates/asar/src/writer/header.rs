use std::{
	fs,
	path::{Path, PathBuf},
};

use log::trace;
use walkdir::WalkDir;

use super::config::PackConfig;
use crate::global::{
	error::*,
	tree::{Directory, Entries, FileEntry, Link, Node, PathTree},
};
use crate::utils;

/// A non-directory entry found while walking the source, consumed in order when writing the data section
#[derive(Debug, Clone)]
pub(crate) struct FileInfo {
	/// Absolute path to the file
	pub(crate) path: PathBuf,
	pub(crate) size: u64,
	pub(crate) unpacked: bool,
	pub(crate) symlink: bool,
}

/// Walks a directory and assembles the [`PathTree`] describing it, assigning data section offsets as it goes
pub(crate) struct HeaderBuilder<'a> {
	root: PathBuf,
	config: &'a PackConfig,
	offset: u64,
	files: Vec<FileInfo>,
}

impl<'a> HeaderBuilder<'a> {
	pub(crate) fn new(root: &Path, config: &'a PackConfig) -> InternalResult<HeaderBuilder<'a>> {
		let root = fs::canonicalize(root).map_err(|err| InternalError::file(root, err))?;

		Ok(HeaderBuilder {
			root,
			config,
			offset: 0,
			files: Vec::new(),
		})
	}

	/// Consumes the builder, returning the tree, the files in traversal order and the size of the data section
	pub(crate) fn build(mut self) -> InternalResult<(PathTree, Vec<FileInfo>, u64)> {
		let root = self.root.clone();
		let entries = self.walk(&root)?;

		Ok((PathTree::from_entries(entries), self.files, self.offset))
	}

	fn walk(&mut self, dir: &Path) -> InternalResult<Entries> {
		let mut entries = Entries::new();

		let listing = WalkDir::new(dir)
			.min_depth(1)
			.max_depth(1)
			.follow_links(false)
			.sort_by_file_name();

		for entry in listing {
			let entry = entry.map_err(|err| InternalError::file(dir, err.into()))?;
			let path = entry.path();
			let name = entry.file_name().to_string_lossy().into_owned();

			let node = if entry.file_type().is_dir() {
				Node::Directory(Directory { files: self.walk(path)? })
			} else if entry.file_type().is_symlink() {
				self.symlink(path)?
			} else {
				let metadata = entry.metadata().map_err(|err| InternalError::file(path, err.into()))?;
				self.file(path, &metadata)?
			};

			trace!("Indexed {} as {:?}", path.display(), node);

			if entries.insert(&name, node).is_err() {
				return Err(InternalError::InvalidPath(format!("Existing path: {}", path.display())));
			}
		}

		Ok(entries)
	}

	fn symlink(&mut self, path: &Path) -> InternalResult<Node> {
		let resolved = fs::canonicalize(path).map_err(|err| InternalError::file(path, err))?;

		let link = match resolved.strip_prefix(&self.root) {
			Ok(relative) if relative.as_os_str().is_empty() => {
				return Err(InternalError::InvalidPath(format!(
					"{}: file links to the package root",
					path.display()
				)))
			},
			Ok(relative) => utils::to_slash(relative),
			Err(_) => {
				return Err(InternalError::InvalidPath(format!(
					"{}: file links out of the package",
					resolved.display()
				)))
			},
		};

		self.files.push(FileInfo {
			path: path.to_path_buf(),
			size: 0,
			unpacked: false,
			symlink: true,
		});

		Ok(Node::Link(Link { link }))
	}

	fn file(&mut self, path: &Path, metadata: &fs::Metadata) -> InternalResult<Node> {
		if metadata.len() > crate::MAX_FILE_SIZE {
			return Err(InternalError::InvalidPath(format!(
				"{}: file of {} bytes is too large to pack",
				path.display(),
				metadata.len()
			)));
		}

		let size = metadata.len() as u32;

		let relative = path.strip_prefix(&self.root).map(utils::to_slash).unwrap_or_default();
		let unpacked = self.config.unpack_matches(&format!("/{}", relative));

		let offset = if unpacked {
			None
		} else {
			let offset = self.offset;
			self.offset += size as u64;
			Some(offset)
		};

		self.files.push(FileInfo {
			path: path.to_path_buf(),
			size: size as u64,
			unpacked,
			symlink: false,
		});

		Ok(Node::File(FileEntry {
			size,
			offset,
			unpacked,
			executable: utils::is_executable(path, metadata),
		}))
	}
}
