use std::{
	env, fmt,
	fs::{self, File},
	io::{self, BufWriter, Seek, SeekFrom, Write},
	path::{Path, PathBuf},
};

use log::{debug, trace, warn};
use tempfile::TempDir;

use crate::global::{
	error::*,
	record,
	tree::{normalize_path, split_path, FileEntry, Node, PathTree},
};
use crate::utils;

/// How many symlinks may be chained before extraction gives up
const MAX_LINK_HOPS: usize = 40;

/// An open archive: the parsed header tree, plus a read handle into the archive file.
/// Reads seek the single underlying handle, so they take `&mut self`; open another [`Archive`] for parallel reads.
#[derive(Debug)]
pub struct Archive {
	handle: Option<File>,
	src: PathBuf,
	header_size: u32,
	file_size: u64,
	tree: PathTree,

	temp_path: PathBuf,
	temp: Option<TempDir>,
}

impl fmt::Display for Archive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let entries = self.tree.walk().len();

		write!(
			f,
			"[Archive] Source: {}, Header: {}B, Size: {}B, Members: {}",
			self.src.display(),
			self.header_size,
			self.file_size,
			entries,
		)
	}
}

impl Archive {
	/// Opens and parses the archive at `path`, its temporary directory is created in the system temp directory
	pub fn open(path: impl AsRef<Path>) -> InternalResult<Archive> {
		Archive::open_with_temp_root(path, env::temp_dir())
	}

	/// Opens and parses the archive at `path`, creating its temporary directory inside `temp_root`
	pub fn open_with_temp_root(path: impl AsRef<Path>, temp_root: impl AsRef<Path>) -> InternalResult<Archive> {
		let src = path.as_ref().to_path_buf();
		let mut handle = File::open(&src).map_err(|err| InternalError::file(&src, err))?;

		let (header_size, header) = record::read_header(&mut handle)?;
		let tree = PathTree::deserialize(header.as_bytes())?;

		let file_size = match handle.metadata() {
			Ok(metadata) => metadata.len(),
			Err(err) => return Err(InternalError::InvalidAsar(format!("Read file size failed: {}", err))),
		};

		let basename = src.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
		let temp = tempfile::Builder::new()
			.prefix(&format!("{}_", basename))
			.tempdir_in(temp_root.as_ref())
			.map_err(|err| InternalError::file(temp_root.as_ref(), err))?;

		debug!(
			"Opened {}: header of {} bytes, {} bytes in total, temp directory at {}",
			src.display(),
			header_size,
			file_size,
			temp.path().display()
		);

		Ok(Archive {
			handle: Some(handle),
			src,
			header_size,
			file_size,
			tree,
			temp_path: temp.path().to_path_buf(),
			temp: Some(temp),
		})
	}

	/// Releases the read handle and removes the temporary directory. Cleanup failures are logged and ignored
	pub fn close(&mut self) {
		self.handle.take();

		if let Some(temp) = self.temp.take() {
			if let Err(err) = temp.close() {
				warn!("Unable to remove temporary directory {}: {}", self.temp_path.display(), err);
			}
		}
	}

	/// Whether the read handle is still held
	#[inline(always)]
	pub fn is_open(&self) -> bool {
		self.handle.is_some()
	}

	/// Path to the archive file
	#[inline(always)]
	pub fn src(&self) -> &Path {
		&self.src
	}

	/// Byte length of the header record, excluding the 8 byte size record before it
	#[inline(always)]
	pub fn header_size(&self) -> u32 {
		self.header_size
	}

	/// Total size of the archive file
	#[inline(always)]
	pub fn file_size(&self) -> u64 {
		self.file_size
	}

	/// The temporary directory bound to this archive
	#[inline(always)]
	pub fn temp_dir(&self) -> &Path {
		&self.temp_path
	}

	/// Where `path` lands inside the temporary directory
	pub fn temp_path(&self, path: &str) -> PathBuf {
		utils::join_archive_path(&self.temp_path, path)
	}

	/// The parsed header
	#[inline(always)]
	pub fn tree(&self) -> &PathTree {
		&self.tree
	}

	/// The header as JSON, optionally pretty-printed
	pub fn header_json(&self, pretty: bool) -> InternalResult<String> {
		self.tree.to_json(pretty)
	}

	/// Fetch the node at `path`, `None` if there is none
	pub fn get_node(&self, path: &str) -> Option<&Node> {
		self.tree.lookup(path)
	}

	/// Whether a node exists at `path`
	pub fn exists(&self, path: &str) -> bool {
		self.tree.exists(path)
	}

	/// Names of the children of the directory at `path`
	pub fn readdir(&self, path: &str) -> InternalResult<Vec<String>> {
		self.tree.list_children(path)
	}

	/// Every path in the archive, in pre-order
	pub fn list(&self) -> Vec<String> {
		self.tree.walk()
	}

	fn not_found(&self, path: &str) -> InternalError {
		InternalError::InvalidPath(format!(
			"No such file or directory: {}",
			utils::join_archive_path(&self.src, path).display()
		))
	}

	fn handle(&mut self) -> InternalResult<&mut File> {
		match self.handle.as_mut() {
			Some(handle) => Ok(handle),
			None => Err(InternalError::file(
				&self.src,
				io::Error::new(io::ErrorKind::Other, "archive is closed"),
			)),
		}
	}

	// Streams a packed file's region of the data section into `writer`, restoring the handle's position afterwards
	fn read_region<W: Write>(&mut self, entry: &FileEntry, writer: &mut W) -> InternalResult {
		let offset = entry.offset.ok_or_else(|| InternalError::InvalidAsar("Packed file has no offset".to_string()))?;
		let bounds = (record::SIZE_RECORD_SIZE as u64 + self.header_size as u64)
			.checked_add(offset)
			.and_then(|start| Some((start, start.checked_add(entry.size as u64)?)));

		let Some((start, end)) = bounds else {
			return Err(InternalError::InvalidAsar(format!(
				"Entry offset {} with {} bytes overflows the archive",
				offset, entry.size
			)));
		};

		if end > self.file_size {
			return Err(InternalError::InvalidAsar(format!(
				"Entry at offset {} with {} bytes lies past the end of the archive",
				offset, entry.size
			)));
		}

		let src = self.src.clone();
		let handle = self.handle()?;

		let position = handle.stream_position().map_err(|err| InternalError::file(&src, err))?;
		handle.seek(SeekFrom::Start(start)).map_err(|err| InternalError::file(&src, err))?;

		let copied = utils::copy_exact(handle, writer, entry.size as u64);
		handle.seek(SeekFrom::Start(position)).map_err(|err| InternalError::file(&src, err))?;

		copied.map_err(|err| match err.kind() {
			io::ErrorKind::UnexpectedEof => InternalError::InvalidAsar(format!("Archive is truncated: {}", err)),
			_ => InternalError::file(&src, err),
		})?;

		Ok(())
	}

	/// Reads the whole content of the file at `path`
	pub fn read_file(&mut self, path: &str) -> InternalResult<Vec<u8>> {
		let path = normalize_path(path);

		let entry = match self.tree.lookup(&path) {
			None => return Err(self.not_found(&path)),
			Some(Node::Directory(_)) => {
				return Err(InternalError::InvalidPath(format!(
					"Illegal operation on a directory: {}",
					utils::join_archive_path(&self.src, &path).display()
				)))
			},
			Some(Node::Link(link)) => {
				return Err(InternalError::InvalidPath(format!(
					"{} is a symbolic link to {}, resolve it before reading",
					path, link.link
				)))
			},
			Some(Node::File(entry)) => entry.clone(),
		};

		if entry.unpacked {
			let loose = utils::join_archive_path(utils::unpacked_dir(&self.src), &path);
			return fs::read(&loose).map_err(|err| InternalError::file(loose, err));
		}

		let mut buffer = Vec::with_capacity(entry.size as usize);
		self.read_region(&entry, &mut buffer)?;

		Ok(buffer)
	}

	/// Extracts the node at `path` into `dest`, as `dest/basename(path)`. The root extracts straight into `dest`
	pub fn extract(&mut self, path: &str, dest: impl AsRef<Path>) -> InternalResult {
		self.extract_node(&normalize_path(path), dest.as_ref(), 0)
	}

	/// Extracts the whole archive into `dest`
	pub fn extract_all(&mut self, dest: impl AsRef<Path>) -> InternalResult {
		self.extract("", dest)
	}

	/// Extracts the node at `path` into this archive's temporary directory, returning where it landed
	pub fn extract_to_temp(&mut self, path: &str) -> InternalResult<PathBuf> {
		let temp = self.temp_path.clone();
		let path = normalize_path(path);

		self.extract(&path, &temp)?;
		Ok(temp.join(split_path(&path).last().copied().unwrap_or("")))
	}

	fn extract_node(&mut self, path: &str, dest: &Path, hops: usize) -> InternalResult {
		let node = self.tree.lookup(path).cloned().ok_or_else(|| self.not_found(path))?;

		let basename = split_path(path).last().copied().unwrap_or("");
		let target = dest.join(basename);

		match node {
			Node::Directory(dir) => {
				fs::create_dir_all(&target).map_err(|err| InternalError::file(&target, err))?;

				for name in dir.files.names() {
					let child = if path.is_empty() {
						name.to_string()
					} else {
						format!("{}/{}", path, name)
					};

					self.extract_node(&child, &target, hops)?;
				}

				Ok(())
			},
			Node::Link(link) => self.extract_link(path, &link.link, dest, &target, hops),
			Node::File(entry) => {
				if let Some(parent) = target.parent() {
					fs::create_dir_all(parent).map_err(|err| InternalError::file(parent, err))?;
				}

				remove_existing(&target)?;

				if entry.unpacked {
					let loose = utils::join_archive_path(utils::unpacked_dir(&self.src), path);
					fs::copy(&loose, &target).map_err(|err| InternalError::file(&loose, err))?;
				} else {
					let file = File::create(&target).map_err(|err| InternalError::file(&target, err))?;
					let mut writer = BufWriter::new(file);

					self.read_region(&entry, &mut writer)?;
					writer.flush().map_err(|err| InternalError::file(&target, err))?;
				}

				if entry.executable {
					utils::set_executable(&target).map_err(|err| InternalError::file(&target, err))?;
				}

				trace!("Extracted {} into {}", path, target.display());
				Ok(())
			},
		}
	}

	fn extract_link(&mut self, path: &str, link: &str, dest: &Path, target: &Path, hops: usize) -> InternalResult {
		let link_segments = contained_link(link)
			.ok_or_else(|| InternalError::InvalidPath(format!("{}: link {} escapes the archive", path, link)))?;

		if hops >= MAX_LINK_HOPS {
			return Err(InternalError::InvalidPath(format!(
				"{}: too many levels of symbolic links",
				path
			)));
		}

		if let Some(parent) = target.parent() {
			fs::create_dir_all(parent).map_err(|err| InternalError::file(parent, err))?;
		}

		remove_existing(target)?;

		if utils::supports_symlinks() {
			let segments = split_path(path);
			let from = &segments[..segments.len().saturating_sub(1)];

			let relative = relative_link(from, &link_segments);
			utils::symlink(&relative, target).map_err(|err| InternalError::file(target, err))?;

			trace!("Linked {} -> {}", target.display(), relative.display());
			return Ok(());
		}

		// No native symlinks, extract the link's target and move it into place instead
		let staging = tempfile::Builder::new()
			.prefix(".asar-link-")
			.tempdir_in(dest)
			.map_err(|err| InternalError::file(dest, err))?;

		let resolved = link_segments.join("/");
		self.extract_node(&resolved, staging.path(), hops + 1)?;

		let extracted = staging.path().join(link_segments.last().copied().unwrap_or(""));
		fs::rename(&extracted, target).map_err(|err| InternalError::file(target, err))?;

		trace!("Copied link target {} into {}", resolved, target.display());
		Ok(())
	}
}

impl Drop for Archive {
	fn drop(&mut self) {
		self.close();
	}
}

/// Resolves a link's segments relative to the archive root, `None` if it is absolute, empty or climbs out of the root
fn contained_link(link: &str) -> Option<Vec<&str>> {
	if link.starts_with('/') || link.starts_with('\\') || Path::new(link).has_root() || link.contains(':') {
		return None;
	}

	let mut segments = Vec::new();
	for segment in link.split(['/', '\\']) {
		match segment {
			"" | "." => continue,
			".." => {
				segments.pop()?;
			},
			segment => segments.push(segment),
		}
	}

	if segments.is_empty() {
		None
	} else {
		Some(segments)
	}
}

/// The relative path from the directory `from` to `to`, both given as segments from the archive root
fn relative_link(from: &[&str], to: &[&str]) -> PathBuf {
	let common = from.iter().zip(to.iter()).take_while(|(a, b)| a == b).count();

	let mut relative = PathBuf::new();
	for _ in common..from.len() {
		relative.push("..");
	}
	relative.extend(&to[common..]);

	relative
}

fn remove_existing(path: &Path) -> InternalResult {
	let result = match fs::symlink_metadata(path) {
		Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(path),
		Ok(_) => fs::remove_file(path),
		Err(_) => return Ok(()),
	};

	result.map_err(|err| InternalError::file(path, err))
}
