use std::fmt;
use serde::{
	de::{self, MapAccess, Visitor},
	ser::SerializeMap,
	Deserialize, Deserializer, Serialize, Serializer,
};

use super::error::*;

/// Splits a path into its segments. Both `/` and `\` separate segments, empty and `.` segments are dropped
/// and `..` pops the previous segment without ever escaping the root.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
	path.split(['/', '\\'])
		.filter(|segment| !segment.is_empty() && *segment != ".")
		.fold(Vec::new(), |mut segments, segment| {
			if segment == ".." {
				segments.pop();
			} else {
				segments.push(segment);
			}
			segments
		})
}

/// Normalizes a path into its `/` separated form, relative to the root
pub fn normalize_path(path: &str) -> String {
	split_path(path).join("/")
}

/// Whether `name` can name a single entry: not empty, not `.` or `..`, and free of separators
pub(crate) fn is_valid_name(name: &str) -> bool {
	!matches!(name, "" | "." | "..") && !name.contains(['/', '\\'])
}

/// The children of a directory, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entries(Vec<(String, Node)>);

impl Entries {
	/// Creates an empty set of entries
	pub fn new() -> Entries {
		Entries(Vec::new())
	}

	/// Fetch a child by name
	pub fn get(&self, name: &str) -> Option<&Node> {
		self.0.iter().find(|(n, _)| n == name).map(|(_, node)| node)
	}

	pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
		self.0.iter_mut().find(|(n, _)| n == name).map(|(_, node)| node)
	}

	/// Whether a child with the given name exists
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Appends a child, returning it back if the name is already taken
	pub(crate) fn insert(&mut self, name: &str, node: Node) -> Result<(), Node> {
		if self.contains(name) {
			return Err(node);
		}

		self.0.push((name.to_string(), node));
		Ok(())
	}

	pub(crate) fn remove(&mut self, name: &str) -> Option<Node> {
		let idx = self.0.iter().position(|(n, _)| n == name)?;
		Some(self.0.remove(idx).1)
	}

	pub(crate) fn clear(&mut self) {
		self.0.clear()
	}

	/// Child names, in insertion order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(|(name, _)| name.as_str())
	}

	/// Iterate over `(name, node)` pairs, in insertion order
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
		self.0.iter().map(|(name, node)| (name.as_str(), node))
	}

	/// Number of children
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether there are no children
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl Serialize for Entries {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.0.len()))?;
		for (name, node) in &self.0 {
			map.serialize_entry(name, node)?;
		}
		map.end()
	}
}

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
	type Value = Entries;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("a map of entry names to entries")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Entries, A::Error> {
		let mut entries = Entries(Vec::with_capacity(access.size_hint().unwrap_or(0)));

		while let Some((name, node)) = access.next_entry::<String, Node>()? {
			if !is_valid_name(&name) {
				return Err(de::Error::custom(format!("invalid entry name: {:?}", name)));
			}

			if entries.insert(&name, node).is_err() {
				return Err(de::Error::custom(format!("duplicate entry: {}", name)));
			}
		}

		Ok(entries)
	}
}

impl<'de> Deserialize<'de> for Entries {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Entries, D::Error> {
		deserializer.deserialize_map(EntriesVisitor)
	}
}

/// A directory, holding its children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
	/// Child entries, keyed by name
	pub files: Entries,
}

/// A regular file, stored either inside the data section or loose beside the archive
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileEntry {
	/// Size of the file in bytes
	pub size: u32,
	/// Location of the file's bytes, relative to the start of the data section. `None` for unpacked files
	#[serde(with = "offset_string", skip_serializing_if = "Option::is_none")]
	pub offset: Option<u64>,
	/// Stored in the sibling `.unpacked` directory instead of the data section
	#[serde(skip_serializing_if = "is_false")]
	pub unpacked: bool,
	/// Had its executable bit (or `.exe` extension) set when packed
	#[serde(skip_serializing_if = "is_false")]
	pub executable: bool,
}

/// A symbolic link, the target is a `/` separated path relative to the archive root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
	/// Link target, relative to the archive root
	pub link: String,
}

#[inline(always)]
fn is_false(value: &bool) -> bool {
	!*value
}

// Offsets are written as decimal strings, since JSON numbers can't carry a full u64
mod offset_string {
	use serde::Serializer;

	pub(super) fn serialize<S: Serializer>(offset: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
		match offset {
			Some(offset) => serializer.serialize_str(&offset.to_string()),
			None => serializer.serialize_none(),
		}
	}
}

/// A node in a [`PathTree`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawNode")]
pub enum Node {
	/// A directory with children
	Directory(Directory),
	/// A regular file
	File(FileEntry),
	/// A symbolic link
	Link(Link),
}

impl Node {
	/// Creates an empty directory node
	pub fn directory() -> Node {
		Node::Directory(Directory::default())
	}

	/// Whether this node is a directory
	pub fn is_dir(&self) -> bool {
		matches!(self, Node::Directory(_))
	}

	/// The children of this node, only directories have any
	pub fn children(&self) -> Option<&Entries> {
		match self {
			Node::Directory(dir) => Some(&dir.files),
			_ => None,
		}
	}

	pub(crate) fn children_mut(&mut self) -> Option<&mut Entries> {
		match self {
			Node::Directory(dir) => Some(&mut dir.files),
			_ => None,
		}
	}

	/// The file entry behind this node, if it is a file
	pub fn as_file(&self) -> Option<&FileEntry> {
		match self {
			Node::File(file) => Some(file),
			_ => None,
		}
	}

	/// The link behind this node, if it is a symlink
	pub fn as_link(&self) -> Option<&Link> {
		match self {
			Node::Link(link) => Some(link),
			_ => None,
		}
	}
}

impl Serialize for Node {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			Node::Directory(dir) => dir.serialize(serializer),
			Node::File(file) => file.serialize(serializer),
			Node::Link(link) => link.serialize(serializer),
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOffset {
	Text(String),
	Number(u64),
}

// Every member a node may carry, classified into a [`Node`] once parsed. Unknown members are ignored
#[derive(Deserialize)]
struct RawNode {
	files: Option<Entries>,
	size: Option<u32>,
	offset: Option<RawOffset>,
	unpacked: Option<bool>,
	executable: Option<bool>,
	link: Option<String>,
}

impl TryFrom<RawNode> for Node {
	type Error = String;

	fn try_from(raw: RawNode) -> Result<Node, String> {
		if let Some(files) = raw.files {
			return Ok(Node::Directory(Directory { files }));
		}

		if let Some(link) = raw.link {
			return Ok(Node::Link(Link { link }));
		}

		let size = raw.size.ok_or("entry is neither a directory, a file nor a link")?;
		let unpacked = raw.unpacked.unwrap_or(false);

		let offset = match raw.offset {
			Some(RawOffset::Text(text)) => Some(text.parse::<u64>().map_err(|err| format!("invalid offset {:?}: {}", text, err))?),
			Some(RawOffset::Number(number)) => Some(number),
			None => None,
		};

		if offset.is_none() && !unpacked {
			return Err("packed file entry is missing its offset".to_string());
		}

		Ok(Node::File(FileEntry {
			size,
			offset: if unpacked { None } else { offset },
			unpacked,
			executable: raw.executable.unwrap_or(false),
		}))
	}
}

#[derive(Serialize)]
struct HeaderRef<'a> {
	files: &'a Entries,
}

#[derive(Deserialize)]
struct HeaderOwned {
	files: Entries,
}

/// The hierarchy of directories, files and links stored in an archive. The root is always a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct PathTree {
	root: Node,
}

impl Default for PathTree {
	fn default() -> PathTree {
		PathTree::new()
	}
}

impl PathTree {
	/// Creates a tree with an empty root directory
	pub fn new() -> PathTree {
		PathTree { root: Node::directory() }
	}

	/// Creates a tree from the children of the root directory
	pub fn from_entries(files: Entries) -> PathTree {
		PathTree {
			root: Node::Directory(Directory { files }),
		}
	}

	/// The root directory node
	pub fn root(&self) -> &Node {
		&self.root
	}

	/// The children of the root directory
	pub fn entries(&self) -> &Entries {
		static EMPTY: Entries = Entries(Vec::new());
		self.root.children().unwrap_or(&EMPTY)
	}

	/// Inserts `node` at `path`, creating intermediate directories as needed
	pub fn insert(&mut self, path: &str, node: Node) -> InternalResult {
		if path.is_empty() {
			return Err(InternalError::InvalidPath("Cannot insert empty path.".to_string()));
		}

		let segments = split_path(path);
		let Some((basename, parents)) = segments.split_last() else {
			return Err(InternalError::InvalidPath("Cannot insert root path.".to_string()));
		};

		let Some(mut cursor) = self.root.children_mut() else {
			return Err(InternalError::InvalidHeader("Root is not a directory.".to_string()));
		};

		for segment in parents {
			if !cursor.contains(segment) {
				let _ = cursor.insert(segment, Node::directory());
			}

			cursor = match cursor.get_mut(segment).and_then(Node::children_mut) {
				Some(children) => children,
				None => return Err(InternalError::InvalidPath(format!("Invalid path: {}", segments.join("/")))),
			};
		}

		cursor
			.insert(basename, node)
			.map_err(|_| InternalError::InvalidPath(format!("Existing path: {}", segments.join("/"))))
	}

	/// Removes the node at `path`. Removing the root clears the tree, missing paths are ignored
	pub fn remove(&mut self, path: &str) {
		let segments = split_path(path);
		let Some(mut cursor) = self.root.children_mut() else {
			return;
		};

		let Some((basename, parents)) = segments.split_last() else {
			cursor.clear();
			return;
		};

		for segment in parents {
			cursor = match cursor.get_mut(segment).and_then(Node::children_mut) {
				Some(children) => children,
				None => return,
			};
		}

		cursor.remove(basename);
	}

	/// Looks up the node at `path`. An empty path, `.` or `/` resolve to the root
	pub fn lookup(&self, path: &str) -> Option<&Node> {
		let mut node = &self.root;

		for segment in split_path(path) {
			node = node.children()?.get(segment)?;
		}

		Some(node)
	}

	/// Whether a node exists at `path`
	pub fn exists(&self, path: &str) -> bool {
		self.lookup(path).is_some()
	}

	/// Names of the children of the directory at `path`
	pub fn list_children(&self, path: &str) -> InternalResult<Vec<String>> {
		let node = self
			.lookup(path)
			.ok_or_else(|| InternalError::InvalidPath(format!("No such directory: {}", path)))?;

		match node.children() {
			Some(children) => Ok(children.names().map(str::to_string).collect()),
			None => Err(InternalError::NotDirectory(path.to_string())),
		}
	}

	/// Every path in the tree in pre-order, root excluded
	pub fn walk(&self) -> Vec<String> {
		fn visit(entries: &Entries, prefix: &str, paths: &mut Vec<String>) {
			for (name, node) in entries.iter() {
				let path = if prefix.is_empty() {
					name.to_string()
				} else {
					format!("{}/{}", prefix, name)
				};

				paths.push(path.clone());

				if let Some(children) = node.children() {
					visit(children, &path, paths);
				}
			}
		}

		let mut paths = Vec::new();
		visit(self.entries(), "", &mut paths);
		paths
	}

	/// Renders the tree as header JSON: `{"files":{...}}`, optionally pretty-printed
	pub fn to_json(&self, pretty: bool) -> InternalResult<String> {
		let header = HeaderRef { files: self.entries() };

		let json = if pretty {
			serde_json::to_string_pretty(&header)?
		} else {
			serde_json::to_string(&header)?
		};

		Ok(json)
	}

	/// Renders the tree as compact header JSON bytes
	pub fn serialize(&self) -> InternalResult<Vec<u8>> {
		Ok(self.to_json(false)?.into_bytes())
	}

	/// Parses header JSON. The top level must be an object holding exactly one `files` member
	pub fn deserialize(bytes: &[u8]) -> InternalResult<PathTree> {
		let value: serde_json::Value = serde_json::from_slice(bytes)?;

		let valid = match value.as_object() {
			Some(object) => object.len() == 1 && object.contains_key("files"),
			None => false,
		};

		if !valid {
			return Err(InternalError::InvalidHeader("Invalid header.".to_string()));
		}

		let header: HeaderOwned = serde_json::from_value(value)?;
		Ok(PathTree::from_entries(header.files))
	}
}
