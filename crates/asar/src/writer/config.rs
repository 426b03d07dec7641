use std::{
	fmt, io,
	path::{Path, PathBuf},
	sync::Arc,
};

use regex::Regex;
use crate::global::error::InternalResult;

/// Callback invoked for every regular file copied into the scratch directory, as `transform(source, destination)`.
/// It may rewrite the destination file in place.
pub type Transform = dyn Fn(&Path, &Path) -> io::Result<()> + Send + Sync;

/// Settings for [`pack`](crate::writer::pack)
#[derive(Clone, Default)]
pub struct PackConfig {
	/// Files whose `/` separated path, rooted at the packed directory (`/lib/addon.node`), fully matches this pattern are stored
	/// loose in `<archive>.unpacked` instead of inside the archive
	pub unpack: Option<Regex>,
	/// Optional per-file transform, applied to the scratch copy of each regular file
	pub transform: Option<Arc<Transform>>,
	/// Where to create the scratch copy of the source directory, defaults to the system temp directory
	pub scratch_root: Option<PathBuf>,
}

impl fmt::Debug for PackConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PackConfig")
			.field("unpack", &self.unpack.as_ref().map(Regex::as_str))
			.field("transform", &self.transform.is_some())
			.field("scratch_root", &self.scratch_root)
			.finish()
	}
}

// Helper functions
impl PackConfig {
	///```
	/// use asar::prelude::PackConfig;
	///
	/// let config = PackConfig::default().unpack(r".*\.node").unwrap();
	/// assert!(config.unpack_matches("/native/addon.node"));
	/// assert!(!config.unpack_matches("/native/addon.node.js"));
	///
	/// let config = PackConfig::default().unpack(r"/native/.*").unwrap();
	/// assert!(config.unpack_matches("/native/addon.node"));
	/// assert!(!config.unpack_matches("/lib/native/addon.node"));
	///```
	pub fn unpack(mut self, pattern: &str) -> InternalResult<Self> {
		self.unpack = Some(Regex::new(&format!("^(?:{})$", pattern))?);
		Ok(self)
	}

	/// Setter for the `transform` field
	pub fn transform<F>(mut self, transform: F) -> Self
	where
		F: Fn(&Path, &Path) -> io::Result<()> + Send + Sync + 'static,
	{
		self.transform = Some(Arc::new(transform));
		self
	}

	/// Setter for the `scratch_root` field
	pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
		self.scratch_root = Some(root.into());
		self
	}

	/// Whether the file at the given path should be left unpacked. Paths are `/` separated and rooted at the packed directory, as in `/lib/addon.node`
	pub fn unpack_matches(&self, path: &str) -> bool {
		match &self.unpack {
			Some(pattern) => pattern.is_match(path),
			None => false,
		}
	}
}
