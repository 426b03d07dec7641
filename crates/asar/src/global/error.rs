use std::{error, io, path::PathBuf};
use thiserror::Error;

/// Internal `Result` type alias used by `asar`. Basically equal to: `Result<T, InternalError>`
pub type InternalResult<T = ()> = Result<T, InternalError>;

/// All errors manifestable within `asar` collected into a neat enum
#[derive(Debug, Error)]
pub enum InternalError {
	/// Generic Error
	#[error("[AsarError::Unknown] {0}")]
	OtherError(Box<dyn error::Error + Send + Sync>),
	/// the top-level header record did not contain exactly one `files` member
	#[error("[AsarError::InvalidHeader] {0}")]
	InvalidHeader(String),
	/// empty, root, duplicate or escaping path, or a directory used where a file is required
	#[error("[AsarError::InvalidPath] {0}")]
	InvalidPath(String),
	/// the archive source failed to decode, hinting at corruption or truncation
	#[error("[AsarError::InvalidAsar] {0}")]
	InvalidAsar(String),
	/// tried to list the children of a node that is not a directory
	#[error("[AsarError::NotDirectory] Not a directory: {0}")]
	NotDirectory(String),
	/// the requested node or file does not exist
	#[error("[AsarError::NotExists] No such file or directory: {0}")]
	NotFound(String),
	/// an open, write or copy failed at the filesystem boundary
	#[error("[AsarError::FileError] {} @ {}", .source, .path.display())]
	FileError {
		/// The path that was being operated on
		path: PathBuf,
		/// Underlying IO error
		source: io::Error,
	},
	/// thin wrapper over [io::Error](std::io::Error), captures IO errors that are not bound to a path
	#[error("[AsarError::IOError] {0}")]
	IOError(#[from] io::Error),
	/// the header string was not valid JSON, or did not describe a valid tree
	#[error("[AsarError::InvalidAsar] Unable to parse header: {0}")]
	ParseError(#[from] serde_json::Error),
	/// the unpack pattern handed to the builder is not a valid regular expression
	#[cfg(feature = "builder")]
	#[error("[AsarError::InvalidPath] Invalid unpack pattern: {0}")]
	PatternError(#[from] regex::Error),
}

impl InternalError {
	/// Wraps an [`io::Error`] together with the path it occurred on
	pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> InternalError {
		InternalError::FileError {
			path: path.into(),
			source,
		}
	}

	/// Classifies this error into one of the stable [`ErrorKind`]s
	pub fn kind(&self) -> ErrorKind {
		match self {
			InternalError::OtherError(_) => ErrorKind::Unknown,
			InternalError::InvalidHeader(_) => ErrorKind::InvalidHeader,
			InternalError::InvalidPath(_) => ErrorKind::InvalidPath,
			InternalError::InvalidAsar(_) | InternalError::ParseError(_) => ErrorKind::InvalidAsar,
			InternalError::NotDirectory(_) => ErrorKind::NotDirectory,
			InternalError::NotFound(_) => ErrorKind::NotExists,
			InternalError::FileError { .. } | InternalError::IOError(_) => ErrorKind::FileError,
			#[cfg(feature = "builder")]
			InternalError::PatternError(_) => ErrorKind::InvalidPath,
		}
	}
}

/// Coarse classification of an [`InternalError`], with stable numeric codes
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// No error
	Ok = 0,
	/// Unanticipated failure
	Unknown = 1,
	/// Malformed top-level header record
	InvalidHeader = 2,
	/// Bad path, or wrong node type for the operation
	InvalidPath = 3,
	/// Archive failed to decode
	InvalidAsar = 4,
	/// Listing the children of a non-directory
	NotDirectory = 5,
	/// Node does not exist
	NotExists = 6,
	/// A file was required
	NotFile = 7,
	/// Filesystem failure
	FileError = 8,
}

impl ErrorKind {
	/// The numeric status code of this kind
	#[inline(always)]
	pub fn code(self) -> i32 {
		self as i32
	}
}
