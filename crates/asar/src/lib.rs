#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

/*!
Pack, inspect and extract `asar` archives, the flat archive format used by Electron to bundle application sources.

An archive is a small JSON header describing a directory tree, followed by the concatenated contents of every packed file.
Files can be left out of the archive on purpose, they then live in a `<archive>.unpacked` directory next to it.

### 🔫 Cargo Features
- `archive`: Enables the [`Archive`](archive::Archive) reader.
- `builder`: Enables [`pack`](builder::pack) and its [`PackConfig`](builder::PackConfig).
- `default`: Enables the `archive` and `builder` features.
- `all`: Enables all the above features.

### 🀄 Show me some code _dang it!_

```
use std::fs;
use asar::prelude::*;

let source = tempfile::tempdir().unwrap();
fs::write(source.path().join("hello.txt"), b"Hello, Cassandra!").unwrap();
fs::create_dir(source.path().join("icons")).unwrap();
fs::write(source.path().join("icons").join("app.png"), [0x89, 0x50, 0x4e, 0x47]).unwrap();

let output = tempfile::tempdir().unwrap();
let target = output.path().join("app.asar");

// keep images out of the archive
let config = PackConfig::default().unpack(r".*\.png").unwrap();
pack(source.path(), &target, &config).unwrap();

let mut archive = Archive::open(&target).unwrap();
assert_eq!(archive.list(), ["hello.txt", "icons", "icons/app.png"]);
assert_eq!(archive.read_file("/hello.txt").unwrap(), b"Hello, Cassandra!");
assert!(archive.get_node("icons/app.png").unwrap().as_file().unwrap().unpacked);
```
*/

/// All tests are included in this module.
mod tests;

pub(crate) mod global;

#[cfg(feature = "archive")]
#[cfg_attr(docsrs, doc(cfg(feature = "archive")))]
pub(crate) mod loader;

#[cfg(feature = "builder")]
#[cfg_attr(docsrs, doc(cfg(feature = "builder")))]
pub(crate) mod writer;

/// Byte length of the size record that opens every archive, the header record follows it
pub const SIZE_RECORD_LENGTH: usize = 8;

/// Largest file that can be stored in an archive, sizes are recorded as `u32`
pub const MAX_FILE_SIZE: u64 = u32::MAX as u64;

/// Consolidated crate imports.
pub mod prelude {
	pub use crate::global::{error::*, tree::*};

	#[cfg(feature = "archive")]
	pub use crate::archive::*;

	#[cfg(feature = "builder")]
	pub use crate::builder::*;
}

/// Archive creation, [`pack`](crate::builder::pack) and [`PackConfig`](crate::builder::PackConfig)
#[cfg(feature = "builder")]
#[cfg_attr(docsrs, doc(cfg(feature = "builder")))]
pub mod builder {
	pub use crate::writer::*;
	pub use crate::global::error::*;
}

/// Archive reading and extraction, [`Archive`](crate::archive::Archive)
#[cfg(feature = "archive")]
#[cfg_attr(docsrs, doc(cfg(feature = "archive")))]
pub mod archive {
	pub use crate::loader::archive::Archive;
	pub use crate::global::{error::*, tree::*};
}

/// Path helpers and the streaming primitives shared by the reader and the builder
pub mod utils;
