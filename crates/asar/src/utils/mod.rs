use std::{
	ffi::OsString,
	fs, io,
	io::{Read, Write},
	path::{Component, Path, PathBuf},
};

/// Size of the buffer used when streaming file contents
pub const CHUNK_SIZE: usize = 128 * 1024;

/// Suffix of the directory holding unpacked files, next to the archive
pub const UNPACKED_SUFFIX: &str = ".unpacked";

/// The directory holding the unpacked files of the archive at `archive`, ie `<archive>.unpacked`
pub fn unpacked_dir(archive: impl AsRef<Path>) -> PathBuf {
	let mut path: OsString = archive.as_ref().as_os_str().to_owned();
	path.push(UNPACKED_SUFFIX);
	PathBuf::from(path)
}

/// Joins a `/` separated archive path onto a filesystem path
pub fn join_archive_path(base: impl AsRef<Path>, path: &str) -> PathBuf {
	let mut joined = base.as_ref().to_path_buf();
	joined.extend(crate::global::tree::split_path(path));
	joined
}

/// Renders a relative filesystem path in `/` separated form
pub fn to_slash(path: &Path) -> String {
	path.components()
		.filter_map(|c| match c {
			Component::Normal(segment) => Some(segment.to_string_lossy()),
			Component::ParentDir => Some("..".into()),
			_ => None,
		})
		.collect::<Vec<_>>()
		.join("/")
}

/// Copies exactly `len` bytes from `reader` into `writer`, in chunks of at most [`CHUNK_SIZE`].
/// Fails with [`io::ErrorKind::UnexpectedEof`] if the reader runs dry early
pub fn copy_exact<R: Read, W: Write>(reader: &mut R, writer: &mut W, len: u64) -> io::Result<u64> {
	let mut buffer = vec![0u8; CHUNK_SIZE.min(len as usize).max(1)];
	let mut remaining = len;

	while remaining > 0 {
		let want = (remaining.min(buffer.len() as u64)) as usize;
		let read = reader.read(&mut buffer[..want])?;

		if read == 0 {
			return Err(io::Error::new(
				io::ErrorKind::UnexpectedEof,
				format!("expected {} more bytes", remaining),
			));
		}

		writer.write_all(&buffer[..read])?;
		remaining -= read as u64;
	}

	Ok(len)
}

/// Whether a file should be flagged executable: the owner execute bit on unix, an `.exe` extension on windows
#[allow(unused_variables)]
pub fn is_executable(path: &Path, metadata: &fs::Metadata) -> bool {
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		metadata.permissions().mode() & 0o100 != 0
	}

	#[cfg(not(unix))]
	{
		path.extension()
			.map(|ext| ext.eq_ignore_ascii_case("exe"))
			.unwrap_or(false)
	}
}

/// Marks an extracted file as executable, a no-op where permission bits don't exist
#[allow(unused_variables)]
pub fn set_executable(path: &Path) -> io::Result<()> {
	#[cfg(unix)]
	{
		use std::os::unix::fs::PermissionsExt;
		fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
	}

	Ok(())
}

/// Whether this platform can reliably create symbolic links
pub fn supports_symlinks() -> bool {
	cfg!(unix)
}

/// Creates a symbolic link at `link` pointing to `target`
pub fn symlink(target: &Path, link: &Path) -> io::Result<()> {
	#[cfg(unix)]
	{
		std::os::unix::fs::symlink(target, link)
	}

	#[cfg(windows)]
	{
		let resolved = link.parent().map(|p| p.join(target)).unwrap_or_else(|| target.to_path_buf());
		if resolved.is_dir() {
			std::os::windows::fs::symlink_dir(target, link)
		} else {
			std::os::windows::fs::symlink_file(target, link)
		}
	}

	#[cfg(not(any(unix, windows)))]
	{
		let _ = (target, link);
		Err(io::Error::new(io::ErrorKind::Unsupported, "symbolic links are not supported"))
	}
}
