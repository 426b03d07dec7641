use std::{
	env,
	fs::{self, File},
	io::{BufWriter, Write},
	path::Path,
};

use log::debug;

mod config;
mod copy;
mod header;

pub use config::{PackConfig, Transform};

use crate::global::{error::*, record};
use crate::utils;
use header::{FileInfo, HeaderBuilder};

/// Packs the directory `src` into an archive at `dest`, returning the number of bytes written to `dest`.
///
/// `src` is first copied into a private scratch directory, applying the configured transform, and the archive is built from that copy.
/// Files matched by the unpack pattern are copied to `<dest>.unpacked` instead of being stored inside the archive.
pub fn pack(src: impl AsRef<Path>, dest: impl AsRef<Path>, config: &PackConfig) -> InternalResult<u64> {
	let src = src.as_ref();
	let dest = dest.as_ref();

	if !src.is_dir() {
		return Err(InternalError::InvalidPath(format!("Not a directory: {}", src.display())));
	}

	// Everything past this point reads the scratch copy, never `src`
	let scratch_root = config.scratch_root.clone().unwrap_or_else(env::temp_dir);
	fs::create_dir_all(&scratch_root).map_err(|err| InternalError::file(&scratch_root, err))?;

	let scratch = tempfile::Builder::new()
		.prefix("asar-pack-")
		.tempdir_in(&scratch_root)
		.map_err(|err| InternalError::file(&scratch_root, err))?;

	let scratch_dir = fs::canonicalize(scratch.path()).map_err(|err| InternalError::file(scratch.path(), err))?;

	let copied = copy::copy_dir(src, &scratch_dir, config.transform.as_deref())?;
	debug!("Copied {} entries from {} into {}", copied, src.display(), scratch_dir.display());

	// Assemble and encode the header
	let (tree, files, data_size) = HeaderBuilder::new(&scratch_dir, config)?.build()?;
	let json = tree.to_json(false)?;

	let header_record = record::write_string_record(&json)?;
	let header_size = u32::try_from(header_record.len())
		.map_err(|_| InternalError::InvalidHeader(format!("Header of {} bytes is too large", header_record.len())))?;
	let size_record = record::write_u32_record(header_size);

	debug!(
		"Header for {} is {} bytes, indexing {} files with {} bytes of packed data",
		dest.display(),
		header_size,
		files.len(),
		data_size
	);

	if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|err| InternalError::file(parent, err))?;
	}

	let target = File::create(dest).map_err(|err| InternalError::file(dest, err))?;
	let mut target = BufWriter::new(target);

	target.write_all(&size_record).map_err(|err| InternalError::file(dest, err))?;
	target.write_all(&header_record).map_err(|err| InternalError::file(dest, err))?;

	let mut bytes_written = (size_record.len() + header_record.len()) as u64;
	bytes_written += write_files(&mut target, dest, &scratch_dir, &files)?;

	target.flush().map_err(|err| InternalError::file(dest, err))?;

	if let Err(err) = scratch.close() {
		log::warn!("Unable to remove scratch directory: {}", err);
	}

	Ok(bytes_written)
}

// Appends packed files to the data section in traversal order, and copies unpacked files beside the archive
fn write_files<W: Write>(target: &mut W, dest: &Path, scratch: &Path, files: &[FileInfo]) -> InternalResult<u64> {
	let unpacked_root = utils::unpacked_dir(dest);
	let mut bytes_written = 0;

	for info in files {
		if info.symlink {
			continue;
		}

		if info.unpacked {
			let relative = info.path.strip_prefix(scratch).unwrap_or(&info.path);
			let loose = unpacked_root.join(relative);

			if let Some(parent) = loose.parent() {
				fs::create_dir_all(parent).map_err(|err| InternalError::file(parent, err))?;
			}

			fs::copy(&info.path, &loose).map_err(|err| InternalError::file(&loose, err))?;
			debug!("Unpacked {} into {}", relative.display(), loose.display());
			continue;
		}

		let mut source = File::open(&info.path).map_err(|err| InternalError::file(&info.path, err))?;
		bytes_written +=
			utils::copy_exact(&mut source, target, info.size).map_err(|err| InternalError::file(&info.path, err))?;
	}

	Ok(bytes_written)
}
