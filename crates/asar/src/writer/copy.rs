use std::{
	fs,
	path::{Path, PathBuf},
};

use log::trace;
use walkdir::WalkDir;

use super::config::Transform;
use crate::global::error::*;
use crate::utils;

fn canonical(path: &Path) -> InternalResult<PathBuf> {
	fs::canonicalize(path).map_err(|err| InternalError::file(path, err))
}

/// Copies the contents of `source` into the existing directory `dest`, preserving permissions.
/// Symlinks are recreated as symlinks, absolute targets pointing inside `source` are rewritten to relative ones.
/// `transform` runs on each copied regular file.
pub(crate) fn copy_dir(source: &Path, dest: &Path, transform: Option<&Transform>) -> InternalResult<u64> {
	let source = canonical(source)?;
	let dest = canonical(dest)?;

	if source == dest {
		return Ok(0);
	}

	if dest.starts_with(&source) {
		return Err(InternalError::InvalidPath(format!(
			"Cannot copy a directory into itself. copy \"{}\" -> \"{}\"",
			source.display(),
			dest.display()
		)));
	}

	let mut copied = 0;
	for entry in WalkDir::new(&source).min_depth(1).follow_links(false).sort_by_file_name() {
		let entry = entry.map_err(|err| {
			let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| source.clone());
			InternalError::file(path, err.into())
		})?;

		let relative = match entry.path().strip_prefix(&source) {
			Ok(relative) => relative,
			Err(_) => continue,
		};

		let target = dest.join(relative);
		let file_type = entry.file_type();

		if file_type.is_dir() {
			fs::create_dir_all(&target).map_err(|err| InternalError::file(&target, err))?;
			let permissions = entry.metadata().map_err(|err| InternalError::file(entry.path(), err.into()))?.permissions();
			fs::set_permissions(&target, permissions).map_err(|err| InternalError::file(&target, err))?;
		} else if file_type.is_symlink() {
			let link = fs::read_link(entry.path()).map_err(|err| InternalError::file(entry.path(), err))?;
			let link = relink(&source, entry.path(), link);

			utils::symlink(&link, &target).map_err(|err| InternalError::file(&target, err))?;
		} else {
			fs::copy(entry.path(), &target).map_err(|err| InternalError::file(entry.path(), err))?;

			if let Some(transform) = transform {
				transform(entry.path(), &target).map_err(|err| InternalError::file(&target, err))?;
			}
		}

		trace!("Copied {} -> {}", entry.path().display(), target.display());
		copied += 1;
	}

	Ok(copied)
}

// Absolute targets inside `root` are rewritten relative to the link's directory
fn relink(root: &Path, link_path: &Path, target: PathBuf) -> PathBuf {
	if !target.is_absolute() {
		return target;
	}

	let resolved = match fs::canonicalize(&target) {
		Ok(resolved) if resolved.starts_with(root) => resolved,
		_ => return target,
	};

	let parent = match link_path.parent().map(fs::canonicalize) {
		Some(Ok(parent)) => parent,
		_ => return target,
	};

	pathdiff::diff_paths(resolved, parent).unwrap_or(target)
}
