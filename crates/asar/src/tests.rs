#![cfg(test)]
// This is meant to mirror as closely as possible, how users should use the crate

use std::{
	fs,
	io::Write,
	path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::global::record;
use crate::prelude::*;

const POEM: &[u8] = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit.\nSed do eiusmod tempor incididunt ut labore.\n";

// A small tree: two top level files, a nested directory, an empty directory and a binary blob
fn fixture() -> InternalResult<TempDir> {
	let dir = tempfile::tempdir()?;
	let root = dir.path();

	fs::write(root.join("poem.txt"), POEM)?;
	fs::write(root.join("empty.txt"), b"")?;

	fs::create_dir_all(root.join("assets").join("icons"))?;
	fs::write(root.join("assets").join("icons").join("logo.png"), [0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a])?;
	fs::write(root.join("assets").join("style.css"), b"body { margin: 0 }")?;

	fs::create_dir(root.join("void"))?;

	let blob = (0..300_000u32).map(|i| (i % 251) as u8).collect::<Vec<_>>();
	fs::write(root.join("blob.bin"), blob)?;

	Ok(dir)
}

fn pack_fixture(source: &Path, config: &PackConfig) -> InternalResult<(TempDir, PathBuf)> {
	let out = tempfile::tempdir()?;
	let target = out.path().join("app.asar");

	pack(source, &target, config)?;
	Ok((out, target))
}

// Writes a raw archive made of `header` and `data`, exactly as laid out on disk
fn raw_archive(dir: &Path, header: &str, data: &[u8]) -> InternalResult<PathBuf> {
	let header = record::write_string_record(header)?;
	let size = record::write_u32_record(header.len() as u32);

	let path = dir.join("raw.asar");
	let mut file = fs::File::create(&path)?;
	file.write_all(&size)?;
	file.write_all(&header)?;
	file.write_all(data)?;

	Ok(path)
}

#[test]
fn codec_layout() -> InternalResult {
	assert_eq!(record::write_u32_record(0x1234_5678), [4, 0, 0, 0, 0x78, 0x56, 0x34, 0x12]);

	// [payload][length][string][padding]
	let encoded = record::write_string_record("abcde")?;
	assert_eq!(encoded.len(), 16);
	assert_eq!(&encoded[..4], &12u32.to_le_bytes());
	assert_eq!(&encoded[4..8], &5u32.to_le_bytes());
	assert_eq!(&encoded[8..13], b"abcde");
	assert_eq!(&encoded[13..], &[0, 0, 0]);

	assert_eq!(record::read_string(&encoded)?, "abcde");
	assert_eq!(record::read_u32(&record::write_u32_record(42))?, 42);

	Ok(())
}

#[test]
fn codec_rejects_garbage() {
	assert_eq!(record::read_u32(&[4, 0, 0]).unwrap_err().kind(), ErrorKind::InvalidAsar);
	assert_eq!(record::read_u32(&[2, 0, 0, 0, 1, 0, 0, 0]).unwrap_err().kind(), ErrorKind::InvalidAsar);

	// claims 64 bytes of string, holds 4
	let mut lying = vec![8, 0, 0, 0, 64, 0, 0, 0];
	lying.extend_from_slice(b"abcd");
	assert_eq!(record::read_string(&lying).unwrap_err().kind(), ErrorKind::InvalidAsar);

	let invalid_utf8 = [8, 0, 0, 0, 2, 0, 0, 0, 0xc3, 0x28, 0, 0];
	assert_eq!(record::read_string(&invalid_utf8).unwrap_err().kind(), ErrorKind::InvalidAsar);
}

#[test]
fn tree_paths() -> InternalResult {
	let mut tree = PathTree::new();

	tree.insert("a/b/c.txt", Node::File(FileEntry { size: 3, offset: Some(0), ..Default::default() }))?;
	tree.insert("\\a\\d", Node::directory())?;
	tree.insert("./a/../e.txt", Node::File(FileEntry { size: 1, offset: Some(3), ..Default::default() }))?;

	assert_eq!(tree.walk(), ["a", "a/b", "a/b/c.txt", "a/d", "e.txt"]);
	assert!(tree.exists("/a/b/c.txt"));
	assert!(tree.exists("a\\b"));
	assert!(tree.exists("/"));
	assert!(!tree.exists("/missing"));

	assert_eq!(tree.list_children("a")?, ["b", "d"]);
	assert_eq!(tree.list_children("e.txt").unwrap_err().kind(), ErrorKind::NotDirectory);
	assert_eq!(tree.list_children("nope").unwrap_err().kind(), ErrorKind::InvalidPath);

	// insertion under a file, duplicates, root and empty paths
	let file = Node::File(FileEntry::default());
	assert_eq!(tree.insert("e.txt/x", file.clone()).unwrap_err().kind(), ErrorKind::InvalidPath);
	assert_eq!(tree.insert("a/b", file.clone()).unwrap_err().kind(), ErrorKind::InvalidPath);
	assert_eq!(tree.insert("/", file.clone()).unwrap_err().kind(), ErrorKind::InvalidPath);
	assert_eq!(tree.insert("", file).unwrap_err().kind(), ErrorKind::InvalidPath);

	tree.remove("a/b");
	tree.remove("a/never");
	assert_eq!(tree.walk(), ["a", "a/d", "e.txt"]);

	tree.remove("/");
	assert!(tree.walk().is_empty());
	assert!(tree.exists(""));

	Ok(())
}

#[test]
fn header_json_shape() -> InternalResult {
	let mut tree = PathTree::new();

	tree.insert("z.txt", Node::File(FileEntry { size: 2, offset: Some(0), executable: true, ..Default::default() }))?;
	tree.insert("a.png", Node::File(FileEntry { size: 9, unpacked: true, ..Default::default() }))?;
	tree.insert("lib", Node::directory())?;
	tree.insert("alias", Node::Link(Link { link: "z.txt".to_string() }))?;

	// member order follows insertion, offsets are decimal strings
	assert_eq!(
		tree.to_json(false)?,
		r#"{"files":{"z.txt":{"size":2,"offset":"0","executable":true},"a.png":{"size":9,"unpacked":true},"lib":{"files":{}},"alias":{"link":"z.txt"}}}"#
	);

	let parsed = PathTree::deserialize(tree.to_json(true)?.as_bytes())?;
	assert_eq!(parsed, tree);

	Ok(())
}

#[test]
fn header_rejects_bad_top_level() {
	let cases: [&str; 4] = [
		r#"{}"#,
		r#"{"files":{},"extra":1}"#,
		r#"{"size":3,"offset":"0"}"#,
		r#"[]"#,
	];

	for case in cases {
		let err = PathTree::deserialize(case.as_bytes()).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidHeader, "{}", case);
	}

	// valid top level, broken node
	let err = PathTree::deserialize(br#"{"files":{"a":{"size":"x"}}}"#).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidAsar);

	let err = PathTree::deserialize(b"not json").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidAsar);
}

#[test]
#[cfg(feature = "archive")]
fn handcrafted_archive() -> InternalResult {
	let dir = tempfile::tempdir()?;
	let header = r#"{"files":{"a.txt":{"size":4,"offset":"0"},"b":{"files":{"c.txt":{"size":0,"offset":"4"}}}}}"#;
	let path = raw_archive(dir.path(), header, b"abcd")?;

	let mut archive = Archive::open(&path)?;

	assert_eq!(archive.list(), ["a.txt", "b", "b/c.txt"]);
	assert_eq!(archive.read_file("a.txt")?, b"abcd");
	assert_eq!(archive.read_file("/b/c.txt")?, b"");
	assert_eq!(archive.readdir("b")?, ["c.txt"]);
	assert_eq!(archive.header_json(false)?, header);
	assert_eq!(archive.file_size(), 8 + archive.header_size() as u64 + 4);

	assert!(archive.exists("/"));
	assert!(!archive.exists("/missing"));

	assert!(archive.get_node("b").and_then(Node::children).is_some());
	assert!(archive.get_node("a.txt").and_then(Node::children).is_none());

	assert_eq!(archive.read_file("b").unwrap_err().kind(), ErrorKind::InvalidPath);
	assert_eq!(archive.read_file("nothing").unwrap_err().kind(), ErrorKind::InvalidPath);

	Ok(())
}

#[test]
#[cfg(feature = "archive")]
fn truncated_archives() -> InternalResult {
	let dir = tempfile::tempdir()?;

	// shorter than the size record
	let path = dir.path().join("tiny.asar");
	fs::write(&path, [4, 0, 0])?;
	assert_eq!(Archive::open(&path).unwrap_err().kind(), ErrorKind::InvalidAsar);

	// header record cut short
	let header = r#"{"files":{"a.txt":{"size":4,"offset":"0"}}}"#;
	let full = raw_archive(dir.path(), header, b"abcd")?;
	let bytes = fs::read(&full)?;

	let cut = dir.path().join("cut.asar");
	fs::write(&cut, &bytes[..20])?;
	assert_eq!(Archive::open(&cut).unwrap_err().kind(), ErrorKind::InvalidAsar);

	// data section cut short, the header still parses
	fs::write(&cut, &bytes[..bytes.len() - 2])?;
	let mut archive = Archive::open(&cut)?;
	assert_eq!(archive.read_file("a.txt").unwrap_err().kind(), ErrorKind::InvalidAsar);

	// missing source
	let missing = Archive::open(dir.path().join("missing.asar")).unwrap_err();
	assert_eq!(missing.kind(), ErrorKind::FileError);

	Ok(())
}

#[test]
fn header_rejects_bad_entry_names() {
	let cases = [
		r#"{"files":{"..":{"files":{}}}}"#,
		r#"{"files":{".":{"files":{}}}}"#,
		r#"{"files":{"":{"size":0,"offset":"0"}}}"#,
		r#"{"files":{"a/b":{"size":0,"offset":"0"}}}"#,
		r#"{"files":{"a\\b":{"size":0,"offset":"0"}}}"#,
		r#"{"files":{"d":{"files":{"..":{"link":"d"}}}}}"#,
	];

	for case in cases {
		let err = PathTree::deserialize(case.as_bytes()).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidAsar, "{}", case);
	}

	// names that merely contain dots are fine
	let tree = PathTree::deserialize(br#"{"files":{"..a":{"size":0,"offset":"0"},".env":{"size":0,"offset":"0"}}}"#)
		.unwrap();
	assert_eq!(tree.walk(), ["..a", ".env"]);
}

#[test]
#[cfg(feature = "archive")]
fn hostile_entry_names() -> InternalResult {
	let cases = [
		r#"{"files":{"..":{"files":{}}}}"#,
		r#"{"files":{"":{"files":{"a":{"size":0,"offset":"0"}}}}}"#,
		r#"{"files":{"a/b":{"size":0,"offset":"0"}}}"#,
	];

	for case in cases {
		let dir = tempfile::tempdir()?;
		let path = raw_archive(dir.path(), case, b"")?;

		let err = Archive::open(&path).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidAsar, "{}", case);
	}

	Ok(())
}

#[test]
#[cfg(feature = "archive")]
fn overflowing_offsets() -> InternalResult {
	let dir = tempfile::tempdir()?;
	let header = r#"{"files":{"a":{"size":4,"offset":"18446744073709551615"},"b":{"size":4,"offset":"18446744073709551000"}}}"#;
	let path = raw_archive(dir.path(), header, b"abcd")?;

	let mut archive = Archive::open(&path)?;
	assert_eq!(archive.read_file("a").unwrap_err().kind(), ErrorKind::InvalidAsar);
	assert_eq!(archive.read_file("b").unwrap_err().kind(), ErrorKind::InvalidAsar);

	let dest = tempfile::tempdir()?;
	assert_eq!(archive.extract("a", dest.path()).unwrap_err().kind(), ErrorKind::InvalidAsar);

	Ok(())
}

#[test]
#[cfg(all(feature = "archive", feature = "builder"))]
fn pack_and_read() -> InternalResult {
	let source = fixture()?;
	let (_out, target) = pack_fixture(source.path(), &PackConfig::default())?;

	let mut archive = Archive::open(&target)?;

	assert_eq!(
		archive.list(),
		[
			"assets",
			"assets/icons",
			"assets/icons/logo.png",
			"assets/style.css",
			"blob.bin",
			"empty.txt",
			"poem.txt",
			"void"
		]
	);

	assert_eq!(archive.read_file("poem.txt")?, POEM);
	assert_eq!(archive.read_file("empty.txt")?, b"");
	assert_eq!(archive.read_file("blob.bin")?, fs::read(source.path().join("blob.bin"))?);
	assert!(archive.readdir("void")?.is_empty());
	assert_eq!(archive.file_size(), fs::metadata(&target)?.len());

	// listing is stable across calls
	assert_eq!(archive.list(), archive.list());

	Ok(())
}

#[test]
#[cfg(all(feature = "archive", feature = "builder"))]
fn offsets_follow_traversal_order() -> InternalResult {
	let source = fixture()?;
	let (_out, target) = pack_fixture(source.path(), &PackConfig::default())?;
	let archive = Archive::open(&target)?;

	let mut expected = 0;
	for path in archive.list() {
		if let Some(Node::File(file)) = archive.get_node(&path) {
			assert_eq!(file.offset, Some(expected), "{}", path);
			expected += file.size as u64;
		}
	}

	let data_start = 8 + archive.header_size() as u64;
	assert_eq!(data_start + expected, archive.file_size());

	Ok(())
}

#[test]
#[cfg(all(feature = "archive", feature = "builder"))]
fn unpacked_files() -> InternalResult {
	let source = fixture()?;
	let config = PackConfig::default().unpack(r".*\.png")?;
	let (_out, target) = pack_fixture(source.path(), &config)?;

	let loose = crate::utils::unpacked_dir(&target).join("assets").join("icons").join("logo.png");
	assert!(loose.is_file());

	let mut archive = Archive::open(&target)?;
	let logo = archive.get_node("assets/icons/logo.png").and_then(Node::as_file).cloned();
	let logo = logo.ok_or_else(|| InternalError::NotFound("logo.png".to_string()))?;

	assert!(logo.unpacked);
	assert_eq!(logo.offset, None);
	assert_eq!(archive.read_file("assets/icons/logo.png")?, fs::read(&loose)?);

	// only full matches are left unpacked
	let css = archive.get_node("assets/style.css").and_then(Node::as_file).cloned();
	assert!(!css.map(|f| f.unpacked).unwrap_or(true));

	Ok(())
}

#[test]
#[cfg(all(feature = "archive", feature = "builder"))]
fn packed_layout() -> InternalResult {
	let source = tempfile::tempdir()?;
	fs::write(source.path().join("a.txt"), b"abcd")?;
	fs::create_dir(source.path().join("b"))?;
	fs::write(source.path().join("b").join("c.txt"), b"")?;

	let (_out, target) = pack_fixture(source.path(), &PackConfig::default())?;
	let mut archive = Archive::open(&target)?;

	assert_eq!(
		archive.header_json(false)?,
		r#"{"files":{"a.txt":{"size":4,"offset":"0"},"b":{"files":{"c.txt":{"size":0,"offset":"4"}}}}}"#
	);
	assert_eq!(archive.list(), ["a.txt", "b", "b/c.txt"]);
	assert_eq!(archive.read_file("a.txt")?, b"abcd");

	// an empty source packs to an empty tree and no data
	let empty = tempfile::tempdir()?;
	let (_out, target) = pack_fixture(empty.path(), &PackConfig::default())?;
	let archive = Archive::open(&target)?;

	assert_eq!(archive.header_json(false)?, r#"{"files":{}}"#);
	assert_eq!(archive.file_size(), 8 + archive.header_size() as u64);

	Ok(())
}

#[test]
#[cfg(all(feature = "archive", feature = "builder"))]
fn anchored_unpack_pattern() -> InternalResult {
	let source = fixture()?;
	let config = PackConfig::default().unpack(r"^.*\.png$")?;
	let (_out, target) = pack_fixture(source.path(), &config)?;

	let archive = Archive::open(&target)?;
	let mut packed = 0;

	for path in archive.list() {
		if let Some(Node::File(file)) = archive.get_node(&path) {
			assert_eq!(file.unpacked, path.ends_with(".png"), "{}", path);

			if !file.unpacked {
				packed += file.size as u64;
			}
		}
	}

	// the data section holds exactly the packed files
	assert_eq!(archive.file_size(), 8 + archive.header_size() as u64 + packed);

	Ok(())
}

#[test]
#[cfg(all(feature = "archive", feature = "builder"))]
fn rooted_unpack_pattern() -> InternalResult {
	let source = fixture()?;
	let config = PackConfig::default().unpack(r"/assets/.*")?;
	let (_out, target) = pack_fixture(source.path(), &config)?;

	let mut archive = Archive::open(&target)?;

	for path in archive.list() {
		if let Some(Node::File(file)) = archive.get_node(&path) {
			assert_eq!(file.unpacked, path.starts_with("assets/"), "{}", path);
		}
	}

	let loose = crate::utils::unpacked_dir(&target).join("assets").join("style.css");
	assert_eq!(fs::read(loose)?, b"body { margin: 0 }");
	assert_eq!(archive.read_file("assets/style.css")?, b"body { margin: 0 }");

	// the rooted form does not match deeper directories of the same name
	let config = PackConfig::default().unpack(r"/icons/.*")?;
	let (_out, target) = pack_fixture(source.path(), &config)?;
	let archive = Archive::open(&target)?;
	let logo = archive.get_node("assets/icons/logo.png").and_then(Node::as_file).map(|file| file.unpacked);
	assert_eq!(logo, Some(false));

	Ok(())
}

#[test]
#[cfg(feature = "builder")]
fn invalid_unpack_pattern() {
	let err = PackConfig::default().unpack("(unclosed").unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidPath);
}

#[test]
#[cfg(feature = "builder")]
fn pack_rejects_missing_source() -> InternalResult {
	let out = tempfile::tempdir()?;
	let err = pack(out.path().join("nope"), out.path().join("x.asar"), &PackConfig::default()).unwrap_err();

	assert_eq!(err.kind(), ErrorKind::InvalidPath);
	Ok(())
}

#[test]
#[cfg(all(feature = "archive", feature = "builder"))]
fn transform_runs_on_copies() -> InternalResult {
	let source = fixture()?;

	let config = PackConfig::default().transform(|_source, copy| {
		if copy.extension().map(|e| e == "txt").unwrap_or(false) {
			let upper = fs::read(copy)?.to_ascii_uppercase();
			fs::write(copy, upper)?;
		}

		Ok(())
	});

	let (_out, target) = pack_fixture(source.path(), &config)?;
	let mut archive = Archive::open(&target)?;

	assert_eq!(archive.read_file("poem.txt")?, POEM.to_ascii_uppercase());
	assert_eq!(archive.read_file("assets/style.css")?, b"body { margin: 0 }");

	// the source tree is left alone
	assert_eq!(fs::read(source.path().join("poem.txt"))?, POEM);

	Ok(())
}

#[test]
#[cfg(all(feature = "archive", feature = "builder"))]
fn extract_roundtrip() -> InternalResult {
	let source = fixture()?;
	let config = PackConfig::default().unpack(r".*\.png")?;
	let (_out, target) = pack_fixture(source.path(), &config)?;

	let dest = tempfile::tempdir()?;
	let mut archive = Archive::open(&target)?;
	archive.extract_all(dest.path())?;

	for path in archive.list() {
		let original = crate::utils::join_archive_path(source.path(), &path);
		let extracted = crate::utils::join_archive_path(dest.path(), &path);

		if original.is_dir() {
			assert!(extracted.is_dir(), "{}", path);
		} else {
			assert_eq!(fs::read(&original)?, fs::read(&extracted)?, "{}", path);
		}
	}

	// a single subtree lands under its basename
	let partial = tempfile::tempdir()?;
	archive.extract("assets/icons", partial.path())?;
	assert!(partial.path().join("icons").join("logo.png").is_file());

	let err = archive.extract("missing", partial.path()).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidPath);

	Ok(())
}

#[test]
#[cfg(all(unix, feature = "archive", feature = "builder"))]
fn executable_bits_survive() -> InternalResult {
	use std::os::unix::fs::PermissionsExt;

	let source = fixture()?;
	let script = source.path().join("run.sh");
	fs::write(&script, b"#!/bin/sh\necho hi\n")?;
	fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;

	let (_out, target) = pack_fixture(source.path(), &PackConfig::default())?;
	let mut archive = Archive::open(&target)?;

	assert!(archive.get_node("run.sh").and_then(Node::as_file).map(|f| f.executable).unwrap_or(false));
	assert!(!archive.get_node("poem.txt").and_then(Node::as_file).map(|f| f.executable).unwrap_or(true));

	let dest = tempfile::tempdir()?;
	archive.extract("run.sh", dest.path())?;

	let mode = fs::metadata(dest.path().join("run.sh"))?.permissions().mode();
	assert_eq!(mode & 0o100, 0o100);

	Ok(())
}

#[test]
#[cfg(all(unix, feature = "archive", feature = "builder"))]
fn symlinks_inside_the_package() -> InternalResult {
	let source = fixture()?;
	std::os::unix::fs::symlink("poem.txt", source.path().join("alias.txt"))?;
	std::os::unix::fs::symlink("../poem.txt", source.path().join("assets").join("up.txt"))?;

	let (_out, target) = pack_fixture(source.path(), &PackConfig::default())?;
	let mut archive = Archive::open(&target)?;

	assert_eq!(archive.get_node("alias.txt").and_then(Node::as_link).map(|l| l.link.as_str()), Some("poem.txt"));
	assert_eq!(archive.get_node("assets/up.txt").and_then(Node::as_link).map(|l| l.link.as_str()), Some("poem.txt"));

	// links take no room in the data section
	assert_eq!(archive.read_file("alias.txt").unwrap_err().kind(), ErrorKind::InvalidPath);

	let dest = tempfile::tempdir()?;
	archive.extract_all(dest.path())?;

	let up = dest.path().join("assets").join("up.txt");
	assert!(fs::symlink_metadata(&up)?.file_type().is_symlink());
	assert_eq!(fs::read_link(&up)?, Path::new("..").join("poem.txt"));
	assert_eq!(fs::read(&up)?, POEM);

	Ok(())
}

#[test]
#[cfg(all(unix, feature = "builder"))]
fn symlinks_out_of_the_package() -> InternalResult {
	let outside = tempfile::tempdir()?;
	fs::write(outside.path().join("secret"), b"nope")?;

	let source = fixture()?;
	std::os::unix::fs::symlink(outside.path().join("secret"), source.path().join("leak"))?;

	let out = tempfile::tempdir()?;
	let err = pack(source.path(), out.path().join("app.asar"), &PackConfig::default()).unwrap_err();

	assert_eq!(err.kind(), ErrorKind::InvalidPath);
	assert!(err.to_string().contains("links out of the package"));

	Ok(())
}

#[test]
#[cfg(feature = "archive")]
fn escaping_links_are_not_extracted() -> InternalResult {
	let dir = tempfile::tempdir()?;
	let header = r#"{"files":{"evil":{"link":"../../etc/passwd"},"ok.txt":{"size":2,"offset":"0"}}}"#;
	let path = raw_archive(dir.path(), header, b"ok")?;

	let mut archive = Archive::open(&path)?;
	let dest = tempfile::tempdir()?;

	let err = archive.extract("evil", dest.path()).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidPath);
	assert!(fs::symlink_metadata(dest.path().join("evil")).is_err());

	archive.extract("ok.txt", dest.path())?;
	assert_eq!(fs::read(dest.path().join("ok.txt"))?, b"ok");

	Ok(())
}

#[test]
#[cfg(feature = "archive")]
fn close_and_temp_dir() -> InternalResult {
	let dir = tempfile::tempdir()?;
	let temp_root = tempfile::tempdir()?;
	let path = raw_archive(dir.path(), r#"{"files":{"a.txt":{"size":4,"offset":"0"}}}"#, b"abcd")?;

	let mut archive = Archive::open_with_temp_root(&path, temp_root.path())?;
	let temp = archive.temp_dir().to_path_buf();

	assert!(archive.is_open());
	assert!(temp.starts_with(temp_root.path()));
	assert!(temp.is_dir());

	let extracted = archive.extract_to_temp("a.txt")?;
	assert_eq!(extracted, archive.temp_path("a.txt"));
	assert_eq!(fs::read(&extracted)?, b"abcd");

	archive.close();
	assert!(!archive.is_open());
	assert!(!temp.exists());

	// closing twice is harmless, reads fail once closed
	archive.close();
	assert_eq!(archive.read_file("a.txt").unwrap_err().kind(), ErrorKind::FileError);
	assert!(archive.exists("a.txt"));

	Ok(())
}

#[test]
#[cfg(feature = "archive")]
fn reads_restore_position() -> InternalResult {
	let dir = tempfile::tempdir()?;
	let header = r#"{"files":{"a":{"size":3,"offset":"0"},"b":{"size":3,"offset":"3"}}}"#;
	let path = raw_archive(dir.path(), header, b"foobar")?;

	let mut archive = Archive::open(&path)?;

	for _ in 0..3 {
		assert_eq!(archive.read_file("b")?, b"bar");
		assert_eq!(archive.read_file("a")?, b"foo");
	}

	Ok(())
}
