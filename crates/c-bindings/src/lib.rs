#![allow(non_camel_case_types)]

use std::{ffi, io, os::raw, path::Path, slice};
use asar::prelude::*;

pub mod errors;

/// An opened archive, see [`asar_open`]
pub type asar_archive = ffi::c_void;

/// Transform callback for [`asar_pack`], invoked as `transform(source, destination, user_data)` once a file has been copied into the scratch directory.
/// A non-zero return aborts packing
pub type asar_transform = Option<extern "C" fn(*const raw::c_char, *const raw::c_char, *mut ffi::c_void) -> raw::c_int>;

fn c_str<'a>(ptr: *const raw::c_char) -> Option<&'a str> {
	if ptr.is_null() {
		return None;
	}

	unsafe { ffi::CStr::from_ptr(ptr).to_str().ok() }
}

fn into_c_string(string: String, error_p: *mut raw::c_int) -> *mut raw::c_char {
	match ffi::CString::new(string) {
		Ok(string) => {
			errors::set(error_p, errors::E_OK);
			string.into_raw()
		},
		Err(_) => errors::report(error_p, errors::E_UNKNOWN),
	}
}

fn archive_ref<'a>(archive: *const asar_archive) -> Option<&'a Archive> {
	unsafe { (archive as *const Archive).as_ref() }
}

fn archive_mut<'a>(archive: *mut asar_archive) -> Option<&'a mut Archive> {
	unsafe { (archive as *mut Archive).as_mut() }
}

/// Opens the archive at `path`. Free the returned handle with [`asar_free_archive`]
#[no_mangle]
pub extern "C" fn asar_open(path: *const raw::c_char, error_p: *mut raw::c_int) -> *mut asar_archive {
	let Some(path) = c_str(path) else {
		return errors::report(error_p, errors::E_UNKNOWN);
	};

	match Archive::open(path) {
		Ok(archive) => {
			errors::set(error_p, errors::E_OK);
			Box::into_raw(Box::new(archive)) as _
		},
		Err(err) => errors::v_error_to_id(error_p, err),
	}
}

/// Releases the archive's file handle and removes its temporary directory. The handle itself stays valid
#[no_mangle]
pub extern "C" fn asar_close(archive: *mut asar_archive, error_p: *mut raw::c_int) {
	match archive_mut(archive) {
		Some(archive) => {
			archive.close();
			errors::set(error_p, errors::E_OK);
		},
		None => errors::set(error_p, errors::E_UNKNOWN),
	}
}

/// Closes and deallocates an archive handle
#[no_mangle]
pub extern "C" fn asar_free_archive(archive: *mut asar_archive) {
	if !(archive as *mut Archive).is_null() {
		let _ = unsafe { Box::from_raw(archive as *mut Archive) };
	}
}

/// Whether the archive still holds its file handle
#[no_mangle]
pub extern "C" fn asar_is_open(archive: *const asar_archive, error_p: *mut raw::c_int) -> bool {
	match archive_ref(archive) {
		Some(archive) => {
			errors::set(error_p, errors::E_OK);
			archive.is_open()
		},
		None => {
			errors::set(error_p, errors::E_UNKNOWN);
			false
		},
	}
}

/// Byte length of the header record
#[no_mangle]
pub extern "C" fn asar_get_header_size(archive: *const asar_archive, error_p: *mut raw::c_int) -> u32 {
	match archive_ref(archive) {
		Some(archive) => {
			errors::set(error_p, errors::E_OK);
			archive.header_size()
		},
		None => {
			errors::set(error_p, errors::E_UNKNOWN);
			0
		},
	}
}

/// Total size of the archive file
#[no_mangle]
pub extern "C" fn asar_get_file_size(archive: *const asar_archive, error_p: *mut raw::c_int) -> u64 {
	match archive_ref(archive) {
		Some(archive) => {
			errors::set(error_p, errors::E_OK);
			archive.file_size()
		},
		None => {
			errors::set(error_p, errors::E_UNKNOWN);
			0
		},
	}
}

/// Path of the archive file. Free with [`asar_free_string`]
#[no_mangle]
pub extern "C" fn asar_get_src(archive: *const asar_archive, error_p: *mut raw::c_int) -> *mut raw::c_char {
	match archive_ref(archive) {
		Some(archive) => into_c_string(archive.src().to_string_lossy().into_owned(), error_p),
		None => errors::report(error_p, errors::E_UNKNOWN),
	}
}

/// Path of the archive's temporary directory. Free with [`asar_free_string`]
#[no_mangle]
pub extern "C" fn asar_get_temp_dir(archive: *const asar_archive, error_p: *mut raw::c_int) -> *mut raw::c_char {
	match archive_ref(archive) {
		Some(archive) => into_c_string(archive.temp_dir().to_string_lossy().into_owned(), error_p),
		None => errors::report(error_p, errors::E_UNKNOWN),
	}
}

/// The header as JSON, pretty-printed if `pretty` is set. Free with [`asar_free_string`]
#[no_mangle]
pub extern "C" fn asar_get_header_json(
	archive: *const asar_archive, pretty: bool, error_p: *mut raw::c_int,
) -> *mut raw::c_char {
	let Some(archive) = archive_ref(archive) else {
		return errors::report(error_p, errors::E_UNKNOWN);
	};

	match archive.header_json(pretty) {
		Ok(json) => into_c_string(json, error_p),
		Err(err) => errors::v_error_to_id(error_p, err),
	}
}

/// Whether a node exists at `path`
#[no_mangle]
pub extern "C" fn asar_exists(archive: *const asar_archive, path: *const raw::c_char, error_p: *mut raw::c_int) -> bool {
	match (archive_ref(archive), c_str(path)) {
		(Some(archive), Some(path)) => {
			errors::set(error_p, errors::E_OK);
			archive.exists(path)
		},
		_ => {
			errors::set(error_p, errors::E_UNKNOWN);
			false
		},
	}
}

/// Reads the whole file at `path`, storing its length in `len_p`. Free the buffer with [`asar_free_buffer`]
#[no_mangle]
pub extern "C" fn asar_read_file(
	archive: *mut asar_archive, path: *const raw::c_char, len_p: *mut u64, error_p: *mut raw::c_int,
) -> *mut u8 {
	let (Some(archive), Some(path)) = (archive_mut(archive), c_str(path)) else {
		return errors::report(error_p, errors::E_UNKNOWN);
	};

	let data = match archive.read_file(path) {
		Ok(data) => data.into_boxed_slice(),
		Err(err) => return errors::v_error_to_id(error_p, err),
	};

	if let Some(len) = unsafe { len_p.as_mut() } {
		*len = data.len() as u64;
	}

	errors::set(error_p, errors::E_OK);
	Box::leak(data).as_mut_ptr()
}

/// Deallocates a buffer returned by [`asar_read_file`]
#[no_mangle]
pub extern "C" fn asar_free_buffer(data: *mut u8, len: u64) {
	if !data.is_null() {
		let slice = unsafe { slice::from_raw_parts_mut(data, len as usize) };
		let _ = unsafe { Box::from_raw(slice as *mut [u8]) };
	}
}

/// A list of archive paths
#[repr(C)]
pub struct asar_entries {
	count: raw::c_ulong,
	list: *mut *mut raw::c_char,
}

/// Every path in the archive, in pre-order. Free with [`asar_free_entries`]
#[no_mangle]
pub extern "C" fn asar_list(archive: *const asar_archive, error_p: *mut raw::c_int) -> *mut asar_entries {
	let Some(archive) = archive_ref(archive) else {
		return errors::report(error_p, errors::E_UNKNOWN);
	};

	let mut list = Vec::new();
	for path in archive.list() {
		match ffi::CString::new(path) {
			Ok(path) => list.push(path.into_raw()),
			Err(_) => {
				for path in list {
					let _ = unsafe { ffi::CString::from_raw(path) };
				}

				return errors::report(error_p, errors::E_INVALID_PATH);
			},
		}
	}

	let list = list.into_boxed_slice();
	let entries = asar_entries {
		count: list.len() as _,
		list: Box::leak(list).as_mut_ptr(),
	};

	errors::set(error_p, errors::E_OK);
	Box::into_raw(Box::new(entries))
}

/// Deallocates a list returned by [`asar_list`]
#[no_mangle]
pub extern "C" fn asar_free_entries(entries: *mut asar_entries) {
	if !entries.is_null() {
		let entries = unsafe { Box::from_raw(entries) };

		// reallocate box
		let slice = unsafe { slice::from_raw_parts_mut(entries.list, entries.count as _) };
		let list = unsafe { Box::from_raw(slice as *mut [*mut raw::c_char]) };

		for entry in list.iter() {
			let _ = unsafe { ffi::CString::from_raw(*entry) };
		}
	}
}

/// Extracts the node at `path` into the directory `dest`. Returns whether extraction succeeded
#[no_mangle]
pub extern "C" fn asar_extract(
	archive: *mut asar_archive, path: *const raw::c_char, dest: *const raw::c_char, error_p: *mut raw::c_int,
) -> bool {
	let (Some(archive), Some(path), Some(dest)) = (archive_mut(archive), c_str(path), c_str(dest)) else {
		errors::set(error_p, errors::E_UNKNOWN);
		return false;
	};

	match archive.extract(path, dest) {
		Ok(()) => {
			errors::set(error_p, errors::E_OK);
			true
		},
		Err(err) => {
			errors::set(error_p, err.kind().code());
			false
		},
	}
}

// Lets the opaque user pointer travel into the transform closure
struct UserData(*mut ffi::c_void);

unsafe impl Send for UserData {}
unsafe impl Sync for UserData {}

impl UserData {
	fn get(&self) -> *mut ffi::c_void {
		self.0
	}
}

fn path_to_c(path: &Path) -> io::Result<ffi::CString> {
	ffi::CString::new(path.to_string_lossy().into_owned()).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))
}

/// Packs the directory `src` into an archive at `dest`.
/// `unpack` is an optional regex, files whose path fully matches it are stored in `<dest>.unpacked`.
/// `transform` is optional. Returns whether packing succeeded
#[no_mangle]
pub extern "C" fn asar_pack(
	src: *const raw::c_char, dest: *const raw::c_char, unpack: *const raw::c_char, transform: asar_transform,
	user_data: *mut ffi::c_void, error_p: *mut raw::c_int,
) -> bool {
	let (Some(src), Some(dest)) = (c_str(src), c_str(dest)) else {
		errors::set(error_p, errors::E_UNKNOWN);
		return false;
	};

	let mut config = PackConfig::default();

	if !unpack.is_null() {
		let pattern = c_str(unpack).ok_or_else(|| InternalError::InvalidPath("Unpack pattern is not valid UTF8".to_string()));
		config = match pattern.and_then(|pattern| config.unpack(pattern)) {
			Ok(config) => config,
			Err(err) => {
				errors::set(error_p, err.kind().code());
				return false;
			},
		};
	}

	if let Some(callback) = transform {
		let user_data = UserData(user_data);

		config = config.transform(move |source, destination| {
			let source = path_to_c(source)?;
			let destination = path_to_c(destination)?;

			match callback(source.as_ptr(), destination.as_ptr(), user_data.get()) {
				0 => Ok(()),
				status => Err(io::Error::new(
					io::ErrorKind::Other,
					format!("transform callback failed with status {}", status),
				)),
			}
		});
	}

	match pack(src, dest, &config) {
		Ok(_) => {
			errors::set(error_p, errors::E_OK);
			true
		},
		Err(err) => {
			errors::set(error_p, err.kind().code());
			false
		},
	}
}

/// Deallocates a string returned by this library
#[no_mangle]
pub extern "C" fn asar_free_string(string: *mut raw::c_char) {
	if !string.is_null() {
		let _ = unsafe { ffi::CString::from_raw(string) };
	}
}
