use std::os::raw;
use asar::prelude::{ErrorKind, InternalError};

/// The call succeeded
pub const E_OK: raw::c_int = ErrorKind::Ok as raw::c_int;
/// Unknown error, also reported when a required parameter was NULL
pub const E_UNKNOWN: raw::c_int = ErrorKind::Unknown as raw::c_int;
/// The header did not hold exactly one `files` member
pub const E_INVALID_HEADER: raw::c_int = ErrorKind::InvalidHeader as raw::c_int;
/// Bad path, not valid UTF8, or the wrong kind of node for the operation
pub const E_INVALID_PATH: raw::c_int = ErrorKind::InvalidPath as raw::c_int;
/// The archive is corrupt or truncated
pub const E_INVALID_ASAR: raw::c_int = ErrorKind::InvalidAsar as raw::c_int;
/// Not a directory
pub const E_NOT_DIR: raw::c_int = ErrorKind::NotDirectory as raw::c_int;
/// No such file or directory
pub const E_NOT_EXISTS: raw::c_int = ErrorKind::NotExists as raw::c_int;
/// Not a file
pub const E_NOT_FILE: raw::c_int = ErrorKind::NotFile as raw::c_int;
/// A filesystem operation failed
pub const E_FILE_ERROR: raw::c_int = ErrorKind::FileError as raw::c_int;

pub(crate) fn set(error_p: *mut raw::c_int, code: raw::c_int) {
	if let Some(error) = unsafe { error_p.as_mut() } {
		*error = code;
	}
}

pub(crate) fn v_error_to_id<T>(error_p: *mut raw::c_int, error: InternalError) -> *mut T {
	set(error_p, error.kind().code());
	std::ptr::null_mut()
}

pub(crate) fn report<T>(error_p: *mut raw::c_int, code: raw::c_int) -> *mut T {
	set(error_p, code);
	std::ptr::null_mut()
}
