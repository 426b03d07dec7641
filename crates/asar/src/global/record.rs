use std::io::Read;
use super::error::*;

// A record is a u32 payload length followed by the payload, all little-endian.
// Payloads are always padded up to a multiple of 4 bytes.

/// Size of a record's payload-length field
pub(crate) const LENGTH_FIELD_SIZE: usize = 4;
/// Size of the outer record that carries the header length, see [`write_u32_record`]
pub(crate) const SIZE_RECORD_SIZE: usize = crate::SIZE_RECORD_LENGTH;

/// Rounds `len` up to the next multiple of 4
#[inline(always)]
pub(crate) fn pad4(len: usize) -> usize {
	(len + 3) & !3
}

#[inline(always)]
fn u32_at(buffer: &[u8], at: usize) -> u32 {
	let mut bytes = [0u8; 4];
	bytes.copy_from_slice(&buffer[at..at + 4]);
	u32::from_le_bytes(bytes)
}

/// Serializes a single u32 into a record, always 8 bytes long
pub(crate) fn write_u32_record(value: u32) -> [u8; SIZE_RECORD_SIZE] {
	let mut buffer = [0u8; SIZE_RECORD_SIZE];
	buffer[0..4].copy_from_slice(&(LENGTH_FIELD_SIZE as u32).to_le_bytes());
	buffer[4..8].copy_from_slice(&value.to_le_bytes());
	buffer
}

/// Serializes a string into a record: payload length, string length, the raw bytes and zero padding
pub(crate) fn write_string_record(string: &str) -> InternalResult<Vec<u8>> {
	let bytes = string.as_bytes();
	let padded = pad4(bytes.len());

	let (length, payload) = match (u32::try_from(bytes.len()), u32::try_from(padded + LENGTH_FIELD_SIZE)) {
		(Ok(length), Ok(payload)) => (length, payload),
		_ => {
			return Err(InternalError::InvalidHeader(format!(
				"Header of {} bytes does not fit in a record",
				bytes.len()
			)))
		},
	};

	let mut buffer = Vec::with_capacity(LENGTH_FIELD_SIZE * 2 + padded);
	buffer.extend_from_slice(&payload.to_le_bytes());
	buffer.extend_from_slice(&length.to_le_bytes());
	buffer.extend_from_slice(bytes);
	buffer.resize(LENGTH_FIELD_SIZE * 2 + padded, 0);

	Ok(buffer)
}

/// Parses the value out of a record produced by [`write_u32_record`]
pub(crate) fn read_u32(buffer: &[u8]) -> InternalResult<u32> {
	if buffer.len() < SIZE_RECORD_SIZE {
		return Err(InternalError::InvalidAsar(format!(
			"Invalid asar file. Size record is {} bytes long, expected {}",
			buffer.len(),
			SIZE_RECORD_SIZE
		)));
	}

	let payload = u32_at(buffer, 0) as usize;
	if payload < LENGTH_FIELD_SIZE || payload > buffer.len() - LENGTH_FIELD_SIZE {
		return Err(InternalError::InvalidAsar(format!(
			"Invalid asar file. Size record declares an inconsistent payload of {} bytes",
			payload
		)));
	}

	Ok(u32_at(buffer, LENGTH_FIELD_SIZE))
}

/// Parses the string out of a record produced by [`write_string_record`]
pub(crate) fn read_string(buffer: &[u8]) -> InternalResult<String> {
	if buffer.len() < LENGTH_FIELD_SIZE * 2 {
		return Err(InternalError::InvalidAsar(format!(
			"Invalid asar file. Header record is only {} bytes long",
			buffer.len()
		)));
	}

	let payload = u32_at(buffer, 0) as usize;
	if payload > buffer.len() - LENGTH_FIELD_SIZE {
		return Err(InternalError::InvalidAsar(format!(
			"Invalid asar file. Header record declares {} payload bytes, only {} available",
			payload,
			buffer.len() - LENGTH_FIELD_SIZE
		)));
	}

	let length = u32_at(buffer, LENGTH_FIELD_SIZE) as usize;
	let remaining = buffer.len() - LENGTH_FIELD_SIZE * 2;
	if length > remaining {
		return Err(InternalError::InvalidAsar(format!(
			"Invalid asar file. Header string declares {} bytes, only {} available",
			length, remaining
		)));
	}

	let start = LENGTH_FIELD_SIZE * 2;
	match std::str::from_utf8(&buffer[start..start + length]) {
		Ok(string) => Ok(string.to_string()),
		Err(err) => Err(InternalError::InvalidAsar(format!(
			"Invalid asar file. Header is not valid UTF-8: {}",
			err
		))),
	}
}

/// Reads the size record and the header record from the start of `handle`.
/// Returns the header record's length and the header string
pub(crate) fn read_header<T: Read>(mut handle: T) -> InternalResult<(u32, String)> {
	let mut size_record = [0u8; SIZE_RECORD_SIZE];
	handle.read_exact(&mut size_record).map_err(|err| {
		InternalError::InvalidAsar(format!("Invalid asar file. Read header size failed: {}", err))
	})?;

	let header_size = read_u32(&size_record)?;

	// Bounded by what the source holds
	let mut header_record = Vec::new();
	(&mut handle)
		.take(header_size as u64)
		.read_to_end(&mut header_record)
		.map_err(|err| InternalError::InvalidAsar(format!("Invalid asar file. Read header failed: {}", err)))?;

	if header_record.len() != header_size as usize {
		return Err(InternalError::InvalidAsar(format!(
			"Invalid asar file. Header is truncated, expected {} bytes but found {}",
			header_size,
			header_record.len()
		)));
	}

	let header = read_string(&header_record)?;
	Ok((header_size, header))
}
