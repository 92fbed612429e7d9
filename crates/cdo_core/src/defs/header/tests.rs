use crate::defs::bytes::Cursor;
use crate::defs::{ContainerHeader, DefsError};

fn header_bytes(signature: u32, version: u32, entries: u32) -> Vec<u8> {
	let mut bytes = Vec::new();
	bytes.extend_from_slice(&signature.to_le_bytes());
	bytes.extend_from_slice(&version.to_le_bytes());
	bytes.extend_from_slice(&entries.to_le_bytes());
	bytes
}

#[test]
fn signature_is_stored_as_little_endian_word() {
	let mut bytes = Vec::new();
	ContainerHeader::new(3).write(&mut bytes);
	assert_eq!(&bytes[0..4], b"ODCC");
	assert_eq!(bytes.len(), ContainerHeader::SIZE);
}

#[test]
fn parses_valid_header() {
	let bytes = header_bytes(ContainerHeader::SIGNATURE, 1, 7);
	let mut cursor = Cursor::new(&bytes);
	let header = ContainerHeader::parse(&mut cursor).expect("header parses");
	assert_eq!(header.entries(), 7);
	assert_eq!(cursor.pos(), ContainerHeader::SIZE);
}

#[test]
fn rejects_short_header() {
	let bytes = header_bytes(ContainerHeader::SIGNATURE, 1, 0);
	let mut cursor = Cursor::new(&bytes[..11]);
	let err = ContainerHeader::parse(&mut cursor).expect_err("11 bytes is too short");
	assert!(matches!(err, DefsError::UnexpectedEof { at: 0, need: 12, rem: 11 }));
}

#[test]
fn rejects_wrong_signature() {
	let bytes = header_bytes(u32::from_be_bytes(*b"ODCC"), 1, 0);
	let err = ContainerHeader::parse(&mut Cursor::new(&bytes)).expect_err("byte-swapped tag");
	assert!(matches!(err, DefsError::BadSignature { .. }));
}

#[test]
fn rejects_future_version() {
	let bytes = header_bytes(ContainerHeader::SIGNATURE, 2, 0);
	let err = ContainerHeader::parse(&mut Cursor::new(&bytes)).expect_err("version 2");
	assert!(matches!(err, DefsError::UnsupportedVersion { version: 2, expected: 1 }));
}
