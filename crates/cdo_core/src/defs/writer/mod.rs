use crate::defs::{ContainerHeader, DefsError, Result, UnstreamLimits, Value, stream_value};

/// Builds definition containers from named values.
///
/// Offsets are written relative to the data region, and the legacy
/// text-block size field records the byte length of the name table.
/// Values are held to the same limits the runtime decodes with.
#[derive(Debug, Default)]
pub struct ContainerWriter {
	entries: Vec<(Box<str>, Vec<u8>)>,
	limits: UnstreamLimits,
}

impl ContainerWriter {
	/// Create an empty writer using the default decoder limits.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create an empty writer for a runtime configured with `limits`.
	pub fn with_limits(limits: UnstreamLimits) -> Self {
		Self {
			entries: Vec::new(),
			limits,
		}
	}

	/// Stream `value` and queue it under `name`.
	pub fn push(&mut self, name: &str, value: &Value) -> Result<()> {
		let mut encoded = Vec::new();
		stream_value(value, &self.limits, &mut encoded)?;
		self.push_encoded(name, encoded)
	}

	/// Queue already-encoded value bytes under `name`.
	pub fn push_encoded(&mut self, name: &str, encoded: Vec<u8>) -> Result<()> {
		if name.as_bytes().contains(&0) {
			return Err(DefsError::NameContainsNul { name: name.to_owned() });
		}
		self.entries.push((name.into(), encoded));
		Ok(())
	}

	/// Number of queued entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return `true` when nothing is queued.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Encode the container.
	pub fn finish(&self) -> Result<Vec<u8>> {
		let count = to_u32("entry count", self.entries.len())?;
		let names_len: usize = self.entries.iter().map(|(name, _)| name.len() + 1).sum();
		let data_len: usize = self.entries.iter().map(|(_, encoded)| encoded.len()).sum();

		let mut out = Vec::with_capacity(ContainerHeader::SIZE + 4 * self.entries.len() + 4 + names_len + data_len);
		ContainerHeader::new(count).write(&mut out);

		let mut offset = 0_usize;
		for (_, encoded) in &self.entries {
			out.extend_from_slice(&to_u32("data region", offset)?.to_le_bytes());
			offset += encoded.len();
		}

		out.extend_from_slice(&to_u32("name table", names_len)?.to_le_bytes());
		for (name, _) in &self.entries {
			out.extend_from_slice(name.as_bytes());
			out.push(0);
		}
		for (_, encoded) in &self.entries {
			out.extend_from_slice(encoded);
		}

		Ok(out)
	}
}

fn to_u32(what: &'static str, len: usize) -> Result<u32> {
	u32::try_from(len).map_err(|_| DefsError::StreamTooLong { what, len })
}
