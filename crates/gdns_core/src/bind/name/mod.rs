use crate::bind::{BindError, Result};

/// Longest label a single wire length byte may announce.
pub const MAX_LABEL_LEN: usize = 63;

/// Decode a length-prefixed wire name into a dotted FQDN with trailing dot.
///
/// Bytes following the terminating zero-length label are ignored.
///
/// The result is a display form and is lossy: label bytes that are not UTF-8
/// become U+FFFD, and a `.` inside a label is not escaped, so `\x03a.b\x00`
/// decodes to `"a.b."` and re-encodes as two labels.
pub fn decode_name(wire: &[u8]) -> Result<String> {
	if wire.is_empty() {
		return Err(BindError::MalformedName {
			offset: 0,
			reason: "empty input",
		});
	}

	let mut out = String::new();
	let mut pos = 0_usize;
	loop {
		let Some(&len_byte) = wire.get(pos) else {
			return Err(BindError::MalformedName {
				offset: pos,
				reason: "missing terminating label",
			});
		};
		let len = usize::from(len_byte);
		if len == 0 {
			break;
		}
		if len > MAX_LABEL_LEN {
			return Err(BindError::MalformedName {
				offset: pos,
				reason: "label length exceeds 63",
			});
		}

		let start = pos + 1;
		let end = start + len;
		// The label plus its successor length byte must both be present.
		if end >= wire.len() {
			return Err(BindError::MalformedName {
				offset: pos,
				reason: "label runs past end of input",
			});
		}

		out.push_str(&String::from_utf8_lossy(&wire[start..end]));
		out.push('.');
		pos = end;
	}

	if out.is_empty() {
		out.push('.');
	}
	Ok(out)
}

/// Encode a dotted name into length-prefixed wire labels.
///
/// A trailing dot is optional; `""` and `"."` both encode the root.
pub fn encode_name(name: &str) -> Result<Vec<u8>> {
	let trimmed = name.strip_suffix('.').unwrap_or(name);
	if trimmed.is_empty() {
		return Ok(vec![0]);
	}

	let mut out = Vec::with_capacity(trimmed.len() + 2);
	let mut offset = 0_usize;
	for label in trimmed.split('.') {
		if label.is_empty() {
			return Err(BindError::MalformedName {
				offset,
				reason: "empty label",
			});
		}
		if label.len() > MAX_LABEL_LEN {
			return Err(BindError::LabelTooLong {
				label: label.to_owned(),
				len: label.len(),
			});
		}

		out.push(label.len() as u8);
		out.extend_from_slice(label.as_bytes());
		offset += label.len() + 1;
	}
	out.push(0);
	Ok(out)
}

#[cfg(test)]
mod tests;
