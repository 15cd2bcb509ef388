use std::fmt::{self, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::bind::{ADDRESS_DATA, Value, decode_name};

/// Render a value tree as a single printable line.
///
/// `key` is the mapping key the value was found under; it selects
/// key-specific rendering such as textual IP addresses for `address_data`.
pub fn render_value(value: &Value, key: Option<&str>) -> String {
	Keyed { value, key }.to_string()
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_value(f, self, None)
	}
}

struct Keyed<'a> {
	value: &'a Value,
	key: Option<&'a str>,
}

impl fmt::Display for Keyed<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write_value(f, self.value, self.key)
	}
}

fn write_value<W: Write>(out: &mut W, value: &Value, key: Option<&str>) -> fmt::Result {
	match value {
		Value::Integer(v) => write!(out, "{v}"),
		Value::Binary(bytes) => write_binary(out, bytes, key),
		Value::Sequence(items) => {
			out.write_char('[')?;
			for (idx, item) in items.iter().enumerate() {
				if idx > 0 {
					out.write_str(", ")?;
				}
				write_value(out, item, None)?;
			}
			out.write_char(']')
		}
		Value::Mapping(map) => {
			out.write_char('{')?;
			for (idx, (name, item)) in map.iter().enumerate() {
				if idx > 0 {
					out.write_str(", ")?;
				}
				write!(out, "'{name}': ")?;
				write_value(out, item, Some(name))?;
			}
			out.write_char('}')
		}
	}
}

fn write_binary<W: Write>(out: &mut W, bytes: &[u8], key: Option<&str>) -> fmt::Result {
	if key == Some(ADDRESS_DATA) {
		if let Some(text) = address_text(bytes) {
			return write!(out, "'{text}'");
		}
	}

	if let Some(text) = printable_text(bytes) {
		return write!(out, "'{text}'");
	}

	if let Ok(name) = decode_name(bytes) {
		return write!(out, "'{name}'");
	}

	out.write_char('\'')?;
	for (idx, byte) in bytes.iter().enumerate() {
		if idx > 0 {
			out.write_char(' ')?;
		}
		write!(out, "{byte:02x}")?;
	}
	out.write_char('\'')
}

fn address_text(bytes: &[u8]) -> Option<String> {
	if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
		return Some(Ipv4Addr::from(octets).to_string());
	}
	if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
		return Some(IpAddr::V6(Ipv6Addr::from(octets)).to_canonical().to_string());
	}
	None
}

fn printable_text(bytes: &[u8]) -> Option<&str> {
	let text = std::str::from_utf8(bytes).ok()?;
	let printable = text.chars().all(|ch| !ch.is_control() && (ch == ' ' || !ch.is_whitespace()));
	printable.then_some(text)
}
