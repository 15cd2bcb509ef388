use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::bind::{BindError, CodecOptions, Mapping, NativeDict, NativeLayer, Result, Value, dict_to_value};

/// Key holding the address family label.
pub const ADDRESS_TYPE: &str = "address_type";
/// Key holding the address itself.
pub const ADDRESS_DATA: &str = "address_data";

const TEXT_KEYS: [&str; 4] = ["scope_id", "tsig_name", "tsig_algorithm", "tsig_secret"];
const PORT_KEYS: [&str; 2] = ["port", "tls_port"];
const PINSET_KEY: &str = "tls_pubkey_pinset";

/// Address family named by an `address_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
	/// `"IPv4"`, 4-byte addresses.
	V4,
	/// `"IPv6"`, 16-byte addresses.
	V6,
}

impl AddressFamily {
	/// Wire and user label.
	pub fn label(self) -> &'static str {
		match self {
			Self::V4 => "IPv4",
			Self::V6 => "IPv6",
		}
	}

	/// Parse an exact `"IPv4"`/`"IPv6"` label.
	pub fn from_label(label: &[u8]) -> Option<Self> {
		match label {
			b"IPv4" => Some(Self::V4),
			b"IPv6" => Some(Self::V6),
			_ => None,
		}
	}

	/// Address width in bytes.
	pub fn width(self) -> usize {
		match self {
			Self::V4 => 4,
			Self::V6 => 16,
		}
	}

	fn narrow(self, addr: IpAddr) -> Option<Vec<u8>> {
		match (self, addr) {
			(Self::V4, IpAddr::V4(v4)) => Some(v4.octets().to_vec()),
			(Self::V4, IpAddr::V6(v6)) => v6.to_ipv4_mapped().map(|v4| v4.octets().to_vec()),
			(Self::V6, IpAddr::V6(v6)) => Some(v6.octets().to_vec()),
			(Self::V6, IpAddr::V4(v4)) => Some(v4.to_ipv6_mapped().octets().to_vec()),
		}
	}

	fn render(self, bytes: &[u8]) -> Option<String> {
		match self {
			Self::V4 => {
				if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
					return Some(Ipv4Addr::from(octets).to_string());
				}
				let octets = <[u8; 16]>::try_from(bytes).ok()?;
				Ipv6Addr::from(octets).to_ipv4_mapped().map(|v4| v4.to_string())
			}
			// Mapped addresses print in dotted IPv4 form.
			Self::V6 => {
				let octets = <[u8; 16]>::try_from(bytes).ok()?;
				Some(IpAddr::V6(Ipv6Addr::from(octets)).to_canonical().to_string())
			}
		}
	}
}

/// Convert a user-shaped address record to the wire shape native calls expect.
///
/// `address_data` goes from an IP literal to its 4- or 16-byte form, pins in
/// `tls_pubkey_pinset` are parsed by the native layer, and any key outside the
/// allow-list is rejected.
pub fn encode_address<L: NativeLayer>(layer: &L, record: &Mapping, opt: &CodecOptions) -> Result<Mapping> {
	let family = family_of(record)?;
	let text = address_text(record, family)?;
	let addr = text.parse::<IpAddr>().map_err(|_| invalid_address(family, text))?;
	let octets = family.narrow(addr).ok_or_else(|| invalid_address(family, text))?;

	let mut out = Mapping::new();
	out.insert(ADDRESS_TYPE.to_owned(), Value::text(family.label()));
	out.insert(ADDRESS_DATA.to_owned(), Value::Binary(octets));

	for (key, item) in record {
		let key = key.as_str();
		if key == ADDRESS_TYPE || key == ADDRESS_DATA {
			continue;
		}

		let wire = if TEXT_KEYS.contains(&key) {
			match item {
				Value::Binary(_) => item.clone(),
				_ => return Err(invalid_parameter(key, "expected text")),
			}
		} else if PORT_KEYS.contains(&key) {
			match item {
				Value::Integer(port) if *port <= u32::from(u16::MAX) => item.clone(),
				_ => return Err(invalid_parameter(key, "expected port number")),
			}
		} else if key == PINSET_KEY {
			encode_pinset(layer, item, opt)?
		} else {
			return Err(invalid_parameter(key, "unsupported address field"));
		};
		out.insert(key.to_owned(), wire);
	}

	Ok(out)
}

/// Convert one wire-shaped address record to the user shape.
///
/// Only `address_type` and `address_data` change; other keys pass through.
pub fn decode_address(record: &Mapping) -> Result<Mapping> {
	let family = family_of(record)?;
	let bytes = record
		.get(ADDRESS_DATA)
		.and_then(Value::as_binary)
		.ok_or_else(|| invalid_parameter(ADDRESS_DATA, "missing address bytes"))?;
	let text = family.render(bytes).ok_or_else(|| invalid_address(family, &hex::encode(bytes)))?;

	let mut out = record.clone();
	out.insert(ADDRESS_TYPE.to_owned(), Value::text(family.label()));
	out.insert(ADDRESS_DATA.to_owned(), Value::text(text));
	Ok(out)
}

/// Apply [`decode_address`] to every record of a sequence, in order.
pub fn decode_address_list(items: &[Value]) -> Result<Vec<Mapping>> {
	items
		.iter()
		.enumerate()
		.map(|(index, item)| match item {
			Value::Mapping(record) => decode_address(record),
			_ => Err(invalid_parameter(&format!("[{index}]"), "expected address mapping")),
		})
		.collect()
}

fn family_of(record: &Mapping) -> Result<AddressFamily> {
	record
		.get(ADDRESS_TYPE)
		.and_then(Value::as_binary)
		.and_then(AddressFamily::from_label)
		.ok_or_else(|| invalid_parameter(ADDRESS_TYPE, "expected \"IPv4\" or \"IPv6\""))
}

fn address_text(record: &Mapping, family: AddressFamily) -> Result<&str> {
	let bytes = record
		.get(ADDRESS_DATA)
		.and_then(Value::as_binary)
		.ok_or_else(|| invalid_parameter(ADDRESS_DATA, "missing address text"))?;
	std::str::from_utf8(bytes).map_err(|_| invalid_address(family, &hex::encode(bytes)))
}

fn encode_pinset<L: NativeLayer>(layer: &L, item: &Value, opt: &CodecOptions) -> Result<Value> {
	let pins = match item {
		Value::Sequence(pins) if !pins.is_empty() => pins,
		_ => return Err(invalid_parameter(PINSET_KEY, "expected non-empty pin list")),
	};

	let mut out = Vec::with_capacity(pins.len());
	for (index, pin) in pins.iter().enumerate() {
		let at = format!("{PINSET_KEY}[{index}]");
		let text = pin.as_text().ok_or_else(|| invalid_parameter(&at, "expected pin text"))?;
		let raw = layer.pubkey_pin_create(text).ok_or_else(|| invalid_parameter(&at, "malformed pin"))?;
		let dict = NativeDict::new(layer, raw);
		let value = dict_to_value(layer, dict.get(), opt).map_err(|_| invalid_parameter(&at, "unreadable pin"))?;
		out.push(value);
	}
	Ok(Value::Sequence(out))
}

fn invalid_parameter(at: &str, reason: &'static str) -> BindError {
	BindError::InvalidParameter { at: at.to_owned(), reason }
}

fn invalid_address(family: AddressFamily, value: &str) -> BindError {
	BindError::InvalidAddress {
		family: family.label(),
		value: value.to_owned(),
	}
}

#[cfg(test)]
mod tests;
