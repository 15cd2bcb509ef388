use std::collections::BTreeMap;
use std::fmt;

/// Keyed association used by [`Value::Mapping`].
pub type Mapping = BTreeMap<String, Value>;

/// In-process representation of one node of a resolver tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	/// Unsigned 32-bit scalar.
	Integer(u32),
	/// Opaque bytes: wire names, raw addresses, text.
	Binary(Vec<u8>),
	/// Ordered, positional list.
	Sequence(Vec<Value>),
	/// Unordered key/value association with unique keys.
	Mapping(Mapping),
}

/// Variant label of a [`Value`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// [`Value::Integer`].
	Integer,
	/// [`Value::Binary`].
	Binary,
	/// [`Value::Sequence`].
	Sequence,
	/// [`Value::Mapping`].
	Mapping,
}

impl ValueKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Integer => "integer",
			Self::Binary => "binary",
			Self::Sequence => "sequence",
			Self::Mapping => "mapping",
		}
	}
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl Value {
	/// Binary value holding UTF-8 text.
	pub fn text(text: impl Into<String>) -> Self {
		Self::Binary(text.into().into_bytes())
	}

	/// Build a mapping from entries; later duplicates replace earlier ones.
	pub fn mapping<K, I>(entries: I) -> Self
	where
		K: Into<String>,
		I: IntoIterator<Item = (K, Value)>,
	{
		Self::Mapping(entries.into_iter().map(|(key, value)| (key.into(), value)).collect())
	}

	/// Variant label.
	pub fn kind(&self) -> ValueKind {
		match self {
			Self::Integer(_) => ValueKind::Integer,
			Self::Binary(_) => ValueKind::Binary,
			Self::Sequence(_) => ValueKind::Sequence,
			Self::Mapping(_) => ValueKind::Mapping,
		}
	}

	/// Integer payload, if any.
	pub fn as_integer(&self) -> Option<u32> {
		match self {
			Self::Integer(value) => Some(*value),
			_ => None,
		}
	}

	/// Binary payload, if any.
	pub fn as_binary(&self) -> Option<&[u8]> {
		match self {
			Self::Binary(bytes) => Some(bytes),
			_ => None,
		}
	}

	/// Binary payload interpreted as UTF-8 text.
	pub fn as_text(&self) -> Option<&str> {
		self.as_binary().and_then(|bytes| std::str::from_utf8(bytes).ok())
	}

	/// Sequence items, if any.
	pub fn as_sequence(&self) -> Option<&[Value]> {
		match self {
			Self::Sequence(items) => Some(items),
			_ => None,
		}
	}

	/// Mapping entries, if any.
	pub fn as_mapping(&self) -> Option<&Mapping> {
		match self {
			Self::Mapping(map) => Some(map),
			_ => None,
		}
	}

	/// Look up a key when this value is a mapping.
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.as_mapping().and_then(|map| map.get(key))
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Self::Integer(value)
	}
}

impl From<Vec<u8>> for Value {
	fn from(value: Vec<u8>) -> Self {
		Self::Binary(value)
	}
}

impl From<&[u8]> for Value {
	fn from(value: &[u8]) -> Self {
		Self::Binary(value.to_vec())
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::text(value)
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::text(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Self::Sequence(value)
	}
}

impl From<Mapping> for Value {
	fn from(value: Mapping) -> Self {
		Self::Mapping(value)
	}
}
