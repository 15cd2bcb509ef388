//! Shared test helpers for workspace crates.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Prefix marking a fixture string as hex-encoded raw bytes.
pub const HEX_PREFIX: &str = "hex:";

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Resolver response captured as JSON.
#[derive(Debug, Deserialize)]
pub struct TreeFixture {
	/// What the fixture exercises.
	#[serde(default)]
	pub description: String,
	/// Response tree in JSON form.
	pub tree: serde_json::Value,
}

/// Native tree element decoded from a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureNode {
	/// Integer element.
	Int(u32),
	/// Byte payload element.
	Bindata(Vec<u8>),
	/// Ordered list.
	List(Vec<FixtureNode>),
	/// Keyed mapping.
	Dict(BTreeMap<String, FixtureNode>),
}

impl FixtureNode {
	/// Convert a JSON value: numbers become integers, strings become bindata
	/// (`hex:` strings decode to raw bytes), arrays become lists and objects
	/// become dicts.
	pub fn from_json(value: &serde_json::Value) -> Result<Self, String> {
		match value {
			serde_json::Value::Number(number) => number
				.as_u64()
				.and_then(|n| u32::try_from(n).ok())
				.map(Self::Int)
				.ok_or_else(|| format!("integer out of range: {number}")),
			serde_json::Value::String(text) => match text.strip_prefix(HEX_PREFIX) {
				Some(digits) => hex::decode(digits).map(Self::Bindata).map_err(|err| format!("bad hex {text:?}: {err}")),
				None => Ok(Self::Bindata(text.as_bytes().to_vec())),
			},
			serde_json::Value::Array(items) => items.iter().map(Self::from_json).collect::<Result<_, _>>().map(Self::List),
			serde_json::Value::Object(entries) => entries
				.iter()
				.map(|(key, item)| Self::from_json(item).map(|node| (key.clone(), node)))
				.collect::<Result<_, _>>()
				.map(Self::Dict),
			other => Err(format!("unsupported fixture value: {other}")),
		}
	}
}

/// Load `<workspace>/fixtures/<name>` and decode its tree.
pub fn load_tree_fixture(name: &str) -> Result<(TreeFixture, FixtureNode), String> {
	let path = fixture_path(name);
	let text = fs::read_to_string(&path).map_err(|err| format!("read {}: {err}", path.display()))?;
	let fixture: TreeFixture = serde_json::from_str(&text).map_err(|err| format!("parse {}: {err}", path.display()))?;
	let node = FixtureNode::from_json(&fixture.tree)?;
	Ok((fixture, node))
}
