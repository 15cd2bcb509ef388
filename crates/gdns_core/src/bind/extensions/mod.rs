use tracing::debug;

use crate::bind::{BindError, Mapping, Result, TreePath, Value};

/// Extension flag value meaning "enabled".
pub const EXTENSION_TRUE: u32 = 1;
/// Extension flag value meaning "disabled".
pub const EXTENSION_FALSE: u32 = 0;

/// First library version that names the call reporting flag `return_call_reporting`.
pub const CALL_REPORTING_THRESHOLD: u32 = 0x0009_0000;

/// Numeric version of the resolver library this crate is built against.
#[cfg(feature = "legacy-call-debugging")]
pub const LIBRARY_NUMERIC_VERSION: u32 = 0x0008_0200;
/// Numeric version of the resolver library this crate is built against.
#[cfg(not(feature = "legacy-call-debugging"))]
pub const LIBRARY_NUMERIC_VERSION: u32 = 0x0107_0000;

/// Extension name of the call reporting flag for a given library version.
pub const fn call_reporting_key(numeric_version: u32) -> &'static str {
	if numeric_version < CALL_REPORTING_THRESHOLD {
		"return_call_debugging"
	} else {
		"return_call_reporting"
	}
}

/// Call reporting flag name for the library this crate is built against.
pub const CALL_REPORTING_KEY: &str = call_reporting_key(LIBRARY_NUMERIC_VERSION);

#[derive(Debug, Clone, Copy)]
enum Shape {
	/// Integer restricted to [`EXTENSION_FALSE`] or [`EXTENSION_TRUE`].
	Flag,
	Integer,
	Binary,
	Mapping(&'static Schema),
	MappingList(&'static Schema),
}

impl Shape {
	fn expected(self) -> &'static str {
		match self {
			Self::Flag => "integer 0 or 1",
			Self::Integer => "integer",
			Self::Binary => "binary",
			Self::Mapping(_) => "mapping",
			Self::MappingList(_) => "sequence of mappings",
		}
	}
}

#[derive(Debug)]
struct Schema {
	entries: &'static [(&'static str, Shape)],
}

impl Schema {
	fn shape(&self, key: &str) -> Option<Shape> {
		self.entries.iter().find(|(name, _)| *name == key).map(|(_, shape)| *shape)
	}
}

static EDNS_OPTION: Schema = Schema {
	entries: &[("option_code", Shape::Integer), ("option_data", Shape::Binary)],
};

static OPT_PARAMETERS: Schema = Schema {
	entries: &[
		("maximum_udp_payload_size", Shape::Integer),
		("extended_rcode", Shape::Integer),
		("version", Shape::Integer),
		("do_bit", Shape::Integer),
		("options", Shape::MappingList(&EDNS_OPTION)),
	],
};

static EXTENSIONS: Schema = Schema {
	entries: &[
		(CALL_REPORTING_KEY, Shape::Flag),
		("add_warning_for_bad_dns", Shape::Flag),
		("dnssec_return_status", Shape::Flag),
		("dnssec_return_all_statuses", Shape::Flag),
		("dnssec_return_only_secure", Shape::Flag),
		("dnssec_return_validation_chain", Shape::Flag),
		("return_api_information", Shape::Flag),
		("return_both_v4_and_v6", Shape::Flag),
		("specify_class", Shape::Integer),
		("add_opt_parameters", Shape::Mapping(&OPT_PARAMETERS)),
	],
};

/// Check a query extensions mapping against the extension schema.
///
/// Unknown top-level names fail with [`BindError::UnknownExtension`]; wrong
/// shapes, and unknown names inside nested mappings, fail with
/// [`BindError::MalformedExtension`].
pub fn validate_extensions(extensions: &Mapping) -> Result<()> {
	let mut path = TreePath::root();
	for (key, item) in extensions {
		let Some(shape) = EXTENSIONS.shape(key) else {
			debug!(extension = %key, "rejecting unknown extension");
			return Err(BindError::UnknownExtension { name: key.clone() });
		};
		path.push_key(key);
		check_shape(&mut path, shape, item)?;
		path.pop();
	}
	Ok(())
}

fn check_shape(path: &mut TreePath, shape: Shape, item: &Value) -> Result<()> {
	let ok = match (shape, item) {
		(Shape::Flag, Value::Integer(value)) => *value == EXTENSION_TRUE || *value == EXTENSION_FALSE,
		(Shape::Integer, Value::Integer(_)) | (Shape::Binary, Value::Binary(_)) => true,
		(Shape::Mapping(schema), Value::Mapping(map)) => return check_nested(path, schema, map),
		(Shape::MappingList(schema), Value::Sequence(items)) => {
			for (index, element) in items.iter().enumerate() {
				path.push_index(index);
				let Value::Mapping(map) = element else {
					return Err(malformed(path, Shape::Mapping(schema)));
				};
				check_nested(path, schema, map)?;
				path.pop();
			}
			true
		}
		_ => false,
	};

	if ok { Ok(()) } else { Err(malformed(path, shape)) }
}

fn check_nested(path: &mut TreePath, schema: &Schema, map: &Mapping) -> Result<()> {
	for (key, item) in map {
		path.push_key(key);
		let Some(shape) = schema.shape(key) else {
			return Err(BindError::MalformedExtension {
				at: path.to_string(),
				expected: "known option name",
			});
		};
		check_shape(path, shape, item)?;
		path.pop();
	}
	Ok(())
}

fn malformed(path: &TreePath, shape: Shape) -> BindError {
	debug!(at = %path, expected = shape.expected(), "rejecting malformed extension");
	BindError::MalformedExtension {
		at: path.to_string(),
		expected: shape.expected(),
	}
}
