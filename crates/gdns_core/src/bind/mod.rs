mod address;
mod codec;
mod consts;
mod context;
mod error;
mod extensions;
mod memory;
mod name;
mod native;
mod render;
mod result;
mod value;

/// Address record conversion between user and wire shapes.
pub use address::{ADDRESS_DATA, ADDRESS_TYPE, AddressFamily, decode_address, decode_address_list, encode_address};
/// Native tree conversion entry points and options.
pub use codec::{CodecOptions, TreePath, dict_to_value, from_value_model, list_to_value, to_value_model};
/// Library constants shared by results and queries.
pub use consts::{NameType, RespStatus, ReturnCode, RrType};
/// Resolution context seam and query entry points.
pub use context::{Context, Resolver};
/// Error and result aliases.
pub use error::{BindError, Result};
/// Extension schema validation.
pub use extensions::{
	CALL_REPORTING_KEY, CALL_REPORTING_THRESHOLD, EXTENSION_FALSE, EXTENSION_TRUE, LIBRARY_NUMERIC_VERSION, call_reporting_key, validate_extensions,
};
/// Pure-Rust native tree implementation.
pub use memory::{MemoryDict, MemoryLayer, MemoryList, MemoryNode};
/// Domain name wire codec.
pub use name::{MAX_LABEL_LEN, decode_name, encode_name};
/// Native tree API seam and ownership guards.
pub use native::{DataType, NativeDict, NativeLayer, NativeList, NativeResult, NativeTree};
/// Printable rendering of values.
pub use render::render_value;
/// Query result wrapper.
pub use result::QueryResult;
/// Dynamic value model types.
pub use value::{Mapping, Value, ValueKind};
