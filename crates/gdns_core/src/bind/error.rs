use thiserror::Error;

use crate::bind::ReturnCode;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, BindError>;

/// Errors produced while converting, validating, and adapting resolver trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
	/// Wire-format domain name could not be parsed.
	#[error("malformed domain name at offset {offset}: {reason}")]
	MalformedName {
		/// Byte offset where parsing stopped.
		offset: usize,
		/// Short description of the defect.
		reason: &'static str,
	},
	/// A dotted name component does not fit in one wire label.
	#[error("label exceeds 63 bytes (len={len}): {label}")]
	LabelTooLong {
		/// Offending label text.
		label: String,
		/// Label length in bytes.
		len: usize,
	},
	/// Native element reported a type tag outside the known kinds.
	#[error("native type mismatch at {at}: unknown type tag {tag}")]
	TypeMismatch {
		/// Path of the offending element.
		at: String,
		/// Raw tag reported by the native layer.
		tag: u32,
	},
	/// Value cannot be expressed as a native tree.
	#[error("unsupported value type at {at}: {kind}")]
	UnsupportedValueType {
		/// Path of the offending value.
		at: String,
		/// Kind of the rejected value.
		kind: &'static str,
	},
	/// Native layer could not allocate a new container.
	#[error("native allocation failed at {at}: {kind}")]
	AllocationFailed {
		/// Path of the container being built.
		at: String,
		/// Container kind (`dict` or `list`).
		kind: &'static str,
	},
	/// Tree nesting exceeded the configured depth ceiling.
	#[error("tree depth exceeded at {at} (max={max_depth})")]
	DepthExceeded {
		/// Path where the limit was hit.
		at: String,
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Native layer returned a failure code.
	#[error("native error {code} at {at}: {message}")]
	Native {
		/// Path, key, or operation the native call was made for.
		at: String,
		/// Numeric return code from the native layer.
		code: u32,
		/// Library description of the return code.
		message: &'static str,
	},
	/// Top-level extension name is not recognized.
	#[error("no such extension: {name}")]
	UnknownExtension {
		/// Rejected extension name.
		name: String,
	},
	/// Extension value has the wrong shape.
	#[error("malformed extension at {at}: expected {expected}")]
	MalformedExtension {
		/// Path of the offending entry.
		at: String,
		/// Shape the schema requires.
		expected: &'static str,
	},
	/// Address literal is unparsable or does not fit the declared family.
	#[error("invalid {family} address: {value}")]
	InvalidAddress {
		/// Declared address family label.
		family: &'static str,
		/// Offending address text or byte dump.
		value: String,
	},
	/// Address record field is missing, unknown, or has the wrong shape.
	#[error("invalid parameter {at}: {reason}")]
	InvalidParameter {
		/// Offending key or element.
		at: String,
		/// Short description of the defect.
		reason: &'static str,
	},
}

impl BindError {
	/// Build a native error for a raw return code, looking up its description once.
	pub fn native(at: impl Into<String>, code: ReturnCode) -> Self {
		Self::Native {
			at: at.into(),
			code: code.0,
			message: code.description(),
		}
	}

	/// Map the error onto the library's numeric return code space.
	pub fn return_code(&self) -> ReturnCode {
		match self {
			Self::MalformedName { .. } => ReturnCode::BAD_DOMAIN_NAME,
			Self::TypeMismatch { .. } | Self::UnsupportedValueType { .. } => ReturnCode::WRONG_TYPE_REQUESTED,
			Self::AllocationFailed { .. } => ReturnCode::MEMORY_ERROR,
			Self::DepthExceeded { .. } => ReturnCode::GENERIC_ERROR,
			Self::Native { code, .. } => ReturnCode(*code),
			Self::UnknownExtension { .. } => ReturnCode::NO_SUCH_EXTENSION,
			Self::MalformedExtension { .. } => ReturnCode::EXTENSION_MISFORMAT,
			Self::LabelTooLong { .. } | Self::InvalidAddress { .. } | Self::InvalidParameter { .. } => ReturnCode::INVALID_PARAMETER,
		}
	}

	/// Whether the native layer, rather than the core, rejected the operation.
	pub fn is_native(&self) -> bool {
		matches!(self, Self::Native { .. })
	}
}
