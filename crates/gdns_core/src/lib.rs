//! Value model and native tree codec for getdns-style resolver bindings.

/// Name codec, value model, native tree codec, extension validation, and address adapters.
pub mod bind;
