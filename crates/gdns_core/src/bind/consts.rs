/// Numeric return code reported by the native resolver library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReturnCode(pub u32);

impl ReturnCode {
	/// Call succeeded.
	pub const GOOD: Self = Self(0);
	/// Unspecified failure.
	pub const GENERIC_ERROR: Self = Self(1);
	/// Domain name argument is malformed.
	pub const BAD_DOMAIN_NAME: Self = Self(300);
	/// Context is unusable.
	pub const BAD_CONTEXT: Self = Self(301);
	/// Context setting was not applied.
	pub const CONTEXT_UPDATE_FAIL: Self = Self(302);
	/// Transaction id is unknown.
	pub const UNKNOWN_TRANSACTION: Self = Self(303);
	/// List index out of range.
	pub const NO_SUCH_LIST_ITEM: Self = Self(304);
	/// Dict name not present.
	pub const NO_SUCH_DICT_NAME: Self = Self(305);
	/// Item exists but has another type.
	pub const WRONG_TYPE_REQUESTED: Self = Self(306);
	/// Extension name is not recognized.
	pub const NO_SUCH_EXTENSION: Self = Self(307);
	/// Extension value is malformed.
	pub const EXTENSION_MISFORMAT: Self = Self(308);
	/// DNSSEC extension requested in stub mode.
	pub const DNSSEC_WITH_STUB_DISALLOWED: Self = Self(309);
	/// Allocation failed.
	pub const MEMORY_ERROR: Self = Self(310);
	/// Parameter value rejected.
	pub const INVALID_PARAMETER: Self = Self(311);
	/// Feature not implemented by the library.
	pub const NOT_IMPLEMENTED: Self = Self(312);

	/// Library description for the code.
	pub fn description(self) -> &'static str {
		match self.0 {
			0 => "Good",
			1 => "Generic error",
			300 => "Badly-formed domain name in first argument",
			301 => "The context has internal deficiencies",
			302 => "Did not update the context",
			303 => "An attempt was made to cancel a callback with a transaction_id that is not recognized",
			304 => "A helper function for lists had an index argument that was too high",
			305 => "A helper function for dicts had a name argument that for a name that is not in the dict",
			306 => "A helper function was supposed to return a certain type for an item, but the wrong type was given",
			307 => "A name in the extensions dict is not a valid extension",
			308 => "One or more of the extensions have a bad format",
			309 => "A query was made with a context that is using stub resolution and a DNSSEC extension specified",
			310 => "Unable to allocate the memory required",
			311 => "A required parameter had an invalid value",
			312 => "The library did not have the requested API feature implemented",
			_ => "Unknown error",
		}
	}

	/// Whether the code signals success.
	pub fn is_good(self) -> bool {
		self == Self::GOOD
	}
}

/// Response-level `status` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RespStatus(pub u32);

impl RespStatus {
	/// At least one response was returned.
	pub const GOOD: Self = Self(900);
	/// Queries for the name yielded all negative responses.
	pub const NO_NAME: Self = Self(901);
	/// All queries for the name timed out.
	pub const ALL_TIMEOUT: Self = Self(902);
	/// Secure answers were requested but none were secure.
	pub const NO_SECURE_ANSWERS: Self = Self(903);
	/// All answers were bogus.
	pub const ALL_BOGUS_ANSWERS: Self = Self(904);
}

/// Response-level `answer_type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameType(pub u32);

impl NameType {
	/// Answer came from DNS.
	pub const DNS: Self = Self(800);
	/// Answer came from WINS.
	pub const WINS: Self = Self(801);
}

/// Resource record type codes used as `general` request types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RrType(pub u16);

impl RrType {
	/// IPv4 host address.
	pub const A: Self = Self(1);
	/// Authoritative name server.
	pub const NS: Self = Self(2);
	/// Canonical name alias.
	pub const CNAME: Self = Self(5);
	/// Start of authority.
	pub const SOA: Self = Self(6);
	/// Domain name pointer.
	pub const PTR: Self = Self(12);
	/// Mail exchange.
	pub const MX: Self = Self(15);
	/// Text strings.
	pub const TXT: Self = Self(16);
	/// IPv6 host address.
	pub const AAAA: Self = Self(28);
	/// Service locator.
	pub const SRV: Self = Self(33);
	/// DNSSEC public key.
	pub const DNSKEY: Self = Self(48);
}
