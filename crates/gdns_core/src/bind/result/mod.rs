use tracing::trace;

use crate::bind::codec::list_to_items;
use crate::bind::{BindError, CodecOptions, Mapping, NameType, NativeDict, NativeLayer, RespStatus, Result, Value, decode_address_list, decode_name, dict_to_value};

const STATUS: &str = "status";
const ANSWER_TYPE: &str = "answer_type";
const CANONICAL_NAME: &str = "canonical_name";
const JUST_ADDRESS_ANSWERS: &str = "just_address_answers";
const REPLIES_TREE: &str = "replies_tree";

/// Response dict returned by a query, owned until dropped.
pub struct QueryResult<'l, L: NativeLayer> {
	dict: NativeDict<'l, L>,
	opt: CodecOptions,
}

impl<'l, L: NativeLayer> QueryResult<'l, L> {
	/// Wrap a response dict produced by `layer`.
	pub fn new(dict: NativeDict<'l, L>, opt: CodecOptions) -> Self {
		Self { dict, opt }
	}

	/// Borrow the native response handle.
	pub fn native(&self) -> &L::Dict {
		self.dict.get()
	}

	/// Response-level `status`.
	pub fn status(&self) -> Result<RespStatus> {
		self.int(STATUS).map(RespStatus)
	}

	/// Response-level `answer_type`.
	pub fn answer_type(&self) -> Result<NameType> {
		self.int(ANSWER_TYPE).map(NameType)
	}

	/// Canonical name, decoded from wire form to dotted text.
	pub fn canonical_name(&self) -> Result<String> {
		let layer = self.dict.layer();
		let wire = layer
			.dict_get_bindata(self.dict.get(), CANONICAL_NAME)
			.map_err(|code| BindError::native(CANONICAL_NAME, code))?;
		decode_name(wire)
	}

	/// Address answers with `address_data` rendered as text.
	pub fn just_address_answers(&self) -> Result<Vec<Mapping>> {
		decode_address_list(&self.list(JUST_ADDRESS_ANSWERS)?)
	}

	/// Per-reply trees, unmodified.
	pub fn replies_tree(&self) -> Result<Vec<Value>> {
		self.list(REPLIES_TREE)
	}

	/// Whole response as a value.
	pub fn to_value(&self) -> Result<Value> {
		dict_to_value(self.dict.layer(), self.dict.get(), &self.opt)
	}

	/// Release the response now.
	pub fn destroy(self) {
		trace!("releasing query result");
		drop(self);
	}

	fn int(&self, key: &'static str) -> Result<u32> {
		self.dict
			.layer()
			.dict_get_int(self.dict.get(), key)
			.map_err(|code| BindError::native(key, code))
	}

	fn list(&self, key: &'static str) -> Result<Vec<Value>> {
		let layer = self.dict.layer();
		let list = layer.dict_get_list(self.dict.get(), key).map_err(|code| BindError::native(key, code))?;
		list_to_items(layer, list, &self.opt)
	}
}
