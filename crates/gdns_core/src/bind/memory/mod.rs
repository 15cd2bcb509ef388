use std::collections::BTreeMap;
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::bind::{DataType, NativeLayer, NativeResult, ReturnCode};

const SHA256_LEN: usize = 32;

/// One element stored in an in-memory native tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryNode {
	/// Integer element.
	Int(u32),
	/// Byte payload element.
	Bindata(Vec<u8>),
	/// Nested list.
	List(MemoryList),
	/// Nested mapping.
	Dict(MemoryDict),
	/// Element carrying a type tag outside the known kinds.
	Foreign(u32),
}

impl MemoryNode {
	/// Raw type tag reported for this element.
	pub fn tag(&self) -> u32 {
		match self {
			Self::Int(_) => DataType::Int.tag(),
			Self::Bindata(_) => DataType::Bindata.tag(),
			Self::List(_) => DataType::List.tag(),
			Self::Dict(_) => DataType::Dict.tag(),
			Self::Foreign(tag) => *tag,
		}
	}
}

impl From<u32> for MemoryNode {
	fn from(value: u32) -> Self {
		Self::Int(value)
	}
}

impl From<&str> for MemoryNode {
	fn from(value: &str) -> Self {
		Self::Bindata(value.as_bytes().to_vec())
	}
}

impl From<Vec<u8>> for MemoryNode {
	fn from(value: Vec<u8>) -> Self {
		Self::Bindata(value)
	}
}

impl From<MemoryList> for MemoryNode {
	fn from(value: MemoryList) -> Self {
		Self::List(value)
	}
}

impl From<MemoryDict> for MemoryNode {
	fn from(value: MemoryDict) -> Self {
		Self::Dict(value)
	}
}

/// In-memory native mapping; names enumerate in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDict {
	entries: BTreeMap<String, MemoryNode>,
}

impl MemoryDict {
	/// Create an empty mapping not tracked by any layer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace an entry, returning `self` for chaining.
	pub fn with(mut self, name: impl Into<String>, node: impl Into<MemoryNode>) -> Self {
		self.insert(name, node);
		self
	}

	/// Insert or replace an entry.
	pub fn insert(&mut self, name: impl Into<String>, node: impl Into<MemoryNode>) {
		self.entries.insert(name.into(), node.into());
	}

	/// Borrow an entry.
	pub fn get(&self, name: &str) -> Option<&MemoryNode> {
		self.entries.get(name)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the mapping has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn lookup(&self, name: &str) -> NativeResult<&MemoryNode> {
		self.entries.get(name).ok_or(ReturnCode::NO_SUCH_DICT_NAME)
	}

	fn store(&mut self, name: &str, node: MemoryNode) -> NativeResult<()> {
		// Names cross the C boundary as NUL-terminated strings.
		if name.contains('\0') {
			return Err(ReturnCode::INVALID_PARAMETER);
		}
		self.entries.insert(name.to_owned(), node);
		Ok(())
	}
}

/// In-memory native list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryList {
	items: Vec<MemoryNode>,
}

impl MemoryList {
	/// Create an empty list not tracked by any layer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an element, returning `self` for chaining.
	pub fn with(mut self, node: impl Into<MemoryNode>) -> Self {
		self.push(node);
		self
	}

	/// Append an element.
	pub fn push(&mut self, node: impl Into<MemoryNode>) {
		self.items.push(node.into());
	}

	/// Borrow an element.
	pub fn get(&self, index: usize) -> Option<&MemoryNode> {
		self.items.get(index)
	}

	/// Number of elements.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether the list has no elements.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	fn lookup(&self, index: usize) -> NativeResult<&MemoryNode> {
		self.items.get(index).ok_or(ReturnCode::NO_SUCH_LIST_ITEM)
	}

	fn store(&mut self, index: usize, node: MemoryNode) -> NativeResult<()> {
		match index.cmp(&self.items.len()) {
			std::cmp::Ordering::Less => {
				self.items[index] = node;
				Ok(())
			}
			std::cmp::Ordering::Equal => {
				self.items.push(node);
				Ok(())
			}
			std::cmp::Ordering::Greater => Err(ReturnCode::NO_SUCH_LIST_ITEM),
		}
	}
}

/// Pure-Rust implementation of the native tree API.
///
/// Tracks live containers so callers can verify every allocation is
/// released, and can be capped to simulate allocation failure.
#[derive(Debug, Default)]
pub struct MemoryLayer {
	live: AtomicIsize,
	created: AtomicUsize,
	alloc_limit: Option<usize>,
}

impl MemoryLayer {
	/// Create an unbounded layer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a layer whose container allocations fail after `limit` successes.
	pub fn with_allocation_limit(limit: usize) -> Self {
		Self {
			alloc_limit: Some(limit),
			..Self::default()
		}
	}

	/// Containers allocated and not yet destroyed.
	pub fn live_handles(&self) -> isize {
		self.live.load(Ordering::Relaxed)
	}

	/// Total successful container allocations.
	pub fn allocations(&self) -> usize {
		self.created.load(Ordering::Relaxed)
	}

	/// Register an externally built mapping as allocated by this layer.
	pub fn adopt(&self, dict: MemoryDict) -> MemoryDict {
		self.created.fetch_add(1, Ordering::Relaxed);
		self.live.fetch_add(1, Ordering::Relaxed);
		dict
	}

	fn allocate(&self) -> bool {
		let granted = self
			.created
			.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |created| match self.alloc_limit {
				Some(limit) if created >= limit => None,
				_ => Some(created + 1),
			})
			.is_ok();
		if granted {
			self.live.fetch_add(1, Ordering::Relaxed);
		}
		granted
	}

	fn release(&self) {
		self.live.fetch_sub(1, Ordering::Relaxed);
	}
}

fn expect_int(node: &MemoryNode) -> NativeResult<u32> {
	match node {
		MemoryNode::Int(value) => Ok(*value),
		_ => Err(ReturnCode::WRONG_TYPE_REQUESTED),
	}
}

fn expect_bindata(node: &MemoryNode) -> NativeResult<&[u8]> {
	match node {
		MemoryNode::Bindata(bytes) => Ok(bytes),
		_ => Err(ReturnCode::WRONG_TYPE_REQUESTED),
	}
}

fn expect_list(node: &MemoryNode) -> NativeResult<&MemoryList> {
	match node {
		MemoryNode::List(list) => Ok(list),
		_ => Err(ReturnCode::WRONG_TYPE_REQUESTED),
	}
}

fn expect_dict(node: &MemoryNode) -> NativeResult<&MemoryDict> {
	match node {
		MemoryNode::Dict(dict) => Ok(dict),
		_ => Err(ReturnCode::WRONG_TYPE_REQUESTED),
	}
}

impl NativeLayer for MemoryLayer {
	type Dict = MemoryDict;
	type List = MemoryList;

	fn dict_create(&self) -> Option<MemoryDict> {
		self.allocate().then(MemoryDict::new)
	}

	fn dict_destroy(&self, dict: &mut MemoryDict) {
		dict.entries.clear();
		self.release();
	}

	fn dict_names(&self, dict: &MemoryDict) -> NativeResult<Vec<String>> {
		Ok(dict.entries.keys().cloned().collect())
	}

	fn dict_data_type(&self, dict: &MemoryDict, name: &str) -> NativeResult<u32> {
		dict.lookup(name).map(MemoryNode::tag)
	}

	fn dict_get_int(&self, dict: &MemoryDict, name: &str) -> NativeResult<u32> {
		dict.lookup(name).and_then(expect_int)
	}

	fn dict_get_bindata<'d>(&self, dict: &'d MemoryDict, name: &str) -> NativeResult<&'d [u8]> {
		dict.lookup(name).and_then(expect_bindata)
	}

	fn dict_get_list<'d>(&self, dict: &'d MemoryDict, name: &str) -> NativeResult<&'d MemoryList> {
		dict.lookup(name).and_then(expect_list)
	}

	fn dict_get_dict<'d>(&self, dict: &'d MemoryDict, name: &str) -> NativeResult<&'d MemoryDict> {
		dict.lookup(name).and_then(expect_dict)
	}

	fn dict_set_int(&self, dict: &mut MemoryDict, name: &str, value: u32) -> NativeResult<()> {
		dict.store(name, MemoryNode::Int(value))
	}

	fn dict_set_bindata(&self, dict: &mut MemoryDict, name: &str, value: &[u8]) -> NativeResult<()> {
		dict.store(name, MemoryNode::Bindata(value.to_vec()))
	}

	fn dict_set_list(&self, dict: &mut MemoryDict, name: &str, value: &MemoryList) -> NativeResult<()> {
		dict.store(name, MemoryNode::List(value.clone()))
	}

	fn dict_set_dict(&self, dict: &mut MemoryDict, name: &str, value: &MemoryDict) -> NativeResult<()> {
		dict.store(name, MemoryNode::Dict(value.clone()))
	}

	fn list_create(&self) -> Option<MemoryList> {
		self.allocate().then(MemoryList::new)
	}

	fn list_destroy(&self, list: &mut MemoryList) {
		list.items.clear();
		self.release();
	}

	fn list_len(&self, list: &MemoryList) -> NativeResult<usize> {
		Ok(list.items.len())
	}

	fn list_data_type(&self, list: &MemoryList, index: usize) -> NativeResult<u32> {
		list.lookup(index).map(MemoryNode::tag)
	}

	fn list_get_int(&self, list: &MemoryList, index: usize) -> NativeResult<u32> {
		list.lookup(index).and_then(expect_int)
	}

	fn list_get_bindata<'d>(&self, list: &'d MemoryList, index: usize) -> NativeResult<&'d [u8]> {
		list.lookup(index).and_then(expect_bindata)
	}

	fn list_get_list<'d>(&self, list: &'d MemoryList, index: usize) -> NativeResult<&'d MemoryList> {
		list.lookup(index).and_then(expect_list)
	}

	fn list_get_dict<'d>(&self, list: &'d MemoryList, index: usize) -> NativeResult<&'d MemoryDict> {
		list.lookup(index).and_then(expect_dict)
	}

	fn list_set_int(&self, list: &mut MemoryList, index: usize, value: u32) -> NativeResult<()> {
		list.store(index, MemoryNode::Int(value))
	}

	fn list_set_bindata(&self, list: &mut MemoryList, index: usize, value: &[u8]) -> NativeResult<()> {
		list.store(index, MemoryNode::Bindata(value.to_vec()))
	}

	fn list_set_list(&self, list: &mut MemoryList, index: usize, value: &MemoryList) -> NativeResult<()> {
		list.store(index, MemoryNode::List(value.clone()))
	}

	fn list_set_dict(&self, list: &mut MemoryList, index: usize, value: &MemoryDict) -> NativeResult<()> {
		list.store(index, MemoryNode::Dict(value.clone()))
	}

	fn pubkey_pin_create(&self, pin: &str) -> Option<MemoryDict> {
		let encoded = pin.trim().strip_prefix("pin-sha256=\"")?.strip_suffix('"')?;
		let digest = STANDARD.decode(encoded).ok()?;
		if digest.len() != SHA256_LEN {
			return None;
		}

		let mut dict = self.dict_create()?;
		dict.insert("digest", "sha256");
		dict.insert("value", digest);
		Some(dict)
	}
}
