use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr;

use crate::bind::ReturnCode;

/// Result type for raw native-layer calls.
pub type NativeResult<T> = std::result::Result<T, ReturnCode>;

/// The four element kinds a native tree may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
	/// Nested keyed mapping (`t_dict`).
	Dict,
	/// Nested ordered list (`t_list`).
	List,
	/// Unsigned 32-bit integer (`t_int`).
	Int,
	/// Length-delimited byte payload (`t_bindata`).
	Bindata,
}

impl DataType {
	/// Narrow a raw native type tag to a known kind.
	pub fn from_tag(tag: u32) -> Option<Self> {
		match tag {
			0 => Some(Self::Dict),
			1 => Some(Self::List),
			2 => Some(Self::Int),
			3 => Some(Self::Bindata),
			_ => None,
		}
	}

	/// Raw native type tag.
	pub fn tag(self) -> u32 {
		match self {
			Self::Dict => 0,
			Self::List => 1,
			Self::Int => 2,
			Self::Bindata => 3,
		}
	}
}

/// Tree API of the external resolver library.
///
/// Getters borrow from the container they are called on and never transfer
/// ownership. Setters copy their argument into the target container, so a
/// container passed to `*_set_dict`/`*_set_list` still has to be destroyed by
/// whoever created it.
pub trait NativeLayer {
	/// Native mapping handle.
	type Dict;
	/// Native list handle.
	type List;

	/// Allocate an empty mapping; `None` when the library is out of memory.
	fn dict_create(&self) -> Option<Self::Dict>;
	/// Release the storage behind a mapping created by this layer.
	fn dict_destroy(&self, dict: &mut Self::Dict);
	/// Names present in a mapping, in the library's enumeration order.
	fn dict_names(&self, dict: &Self::Dict) -> NativeResult<Vec<String>>;
	/// Raw type tag of a named entry.
	fn dict_data_type(&self, dict: &Self::Dict, name: &str) -> NativeResult<u32>;
	/// Read a named integer.
	fn dict_get_int(&self, dict: &Self::Dict, name: &str) -> NativeResult<u32>;
	/// Borrow a named byte payload.
	fn dict_get_bindata<'d>(&self, dict: &'d Self::Dict, name: &str) -> NativeResult<&'d [u8]>;
	/// Borrow a named nested list.
	fn dict_get_list<'d>(&self, dict: &'d Self::Dict, name: &str) -> NativeResult<&'d Self::List>;
	/// Borrow a named nested mapping.
	fn dict_get_dict<'d>(&self, dict: &'d Self::Dict, name: &str) -> NativeResult<&'d Self::Dict>;
	/// Store an integer under `name`.
	fn dict_set_int(&self, dict: &mut Self::Dict, name: &str, value: u32) -> NativeResult<()>;
	/// Store a copy of `value` under `name`.
	fn dict_set_bindata(&self, dict: &mut Self::Dict, name: &str, value: &[u8]) -> NativeResult<()>;
	/// Store a deep copy of `value` under `name`.
	fn dict_set_list(&self, dict: &mut Self::Dict, name: &str, value: &Self::List) -> NativeResult<()>;
	/// Store a deep copy of `value` under `name`.
	fn dict_set_dict(&self, dict: &mut Self::Dict, name: &str, value: &Self::Dict) -> NativeResult<()>;

	/// Allocate an empty list; `None` when the library is out of memory.
	fn list_create(&self) -> Option<Self::List>;
	/// Release the storage behind a list created by this layer.
	fn list_destroy(&self, list: &mut Self::List);
	/// Number of elements in a list.
	fn list_len(&self, list: &Self::List) -> NativeResult<usize>;
	/// Raw type tag of an element.
	fn list_data_type(&self, list: &Self::List, index: usize) -> NativeResult<u32>;
	/// Read an integer element.
	fn list_get_int(&self, list: &Self::List, index: usize) -> NativeResult<u32>;
	/// Borrow a byte payload element.
	fn list_get_bindata<'d>(&self, list: &'d Self::List, index: usize) -> NativeResult<&'d [u8]>;
	/// Borrow a nested list element.
	fn list_get_list<'d>(&self, list: &'d Self::List, index: usize) -> NativeResult<&'d Self::List>;
	/// Borrow a nested mapping element.
	fn list_get_dict<'d>(&self, list: &'d Self::List, index: usize) -> NativeResult<&'d Self::Dict>;
	/// Store an integer at `index` (`index == len` appends).
	fn list_set_int(&self, list: &mut Self::List, index: usize, value: u32) -> NativeResult<()>;
	/// Store a copy of `value` at `index`.
	fn list_set_bindata(&self, list: &mut Self::List, index: usize, value: &[u8]) -> NativeResult<()>;
	/// Store a deep copy of `value` at `index`.
	fn list_set_list(&self, list: &mut Self::List, index: usize, value: &Self::List) -> NativeResult<()>;
	/// Store a deep copy of `value` at `index`.
	fn list_set_dict(&self, list: &mut Self::List, index: usize, value: &Self::Dict) -> NativeResult<()>;

	/// Parse a `pin-sha256="<base64>"` TLS public key pin into a new mapping.
	fn pubkey_pin_create(&self, pin: &str) -> Option<Self::Dict>;
}

/// Owning guard over a native mapping; destroys it when dropped.
pub struct NativeDict<'l, L: NativeLayer> {
	layer: &'l L,
	dict: L::Dict,
}

impl<'l, L: NativeLayer> NativeDict<'l, L> {
	/// Take ownership of a mapping created by `layer`.
	pub fn new(layer: &'l L, dict: L::Dict) -> Self {
		Self { layer, dict }
	}

	/// Allocate a fresh mapping under guard.
	pub fn create(layer: &'l L) -> Option<Self> {
		layer.dict_create().map(|dict| Self::new(layer, dict))
	}

	/// Layer that owns the mapping.
	pub fn layer(&self) -> &'l L {
		self.layer
	}

	/// Borrow the native handle.
	pub fn get(&self) -> &L::Dict {
		&self.dict
	}

	/// Mutably borrow the native handle.
	pub fn get_mut(&mut self) -> &mut L::Dict {
		&mut self.dict
	}

	/// Give up ownership; the caller becomes responsible for destroying the handle.
	pub fn into_raw(self) -> L::Dict {
		let this = ManuallyDrop::new(self);
		// SAFETY: `this` is never dropped, so the handle is moved out exactly once.
		unsafe { ptr::read(&this.dict) }
	}
}

impl<L: NativeLayer> fmt::Debug for NativeDict<'_, L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NativeDict").finish_non_exhaustive()
	}
}

impl<L: NativeLayer> Drop for NativeDict<'_, L> {
	fn drop(&mut self) {
		self.layer.dict_destroy(&mut self.dict);
	}
}

/// Owning guard over a native list; destroys it when dropped.
pub struct NativeList<'l, L: NativeLayer> {
	layer: &'l L,
	list: L::List,
}

impl<'l, L: NativeLayer> NativeList<'l, L> {
	/// Take ownership of a list created by `layer`.
	pub fn new(layer: &'l L, list: L::List) -> Self {
		Self { layer, list }
	}

	/// Allocate a fresh list under guard.
	pub fn create(layer: &'l L) -> Option<Self> {
		layer.list_create().map(|list| Self::new(layer, list))
	}

	/// Layer that owns the list.
	pub fn layer(&self) -> &'l L {
		self.layer
	}

	/// Borrow the native handle.
	pub fn get(&self) -> &L::List {
		&self.list
	}

	/// Mutably borrow the native handle.
	pub fn get_mut(&mut self) -> &mut L::List {
		&mut self.list
	}

	/// Give up ownership; the caller becomes responsible for destroying the handle.
	pub fn into_raw(self) -> L::List {
		let this = ManuallyDrop::new(self);
		// SAFETY: `this` is never dropped, so the handle is moved out exactly once.
		unsafe { ptr::read(&this.list) }
	}
}

impl<L: NativeLayer> fmt::Debug for NativeList<'_, L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NativeList").finish_non_exhaustive()
	}
}

impl<L: NativeLayer> Drop for NativeList<'_, L> {
	fn drop(&mut self) {
		self.layer.list_destroy(&mut self.list);
	}
}

/// Root of a native tree built by the codec.
pub enum NativeTree<'l, L: NativeLayer> {
	/// Mapping root.
	Dict(NativeDict<'l, L>),
	/// List root.
	List(NativeList<'l, L>),
}

impl<'l, L: NativeLayer> NativeTree<'l, L> {
	/// Mapping root, if any.
	pub fn as_dict(&self) -> Option<&NativeDict<'l, L>> {
		match self {
			Self::Dict(dict) => Some(dict),
			Self::List(_) => None,
		}
	}

	/// List root, if any.
	pub fn as_list(&self) -> Option<&NativeList<'l, L>> {
		match self {
			Self::List(list) => Some(list),
			Self::Dict(_) => None,
		}
	}

	/// Consume into the mapping guard; a list root is released and yields `None`.
	pub fn into_dict(self) -> Option<NativeDict<'l, L>> {
		match self {
			Self::Dict(dict) => Some(dict),
			Self::List(_) => None,
		}
	}

	/// Root kind.
	pub fn data_type(&self) -> DataType {
		match self {
			Self::Dict(_) => DataType::Dict,
			Self::List(_) => DataType::List,
		}
	}
}

impl<L: NativeLayer> fmt::Debug for NativeTree<'_, L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Dict(dict) => f.debug_tuple("Dict").field(dict).finish(),
			Self::List(list) => f.debug_tuple("List").field(list).finish(),
		}
	}
}
