use std::fmt;

use tracing::debug;

use crate::bind::{BindError, DataType, Mapping, NativeDict, NativeLayer, NativeList, NativeTree, Result, ReturnCode, Value};

/// Runtime limits for native tree conversion.
#[derive(Debug, Clone)]
pub struct CodecOptions {
	/// Maximum container nesting depth, counting the root as depth 0.
	pub max_depth: u32,
}

impl Default for CodecOptions {
	fn default() -> Self {
		Self { max_depth: 64 }
	}
}

#[derive(Debug, Clone)]
enum Segment {
	Key(String),
	Index(usize),
}

/// Location of an element inside a tree, rendered as `key[index].key`.
#[derive(Debug, Clone, Default)]
pub struct TreePath {
	segments: Vec<Segment>,
}

impl TreePath {
	/// Empty path addressing the root.
	pub fn root() -> Self {
		Self::default()
	}

	/// Descend into a mapping key.
	pub fn push_key(&mut self, key: &str) {
		self.segments.push(Segment::Key(key.to_owned()));
	}

	/// Descend into a sequence index.
	pub fn push_index(&mut self, index: usize) {
		self.segments.push(Segment::Index(index));
	}

	/// Return to the parent element.
	pub fn pop(&mut self) {
		self.segments.pop();
	}

	/// Whether the path addresses the root.
	pub fn is_root(&self) -> bool {
		self.segments.is_empty()
	}
}

impl fmt::Display for TreePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.segments.is_empty() {
			return f.write_str("<root>");
		}
		for (idx, segment) in self.segments.iter().enumerate() {
			match segment {
				Segment::Key(key) if idx == 0 => f.write_str(key)?,
				Segment::Key(key) => write!(f, ".{key}")?,
				Segment::Index(index) => write!(f, "[{index}]")?,
			}
		}
		Ok(())
	}
}

/// Convert a native mapping and everything below it into a [`Value`].
pub fn dict_to_value<L: NativeLayer>(layer: &L, dict: &L::Dict, opt: &CodecOptions) -> Result<Value> {
	debug!(max_depth = opt.max_depth, "reading native dict");
	Reader::new(layer, opt).read_dict(dict, 0)
}

/// Convert a native list and everything below it into a [`Value`].
pub fn list_to_value<L: NativeLayer>(layer: &L, list: &L::List, opt: &CodecOptions) -> Result<Value> {
	debug!(max_depth = opt.max_depth, "reading native list");
	Reader::new(layer, opt).read_list(list, 0)
}

/// Convert the elements of a native list, without the enclosing sequence.
pub(crate) fn list_to_items<L: NativeLayer>(layer: &L, list: &L::List, opt: &CodecOptions) -> Result<Vec<Value>> {
	Reader::new(layer, opt).read_items(list, 0)
}

/// Convert a whole native tree, whichever kind its root is.
pub fn to_value_model<L: NativeLayer>(tree: &NativeTree<'_, L>, opt: &CodecOptions) -> Result<Value> {
	match tree {
		NativeTree::Dict(dict) => dict_to_value(dict.layer(), dict.get(), opt),
		NativeTree::List(list) => list_to_value(list.layer(), list.get(), opt),
	}
}

/// Build a native tree from a mapping or sequence value.
///
/// The returned guard owns every container allocated for the tree. On error,
/// anything built so far is released before returning.
pub fn from_value_model<'l, L: NativeLayer>(layer: &'l L, value: &Value, opt: &CodecOptions) -> Result<NativeTree<'l, L>> {
	match value {
		Value::Mapping(map) => mapping_to_dict(layer, map, opt).map(NativeTree::Dict),
		Value::Sequence(items) => Writer::new(layer, opt).write_list(items, 0).map(NativeTree::List),
		Value::Integer(_) | Value::Binary(_) => Err(BindError::UnsupportedValueType {
			at: TreePath::root().to_string(),
			kind: value.kind().as_str(),
		}),
	}
}

/// Build a native mapping from a [`Mapping`].
pub(crate) fn mapping_to_dict<'l, L: NativeLayer>(layer: &'l L, map: &Mapping, opt: &CodecOptions) -> Result<NativeDict<'l, L>> {
	Writer::new(layer, opt).write_dict(map, 0)
}

fn check_depth(path: &TreePath, depth: u32, opt: &CodecOptions) -> Result<()> {
	if depth >= opt.max_depth {
		return Err(BindError::DepthExceeded {
			at: path.to_string(),
			max_depth: opt.max_depth,
		});
	}
	Ok(())
}

struct Reader<'a, L: NativeLayer> {
	layer: &'a L,
	opt: &'a CodecOptions,
	path: TreePath,
}

impl<'a, L: NativeLayer> Reader<'a, L> {
	fn new(layer: &'a L, opt: &'a CodecOptions) -> Self {
		Self {
			layer,
			opt,
			path: TreePath::root(),
		}
	}

	fn native(&self, code: ReturnCode) -> BindError {
		BindError::native(self.path.to_string(), code)
	}

	fn narrow(&self, tag: u32) -> Result<DataType> {
		DataType::from_tag(tag).ok_or_else(|| {
			debug!(at = %self.path, tag, "native element has unknown type tag");
			BindError::TypeMismatch {
				at: self.path.to_string(),
				tag,
			}
		})
	}

	fn read_dict(&mut self, dict: &L::Dict, depth: u32) -> Result<Value> {
		check_depth(&self.path, depth, self.opt)?;
		let names = self.layer.dict_names(dict).map_err(|code| self.native(code))?;

		let mut out = Mapping::new();
		for name in names {
			self.path.push_key(&name);
			let item = self.read_dict_item(dict, &name, depth)?;
			self.path.pop();
			out.insert(name, item);
		}
		Ok(Value::Mapping(out))
	}

	fn read_dict_item(&mut self, dict: &L::Dict, name: &str, depth: u32) -> Result<Value> {
		let layer = self.layer;
		let tag = layer.dict_data_type(dict, name).map_err(|code| self.native(code))?;
		match self.narrow(tag)? {
			DataType::Dict => {
				let child = layer.dict_get_dict(dict, name).map_err(|code| self.native(code))?;
				self.read_dict(child, depth + 1)
			}
			DataType::List => {
				let child = layer.dict_get_list(dict, name).map_err(|code| self.native(code))?;
				self.read_list(child, depth + 1)
			}
			DataType::Int => layer.dict_get_int(dict, name).map(Value::Integer).map_err(|code| self.native(code)),
			DataType::Bindata => layer
				.dict_get_bindata(dict, name)
				.map(|bytes| Value::Binary(bytes.to_vec()))
				.map_err(|code| self.native(code)),
		}
	}

	fn read_list(&mut self, list: &L::List, depth: u32) -> Result<Value> {
		self.read_items(list, depth).map(Value::Sequence)
	}

	fn read_items(&mut self, list: &L::List, depth: u32) -> Result<Vec<Value>> {
		check_depth(&self.path, depth, self.opt)?;
		let len = self.layer.list_len(list).map_err(|code| self.native(code))?;

		let mut out = Vec::with_capacity(len);
		for index in 0..len {
			self.path.push_index(index);
			let item = self.read_list_item(list, index, depth)?;
			self.path.pop();
			out.push(item);
		}
		Ok(out)
	}

	fn read_list_item(&mut self, list: &L::List, index: usize, depth: u32) -> Result<Value> {
		let layer = self.layer;
		let tag = layer.list_data_type(list, index).map_err(|code| self.native(code))?;
		match self.narrow(tag)? {
			DataType::Dict => {
				let child = layer.list_get_dict(list, index).map_err(|code| self.native(code))?;
				self.read_dict(child, depth + 1)
			}
			DataType::List => {
				let child = layer.list_get_list(list, index).map_err(|code| self.native(code))?;
				self.read_list(child, depth + 1)
			}
			DataType::Int => layer.list_get_int(list, index).map(Value::Integer).map_err(|code| self.native(code)),
			DataType::Bindata => layer
				.list_get_bindata(list, index)
				.map(|bytes| Value::Binary(bytes.to_vec()))
				.map_err(|code| self.native(code)),
		}
	}
}

struct Writer<'l, 'a, L: NativeLayer> {
	layer: &'l L,
	opt: &'a CodecOptions,
	path: TreePath,
}

impl<'l, 'a, L: NativeLayer> Writer<'l, 'a, L> {
	fn new(layer: &'l L, opt: &'a CodecOptions) -> Self {
		Self {
			layer,
			opt,
			path: TreePath::root(),
		}
	}

	fn native(&self, code: ReturnCode) -> BindError {
		BindError::native(self.path.to_string(), code)
	}

	fn alloc_failed(&self, kind: &'static str) -> BindError {
		debug!(at = %self.path, kind, "native allocation failed");
		BindError::AllocationFailed {
			at: self.path.to_string(),
			kind,
		}
	}

	fn write_dict(&mut self, map: &Mapping, depth: u32) -> Result<NativeDict<'l, L>> {
		check_depth(&self.path, depth, self.opt)?;
		let mut dict = NativeDict::create(self.layer).ok_or_else(|| self.alloc_failed("dict"))?;

		for (key, item) in map {
			self.path.push_key(key);
			self.set_dict_item(&mut dict, key, item, depth)?;
			self.path.pop();
		}
		Ok(dict)
	}

	fn set_dict_item(&mut self, dict: &mut NativeDict<'l, L>, key: &str, item: &Value, depth: u32) -> Result<()> {
		let layer = self.layer;
		let rc = match item {
			Value::Integer(value) => layer.dict_set_int(dict.get_mut(), key, *value),
			Value::Binary(bytes) => layer.dict_set_bindata(dict.get_mut(), key, bytes),
			Value::Mapping(map) => {
				let child = self.write_dict(map, depth + 1)?;
				layer.dict_set_dict(dict.get_mut(), key, child.get())
			}
			Value::Sequence(items) => {
				let child = self.write_list(items, depth + 1)?;
				layer.dict_set_list(dict.get_mut(), key, child.get())
			}
		};
		rc.map_err(|code| self.native(code))
	}

	fn write_list(&mut self, items: &[Value], depth: u32) -> Result<NativeList<'l, L>> {
		check_depth(&self.path, depth, self.opt)?;
		let mut list = NativeList::create(self.layer).ok_or_else(|| self.alloc_failed("list"))?;

		for (index, item) in items.iter().enumerate() {
			self.path.push_index(index);
			self.set_list_item(&mut list, index, item, depth)?;
			self.path.pop();
		}
		Ok(list)
	}

	fn set_list_item(&mut self, list: &mut NativeList<'l, L>, index: usize, item: &Value, depth: u32) -> Result<()> {
		let layer = self.layer;
		let rc = match item {
			Value::Integer(value) => layer.list_set_int(list.get_mut(), index, *value),
			Value::Binary(bytes) => layer.list_set_bindata(list.get_mut(), index, bytes),
			Value::Mapping(map) => {
				let child = self.write_dict(map, depth + 1)?;
				layer.list_set_dict(list.get_mut(), index, child.get())
			}
			Value::Sequence(items) => {
				let child = self.write_list(items, depth + 1)?;
				layer.list_set_list(list.get_mut(), index, child.get())
			}
		};
		rc.map_err(|code| self.native(code))
	}
}
