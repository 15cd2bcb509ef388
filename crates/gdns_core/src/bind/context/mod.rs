use tracing::{debug, trace};

use crate::bind::codec::mapping_to_dict;
use crate::bind::{BindError, CodecOptions, Mapping, NativeDict, NativeLayer, NativeResult, QueryResult, Result, encode_address, validate_extensions};

/// Resolution context provided by the resolver library.
///
/// Every query takes an optional extensions dict and returns a response dict
/// created by [`Resolver::layer`], which the caller then owns.
pub trait Resolver {
	/// Tree API the context allocates responses with.
	type Layer: NativeLayer;

	/// Layer backing request and response trees.
	fn layer(&self) -> &Self::Layer;

	/// Address lookup for `name`.
	fn address_sync(&self, name: &str, extensions: Option<&<Self::Layer as NativeLayer>::Dict>) -> NativeResult<<Self::Layer as NativeLayer>::Dict>;

	/// Lookup of an arbitrary record type for `name`.
	fn general_sync(
		&self,
		name: &str,
		request_type: u16,
		extensions: Option<&<Self::Layer as NativeLayer>::Dict>,
	) -> NativeResult<<Self::Layer as NativeLayer>::Dict>;

	/// SRV lookup for `name`.
	fn service_sync(&self, name: &str, extensions: Option<&<Self::Layer as NativeLayer>::Dict>) -> NativeResult<<Self::Layer as NativeLayer>::Dict>;

	/// Reverse lookup for a wire-shaped address record.
	fn hostname_sync(
		&self,
		address: &<Self::Layer as NativeLayer>::Dict,
		extensions: Option<&<Self::Layer as NativeLayer>::Dict>,
	) -> NativeResult<<Self::Layer as NativeLayer>::Dict>;
}

/// Query front end over a [`Resolver`].
pub struct Context<R: Resolver> {
	resolver: R,
	options: CodecOptions,
}

impl<R: Resolver> Context<R> {
	/// Wrap a resolver with default codec options.
	pub fn new(resolver: R) -> Self {
		Self::with_options(resolver, CodecOptions::default())
	}

	/// Wrap a resolver with explicit codec options.
	pub fn with_options(resolver: R, options: CodecOptions) -> Self {
		Self { resolver, options }
	}

	/// Underlying resolver.
	pub fn resolver(&self) -> &R {
		&self.resolver
	}

	/// Codec options used for every query.
	pub fn options(&self) -> &CodecOptions {
		&self.options
	}

	/// Look up the addresses of `name`.
	pub fn address(&self, name: &str, extensions: Option<&Mapping>) -> Result<QueryResult<'_, R::Layer>> {
		trace!(query = name, "address query");
		self.query("address", extensions, |resolver, exts| resolver.address_sync(name, exts))
	}

	/// Look up records of `request_type` for `name`.
	pub fn general(&self, name: &str, request_type: u16, extensions: Option<&Mapping>) -> Result<QueryResult<'_, R::Layer>> {
		trace!(query = name, request_type, "general query");
		self.query("general", extensions, |resolver, exts| resolver.general_sync(name, request_type, exts))
	}

	/// Look up the service records of `name`.
	pub fn service(&self, name: &str, extensions: Option<&Mapping>) -> Result<QueryResult<'_, R::Layer>> {
		trace!(query = name, "service query");
		self.query("service", extensions, |resolver, exts| resolver.service_sync(name, exts))
	}

	/// Look up the host names of a user-shaped address record.
	pub fn hostname(&self, address: &Mapping, extensions: Option<&Mapping>) -> Result<QueryResult<'_, R::Layer>> {
		let layer = self.resolver.layer();
		let wire = encode_address(layer, address, &self.options)?;
		let request = mapping_to_dict(layer, &wire, &self.options)?;
		trace!("hostname query");
		self.query("hostname", extensions, |resolver, exts| resolver.hostname_sync(request.get(), exts))
	}

	fn query<F>(&self, operation: &'static str, extensions: Option<&Mapping>, call: F) -> Result<QueryResult<'_, R::Layer>>
	where
		F: FnOnce(&R, Option<&<R::Layer as NativeLayer>::Dict>) -> NativeResult<<R::Layer as NativeLayer>::Dict>,
	{
		let layer = self.resolver.layer();
		let request = match extensions {
			Some(map) => {
				validate_extensions(map)?;
				Some(mapping_to_dict(layer, map, &self.options)?)
			}
			None => None,
		};

		let response = call(&self.resolver, request.as_ref().map(NativeDict::get)).map_err(|code| {
			debug!(operation, code = code.0, "query failed");
			BindError::native(operation, code)
		})?;
		Ok(QueryResult::new(NativeDict::new(layer, response), self.options.clone()))
	}
}

#[cfg(test)]
mod tests;
