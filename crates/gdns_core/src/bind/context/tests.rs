use std::cell::RefCell;

use crate::bind::{
	BindError, CodecOptions, Context, Mapping, MemoryDict, MemoryLayer, MemoryList, MemoryNode, NativeResult, Resolver, RespStatus, ReturnCode, RrType,
	Value,
};

#[derive(Debug, Default)]
struct Call {
	operation: &'static str,
	name: Option<String>,
	request_type: Option<u16>,
	address: Option<MemoryDict>,
	extensions: Option<MemoryDict>,
}

#[derive(Default)]
struct FakeResolver {
	layer: MemoryLayer,
	fail_with: Option<ReturnCode>,
	calls: RefCell<Vec<Call>>,
}

impl FakeResolver {
	fn failing(code: ReturnCode) -> Self {
		Self {
			fail_with: Some(code),
			..Self::default()
		}
	}

	fn respond(&self, call: Call) -> NativeResult<MemoryDict> {
		self.calls.borrow_mut().push(call);
		if let Some(code) = self.fail_with {
			return Err(code);
		}
		let answer = MemoryDict::new()
			.with("address_type", "IPv4")
			.with("address_data", vec![213_u8, 138, 101, 137]);
		Ok(self.layer.adopt(
			MemoryDict::new()
				.with("status", 900_u32)
				.with("answer_type", 800_u32)
				.with("just_address_answers", MemoryList::new().with(answer)),
		))
	}
}

impl Resolver for FakeResolver {
	type Layer = MemoryLayer;

	fn layer(&self) -> &MemoryLayer {
		&self.layer
	}

	fn address_sync(&self, name: &str, extensions: Option<&MemoryDict>) -> NativeResult<MemoryDict> {
		self.respond(Call {
			operation: "address",
			name: Some(name.to_owned()),
			extensions: extensions.cloned(),
			..Call::default()
		})
	}

	fn general_sync(&self, name: &str, request_type: u16, extensions: Option<&MemoryDict>) -> NativeResult<MemoryDict> {
		self.respond(Call {
			operation: "general",
			name: Some(name.to_owned()),
			request_type: Some(request_type),
			extensions: extensions.cloned(),
			..Call::default()
		})
	}

	fn service_sync(&self, name: &str, extensions: Option<&MemoryDict>) -> NativeResult<MemoryDict> {
		self.respond(Call {
			operation: "service",
			name: Some(name.to_owned()),
			extensions: extensions.cloned(),
			..Call::default()
		})
	}

	fn hostname_sync(&self, address: &MemoryDict, extensions: Option<&MemoryDict>) -> NativeResult<MemoryDict> {
		self.respond(Call {
			operation: "hostname",
			address: Some(address.clone()),
			extensions: extensions.cloned(),
			..Call::default()
		})
	}
}

fn exts(entries: &[(&str, Value)]) -> Mapping {
	entries.iter().map(|(key, value)| ((*key).to_owned(), value.clone())).collect()
}

#[test]
fn address_query_passes_serialized_extensions() {
	let ctx = Context::new(FakeResolver::default());
	let extensions = exts(&[("return_both_v4_and_v6", Value::Integer(1))]);

	let result = ctx.address("getdnsapi.net", Some(&extensions)).expect("query succeeds");
	assert_eq!(result.status().expect("status"), RespStatus::GOOD);
	let answers = result.just_address_answers().expect("answers decode");
	assert_eq!(answers[0].get("address_data"), Some(&Value::text("213.138.101.137")));

	let calls = ctx.resolver().calls.borrow();
	assert_eq!(calls[0].operation, "address");
	assert_eq!(calls[0].name.as_deref(), Some("getdnsapi.net"));
	let sent = calls[0].extensions.as_ref().expect("extensions sent");
	assert_eq!(sent.get("return_both_v4_and_v6"), Some(&MemoryNode::Int(1)));
}

#[test]
fn invalid_extensions_never_reach_the_resolver() {
	let ctx = Context::new(FakeResolver::default());
	let extensions = exts(&[("nonexistent_key", Value::Integer(1))]);

	let err = ctx.address("getdnsapi.net", Some(&extensions)).err().expect("unknown extension should fail");
	assert_eq!(err.return_code(), ReturnCode::NO_SUCH_EXTENSION);
	assert!(ctx.resolver().calls.borrow().is_empty());
	assert_eq!(ctx.resolver().layer.live_handles(), 0);
}

#[test]
fn general_and_service_forward_their_arguments() {
	let ctx = Context::new(FakeResolver::default());
	ctx.general("example.com", RrType::MX.0, None).expect("general succeeds");
	ctx.service("_xmpp-server._tcp.example.com", None).expect("service succeeds");

	let calls = ctx.resolver().calls.borrow();
	assert_eq!(calls[0].operation, "general");
	assert_eq!(calls[0].request_type, Some(15));
	assert!(calls[0].extensions.is_none());
	assert_eq!(calls[1].operation, "service");
	assert_eq!(calls[1].name.as_deref(), Some("_xmpp-server._tcp.example.com"));
}

#[test]
fn hostname_query_sends_wire_shaped_address() {
	let ctx = Context::new(FakeResolver::default());
	let address = exts(&[("address_type", Value::text("IPv4")), ("address_data", Value::text("8.8.8.8"))]);

	ctx.hostname(&address, None).expect("hostname succeeds");

	let calls = ctx.resolver().calls.borrow();
	let sent = calls[0].address.as_ref().expect("address sent");
	assert_eq!(sent.get("address_data"), Some(&MemoryNode::Bindata(vec![8, 8, 8, 8])));
	assert_eq!(sent.get("address_type"), Some(&MemoryNode::Bindata(b"IPv4".to_vec())));
}

#[test]
fn bad_address_record_fails_before_the_call() {
	let ctx = Context::new(FakeResolver::default());
	let address = exts(&[("address_type", Value::text("IPv4")), ("address_data", Value::text("not-an-ip"))]);

	let err = ctx.hostname(&address, None).err().expect("bad address should fail");
	assert!(matches!(err, BindError::InvalidAddress { .. }));
	assert!(ctx.resolver().calls.borrow().is_empty());
}

#[test]
fn native_failure_is_tagged_with_operation() {
	let ctx = Context::new(FakeResolver::failing(ReturnCode::BAD_DOMAIN_NAME));
	let extensions = exts(&[("dnssec_return_status", Value::Integer(1))]);

	let err = ctx.address("bad..name", Some(&extensions)).err().expect("native failure should surface");
	assert_eq!(
		err,
		BindError::Native {
			at: "address".to_owned(),
			code: 300,
			message: "Badly-formed domain name in first argument",
		}
	);
	assert_eq!(ctx.resolver().layer.live_handles(), 0, "request extensions released");
}

#[test]
fn responses_are_released_with_the_result() {
	let ctx = Context::with_options(FakeResolver::default(), CodecOptions { max_depth: 8 });
	let result = ctx.address("getdnsapi.net", None).expect("query succeeds");
	assert_eq!(ctx.resolver().layer.live_handles(), 1);
	drop(result);
	assert_eq!(ctx.resolver().layer.live_handles(), 0);
	assert_eq!(ctx.options().max_depth, 8);
}
