use crate::bind::{AddressFamily, BindError, CodecOptions, Mapping, MemoryLayer, Value, decode_address, decode_address_list, encode_address};

const PIN: &str = "pin-sha256=\"E9CZ9INDbd+2eRQozYqqbQ2yXLVKB9+xcprMF+44U1g=\"";

fn record<const N: usize>(entries: [(&str, Value); N]) -> Mapping {
	entries.into_iter().map(|(key, value)| (key.to_owned(), value)).collect()
}

fn encode(record: &Mapping) -> crate::bind::Result<Mapping> {
	encode_address(&MemoryLayer::new(), record, &CodecOptions::default())
}

#[test]
fn ipv4_record_round_trips_through_wire_shape() {
	let user = record([("address_type", Value::text("IPv4")), ("address_data", Value::text("213.138.101.137"))]);

	let wire = encode(&user).expect("record encodes");
	assert_eq!(wire.get("address_type"), Some(&Value::Binary(b"IPv4".to_vec())));
	assert_eq!(wire.get("address_data"), Some(&Value::Binary(vec![213, 138, 101, 137])));

	let back = decode_address(&wire).expect("record decodes");
	assert_eq!(back, user);
}

#[test]
fn ipv6_record_round_trips_through_wire_shape() {
	let user = record([
		("address_type", Value::text("IPv6")),
		("address_data", Value::text("2001:41c8:51:189:feff:ff:fe00:b1c")),
	]);

	let wire = encode(&user).expect("record encodes");
	assert_eq!(wire.get("address_data").and_then(Value::as_binary).map(<[u8]>::len), Some(16));
	assert_eq!(decode_address(&wire).expect("record decodes"), user);
}

#[test]
fn unparsable_address_is_invalid_address() {
	let user = record([("address_type", Value::text("IPv4")), ("address_data", Value::text("not-an-ip"))]);
	let err = encode(&user).expect_err("bad literal should fail");
	assert_eq!(
		err,
		BindError::InvalidAddress {
			family: "IPv4",
			value: "not-an-ip".to_owned(),
		}
	);
}

#[test]
fn unknown_family_is_invalid_parameter() {
	let user = record([("address_type", Value::text("IPv7")), ("address_data", Value::text("213.138.101.137"))]);
	let err = encode(&user).expect_err("IPv7 should fail");
	assert!(matches!(&err, BindError::InvalidParameter { at, .. } if at == "address_type"));
}

#[test]
fn ipv6_literal_does_not_narrow_to_ipv4() {
	let user = record([("address_type", Value::text("IPv4")), ("address_data", Value::text("2001:db8::1"))]);
	let err = encode(&user).expect_err("v6 literal in v4 record should fail");
	assert!(matches!(err, BindError::InvalidAddress { family: "IPv4", .. }));
}

#[test]
fn ipv4_literal_widens_to_mapped_ipv6() {
	let user = record([("address_type", Value::text("IPv6")), ("address_data", Value::text("192.0.2.1"))]);
	let wire = encode(&user).expect("v4 literal widens");
	let mut expected = vec![0_u8; 10];
	expected.extend([0xff, 0xff, 192, 0, 2, 1]);
	assert_eq!(wire.get("address_data"), Some(&Value::Binary(expected)));
}

#[test]
fn widened_ipv4_decodes_back_to_dotted_text() {
	let user = record([("address_type", Value::text("IPv6")), ("address_data", Value::text("213.138.101.137"))]);
	let wire = encode(&user).expect("v4 literal widens");
	let back = decode_address(&wire).expect("record decodes");
	assert_eq!(back.get("address_data"), Some(&Value::text("213.138.101.137")));
	assert_eq!(back.get("address_type"), Some(&Value::text("IPv6")));
}

#[test]
fn undecodable_address_text_is_reported_as_hex() {
	let user = record([("address_type", Value::text("IPv4")), ("address_data", Value::Binary(vec![0xff, 0xfe]))]);
	let err = encode(&user).expect_err("non-utf8 literal should fail");
	assert_eq!(
		err,
		BindError::InvalidAddress {
			family: "IPv4",
			value: "fffe".to_owned(),
		}
	);
}

#[test]
fn auxiliary_fields_follow_shape_rules() {
	let user = record([
		("address_type", Value::text("IPv4")),
		("address_data", Value::text("192.0.2.53")),
		("port", Value::Integer(53)),
		("tls_port", Value::Integer(853)),
		("tsig_name", Value::text("hmac-key.")),
		("tls_pubkey_pinset", Value::Sequence(vec![Value::text(PIN)])),
	]);

	let wire = encode(&user).expect("record with auxiliaries encodes");
	assert_eq!(wire.get("port"), Some(&Value::Integer(53)));
	assert_eq!(wire.get("tsig_name"), Some(&Value::text("hmac-key.")));
	let pins = wire.get("tls_pubkey_pinset").and_then(Value::as_sequence).expect("pinset present");
	assert_eq!(pins[0].get("digest"), Some(&Value::text("sha256")));
	assert_eq!(pins[0].get("value").and_then(Value::as_binary).map(<[u8]>::len), Some(32));
}

#[test]
fn pin_handles_are_released() {
	let layer = MemoryLayer::new();
	let user = record([
		("address_type", Value::text("IPv4")),
		("address_data", Value::text("192.0.2.53")),
		("tls_pubkey_pinset", Value::Sequence(vec![Value::text(PIN), Value::text(PIN)])),
	]);
	encode_address(&layer, &user, &CodecOptions::default()).expect("record encodes");
	assert_eq!(layer.allocations(), 2);
	assert_eq!(layer.live_handles(), 0);
}

#[test]
fn rejects_bad_auxiliary_fields() {
	let base = [("address_type", Value::text("IPv4")), ("address_data", Value::text("192.0.2.53"))];
	let cases = [
		("port", Value::text("53"), "port"),
		("port", Value::Integer(70_000), "port"),
		("scope_id", Value::Integer(1), "scope_id"),
		("tls_pubkey_pinset", Value::Sequence(Vec::new()), "tls_pubkey_pinset"),
		("tls_pubkey_pinset", Value::Sequence(vec![Value::text("sha256=oops")]), "tls_pubkey_pinset[0]"),
		("weight", Value::Integer(1), "weight"),
	];

	for (key, value, expected_at) in cases {
		let mut user = record(base.clone());
		user.insert(key.to_owned(), value);
		let err = encode(&user).expect_err("bad auxiliary field should fail");
		assert!(
			matches!(&err, BindError::InvalidParameter { at, .. } if at == expected_at),
			"unexpected error for {key}: {err}"
		);
	}
}

#[test]
fn decode_keeps_other_keys_untouched() {
	let wire = record([
		("address_type", Value::text("IPv4")),
		("address_data", Value::Binary(vec![192, 0, 2, 1])),
		("port", Value::Integer(853)),
	]);
	let user = decode_address(&wire).expect("record decodes");
	assert_eq!(user.get("address_data"), Some(&Value::text("192.0.2.1")));
	assert_eq!(user.get("port"), Some(&Value::Integer(853)));
}

#[test]
fn decode_rejects_width_mismatch() {
	let wire = record([("address_type", Value::text("IPv6")), ("address_data", Value::Binary(vec![192, 0, 2, 1]))]);
	let err = decode_address(&wire).expect_err("4 bytes for IPv6 should fail");
	assert_eq!(
		err,
		BindError::InvalidAddress {
			family: "IPv6",
			value: "c0000201".to_owned(),
		}
	);
}

#[test]
fn list_decode_preserves_order_and_stops_at_first_error() {
	let v6 = Value::mapping([
		("address_type", Value::text("IPv6")),
		("address_data", Value::Binary(vec![0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1])),
	]);
	let v4 = Value::mapping([("address_type", Value::text("IPv4")), ("address_data", Value::Binary(vec![192, 0, 2, 1]))]);

	let decoded = decode_address_list(&[v6.clone(), v4.clone()]).expect("list decodes");
	assert_eq!(decoded[0].get("address_data"), Some(&Value::text("2001:db8::1")));
	assert_eq!(decoded[1].get("address_data"), Some(&Value::text("192.0.2.1")));

	let err = decode_address_list(&[v4, Value::Integer(7), v6]).expect_err("non-mapping element should fail");
	assert!(matches!(&err, BindError::InvalidParameter { at, .. } if at == "[1]"));
}

#[test]
fn family_labels_are_exact() {
	assert_eq!(AddressFamily::from_label(b"IPv4"), Some(AddressFamily::V4));
	assert_eq!(AddressFamily::from_label(b"ipv4"), None);
	assert_eq!(AddressFamily::V6.width(), 16);
}
