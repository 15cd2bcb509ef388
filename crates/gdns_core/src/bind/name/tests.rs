use crate::bind::{BindError, decode_name, encode_name};

#[test]
fn root_decodes_to_single_dot() {
	assert_eq!(decode_name(&[0]).expect("root decodes"), ".");
}

#[test]
fn empty_wire_is_malformed() {
	let err = decode_name(&[]).expect_err("empty input should fail");
	assert!(matches!(err, BindError::MalformedName { offset: 0, .. }));
}

#[test]
fn decodes_multi_label_name_with_trailing_dot() {
	let wire = b"\x03www\x07example\x03com\x00";
	assert_eq!(decode_name(wire).expect("name decodes"), "www.example.com.");
}

#[test]
fn ignores_bytes_after_terminator() {
	let wire = b"\x03com\x00\xff\xff";
	assert_eq!(decode_name(wire).expect("name decodes"), "com.");
}

#[test]
fn length_byte_above_63_is_malformed() {
	let mut wire = vec![64_u8];
	wire.extend(std::iter::repeat_n(b'a', 64));
	wire.push(0);
	let err = decode_name(&wire).expect_err("oversized label should fail");
	assert!(matches!(err, BindError::MalformedName { offset: 0, .. }));
}

#[test]
fn truncated_label_is_malformed() {
	let err = decode_name(b"\x03www\x07exa").expect_err("truncated label should fail");
	assert!(matches!(err, BindError::MalformedName { offset: 4, .. }));
}

#[test]
fn missing_terminator_is_malformed() {
	let err = decode_name(b"\x03com").expect_err("unterminated name should fail");
	assert!(matches!(err, BindError::MalformedName { .. }));
}

#[test]
fn trailing_dot_is_optional_when_encoding() {
	let bare = encode_name("example.com").expect("bare name encodes");
	let rooted = encode_name("example.com.").expect("rooted name encodes");
	assert_eq!(bare, rooted);
	assert_eq!(bare, b"\x07example\x03com\x00");
}

#[test]
fn root_encodes_to_single_zero() {
	assert_eq!(encode_name(".").expect("root encodes"), vec![0]);
	assert_eq!(encode_name("").expect("empty encodes"), vec![0]);
}

#[test]
fn label_of_64_bytes_is_too_long() {
	let name = format!("{}.com", "a".repeat(64));
	let err = encode_name(&name).expect_err("64-byte label should fail");
	assert!(matches!(err, BindError::LabelTooLong { len: 64, .. }));
}

#[test]
fn empty_interior_label_is_rejected() {
	let err = encode_name("a..b").expect_err("empty label should fail");
	assert!(matches!(err, BindError::MalformedName { offset: 2, .. }));
}

#[test]
fn round_trips_names_across_label_counts_and_sizes() {
	for label_count in [1_usize, 2, 5, 64, 127] {
		for label_len in [1_usize, 7, 63] {
			let labels: Vec<String> = (0..label_count)
				.map(|idx| {
					let ch = char::from(b'a' + (idx % 26) as u8);
					std::iter::repeat_n(ch, label_len).collect()
				})
				.collect();
			let bare = labels.join(".");
			let expected = format!("{bare}.");

			let from_bare = decode_name(&encode_name(&bare).expect("bare encodes")).expect("bare decodes");
			let from_rooted = decode_name(&encode_name(&expected).expect("rooted encodes")).expect("rooted decodes");
			assert_eq!(from_bare, expected);
			assert_eq!(from_rooted, expected);
		}
	}
}

#[test]
fn non_utf8_label_bytes_decode_to_replacement_chars() {
	let name = decode_name(&[2, 0xff, 0xfe, 0]).expect("name decodes");
	assert_eq!(name, "\u{fffd}\u{fffd}.");
}

#[test]
fn dot_inside_label_is_not_escaped() {
	let name = decode_name(b"\x03a.b\x00").expect("name decodes");
	assert_eq!(name, "a.b.");
	assert_eq!(encode_name(&name).expect("name encodes"), b"\x01a\x01b\x00");
}
