//! Property tests for the header encoder.

use proptest::prelude::*;

use clgen::{decode, encode_many, encode_one, ClgenError, EncodeOptions, HeaderBundle};

fn identifier() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z_][A-Za-z0-9_]{0,12}").unwrap()
}

fn options() -> impl Strategy<Value = EncodeOptions> {
    (any::<bool>(), proptest::option::of("[ -~]{0,40}")).prop_map(|(size_constants, banner)| {
        EncodeOptions {
            size_constants,
            banner,
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: decoding a header reproduces the text byte for byte,
    /// including NUL, newlines and non-ASCII.
    #[test]
    fn property_encode_decode_round_trip(
        id in identifier(),
        chars in proptest::collection::vec(any::<char>(), 0..300),
        opts in options(),
    ) {
        let text: String = chars.into_iter().collect();
        let header = encode_one("xmrig", &id, &text, &opts).unwrap();
        let decoded = decode(&header).unwrap();

        prop_assert_eq!(decoded.len(), 1);
        prop_assert_eq!(&decoded[&id], text.as_bytes());
    }

    /// PROPERTY: arrays are NUL-terminated and sized one past the text.
    #[test]
    fn property_array_size_includes_terminator(text in "\\PC{0,64}") {
        let header = encode_one("xmrig", "k", &text, &EncodeOptions::default()).unwrap();
        let declaration = format!("static const char k[{}] = {{", text.len() + 1);
        prop_assert!(header.contains(&declaration));
        prop_assert!(header.contains("0x00\n};"), "header missing array terminator");
    }

    /// PROPERTY: every item of a bundle decodes under its own name, in order.
    #[test]
    fn property_bundle_round_trip(
        items in proptest::collection::btree_map(identifier(), "\\PC{0,80}", 1..8),
        opts in options(),
    ) {
        // `<id>_size` constants may collide with another item's name
        let opts = EncodeOptions { size_constants: false, ..opts };
        let header = encode_many("a::b", items.clone(), &opts).unwrap();
        let decoded = decode(&header).unwrap();

        let expected: Vec<(&String, &[u8])> =
            items.iter().map(|(k, v)| (k, v.as_bytes())).collect();
        let actual: Vec<(&String, &[u8])> =
            decoded.iter().map(|(k, v)| (k, v.as_slice())).collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(header.contains("namespace a::b {"), "header missing namespace");
    }

    /// PROPERTY: binding an identifier twice is rejected.
    #[test]
    fn property_duplicate_identifier_rejected(id in identifier(), a in "\\PC{0,16}", b in "\\PC{0,16}") {
        let mut bundle = HeaderBundle::new("xmrig").unwrap();
        bundle.insert(id.clone(), a).unwrap();

        let err = bundle.insert(id.clone(), b).unwrap_err();
        prop_assert!(matches!(err, ClgenError::DuplicateIdentifier { identifier } if identifier == id), "expected DuplicateIdentifier");
        prop_assert_eq!(bundle.len(), 1);
    }

    /// PROPERTY: bytes above 0x7f are `char` literals, never `int` hex
    /// values that would narrow in a `char` initializer.
    #[test]
    fn property_high_bytes_never_narrow(text in "\\PC{0,64}") {
        let header = encode_one("xmrig", "k", &text, &EncodeOptions::default()).unwrap();
        for b in text.bytes().filter(|b| !b.is_ascii()) {
            let narrowing = format!("0x{b:02x}");
            prop_assert!(!header.contains(&narrowing), "{} in {}", narrowing, header);
        }
    }

    /// PROPERTY: no array line carries more than 16 bytes.
    #[test]
    fn property_line_width(text in "\\PC{0,200}") {
        let header = encode_one("xmrig", "k", &text, &EncodeOptions::default()).unwrap();
        for line in header
            .lines()
            .filter(|l| l.trim_start().starts_with("0x") || l.trim_start().starts_with('\''))
        {
            prop_assert!(line.split(',').filter(|b| !b.trim().is_empty()).count() <= 16);
        }
    }
}
