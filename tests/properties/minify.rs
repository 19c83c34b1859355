//! Property tests for the minifier.

use proptest::prelude::*;

use clgen::minify;

/// Fragments that exercise spacing, directives, literals and comments.
const FRAGMENTS: &[&str] = &[
    "a", "b1", "_x", "uint", "0x1E", "1e", "1.5", ".5", "+", "-", "*", "/", "=", "<", ">", "&",
    "|", ".", ",", ";", "(", ")", "{", "}", "#", "\"s // t /* u */\"", "'c'", "/* c */", "// c\n",
    " ", "\t", "\n", "\r\n", "#define M(x) x\n", "#define N (1)\n", "#include \"f.cl\"\n",
    "#pragma unroll 4\n", "\\\n",
];

fn source() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(FRAGMENTS), 0..=48)
        .prop_map(|parts| parts.concat())
}

fn identifier() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z_][a-z0-9_]{0,6}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: minify never panics, whatever the input.
    #[test]
    fn property_minify_never_panics(text in "\\PC{0,200}") {
        let _ = minify(&text);
    }

    /// PROPERTY: minifying twice gives the same result as minifying once.
    #[test]
    fn property_minify_idempotent(text in source()) {
        if let Ok(once) = minify(&text) {
            let twice = minify(&once).expect("minified output must minify again");
            prop_assert_eq!(twice, once);
        }
    }

    /// PROPERTY: text that is already minimal comes back unchanged.
    #[test]
    fn property_minimal_text_is_fixed_point(
        statements in proptest::collection::vec((identifier(), identifier(), 0u32..10_000), 1..=12),
    ) {
        let text: String = statements
            .iter()
            .map(|(a, b, n)| format!("uint {a}={b}+{n};"))
            .collect();
        prop_assert_eq!(minify(&text).unwrap(), text);
    }

    /// PROPERTY: comment-like text inside string literals survives.
    #[test]
    fn property_string_contents_survive(content in "[a-z /*]{0,24}") {
        let text = format!("/* lead */ char *s = \"{content}\"; // tail\n");
        let minified = minify(&text).unwrap();
        prop_assert_eq!(minified, format!("char*s=\"{content}\";"));
    }

    /// PROPERTY: every directive stays on its own line.
    #[test]
    fn property_directives_own_lines(
        names in proptest::collection::vec(identifier(), 1..=6),
    ) {
        let text: String = names
            .iter()
            .map(|n| format!("  int {n} ;\n  #define {n}_V 1\n"))
            .collect();
        let minified = minify(&text).unwrap();
        for line in minified.lines() {
            if let Some(pos) = line.find('#') {
                prop_assert_eq!(pos, 0, "directive not at line start: {:?}", line);
            }
        }
        prop_assert_eq!(
            minified.lines().filter(|l| l.starts_with("#define")).count(),
            names.len()
        );
    }
}
