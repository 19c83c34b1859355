//! Property tests for include resolution against a real directory.

use std::fs;
use std::path::Path;

use proptest::prelude::*;

use clgen::{apply_substitutions, resolve, ClgenError, LocalFs};

fn name(i: usize) -> String {
    format!("f{i}.cl")
}

/// Write a chain `f0.cl -> f1.cl -> ... -> f{depth}.cl`; the last file
/// includes `f{back_to}.cl` when given.
fn write_chain(dir: &Path, depth: usize, indent: &str, back_to: Option<usize>) {
    for i in 0..=depth {
        let next = if i < depth { Some(i + 1) } else { back_to };
        let text = match next {
            Some(n) => format!("// f{i}\n{indent}#include \"{}\"\n", name(n)),
            None => format!("// end {i}\n"),
        };
        fs::write(dir.join(name(i)), text).unwrap();
    }
}

fn expected_chain(i: usize, depth: usize, indent: &str) -> String {
    if i == depth {
        format!("// end {i}\n")
    } else {
        format!("// f{i}\n{indent}{}\n", expected_chain(i + 1, depth, indent))
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 32,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a chain of known includes resolves to the nested texts,
    /// keeping each directive's indentation.
    #[test]
    fn property_chain_resolves(depth in 0usize..6, indent in "[ \t]{0,3}") {
        let dir = tempfile::tempdir().unwrap();
        write_chain(dir.path(), depth, &indent, None);
        let known: Vec<String> = (1..=depth).map(name).collect();

        let resolved = resolve(&LocalFs::new(), dir.path(), &name(0), &known).unwrap();
        prop_assert_eq!(resolved, expected_chain(0, depth, &indent));
    }

    /// PROPERTY: an include leading back into the chain is a cycle.
    #[test]
    fn property_back_edge_is_cycle(depth in 1usize..6, back in 0usize..6) {
        let back_to = back % (depth + 1);
        let dir = tempfile::tempdir().unwrap();
        write_chain(dir.path(), depth, "", Some(back_to));
        let known: Vec<String> = (0..=depth).map(name).collect();

        let err = resolve(&LocalFs::new(), dir.path(), &name(0), &known).unwrap_err();
        match err {
            ClgenError::IncludeCycle { chain } => {
                let mut expected: Vec<String> = (0..=depth).map(name).collect();
                expected.push(name(back_to));
                prop_assert_eq!(chain, expected);
            }
            other => prop_assert!(false, "expected cycle, got {other}"),
        }
    }

    /// PROPERTY: any known include missing from disk fails the whole item.
    #[test]
    fn property_missing_known_file(depth in 1usize..6, missing in 1usize..6) {
        let missing = 1 + missing % depth;
        let dir = tempfile::tempdir().unwrap();
        write_chain(dir.path(), depth, "", None);
        fs::remove_file(dir.path().join(name(missing))).unwrap();
        let known: Vec<String> = (1..=depth).map(name).collect();

        let err = resolve(&LocalFs::new(), dir.path(), &name(0), &known).unwrap_err();
        prop_assert!(
            matches!(&err, ClgenError::MissingFile { path } if path.ends_with(name(missing))),
            "unexpected error: {}",
            err
        );
    }

    /// PROPERTY: includes outside the known set pass through untouched.
    #[test]
    fn property_unknown_includes_untouched(lines in proptest::collection::vec("[a-z ]{0,12}", 0..8)) {
        let dir = tempfile::tempdir().unwrap();
        let mut text = String::from("#include \"other.h\"\n");
        for line in &lines {
            text.push_str(line);
            text.push('\n');
        }
        fs::write(dir.path().join("main.cl"), &text).unwrap();

        let resolved = resolve(&LocalFs::new(), dir.path(), "main.cl", &[] as &[&str]).unwrap();
        prop_assert_eq!(&resolved, &text);
        prop_assert_eq!(apply_substitutions(&resolved, &Default::default()), text);
    }
}
