//! C++ header encoding
//!
//! Each item becomes a `static const char name[N]` array of hex bytes with a
//! trailing `0x00`, so any byte sequence (NUL, non-ASCII, newlines) embeds
//! without escaping rules. Bytes from `0x80` up are written as `'\xNN'`
//! character literals: an `int` above 127 in a `char` brace initializer is a
//! narrowing error in C++11. The single-item form is the bundle form with one
//! entry.

use indexmap::IndexMap;

use crate::error::{ClgenError, ClgenResult};

const BYTES_PER_LINE: usize = 16;
const INDENT: &str = "    ";

/// Rendering switches shared by every item in a header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Emit `static const unsigned int <name>_size = <len>;` after each array
    pub size_constants: bool,
    /// Comment line written above `#pragma once`
    pub banner: Option<String>,
}

/// Is `s` a valid C identifier?
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_identifier(s: &str) -> ClgenResult<()> {
    if is_identifier(s) {
        Ok(())
    } else {
        Err(ClgenError::InvalidIdentifier {
            identifier: s.to_string(),
        })
    }
}

/// Named texts sharing one namespace and one output file.
///
/// Items render in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBundle {
    namespace: String,
    items: IndexMap<String, String>,
}

impl HeaderBundle {
    /// `namespace` may be nested (`a::b`); every segment must be an identifier.
    pub fn new(namespace: &str) -> ClgenResult<Self> {
        for segment in namespace.split("::") {
            if !is_identifier(segment) {
                return Err(ClgenError::InvalidIdentifier {
                    identifier: namespace.to_string(),
                });
            }
        }
        Ok(Self {
            namespace: namespace.to_string(),
            items: IndexMap::new(),
        })
    }

    pub fn insert(
        &mut self,
        identifier: impl Into<String>,
        text: impl Into<String>,
    ) -> ClgenResult<()> {
        let identifier = identifier.into();
        check_identifier(&identifier)?;
        if self.items.contains_key(&identifier) {
            return Err(ClgenError::DuplicateIdentifier { identifier });
        }
        self.items.insert(identifier, text.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the complete header text.
    pub fn render(&self, options: &EncodeOptions) -> ClgenResult<String> {
        if options.size_constants {
            for identifier in self.items.keys() {
                let size_name = format!("{identifier}_size");
                if self.items.contains_key(&size_name) {
                    return Err(ClgenError::DuplicateIdentifier {
                        identifier: size_name,
                    });
                }
            }
        }

        let mut out = String::new();
        if let Some(banner) = &options.banner {
            for line in banner.lines() {
                out.push_str("// ");
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
        }
        out.push_str("#pragma once\n\n");
        out.push_str(&format!("namespace {} {{\n", self.namespace));

        for (identifier, text) in &self.items {
            out.push('\n');
            render_item(&mut out, identifier, text.as_bytes(), options);
        }

        out.push_str(&format!("\n}} // namespace {}\n", self.namespace));
        Ok(out)
    }
}

fn render_item(out: &mut String, identifier: &str, bytes: &[u8], options: &EncodeOptions) {
    out.push_str(&format!(
        "static const char {}[{}] = {{\n",
        identifier,
        bytes.len() + 1
    ));

    let encoded: Vec<String> = bytes
        .iter()
        .chain(std::iter::once(&0u8))
        .map(|&b| render_byte(b))
        .collect();
    let lines: Vec<String> = encoded
        .chunks(BYTES_PER_LINE)
        .map(|chunk| format!("{INDENT}{}", chunk.join(",")))
        .collect();
    out.push_str(&lines.join(",\n"));
    out.push_str("\n};\n");

    if options.size_constants {
        out.push_str(&format!(
            "static const unsigned int {}_size = {};\n",
            identifier,
            bytes.len()
        ));
    }
}

fn render_byte(b: u8) -> String {
    if b.is_ascii() {
        format!("0x{b:02x}")
    } else {
        format!("'\\x{b:02x}'")
    }
}

fn parse_byte(token: &str) -> Option<u8> {
    let hex = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("'\\x")?.strip_suffix('\''))?;
    if hex.len() != 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(hex, 16).ok()
}

/// Encode several named texts into one header, in the given order.
pub fn encode_many<I, K, V>(namespace: &str, items: I, options: &EncodeOptions) -> ClgenResult<String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut bundle = HeaderBundle::new(namespace)?;
    for (identifier, text) in items {
        bundle.insert(identifier, text)?;
    }
    bundle.render(options)
}

/// Encode one named text; identical to [`encode_many`] with a single entry.
pub fn encode_one(
    namespace: &str,
    identifier: &str,
    text: &str,
    options: &EncodeOptions,
) -> ClgenResult<String> {
    encode_many(namespace, [(identifier, text)], options)
}

/// Recover the byte arrays from a header produced by [`encode_many`].
///
/// Returned bytes exclude the trailing terminator.
pub fn decode(header: &str) -> ClgenResult<IndexMap<String, Vec<u8>>> {
    let malformed = |message: String| ClgenError::MalformedHeader { message };

    let mut items = IndexMap::new();
    let mut lines = header.lines();
    while let Some(line) = lines.next() {
        let Some(rest) = line.strip_prefix("static const char ") else {
            continue;
        };
        let (identifier, rest) = rest
            .split_once('[')
            .ok_or_else(|| malformed(format!("missing array size in '{line}'")))?;
        let declared: usize = rest
            .split_once(']')
            .and_then(|(n, _)| n.parse().ok())
            .ok_or_else(|| malformed(format!("bad array size in '{line}'")))?;

        let mut bytes = Vec::with_capacity(declared);
        for body in lines.by_ref() {
            if body.trim() == "};" {
                break;
            }
            for token in body.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                let byte = parse_byte(token)
                    .ok_or_else(|| malformed(format!("bad byte '{token}' in {identifier}")))?;
                bytes.push(byte);
            }
        }

        if bytes.len() != declared || bytes.pop() != Some(0) {
            return Err(malformed(format!(
                "{identifier}: declared {declared} bytes, array is not {declared} bytes ending in 0x00"
            )));
        }
        items.insert(identifier.to_string(), bytes);
    }
    Ok(items)
}
