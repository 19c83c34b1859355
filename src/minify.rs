//! OpenCL C source minifier
//!
//! Removes comments and whitespace the device compiler does not need while
//! keeping the token stream intact. Works at the lexical level only: the
//! language is never parsed.
//!
//! Layout of the output:
//! - plain code is joined onto as few lines as possible,
//! - every preprocessor directive sits on its own line,
//! - there is no trailing newline.
//!
//! A space survives between two tokens only when dropping it would fuse
//! them into something else (`a b`, `+ +`, `1e +1`, `L "x"`), and after the
//! macro name of `#define NAME (...)`, where it separates object-like from
//! function-like macros.

use crate::error::{ClgenError, ClgenResult, LiteralKind};

/// Punctuator pairs that lex differently when written without a space.
const FUSING_PAIRS: &[&str] = &[
    "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "<=", ">=", "==",
    "!=", "&&", "||", "->", "##", "//", "/*", "::", "..", "<:", ":>", "<%", "%>", "%:",
];

/// Directives whose body is kept as written apart from whitespace collapse.
const VERBATIM_DIRECTIVES: &[&str] = &[
    "include", "import", "pragma", "error", "warning", "line", "ident", "sccs",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tok {
    Word,
    Number,
    Punct,
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Directive {
    /// Saw `#`, directive name not read yet
    Start,
    Define,
    Verbatim,
    Plain,
}

/// Minify OpenCL C source text.
pub fn minify(text: &str) -> ClgenResult<String> {
    let mut m = Minifier::new(&text.replace("\r\n", "\n"));
    m.run()?;
    Ok(m.out)
}

/// Splice backslash-newline continuations.
///
/// Returns the spliced characters and, for each removed continuation, the
/// index in the spliced text it stood before.
fn splice(text: &str) -> (Vec<char>, Vec<usize>) {
    let mut src = Vec::with_capacity(text.len());
    let mut splices = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'\n') {
            chars.next();
            splices.push(src.len());
        } else {
            src.push(c);
        }
    }
    (src, splices)
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\x0b' | '\x0c')
}

struct Minifier {
    src: Vec<char>,
    pos: usize,
    /// Lines seen in the spliced text; see [`Minifier::source_line`]
    line: usize,
    splices: Vec<usize>,
    out: String,

    line_start: bool,
    pending_space: bool,
    need_newline: bool,
    last: Option<Tok>,

    directive: Option<Directive>,
    directive_tokens: usize,
}

impl Minifier {
    fn new(text: &str) -> Self {
        let (src, splices) = splice(text);
        Self {
            src,
            pos: 0,
            line: 1,
            splices,
            out: String::with_capacity(text.len()),
            line_start: true,
            pending_space: false,
            need_newline: false,
            last: None,
            directive: None,
            directive_tokens: 0,
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.src.get(self.pos + offset).copied()
    }

    /// 1-based line of the current position in the unspliced input
    fn source_line(&self) -> usize {
        self.line + self.splices.partition_point(|&at| at <= self.pos)
    }

    fn run(&mut self) -> ClgenResult<()> {
        while let Some(c) = self.peek(0) {
            match c {
                '\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.end_of_line();
                }
                c if is_blank(c) => {
                    self.pos += 1;
                    self.pending_space = true;
                }
                '/' if self.peek(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek(1) == Some('*') => self.skip_block_comment()?,
                '"' => {
                    let lit = self.read_literal('"', LiteralKind::String)?;
                    self.emit(&lit, Tok::Literal);
                }
                '#' if self.line_start => {
                    self.pos += 1;
                    if !self.out.is_empty() {
                        self.need_newline = true;
                    }
                    self.directive = Some(Directive::Start);
                    self.directive_tokens = 0;
                    self.emit("#", Tok::Punct);
                }
                _ if self.directive == Some(Directive::Verbatim) => {
                    self.pos += 1;
                    let mut buf = [0u8; 4];
                    self.emit(c.encode_utf8(&mut buf), Tok::Punct);
                }
                '\'' => {
                    let lit = self.read_literal('\'', LiteralKind::Char)?;
                    self.emit(&lit, Tok::Literal);
                }
                c if c.is_ascii_digit()
                    || (c == '.' && self.peek(1).is_some_and(|n| n.is_ascii_digit())) =>
                {
                    let num = self.read_number();
                    self.emit(&num, Tok::Number);
                }
                c if is_word(c) => {
                    let word = self.read_word();
                    if self.directive == Some(Directive::Start) {
                        self.directive = Some(if word == "define" {
                            Directive::Define
                        } else if VERBATIM_DIRECTIVES.contains(&word.as_str()) {
                            Directive::Verbatim
                        } else {
                            Directive::Plain
                        });
                    }
                    self.emit(&word, Tok::Word);
                }
                _ => {
                    self.pos += 1;
                    let mut buf = [0u8; 4];
                    self.emit(c.encode_utf8(&mut buf), Tok::Punct);
                }
            }
        }
        Ok(())
    }

    fn end_of_line(&mut self) {
        if self.directive.take().is_some() {
            self.need_newline = true;
        }
        self.pending_space = true;
        self.line_start = true;
    }

    fn emit(&mut self, tok: &str, kind: Tok) {
        if self.need_newline {
            // A trailing backslash would splice the next line on re-read.
            if self.out.ends_with('\\') {
                self.out.push(' ');
            }
            self.out.push('\n');
            self.need_newline = false;
        } else if self.pending_space && self.needs_space(tok, kind) {
            self.out.push(' ');
        }

        self.out.push_str(tok);
        self.pending_space = false;
        self.line_start = false;
        self.last = Some(kind);
        if let Some(directive) = self.directive {
            // `# 1 "file"` and other non-word directive names
            if directive == Directive::Start && self.directive_tokens > 0 {
                self.directive = Some(Directive::Plain);
            }
            self.directive_tokens += 1;
        }
    }

    fn needs_space(&self, tok: &str, kind: Tok) -> bool {
        let (Some(prev), Some(last)) = (self.out.chars().next_back(), self.last) else {
            return false;
        };
        if prev == '\n' {
            return false;
        }
        let Some(next) = tok.chars().next() else {
            return false;
        };

        match self.directive {
            Some(Directive::Verbatim) if self.directive_tokens >= 2 => return true,
            // `#define NAME (x)` is object-like; `#define NAME(x)` is not
            Some(Directive::Define) if self.directive_tokens == 3 => return true,
            _ => {}
        }

        if is_word(prev) && (is_word(next) || kind == Tok::Literal) {
            return true;
        }
        if last == Tok::Literal && is_word(next) {
            return true;
        }
        if last == Tok::Number && matches!(prev, 'e' | 'E' | 'p' | 'P') && matches!(next, '+' | '-')
        {
            return true;
        }
        if kind == Tok::Number && next == '.' && matches!(last, Tok::Word | Tok::Number) {
            return true;
        }
        if last == Tok::Punct && kind == Tok::Punct {
            let mut pair = String::with_capacity(2);
            pair.push(prev);
            pair.push(next);
            return FUSING_PAIRS.contains(&pair.as_str());
        }
        false
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
        self.pending_space = true;
    }

    fn skip_block_comment(&mut self) -> ClgenResult<()> {
        let start_line = self.source_line();
        self.pos += 2;
        loop {
            match self.peek(0) {
                None => {
                    return Err(ClgenError::UnterminatedLiteral {
                        kind: LiteralKind::BlockComment,
                        line: start_line,
                    })
                }
                Some('*') if self.peek(1) == Some('/') => {
                    self.pos += 2;
                    break;
                }
                Some(c) => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    self.pos += 1;
                }
            }
        }
        self.pending_space = true;
        Ok(())
    }

    fn read_literal(&mut self, quote: char, kind: LiteralKind) -> ClgenResult<String> {
        let unterminated = ClgenError::UnterminatedLiteral {
            kind,
            line: self.source_line(),
        };
        let mut lit = String::new();
        lit.push(quote);
        self.pos += 1;

        loop {
            match self.peek(0) {
                None | Some('\n') => return Err(unterminated),
                Some('\\') => {
                    lit.push('\\');
                    self.pos += 1;
                    match self.peek(0) {
                        None | Some('\n') => return Err(unterminated),
                        Some(escaped) => {
                            lit.push(escaped);
                            self.pos += 1;
                        }
                    }
                }
                Some(c) => {
                    lit.push(c);
                    self.pos += 1;
                    if c == quote {
                        return Ok(lit);
                    }
                }
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek(0) {
            if !is_word(c) {
                break;
            }
            word.push(c);
            self.pos += 1;
        }
        word
    }

    /// Preprocessing number: digits, letters, `.`, and a sign after an exponent.
    fn read_number(&mut self) -> String {
        let mut num = String::new();
        while let Some(c) = self.peek(0) {
            let signed_exponent =
                matches!(c, '+' | '-') && num.ends_with(['e', 'E', 'p', 'P']);
            if !(is_word(c) || c == '.' || signed_exponent) {
                break;
            }
            num.push(c);
            self.pos += 1;
        }
        num
    }
}
