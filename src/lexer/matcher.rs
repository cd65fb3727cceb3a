//! Byte-level token matchers.
//!
//! Every matcher looks at the remaining input and reports how many bytes it would
//! consume, or `None`. [`longest_match`] arbitrates between them.

use super::Kind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub len: usize,
    pub kind: Kind,
}

impl Match {
    fn new(len: usize, kind: Kind) -> Self {
        Self { len, kind }
    }
}

pub type Matcher = fn(&[u8]) -> Option<Match>;

/// Registration order matters: on a tie the later matcher wins.
pub const MATCHERS: &[Matcher] = &[
    match_single_char,
    match_double_char,
    match_float,
    match_int,
    match_atom,
    match_path,
    match_flag,
    match_string,
    match_comment,
    match_command,
    match_whitespace,
    match_identifier,
];

/// Run every matcher and keep the longest result. Falls back to an invalid token
/// running up to the next whitespace.
pub fn longest_match(bytes: &[u8]) -> Match {
    let mut best: Option<Match> = None;
    for matcher in MATCHERS {
        let Some(found) = matcher(bytes) else {
            continue;
        };
        if found.len == 0 {
            continue;
        }
        if best.is_none_or(|best| found.len >= best.len) {
            best = Some(found);
        }
    }

    best.unwrap_or_else(|| match_unknown(bytes))
}

fn is_alpha(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

fn is_decimal(byte: u8) -> bool {
    byte.is_ascii_digit()
}

fn is_octal(byte: u8) -> bool {
    (b'0'..=b'7').contains(&byte)
}

fn is_binary(byte: u8) -> bool {
    byte == b'0' || byte == b'1'
}

fn is_hex(byte: u8) -> bool {
    byte.is_ascii_hexdigit()
}

pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\n' | b'\t' | b'\r' | b',')
}

pub fn match_single_char(bytes: &[u8]) -> Option<Match> {
    let kind = match bytes.first()? {
        b'+' => Kind::Plus,
        b'-' => Kind::Minus,
        b'/' => Kind::Divide,
        b'*' => Kind::Multiply,
        b'>' => Kind::GreaterThan,
        b'<' => Kind::LessThan,
        b'(' => Kind::OpenParen,
        b')' => Kind::CloseParen,
        b'{' => Kind::OpenCurly,
        b'}' => Kind::CloseCurly,
        b'[' => Kind::OpenSquare,
        b']' => Kind::CloseSquare,
        b'.' => Kind::Path,
        _ => return None,
    };

    Some(Match::new(1, kind))
}

pub fn match_double_char(bytes: &[u8]) -> Option<Match> {
    let kind = match bytes.get(..2)? {
        b">=" => Kind::GreaterEqual,
        b"<=" => Kind::LessEqual,
        b"==" => Kind::Equal,
        b"./" | b".." => Kind::Path,
        _ => return None,
    };

    Some(Match::new(2, kind))
}

/// Length of a digit run. The first byte must be a digit, `_` separators may follow.
fn match_digits(bytes: &[u8], is_digit: fn(u8) -> bool) -> Option<usize> {
    match bytes.first() {
        Some(&first) if is_digit(first) => {}
        _ => return None,
    }

    Some(
        bytes
            .iter()
            .take_while(|&&byte| is_digit(byte) || byte == b'_')
            .count(),
    )
}

pub fn match_int(bytes: &[u8]) -> Option<Match> {
    let sign = usize::from(bytes.first() == Some(&b'-'));
    let unsigned = &bytes[sign..];

    let prefixed = match unsigned {
        [b'0', b'x', digits @ ..] => match_digits(digits, is_hex),
        [b'0', b'o', digits @ ..] => match_digits(digits, is_octal),
        [b'0', b'b', digits @ ..] => match_digits(digits, is_binary),
        _ => None,
    };

    if let Some(len) = prefixed {
        return Some(Match::new(sign + 2 + len, Kind::Int));
    }

    match_digits(unsigned, is_decimal).map(|len| Match::new(sign + len, Kind::Int))
}

pub fn match_float(bytes: &[u8]) -> Option<Match> {
    let sign = usize::from(bytes.first() == Some(&b'-'));
    let unsigned = &bytes[sign..];

    let whole = unsigned.iter().take_while(|&&b| is_decimal(b)).count();
    if whole == 0 || unsigned.get(whole) != Some(&b'.') {
        return None;
    }

    let fraction = unsigned[whole + 1..]
        .iter()
        .take_while(|&&b| is_decimal(b))
        .count();
    if fraction == 0 {
        return None;
    }

    Some(Match::new(sign + whole + 1 + fraction, Kind::Float))
}

pub fn match_atom(bytes: &[u8]) -> Option<Match> {
    if bytes.first() != Some(&b'\'') {
        return None;
    }

    let name = bytes[1..].iter().take_while(|&&b| is_alpha(b)).count();
    (name > 0).then(|| Match::new(name + 1, Kind::Atom))
}

fn has_path_prefix(bytes: &[u8]) -> bool {
    bytes.starts_with(b"/") || bytes.starts_with(b"./") || bytes.starts_with(b"../")
}

fn is_path_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.' | b'/')
}

/// Paths start with `/`, `./` or `../`. A single `/` on its own is division.
pub fn match_path(bytes: &[u8]) -> Option<Match> {
    if !has_path_prefix(bytes) {
        return None;
    }

    let len = bytes.iter().take_while(|&&b| is_path_char(b)).count();
    if len == 1 && bytes[0] == b'/' {
        return None;
    }

    Some(Match::new(len, Kind::Path))
}

pub fn match_flag(bytes: &[u8]) -> Option<Match> {
    let dashes = match bytes {
        [b'-', b'-', ..] => 2,
        [b'-', ..] => 1,
        _ => return None,
    };

    let name = &bytes[dashes..];
    if !name.first().is_some_and(|&b| is_alpha(b)) {
        return None;
    }

    let len = name
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'-')
        .count();

    Some(Match::new(dashes + len, Kind::Flag))
}

/// Strings are `"`-delimited, `\` escapes the next byte and a raw newline ends the
/// attempt without a match.
pub fn match_string(bytes: &[u8]) -> Option<Match> {
    if bytes.first() != Some(&b'"') {
        return None;
    }

    let mut index = 1;
    while let Some(&byte) = bytes.get(index) {
        match byte {
            b'"' => return Some(Match::new(index + 1, Kind::String)),
            b'\n' => return None,
            b'\\' => {
                if bytes.get(index + 1).is_none_or(|&b| b == b'\n') {
                    return None;
                }
                index += 2;
            }
            _ => index += 1,
        }
    }

    None
}

pub fn match_comment(bytes: &[u8]) -> Option<Match> {
    if bytes.first() != Some(&b'#') {
        return None;
    }

    let len = bytes.iter().take_while(|&&b| b != b'\n').count();
    Some(Match::new(len, Kind::Comment))
}

pub fn match_command(bytes: &[u8]) -> Option<Match> {
    if bytes.first() != Some(&b'$') {
        return None;
    }

    let name = bytes[1..]
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        .count();

    (name > 0).then(|| Match::new(name + 1, Kind::Command))
}

pub fn match_whitespace(bytes: &[u8]) -> Option<Match> {
    let len = bytes.iter().take_while(|&&b| is_whitespace(b)).count();
    (len > 0).then(|| Match::new(len, Kind::Whitespace))
}

pub fn match_identifier(bytes: &[u8]) -> Option<Match> {
    if !bytes.first().is_some_and(|&b| is_alpha(b)) {
        return None;
    }

    let len = bytes
        .iter()
        .take_while(|&&b| b.is_ascii_alphanumeric())
        .count();

    // identifier bytes are all ASCII
    let text = std::str::from_utf8(&bytes[..len]).unwrap_or_default();
    Some(Match::new(len, identifier_kind(text)))
}

fn match_unknown(bytes: &[u8]) -> Match {
    let len = bytes.iter().take_while(|&&b| !is_whitespace(b)).count();
    Match::new(len.max(1), Kind::Invalid)
}

pub fn identifier_kind(value: &str) -> Kind {
    match value {
        "let" => Kind::Let,
        "fn" => Kind::Fn,
        "impl" => Kind::Impl,
        "true" | "false" => Kind::Bool,
        "int" => Kind::IntType,
        "float" => Kind::FloatType,
        "bool" => Kind::BoolType,
        "str" => Kind::StringType,
        "path" => Kind::PathType,
        "flag" => Kind::FlagType,
        "atom" => Kind::AtomType,
        "command" => Kind::CommandType,
        "none" => Kind::NoneType,
        _ => Kind::Identifier,
    }
}
