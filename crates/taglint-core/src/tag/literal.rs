//! Quoted literal decoding and `key:"value"` lookup
//!
//! A field tag reaches us exactly as it appears in source: either a backquoted raw
//! string or a double-quoted interpreted string. [`unquote`] turns it into the tag text,
//! and [`lookup`] pulls one key's value out of that text.

use crate::error::TaglintError;
use crate::result::Result;

/// Decode a quoted literal (backquoted, double-quoted or single-quoted).
///
/// Backquoted literals are raw: their content is taken verbatim with carriage returns
/// removed. Double- and single-quoted literals honour the usual backslash escapes
/// (`\n`, `\t`, `\\`, `\"`, `\x7f`, `\101`, `é`, `\U0001F600`, ...).
pub fn unquote(literal: &str) -> Result<String> {
    let bytes = literal.as_bytes();
    if bytes.len() < 2 {
        return Err(TaglintError::unquote(literal, "literal too short"));
    }
    let quote = bytes[0];
    if quote != bytes[bytes.len() - 1] {
        return Err(TaglintError::unquote(literal, "mismatched quotes"));
    }
    let body = &literal[1..literal.len() - 1];

    match quote {
        b'`' => {
            if body.contains('`') {
                return Err(TaglintError::unquote(literal, "backquote inside raw string"));
            }
            Ok(body.replace('\r', ""))
        }
        b'"' | b'\'' => {
            if body.contains('\n') {
                return Err(TaglintError::unquote(literal, "newline in quoted string"));
            }
            let decoded = unescape(body, quote).map_err(|reason| TaglintError::unquote(literal, reason))?;
            if quote == b'\'' && decoded.chars().count() != 1 {
                return Err(TaglintError::unquote(
                    literal,
                    "character literal must hold exactly one character",
                ));
            }
            Ok(decoded)
        }
        _ => Err(TaglintError::unquote(literal, "not a quoted literal")),
    }
}

fn unescape(body: &str, quote: u8) -> std::result::Result<String, String> {
    let bytes = body.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c == quote {
            return Err("unescaped quote".to_string());
        }
        if c != b'\\' {
            out.push(c);
            i += 1;
            continue;
        }

        let Some(&esc) = bytes.get(i + 1) else {
            return Err("trailing backslash".to_string());
        };
        i += 2;
        match esc {
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0b),
            b'\\' => out.push(b'\\'),
            b'\'' | b'"' => {
                if esc != quote {
                    return Err(format!("unknown escape sequence \\{}", esc as char));
                }
                out.push(esc);
            }
            b'x' => {
                let value = hex_value(bytes, i, 2)?;
                out.push(value as u8);
                i += 2;
            }
            b'u' | b'U' => {
                let width = if esc == b'u' { 4 } else { 8 };
                let value = hex_value(bytes, i, width)?;
                let ch = char::from_u32(value)
                    .ok_or_else(|| format!("invalid code point {value:#x}"))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                i += width;
            }
            b'0'..=b'7' => {
                let digits = bytes
                    .get(i - 1..i + 2)
                    .ok_or_else(|| "short octal escape".to_string())?;
                let mut value: u32 = 0;
                for &d in digits {
                    if !(b'0'..=b'7').contains(&d) {
                        return Err("invalid octal escape".to_string());
                    }
                    value = value * 8 + u32::from(d - b'0');
                }
                if value > 0xff {
                    return Err("octal escape out of range".to_string());
                }
                out.push(value as u8);
                i += 2;
            }
            other => return Err(format!("unknown escape sequence \\{}", other as char)),
        }
    }

    // Byte escapes may produce invalid UTF-8; those bytes decode as U+FFFD, which no
    // dialect accepts as a name character.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn hex_value(bytes: &[u8], start: usize, width: usize) -> std::result::Result<u32, String> {
    let digits = bytes
        .get(start..start + width)
        .ok_or_else(|| "short hex escape".to_string())?;
    digits.iter().try_fold(0u32, |acc, &d| {
        let v = (d as char)
            .to_digit(16)
            .ok_or_else(|| "invalid hex escape".to_string())?;
        Ok(acc * 16 + v)
    })
}

/// Scan one `key:"value"` pair at the start of `tag` (leading spaces already removed).
///
/// Returns the key, the still-quoted value and the remaining text, or the reason the
/// pair is malformed.
pub(crate) fn scan_pair(
    tag: &str,
) -> std::result::Result<(&str, &str, &str), crate::error::TagSyntaxKind> {
    use crate::error::TagSyntaxKind;

    let bytes = tag.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i] > b' ' && bytes[i] != b':' && bytes[i] != b'"' && bytes[i] != 0x7f
    {
        i += 1;
    }
    if i == 0 {
        return Err(TagSyntaxKind::Key);
    }
    if i + 1 >= bytes.len() || bytes[i] != b':' {
        return Err(TagSyntaxKind::Tag);
    }
    if bytes[i + 1] != b'"' {
        return Err(TagSyntaxKind::Value);
    }
    let key = &tag[..i];
    let rest = &tag[i + 1..];
    let rest_bytes = rest.as_bytes();

    let mut j = 1;
    while j < rest_bytes.len() && rest_bytes[j] != b'"' {
        if rest_bytes[j] == b'\\' {
            j += 1;
        }
        j += 1;
    }
    if j >= rest_bytes.len() {
        return Err(TagSyntaxKind::Value);
    }
    Ok((key, &rest[..=j], &rest[j + 1..]))
}

/// Look up the value stored under `key` in tag text such as `json:"a" bson:"b"`.
///
/// Scanning stops silently at the first malformed pair, so a key that appears only
/// after a malformed pair is reported as absent.
pub fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }
        let (name, quoted, tail) = scan_pair(rest).ok()?;
        if name == key {
            return unquote(quoted).ok();
        }
        rest = tail;
    }
}
