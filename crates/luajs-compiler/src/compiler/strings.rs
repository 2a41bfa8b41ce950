//! String literal re-escaping.
//!
//! Lua 5.2 understands every escape LuaJS strings use except `\uXXXX`, so
//! those are decoded and everything else is copied through unchanged.

use std::iter::Peekable;
use std::str::Chars;

/// Rewrites a quoted LuaJS string literal as a Lua string literal.
pub(crate) fn lower_string(raw: &str) -> String {
    let mut chars = raw.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };
    let inner = chars.as_str().strip_suffix(quote).unwrap_or(chars.as_str());

    let mut out = String::with_capacity(raw.len());
    out.push(quote);

    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('u') => {
                chars.next();
                match unicode_escape(&mut chars) {
                    Some(decoded) => push_decoded(&mut out, decoded, quote),
                    // The scanner rejects these, keep the text if one slips through
                    None => out.push_str("\\u"),
                }
            }
            Some(escaped) => {
                chars.next();
                out.push('\\');
                out.push(escaped);
            }
            None => out.push('\\'),
        }
    }

    out.push(quote);
    out
}

/// Decodes the digits after `\u`, combining a following low surrogate.
fn unicode_escape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    let unit = hex4(chars)?;

    if (0xD800..0xDC00).contains(&unit) {
        let mut lookahead = chars.clone();
        if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
            if let Some(low) = hex4(&mut lookahead) {
                if (0xDC00..0xE000).contains(&low) {
                    *chars = lookahead;
                    let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined);
                }
            }
        }
    }

    Some(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER))
}

fn hex4(chars: &mut Peekable<Chars<'_>>) -> Option<u32> {
    let mut value = 0;
    for _ in 0..4 {
        let digit = chars.peek()?.to_digit(16)?;
        chars.next();
        value = (value << 4) | digit;
    }
    Some(value)
}

/// Appends a decoded character, escaping those that would break the literal.
fn push_decoded(out: &mut String, ch: char, quote: char) {
    if ch.is_ascii_control() || ch == quote || ch == '\\' {
        out.push_str(&format!("\\{:03}", ch as u32));
    } else {
        out.push(ch);
    }
}
