/*
 * Copyright (C) 2022 taylor.fish <contact@taylor.fish>
 *
 * This file is part of identcode.
 *
 * identcode is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * identcode is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with identcode. If not, see <https://www.gnu.org/licenses/>.
 */

//! Functions for encoding text as identifiers.

use super::decode::InvalidUtf8;
use super::lz::{self, Token};
use super::schedule::{self, InsertionRecord};
use super::symbol;
use super::{write_truncated, Written};

use alloc::string::String;
use alloc::vec::Vec;

/// Whether `c` can be copied into the prefix as is. A digit can't start an
/// identifier, so it only qualifies once the prefix is non-empty.
fn is_literal(c: char, prefix: &str) -> bool {
    c.is_ascii_alphabetic() || (c.is_ascii_digit() && !prefix.is_empty())
}

/// Encodes a sequence of chars as an identifier.
///
/// The result consists only of ASCII letters, digits and underscores, and
/// never starts with a digit.
pub fn encode_chars(chars: &[char]) -> String {
    let tokens = lz::compress(chars);

    let mut out = String::with_capacity(tokens.len());
    let mut records = Vec::new();
    for (position, token) in tokens.iter().copied().enumerate() {
        match token {
            Token::Literal(c) if is_literal(c, &out) => out.push(c),
            _ => records.push(InsertionRecord {
                symbol: symbol::pack(token),
                position,
            }),
        }
    }

    let prefix_len = out.len();
    if !records.is_empty() {
        out.push('_');
        schedule::encode_insertions(records, prefix_len, &mut out);
    }

    log::debug!(
        "encoded {} chars via {} tokens into {} prefix + {} suffix bytes",
        chars.len(),
        tokens.len(),
        prefix_len,
        out.len() - prefix_len,
    );
    out
}

/// Encodes a `str` as an identifier.
pub fn encode_str(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    encode_chars(&chars)
}

/// Encodes UTF-8 bytes as an identifier.
pub fn encode_bytes(bytes: &[u8]) -> Result<String, InvalidUtf8> {
    Ok(encode_str(core::str::from_utf8(bytes)?))
}

/// Encodes a `str` as an identifier into `buf`.
///
/// At most `buf.len()` bytes are written. [`Written::required`] is always
/// the full length of the identifier, so a caller whose buffer was too small
/// can retry with one of exactly that size.
pub fn encode_into(s: &str, buf: &mut [u8]) -> Written {
    write_truncated(&encode_str(s), buf)
}

/// Encodes UTF-8 bytes as an identifier into `buf`.
///
/// This function is like [`encode_into`], but takes bytes.
pub fn encode_bytes_into(
    bytes: &[u8],
    buf: &mut [u8],
) -> Result<Written, InvalidUtf8> {
    Ok(encode_into(core::str::from_utf8(bytes)?, buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_an_identifier() {
        assert_eq!(encode_str("hello"), "hello");
        assert_eq!(encode_str("h3ll0"), "h3ll0");
    }

    #[test]
    fn leading_digit_is_encoded() {
        assert_eq!(encode_str("3d"), "d_c0");
        assert_eq!(encode_str("33"), encode_chars(&['3', '3']));
        assert!(encode_str("33").starts_with('_'));
    }

    #[test]
    fn accented() {
        let encoded = encode_str("héllo");
        assert_eq!(encoded, "hllo_UG");
    }

    #[test]
    fn several_insertions() {
        assert_eq!(encode_str("a-é-b"), "ab_e00xw3");
        assert_eq!(encode_str("Grüße"), "Gre_YCv3");
        assert_eq!(encode_str("abc_def"), "abcdef_H7");
    }

    #[test]
    fn no_literals() {
        assert_eq!(encode_str(" "), "_A0");
        assert_eq!(encode_str(""), "");
    }

    #[test]
    fn bytes() {
        assert_eq!(encode_bytes("3d".as_bytes()).unwrap(), "d_c0");
        assert_eq!(encode_bytes(b"ab\xc3").unwrap_err().valid_up_to(), 2);
    }

    #[test]
    fn buffer_contract() {
        let mut buf = [0; 4];
        let written = encode_into("héllo", &mut buf);
        assert_eq!(written, Written {
            required: 7,
            written: 4,
        });
        assert!(!written.is_complete());
        assert_eq!(&buf, b"hllo");

        let mut buf = [0; 7];
        assert!(encode_into("héllo", &mut buf).is_complete());
        assert_eq!(&buf, b"hllo_UG");
    }
}
