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

//! Functions and types for decoding identifiers back into text.

use super::lz;
use super::schedule;
use super::symbol;
use super::{write_truncated, Digit, Written};

use alloc::string::String;
use alloc::vec::Vec;
use core::str::Utf8Error;

/// An error encountered while decoding a [`str`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Encountered a character outside the base-62 alphabet.
    #[error("bad character: {0:?}")]
    BadChar(char),
    /// The input ended in the middle of an encoded number.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// An encoded number was too large.
    #[error("encoded value is too large")]
    Overflow,
    /// An encoded number did not correspond to any character.
    #[error("invalid symbol: {0:#x}")]
    InvalidSymbol(u64),
    /// A back-reference pointed before the start of the decoded text.
    #[error(
        "back-reference distance {distance} exceeds the {available} \
        characters decoded so far"
    )]
    BadBackReference {
        /// How far back the reference pointed.
        distance: usize,
        /// How many characters had been decoded.
        available: usize,
    },
}

/// Alias of <code>[Result]\<T, [DecodeError]></code>.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Byte input that was not valid UTF-8.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid UTF-8")]
pub struct InvalidUtf8(#[from] Utf8Error);

impl InvalidUtf8 {
    /// The length of the valid UTF-8 prefix of the input.
    pub fn valid_up_to(&self) -> usize {
        self.0.valid_up_to()
    }
}

/// An error encountered while decoding a sequence of bytes.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeBytesError {
    /// The provided bytes were not valid UTF-8.
    #[error(transparent)]
    InvalidUtf8(#[from] InvalidUtf8),
    /// A different decoding error occurred.
    #[error(transparent)]
    DecodeError(#[from] DecodeError),
}

/// Alias of <code>[Result]\<T, [DecodeBytesError]></code>.
pub type DecodeBytesResult<T> = Result<T, DecodeBytesError>;

/// Splits an encoded string into its literal prefix and encoded suffix.
///
/// A trailing underscore marks a string with only a suffix.
fn split(s: &str) -> (&str, &str) {
    match s.find('_') {
        Some(i) if i + 1 == s.len() => ("", &s[..i]),
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

/// Decodes an identifier into the chars it was encoded from.
pub fn decode_to_chars(s: &str) -> DecodeResult<Vec<char>> {
    let (prefix, suffix) = split(s);
    let mut symbols = prefix
        .chars()
        .map(|c| {
            Digit::from_char(c)
                .map(|_| u32::from(c))
                .ok_or(DecodeError::BadChar(c))
        })
        .collect::<DecodeResult<Vec<_>>>()?;

    schedule::decode_insertions(&mut symbols, suffix)?;
    let tokens = symbols
        .into_iter()
        .map(symbol::unpack)
        .collect::<DecodeResult<Vec<_>>>()?;
    let chars = lz::decompress(&tokens)?;

    log::debug!(
        "decoded {} prefix + {} suffix bytes via {} tokens into {} chars",
        prefix.len(),
        suffix.len(),
        tokens.len(),
        chars.len(),
    );
    Ok(chars)
}

/// Decodes an identifier.
pub fn decode_str(s: &str) -> DecodeResult<String> {
    decode_to_chars(s).map(|chars| chars.into_iter().collect())
}

/// Decodes an identifier given as UTF-8 bytes, returning the UTF-8 bytes of
/// the original text.
pub fn decode_bytes(bytes: &[u8]) -> DecodeBytesResult<Vec<u8>> {
    let s = core::str::from_utf8(bytes).map_err(InvalidUtf8::from)?;
    Ok(decode_str(s)?.into_bytes())
}

/// Decodes an identifier into `buf`.
///
/// At most `buf.len()` bytes are written, and a UTF-8 sequence is never
/// split, so [`Written::written`] may be less than `buf.len()` when the
/// output doesn't fit. [`Written::required`] is always the full length of
/// the decoded text. Nothing is written if decoding fails.
pub fn decode_into(s: &str, buf: &mut [u8]) -> DecodeResult<Written> {
    decode_str(s).map(|decoded| write_truncated(&decoded, buf))
}

/// Decodes an identifier given as UTF-8 bytes into `buf`.
///
/// This function is like [`decode_into`], but takes bytes.
pub fn decode_bytes_into(
    bytes: &[u8],
    buf: &mut [u8],
) -> DecodeBytesResult<Written> {
    let s = core::str::from_utf8(bytes).map_err(InvalidUtf8::from)?;
    Ok(decode_into(s, buf)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_layouts() {
        assert_eq!(split(""), ("", ""));
        assert_eq!(split("hello"), ("hello", ""));
        assert_eq!(split("d_c0"), ("d", "c0"));
        assert_eq!(split("_A0"), ("", "A0"));
        assert_eq!(split("A0_"), ("", "A0"));
        assert_eq!(split("_"), ("", ""));
    }

    #[test]
    fn prefix_only() {
        assert_eq!(decode_str("hello").unwrap(), "hello");
    }

    #[test]
    fn known_suffixes() {
        assert_eq!(decode_str("d_c0").unwrap(), "3d");
        assert_eq!(decode_str("_A0").unwrap(), " ");
        assert_eq!(decode_str("A0_").unwrap(), " ");
        assert_eq!(decode_str("ab_e00xw3").unwrap(), "a-é-b");
        assert_eq!(decode_str("Gre_YCv3").unwrap(), "Grüße");
    }

    #[test]
    fn bad_prefix_char() {
        assert_eq!(decode_str("ab-c"), Err(DecodeError::BadChar('-')));
        assert_eq!(decode_str("ab_c0_"), Err(DecodeError::BadChar('_')));
    }

    #[test]
    fn bytes() {
        assert_eq!(decode_bytes(b"d_c0").unwrap(), b"3d");
        assert!(matches!(
            decode_bytes(b"\xff"),
            Err(DecodeBytesError::InvalidUtf8(_)),
        ));
        assert!(matches!(
            decode_bytes(b"d_c"),
            Err(DecodeBytesError::DecodeError(DecodeError::UnexpectedEnd)),
        ));
    }

    #[test]
    fn failed_decode_writes_nothing() {
        let mut buf = [b'#'; 8];
        assert!(decode_into("d_c", &mut buf).is_err());
        assert_eq!(buf, [b'#'; 8]);
    }
}
