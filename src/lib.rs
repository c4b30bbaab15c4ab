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

//! Reversible transliteration of Unicode text into identifiers.
//!
//! Any string can be encoded into one made only of ASCII letters, digits and
//! underscores that never starts with a digit, and decoded back exactly:
//!
//! ```
//! let encoded = identcode::encode_str("héllo wörld");
//! assert!(encoded.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
//! assert_eq!(identcode::decode_str(&encoded).unwrap(), "héllo wörld");
//! ```
//!
//! Letters and digits are kept in place as a literal prefix. Everything else
//! is first run through a small dictionary compressor, then written after an
//! underscore as a Bootstring-style base-62 suffix recording which character
//! goes where.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bootstring;
pub mod decode;
mod digit;
pub mod encode;
pub mod lz;
mod schedule;
mod symbol;

use digit::Digit;

const BASE: u64 = 62;

/// Smallest symbol the insertion scheduler handles.
const INITIAL_N: u64 = 32;

/// The outcome of encoding or decoding into a caller-provided buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Written {
    /// The number of bytes the complete output takes.
    pub required: usize,
    /// The number of bytes actually written.
    pub written: usize,
}

impl Written {
    /// Whether the whole output fit in the buffer.
    pub fn is_complete(&self) -> bool {
        self.written == self.required
    }
}

/// Copies as much of `s` into `buf` as fits without splitting a char.
fn write_truncated(s: &str, buf: &mut [u8]) -> Written {
    let mut len = s.len().min(buf.len());
    while !s.is_char_boundary(len) {
        len -= 1;
    }
    buf[..len].copy_from_slice(&s.as_bytes()[..len]);
    Written {
        required: s.len(),
        written: len,
    }
}

pub use decode::decode_bytes;
pub use decode::decode_bytes_into;
pub use decode::decode_into;
pub use decode::decode_str;
pub use decode::decode_to_chars;
pub use decode::{DecodeBytesError, DecodeError, InvalidUtf8};

pub use encode::encode_bytes;
pub use encode::encode_bytes_into;
pub use encode::encode_chars;
pub use encode::encode_into;
pub use encode::encode_str;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut buf = [0; 3];
        let written = write_truncated("aé€", &mut buf);
        assert_eq!(written, Written {
            required: 6,
            written: 3,
        });
        assert_eq!(&buf, "aé".as_bytes());

        let mut buf = [0; 2];
        assert_eq!(write_truncated("aé", &mut buf).written, 1);
    }

    #[test]
    fn zero_capacity() {
        let written = write_truncated("abc", &mut []);
        assert_eq!(written.required, 3);
        assert_eq!(written.written, 0);
    }
}
