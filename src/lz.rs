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

//! The dictionary compressor that runs before transliteration.
//!
//! Repeated runs of characters are replaced with [`Token::BackReference`]s,
//! so that a name like `ééééééé` needs far fewer encoded insertions than it
//! has characters.

use super::decode::{DecodeError, DecodeResult};

use alloc::vec::Vec;

/// Shortest run replaced by a back-reference.
pub const MINCOPY: usize = 4;
/// Longest run a single back-reference can cover.
pub const MAXCOPY: usize = 19;
/// Smallest distance a back-reference can point behind the cursor.
pub const MINDIST: usize = 1;
/// Largest distance a back-reference can point behind the cursor.
pub const MAXDIST: usize = 128;

/// Number of chars hashed to find match candidates.
const HASH_LEN: usize = MINCOPY - 1;
const BUCKETS: usize = 512;

const FNV_OFFSET: u32 = 0x811c9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// A unit of compressed output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    /// A char copied through unchanged.
    Literal(char),
    /// Copy `length` chars starting `distance` chars behind the cursor.
    BackReference {
        /// Always in `MINDIST..=MAXDIST`.
        distance: usize,
        /// Always in `MINCOPY..=MAXCOPY`.
        length: usize,
    },
}

impl Token {
    /// The number of chars this token expands to.
    pub fn expanded_len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::BackReference {
                length,
                ..
            } => *length,
        }
    }
}

fn hash(chars: &[char]) -> usize {
    let h = chars.iter().fold(FNV_OFFSET, |h, &c| {
        (h ^ u32::from(c)).wrapping_mul(FNV_PRIME)
    });
    h as usize % BUCKETS
}

/// Maps a hash of the next [`HASH_LEN`] chars to the most recent position
/// they were seen at.
struct Dictionary {
    buckets: [Option<usize>; BUCKETS],
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            buckets: [None; BUCKETS],
        }
    }

    fn key(input: &[char], pos: usize) -> Option<usize> {
        input.get(pos..pos + HASH_LEN).map(hash)
    }

    pub fn insert(&mut self, input: &[char], pos: usize) {
        if let Some(key) = Self::key(input, pos) {
            self.buckets[key] = Some(pos);
        }
    }

    /// Returns `(distance, length)` of the best match for `input[pos..]`
    /// that the dictionary knows of.
    pub fn find(&self, input: &[char], pos: usize) -> Option<(usize, usize)> {
        let prev = self.buckets[Self::key(input, pos)?]?;
        let distance = pos - prev;
        if !(MINDIST..=MAXDIST).contains(&distance) {
            return None;
        }
        let length = input[pos..]
            .iter()
            .zip(&input[prev..])
            .take(MAXCOPY)
            .take_while(|(a, b)| a == b)
            .count();
        (length >= MINCOPY).then(|| (distance, length))
    }
}

/// Compresses a sequence of chars into [`Token`]s.
///
/// This never fails; in the worst case every char becomes a literal.
pub fn compress(input: &[char]) -> Vec<Token> {
    let mut dict = Dictionary::new();
    let mut tokens = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        let found = if pos < HASH_LEN {
            None
        } else {
            dict.find(input, pos)
        };

        let token = match found {
            Some((distance, length)) => {
                log::trace!(
                    "back-reference at {}: distance {}, length {}",
                    pos,
                    distance,
                    length,
                );
                Token::BackReference {
                    distance,
                    length,
                }
            }
            None => Token::Literal(input[pos]),
        };

        let len = token.expanded_len();
        (pos..pos + len).for_each(|i| dict.insert(input, i));
        tokens.push(token);
        pos += len;
    }
    tokens
}

/// Expands [`Token`]s back into the chars they were compressed from.
///
/// Fails with [`DecodeError::BadBackReference`] if a back-reference has a
/// zero distance or points before the start of the output.
pub fn decompress(tokens: &[Token]) -> DecodeResult<Vec<char>> {
    let capacity = tokens.iter().map(Token::expanded_len).sum();
    let mut output = Vec::with_capacity(capacity);

    for token in tokens {
        match *token {
            Token::Literal(c) => output.push(c),
            Token::BackReference {
                distance,
                length,
            } => {
                let start = output
                    .len()
                    .checked_sub(distance)
                    .filter(|_| distance >= MINDIST)
                    .ok_or(DecodeError::BadBackReference {
                        distance,
                        available: output.len(),
                    })?;
                // The source may overlap the chars being written, so copy
                // one at a time.
                for i in start..start + length {
                    let c = output[i];
                    output.push(c);
                }
            }
        }
    }
    Ok(output)
}
