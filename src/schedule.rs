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

//! Ordering of the chars that don't fit the identifier alphabet, and the
//! delta recurrence that turns them into the encoded suffix.
//!
//! Each insertion is the pair `(symbol, position)`, flattened into the single
//! integer `symbol * (count + 1) + position` where `count` is the number of
//! chars present before the insertion. Insertions are visited in increasing
//! order of that pair, so only the (non-negative) difference from the
//! previous one is written.

use super::bootstring::{adapt, decode_delta, encode_delta, INITIAL_BIAS};
use super::decode::{DecodeError, DecodeResult};
use super::INITIAL_N;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

/// Baseline reduction when there are no literal chars.
const EMPTY_PREFIX_OFFSET: u64 = 10;

/// A symbol to be inserted into the literal prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertionRecord {
    pub symbol: u32,
    /// Index in the full symbol sequence. After [`reposition`], the index
    /// among the chars present when this record is inserted.
    pub position: usize,
}

struct BiasState {
    bias: u64,
    last: u64,
    count: u64,
    first: bool,
}

impl BiasState {
    pub fn new(prefix_len: usize) -> Self {
        let count = prefix_len as u64;
        let mut last = INITIAL_N * (count + 1);
        if count == 0 {
            last -= EMPTY_PREFIX_OFFSET;
        }
        Self {
            bias: INITIAL_BIAS,
            last,
            count,
            first: true,
        }
    }

    pub fn advance(&mut self, delta: u64, symbol: u32, position: u64) {
        self.count += 1;
        self.last = u64::from(symbol) * (self.count + 1) + position + 1;
        self.bias = adapt(delta, self.count, self.first);
        self.first = false;
    }
}

/// Counts marked indices below a given index.
struct Fenwick(Vec<usize>);

impl Fenwick {
    pub fn new(len: usize) -> Self {
        Self(vec![0; len + 1])
    }

    pub fn mark(&mut self, index: usize) {
        let mut i = index + 1;
        while i < self.0.len() {
            self.0[i] += 1;
            i += i & i.wrapping_neg();
        }
    }

    pub fn count_below(&self, index: usize) -> usize {
        let mut i = index;
        let mut sum = 0;
        while i > 0 {
            sum += self.0[i];
            i -= i & i.wrapping_neg();
        }
        sum
    }
}

/// Rewrites original positions of sorted records into insertion positions.
///
/// When a record is inserted, the records that come after it in `records`
/// are still missing, so any of them to its left must not be counted.
fn reposition(records: &mut [InsertionRecord]) {
    let len = records.iter().map(|r| r.position + 1).max().unwrap_or(0);
    let mut pending = Fenwick::new(len);
    for record in records.iter_mut().rev() {
        let original = record.position;
        record.position -= pending.count_below(original);
        pending.mark(original);
    }
}

/// Appends the encoded suffix for `records` to `out`. `prefix_len` is the
/// number of literal chars the records are inserted into.
pub fn encode_insertions(
    mut records: Vec<InsertionRecord>,
    prefix_len: usize,
    out: &mut String,
) {
    records.sort_unstable_by_key(|r| (r.symbol, r.position));
    reposition(&mut records);

    let mut state = BiasState::new(prefix_len);
    for record in &records {
        let position = record.position as u64;
        let value = u64::from(record.symbol) * (state.count + 1) + position;
        debug_assert!(value >= state.last);
        let delta = value - state.last;
        log::trace!(
            "insert {:#x} at {}: delta {}, bias {}",
            record.symbol,
            position,
            delta,
            state.bias,
        );
        encode_delta(delta, state.bias, out);
        state.advance(delta, record.symbol, position);
    }
}

/// Inserts the symbols encoded in `suffix` into `symbols`, which initially
/// holds the literal prefix.
pub fn decode_insertions(
    symbols: &mut Vec<u32>,
    suffix: &str,
) -> DecodeResult<()> {
    let mut state = BiasState::new(symbols.len());
    let mut chars = suffix.chars();
    while !chars.as_str().is_empty() {
        let delta = decode_delta(&mut chars, state.bias)?;
        let value =
            delta.checked_add(state.last).ok_or(DecodeError::Overflow)?;
        let symbol = value / (state.count + 1);
        let position = value % (state.count + 1);
        let symbol = u32::try_from(symbol)
            .map_err(|_| DecodeError::InvalidSymbol(symbol))?;

        log::trace!(
            "insert {:#x} at {}: delta {}, bias {}",
            symbol,
            position,
            delta,
            state.bias,
        );
        // `position` is at most `count`, which is `symbols.len()`.
        symbols.insert(position as usize, symbol);
        state.advance(delta, symbol, position);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: char, position: usize) -> InsertionRecord {
        InsertionRecord {
            symbol: symbol.into(),
            position,
        }
    }

    #[test]
    fn reposition_accounts_for_missing_records() {
        // "a-é-b" with literals a, b: '-' at 1 and 3, 'é' at 2.
        let mut records = vec![record('-', 1), record('-', 3), record('é', 2)];
        reposition(&mut records);
        // "ab" -> "a-b" -> "a--b" -> "a-é-b"
        assert_eq!(
            records,
            [record('-', 1), record('-', 2), record('é', 2)],
        );
    }

    #[test]
    fn fenwick_counts() {
        let mut f = Fenwick::new(10);
        [3, 7, 0, 9].iter().for_each(|&i| f.mark(i));
        assert_eq!(f.count_below(0), 0);
        assert_eq!(f.count_below(1), 1);
        assert_eq!(f.count_below(4), 2);
        assert_eq!(f.count_below(10), 4);
    }

    fn encode(records: Vec<InsertionRecord>, prefix_len: usize) -> String {
        let mut s = String::new();
        encode_insertions(records, prefix_len, &mut s);
        s
    }

    #[test]
    fn digit_at_start() {
        // "3d": '3' inserted at position 0 of "d".
        let suffix = encode(vec![record('3', 0)], 1);
        assert_eq!(suffix, "c0");

        let mut symbols = vec![u32::from('d')];
        decode_insertions(&mut symbols, &suffix).unwrap();
        assert_eq!(symbols, [u32::from('3'), u32::from('d')]);
    }

    #[test]
    fn decode_places_records() {
        // Literals "ab" at 0 and 4 of "a-é-b", with three insertions.
        let records = vec![record('é', 2), record('-', 3), record('-', 1)];
        let suffix = encode(records, 2);

        let mut symbols = vec![u32::from('a'), u32::from('b')];
        decode_insertions(&mut symbols, &suffix).unwrap();
        let expected: Vec<u32> = "a-é-b".chars().map(u32::from).collect();
        assert_eq!(symbols, expected);
    }

    #[test]
    fn empty_prefix_baseline() {
        let suffix = encode(vec![record(' ', 0)], 0);
        // delta = 32 - (32 - 10) = 10
        assert_eq!(suffix, "A0");
        let mut symbols = Vec::new();
        decode_insertions(&mut symbols, &suffix).unwrap();
        assert_eq!(symbols, [u32::from(' ')]);
    }

    #[test]
    fn truncated_suffix() {
        let mut suffix = encode(vec![record('é', 1)], 4);
        suffix.pop();
        let mut symbols = vec![u32::from('x'); 4];
        assert_eq!(
            decode_insertions(&mut symbols, &suffix),
            Err(DecodeError::UnexpectedEnd),
        );
    }
}
