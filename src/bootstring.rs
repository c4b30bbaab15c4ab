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

//! Bootstring variable-length integers over the base-62 [`Digit`] alphabet.
//!
//! Each delta is written least-significant digit first. The digit at index
//! `i` terminates the number when it is below the threshold for `i`, which
//! depends on the current bias; the bias adapts after every delta so that
//! deltas of similar magnitude stay short.

use super::decode::{DecodeError, DecodeResult};
use super::Digit;
use super::BASE;

use alloc::string::String;

pub const TMIN: u64 = 1;
pub const TMAX: u64 = 52;
const SKEW: u64 = 208;
const DAMP: u64 = 700;
pub const INITIAL_BIAS: u64 = BASE * 2 - TMAX / 2;

fn threshold(index: u64, bias: u64) -> u64 {
    (BASE * (index + 1)).saturating_sub(bias).clamp(TMIN, TMAX)
}

/// Computes the bias for the next delta after encoding `delta`. `count` is
/// the number of chars present once the current insertion is done.
pub fn adapt(delta: u64, count: u64, first: bool) -> u64 {
    // The length compensation uses the undamped delta.
    let mut d = if first {
        delta / DAMP
    } else {
        delta / 2
    };
    d += delta / count;

    let mut k = 0;
    while d > (BASE - TMIN) * TMAX / 2 {
        d /= BASE - TMIN;
        k += BASE;
    }
    k + (BASE - TMIN + 1) * d / (d + SKEW)
}

/// Appends the digits of `delta` to `out`.
pub fn encode_delta(mut delta: u64, bias: u64, out: &mut String) {
    let mut index = 0;
    loop {
        let t = threshold(index, bias);
        if delta < t {
            out.push(Digit::reduce(delta).to_char());
            return;
        }
        out.push(Digit::reduce(t + (delta - t) % (BASE - t)).to_char());
        delta = (delta - t) / (BASE - t);
        index += 1;
    }
}

/// Reads one delta from `chars`, consuming exactly the digits that encode
/// it.
pub fn decode_delta<I>(chars: &mut I, bias: u64) -> DecodeResult<u64>
where
    I: Iterator<Item = char>,
{
    let mut value = 0_u64;
    let mut weight = 1_u64;
    let mut index = 0;
    loop {
        let c = chars.next().ok_or(DecodeError::UnexpectedEnd)?;
        let digit = Digit::from_char(c).ok_or(DecodeError::BadChar(c))?;
        let digit = u64::from(digit);
        value = digit
            .checked_mul(weight)
            .and_then(|n| n.checked_add(value))
            .ok_or(DecodeError::Overflow)?;

        let t = threshold(index, bias);
        if digit < t {
            return Ok(value);
        }
        weight = weight.checked_mul(BASE - t).ok_or(DecodeError::Overflow)?;
        index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(delta: u64, bias: u64) -> String {
        let mut s = String::new();
        encode_delta(delta, bias, &mut s);
        s
    }

    #[test]
    fn initial_bias() {
        assert_eq!(INITIAL_BIAS, 98);
    }

    #[test]
    fn thresholds() {
        assert_eq!(threshold(0, INITIAL_BIAS), TMIN);
        assert_eq!(threshold(1, INITIAL_BIAS), 26);
        assert_eq!(threshold(2, INITIAL_BIAS), TMAX);
        assert_eq!(threshold(0, 0), TMAX);
        assert_eq!(threshold(0, 61), TMIN);
    }

    #[test]
    fn small_delta_is_one_digit() {
        assert_eq!(encode(0, INITIAL_BIAS), "0");
        assert_eq!(encode(51, 0), "p");
    }

    #[test]
    fn known_encodings() {
        // 38 = 1 + 37 at index 0, then 0 at index 1.
        assert_eq!(encode(38, INITIAL_BIAS), "c0");
        assert_eq!(encode(1, INITIAL_BIAS), "10");
    }

    #[test]
    fn decode_inverts_encode() {
        for bias in [0, 1, 26, INITIAL_BIAS, 150, 400] {
            for delta in (0..5000).chain([u32::MAX.into(), 1 << 50]) {
                let s = encode(delta, bias);
                let mut chars = s.chars();
                assert_eq!(decode_delta(&mut chars, bias), Ok(delta));
                assert_eq!(chars.as_str(), "");
            }
        }
    }

    #[test]
    fn decode_stops_at_terminator() {
        let mut s = encode(1234, INITIAL_BIAS);
        s.push_str("zz");
        let mut chars = s.chars();
        assert_eq!(decode_delta(&mut chars, INITIAL_BIAS), Ok(1234));
        assert_eq!(chars.as_str(), "zz");
    }

    #[test]
    fn decode_errors() {
        assert_eq!(
            decode_delta(&mut "".chars(), INITIAL_BIAS),
            Err(DecodeError::UnexpectedEnd),
        );
        assert_eq!(
            decode_delta(&mut "z".chars(), INITIAL_BIAS),
            Err(DecodeError::UnexpectedEnd),
        );
        assert_eq!(
            decode_delta(&mut "z-".chars(), INITIAL_BIAS),
            Err(DecodeError::BadChar('-')),
        );
        let long: String = core::iter::repeat('z').take(64).collect();
        assert_eq!(
            decode_delta(&mut long.chars(), INITIAL_BIAS),
            Err(DecodeError::Overflow),
        );
    }

    #[test]
    fn adapt_damps_first_delta() {
        assert_eq!(adapt(0, 1, true), 0);
        assert!(adapt(1000, 1, true) < adapt(1000, 1, false));
        // Large deltas push the bias up by whole multiples of the base.
        assert!(adapt(1 << 30, 1, false) >= BASE);
    }

    #[test]
    fn adapt_compensates_with_undamped_delta() {
        // 1000 / 2 + 1000 / 1 = 1500
        assert_eq!(adapt(1000, 1, false), 54);
        // 1000 / 700 + 1000 / 4 = 251
        assert_eq!(adapt(1000, 4, true), 33);
    }
}
