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

use super::BASE;

/// A single base-62 digit: `0`-`9`, `A`-`Z`, `a`-`z` in that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digit(u8);

impl Digit {
    /// Builds a digit from `x mod 62`.
    pub fn reduce(x: u64) -> Self {
        // `x % BASE` is always less than 62.
        Self((x % BASE) as u8)
    }

    pub fn from_char(c: char) -> Option<Self> {
        let n = match c {
            '0'..='9' => c as u8 - b'0',
            'A'..='Z' => c as u8 - b'A' + 10,
            'a'..='z' => c as u8 - b'a' + 36,
            _ => return None,
        };
        Some(Self(n))
    }

    pub fn to_char(self) -> char {
        char::from(match self.0 {
            0..=9 => b'0' + self.0,
            10..=35 => b'A' + (self.0 - 10),
            _ => b'a' + (self.0 - 36),
        })
    }
}

impl From<Digit> for u8 {
    fn from(d: Digit) -> u8 {
        d.0
    }
}

impl From<Digit> for u64 {
    fn from(d: Digit) -> u64 {
        u64::from(d.0)
    }
}
