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

//! Packing of [`Token`]s into the integer symbols the insertion scheduler
//! orders and encodes.
//!
//! Printable chars are their own scalar value. Back-references live in the
//! UTF-16 surrogate range, which no `char` can occupy, and C0 control chars
//! are moved just past the end of the Unicode range so that every symbol is
//! at least [`INITIAL_N`](super::INITIAL_N).

use super::decode::{DecodeError, DecodeResult};
use super::lz::{Token, MINCOPY, MINDIST};

const BACKREF: u32 = 0xd800;
const BACKREF_END: u32 = 0xdfff;
const COPY_BITS: u32 = 4;
const COPY_MASK: u32 = (1 << COPY_BITS) - 1;

const CONTROL: u32 = 0x11_0000;
const CONTROL_END: u32 = CONTROL + 0x1f;

pub fn pack(token: Token) -> u32 {
    match token {
        Token::Literal(c) if c < ' ' => CONTROL + u32::from(c),
        Token::Literal(c) => u32::from(c),
        Token::BackReference {
            distance,
            length,
        } => {
            let length = (length - MINCOPY) as u32;
            let distance = (distance - MINDIST) as u32;
            BACKREF + length + (distance << COPY_BITS)
        }
    }
}

pub fn unpack(symbol: u32) -> DecodeResult<Token> {
    match symbol {
        BACKREF..=BACKREF_END => {
            let n = symbol - BACKREF;
            Ok(Token::BackReference {
                distance: (n >> COPY_BITS) as usize + MINDIST,
                length: (n & COPY_MASK) as usize + MINCOPY,
            })
        }
        CONTROL..=CONTROL_END => {
            Ok(Token::Literal(char::from((symbol - CONTROL) as u8)))
        }
        _ => char::from_u32(symbol)
            .filter(|c| *c >= ' ')
            .map(Token::Literal)
            .ok_or(DecodeError::InvalidSymbol(symbol.into())),
    }
}
