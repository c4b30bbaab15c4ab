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

use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use identcode::{decode_bytes_into, encode_bytes_into, Written};

const INITIAL_CAPACITY: usize = 64;

/// Decodes identifiers back into text, one per line, or encodes text into
/// identifiers with `-e`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Encode text instead of decoding identifiers.
    #[arg(short, long)]
    encode: bool,

    /// Largest buffer, in bytes, to grow to for a single line.
    #[arg(long, value_name = "N", default_value_t = u16::MAX as usize)]
    max_len: usize,

    /// The file to read; standard input if missing or "-".
    file: Option<PathBuf>,
}

/// Converts one line into `buf`, doubling it until the result fits, and
/// returns the length of the result.
fn convert(args: &Args, line: &[u8], buf: &mut Vec<u8>) -> Result<usize> {
    loop {
        let Written {
            required,
            written,
        } = if args.encode {
            encode_bytes_into(line, buf)?
        } else {
            decode_bytes_into(line, buf)?
        };
        if written == required {
            return Ok(written);
        }

        let capacity = (buf.len() * 2).max(INITIAL_CAPACITY);
        if capacity > args.max_len {
            bail!("result too long (did you mean '-e'?)");
        }
        log::debug!("growing buffer to {} bytes for {}", capacity, required);
        buf.resize(capacity, 0);
    }
}

fn run(args: &Args, input: impl BufRead) -> Result<()> {
    let mut writer = BufWriter::new(stdout().lock());
    let mut buf = Vec::new();
    for (i, line) in input.split(b'\n').enumerate() {
        let mut line = line.context("could not read input")?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        let len = convert(args, &line, &mut buf)
            .with_context(|| format!("line {}", i + 1))?;
        writer
            .write_all(&buf[..len])
            .and_then(|_| writer.write_all(b"\n"))
            .context("could not write to standard output")?;
    }
    writer.flush().context("could not write to standard output")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let args = Args::parse();
    match args.file.as_deref().filter(|p| *p != Path::new("-")) {
        Some(path) => {
            let file = File::open(path).with_context(|| {
                format!("could not open file '{}'", path.display())
            })?;
            run(&args, BufReader::new(file))
        }
        None => run(&args, stdin().lock()),
    }
}
