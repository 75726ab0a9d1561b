// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Problem instance loader for the multi-criteria selection domain.
//!
//! This module turns whitespace-delimited text streams into a validated
//! `ProblemInstance`. The format is:
//!
//! ```raw
//! n                     # number of criteria (objectives or agents)
//! p                     # number of items (items or projects)
//! u_1_1 ... u_1_p       # utility row of criterion 1
//! ...
//! u_n_1 ... u_n_p       # utility row of criterion n
//! c_1 ... c_p           # per-item costs (budgeted variants only)
//! ```
//!
//! Tokens may be split across lines arbitrarily and `#` introduces a
//! comment running to the end of the line. The parser accepts any
//! `BufRead`, file path, raw reader, or string slice, making it convenient
//! to use from benchmarks, tests, and tooling.

use crate::instance::{InstanceError, ProblemInstance, ProblemInstanceBuilder};
use crate::index::{CriterionIndex, ItemIndex};
use num_traits::{PrimInt, Signed};
use std::{
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the instance loading process.
#[derive(Debug)]
pub enum InstanceLoadError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before all expected tokens were read.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The declared dimensions (n or p) are not positive integers.
    InvalidDimensions,
    /// The parsed data failed instance validation.
    Invalid(InstanceError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "i64").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl std::fmt::Display for InstanceLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => {
                write!(f, "Instance dimensions (n and p) must be positive integers")
            }
            Self::Invalid(e) => write!(f, "Invalid instance: {}", e),
        }
    }
}

impl std::error::Error for InstanceLoadError {}

impl From<std::io::Error> for InstanceLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for InstanceLoadError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<InstanceError> for InstanceLoadError {
    fn from(e: InstanceError) -> Self {
        Self::Invalid(e)
    }
}

/// A configurable loader for multi-criteria problem instances.
///
/// # Configuration
///
/// * `with_costs`: if true, a trailing cost line of `p` integers is read
///   after the utility rows (budget-constrained selection instances carry
///   one; plain assignment instances do not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstanceLoader {
    with_costs: bool,
}

impl InstanceLoader {
    /// Creates a new `InstanceLoader` that expects no cost line.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether a trailing cost line is expected.
    #[inline]
    pub fn with_costs(mut self, yes: bool) -> Self {
        self.with_costs = yes;
        self
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<T, R>(&self, rdr: R) -> Result<ProblemInstance<T>, InstanceLoadError>
    where
        T: PrimInt + Signed + FromStr,
        R: BufRead,
    {
        let mut sc = Scanner::new(rdr);

        let n_val: T = sc.next()?;
        let p_val: T = sc.next()?;

        let n = n_val
            .to_usize()
            .ok_or(InstanceLoadError::InvalidDimensions)?;
        let p = p_val
            .to_usize()
            .ok_or(InstanceLoadError::InvalidDimensions)?;

        if n == 0 || p == 0 {
            return Err(InstanceLoadError::InvalidDimensions);
        }

        let mut builder = ProblemInstanceBuilder::new(n, p);
        for i in 0..n {
            for j in 0..p {
                let value = sc.next()?;
                builder.set_utility(CriterionIndex::new(i), ItemIndex::new(j), value);
            }
        }

        if self.with_costs {
            let mut costs = Vec::with_capacity(p);
            for _ in 0..p {
                costs.push(sc.next()?);
            }
            builder.set_costs(costs);
        }

        Ok(builder.build()?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<T, P>(&self, path: P) -> Result<ProblemInstance<T>, InstanceLoadError>
    where
        T: PrimInt + Signed + FromStr,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<T, R>(&self, r: R) -> Result<ProblemInstance<T>, InstanceLoadError>
    where
        T: PrimInt + Signed + FromStr,
        R: Read,
    {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str<T>(&self, s: &str) -> Result<ProblemInstance<T>, InstanceLoadError>
    where
        T: PrimInt + Signed + FromStr,
    {
        self.from_reader(s.as_bytes())
    }
}

/// A helper to read whitespace-delimited tokens from a generic reader.
///
/// Lines are tokenized one at a time; everything after a `#` is dropped
/// before tokenization.
struct Scanner<R> {
    rdr: R,
    tokens: VecDeque<String>,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            tokens: VecDeque::new(),
        }
    }

    /// Reads the next token and parses it into `T`.
    fn next<T>(&mut self) -> Result<T, InstanceLoadError>
    where
        T: FromStr,
    {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return token.parse::<T>().map_err(|_| {
                    InstanceLoadError::Parse(ParseTokenError {
                        token,
                        type_name: std::any::type_name::<T>(),
                    })
                });
            }

            let mut line = String::new();
            if self.rdr.read_line(&mut line)? == 0 {
                return Err(InstanceLoadError::UnexpectedEof);
            }

            let content = match line.find('#') {
                Some(pos) => &line[..pos],
                None => &line[..],
            };
            self.tokens
                .extend(content.split_whitespace().map(str::to_owned));
        }
    }
}
