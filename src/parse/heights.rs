//! Parser for whitespace-separated height files.
//!
//! The format is two integers, the vertical and horizontal control-point counts, followed
//! by `vertical * horizontal` heights in row-major order. Any whitespace separates tokens;
//! there is no header or delimiter.
//!
//! ```text
//! 4 4
//! 0 0 0 0
//! 0 1 1 0
//! 0 1 1 0
//! 0 0 0 0
//! ```

use std::fs;
use std::num::{ParseFloatError, ParseIntError};
use std::path::Path;

use thiserror::Error;

use crate::geom::HeightField;

/// Result type for height-file parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while reading a height file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be opened or read.
    #[error("could not read height file: {0}")]
    Io(#[from] std::io::Error),
    /// The input ended before both grid dimensions were read.
    #[error("missing grid dimensions")]
    MissingDimensions,
    /// A grid dimension is not a non-negative integer.
    #[error("invalid grid dimension `{token}`")]
    InvalidDimension {
        token: String,
        #[source]
        source: ParseIntError,
    },
    /// A height token is not a floating-point number.
    #[error("invalid height value `{token}` at position {index}")]
    InvalidHeight {
        index: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },
    /// The number of heights differs from `vertical * horizontal`.
    #[error("expected {expected} height values, found {found}")]
    HeightCountMismatch { expected: usize, found: usize },
}

/// Parses a height field from text.
///
/// # Errors
///
/// Every [`ParseError`] variant except [`ParseError::Io`].
pub fn parse_str(input: &str) -> ParseResult<HeightField> {
    let mut tokens = input.split_whitespace();

    let vertical = parse_dimension(tokens.next())?;
    let horizontal = parse_dimension(tokens.next())?;
    log::debug!("height field declares {vertical}x{horizontal} control points");

    let heights = tokens
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|source| ParseError::InvalidHeight {
                index,
                token: token.to_owned(),
                source,
            })
        })
        .collect::<ParseResult<Vec<f64>>>()?;

    HeightField::new(vertical, horizontal, heights)
}

/// Reads and parses a height file.
///
/// # Errors
///
/// [`ParseError::Io`] when the file is missing or unreadable, otherwise as [`parse_str`].
pub fn parse_file(path: impl AsRef<Path>) -> ParseResult<HeightField> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    log::debug!("read height file {}", path.display());
    parse_str(&text)
}

fn parse_dimension(token: Option<&str>) -> ParseResult<usize> {
    let token = token.ok_or(ParseError::MissingDimensions)?;
    token
        .parse::<usize>()
        .map_err(|source| ParseError::InvalidDimension {
            token: token.to_owned(),
            source,
        })
}
