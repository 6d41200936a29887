//! Line-oriented text formats.
//!
//! - Driver files: camera, lights, spheres and model placements
//! - OBJ (subset): vertices, faces, `mtllib`, `usemtl`
//! - MTL (subset): Phong coefficients, transparency, refractive index
//!
//! All three are parsed one line at a time; errors report the 1-based line
//! number and the offending text.

mod driver;
mod mtl;
mod obj;

use std::path::{Path, PathBuf};
use std::str::SplitWhitespace;

use lumen_math::Vec3;
use thiserror::Error;

pub use driver::{load_driver, parse_driver};
pub use mtl::{load_mtl, parse_mtl};
pub use obj::{load_obj, parse_obj};

/// Errors that can occur while reading scene files.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("couldn't read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}\n    {content}")]
    Line {
        line: usize,
        content: String,
        message: String,
    },

    #[error("in {}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Attach the file name to an error raised while parsing its content.
    pub(crate) fn in_file(self, path: &Path) -> Self {
        match self {
            // I/O errors already name their file
            ParseError::Io { .. } => self,
            other => ParseError::InFile {
                path: path.to_path_buf(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Read a whole file, mapping failures to [`ParseError::Io`].
pub(crate) fn read_file(path: &Path) -> ParseResult<String> {
    std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Whitespace tokens of a single line, with enough context to build errors.
pub(crate) struct Tokens<'a> {
    line: usize,
    content: &'a str,
    iter: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(line: usize, content: &'a str) -> Self {
        Self {
            line,
            content,
            iter: content.split_whitespace(),
        }
    }

    /// Build an error pointing at this line.
    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Line {
            line: self.line,
            content: self.content.trim().to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn next_opt(&mut self) -> Option<&'a str> {
        self.iter.next()
    }

    pub(crate) fn next_str(&mut self) -> ParseResult<&'a str> {
        self.iter
            .next()
            .ok_or_else(|| self.error("ran out of input while parsing line"))
    }

    /// Everything after the tokens consumed so far, trimmed.
    pub(crate) fn rest(&mut self) -> ParseResult<String> {
        let rest: Vec<&str> = self.iter.by_ref().collect();
        if rest.is_empty() {
            return Err(self.error("ran out of input while parsing line"));
        }
        Ok(rest.join(" "))
    }

    pub(crate) fn next_f64(&mut self) -> ParseResult<f64> {
        let token = self.next_str()?;
        token
            .parse::<f64>()
            .map_err(|_| self.error(format!("invalid number '{token}'")))
    }

    pub(crate) fn next_u32(&mut self) -> ParseResult<u32> {
        let token = self.next_str()?;
        token
            .parse::<u32>()
            .map_err(|_| self.error(format!("expected a non-negative integer, found '{token}'")))
    }

    pub(crate) fn next_vec3(&mut self) -> ParseResult<Vec3> {
        Ok(Vec3::new(self.next_f64()?, self.next_f64()?, self.next_f64()?))
    }
}

/// Lines worth parsing: 1-based number and text, skipping blanks.
pub(crate) fn content_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
}
