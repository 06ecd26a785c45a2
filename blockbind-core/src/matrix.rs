//! Fixed-width identifier matrices.
//!
//! Hosts hand identifier lists to a block as a two-dimensional character array:
//! one row per identifier, one column per character position, stored
//! column-major and padded with spaces (or NUL) out to the width of the longest
//! identifier. There are no delimiters, so the only structure available is the
//! row/column geometry.
//!
//! [`IdentifierMatrix`] owns a copy of that array and decodes it into
//! [`VariableId`]s. Nothing of the host buffer is retained after extraction.

use crate::identifier::VariableId;
use ndarray::{Array2, ArrayView1, Axis, ShapeBuilder};
use serde::{Deserialize, Serialize};

/// A character array as delivered by the host configuration surface.
///
/// `data` is column-major: the character at row `r`, column `k` is
/// `data[r + rows * k]`. Hosts that truncate during extraction may supply fewer
/// than `rows * cols` characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharArray {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<u8>,
}

impl CharArray {
    pub fn new(rows: usize, cols: usize, data: Vec<u8>) -> Self {
        Self { rows, cols, data }
    }

    /// A single-row character array holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(1, text.len(), text.as_bytes().to_vec())
    }

    /// Number of characters the declared geometry promises, or `None` if
    /// `rows * cols` does not fit in a `usize`.
    pub fn declared_len(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Whether the host supplied fewer characters than the geometry declares.
    pub fn is_truncated(&self) -> bool {
        self.declared_len().map_or(true, |len| self.data.len() < len)
    }

    /// Read the whole array as one string, column by column.
    ///
    /// Trailing spaces and NULs are trimmed. Returns `None` if the array is
    /// truncated, oversized or does not hold valid UTF-8.
    pub fn to_text(&self) -> Option<String> {
        let len = self.declared_len()?;
        let text = std::str::from_utf8(self.data.get(..len)?).ok()?;
        Some(text.trim_end_matches([' ', '\0']).to_string())
    }

    /// Extract the identifier matrix held by this array.
    pub fn identifiers(&self) -> Extraction {
        IdentifierMatrix::from_column_major(self.rows, self.cols, &self.data)
    }
}

/// Result of copying a host buffer into an [`IdentifierMatrix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub matrix: IdentifierMatrix,
    /// The host buffer held fewer characters than `rows * cols`.
    ///
    /// Missing characters are treated as padding. Reporting the condition is
    /// left to the caller.
    pub truncated: bool,
}

/// A rectangular matrix of identifier characters.
///
/// Rows are identifiers and columns are character positions.
/// Every row has the same width; shorter identifiers are padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierMatrix {
    chars: Array2<u8>,
}

impl IdentifierMatrix {
    /// Copy a column-major host buffer into a new matrix.
    ///
    /// Characters beyond `rows * cols` are ignored. A short buffer is padded
    /// with NUL and flagged as truncated.
    ///
    /// # Panics
    ///
    /// If `rows * cols` overflows. Host parameters are checked for this
    /// before they get here.
    pub fn from_column_major(rows: usize, cols: usize, data: &[u8]) -> Extraction {
        let chars = Array2::from_shape_fn((rows, cols).f(), |(r, k)| {
            data.get(r + rows * k).copied().unwrap_or(0)
        });

        Extraction {
            matrix: Self { chars },
            truncated: rows.checked_mul(cols).map_or(true, |len| data.len() < len),
        }
    }

    /// Encode identifiers into a space-padded matrix.
    ///
    /// The width is that of the longest identifier, so the longest row carries
    /// no padding at all.
    pub fn from_identifiers<S: AsRef<str>>(ids: &[S]) -> Self {
        let width = ids.iter().map(|x| x.as_ref().len()).max().unwrap_or(0);
        Self::from_identifiers_with_width(ids, width)
    }

    /// Encode identifiers into a space-padded matrix of a fixed width.
    ///
    /// Identifiers longer than `width` are cut at `width` characters.
    pub fn from_identifiers_with_width<S: AsRef<str>>(ids: &[S], width: usize) -> Self {
        let chars = Array2::from_shape_fn((ids.len(), width).f(), |(r, k)| {
            ids[r].as_ref().as_bytes().get(k).copied().unwrap_or(b' ')
        });
        Self { chars }
    }

    /// Number of identifiers.
    pub fn rows(&self) -> usize {
        self.chars.nrows()
    }

    /// Width of every row.
    pub fn cols(&self) -> usize {
        self.chars.ncols()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, u8> {
        self.chars.row(index)
    }

    /// The matrix in the host's column-major layout.
    pub fn to_column_major(&self) -> Vec<u8> {
        self.chars.t().iter().copied().collect()
    }

    /// Decode every row into an identifier.
    ///
    /// A row ends at its first space or NUL. A row without padding spans all
    /// columns. Decoding is total: it yields exactly [`rows`](Self::rows)
    /// identifiers, some of which may be empty, each holding the row's bytes
    /// unchanged.
    pub fn decode(&self) -> Vec<VariableId> {
        self.chars.axis_iter(Axis(0)).map(decode_row).collect()
    }
}

fn decode_row(row: ArrayView1<'_, u8>) -> VariableId {
    let len = row
        .iter()
        .position(|&c| c == b' ' || c == 0)
        .unwrap_or(row.len());
    let bytes: Vec<u8> = row.iter().take(len).copied().collect();
    VariableId::from(bytes)
}
