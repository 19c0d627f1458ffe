//! ARFF (Weka) writer.
//!
//! Produces sparse ARFF files:
//!
//! ```text
//! @relation name.arff
//!
//! @attribute word numeric
//! @attribute class_atr {'a','b'}
//!
//! @data
//! {0 5, 1 'a'}
//! ```
use std::{
    fs::File,
    io::{BufWriter, Write},
    iter,
    path::Path,
};

use itertools::Itertools;

use crate::error::Error;

/// Name of the class attribute.
pub const CLASS_ATTRIBUTE: &str = "class_atr";

/// Writes a single ARFF file.
///
/// The header has to be written before any row.
/// [ArffWriter::finish] flushes the underlying writer and gives it back.
pub struct ArffWriter<W: Write> {
    inner: W,
    n_feats: usize,
    rows: usize,
}

impl ArffWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: &Path) -> Result<Self, Error> {
        let f = File::create(path)?;
        Ok(Self::new(BufWriter::new(f)))
    }
}

impl<W: Write> ArffWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            n_feats: 0,
            rows: 0,
        }
    }

    /// Write relation, attributes, class set and `@data` marker.
    ///
    /// Class labels are written as-is (they are expected to be already quoted).
    pub fn write_header<S, L>(
        &mut self,
        relation: &str,
        attributes: &[S],
        classes: &[L],
    ) -> Result<(), Error>
    where
        S: AsRef<str>,
        L: AsRef<str>,
    {
        writeln!(self.inner, "@relation {}", relation)?;
        writeln!(self.inner)?;
        for attribute in attributes {
            writeln!(self.inner, "@attribute {} numeric", attribute.as_ref())?;
        }
        writeln!(
            self.inner,
            "@attribute {} {{{}}}",
            CLASS_ATTRIBUTE,
            classes.iter().map(AsRef::as_ref).join(",")
        )?;
        writeln!(self.inner)?;
        writeln!(self.inner, "@data")?;

        self.n_feats = attributes.len();
        Ok(())
    }

    /// Write a sparse row: non-zero `(column, value)` pairs then the class label,
    /// which sits at column `n_feats`.
    pub fn write_row<'a, I>(&mut self, values: I, label: &str) -> Result<(), Error>
    where
        I: IntoIterator<Item = (usize, &'a str)>,
    {
        let n_feats = self.n_feats;
        let pairs = values
            .into_iter()
            .map(|(col, value)| format!("{} {}", col, value))
            .chain(iter::once(format!("{} {}", n_feats, label)))
            .join(", ");

        writeln!(self.inner, "{{{}}}", pairs)?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> Result<W, Error> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}
