/*! Bag (Doc-Attribute matrix) reading

A Bag file is laid out as follows:

- line 1: `n_docs n_feats` (whitespace separated),
- line 2: tab separated feature names, the last field being reserved for the class column,
- then one line per document: `n_feats` tab separated values followed by the class label.

[BagReader] parses the first two lines eagerly and then yields [BagDocument]s lazily.
!*/
use std::{
    fs::File,
    io::{BufRead, BufReader, Lines},
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::Error;

/// Matrix dimensions, from the first line of a Bag file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagHeader {
    pub n_docs: usize,
    pub n_feats: usize,
}

impl BagHeader {
    /// Parse `n_docs n_feats`. Returns the reason of the failure as a [String],
    /// position is added by the caller.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut fields = line.split_whitespace();
        let (n_docs, n_feats) = match (fields.next(), fields.next(), fields.next()) {
            (Some(d), Some(f), None) => (d, f),
            _ => {
                return Err(format!(
                    "expected two counts `n_docs n_feats`, got {:?}",
                    line
                ))
            }
        };

        let n_docs = n_docs
            .parse()
            .map_err(|_| format!("invalid document count {:?}", n_docs))?;
        let n_feats = n_feats
            .parse()
            .map_err(|_| format!("invalid feature count {:?}", n_feats))?;

        Ok(Self { n_docs, n_feats })
    }
}

/// One row of the matrix.
///
/// Values are kept as written in the file. They are checked to be finite numbers at parse
/// time, without surrounding whitespace, but never reformatted.
#[derive(Debug, Clone, PartialEq)]
pub struct BagDocument {
    values: Vec<String>,
    label: String,
}

impl BagDocument {
    /// Parse a document line (without its line terminator).
    pub fn parse(line: &str, n_feats: usize) -> Result<Self, String> {
        let mut fields: Vec<&str> = line.split('\t').collect();

        // split always yields at least one field
        let label = fields.pop().unwrap_or_default();
        if fields.len() != n_feats {
            return Err(format!(
                "expected {} values and a class label, got {} fields",
                n_feats,
                fields.len() + 1
            ));
        }

        for (col, value) in fields.iter().enumerate() {
            match value.parse::<f64>() {
                Ok(v) if v.is_finite() => (),
                _ => return Err(format!("non numeric value {:?} at column {}", value, col)),
            }
        }

        Ok(Self {
            values: fields.into_iter().map(String::from).collect(),
            label: label.to_string(),
        })
    }

    /// Non-zero values along with their (0-based) column index.
    pub fn non_zero(&self) -> impl Iterator<Item = (usize, &str)> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| !is_zero(v))
            .map(|(col, v)| (col, v.as_str()))
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// `0`, `0.0`, `-0`, `0e3`... are all zeroes.
#[inline]
fn is_zero(value: &str) -> bool {
    matches!(value.parse::<f64>(), Ok(v) if v == 0.0)
}

/// Reads a Bag file.
///
/// Iterating yields documents along with their 1-based line number in the file.
/// Blank lines are skipped.
#[derive(Debug)]
pub struct BagReader<R> {
    path: PathBuf,
    header: BagHeader,
    feature_line: String,
    lines: Lines<R>,
    line_nb: usize,
}

impl BagReader<BufReader<File>> {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        debug!("opening {:?}", path);
        let f = File::open(path)?;
        Self::new(BufReader::new(f), path)
    }
}

impl<R: BufRead> BagReader<R> {
    /// Read the counts and feature names lines.
    ///
    /// `path` is only used to give context to errors.
    pub fn new(inner: R, path: &Path) -> Result<Self, Error> {
        let mut lines = inner.lines();
        let header_err = |line, reason| Error::MalformedHeader {
            path: path.to_path_buf(),
            line,
            reason,
        };
        let read_err = |line, source| Error::Read {
            path: path.to_path_buf(),
            line,
            source,
        };

        let counts = lines
            .next()
            .transpose()
            .map_err(|e| read_err(1, e))?
            .ok_or_else(|| header_err(1, "empty file".to_string()))?;
        let header = BagHeader::parse(&counts).map_err(|reason| header_err(1, reason))?;

        let feature_line = lines
            .next()
            .transpose()
            .map_err(|e| read_err(2, e))?
            .ok_or_else(|| header_err(2, "missing feature names line".to_string()))?;

        Ok(Self {
            path: path.to_path_buf(),
            header,
            feature_line,
            lines,
            line_nb: 2,
        })
    }

    pub fn header(&self) -> BagHeader {
        self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Line number of the last line read.
    pub fn line_nb(&self) -> usize {
        self.line_nb
    }

    /// Attribute names of the ARFF file.
    ///
    /// When `print_features` is set, the first `n_feats` names of the header line are used
    /// (its last field is the class column and is never used). Otherwise names are `f1..fn`.
    pub fn attribute_names(&self, print_features: bool) -> Result<Vec<String>, Error> {
        let n_feats = self.header.n_feats;
        if !print_features {
            return Ok((1..=n_feats).map(|i| format!("f{}", i)).collect());
        }

        let mut names: Vec<&str> = self.feature_line.split('\t').collect();
        names.pop();
        if names.len() < n_feats {
            return Err(Error::MalformedHeader {
                path: self.path.clone(),
                line: 2,
                reason: format!(
                    "expected {} feature names, got {}",
                    n_feats,
                    names.len()
                ),
            });
        }

        Ok(names
            .into_iter()
            .take(n_feats)
            .map(String::from)
            .collect())
    }
}

impl<R: BufRead> Iterator for BagReader<R> {
    type Item = Result<(usize, BagDocument), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_nb += 1;
            let line = match line {
                Ok(line) => line,
                Err(source) => {
                    return Some(Err(Error::Read {
                        path: self.path.clone(),
                        line: self.line_nb,
                        source,
                    }))
                }
            };

            // `lines` already removed `\n`/`\r\n`
            if line.is_empty() {
                continue;
            }

            let doc = BagDocument::parse(&line, self.header.n_feats)
                .map(|doc| (self.line_nb, doc))
                .map_err(|reason| Error::MalformedRecord {
                    path: self.path.clone(),
                    line: self.line_nb,
                    reason,
                });
            return Some(doc);
        }
    }
}
