/*! Bag to ARFF conversion

Converts a single Bag file into one ARFF file, or three when a split token is provided:

- `<name>.arff` holds the combined label (`first<token>second`),
- the `_1st_` and `_2nd_` files hold the first and second part of the label.

The whole input is parsed before anything is written, so a malformed file leaves no output behind.
!*/
use std::{
    collections::{BTreeMap, HashMap},
    path::{Path, PathBuf},
};

use log::debug;

use crate::{
    error::Error,
    io::{reader::BagReader, writer::ArffWriter},
};

/// Marker replaced in file and relation names of split outputs.
pub const SPLIT_MARKER: &str = "_1st-2nd_";

/// Maps labels to dense indices, in first-seen order.
#[derive(Debug, Default, Clone)]
pub struct FeatureDictionary {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the index of `label`, inserting it at the end if it is not known yet.
    pub fn get_or_insert(&mut self, label: &str) -> usize {
        if let Some(idx) = self.index.get(label) {
            return *idx;
        }
        let idx = self.labels.len();
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), idx);
        idx
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.labels.get(idx).map(String::as_str)
    }

    /// Labels in insertion order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Sparse `n_rows × n_cols` matrix, stored as one ordered column→value map per row.
///
/// Rows are allocated when first written to.
#[derive(Debug, Default, Clone)]
pub struct SparseMatrix {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<BTreeMap<usize, String>>,
}

impl SparseMatrix {
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: Vec::new(),
        }
    }

    /// Set a cell. Fails if the cell is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: &str) -> Result<(), String> {
        if row >= self.n_rows || col >= self.n_cols {
            return Err(format!(
                "cell ({}, {}) out of bounds ({}x{})",
                row, col, self.n_rows, self.n_cols
            ));
        }
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, BTreeMap::new);
        }
        self.rows[row].insert(col, value.to_string());
        Ok(())
    }

    /// Stored cells of a row, by increasing column.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, &str)> {
        self.rows
            .get(row)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(col, v)| (*col, v.as_str())))
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }
}

/// Which label an output file is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPart {
    Combined,
    First,
    Second,
}

impl LabelPart {
    /// File (and relation) name of the output for the input named `file_name`.
    ///
    /// Split outputs replace [SPLIT_MARKER] with `_1st_`/`_2nd_`. Names without the marker
    /// get a `_1st`/`_2nd` suffix instead, so that no output overwrites another.
    pub fn arff_name(&self, file_name: &str) -> String {
        let (part, suffix) = match self {
            LabelPart::Combined => return format!("{}.arff", file_name),
            LabelPart::First => ("_1st_", "_1st"),
            LabelPart::Second => ("_2nd_", "_2nd"),
        };
        if file_name.contains(SPLIT_MARKER) {
            format!("{}.arff", file_name.replace(SPLIT_MARKER, part))
        } else {
            format!("{}{}.arff", file_name, suffix)
        }
    }
}

/// Split `label` on the first occurrence of `token`.
pub fn split_label<'a>(label: &'a str, token: &str) -> Result<(&'a str, &'a str), String> {
    if token.is_empty() {
        return Err("empty split token".to_string());
    }
    label
        .split_once(token)
        .ok_or_else(|| format!("class label {:?} does not contain token {:?}", label, token))
}

#[inline]
fn quote(label: &str) -> String {
    format!("'{}'", label)
}

/// Class column of an output file: the label set and each row's label index.
#[derive(Debug, Default)]
struct ClassColumn {
    dictionary: FeatureDictionary,
    rows: Vec<usize>,
}

impl ClassColumn {
    fn push(&mut self, label: &str) {
        let idx = self.dictionary.get_or_insert(&quote(label));
        self.rows.push(idx);
    }

    fn label(&self, row: usize) -> Option<&str> {
        self.rows.get(row).and_then(|idx| self.dictionary.get(*idx))
    }
}

/// Per-file unit of work.
#[derive(Debug, Clone)]
pub struct ConversionJob {
    src: PathBuf,
    file_name: String,
    dst: PathBuf,
    token: Option<String>,
    print_features: bool,
}

impl ConversionJob {
    /// `dst` is the output directory.
    pub fn new(src: &Path, dst: &Path, token: Option<&str>, print_features: bool) -> Self {
        let file_name = src
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            src: src.to_path_buf(),
            file_name,
            dst: dst.to_path_buf(),
            token: token.map(String::from),
            print_features,
        }
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    /// Produced label parts, in writing order.
    pub fn parts(&self) -> Vec<LabelPart> {
        match self.token {
            Some(_) => vec![LabelPart::Combined, LabelPart::First, LabelPart::Second],
            None => vec![LabelPart::Combined],
        }
    }

    /// Output paths, in the same order as [ConversionJob::parts].
    pub fn outputs(&self) -> Vec<PathBuf> {
        self.parts()
            .iter()
            .map(|part| self.dst.join(part.arff_name(&self.file_name)))
            .collect()
    }
}

/// Fully parsed Bag file, ready to be written.
#[derive(Debug)]
pub struct Converter {
    attributes: Vec<String>,
    matrix: SparseMatrix,
    combined: ClassColumn,
    split: Option<(ClassColumn, ClassColumn)>,
}

impl Converter {
    /// Read and index the job's input file.
    pub fn load(job: &ConversionJob) -> Result<Self, Error> {
        let reader = BagReader::from_path(&job.src)?;
        Self::from_reader(reader, job.token.as_deref(), job.print_features)
    }

    pub fn from_reader<R>(
        mut reader: BagReader<R>,
        token: Option<&str>,
        print_features: bool,
    ) -> Result<Self, Error>
    where
        R: std::io::BufRead,
    {
        let header = reader.header();
        let attributes = reader.attribute_names(print_features)?;
        debug!(
            "{:?}: {} documents, {} features",
            reader.path(),
            header.n_docs,
            header.n_feats
        );

        let mut matrix = SparseMatrix::new(header.n_docs, header.n_feats);
        let mut combined = ClassColumn::default();
        let mut split = token.map(|_| (ClassColumn::default(), ClassColumn::default()));
        let mut doc_idx = 0;
        let path = reader.path().to_path_buf();

        for doc in reader.by_ref() {
            let (line, doc) = doc?;
            let record_err = |reason| Error::MalformedRecord {
                path: path.clone(),
                line,
                reason,
            };

            if doc_idx >= header.n_docs {
                return Err(record_err(format!(
                    "more documents than the {} declared",
                    header.n_docs
                )));
            }

            for (col, value) in doc.non_zero() {
                matrix.set(doc_idx, col, value).map_err(record_err)?;
            }

            if let (Some(token), Some((first, second))) = (token, split.as_mut()) {
                let (first_label, second_label) =
                    split_label(doc.label(), token).map_err(record_err)?;
                first.push(first_label);
                second.push(second_label);
            }
            combined.push(doc.label());

            doc_idx += 1;
        }

        if doc_idx != header.n_docs {
            return Err(Error::MalformedRecord {
                path,
                line: reader.line_nb(),
                reason: format!(
                    "expected {} documents, got {}",
                    header.n_docs, doc_idx
                ),
            });
        }

        Ok(Self {
            attributes,
            matrix,
            combined,
            split,
        })
    }

    /// Labels of the class attribute for a given part, in first-seen order.
    pub fn classes(&self, part: LabelPart) -> Option<&[String]> {
        self.column(part).map(|c| c.dictionary.labels())
    }

    pub fn n_docs(&self) -> usize {
        self.matrix.n_rows()
    }

    fn column(&self, part: LabelPart) -> Option<&ClassColumn> {
        match (part, &self.split) {
            (LabelPart::Combined, _) => Some(&self.combined),
            (LabelPart::First, Some((first, _))) => Some(first),
            (LabelPart::Second, Some((_, second))) => Some(second),
            _ => None,
        }
    }

    /// Write the ARFF file for `part` into `writer`.
    pub fn write_part<W>(
        &self,
        part: LabelPart,
        relation: &str,
        writer: &mut ArffWriter<W>,
    ) -> Result<(), Error>
    where
        W: std::io::Write,
    {
        let column = self.column(part).ok_or_else(|| {
            Error::Custom(format!("no {:?} labels without a split token", part))
        })?;

        writer.write_header(relation, &self.attributes, column.dictionary.labels())?;
        for row in 0..self.matrix.n_rows() {
            let label = column
                .label(row)
                .ok_or_else(|| Error::Custom(format!("no label for document {}", row)))?;
            writer.write_row(self.matrix.row(row), label)?;
        }
        Ok(())
    }
}

/// Convert a single file, returning the number of written ARFF files.
///
/// Each output file is closed before returning, whether writing succeeded or not.
pub fn convert(job: &ConversionJob) -> Result<usize, Error> {
    let converter = Converter::load(job)?;

    let parts = job.parts();
    for (part, path) in parts.iter().zip(job.outputs()) {
        debug!(
            "writing {:?} ({} classes)",
            path,
            converter.classes(*part).map_or(0, <[String]>::len)
        );
        let mut writer = ArffWriter::create(&path)?;
        converter.write_part(*part, &part.arff_name(&job.file_name), &mut writer)?;
        debug!("{:?}: {}/{} rows", path, writer.rows(), converter.n_docs());
        writer.finish()?;
    }

    Ok(parts.len())
}
