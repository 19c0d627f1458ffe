/*! Content processing

Single file conversion ([convert]) and whole directory conversion ([batch]).
!*/
pub mod batch;
pub mod convert;

pub use batch::{run, Config, Summary};
pub use convert::{convert, ConversionJob, Converter, FeatureDictionary, LabelPart, SparseMatrix};
