//! ARFF files writing.
pub mod arff;

pub use arff::ArffWriter;
