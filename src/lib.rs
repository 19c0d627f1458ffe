//! Doc-Attribute matrix (Bag) to ARFF conversion.
//!
//! - [io] holds the Bag reader and the ARFF writer,
//! - [processing] holds single-file conversion and batch running.
pub mod error;
pub mod io;
pub mod processing;
