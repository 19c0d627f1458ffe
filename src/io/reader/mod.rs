/*! Bag files reading

See [bag] for the file layout.
!*/
pub mod bag;

pub use bag::{BagDocument, BagHeader, BagReader};
