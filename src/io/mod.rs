/*!
# IO utilities

Bag matrices loading and ARFF files saving.
!*/
pub mod reader;
pub mod writer;
