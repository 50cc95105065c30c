//! Reading and in-place patching of named scalar fields in simulation
//! initialization files.
//!
//! Only the value column of a field is ever rewritten; every other byte of
//! the file, including column padding, is preserved.

mod grammar;
mod store;

pub use grammar::{FieldSpan, Located, RecordCodec};
pub use store::{read_params, write_params, RecordStore};
