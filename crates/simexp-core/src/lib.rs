#![deny(missing_docs)]
#![doc = "Value model, parameter trees and experiment descriptors shared by the simexp crates."]

pub mod errors;
mod experiment;
pub mod tree;
mod value;

pub use errors::{ErrorInfo, SimExpError};
pub use experiment::{render_modifier, Experiment};
pub use tree::{flatten, unflatten, FlatMap, ParamNode, ParamTree};
pub use value::Value;
