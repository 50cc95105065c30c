//! Design-of-experiments expansion for parameterized simulation runs.

mod generate;
mod hash;
mod plan;
mod serde;

pub use generate::{generate, Experiments, Levels, Strategy};
pub use hash::stable_hash_string;
pub use plan::{DesignPlan, ExperimentTable};

pub use crate::serde::{from_yaml_slice, to_canonical_json_bytes};
