//! Emission of Modelica command scripts (`*.mos`) that run a sequence of
//! simulation experiments and collect their result files.

mod options;
mod writer;

pub use options::{expand_home, ScriptOptions};
pub use writer::{render_script, write_script, ScriptSummary};
