pub mod plan;
pub mod read;
pub mod script;
pub mod write;
