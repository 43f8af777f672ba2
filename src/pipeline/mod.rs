// Record normalization: per-record rules and batch execution

pub mod batch;
pub mod processing;

pub use batch::{BatchOutput, BatchReport, BatchRunner};
