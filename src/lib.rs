pub mod common;
pub mod config;
pub mod domain;
pub mod logging;
pub mod observability;
pub mod pipeline;

// Layered boundaries: use cases depend on ports, adapters live in infra
pub mod app;
pub mod infra;

pub use common::error::{NormalizeError, Result};
pub use domain::{CanonicalRecord, DateRange, DdayToken, Instant, Phase, RawRecord};
pub use pipeline::processing::normalize::{
    normalize, NormalizedRecord, Normalizer, RecordNormalizer,
};
