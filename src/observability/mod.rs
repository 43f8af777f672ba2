// Observability: metrics recorded during normalization

pub mod metrics;
