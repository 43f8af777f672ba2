// Per-record processing: period text parsing, instants, classification

pub mod normalize;
