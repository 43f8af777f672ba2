pub mod input_source_adapter;
pub mod normalize_output_adapter;
