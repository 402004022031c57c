pub mod extract;
pub mod name_normalizer;
pub mod shape_resolver;
pub mod stream_detector;

pub use extract::extract;
