pub mod operations;
pub mod shape;
pub mod types;

pub use operations::*;
pub use shape::{ObjectShape, Shape};
pub use types::{ApiInfo, ExtractedApi, NormalizedName, SchemaRecord};
