//! User-supplied renames and service grouping.

pub mod grouping;
pub mod rename;
pub mod table;

pub use grouping::{DEFAULT_SERVICE, GroupedOperations, group_by_service};
pub use rename::apply_mappings;
pub use table::{MAPPING_FILE_NAME, MappingState, MappingTable, OperationMapping, load_mapping};
