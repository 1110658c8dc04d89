//! IO utilities for file operations
//!
//! This module provides the tabular store used by every pipeline step and
//! the directory conventions for entity and partition files.

pub mod paths;
pub mod tabular;

// Re-export commonly used functions for convenience
pub use paths::entity::{
    EntityDir, consolidated_file_name, find_partition_files, list_entity_dirs,
};
pub use tabular::{read_rows, write_rows};
