//! Path conventions for entity directories and their partition files

pub mod entity;
