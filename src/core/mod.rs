// Shared tensor containers and element-type tags
pub mod types;
