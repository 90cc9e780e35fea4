pub mod plan;
pub mod structs;
