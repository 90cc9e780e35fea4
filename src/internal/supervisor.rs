pub mod error;
pub mod spawn_fetchers;
pub mod structs;
