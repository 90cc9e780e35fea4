pub mod config;
pub mod entrance;
pub mod fetcher;
pub mod planner;
pub mod probe;
pub mod store;
pub mod supervisor;
