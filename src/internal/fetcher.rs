pub mod error;
pub mod fetch_segment;
pub mod flush_handler;
pub mod range_request;
pub mod structs;
