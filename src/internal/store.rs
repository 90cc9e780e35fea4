pub mod codec;
pub mod crypto;
pub mod error;
pub mod structs;
