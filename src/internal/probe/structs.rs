pub mod http_probe;
pub mod remote_capability;

pub use http_probe::HttpProbe;
pub use remote_capability::RemoteCapability;
