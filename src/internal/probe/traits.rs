pub mod capability_probe;

pub use capability_probe::CapabilityProbe;
