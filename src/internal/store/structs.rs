pub mod progress_store;
pub mod segment_progress;
pub mod transfer_descriptor;

pub use progress_store::ProgressStore;
pub use segment_progress::SegmentProgress;
pub use transfer_descriptor::TransferDescriptor;
