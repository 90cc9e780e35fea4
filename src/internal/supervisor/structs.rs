pub mod download_supervisor;
pub mod transfer_report;

pub use download_supervisor::DownloadSupervisor;
pub use transfer_report::{TransferReport, TransferState};
