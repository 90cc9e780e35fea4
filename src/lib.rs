/// 内部导出的模块
mod internal;


/// 导出核心入口函数
pub use internal::entrance::transfer::*;

pub mod config {
    use crate::internal;
    pub use internal::config::error::ConfigError;
    pub use internal::config::structs::transfer_config::*;
}

pub mod planner {
    use crate::internal;
    pub use internal::planner::plan::*;
    pub use internal::planner::structs::segment::*;
}

pub mod probe {
    use crate::internal;
    pub use internal::probe::error::ProbeError;
    pub use internal::probe::structs::http_probe::HttpProbe;
    pub use internal::probe::structs::remote_capability::RemoteCapability;
    pub use internal::probe::traits::capability_probe::CapabilityProbe;
}

pub mod store {
    use crate::internal;
    pub use internal::store::codec::CodecError;
    pub use internal::store::error::StoreError;
    pub use internal::store::structs::progress_store::ProgressStore;
    pub use internal::store::structs::segment_progress::SegmentProgress;
    pub use internal::store::structs::transfer_descriptor::TransferDescriptor;
}

pub mod fetcher {
    use crate::internal;
    pub use internal::fetcher::error::FetchError;
    pub use internal::fetcher::fetch_segment::{FetchSegmentParams, fetch_segment};
    pub use internal::fetcher::structs::segment_outcome::SegmentOutcome;
}

pub mod supervisor {
    use crate::internal;
    pub use internal::supervisor::error::DownloadError;
    pub use internal::supervisor::structs::download_supervisor::DownloadSupervisor;
    pub use internal::supervisor::structs::transfer_report::{TransferReport, TransferState};
}
