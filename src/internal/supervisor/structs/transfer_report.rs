//! 一次传输的最终报告：整体终态与各分段终态。

use crate::internal::fetcher::structs::segment_outcome::SegmentOutcome;

/// 传输整体终态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    /// 所有分段完成且确认字节覆盖总大小；存储条目已删除
    Done,
    /// 至少一个分段失败或被取消；存储条目保留，供下次续传
    Failed,
}

/// 传输报告。分段的部分失败逐段体现在 `segment_outcomes` 中，
/// 不会中断兄弟分段；整体失败在所有分段到达终态后统一报告。
#[derive(Debug, Clone)]
pub struct TransferReport {
    pub state: TransferState,
    /// 各分段终态，顺序与记录中的分段一致
    pub segment_outcomes: Vec<SegmentOutcome>,
    /// 结束时各段已确认字节之和
    pub confirmed_bytes: u64,
    /// 文件总大小；单流且大小始终未知时为 `None`
    pub total_size: Option<u64>,
}

impl TransferReport {
    pub fn is_done(&self) -> bool {
        self.state == TransferState::Done
    }
}
