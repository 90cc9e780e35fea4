//! 单个分段的终态。

/// 分段取回的终态；每个分段独立到达自己的终态，互不影响。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// 段内字节已全部确认（或开放区间的流正常结束）
    Completed,
    /// 重试耗尽或遇到不可重试的失败
    Failed,
    /// 收到取消信号，在缓冲边界停下；记录保持可续传状态，不再重试
    Cancelled,
}
