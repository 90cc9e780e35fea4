//! 分段字节区间：一段连续、不重叠的字节范围，由唯一一个取段任务负责。

/// 单个分段：起始偏移与结束偏移（含端点）。
///
/// 同一次传输的所有分段恰好划分 `[0, total)`：互不重叠、彼此连续、并集覆盖整个区间。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// 分段在整体中的起始偏移（字节）
    pub start: u64,
    /// 分段在整体中的结束偏移（字节，含端点）
    pub end: u64,
}

impl Segment {
    /// 分段长度（字节）。
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}
