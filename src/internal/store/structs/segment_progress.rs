//! 单个分段的持久化进度：区间与段内已确认字节数。

/// 单个分段的进度记录。
///
/// `confirmed` 为该段内已写盘并确认的字节数，单调不减，已知区间时不超过段长。
/// `end` 为 `None` 表示开放区间（大小未知的单流下载），完成与否由流结束判定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentProgress {
    /// 分段在整体中的起始偏移（字节）
    pub start: u64,
    /// 分段结束偏移（字节，含端点）；大小未知的单流下载为 `None`
    pub end: Option<u64>,
    /// 段内已确认的字节数
    pub confirmed: u64,
}

impl SegmentProgress {
    /// 从已知区间创建，进度归零。
    pub fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
            confirmed: 0,
        }
    }

    /// 创建开放区间（大小未知的单流下载）。
    pub fn open_ended(start: u64) -> Self {
        Self {
            start,
            end: None,
            confirmed: 0,
        }
    }

    /// 分段长度（字节）；开放区间返回 `None`。
    pub fn len(&self) -> Option<u64> {
        self.end.map(|end| end - self.start + 1)
    }

    /// 段内还差多少字节；开放区间返回 `None`。
    pub fn remaining(&self) -> Option<u64> {
        self.len().map(|len| len.saturating_sub(self.confirmed))
    }

    /// 该段是否已全部确认；开放区间永远返回 `false`，由流结束判定完成。
    pub fn is_complete(&self) -> bool {
        matches!(self.remaining(), Some(0))
    }

    /// 下一个待写入的绝对偏移（续传起点）。
    pub fn next_offset(&self) -> u64 {
        self.start + self.confirmed
    }
}
