//! 传输记录：一次传输的身份与进度，持久化于进度存储。

use crate::internal::planner::structs::segment::Segment;

use super::segment_progress::SegmentProgress;

/// 一次传输的持久化记录。
///
/// 内存中由调度器持有，磁盘表示由 [`ProgressStore`](super::progress_store::ProgressStore)
/// 独占读写；所有进度变更都在持有记录锁的前提下进行，变更后立即落盘。
///
/// 不变量：各段 `confirmed` 单调不减（仅当服务器忽略 Range 返回整文件时归零重来）；
/// 总大小已知后，各段确认字节之和不超过总大小。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDescriptor {
    /// 下载来源地址
    pub source: String,
    /// 本地目标文件路径（同时是存储条目的命名依据）
    pub dest: String,
    /// 文件总大小（字节）；探测前未知为 `None`
    pub total_size: Option<u64>,
    /// 各分段的进度；记录里保存分段划分本身，续传时沿用原划分
    pub segments: Vec<SegmentProgress>,
    /// 传输是否已确认完成
    pub completed: bool,
}

impl TransferDescriptor {
    /// 创建全新的传输记录（尚未探测、尚未分段）。
    pub fn new(source: impl Into<String>, dest: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            total_size: None,
            segments: Vec::new(),
            completed: false,
        }
    }

    /// 应用分段规划：写入总大小，并为每个分段建立归零的进度记录。
    pub fn apply_plan(&mut self, total_size: u64, segments: &[Segment]) {
        self.total_size = Some(total_size);
        self.segments = segments
            .iter()
            .map(|s| SegmentProgress::new(s.start, s.end))
            .collect();
    }

    /// 应用单流规划：一个分段覆盖整个区间，大小未知时为开放区间。
    pub fn apply_single_stream(&mut self, total_size: Option<u64>) {
        self.total_size = total_size;
        self.segments = match total_size {
            Some(total) => vec![SegmentProgress::new(0, total - 1)],
            None => vec![SegmentProgress::open_ended(0)],
        };
    }

    /// 各段已确认字节数之和。完成判定以该和为准（各段区间互不重叠）。
    pub fn confirmed_bytes(&self) -> u64 {
        self.segments.iter().map(|s| s.confirmed).sum()
    }

    /// 所有已知区间是否都已确认完毕，且确认总量覆盖总大小。
    pub fn is_fully_confirmed(&self) -> bool {
        match self.total_size {
            Some(total) => self.confirmed_bytes() >= total,
            None => false,
        }
    }
}
