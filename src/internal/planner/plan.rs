//! 分段规划：把 `[0, total)` 划分成若干连续、不重叠的字节区间。

use thiserror::Error;

use super::structs::segment::Segment;

/// 分段规划错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("总大小必须大于 0")]
    ZeroTotalSize,

    #[error("并发数必须大于 0")]
    ZeroConcurrency,
}

/// 按期望并发数划分 `[0, total_size)`：每段 `total_size / n` 字节（向下取整），
/// 最后一段延伸到 `total_size - 1`，吸收整除余数。
///
/// 并发数大于总字节数时，实际分段数收敛为总字节数，保证每段至少 1 字节。
/// 纯函数，无副作用。
pub fn plan_segments(total_size: u64, concurrency: usize) -> Result<Vec<Segment>, PlanError> {
    if total_size == 0 {
        return Err(PlanError::ZeroTotalSize);
    }
    if concurrency == 0 {
        return Err(PlanError::ZeroConcurrency);
    }

    let count = (concurrency as u64).min(total_size);
    let seg_size = total_size / count;

    let mut segments = Vec::with_capacity(count as usize);
    for i in 0..count {
        let start = i * seg_size;
        let end = if i == count - 1 {
            total_size - 1
        } else {
            start + seg_size - 1
        };
        segments.push(Segment { start, end });
    }
    Ok(segments)
}
