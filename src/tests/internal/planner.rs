//! 分段规划测试：划分律（互不重叠、连续、覆盖 `[0, total)`）与边界情况。

use crate::planner::{PlanError, Segment, plan_segments};

/// 校验一组分段恰好划分 `[0, total)`。
fn assert_partition(segments: &[Segment], total: u64) {
    assert!(!segments.is_empty());
    assert_eq!(segments[0].start, 0);
    assert_eq!(segments.last().unwrap().end, total - 1);
    for pair in segments.windows(2) {
        assert_eq!(pair[0].end + 1, pair[1].start, "分段必须连续且不重叠");
    }
    let sum: u64 = segments.iter().map(|s| s.len()).sum();
    assert_eq!(sum, total, "分段长度之和必须等于总大小");
}

#[test]
fn evenly_divisible() {
    let segments = plan_segments(4 * 1024 * 1024, 4).unwrap();
    assert_eq!(segments.len(), 4);
    for seg in &segments {
        assert_eq!(seg.len(), 1024 * 1024);
    }
    assert_partition(&segments, 4 * 1024 * 1024);
}

#[test]
fn last_segment_absorbs_remainder() {
    let segments = plan_segments(10, 3).unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].len(), 3);
    assert_eq!(segments[1].len(), 3);
    assert_eq!(segments[2].len(), 4);
    assert_partition(&segments, 10);
}

#[test]
fn partition_law_over_many_inputs() {
    for total in [1u64, 2, 7, 64, 1000, 65537] {
        for concurrency in [1usize, 2, 3, 4, 8, 16] {
            let segments = plan_segments(total, concurrency).unwrap();
            assert_partition(&segments, total);
        }
    }
}

#[test]
fn concurrency_exceeding_total_caps_segment_count() {
    let segments = plan_segments(3, 8).unwrap();
    assert_eq!(segments.len(), 3);
    assert_partition(&segments, 3);
}

#[test]
fn single_segment() {
    let segments = plan_segments(100, 1).unwrap();
    assert_eq!(segments, vec![Segment { start: 0, end: 99 }]);
}

#[test]
fn zero_total_size_rejected() {
    assert_eq!(plan_segments(0, 4), Err(PlanError::ZeroTotalSize));
}

#[test]
fn zero_concurrency_rejected() {
    assert_eq!(plan_segments(100, 0), Err(PlanError::ZeroConcurrency));
}
