//! 取段测试：续传只请求未确认区间、重试耗尽、取消在缓冲边界生效。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::fetcher::{FetchSegmentParams, SegmentOutcome, fetch_segment};
use crate::store::{ProgressStore, SegmentProgress, TransferDescriptor};
use crate::tests::{MockServer, ServerBehavior, make_payload, parse_range_start};

/// 搭一套取段环境：模拟服务器、目标文件、存储与两段划分的记录。
async fn setup(
    payload: &[u8],
    behavior: ServerBehavior,
) -> (
    MockServer,
    tempfile::TempDir,
    Arc<ProgressStore>,
    Arc<Mutex<TransferDescriptor>>,
    tokio::fs::File,
) {
    let server = MockServer::spawn(payload.to_vec(), behavior).await;
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ProgressStore::open(dir.path().join("store")).await.unwrap());

    let dest = dir.path().join("out.bin");
    let file = tokio::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .read(true)
        .open(&dest)
        .await
        .unwrap();
    file.set_len(payload.len() as u64).await.unwrap();

    let half = payload.len() as u64 / 2;
    let descriptor = TransferDescriptor {
        source: server.url.clone(),
        dest: dest.to_string_lossy().into_owned(),
        total_size: Some(payload.len() as u64),
        segments: vec![
            SegmentProgress::new(0, half - 1),
            SegmentProgress::new(half, payload.len() as u64 - 1),
        ],
        completed: false,
    };

    (server, dir, store, Arc::new(Mutex::new(descriptor)), file)
}

fn params(
    server: &MockServer,
    seg_index: usize,
    file: tokio::fs::File,
    descriptor: &Arc<Mutex<TransferDescriptor>>,
    store: &Arc<ProgressStore>,
    cancel: CancellationToken,
) -> FetchSegmentParams {
    FetchSegmentParams {
        client: reqwest::Client::new(),
        url: server.url.clone(),
        seg_index,
        file,
        descriptor: Arc::clone(descriptor),
        store: Arc::clone(store),
        cancel,
        max_retries: 3,
        read_timeout: Duration::from_secs(5),
    }
}

/// 续传正确性：段内已确认 k 字节时，重新取段只请求 `[start + k, end]`，
/// 绝不重复请求 `start + k` 之前的字节。
#[tokio::test]
async fn resume_requests_only_unconfirmed_range() {
    let payload = make_payload(64 * 1024, 7);
    let (server, _dir, store, descriptor, file) = setup(&payload, ServerBehavior::default()).await;

    let k = 10_000u64;
    let (seg_start, seg_end) = {
        let mut d = descriptor.lock().await;
        d.segments[1].confirmed = k;
        let seg = d.segments[1];
        (seg.start, seg.end.unwrap())
    };

    let outcome = fetch_segment(params(
        &server,
        1,
        file,
        &descriptor,
        &store,
        CancellationToken::new(),
    ))
    .await;
    assert_eq!(outcome, SegmentOutcome::Completed);

    let ranges = server.ranges_seen.lock().unwrap().clone();
    assert_eq!(ranges, vec![format!("bytes={}-{}", seg_start + k, seg_end)]);

    let d = descriptor.lock().await;
    assert!(d.segments[1].is_complete());
}

/// 已完成的段不发任何请求。
#[tokio::test]
async fn completed_segment_issues_no_request() {
    let payload = make_payload(8 * 1024, 3);
    let (server, _dir, store, descriptor, file) = setup(&payload, ServerBehavior::default()).await;

    {
        let mut d = descriptor.lock().await;
        let len = d.segments[0].len().unwrap();
        d.segments[0].confirmed = len;
    }

    let outcome = fetch_segment(params(
        &server,
        0,
        file,
        &descriptor,
        &store,
        CancellationToken::new(),
    ))
    .await;
    assert_eq!(outcome, SegmentOutcome::Completed);
    assert!(server.ranges_seen.lock().unwrap().is_empty());
}

/// 重试上限：每次请求都瞬时失败的段，恰好尝试 max_retries 次后报 Failed。
#[tokio::test]
async fn transient_failures_exhaust_retry_cap() {
    let payload = make_payload(64 * 1024, 11);
    let behavior = ServerBehavior {
        // 第二段整个区间都故障，响应体一个字节都不给
        fail_range_starting_in: Some((32 * 1024, 64 * 1024 - 1)),
        truncate_body_at: 0,
        ..Default::default()
    };
    let (server, _dir, store, descriptor, file) = setup(&payload, behavior).await;

    let outcome = fetch_segment(params(
        &server,
        1,
        file,
        &descriptor,
        &store,
        CancellationToken::new(),
    ))
    .await;
    assert_eq!(outcome, SegmentOutcome::Failed);
    assert_eq!(server.requests_starting_in(32 * 1024, 64 * 1024 - 1), 3);
}

/// 服务器返回非 200/206 视为无内容可取：不重试，直接 Failed。
#[tokio::test]
async fn unexpected_status_is_terminal_without_retry() {
    let payload = make_payload(8 * 1024, 5);
    let behavior = ServerBehavior {
        get_status: Some(404),
        ..Default::default()
    };
    let (server, _dir, store, descriptor, file) = setup(&payload, behavior).await;

    let outcome = fetch_segment(params(
        &server,
        0,
        file,
        &descriptor,
        &store,
        CancellationToken::new(),
    ))
    .await;
    assert_eq!(outcome, SegmentOutcome::Failed);
    assert_eq!(server.ranges_seen.lock().unwrap().len(), 1, "不重试");
}

/// 预先触发取消：不发请求，直接报 Cancelled。
#[tokio::test]
async fn cancelled_before_start() {
    let payload = make_payload(8 * 1024, 9);
    let (server, _dir, store, descriptor, file) = setup(&payload, ServerBehavior::default()).await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = fetch_segment(params(&server, 0, file, &descriptor, &store, cancel)).await;
    assert_eq!(outcome, SegmentOutcome::Cancelled);
    assert!(server.ranges_seen.lock().unwrap().is_empty());
}

/// 并发取段各自持有独立打开的文件句柄：互不共享文件游标，
/// 交错的 seek + write 不会把字节错位写进对方的区间。
#[tokio::test]
async fn concurrent_segments_with_own_handles_leave_file_byte_identical() {
    let payload = make_payload(256 * 1024, 17);
    let (server, _dir, store, descriptor, file_a) = setup(&payload, ServerBehavior::default()).await;

    let dest = descriptor.lock().await.dest.clone();
    let file_b = tokio::fs::OpenOptions::new()
        .write(true)
        .open(&dest)
        .await
        .unwrap();

    let task_a = tokio::spawn(fetch_segment(params(
        &server,
        0,
        file_a,
        &descriptor,
        &store,
        CancellationToken::new(),
    )));
    let task_b = tokio::spawn(fetch_segment(params(
        &server,
        1,
        file_b,
        &descriptor,
        &store,
        CancellationToken::new(),
    )));

    assert_eq!(task_a.await.unwrap(), SegmentOutcome::Completed);
    assert_eq!(task_b.await.unwrap(), SegmentOutcome::Completed);
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), payload);
}

/// 发了 Range 却收到 200（服务器忽略区间）：本段确认量归零从头重写，
/// 而不是把从第 0 字节开始的响应体错位写到续传偏移上。
#[tokio::test]
async fn full_content_response_to_ranged_request_restarts_segment() {
    let payload = make_payload(32 * 1024, 15);
    let behavior = ServerBehavior {
        support_ranges: false,
        ..Default::default()
    };
    let server = MockServer::spawn(payload.to_vec(), behavior).await;
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(ProgressStore::open(dir.path().join("store")).await.unwrap());

    let dest = dir.path().join("out.bin");
    let file = tokio::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .open(&dest)
        .await
        .unwrap();
    file.set_len(payload.len() as u64).await.unwrap();

    // 单段覆盖整个文件，假装之前已确认 5000 字节
    let mut d = TransferDescriptor::new(server.url.clone(), dest.to_string_lossy().into_owned());
    d.apply_single_stream(Some(payload.len() as u64));
    d.segments[0].confirmed = 5000;
    let descriptor = Arc::new(Mutex::new(d));

    let outcome = fetch_segment(params(
        &server,
        0,
        file,
        &descriptor,
        &store,
        CancellationToken::new(),
    ))
    .await;
    assert_eq!(outcome, SegmentOutcome::Completed);

    // 续传请求发出去了，但服务器没理会
    let ranges = server.ranges_seen.lock().unwrap().clone();
    assert_eq!(ranges, vec![format!("bytes=5000-{}", payload.len() - 1)]);

    // 归零重写后文件逐字节一致
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), payload);
    let d = descriptor.lock().await;
    assert_eq!(d.segments[0].confirmed, payload.len() as u64);
}

/// 瞬时失败后的重试从最近确认的偏移继续，而不是从段首重来。
#[tokio::test]
async fn retry_resumes_from_confirmed_offset() {
    let payload = make_payload(64 * 1024, 13);
    let behavior = ServerBehavior {
        fail_range_starting_in: Some((0, 16 * 1024)),
        // 先给 16 KiB 再断开：重试起点应当前移
        truncate_body_at: 16 * 1024,
        ..Default::default()
    };
    let (server, _dir, store, descriptor, file) = setup(&payload, behavior).await;

    let outcome = fetch_segment(params(
        &server,
        0,
        file,
        &descriptor,
        &store,
        CancellationToken::new(),
    ))
    .await;
    assert_eq!(outcome, SegmentOutcome::Completed);

    let ranges = server.ranges_seen.lock().unwrap().clone();
    assert!(ranges.len() >= 2, "至少经历一次重试: {ranges:?}");
    let starts: Vec<u64> = ranges.iter().filter_map(|r| parse_range_start(r)).collect();
    for pair in starts.windows(2) {
        assert!(pair[1] > pair[0], "重试起点必须单调前移: {starts:?}");
    }
}
