//! 传输控制测试
//!
//! 测试项：
//! - 进度单调、比例在 [0,1] 内（随机序列）
//! - finish / error 恰好一个，之后不再有任何事件
//! - 最后一次进度先于终态交付
//! - 取消幂等、结束后取消无害
//! - 总大小为 0、生产者未汇报结果即退出、等待超时

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::time::timeout;

use crate::tests::{TEST_TIMEOUT, wait_update_listener};
use crate::transfer::{
    FileTransferControl, TransferError, TransferOutcome, TransferProgress, progress_ratio,
};

// ═══════════════════════════ 进度比例 ═══════════════════════════

#[test]
fn ratio_truncates_to_whole_percent() {
    assert_eq!(progress_ratio(100, 1000), 0.1);
    assert_eq!(progress_ratio(500, 1000), 0.5);
    assert_eq!(progress_ratio(1000, 1000), 1.0);
    assert_eq!(progress_ratio(1, 3), 0.33);
    assert_eq!(progress_ratio(999, 1000), 0.99);
}

#[test]
fn ratio_with_zero_total_is_zero() {
    assert_eq!(progress_ratio(0, 0), 0.0);
    assert_eq!(progress_ratio(500, 0), 0.0);
    assert_eq!(TransferProgress::new(0, 0).ratio(), 0.0);
    assert!(!TransferProgress::new(0, 0).is_complete());
}

#[test]
fn ratio_is_bounded_and_monotonic_for_random_sequences() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let total: u64 = rng.gen_range(1..=1_000_000);
        let mut done = 0u64;
        let mut last = 0.0f64;
        while done < total {
            done = (done + rng.gen_range(0..=total / 7 + 1)).min(total);
            let ratio = progress_ratio(done, total);
            assert!((0.0..=1.0).contains(&ratio), "比例越界: {}", ratio);
            assert!(ratio >= last, "比例回退: {} -> {}", last, ratio);
            last = ratio;
        }
        assert_eq!(last, 1.0);
    }
}

// ═══════════════════════════ 生产者端 ═══════════════════════════

#[tokio::test]
async fn reporter_clamps_backwards_progress() {
    let (control, reporter) = FileTransferControl::new();
    assert!(reporter.update(500, 1000));
    assert!(!reporter.update(300, 1000), "回退且无变化的进度应被忽略");
    assert_eq!(control.progress(), TransferProgress::new(500, 1000));

    assert!(reporter.update(700, 1000));
    assert_eq!(reporter.progress().done, 700);
}

#[tokio::test]
async fn first_terminal_wins() {
    let (control, reporter) = FileTransferControl::new();
    assert!(reporter.finish());
    assert!(!reporter.fail(TransferError::Transport("迟到的错误".into())));
    assert!(!reporter.finish());
    assert!(!reporter.update(10, 10), "结束后的进度应被忽略");

    assert_eq!(control.outcome(), Some(TransferOutcome::Finished));
    assert!(control.is_terminal());
}

#[tokio::test]
async fn dropped_reporter_reports_producer_gone() {
    let (control, reporter) = FileTransferControl::new();
    reporter.update(10, 100);
    drop(reporter);

    let mut cause = None;
    let fired = control.wait_for_error(|err| cause = Some(err)).await;
    assert!(fired);
    assert_eq!(cause, Some(TransferError::ProducerGone));
}

// ═══════════════════════════ 事件交付 ═══════════════════════════

#[tokio::test]
async fn exactly_one_terminal_event_fires() {
    let (control, reporter) = FileTransferControl::new();
    let finished = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let mut waiters = Vec::new();
    for _ in 0..3 {
        let c = control.clone();
        let f = Arc::clone(&finished);
        waiters.push(tokio::spawn(async move {
            c.wait_for_finish(|| {
                f.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        }));
        let c = control.clone();
        let e = Arc::clone(&failed);
        waiters.push(tokio::spawn(async move {
            c.wait_for_error(|_| {
                e.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        }));
    }

    reporter.update(1, 2);
    reporter.fail(TransferError::Transport("连接断开".into()));
    reporter.finish();

    for w in waiters {
        timeout(TEST_TIMEOUT, w).await.unwrap().unwrap();
    }
    // 每个等待者各自收到一次 error，finish 一次也没有
    assert_eq!(finished.load(Ordering::SeqCst), 0);
    assert_eq!(failed.load(Ordering::SeqCst), 3);

    // 结束后登记的等待者也只会看到同一个终态
    assert!(!control.wait_for_finish(|| panic!("不应触发 finish")).await);
    let mut updates = 0;
    control.wait_for_update(|_| updates += 1).await;
    assert_eq!(updates, 0, "结束后登记的 update 等待者不应收到任何进度");
}

#[tokio::test]
async fn last_update_precedes_terminal_event() {
    let (control, reporter) = FileTransferControl::new();
    let log = Arc::new(Mutex::new(Vec::<String>::new()));

    let c = control.clone();
    let l = Arc::clone(&log);
    let update = tokio::spawn(async move {
        c.wait_for_update(|p| l.lock().unwrap().push(format!("update {}", p.done)))
            .await;
    });
    let c = control.clone();
    let l = Arc::clone(&log);
    let finish = tokio::spawn(async move {
        c.wait_for_finish(|| l.lock().unwrap().push("finish".into()))
            .await;
    });

    wait_update_listener(&control).await;

    // 同一步中汇报最后进度与终态
    reporter.update(1000, 1000);
    reporter.finish();

    timeout(TEST_TIMEOUT, update).await.unwrap().unwrap();
    timeout(TEST_TIMEOUT, finish).await.unwrap().unwrap();

    let log = log.lock().unwrap().clone();
    assert_eq!(log, ["update 1000".to_string(), "finish".into()]);
}

#[tokio::test]
async fn updates_are_non_decreasing() {
    let (control, reporter) = FileTransferControl::new();
    let seen = Arc::new(Mutex::new(Vec::<u64>::new()));

    let c = control.clone();
    let s = Arc::clone(&seen);
    let update = tokio::spawn(async move {
        c.wait_for_update(|p| s.lock().unwrap().push(p.done)).await;
    });
    wait_update_listener(&control).await;

    let producer = tokio::spawn(async move {
        let mut done = 0u64;
        for step in [10u64, 0, 35, 5, 50, 0, 100] {
            done += step;
            // 偶尔汇报一个回退值
            reporter.update(done.saturating_sub(step * 2), 200);
            reporter.update(done, 200);
            tokio::task::yield_now().await;
        }
        reporter.finish();
    });

    timeout(TEST_TIMEOUT, producer).await.unwrap().unwrap();
    timeout(TEST_TIMEOUT, update).await.unwrap().unwrap();

    let seen = seen.lock().unwrap().clone();
    assert!(!seen.is_empty());
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "进度回退: {:?}", seen);
    assert_eq!(*seen.last().unwrap(), 200);
}

// ═══════════════════════════ 取消 ═══════════════════════════

#[tokio::test]
async fn cancel_is_idempotent_and_yields_one_canceled_error() {
    let (control, reporter) = FileTransferControl::new();
    let errors = Arc::new(Mutex::new(Vec::new()));

    let c = control.clone();
    let e = Arc::clone(&errors);
    let waiter = tokio::spawn(async move {
        c.wait_for_error(|err| e.lock().unwrap().push(err)).await;
    });

    control.cancel();
    control.cancel();
    assert!(control.is_cancel_requested());
    assert!(reporter.is_canceled());

    // 生产者在下一个让出点发现取消
    timeout(TEST_TIMEOUT, reporter.cancelled()).await.unwrap();
    assert!(reporter.fail_if_canceled());
    // 已经结束，再次失败不会产生第二个 error
    assert!(!reporter.fail(TransferError::Canceled));
    control.cancel();

    timeout(TEST_TIMEOUT, waiter).await.unwrap().unwrap();
    assert_eq!(*errors.lock().unwrap(), vec![TransferError::Canceled]);
    assert_eq!(
        control.outcome(),
        Some(TransferOutcome::Failed(TransferError::Canceled))
    );
}

#[tokio::test]
async fn cancel_after_finish_is_noop() {
    let (control, reporter) = FileTransferControl::new();
    reporter.update(10, 10);
    reporter.finish();

    control.cancel();
    control.cancel();

    assert!(!reporter.fail(TransferError::Canceled));
    assert_eq!(control.outcome(), Some(TransferOutcome::Finished));
    assert!(control.wait_for_finish(|| ()).await);
    assert!(!control.wait_for_error(|_| ()).await);
}

#[tokio::test]
async fn child_cancel_token_follows_control() {
    let (control, reporter) = FileTransferControl::new();
    let token = reporter.cancel_token();
    assert!(!token.is_cancelled());

    control.cancel();
    assert!(token.is_cancelled());
    assert!(reporter.control().is_cancel_requested());
}

// ═══════════════════════════ 超时 ═══════════════════════════

#[tokio::test]
async fn wait_terminal_timeout_does_not_alter_transfer() {
    let (control, reporter) = FileTransferControl::new();

    let result = control.wait_terminal_timeout(Duration::from_millis(20)).await;
    assert_eq!(result, Err(TransferError::TimedOut));
    assert!(!control.is_terminal());

    reporter.finish();
    let result = control.wait_terminal_timeout(Duration::from_secs(1)).await;
    assert_eq!(result, Ok(TransferOutcome::Finished));
}
