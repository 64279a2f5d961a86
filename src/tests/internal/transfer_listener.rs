//! 传输监听者测试
//!
//! 测试项：
//! - 1000 字节传输：依次渲染 0.1 / 0.5 / 1.0，然后成功，取消标志从未设置
//! - 用户在 500 字节后取消：下一次进度时调用 cancel，最终经 error（已取消）结束
//! - 通知位被关闭：下一次进度时取消传输，但不渲染用户取消
//! - 失败原因渲染到对应通知
//! - 终态超时：等待方拿到超时错误，传输本身照常结束

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use crate::config::TransferConfig;
use crate::connection::Account;
use crate::listener::start_all_listeners;
use crate::presentation::{FileNotificationHandle, TransferStatus, TransferView};
use crate::tests::{
    RecordingView, TEST_TIMEOUT, ViewEvent, inspect, spawn_executor, wait_for_state,
    wait_update_listener,
};
use crate::transfer::{FileTransferControl, TransferDirection, TransferError, TransferOutcome};
use crate::session::{LoopbackSession, Session};
use crate::ui_thread::UiHandle;

const PEER: &str = "alice@example.org/desktop";

async fn show(ui: &UiHandle<RecordingView>, name: &'static str) -> FileNotificationHandle {
    inspect(ui, move |v: &mut RecordingView| {
        v.show_file_transfer(PEER, name, TransferDirection::Send, false)
    })
    .await
}

/// 等待视图记录到第 `n` 条进度渲染。
async fn wait_progress_count(ui: &UiHandle<RecordingView>, n: usize) {
    wait_for_state(ui, move |v: &RecordingView| v.progress_values().len() >= n).await;
}

#[tokio::test]
async fn thousand_byte_transfer_renders_progress_then_success() {
    let (ui, _executor) = spawn_executor(RecordingView::default());
    let (control, reporter) = FileTransferControl::new();
    let file = show(&ui, "report.pdf").await;
    let id = file.id;

    let listeners = start_all_listeners(&control, &ui, file, "report.pdf", TransferDirection::Send);
    wait_update_listener(&control).await;

    reporter.update(100, 1000);
    wait_progress_count(&ui, 1).await;
    reporter.update(500, 1000);
    wait_progress_count(&ui, 2).await;
    reporter.update(1000, 1000);
    wait_progress_count(&ui, 3).await;
    reporter.finish();

    timeout(TEST_TIMEOUT, listeners.join()).await.unwrap();

    let (events, notification) = inspect(&ui, move |v: &mut RecordingView| {
        (v.events.clone(), v.board.notification(id).cloned())
    })
    .await;
    assert_eq!(
        events,
        vec![
            ViewEvent::Show(id),
            ViewEvent::Progress(id, 0.1),
            ViewEvent::Progress(id, 0.5),
            ViewEvent::Progress(id, 1.0),
            ViewEvent::Success(id),
        ]
    );
    let notification = notification.unwrap();
    assert!(!notification.canceled);
    assert_eq!(notification.status, TransferStatus::Succeeded);
    assert_eq!(notification.progress, 1.0);
    assert!(notification.completed_at.is_some());
}

#[tokio::test]
async fn user_cancel_after_half_stops_transfer_through_error_feed() {
    let (ui, _executor) = spawn_executor(RecordingView::default());
    let (control, reporter) = FileTransferControl::new();
    let file = show(&ui, "movie.mkv").await;
    let id = file.id;

    let listeners = start_all_listeners(&control, &ui, file, "movie.mkv", TransferDirection::Send);
    wait_update_listener(&control).await;

    reporter.update(100, 1000);
    wait_progress_count(&ui, 1).await;
    reporter.update(500, 1000);
    wait_progress_count(&ui, 2).await;

    // 用户点击取消（在 UI 线程上）
    assert!(inspect(&ui, move |v: &mut RecordingView| v.board.request_cancel(id)).await);
    assert!(!control.is_cancel_requested(), "取消要等到下一次进度才传递给生产者");

    // 生产者写完下一块后汇报进度，监听者随即请求取消
    reporter.update(600, 1000);
    timeout(TEST_TIMEOUT, reporter.cancelled())
        .await
        .expect("监听者应该在下一次进度时请求取消");
    assert!(reporter.fail_if_canceled());
    drop(reporter);

    timeout(TEST_TIMEOUT, listeners.join()).await.unwrap();
    assert_eq!(
        control.outcome(),
        Some(TransferOutcome::Failed(TransferError::Canceled))
    );

    let (events, notification) = inspect(&ui, move |v: &mut RecordingView| {
        (v.events.clone(), v.board.notification(id).cloned())
    })
    .await;
    assert!(events.contains(&ViewEvent::Cancel(id)));
    assert_eq!(
        events.last(),
        Some(&ViewEvent::Fail(id, TransferError::Canceled))
    );
    assert!(!events.contains(&ViewEvent::Success(id)));

    let notification = notification.unwrap();
    assert!(notification.canceled);
    assert_eq!(notification.status, TransferStatus::Canceled);
    assert_eq!(notification.progress, 0.6);
}

#[tokio::test]
async fn closed_notification_slot_cancels_on_next_update() {
    let (ui, _executor) = spawn_executor(RecordingView::default());
    let (control, reporter) = FileTransferControl::new();
    let file = show(&ui, "photo.png").await;
    let id = file.id;

    let listeners = start_all_listeners(&control, &ui, file, "photo.png", TransferDirection::Send);
    wait_update_listener(&control).await;

    assert!(inspect(&ui, |v: &mut RecordingView| v.board.close_notification(PEER)).await);

    reporter.update(10, 100);
    timeout(TEST_TIMEOUT, reporter.cancelled())
        .await
        .expect("通知位关闭后应该取消传输");
    reporter.fail_if_canceled();

    timeout(TEST_TIMEOUT, listeners.join()).await.unwrap();
    let events = inspect(&ui, |v: &mut RecordingView| v.events.clone()).await;
    assert!(
        !events.contains(&ViewEvent::Cancel(id)),
        "不是用户取消，不应渲染取消"
    );
    assert_eq!(
        events.last(),
        Some(&ViewEvent::Fail(id, TransferError::Canceled))
    );
}

#[tokio::test]
async fn transport_failure_is_rendered_on_its_notification() {
    let (ui, _executor) = spawn_executor(RecordingView::default());
    let (first_control, first) = FileTransferControl::new();
    let (second_control, second) = FileTransferControl::new();
    let first_file = show(&ui, "a.txt").await;
    let second_file = show(&ui, "b.txt").await;
    let (first_id, second_id) = (first_file.id, second_file.id);

    let first_listeners =
        start_all_listeners(&first_control, &ui, first_file, "a.txt", TransferDirection::Send);
    let second_listeners =
        start_all_listeners(&second_control, &ui, second_file, "b.txt", TransferDirection::Send);

    first.fail(TransferError::Transport("对方断开连接".into()));
    second.finish();

    timeout(TEST_TIMEOUT, first_listeners.join()).await.unwrap();
    timeout(TEST_TIMEOUT, second_listeners.join()).await.unwrap();

    let (a, b) = inspect(&ui, move |v: &mut RecordingView| {
        (
            v.board.notification(first_id).cloned().unwrap(),
            v.board.notification(second_id).cloned().unwrap(),
        )
    })
    .await;
    assert_eq!(
        a.status,
        TransferStatus::Failed("传输失败: 对方断开连接".into())
    );
    assert_eq!(b.status, TransferStatus::Succeeded);
    // 两条通知在同一个可见的通知位中
    assert_eq!(a.generation, b.generation);
}

#[tokio::test]
async fn zero_size_transfer_renders_zero_progress() {
    let (ui, _executor) = spawn_executor(RecordingView::default());
    let (control, reporter) = FileTransferControl::new();
    let file = show(&ui, "empty").await;
    let id = file.id;

    let listeners = start_all_listeners(&control, &ui, file, "empty", TransferDirection::Receive);
    wait_update_listener(&control).await;

    reporter.update(0, 0);
    wait_progress_count(&ui, 1).await;
    reporter.finish();
    timeout(TEST_TIMEOUT, listeners.join()).await.unwrap();

    let events = inspect(&ui, |v: &mut RecordingView| v.events.clone()).await;
    assert_eq!(events[1], ViewEvent::Progress(id, 0.0));
    assert_eq!(events.last(), Some(&ViewEvent::Success(id)));
}

#[tokio::test]
async fn terminal_timeout_only_limits_the_wait() {
    let (ui, _executor) = spawn_executor(RecordingView::default());
    let (control, reporter) = FileTransferControl::new();
    let file = show(&ui, "stalled.iso").await;
    let id = file.id;

    let listeners = start_all_listeners(&control, &ui, file, "stalled.iso", TransferDirection::Send);
    wait_update_listener(&control).await;
    reporter.update(10, 100);

    let result = listeners.wait_outcome(Some(Duration::from_millis(20))).await;
    assert_eq!(result, Err(TransferError::TimedOut));
    assert!(!control.is_terminal());
    assert!(!control.is_cancel_requested());

    // 监听任务仍在运行，之后的结果照常渲染
    reporter.update(100, 100);
    reporter.finish();
    wait_for_state(&ui, move |v: &RecordingView| {
        v.events.contains(&ViewEvent::Success(id))
    })
    .await;
}

#[tokio::test]
async fn account_waits_with_configured_timeout() {
    let (ui, _executor) = spawn_executor(RecordingView::default());
    let session: Arc<dyn Session> = Arc::new(LoopbackSession::new(
        "me@example.org",
        std::env::temp_dir(),
        &TransferConfig::default(),
    ));
    let config = TransferConfig {
        terminal_timeout_ms: Some(20),
        ..TransferConfig::default()
    };
    let account = Account::new(session, ui.clone()).with_transfer_config(&config);

    // 未结束的传输：按配置超时
    let (stalled, _reporter) = FileTransferControl::new();
    let file = show(&ui, "stalled.iso").await;
    let listeners = start_all_listeners(&stalled, &ui, file, "stalled.iso", TransferDirection::Send);
    assert_eq!(
        account.wait_for_transfer(listeners).await,
        Err(TransferError::TimedOut)
    );

    // 超时之前结束的传输：拿到终态，监听任务已交付完毕
    let (control, reporter) = FileTransferControl::new();
    let file = show(&ui, "quick.txt").await;
    let id = file.id;
    let listeners = start_all_listeners(&control, &ui, file, "quick.txt", TransferDirection::Send);
    reporter.fail(TransferError::Transport("连接断开".into()));
    assert_eq!(
        account.wait_for_transfer(listeners).await,
        Ok(TransferOutcome::Failed(TransferError::Transport("连接断开".into())))
    );
    let status = inspect(&ui, move |v: &mut RecordingView| {
        v.board.notification(id).map(|n| n.status.clone())
    })
    .await;
    assert_eq!(
        status,
        Some(TransferStatus::Failed("传输失败: 连接断开".into()))
    );
}
