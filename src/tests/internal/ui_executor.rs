//! UI 执行器测试
//!
//! 测试项：
//! - 投递的任务按 FIFO 顺序执行，`call` 返回值
//! - 停止后投递失败、排队任务被丢弃
//! - 任务 panic 不影响执行器
//! - `run_pending` 嵌入外部事件循环

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::time::timeout;

use crate::tests::{TEST_TIMEOUT, inspect, spawn_executor};
use crate::ui_thread::{UiError, UiExecutor};

#[tokio::test]
async fn tasks_run_in_fifo_order() {
    let (ui, executor) = spawn_executor(Vec::<u32>::new());

    for i in 0..100 {
        ui.post(move |v: &mut Vec<u32>| v.push(i)).unwrap();
    }
    let seen = inspect(&ui, |v: &mut Vec<u32>| v.clone()).await;
    assert_eq!(seen, (0..100).collect::<Vec<_>>());

    drop(ui);
    let state = timeout(TEST_TIMEOUT, executor).await.unwrap().unwrap();
    assert_eq!(state.len(), 100);
}

#[tokio::test]
async fn posts_from_many_tasks_are_serialized() {
    let (ui, executor) = spawn_executor(0u64);

    let mut handles = Vec::new();
    for _ in 0..10 {
        let ui = ui.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..100 {
                ui.post(|n: &mut u64| *n += 1).unwrap();
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(inspect(&ui, |n: &mut u64| *n).await, 1000);
    drop(ui);
    executor.await.unwrap();
}

#[tokio::test]
async fn call_returns_value_from_ui_thread() {
    let (ui, _executor) = spawn_executor(String::from("hello"));
    let len = ui.call(|s: &mut String| {
        s.push_str(" world");
        s.len()
    })
    .await
    .unwrap();
    assert_eq!(len, 11);
}

#[tokio::test]
async fn shutdown_rejects_new_tasks() {
    let (ui, executor) = spawn_executor(0u32);
    ui.post(|n: &mut u32| *n = 1).unwrap();
    inspect(&ui, |_: &mut u32| ()).await;

    ui.shutdown();
    assert!(ui.is_closed());
    assert_eq!(ui.post(|n: &mut u32| *n = 2), Err(UiError::Closed));

    let state = timeout(TEST_TIMEOUT, executor).await.unwrap().unwrap();
    assert_eq!(state, 1);
}

#[tokio::test]
async fn queued_call_is_dropped_on_shutdown() {
    let (executor, ui) = UiExecutor::new(0u32);

    let caller = ui.clone();
    let pending = tokio::spawn(async move { caller.call(|n: &mut u32| *n).await });

    // 等待任务入队后再停止
    let mut watcher = ui.watch_pending();
    timeout(TEST_TIMEOUT, watcher.wait_until(|n| *n == 1))
        .await
        .unwrap()
        .unwrap();
    ui.shutdown();
    executor.run().await;

    let result = timeout(TEST_TIMEOUT, pending).await.unwrap().unwrap();
    assert_eq!(result, Err(UiError::TaskDropped));
}

#[tokio::test]
async fn post_fails_after_executor_dropped() {
    let (executor, ui) = UiExecutor::new(());
    drop(executor);
    assert!(ui.is_closed());
    assert_eq!(ui.post(|_: &mut ()| ()), Err(UiError::Closed));
}

#[tokio::test]
async fn panicking_task_does_not_stop_executor() {
    let (ui, _executor) = spawn_executor(0u32);

    ui.post(|_: &mut u32| panic!("UI 任务中的 panic")).unwrap();
    ui.post(|n: &mut u32| *n += 1).unwrap();

    assert_eq!(inspect(&ui, |n: &mut u32| *n).await, 1);
}

#[tokio::test]
async fn run_pending_drains_queue_synchronously() {
    let (mut executor, ui) = UiExecutor::new(Vec::<u32>::new());
    let counter = Arc::new(AtomicUsize::new(0));

    for i in 0..3 {
        let counter = Arc::clone(&counter);
        ui.post(move |v: &mut Vec<u32>| {
            v.push(i);
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    }
    assert_eq!(executor.pending(), 3);
    assert_eq!(counter.load(Ordering::Relaxed), 0);

    assert_eq!(executor.run_pending(), 3);
    assert_eq!(executor.state(), &vec![0, 1, 2]);
    assert_eq!(executor.pending(), 0);
    assert_eq!(executor.run_pending(), 0);

    executor.state_mut().clear();
    assert!(executor.into_state().is_empty());
}
