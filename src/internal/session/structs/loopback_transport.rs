//! 回环传输：在本机文件系统上按块复制文件或目录，模拟一次真实的网络传输。
//!
//! 每写完一块汇报一次累计进度，并在读取下一块之前检查取消；
//! 取消或失败时删除已经写出的部分。

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::internal::transfer::structs::{TransferError, TransferReporter};

/// 目录传输前扫描出的内容（路径均相对于源目录）。
#[derive(Debug, Default)]
struct DirPlan {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
    total: u64,
}

/// 复制单个文件并汇报结果。
pub(crate) async fn transfer_file(
    reporter: TransferReporter,
    source: PathBuf,
    dest: PathBuf,
    chunk_size: usize,
) {
    let result = match source_size(&source).await {
        Err(err) => Err(err),
        Ok(total) => {
            let result = copy_single_file(&reporter, &source, &dest, chunk_size, total).await;
            if result.is_err() {
                let _ = fs::remove_file(&dest).await;
            }
            result
        }
    };
    if let Err(err) = &result {
        tracing::debug!("回环传输 {} 未完成: {}", source.display(), err);
    }
    settle(reporter, result);
}

/// 复制整个目录并汇报结果；目标目录必须尚不存在。
pub(crate) async fn transfer_dir(
    reporter: TransferReporter,
    source: PathBuf,
    dest: PathBuf,
    chunk_size: usize,
) {
    if fs::try_exists(&dest).await.unwrap_or(false) {
        reporter.fail(TransferError::Transport(format!(
            "目标已存在: {}",
            dest.display()
        )));
        return;
    }
    let result = copy_dir(&reporter, &source, &dest, chunk_size).await;
    if let Err(err) = &result {
        tracing::debug!("回环传输目录 {} 未完成: {}", source.display(), err);
        let _ = fs::remove_dir_all(&dest).await;
    }
    settle(reporter, result);
}

fn settle(reporter: TransferReporter, result: Result<(), TransferError>) {
    match result {
        Ok(()) => {
            reporter.finish();
        }
        Err(err) => {
            reporter.fail(err);
        }
    }
}

/// 源文件的大小；源是目录时返回 [`TransferError::NotAFile`]。
async fn source_size(source: &Path) -> Result<u64, TransferError> {
    let meta = fs::metadata(source)
        .await
        .map_err(|e| TransferError::io("读取文件信息", e))?;
    if meta.is_dir() {
        return Err(TransferError::NotAFile);
    }
    Ok(meta.len())
}

async fn copy_single_file(
    reporter: &TransferReporter,
    source: &Path,
    dest: &Path,
    chunk_size: usize,
    total: u64,
) -> Result<(), TransferError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| TransferError::io("创建目录", e))?;
    }

    let mut done = 0u64;
    copy_chunks(reporter, source, dest, chunk_size, &mut done, total).await?;
    if total == 0 {
        reporter.update(0, 0);
    }
    Ok(())
}

async fn copy_dir(
    reporter: &TransferReporter,
    source: &Path,
    dest: &Path,
    chunk_size: usize,
) -> Result<(), TransferError> {
    let meta = fs::metadata(source)
        .await
        .map_err(|e| TransferError::io("读取目录信息", e))?;
    if !meta.is_dir() {
        return Err(TransferError::NotADirectory);
    }

    let plan = scan_dir(source).await?;
    fs::create_dir_all(dest)
        .await
        .map_err(|e| TransferError::io("创建目录", e))?;
    for dir in &plan.dirs {
        fs::create_dir_all(dest.join(dir))
            .await
            .map_err(|e| TransferError::io("创建目录", e))?;
    }

    let mut done = 0u64;
    for file in &plan.files {
        copy_chunks(
            reporter,
            &source.join(file),
            &dest.join(file),
            chunk_size,
            &mut done,
            plan.total,
        )
        .await?;
    }
    if plan.total == 0 {
        reporter.update(0, 0);
    }
    Ok(())
}

/// 扫描整个目录树，统计总字节数。
async fn scan_dir(root: &Path) -> Result<DirPlan, TransferError> {
    let mut plan = DirPlan::default();
    let mut queue = vec![PathBuf::new()];

    while let Some(relative) = queue.pop() {
        let mut entries = fs::read_dir(root.join(&relative))
            .await
            .map_err(|e| TransferError::io("读取目录", e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TransferError::io("读取目录", e))?
        {
            let path = relative.join(entry.file_name());
            let meta = entry
                .metadata()
                .await
                .map_err(|e| TransferError::io("读取文件信息", e))?;
            if meta.is_dir() {
                plan.dirs.push(path.clone());
                queue.push(path);
            } else if meta.is_file() {
                plan.total += meta.len();
                plan.files.push(path);
            }
        }
    }

    // 按路径排序，保证每次传输顺序一致
    plan.dirs.sort();
    plan.files.sort();
    Ok(plan)
}

async fn copy_chunks(
    reporter: &TransferReporter,
    source: &Path,
    dest: &Path,
    chunk_size: usize,
    done: &mut u64,
    total: u64,
) -> Result<(), TransferError> {
    let mut input = File::open(source)
        .await
        .map_err(|e| TransferError::io("打开源文件", e))?;
    let mut output = File::create(dest)
        .await
        .map_err(|e| TransferError::io("创建目标文件", e))?;
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        if reporter.is_canceled() {
            return Err(TransferError::Canceled);
        }
        let n = input
            .read(&mut buf)
            .await
            .map_err(|e| TransferError::io("读取源文件", e))?;
        if n == 0 {
            break;
        }
        output
            .write_all(&buf[..n])
            .await
            .map_err(|e| TransferError::io("写入目标文件", e))?;

        *done += n as u64;
        reporter.update((*done).min(total), total);
        tokio::task::yield_now().await;
    }

    output
        .flush()
        .await
        .map_err(|e| TransferError::io("写入目标文件", e))?;
    Ok(())
}
