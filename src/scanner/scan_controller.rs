use futures::Stream;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::models::{ScanEvent, ScanOutcome};
use crate::scanner::{PathClassifier, ScanEngine};

/// 扫描控制器 - 在后台线程启动扫描，并把事件交给调用方
///
/// 控制器本身不限制同时进行的扫描数量，调用方负责在上一次扫描结束
/// （或被取消）之后再启动新的扫描。
pub struct ScanController {
    engine: ScanEngine,
    next_id: AtomicU64,
}

impl ScanController {
    pub fn new(engine: ScanEngine) -> Self {
        Self {
            engine,
            next_id: AtomicU64::new(1),
        }
    }

    /// 根据配置创建控制器
    pub fn from_config(config: &Config) -> Self {
        let classifier = Arc::new(PathClassifier::new(config.ignore_set()));
        Self::new(ScanEngine::new(classifier).with_batch_size(config.progress_batch_size()))
    }

    /// 启动扫描并立即返回句柄，需要在 tokio 运行时中调用
    pub fn start(&self, root: impl Into<PathBuf>) -> ScanHandle {
        let root = root.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        let token = CancellationToken::new();

        let engine = self.engine.clone();
        let worker_root = root.clone();
        let worker_token = token.clone();
        let worker = tokio::task::spawn_blocking(move || {
            engine.run(&worker_root, &sender, &worker_token);
        });

        tracing::debug!("已启动扫描 #{}: {}", id, root.display());

        ScanHandle {
            id,
            root,
            receiver,
            token,
            worker: Some(worker),
            finished: false,
        }
    }

    /// 取消指定的扫描
    pub fn cancel(&self, handle: &ScanHandle) {
        handle.cancel();
    }
}

/// 一次扫描的句柄，同时也是该扫描的事件流
///
/// 调用 `cancel` 之后，除了一个 `Cancelled` 终止事件外不会再产出任何事件。
/// 句柄被丢弃时扫描也会被取消。
pub struct ScanHandle {
    id: u64,
    root: PathBuf,
    receiver: mpsc::UnboundedReceiver<ScanEvent>,
    token: CancellationToken,
    worker: Option<JoinHandle<()>>,
    finished: bool,
}

impl ScanHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 发出协作式取消信号，扫描线程在下一个目录边界处停止
    pub fn cancel(&self) {
        if !self.token.is_cancelled() {
            tracing::info!("请求取消扫描 #{}: {}", self.id, self.root.display());
            self.token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// 是否已经交付了终止事件
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// 非阻塞地取出下一个事件，供定时轮询的前端使用
    pub fn try_next_event(&mut self) -> Option<ScanEvent> {
        while !self.finished {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(event) = self.accept(event) {
                        return Some(event);
                    }
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => return self.on_disconnected(),
            }
        }
        None
    }

    /// 等待下一个事件，终止事件之后返回 `None`
    pub async fn next_event(&mut self) -> Option<ScanEvent> {
        futures::StreamExt::next(self).await
    }

    /// 读取事件直到终止事件，返回扫描结果
    pub async fn outcome(mut self) -> ScanOutcome {
        while let Some(event) = self.next_event().await {
            if let ScanEvent::Finished(outcome) = event {
                return outcome;
            }
        }
        ScanOutcome::Failed("扫描结果已被读取".to_string())
    }

    /// 等待扫描线程退出
    pub async fn join(&mut self) {
        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.await {
                tracing::warn!("扫描线程异常退出 #{}: {}", self.id, err);
            }
        }
    }

    fn accept(&mut self, event: ScanEvent) -> Option<ScanEvent> {
        if event.is_terminal() {
            self.finished = true;
            if self.token.is_cancelled() {
                return Some(ScanEvent::Finished(ScanOutcome::Cancelled));
            }
            return Some(event);
        }

        if self.token.is_cancelled() {
            None
        } else {
            Some(event)
        }
    }

    /// 扫描线程未发送终止事件就退出了（例如 panic）
    fn on_disconnected(&mut self) -> Option<ScanEvent> {
        if self.finished {
            return None;
        }
        self.finished = true;

        let outcome = if self.token.is_cancelled() {
            ScanOutcome::Cancelled
        } else {
            tracing::warn!("扫描线程意外终止 #{}", self.id);
            ScanOutcome::Failed("扫描任务意外终止".to_string())
        };
        Some(ScanEvent::Finished(outcome))
    }
}

impl Stream for ScanHandle {
    type Item = ScanEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.finished {
                return Poll::Ready(None);
            }

            match ready!(this.receiver.poll_recv(cx)) {
                Some(event) => {
                    if let Some(event) = this.accept(event) {
                        return Poll::Ready(Some(event));
                    }
                }
                None => return Poll::Ready(this.on_disconnected()),
            }
        }
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
