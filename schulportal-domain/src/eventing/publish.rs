//! 扇出执行与发布结果
//!
//! 扇出分两步：
//! 1. `invoke`：在发布调用内按注册顺序同步调用每个处理器，得到各自的 future；
//!    调用阶段的 panic 被单独捕获；
//! 2. `drive`：并发驱动全部 future 直至结束，失败与 panic 逐个记录，互不影响。
//!
use super::handler::{AnyEvent, ErasedHandler, HandlerFuture};
use super::subscription::SubscriberId;
use futures_util::FutureExt;
use futures_util::future::join_all;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 一次扇出前的订阅快照条目
#[derive(Clone)]
pub(crate) struct Target {
    pub(crate) subscriber_id: SubscriberId,
    pub(crate) handler: ErasedHandler,
}

/// 已调用、待驱动的处理器
pub(crate) struct Invocation {
    subscriber_id: SubscriberId,
    outcome: Result<HandlerFuture, anyhow::Error>,
}

/// 单个处理器的失败记录
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerFailure {
    pub subscriber_id: SubscriberId,
    pub reason: String,
}

/// 一次发布的扇出结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishReport {
    pub event_name: &'static str,
    /// 成功完成的处理器数量
    pub delivered: usize,
    pub failures: Vec<HandlerFailure>,
}

impl PublishReport {
    pub(crate) fn empty(event_name: &'static str) -> Self {
        Self {
            event_name,
            delivered: 0,
            failures: Vec::new(),
        }
    }

    /// 被调用的处理器总数
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// 发布句柄；丢弃它不会取消扇出
#[must_use = "drop the handle for fire-and-forget, or await `completed()` to observe the fan-out"]
pub struct PublishHandle {
    event_name: &'static str,
    task: Option<JoinHandle<PublishReport>>,
}

impl PublishHandle {
    pub(crate) fn ready(event_name: &'static str) -> Self {
        Self {
            event_name,
            task: None,
        }
    }

    pub(crate) fn spawned(event_name: &'static str, task: JoinHandle<PublishReport>) -> Self {
        Self {
            event_name,
            task: Some(task),
        }
    }

    /// 等待本次扇出结束
    pub async fn completed(self) -> PublishReport {
        let Some(task) = self.task else {
            return PublishReport::empty(self.event_name);
        };

        match task.await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(event = self.event_name, error = %e, "event fan-out task aborted");
                PublishReport::empty(self.event_name)
            }
        }
    }
}

pub(crate) fn invoke(event: AnyEvent, targets: Vec<Target>) -> Vec<Invocation> {
    targets
        .into_iter()
        .map(|target| {
            let payload = Arc::clone(&event);
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (target.handler)(payload)))
                .map_err(panic_error);
            Invocation {
                subscriber_id: target.subscriber_id,
                outcome,
            }
        })
        .collect()
}

pub(crate) async fn drive(event_name: &'static str, invocations: Vec<Invocation>) -> PublishReport {
    let runs = invocations.into_iter().map(|invocation| async move {
        let result = match invocation.outcome {
            Ok(fut) => AssertUnwindSafe(fut)
                .catch_unwind()
                .await
                .unwrap_or_else(|p| Err(panic_error(p))),
            Err(e) => Err(e),
        };
        (invocation.subscriber_id, result)
    });

    let mut report = PublishReport::empty(event_name);
    for (subscriber_id, result) in join_all(runs).await {
        match result {
            Ok(()) => report.delivered += 1,
            Err(e) => {
                let reason = format!("{e:#}");
                tracing::error!(
                    event = event_name,
                    subscriber = %subscriber_id,
                    error = %reason,
                    "event handler failed"
                );
                report.failures.push(HandlerFailure {
                    subscriber_id,
                    reason,
                });
            }
        }
    }

    report
}

fn panic_error(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    anyhow::anyhow!("handler panicked: {message}")
}
