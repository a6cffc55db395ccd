use std::time::Duration;
use tokio::task::JoinHandle;

/// 元件自持的延遲回呼把手，取代全域的 timer 註冊表。
/// 丟棄把手就中止背後的任務：把 `Option<TimerHandle>` 換成新值即取消舊計時器，
/// 元件 teardown 時靠 Drop 全部收掉。
///
/// 中止和回呼發送之間有一個小窗口（回呼可能已經把事件排進佇列），
/// 消費端用序號守門擋掉這種遲到事件。
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    pub fn after<F>(delay: Duration, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
        Self { task }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
