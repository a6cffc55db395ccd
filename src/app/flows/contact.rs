// 聯絡表單流程：送出、成功訊息淡出與收合、失敗保留欄位。

use crate::core::timer::TimerHandle;
use crate::core::{ContactField, ContactForm, ContactSink, Result, SubmitReceipt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// 成功訊息開始淡出的時點
pub const SUCCESS_FADE_AFTER: Duration = Duration::from_millis(2500);
/// 成功訊息完全收合、回到空白表單的時點
pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_millis(3000);

#[derive(Debug)]
pub enum ContactEvent {
    FieldEdited(ContactField, String),
    SubmitRequested,
    SubmitFinished { result: Result<SubmitReceipt> },
    FadeElapsed { cycle: u64 },
    DismissElapsed { cycle: u64 },
}

/// 表單的三態：閒置（可編輯）、送出中、成功訊息顯示中
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
    Success { fading: bool },
}

pub struct ContactSubmitter<G: ContactSink + 'static> {
    gateway: Arc<G>,
    events: UnboundedSender<ContactEvent>,
    fade_after: Duration,
    dismiss_after: Duration,
    form: ContactForm,
    phase: SubmitPhase,
    error: Option<String>,
    last_receipt: Option<SubmitReceipt>,
    cycle: u64,
    fade_timer: Option<TimerHandle>,
    dismiss_timer: Option<TimerHandle>,
}

impl<G: ContactSink + 'static> ContactSubmitter<G> {
    pub fn new(gateway: Arc<G>, events: UnboundedSender<ContactEvent>) -> Self {
        Self {
            gateway,
            events,
            fade_after: SUCCESS_FADE_AFTER,
            dismiss_after: SUCCESS_DISMISS_AFTER,
            form: ContactForm::default(),
            phase: SubmitPhase::Idle,
            error: None,
            last_receipt: None,
            cycle: 0,
            fade_timer: None,
            dismiss_timer: None,
        }
    }

    pub fn with_success_timing(mut self, fade_after: Duration, dismiss_after: Duration) -> Self {
        self.fade_after = fade_after;
        self.dismiss_after = dismiss_after;
        self
    }

    pub fn handle(&mut self, event: ContactEvent) {
        match event {
            ContactEvent::FieldEdited(field, value) => self.on_field_edited(field, value),
            ContactEvent::SubmitRequested => self.on_submit_requested(),
            ContactEvent::SubmitFinished { result } => self.on_submit_finished(result),
            ContactEvent::FadeElapsed { cycle } => self.on_fade_elapsed(cycle),
            ContactEvent::DismissElapsed { cycle } => self.on_dismiss_elapsed(cycle),
        }
    }

    fn on_field_edited(&mut self, field: ContactField, value: String) {
        if self.phase != SubmitPhase::Idle {
            return;
        }
        self.form.set(field, value);
        // 一動鍵盤就先清掉舊錯誤
        self.error = None;
    }

    fn on_submit_requested(&mut self) {
        if self.phase == SubmitPhase::Submitting {
            tracing::debug!("📨 Submission already in flight, ignoring");
            return;
        }
        self.cancel_success_timers();
        self.phase = SubmitPhase::Submitting;
        self.error = None;
        self.last_receipt = None;

        tracing::debug!("📨 Submitting contact form for {:?}", self.form.name);
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        let form = self.form.clone();
        tokio::spawn(async move {
            let result = gateway.submit(&form).await;
            let _ = events.send(ContactEvent::SubmitFinished { result });
        });
    }

    fn on_submit_finished(&mut self, result: Result<SubmitReceipt>) {
        if self.phase != SubmitPhase::Submitting {
            return;
        }
        match result {
            Ok(receipt) => {
                tracing::info!("✅ Contact form accepted");
                self.form.clear();
                self.last_receipt = Some(receipt);
                self.phase = SubmitPhase::Success { fading: false };
                self.start_success_timers();
            }
            Err(e) => {
                tracing::warn!("❌ Contact form submission failed: {}", e);
                self.error = Some(e.user_friendly_message());
                self.phase = SubmitPhase::Idle;
            }
        }
    }

    fn on_fade_elapsed(&mut self, cycle: u64) {
        if cycle != self.cycle {
            return;
        }
        self.fade_timer = None;
        if let SubmitPhase::Success { fading } = &mut self.phase {
            *fading = true;
        }
    }

    fn on_dismiss_elapsed(&mut self, cycle: u64) {
        if cycle != self.cycle {
            return;
        }
        self.fade_timer = None;
        self.dismiss_timer = None;
        if matches!(self.phase, SubmitPhase::Success { .. }) {
            self.phase = SubmitPhase::Idle;
        }
    }

    fn start_success_timers(&mut self) {
        self.cycle += 1;
        let cycle = self.cycle;

        let events = self.events.clone();
        self.fade_timer = Some(TimerHandle::after(self.fade_after, move || {
            let _ = events.send(ContactEvent::FadeElapsed { cycle });
        }));

        let events = self.events.clone();
        self.dismiss_timer = Some(TimerHandle::after(self.dismiss_after, move || {
            let _ = events.send(ContactEvent::DismissElapsed { cycle });
        }));
    }

    /// 丟掉計時器即取消；cycle 再往前撥一格，讓已經在路上的事件失效
    fn cancel_success_timers(&mut self) {
        self.cycle += 1;
        self.fade_timer = None;
        self.dismiss_timer = None;
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }

    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn receipt(&self) -> Option<&SubmitReceipt> {
        self.last_receipt.as_ref()
    }

    pub fn has_pending_timers(&self) -> bool {
        self.fade_timer.is_some() || self.dismiss_timer.is_some()
    }
}
