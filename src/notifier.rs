use std::time::{Duration, Instant};
use tracing::debug;

pub const VISIBLE_FOR: Duration = Duration::from_secs(3);
pub const EXIT_FOR: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastPhase {
    Visible,
    /// Fading out; carries remaining opacity in `0.0..=1.0`.
    Exiting(f32),
    Expired,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: NoticeKind,
    pub shown_at: Instant,
}

impl Toast {
    pub fn phase(&self, now: Instant) -> ToastPhase {
        let age = now.saturating_duration_since(self.shown_at);
        if age < VISIBLE_FOR {
            return ToastPhase::Visible;
        }
        let fading = age - VISIBLE_FOR;
        if fading >= EXIT_FOR {
            return ToastPhase::Expired;
        }
        ToastPhase::Exiting(1.0 - fading.as_secs_f32() / EXIT_FOR.as_secs_f32())
    }

    pub fn opacity(&self, now: Instant) -> f32 {
        match self.phase(now) {
            ToastPhase::Visible => 1.0,
            ToastPhase::Exiting(alpha) => alpha,
            ToastPhase::Expired => 0.0,
        }
    }
}

/// Transient banners. Every call adds its own banner; nothing is merged.
#[derive(Debug, Default)]
pub struct Notifier {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: NoticeKind) {
        self.notify_at(message, kind, Instant::now());
    }

    pub fn notify_at(&mut self, message: impl Into<String>, kind: NoticeKind, now: Instant) {
        let message = message.into();
        debug!(?kind, %message, "notify");
        self.next_id = self.next_id.wrapping_add(1);
        self.toasts.push(Toast {
            id: self.next_id,
            message,
            kind,
            shown_at: now,
        });
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    /// Drops banners whose exit transition has finished.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.phase(now) != ToastPhase::Expired);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
