use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use super::{Notifier, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastType {
    Error,
    Success,
}

impl From<Severity> for ToastType {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Success => Self::Success,
            Severity::Error => Self::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub toast_type: ToastType,
    pub duration: Option<Duration>, // None for no auto-dismiss
}

impl Toast {
    pub fn new(message: String, toast_type: ToastType) -> Self {
        Self {
            id: Uuid::new_v4(),
            message,
            toast_type,
            duration: Some(Duration::from_secs(5)),
        }
    }

    pub fn error(message: String) -> Self {
        Self::new(message, ToastType::Error)
    }

    pub fn success(message: String) -> Self {
        Self::new(message, ToastType::Success)
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn no_auto_dismiss(mut self) -> Self {
        self.duration = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToastState {
    pub toasts: HashMap<Uuid, Toast>,
}

pub enum ToastAction {
    Add(Toast),
    Remove(Uuid),
    Clear,
}

impl ToastState {
    fn reduce(&mut self, action: ToastAction) {
        match action {
            ToastAction::Add(toast) => {
                self.toasts.insert(toast.id, toast);
            }
            ToastAction::Remove(id) => {
                self.toasts.remove(&id);
            }
            ToastAction::Clear => {
                self.toasts.clear();
            }
        }
    }
}

/// Toast queue shared between the data layer and whatever renders it.
#[derive(Clone, Default)]
pub struct ToastHandle {
    state: Arc<Mutex<ToastState>>,
}

impl ToastHandle {
    pub fn new() -> Self {
        Self::default()
    }

    fn dispatch(&self, action: ToastAction) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reduce(action);
    }

    pub fn add(&self, toast: Toast) {
        let toast_id = toast.id;
        let duration = toast.duration;

        self.dispatch(ToastAction::Add(toast));

        // Auto-dismiss needs a runtime to sleep on; without one the toast
        // stays until removed.
        if let (Some(duration), Ok(runtime)) =
            (duration, tokio::runtime::Handle::try_current())
        {
            let handle = self.clone();
            runtime.spawn(async move {
                tokio::time::sleep(duration).await;
                handle.dispatch(ToastAction::Remove(toast_id));
            });
        }
    }

    pub fn error(&self, message: impl Into<String>) {
        self.add(Toast::error(message.into()));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.add(Toast::success(message.into()));
    }

    pub fn remove(&self, id: Uuid) {
        self.dispatch(ToastAction::Remove(id));
    }

    pub fn clear(&self) {
        self.dispatch(ToastAction::Clear);
    }

    /// Current toasts of one type, messages only.
    pub fn messages(&self, toast_type: ToastType) -> Vec<String> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .toasts
            .values()
            .filter(|toast| toast.toast_type == toast_type)
            .map(|toast| toast.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .toasts
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for ToastHandle {
    fn notify(&self, message: &str, severity: Severity) {
        self.add(Toast::new(message.to_string(), severity.into()));
    }
}
