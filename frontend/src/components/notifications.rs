//! On-screen notifications.
//!
//! [`ToastSink`] is the browser's [`UiSink`]: every message pushed through
//! it becomes a toast that removes itself after its display duration.

use std::time::Duration;

use leptos::*;
use seisweb::config::MAX_NOTIFICATIONS;
use seisweb::{Notification, Severity, UiSink};

use crate::types::Toast;

/// Notification sink backed by a signal.
#[derive(Clone, Copy)]
pub struct ToastSink {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
    duration: Duration,
}

impl ToastSink {
    pub fn new(duration: Duration) -> Self {
        Self {
            toasts: create_rw_signal(Vec::new()),
            next_id: store_value(0),
            duration,
        }
    }

    pub fn toasts(&self) -> RwSignal<Vec<Toast>> {
        self.toasts
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.try_update(|toasts| toasts.retain(|t| t.id != id));
    }
}

impl UiSink for ToastSink {
    fn notify(&self, message: &str, severity: Severity) {
        log::debug!("[{:?}] {}", severity, message);

        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);

        let notification = Notification::new(message, severity).with_duration(self.duration);
        let duration = notification.duration;

        self.toasts.update(|toasts| {
            toasts.push(Toast { id, notification });
            let excess = toasts.len().saturating_sub(MAX_NOTIFICATIONS);
            toasts.drain(..excess);
        });

        let sink = *self;
        set_timeout(move || sink.dismiss(id), duration);
    }
}

#[component]
pub fn Toasts() -> impl IntoView {
    let sink = expect_context::<ToastSink>();
    let toasts = sink.toasts();

    view! {
        <div class="notifications">
            <For
                each=move || toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.notification.severity.css_class()>
                            <span class="notification-time">{toast.notification.timestamp}</span>
                            <span class="notification-message">{toast.notification.message}</span>
                            <button class="notification-close" on:click=move |_| sink.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
