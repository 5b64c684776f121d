//! Notification sequencer.
//!
//! One slot, at most one visible message. Showing a message while another
//! is visible hides the current one at once and reveals the new one after
//! [`TRANSITION_DELAY`], the gap the exit animation needs. There is no
//! queue: a message shown during that gap replaces whatever was about to be
//! revealed, so rapid bursts drop the messages in between.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use smol::{LocalExecutor, Timer};

/// Gap between hiding one message and revealing the next.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(180);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    /// How long a message of this severity stays up unless overridden.
    pub fn default_duration_ms(&self) -> u64 {
        match self {
            Severity::Success | Severity::Info => 3_000,
            Severity::Error | Severity::Warning => 4_000,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub text: String,
    pub severity: Severity,
    pub duration_ms: u64,
    pub visible: bool,
}

impl Default for NotificationMessage {
    fn default() -> Self {
        Self {
            text: String::new(),
            severity: Severity::Success,
            duration_ms: Severity::Error.default_duration_ms(),
            visible: false,
        }
    }
}

type DisplayListener = Rc<dyn Fn(&NotificationMessage)>;

#[derive(Default)]
struct Slot {
    message: NotificationMessage,
    /// Bumped on every display and hide; a timer only expires the message
    /// it was started for.
    generation: u64,
    /// Message waiting out the transition delay.
    next: Option<NotificationMessage>,
}

#[derive(Default)]
struct Shared {
    slot: RefCell<Slot>,
    listeners: RefCell<Vec<DisplayListener>>,
}

impl Shared {
    /// Make `message` the visible one and return its generation.
    fn display(&self, message: NotificationMessage) -> u64 {
        let generation = {
            let mut slot = self.slot.borrow_mut();
            slot.generation += 1;
            slot.message = message.clone();
            slot.generation
        };

        let listeners: Vec<DisplayListener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&message);
        }
        generation
    }

    fn expire(&self, generation: u64) {
        let mut slot = self.slot.borrow_mut();
        if slot.generation == generation {
            slot.message.visible = false;
        }
    }
}

/// Handle to the page-wide notification slot. Clones share the slot.
#[derive(Clone)]
pub struct Notifier {
    shared: Rc<Shared>,
    executor: Rc<LocalExecutor<'static>>,
    transition: Duration,
}

impl Notifier {
    /// Sequencer whose timers run on `executor`.
    pub fn new(executor: Rc<LocalExecutor<'static>>) -> Self {
        Self::with_transition(executor, TRANSITION_DELAY)
    }

    pub fn with_transition(executor: Rc<LocalExecutor<'static>>, transition: Duration) -> Self {
        Self { shared: Rc::new(Shared::default()), executor, transition }
    }

    /// Register a callback run each time a message becomes visible.
    pub fn on_display(&self, listener: impl Fn(&NotificationMessage) + 'static) {
        self.shared.listeners.borrow_mut().push(Rc::new(listener));
    }

    /// The visible message, if any.
    pub fn current(&self) -> Option<NotificationMessage> {
        let slot = self.shared.slot.borrow();
        slot.message.visible.then(|| slot.message.clone())
    }

    pub fn is_visible(&self) -> bool {
        self.shared.slot.borrow().message.visible
    }

    /// True while a reveal is waiting out the transition delay.
    pub fn is_transitioning(&self) -> bool {
        self.shared.slot.borrow().next.is_some()
    }

    pub fn show(&self, text: impl Into<String>, severity: Severity, duration_ms: u64) {
        let message = NotificationMessage {
            text: text.into(),
            severity,
            duration_ms,
            visible: true,
        };
        log::info!("Notification: {} ({})", message.text, severity);

        let replacing = {
            let mut slot = self.shared.slot.borrow_mut();
            if slot.next.is_some() {
                // Overwrite the reveal already scheduled.
                slot.next = Some(message);
                return;
            }
            if slot.message.visible {
                slot.message.visible = false;
                slot.generation += 1;
                slot.next = Some(message.clone());
                true
            } else {
                false
            }
        };

        let shared = self.shared.clone();
        let task = if replacing {
            let transition = self.transition;
            self.executor.spawn(async move {
                Timer::after(transition).await;
                let next = shared.slot.borrow_mut().next.take();
                if let Some(message) = next {
                    let lifetime = Duration::from_millis(message.duration_ms);
                    let generation = shared.display(message);
                    Timer::after(lifetime).await;
                    shared.expire(generation);
                }
            })
        } else {
            let lifetime = Duration::from_millis(message.duration_ms);
            let generation = shared.display(message);
            self.executor.spawn(async move {
                Timer::after(lifetime).await;
                shared.expire(generation);
            })
        };
        task.detach();
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text, Severity::Success, Severity::Success.default_duration_ms());
    }

    pub fn success_for(&self, text: impl Into<String>, duration_ms: u64) {
        self.show(text, Severity::Success, duration_ms);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text, Severity::Error, Severity::Error.default_duration_ms());
    }

    pub fn error_for(&self, text: impl Into<String>, duration_ms: u64) {
        self.show(text, Severity::Error, duration_ms);
    }

    pub fn warning(&self, text: impl Into<String>) {
        self.show(text, Severity::Warning, Severity::Warning.default_duration_ms());
    }

    pub fn warning_for(&self, text: impl Into<String>, duration_ms: u64) {
        self.show(text, Severity::Warning, duration_ms);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show(text, Severity::Info, Severity::Info.default_duration_ms());
    }

    pub fn info_for(&self, text: impl Into<String>, duration_ms: u64) {
        self.show(text, Severity::Info, duration_ms);
    }

    /// Hide the visible message now. A reveal already waiting out the
    /// transition still happens.
    pub fn hide(&self) {
        let mut slot = self.shared.slot.borrow_mut();
        slot.message.visible = false;
        slot.generation += 1;
    }

    /// Wait until no reveal is pending.
    pub async fn settled(&self) {
        while self.is_transitioning() {
            Timer::after(self.transition).await;
        }
    }
}
