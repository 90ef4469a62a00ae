//! Transient user notifications.
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::Notify as NotifyConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Error => "error",
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Prints notifications to the terminal, errors on stderr.
#[derive(Debug)]
pub struct ConsoleNotifier {
    timeout: Duration,
    prevent_duplicates: bool,
    last: Mutex<Option<(Level, String, Instant)>>,
}

impl ConsoleNotifier {
    pub fn new(cfg: &NotifyConfig) -> Self {
        Self {
            timeout: Duration::from_millis(cfg.timeout_ms),
            prevent_duplicates: cfg.prevent_duplicates,
            last: Mutex::new(None),
        }
    }

    /// Whether `message` repeats the one still on screen.
    fn is_duplicate(&self, level: Level, message: &str, now: Instant) -> bool {
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let duplicate = self.prevent_duplicates
            && matches!(&*last, Some((l, m, at)) if *l == level && m == message && now.duration_since(*at) < self.timeout);
        if !duplicate {
            *last = Some((level, message.to_string(), now));
        }
        duplicate
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: Level, message: &str) {
        if self.is_duplicate(level, message, Instant::now()) {
            return;
        }
        match level {
            Level::Error => eprintln!("[{}] {}", level.as_str(), message),
            _ => println!("[{}] {}", level.as_str(), message),
        }
    }
}
