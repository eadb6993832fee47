//! Input conditioning in front of the intent channel.
//!
//! Raw UI signals are noisy: text widgets re-emit unchanged values, and
//! submit buttons get double-tapped. The [`InputFilter`] drops consecutive
//! duplicate edits per field and throttles submit-class intents; bound text
//! inputs additionally debounce through [`debounce_loop`] so only settled
//! values become intents. Dropped input is logged at trace and nothing
//! else — filtering happens before the reducer, which never sees it.

use crate::intent::{Intent, UserIntent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::trace;

/// A debounced, deduplicated text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    /// Login email.
    Email,
    /// Login one-time code.
    Otp,
    /// Profile display name.
    DisplayName,
}

impl TextField {
    /// The edit intent carrying `value` for this field.
    pub fn intent(self, value: String) -> Intent {
        Intent::User(match self {
            Self::Email => UserIntent::EmailEdited { value },
            Self::Otp => UserIntent::OtpEdited { value },
            Self::DisplayName => UserIntent::DisplayNameEdited { value },
        })
    }
}

/// Stateful admission filter run by the orchestrator's `send`.
pub struct InputFilter {
    throttle: Duration,
    last_submit: Mutex<Option<Instant>>,
    last_edit: Mutex<HashMap<TextField, String>>,
}

impl InputFilter {
    /// Build with the given submit throttle gap.
    pub fn new(throttle: Duration) -> Self {
        Self {
            throttle,
            last_submit: Mutex::new(None),
            last_edit: Mutex::new(HashMap::new()),
        }
    }

    /// Whether `intent` should be forwarded to the reducer.
    pub fn admit(&self, intent: &Intent) -> bool {
        match intent {
            Intent::User(UserIntent::EmailEdited { value }) => {
                self.admit_edit(TextField::Email, value)
            }
            Intent::User(UserIntent::OtpEdited { value }) => self.admit_edit(TextField::Otp, value),
            Intent::User(UserIntent::DisplayNameEdited { value }) => {
                self.admit_edit(TextField::DisplayName, value)
            }
            Intent::User(
                UserIntent::EmailSubmitted
                | UserIntent::OtpSubmitted
                | UserIntent::ProfileSubmitted
                | UserIntent::SignOutRequested,
            ) => self.admit_submit(intent),
            _ => true,
        }
    }

    fn admit_edit(&self, field: TextField, value: &str) -> bool {
        let mut last_edit = self.last_edit.lock();
        if last_edit.get(&field).map(String::as_str) == Some(value) {
            trace!(?field, "dropping duplicate edit");
            return false;
        }
        last_edit.insert(field, value.to_string());
        true
    }

    fn admit_submit(&self, intent: &Intent) -> bool {
        if self.throttle.is_zero() {
            return true;
        }
        let now = Instant::now();
        let mut last_submit = self.last_submit.lock();
        if let Some(previous) = *last_submit {
            if now.duration_since(previous) < self.throttle {
                trace!(intent = intent.description(), "throttling rapid submit");
                return false;
            }
        }
        *last_submit = Some(now);
        true
    }
}

/// Forward the settled value of a stream of edits.
///
/// Each incoming edit restarts the window timer; the value is forwarded
/// once the window elapses without a newer edit, and the last pending value
/// is flushed when the channel closes.
pub(crate) async fn debounce_loop<F>(
    mut edits: mpsc::UnboundedReceiver<String>,
    window: Duration,
    forward: F,
) where
    F: Fn(String),
{
    let mut pending: Option<String> = None;
    loop {
        match pending.take() {
            None => match edits.recv().await {
                Some(value) => pending = Some(value),
                None => break,
            },
            Some(value) => {
                tokio::select! {
                    next = edits.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        None => {
                            forward(value);
                            break;
                        }
                    },
                    () = tokio::time::sleep(window) => forward(value),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as PlMutex;
    use std::sync::Arc;

    fn edited(value: &str) -> Intent {
        TextField::Email.intent(value.to_string())
    }

    #[test]
    fn duplicate_edits_are_dropped_per_field() {
        let filter = InputFilter::new(Duration::ZERO);
        assert!(filter.admit(&edited("a")));
        assert!(!filter.admit(&edited("a")));
        assert!(filter.admit(&edited("ab")));
        // Same value on a different field still passes.
        assert!(filter.admit(&TextField::Otp.intent("ab".to_string())));
        // Re-entering a previously seen value after a change passes.
        assert!(filter.admit(&edited("a")));
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_submits_are_throttled() {
        let filter = InputFilter::new(Duration::from_millis(300));
        let submit = Intent::User(UserIntent::EmailSubmitted);

        assert!(filter.admit(&submit));
        assert!(!filter.admit(&submit));

        tokio::time::advance(Duration::from_millis(301)).await;
        assert!(filter.admit(&submit));
    }

    #[test]
    fn zero_throttle_admits_everything() {
        let filter = InputFilter::new(Duration::ZERO);
        let submit = Intent::User(UserIntent::OtpSubmitted);
        assert!(filter.admit(&submit));
        assert!(filter.admit(&submit));
    }

    #[test]
    fn non_user_intents_pass_untouched() {
        let filter = InputFilter::new(Duration::from_millis(300));
        let intent = Intent::Lifecycle(crate::intent::LifecycleIntent::Started {
            authenticated: false,
        });
        assert!(filter.admit(&intent));
        assert!(filter.admit(&intent));
    }

    #[tokio::test(start_paused = true)]
    async fn debounce_forwards_only_the_settled_value() {
        let (tx, rx) = mpsc::unbounded_channel();
        let seen: Arc<PlMutex<Vec<String>>> = Arc::new(PlMutex::new(Vec::new()));
        let sink = seen.clone();
        let task = tokio::spawn(debounce_loop(
            rx,
            Duration::from_millis(250),
            move |value| sink.lock().push(value),
        ));

        // Yield after each send so the loop observes the edit and restarts
        // its window before the clock moves.
        tx.send("a".to_string()).unwrap();
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        tx.send("ab".to_string()).unwrap();
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(100)).await;
        tx.send("abc".to_string()).unwrap();
        tokio::task::yield_now().await;
        // Nothing has settled yet.
        assert!(seen.lock().is_empty());

        tokio::time::advance(Duration::from_millis(251)).await;
        tokio::task::yield_now().await;
        assert_eq!(seen.lock().as_slice(), &["abc".to_string()]);

        // Closing the channel flushes a still-pending value.
        tx.send("abcd".to_string()).unwrap();
        drop(tx);
        task.await.unwrap();
        assert_eq!(
            seen.lock().as_slice(),
            &["abc".to_string(), "abcd".to_string()]
        );
    }
}
