//! Runs conversation effects on the tokio runtime.
//!
//! Each [`Effect`] gets its own task, so a slow reply never blocks a later
//! turn. Finished tasks report their [`Outcome`] on an unbounded channel
//! that the host drains and feeds back into the conversation.

use crate::backend::Backend;
use crate::conversation::{Conversation, Effect, Outcome};
use crate::location::Locator;
use crate::protocol::{ChatRequest, ControlToken};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Spawns one task per effect and forwards the outcomes.
#[derive(Clone)]
pub struct Driver {
    backend: Arc<dyn Backend>,
    locator: Arc<dyn Locator>,
    tx: mpsc::UnboundedSender<Outcome>,
}

impl Driver {
    /// Create a driver and the receiver its outcomes arrive on.
    pub fn new(
        backend: Arc<dyn Backend>,
        locator: Arc<dyn Locator>,
    ) -> (Self, mpsc::UnboundedReceiver<Outcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                backend,
                locator,
                tx,
            },
            rx,
        )
    }

    /// Start every effect. Must be called from within a tokio runtime.
    pub fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }

    /// Apply outcomes until every outstanding effect has reported back.
    ///
    /// Used by hosts that run a fixed script of turns instead of an
    /// interactive loop.
    pub async fn settle(
        &self,
        conversation: &mut Conversation,
        outcomes: &mut mpsc::UnboundedReceiver<Outcome>,
    ) {
        while !conversation.is_settled() {
            let Some(outcome) = outcomes.recv().await else {
                break;
            };
            let effects = conversation.apply(outcome);
            self.dispatch(effects);
        }
    }

    fn spawn(&self, effect: Effect) {
        let backend = Arc::clone(&self.backend);
        let locator = Arc::clone(&self.locator);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let outcome = match effect {
                Effect::Greet { delay } => {
                    sleep(delay).await;
                    Outcome::GreetDue
                }
                Effect::Request {
                    turn,
                    request,
                    settle,
                } => {
                    let result = backend.send(&request).await;
                    sleep(settle).await;
                    Outcome::Replied { turn, result }
                }
                Effect::Locate { turn } => Outcome::Located {
                    turn,
                    result: locator.locate().await,
                },
                Effect::Reset { turn, greet } => {
                    let result = backend
                        .send(&ChatRequest::control(ControlToken::Reset))
                        .await;
                    Outcome::ResetDone {
                        turn,
                        greet,
                        result,
                    }
                }
            };

            // The receiver is gone once the host shuts down.
            if tx.send(outcome).is_err() {
                debug!("outcome dropped after shutdown");
            }
        });
    }
}

async fn sleep(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::conversation::Timing;
    use crate::location::{Coordinates, FixedLocator, NoLocator};
    use crate::protocol::{ChatReply, ReplyOption};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend that echoes requests back and records what it saw.
    #[derive(Default)]
    struct EchoBackend {
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl Backend for EchoBackend {
        async fn send(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(ChatReply {
                response: format!("echo: {}", request.message),
                options: Some(vec![ReplyOption::new("Again", "again")]),
            })
        }
    }

    #[tokio::test]
    async fn test_greeting_round_trip() {
        let backend = Arc::new(EchoBackend::default());
        let (driver, mut rx) = Driver::new(backend.clone(), Arc::new(NoLocator));
        let mut conversation = Conversation::new(Timing::immediate());

        driver.dispatch(conversation.toggle_window());
        driver.settle(&mut conversation, &mut rx).await;

        assert_eq!(
            backend.seen.lock().unwrap().as_slice(),
            &[ChatRequest::text("hi")]
        );
        assert_eq!(
            conversation.transcript().last().map(|m| m.text.as_str()),
            Some("echo: hi")
        );
        assert_eq!(conversation.options().len(), 1);
    }

    #[tokio::test]
    async fn test_location_round_trip() {
        let here = Coordinates {
            latitude: 12.97,
            longitude: 77.59,
        };
        let backend = Arc::new(EchoBackend::default());
        let (driver, mut rx) = Driver::new(backend.clone(), Arc::new(FixedLocator::new(here)));
        let mut conversation = Conversation::new(Timing::immediate());

        driver.dispatch(conversation.send_message("find_office_by_location"));
        driver.settle(&mut conversation, &mut rx).await;

        assert_eq!(
            backend.seen.lock().unwrap().as_slice(),
            &[ChatRequest::location(here)]
        );
        assert!(!conversation.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_greeting_waits_for_delay() {
        let backend = Arc::new(EchoBackend::default());
        let (driver, mut rx) = Driver::new(backend.clone(), Arc::new(NoLocator));
        let mut conversation = Conversation::new(Timing::default());

        driver.dispatch(conversation.toggle_window());
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(matches!(rx.recv().await, Some(Outcome::GreetDue)));
    }
}
