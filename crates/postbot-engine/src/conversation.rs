//! The conversation client state machine.
//!
//! [`Conversation`] owns everything the chat window shows: the transcript,
//! the current option buttons, loading placeholders, the open/closed flag,
//! and the feedback modal. Each handler method mutates that state and
//! returns the [`Effect`]s the host has to run. Every effect eventually
//! produces exactly one [`Outcome`], which goes back in through
//! [`Conversation::apply`]. Outcomes are applied in the order they arrive,
//! so replies can land out of send order when requests race.

use crate::backend::BackendError;
use crate::feedback::{Emoji, Feedback, FeedbackError, FeedbackPanel};
use crate::location::{Coordinates, LocationError};
use crate::markup;
use crate::protocol::{ChatReply, ChatRequest, ControlToken, ReplyOption};
use crate::transcript::{Message, Transcript};
use std::time::Duration;
use tracing::{debug, warn};

/// Shown when a turn fails for any transport or HTTP reason.
pub const CONNECTION_APOLOGY: &str =
    "Sorry, I'm having trouble connecting right now. Please try again later.";

/// Shown when the locator could not produce coordinates.
pub const LOCATION_APOLOGY: &str =
    "I'm sorry, I couldn't get your location. Please try again or find an office by Pincode.";

/// Shown when this host has no way to locate the user.
pub const LOCATION_UNSUPPORTED: &str =
    "I'm sorry, location lookup is not supported here. Please find an office by Pincode.";

/// Placeholder while coordinates are being acquired.
pub const LOCATING_TEXT: &str = "Please wait, getting your location...";

/// Placeholder while a location turn is outstanding.
pub const SEARCHING_TEXT: &str = "Searching for nearby post offices...";

/// Identifies the turn an effect and its outcome belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(u64);

/// Fixed delays of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Wait between the window opening and the greeting being sent.
    pub greeting_delay: Duration,
    /// Wait between a reply arriving and it being shown.
    pub reply_delay: Duration,
}

impl Timing {
    /// No delays at all.
    pub const fn immediate() -> Self {
        Self {
            greeting_delay: Duration::ZERO,
            reply_delay: Duration::ZERO,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            greeting_delay: Duration::from_millis(500),
            reply_delay: Duration::from_millis(500),
        }
    }
}

/// A loading indicator shown below the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub turn: TurnId,
    pub text: String,
}

/// Asynchronous work requested by the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Wait, then report [`Outcome::GreetDue`].
    Greet { delay: Duration },
    /// Send a turn, wait `settle` after the reply, then report [`Outcome::Replied`].
    Request {
        turn: TurnId,
        request: ChatRequest,
        settle: Duration,
    },
    /// Acquire coordinates, then report [`Outcome::Located`].
    Locate { turn: TurnId },
    /// Send the reset token, then report [`Outcome::ResetDone`].
    Reset { turn: TurnId, greet: bool },
}

/// Result of an [`Effect`], fed back through [`Conversation::apply`].
#[derive(Debug)]
pub enum Outcome {
    GreetDue,
    Replied {
        turn: TurnId,
        result: Result<ChatReply, BackendError>,
    },
    Located {
        turn: TurnId,
        result: Result<Coordinates, LocationError>,
    },
    ResetDone {
        turn: TurnId,
        greet: bool,
        result: Result<ChatReply, BackendError>,
    },
}

/// Client-side session state for one chat window.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    transcript: Transcript,
    options: Vec<ReplyOption>,
    placeholders: Vec<Placeholder>,
    window_open: bool,
    feedback: FeedbackPanel,
    timing: Timing,
    next_turn: u64,
    in_flight: usize,
}

impl Conversation {
    /// Create a closed, empty conversation.
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Option buttons currently on screen.
    pub fn options(&self) -> &[ReplyOption] {
        &self.options
    }

    /// Loading indicators currently on screen.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn is_loading(&self) -> bool {
        !self.placeholders.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.window_open
    }

    pub fn feedback(&self) -> &FeedbackPanel {
        &self.feedback
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Whether every effect handed out so far has reported back.
    pub fn is_settled(&self) -> bool {
        self.in_flight == 0
    }

    // === Window ===

    /// Open or close the chat window. Opening schedules the greeting.
    pub fn toggle_window(&mut self) -> Vec<Effect> {
        self.window_open = !self.window_open;
        if self.window_open {
            debug!("chat window opened");
            self.track(vec![Effect::Greet {
                delay: self.timing.greeting_delay,
            }])
        } else {
            debug!("chat window closed");
            Vec::new()
        }
    }

    /// Open the window if it is closed.
    pub fn open_window(&mut self) -> Vec<Effect> {
        if self.window_open {
            Vec::new()
        } else {
            self.toggle_window()
        }
    }

    // === Turns ===

    /// Send what the user typed. Blank input is ignored.
    pub fn send_message(&mut self, text: &str) -> Vec<Effect> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        self.transcript.push(Message::user(text));
        self.dispatch(text)
    }

    /// Choose one of the option buttons by position.
    ///
    /// The transcript shows the option's label; the backend gets its value.
    pub fn select_option(&mut self, index: usize) -> Vec<Effect> {
        let Some(option) = self.options.get(index).cloned() else {
            return Vec::new();
        };
        self.transcript.push(Message::user(option.text));
        self.dispatch(&option.value)
    }

    /// Clear the transcript, reset the backend session, then greet again.
    pub fn reset(&mut self) -> Vec<Effect> {
        self.begin_reset(true)
    }

    fn dispatch(&mut self, payload: &str) -> Vec<Effect> {
        match ControlToken::parse(payload) {
            Some(ControlToken::FindOfficeByLocation) => self.begin_location(),
            Some(ControlToken::Reset) => self.begin_reset(true),
            Some(ControlToken::Greeting) | None => {
                let turn = self.next_turn();
                self.track(vec![Effect::Request {
                    turn,
                    request: ChatRequest::text(payload),
                    settle: self.timing.reply_delay,
                }])
            }
        }
    }

    fn greet(&mut self) -> Vec<Effect> {
        self.dispatch(ControlToken::Greeting.as_str())
    }

    fn begin_location(&mut self) -> Vec<Effect> {
        let turn = self.next_turn();
        self.placeholders.push(Placeholder {
            turn,
            text: LOCATING_TEXT.into(),
        });
        self.track(vec![Effect::Locate { turn }])
    }

    fn begin_reset(&mut self, greet: bool) -> Vec<Effect> {
        self.transcript.clear();
        self.options.clear();
        self.placeholders.clear();
        let turn = self.next_turn();
        self.track(vec![Effect::Reset { turn, greet }])
    }

    // === Feedback ===

    /// The window's close control: ask for feedback first.
    pub fn request_close(&mut self) {
        self.feedback.open();
    }

    /// Hide the feedback modal; the chat stays open.
    pub fn dismiss_feedback(&mut self) {
        self.feedback.dismiss();
    }

    pub fn select_rating(&mut self, stars: u8) -> Result<(), FeedbackError> {
        self.feedback.select_rating(stars)
    }

    /// Hand in the star rating and close the window.
    ///
    /// Returns `None` (and changes nothing) while no star is selected.
    pub fn submit_feedback(&mut self) -> Option<Feedback> {
        let feedback = self.feedback.submit()?;
        self.window_open = false;
        Some(feedback)
    }

    /// Hand in an emoji reaction and close the window.
    pub fn choose_emoji(&mut self, emoji: Emoji) -> Feedback {
        let feedback = self.feedback.choose_emoji(emoji);
        self.window_open = false;
        feedback
    }

    /// Close the window and end the backend session without greeting again.
    pub fn end_session(&mut self) -> Vec<Effect> {
        self.feedback.dismiss();
        self.window_open = false;
        self.begin_reset(false)
    }

    // === Outcomes ===

    /// Apply the result of an earlier effect.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        self.in_flight = self.in_flight.saturating_sub(1);

        match outcome {
            Outcome::GreetDue => self.greet(),
            Outcome::Replied { turn, result } => {
                self.remove_placeholders(turn);
                match result {
                    Ok(reply) => self.show_reply(reply),
                    Err(e) => {
                        warn!(error = %e, "Error fetching chatbot response");
                        self.transcript.push(Message::bot(CONNECTION_APOLOGY));
                    }
                }
                Vec::new()
            }
            Outcome::Located { turn, result } => {
                self.remove_placeholders(turn);
                match result {
                    Ok(coordinates) => {
                        self.placeholders.push(Placeholder {
                            turn,
                            text: SEARCHING_TEXT.into(),
                        });
                        self.track(vec![Effect::Request {
                            turn,
                            request: ChatRequest::location(coordinates),
                            settle: Duration::ZERO,
                        }])
                    }
                    Err(LocationError::Unsupported) => {
                        warn!("Location lookup is not supported on this host");
                        self.transcript.push(Message::bot(LOCATION_UNSUPPORTED));
                        Vec::new()
                    }
                    Err(e) => {
                        warn!(error = %e, "Geolocation error");
                        self.transcript.push(Message::bot(LOCATION_APOLOGY));
                        Vec::new()
                    }
                }
            }
            Outcome::ResetDone {
                turn: _,
                greet,
                result,
            } => {
                if let Err(e) = result {
                    warn!(error = %e, "Reset request failed");
                }
                if greet {
                    self.greet()
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn show_reply(&mut self, reply: ChatReply) {
        self.transcript
            .push(Message::bot(markup::to_plain_text(&reply.response)));
        if let Some(options) = reply.options {
            self.options = options
                .into_iter()
                .map(|o| ReplyOption {
                    text: markup::to_plain_text(&o.text),
                    value: o.value,
                })
                .collect();
        }
    }

    fn remove_placeholders(&mut self, turn: TurnId) {
        self.placeholders.retain(|p| p.turn != turn);
    }

    fn next_turn(&mut self) -> TurnId {
        self.next_turn += 1;
        TurnId(self.next_turn)
    }

    fn track(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        self.in_flight += effects.len();
        effects
    }
}
