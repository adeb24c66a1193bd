//! Application state and update logic for the postbot TUI.

use crate::event::{key_to_action, Action};
use crate::ui::widgets::TextInputState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use postbot_engine::{Config, Conversation, Effect, Emoji, Outcome, MAX_STARS};

/// Lines moved per scroll step.
const SCROLL_STEP: usize = 5;

/// Ticks a notification stays visible.
const NOTIFICATION_TICKS: usize = 30;

/// What is currently on screen, derived from conversation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Chat window closed.
    Launcher,
    /// Chat window open.
    Chat,
    /// Feedback modal over the chat window.
    Feedback,
}

/// Which part of the chat window receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Options,
}

/// Which row of the feedback modal is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackRow {
    #[default]
    Stars,
    Emojis,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Chat window title.
    pub title: String,

    /// Endpoint the backend posts to, shown on the launcher.
    pub endpoint: String,

    /// Conversation state machine.
    pub conversation: Conversation,

    /// Text input state for the chat input.
    pub input_state: TextInputState,

    pub focus: Focus,

    /// Index of the highlighted option button.
    pub selected_option: usize,

    pub feedback_row: FeedbackRow,

    /// Index of the highlighted emoji in the feedback modal.
    pub selected_emoji: usize,

    /// Lines scrolled up from the bottom of the transcript.
    pub transcript_scroll: usize,

    /// Tick counter for animations.
    pub tick: usize,

    /// Notification message (cleared after some ticks).
    pub notification: Option<String>,

    notification_ttl: usize,
}

impl App {
    /// Create a new app instance.
    pub fn new(config: &Config) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            title: config.title.clone(),
            endpoint: config.endpoint.clone(),
            conversation: Conversation::new(config.timing()),
            input_state: TextInputState::new(),
            focus: Focus::Input,
            selected_option: 0,
            feedback_row: FeedbackRow::Stars,
            selected_emoji: 0,
            transcript_scroll: 0,
            tick: 0,
            notification: None,
            notification_ttl: 0,
        }
    }

    /// App with default config and no delays.
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        let mut app = Self::new(&Config::default());
        app.conversation = Conversation::new(postbot_engine::Timing::immediate());
        app
    }

    /// The current screen.
    pub fn screen(&self) -> Screen {
        if !self.conversation.is_open() {
            Screen::Launcher
        } else if self.conversation.feedback().is_visible() {
            Screen::Feedback
        } else {
            Screen::Chat
        }
    }

    /// Handle a key press; returns the effects to run.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }

        if self.screen() == Screen::Chat && self.focus == Focus::Input && !self.show_help {
            if let Some(effects) = self.handle_input_key(key) {
                return effects;
            }
        }

        self.handle_action(key_to_action(key))
    }

    /// Handle an action; returns the effects to run.
    pub fn handle_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Quit => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    self.should_quit = true;
                }
                return Vec::new();
            }
            Action::Help => {
                self.show_help = !self.show_help;
                return Vec::new();
            }
            _ => {}
        }

        // If help is showing, any key closes it
        if self.show_help {
            self.show_help = false;
            return Vec::new();
        }

        match self.screen() {
            Screen::Launcher => self.handle_launcher_action(action),
            Screen::Chat => self.handle_chat_action(action),
            Screen::Feedback => self.handle_feedback_action(action),
        }
    }

    /// Apply a finished effect; returns follow-up effects.
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Effect> {
        let effects = self.conversation.apply(outcome);
        self.after_conversation_change();
        effects
    }

    /// Advance animations and expire the notification.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    pub fn scroll_up(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(SCROLL_STEP);
    }

    pub fn scroll_down(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(SCROLL_STEP);
    }

    fn set_notification(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Keep selection and focus valid and jump back to the newest line.
    fn after_conversation_change(&mut self) {
        let count = self.conversation.options().len();
        if count == 0 {
            self.selected_option = 0;
            self.focus = Focus::Input;
        } else if self.selected_option >= count {
            self.selected_option = count - 1;
        }
        self.transcript_scroll = 0;
    }

    // === Launcher ===

    fn handle_launcher_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Select | Action::ToggleWindow => {
                self.notification = None;
                self.conversation.open_window()
            }
            _ => Vec::new(),
        }
    }

    // === Chat window ===

    /// Keys consumed by the input line. `None` passes the key on.
    fn handle_input_key(&mut self, key: KeyEvent) -> Option<Vec<Effect>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }
        match key.code {
            KeyCode::Enter => {
                if self.input_state.content().trim().is_empty() {
                    return Some(Vec::new());
                }
                let text = self.input_state.submit();
                let effects = self.conversation.send_message(&text);
                self.after_conversation_change();
                Some(effects)
            }
            KeyCode::Char(c) => {
                self.input_state.insert(c);
                Some(Vec::new())
            }
            KeyCode::Backspace => {
                self.input_state.backspace();
                Some(Vec::new())
            }
            KeyCode::Delete => {
                self.input_state.delete();
                Some(Vec::new())
            }
            KeyCode::Left => {
                self.input_state.move_left();
                Some(Vec::new())
            }
            KeyCode::Right => {
                self.input_state.move_right();
                Some(Vec::new())
            }
            KeyCode::Home => {
                self.input_state.move_home();
                Some(Vec::new())
            }
            KeyCode::End => {
                self.input_state.move_end();
                Some(Vec::new())
            }
            KeyCode::Up => {
                self.input_state.history_prev();
                Some(Vec::new())
            }
            KeyCode::Down => {
                self.input_state.history_next();
                Some(Vec::new())
            }
            _ => None,
        }
    }

    fn handle_chat_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Back => {
                self.conversation.request_close();
                self.feedback_row = FeedbackRow::Stars;
                self.selected_emoji = 0;
                Vec::new()
            }
            Action::ToggleWindow => self.conversation.toggle_window(),
            Action::Reset => {
                let effects = self.conversation.reset();
                self.after_conversation_change();
                effects
            }
            Action::NextFocus | Action::PrevFocus => {
                self.focus = match self.focus {
                    Focus::Input if !self.conversation.options().is_empty() => Focus::Options,
                    _ => Focus::Input,
                };
                Vec::new()
            }
            Action::ScrollUp => {
                self.scroll_up();
                Vec::new()
            }
            Action::ScrollDown => {
                self.scroll_down();
                Vec::new()
            }
            Action::Left | Action::Up if self.focus == Focus::Options => {
                self.selected_option = self.selected_option.saturating_sub(1);
                Vec::new()
            }
            Action::Right | Action::Down if self.focus == Focus::Options => {
                if self.selected_option + 1 < self.conversation.options().len() {
                    self.selected_option += 1;
                }
                Vec::new()
            }
            Action::Select if self.focus == Focus::Options => {
                let effects = self.conversation.select_option(self.selected_option);
                self.focus = Focus::Input;
                self.selected_option = 0;
                self.after_conversation_change();
                effects
            }
            _ => Vec::new(),
        }
    }

    // === Feedback modal ===

    fn handle_feedback_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Back => self.conversation.dismiss_feedback(),
            Action::Stars(stars) => {
                self.feedback_row = FeedbackRow::Stars;
                if let Err(e) = self.conversation.select_rating(stars) {
                    self.set_notification(e.to_string());
                }
            }
            Action::Up | Action::Down | Action::NextFocus | Action::PrevFocus => {
                self.feedback_row = match self.feedback_row {
                    FeedbackRow::Stars => FeedbackRow::Emojis,
                    FeedbackRow::Emojis => FeedbackRow::Stars,
                };
            }
            Action::Left => match self.feedback_row {
                FeedbackRow::Stars => {
                    let stars = self.conversation.feedback().rating().stars();
                    let _ = self.conversation.select_rating(stars.saturating_sub(1));
                }
                FeedbackRow::Emojis => {
                    self.selected_emoji = self.selected_emoji.saturating_sub(1);
                }
            },
            Action::Right => match self.feedback_row {
                FeedbackRow::Stars => {
                    let stars = self.conversation.feedback().rating().stars();
                    let _ = self.conversation.select_rating((stars + 1).min(MAX_STARS));
                }
                FeedbackRow::Emojis => {
                    if self.selected_emoji + 1 < Emoji::all().len() {
                        self.selected_emoji += 1;
                    }
                }
            },
            Action::Select => match self.feedback_row {
                FeedbackRow::Stars => {
                    if self.conversation.submit_feedback().is_some() {
                        self.set_notification("Thanks for your feedback!");
                    } else {
                        self.set_notification("Pick a rating first");
                    }
                }
                FeedbackRow::Emojis => {
                    let emoji = Emoji::all()[self.selected_emoji];
                    self.conversation.choose_emoji(emoji);
                    self.set_notification(format!("Thanks for your feedback! {emoji}"));
                }
            },
            Action::EndSession => {
                let effects = self.conversation.end_session();
                self.after_conversation_change();
                self.set_notification("Chat ended");
                return effects;
            }
            _ => {}
        }
        Vec::new()
    }
}
