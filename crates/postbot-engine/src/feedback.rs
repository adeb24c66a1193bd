//! Quit-feedback modal state: a 1-5 star rating and emoji buttons.

use std::fmt;
use tracing::info;

/// Highest selectable star rating.
pub const MAX_STARS: u8 = 5;

/// Star rating; zero means nothing selected yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Rating(u8);

impl Rating {
    /// No stars selected.
    pub const NONE: Rating = Rating(0);

    /// Create a rating, rejecting values above [`MAX_STARS`].
    pub fn new(stars: u8) -> Result<Self, FeedbackError> {
        if stars > MAX_STARS {
            return Err(FeedbackError::RatingOutOfRange(stars));
        }
        Ok(Self(stars))
    }

    pub fn stars(self) -> u8 {
        self.0
    }

    /// Whether a star has been selected.
    pub fn is_set(self) -> bool {
        self.0 > 0
    }
}

/// One-click reactions offered next to the stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emoji {
    Unhappy,
    Neutral,
    Happy,
}

impl Emoji {
    /// All emoji buttons, in display order.
    pub fn all() -> [Emoji; 3] {
        [Emoji::Unhappy, Emoji::Neutral, Emoji::Happy]
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Emoji::Unhappy => "😞",
            Emoji::Neutral => "😐",
            Emoji::Happy => "😊",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Emoji::Unhappy => "unhappy",
            Emoji::Neutral => "neutral",
            Emoji::Happy => "happy",
        }
    }
}

impl fmt::Display for Emoji {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Feedback the user handed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Stars(Rating),
    Emoji(Emoji),
}

/// The feedback modal.
#[derive(Debug, Clone, Default)]
pub struct FeedbackPanel {
    visible: bool,
    rating: Rating,
}

impl FeedbackPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Submit is enabled only once a star is selected.
    pub fn can_submit(&self) -> bool {
        self.rating.is_set()
    }

    /// Show the modal.
    pub fn open(&mut self) {
        self.visible = true;
    }

    /// Hide the modal without handing in feedback.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Select a star rating (0 clears the selection).
    pub fn select_rating(&mut self, stars: u8) -> Result<(), FeedbackError> {
        self.rating = Rating::new(stars)?;
        Ok(())
    }

    /// Hand in the star rating. Does nothing while no star is selected.
    ///
    /// On success the modal hides and the rating resets for next time.
    pub fn submit(&mut self) -> Option<Feedback> {
        if !self.rating.is_set() {
            return None;
        }
        let rating = self.rating;
        info!(stars = rating.stars(), "Thanks for your feedback: {} star(s)", rating.stars());
        self.visible = false;
        self.rating = Rating::NONE;
        Some(Feedback::Stars(rating))
    }

    /// Hand in an emoji reaction and hide the modal.
    pub fn choose_emoji(&mut self, emoji: Emoji) -> Feedback {
        info!(emoji = emoji.label(), "Thanks for your feedback: {emoji}");
        self.visible = false;
        Feedback::Emoji(emoji)
    }
}

/// Errors that can occur in the feedback modal.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeedbackError {
    /// Star rating above the maximum.
    #[error("Rating must be between 0 and {MAX_STARS}, got {0}")]
    RatingOutOfRange(u8),
}
