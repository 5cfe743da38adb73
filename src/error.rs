use thiserror::Error;

use crate::card::CardId;

/// Why a reveal or conceal was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStateError {
    /// The id does not belong to the current deck.
    UnknownCard,
    AlreadyFaceUp,
    AlreadyMatched,
    /// Only a face-up card can be turned back.
    NotFaceUp,
}

impl CardStateError {
    fn describe(self) -> &'static str {
        match self {
            CardStateError::UnknownCard => "no such card on the board",
            CardStateError::AlreadyFaceUp => "card is already face-up",
            CardStateError::AlreadyMatched => "card has already been matched",
            CardStateError::NotFaceUp => "card is not face-up",
        }
    }
}

/// Errors reported by the deck generator and the match session.
///
/// Both kinds are recoverable: the caller retries with valid input or
/// re-syncs its view of the board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid configuration: {requested} pair(s) requested, between 1 and {max} allowed")]
    InvalidConfiguration { requested: usize, max: usize },

    #[error("card {id}: {}", .reason.describe())]
    InvalidCardState { id: CardId, reason: CardStateError },
}

impl GameError {
    pub(crate) fn card(id: CardId, reason: CardStateError) -> Self {
        GameError::InvalidCardState { id, reason }
    }
}
