use serde::{Deserialize, Serialize};

use crate::card::{Card, CardId};
use crate::deck::{AttributeSelection, Deck};
use crate::error::{CardStateError, GameError};

/// Where a single card currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    FaceDown,
    FaceUp,
    /// Paired and removed from play.
    Matched,
}

/// Observable session phase between two calls.
///
/// Resolution of two face-up cards happens inside [`Session::reveal`], so a
/// session is never seen holding two face-up cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    OneRevealed,
    Complete,
}

/// What a successful reveal led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// First card of a pair; waiting for the second.
    Pending(CardId),
    /// Both cards share an attribute and are removed from play.
    Matched(CardId, CardId),
    /// The cards differ. Both have already been turned face-down again.
    Mismatched(CardId, CardId),
}

/// Emitted once the last pair is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameComplete {
    pub total_flips: u32,
    pub pair_count: usize,
}

/// One game of pairs: the deck plus the state of every card in it.
///
/// All state is keyed by [`CardId`]. A new game means a new `Session`.
#[derive(Debug, Clone)]
pub struct Session {
    deck: Deck,
    states: Vec<CardState>,
    /// At most one id between calls; two only while resolving.
    face_up: Vec<CardId>,
    matched_count: usize,
    total_flips: u32,
}

impl Session {
    /// Wrap an already generated deck, every card face-down.
    pub fn new(deck: Deck) -> Self {
        Session {
            states: vec![CardState::FaceDown; deck.len()],
            deck,
            face_up: Vec::with_capacity(2),
            matched_count: 0,
            total_flips: 0,
        }
    }

    /// Deal a seeded deck and start a game on it.
    pub fn start_game(
        pair_count: usize,
        selection: AttributeSelection,
        seed: u64,
    ) -> Result<Self, GameError> {
        let deck = Deck::deal_seeded(pair_count, selection, seed)?;
        Ok(Self::new(deck))
    }

    // -------------------------------------------------------------------------
    // Player events
    // -------------------------------------------------------------------------

    /// Turn a face-down card face-up, resolving the pair if it is the second.
    pub fn reveal(&mut self, id: CardId) -> Result<RevealOutcome, GameError> {
        match self.card_state(id)? {
            CardState::FaceDown => {}
            CardState::FaceUp => return Err(GameError::card(id, CardStateError::AlreadyFaceUp)),
            CardState::Matched => return Err(GameError::card(id, CardStateError::AlreadyMatched)),
        }
        debug_assert!(self.face_up.len() < 2, "unresolved pair left face-up");

        self.states[id.index()] = CardState::FaceUp;
        self.face_up.push(id);
        self.total_flips = self.total_flips.saturating_add(1);

        if self.face_up.len() < 2 {
            return Ok(RevealOutcome::Pending(id));
        }
        Ok(self.resolve())
    }

    /// Turn a lone face-up card back down before a second card is revealed.
    ///
    /// Does not count as a flip.
    pub fn conceal(&mut self, id: CardId) -> Result<(), GameError> {
        match self.card_state(id)? {
            CardState::FaceUp => {}
            CardState::FaceDown => return Err(GameError::card(id, CardStateError::NotFaceUp)),
            CardState::Matched => return Err(GameError::card(id, CardStateError::AlreadyMatched)),
        }

        self.states[id.index()] = CardState::FaceDown;
        self.face_up.retain(|&f| f != id);
        Ok(())
    }

    fn resolve(&mut self) -> RevealOutcome {
        let (a, b) = (self.face_up[0], self.face_up[1]);
        self.face_up.clear();

        let cards = self.deck.cards();
        let matched = cards[a.index()].matches(&cards[b.index()]);

        if matched {
            self.states[a.index()] = CardState::Matched;
            self.states[b.index()] = CardState::Matched;
            self.matched_count += 2;
            RevealOutcome::Matched(a, b)
        } else {
            self.states[a.index()] = CardState::FaceDown;
            self.states[b.index()] = CardState::FaceDown;
            RevealOutcome::Mismatched(a, b)
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn is_complete(&self) -> bool {
        self.matched_count == self.deck.len()
    }

    /// The completion summary, once every pair is cleared.
    pub fn completion(&self) -> Option<GameComplete> {
        self.is_complete().then(|| GameComplete {
            total_flips: self.total_flips,
            pair_count: self.deck.pair_count(),
        })
    }

    pub fn phase(&self) -> Phase {
        if self.is_complete() {
            Phase::Complete
        } else if self.face_up.is_empty() {
            Phase::Idle
        } else {
            Phase::OneRevealed
        }
    }

    pub fn card_state(&self, id: CardId) -> Result<CardState, GameError> {
        self.states
            .get(id.index())
            .copied()
            .ok_or(GameError::card(id, CardStateError::UnknownCard))
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.deck.card(id)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn face_up(&self) -> &[CardId] {
        &self.face_up
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn total_flips(&self) -> u32 {
        self.total_flips
    }

    pub fn remaining_pairs(&self) -> usize {
        (self.deck.len() - self.matched_count) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardAttribute, Color, Shape};
    use proptest::prelude::*;

    const A: CardAttribute = CardAttribute::new(Shape::Circle, Color::Red);
    const B: CardAttribute = CardAttribute::new(Shape::Cross, Color::Green);
    const C: CardAttribute = CardAttribute::new(Shape::Fill, Color::Yellow);

    fn session(attrs: &[CardAttribute]) -> Session {
        Session::new(Deck::from_attributes(attrs.to_vec()).unwrap())
    }

    fn id(i: usize) -> CardId {
        CardId(i)
    }

    #[test]
    fn single_pair_game() {
        let mut s = Session::start_game(1, AttributeSelection::Sequential, 5).unwrap();
        assert_eq!(s.deck().len(), 2);
        assert!(s.card(id(0)).unwrap().matches(s.card(id(1)).unwrap()));

        assert_eq!(s.reveal(id(0)), Ok(RevealOutcome::Pending(id(0))));
        assert_eq!(s.phase(), Phase::OneRevealed);
        assert_eq!(s.reveal(id(1)), Ok(RevealOutcome::Matched(id(0), id(1))));

        assert!(s.is_complete());
        assert_eq!(s.phase(), Phase::Complete);
        assert_eq!(
            s.completion(),
            Some(GameComplete { total_flips: 2, pair_count: 1 })
        );
    }

    #[test]
    fn two_pair_game_in_any_order() {
        let mut s = session(&[A, B, A, B]);

        assert_eq!(s.reveal(id(1)), Ok(RevealOutcome::Pending(id(1))));
        assert_eq!(s.reveal(id(3)), Ok(RevealOutcome::Matched(id(1), id(3))));
        assert!(!s.is_complete());
        assert_eq!(s.remaining_pairs(), 1);

        s.reveal(id(2)).unwrap();
        assert_eq!(s.reveal(id(0)), Ok(RevealOutcome::Matched(id(2), id(0))));
        assert!(s.is_complete());
        assert_eq!(s.matched_count(), 4);
    }

    #[test]
    fn mismatch_turns_both_cards_back() {
        let mut s = session(&[A, B, A, B]);

        s.reveal(id(0)).unwrap();
        assert_eq!(s.reveal(id(1)), Ok(RevealOutcome::Mismatched(id(0), id(1))));

        assert_eq!(s.matched_count(), 0);
        assert!(s.face_up().is_empty());
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.card_state(id(0)), Ok(CardState::FaceDown));
        assert_eq!(s.card_state(id(1)), Ok(CardState::FaceDown));

        // Both may be revealed again.
        assert_eq!(s.reveal(id(1)), Ok(RevealOutcome::Pending(id(1))));
        assert_eq!(s.reveal(id(3)), Ok(RevealOutcome::Matched(id(1), id(3))));
        assert_eq!(s.total_flips(), 4);
    }

    #[test]
    fn revealing_the_same_card_twice_fails() {
        let mut s = session(&[A, A, B, B]);

        s.reveal(id(2)).unwrap();
        assert_eq!(
            s.reveal(id(2)),
            Err(GameError::card(id(2), CardStateError::AlreadyFaceUp))
        );
        assert_eq!(s.face_up(), &[id(2)]);
        assert_eq!(s.total_flips(), 1);
    }

    #[test]
    fn matched_cards_cannot_be_revealed_or_concealed() {
        let mut s = session(&[A, A, B, B]);
        s.reveal(id(0)).unwrap();
        s.reveal(id(1)).unwrap();

        assert_eq!(
            s.reveal(id(0)),
            Err(GameError::card(id(0), CardStateError::AlreadyMatched))
        );
        assert_eq!(
            s.conceal(id(1)),
            Err(GameError::card(id(1), CardStateError::AlreadyMatched))
        );
    }

    #[test]
    fn unknown_card_is_rejected() {
        let mut s = session(&[A, A]);
        assert_eq!(
            s.reveal(id(2)),
            Err(GameError::card(id(2), CardStateError::UnknownCard))
        );
        assert_eq!(s.total_flips(), 0);
    }

    #[test]
    fn conceal_returns_a_lone_card() {
        let mut s = session(&[A, B, C, A, B, C]);

        s.reveal(id(4)).unwrap();
        assert_eq!(s.conceal(id(4)), Ok(()));
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.card_state(id(4)), Ok(CardState::FaceDown));
        assert_eq!(s.total_flips(), 1);

        assert_eq!(
            s.conceal(id(4)),
            Err(GameError::card(id(4), CardStateError::NotFaceUp))
        );

        // The concealed card no longer takes part in the next resolution.
        assert_eq!(s.reveal(id(2)), Ok(RevealOutcome::Pending(id(2))));
        assert_eq!(s.reveal(id(5)), Ok(RevealOutcome::Matched(id(2), id(5))));
    }

    #[test]
    fn completed_session_rejects_everything() {
        let mut s = session(&[B, B]);
        s.reveal(id(0)).unwrap();
        s.reveal(id(1)).unwrap();

        assert!(s.is_complete());
        assert!(s.reveal(id(0)).is_err());
        assert!(s.reveal(id(1)).is_err());
        assert_eq!(s.total_flips(), 2);
    }

    #[test]
    fn flip_counter_saturates() {
        let mut s = session(&[A, A, B, B]);
        s.total_flips = u32::MAX - 1;

        s.reveal(id(0)).unwrap();
        assert_eq!(s.reveal(id(2)), Ok(RevealOutcome::Mismatched(id(0), id(2))));
        assert_eq!(s.total_flips(), u32::MAX);
    }

    #[test]
    fn invalid_pair_count_propagates() {
        assert!(matches!(
            Session::start_game(0, AttributeSelection::Sequential, 1),
            Err(GameError::InvalidConfiguration { .. })
        ));
    }

    #[derive(Debug, Clone)]
    enum Event {
        Reveal(usize),
        Conceal(usize),
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            3 => (0usize..24).prop_map(Event::Reveal),
            1 => (0usize..24).prop_map(Event::Conceal),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_under_any_event_sequence(
            seed in any::<u64>(),
            events in prop::collection::vec(event(), 0..200),
        ) {
            let mut s = Session::start_game(10, AttributeSelection::Sampled, seed).unwrap();
            let mut last_matched = 0;
            let mut last_flips = 0;

            for ev in events {
                let result = match ev {
                    Event::Reveal(i) => s.reveal(CardId(i)).map(|_| ()),
                    Event::Conceal(i) => s.conceal(CardId(i)),
                };

                prop_assert!(s.face_up().len() <= 1);
                prop_assert!(s.matched_count() >= last_matched);
                prop_assert_eq!(s.matched_count() % 2, 0);
                prop_assert!(s.total_flips() >= last_flips);
                if result.is_err() {
                    prop_assert_eq!(s.matched_count(), last_matched);
                    prop_assert_eq!(s.total_flips(), last_flips);
                }

                let matched = (0..s.deck().len())
                    .filter(|&i| s.card_state(CardId(i)) == Ok(CardState::Matched))
                    .count();
                prop_assert_eq!(matched, s.matched_count());
                prop_assert_eq!(s.is_complete(), s.matched_count() == 20);

                last_matched = s.matched_count();
                last_flips = s.total_flips();
            }
        }

        #[test]
        fn perfect_play_completes_in_minimal_flips(
            pairs in 1usize..=32,
            seed in any::<u64>(),
        ) {
            let mut s = Session::start_game(pairs, AttributeSelection::Sequential, seed).unwrap();
            let cards: Vec<Card> = s.deck().cards().to_vec();

            for card in &cards {
                if s.card_state(card.id) != Ok(CardState::FaceDown) {
                    continue;
                }
                let partner = cards
                    .iter()
                    .find(|c| c.id != card.id && c.matches(card))
                    .unwrap();

                prop_assert!(!s.is_complete());
                prop_assert_eq!(s.reveal(card.id), Ok(RevealOutcome::Pending(card.id)));
                prop_assert_eq!(
                    s.reveal(partner.id),
                    Ok(RevealOutcome::Matched(card.id, partner.id))
                );
            }

            prop_assert!(s.is_complete());
            prop_assert_eq!(
                s.completion(),
                Some(GameComplete { total_flips: 2 * pairs as u32, pair_count: pairs })
            );
        }
    }
}
