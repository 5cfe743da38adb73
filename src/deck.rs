use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::card::{Card, CardAttribute, CardId, NUM_ATTRIBUTES};
use crate::error::GameError;

/// How the attributes of a new deck are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttributeSelection {
    /// The first `pair_count` attributes in shape-major, color-minor order.
    #[default]
    Sequential,
    /// A uniformly random subset of all attributes.
    Sampled,
}

/// A balanced deck: exactly two cards per attribute, in play order.
///
/// Card `i` of the sequence always carries `CardId(i)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    // -------------------------------------------------------------------------
    // Construction / Dealing
    // -------------------------------------------------------------------------

    /// Generate a shuffled deck of `pair_count` pairs using the given RNG.
    pub fn generate<R: Rng + ?Sized>(
        pair_count: usize,
        selection: AttributeSelection,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        check_pair_count(pair_count)?;

        let mut pool = CardAttribute::all();
        if selection == AttributeSelection::Sampled {
            pool.shuffle(rng);
        }
        pool.truncate(pair_count);

        let mut attrs: Vec<CardAttribute> = pool.iter().flat_map(|&a| [a, a]).collect();
        attrs.shuffle(rng);

        Ok(Self::number(attrs))
    }

    /// Deal a deck from a specific seed (reproducible games).
    pub fn deal_seeded(
        pair_count: usize,
        selection: AttributeSelection,
        seed: u64,
    ) -> Result<Self, GameError> {
        let mut rng = rand::rngs::SmallRng::seed_from_u64(seed);
        Self::generate(pair_count, selection, &mut rng)
    }

    /// Build a deck whose play order is exactly `attrs`.
    ///
    /// Every attribute must occur exactly twice.
    pub fn from_attributes(attrs: Vec<CardAttribute>) -> Result<Self, GameError> {
        let invalid = GameError::InvalidConfiguration {
            requested: attrs.len() / 2,
            max: NUM_ATTRIBUTES,
        };
        if attrs.len() % 2 != 0 {
            return Err(invalid);
        }
        check_pair_count(attrs.len() / 2)?;

        let mut counts: HashMap<CardAttribute, usize> = HashMap::new();
        for &a in &attrs {
            *counts.entry(a).or_default() += 1;
        }
        if counts.values().any(|&n| n != 2) {
            return Err(invalid);
        }

        Ok(Self::number(attrs))
    }

    fn number(attrs: Vec<CardAttribute>) -> Self {
        let cards = attrs
            .into_iter()
            .enumerate()
            .map(|(i, attribute)| Card { id: CardId(i), attribute })
            .collect();
        Deck { cards }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// The card with the given id, if it belongs to this deck.
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

fn check_pair_count(pair_count: usize) -> Result<(), GameError> {
    if pair_count == 0 || pair_count > NUM_ATTRIBUTES {
        return Err(GameError::InvalidConfiguration {
            requested: pair_count,
            max: NUM_ATTRIBUTES,
        });
    }
    Ok(())
}
