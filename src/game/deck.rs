use std::collections::{HashMap, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;

use super::error::{GameResult, Precondition};
use crate::models::{Card, RawEntry};

/// Word identifier. Words are unique within a catalog, so the word itself
/// is the key back into the frozen card set.
pub type WordId = String;

/// What happens to the front card when the deck advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvancePolicy {
    /// Put the word back at the bottom (pass)
    Recycle,
    /// Remove it for the rest of the round (correct / taboo)
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckStatus {
    Remaining(usize),
    Exhausted,
}

/// Cards available for one round, frozen when the round starts
#[derive(Debug, Default, Clone)]
pub struct FrozenCatalog {
    cards: HashMap<WordId, Card>,
}

impl FrozenCatalog {
    /// Keep only playable entries. A repeated word keeps its first card.
    pub fn from_entries(entries: &[RawEntry]) -> (Self, Vec<WordId>) {
        let mut cards = HashMap::with_capacity(entries.len());
        let mut words = Vec::with_capacity(entries.len());

        for card in entries.iter().filter_map(Card::from_raw) {
            if cards.contains_key(&card.word) {
                tracing::warn!("Duplicate catalog word '{}' ignored", card.word);
                continue;
            }
            words.push(card.word.clone());
            cards.insert(card.word.clone(), card);
        }

        let discarded = entries.len() - words.len();
        if discarded > 0 {
            tracing::debug!("Discarded {} unusable catalog entries", discarded);
        }

        (Self { cards }, words)
    }

    pub fn get(&self, word: &str) -> Option<&Card> {
        self.cards.get(word)
    }
}

#[derive(Debug, Default)]
pub struct Deck {
    order: VecDeque<WordId>,
}

impl Deck {
    /// Validate the catalog and shuffle every playable word into a new deck.
    pub fn build_round<R: Rng + ?Sized>(
        entries: &[RawEntry],
        rng: &mut R,
    ) -> GameResult<(FrozenCatalog, Deck)> {
        let (catalog, mut words) = FrozenCatalog::from_entries(entries);
        if words.is_empty() {
            return Err(Precondition::EmptyCatalog.into());
        }

        // Fisher-Yates
        words.shuffle(rng);

        Ok((
            catalog,
            Deck {
                order: words.into(),
            },
        ))
    }

    pub fn peek_current(&self) -> GameResult<&WordId> {
        self.order
            .front()
            .ok_or(Precondition::DeckExhausted.into())
    }

    /// Take the front word off the deck. Running out is a normal end of
    /// round, reported as `DeckStatus::Exhausted`.
    pub fn advance(&mut self, policy: AdvancePolicy) -> DeckStatus {
        if let Some(word) = self.order.pop_front() {
            if policy == AdvancePolicy::Recycle {
                self.order.push_back(word);
            }
        }

        match self.order.len() {
            0 => DeckStatus::Exhausted,
            n => DeckStatus::Remaining(n),
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn words(&self) -> impl Iterator<Item = &WordId> {
        self.order.iter()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }
}
