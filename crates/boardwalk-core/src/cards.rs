//! Chance and Community Chest cards.
//!
//! Card *text* comes from an external source (a generative backend in
//! production); the engine only cares about the machine-readable effect.
//! The source is injectable through [`CardSource`] so tests can script
//! exact sequences, and [`OfflineDeck`] provides the classic fixed cards
//! whenever the real source fails or is absent.

use crate::board::SpaceId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// The two card piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Chance,
    CommunityChest,
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardType::Chance => write!(f, "Chance"),
            CardType::CommunityChest => write!(f, "Community Chest"),
        }
    }
}

/// The machine-readable half of a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum CardAction {
    /// The bank pays the player
    ReceiveMoney { amount: i64 },
    /// The player pays the bank (may suspend into debt)
    PayMoney { amount: i64 },
    /// Teleport to a space and resolve the landing
    MoveTo { space_id: SpaceId },
    /// Move relative to the current position; never pays GO salary
    MoveBy { amount: i64 },
    /// Straight to jail, no salary
    GoToJail,
    /// Bank one escape from jail
    GetOutOfJailFree,
    /// Every other solvent player pays the drawer
    ReceiveFromPlayers { amount: i64 },
    /// Repair levy across the drawer's buildings
    PayForBuildings { per_house: i64, per_hotel: i64 },
}

/// A drawn card: display text plus its effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEffect {
    pub text: String,
    #[serde(flatten)]
    pub action: CardAction,
}

impl CardEffect {
    pub fn new(text: impl Into<String>, action: CardAction) -> Self {
        CardEffect {
            text: text.into(),
            action,
        }
    }
}

/// Why a card source produced nothing usable.
#[derive(Debug, Clone, Error)]
pub enum CardSourceError {
    /// The backend could not be reached, timed out, or ran dry
    #[error("card source unavailable: {0}")]
    Unavailable(String),
    /// The backend answered, but not with a usable effect
    #[error("card source returned a malformed effect: {0}")]
    Malformed(String),
}

/// Where cards come from.
///
/// The engine tolerates any failure here by dealing from [`OfflineDeck`]
/// instead, so implementations should surface problems as errors rather
/// than blocking.
pub trait CardSource {
    fn draw(&mut self, kind: CardType) -> Result<CardEffect, CardSourceError>;
}

fn chance_cards() -> Vec<CardEffect> {
    vec![
        CardEffect::new(
            "Advance to Go (Collect $200)",
            CardAction::MoveTo { space_id: 0 },
        ),
        CardEffect::new(
            "Bank pays you dividend of $50",
            CardAction::ReceiveMoney { amount: 50 },
        ),
        CardEffect::new(
            "Go to Jail. Go directly to Jail. Do not pass Go, do not collect $200.",
            CardAction::GoToJail,
        ),
        CardEffect::new(
            "Make general repairs on all your property. For each house pay $25. For each hotel $100.",
            CardAction::PayForBuildings {
                per_house: 25,
                per_hotel: 100,
            },
        ),
    ]
}

fn community_chest_cards() -> Vec<CardEffect> {
    vec![
        CardEffect::new(
            "Bank error in your favor. Collect $200",
            CardAction::ReceiveMoney { amount: 200 },
        ),
        CardEffect::new("Doctor's fee. Pay $50", CardAction::PayMoney { amount: 50 }),
        CardEffect::new(
            "It is your birthday. Collect $10 from every player.",
            CardAction::ReceiveFromPlayers { amount: 10 },
        ),
        CardEffect::new(
            "Get Out of Jail Free. This card may be kept until needed or sold.",
            CardAction::GetOutOfJailFree,
        ),
    ]
}

/// The built-in fallback tables, dealt in rotation.
///
/// Rotation rather than random choice keeps the fallback deterministic,
/// which both the tests and replayed games rely on.
#[derive(Debug, Clone)]
pub struct OfflineDeck {
    chance: Vec<CardEffect>,
    community_chest: Vec<CardEffect>,
    chance_next: usize,
    community_chest_next: usize,
}

impl OfflineDeck {
    pub fn new() -> Self {
        OfflineDeck {
            chance: chance_cards(),
            community_chest: community_chest_cards(),
            chance_next: 0,
            community_chest_next: 0,
        }
    }

    /// Deal the next card of the pile. Never fails.
    pub fn deal(&mut self, kind: CardType) -> CardEffect {
        let (pile, cursor) = match kind {
            CardType::Chance => (&self.chance, &mut self.chance_next),
            CardType::CommunityChest => (&self.community_chest, &mut self.community_chest_next),
        };
        let card = pile[*cursor % pile.len()].clone();
        *cursor = (*cursor + 1) % pile.len();
        card
    }
}

impl Default for OfflineDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSource for OfflineDeck {
    fn draw(&mut self, kind: CardType) -> Result<CardEffect, CardSourceError> {
        Ok(self.deal(kind))
    }
}

/// A card source that hands out a fixed sequence, then runs dry.
///
/// Meant for tests and replays; once the script is exhausted the engine
/// falls back to the offline deck like any other source failure.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCards {
    queue: VecDeque<CardEffect>,
}

impl ScriptedCards {
    pub fn new(cards: impl IntoIterator<Item = CardEffect>) -> Self {
        ScriptedCards {
            queue: cards.into_iter().collect(),
        }
    }

    /// A source with nothing to give, forcing the offline fallback.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl CardSource for ScriptedCards {
    fn draw(&mut self, _kind: CardType) -> Result<CardEffect, CardSourceError> {
        self.queue
            .pop_front()
            .ok_or_else(|| CardSourceError::Unavailable("card script exhausted".to_string()))
    }
}
