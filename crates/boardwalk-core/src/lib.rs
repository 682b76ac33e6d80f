//! Boardwalk - A Monopoly-style property trading game engine
//!
//! This crate provides the core game logic for Boardwalk, including:
//! - The standard 40-space board with deeds, color groups and rent rules
//! - Player state, money movement and the shared game log
//! - A pending-action state machine covering purchases, trades, card
//!   acknowledgements, jail decisions and debt resolution
//! - An action processor with full rule enforcement
//! - A persistence seam with an in-memory reference store
//!
//! # Architecture
//!
//! The engine is a deterministic state machine. Every change to a
//! [`GameState`] goes through [`Engine::process`], which applies an action
//! completely or rejects it with the state untouched. The two
//! nondeterministic inputs, dice and card draws, enter through the
//! [`DiceRoller`] and [`CardSource`] traits, so games can be replayed from
//! fixed sequences and tests can force exact situations.
//!
//! # Modules
//!
//! - [`board`]: spaces, deeds, the standard layout, rent and monopolies
//! - [`player`]: per-player state
//! - [`actions`]: the action set and trade offers
//! - [`cards`]: Chance and Community Chest effects and card sources
//! - [`dice`]: dice rolling
//! - [`game`]: game state, phases, pending actions, the turn controller
//! - [`engine`]: the action processor
//! - [`store`]: persistence and per-action dispatch

pub mod actions;
pub mod board;
pub mod cards;
pub mod dice;
pub mod engine;
pub mod game;
pub mod player;
pub mod store;

// Re-export commonly used types
pub use actions::{ActionEnvelope, GameAction, TradeOffer, TradeSide};
pub use board::{Board, ColorGroup, Deed, PlayerId, Space, SpaceId, SpaceKind};
pub use cards::{
    CardAction, CardEffect, CardSource, CardSourceError, CardType, OfflineDeck, ScriptedCards,
};
pub use dice::{DiceRoller, RandomDice, ScriptedDice};
pub use engine::Engine;
pub use game::{GameError, GamePhase, GameState, Payee, PendingAction};
pub use player::Player;
pub use store::{DispatchError, GameStore, MemoryStore, StoreError};
