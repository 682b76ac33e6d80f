//! Game persistence.
//!
//! The engine itself never touches storage; callers load a game, run
//! [`Engine::process`] and write the result back. [`GameStore`] is that
//! seam, [`MemoryStore`] its in-process reference implementation, and
//! [`dispatch`] the whole read-modify-write as one call.
//!
//! Writes are last-writer-wins. There is no optimistic concurrency here:
//! a deployment that needs it should implement [`GameStore`] over a
//! backend that provides it.

use crate::actions::ActionEnvelope;
use crate::board::PlayerId;
use crate::cards::CardSource;
use crate::dice::DiceRoller;
use crate::engine::Engine;
use crate::game::{generate_game_code, GameError, GameState};
use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Game not found")]
    NotFound,
    /// The stored document does not deserialize as a game, or the game
    /// does not serialize. Either way the store contents are suspect.
    #[error("Stored game is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Everything that can go wrong between receiving an envelope and
/// persisting its outcome.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Load-by-id / save-by-id of whole game documents.
pub trait GameStore {
    fn load(&self, id: &str) -> Result<GameState, StoreError>;
    /// Persist the game under its own id, replacing any previous version.
    fn save(&self, state: &GameState) -> Result<(), StoreError>;
}

/// A concurrent in-memory store.
///
/// Games are held as JSON documents rather than live structs, so every
/// load goes through the same deserialization path a remote document
/// store would use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: DashMap<String, serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            games: DashMap::new(),
        }
    }
}

impl GameStore for MemoryStore {
    fn load(&self, id: &str) -> Result<GameState, StoreError> {
        let doc = self.games.get(id).ok_or(StoreError::NotFound)?;
        Ok(serde_json::from_value(doc.value().clone())?)
    }

    fn save(&self, state: &GameState) -> Result<(), StoreError> {
        let doc = serde_json::to_value(state)?;
        self.games.insert(state.id.clone(), doc);
        Ok(())
    }
}

/// Open a fresh lobby under a generated join code and persist it.
pub fn create_game<S: GameStore>(store: &S, host_name: &str) -> Result<GameState, StoreError> {
    let state = GameState::new(generate_game_code(), host_name);
    store.save(&state)?;
    Ok(state)
}

/// Seat a new player in an existing lobby and persist the result.
///
/// Returns the seat id assigned to the joiner along with the updated game.
pub fn join_game<S: GameStore>(
    store: &S,
    game_id: &str,
    name: &str,
) -> Result<(PlayerId, GameState), DispatchError> {
    let mut state = store.load(game_id)?;
    let player_id = state.add_player(name)?;
    store.save(&state)?;
    Ok((player_id, state))
}

/// Load a game, run one action through the engine, and save the outcome.
///
/// A rejected action is returned as [`DispatchError::Game`] and nothing is
/// written, so the stored game never reflects a rejection.
pub fn dispatch<S, D, C>(
    store: &S,
    engine: &mut Engine<D, C>,
    game_id: &str,
    envelope: ActionEnvelope,
) -> Result<GameState, DispatchError>
where
    S: GameStore,
    D: DiceRoller,
    C: CardSource,
{
    let mut state = store.load(game_id)?;
    engine.process(&mut state, envelope.player_id, envelope.action)?;
    store.save(&state)?;
    Ok(state)
}
