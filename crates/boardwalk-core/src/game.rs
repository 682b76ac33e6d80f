//! Core game state.
//!
//! This module contains the `GameState` struct, the lobby operations, the
//! pending-action sub-states that interrupt normal turn flow, and the turn
//! rotation logic. Everything that *changes* state during play goes through
//! the engine; the mutators here are the shared primitives it builds on.

use crate::actions::TradeOffer;
use crate::board::{Board, PlayerId, SpaceId};
use crate::cards::CardEffect;
use crate::player::Player;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fewest players a game can start with
pub const MIN_PLAYERS: usize = 2;

/// Most players a lobby will seat
pub const MAX_PLAYERS: usize = 6;

/// Salary for passing (or landing on) GO
pub const GO_SALARY: i64 = 200;

/// Flat fine to leave jail
pub const JAIL_FINE: i64 = 50;

/// Trade proposals the active player may make per turn
pub const TRADE_LIMIT_PER_TURN: u8 = 3;

/// Log lines kept before the oldest fall off
const GAME_LOG_CAP: usize = 50;

/// Join codes are this many characters
const GAME_CODE_LEN: usize = 5;

/// Join-code alphabet; `O` and `0` are dropped because they read the same
pub(crate) const GAME_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNPQRSTUVWXYZ123456789";

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Players are still joining
    Lobby,
    /// Normal play
    PlayerTurn,
    /// One player left solvent
    GameOver,
}

/// Who a debt is owed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Payee {
    Bank,
    Player(PlayerId),
}

/// An interruption of normal turn flow.
///
/// While one of these is set, only the player it names may act (trade
/// proposals aside), and the actions that resolve it are the only ones
/// that clear it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum PendingAction {
    /// The active player stands on an unowned space they can afford
    AwaitPurchase {
        player_id: PlayerId,
        property_id: SpaceId,
    },

    /// A trade offer waits on its target player
    AwaitTradeResponse {
        player_id: PlayerId,
        trade_offer: TradeOffer,
    },

    /// A drawn card waits to be dismissed before its effect applies
    AwaitCardAcknowledgement {
        player_id: PlayerId,
        card: CardEffect,
    },

    /// A jailed player opens their turn by choosing an escape route
    AwaitJailDecision { player_id: PlayerId },

    /// A debit exceeded the payer's cash; play is suspended until they
    /// raise the money or concede
    AwaitDebtResolution {
        player_id: PlayerId,
        amount_owed: i64,
        owed_to: Payee,
    },
}

impl PendingAction {
    /// The player this sub-state is waiting on.
    pub fn player_id(&self) -> PlayerId {
        match self {
            PendingAction::AwaitPurchase { player_id, .. }
            | PendingAction::AwaitTradeResponse { player_id, .. }
            | PendingAction::AwaitCardAcknowledgement { player_id, .. }
            | PendingAction::AwaitJailDecision { player_id }
            | PendingAction::AwaitDebtResolution { player_id, .. } => *player_id,
        }
    }
}

/// Errors that can occur when applying actions
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("It's not your turn")]
    NotYourTurn,

    #[error("You can only manage properties on your turn")]
    ManageOnYourTurn,

    #[error("Waiting for another player to act")]
    AwaitingAnotherPlayer,

    #[error("The game has not started")]
    NotStarted,

    #[error("The game has already started")]
    AlreadyStarted,

    #[error("The game is over")]
    GameOver,

    #[error("The game is full")]
    GameFull,

    #[error("Only the host can start the game")]
    NotHost,

    #[error("Need at least 2 players to start")]
    NotEnoughPlayers,

    #[error("A bankrupt player cannot act")]
    Bankrupt,

    #[error("No such player")]
    UnknownPlayer,

    #[error("You have already rolled")]
    AlreadyRolled,

    #[error("You are in jail and must use a jail action")]
    InJail,

    #[error("You must roll first")]
    MustRollFirst,

    #[error("You rolled doubles, go again")]
    DoublesRollAgain,

    #[error("Cannot end turn while an action is pending")]
    ActionPending,

    #[error("Not awaiting a property purchase")]
    NoPendingPurchase,

    #[error("Not awaiting card acknowledgement")]
    NoPendingCard,

    #[error("Not awaiting a trade response")]
    NoPendingTrade,

    #[error("Not awaiting a jail decision")]
    NoPendingJailDecision,

    #[error("Not resolving a debt")]
    NoPendingDebt,

    #[error("Cannot afford this")]
    CannotAfford,

    #[error("Invalid trade")]
    InvalidTrade,

    #[error("You have reached your trade limit for this turn")]
    TradeLimitReached,

    #[error("You don't own this property")]
    NotYourProperty,

    #[error("Property is already mortgaged")]
    AlreadyMortgaged,

    #[error("Property is not mortgaged")]
    NotMortgaged,

    #[error("Cannot mortgage a property with houses on it")]
    HousesInTheWay,

    #[error("Can only build on normal properties")]
    NotABuildingSite,

    #[error("Maximum buildings reached")]
    MaxBuildingsReached,

    #[error("You must own the entire color group unmortgaged to build")]
    MonopolyRequired,

    #[error("No houses to sell on this property")]
    NoHousesToSell,

    #[error("No Get Out of Jail Free cards to use")]
    NoJailCard,
}

/// The complete game state.
///
/// Serializes to the camelCase JSON document that clients render and the
/// store persists; a round trip through JSON reproduces the state exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Join code
    pub id: String,
    /// Player who opened the lobby and may start the game
    pub host_id: PlayerId,
    /// Current game phase
    pub phase: GamePhase,
    /// All players, seated in join order; a player's id equals their index
    pub players: Vec<Player>,
    /// The game board
    pub board: Board,
    /// Index into `players` of whoever's turn it is
    pub current_player_index: usize,
    /// Last dice roll, `(0, 0)` before the first
    pub dice: (u8, u8),
    /// Human-readable history, newest first
    pub game_log: Vec<String>,
    /// Consecutive doubles rolled this turn
    pub doubles_count: u8,
    /// Whether the active player has taken their movement roll
    pub has_rolled: bool,
    /// Sub-state that must resolve before normal play continues
    pub pending_action: Option<PendingAction>,
}

impl GameState {
    /// Open a lobby with its host seated as player 0.
    pub fn new(id: impl Into<String>, host_name: impl Into<String>) -> Self {
        GameState {
            id: id.into(),
            host_id: 0,
            phase: GamePhase::Lobby,
            players: vec![Player::new(0, host_name)],
            board: Board::standard(),
            current_player_index: 0,
            dice: (0, 0),
            game_log: vec!["Lobby created. Waiting for players...".to_string()],
            doubles_count: 0,
            has_rolled: false,
            pending_action: None,
        }
    }

    /// Seat another player. Only possible while the lobby is open.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId, GameError> {
        if self.phase != GamePhase::Lobby {
            return Err(GameError::AlreadyStarted);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(GameError::GameFull);
        }
        let id = self.players.len() as PlayerId;
        let name = name.into();
        self.players.push(Player::new(id, name.clone()));
        self.log(format!("{name} has joined the lobby."));
        Ok(id)
    }

    /// Get a player by id.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id as usize)
    }

    pub(crate) fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id as usize)
    }

    /// The player whose turn it is.
    pub fn active_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    pub fn active_player_id(&self) -> PlayerId {
        self.active_player().id
    }

    /// How many players are still in the game.
    pub fn solvent_players(&self) -> usize {
        self.players.iter().filter(|p| !p.is_bankrupt).count()
    }

    /// The last player standing, once the game is over.
    pub fn winner(&self) -> Option<&Player> {
        if self.phase != GamePhase::GameOver {
            return None;
        }
        self.players.iter().find(|p| !p.is_bankrupt)
    }

    /// Prepend a line to the game log, dropping the oldest past the cap.
    pub(crate) fn log(&mut self, message: impl Into<String>) {
        self.game_log.insert(0, message.into());
        self.game_log.truncate(GAME_LOG_CAP);
    }

    /// Credit or debit a player, recording the display hint for whichever
    /// direction the money moved.
    pub(crate) fn adjust_money(&mut self, player_id: PlayerId, amount: i64) {
        if let Some(player) = self.player_mut(player_id) {
            player.money += amount;
            if amount > 0 {
                player.last_gained = amount;
            } else if amount < 0 {
                player.last_paid = -amount;
            }
        }
    }

    /// Attempt a transfer from `payer_id`.
    ///
    /// With enough cash the payer is debited, a player payee is credited
    /// (the bank just absorbs), and `reason` is logged. On a shortfall the
    /// balances are left untouched and play suspends into
    /// [`PendingAction::AwaitDebtResolution`]; the payer keeps the turn and
    /// must raise funds or concede. A suspension is a valid outcome, not a
    /// failure.
    pub(crate) fn pay(&mut self, payer_id: PlayerId, payee: Payee, amount: i64, reason: String) {
        let payer = &self.players[payer_id as usize];
        if payer.money >= amount {
            self.adjust_money(payer_id, -amount);
            if let Payee::Player(payee_id) = payee {
                self.adjust_money(payee_id, amount);
            }
            self.log(reason);
        } else {
            let name = payer.name.clone();
            self.log(format!(
                "{name} does not have enough money to pay ${amount}. They must raise funds."
            ));
            self.pending_action = Some(PendingAction::AwaitDebtResolution {
                player_id: payer_id,
                amount_owed: amount,
                owed_to: payee,
            });
        }
    }

    /// Pass the turn, or grant a doubles re-roll.
    ///
    /// `force` skips the doubles re-roll; turns ended by jail or by a third
    /// consecutive double use it. Bankrupt players are skipped in rotation.
    /// The incoming player has their display hints cleared and, if jailed,
    /// is put straight into the jail decision.
    pub(crate) fn end_turn(&mut self, force: bool) {
        let ending = &mut self.players[self.current_player_index];
        ending.trade_count = 0;
        let ending_jailed = ending.is_jailed;
        let ending_name = ending.name.clone();

        if !force && self.dice.0 == self.dice.1 && !ending_jailed && self.doubles_count < 3 {
            self.log(format!("{ending_name} rolled doubles and gets another turn!"));
            self.has_rolled = false;
            return;
        }

        let mut next_index = self.current_player_index;
        loop {
            next_index = (next_index + 1) % self.players.len();
            if !self.players[next_index].is_bankrupt {
                break;
            }
        }

        let next = &mut self.players[next_index];
        next.last_gained = 0;
        next.last_paid = 0;
        let next_id = next.id;
        let next_name = next.name.clone();
        let next_jailed = next.is_jailed;

        self.log(format!("It is now {next_name}'s turn."));
        self.current_player_index = next_index;
        self.has_rolled = false;
        self.doubles_count = 0;

        if next_jailed {
            self.pending_action = Some(PendingAction::AwaitJailDecision { player_id: next_id });
            self.log(format!("{next_name} is in jail and must decide what to do."));
        }
    }
}

/// Generate a five-character join code.
pub fn generate_game_code() -> String {
    let mut rng = rand::thread_rng();
    (0..GAME_CODE_LEN)
        .map(|_| GAME_CODE_ALPHABET[rng.gen_range(0..GAME_CODE_ALPHABET.len())] as char)
        .collect()
}
