//! Player state.
//!
//! This module contains:
//! - The Player struct: money, position, holdings, jail and bankruptcy state
//! - Small helpers for property lists and jail transitions

use crate::board::{PlayerId, SpaceId, JAIL_POSITION};
use serde::{Deserialize, Serialize};

/// Cash every player starts with
pub const INITIAL_MONEY: i64 = 1500;

/// One seat at the table.
///
/// `money` is signed: validated debits can never push it below zero (they
/// suspend into debt resolution instead), but the birthday-style card that
/// collects from every opponent debits them unconditionally, so a balance
/// can legitimately read negative until its owner next has to pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Stable id, equal to this player's index in the turn order
    pub id: PlayerId,
    pub name: String,
    pub money: i64,
    /// Ring position, 0-39
    pub position: SpaceId,
    /// Ids of owned spaces; mirrors the `owner` field on each deed
    pub properties: Vec<SpaceId>,
    pub is_jailed: bool,
    /// Escape attempts made this incarceration, 0-3
    pub jail_turns: u8,
    pub get_out_of_jail_free_cards: u8,
    /// Terminal: a bankrupt player is skipped in rotation forever
    pub is_bankrupt: bool,
    /// Trade proposals made this turn, reset when the turn ends
    pub trade_count: u8,
    /// Display hints: the most recent single credit/debit this turn
    pub last_gained: i64,
    pub last_paid: i64,
}

impl Player {
    /// Create a player at GO with the starting cash.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Player {
            id,
            name: name.into(),
            money: INITIAL_MONEY,
            position: 0,
            properties: Vec::new(),
            is_jailed: false,
            jail_turns: 0,
            get_out_of_jail_free_cards: 0,
            is_bankrupt: false,
            trade_count: 0,
            last_gained: 0,
            last_paid: 0,
        }
    }

    pub fn has_property(&self, id: SpaceId) -> bool {
        self.properties.contains(&id)
    }

    pub fn add_property(&mut self, id: SpaceId) {
        self.properties.push(id);
    }

    pub fn remove_property(&mut self, id: SpaceId) {
        self.properties.retain(|&p| p != id);
    }

    /// Move to the jail space and start a fresh incarceration.
    pub fn send_to_jail(&mut self) {
        self.position = JAIL_POSITION;
        self.is_jailed = true;
        self.jail_turns = 0;
    }

    /// Walk free; also used when a debt tied to the third failed escape
    /// roll finally clears.
    pub fn release_from_jail(&mut self) {
        self.is_jailed = false;
        self.jail_turns = 0;
    }
}
