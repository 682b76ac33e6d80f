//! Game actions that players can take.
//!
//! Actions arrive as plain data (typically deserialized from a JSON
//! envelope), are validated by the engine against the current state, and
//! either apply fully or are rejected without touching anything.

use crate::board::{PlayerId, SpaceId};
use serde::{Deserialize, Serialize};

/// All possible actions a player can submit.
///
/// On the wire each action is an object tagged by `type`, with any fields
/// alongside it: `{"type": "BUY_HOUSE", "propertyId": 11}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum GameAction {
    // ==================== Lobby ====================
    /// Close the lobby and begin play (host only, needs 2+ players)
    StartGame,

    // ==================== Turn Flow ====================
    /// Roll both dice and move (once per turn; doubles roll again)
    RollDice,
    /// End your turn after rolling, when nothing is pending
    EndTurn,
    /// Dismiss the currently displayed card and apply its effect
    AcknowledgeCard,

    // ==================== Purchases ====================
    /// Buy the property you just landed on
    BuyProperty,
    /// Pass on the property you just landed on
    DeclineProperty,

    // ==================== Trading ====================
    /// Offer money and/or properties to another player
    ProposeTrade { trade_offer: TradeOffer },
    /// Accept or decline the trade waiting on you
    RespondToTrade { accepted: bool },

    // ==================== Property Management ====================
    /// Mortgage an unbuilt property for half its price
    MortgageProperty { property_id: SpaceId },
    /// Pay off a mortgage (half price plus 10% interest)
    UnmortgageProperty { property_id: SpaceId },
    /// Add a house (or the hotel) to a monopolized lot
    BuyHouse { property_id: SpaceId },
    /// Sell a building back for half its cost
    SellHouse { property_id: SpaceId },

    // ==================== Jail ====================
    /// Pay the $50 fine and walk free before rolling
    PayJailFine,
    /// Spend a Get Out of Jail Free card
    UseJailCard,
    /// Try to roll doubles; three failures force the fine
    AttemptJailRoll,

    // ==================== Debt ====================
    /// Pay off the suspended debt in full
    ResolveDebt,
    /// Concede: assets go to the creditor (or back to the bank)
    DeclareBankruptcy,
}

impl GameAction {
    /// Actions that belong to the active player's turn. Anyone else
    /// submitting one is rejected unless a pending action targets them.
    pub(crate) fn is_turn_scoped(&self) -> bool {
        matches!(
            self,
            GameAction::RollDice
                | GameAction::EndTurn
                | GameAction::BuyProperty
                | GameAction::DeclineProperty
                | GameAction::MortgageProperty { .. }
                | GameAction::UnmortgageProperty { .. }
                | GameAction::BuyHouse { .. }
                | GameAction::SellHouse { .. }
        )
    }

    /// The four property-management actions get their own rejection message
    /// when submitted out of turn.
    pub(crate) fn is_property_management(&self) -> bool {
        matches!(
            self,
            GameAction::MortgageProperty { .. }
                | GameAction::UnmortgageProperty { .. }
                | GameAction::BuyHouse { .. }
                | GameAction::SellHouse { .. }
        )
    }
}

/// One side of a trade: money plus a list of properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSide {
    pub money: i64,
    pub properties: Vec<SpaceId>,
}

/// A proposed exchange between two players.
///
/// `offer` is what the proposer gives up, `request` what they want back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeOffer {
    pub from_player_id: PlayerId,
    pub to_player_id: PlayerId,
    pub offer: TradeSide,
    pub request: TradeSide,
}

impl TradeOffer {
    pub fn new(from: PlayerId, to: PlayerId, offer: TradeSide, request: TradeSide) -> Self {
        Self {
            from_player_id: from,
            to_player_id: to,
            offer,
            request,
        }
    }

    /// A well-formed offer names two different players and never asks to
    /// move negative money (which would reverse the direction of payment).
    pub fn is_valid(&self) -> bool {
        self.from_player_id != self.to_player_id
            && self.offer.money >= 0
            && self.request.money >= 0
    }
}

/// The wire envelope: who is acting, and what they are doing.
///
/// Flattened so the action's tag and fields sit next to `playerId`:
/// `{"playerId": 1, "type": "PROPOSE_TRADE", "tradeOffer": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEnvelope {
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub action: GameAction,
}
