//! The action processor.
//!
//! [`Engine::process`] is the single entry point for play: it validates an
//! incoming action against the current state (phase, authorization, pending
//! sub-state), applies it fully or rejects it without touching anything,
//! and leaves the turn controller to decide who acts next.
//!
//! Dice and cards are the only nondeterministic inputs, and both are
//! injected: [`DiceRoller`] for rolls, [`CardSource`] for Chance and
//! Community Chest draws. A failing card source is tolerated by dealing
//! from the offline table instead.

use crate::actions::GameAction;
use crate::board::{PlayerId, SpaceId, SpaceKind, BOARD_SPACES, JAIL_POSITION, MAX_HOUSES};
use crate::cards::{CardAction, CardEffect, CardSource, CardSourceError, CardType, OfflineDeck};
use crate::dice::{DiceRoller, RandomDice};
use crate::game::{
    GameError, GamePhase, GameState, Payee, PendingAction, GO_SALARY, JAIL_FINE, MIN_PLAYERS,
    TRADE_LIMIT_PER_TURN,
};
use tracing::warn;

/// How a move was initiated. Card moves never pay the GO salary through the
/// wrap check, and forced moves (jail escapes) end the turn even on doubles.
#[derive(Debug, Clone, Copy)]
struct MoveOptions {
    is_card_move: bool,
    force_end_turn: bool,
}

/// The action processor.
///
/// Generic over its dice and card source so games can be replayed and
/// tests can script exact sequences; the defaults give fair dice and the
/// offline card tables.
#[derive(Debug)]
pub struct Engine<D = RandomDice, C = OfflineDeck> {
    dice: D,
    cards: C,
    /// Fallback deck for card-source failures
    offline: OfflineDeck,
}

impl Engine {
    /// An engine with entropy-seeded dice and the offline card tables.
    pub fn new() -> Self {
        Engine::with_components(RandomDice::new(), OfflineDeck::new())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DiceRoller, C: CardSource> Engine<D, C> {
    /// An engine with injected dice and card source. The offline deck is
    /// still kept around as the fallback for card-source failures.
    pub fn with_components(dice: D, cards: C) -> Self {
        Engine {
            dice,
            cards,
            offline: OfflineDeck::new(),
        }
    }

    /// Validate and apply one action.
    ///
    /// On `Err` the state is guaranteed untouched. An insolvency suspension
    /// is *not* an error: the action succeeds and leaves
    /// [`PendingAction::AwaitDebtResolution`] set.
    pub fn process(
        &mut self,
        state: &mut GameState,
        player_id: PlayerId,
        action: GameAction,
    ) -> Result<(), GameError> {
        match state.phase {
            GamePhase::GameOver => return Err(GameError::GameOver),
            GamePhase::Lobby => {
                if !matches!(action, GameAction::StartGame) {
                    return Err(GameError::NotStarted);
                }
            }
            GamePhase::PlayerTurn => {
                if matches!(action, GameAction::StartGame) {
                    return Err(GameError::AlreadyStarted);
                }
            }
        }

        let actor = state.player(player_id).ok_or(GameError::UnknownPlayer)?;
        if actor.is_bankrupt {
            return Err(GameError::Bankrupt);
        }

        // Turn-scoped actions belong to the active player, unless a pending
        // action singles the actor out instead.
        if state.phase == GamePhase::PlayerTurn && action.is_turn_scoped() {
            let is_active = player_id == state.active_player_id();
            let is_pending_target = state
                .pending_action
                .as_ref()
                .map_or(false, |p| p.player_id() == player_id);
            if !is_active && !is_pending_target {
                if action.is_property_management() {
                    return Err(GameError::ManageOnYourTurn);
                }
                return Err(GameError::NotYourTurn);
            }
        }

        // While something is pending, everyone but its target waits. A new
        // trade proposal is the one exception.
        if let Some(pending) = &state.pending_action {
            if pending.player_id() != player_id
                && !matches!(action, GameAction::ProposeTrade { .. })
            {
                return Err(GameError::AwaitingAnotherPlayer);
            }
        }

        match action {
            // ==================== Lobby ====================
            GameAction::StartGame => {
                if player_id != state.host_id {
                    return Err(GameError::NotHost);
                }
                if state.players.len() < MIN_PLAYERS {
                    return Err(GameError::NotEnoughPlayers);
                }

                state.phase = GamePhase::PlayerTurn;
                let first = state.players[0].name.clone();
                state.log(format!("Game started! It's {first}'s turn."));
            }

            // ==================== Rolling & Movement ====================
            GameAction::RollDice => {
                if state.has_rolled {
                    return Err(GameError::AlreadyRolled);
                }
                if state.players[player_id as usize].is_jailed {
                    return Err(GameError::InJail);
                }

                let (die1, die2) = self.dice.roll();
                let name = state.players[player_id as usize].name.clone();
                state.log(format!("{name} rolled a {die1} and a {die2}."));
                state.dice = (die1, die2);
                state.has_rolled = true;
                if die1 == die2 {
                    state.doubles_count += 1;
                }

                if state.doubles_count == 3 {
                    state.log("Rolled doubles 3 times! Go to jail.");
                    state.players[player_id as usize].send_to_jail();
                    state.end_turn(true);
                } else {
                    self.move_player(
                        state,
                        player_id,
                        i64::from(die1 + die2),
                        MoveOptions {
                            is_card_move: false,
                            force_end_turn: false,
                        },
                    );
                }
            }

            GameAction::EndTurn => {
                if !state.has_rolled {
                    return Err(GameError::MustRollFirst);
                }
                if state.pending_action.is_some() {
                    return Err(GameError::ActionPending);
                }
                if state.dice.0 == state.dice.1 {
                    return Err(GameError::DoublesRollAgain);
                }
                state.end_turn(false);
            }

            // ==================== Purchases ====================
            GameAction::BuyProperty => {
                let property_id = match state.pending_action {
                    Some(PendingAction::AwaitPurchase { property_id, .. }) => property_id,
                    _ => return Err(GameError::NoPendingPurchase),
                };
                // The prompt only appears when affordable, but money can
                // shift while it is open (unmortgaging, building).
                let price = state.board.deed(property_id).unwrap().price;
                if state.players[player_id as usize].money < price {
                    return Err(GameError::CannotAfford);
                }

                state.adjust_money(player_id, -price);
                state.players[player_id as usize].add_property(property_id);
                state.board.deed_mut(property_id).unwrap().owner = Some(player_id);

                let name = state.players[player_id as usize].name.clone();
                let prop_name = state.board.space(property_id).unwrap().name.clone();
                state.log(format!("{name} bought {prop_name}."));
                state.pending_action = None;
                state.end_turn(false);
            }

            GameAction::DeclineProperty => {
                let property_id = match state.pending_action {
                    Some(PendingAction::AwaitPurchase { property_id, .. }) => property_id,
                    _ => return Err(GameError::NoPendingPurchase),
                };
                let name = state.players[player_id as usize].name.clone();
                let prop_name = state.board.space(property_id).unwrap().name.clone();
                state.log(format!("{name} declined to buy {prop_name}."));
                state.pending_action = None;
                state.end_turn(false);
            }

            // ==================== Cards ====================
            GameAction::AcknowledgeCard => {
                let card = match &state.pending_action {
                    Some(PendingAction::AwaitCardAcknowledgement { card, .. }) => card.clone(),
                    _ => return Err(GameError::NoPendingCard),
                };
                state.pending_action = None;
                self.apply_card(state, player_id, card);
            }

            // ==================== Trading ====================
            GameAction::ProposeTrade { trade_offer } => {
                if trade_offer.from_player_id != player_id || !trade_offer.is_valid() {
                    return Err(GameError::InvalidTrade);
                }
                let target = state
                    .player(trade_offer.to_player_id)
                    .ok_or(GameError::UnknownPlayer)?;
                if target.is_bankrupt {
                    return Err(GameError::InvalidTrade);
                }

                // Only the active player burns through the per-turn limit;
                // off-turn proposals are free.
                if player_id == state.active_player_id() {
                    if state.players[player_id as usize].trade_count >= TRADE_LIMIT_PER_TURN {
                        return Err(GameError::TradeLimitReached);
                    }
                    state.players[player_id as usize].trade_count += 1;
                }

                let proposer = state.players[player_id as usize].name.clone();
                let target_name = state.players[trade_offer.to_player_id as usize].name.clone();
                state.log(format!("{proposer} proposed a trade to {target_name}."));
                state.pending_action = Some(PendingAction::AwaitTradeResponse {
                    player_id: trade_offer.to_player_id,
                    trade_offer,
                });
            }

            GameAction::RespondToTrade { accepted } => {
                let offer = match &state.pending_action {
                    Some(PendingAction::AwaitTradeResponse { trade_offer, .. }) => {
                        trade_offer.clone()
                    }
                    _ => return Err(GameError::NoPendingTrade),
                };
                let from = offer.from_player_id;
                let to = offer.to_player_id;

                if accepted {
                    // Both sides must still hold everything the offer moves.
                    let from_player = &state.players[from as usize];
                    let to_player = &state.players[to as usize];
                    let from_holds = from_player.money >= offer.offer.money
                        && offer
                            .offer
                            .properties
                            .iter()
                            .all(|&id| from_player.has_property(id));
                    let to_holds = to_player.money >= offer.request.money
                        && offer
                            .request
                            .properties
                            .iter()
                            .all(|&id| to_player.has_property(id));
                    if !from_holds || !to_holds {
                        return Err(GameError::InvalidTrade);
                    }

                    state.adjust_money(from, -offer.offer.money);
                    state.adjust_money(to, offer.offer.money);
                    state.adjust_money(from, offer.request.money);
                    state.adjust_money(to, -offer.request.money);

                    for &prop_id in &offer.offer.properties {
                        state.players[from as usize].remove_property(prop_id);
                        state.players[to as usize].add_property(prop_id);
                        state.board.deed_mut(prop_id).unwrap().owner = Some(to);
                    }
                    for &prop_id in &offer.request.properties {
                        state.players[to as usize].remove_property(prop_id);
                        state.players[from as usize].add_property(prop_id);
                        state.board.deed_mut(prop_id).unwrap().owner = Some(from);
                    }

                    let from_name = state.players[from as usize].name.clone();
                    let to_name = state.players[to as usize].name.clone();
                    state.log(format!("Trade between {from_name} and {to_name} was accepted!"));
                } else {
                    let from_name = state.players[from as usize].name.clone();
                    let to_name = state.players[to as usize].name.clone();
                    state.log(format!("{to_name} declined the trade from {from_name}."));
                }
                state.pending_action = None;
            }

            // ==================== Property Management ====================
            GameAction::MortgageProperty { property_id } => {
                let deed = match state.board.deed(property_id) {
                    Some(d) if d.owner == Some(player_id) => d,
                    _ => return Err(GameError::NotYourProperty),
                };
                if deed.mortgaged {
                    return Err(GameError::AlreadyMortgaged);
                }
                if deed.houses > 0 {
                    return Err(GameError::HousesInTheWay);
                }
                let value = deed.mortgage_value();

                state.board.deed_mut(property_id).unwrap().mortgaged = true;
                state.adjust_money(player_id, value);
                let name = state.players[player_id as usize].name.clone();
                let prop_name = state.board.space(property_id).unwrap().name.clone();
                state.log(format!("{name} mortgaged {prop_name} for ${value}."));
            }

            GameAction::UnmortgageProperty { property_id } => {
                let deed = match state.board.deed(property_id) {
                    Some(d) if d.owner == Some(player_id) => d,
                    _ => return Err(GameError::NotYourProperty),
                };
                if !deed.mortgaged {
                    return Err(GameError::NotMortgaged);
                }
                // An immediate cost, not routed through debt resolution.
                let cost = deed.unmortgage_cost();
                if state.players[player_id as usize].money < cost {
                    return Err(GameError::CannotAfford);
                }

                state.board.deed_mut(property_id).unwrap().mortgaged = false;
                state.adjust_money(player_id, -cost);
                let name = state.players[player_id as usize].name.clone();
                let prop_name = state.board.space(property_id).unwrap().name.clone();
                state.log(format!("{name} unmortgaged {prop_name} for ${cost}."));
            }

            GameAction::BuyHouse { property_id } => {
                let deed = match state.board.deed(property_id) {
                    Some(d) if d.owner == Some(player_id) => d,
                    _ => return Err(GameError::NotYourProperty),
                };
                let color = match state.board.space(property_id).unwrap().kind {
                    SpaceKind::Property { color } => color,
                    _ => return Err(GameError::NotABuildingSite),
                };
                if deed.houses >= MAX_HOUSES {
                    return Err(GameError::MaxBuildingsReached);
                }
                let cost = deed.house_cost;
                if state.players[player_id as usize].money < cost {
                    return Err(GameError::CannotAfford);
                }
                if !state.board.has_monopoly(player_id, color) {
                    return Err(GameError::MonopolyRequired);
                }

                let deed = state.board.deed_mut(property_id).unwrap();
                deed.houses += 1;
                let built_hotel = deed.has_hotel();
                state.adjust_money(player_id, -cost);

                let building = if built_hotel { "a hotel" } else { "a house" };
                let name = state.players[player_id as usize].name.clone();
                let prop_name = state.board.space(property_id).unwrap().name.clone();
                state.log(format!("{name} bought {building} for {prop_name}."));
            }

            GameAction::SellHouse { property_id } => {
                let deed = match state.board.deed(property_id) {
                    Some(d) if d.owner == Some(player_id) => d,
                    _ => return Err(GameError::NotYourProperty),
                };
                if deed.houses == 0 {
                    return Err(GameError::NoHousesToSell);
                }
                let refund = deed.house_cost / 2;

                let deed = state.board.deed_mut(property_id).unwrap();
                let sold_hotel = deed.has_hotel();
                deed.houses -= 1;
                state.adjust_money(player_id, refund);

                let building = if sold_hotel { "a hotel" } else { "a house" };
                let name = state.players[player_id as usize].name.clone();
                let prop_name = state.board.space(property_id).unwrap().name.clone();
                state.log(format!("{name} sold {building} on {prop_name} for ${refund}."));
            }

            // ==================== Jail ====================
            GameAction::PayJailFine => {
                if !matches!(
                    state.pending_action,
                    Some(PendingAction::AwaitJailDecision { .. })
                ) {
                    return Err(GameError::NoPendingJailDecision);
                }
                if state.players[player_id as usize].money < JAIL_FINE {
                    return Err(GameError::CannotAfford);
                }

                state.adjust_money(player_id, -JAIL_FINE);
                let name = state.players[player_id as usize].name.clone();
                state.log(format!("{name} paid ${JAIL_FINE} to get out of jail."));

                state.players[player_id as usize].release_from_jail();
                state.pending_action = None;
                state.log(format!(
                    "{name} is now out of jail. Roll the dice to continue your turn."
                ));
            }

            GameAction::UseJailCard => {
                if !matches!(
                    state.pending_action,
                    Some(PendingAction::AwaitJailDecision { .. })
                ) {
                    return Err(GameError::NoPendingJailDecision);
                }
                if state.players[player_id as usize].get_out_of_jail_free_cards == 0 {
                    return Err(GameError::NoJailCard);
                }

                let player = &mut state.players[player_id as usize];
                player.get_out_of_jail_free_cards -= 1;
                player.release_from_jail();
                let name = player.name.clone();
                state.pending_action = None;
                state.log(format!(
                    "{name} used a 'Get Out of Jail Free' card and can now roll the dice."
                ));
            }

            GameAction::AttemptJailRoll => {
                if !matches!(
                    state.pending_action,
                    Some(PendingAction::AwaitJailDecision { .. })
                ) {
                    return Err(GameError::NoPendingJailDecision);
                }

                let (die1, die2) = self.dice.roll();
                let name = state.players[player_id as usize].name.clone();
                state.log(format!(
                    "{name} attempts to roll doubles... and gets a {die1} and a {die2}."
                ));
                state.dice = (die1, die2);

                if die1 == die2 {
                    state.log(format!("Success! {name} is out of jail."));
                    state.players[player_id as usize].release_from_jail();
                    state.pending_action = None;
                    state.has_rolled = true;
                    self.move_player(
                        state,
                        player_id,
                        i64::from(die1 + die2),
                        MoveOptions {
                            is_card_move: false,
                            force_end_turn: true,
                        },
                    );
                } else {
                    state.players[player_id as usize].jail_turns += 1;
                    state.pending_action = None;

                    if state.players[player_id as usize].jail_turns >= 3 {
                        state.log(format!(
                            "Third attempt failed. {name} must pay the ${JAIL_FINE} fine."
                        ));
                        state.pay(
                            player_id,
                            Payee::Bank,
                            JAIL_FINE,
                            format!("{name} pays the ${JAIL_FINE} jail fine."),
                        );
                        if state.pending_action.is_none() {
                            state.players[player_id as usize].release_from_jail();
                            state.end_turn(true);
                        }
                        // On a shortfall the fine became a suspended debt:
                        // the player stays jailed and keeps the turn until
                        // it is resolved.
                    } else {
                        state.log(format!("Failed to roll doubles. {name} remains in jail."));
                        state.end_turn(true);
                    }
                }
            }

            // ==================== Debt ====================
            GameAction::ResolveDebt => {
                let (amount_owed, owed_to) = match state.pending_action {
                    Some(PendingAction::AwaitDebtResolution {
                        amount_owed,
                        owed_to,
                        ..
                    }) => (amount_owed, owed_to),
                    _ => return Err(GameError::NoPendingDebt),
                };
                if state.players[player_id as usize].money < amount_owed {
                    return Err(GameError::CannotAfford);
                }

                state.adjust_money(player_id, -amount_owed);
                if let Payee::Player(creditor) = owed_to {
                    state.adjust_money(creditor, amount_owed);
                }
                state.pending_action = None;
                let name = state.players[player_id as usize].name.clone();
                state.log(format!("{name} has paid their debt of ${amount_owed}."));

                // A debt from the third failed escape roll keeps its holder
                // jailed until paid; settle that hold now.
                let player = &mut state.players[player_id as usize];
                if player.is_jailed && player.jail_turns >= 3 {
                    player.release_from_jail();
                }

                state.end_turn(false);
            }

            GameAction::DeclareBankruptcy => {
                let owed_to = match state.pending_action {
                    Some(PendingAction::AwaitDebtResolution { owed_to, .. }) => owed_to,
                    _ => return Err(GameError::NoPendingDebt),
                };
                let name = state.players[player_id as usize].name.clone();
                let cash = state.players[player_id as usize].money;
                let properties = state.players[player_id as usize].properties.clone();
                let jail_cards = state.players[player_id as usize].get_out_of_jail_free_cards;

                match owed_to {
                    Payee::Player(creditor) => {
                        let creditor_name = state.players[creditor as usize].name.clone();
                        state.log(format!("{name} goes bankrupt to {creditor_name}!"));
                        state.adjust_money(creditor, cash);
                        for &prop_id in &properties {
                            state.board.deed_mut(prop_id).unwrap().owner = Some(creditor);
                            state.players[creditor as usize].add_property(prop_id);
                        }
                        state.players[creditor as usize].get_out_of_jail_free_cards += jail_cards;
                    }
                    Payee::Bank => {
                        state.log(format!("{name} goes bankrupt to the bank!"));
                        for &prop_id in &properties {
                            let deed = state.board.deed_mut(prop_id).unwrap();
                            deed.owner = None;
                            deed.mortgaged = false;
                            deed.houses = 0;
                        }
                    }
                }

                let player = &mut state.players[player_id as usize];
                player.money = 0;
                player.is_bankrupt = true;
                player.properties.clear();
                player.get_out_of_jail_free_cards = 0;
                state.pending_action = None;

                if state.solvent_players() <= 1 {
                    state.phase = GamePhase::GameOver;
                    let winner_name = state.winner().map(|p| p.name.clone());
                    if let Some(winner_name) = winner_name {
                        state.log(format!("{winner_name} wins the game!"));
                    }
                } else {
                    state.end_turn(true);
                }
            }
        }

        Ok(())
    }

    // ==================== Movement & Landing ====================

    /// Relocate a player by `delta` spaces (negative moves backwards),
    /// paying the GO salary on a real wrap, then resolve the landing.
    fn move_player(
        &mut self,
        state: &mut GameState,
        player_id: PlayerId,
        delta: i64,
        options: MoveOptions,
    ) {
        let player = &state.players[player_id as usize];
        let old_position = player.position;
        let was_jailed = player.is_jailed;
        let name = player.name.clone();
        let new_position =
            (i64::from(old_position) + delta).rem_euclid(i64::from(BOARD_SPACES)) as SpaceId;

        if !options.is_card_move && new_position < old_position && !was_jailed {
            state.adjust_money(player_id, GO_SALARY);
            state.log(format!("{name} passed GO and collected ${GO_SALARY}."));
        }
        state.players[player_id as usize].position = new_position;

        // Backward card moves land with a meaningless dice total; use the
        // distance so utility rent stays non-negative.
        self.land_on(state, player_id, new_position, delta.abs(), options);
    }

    /// Resolve the effect of standing on a space, whatever brought the
    /// player there.
    fn land_on(
        &mut self,
        state: &mut GameState,
        player_id: PlayerId,
        space_id: SpaceId,
        dice_total: i64,
        options: MoveOptions,
    ) {
        let name = state.players[player_id as usize].name.clone();
        let space = state.board.space(space_id).unwrap();
        let space_name = space.name.clone();
        let kind = space.kind;
        state.log(format!("{name} landed on {space_name}."));

        match kind {
            SpaceKind::Property { .. } | SpaceKind::Railroad | SpaceKind::Utility => {
                let deed = state.board.deed(space_id).unwrap();
                let price = deed.price;
                let owner = deed.owner;
                let mortgaged = deed.mortgaged;

                match owner {
                    None => {
                        if state.players[player_id as usize].money >= price {
                            state.pending_action = Some(PendingAction::AwaitPurchase {
                                player_id,
                                property_id: space_id,
                            });
                        } else {
                            state.log(format!("{name} cannot afford to buy {space_name}."));
                            state.end_turn(options.force_end_turn);
                        }
                    }
                    Some(owner_id) if owner_id != player_id && !mortgaged => {
                        let owner_name = state.players[owner_id as usize].name.clone();
                        if state.players[owner_id as usize].is_jailed {
                            state.log(format!("{owner_name} is in jail and cannot collect rent."));
                            state.end_turn(options.force_end_turn);
                        } else {
                            let rent = state.board.rent_due(space_id, dice_total);
                            state.pay(
                                player_id,
                                Payee::Player(owner_id),
                                rent,
                                format!("{name} pays ${rent} in rent to {owner_name}."),
                            );
                            if state.pending_action.is_none() {
                                state.end_turn(options.force_end_turn);
                            }
                        }
                    }
                    // Own space, or a mortgaged one: nothing owed.
                    Some(_) => state.end_turn(options.force_end_turn),
                }
            }

            SpaceKind::Chance | SpaceKind::CommunityChest => {
                let pile = if kind == SpaceKind::Chance {
                    CardType::Chance
                } else {
                    CardType::CommunityChest
                };
                state.log(format!("{name} draws a {pile} card."));
                let card = self.draw_card(pile);
                state.pending_action = Some(PendingAction::AwaitCardAcknowledgement {
                    player_id,
                    card,
                });
            }

            SpaceKind::GoToJail => {
                state.log(format!("{name} is sent to Jail!"));
                state.players[player_id as usize].send_to_jail();
                state.end_turn(true);
            }

            SpaceKind::Tax { amount } => {
                state.pay(
                    player_id,
                    Payee::Bank,
                    amount,
                    format!("{name} pays ${amount} in tax."),
                );
                if state.pending_action.is_none() {
                    state.end_turn(options.force_end_turn);
                }
            }

            SpaceKind::Go | SpaceKind::Jail | SpaceKind::FreeParking => {
                state.end_turn(options.force_end_turn);
            }
        }
    }

    // ==================== Card Effects ====================

    /// Apply an acknowledged card.
    fn apply_card(&mut self, state: &mut GameState, player_id: PlayerId, card: CardEffect) {
        let name = state.players[player_id as usize].name.clone();
        state.log(format!("Card effect: {}", card.text));

        match card.action {
            CardAction::ReceiveMoney { amount } => {
                state.adjust_money(player_id, amount);
                state.end_turn(false);
            }

            CardAction::PayMoney { amount } => {
                state.pay(player_id, Payee::Bank, amount, card.text.clone());
                if state.pending_action.is_none() {
                    state.end_turn(false);
                }
            }

            CardAction::MoveTo { space_id } => {
                // Salary is due when the target sits numerically behind the
                // current position, except for a trip to the jail corner.
                let current = state.players[player_id as usize].position;
                if space_id < current && space_id != JAIL_POSITION {
                    state.adjust_money(player_id, GO_SALARY);
                    state.log(format!("{name} passed GO and collected ${GO_SALARY}."));
                }
                state.players[player_id as usize].position = space_id;
                self.land_on(
                    state,
                    player_id,
                    space_id,
                    0,
                    MoveOptions {
                        is_card_move: true,
                        force_end_turn: false,
                    },
                );
            }

            CardAction::MoveBy { amount } => {
                self.move_player(
                    state,
                    player_id,
                    amount,
                    MoveOptions {
                        is_card_move: true,
                        force_end_turn: false,
                    },
                );
            }

            CardAction::GoToJail => {
                state.players[player_id as usize].send_to_jail();
                state.end_turn(true);
            }

            CardAction::GetOutOfJailFree => {
                state.players[player_id as usize].get_out_of_jail_free_cards += 1;
                state.end_turn(false);
            }

            CardAction::ReceiveFromPlayers { amount } => {
                // Contributors are debited unconditionally, even below
                // zero; only the drawer's own payments go through debt
                // resolution.
                let others: Vec<PlayerId> = state
                    .players
                    .iter()
                    .filter(|p| p.id != player_id && !p.is_bankrupt)
                    .map(|p| p.id)
                    .collect();
                let collected = amount * others.len() as i64;
                for other in others {
                    state.adjust_money(other, -amount);
                }
                state.adjust_money(player_id, collected);
                state.end_turn(false);
            }

            CardAction::PayForBuildings {
                per_house,
                per_hotel,
            } => {
                let total: i64 = state
                    .board
                    .owned_spaces(player_id)
                    .filter_map(|s| s.deed.as_ref())
                    .map(|d| {
                        if d.has_hotel() {
                            per_hotel
                        } else {
                            i64::from(d.houses) * per_house
                        }
                    })
                    .sum();
                state.pay(
                    player_id,
                    Payee::Bank,
                    total,
                    format!("{name} pays ${total} for building repairs."),
                );
                if state.pending_action.is_none() {
                    state.end_turn(false);
                }
            }
        }
    }

    /// Draw from the configured source, dealing from the offline deck when
    /// it fails or returns something unusable.
    fn draw_card(&mut self, pile: CardType) -> CardEffect {
        let drawn = self.cards.draw(pile).and_then(|card| match card.action {
            CardAction::MoveTo { space_id } if space_id >= BOARD_SPACES => Err(
                CardSourceError::Malformed(format!("space id {space_id} is off the board")),
            ),
            _ => Ok(card),
        });
        match drawn {
            Ok(card) => card,
            Err(err) => {
                warn!(card_type = %pile, error = %err, "card source failed, dealing offline");
                self.offline.deal(pile)
            }
        }
    }
}
