//! Game board representation: the 40-space ring and everything on it.
//!
//! This module contains:
//! - Space kinds (properties, railroads, utilities, taxes, corners, card spaces)
//! - Deeds: the purchasable side of a space (price, rent table, ownership,
//!   buildings, mortgage flag)
//! - Color groups and monopoly detection
//! - The standard US board layout
//! - The rent calculator

use serde::{Deserialize, Serialize};

/// Player identifier (0-5, index into the game's player list)
pub type PlayerId = u8;

/// Space identifier (0-39, fixed ring position)
pub type SpaceId = u8;

/// Number of spaces on the ring
pub const BOARD_SPACES: u8 = 40;

/// Where jailed players sit (and visitors pass through)
pub const JAIL_POSITION: SpaceId = 10;

/// The "Go To Jail" corner
pub const GO_TO_JAIL_POSITION: SpaceId = 30;

/// Houses per lot are capped here; the fifth building is the hotel
pub const MAX_HOUSES: u8 = 5;

/// Color groups for ordinary lots.
///
/// Railroads and utilities never carry a color and never participate in
/// monopoly detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColorGroup {
    Brown,
    LightBlue,
    Pink,
    Orange,
    Red,
    Yellow,
    Green,
    DarkBlue,
}

impl ColorGroup {
    /// All color groups in board order
    pub const ALL: [ColorGroup; 8] = [
        ColorGroup::Brown,
        ColorGroup::LightBlue,
        ColorGroup::Pink,
        ColorGroup::Orange,
        ColorGroup::Red,
        ColorGroup::Yellow,
        ColorGroup::Green,
        ColorGroup::DarkBlue,
    ];
}

/// What a space is. TAX carries its levy and PROPERTY its color group;
/// everything mutable about a purchasable space lives in [`Deed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE", rename_all_fields = "camelCase")]
pub enum SpaceKind {
    Go,
    Jail,
    FreeParking,
    GoToJail,
    Chance,
    CommunityChest,
    Tax { amount: i64 },
    Property { color: ColorGroup },
    Railroad,
    Utility,
}

/// Ownership, pricing and building state of a purchasable space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deed {
    /// Purchase price
    pub price: i64,
    /// Rent by building tier: 6 entries for lots, 4 for railroads.
    /// Utilities keep their traditional [4, 10] table for display, but
    /// utility rent is computed from the dice, not from this table.
    pub rent: Vec<i64>,
    /// Cost of one house (or the hotel); zero for railroads and utilities
    pub house_cost: i64,
    /// Owning player, `None` while the bank holds it
    pub owner: Option<PlayerId>,
    /// 0-4 houses, 5 means a hotel
    pub houses: u8,
    pub mortgaged: bool,
}

impl Deed {
    fn new(price: i64, rent: Vec<i64>, house_cost: i64) -> Self {
        Deed {
            price,
            rent,
            house_cost,
            owner: None,
            houses: 0,
            mortgaged: false,
        }
    }

    /// Cash received when mortgaging: half the purchase price
    pub fn mortgage_value(&self) -> i64 {
        self.price / 2
    }

    /// Cash owed to lift a mortgage: the mortgage value plus 10% interest,
    /// rounded down
    pub fn unmortgage_cost(&self) -> i64 {
        self.mortgage_value() * 11 / 10
    }

    /// True once the lot carries its hotel
    pub fn has_hotel(&self) -> bool {
        self.houses == MAX_HOUSES
    }
}

/// One ring position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    #[serde(flatten)]
    pub kind: SpaceKind,
    /// Present exactly on PROPERTY, RAILROAD and UTILITY spaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deed: Option<Deed>,
}

impl Space {
    fn plain(kind: SpaceKind, name: &str) -> Self {
        Space {
            id: 0,
            name: name.to_string(),
            kind,
            deed: None,
        }
    }

    fn lot(name: &str, color: ColorGroup, price: i64, rent: [i64; 6], house_cost: i64) -> Self {
        Space {
            id: 0,
            name: name.to_string(),
            kind: SpaceKind::Property { color },
            deed: Some(Deed::new(price, rent.to_vec(), house_cost)),
        }
    }

    fn railroad(name: &str) -> Self {
        Space {
            id: 0,
            name: name.to_string(),
            kind: SpaceKind::Railroad,
            deed: Some(Deed::new(200, vec![25, 50, 100, 200], 0)),
        }
    }

    fn utility(name: &str) -> Self {
        Space {
            id: 0,
            name: name.to_string(),
            kind: SpaceKind::Utility,
            deed: Some(Deed::new(150, vec![4, 10], 0)),
        }
    }

    /// True when landing here can start a purchase
    pub fn is_purchasable(&self) -> bool {
        self.deed.is_some()
    }

    /// The lot's color group, if it has one
    pub fn color(&self) -> Option<ColorGroup> {
        match self.kind {
            SpaceKind::Property { color } => Some(color),
            _ => None,
        }
    }
}

/// The board: 40 spaces indexed by their ring position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    spaces: Vec<Space>,
}

impl Board {
    /// Create the standard US board layout.
    pub fn standard() -> Self {
        let mut spaces = vec![
            Space::plain(SpaceKind::Go, "GO"),
            Space::lot("Mediterranean Avenue", ColorGroup::Brown, 60, [2, 10, 30, 90, 160, 250], 50),
            Space::plain(SpaceKind::CommunityChest, "Community Chest"),
            Space::lot("Baltic Avenue", ColorGroup::Brown, 60, [4, 20, 60, 180, 320, 450], 50),
            Space::plain(SpaceKind::Tax { amount: 200 }, "Income Tax"),
            Space::railroad("Reading Railroad"),
            Space::lot("Oriental Avenue", ColorGroup::LightBlue, 100, [6, 30, 90, 270, 400, 550], 50),
            Space::plain(SpaceKind::Chance, "Chance"),
            Space::lot("Vermont Avenue", ColorGroup::LightBlue, 100, [6, 30, 90, 270, 400, 550], 50),
            Space::lot("Connecticut Avenue", ColorGroup::LightBlue, 120, [8, 40, 100, 300, 450, 600], 50),
            Space::plain(SpaceKind::Jail, "Jail / Just Visiting"),
            Space::lot("St. Charles Place", ColorGroup::Pink, 140, [10, 50, 150, 450, 625, 750], 100),
            Space::utility("Electric Company"),
            Space::lot("States Avenue", ColorGroup::Pink, 140, [10, 50, 150, 450, 625, 750], 100),
            Space::lot("Virginia Avenue", ColorGroup::Pink, 160, [12, 60, 180, 500, 700, 900], 100),
            Space::railroad("Pennsylvania Railroad"),
            Space::lot("St. James Place", ColorGroup::Orange, 180, [14, 70, 200, 550, 750, 950], 100),
            Space::plain(SpaceKind::CommunityChest, "Community Chest"),
            Space::lot("Tennessee Avenue", ColorGroup::Orange, 180, [14, 70, 200, 550, 750, 950], 100),
            Space::lot("New York Avenue", ColorGroup::Orange, 200, [16, 80, 220, 600, 800, 1000], 100),
            Space::plain(SpaceKind::FreeParking, "Free Parking"),
            Space::lot("Kentucky Avenue", ColorGroup::Red, 220, [18, 90, 250, 700, 875, 1050], 150),
            Space::plain(SpaceKind::Chance, "Chance"),
            Space::lot("Indiana Avenue", ColorGroup::Red, 220, [18, 90, 250, 700, 875, 1050], 150),
            Space::lot("Illinois Avenue", ColorGroup::Red, 240, [20, 100, 300, 750, 925, 1100], 150),
            Space::railroad("B. & O. Railroad"),
            Space::lot("Atlantic Avenue", ColorGroup::Yellow, 260, [22, 110, 330, 800, 975, 1150], 150),
            Space::lot("Ventnor Avenue", ColorGroup::Yellow, 260, [22, 110, 330, 800, 975, 1150], 150),
            Space::utility("Water Works"),
            Space::lot("Marvin Gardens", ColorGroup::Yellow, 280, [24, 120, 360, 850, 1025, 1200], 150),
            Space::plain(SpaceKind::GoToJail, "Go To Jail"),
            Space::lot("Pacific Avenue", ColorGroup::Green, 300, [26, 130, 390, 900, 1100, 1275], 200),
            Space::lot("North Carolina Avenue", ColorGroup::Green, 300, [26, 130, 390, 900, 1100, 1275], 200),
            Space::plain(SpaceKind::CommunityChest, "Community Chest"),
            Space::lot("Pennsylvania Avenue", ColorGroup::Green, 320, [28, 150, 450, 1000, 1200, 1400], 200),
            Space::railroad("Short Line"),
            Space::plain(SpaceKind::Chance, "Chance"),
            Space::lot("Park Place", ColorGroup::DarkBlue, 350, [35, 175, 500, 1100, 1300, 1500], 200),
            Space::plain(SpaceKind::Tax { amount: 100 }, "Luxury Tax"),
            Space::lot("Boardwalk", ColorGroup::DarkBlue, 400, [50, 200, 600, 1400, 1700, 2000], 200),
        ];
        for (id, space) in spaces.iter_mut().enumerate() {
            space.id = id as SpaceId;
        }
        Board { spaces }
    }

    pub fn space(&self, id: SpaceId) -> Option<&Space> {
        self.spaces.get(id as usize)
    }

    pub fn space_mut(&mut self, id: SpaceId) -> Option<&mut Space> {
        self.spaces.get_mut(id as usize)
    }

    /// The deed attached to a space, if it is purchasable
    pub fn deed(&self, id: SpaceId) -> Option<&Deed> {
        self.space(id).and_then(|s| s.deed.as_ref())
    }

    pub fn deed_mut(&mut self, id: SpaceId) -> Option<&mut Deed> {
        self.space_mut(id).and_then(|s| s.deed.as_mut())
    }

    /// Current owner of a space, `None` for bank-held or unownable spaces
    pub fn owner_of(&self, id: SpaceId) -> Option<PlayerId> {
        self.deed(id).and_then(|d| d.owner)
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    /// Ids of every lot in a color group
    pub fn color_group(&self, color: ColorGroup) -> Vec<SpaceId> {
        self.spaces
            .iter()
            .filter(|s| s.color() == Some(color))
            .map(|s| s.id)
            .collect()
    }

    /// All spaces whose deed a player currently holds
    pub fn owned_spaces(&self, player: PlayerId) -> impl Iterator<Item = &Space> + '_ {
        self.spaces
            .iter()
            .filter(move |s| s.deed.as_ref().map_or(false, |d| d.owner == Some(player)))
    }

    /// True when the player owns every lot of the color group and none of
    /// them is mortgaged. This is the gate for both rent doubling and house
    /// construction.
    pub fn has_monopoly(&self, player: PlayerId, color: ColorGroup) -> bool {
        self.spaces
            .iter()
            .filter(|s| s.color() == Some(color))
            .all(|s| {
                s.deed
                    .as_ref()
                    .map_or(false, |d| d.owner == Some(player) && !d.mortgaged)
            })
    }

    /// How many railroads a player holds
    pub fn railroads_owned(&self, player: PlayerId) -> usize {
        self.owned_spaces(player)
            .filter(|s| s.kind == SpaceKind::Railroad)
            .count()
    }

    /// How many utilities a player holds
    pub fn utilities_owned(&self, player: PlayerId) -> usize {
        self.owned_spaces(player)
            .filter(|s| s.kind == SpaceKind::Utility)
            .count()
    }

    /// Rent owed for landing on a space, derived entirely from board state.
    ///
    /// Returns 0 for unownable or bank-held spaces. Mortgage and owner-jailed
    /// exemptions are decided by the landing handler, not here.
    ///
    /// - Utilities: 4x the dice total, 10x when the owner holds both.
    /// - Railroads: the tier for the owner's railroad count, falling back to
    ///   the base tier if the table is short.
    /// - Lots with houses: the rent tier for the building count.
    /// - Bare lots: base rent, doubled under a monopoly.
    pub fn rent_due(&self, id: SpaceId, dice_total: i64) -> i64 {
        let deed = match self.deed(id) {
            Some(d) => d,
            None => return 0,
        };
        let owner = match deed.owner {
            Some(o) => o,
            None => return 0,
        };
        let space = match self.space(id) {
            Some(s) => s,
            None => return 0,
        };
        match space.kind {
            SpaceKind::Utility => {
                let multiplier = if self.utilities_owned(owner) == 2 { 10 } else { 4 };
                dice_total * multiplier
            }
            SpaceKind::Railroad => {
                let count = self.railroads_owned(owner);
                deed.rent
                    .get(count.saturating_sub(1))
                    .or_else(|| deed.rent.first())
                    .copied()
                    .unwrap_or(0)
            }
            SpaceKind::Property { color } => {
                if deed.houses > 0 {
                    deed.rent.get(deed.houses as usize).copied().unwrap_or(0)
                } else {
                    let base = deed.rent.first().copied().unwrap_or(0);
                    if self.has_monopoly(owner, color) {
                        base * 2
                    } else {
                        base
                    }
                }
            }
            _ => 0,
        }
    }
}
