use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    North,
    West,
    South,
    East,
}

impl Facing {
    pub const ALL: [Facing; 4] = [Facing::North, Facing::West, Facing::South, Facing::East];

    pub fn turn_around(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    pub fn turn_left(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::South => Self::East,
            Self::East => Self::North,
            Self::West => Self::South,
        }
    }

    pub fn turn_right(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::South => Self::West,
            Self::East => Self::South,
            Self::West => Self::North,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, facing: Facing) -> Self {
        let (dx, dy) = facing.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tile {
    Floor,
    Wall,
    Exit,
    Water,
    Fire,
    Dirt,
    BlueDoor,
    RedDoor,
    GreenDoor,
    YellowDoor,
    Hint,
    ChipGate,
    ForceNorth,
    ForceSouth,
    ForceEast,
    ForceWest,
    Ice,
    IceNorthEast,
    IceNorthWest,
    IceSouthEast,
    IceSouthWest,
    SwitchBlockOpen,
    SwitchBlockClosed,
    SwitchBlockButton,
    TankButton,
}

impl Tile {
    pub fn is_ice(self) -> bool {
        matches!(
            self,
            Self::Ice
                | Self::IceNorthEast
                | Self::IceNorthWest
                | Self::IceSouthEast
                | Self::IceSouthWest
        )
    }

    pub fn force_direction(self) -> Option<Facing> {
        match self {
            Self::ForceNorth => Some(Facing::North),
            Self::ForceSouth => Some(Facing::South),
            Self::ForceEast => Some(Facing::East),
            Self::ForceWest => Some(Facing::West),
            _ => None,
        }
    }

    pub fn door_key(self) -> Option<ItemType> {
        match self {
            Self::BlueDoor => Some(ItemType::BlueKey),
            Self::RedDoor => Some(ItemType::RedKey),
            Self::GreenDoor => Some(ItemType::GreenKey),
            Self::YellowDoor => Some(ItemType::YellowKey),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Chip,
    DirtBlock,
    Bomb,
    CloningMachine,
    BlueKey,
    RedKey,
    GreenKey,
    YellowKey,
    Flippers,
    FireBoots,
    IceSkates,
    SuctionBoots,
}

impl ItemType {
    pub fn is_key(self) -> bool {
        matches!(
            self,
            Self::BlueKey | Self::RedKey | Self::GreenKey | Self::YellowKey
        )
    }

    pub fn is_equipment(self) -> bool {
        matches!(
            self,
            Self::Flippers | Self::FireBoots | Self::IceSkates | Self::SuctionBoots
        )
    }

    /// Items that move around the grid instead of sitting on a cell.
    pub fn is_dynamic(self) -> bool {
        self == Self::DirtBlock
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonsterType {
    Bug,
    Fireball,
    Ball,
    Tank,
    Glider,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunningState {
    Starting,
    Running,
    Defeat,
    Victory,
}

impl RunningState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Defeat | Self::Victory)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatCause {
    Drowned,
    Burned,
    MonsterContact,
    Timeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Item {
    pub position: Position,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Monster {
    pub position: Position,
    pub facing: Facing,
    #[serde(rename = "type")]
    pub monster_type: MonsterType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Player {
    pub position: Position,
    pub facing: Facing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DynamicItem {
    pub position: Position,
    pub facing: Facing,
    #[serde(rename = "type")]
    pub item_type: ItemType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TrapLink {
    pub button: Position,
    pub trap: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ClonerLink {
    pub button: Position,
    pub machine: Position,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    Restarted,
    LevelCompleted,
}

/// Render-relevant changes produced by one `advance_frame` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FrameDiff {
    #[serde(rename = "tilesChanged")]
    pub tiles_changed: bool,
    #[serde(rename = "itemsChanged")]
    pub items_changed: bool,
    #[serde(rename = "inventoryChanged")]
    pub inventory_changed: bool,
    #[serde(rename = "iceSliding")]
    pub ice_sliding: bool,
    #[serde(rename = "showHint")]
    pub show_hint: bool,
    #[serde(rename = "stateChanged")]
    pub state_changed: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct InventoryEntry {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    ChipCollected {
        x: i32,
        y: i32,
        remaining: u32,
    },
    ItemCollected {
        #[serde(rename = "itemType")]
        item_type: ItemType,
        count: u32,
    },
    DoorOpened {
        x: i32,
        y: i32,
        tile: Tile,
    },
    ChipGateOpened {
        x: i32,
        y: i32,
    },
    BlockSunk {
        x: i32,
        y: i32,
    },
    SwitchBlocksToggled {
        count: usize,
    },
    TanksReversed {
        count: usize,
    },
    MonsterDrowned {
        x: i32,
        y: i32,
    },
    PlayerDefeated {
        cause: DefeatCause,
    },
    LevelCompleted {
        #[serde(rename = "levelNumber")]
        level_number: u16,
    },
    Restarted,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    #[serde(rename = "levelNumber")]
    pub level_number: u16,
    pub state: RunningState,
    #[serde(rename = "timeLeftMs")]
    pub time_left_ms: u64,
    #[serde(rename = "chipsRemaining")]
    pub chips_remaining: u32,
    pub player: Player,
    pub monsters: Vec<Monster>,
    pub blocks: Vec<DynamicItem>,
    pub inventory: Vec<InventoryEntry>,
    #[serde(rename = "iceSliding")]
    pub ice_sliding: bool,
    #[serde(rename = "showHint")]
    pub show_hint: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub events: Vec<RuntimeEvent>,
}
