use log::info;

use crate::constants::{MOVE_TICK_MS, SLIP_TICK_MS};
use crate::input::InputIntent;
use crate::level_pack::LevelData;
use crate::types::{
    Confirmation, DefeatCause, FrameDiff, InventoryEntry, RunningState, RuntimeEvent, Snapshot,
};
use crate::world::GameState;

mod monster_system;
mod player_system;
mod slip_system;
mod utils;

use self::utils::Cadence;

#[derive(Clone, Debug)]
pub struct GameEngineOptions {
    pub move_tick_ms: u64,
    pub slip_tick_ms: u64,
    pub time_limit_ms_override: Option<u64>,
}

impl Default for GameEngineOptions {
    fn default() -> Self {
        Self {
            move_tick_ms: MOVE_TICK_MS,
            slip_tick_ms: SLIP_TICK_MS,
            time_limit_ms_override: None,
        }
    }
}

/// Sole owner and mutator of a level's `GameState`.
#[derive(Clone, Debug)]
pub struct GameEngine {
    pub config: GameEngineOptions,

    level: LevelData,
    state: GameState,
    move_cadence: Cadence,
    slip_cadence: Cadence,
    confirmation_armed: bool,
    events: Vec<RuntimeEvent>,
    diff: FrameDiff,
    tick_counter: u64,
}

impl GameEngine {
    pub fn new(level: LevelData, options: GameEngineOptions) -> Self {
        let state = GameState::from_level(&level, options.time_limit_ms_override);
        Self {
            move_cadence: Cadence::new(options.move_tick_ms),
            slip_cadence: Cadence::new(options.slip_tick_ms),
            config: options,
            level,
            state,
            confirmation_armed: false,
            events: Vec::new(),
            diff: FrameDiff::default(),
            tick_counter: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    pub fn running_state(&self) -> RunningState {
        self.state.running_state
    }

    /// Advances the simulation by one host frame. Terminal states freeze
    /// everything until `submit_confirmation`.
    pub fn advance_frame(&mut self, elapsed_ms: u64, input: &InputIntent) -> FrameDiff {
        self.diff = FrameDiff::default();
        self.tick_counter += 1;

        if self.state.running_state == RunningState::Starting {
            if !input.has_direction() {
                return self.finish_frame();
            }
            self.state.running_state = RunningState::Running;
            self.diff.state_changed = true;
            info!("level {} started", self.level.level_number);
        }
        if self.state.running_state != RunningState::Running {
            return self.finish_frame();
        }

        if self.state.time_limited {
            self.state.time_remaining_ms = self.state.time_remaining_ms.saturating_sub(elapsed_ms);
            if self.state.time_remaining_ms == 0 {
                self.defeat(DefeatCause::Timeout);
                return self.finish_frame();
            }
        }

        let slip_steps = self.slip_cadence.advance(elapsed_ms);
        let move_steps = self.move_cadence.advance(elapsed_ms);

        for _ in 0..slip_steps {
            if !self.is_running() {
                break;
            }
            self.step_slip();
        }
        for _ in 0..move_steps {
            if !self.is_running() {
                break;
            }
            if !self.state.ice_sliding {
                self.step_player(input);
            }
        }
        for _ in 0..move_steps {
            if !self.is_running() {
                break;
            }
            self.step_monsters();
        }

        self.finish_frame()
    }

    /// Resolves a terminal state. Defeat rebuilds the level from scratch;
    /// Victory reports completion once.
    pub fn submit_confirmation(&mut self) -> Option<Confirmation> {
        if !self.confirmation_armed {
            return None;
        }
        self.confirmation_armed = false;

        match self.state.running_state {
            RunningState::Defeat => {
                self.restart();
                Some(Confirmation::Restarted)
            }
            RunningState::Victory => Some(Confirmation::LevelCompleted),
            RunningState::Starting | RunningState::Running => None,
        }
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        let snapshot = Snapshot {
            tick: self.tick_counter,
            level_number: self.level.level_number,
            state: self.state.running_state,
            time_left_ms: self.state.time_remaining_ms,
            chips_remaining: self.state.chips_remaining,
            player: self.state.player,
            monsters: self.state.monsters.clone(),
            blocks: self.state.dynamic_items.clone(),
            inventory: self
                .state
                .inventory
                .iter()
                .map(|(item_type, count)| InventoryEntry {
                    item_type: *item_type,
                    count: *count,
                })
                .collect(),
            ice_sliding: self.state.ice_sliding,
            show_hint: self.state.show_hint,
            hint: if self.state.show_hint {
                self.state.level_hint.clone()
            } else {
                None
            },
            events: if include_events {
                self.events.clone()
            } else {
                Vec::new()
            },
        };
        if include_events {
            self.events.clear();
        }
        snapshot
    }

    fn restart(&mut self) {
        self.state = GameState::from_level(&self.level, self.config.time_limit_ms_override);
        self.move_cadence = Cadence::new(self.config.move_tick_ms);
        self.slip_cadence = Cadence::new(self.config.slip_tick_ms);
        self.events.push(RuntimeEvent::Restarted);
        info!("level {} restarted", self.level.level_number);
    }

    fn is_running(&self) -> bool {
        self.state.running_state == RunningState::Running
    }

    fn finish_frame(&mut self) -> FrameDiff {
        self.diff.ice_sliding = self.state.ice_sliding;
        self.diff.show_hint = self.state.show_hint;
        self.diff
    }

    fn defeat(&mut self, cause: DefeatCause) {
        if !self.is_running() {
            return;
        }
        self.state.running_state = RunningState::Defeat;
        self.confirmation_armed = true;
        self.diff.state_changed = true;
        self.events.push(RuntimeEvent::PlayerDefeated { cause });
        info!("level {} lost: {:?}", self.level.level_number, cause);
    }

    fn victory(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state.running_state = RunningState::Victory;
        self.confirmation_armed = true;
        self.diff.state_changed = true;
        self.events.push(RuntimeEvent::LevelCompleted {
            level_number: self.level.level_number,
        });
        info!("level {} completed", self.level.level_number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_pack::tests::open_level;
    use crate::types::{Facing, Item, ItemType, Monster, MonsterType, Position, Tile};

    pub(super) fn engine_for(level: LevelData) -> GameEngine {
        let mut engine = GameEngine::new(level, GameEngineOptions::default());
        engine.advance_frame(0, &InputIntent::holding(&[Facing::South]));
        assert_eq!(engine.running_state(), RunningState::Running);
        engine
    }

    pub(super) fn walk(engine: &mut GameEngine, dir: Facing) -> FrameDiff {
        engine.advance_frame(MOVE_TICK_MS, &InputIntent::holding(&[dir]))
    }

    pub(super) fn idle(engine: &mut GameEngine, elapsed_ms: u64) -> FrameDiff {
        engine.advance_frame(elapsed_ms, &InputIntent::none())
    }

    pub(super) fn level_with(width: i32, height: i32, tiles: &[(i32, i32, Tile)]) -> LevelData {
        let mut level = open_level(width, height);
        for (x, y, tile) in tiles {
            level.tiles.set(Position::new(*x, *y), *tile);
        }
        level
    }

    pub(super) fn item(x: i32, y: i32, item_type: ItemType) -> Item {
        Item {
            position: Position::new(x, y),
            item_type,
        }
    }

    #[test]
    fn starting_waits_for_a_direction_and_keeps_the_clock() {
        let mut engine = GameEngine::new(open_level(5, 5), GameEngineOptions::default());
        let before = engine.state().time_remaining_ms;
        idle(&mut engine, 5_000);
        assert_eq!(engine.running_state(), RunningState::Starting);
        assert_eq!(engine.state().time_remaining_ms, before);

        let diff = walk(&mut engine, Facing::East);
        assert!(diff.state_changed);
        assert_eq!(engine.running_state(), RunningState::Running);
        assert_eq!(engine.state().player.position, Position::new(1, 0));
        assert_eq!(engine.state().time_remaining_ms, before - MOVE_TICK_MS);
    }

    #[test]
    fn player_moves_once_per_move_tick() {
        let mut engine = engine_for(open_level(8, 3));
        let east = InputIntent::holding(&[Facing::East]);
        engine.advance_frame(150, &east);
        assert_eq!(engine.state().player.position, Position::new(0, 0));
        engine.advance_frame(50, &east);
        assert_eq!(engine.state().player.position, Position::new(1, 0));
        engine.advance_frame(MOVE_TICK_MS * 3, &east);
        assert_eq!(engine.state().player.position, Position::new(4, 0));
    }

    #[test]
    fn highest_priority_direction_wins() {
        let mut engine = engine_for(open_level(5, 5));
        engine.state.player.position = Position::new(2, 2);
        engine.advance_frame(
            MOVE_TICK_MS,
            &InputIntent::holding(&[Facing::East, Facing::North, Facing::West]),
        );
        assert_eq!(engine.state().player.position, Position::new(1, 2));
        assert_eq!(engine.state().player.facing, Facing::West);
    }

    #[test]
    fn blocked_move_still_turns_the_player() {
        let mut engine = engine_for(level_with(3, 3, &[(1, 0, Tile::Wall)]));
        walk(&mut engine, Facing::East);
        assert_eq!(engine.state().player.position, Position::new(0, 0));
        assert_eq!(engine.state().player.facing, Facing::East);
    }

    #[test]
    fn timer_expiry_defeats_and_confirmation_restarts() {
        let mut level = open_level(5, 5);
        level.time = 1;
        level.items = vec![item(1, 0, ItemType::RedKey)];
        let mut engine = engine_for(level);

        walk(&mut engine, Facing::East);
        assert_eq!(engine.state().inventory.get(&ItemType::RedKey), Some(&1));
        idle(&mut engine, 600);
        assert_eq!(engine.running_state(), RunningState::Running);
        idle(&mut engine, 600);
        assert_eq!(engine.running_state(), RunningState::Defeat);
        assert_eq!(engine.state().time_remaining_ms, 0);

        // frozen until confirmed
        walk(&mut engine, Facing::South);
        assert_eq!(engine.state().player.position, Position::new(1, 0));

        assert_eq!(engine.submit_confirmation(), Some(Confirmation::Restarted));
        assert_eq!(engine.running_state(), RunningState::Starting);
        assert_eq!(engine.state().time_remaining_ms, 1_000);
        assert_eq!(engine.state().player.position, Position::new(0, 0));
        assert!(engine.state().inventory.is_empty());
        assert_eq!(engine.state().items_at(Position::new(1, 0)), &[ItemType::RedKey]);
        assert_eq!(engine.submit_confirmation(), None);
    }

    #[test]
    fn untimed_level_never_runs_out() {
        let mut level = open_level(3, 3);
        level.time = 0;
        let mut engine = engine_for(level);
        idle(&mut engine, 10 * 60 * 1_000);
        assert_eq!(engine.running_state(), RunningState::Running);
    }

    #[test]
    fn exit_wins_and_confirmation_reports_once() {
        let mut engine = engine_for(level_with(3, 3, &[(1, 0, Tile::Exit)]));
        let diff = walk(&mut engine, Facing::East);
        assert!(diff.state_changed);
        assert_eq!(engine.running_state(), RunningState::Victory);

        let before = engine.state().time_remaining_ms;
        idle(&mut engine, 1_000);
        assert_eq!(engine.state().time_remaining_ms, before);

        assert_eq!(
            engine.submit_confirmation(),
            Some(Confirmation::LevelCompleted)
        );
        assert_eq!(engine.submit_confirmation(), None);
    }

    #[test]
    fn confirmation_without_terminal_state_is_ignored() {
        let mut engine = engine_for(open_level(3, 3));
        assert_eq!(engine.submit_confirmation(), None);
        assert_eq!(engine.running_state(), RunningState::Running);
    }

    #[test]
    fn walking_into_a_monster_is_fatal() {
        let mut level = open_level(4, 1);
        level.monsters = vec![Monster {
            position: Position::new(1, 0),
            facing: Facing::North,
            monster_type: MonsterType::Tank,
        }];
        let mut engine = engine_for(level);
        walk(&mut engine, Facing::East);
        assert_eq!(engine.running_state(), RunningState::Defeat);
    }

    #[test]
    fn snapshot_drains_events_when_requested() {
        let mut level = open_level(4, 1);
        level.items = vec![item(1, 0, ItemType::Chip)];
        level.chips = 1;
        let mut engine = engine_for(level);
        walk(&mut engine, Facing::East);

        let peek = engine.build_snapshot(false);
        assert!(peek.events.is_empty());
        let drained = engine.build_snapshot(true);
        assert!(matches!(
            drained.events.as_slice(),
            [RuntimeEvent::ChipCollected { remaining: 0, .. }]
        ));
        assert!(engine.build_snapshot(true).events.is_empty());
    }

    #[test]
    fn hint_is_visible_only_while_standing_on_it() {
        let mut level = level_with(4, 1, &[(1, 0, Tile::Hint)]);
        level.hint = Some("Collect chips".to_string());
        let mut engine = engine_for(level);

        let diff = walk(&mut engine, Facing::East);
        assert!(diff.show_hint);
        assert_eq!(
            engine.build_snapshot(false).hint.as_deref(),
            Some("Collect chips")
        );
        let diff = walk(&mut engine, Facing::East);
        assert!(!diff.show_hint);
        assert!(engine.build_snapshot(false).hint.is_none());
    }

    #[test]
    fn slip_steps_run_before_the_player_move() {
        let mut engine = engine_for(level_with(4, 3, &[(1, 0, Tile::ForceSouth)]));
        walk(&mut engine, Facing::East);
        // the force floor is resolved on the next slip step, not this frame
        assert_eq!(engine.state().player.position, Position::new(1, 0));
        idle(&mut engine, SLIP_TICK_MS);
        assert_eq!(engine.state().player.position, Position::new(1, 1));
    }
}
