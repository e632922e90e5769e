use crate::collision::{can_enter, Mover};
use crate::types::{Facing, Monster, MonsterType};
use crate::world::GameState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Left,
    Straight,
    Right,
    Reverse,
}

impl Turn {
    pub fn apply(self, facing: Facing) -> Facing {
        match self {
            Self::Left => facing.turn_left(),
            Self::Straight => facing,
            Self::Right => facing.turn_right(),
            Self::Reverse => facing.turn_around(),
        }
    }
}

pub fn preference(monster_type: MonsterType) -> &'static [Turn] {
    match monster_type {
        MonsterType::Bug => &[Turn::Left, Turn::Straight, Turn::Right, Turn::Reverse],
        MonsterType::Tank => &[Turn::Straight],
        MonsterType::Ball => &[Turn::Straight, Turn::Reverse],
        MonsterType::Fireball => &[Turn::Straight, Turn::Right, Turn::Left, Turn::Reverse],
        MonsterType::Glider => &[Turn::Straight, Turn::Left, Turn::Right, Turn::Reverse],
    }
}

/// First direction in the monster's preference order that it may move into.
pub fn choose_direction(state: &GameState, monster: &Monster) -> Option<Facing> {
    preference(monster.monster_type)
        .iter()
        .map(|turn| turn.apply(monster.facing))
        .find(|dir| {
            can_enter(
                state,
                monster.position.step(*dir),
                Mover::Monster(monster.monster_type),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level_pack::tests::open_level;
    use crate::types::{Position, Tile};

    fn arena() -> GameState {
        GameState::from_level(&open_level(5, 5), None)
    }

    fn monster(monster_type: MonsterType, facing: Facing) -> Monster {
        Monster {
            position: Position::new(2, 2),
            facing,
            monster_type,
        }
    }

    fn wall(state: &mut GameState, facing: Facing) {
        state.tiles.set(Position::new(2, 2).step(facing), Tile::Wall);
    }

    #[test]
    fn bug_prefers_left_over_straight() {
        let state = arena();
        let bug = monster(MonsterType::Bug, Facing::North);
        assert_eq!(choose_direction(&state, &bug), Some(Facing::West));
    }

    #[test]
    fn bug_follows_the_wall_order_when_blocked() {
        let mut state = arena();
        wall(&mut state, Facing::West);
        let bug = monster(MonsterType::Bug, Facing::North);
        assert_eq!(choose_direction(&state, &bug), Some(Facing::North));

        wall(&mut state, Facing::North);
        wall(&mut state, Facing::East);
        assert_eq!(choose_direction(&state, &bug), Some(Facing::South));

        wall(&mut state, Facing::South);
        assert_eq!(choose_direction(&state, &bug), None);
    }

    #[test]
    fn tank_only_moves_straight() {
        let mut state = arena();
        let tank = monster(MonsterType::Tank, Facing::East);
        assert_eq!(choose_direction(&state, &tank), Some(Facing::East));
        wall(&mut state, Facing::East);
        assert_eq!(choose_direction(&state, &tank), None);
    }

    #[test]
    fn ball_bounces_back() {
        let mut state = arena();
        wall(&mut state, Facing::South);
        let ball = monster(MonsterType::Ball, Facing::South);
        assert_eq!(choose_direction(&state, &ball), Some(Facing::North));
    }

    #[test]
    fn fireball_turns_right_before_left_and_glider_left_before_right() {
        let mut state = arena();
        wall(&mut state, Facing::North);
        let fireball = monster(MonsterType::Fireball, Facing::North);
        assert_eq!(choose_direction(&state, &fireball), Some(Facing::East));
        let glider = monster(MonsterType::Glider, Facing::North);
        assert_eq!(choose_direction(&state, &glider), Some(Facing::West));
    }

    #[test]
    fn monsters_avoid_water() {
        let mut state = arena();
        state.tiles.set(Position::new(2, 1), Tile::Water);
        let glider = monster(MonsterType::Glider, Facing::North);
        assert_eq!(choose_direction(&state, &glider), Some(Facing::West));
    }

    #[test]
    fn turn_table_matches_facing_maps() {
        assert_eq!(Turn::Left.apply(Facing::East), Facing::North);
        assert_eq!(Turn::Right.apply(Facing::West), Facing::North);
        assert_eq!(Turn::Reverse.apply(Facing::South), Facing::North);
        assert_eq!(preference(MonsterType::Tank).len(), 1);
    }
}
