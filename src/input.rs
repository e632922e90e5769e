use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::types::Facing;

/// Highest priority first when several directions are held.
pub const DIRECTION_PRIORITY: [Facing; 4] = [Facing::South, Facing::West, Facing::North, Facing::East];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputIntent {
    directions: BTreeSet<Facing>,
}

impl InputIntent {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn holding(directions: &[Facing]) -> Self {
        Self {
            directions: directions.iter().copied().collect(),
        }
    }

    pub fn has_direction(&self) -> bool {
        !self.directions.is_empty()
    }

    pub fn primary_direction(&self) -> Option<Facing> {
        DIRECTION_PRIORITY
            .into_iter()
            .find(|dir| self.directions.contains(dir))
    }
}

#[derive(Clone, Debug)]
pub struct KeyBindings {
    pub directions: Vec<(String, Facing)>,
    pub confirm: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            directions: vec![
                ("ArrowDown".to_string(), Facing::South),
                ("ArrowLeft".to_string(), Facing::West),
                ("ArrowUp".to_string(), Facing::North),
                ("ArrowRight".to_string(), Facing::East),
            ],
            confirm: vec!["Enter".to_string(), " ".to_string()],
        }
    }
}

impl KeyBindings {
    pub fn intent(&self, active: &BTreeSet<String>) -> InputIntent {
        InputIntent {
            directions: self
                .directions
                .iter()
                .filter(|(key, _)| active.contains(key))
                .map(|(_, dir)| *dir)
                .collect(),
        }
    }

    fn is_confirm(&self, key: &str) -> bool {
        self.confirm.iter().any(|bound| bound == key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum KeyPhase {
    Up,
    Pressed,
    Released,
    Held,
}

/// Tracks named keys between polls so a tap shorter than one frame still
/// registers once.
#[derive(Clone, Debug, Default)]
pub struct KeyTracker {
    bindings: KeyBindings,
    keys: BTreeMap<String, KeyPhase>,
    confirmations: VecDeque<String>,
}

impl KeyTracker {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            keys: BTreeMap::new(),
            confirmations: VecDeque::new(),
        }
    }

    pub fn key_down(&mut self, key: &str) {
        let phase = self.keys.get(key).copied().unwrap_or(KeyPhase::Up);
        if matches!(phase, KeyPhase::Pressed | KeyPhase::Held) {
            return;
        }
        if self.bindings.is_confirm(key) {
            self.confirmations.push_back(key.to_string());
        }
        self.keys.insert(key.to_string(), KeyPhase::Pressed);
    }

    pub fn key_up(&mut self, key: &str) {
        let next = match self.keys.get(key) {
            Some(KeyPhase::Pressed) => KeyPhase::Released,
            _ => KeyPhase::Up,
        };
        self.keys.insert(key.to_string(), next);
    }

    /// Keys active this frame. Advances each key to its next phase.
    pub fn poll(&mut self) -> BTreeSet<String> {
        let mut active = BTreeSet::new();
        for (key, phase) in self.keys.iter_mut() {
            match *phase {
                KeyPhase::Pressed => {
                    active.insert(key.clone());
                    *phase = KeyPhase::Held;
                }
                KeyPhase::Held => {
                    active.insert(key.clone());
                }
                KeyPhase::Released => {
                    active.insert(key.clone());
                    *phase = KeyPhase::Up;
                }
                KeyPhase::Up => {}
            }
        }
        active
    }

    pub fn poll_intent(&mut self) -> InputIntent {
        let active = self.poll();
        self.bindings.intent(&active)
    }

    pub fn take_confirmation(&mut self) -> Option<String> {
        self.confirmations.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn south_beats_west_beats_north_beats_east() {
        let all = InputIntent::holding(&Facing::ALL);
        assert_eq!(all.primary_direction(), Some(Facing::South));
        let no_south = InputIntent::holding(&[Facing::East, Facing::North, Facing::West]);
        assert_eq!(no_south.primary_direction(), Some(Facing::West));
        let east_north = InputIntent::holding(&[Facing::East, Facing::North]);
        assert_eq!(east_north.primary_direction(), Some(Facing::North));
        assert_eq!(InputIntent::none().primary_direction(), None);
    }

    #[test]
    fn held_key_stays_active_until_the_poll_after_release() {
        let mut tracker = KeyTracker::default();
        tracker.key_down("ArrowUp");
        assert!(tracker.poll().contains("ArrowUp"));
        assert!(tracker.poll().contains("ArrowUp"));
        tracker.key_up("ArrowUp");
        assert!(!tracker.poll().contains("ArrowUp"));
    }

    #[test]
    fn tap_within_one_frame_registers_exactly_once() {
        let mut tracker = KeyTracker::default();
        tracker.key_down("ArrowLeft");
        tracker.key_up("ArrowLeft");
        assert_eq!(tracker.poll_intent().primary_direction(), Some(Facing::West));
        assert_eq!(tracker.poll_intent().primary_direction(), None);
    }

    #[test]
    fn confirmation_is_one_shot_per_press() {
        let mut tracker = KeyTracker::default();
        tracker.key_down("Enter");
        tracker.key_down("Enter");
        assert_eq!(tracker.take_confirmation().as_deref(), Some("Enter"));
        assert_eq!(tracker.take_confirmation(), None);

        tracker.key_up("Enter");
        tracker.poll();
        tracker.key_down("Enter");
        assert_eq!(tracker.take_confirmation().as_deref(), Some("Enter"));
    }

    #[test]
    fn unbound_keys_do_not_produce_directions() {
        let mut tracker = KeyTracker::default();
        tracker.key_down("KeyQ");
        let intent = tracker.poll_intent();
        assert!(!intent.has_direction());
    }
}
