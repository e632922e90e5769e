use log::info;
use thiserror::Error;

use crate::engine::{GameEngine, GameEngineOptions};
use crate::input::InputIntent;
use crate::level_pack::LevelData;
use crate::types::{Confirmation, FrameDiff, Snapshot};

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("level pack contains no levels")]
    Empty,
    #[error("level index {index} out of range (pack has {count} levels)")]
    LevelOutOfRange { index: usize, count: usize },
}

/// Plays the levels of a pack in order, one engine at a time.
#[derive(Debug)]
pub struct Campaign {
    levels: Vec<LevelData>,
    current: usize,
    options: GameEngineOptions,
    engine: GameEngine,
    finished: bool,
}

impl Campaign {
    pub fn new(
        levels: Vec<LevelData>,
        start_index: usize,
        options: GameEngineOptions,
    ) -> Result<Self, CampaignError> {
        if levels.is_empty() {
            return Err(CampaignError::Empty);
        }
        let Some(level) = levels.get(start_index).cloned() else {
            return Err(CampaignError::LevelOutOfRange {
                index: start_index,
                count: levels.len(),
            });
        };
        info!("starting at level {} ({})", level.level_number, level.title);
        Ok(Self {
            engine: GameEngine::new(level, options.clone()),
            levels,
            current: start_index,
            options,
            finished: false,
        })
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn advance_frame(&mut self, elapsed_ms: u64, input: &InputIntent) -> FrameDiff {
        if self.finished {
            return FrameDiff::default();
        }
        self.engine.advance_frame(elapsed_ms, input)
    }

    /// Forwards a confirmation to the engine. A completed level loads the
    /// next one; completing the last level finishes the campaign.
    pub fn confirm(&mut self) -> Option<Confirmation> {
        if self.finished {
            return None;
        }
        let confirmation = self.engine.submit_confirmation()?;
        if confirmation == Confirmation::LevelCompleted {
            self.advance_level();
        }
        Some(confirmation)
    }

    pub fn build_snapshot(&mut self, include_events: bool) -> Snapshot {
        self.engine.build_snapshot(include_events)
    }

    fn advance_level(&mut self) {
        let next = self.current + 1;
        let Some(level) = self.levels.get(next).cloned() else {
            info!("campaign finished after {} levels", self.levels.len());
            self.finished = true;
            return;
        };
        info!("advancing to level {} ({})", level.level_number, level.title);
        self.current = next;
        self.engine = GameEngine::new(level, self.options.clone());
    }
}
