//! Score objectives
//!
//! Markers unlock once the score reaches their threshold. Each marker unlocks
//! at most once per tracker; a penalty never re-locks one.

use serde::{Deserialize, Serialize};

use crate::session::ScoreObserver;

/// Default thresholds and their marker ids
pub const DEFAULT_OBJECTIVES: [(u32, &str); 3] =
    [(100, "obj-100"), (200, "obj-200"), (500, "obj-500")];

/// One objective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    pub threshold: u32,
    pub marker_id: String,
    pub completed: bool,
}

/// Tracks which objectives a score has reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objectives {
    objectives: Vec<Objective>,
}

impl Default for Objectives {
    fn default() -> Self {
        Self::new(&DEFAULT_OBJECTIVES)
    }
}

impl Objectives {
    pub fn new(thresholds: &[(u32, &str)]) -> Self {
        let mut objectives: Vec<Objective> = thresholds
            .iter()
            .map(|&(threshold, id)| Objective {
                threshold,
                marker_id: id.to_string(),
                completed: false,
            })
            .collect();
        objectives.sort_by_key(|o| o.threshold);
        Self { objectives }
    }

    /// Mark everything `score` reaches; returns the newly completed marker ids
    pub fn update(&mut self, score: u32) -> Vec<String> {
        let mut unlocked = Vec::new();
        for objective in &mut self.objectives {
            if !objective.completed && score >= objective.threshold {
                objective.completed = true;
                unlocked.push(objective.marker_id.clone());
            }
        }
        unlocked
    }

    pub fn completed(&self) -> impl Iterator<Item = &Objective> {
        self.objectives.iter().filter(|o| o.completed)
    }

    pub fn all(&self) -> &[Objective] {
        &self.objectives
    }
}

/// Objectives wired to an unlock callback (e.g. marking DOM elements)
pub struct ObjectiveObserver<F: FnMut(&str)> {
    objectives: Objectives,
    on_unlock: F,
}

impl<F: FnMut(&str)> ObjectiveObserver<F> {
    pub fn new(objectives: Objectives, on_unlock: F) -> Self {
        Self {
            objectives,
            on_unlock,
        }
    }

    pub fn objectives(&self) -> &Objectives {
        &self.objectives
    }
}

impl<F: FnMut(&str)> ScoreObserver for ObjectiveObserver<F> {
    fn on_score_milestone(&mut self, score: u32) {
        for id in self.objectives.update(score) {
            log::info!("Objective {} completed at score {}", id, score);
            (self.on_unlock)(&id);
        }
    }
}
