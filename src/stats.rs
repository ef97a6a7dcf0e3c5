use std::collections::BTreeMap;

use serde::Serialize;

use crate::cooldown::GateDecision;
use crate::types::GestureLabel;

/// Contadores de uso del detector
#[derive(Debug, Clone, Default)]
pub struct GestureStats {
    frames: u64,
    frames_with_hand: u64,
    suppressed: u64,
    emitted: BTreeMap<GestureLabel, u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub frames: u64,
    pub frames_with_hand: u64,
    pub suppressed: u64,
    pub total_emitted: u64,
    pub gestures: BTreeMap<GestureLabel, u64>,
}

impl GestureStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra el resultado de un frame
    pub fn observe(&mut self, hand_present: bool, decision: &GateDecision) {
        self.frames += 1;
        if hand_present {
            self.frames_with_hand += 1;
        }
        match decision {
            GateDecision::Emitted(det) => *self.emitted.entry(det.label).or_insert(0) += 1,
            GateDecision::Suppressed(_) => self.suppressed += 1,
            GateDecision::NoGesture => {}
        }
    }

    pub fn count(&self, label: GestureLabel) -> u64 {
        self.emitted.get(&label).copied().unwrap_or(0)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn summary(&self) -> StatsSummary {
        // Todas las etiquetas aparecen, aunque sea con 0
        let gestures: BTreeMap<GestureLabel, u64> = GestureLabel::GESTURES
            .into_iter()
            .map(|label| (label, self.count(label)))
            .collect();
        StatsSummary {
            frames: self.frames,
            frames_with_hand: self.frames_with_hand,
            suppressed: self.suppressed,
            total_emitted: gestures.values().sum(),
            gestures,
        }
    }
}
