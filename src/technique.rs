use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::BreathingError;

/// The fixed vocabulary of breathing phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum PhaseLabel {
    Inhale,
    Hold,
    Exhale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub label: PhaseLabel,
    pub duration_secs: u32,
}

impl Phase {
    pub const fn new(label: PhaseLabel, duration_secs: u32) -> Self {
        Self {
            label,
            duration_secs,
        }
    }
}

/// A named, ordered, non-empty sequence of phases.
///
/// Only constructible through [`Technique::new`], so every instance holds at
/// least one phase and every phase lasts at least one second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technique {
    name: String,
    phases: Vec<Phase>,
}

impl Technique {
    pub fn new(name: impl Into<String>, phases: Vec<Phase>) -> Result<Self, BreathingError> {
        let name = name.into();
        if phases.is_empty() {
            return Err(BreathingError::EmptyTechnique);
        }
        if let Some(index) = phases.iter().position(|p| p.duration_secs == 0) {
            return Err(BreathingError::InvalidPhaseDuration {
                technique: name,
                index,
            });
        }
        Ok(Self { name, phases })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Never true for a constructed technique
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Phase at `index`, wrapping around the cycle
    pub fn phase(&self, index: usize) -> Phase {
        self.phases[index % self.phases.len()]
    }

    pub fn first(&self) -> Phase {
        self.phases[0]
    }

    /// Length of one full pass through every phase, in seconds
    pub fn cycle_secs(&self) -> u32 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }
}

/// Built-in techniques, keyed for the CLI and the config file
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
pub enum TechniqueKind {
    #[default]
    #[value(name = "box")]
    #[serde(rename = "box")]
    #[strum(serialize = "box")]
    BoxBreathing,
    #[value(name = "4-7-8")]
    #[serde(rename = "4-7-8")]
    #[strum(serialize = "4-7-8")]
    Relaxing478,
}

struct TechniqueRow {
    kind: TechniqueKind,
    name: &'static str,
    phases: &'static [Phase],
}

use PhaseLabel::{Exhale, Hold, Inhale};

const TECHNIQUES: &[TechniqueRow] = &[
    TechniqueRow {
        kind: TechniqueKind::BoxBreathing,
        name: "Box Breathing",
        phases: &[
            Phase::new(Inhale, 4),
            Phase::new(Hold, 4),
            Phase::new(Exhale, 4),
            Phase::new(Hold, 4),
        ],
    },
    TechniqueRow {
        kind: TechniqueKind::Relaxing478,
        name: "4-7-8 Relaxing Breath",
        phases: &[
            Phase::new(Inhale, 4),
            Phase::new(Hold, 7),
            Phase::new(Exhale, 8),
        ],
    },
];

impl TechniqueKind {
    pub const ALL: [TechniqueKind; 2] = [TechniqueKind::BoxBreathing, TechniqueKind::Relaxing478];

    fn row(self) -> &'static TechniqueRow {
        TECHNIQUES
            .iter()
            .find(|row| row.kind == self)
            .unwrap_or(&TECHNIQUES[0])
    }

    pub fn display_name(self) -> &'static str {
        self.row().name
    }

    pub fn technique(self) -> Technique {
        let row = self.row();
        Technique {
            name: row.name.to_string(),
            phases: row.phases.to_vec(),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_every_kind_has_a_table_row() {
        for kind in TechniqueKind::ALL {
            assert_eq!(kind.row().kind, kind);
        }
    }

    #[test]
    fn test_builtin_techniques_are_valid() {
        for kind in TechniqueKind::ALL {
            let t = kind.technique();
            assert!(Technique::new(t.name(), t.phases().to_vec()).is_ok());
        }
    }

    #[test]
    fn test_box_breathing_table() {
        let t = TechniqueKind::BoxBreathing.technique();
        assert_eq!(t.name(), "Box Breathing");
        assert_eq!(t.len(), 4);
        assert_eq!(t.cycle_secs(), 16);
        assert_eq!(
            t.phases().iter().map(|p| p.label).collect::<Vec<_>>(),
            vec![Inhale, Hold, Exhale, Hold]
        );
    }

    #[test]
    fn test_relaxing_breath_table() {
        let t = TechniqueKind::Relaxing478.technique();
        assert_eq!(t.name(), "4-7-8 Relaxing Breath");
        assert_eq!(
            t.phases()
                .iter()
                .map(|p| p.duration_secs)
                .collect::<Vec<_>>(),
            vec![4, 7, 8]
        );
        assert_eq!(t.cycle_secs(), 19);
    }

    #[test]
    fn test_empty_technique_rejected() {
        assert_matches!(
            Technique::new("nothing", vec![]),
            Err(BreathingError::EmptyTechnique)
        );
    }

    #[test]
    fn test_zero_duration_phase_rejected() {
        let result = Technique::new(
            "broken",
            vec![Phase::new(Inhale, 4), Phase::new(Hold, 0)],
        );
        assert_matches!(
            result,
            Err(BreathingError::InvalidPhaseDuration { index: 1, .. })
        );
    }

    #[test]
    fn test_phase_wraps() {
        let t = TechniqueKind::Relaxing478.technique();
        assert_eq!(t.phase(3), t.phase(0));
        assert_eq!(t.phase(5).label, Exhale);
    }

    #[test]
    fn test_kind_cycling() {
        assert_eq!(TechniqueKind::BoxBreathing.next(), TechniqueKind::Relaxing478);
        assert_eq!(TechniqueKind::Relaxing478.next(), TechniqueKind::BoxBreathing);
        assert_eq!(TechniqueKind::BoxBreathing.prev(), TechniqueKind::Relaxing478);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TechniqueKind::BoxBreathing.to_string(), "box");
        assert_eq!(TechniqueKind::Relaxing478.to_string(), "4-7-8");
        assert_eq!(
            TechniqueKind::from_str("4-7-8", true),
            Ok(TechniqueKind::Relaxing478)
        );
        assert_eq!(
            serde_json::to_string(&TechniqueKind::Relaxing478).unwrap(),
            "\"4-7-8\""
        );
    }

    #[test]
    fn test_phase_label_display() {
        assert_eq!(Inhale.to_string(), "Inhale");
        assert_eq!(Hold.to_string(), "Hold");
        assert_eq!(Exhale.to_string(), "Exhale");
    }
}
