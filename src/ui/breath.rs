use crate::technique::{PhaseLabel, Technique};

pub const MIN_LEVEL: f64 = 0.35;
pub const MAX_LEVEL: f64 = 1.0;

/// How "full" the breathing circle is, in [MIN_LEVEL, MAX_LEVEL].
///
/// Inhale grows the circle, Exhale shrinks it, and Hold keeps whatever
/// level the last non-hold phase ended on.
pub fn breath_level(technique: &Technique, phase_index: usize, phase_remaining_secs: u32) -> f64 {
    let phase = technique.phase(phase_index);
    let done = phase
        .duration_secs
        .saturating_sub(phase_remaining_secs)
        .saturating_add(1)
        .min(phase.duration_secs);
    let progress = done as f64 / phase.duration_secs as f64;

    let level = match phase.label {
        PhaseLabel::Inhale => MIN_LEVEL + (MAX_LEVEL - MIN_LEVEL) * progress,
        PhaseLabel::Exhale => MAX_LEVEL - (MAX_LEVEL - MIN_LEVEL) * progress,
        PhaseLabel::Hold => held_level(technique, phase_index),
    };
    level.clamp(MIN_LEVEL, MAX_LEVEL)
}

fn held_level(technique: &Technique, phase_index: usize) -> f64 {
    let n = technique.len();
    (1..n)
        .map(|back| technique.phase(phase_index + n - back).label)
        .find(|label| *label != PhaseLabel::Hold)
        .map_or(MIN_LEVEL, |label| match label {
            PhaseLabel::Inhale => MAX_LEVEL,
            _ => MIN_LEVEL,
        })
}

/// One-line description of a technique, e.g. `Inhale 4 · Hold 7 · Exhale 8`
pub fn describe_phases(technique: &Technique) -> String {
    technique
        .phases()
        .iter()
        .map(|p| format!("{} {}", p.label, p.duration_secs))
        .collect::<Vec<_>>()
        .join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::technique::{Phase, TechniqueKind};

    #[test]
    fn test_inhale_grows() {
        let t = TechniqueKind::BoxBreathing.technique();
        let start = breath_level(&t, 0, 4);
        let end = breath_level(&t, 0, 1);
        assert!(start < end);
        assert!((end - MAX_LEVEL).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exhale_shrinks() {
        let t = TechniqueKind::Relaxing478.technique();
        let start = breath_level(&t, 2, 8);
        let end = breath_level(&t, 2, 1);
        assert!(start > end);
        assert!((end - MIN_LEVEL).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hold_keeps_previous_level() {
        let t = TechniqueKind::BoxBreathing.technique();
        // hold after inhale stays full, hold after exhale stays empty
        assert_eq!(breath_level(&t, 1, 2), MAX_LEVEL);
        assert_eq!(breath_level(&t, 3, 2), MIN_LEVEL);
    }

    #[test]
    fn test_hold_only_technique() {
        let t = Technique::new("still", vec![Phase::new(PhaseLabel::Hold, 5)]).unwrap();
        assert_eq!(breath_level(&t, 0, 3), MIN_LEVEL);
    }

    #[test]
    fn test_level_stays_in_range() {
        for kind in TechniqueKind::ALL {
            let t = kind.technique();
            for (idx, phase) in t.phases().iter().enumerate() {
                for remaining in 1..=phase.duration_secs {
                    let level = breath_level(&t, idx, remaining);
                    assert!((MIN_LEVEL..=MAX_LEVEL).contains(&level));
                }
            }
        }
    }

    #[test]
    fn test_describe_phases() {
        assert_eq!(
            describe_phases(&TechniqueKind::Relaxing478.technique()),
            "Inhale 4 · Hold 7 · Exhale 8"
        );
    }
}
