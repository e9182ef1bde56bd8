use serde::{Deserialize, Serialize};

/// Acquisition angles, evenly spaced over the half turn [0°, 180°).
///
/// Projection `i` is taken at `i * step` degrees. The forward projector
/// rotates the object by the negated angle and the back-projector rotates
/// the smeared row by the positive angle, so the two undo each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleSequence {
    count: usize,
    step_deg: f64,
}

impl AngleSequence {
    pub fn evenly_spaced(count: usize) -> Self {
        let step_deg = if count == 0 {
            0.0
        } else {
            180.0 / count as f64
        };
        Self { count, step_deg }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn step(&self) -> f64 {
        self.step_deg
    }

    pub fn degrees(&self, index: usize) -> f64 {
        index as f64 * self.step_deg
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.count).map(move |index| self.degrees(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_cover_half_turn_without_endpoint() {
        let angles = AngleSequence::evenly_spaced(4);
        let values: Vec<f64> = angles.iter().collect();
        assert_eq!(values, vec![0.0, 45.0, 90.0, 135.0]);
    }

    #[test]
    fn empty_sequence_has_no_step() {
        let angles = AngleSequence::evenly_spaced(0);
        assert!(angles.is_empty());
        assert_eq!(angles.step(), 0.0);
    }
}
