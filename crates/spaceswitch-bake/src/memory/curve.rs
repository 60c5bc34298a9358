//! Linear animation curves for the in-memory scene.

use serde::{Deserialize, Serialize};

/// Two key times closer than this are the same key.
const KEY_TIME_EPSILON: f64 = 1e-6;

/// A single key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Keyframe {
    /// Frame.
    pub time: f64,
    /// Value at that frame.
    pub value: f64,
}

/// A channel: a static value, or keys evaluated with linear interpolation
/// and held flat outside the keyed range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimCurve {
    /// Value used while the channel has no keys.
    #[serde(default)]
    pub value: f64,
    /// Keys, sorted by time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<Keyframe>,
}

impl AnimCurve {
    /// Creates an unkeyed channel.
    pub fn constant(value: f64) -> Self {
        Self {
            value,
            keys: Vec::new(),
        }
    }

    /// Creates a keyed channel from `(time, value)` pairs in any order.
    pub fn keyed(keys: &[(f64, f64)]) -> Self {
        let mut curve = Self::default();
        for &(time, value) in keys {
            curve.set_key(time, value);
        }
        curve
    }

    /// Returns true if the channel has keys.
    pub fn is_animated(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Evaluates the channel at `time`.
    pub fn evaluate(&self, time: f64) -> f64 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return self.value,
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        let next = self.keys.partition_point(|key| key.time <= time);
        let a = self.keys[next - 1];
        let b = self.keys[next];
        let t = (time - a.time) / (b.time - a.time);
        a.value + (b.value - a.value) * t
    }

    /// Inserts a key, replacing any key at the same time.
    pub fn set_key(&mut self, time: f64, value: f64) {
        let index = self.keys.partition_point(|key| key.time < time - KEY_TIME_EPSILON);
        match self.keys.get_mut(index) {
            Some(key) if (key.time - time).abs() <= KEY_TIME_EPSILON => key.value = value,
            _ => self.keys.insert(index, Keyframe { time, value }),
        }
    }

    /// Key times in ascending order.
    pub fn key_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.keys.iter().map(|key| key.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_interpolates_and_clamps() {
        let curve = AnimCurve::keyed(&[(10.0, 4.0), (0.0, 0.0)]);
        assert_eq!(curve.evaluate(-5.0), 0.0);
        assert_eq!(curve.evaluate(5.0), 2.0);
        assert_eq!(curve.evaluate(10.0), 4.0);
        assert_eq!(curve.evaluate(20.0), 4.0);
        assert_eq!(AnimCurve::constant(7.0).evaluate(3.0), 7.0);
    }

    #[test]
    fn test_set_key_replaces_same_time() {
        let mut curve = AnimCurve::keyed(&[(0.0, 1.0), (4.0, 2.0)]);
        curve.set_key(4.0, 9.0);
        curve.set_key(2.0, 5.0);
        assert_eq!(curve.key_times().collect::<Vec<_>>(), vec![0.0, 2.0, 4.0]);
        assert_eq!(curve.evaluate(4.0), 9.0);
        assert_eq!(curve.evaluate(1.0), 3.0);
    }
}
