use crate::{
    animation::ease::Ease,
    animation::interp::{InterpolationTable, Lerp},
    foundation::error::{ScrollFxError, ScrollFxResult},
};

/// What a track does once its duration has elapsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// Play once and hold the last value.
    #[default]
    Once,
    /// Restart from the first value.
    Loop,
    /// Play forward, then backward, and so on.
    Mirror,
}

/// Time-driven keyframe animation.
///
/// Values sit at normalized times in `[0, 1]` over `duration_s`; the ease applies to each
/// segment between adjacent keyframes.
#[derive(Clone, Debug)]
pub struct KeyframeTrack<T> {
    table: InterpolationTable<T>,
    duration_s: f64,
    delay_s: f64,
    repeat: Repeat,
}

impl<T> KeyframeTrack<T>
where
    T: Lerp + Clone,
{
    /// Evenly spaced keyframes over `duration_s` seconds.
    pub fn new(values: Vec<T>, duration_s: f64) -> ScrollFxResult<Self> {
        if values.is_empty() {
            return Err(ScrollFxError::animation("keyframe track needs at least one value"));
        }
        let n = values.len();
        let times = if n == 1 {
            vec![0.0]
        } else {
            (0..n).map(|i| i as f64 / (n - 1) as f64).collect()
        };
        Self::with_times(values, times, duration_s)
    }

    /// Keyframes at explicit normalized times.
    pub fn with_times(values: Vec<T>, times: Vec<f64>, duration_s: f64) -> ScrollFxResult<Self> {
        if !duration_s.is_finite() || duration_s <= 0.0 {
            return Err(ScrollFxError::animation(
                "keyframe track duration must be > 0",
            ));
        }
        if times.iter().any(|t| !(0.0..=1.0).contains(t)) {
            return Err(ScrollFxError::animation(
                "keyframe times must lie in [0, 1]",
            ));
        }
        Ok(Self {
            table: InterpolationTable::new(times, values)?,
            duration_s,
            delay_s: 0.0,
            repeat: Repeat::Once,
        })
    }

    /// Start after `delay_s` seconds; negative delays clamp to zero.
    pub fn with_delay(mut self, delay_s: f64) -> Self {
        self.delay_s = if delay_s.is_finite() { delay_s.max(0.0) } else { 0.0 };
        self
    }

    /// Segment easing.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.table = self.table.with_ease(ease);
        self
    }

    /// Repeat policy.
    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Duration of one pass in seconds.
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// True once a non-repeating track has reached its last keyframe.
    pub fn is_finished(&self, elapsed_s: f64) -> bool {
        self.repeat == Repeat::Once && elapsed_s - self.delay_s >= self.duration_s
    }

    /// Value after `elapsed_s` seconds.
    pub fn sample(&self, elapsed_s: f64) -> T {
        let elapsed_s = if elapsed_s.is_finite() { elapsed_s } else { 0.0 };
        let t = elapsed_s - self.delay_s;
        if t <= 0.0 {
            return self.table.sample(0.0);
        }
        let cycles = t / self.duration_s;
        let u = match self.repeat {
            Repeat::Once => cycles.min(1.0),
            Repeat::Loop => cycles.fract(),
            Repeat::Mirror => {
                let phase = cycles % 2.0;
                if phase <= 1.0 { phase } else { 2.0 - phase }
            }
        };
        self.table.sample(u)
    }
}

/// Two-value tween from `from` to `to`.
pub fn tween<T>(from: T, to: T, duration_s: f64) -> ScrollFxResult<KeyframeTrack<T>>
where
    T: Lerp + Clone,
{
    KeyframeTrack::new(vec![from, to], duration_s)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframes.rs"]
mod tests;
