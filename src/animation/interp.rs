use smallvec::SmallVec;

use crate::{
    animation::ease::Ease,
    foundation::core::{Progress, Rgba8Premul, Vec2},
    foundation::error::{ScrollFxError, ScrollFxResult},
};

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Rgba8Premul {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// Piecewise-linear function over ordered `(input, output)` breakpoints.
///
/// Inputs outside the declared domain clamp to the nearest endpoint; there is no
/// extrapolation.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawTable<T>", bound(deserialize = "T: serde::Deserialize<'de>"))]
pub struct InterpolationTable<T> {
    inputs: Vec<f64>,
    outputs: Vec<T>,
    ease: Ease,
}

#[derive(serde::Deserialize)]
struct RawTable<T> {
    inputs: Vec<f64>,
    outputs: Vec<T>,
    #[serde(default)]
    ease: Ease,
}

impl<T> TryFrom<RawTable<T>> for InterpolationTable<T> {
    type Error = ScrollFxError;

    fn try_from(raw: RawTable<T>) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.inputs, raw.outputs)?.with_ease(raw.ease))
    }
}

impl<T> InterpolationTable<T> {
    /// Build a table, validating breakpoint invariants.
    pub fn new(inputs: Vec<f64>, outputs: Vec<T>) -> ScrollFxResult<Self> {
        if inputs.is_empty() {
            return Err(ScrollFxError::animation(
                "interpolation table needs at least one breakpoint",
            ));
        }
        if inputs.len() != outputs.len() {
            return Err(ScrollFxError::animation(format!(
                "interpolation table has {} inputs but {} outputs",
                inputs.len(),
                outputs.len()
            )));
        }
        if inputs.iter().any(|x| !x.is_finite()) {
            return Err(ScrollFxError::animation(
                "interpolation table inputs must be finite",
            ));
        }
        if !inputs.windows(2).all(|w| w[0] <= w[1]) {
            return Err(ScrollFxError::animation(
                "interpolation table inputs must be non-decreasing",
            ));
        }
        Ok(Self {
            inputs,
            outputs,
            ease: Ease::Linear,
        })
    }

    /// Apply `ease` to every segment.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Breakpoint inputs.
    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    /// Breakpoint outputs.
    pub fn outputs(&self) -> &[T] {
        &self.outputs
    }

    /// Map every output through `f`, keeping breakpoints and easing.
    pub fn map_outputs<U>(&self, f: impl Fn(&T) -> U) -> InterpolationTable<U> {
        InterpolationTable {
            inputs: self.inputs.clone(),
            outputs: self.outputs.iter().map(f).collect(),
            ease: self.ease,
        }
    }
}

impl<T> InterpolationTable<T>
where
    T: Lerp + Clone,
{
    /// Two-point table `[(0, a), (1, b)]`.
    pub fn linear(a: T, b: T) -> Self {
        Self {
            inputs: vec![0.0, 1.0],
            outputs: vec![a, b],
            ease: Ease::Linear,
        }
    }

    /// Evaluate the table at `x`.
    pub fn sample(&self, x: f64) -> T {
        let first = self.inputs[0];
        let last = self.inputs[self.inputs.len() - 1];
        if x.is_nan() || x <= first {
            return self.outputs[0].clone();
        }
        if x >= last {
            return self.outputs[self.outputs.len() - 1].clone();
        }

        let idx = self.inputs.partition_point(|&i| i <= x);
        let a = idx - 1;
        let b = idx;
        let denom = self.inputs[b] - self.inputs[a];
        if denom <= 0.0 {
            return self.outputs[b].clone();
        }

        let t = (x - self.inputs[a]) / denom;
        T::lerp(&self.outputs[a], &self.outputs[b], self.ease.apply(t))
    }

    /// Evaluate the table at a progress value.
    pub fn sample_progress(&self, p: Progress) -> T {
        self.sample(p.get())
    }
}

/// Visual property driven by an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Horizontal offset in pixels.
    X,
    /// Vertical offset in pixels.
    Y,
    /// Opacity in `[0, 1]`.
    Opacity,
    /// Uniform scale factor.
    Scale,
    /// Horizontal scale factor (progress bar).
    ScaleX,
    /// Rotation about the horizontal axis in degrees.
    RotateX,
    /// In-plane rotation in degrees.
    Rotate,
    /// Height as a percentage of the element's natural height.
    Height,
    /// Whole-number percentage for display.
    Percent,
    /// Background position offset in pixels.
    BackgroundOffset,
}

impl Channel {
    /// Value that leaves the element visually untouched.
    pub fn rest_value(self) -> f64 {
        match self {
            Self::Opacity | Self::Scale | Self::ScaleX => 1.0,
            Self::Height => 100.0,
            Self::X
            | Self::Y
            | Self::RotateX
            | Self::Rotate
            | Self::Percent
            | Self::BackgroundOffset => 0.0,
        }
    }
}

/// Unit interpretation for a mapped channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelUnit {
    /// Output is used as-is.
    #[default]
    Px,
    /// Output is a percentage of the observed region's height.
    RegionPercent,
}

/// Ordered `Channel -> value` pairs produced for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChannelValues(SmallVec<[(Channel, f64); 4]>);

impl ChannelValues {
    /// Empty set.
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    /// Insert or replace a value.
    pub fn set(&mut self, channel: Channel, value: f64) {
        match self.0.iter_mut().find(|(c, _)| *c == channel) {
            Some(slot) => slot.1 = value,
            None => self.0.push((channel, value)),
        }
    }

    /// Value for `channel`, if present.
    pub fn get(&self, channel: Channel) -> Option<f64> {
        self.0.iter().find(|(c, _)| *c == channel).map(|(_, v)| *v)
    }

    /// Iterate pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, f64)> + '_ {
        self.0.iter().copied()
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no channel is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl serde::Serialize for ChannelValues {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut m = s.serialize_map(Some(self.0.len()))?;
        for (c, v) in &self.0 {
            m.serialize_entry(c, v)?;
        }
        m.end()
    }
}

#[derive(Clone, Debug)]
struct MappedChannel {
    channel: Channel,
    table: InterpolationTable<f64>,
    unit: ChannelUnit,
}

/// Evaluates several channel tables from one progress value.
#[derive(Clone, Debug, Default)]
pub struct ChannelMapper {
    channels: SmallVec<[MappedChannel; 4]>,
}

impl ChannelMapper {
    /// Mapper with no channels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pixel-unit channel.
    pub fn with(self, channel: Channel, table: InterpolationTable<f64>) -> Self {
        self.with_unit(channel, table, ChannelUnit::Px)
    }

    /// Add a channel with an explicit unit.
    pub fn with_unit(
        mut self,
        channel: Channel,
        table: InterpolationTable<f64>,
        unit: ChannelUnit,
    ) -> Self {
        self.channels.retain(|c| c.channel != channel);
        self.channels.push(MappedChannel {
            channel,
            table,
            unit,
        });
        self
    }

    /// Channels in declaration order.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.channels.iter().map(|c| c.channel)
    }

    /// Evaluate every table. `region_height` resolves [`ChannelUnit::RegionPercent`].
    pub fn map(&self, p: Progress, region_height: f64) -> ChannelValues {
        let mut out = ChannelValues::new();
        for c in &self.channels {
            let v = c.table.sample_progress(p);
            let v = match c.unit {
                ChannelUnit::Px => v,
                ChannelUnit::RegionPercent => v * region_height.max(0.0) / 100.0,
            };
            out.set(c.channel, v);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interp.rs"]
mod tests;
