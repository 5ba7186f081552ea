use smallvec::SmallVec;

use crate::{
    animation::{
        ease::Ease,
        interp::{Channel, ChannelValues},
        keyframes::{KeyframeTrack, Repeat},
    },
    foundation::error::{ScrollFxError, ScrollFxResult},
    runtime::frame_loop::{Component, FrameCtx, FrameOutput},
};

/// Looping decorative motion driven by time since the first frame after activation.
#[derive(Clone, Debug)]
pub struct AmbientMotion {
    name: String,
    tracks: SmallVec<[(Channel, KeyframeTrack<f64>); 4]>,
    started_at: Option<f64>,
    values: ChannelValues,
}

impl AmbientMotion {
    /// Motion with no tracks.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: SmallVec::new(),
            started_at: None,
            values: ChannelValues::new(),
        }
    }

    /// Add or replace the track for `channel`.
    pub fn with_track(mut self, channel: Channel, track: KeyframeTrack<f64>) -> Self {
        self.tracks.retain(|(c, _)| *c != channel);
        self.tracks.push((channel, track));
        self
    }

    /// Background orb `index`: slow drift, staggered by index.
    pub fn floating_orb(index: usize) -> ScrollFxResult<Self> {
        let i = index as f64;
        let duration = 15.0 + 5.0 * i;
        let delay = 3.0 * i;
        let track = |values: Vec<f64>| -> ScrollFxResult<KeyframeTrack<f64>> {
            Ok(KeyframeTrack::new(values, duration)?
                .with_delay(delay)
                .with_ease(Ease::InOutSine)
                .with_repeat(Repeat::Loop))
        };
        Ok(Self::new(format!("orb:{index}"))
            .with_track(Channel::X, track(vec![0.0, 100.0, 0.0])?)
            .with_track(Channel::Y, track(vec![0.0, -100.0, 0.0])?)
            .with_track(Channel::Scale, track(vec![1.0, 1.2, 1.0])?))
    }

    /// One of the two orbs behind the hero block.
    pub fn hero_orb(index: usize) -> ScrollFxResult<Self> {
        let (x, y, scale, duration) = match index {
            0 => ([0.0, 30.0, 0.0], [0.0, -20.0, 0.0], [1.0, 1.1, 1.0], 10.0),
            1 => ([0.0, -30.0, 0.0], [0.0, 20.0, 0.0], [1.0, 1.15, 1.0], 12.0),
            _ => {
                return Err(ScrollFxError::validation(format!(
                    "hero orb index {index} out of range (0..=1)"
                )));
            }
        };
        let track = |values: [f64; 3]| -> ScrollFxResult<KeyframeTrack<f64>> {
            Ok(KeyframeTrack::new(values.to_vec(), duration)?
                .with_ease(Ease::InOutSine)
                .with_repeat(Repeat::Loop))
        };
        Ok(Self::new(format!("hero_orb:{index}"))
            .with_track(Channel::X, track(x)?)
            .with_track(Channel::Y, track(y)?)
            .with_track(Channel::Scale, track(scale)?))
    }

    /// Blurred blob behind a section breathing in scale and opacity.
    pub fn section_pulse(region: &str, scale_peak: f64, duration_s: f64) -> ScrollFxResult<Self> {
        let track = |values: [f64; 3]| -> ScrollFxResult<KeyframeTrack<f64>> {
            Ok(KeyframeTrack::new(values.to_vec(), duration_s)?
                .with_ease(Ease::InOutSine)
                .with_repeat(Repeat::Loop))
        };
        Ok(Self::new(format!("backdrop:{region}"))
            .with_track(Channel::Scale, track([1.0, scale_peak, 1.0])?)
            .with_track(Channel::Opacity, track([0.3, 0.5, 0.3])?))
    }

    /// Blurred blob behind a section swelling while turning a quarter and back.
    pub fn section_spin(region: &str, scale_peak: f64, duration_s: f64) -> ScrollFxResult<Self> {
        let track = |values: [f64; 3]| -> ScrollFxResult<KeyframeTrack<f64>> {
            Ok(KeyframeTrack::new(values.to_vec(), duration_s)?.with_repeat(Repeat::Loop))
        };
        Ok(Self::new(format!("backdrop:{region}"))
            .with_track(Channel::Scale, track([1.0, scale_peak, 1.0])?)
            .with_track(Channel::Rotate, track([0.0, 90.0, 0.0])?))
    }

    /// Background grid sliding one cell (60 px) every 20 s.
    pub fn grid_drift() -> ScrollFxResult<Self> {
        let track = KeyframeTrack::new(vec![0.0, 60.0], 20.0)?.with_repeat(Repeat::Loop);
        Ok(Self::new("grid").with_track(Channel::BackgroundOffset, track))
    }

    /// Values from the most recent update.
    pub fn values(&self) -> &ChannelValues {
        &self.values
    }
}

impl Component for AmbientMotion {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let start = *self.started_at.get_or_insert(ctx.time_s);
        let elapsed = ctx.time_s - start;
        for (channel, track) in &self.tracks {
            self.values.set(*channel, track.sample(elapsed));
        }
    }

    fn render(&self, _ctx: &FrameCtx<'_>) -> FrameOutput {
        if self.values.is_empty() {
            return FrameOutput::Empty;
        }
        FrameOutput::style(self.values.clone())
    }

    fn deactivate(&mut self) {
        self.started_at = None;
        self.values = ChannelValues::new();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ambient.rs"]
mod tests;
