use smallvec::SmallVec;

use crate::{
    animation::{
        ease::Ease,
        interp::{Channel, ChannelValues},
        keyframes::{KeyframeTrack, tween},
        spring::{Spring, SpringConfig},
    },
    foundation::error::{ScrollFxError, ScrollFxResult},
    runtime::frame_loop::{Component, FrameCtx, FrameOutput, Listen},
    scroll::{in_view::InViewWatcher, progress::ScrollGeometry},
};

/// How one channel travels from its hidden to its shown value.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealMotion {
    /// Fixed-length eased tween.
    Tween {
        /// Length in seconds.
        duration_s: f64,
        /// Easing over the whole tween.
        #[serde(default)]
        ease: Ease,
    },
    /// Physics-driven approach; overshoot depends on the damping ratio.
    Spring(SpringConfig),
}

impl Default for RevealMotion {
    fn default() -> Self {
        Self::Tween {
            duration_s: 0.3,
            ease: Ease::OutQuad,
        }
    }
}

/// One channel of an entrance animation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealTween {
    /// Animated channel.
    pub channel: Channel,
    /// Value while hidden.
    pub from: f64,
    /// Value once shown.
    pub to: f64,
    /// Seconds between the trigger and the start of this channel.
    #[serde(default)]
    pub delay_s: f64,
    /// Tween or spring.
    #[serde(default)]
    pub motion: RevealMotion,
}

impl RevealTween {
    /// Channel with the default short ease-out tween.
    pub fn new(channel: Channel, from: f64, to: f64) -> Self {
        Self {
            channel,
            from,
            to,
            delay_s: 0.0,
            motion: RevealMotion::default(),
        }
    }

    /// Tween of `duration_s` seconds with linear easing.
    pub fn tween(channel: Channel, from: f64, to: f64, duration_s: f64) -> Self {
        Self {
            channel,
            from,
            to,
            delay_s: 0.0,
            motion: RevealMotion::Tween {
                duration_s,
                ease: Ease::Linear,
            },
        }
    }

    /// Spring-driven channel.
    pub fn spring(channel: Channel, from: f64, to: f64, config: SpringConfig) -> Self {
        Self {
            channel,
            from,
            to,
            delay_s: 0.0,
            motion: RevealMotion::Spring(config),
        }
    }

    /// Start `delay_s` seconds after the trigger.
    pub fn delayed(mut self, delay_s: f64) -> Self {
        self.delay_s = delay_s;
        self
    }

    /// Replace the tween easing; springs are unaffected.
    pub fn eased(mut self, ease: Ease) -> Self {
        if let RevealMotion::Tween { ease: e, .. } = &mut self.motion {
            *e = ease;
        }
        self
    }

    fn validate(&self) -> ScrollFxResult<()> {
        if !(self.from.is_finite() && self.to.is_finite()) {
            return Err(ScrollFxError::validation(format!(
                "reveal {:?} endpoints must be finite",
                self.channel
            )));
        }
        if !self.delay_s.is_finite() || self.delay_s < 0.0 {
            return Err(ScrollFxError::validation(format!(
                "reveal {:?} delay must be >= 0",
                self.channel
            )));
        }
        match self.motion {
            RevealMotion::Tween { duration_s, .. } => {
                if duration_s.is_finite() && duration_s > 0.0 {
                    Ok(())
                } else {
                    Err(ScrollFxError::validation(format!(
                        "reveal {:?} duration must be > 0",
                        self.channel
                    )))
                }
            }
            RevealMotion::Spring(cfg) => cfg.validate(),
        }
    }
}

/// What starts the entrance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealTrigger {
    /// The region scrolls into view.
    #[default]
    InView,
    /// The first frame after mounting.
    Mount,
}

#[derive(Clone, Debug)]
enum Driver {
    Track(KeyframeTrack<f64>),
    Spring(Spring),
}

#[derive(Clone, Debug)]
struct Lane {
    tween: RevealTween,
    driver: Driver,
}

impl Lane {
    fn new(params: RevealTween, offset_s: f64) -> ScrollFxResult<Self> {
        params.validate()?;
        let delay_s = params.delay_s + offset_s;
        let driver = match params.motion {
            RevealMotion::Tween { duration_s, ease } => Driver::Track(
                tween(params.from, params.to, duration_s)?
                    .with_delay(delay_s)
                    .with_ease(ease),
            ),
            RevealMotion::Spring(cfg) => Driver::Spring(Spring::new(cfg, params.from)),
        };
        Ok(Self {
            tween: RevealTween { delay_s, ..params },
            driver,
        })
    }

    fn sample(&mut self, elapsed_s: f64, dt: f64) -> f64 {
        match &mut self.driver {
            Driver::Track(track) => track.sample(elapsed_s),
            Driver::Spring(spring) => {
                if elapsed_s >= self.tween.delay_s {
                    spring.set_target(self.tween.to);
                    spring.advance(dt);
                }
                spring.value()
            }
        }
    }

    fn reset(&mut self) {
        if let Driver::Spring(spring) = &mut self.driver {
            spring.jump(self.tween.from);
        }
    }
}

/// Entrance animation played once when its trigger fires.
///
/// Every channel holds its `from` value until triggered, then runs its own tween or spring
/// after its delay. With an in-view trigger, visibility is re-checked only after a scroll
/// notification or while the region is absent from the layout.
#[derive(Clone, Debug)]
pub struct Reveal {
    name: String,
    region: String,
    trigger: RevealTrigger,
    watcher: InViewWatcher,
    lanes: SmallVec<[Lane; 4]>,
    pending_check: bool,
    started_at: Option<f64>,
    values: ChannelValues,
}

impl Reveal {
    /// Fade-and-rise tween length in seconds.
    pub const DURATION_S: f64 = 0.6;
    /// Fade-and-rise starting downward offset in pixels.
    pub const RISE_PX: f64 = 20.0;

    /// Fade-and-rise for `region`, starting `delay_s` after it comes into view.
    pub fn new(region: impl Into<String>, delay_s: f64) -> ScrollFxResult<Self> {
        let delay_s = if delay_s.is_finite() { delay_s.max(0.0) } else { 0.0 };
        Self::from_tweens(
            region,
            &[
                RevealTween::tween(Channel::Opacity, 0.0, 1.0, Self::DURATION_S),
                RevealTween::tween(Channel::Y, Self::RISE_PX, 0.0, Self::DURATION_S),
            ],
            delay_s,
        )
    }

    /// Entrance for `region` built from `tweens`, all shifted by `offset_s` seconds.
    pub fn from_tweens(
        region: impl Into<String>,
        tweens: &[RevealTween],
        offset_s: f64,
    ) -> ScrollFxResult<Self> {
        if tweens.is_empty() {
            return Err(ScrollFxError::validation("reveal needs at least one tween"));
        }
        if !offset_s.is_finite() || offset_s < 0.0 {
            return Err(ScrollFxError::validation("reveal offset must be >= 0"));
        }
        let lanes = tweens
            .iter()
            .map(|t| Lane::new(*t, offset_s))
            .collect::<ScrollFxResult<SmallVec<_>>>()?;
        let region = region.into();
        let mut out = Self {
            name: format!("reveal:{region}"),
            region,
            trigger: RevealTrigger::InView,
            watcher: InViewWatcher::default(),
            lanes,
            pending_check: true,
            started_at: None,
            values: ChannelValues::new(),
        };
        out.values = out.hidden();
        Ok(out)
    }

    /// Rename the component; used to tell apart several reveals in one region.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the visibility trigger settings.
    pub fn with_watcher(mut self, watcher: InViewWatcher) -> Self {
        self.watcher = watcher;
        self
    }

    /// Choose what starts the entrance.
    pub fn with_trigger(mut self, trigger: RevealTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    /// Region this reveal watches.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Whether the entrance has been triggered.
    pub fn is_triggered(&self) -> bool {
        self.started_at.is_some()
    }

    /// Values from the most recent update.
    pub fn values(&self) -> &ChannelValues {
        &self.values
    }

    fn hidden(&self) -> ChannelValues {
        let mut v = ChannelValues::new();
        for lane in &self.lanes {
            v.set(lane.tween.channel, lane.tween.from);
        }
        v
    }

    fn check_trigger(&mut self, ctx: &FrameCtx<'_>) -> bool {
        match self.trigger {
            RevealTrigger::Mount => true,
            RevealTrigger::InView => {
                if !self.pending_check {
                    return false;
                }
                let Some(rect) = ctx.layout.get(&self.region) else {
                    tracing::trace!(region = %self.region, "reveal region absent; retrying");
                    return false;
                };
                self.pending_check = false;
                self.watcher.update(&ctx.geometry, Some(rect))
            }
        }
    }
}

impl Component for Reveal {
    fn name(&self) -> &str {
        &self.name
    }

    fn listens(&self) -> Listen {
        match self.trigger {
            RevealTrigger::InView => Listen::SCROLL,
            RevealTrigger::Mount => Listen::default(),
        }
    }

    fn on_scroll(&mut self, _geometry: &ScrollGeometry) {
        self.pending_check = true;
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        if self.started_at.is_none() && self.check_trigger(ctx) {
            tracing::debug!(name = %self.name, "reveal triggered");
            self.started_at = Some(ctx.time_s);
        }
        let Some(start) = self.started_at else {
            return;
        };
        let elapsed = ctx.time_s - start;
        for lane in &mut self.lanes {
            let v = lane.sample(elapsed, ctx.dt);
            self.values.set(lane.tween.channel, v);
        }
    }

    fn render(&self, _ctx: &FrameCtx<'_>) -> FrameOutput {
        FrameOutput::style(self.values.clone())
    }

    fn deactivate(&mut self) {
        self.started_at = None;
        self.pending_check = true;
        self.watcher.reset();
        for lane in &mut self.lanes {
            lane.reset();
        }
        self.values = self.hidden();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/reveal.rs"]
mod tests;
