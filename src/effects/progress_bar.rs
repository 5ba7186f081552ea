use crate::{
    animation::{
        interp::{Channel, ChannelValues, InterpolationTable},
        spring::{Spring, SpringConfig},
    },
    foundation::{
        core::{Progress, Rgba8Premul},
        error::ScrollFxResult,
    },
    runtime::frame_loop::{Component, FrameCtx, FrameOutput, Listen},
    scroll::progress::{ScrollGeometry, ScrollSource},
};

/// Page-level reading progress bar.
///
/// `ScaleX` follows the page progress through a spring; `Percent` is the raw progress rounded
/// to a whole number so the label never lags.
#[derive(Clone, Debug)]
pub struct ScrollIndicator {
    source: ScrollSource,
    spring: Spring,
    primed: bool,
    raw: Progress,
    color: Option<InterpolationTable<Rgba8Premul>>,
}

impl ScrollIndicator {
    /// Indicator smoothed with `config`.
    pub fn new(config: SpringConfig) -> ScrollFxResult<Self> {
        config.validate()?;
        Ok(Self {
            source: ScrollSource::page(),
            spring: Spring::new(config, 0.0),
            primed: false,
            raw: Progress::ZERO,
            color: None,
        })
    }

    /// Tint the bar along the page.
    pub fn with_color(mut self, table: InterpolationTable<Rgba8Premul>) -> Self {
        self.color = Some(table);
        self
    }

    /// Raw page progress from the last sample.
    pub fn progress(&self) -> Progress {
        self.raw
    }

    /// Smoothed bar scale.
    pub fn scale_x(&self) -> f64 {
        self.spring.value()
    }

    /// Whole-number percentage.
    pub fn percent(&self) -> f64 {
        (self.raw.get() * 100.0).round()
    }
}

impl Component for ScrollIndicator {
    fn name(&self) -> &str {
        "progress_bar"
    }

    fn listens(&self) -> Listen {
        Listen::SCROLL
    }

    fn on_scroll(&mut self, _geometry: &ScrollGeometry) {
        self.source.mark_dirty();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        if let Some(p) = self.source.sample(&ctx.geometry, ctx.layout) {
            self.raw = p;
            if self.primed {
                self.spring.set_target(p.get());
            } else {
                self.spring.jump(p.get());
                self.primed = true;
            }
        }
        self.spring.advance(ctx.dt);
    }

    fn render(&self, _ctx: &FrameCtx<'_>) -> FrameOutput {
        let mut channels = ChannelValues::new();
        channels.set(Channel::ScaleX, self.scale_x());
        channels.set(Channel::Percent, self.percent());
        FrameOutput::Style {
            channels,
            color: self.color.as_ref().map(|t| t.sample_progress(self.raw)),
        }
    }

    fn deactivate(&mut self) {
        self.primed = false;
        self.source.mark_dirty();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/progress_bar.rs"]
mod tests;
