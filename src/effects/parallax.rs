use smallvec::SmallVec;

use crate::{
    animation::{
        interp::{Channel, ChannelMapper, ChannelUnit, ChannelValues, InterpolationTable},
        spring::{Spring, SpringConfig},
    },
    foundation::error::ScrollFxResult,
    runtime::frame_loop::{Component, FrameCtx, FrameOutput, Listen},
    scroll::progress::{ScrollGeometry, ScrollOffsets, ScrollSource, ScrollTarget},
};

/// Which channels a section layer animates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParallaxOpts {
    /// Vertical travel in pixels at either end of the range.
    pub distance: f64,
    /// Fade in on entry and partly out on exit.
    pub fade: bool,
    /// Shrink slightly near both ends.
    pub scale: bool,
    /// Tilt about the horizontal axis.
    pub rotate: bool,
}

impl Default for ParallaxOpts {
    fn default() -> Self {
        Self {
            distance: 100.0,
            fade: true,
            scale: false,
            rotate: false,
        }
    }
}

/// Scroll-linked layer: progress source, channel tables, optional springs.
#[derive(Clone, Debug)]
pub struct ParallaxLayer {
    name: String,
    source: ScrollSource,
    mapper: ChannelMapper,
    spring: Option<SpringConfig>,
    springs: SmallVec<[(Channel, Spring); 4]>,
    values: Option<ChannelValues>,
}

impl ParallaxLayer {
    /// Layer with a custom mapper. `spring` smooths every channel when set.
    pub fn new(
        name: impl Into<String>,
        source: ScrollSource,
        mapper: ChannelMapper,
        spring: Option<SpringConfig>,
    ) -> ScrollFxResult<Self> {
        if let Some(cfg) = &spring {
            cfg.validate()?;
        }
        Ok(Self {
            name: name.into(),
            source,
            mapper,
            spring,
            springs: SmallVec::new(),
            values: None,
        })
    }

    /// Content section that drifts, fades, scales and tilts as it crosses the viewport.
    pub fn section(region: impl Into<String>, opts: ParallaxOpts) -> ScrollFxResult<Self> {
        let region = region.into();
        let d = opts.distance;
        let mut mapper =
            ChannelMapper::new().with(Channel::Y, InterpolationTable::linear(-d, d));
        if opts.fade {
            mapper = mapper.with(
                Channel::Opacity,
                InterpolationTable::new(vec![0.0, 0.2, 0.8, 1.0], vec![0.3, 1.0, 1.0, 0.5])?,
            );
        }
        if opts.scale {
            mapper = mapper.with(
                Channel::Scale,
                InterpolationTable::new(vec![0.0, 0.2, 0.8, 1.0], vec![0.95, 1.0, 1.0, 0.95])?,
            );
        }
        if opts.rotate {
            mapper = mapper.with(
                Channel::RotateX,
                InterpolationTable::new(vec![0.0, 0.5, 1.0], vec![5.0, 0.0, -5.0])?,
            );
        }
        Self::new(
            format!("section:{region}"),
            ScrollSource::region(region, ScrollOffsets::ENTER_EXIT),
            mapper,
            Some(SpringConfig::SECTION),
        )
    }

    /// Hero block that slides down 30% of its height and fades out while scrolled away.
    pub fn hero(region: impl Into<String>) -> ScrollFxResult<Self> {
        let region = region.into();
        let mapper = ChannelMapper::new()
            .with_unit(
                Channel::Y,
                InterpolationTable::linear(0.0, 30.0),
                ChannelUnit::RegionPercent,
            )
            .with(
                Channel::Opacity,
                InterpolationTable::new(vec![0.0, 0.5], vec![1.0, 0.0])?,
            );
        Self::new(
            format!("hero:{region}"),
            ScrollSource::region(region, ScrollOffsets::TRACK_EXIT),
            mapper,
            None,
        )
    }

    /// Progress source.
    pub fn source(&self) -> &ScrollSource {
        &self.source
    }

    /// Values from the most recent update; `None` before the first progress sample.
    pub fn values(&self) -> Option<&ChannelValues> {
        self.values.as_ref()
    }

    /// True when every spring has settled (always true without springs).
    pub fn is_settled(&self) -> bool {
        self.springs.iter().all(|(_, s)| s.is_at_rest())
    }

    fn region_height(&self, ctx: &FrameCtx<'_>) -> f64 {
        match self.source.target() {
            ScrollTarget::Page => ctx.viewport.height,
            ScrollTarget::Region(id) => ctx.layout.get(id).map_or(0.0, |r| r.height),
        }
    }
}

impl Component for ParallaxLayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn listens(&self) -> Listen {
        Listen::SCROLL
    }

    fn on_scroll(&mut self, _geometry: &ScrollGeometry) {
        self.source.mark_dirty();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let was_dirty = self.source.is_dirty();
        let sampled = self.source.sample(&ctx.geometry, ctx.layout);
        let mapped = match sampled {
            Some(p) if was_dirty => Some(self.mapper.map(p, self.region_height(ctx))),
            _ => None,
        };

        let Some(cfg) = self.spring else {
            if let Some(m) = mapped {
                self.values = Some(m);
            }
            return;
        };

        if let Some(m) = mapped {
            let first = self.springs.is_empty();
            for (channel, v) in m.iter() {
                match self.springs.iter_mut().find(|(c, _)| *c == channel) {
                    Some((_, s)) if !first => s.set_target(v),
                    Some((_, s)) => s.jump(v),
                    None => self.springs.push((channel, Spring::new(cfg, v))),
                }
            }
        }
        if self.springs.is_empty() {
            return;
        }
        let mut out = ChannelValues::new();
        for (channel, s) in &mut self.springs {
            s.advance(ctx.dt);
            out.set(*channel, s.value());
        }
        self.values = Some(out);
    }

    fn render(&self, _ctx: &FrameCtx<'_>) -> FrameOutput {
        match &self.values {
            Some(v) => FrameOutput::style(v.clone()),
            None => FrameOutput::Empty,
        }
    }

    fn deactivate(&mut self) {
        self.springs.clear();
        self.values = None;
        self.source.mark_dirty();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/parallax.rs"]
mod tests;
