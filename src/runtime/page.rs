use std::collections::HashSet;

use crate::{
    animation::{interp::Channel, spring::SpringConfig},
    effects::{
        ambient::AmbientMotion,
        parallax::{ParallaxLayer, ParallaxOpts},
        particle_layer::ParticleLayer,
        progress_bar::ScrollIndicator,
        reveal::{Reveal, RevealTrigger, RevealTween},
    },
    foundation::{
        core::{Theme, Viewport},
        error::{ScrollFxError, ScrollFxResult},
    },
    particles::field::FieldConfig,
    runtime::frame_loop::{Component, ComponentId, FrameLoop, HostFrame},
    scroll::progress::{Layout, RegionRect},
};

/// Named region of the page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionConfig {
    /// Region id referenced by layers.
    pub id: String,
    /// Document offset of the top edge.
    pub top: f64,
    /// Height in pixels.
    pub height: f64,
}

/// Parallax section bound to a region.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionConfig {
    /// Region id.
    pub region: String,
    /// Channel selection.
    #[serde(flatten)]
    pub opts: ParallaxOpts,
}

/// Entrance animation bound to a region, optionally repeated over a staggered group.
///
/// Without `tweens` the entrance is the default fade-and-rise.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RevealConfig {
    /// Region id.
    pub region: String,
    /// Element label, distinguishing several reveals in one region.
    #[serde(default)]
    pub element: Option<String>,
    /// Seconds between the trigger and the first element's tweens.
    #[serde(default)]
    pub delay_s: f64,
    /// Channel tweens; empty means fade-and-rise.
    #[serde(default)]
    pub tweens: Vec<RevealTween>,
    /// Number of elements in the group.
    #[serde(default = "one")]
    pub count: usize,
    /// Extra delay per element index.
    #[serde(default)]
    pub stagger_s: f64,
    /// What starts the entrance.
    #[serde(default)]
    pub trigger: RevealTrigger,
}

fn one() -> usize {
    1
}

impl RevealConfig {
    /// Fade-and-rise on `region`.
    pub fn fade_rise(region: &str, delay_s: f64) -> Self {
        Self {
            region: region.to_owned(),
            element: None,
            delay_s,
            tweens: Vec::new(),
            count: 1,
            stagger_s: 0.0,
            trigger: RevealTrigger::InView,
        }
    }

    /// Labelled element in `region` driven by `tweens`.
    pub fn element(region: &str, element: &str, tweens: Vec<RevealTween>) -> Self {
        Self {
            element: Some(element.to_owned()),
            tweens,
            ..Self::fade_rise(region, 0.0)
        }
    }

    /// Shift the whole group by `delay_s`.
    pub fn delayed(mut self, delay_s: f64) -> Self {
        self.delay_s = delay_s;
        self
    }

    /// Repeat over `count` elements, each `stagger_s` later than the previous.
    pub fn staggered(mut self, count: usize, stagger_s: f64) -> Self {
        self.count = count;
        self.stagger_s = stagger_s;
        self
    }

    /// Start on mount instead of on visibility.
    pub fn on_mount(mut self) -> Self {
        self.trigger = RevealTrigger::Mount;
        self
    }

    /// Component name of element `index`.
    pub fn component_name(&self, index: usize) -> String {
        let mut name = format!("reveal:{}", self.region);
        if let Some(element) = &self.element {
            name.push(':');
            name.push_str(element);
        }
        if self.count > 1 {
            name.push_str(&format!(":{index}"));
        }
        name
    }

    /// One component per element.
    pub fn build(&self) -> ScrollFxResult<Vec<Reveal>> {
        if self.count == 0 {
            return Err(ScrollFxError::validation(format!(
                "reveal '{}' count must be >= 1",
                self.component_name(0)
            )));
        }
        if !(self.stagger_s.is_finite() && self.delay_s.is_finite())
            || self.stagger_s < 0.0
            || self.delay_s < 0.0
        {
            return Err(ScrollFxError::validation(format!(
                "reveal '{}' delay and stagger must be >= 0",
                self.component_name(0)
            )));
        }
        (0..self.count)
            .map(|i| {
                let offset = self.delay_s + self.stagger_s * i as f64;
                let reveal = if self.tweens.is_empty() {
                    Reveal::new(self.region.clone(), offset)?
                } else {
                    Reveal::from_tweens(self.region.clone(), &self.tweens, offset)?
                };
                Ok(reveal
                    .named(self.component_name(i))
                    .with_trigger(self.trigger))
            })
            .collect()
    }
}

/// Looping blob behind a section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackdropStyle {
    /// Scale and opacity breathe together.
    #[default]
    Pulse,
    /// Scale swells while rotating a quarter turn and back.
    Spin,
}

/// Decorative backdrop bound to a region.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackdropConfig {
    /// Region id.
    pub region: String,
    /// Motion style.
    #[serde(default)]
    pub style: BackdropStyle,
    /// Largest scale factor of the cycle.
    pub scale_peak: f64,
    /// Cycle length in seconds.
    pub duration_s: f64,
}

impl BackdropConfig {
    fn build(&self) -> ScrollFxResult<AmbientMotion> {
        if !self.scale_peak.is_finite() {
            return Err(ScrollFxError::validation(format!(
                "backdrop '{}' scale_peak must be finite",
                self.region
            )));
        }
        match self.style {
            BackdropStyle::Pulse => {
                AmbientMotion::section_pulse(&self.region, self.scale_peak, self.duration_s)
            }
            BackdropStyle::Spin => {
                AmbientMotion::section_spin(&self.region, self.scale_peak, self.duration_s)
            }
        }
    }
}

/// Largest supported [`PageConfig::hero_orbs`].
pub const MAX_HERO_ORBS: usize = 2;

/// Declarative description of an animated page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Initial viewport.
    pub viewport: Viewport,
    /// Theme.
    pub theme: Theme,
    /// Regions in document order.
    pub regions: Vec<RegionConfig>,
    /// Region animated as the hero block.
    pub hero: Option<String>,
    /// Number of orbs behind the hero block, at most [`MAX_HERO_ORBS`].
    pub hero_orbs: usize,
    /// Parallax sections.
    pub sections: Vec<SectionConfig>,
    /// Looping blobs behind sections.
    pub backdrops: Vec<BackdropConfig>,
    /// Entrance animations.
    pub reveals: Vec<RevealConfig>,
    /// Show the page progress bar.
    pub progress_bar: bool,
    /// Particle backdrop; omitted when `None`.
    pub particles: Option<FieldConfig>,
    /// Number of floating background orbs.
    pub orbs: usize,
    /// Drift the background grid.
    pub grid: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        let region = |id: &str, top: f64, height: f64| RegionConfig {
            id: id.to_owned(),
            top,
            height,
        };
        let backdrop = |id: &str, style, scale_peak, duration_s| BackdropConfig {
            region: id.to_owned(),
            style,
            scale_peak,
            duration_s,
        };
        let section = |id: &str, distance: f64, rotate: bool| SectionConfig {
            region: id.to_owned(),
            opts: ParallaxOpts {
                distance,
                fade: true,
                scale: true,
                rotate,
            },
        };
        Self {
            viewport: Viewport::default(),
            theme: Theme::default(),
            regions: vec![
                region("hero", 0.0, 800.0),
                region("about", 800.0, 900.0),
                region("project", 1700.0, 1200.0),
                region("experience", 2900.0, 1000.0),
                region("contact", 3900.0, 600.0),
            ],
            hero: Some("hero".to_owned()),
            hero_orbs: MAX_HERO_ORBS,
            sections: vec![
                section("about", 120.0, false),
                section("project", 150.0, true),
                section("experience", 130.0, false),
            ],
            backdrops: vec![
                backdrop("about", BackdropStyle::Pulse, 1.2, 8.0),
                backdrop("project", BackdropStyle::Spin, 1.2, 20.0),
                backdrop("experience", BackdropStyle::Pulse, 1.3, 10.0),
            ],
            reveals: default_reveals(),
            progress_bar: true,
            particles: Some(FieldConfig::default()),
            orbs: 3,
            grid: true,
        }
    }
}

/// Entrances of the portfolio page: hero letters on load, section content on first sight.
fn default_reveals() -> Vec<RevealConfig> {
    use RevealTween as T;
    let el = RevealConfig::element;
    let fade_up = |rise: f64, duration_s: f64| {
        vec![
            T::tween(Channel::Opacity, 0.0, 1.0, duration_s),
            T::tween(Channel::Y, rise, 0.0, duration_s),
        ]
    };
    let header = |region: &str| {
        [
            el(
                region,
                "heading",
                vec![
                    T::tween(Channel::Opacity, 0.0, 1.0, 0.6),
                    T::tween(Channel::X, -50.0, 0.0, 0.6),
                ],
            ),
            el(region, "underline", vec![T::tween(Channel::ScaleX, 0.0, 1.0, 0.8)]).delayed(0.5),
            el(
                region,
                "subtitle",
                vec![T::new(Channel::Opacity, 0.0, 1.0)],
            )
            .delayed(0.3),
        ]
    };
    let pop_in = |from: f64| {
        vec![
            T::new(Channel::Opacity, 0.0, 1.0),
            T::spring(Channel::Scale, from, 1.0, SpringConfig::POP),
        ]
    };
    let letters = |part: &str, delay_s: f64| {
        el(
            "hero",
            part,
            vec![
                T::spring(Channel::Opacity, 0.0, 1.0, SpringConfig::LETTER),
                T::spring(Channel::Y, 20.0, 0.0, SpringConfig::LETTER),
            ],
        )
        .on_mount()
        .delayed(delay_s)
    };

    let mut out = vec![
        letters("first_name", 0.3).staggered(5, 0.03),
        letters("last_name", 0.5).staggered(8, 0.03),
        el("hero", "underline", vec![T::tween(Channel::ScaleX, 0.0, 1.0, 0.8)])
            .on_mount()
            .delayed(1.0),
    ];

    out.extend(header("about"));
    out.extend([
        el("about", "card", fade_up(60.0, 0.8)).delayed(0.2).staggered(2, 0.2),
        el("about", "timeline", vec![T::tween(Channel::Height, 0.0, 100.0, 1.0)]).delayed(0.5),
        el("about", "dot", vec![T::spring(Channel::Scale, 0.0, 1.0, SpringConfig::POP)])
            .delayed(1.0)
            .staggered(3, 0.1),
        el("about", "stat", pop_in(0.8)).delayed(1.1).staggered(3, 0.1),
        el("about", "divider", vec![T::tween(Channel::ScaleX, 0.0, 1.0, 1.0)]).delayed(1.5),
    ]);

    out.extend(header("project"));
    out.extend([
        el("project", "card", fade_up(60.0, 0.8)).staggered(2, 0.2),
        el(
            "project",
            "icon",
            vec![
                T::spring(Channel::Scale, 0.0, 1.0, SpringConfig::ICON),
                T::spring(Channel::Rotate, -180.0, 0.0, SpringConfig::ICON),
            ],
        )
        .delayed(0.5)
        .staggered(2, 0.2),
        el("project", "rule", vec![T::tween(Channel::ScaleX, 0.0, 1.0, 0.8)])
            .delayed(0.8)
            .staggered(2, 0.2),
    ]);

    out.extend(header("experience"));
    out.extend([
        el("experience", "card", fade_up(60.0, 0.8)),
        el("experience", "badge", vec![T::tween(Channel::Scale, 0.0, 1.0, 0.8)]).delayed(0.5),
        el("experience", "rule", vec![T::tween(Channel::ScaleX, 0.0, 1.0, 0.8)]).delayed(0.7),
        el("experience", "tech", pop_in(0.8)).delayed(1.5).staggered(3, 0.05),
        el("experience", "divider", vec![T::tween(Channel::ScaleX, 0.0, 1.0, 1.0)]).delayed(2.0),
    ]);

    out.push(RevealConfig::fade_rise("contact", 0.0));
    out
}

impl PageConfig {
    /// Parse a JSON page description.
    pub fn from_json_str(s: &str) -> ScrollFxResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that regions are well formed and every reference resolves.
    pub fn validate(&self) -> ScrollFxResult<()> {
        let mut ids = HashSet::new();
        for r in &self.regions {
            if r.id.is_empty() {
                return Err(ScrollFxError::validation("region id must be non-empty"));
            }
            if !ids.insert(r.id.as_str()) {
                return Err(ScrollFxError::validation(format!(
                    "duplicate region id '{}'",
                    r.id
                )));
            }
            if !(r.top.is_finite() && r.height.is_finite()) || r.height < 0.0 {
                return Err(ScrollFxError::validation(format!(
                    "region '{}' must have finite top and height >= 0",
                    r.id
                )));
            }
        }

        let known = |id: &str, what: &str| -> ScrollFxResult<()> {
            if ids.contains(id) {
                Ok(())
            } else {
                Err(ScrollFxError::validation(format!(
                    "{what} references unknown region '{id}'"
                )))
            }
        };
        if let Some(hero) = &self.hero {
            known(hero, "hero")?;
        }
        for s in &self.sections {
            known(&s.region, "section")?;
            if !s.opts.distance.is_finite() {
                return Err(ScrollFxError::validation(format!(
                    "section '{}' distance must be finite",
                    s.region
                )));
            }
        }
        if self.hero_orbs > MAX_HERO_ORBS {
            return Err(ScrollFxError::validation(format!(
                "hero_orbs must be <= {MAX_HERO_ORBS}"
            )));
        }
        let mut backdrops = HashSet::new();
        for b in &self.backdrops {
            known(&b.region, "backdrop")?;
            if !backdrops.insert(b.region.as_str()) {
                return Err(ScrollFxError::validation(format!(
                    "region '{}' has more than one backdrop",
                    b.region
                )));
            }
            b.build()?;
        }
        let mut names = HashSet::new();
        for r in &self.reveals {
            known(&r.region, "reveal")?;
            for reveal in r.build()? {
                let name = reveal.name().to_owned();
                if !names.insert(name.clone()) {
                    return Err(ScrollFxError::validation(format!(
                        "duplicate reveal '{name}'; give it an element label"
                    )));
                }
            }
        }
        if let Some(p) = &self.particles {
            p.validate()?;
        }
        Ok(())
    }

    /// Region geometry as a layout.
    pub fn layout(&self) -> Layout {
        let mut layout = Layout::new();
        for r in &self.regions {
            layout.insert(
                r.id.clone(),
                RegionRect {
                    top: r.top,
                    height: r.height,
                },
            );
        }
        layout
    }
}

/// Handles of every component a [`Page`] mounted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageHandles {
    /// Hero layer.
    pub hero: Option<ComponentId>,
    /// Hero orbs.
    pub hero_orbs: Vec<ComponentId>,
    /// Section layers with their region ids.
    pub sections: Vec<(String, ComponentId)>,
    /// Section backdrops with their region ids.
    pub backdrops: Vec<(String, ComponentId)>,
    /// Reveals with their component names.
    pub reveals: Vec<(String, ComponentId)>,
    /// Progress bar.
    pub progress_bar: Option<ComponentId>,
    /// Particle backdrop.
    pub particles: Option<ComponentId>,
    /// Floating orbs.
    pub orbs: Vec<ComponentId>,
    /// Background grid.
    pub grid: Option<ComponentId>,
}

impl PageHandles {
    /// Every handle in mount order.
    pub fn all(&self) -> Vec<ComponentId> {
        let mut out = Vec::new();
        out.extend(self.particles);
        out.extend(self.grid);
        out.extend(self.orbs.iter().copied());
        out.extend(self.hero);
        out.extend(self.hero_orbs.iter().copied());
        out.extend(self.backdrops.iter().map(|(_, id)| *id));
        out.extend(self.sections.iter().map(|(_, id)| *id));
        out.extend(self.reveals.iter().map(|(_, id)| *id));
        out.extend(self.progress_bar);
        out
    }

    /// Section layer for `region`.
    pub fn section(&self, region: &str) -> Option<ComponentId> {
        self.sections
            .iter()
            .find(|(r, _)| r == region)
            .map(|(_, id)| *id)
    }

    /// Reveal component named `name` (e.g. `"reveal:contact"`).
    pub fn reveal(&self, name: &str) -> Option<ComponentId> {
        self.reveals
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }
}

/// A mounted page: configuration plus the components it owns in a [`FrameLoop`].
#[derive(Debug)]
pub struct Page {
    config: PageConfig,
    layout: Layout,
    handles: PageHandles,
}

impl Page {
    /// Validate `config` and mount every component it describes.
    ///
    /// If any component fails to mount, the ones already mounted are removed again.
    pub fn mount(config: PageConfig, frame_loop: &mut FrameLoop) -> ScrollFxResult<Self> {
        config.validate()?;
        let mut handles = PageHandles::default();
        if let Err(e) = mount_all(&config, frame_loop, &mut handles) {
            for id in handles.all() {
                frame_loop.unmount(id);
            }
            return Err(e);
        }
        tracing::debug!(components = handles.all().len(), "page mounted");
        Ok(Self {
            layout: config.layout(),
            config,
            handles,
        })
    }

    /// Unmount every component this page owns.
    pub fn unmount(self, frame_loop: &mut FrameLoop) {
        for id in self.handles.all() {
            frame_loop.unmount(id);
        }
        tracing::debug!("page unmounted");
    }

    /// Configuration in use.
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Mounted component handles.
    pub fn handles(&self) -> &PageHandles {
        &self.handles
    }

    /// Region geometry.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Scrollable height: the lowest region edge, at least one viewport.
    pub fn document_height(&self) -> f64 {
        self.layout
            .content_height()
            .max(self.config.viewport.height)
    }

    /// Largest meaningful scroll offset.
    pub fn max_scroll(&self) -> f64 {
        (self.document_height() - self.config.viewport.height).max(0.0)
    }

    /// Host frame for this page at `time_s` and `scroll_y`.
    pub fn host_frame(&self, time_s: f64, scroll_y: f64) -> HostFrame {
        HostFrame {
            time_s,
            scroll_y,
            viewport: self.config.viewport,
            document_height: self.document_height(),
            theme: self.config.theme,
            layout: self.layout.clone(),
        }
    }
}

fn mount_all(
    config: &PageConfig,
    frame_loop: &mut FrameLoop,
    handles: &mut PageHandles,
) -> ScrollFxResult<()> {
    let vp = config.viewport;

    if let Some(fc) = &config.particles {
        let layer = ParticleLayer::new(fc.clone())?;
        handles.particles = Some(frame_loop.mount(Box::new(layer), vp)?);
    }
    if config.grid {
        handles.grid = Some(frame_loop.mount(Box::new(AmbientMotion::grid_drift()?), vp)?);
    }
    for i in 0..config.orbs {
        let id = frame_loop.mount(Box::new(AmbientMotion::floating_orb(i)?), vp)?;
        handles.orbs.push(id);
    }
    if let Some(hero) = &config.hero {
        let layer = ParallaxLayer::hero(hero.clone())?;
        handles.hero = Some(frame_loop.mount(Box::new(layer), vp)?);
        for i in 0..config.hero_orbs {
            let id = frame_loop.mount(Box::new(AmbientMotion::hero_orb(i)?), vp)?;
            handles.hero_orbs.push(id);
        }
    }
    for b in &config.backdrops {
        let id = frame_loop.mount(Box::new(b.build()?), vp)?;
        handles.backdrops.push((b.region.clone(), id));
    }
    for s in &config.sections {
        let layer = ParallaxLayer::section(s.region.clone(), s.opts)?;
        let id = frame_loop.mount(Box::new(layer), vp)?;
        handles.sections.push((s.region.clone(), id));
    }
    for r in &config.reveals {
        for reveal in r.build()? {
            let name = reveal.name().to_owned();
            let id = frame_loop.mount(Box::new(reveal), vp)?;
            handles.reveals.push((name, id));
        }
    }
    if config.progress_bar {
        let bar = ScrollIndicator::new(SpringConfig::PROGRESS_BAR)?;
        handles.progress_bar = Some(frame_loop.mount(Box::new(bar), vp)?);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/page.rs"]
mod tests;
