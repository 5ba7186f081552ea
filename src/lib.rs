//! scrollfx is a scroll-driven animation engine.
//!
//! It turns scroll position and elapsed time into per-frame visual properties:
//!
//! - Sample a [`ScrollSource`] into a normalized [`Progress`]
//! - Map progress through [`InterpolationTable`]s into [`ChannelValues`]
//! - Smooth channels with damped [`Spring`]s
//! - Simulate a bouncing [`ParticleField`] and rasterize it with [`CpuRenderer`]
//!
//! Components implementing [`Component`] are driven by a single-threaded [`FrameLoop`]; a
//! [`Page`] mounts a whole configured page at once.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod effects;
pub(crate) mod particles;
pub(crate) mod render;
pub(crate) mod runtime;
pub(crate) mod scroll;

pub use crate::foundation::core::{Point, Progress, Rect, Rgba8Premul, Theme, Vec2, Viewport};
pub use crate::foundation::error::{ScrollFxError, ScrollFxResult};
pub use crate::foundation::rng::Rng64;

pub use crate::animation::ease::Ease;
pub use crate::animation::interp::{
    Channel, ChannelMapper, ChannelUnit, ChannelValues, InterpolationTable, Lerp,
};
pub use crate::animation::keyframes::{KeyframeTrack, Repeat, tween};
pub use crate::animation::spring::{MIN_DAMPING_RATIO, Spring, SpringConfig};

pub use crate::scroll::in_view::InViewWatcher;
pub use crate::scroll::progress::{
    Edge, Intersection, Layout, RegionRect, ScrollGeometry, ScrollOffsets, ScrollSource,
    ScrollTarget, page_progress, region_progress,
};

pub use crate::particles::field::{
    FieldConfig, Link, MAX_PARTICLES, Particle, ParticleField, link_strength,
};
pub use crate::particles::scene::{Disc, FieldScene, Line, Palette};

pub use crate::render::backend::{FrameRGBA, write_png};
pub use crate::render::cpu::{CpuRenderer, CpuRendererOpts};

pub use crate::effects::ambient::AmbientMotion;
pub use crate::effects::parallax::{ParallaxLayer, ParallaxOpts};
pub use crate::effects::particle_layer::ParticleLayer;
pub use crate::effects::progress_bar::ScrollIndicator;
pub use crate::effects::reveal::{Reveal, RevealMotion, RevealTrigger, RevealTween};

pub use crate::runtime::frame_loop::{
    Component, ComponentFrame, ComponentId, FIRST_FRAME_DT, FrameCtx, FrameLoop, FrameOutput,
    FrameReport, HostFrame, Listen, ListenerKind, MAX_FRAME_DT,
};
pub use crate::runtime::page::{
    BackdropConfig, BackdropStyle, MAX_HERO_ORBS, Page, PageConfig, PageHandles, RegionConfig,
    RevealConfig, SectionConfig,
};
