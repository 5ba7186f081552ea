use crate::{
    animation::interp::ChannelValues,
    foundation::{
        core::{Rgba8Premul, Theme, Viewport},
        error::ScrollFxResult,
    },
    particles::scene::FieldScene,
    scroll::progress::{Layout, ScrollGeometry},
};

/// Frame interval assumed when there is no previous frame to measure against.
pub const FIRST_FRAME_DT: f64 = 1.0 / 60.0;

/// Upper bound on the interval fed to springs and simulations after a stall.
pub const MAX_FRAME_DT: f64 = 0.1;

/// Event sources a component subscribes to while mounted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Listen {
    /// Receive coalesced scroll notifications.
    pub scroll: bool,
    /// Receive viewport resize notifications.
    pub resize: bool,
}

impl Listen {
    /// Scroll notifications only.
    pub const SCROLL: Self = Self {
        scroll: true,
        resize: false,
    };
    /// Resize notifications only.
    pub const RESIZE: Self = Self {
        scroll: false,
        resize: true,
    };
}

/// Listener registry selector for introspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerKind {
    /// Scroll listeners.
    Scroll,
    /// Resize listeners.
    Resize,
}

/// What the host delivers once per display refresh.
#[derive(Clone, Debug)]
pub struct HostFrame {
    /// Monotonic timestamp in seconds.
    pub time_s: f64,
    /// Current scroll offset.
    pub scroll_y: f64,
    /// Current viewport.
    pub viewport: Viewport,
    /// Total scrollable content height.
    pub document_height: f64,
    /// Active theme.
    pub theme: Theme,
    /// Region geometry.
    pub layout: Layout,
}

impl HostFrame {
    /// Scroll geometry derived from this frame.
    pub fn geometry(&self) -> ScrollGeometry {
        ScrollGeometry {
            scroll_y: self.scroll_y,
            viewport_height: self.viewport.height,
            document_height: self.document_height,
        }
    }
}

/// Per-frame context handed to components.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx<'a> {
    /// Index of this frame, starting at 0.
    pub frame: u64,
    /// Host timestamp in seconds.
    pub time_s: f64,
    /// Clamped interval since the previous frame.
    pub dt: f64,
    /// Scroll geometry for this frame.
    pub geometry: ScrollGeometry,
    /// Current viewport.
    pub viewport: Viewport,
    /// Active theme.
    pub theme: Theme,
    /// Region geometry.
    pub layout: &'a Layout,
}

/// Visual output of one component for one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum FrameOutput {
    /// Style values for a DOM-like element.
    Style {
        /// Channel values.
        channels: ChannelValues,
        /// Optional fill color.
        color: Option<Rgba8Premul>,
    },
    /// Particle field draw list.
    Field(FieldScene),
    /// Nothing to show yet.
    Empty,
}

impl FrameOutput {
    /// Style output without a color.
    pub fn style(channels: ChannelValues) -> Self {
        Self::Style {
            channels,
            color: None,
        }
    }

    /// Channel values when this is a style output.
    pub fn channels(&self) -> Option<&ChannelValues> {
        match self {
            Self::Style { channels, .. } => Some(channels),
            _ => None,
        }
    }
}

/// Animated element with an explicit lifecycle.
///
/// `activate` runs on mount and `deactivate` after the component has been removed from every
/// registry, so no callback reaches a deactivated component.
pub trait Component {
    /// Short name used in logs and traces.
    fn name(&self) -> &str;

    /// Event sources to subscribe to.
    fn listens(&self) -> Listen {
        Listen::default()
    }

    /// Acquire resources for `viewport`.
    fn activate(&mut self, _viewport: Viewport) -> ScrollFxResult<()> {
        Ok(())
    }

    /// Scroll position or layout changed since the last frame.
    fn on_scroll(&mut self, _geometry: &ScrollGeometry) {}

    /// Viewport changed.
    fn on_resize(&mut self, _viewport: Viewport) {}

    /// Advance state for this frame.
    fn update(&mut self, ctx: &FrameCtx<'_>);

    /// Produce output from the state computed by `update`.
    fn render(&self, ctx: &FrameCtx<'_>) -> FrameOutput;

    /// Release resources.
    fn deactivate(&mut self) {}
}

/// Handle returned by [`FrameLoop::mount`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u64);

impl ComponentId {
    /// Raw id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Output of one mounted component.
#[derive(Clone, Debug)]
pub struct ComponentFrame {
    /// Component handle.
    pub id: ComponentId,
    /// Component name.
    pub name: String,
    /// Rendered output.
    pub output: FrameOutput,
}

/// Everything produced by one [`FrameLoop::advance`].
#[derive(Clone, Debug)]
pub struct FrameReport {
    /// Frame index.
    pub frame: u64,
    /// Interval used for this frame.
    pub dt: f64,
    /// Whether scroll listeners were notified.
    pub scrolled: bool,
    /// Whether resize listeners were notified.
    pub resized: bool,
    /// Outputs in mount order.
    pub outputs: Vec<ComponentFrame>,
}

impl FrameReport {
    /// Output of `id`, if it is mounted.
    pub fn output(&self, id: ComponentId) -> Option<&FrameOutput> {
        self.outputs.iter().find(|o| o.id == id).map(|o| &o.output)
    }
}

struct Slot {
    id: ComponentId,
    component: Box<dyn Component>,
    viewport: Viewport,
}

/// Drives mounted components once per host frame on a single thread.
#[derive(Default)]
pub struct FrameLoop {
    next_id: u64,
    slots: Vec<Slot>,
    scroll_listeners: Vec<ComponentId>,
    resize_listeners: Vec<ComponentId>,
    last_time: Option<f64>,
    last_geometry: Option<ScrollGeometry>,
    last_layout: Option<Layout>,
    layout_dirty: bool,
    frames: u64,
}

impl FrameLoop {
    /// Empty loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate `component` and register its frame callback and listeners.
    ///
    /// On activation failure nothing is registered.
    pub fn mount(
        &mut self,
        mut component: Box<dyn Component>,
        viewport: Viewport,
    ) -> ScrollFxResult<ComponentId> {
        component.activate(viewport)?;
        let id = ComponentId(self.next_id);
        self.next_id += 1;

        let listens = component.listens();
        if listens.scroll {
            self.scroll_listeners.push(id);
        }
        if listens.resize {
            self.resize_listeners.push(id);
        }
        tracing::debug!(
            id = id.0,
            name = component.name(),
            scroll = listens.scroll,
            resize = listens.resize,
            "component mounted"
        );
        self.slots.push(Slot {
            id,
            component,
            viewport,
        });
        Ok(id)
    }

    /// Remove `id` from every registry, then deactivate it.
    ///
    /// Returns `false` when `id` is not mounted.
    pub fn unmount(&mut self, id: ComponentId) -> bool {
        let Some(i) = self.slots.iter().position(|s| s.id == id) else {
            return false;
        };
        self.scroll_listeners.retain(|l| *l != id);
        self.resize_listeners.retain(|l| *l != id);
        let mut slot = self.slots.remove(i);
        slot.component.deactivate();
        tracing::debug!(id = id.0, name = slot.component.name(), "component unmounted");
        true
    }

    /// Whether `id` is mounted.
    pub fn is_mounted(&self, id: ComponentId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    /// Force a scroll notification next frame even if neither geometry nor layout differ.
    pub fn invalidate_layout(&mut self) {
        self.layout_dirty = true;
    }

    /// Number of mounted components.
    pub fn active_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of registered listeners of `kind`.
    pub fn listener_count(&self, kind: ListenerKind) -> usize {
        match kind {
            ListenerKind::Scroll => self.scroll_listeners.len(),
            ListenerKind::Resize => self.resize_listeners.len(),
        }
    }

    /// Frames advanced so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame: resize, then scroll, then update, then render.
    #[tracing::instrument(skip_all, fields(frame = self.frames))]
    pub fn advance(&mut self, host: &HostFrame) -> FrameReport {
        let dt = self.frame_dt(host.time_s);
        let geometry = host.geometry();

        let mut resized = false;
        for id in &self.resize_listeners {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.id == *id)
                && slot.viewport != host.viewport
            {
                slot.viewport = host.viewport;
                slot.component.on_resize(host.viewport);
                resized = true;
            }
        }
        if resized {
            tracing::debug!(
                width = host.viewport.width,
                height = host.viewport.height,
                "viewport resized"
            );
        }

        let relaid = self.last_layout.as_ref() != Some(&host.layout);
        let scrolled = self.layout_dirty || relaid || self.last_geometry != Some(geometry);
        if scrolled {
            for id in &self.scroll_listeners {
                if let Some(slot) = self.slots.iter_mut().find(|s| s.id == *id) {
                    slot.component.on_scroll(&geometry);
                }
            }
            self.layout_dirty = false;
            self.last_geometry = Some(geometry);
            if relaid {
                self.last_layout = Some(host.layout.clone());
            }
        }

        let ctx = FrameCtx {
            frame: self.frames,
            time_s: host.time_s,
            dt,
            geometry,
            viewport: host.viewport,
            theme: host.theme,
            layout: &host.layout,
        };
        for slot in &mut self.slots {
            slot.component.update(&ctx);
        }
        let outputs = self
            .slots
            .iter()
            .map(|slot| ComponentFrame {
                id: slot.id,
                name: slot.component.name().to_owned(),
                output: slot.component.render(&ctx),
            })
            .collect();

        tracing::trace!(dt, scrolled, resized, active = self.slots.len(), "frame advanced");
        self.frames += 1;
        FrameReport {
            frame: ctx.frame,
            dt,
            scrolled,
            resized,
            outputs,
        }
    }

    fn frame_dt(&mut self, time_s: f64) -> f64 {
        let dt = match self.last_time {
            None => FIRST_FRAME_DT,
            Some(prev) if time_s.is_finite() => (time_s - prev).clamp(0.0, MAX_FRAME_DT),
            Some(_) => 0.0,
        };
        if time_s.is_finite() {
            self.last_time = Some(time_s);
        }
        dt
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/frame_loop.rs"]
mod tests;
