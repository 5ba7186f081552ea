use crate::{
    foundation::{
        core::Point,
        error::{ScrollFxError, ScrollFxResult},
    },
    particles::scene::{Disc, FieldScene, Line},
    render::backend::FrameRGBA,
};

/// Rasterizer options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuRendererOpts {
    /// Straight-alpha color painted under the scene; transparent when unset.
    pub clear_rgba: Option<[u8; 4]>,
}

impl CpuRendererOpts {
    /// Return options with a configured clear color.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }
}

/// CPU rasterizer for particle scenes, powered by `vello_cpu`.
///
/// The render context is kept between frames and only reallocated when the surface size changes.
pub struct CpuRenderer {
    opts: CpuRendererOpts,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuRenderer {
    /// Create a renderer.
    pub fn new(opts: CpuRendererOpts) -> Self {
        Self { opts, ctx: None }
    }

    /// Options in use.
    pub fn opts(&self) -> CpuRendererOpts {
        self.opts
    }

    /// Rasterize `scene` into a frame the size of the scene surface.
    ///
    /// A surface with no area yields [`FrameRGBA::empty`].
    #[tracing::instrument(skip_all, fields(lines = scene.lines.len(), discs = scene.discs.len()))]
    pub fn render_scene(&mut self, scene: &FieldScene) -> ScrollFxResult<FrameRGBA> {
        if !(scene.width > 0.0 && scene.height > 0.0) {
            return Ok(FrameRGBA::empty());
        }
        let w = surface_side(scene.width, "width")?;
        let h = surface_side(scene.height, "height")?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        if let Some([r, g, b, a]) = self.opts.clear_rgba {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
        }
        for line in &scene.lines {
            draw_line(&mut ctx, line);
        }
        for disc in &scene.discs {
            draw_disc(&mut ctx, disc);
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        let frame = FrameRGBA {
            width: u32::from(w),
            height: u32::from(h),
            data: pixmap.data_as_u8_slice().to_vec(),
        };
        self.ctx = Some(ctx);
        tracing::trace!(width = frame.width, height = frame.height, "scene rasterized");
        Ok(frame)
    }
}

impl Default for CpuRenderer {
    fn default() -> Self {
        Self::new(CpuRendererOpts::default())
    }
}

fn surface_side(v: f64, what: &str) -> ScrollFxResult<u16> {
    let px = v.ceil();
    if !px.is_finite() || px > f64::from(u16::MAX) {
        return Err(ScrollFxError::render(format!(
            "surface {what} {v} exceeds {}",
            u16::MAX
        )));
    }
    Ok(px as u16)
}

fn cpu_point(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn set_color(ctx: &mut vello_cpu::RenderContext, [r, g, b, a]: [u8; 4]) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
}

fn draw_disc(ctx: &mut vello_cpu::RenderContext, disc: &Disc) {
    if disc.color[3] == 0 || !(disc.radius > 0.0) {
        return;
    }
    use vello_cpu::kurbo::Shape;

    let circle = vello_cpu::kurbo::Circle::new(cpu_point(disc.center), disc.radius);
    let mut path = vello_cpu::kurbo::BezPath::new();
    for el in circle.path_elements(0.1) {
        path.push(el);
    }
    set_color(ctx, disc.color);
    ctx.fill_path(&path);
}

/// Lines are filled as thin quads so hairlines below one pixel still get coverage.
fn draw_line(ctx: &mut vello_cpu::RenderContext, line: &Line) {
    if line.color[3] == 0 || !(line.width > 0.0) {
        return;
    }
    let d = line.to - line.from;
    let len = d.hypot();
    if !(len > 0.0) {
        return;
    }
    let n = kurbo::Vec2::new(-d.y, d.x) * (line.width / 2.0 / len);

    let mut path = vello_cpu::kurbo::BezPath::new();
    path.move_to(cpu_point(line.from + n));
    path.line_to(cpu_point(line.to + n));
    path.line_to(cpu_point(line.to - n));
    path.line_to(cpu_point(line.from - n));
    path.close_path();
    set_color(ctx, line.color);
    ctx.fill_path(&path);
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
