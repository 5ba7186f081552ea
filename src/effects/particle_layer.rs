use crate::{
    foundation::{core::Viewport, error::ScrollFxResult},
    particles::field::{FieldConfig, ParticleField},
    runtime::frame_loop::{Component, FrameCtx, FrameOutput, Listen},
};

/// Full-viewport particle backdrop.
///
/// The field exists only while mounted; a resize keeps the particles and clamps them into the
/// new bounds.
#[derive(Clone, Debug)]
pub struct ParticleLayer {
    config: FieldConfig,
    field: Option<ParticleField>,
    frames: u64,
}

impl ParticleLayer {
    /// Layer with `config`; nothing is allocated until activation.
    pub fn new(config: FieldConfig) -> ScrollFxResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            field: None,
            frames: 0,
        })
    }

    /// Live simulation, if active.
    pub fn field(&self) -> Option<&ParticleField> {
        self.field.as_ref()
    }
}

impl Component for ParticleLayer {
    fn name(&self) -> &str {
        "particles"
    }

    fn listens(&self) -> Listen {
        Listen::RESIZE
    }

    fn activate(&mut self, viewport: Viewport) -> ScrollFxResult<()> {
        self.field = Some(ParticleField::new(self.config.clone(), viewport)?);
        self.frames = 0;
        Ok(())
    }

    fn on_resize(&mut self, viewport: Viewport) {
        if let Some(field) = &mut self.field {
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                "particle field resized"
            );
            field.resize(viewport);
        }
    }

    fn update(&mut self, _ctx: &FrameCtx<'_>) {
        let every = u64::from(self.config.step_every.max(1));
        if let Some(field) = &mut self.field {
            self.frames += 1;
            if self.frames % every == 0 {
                field.step();
            }
        }
    }

    fn render(&self, ctx: &FrameCtx<'_>) -> FrameOutput {
        match &self.field {
            Some(field) => FrameOutput::Field(field.scene(ctx.theme)),
            None => FrameOutput::Empty,
        }
    }

    fn deactivate(&mut self) {
        self.field = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/particle_layer.rs"]
mod tests;
