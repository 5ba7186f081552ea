use crate::{
    foundation::core::{Point, Theme, alpha_u8},
    particles::field::ParticleField,
};

/// Colors for one theme, straight-alpha RGBA.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Disc fill.
    pub disc: [u8; 4],
    /// Line color; alpha is replaced per link.
    pub link_rgb: [u8; 3],
    /// Line opacity at distance zero.
    pub link_max_opacity: f64,
}

impl Palette {
    /// Palette for `theme`.
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                disc: [255, 255, 255, alpha_u8(0.4)],
                link_rgb: [255, 255, 255],
                link_max_opacity: 0.15,
            },
            Theme::Light => Self {
                disc: [0, 0, 0, alpha_u8(0.3)],
                link_rgb: [0, 0, 0],
                link_max_opacity: 0.1,
            },
        }
    }
}

/// Filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Disc {
    /// Center.
    pub center: Point,
    /// Radius.
    pub radius: f64,
    /// Straight-alpha RGBA.
    pub color: [u8; 4],
}

/// Straight segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
    /// Stroke width.
    pub width: f64,
    /// Line opacity in `[0, 1]`.
    pub opacity: f64,
    /// Straight-alpha RGBA (alpha derived from `opacity`).
    pub color: [u8; 4],
}

/// Draw list for one frame of the particle field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldScene {
    /// Surface width.
    pub width: f64,
    /// Surface height.
    pub height: f64,
    /// Lines, drawn first.
    pub lines: Vec<Line>,
    /// Discs, drawn over the lines.
    pub discs: Vec<Disc>,
}

impl FieldScene {
    /// True when there is nothing to draw or no area to draw on.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || (self.lines.is_empty() && self.discs.is_empty())
    }
}

impl ParticleField {
    /// Build the draw list for `theme`.
    pub fn scene(&self, theme: Theme) -> FieldScene {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return FieldScene::default();
        }
        let palette = Palette::for_theme(theme);
        let particles = self.particles();
        let [r, g, b] = palette.link_rgb;

        let lines = self
            .links()
            .into_iter()
            .map(|l| {
                let opacity = palette.link_max_opacity * l.strength;
                Line {
                    from: particles[l.a].pos,
                    to: particles[l.b].pos,
                    width: self.config().link_width,
                    opacity,
                    color: [r, g, b, alpha_u8(opacity)],
                }
            })
            .collect();

        let discs = particles
            .iter()
            .map(|p| Disc {
                center: p.pos,
                radius: p.radius,
                color: palette.disc,
            })
            .collect();

        FieldScene {
            width: bounds.width,
            height: bounds.height,
            lines,
            discs,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/scene.rs"]
mod tests;
