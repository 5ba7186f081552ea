use super::*;
use crate::{
    foundation::core::{Vec2, Viewport},
    particles::field::{FieldConfig, Particle},
};

fn still(x: f64, y: f64) -> Particle {
    Particle {
        pos: Point::new(x, y),
        vel: Vec2::ZERO,
        radius: 2.0,
    }
}

fn pair_field() -> ParticleField {
    ParticleField::from_particles(
        FieldConfig::default(),
        Viewport::new(200.0, 200.0),
        vec![still(10.0, 10.0), still(60.0, 10.0)],
    )
    .unwrap()
}

#[test]
fn dark_palette_uses_white_ink() {
    let s = pair_field().scene(Theme::Dark);
    assert_eq!(s.discs.len(), 2);
    assert_eq!(s.discs[0].color, [255, 255, 255, 102]);
    assert_eq!(s.lines.len(), 1);
    let line = s.lines[0];
    assert!((line.opacity - 0.075).abs() < 1e-12);
    assert_eq!(line.color[..3], [255, 255, 255]);
    assert_eq!(line.width, 0.5);
}

#[test]
fn light_palette_uses_black_ink() {
    let s = pair_field().scene(Theme::Light);
    assert_eq!(s.discs[1].color, [0, 0, 0, alpha_u8(0.3)]);
    assert!((s.lines[0].opacity - 0.05).abs() < 1e-12);
    assert_eq!(s.lines[0].from, Point::new(10.0, 10.0));
    assert_eq!(s.lines[0].to, Point::new(60.0, 10.0));
}

#[test]
fn zero_area_scene_is_empty() {
    let f = ParticleField::new(FieldConfig::default(), Viewport::new(0.0, 600.0)).unwrap();
    let s = f.scene(Theme::Dark);
    assert!(s.is_empty());
    assert!(s.discs.is_empty());
}
