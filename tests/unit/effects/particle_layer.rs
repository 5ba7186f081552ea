use super::*;
use crate::{
    foundation::core::Theme,
    runtime::frame_loop::{FrameLoop, HostFrame, ListenerKind},
    scroll::progress::{Layout, ScrollGeometry},
};

fn ctx(layout: &Layout, theme: Theme) -> FrameCtx<'_> {
    FrameCtx {
        frame: 0,
        time_s: 0.0,
        dt: 1.0 / 60.0,
        geometry: ScrollGeometry::default(),
        viewport: Viewport::default(),
        theme,
        layout,
    }
}

#[test]
fn field_lives_only_while_active() {
    let l = Layout::new();
    let mut layer = ParticleLayer::new(FieldConfig::default()).unwrap();
    assert!(layer.field().is_none());
    assert_eq!(layer.render(&ctx(&l, Theme::Dark)), FrameOutput::Empty);

    layer.activate(Viewport::new(1280.0, 800.0)).unwrap();
    assert_eq!(layer.field().map(|f| f.particles().len()), Some(40));
    let FrameOutput::Field(scene) = layer.render(&ctx(&l, Theme::Dark)) else {
        panic!("expected field output");
    };
    assert_eq!(scene.discs.len(), 40);

    layer.deactivate();
    assert!(layer.field().is_none());
}

#[test]
fn steps_every_other_frame() {
    let l = Layout::new();
    let mut layer = ParticleLayer::new(FieldConfig::default()).unwrap();
    layer.activate(Viewport::new(1280.0, 800.0)).unwrap();
    for _ in 0..5 {
        layer.update(&ctx(&l, Theme::Light));
    }
    assert_eq!(layer.field().map(|f| f.steps()), Some(2));
}

#[test]
fn theme_only_recolors() {
    let l = Layout::new();
    let mut layer = ParticleLayer::new(FieldConfig::default()).unwrap();
    layer.activate(Viewport::new(1280.0, 800.0)).unwrap();
    let FrameOutput::Field(dark) = layer.render(&ctx(&l, Theme::Dark)) else {
        panic!("expected field output");
    };
    let FrameOutput::Field(light) = layer.render(&ctx(&l, Theme::Light)) else {
        panic!("expected field output");
    };
    assert_ne!(dark.discs[0].color, light.discs[0].color);
    assert_eq!(dark.discs[0].center, light.discs[0].center);
}

#[test]
fn resize_through_frame_loop_keeps_particles() {
    let mut fl = FrameLoop::new();
    let layer = ParticleLayer::new(FieldConfig::default()).unwrap();
    let id = fl.mount(Box::new(layer), Viewport::new(1280.0, 800.0)).unwrap();
    assert_eq!(fl.listener_count(ListenerKind::Resize), 1);

    let host = HostFrame {
        time_s: 0.0,
        scroll_y: 0.0,
        viewport: Viewport::new(375.0, 667.0),
        document_height: 667.0,
        theme: Theme::Dark,
        layout: Layout::new(),
    };
    let report = fl.advance(&host);
    assert!(report.resized);
    let Some(FrameOutput::Field(scene)) = report.output(id) else {
        panic!("expected field output");
    };
    assert_eq!(scene.width, 375.0);
    assert_eq!(scene.discs.len(), 40);
    assert!(
        scene
            .discs
            .iter()
            .all(|d| d.center.x <= 375.0 && d.center.y <= 667.0)
    );

    fl.unmount(id);
    assert_eq!(fl.listener_count(ListenerKind::Resize), 0);
}
