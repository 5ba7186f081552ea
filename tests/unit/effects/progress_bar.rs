use super::*;
use crate::{
    foundation::core::{Theme, Viewport},
    scroll::progress::Layout,
};

fn ctx(layout: &Layout, scroll_y: f64) -> FrameCtx<'_> {
    FrameCtx {
        frame: 0,
        time_s: 0.0,
        dt: 1.0 / 60.0,
        geometry: ScrollGeometry {
            scroll_y,
            viewport_height: 800.0,
            document_height: 4000.0,
        },
        viewport: Viewport::new(1280.0, 800.0),
        theme: Theme::Dark,
        layout,
    }
}

#[test]
fn first_sample_jumps() {
    let l = Layout::new();
    let mut bar = ScrollIndicator::new(SpringConfig::PROGRESS_BAR).unwrap();
    bar.update(&ctx(&l, 1600.0));
    assert_eq!(bar.scale_x(), 0.5);
    assert_eq!(bar.percent(), 50.0);
}

#[test]
fn percent_is_raw_while_scale_is_smoothed() {
    let l = Layout::new();
    let mut bar = ScrollIndicator::new(SpringConfig::PROGRESS_BAR).unwrap();
    bar.update(&ctx(&l, 0.0));

    bar.on_scroll(&ctx(&l, 3200.0).geometry);
    bar.update(&ctx(&l, 3200.0));
    assert_eq!(bar.percent(), 100.0);
    assert!(bar.scale_x() > 0.0 && bar.scale_x() < 1.0);

    for _ in 0..600 {
        bar.update(&ctx(&l, 3200.0));
    }
    assert_eq!(bar.scale_x(), 1.0);
}

#[test]
fn percent_rounds_to_whole_numbers() {
    let l = Layout::new();
    let mut bar = ScrollIndicator::new(SpringConfig::PROGRESS_BAR).unwrap();
    bar.update(&ctx(&l, 393.6));
    assert_eq!(bar.percent(), 12.0);
    let FrameOutput::Style { channels, color } = bar.render(&ctx(&l, 393.6)) else {
        panic!("expected style output");
    };
    assert_eq!(channels.get(Channel::Percent), Some(12.0));
    assert!(channels.get(Channel::ScaleX).is_some());
    assert!(color.is_none());
}

#[test]
fn color_follows_raw_progress() {
    let l = Layout::new();
    let black = Rgba8Premul::from_straight_rgba(0, 0, 0, 255);
    let white = Rgba8Premul::from_straight_rgba(255, 255, 255, 255);
    let mut bar = ScrollIndicator::new(SpringConfig::PROGRESS_BAR)
        .unwrap()
        .with_color(InterpolationTable::linear(black, white));
    bar.update(&ctx(&l, 3200.0));
    let FrameOutput::Style { color, .. } = bar.render(&ctx(&l, 3200.0)) else {
        panic!("expected style output");
    };
    assert_eq!(color, Some(white));
}

#[test]
fn invalid_spring_is_rejected() {
    let cfg = SpringConfig {
        stiffness: 0.0,
        ..SpringConfig::PROGRESS_BAR
    };
    assert!(ScrollIndicator::new(cfg).is_err());
}
