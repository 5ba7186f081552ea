use super::*;
use crate::{
    foundation::core::{Theme, Viewport},
    scroll::progress::{Layout, RegionRect},
};

const DT: f64 = 1.0 / 60.0;

fn layout() -> Layout {
    let mut l = Layout::new();
    l.insert("contact", RegionRect { top: 1000.0, height: 400.0 });
    l
}

fn ctx(layout: &Layout, time_s: f64, scroll_y: f64) -> FrameCtx<'_> {
    FrameCtx {
        frame: 0,
        time_s,
        dt: DT,
        geometry: ScrollGeometry {
            scroll_y,
            viewport_height: 800.0,
            document_height: 4000.0,
        },
        viewport: Viewport::new(1280.0, 800.0),
        theme: Theme::Light,
        layout,
    }
}

fn opacity(r: &Reveal) -> f64 {
    r.values().get(Channel::Opacity).unwrap()
}

fn rise(r: &Reveal) -> f64 {
    r.values().get(Channel::Y).unwrap()
}

#[test]
fn hidden_until_in_view() {
    let l = layout();
    let mut r = Reveal::new("contact", 0.0).unwrap();
    r.update(&ctx(&l, 0.0, 0.0));
    assert!(!r.is_triggered());
    assert_eq!(opacity(&r), 0.0);
    assert_eq!(rise(&r), Reveal::RISE_PX);
}

#[test]
fn plays_once_after_entering_view() {
    let l = layout();
    let mut r = Reveal::new("contact", 0.0).unwrap();
    r.update(&ctx(&l, 1.0, 0.0));

    r.on_scroll(&ctx(&l, 2.0, 350.0).geometry);
    r.update(&ctx(&l, 2.0, 350.0));
    assert!(r.is_triggered());
    assert_eq!(opacity(&r), 0.0);

    r.update(&ctx(&l, 2.3, 350.0));
    assert!((opacity(&r) - 0.5).abs() < 1e-6);
    assert!((rise(&r) - 10.0).abs() < 1e-6);

    r.update(&ctx(&l, 3.0, 350.0));
    assert_eq!(opacity(&r), 1.0);
    assert_eq!(rise(&r), 0.0);

    // Scrolling away does not hide it again.
    r.on_scroll(&ctx(&l, 4.0, 0.0).geometry);
    r.update(&ctx(&l, 4.0, 0.0));
    assert_eq!(opacity(&r), 1.0);
}

#[test]
fn visibility_is_checked_only_after_scroll_notice() {
    let l = layout();
    let mut r = Reveal::new("contact", 0.0).unwrap();
    r.update(&ctx(&l, 0.0, 0.0));
    r.update(&ctx(&l, 0.1, 350.0));
    assert!(!r.is_triggered());
    r.on_scroll(&ctx(&l, 0.2, 350.0).geometry);
    r.update(&ctx(&l, 0.2, 350.0));
    assert!(r.is_triggered());
}

#[test]
fn delay_postpones_the_tween() {
    let l = layout();
    let mut r = Reveal::new("contact", 0.2).unwrap();
    r.update(&ctx(&l, 2.0, 350.0));
    assert!(r.is_triggered());
    r.update(&ctx(&l, 2.1, 350.0));
    assert_eq!(opacity(&r), 0.0);
    r.update(&ctx(&l, 2.5, 350.0));
    assert!((opacity(&r) - 0.5).abs() < 1e-6);
}

#[test]
fn missing_region_never_triggers() {
    let l = Layout::new();
    let mut r = Reveal::new("contact", 0.0).unwrap();
    r.update(&ctx(&l, 0.0, 350.0));
    assert!(!r.is_triggered());
    assert!(matches!(r.render(&ctx(&l, 0.0, 350.0)), FrameOutput::Style { .. }));
}

#[test]
fn region_appearing_later_triggers_without_scrolling() {
    let empty = Layout::new();
    let l = layout();
    let mut r = Reveal::new("contact", 0.0).unwrap();
    r.update(&ctx(&empty, 0.0, 350.0));
    assert!(!r.is_triggered());

    // No scroll notice in between; the absent region keeps the check pending.
    r.update(&ctx(&l, 0.1, 350.0));
    assert!(r.is_triggered());
    r.update(&ctx(&l, 2.0, 350.0));
    assert_eq!(opacity(&r), 1.0);
}

#[test]
fn deactivate_forgets_the_entrance() {
    let l = layout();
    let mut r = Reveal::new("contact", 0.0).unwrap();
    r.update(&ctx(&l, 0.0, 350.0));
    r.update(&ctx(&l, 1.0, 350.0));
    assert_eq!(opacity(&r), 1.0);

    r.deactivate();
    assert!(!r.is_triggered());
    assert_eq!(opacity(&r), 0.0);
    assert_eq!(rise(&r), Reveal::RISE_PX);

    // Remounted while the region is off screen: stays hidden.
    r.update(&ctx(&l, 5.0, 0.0));
    assert!(!r.is_triggered());
    assert_eq!(opacity(&r), 0.0);
}

#[test]
fn channels_run_on_their_own_delays_plus_offset() {
    let l = layout();
    let tweens = [
        RevealTween::tween(Channel::X, -50.0, 0.0, 0.5),
        RevealTween::tween(Channel::ScaleX, 0.0, 1.0, 0.5).delayed(0.1),
    ];
    let mut r = Reveal::from_tweens("contact", &tweens, 0.4)
        .unwrap()
        .named("reveal:contact:card:2");
    assert_eq!(r.name(), "reveal:contact:card:2");
    assert_eq!(r.values().get(Channel::X), Some(-50.0));
    assert_eq!(r.values().get(Channel::ScaleX), Some(0.0));

    r.update(&ctx(&l, 10.0, 350.0));
    assert!(r.is_triggered());
    r.update(&ctx(&l, 10.4, 350.0));
    assert_eq!(r.values().get(Channel::X), Some(-50.0));
    r.update(&ctx(&l, 10.5, 350.0));
    assert!((r.values().get(Channel::X).unwrap() + 40.0).abs() < 1e-6);
    assert!(r.values().get(Channel::ScaleX).unwrap().abs() < 1e-6);
    r.update(&ctx(&l, 10.75, 350.0));
    assert!((r.values().get(Channel::X).unwrap() + 15.0).abs() < 1e-6);
    assert!((r.values().get(Channel::ScaleX).unwrap() - 0.5).abs() < 1e-6);
    r.update(&ctx(&l, 12.0, 350.0));
    assert_eq!(r.values().get(Channel::X), Some(0.0));
    assert_eq!(r.values().get(Channel::ScaleX), Some(1.0));
}

#[test]
fn spring_lane_waits_for_its_delay_then_settles() {
    let l = layout();
    let tweens = [RevealTween::spring(Channel::Scale, 0.0, 1.0, SpringConfig::POP).delayed(0.5)];
    let mut r = Reveal::from_tweens("contact", &tweens, 0.0).unwrap();

    let mut t = 0.0;
    r.update(&ctx(&l, t, 350.0));
    while t < 0.45 {
        t += DT;
        r.update(&ctx(&l, t, 350.0));
    }
    assert_eq!(r.values().get(Channel::Scale), Some(0.0));

    let mut peak: f64 = 0.0;
    while t < 3.0 {
        t += DT;
        r.update(&ctx(&l, t, 350.0));
        peak = peak.max(r.values().get(Channel::Scale).unwrap());
    }
    assert!(peak > 1.0, "underdamped pop overshoots");
    assert_eq!(r.values().get(Channel::Scale), Some(1.0));
}

#[test]
fn mount_trigger_ignores_visibility() {
    let empty = Layout::new();
    let mut r = Reveal::new("hero", 0.0)
        .unwrap()
        .with_trigger(RevealTrigger::Mount);
    assert_eq!(r.listens(), Listen::default());
    r.update(&ctx(&empty, 3.0, 0.0));
    assert!(r.is_triggered());
}

#[test]
fn invalid_tweens_are_rejected() {
    assert!(Reveal::from_tweens("contact", &[], 0.0).is_err());
    let zero = RevealTween::tween(Channel::Opacity, 0.0, 1.0, 0.0);
    assert!(Reveal::from_tweens("contact", &[zero], 0.0).is_err());
    let late = RevealTween::tween(Channel::Opacity, 0.0, 1.0, 0.3).delayed(-1.0);
    assert!(Reveal::from_tweens("contact", &[late], 0.0).is_err());
    let nan = RevealTween::tween(Channel::Opacity, f64::NAN, 1.0, 0.3);
    assert!(Reveal::from_tweens("contact", &[nan], 0.0).is_err());
    let ok = RevealTween::tween(Channel::Opacity, 0.0, 1.0, 0.3);
    assert!(Reveal::from_tweens("contact", &[ok], -0.1).is_err());
}
