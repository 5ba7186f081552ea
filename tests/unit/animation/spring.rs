use super::*;

const DT: f64 = 1.0 / 60.0;

fn ticks_to_rest(config: SpringConfig, from: f64, to: f64, max_ticks: u32) -> Option<u32> {
    let mut s = Spring::new(config, from);
    s.set_target(to);
    for i in 0..max_ticks {
        s.advance(DT);
        assert!(s.value().is_finite(), "value diverged at tick {i}");
        assert!(
            (s.value() - to).abs() <= (from - to).abs() * 2.0 + 1.0,
            "value escaped envelope at tick {i}"
        );
        if s.is_at_rest() {
            assert_eq!(s.value(), to);
            assert_eq!(s.velocity(), 0.0);
            return Some(i + 1);
        }
    }
    None
}

#[test]
fn section_spring_settles_quickly() {
    let n = ticks_to_rest(SpringConfig::SECTION, 0.0, 120.0, 10_000).unwrap();
    assert!(n < 600, "took {n} ticks");
}

#[test]
fn progress_bar_spring_settles() {
    assert!(ticks_to_rest(SpringConfig::PROGRESS_BAR, 0.0, 1.0, 10_000).is_some());
}

#[test]
fn critically_damped_settles_without_overshoot() {
    let cfg = SpringConfig::new(100.0, 20.0).unwrap();
    let mut s = Spring::new(cfg, 0.0);
    s.set_target(10.0);
    for _ in 0..2_000 {
        s.advance(DT);
        assert!(s.value() <= 10.0 + 1e-9);
    }
    assert!(s.is_at_rest());
}

#[test]
fn overdamped_settles() {
    let cfg = SpringConfig::new(100.0, 500.0).unwrap();
    assert!(ticks_to_rest(cfg, -50.0, 50.0, 100_000).is_some());
}

#[test]
fn zero_damping_still_settles() {
    let cfg = SpringConfig::new(100.0, 0.0).unwrap();
    assert!(ticks_to_rest(cfg, 0.0, 100.0, 100_000).is_some());
}

#[test]
fn soft_spring_settles_eventually() {
    let cfg = SpringConfig::new(0.5, 0.01).unwrap();
    assert!(ticks_to_rest(cfg, 0.0, 100.0, 200_000).is_some());
}

#[test]
fn very_stiff_spring_is_stable_with_large_steps() {
    let cfg = SpringConfig::new(1.0e6, 1.0).unwrap();
    let mut s = Spring::new(cfg, 0.0);
    s.set_target(1.0);
    for _ in 0..10_000 {
        s.advance(0.25);
        assert!(s.value().is_finite());
        assert!(s.value().abs() < 3.0);
    }
    assert!(s.is_at_rest());
}

#[test]
fn underdamped_overshoots_then_settles() {
    let cfg = SpringConfig::new(100.0, 5.0).unwrap();
    let mut s = Spring::new(cfg, 0.0);
    s.set_target(1.0);
    let mut peak = 0.0f64;
    for _ in 0..5_000 {
        s.advance(DT);
        peak = peak.max(s.value());
    }
    assert!(peak > 1.0);
    assert!(s.is_at_rest());
}

#[test]
fn moving_target_is_tracked() {
    let mut s = Spring::new(SpringConfig::SECTION, 0.0);
    for i in 0..120 {
        s.set_target(i as f64);
        s.advance(DT);
    }
    assert!(s.value() > 50.0 && s.value() < 119.0);
    assert!(!s.is_at_rest());
    for _ in 0..2_000 {
        s.advance(DT);
    }
    assert_eq!(s.value(), 119.0);
}

#[test]
fn jump_snaps_and_rests() {
    let mut s = Spring::new(SpringConfig::default(), 0.0);
    s.set_target(5.0);
    s.advance(DT);
    s.jump(3.0);
    assert_eq!(s.value(), 3.0);
    assert_eq!(s.target(), 3.0);
    assert!(s.is_at_rest());
}

#[test]
fn degenerate_steps_are_noops() {
    let mut s = Spring::new(SpringConfig::default(), 0.0);
    s.set_target(1.0);
    for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        s.advance(dt);
        assert_eq!(s.value(), 0.0);
    }
    s.set_target(f64::NAN);
    assert_eq!(s.target(), 1.0);
}

#[test]
fn invalid_configs_are_rejected() {
    assert!(SpringConfig::new(0.0, 1.0).is_err());
    assert!(SpringConfig::new(-1.0, 1.0).is_err());
    assert!(SpringConfig::new(1.0, -0.1).is_err());
    assert!(SpringConfig::new(f64::NAN, 1.0).is_err());
    assert!(SpringConfig::default().with_mass(0.0).validate().is_err());
    assert!(SpringConfig::default().with_rest(0.0, 1.0).validate().is_err());
    assert!(SpringConfig::SECTION.validate().is_ok());
    assert!(SpringConfig::PROGRESS_BAR.validate().is_ok());
}

#[test]
fn damping_ratio_floor_applies() {
    let cfg = SpringConfig::new(100.0, 0.0).unwrap();
    assert_eq!(cfg.effective_damping_ratio(), MIN_DAMPING_RATIO);
    let cfg = SpringConfig::new(100.0, 20.0).unwrap();
    assert!((cfg.effective_damping_ratio() - 1.0).abs() < 1e-12);
}
