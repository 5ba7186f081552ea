use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{foundation::error::ScrollFxError, scroll::progress::RegionRect};

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    listens: Listen,
    log: Log,
    fail_activate: bool,
}

impl Recorder {
    fn boxed(name: &'static str, listens: Listen, log: &Log) -> Box<dyn Component> {
        Box::new(Self {
            name,
            listens,
            log: Rc::clone(log),
            fail_activate: false,
        })
    }

    fn push(&self, event: &str) {
        self.log.borrow_mut().push(format!("{}:{event}", self.name));
    }
}

impl Component for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn listens(&self) -> Listen {
        self.listens
    }

    fn activate(&mut self, _viewport: Viewport) -> ScrollFxResult<()> {
        if self.fail_activate {
            return Err(ScrollFxError::validation("activation refused"));
        }
        self.push("activate");
        Ok(())
    }

    fn on_scroll(&mut self, _geometry: &ScrollGeometry) {
        self.push("scroll");
    }

    fn on_resize(&mut self, _viewport: Viewport) {
        self.push("resize");
    }

    fn update(&mut self, _ctx: &FrameCtx<'_>) {
        self.push("update");
    }

    fn render(&self, _ctx: &FrameCtx<'_>) -> FrameOutput {
        self.push("render");
        FrameOutput::Empty
    }

    fn deactivate(&mut self) {
        self.push("deactivate");
    }
}

const VP: Viewport = Viewport {
    width: 1280.0,
    height: 800.0,
};

fn host(time_s: f64, scroll_y: f64) -> HostFrame {
    HostFrame {
        time_s,
        scroll_y,
        viewport: VP,
        document_height: 4000.0,
        theme: Theme::Dark,
        layout: Layout::new(),
    }
}

fn count(log: &Log, entry: &str) -> usize {
    log.borrow().iter().filter(|e| *e == entry).count()
}

#[test]
fn dt_defaults_then_clamps() {
    let mut fl = FrameLoop::new();
    assert_eq!(fl.advance(&host(10.0, 0.0)).dt, FIRST_FRAME_DT);
    let dt = fl.advance(&host(10.016, 0.0)).dt;
    assert!((dt - 0.016).abs() < 1e-9);
    // Tab was hidden for a while.
    assert_eq!(fl.advance(&host(15.0, 0.0)).dt, MAX_FRAME_DT);
    // Clock went backwards.
    assert_eq!(fl.advance(&host(14.0, 0.0)).dt, 0.0);
    assert_eq!(fl.frames(), 4);
}

#[test]
fn phases_run_in_order_within_a_frame() {
    let log = Log::default();
    let mut fl = FrameLoop::new();
    let both = Listen {
        scroll: true,
        resize: true,
    };
    fl.mount(Recorder::boxed("a", both, &log), Viewport::new(800.0, 600.0))
        .unwrap();
    fl.mount(Recorder::boxed("b", Listen::SCROLL, &log), VP).unwrap();
    log.borrow_mut().clear();

    let report = fl.advance(&host(0.0, 0.0));
    assert!(report.resized);
    assert!(report.scrolled);
    assert_eq!(
        *log.borrow(),
        [
            "a:resize", "a:scroll", "b:scroll", "a:update", "b:update", "a:render", "b:render"
        ]
    );
    assert_eq!(report.outputs.len(), 2);
    assert_eq!(report.outputs[0].name, "a");
}

#[test]
fn scroll_is_dispatched_once_and_only_on_change() {
    let log = Log::default();
    let mut fl = FrameLoop::new();
    fl.mount(Recorder::boxed("s", Listen::SCROLL, &log), VP).unwrap();

    fl.advance(&host(0.0, 0.0));
    fl.advance(&host(0.016, 0.0));
    assert_eq!(count(&log, "s:scroll"), 1);

    fl.advance(&host(0.032, 120.0));
    assert_eq!(count(&log, "s:scroll"), 2);

    fl.invalidate_layout();
    let report = fl.advance(&host(0.048, 120.0));
    assert!(report.scrolled);
    assert_eq!(count(&log, "s:scroll"), 3);
    assert_eq!(count(&log, "s:update"), 4);
}

#[test]
fn layout_change_alone_notifies_scroll_listeners() {
    let log = Log::default();
    let mut fl = FrameLoop::new();
    fl.mount(Recorder::boxed("s", Listen::SCROLL, &log), VP).unwrap();

    let mut frame = host(0.0, 500.0);
    frame.layout.insert("about", RegionRect { top: 800.0, height: 900.0 });
    fl.advance(&frame);
    frame.time_s = 0.016;
    assert!(!fl.advance(&frame).scrolled);
    assert_eq!(count(&log, "s:scroll"), 1);

    // Content above the region finished loading; the scroll offset is unchanged.
    frame.time_s = 0.032;
    frame.layout.insert("about", RegionRect { top: 0.0, height: 900.0 });
    assert!(fl.advance(&frame).scrolled);
    assert_eq!(count(&log, "s:scroll"), 2);

    frame.time_s = 0.048;
    assert!(!fl.advance(&frame).scrolled);
    assert_eq!(count(&log, "s:scroll"), 2);
}

#[test]
fn components_without_listeners_get_no_events() {
    let log = Log::default();
    let mut fl = FrameLoop::new();
    fl.mount(Recorder::boxed("q", Listen::default(), &log), Viewport::new(10.0, 10.0))
        .unwrap();
    fl.advance(&host(0.0, 50.0));
    assert_eq!(count(&log, "q:scroll"), 0);
    assert_eq!(count(&log, "q:resize"), 0);
    assert_eq!(count(&log, "q:update"), 1);
}

#[test]
fn unmount_stops_updates_and_removes_listeners() {
    let log = Log::default();
    let mut fl = FrameLoop::new();
    let both = Listen {
        scroll: true,
        resize: true,
    };
    let a = fl.mount(Recorder::boxed("a", both, &log), VP).unwrap();
    let b = fl.mount(Recorder::boxed("b", Listen::SCROLL, &log), VP).unwrap();
    assert_eq!(fl.active_count(), 2);
    assert_eq!(fl.listener_count(ListenerKind::Scroll), 2);
    assert_eq!(fl.listener_count(ListenerKind::Resize), 1);

    fl.advance(&host(0.0, 0.0));
    assert!(fl.unmount(a));
    assert!(!fl.is_mounted(a));
    assert_eq!(count(&log, "a:deactivate"), 1);
    assert_eq!(fl.active_count(), 1);
    assert_eq!(fl.listener_count(ListenerKind::Scroll), 1);
    assert_eq!(fl.listener_count(ListenerKind::Resize), 0);

    let mut resized = host(0.016, 300.0);
    resized.viewport = Viewport::new(375.0, 667.0);
    let report = fl.advance(&resized);
    assert_eq!(count(&log, "a:update"), 1);
    assert_eq!(count(&log, "a:scroll"), 1);
    assert_eq!(count(&log, "a:resize"), 0);
    assert!(report.output(a).is_none());
    assert!(report.output(b).is_some());

    assert!(!fl.unmount(a));
    assert!(fl.unmount(b));
    assert_eq!(fl.active_count(), 0);
    assert_eq!(fl.listener_count(ListenerKind::Scroll), 0);
}

#[test]
fn failed_activation_registers_nothing() {
    let log = Log::default();
    let mut fl = FrameLoop::new();
    let recorder = Box::new(Recorder {
        name: "bad",
        listens: Listen::SCROLL,
        log: Rc::clone(&log),
        fail_activate: true,
    });
    let err = fl.mount(recorder, VP).unwrap_err();
    assert!(err.to_string().contains("activation refused"));
    assert_eq!(fl.active_count(), 0);
    assert_eq!(fl.listener_count(ListenerKind::Scroll), 0);
}

#[test]
fn ids_are_not_reused() {
    let log = Log::default();
    let mut fl = FrameLoop::new();
    let a = fl.mount(Recorder::boxed("a", Listen::default(), &log), VP).unwrap();
    fl.unmount(a);
    let b = fl.mount(Recorder::boxed("b", Listen::default(), &log), VP).unwrap();
    assert_ne!(a, b);
    assert!(b.get() > a.get());
}
