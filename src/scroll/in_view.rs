use crate::scroll::progress::{RegionRect, ScrollGeometry};

/// Reveal-on-scroll trigger.
///
/// A region counts as in view when the visible fraction of it reaches `amount` inside the
/// viewport inflated by `margin_px` on both edges (negative margins shrink it).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InViewWatcher {
    /// Margin applied to the viewport's top and bottom edges.
    pub margin_px: f64,
    /// Required visible fraction of the region; `0` means any overlap.
    pub amount: f64,
    /// Latch once the region has been seen.
    pub once: bool,
    #[serde(skip)]
    seen: bool,
}

impl Default for InViewWatcher {
    fn default() -> Self {
        Self {
            margin_px: -100.0,
            amount: 0.0,
            once: true,
            seen: false,
        }
    }
}

impl InViewWatcher {
    /// Watcher with explicit settings.
    pub fn new(margin_px: f64, amount: f64, once: bool) -> Self {
        Self {
            margin_px: if margin_px.is_finite() { margin_px } else { 0.0 },
            amount: if amount.is_finite() { amount.clamp(0.0, 1.0) } else { 0.0 },
            once,
            seen: false,
        }
    }

    /// Whether the watcher has latched.
    pub fn has_seen(&self) -> bool {
        self.seen
    }

    /// Forget a latched sighting.
    pub fn reset(&mut self) {
        self.seen = false;
    }

    /// Evaluate visibility for this frame.
    pub fn update(&mut self, geometry: &ScrollGeometry, region: Option<RegionRect>) -> bool {
        if self.once && self.seen {
            return true;
        }
        let visible = region.is_some_and(|r| is_visible(geometry, r, self.margin_px, self.amount));
        if visible {
            self.seen = true;
        }
        visible
    }
}

fn is_visible(geometry: &ScrollGeometry, region: RegionRect, margin_px: f64, amount: f64) -> bool {
    let lo = geometry.scroll_y - margin_px;
    let hi = geometry.scroll_y + geometry.viewport_height.max(0.0) + margin_px;
    if hi <= lo {
        return false;
    }
    let overlap = region.bottom().min(hi) - region.top.max(lo);
    if overlap <= 0.0 {
        // A zero-height region still counts when it sits strictly inside the window.
        return region.height <= 0.0 && region.top > lo && region.top < hi;
    }
    if amount <= 0.0 {
        return true;
    }
    let h = region.height.max(0.0);
    h > 0.0 && overlap / h >= amount
}
