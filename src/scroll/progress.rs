use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Progress;
use crate::foundation::error::{ScrollFxError, ScrollFxResult};

/// Page scroll state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollGeometry {
    /// Distance scrolled from the top of the document.
    pub scroll_y: f64,
    /// Height of the visible area.
    pub viewport_height: f64,
    /// Total scrollable content height.
    pub document_height: f64,
}

/// Vertical extent of an observed region in document coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionRect {
    /// Offset of the region's top edge from the document top.
    pub top: f64,
    /// Region height (`>= 0`).
    pub height: f64,
}

impl RegionRect {
    /// Bottom edge in document coordinates.
    pub fn bottom(&self) -> f64 {
        self.top + self.height.max(0.0)
    }
}

/// Region geometry the host reports each frame, keyed by region id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
    regions: HashMap<String, RegionRect>,
}

impl Layout {
    /// Empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a region.
    pub fn insert(&mut self, id: impl Into<String>, rect: RegionRect) {
        self.regions.insert(id.into(), rect);
    }

    /// Remove a region (e.g. its element left the tree).
    pub fn remove(&mut self, id: &str) -> Option<RegionRect> {
        self.regions.remove(id)
    }

    /// Geometry for `id`.
    pub fn get(&self, id: &str) -> Option<RegionRect> {
        self.regions.get(id).copied()
    }

    /// Lowest region bottom, used as document height when the host does not report one.
    pub fn content_height(&self) -> f64 {
        self.regions
            .values()
            .map(RegionRect::bottom)
            .fold(0.0, f64::max)
    }
}

/// A point along the target region or the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    /// Fraction of the length: `0` start, `0.5` center, `1` end.
    Fraction(f64),
    /// Absolute pixel distance from the start.
    Pixels(f64),
}

impl Edge {
    /// Resolve against a length.
    pub fn resolve(self, length: f64) -> f64 {
        match self {
            Self::Fraction(f) => f * length,
            Self::Pixels(px) => px,
        }
    }
}

impl FromStr for Edge {
    type Err = ScrollFxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let bad = || ScrollFxError::validation(format!("invalid scroll edge '{s}'"));
        let edge = match s {
            "start" => Self::Fraction(0.0),
            "center" => Self::Fraction(0.5),
            "end" => Self::Fraction(1.0),
            _ => {
                if let Some(px) = s.strip_suffix("px") {
                    Self::Pixels(px.trim().parse().map_err(|_| bad())?)
                } else if let Some(pct) = s.strip_suffix('%') {
                    Self::Fraction(pct.trim().parse::<f64>().map_err(|_| bad())? / 100.0)
                } else {
                    Self::Fraction(s.parse().map_err(|_| bad())?)
                }
            }
        };
        match edge {
            Self::Fraction(v) | Self::Pixels(v) if !v.is_finite() => Err(bad()),
            e => Ok(e),
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Fraction(v) if v == 0.0 => f.write_str("start"),
            Self::Fraction(v) if v == 0.5 => f.write_str("center"),
            Self::Fraction(v) if v == 1.0 => f.write_str("end"),
            Self::Fraction(v) => write!(f, "{v}"),
            Self::Pixels(v) => write!(f, "{v}px"),
        }
    }
}

/// "When this edge of the target meets that edge of the viewport".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Point along the observed region.
    pub target: Edge,
    /// Point along the viewport.
    pub container: Edge,
}

impl FromStr for Intersection {
    type Err = ScrollFxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(target), Some(container), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ScrollFxError::validation(format!(
                "scroll intersection '{s}' must be '<target edge> <viewport edge>'"
            )));
        };
        Ok(Self {
            target: target.parse()?,
            container: container.parse()?,
        })
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.target, self.container)
    }
}

/// Scroll range mapped onto `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "[String; 2]", into = "[String; 2]")]
pub struct ScrollOffsets {
    /// Intersection at progress 0.
    pub start: Intersection,
    /// Intersection at progress 1.
    pub end: Intersection,
}

impl ScrollOffsets {
    /// `["start end", "end start"]`: from first appearance at the bottom of the viewport to
    /// disappearance past the top.
    pub const ENTER_EXIT: Self = Self {
        start: Intersection {
            target: Edge::Fraction(0.0),
            container: Edge::Fraction(1.0),
        },
        end: Intersection {
            target: Edge::Fraction(1.0),
            container: Edge::Fraction(0.0),
        },
    };

    /// `["start start", "end start"]`: from the region's top at the viewport top until the
    /// region has scrolled out.
    pub const TRACK_EXIT: Self = Self {
        start: Intersection {
            target: Edge::Fraction(0.0),
            container: Edge::Fraction(0.0),
        },
        end: Intersection {
            target: Edge::Fraction(1.0),
            container: Edge::Fraction(0.0),
        },
    };

    /// Parse a pair of intersection strings.
    pub fn parse(start: &str, end: &str) -> ScrollFxResult<Self> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
        })
    }
}

impl Default for ScrollOffsets {
    fn default() -> Self {
        Self::ENTER_EXIT
    }
}

impl TryFrom<[String; 2]> for ScrollOffsets {
    type Error = ScrollFxError;

    fn try_from([start, end]: [String; 2]) -> Result<Self, Self::Error> {
        Self::parse(&start, &end)
    }
}

impl From<ScrollOffsets> for [String; 2] {
    fn from(o: ScrollOffsets) -> Self {
        [o.start.to_string(), o.end.to_string()]
    }
}

/// Scroll position at which `at` is satisfied for `region`.
fn scroll_at(geometry: &ScrollGeometry, region: RegionRect, at: Intersection) -> f64 {
    region.top + at.target.resolve(region.height.max(0.0))
        - at.container.resolve(geometry.viewport_height.max(0.0))
}

/// Progress of `region` through the scroll range described by `offsets`.
pub fn region_progress(
    geometry: &ScrollGeometry,
    region: RegionRect,
    offsets: &ScrollOffsets,
) -> Progress {
    let s0 = scroll_at(geometry, region, offsets.start);
    let s1 = scroll_at(geometry, region, offsets.end);
    let s = geometry.scroll_y;
    let range = s1 - s0;
    if !(range > 0.0) {
        return if s >= s1 { Progress::ONE } else { Progress::ZERO };
    }
    Progress::new((s - s0) / range)
}

/// Progress through the whole scrollable document.
pub fn page_progress(geometry: &ScrollGeometry) -> Progress {
    let max_scroll = geometry.document_height - geometry.viewport_height;
    if !(max_scroll > 0.0) {
        return Progress::ZERO;
    }
    Progress::new(geometry.scroll_y / max_scroll)
}

/// What a [`ScrollSource`] observes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTarget {
    /// The whole document.
    Page,
    /// A region reported in the frame's [`Layout`].
    Region(String),
}

/// Dirty-tracked progress observer.
///
/// Scroll and resize notifications only mark the source dirty; the value is recomputed at
/// most once per frame when [`ScrollSource::sample`] runs.
#[derive(Clone, Debug)]
pub struct ScrollSource {
    target: ScrollTarget,
    offsets: ScrollOffsets,
    dirty: bool,
    last: Option<Progress>,
}

impl ScrollSource {
    /// Observe the whole document.
    pub fn page() -> Self {
        Self::new(ScrollTarget::Page, ScrollOffsets::default())
    }

    /// Observe a region with the given offsets.
    pub fn region(id: impl Into<String>, offsets: ScrollOffsets) -> Self {
        Self::new(ScrollTarget::Region(id.into()), offsets)
    }

    /// Generic constructor.
    pub fn new(target: ScrollTarget, offsets: ScrollOffsets) -> Self {
        Self {
            target,
            offsets,
            dirty: true,
            last: None,
        }
    }

    /// Observed target.
    pub fn target(&self) -> &ScrollTarget {
        &self.target
    }

    /// Request recomputation on the next sample.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True when the next sample will recompute.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last computed progress.
    pub fn last(&self) -> Option<Progress> {
        self.last
    }

    /// Current progress, or `None` when the observed region is absent.
    pub fn sample(&mut self, geometry: &ScrollGeometry, layout: &Layout) -> Option<Progress> {
        if !self.dirty {
            return self.last;
        }
        let p = match &self.target {
            ScrollTarget::Page => Some(page_progress(geometry)),
            ScrollTarget::Region(id) => layout
                .get(id)
                .map(|r| region_progress(geometry, r, &self.offsets)),
        };
        match p {
            Some(p) => {
                self.dirty = false;
                self.last = Some(p);
                Some(p)
            }
            None => {
                tracing::trace!(scroll_target = ?self.target, "scroll target absent; skipping");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/progress.rs"]
mod tests;
