//! Viewport visibility: observer options, notification entries, and the
//! band geometry used when the host has no native intersection observer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One side of a root margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    /// Resolve against the viewport extent on the same axis.
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Length::Px(px) => px,
            Length::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{}px", v),
            Length::Percent(v) => write!(f, "{}%", v),
        }
    }
}

impl FromStr for Length {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        if let Some(num) = s.strip_suffix('%') {
            return num.parse().map(Length::Percent).map_err(|_| ());
        }
        if let Some(num) = s.strip_suffix("px") {
            return num.parse().map(Length::Px).map_err(|_| ());
        }
        // A bare zero is the only unitless length CSS accepts.
        match s.parse::<f64>() {
            Ok(v) if v == 0.0 => Ok(Length::Px(0.0)),
            _ => Err(()),
        }
    }
}

/// CSS-style margin grown (positive) or shrunk (negative) around the
/// viewport before intersections are computed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: Length::Px(0.0),
        right: Length::Px(0.0),
        bottom: Length::Px(0.0),
        left: Length::Px(0.0),
    };
}

impl FromStr for RootMargin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidRootMargin(s.to_string());
        let parts = s
            .split_whitespace()
            .map(|p| p.parse::<Length>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        // Same shorthand expansion as the CSS margin property.
        let (top, right, bottom, left) = match parts.as_slice() {
            [all] => (*all, *all, *all, *all),
            [v, h] => (*v, *h, *v, *h),
            [t, h, b] => (*t, *h, *b, *h),
            [t, r, b, l] => (*t, *r, *b, *l),
            _ => return Err(invalid()),
        };
        Ok(RootMargin {
            top,
            right,
            bottom,
            left,
        })
    }
}

impl TryFrom<String> for RootMargin {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Error> {
        value.parse()
    }
}

impl From<RootMargin> for String {
    fn from(margin: RootMargin) -> String {
        margin.to_string()
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Registration options for a visibility observer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the target that must be inside the band.
    pub threshold: f64,
    pub root_margin: RootMargin,
}

/// One entry of a visibility notification batch.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityEntry<E> {
    pub target: E,
    pub is_intersecting: bool,
}

impl<E> VisibilityEntry<E> {
    pub fn new(target: E, is_intersecting: bool) -> Self {
        Self {
            target,
            is_intersecting,
        }
    }
}

/// The vertical slice of the document that counts as "in view".
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub top: f64,
    pub bottom: f64,
}

impl Band {
    /// Viewport at `scroll_y`, adjusted by the root margin.
    pub fn from_viewport(scroll_y: f64, viewport_height: f64, margin: &RootMargin) -> Self {
        Band {
            top: scroll_y - margin.top.resolve(viewport_height),
            bottom: scroll_y + viewport_height + margin.bottom.resolve(viewport_height),
        }
    }

    fn overlap(&self, top: f64, height: f64) -> f64 {
        ((top + height).min(self.bottom) - top.max(self.top)).max(0.0)
    }

    /// Fraction of `[top, top + height)` inside the band.
    pub fn intersection_ratio(&self, top: f64, height: f64) -> f64 {
        if height <= 0.0 {
            // Zero-height targets count as fully visible once inside.
            return if top >= self.top && top <= self.bottom {
                1.0
            } else {
                0.0
            };
        }
        (self.overlap(top, height) / height).clamp(0.0, 1.0)
    }

    /// Whether a target with this extent counts as intersecting.
    ///
    /// The threshold is measured against the part of the target the band
    /// can hold at once, so a target taller than the band qualifies while
    /// it fills the band.
    pub fn qualifies(&self, top: f64, height: f64, threshold: f64) -> bool {
        let reachable = height.min(self.bottom - self.top);
        let ratio = if reachable > 0.0 {
            (self.overlap(top, height) / reachable).min(1.0)
        } else {
            self.intersection_ratio(top, height)
        };
        if threshold <= 0.0 {
            ratio > 0.0
        } else {
            ratio >= threshold
        }
    }
}
