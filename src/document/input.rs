//! Structured input capture.
//!
//! A front end collects every field of a record in one step and hands back either a complete
//! draft or a cancellation. Drafts are validated into document records here, so a cancelled or
//! invalid capture never reaches the document.

use std::path::PathBuf;

use crate::document::model::{Device, Stripe};
use crate::foundation::core::{CANONICAL_HEIGHT, CANONICAL_WIDTH, Rgb8};
use crate::foundation::error::{RibbonError, RibbonResult};

/// Outcome of one input-capture step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capture<T> {
    /// The user supplied a complete record.
    Confirmed(T),
    /// The user dismissed the input step.
    Cancelled,
}

impl<T> Capture<T> {
    /// Convert into an `Option`, dropping cancellations.
    pub fn confirmed(self) -> Option<T> {
        match self {
            Self::Confirmed(v) => Some(v),
            Self::Cancelled => None,
        }
    }

    /// Map the confirmed value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Capture<U> {
        match self {
            Self::Confirmed(v) => Capture::Confirmed(f(v)),
            Self::Cancelled => Capture::Cancelled,
        }
    }

    /// Run `f` on a confirmed value. Cancellations return `Ok(None)` without calling `f`.
    pub fn apply<R>(self, f: impl FnOnce(T) -> RibbonResult<R>) -> RibbonResult<Option<R>> {
        match self {
            Self::Confirmed(v) => f(v).map(Some),
            Self::Cancelled => Ok(None),
        }
    }
}

impl<T> From<Option<T>> for Capture<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Self::Confirmed(v),
            None => Self::Cancelled,
        }
    }
}

/// Raw stripe fields as collected from the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripeDraft {
    /// Left edge in canonical units.
    pub offset: i64,
    /// Width in canonical units.
    pub width: i64,
    /// Fill color.
    pub color: Rgb8,
    /// Mirror about the vertical center.
    pub mirrored: bool,
}

impl StripeDraft {
    /// Validate into a [`Stripe`]: `0 <= offset <= 1024`, `1 <= width <= 1024`.
    pub fn into_stripe(self) -> RibbonResult<Stripe> {
        let max = i64::from(CANONICAL_WIDTH);
        if !(0..=max).contains(&self.offset) {
            return Err(RibbonError::validation(format!(
                "stripe offset {} outside 0..={max}",
                self.offset
            )));
        }
        if !(1..=max).contains(&self.width) {
            return Err(RibbonError::validation(format!(
                "stripe width {} outside 1..={max}",
                self.width
            )));
        }
        Ok(Stripe {
            offset: self.offset as u32,
            width: self.width as u32,
            color: self.color,
            mirrored: self.mirrored,
        })
    }
}

/// Raw text-device fields as collected from the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextDeviceDraft {
    /// Label text, must be non-empty.
    pub name: String,
    /// Text color.
    pub color: Rgb8,
    /// Left edge in canonical units.
    pub x: i64,
    /// Baseline in canonical units.
    pub y: i64,
}

impl TextDeviceDraft {
    /// Validate into a text [`Device`] placed on the canonical canvas.
    pub fn into_device(self) -> RibbonResult<Device> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(RibbonError::validation("device name must be non-empty"));
        }
        let (max_x, max_y) = (i64::from(CANONICAL_WIDTH), i64::from(CANONICAL_HEIGHT));
        if !(0..=max_x).contains(&self.x) || !(0..=max_y).contains(&self.y) {
            return Err(RibbonError::validation(format!(
                "device position ({}, {}) outside 0..={max_x} x 0..={max_y}",
                self.x, self.y
            )));
        }
        Ok(Device::text(name, self.color, self.x as i32, self.y as i32))
    }
}

/// A device icon picked from the asset library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageDeviceDraft {
    /// Display name.
    pub name: String,
    /// Icon path.
    pub path: PathBuf,
}

/// Natural device height in canonical units: 30% of the canvas, never above one third.
pub const DEVICE_HEIGHT: u32 = {
    let thirty_pct = CANONICAL_HEIGHT * 3 / 10;
    let third = CANONICAL_HEIGHT / 3;
    if thirty_pct < third { thirty_pct } else { third }
};

/// Width matching `height` at the icon's pixel aspect ratio, floored, at least 1.
pub(crate) fn aspect_width(height: u32, icon_width: u32, icon_height: u32) -> u32 {
    let aspect = f64::from(icon_width) / f64::from(icon_height);
    ((f64::from(height) * aspect) as u32).max(1)
}

impl ImageDeviceDraft {
    /// Size the device from its icon's pixel dimensions and center it on the canonical canvas.
    pub fn into_device(self, icon_width: u32, icon_height: u32) -> RibbonResult<Device> {
        if icon_width == 0 || icon_height == 0 {
            return Err(RibbonError::validation(format!(
                "device icon '{}' has zero size",
                self.path.display()
            )));
        }
        let height = DEVICE_HEIGHT;
        let width = aspect_width(height, icon_width, icon_height);
        let x = (CANONICAL_WIDTH as i32 - width as i32).div_euclid(2);
        let y = (CANONICAL_HEIGHT as i32 - height as i32).div_euclid(2);
        Ok(Device::image(self.name, self.path, (x, y), (width, height)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/input.rs"]
mod tests;
