use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::input::{DEVICE_HEIGHT, aspect_width};
use crate::foundation::core::Rgb8;
use crate::foundation::error::{RibbonError, RibbonResult};

/// A complete ribbon design.
///
/// All geometry is stored in canonical canvas units (see [`crate::Canvas::canonical`]),
/// independent of the resolution it is later rendered at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonDocument {
    /// Solid fill behind everything else.
    pub background: Rgb8,
    /// Vertical bands; later entries paint over earlier ones.
    pub stripes: Vec<Stripe>,
    /// Overlaid icons and labels in draw order.
    pub devices: Vec<Device>,
    /// Faint horizontal-line overlay between stripes and devices.
    pub texture_enabled: bool,
    /// Optional decorative border overlay.
    pub frame: Option<FrameKind>,
    /// Optional logo image. Absolute in memory; relative to the document file on disk.
    pub logo: Option<PathBuf>,
    /// Display-only metadata.
    pub info: RibbonInfo,
}

/// A vertical colored band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stripe {
    /// Left edge in canonical units.
    #[serde(rename = "x")]
    pub offset: u32,
    /// Band width in canonical units, always `> 0`.
    pub width: u32,
    /// Fill color.
    pub color: Rgb8,
    /// Also paint the band reflected about the vertical center axis.
    #[serde(default)]
    pub mirrored: bool,
}

impl Stripe {
    /// Build a non-mirrored stripe.
    pub fn new(offset: u32, width: u32, color: Rgb8) -> Self {
        Self {
            offset,
            width,
            color,
            mirrored: false,
        }
    }

    /// Return a copy with `mirrored` set.
    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    pub(crate) fn validate(&self) -> RibbonResult<()> {
        if self.width == 0 {
            return Err(RibbonError::validation("stripe width must be > 0"));
        }
        Ok(())
    }
}

/// A device drawn on top of the ribbon.
///
/// The variant follows from the record itself: a color makes a text label, an image path makes
/// an icon.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Device {
    /// Bitmap icon, auto-laid-out in the device row.
    Image(ImageDevice),
    /// Text label drawn at its stored position.
    Text(TextDevice),
}

/// Text label device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDevice {
    /// Label text.
    pub name: String,
    /// Text color.
    pub color: Rgb8,
    /// Left edge of the label in canonical units.
    pub x: i32,
    /// Baseline of the label in canonical units.
    pub y: i32,
}

/// Bitmap icon device.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDevice {
    /// Display name (usually the icon file stem).
    pub name: String,
    /// Icon image path.
    pub path: PathBuf,
    /// Stored placement; the device row layout ignores it.
    pub x: i32,
    /// Stored placement; the device row layout ignores it.
    pub y: i32,
    /// Natural width in canonical units. Derived from the icon when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Natural height in canonical units. Derived from the icon when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageDevice {
    /// Natural size in canonical units for an icon of `icon_width` x `icon_height` pixels.
    ///
    /// Stored dimensions win. A missing height falls back to [`DEVICE_HEIGHT`] and a missing
    /// width follows the icon's aspect ratio. Returns `None` for an empty icon.
    pub fn natural_size(&self, icon_width: u32, icon_height: u32) -> Option<(u32, u32)> {
        if let (Some(w), Some(h)) = (self.width, self.height) {
            return Some((w, h));
        }
        if icon_width == 0 || icon_height == 0 {
            return None;
        }
        let height = self.height.unwrap_or(DEVICE_HEIGHT);
        let width = self
            .width
            .unwrap_or_else(|| aspect_width(height, icon_width, icon_height));
        Some((width, height))
    }
}

impl Device {
    /// Build a text device.
    pub fn text(name: impl Into<String>, color: Rgb8, x: i32, y: i32) -> Self {
        Self::Text(TextDevice {
            name: name.into(),
            color,
            x,
            y,
        })
    }

    /// Build an image device with an explicit natural size.
    pub fn image(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        (x, y): (i32, i32),
        (width, height): (u32, u32),
    ) -> Self {
        Self::Image(ImageDevice {
            name: name.into(),
            path: path.into(),
            x,
            y,
            width: Some(width),
            height: Some(height),
        })
    }

    /// Display name of either variant.
    pub fn name(&self) -> &str {
        match self {
            Self::Image(d) => &d.name,
            Self::Text(d) => &d.name,
        }
    }

    /// Icon path for image devices.
    pub fn image_path(&self) -> Option<&Path> {
        match self {
            Self::Image(d) => Some(&d.path),
            Self::Text(_) => None,
        }
    }
}

/// Frame overlay tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    /// Gold border.
    Gold,
    /// Silver border.
    Silver,
}

impl FrameKind {
    /// Lowercase identifier, also used as the asset file stem.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameKind {
    type Err = RibbonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(Self::Gold),
            "silver" => Ok(Self::Silver),
            other => Err(RibbonError::validation(format!(
                "unknown frame kind '{other}' (expected gold or silver)"
            ))),
        }
    }
}

/// Free-text metadata attached to a ribbon. Never affects rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RibbonInfo {
    /// Ribbon name.
    pub name: String,
    /// What the award is given for.
    pub award_details: String,
    /// What the attached devices denote.
    pub device_details: String,
}

impl fmt::Display for RibbonInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ribbon Name: {}\n\nAward Details:\n{}\n\nDevice Details:\n{}",
            self.name, self.award_details, self.device_details
        )
    }
}

impl RibbonDocument {
    /// The default empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stripe and return its index.
    pub fn add_stripe(&mut self, stripe: Stripe) -> RibbonResult<usize> {
        stripe.validate()?;
        self.stripes.push(stripe);
        Ok(self.stripes.len() - 1)
    }

    /// Replace the stripe at `index`.
    pub fn edit_stripe(&mut self, index: usize, stripe: Stripe) -> RibbonResult<()> {
        stripe.validate()?;
        let len = self.stripes.len();
        let slot = self
            .stripes
            .get_mut(index)
            .ok_or_else(|| RibbonError::index("stripe", index, len))?;
        *slot = stripe;
        Ok(())
    }

    /// Remove and return the stripe at `index`. Later indices shift down by one.
    pub fn remove_stripe(&mut self, index: usize) -> RibbonResult<Stripe> {
        if index >= self.stripes.len() {
            return Err(RibbonError::index("stripe", index, self.stripes.len()));
        }
        Ok(self.stripes.remove(index))
    }

    /// Flip the `mirrored` flag of the stripe at `index` and return the new value.
    pub fn toggle_stripe_mirror(&mut self, index: usize) -> RibbonResult<bool> {
        let len = self.stripes.len();
        let stripe = self
            .stripes
            .get_mut(index)
            .ok_or_else(|| RibbonError::index("stripe", index, len))?;
        stripe.mirrored = !stripe.mirrored;
        Ok(stripe.mirrored)
    }

    /// Append a device and return its index.
    pub fn add_device(&mut self, device: Device) -> usize {
        self.devices.push(device);
        self.devices.len() - 1
    }

    /// Replace the device at `index`. The variant may change.
    pub fn edit_device(&mut self, index: usize, device: Device) -> RibbonResult<()> {
        let len = self.devices.len();
        let slot = self
            .devices
            .get_mut(index)
            .ok_or_else(|| RibbonError::index("device", index, len))?;
        *slot = device;
        Ok(())
    }

    /// Remove and return the device at `index`. Later indices shift down by one.
    pub fn remove_device(&mut self, index: usize) -> RibbonResult<Device> {
        if index >= self.devices.len() {
            return Err(RibbonError::index("device", index, self.devices.len()));
        }
        Ok(self.devices.remove(index))
    }

    /// Set the background fill.
    pub fn set_background(&mut self, color: Rgb8) {
        self.background = color;
    }

    /// Select a frame tier or remove the frame.
    pub fn set_frame(&mut self, frame: Option<FrameKind>) {
        self.frame = frame;
    }

    /// Set or clear the logo image.
    pub fn set_logo(&mut self, logo: Option<PathBuf>) {
        self.logo = logo;
    }

    /// Enable or disable the texture overlay.
    pub fn set_texture(&mut self, enabled: bool) {
        self.texture_enabled = enabled;
    }

    /// Flip the texture overlay flag and return the new value.
    pub fn toggle_texture(&mut self) -> bool {
        self.texture_enabled = !self.texture_enabled;
        self.texture_enabled
    }

    /// Replace the metadata block.
    pub fn set_ribbon_info(
        &mut self,
        name: impl Into<String>,
        award_details: impl Into<String>,
        device_details: impl Into<String>,
    ) {
        self.info = RibbonInfo {
            name: name.into(),
            award_details: award_details.into(),
            device_details: device_details.into(),
        };
    }

    /// Reset to the default empty document.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when at least one device is a text label.
    pub fn has_text_devices(&self) -> bool {
        self.devices.iter().any(|d| matches!(d, Device::Text(_)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
