use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::document::model::FrameKind;
use crate::foundation::error::RibbonResult;

/// On-disk layout of the selectable assets.
///
/// ```text
/// <root>/devices/*.png       selectable device icons
/// <root>/frames/gold.png     frame overlays keyed by tier
/// <root>/frames/silver.png
/// <root>/logo/logo.png       the fixed logo
/// <root>/fonts/*.ttf|otf     first match is used for text devices
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetLibrary {
    root: PathBuf,
}

/// A selectable device icon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceAsset {
    /// File stem, used as the device name.
    pub name: String,
    /// Full icon path.
    pub path: PathBuf,
}

const ICON_EXTS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];
const FONT_EXTS: &[&str] = &["ttf", "otf", "ttc"];

impl AssetLibrary {
    /// Library rooted at `root`. Nothing is read until an asset is requested.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Expected overlay path for a frame tier.
    pub fn frame_path(&self, kind: FrameKind) -> PathBuf {
        self.root.join("frames").join(format!("{}.png", kind.as_str()))
    }

    /// Frame overlay path, only when the file exists.
    pub fn resolve_frame(&self, kind: FrameKind) -> Option<PathBuf> {
        let p = self.frame_path(kind);
        p.is_file().then_some(p)
    }

    /// Expected path of the fixed logo.
    pub fn logo_path(&self) -> PathBuf {
        self.root.join("logo").join("logo.png")
    }

    /// Directory scanned by [`AssetLibrary::available_devices`].
    pub fn devices_dir(&self) -> PathBuf {
        self.root.join("devices")
    }

    /// Enumerate device icons sorted by name. A missing directory yields an empty list.
    pub fn available_devices(&self) -> RibbonResult<Vec<DeviceAsset>> {
        let dir = self.devices_dir();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "device directory missing");
            return Ok(Vec::new());
        }
        let mut out: Vec<DeviceAsset> = files_with_ext(&dir, ICON_EXTS)?
            .into_iter()
            .filter_map(|path| {
                let name = path.file_stem()?.to_string_lossy().into_owned();
                Some(DeviceAsset { name, path })
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    /// Look up a device icon by name (case-insensitive).
    pub fn find_device(&self, name: &str) -> RibbonResult<Option<DeviceAsset>> {
        Ok(self
            .available_devices()?
            .into_iter()
            .find(|d| d.name.eq_ignore_ascii_case(name)))
    }

    /// First font file in `<root>/fonts`, by file name.
    pub fn font_path(&self) -> Option<PathBuf> {
        let dir = self.root.join("fonts");
        let mut fonts = files_with_ext(&dir, FONT_EXTS).ok()?;
        fonts.sort();
        fonts.into_iter().next()
    }
}

impl Default for AssetLibrary {
    fn default() -> Self {
        Self::new("assets")
    }
}

fn files_with_ext(dir: &Path, exts: &[&str]) -> RibbonResult<Vec<PathBuf>> {
    let rd = std::fs::read_dir(dir).with_context(|| format!("read dir '{}'", dir.display()))?;

    let mut out = Vec::new();
    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if exts.contains(&ext.as_str()) {
            out.push(path);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/library.rs"]
mod tests;
