use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode as assets_decode,
    assets::library::AssetLibrary,
    document::model::{Device, FrameKind, RibbonDocument},
    foundation::error::{RibbonError, RibbonResult},
    foundation::warning::Warning,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Debug)]
/// Raw font file bytes used for text devices.
pub struct PreparedFont {
    /// Font file contents.
    pub bytes: Arc<Vec<u8>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

#[derive(Clone, Debug, Default)]
/// Immutable set of decoded assets a document needs for rendering.
///
/// All IO happens in [`PreparedAssets::prepare`], so plan compilation and rasterization stay
/// deterministic and IO-free.
pub struct PreparedAssets {
    images: HashMap<PathBuf, PreparedImage>,
    frames: HashMap<FrameKind, PathBuf>,
    font: Option<PreparedFont>,
}

impl PreparedAssets {
    /// Empty store; every image reference will be treated as missing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and decode every asset `doc` references.
    ///
    /// Unreadable assets are reported as [`Warning`]s and left out of the store rather than
    /// failing the whole preparation.
    pub fn prepare(doc: &RibbonDocument, library: &AssetLibrary) -> (Self, Vec<Warning>) {
        let mut out = Self::new();
        let mut warnings = Vec::new();

        for (index, device) in doc.devices.iter().enumerate() {
            let Device::Image(d) = device else {
                continue;
            };
            if let Err(e) = out.load_image(&d.path) {
                tracing::warn!(index, name = %d.name, "device image unavailable: {e}");
                warnings.push(Warning::MissingDeviceImage {
                    index,
                    name: d.name.clone(),
                    path: d.path.clone(),
                });
            }
        }

        if let Some(logo) = &doc.logo {
            if let Err(e) = out.load_image(logo) {
                tracing::warn!("logo unavailable: {e}");
                warnings.push(Warning::MissingLogo { path: logo.clone() });
            }
        }

        if let Some(kind) = doc.frame {
            let path = library.frame_path(kind);
            match out.load_image(&path) {
                Ok(()) => {
                    out.frames.insert(kind, path);
                }
                Err(e) => {
                    tracing::warn!(%kind, "frame overlay unavailable: {e}");
                    warnings.push(Warning::MissingFrame { kind, path });
                }
            }
        }

        if doc.has_text_devices() {
            match library.font_path().map(|p| read_font(&p)) {
                Some(Ok(font)) => out.font = Some(font),
                Some(Err(e)) => {
                    tracing::warn!("font unavailable: {e}");
                    warnings.push(Warning::MissingFont);
                }
                None => {
                    tracing::warn!(root = %library.root().display(), "no font in asset library");
                    warnings.push(Warning::MissingFont);
                }
            }
        }

        (out, warnings)
    }

    /// Register an already decoded image under `path`.
    pub fn insert_image(&mut self, path: impl Into<PathBuf>, image: PreparedImage) {
        self.images.insert(path.into(), image);
    }

    /// Register an already decoded frame overlay.
    pub fn insert_frame(&mut self, kind: FrameKind, path: impl Into<PathBuf>, image: PreparedImage) {
        let path = path.into();
        self.images.insert(path.clone(), image);
        self.frames.insert(kind, path);
    }

    /// Register font bytes for text devices.
    pub fn set_font(&mut self, bytes: Vec<u8>) {
        self.font = Some(PreparedFont {
            bytes: Arc::new(bytes),
        });
    }

    /// Lookup a decoded image by the path it was loaded from.
    pub fn image(&self, path: &Path) -> Option<&PreparedImage> {
        self.images.get(path)
    }

    /// Path of the decoded overlay for a frame tier, if it loaded.
    pub fn frame_source(&self, kind: FrameKind) -> Option<&Path> {
        self.frames.get(&kind).map(PathBuf::as_path)
    }

    /// Font for text devices, if one loaded.
    pub fn font(&self) -> Option<&PreparedFont> {
        self.font.as_ref()
    }

    /// Lookup a decoded image, failing when it was never prepared.
    pub fn require_image(&self, path: &Path) -> RibbonResult<&PreparedImage> {
        self.image(path)
            .ok_or_else(|| RibbonError::asset(format!("image '{}' not prepared", path.display())))
    }

    fn load_image(&mut self, path: &Path) -> RibbonResult<()> {
        if self.images.contains_key(path) {
            return Ok(());
        }
        let image = assets_decode::decode_image_file(path)?;
        self.images.insert(path.to_path_buf(), image);
        Ok(())
    }
}

fn read_font(path: &Path) -> RibbonResult<PreparedFont> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    check_font(&bytes)
        .map_err(|e| RibbonError::asset(format!("font '{}': {e}", path.display())))?;
    Ok(PreparedFont {
        bytes: Arc::new(bytes),
    })
}

/// Fail unless `bytes` hold at least one font family Parley can register.
pub(crate) fn check_font(bytes: &[u8]) -> RibbonResult<()> {
    let mut font_ctx = parley::FontContext::default();
    let families = font_ctx
        .collection
        .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
    if families.is_empty() {
        return Err(RibbonError::asset("no font families registered from font bytes"));
    }
    Ok(())
}

/// Stateful helper for building Parley text layouts from raw font bytes.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and lay out a single unwrapped line of text.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        font_bytes: &[u8],
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> RibbonResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(RibbonError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| RibbonError::asset("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RibbonError::asset("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
