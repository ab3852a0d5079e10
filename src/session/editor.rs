use std::path::{Path, PathBuf};

use crate::{
    assets::decode::image_dimensions,
    assets::library::AssetLibrary,
    document::codec,
    document::history::{History, HistoryOpts},
    document::input::{Capture, ImageDeviceDraft, StripeDraft, TextDeviceDraft},
    document::model::{Device, FrameKind, RibbonDocument, Stripe},
    foundation::core::Rgb8,
    foundation::error::{RibbonError, RibbonResult},
    foundation::warning::Warning,
    render::pipeline::{self, ExportOpts, Rendered},
};

/// Editing session: the working document, its undo history and the asset library.
///
/// Every successful mutation records the pre-mutation document so it can be undone. A failed
/// mutation leaves both the document and the history untouched.
#[derive(Clone, Debug)]
pub struct Editor {
    document: RibbonDocument,
    history: History,
    library: AssetLibrary,
}

impl Editor {
    pub fn new(library: AssetLibrary) -> Self {
        Self::with_history(library, HistoryOpts::default())
    }

    pub fn with_history(library: AssetLibrary, opts: HistoryOpts) -> Self {
        Self {
            document: RibbonDocument::new(),
            history: History::new(opts),
            library,
        }
    }

    /// Current document.
    pub fn document(&self) -> &RibbonDocument {
        &self.document
    }

    pub fn library(&self) -> &AssetLibrary {
        &self.library
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    fn mutate<R>(
        &mut self,
        f: impl FnOnce(&mut RibbonDocument) -> RibbonResult<R>,
    ) -> RibbonResult<R> {
        let before = self.document.clone();
        match f(&mut self.document) {
            Ok(out) => {
                self.history.record(&before);
                Ok(out)
            }
            Err(e) => {
                self.document = before;
                Err(e)
            }
        }
    }

    pub fn add_stripe(&mut self, stripe: Stripe) -> RibbonResult<usize> {
        self.mutate(|doc| doc.add_stripe(stripe))
    }

    pub fn edit_stripe(&mut self, index: usize, stripe: Stripe) -> RibbonResult<()> {
        self.mutate(|doc| doc.edit_stripe(index, stripe))
    }

    pub fn remove_stripe(&mut self, index: usize) -> RibbonResult<Stripe> {
        self.mutate(|doc| doc.remove_stripe(index))
    }

    pub fn toggle_stripe_mirror(&mut self, index: usize) -> RibbonResult<bool> {
        self.mutate(|doc| doc.toggle_stripe_mirror(index))
    }

    /// Add a stripe from captured input. A cancelled capture changes nothing and returns `None`.
    pub fn add_stripe_capture(
        &mut self,
        capture: Capture<StripeDraft>,
    ) -> RibbonResult<Option<usize>> {
        capture.apply(|draft| self.add_stripe(draft.into_stripe()?))
    }

    /// Replace the stripe at `index` from captured input.
    pub fn edit_stripe_capture(
        &mut self,
        index: usize,
        capture: Capture<StripeDraft>,
    ) -> RibbonResult<Option<()>> {
        capture.apply(|draft| self.edit_stripe(index, draft.into_stripe()?))
    }

    /// Add a text label from captured input.
    pub fn add_text_device_capture(
        &mut self,
        capture: Capture<TextDeviceDraft>,
    ) -> RibbonResult<Option<usize>> {
        capture.apply(|draft| self.add_device(draft.into_device()?))
    }

    pub fn add_device(&mut self, device: Device) -> RibbonResult<usize> {
        self.mutate(|doc| Ok(doc.add_device(device)))
    }

    /// Add the library icon called `name` (file stem, case-insensitive) as an image device.
    pub fn add_library_device(&mut self, name: &str) -> RibbonResult<usize> {
        let asset = self
            .library
            .find_device(name)?
            .ok_or_else(|| RibbonError::asset(format!("no device icon named '{name}'")))?;
        let (w, h) = image_dimensions(&asset.path)?;
        let device = ImageDeviceDraft {
            name: asset.name,
            path: asset.path,
        }
        .into_device(w, h)?;
        self.add_device(device)
    }

    pub fn edit_device(&mut self, index: usize, device: Device) -> RibbonResult<()> {
        self.mutate(|doc| doc.edit_device(index, device))
    }

    pub fn remove_device(&mut self, index: usize) -> RibbonResult<Device> {
        self.mutate(|doc| doc.remove_device(index))
    }

    pub fn set_background(&mut self, color: Rgb8) {
        self.record_infallible(|doc| doc.set_background(color));
    }

    /// Select a frame tier. Falls back to no frame when the library has no overlay for it.
    ///
    /// Returns the frame actually applied.
    pub fn set_frame(&mut self, frame: Option<FrameKind>) -> Option<FrameKind> {
        let applied = frame.filter(|&kind| {
            let found = self.library.resolve_frame(kind).is_some();
            if !found {
                tracing::warn!(%kind, "frame overlay missing, using no frame");
            }
            found
        });
        self.record_infallible(|doc| doc.set_frame(applied));
        applied
    }

    pub fn set_logo(&mut self, logo: Option<PathBuf>) {
        self.record_infallible(|doc| doc.set_logo(logo));
    }

    /// Use the library's fixed logo image.
    pub fn use_library_logo(&mut self) -> RibbonResult<PathBuf> {
        let path = self.library.logo_path();
        if !path.is_file() {
            return Err(RibbonError::asset(format!(
                "logo file '{}' not found",
                path.display()
            )));
        }
        let path = std::path::absolute(&path).unwrap_or(path);
        self.set_logo(Some(path.clone()));
        Ok(path)
    }

    pub fn set_texture(&mut self, enabled: bool) {
        self.record_infallible(|doc| doc.set_texture(enabled));
    }

    pub fn toggle_texture(&mut self) -> bool {
        self.record_infallible(RibbonDocument::toggle_texture)
    }

    pub fn set_ribbon_info(
        &mut self,
        name: impl Into<String>,
        award_details: impl Into<String>,
        device_details: impl Into<String>,
    ) {
        let (name, award, device) = (name.into(), award_details.into(), device_details.into());
        self.record_infallible(|doc| doc.set_ribbon_info(name, award, device));
    }

    /// Reset to an empty document. Undoable.
    pub fn clear(&mut self) {
        self.record_infallible(RibbonDocument::clear);
    }

    /// Restore the state before the most recent mutation. Returns `false` when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(doc) => {
                self.document = doc;
                true
            }
            None => false,
        }
    }

    /// Replace the document with the one stored at `path`.
    ///
    /// On failure the current document is kept as is.
    pub fn import(&mut self, path: impl AsRef<Path>) -> RibbonResult<Vec<Warning>> {
        let loaded = codec::load_json(path)?;
        let before = std::mem::replace(&mut self.document, loaded.document);
        self.history.record(&before);
        Ok(loaded.warnings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> RibbonResult<()> {
        codec::save_json(&self.document, path)
    }

    /// Render the interactive preview.
    pub fn preview(&mut self) -> RibbonResult<Rendered> {
        let rendered = pipeline::render_preview(&self.document, &self.library)?;
        self.drop_missing_frame(&rendered.warnings);
        Ok(rendered)
    }

    /// Export the document as a PNG at the published resolution.
    pub fn export_png(
        &mut self,
        out: impl AsRef<Path>,
        opts: &ExportOpts,
    ) -> RibbonResult<Vec<Warning>> {
        let warnings = pipeline::export_png(&self.document, &self.library, out.as_ref(), opts)?;
        self.drop_missing_frame(&warnings);
        Ok(warnings)
    }

    fn drop_missing_frame(&mut self, warnings: &[Warning]) {
        if warnings
            .iter()
            .any(|w| matches!(w, Warning::MissingFrame { .. }))
        {
            self.document.frame = None;
        }
    }

    fn record_infallible<R>(&mut self, f: impl FnOnce(&mut RibbonDocument) -> R) -> R {
        let before = self.document.clone();
        let out = f(&mut self.document);
        self.history.record(&before);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
