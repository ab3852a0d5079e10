use std::path::Path;

use anyhow::Context;
use image::imageops::FilterType;

use crate::{
    assets::library::AssetLibrary,
    assets::store::PreparedAssets,
    compile::plan::{RenderOpts, compile_ribbon},
    document::model::RibbonDocument,
    foundation::core::Canvas,
    foundation::error::RibbonResult,
    foundation::warning::Warning,
    render::backend::{FrameRGBA, RenderBackend},
    render::cpu::CpuBackend,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Published export resolution.
pub struct ExportOpts {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl Default for ExportOpts {
    fn default() -> Self {
        let preview = Canvas::preview();
        Self {
            width: preview.width,
            height: preview.height,
        }
    }
}

#[derive(Clone, Debug)]
/// Pixels plus the problems met while producing them.
pub struct Rendered {
    pub frame: FrameRGBA,
    pub warnings: Vec<Warning>,
}

/// Prepare assets + compile + rasterize one ribbon image.
///
/// This is the primary one-shot API. Missing assets never fail the render; they are reported in
/// [`Rendered::warnings`] and the affected element is left out.
///
/// Returns a [`FrameRGBA`] containing **premultiplied** RGBA8 pixels.
#[tracing::instrument(skip(doc, library), fields(stripes = doc.stripes.len(), devices = doc.devices.len()))]
pub fn render(
    doc: &RibbonDocument,
    library: &AssetLibrary,
    canvas: Canvas,
    opts: &RenderOpts,
) -> RibbonResult<Rendered> {
    let (assets, warnings) = PreparedAssets::prepare(doc, library);
    let frame = render_with_assets(doc, &assets, canvas, opts)?;
    Ok(Rendered { frame, warnings })
}

/// Compile + rasterize against already prepared assets. Performs no IO.
pub fn render_with_assets(
    doc: &RibbonDocument,
    assets: &PreparedAssets,
    canvas: Canvas,
    opts: &RenderOpts,
) -> RibbonResult<FrameRGBA> {
    let plan = compile_ribbon(doc, assets, canvas, opts)?;
    tracing::debug!(passes = plan.passes.len(), "compiled render plan");
    let mut backend = CpuBackend::new();
    backend.render_plan(&plan, assets)
}

/// Interactive preview: half-size canvas with the dashed outline.
pub fn render_preview(doc: &RibbonDocument, library: &AssetLibrary) -> RibbonResult<Rendered> {
    render(doc, library, Canvas::preview(), &RenderOpts::preview())
}

/// Render at the canonical resolution with smooth scaling, then downscale to `opts`.
///
/// The returned frame is straight alpha.
pub fn render_export(
    doc: &RibbonDocument,
    library: &AssetLibrary,
    opts: &ExportOpts,
) -> RibbonResult<Rendered> {
    let target = Canvas::new(opts.width, opts.height)?;
    let Rendered { frame, warnings } =
        render(doc, library, Canvas::canonical(), &RenderOpts::export())?;
    let frame = downscale(&frame, target)?;
    Ok(Rendered { frame, warnings })
}

/// Resample a frame to `target` with Lanczos3. Output is straight alpha.
pub fn downscale(frame: &FrameRGBA, target: Canvas) -> RibbonResult<FrameRGBA> {
    let src = frame.to_rgba_image()?;
    let out = if (frame.width, frame.height) == (target.width, target.height) {
        src
    } else {
        image::imageops::resize(&src, target.width, target.height, FilterType::Lanczos3)
    };
    Ok(FrameRGBA {
        width: out.width(),
        height: out.height(),
        data: out.into_raw(),
        premultiplied: false,
    })
}

/// Encode a frame as PNG, creating parent directories as needed.
pub fn write_png(frame: &FrameRGBA, out: &Path) -> RibbonResult<()> {
    let img = frame.to_rgba_image()?;
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        out,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

/// Export `doc` as a PNG at the published resolution.
pub fn export_png(
    doc: &RibbonDocument,
    library: &AssetLibrary,
    out: &Path,
    opts: &ExportOpts,
) -> RibbonResult<Vec<Warning>> {
    let Rendered { frame, warnings } = render_export(doc, library, opts)?;
    write_png(&frame, out)?;
    tracing::debug!(out = %out.display(), "wrote png");
    Ok(warnings)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
