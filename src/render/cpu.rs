use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use image::imageops::FilterType;

use crate::{
    assets::store::{PreparedAssets, PreparedImage, TextBrushRgba8, TextLayoutEngine},
    compile::plan::{DrawOp, RenderPlan, ScenePass, TexturePass},
    effects::composite::{TextureParams, over_in_place, texture_over_in_place},
    foundation::core::{Canvas, Point, Rgb8},
    foundation::error::{RibbonError, RibbonResult},
    render::backend::{FrameRGBA, RenderBackend},
    render::passes::PassBackend,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ScaledKey {
    source: PathBuf,
    width: u32,
    height: u32,
    smooth: bool,
}

/// CPU raster backend powered by `vello_cpu`.
///
/// Scene passes are rasterized into a fresh transparent pixmap and composited over the frame
/// buffer. Images are resampled to their target pixel size up front and drawn 1:1.
pub struct CpuBackend {
    canvas: Canvas,
    smooth: bool,
    frame: Vec<u8>,
    image_cache: HashMap<ScaledKey, vello_cpu::Image>,
    text: TextLayoutEngine,
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuBackend {
    pub fn new() -> Self {
        Self {
            canvas: Canvas::canonical(),
            smooth: false,
            frame: Vec::new(),
            image_cache: HashMap::new(),
            text: TextLayoutEngine::new(),
        }
    }

    fn dims_u16(&self) -> RibbonResult<(u16, u16)> {
        let w: u16 = self
            .canvas
            .width
            .try_into()
            .map_err(|_| RibbonError::validation("canvas width exceeds u16"))?;
        let h: u16 = self
            .canvas
            .height
            .try_into()
            .map_err(|_| RibbonError::validation("canvas height exceeds u16"))?;
        Ok((w, h))
    }
}

impl RenderBackend for CpuBackend {}

impl PassBackend for CpuBackend {
    fn begin(&mut self, plan: &RenderPlan) -> RibbonResult<()> {
        self.canvas = plan.canvas;
        self.smooth = plan.smooth_scaling;
        self.dims_u16()?;
        self.frame.clear();
        self.frame.resize(self.canvas.byte_len(), 0);
        Ok(())
    }

    fn exec_scene(&mut self, pass: &ScenePass, assets: &PreparedAssets) -> RibbonResult<()> {
        let (w, h) = self.dims_u16()?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for op in &pass.ops {
            draw_op(self, &mut ctx, op, assets)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        over_in_place(&mut self.frame, pixmap.data_as_u8_slice())
    }

    fn exec_texture(&mut self, pass: &TexturePass) -> RibbonResult<()> {
        texture_over_in_place(
            &mut self.frame,
            TextureParams {
                width: self.canvas.width,
                height: self.canvas.height,
                spacing: pass.spacing,
                line: pass.line.to_array(),
            },
        )
    }

    fn readback_rgba8(&mut self, plan: &RenderPlan) -> RibbonResult<FrameRGBA> {
        if self.frame.len() != plan.canvas.byte_len() {
            return Err(RibbonError::validation(
                "frame buffer does not match plan canvas",
            ));
        }
        Ok(FrameRGBA {
            width: plan.canvas.width,
            height: plan.canvas.height,
            data: self.frame.clone(),
            premultiplied: true,
        })
    }
}

fn draw_op(
    backend: &mut CpuBackend,
    ctx: &mut vello_cpu::RenderContext,
    op: &DrawOp,
    assets: &PreparedAssets,
) -> RibbonResult<()> {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

    match op {
        DrawOp::FillRect { rect, color } => {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(solid(*color));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                rect.x0, rect.y0, rect.x1, rect.y1,
            ));
            Ok(())
        }
        DrawOp::Image { source, rect, .. } => {
            let w = rect.width().round();
            let h = rect.height().round();
            if w < 1.0 || h < 1.0 {
                return Ok(());
            }
            let paint = backend.scaled_image_for(source, w as u32, h as u32, assets)?;

            ctx.set_transform(vello_cpu::kurbo::Affine::translate((rect.x0, rect.y0)));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            Ok(())
        }
        DrawOp::Text {
            text,
            color,
            origin,
            size_px,
            ..
        } => draw_text(backend, ctx, text, *color, *origin, *size_px, assets),
    }
}

fn draw_text(
    backend: &mut CpuBackend,
    ctx: &mut vello_cpu::RenderContext,
    text: &str,
    color: Rgb8,
    origin: Point,
    size_px: f32,
    assets: &PreparedAssets,
) -> RibbonResult<()> {
    let prepared = assets
        .font()
        .ok_or_else(|| RibbonError::asset("text op without a prepared font"))?;
    let brush = TextBrushRgba8 {
        r: color.r,
        g: color.g,
        b: color.b,
        a: 255,
    };
    let layout = match backend
        .text
        .layout_line(text, prepared.bytes.as_slice(), size_px, brush)
    {
        Ok(layout) => layout,
        Err(e) => {
            tracing::warn!(text, "text device skipped: {e}");
            return Ok(());
        }
    };

    let baseline = first_baseline(&layout);

    let font = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(prepared.bytes.as_ref().clone()),
        0,
    );
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((
        origin.x,
        origin.y - f64::from(baseline),
    )));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));

            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    Ok(())
}

fn first_baseline(layout: &parley::Layout<TextBrushRgba8>) -> f32 {
    for line in layout.lines() {
        for item in line.items() {
            if let parley::layout::PositionedLayoutItem::GlyphRun(run) = item {
                return run.baseline();
            }
        }
    }
    0.0
}

fn solid(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

impl CpuBackend {
    fn scaled_image_for(
        &mut self,
        source: &Path,
        width: u32,
        height: u32,
        assets: &PreparedAssets,
    ) -> RibbonResult<vello_cpu::Image> {
        let key = ScaledKey {
            source: source.to_path_buf(),
            width,
            height,
            smooth: self.smooth,
        };
        if let Some(paint) = self.image_cache.get(&key) {
            return Ok(paint.clone());
        }

        let img = assets.require_image(source)?;
        let pixels = resample_premul(img, width, height, self.smooth)?;

        let pixmap = image_premul_bytes_to_pixmap(&pixels, width, height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(key, paint.clone());
        Ok(paint)
    }
}

/// Resize a premultiplied image, clamping color channels to alpha after filtering.
fn resample_premul(
    img: &PreparedImage,
    width: u32,
    height: u32,
    smooth: bool,
) -> RibbonResult<Vec<u8>> {
    if img.width == width && img.height == height {
        return Ok(img.rgba8_premul.as_ref().clone());
    }
    let buf = image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.as_ref().clone())
        .ok_or_else(|| RibbonError::asset("prepared image byte length mismatch"))?;
    let filter = if smooth {
        FilterType::Lanczos3
    } else {
        FilterType::Nearest
    };
    let mut out = image::imageops::resize(&buf, width, height, filter).into_raw();
    for px in out.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }
    Ok(out)
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> RibbonResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| RibbonError::asset("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| RibbonError::asset("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(RibbonError::asset("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
