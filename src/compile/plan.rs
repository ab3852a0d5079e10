use std::{collections::HashMap, path::PathBuf};

use crate::{
    assets::store::PreparedAssets,
    compile::layout::{self, DeviceBox},
    document::model::{Device, RibbonDocument},
    foundation::core::{Canvas, Point, Rect, Rgb8, Rgba8Premul},
    foundation::error::RibbonResult,
};

/// Dashed outline color (`#c0c0c0`).
pub const OUTLINE_COLOR: Rgb8 = Rgb8::new(0xc0, 0xc0, 0xc0);
/// Row spacing of the texture overlay.
pub const TEXTURE_SPACING: u32 = 2;
/// Alpha of each texture line.
pub const TEXTURE_ALPHA: u8 = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Render-time switches.
pub struct RenderOpts {
    /// Draw the dashed border outline on top of everything.
    pub draw_outline: bool,
    /// Leave out every device, image and text alike.
    pub exclude_devices: bool,
    /// Resample images with a smooth filter instead of nearest neighbour.
    pub smooth_scaling: bool,
}

impl RenderOpts {
    /// Interactive preview: outline on, fast scaling.
    pub const fn preview() -> Self {
        Self {
            draw_outline: true,
            exclude_devices: false,
            smooth_scaling: false,
        }
    }

    /// Published export: no outline, smooth scaling.
    pub const fn export() -> Self {
        Self {
            draw_outline: false,
            exclude_devices: false,
            smooth_scaling: true,
        }
    }
}

#[derive(Clone, Debug)]
/// Backend-agnostic render plan for one ribbon image.
///
/// Passes run in order. Each [`ScenePass`] is rasterized on its own and composited over what
/// came before; a [`TexturePass`] modifies the accumulated pixels directly.
pub struct RenderPlan {
    pub canvas: Canvas,
    pub passes: Vec<Pass>,
    pub smooth_scaling: bool,
}

#[derive(Clone, Debug)]
/// A single pass in a [`RenderPlan`].
pub enum Pass {
    Scene(ScenePass),
    Texture(TexturePass),
}

#[derive(Clone, Debug, Default)]
/// Draw operations rasterized together.
pub struct ScenePass {
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Horizontal line overlay on every `spacing`-th row.
pub struct TexturePass {
    pub spacing: u32,
    pub line: Rgba8Premul,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// What an image draw op depicts.
pub enum ImageRole {
    Device(usize),
    Logo,
    Frame,
}

#[derive(Clone, Debug)]
/// Draw operation emitted by the compiler. Coordinates are target pixels.
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Rgb8,
    },
    /// Image resampled to exactly fill `rect`, which is pixel-aligned.
    Image {
        role: ImageRole,
        source: PathBuf,
        rect: Rect,
    },
    /// Single line of text with its left baseline at `origin`.
    Text {
        device: usize,
        text: String,
        color: Rgb8,
        origin: Point,
        size_px: f32,
    },
}

/// Compile a document into a render plan for `canvas`.
///
/// Elements whose assets are missing from `assets` are skipped; [`PreparedAssets::prepare`]
/// already reported them.
pub fn compile_ribbon(
    doc: &RibbonDocument,
    assets: &PreparedAssets,
    canvas: Canvas,
    opts: &RenderOpts,
) -> RibbonResult<RenderPlan> {
    let mut passes = Vec::new();

    let mut base = ScenePass::default();
    base.ops.push(DrawOp::FillRect {
        rect: canvas.rect(),
        color: doc.background,
    });
    for stripe in &doc.stripes {
        stripe.validate()?;
        let spans = layout::stripe_spans(stripe, canvas);
        base.ops.push(DrawOp::FillRect {
            rect: spans.primary,
            color: stripe.color,
        });
        if let Some(mirror) = spans.mirror {
            base.ops.push(DrawOp::FillRect {
                rect: mirror,
                color: stripe.color,
            });
        }
    }
    passes.push(Pass::Scene(base));

    if doc.texture_enabled {
        passes.push(Pass::Texture(TexturePass {
            spacing: TEXTURE_SPACING,
            line: Rgba8Premul {
                r: 0,
                g: 0,
                b: 0,
                a: TEXTURE_ALPHA,
            },
        }));
    }

    let mut overlay = ScenePass::default();
    if !opts.exclude_devices {
        push_devices(doc, assets, canvas, &mut overlay.ops);
    }

    if let Some(logo) = &doc.logo
        && let Some(img) = assets.image(logo)
        && let Some(rect) = layout::logo_rect(img.width, img.height, canvas)
    {
        overlay.ops.push(DrawOp::Image {
            role: ImageRole::Logo,
            source: logo.clone(),
            rect: layout::snap(rect),
        });
    }

    if let Some(kind) = doc.frame
        && let Some(source) = assets.frame_source(kind)
    {
        overlay.ops.push(DrawOp::Image {
            role: ImageRole::Frame,
            source: source.to_path_buf(),
            rect: canvas.rect(),
        });
    }

    if opts.draw_outline {
        for rect in layout::outline_dashes(canvas) {
            overlay.ops.push(DrawOp::FillRect {
                rect,
                color: OUTLINE_COLOR,
            });
        }
    }

    if !overlay.ops.is_empty() {
        passes.push(Pass::Scene(overlay));
    }

    Ok(RenderPlan {
        canvas,
        passes,
        smooth_scaling: opts.smooth_scaling,
    })
}

fn push_devices(
    doc: &RibbonDocument,
    assets: &PreparedAssets,
    canvas: Canvas,
    ops: &mut Vec<DrawOp>,
) {
    let sx = canvas.scale_x();
    let sy = canvas.scale_y();

    let boxes: Vec<DeviceBox> = doc
        .devices
        .iter()
        .enumerate()
        .filter_map(|(index, device)| match device {
            Device::Image(d) => {
                let img = assets.image(&d.path)?;
                let (w, h) = d.natural_size(img.width, img.height)?;
                Some(DeviceBox {
                    index,
                    width: f64::from(w) * sx,
                    height: f64::from(h) * sy,
                })
            }
            Device::Text(_) => None,
        })
        .collect();

    let slots: HashMap<usize, Rect> = layout::layout_device_row(&boxes, canvas)
        .into_iter()
        .collect();
    let size_px = (f64::from(canvas.height) * layout::TEXT_SIZE_FRACTION) as f32;

    for (index, device) in doc.devices.iter().enumerate() {
        match device {
            Device::Image(d) => {
                let Some(rect) = slots.get(&index).copied().map(layout::snap) else {
                    continue;
                };
                if rect.width() < 1.0 || rect.height() < 1.0 {
                    continue;
                }
                ops.push(DrawOp::Image {
                    role: ImageRole::Device(index),
                    source: d.path.clone(),
                    rect,
                });
            }
            Device::Text(t) => {
                if t.name.is_empty() || assets.font().is_none() {
                    continue;
                }
                ops.push(DrawOp::Text {
                    device: index,
                    text: t.name.clone(),
                    color: t.color,
                    origin: Point::new(f64::from(t.x) * sx, f64::from(t.y) * sy),
                    size_px,
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
