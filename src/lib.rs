//! Ribbon Forge composes military-ribbon-style decorations and renders them to pixels.
//!
//! A [`RibbonDocument`] holds a background color, vertical stripes, devices (icons or text
//! labels), an optional frame and logo, a texture flag and display-only metadata. Rendering is a
//! deterministic function of the document and the read-only asset files it references:
//!
//! - [`PreparedAssets::prepare`] decodes every referenced image and font up front
//! - [`compile_ribbon`] turns the document into a [`RenderPlan`] for a target [`Canvas`]
//! - [`CpuBackend`] rasterizes the plan into premultiplied RGBA8
//!
//! [`render`], [`render_preview`] and [`export_png`] wrap those steps. [`Editor`] adds undo
//! history and asset-library lookups on top of the plain document API.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod compile;
pub(crate) mod document;
pub(crate) mod effects;
pub(crate) mod render;
pub(crate) mod session;

pub use crate::foundation::core::{
    CANONICAL_HEIGHT, CANONICAL_WIDTH, Canvas, Point, Rect, Rgb8, Rgba8Premul,
};
pub use crate::foundation::error::{RibbonError, RibbonResult};
pub use crate::foundation::warning::Warning;

pub use crate::assets::decode::{decode_image, decode_image_file, image_dimensions};
pub use crate::assets::library::{AssetLibrary, DeviceAsset};
pub use crate::assets::store::{PreparedAssets, PreparedFont, PreparedImage};
pub use crate::compile::plan::{
    DrawOp, ImageRole, Pass, RenderOpts, RenderPlan, ScenePass, TexturePass, compile_ribbon,
};
pub use crate::document::codec::{LoadedDocument, deserialize, load_json, save_json, serialize};
pub use crate::document::history::{History, HistoryOpts};
pub use crate::document::input::{
    Capture, DEVICE_HEIGHT, ImageDeviceDraft, StripeDraft, TextDeviceDraft,
};
pub use crate::document::model::{
    Device, FrameKind, ImageDevice, RibbonDocument, RibbonInfo, Stripe, TextDevice,
};
pub use crate::render::backend::{FrameRGBA, RenderBackend};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::passes::{PassBackend, execute_plan};
pub use crate::render::pipeline::{
    ExportOpts, Rendered, downscale, export_png, render, render_export, render_preview,
    render_with_assets, write_png,
};
pub use crate::session::editor::Editor;
