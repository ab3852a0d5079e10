use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    assets::store::PreparedAssets,
    compile::plan::RenderPlan,
    foundation::error::{RibbonError, RibbonResult},
    render::passes::{PassBackend, execute_plan},
};

/// A rendered ribbon as RGBA8 pixels.
///
/// Backends produce **premultiplied** pixels; resampled exports are straight alpha. The
/// `premultiplied` flag makes this explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert into a straight-alpha `image` buffer.
    pub fn to_rgba_image(&self) -> RibbonResult<image::RgbaImage> {
        let mut data = self.data.clone();
        if self.premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| RibbonError::asset("frame byte length does not match its dimensions"))
    }
}

/// A renderer that can execute a compiled [`RenderPlan`] into a [`FrameRGBA`].
///
/// Most users do not call [`RenderBackend::render_plan`] directly; prefer [`crate::render`] and
/// friends, which prepare assets and compile the plan.
pub trait RenderBackend: PassBackend {
    /// Execute a [`RenderPlan`] and read back the final frame.
    fn render_plan(
        &mut self,
        plan: &RenderPlan,
        assets: &PreparedAssets,
    ) -> RibbonResult<FrameRGBA> {
        execute_plan(self, plan, assets)
    }
}
