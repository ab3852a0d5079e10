use crate::document::model::Stripe;
use crate::foundation::core::{Canvas, Rect};

/// Fraction of the canvas width the device row may occupy before it is shrunk.
pub const DEVICE_ROW_MAX_FRACTION: f64 = 0.8;
/// Rendered device height is capped at `canvas height / DEVICE_HEIGHT_DIVISOR`.
pub const DEVICE_HEIGHT_DIVISOR: f64 = 3.0;
/// Text device font size as a fraction of the canvas height.
pub const TEXT_SIZE_FRACTION: f64 = 0.1;
/// Logo margin (top and bottom) in canonical units.
pub const LOGO_MARGIN: f64 = 20.0;

pub const OUTLINE_DASH: u32 = 4;
pub const OUTLINE_GAP: u32 = 2;

/// Pixel span of a stripe and of its optional mirror image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripeSpans {
    pub primary: Rect,
    pub mirror: Option<Rect>,
}

/// Scale a stripe from canonical units to `canvas` and span it over the full height.
///
/// The mirror sits at `W - scaled_offset - scaled_width`. Spans may extend past the canvas; the
/// rasterizer clips them.
pub fn stripe_spans(stripe: &Stripe, canvas: Canvas) -> StripeSpans {
    let sx = canvas.scale_x();
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);

    let x = (f64::from(stripe.offset) * sx).round();
    let sw = (f64::from(stripe.width) * sx).round();

    let primary = Rect::new(x, 0.0, x + sw, h);
    let mirror = stripe.mirrored.then(|| {
        let mx = w - x - sw;
        Rect::new(mx, 0.0, mx + sw, h)
    });
    StripeSpans { primary, mirror }
}

/// Natural (unscaled-by-layout) size of one image device in target pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceBox {
    pub index: usize,
    pub width: f64,
    pub height: f64,
}

/// Lay image devices out in a single centered row.
///
/// If the summed width exceeds [`DEVICE_ROW_MAX_FRACTION`] of the canvas width, every device
/// is shrunk by the same factor. Each height is then capped at `H / 3` with aspect preserved.
/// Devices abut left to right and are centered vertically one by one.
pub fn layout_device_row(boxes: &[DeviceBox], canvas: Canvas) -> Vec<(usize, Rect)> {
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);

    let total: f64 = boxes.iter().map(|b| b.width).sum();
    let limit = cw * DEVICE_ROW_MAX_FRACTION;
    let shared = if total > limit && total > 0.0 {
        limit / total
    } else {
        1.0
    };

    let max_h = ch / DEVICE_HEIGHT_DIVISOR;
    let sized: Vec<(usize, f64, f64)> = boxes
        .iter()
        .map(|b| {
            let mut w = b.width * shared;
            let mut h = b.height * shared;
            if h > max_h && h > 0.0 {
                w *= max_h / h;
                h = max_h;
            }
            (b.index, w, h)
        })
        .collect();

    let row_w: f64 = sized.iter().map(|(_, w, _)| *w).sum();
    let mut x = (cw - row_w) / 2.0;
    let mut out = Vec::with_capacity(sized.len());
    for (index, w, h) in sized {
        let y = (ch - h) / 2.0;
        out.push((index, Rect::new(x, y, x + w, y + h)));
        x += w;
    }
    out
}

/// Logo placement: scaled to height `H - 2 * margin`, centered horizontally.
pub fn logo_rect(image_width: u32, image_height: u32, canvas: Canvas) -> Option<Rect> {
    if image_width == 0 || image_height == 0 {
        return None;
    }
    let sy = canvas.scale_y();
    let target_h = f64::from(canvas.height) - 2.0 * LOGO_MARGIN * sy;
    if target_h <= 0.0 {
        return None;
    }
    let target_w = f64::from(image_width) * target_h / f64::from(image_height);
    let x = (f64::from(canvas.width) - target_w) / 2.0;
    let y = LOGO_MARGIN * sy;
    Some(Rect::new(x, y, x + target_w, y + target_h))
}

/// Snap a layout rect to whole pixels.
///
/// Edges are rounded independently so abutting rects stay abutting.
pub fn snap(rect: Rect) -> Rect {
    Rect::new(
        rect.x0.round(),
        rect.y0.round(),
        rect.x1.round(),
        rect.y1.round(),
    )
}

/// One-pixel dashed rectangle along the canvas border, as a list of filled segments.
pub fn outline_dashes(canvas: Canvas) -> Vec<Rect> {
    let w = canvas.width;
    let h = canvas.height;
    let step = (OUTLINE_DASH + OUTLINE_GAP) as usize;
    let mut out = Vec::new();

    for x in (0..w).step_by(step) {
        let x1 = (x + OUTLINE_DASH).min(w);
        out.push(Rect::new(f64::from(x), 0.0, f64::from(x1), 1.0));
        if h > 1 {
            out.push(Rect::new(
                f64::from(x),
                f64::from(h - 1),
                f64::from(x1),
                f64::from(h),
            ));
        }
    }
    for y in (0..h).step_by(step) {
        let y1 = (y + OUTLINE_DASH).min(h);
        out.push(Rect::new(0.0, f64::from(y), 1.0, f64::from(y1)));
        if w > 1 {
            out.push(Rect::new(
                f64::from(w - 1),
                f64::from(y),
                f64::from(w),
                f64::from(y1),
            ));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/compile/layout.rs"]
mod tests;
