use crate::foundation::error::{RibbonError, RibbonResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        out[i] = src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8]) -> RibbonResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RibbonError::asset(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Parameters of the procedural line texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureParams {
    pub width: u32,
    pub height: u32,
    /// Distance between line starts, in rows. Lines are 1 row tall.
    pub spacing: u32,
    /// Line color, premultiplied.
    pub line: PremulRgba8,
}

/// Composite horizontal 1-pixel lines (rows `0, spacing, 2*spacing, ...`) over `dst`.
pub fn texture_over_in_place(dst: &mut [u8], params: TextureParams) -> RibbonResult<()> {
    let TextureParams {
        width,
        height,
        spacing,
        line,
    } = params;
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RibbonError::asset("texture buffer size overflow"))?;
    if dst.len() != expected_len {
        return Err(RibbonError::asset(
            "texture_over_in_place expects a buffer matching width*height*4",
        ));
    }
    if spacing == 0 {
        return Err(RibbonError::validation("texture line spacing must be > 0"));
    }

    let row_len = (width as usize) * 4;
    for y in (0..height as usize).step_by(spacing as usize) {
        let row = &mut dst[y * row_len..(y + 1) * row_len];
        for d in row.chunks_exact_mut(4) {
            let out = over([d[0], d[1], d[2], d[3]], line);
            d.copy_from_slice(&out);
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
