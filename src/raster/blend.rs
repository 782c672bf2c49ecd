//! Per-pixel Porter-Duff operators on straight-alpha RGBA8
//!
//! Only the three operators the editor needs are provided:
//!
//! - `src_over`: `Da' = Sa + Da.(1 - Sa)`, colors weighted by their alpha
//! - `dst_out`: `Da' = Da.(1 - Sa)`, destination color untouched
//! - `dst_in`: `Da' = Da.Sa`, destination color untouched

use image::Rgba;

/// `a * b / 255`, rounded to nearest
#[inline]
#[must_use]
pub fn mul_div255(a: u8, b: u8) -> u8 {
    ((u32::from(a) * u32::from(b) + 127) / 255) as u8
}

#[inline]
#[must_use]
pub fn src_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 255 {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    // Output alpha scaled by 255
    let weight = sa * 255 + da * inv;
    if weight == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let numer = u32::from(s) * sa * 255 + u32::from(d) * da * inv;
        ((numer + weight / 2) / weight) as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        ((weight + 127) / 255) as u8,
    ])
}

#[inline]
#[must_use]
pub fn dst_out(dst: Rgba<u8>, src_alpha: u8) -> Rgba<u8> {
    Rgba([dst[0], dst[1], dst[2], mul_div255(dst[3], 255 - src_alpha)])
}

#[inline]
#[must_use]
pub fn dst_in(dst: Rgba<u8>, src_alpha: u8) -> Rgba<u8> {
    Rgba([dst[0], dst[1], dst[2], mul_div255(dst[3], src_alpha)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div255_extremes() {
        for v in [0u8, 1, 77, 128, 254, 255] {
            assert_eq!(mul_div255(v, 255), v);
            assert_eq!(mul_div255(255, v), v);
            assert_eq!(mul_div255(v, 0), 0);
        }
        assert_eq!(mul_div255(128, 128), 64);
    }

    #[test]
    fn test_src_over_opaque_and_transparent_sources() {
        let dst = Rgba([10, 20, 30, 255]);
        assert_eq!(src_over(dst, Rgba([200, 100, 50, 255])), Rgba([200, 100, 50, 255]));
        assert_eq!(src_over(dst, Rgba([200, 100, 50, 0])), dst);
    }

    #[test]
    fn test_src_over_half_alpha_on_opaque() {
        let out = src_over(Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 128]));
        assert_eq!(out[3], 255);
        assert!((127..=129).contains(&out[0]));
        assert_eq!(out[0], out[1]);
        assert_eq!(out[1], out[2]);
    }

    #[test]
    fn test_src_over_onto_transparent_keeps_source() {
        let src = Rgba([90, 180, 45, 77]);
        assert_eq!(src_over(Rgba([0, 0, 0, 0]), src), src);
    }

    #[test]
    fn test_dst_out_and_dst_in_leave_color() {
        let dst = Rgba([12, 34, 56, 200]);
        assert_eq!(dst_out(dst, 255), Rgba([12, 34, 56, 0]));
        assert_eq!(dst_out(dst, 0), dst);
        assert_eq!(dst_in(dst, 255), dst);
        assert_eq!(dst_in(dst, 0), Rgba([12, 34, 56, 0]));
    }
}
