//! Packed `0xAARRGGBB` color helpers

/// Fully opaque black
pub const BLACK: u32 = 0xFF00_0000;
/// Fully opaque white
pub const WHITE: u32 = 0xFFFF_FFFF;

/// Build an opaque color from 8-bit channels
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Build a color with explicit alpha
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Force the alpha channel to 0xFF (config colors are written as 0xRRGGBB)
#[inline]
pub const fn opaque(color: u32) -> u32 {
    color | 0xFF00_0000
}

#[inline]
pub const fn alpha(color: u32) -> u8 {
    (color >> 24) as u8
}

#[inline]
pub const fn channels(color: u32) -> (u8, u8, u8) {
    ((color >> 16) as u8, (color >> 8) as u8, color as u8)
}

/// Blend `src` over `dst` with coverage `a` (0..=255). The result is opaque.
#[inline]
pub fn blend(dst: u32, src: u32, a: u8) -> u32 {
    match a {
        0 => dst,
        255 => opaque(src),
        _ => {
            let a = a as u32;
            let inv = 255 - a;
            let (sr, sg, sb) = channels(src);
            let (dr, dg, db) = channels(dst);
            let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
            rgb(mix(sr, dr), mix(sg, dg), mix(sb, db))
        }
    }
}

/// Blend `src` over `dst` using the source's own alpha channel
#[inline]
pub fn over(dst: u32, src: u32) -> u32 {
    blend(dst, src, alpha(src))
}

/// Linear interpolation between two colors; `t` runs 0..=`max`
pub fn lerp(from: u32, to: u32, t: u32, max: u32) -> u32 {
    if max == 0 {
        return opaque(from);
    }
    let t = t.min(max);
    let (fr, fg, fb) = channels(from);
    let (tr, tg, tb) = channels(to);
    let mix = |f: u8, to: u8| {
        let f = f as i32;
        let to = to as i32;
        (f + (to - f) * t as i32 / max as i32) as u8
    };
    rgb(mix(fr, tr), mix(fg, tg), mix(fb, tb))
}

/// Move every channel `amount` steps towards white
pub fn lighten(color: u32, amount: u8) -> u32 {
    let (r, g, b) = channels(color);
    rgb(
        r.saturating_add(amount),
        g.saturating_add(amount),
        b.saturating_add(amount),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_extremes() {
        assert_eq!(blend(rgb(10, 20, 30), WHITE, 0), rgb(10, 20, 30));
        assert_eq!(blend(rgb(10, 20, 30), argb(0, 1, 2, 3), 255), rgb(1, 2, 3));
    }

    #[test]
    fn blend_half_is_midpoint() {
        let mixed = blend(BLACK, WHITE, 128);
        let (r, g, b) = channels(mixed);
        assert_eq!((r, g, b), (128, 128, 128));
        assert_eq!(alpha(mixed), 0xFF);
    }

    #[test]
    fn lerp_hits_both_ends() {
        let a = rgb(0, 100, 200);
        let b = rgb(100, 0, 0);
        assert_eq!(lerp(a, b, 0, 10), a);
        assert_eq!(lerp(a, b, 10, 10), b);
        assert_eq!(lerp(a, b, 5, 10), rgb(50, 50, 100));
    }
}
