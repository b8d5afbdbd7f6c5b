//! "hot" colour map: black -> red -> yellow -> white

use image::Rgb;

// Breakpoints of the hot colour map's red, green and blue ramps
const RED_END: f32 = 0.365_079;
const GREEN_END: f32 = 0.746_032;
const RED_FLOOR: f32 = 0.0416;

/// Map a normalized value (0-1) to the hot colour map
pub fn hot(t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    let r = RED_FLOOR + (1.0 - RED_FLOOR) * (t / RED_END);
    let g = (t - RED_END) / (GREEN_END - RED_END);
    let b = (t - GREEN_END) / (1.0 - GREEN_END);
    [r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0)]
}

/// Blend a hot-mapped value over `base` with the given opacity
pub fn blend_hot(t: f32, alpha: f32, base: Rgb<u8>) -> Rgb<u8> {
    let color = hot(t);
    let mut out = [0u8; 3];
    for (i, channel) in out.iter_mut().enumerate() {
        let under = base[i] as f32 / 255.0;
        let mixed = color[i] * alpha + under * (1.0 - alpha);
        *channel = (mixed * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

/// Position of `count` on a `[0, ceiling]` colour scale, saturating above it
pub fn scale_position(count: f64, ceiling: f64) -> f32 {
    if ceiling <= 0.0 {
        return 1.0;
    }
    (count / ceiling).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hot_endpoints() {
        let low = hot(0.0);
        assert!((low[0] - RED_FLOOR).abs() < 1e-6);
        assert_eq!(low[1], 0.0);
        assert_eq!(low[2], 0.0);
        assert_eq!(hot(1.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn hot_is_red_then_yellow() {
        let red = hot(RED_END);
        assert!((red[0] - 1.0).abs() < 1e-6);
        assert!(red[1].abs() < 1e-6);

        let yellow = hot(GREEN_END);
        assert!((yellow[1] - 1.0).abs() < 1e-6);
        assert!(yellow[2].abs() < 1e-6);
    }

    #[test]
    fn blending_over_black_scales_brightness() {
        let px = blend_hot(1.0, 0.5, Rgb([0, 0, 0]));
        assert_eq!(px, Rgb([128, 128, 128]));

        let opaque = blend_hot(1.0, 1.0, Rgb([10, 20, 30]));
        assert_eq!(opaque, Rgb([255, 255, 255]));
    }

    #[test]
    fn counts_above_ceiling_saturate() {
        assert_eq!(scale_position(12.0, 4.0), 1.0);
        assert_eq!(scale_position(2.0, 4.0), 0.5);
        assert_eq!(scale_position(0.0, 4.0), 0.0);
    }
}
