//! RGBA helpers. Colors are `Vec4` with `x,y,z,w` = `r,g,b,a`, each in `[0, 1]`.

use glam::Vec4;

/// Display gamma applied to the color channels before emission.
pub const DISPLAY_GAMMA: f32 = 2.2;

/// Componentwise interpolation from `start` (t = 0) to `end` (t = 1).
///
/// The result is clamped to the box spanned by the two inputs so rounding
/// can never push a channel outside its endpoints.
pub fn lerp_color(start: Vec4, end: Vec4, t: f32) -> Vec4 {
    let t = t.clamp(0.0, 1.0);
    let mixed = start * (1.0 - t) + end * t;
    mixed.clamp(start.min(end), start.max(end))
}

/// Raises r, g and b to `1 / DISPLAY_GAMMA`; alpha stays linear.
pub fn gamma_correct(color: Vec4) -> Vec4 {
    let exponent = 1.0 / DISPLAY_GAMMA;
    Vec4::new(
        color.x.max(0.0).powf(exponent),
        color.y.max(0.0).powf(exponent),
        color.z.max(0.0).powf(exponent),
        color.w,
    )
}

/// Clamps every channel to `[0, 1]`, replacing non-finite channels with `fallback`'s.
pub fn sanitize(color: Vec4, fallback: Vec4) -> Vec4 {
    let mut channels = color.to_array();
    let fallback = fallback.to_array();
    for (channel, default) in channels.iter_mut().zip(fallback) {
        *channel = if channel.is_finite() {
            channel.clamp(0.0, 1.0)
        } else {
            default
        };
    }
    Vec4::from_array(channels)
}
