//! Signed distance functions for sprite silhouettes
//!
//! Negative inside, positive outside. Only the sign matters for
//! rasterizing collision masks, but the distances are kept honest so the
//! shapes compose with `min`/`max`.

use glam::Vec2;

/// Signed distance to a circle
#[inline]
pub fn sd_circle(p: Vec2, center: Vec2, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Signed distance to an axis-aligned box given by center and half extents
pub fn sd_box(p: Vec2, center: Vec2, half: Vec2) -> f32 {
    let d = (p - center).abs() - half;
    d.max(Vec2::ZERO).length() + d.x.max(d.y).min(0.0)
}

/// Approximate signed distance to an axis-aligned ellipse
///
/// Exact on the axes, conservative elsewhere; the zero level set is the
/// true ellipse.
pub fn sd_ellipse(p: Vec2, center: Vec2, radii: Vec2) -> f32 {
    let q = (p - center) / radii;
    (q.length() - 1.0) * radii.min_element()
}

/// Union of two shapes
#[inline]
pub fn sd_union(a: f32, b: f32) -> f32 {
    a.min(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_inside_outside() {
        let c = Vec2::new(10.0, 10.0);
        let half = Vec2::new(5.0, 2.0);
        assert!(sd_box(c, c, half) < 0.0);
        assert!((sd_box(Vec2::new(20.0, 10.0), c, half) - 5.0).abs() < 1e-5);
        assert!(sd_box(Vec2::new(10.0, 12.5), c, half) > 0.0);
    }

    #[test]
    fn test_ellipse_axes() {
        let c = Vec2::ZERO;
        let r = Vec2::new(17.0, 12.0);
        assert!(sd_ellipse(c, c, r) < 0.0);
        assert!(sd_ellipse(Vec2::new(16.9, 0.0), c, r) < 0.0);
        assert!(sd_ellipse(Vec2::new(17.1, 0.0), c, r) > 0.0);
        // Corner of the bounding box is outside
        assert!(sd_ellipse(Vec2::new(16.0, 11.0), c, r) > 0.0);
    }

    #[test]
    fn test_union() {
        let p = Vec2::new(0.0, 0.0);
        let a = sd_circle(p, Vec2::new(-5.0, 0.0), 1.0);
        let b = sd_circle(p, Vec2::new(0.5, 0.0), 1.0);
        assert!(sd_union(a, b) < 0.0);
    }
}
