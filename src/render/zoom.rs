//! Pan/zoom transform for the diagram surface.

use serde::{Deserialize, Serialize};

use crate::layout::PointF;

/// Allowed zoom scales, inclusive.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleExtent {
    pub min: f64,
    pub max: f64,
}

impl ScaleExtent {
    pub fn clamp(&self, k: f64) -> f64 {
        k.max(self.min).min(self.max)
    }
}

/// `screen = scene * k + (x, y)`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform { k: 1.0, x: 0.0, y: 0.0 };

    pub fn apply(&self, p: PointF) -> PointF {
        PointF { x: p.x * self.k + self.x, y: p.y * self.k + self.y }
    }

    pub fn invert(&self, p: PointF) -> PointF {
        PointF { x: (p.x - self.x) / self.k, y: (p.y - self.y) / self.k }
    }

    /// Pan by a screen-space delta.
    pub fn translate_by(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    /// Multiply the scale by `factor` (clamped to `extent`), keeping the
    /// scene point under `anchor` fixed on screen.
    pub fn scale_by(&mut self, factor: f64, anchor: PointF, extent: ScaleExtent) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let fixed = self.invert(anchor);
        let k = extent.clamp(self.k * factor);
        self.k = k;
        self.x = anchor.x - fixed.x * k;
        self.y = anchor.y - fixed.y * k;
    }

    /// SVG `transform` attribute value.
    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENT: ScaleExtent = ScaleExtent { min: 0.75, max: 5.0 };

    #[test]
    fn test_scale_is_clamped() {
        let mut t = ZoomTransform::IDENTITY;
        t.scale_by(100.0, PointF::ORIGIN, EXTENT);
        assert_eq!(t.k, 5.0);
        t.scale_by(0.001, PointF::ORIGIN, EXTENT);
        assert_eq!(t.k, 0.75);
    }

    #[test]
    fn test_anchor_stays_fixed() {
        let mut t = ZoomTransform::IDENTITY;
        t.translate_by(15.0, -5.0);
        let anchor = PointF::new(120.0, 80.0);
        let before = t.invert(anchor);
        t.scale_by(2.0, anchor, EXTENT);
        let after = t.invert(anchor);
        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_invert_apply() {
        let t = ZoomTransform { k: 2.5, x: 40.0, y: -12.0 };
        let p = PointF::new(3.0, 7.0);
        let q = t.invert(t.apply(p));
        assert!((p.x - q.x).abs() < 1e-9);
        assert!((p.y - q.y).abs() < 1e-9);
    }

    #[test]
    fn test_bad_factor_ignored() {
        let mut t = ZoomTransform::IDENTITY;
        t.scale_by(0.0, PointF::ORIGIN, EXTENT);
        t.scale_by(f64::NAN, PointF::ORIGIN, EXTENT);
        assert_eq!(t, ZoomTransform::IDENTITY);
    }
}
