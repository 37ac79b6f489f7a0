//! Link interpolation between a parent and a child node.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::TreeError;
use crate::layout::PointF;

/// Supported link curves. Names follow the usual d3 curve factories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Curve {
    Linear,
    /// Cubic with horizontal tangents at both ends.
    BumpX,
    /// Cubic with vertical tangents at both ends.
    BumpY,
    /// Horizontal, vertical at the midpoint, horizontal.
    Step,
    StepBefore,
    StepAfter,
}

/// Registry: (name, curve). Lookup is case-sensitive, with or without the
/// `curve` prefix (`"bumpX"` and `"curveBumpX"` are the same curve).
const CURVE_REGISTRY: &[(&str, Curve)] = &[
    ("linear", Curve::Linear),
    ("bumpX", Curve::BumpX),
    ("bumpY", Curve::BumpY),
    ("step", Curve::Step),
    ("stepBefore", Curve::StepBefore),
    ("stepAfter", Curve::StepAfter),
];

impl FromStr for Curve {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.strip_prefix("curve").map(lower_first).unwrap_or_else(|| s.to_string());
        CURVE_REGISTRY
            .iter()
            .find(|(name, _)| *name == bare)
            .map(|(_, curve)| *curve)
            .ok_or_else(|| TreeError::UnsupportedCurve(s.to_string()))
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = CURVE_REGISTRY
            .iter()
            .find(|(_, c)| c == self)
            .map(|(name, _)| *name)
            .unwrap_or("linear");
        f.write_str(name)
    }
}

impl Curve {
    /// SVG path data from `source` to `target` (screen coordinates).
    pub fn path(self, source: PointF, target: PointF) -> String {
        let (x0, y0, x1, y1) = (source.x, source.y, target.x, target.y);
        match self {
            Curve::Linear => format!("M{x0},{y0}L{x1},{y1}"),
            Curve::BumpX => {
                let xm = (x0 + x1) / 2.0;
                format!("M{x0},{y0}C{xm},{y0},{xm},{y1},{x1},{y1}")
            }
            Curve::BumpY => {
                let ym = (y0 + y1) / 2.0;
                format!("M{x0},{y0}C{x0},{ym},{x1},{ym},{x1},{y1}")
            }
            Curve::Step => {
                let xm = (x0 + x1) / 2.0;
                format!("M{x0},{y0}L{xm},{y0}L{xm},{y1}L{x1},{y1}")
            }
            Curve::StepBefore => format!("M{x0},{y0}L{x0},{y1}L{x1},{y1}"),
            Curve::StepAfter => format!("M{x0},{y0}L{x1},{y0}L{x1},{y1}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("bumpX".parse::<Curve>().unwrap(), Curve::BumpX);
        assert_eq!("curveBumpX".parse::<Curve>().unwrap(), Curve::BumpX);
        assert_eq!("curveStepAfter".parse::<Curve>().unwrap(), Curve::StepAfter);
        assert_eq!("linear".parse::<Curve>().unwrap(), Curve::Linear);
    }

    #[test]
    fn test_unsupported_curve() {
        match "catmullRom".parse::<Curve>() {
            Err(TreeError::UnsupportedCurve(name)) => assert_eq!(name, "catmullRom"),
            other => panic!("expected UnsupportedCurve, got {other:?}"),
        }
        assert!("".parse::<Curve>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for (name, curve) in CURVE_REGISTRY {
            assert_eq!(curve.to_string(), *name);
        }
    }

    #[test]
    fn test_bump_x_path() {
        let d = Curve::BumpX.path(PointF::new(0.0, 10.0), PointF::new(200.0, 70.0));
        assert_eq!(d, "M0,10C100,10,100,70,200,70");
    }

    #[test]
    fn test_step_path() {
        let d = Curve::Step.path(PointF::new(0.0, 0.0), PointF::new(100.0, 50.0));
        assert_eq!(d, "M0,0L50,0L50,50L100,50");
    }
}
