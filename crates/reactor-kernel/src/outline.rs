//! Planar wire geometry shared by both kernels.
//!
//! Splines are Catmull-Rom interpolants through their points, expressed as
//! cubic Bézier spans so truck and the mock trace the same curve. A spline
//! whose first and last points coincide is treated as periodic.

use crate::types::{KernelError, WireSegment};

/// Samples per spline span and per circular arc when flattening.
pub const SPLINE_SAMPLES: usize = 8;
pub const ARC_SAMPLES: usize = 24;

/// Cubic Bézier spans `(p0, c1, c2, p1)` through the given points.
pub fn spline_spans(points: &[[f64; 2]]) -> Vec<[[f64; 2]; 4]> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let periodic = n > 2 && points[0] == points[n - 1];
    let tangent = |i: usize| -> [f64; 2] {
        let (prev, next) = if periodic && (i == 0 || i == n - 1) {
            (points[n - 2], points[1])
        } else if i == 0 {
            (points[0], points[1])
        } else if i == n - 1 {
            (points[n - 2], points[n - 1])
        } else {
            (points[i - 1], points[i + 1])
        };
        let scale = if !periodic && (i == 0 || i == n - 1) {
            1.0
        } else {
            0.5
        };
        [(next[0] - prev[0]) * scale, (next[1] - prev[1]) * scale]
    };

    (0..n - 1)
        .map(|i| {
            let (p0, p1) = (points[i], points[i + 1]);
            let (m0, m1) = (tangent(i), tangent(i + 1));
            [
                p0,
                [p0[0] + m0[0] / 3.0, p0[1] + m0[1] / 3.0],
                [p1[0] - m1[0] / 3.0, p1[1] - m1[1] / 3.0],
                p1,
            ]
        })
        .collect()
}

pub fn bezier_point(span: &[[f64; 2]; 4], t: f64) -> [f64; 2] {
    let s = 1.0 - t;
    let w = [s * s * s, 3.0 * s * s * t, 3.0 * s * t * t, t * t * t];
    let mut out = [0.0; 2];
    for (k, p) in span.iter().enumerate() {
        out[0] += w[k] * p[0];
        out[1] += w[k] * p[1];
    }
    out
}

/// Circle through three points, with the signed sweep from the first point
/// to the last passing through the middle one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc2 {
    pub center: [f64; 2],
    pub radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl Arc2 {
    pub fn through(a: [f64; 2], m: [f64; 2], b: [f64; 2]) -> Result<Arc2, KernelError> {
        let d = 2.0 * (a[0] * (m[1] - b[1]) + m[0] * (b[1] - a[1]) + b[0] * (a[1] - m[1]));
        let scale = [a, m, b]
            .iter()
            .flat_map(|p| p.iter())
            .fold(1.0f64, |acc, c| acc.max(c.abs()));
        if d.abs() < 1e-12 * scale * scale {
            return Err(KernelError::InvalidProfile {
                reason: format!("arc points {:?}, {:?}, {:?} are collinear", a, m, b),
            });
        }
        let sq = |p: [f64; 2]| p[0] * p[0] + p[1] * p[1];
        let cx = (sq(a) * (m[1] - b[1]) + sq(m) * (b[1] - a[1]) + sq(b) * (a[1] - m[1])) / d;
        let cy = (sq(a) * (b[0] - m[0]) + sq(m) * (a[0] - b[0]) + sq(b) * (m[0] - a[0])) / d;
        let center = [cx, cy];
        let radius = ((a[0] - cx).powi(2) + (a[1] - cy).powi(2)).sqrt();
        let angle = |p: [f64; 2]| (p[1] - cy).atan2(p[0] - cx);
        let tau = std::f64::consts::TAU;
        let start_angle = angle(a);
        let ccw = |p: [f64; 2]| (angle(p) - start_angle).rem_euclid(tau);
        let (to_mid, to_end) = (ccw(m), ccw(b));
        let sweep = if to_mid <= to_end {
            to_end
        } else {
            to_end - tau
        };
        Ok(Arc2 {
            center,
            radius,
            start_angle,
            sweep,
        })
    }

    pub fn point_at(&self, t: f64) -> [f64; 2] {
        let a = self.start_angle + self.sweep * t;
        [
            self.center[0] + self.radius * a.cos(),
            self.center[1] + self.radius * a.sin(),
        ]
    }
}

/// Flatten wire segments into a closed polygon (no repeated closing point).
pub fn flatten(segments: &[WireSegment]) -> Result<Vec<[f64; 2]>, KernelError> {
    let mut out: Vec<[f64; 2]> = Vec::new();
    let push = |p: [f64; 2], out: &mut Vec<[f64; 2]>| {
        if out.last() != Some(&p) {
            out.push(p);
        }
    };
    for segment in segments {
        match segment {
            WireSegment::Polyline(points) => {
                for &p in points {
                    push(p, &mut out);
                }
            }
            WireSegment::Spline(points) => {
                if let Some(&first) = points.first() {
                    push(first, &mut out);
                }
                for span in spline_spans(points) {
                    for k in 1..=SPLINE_SAMPLES {
                        push(
                            bezier_point(&span, k as f64 / SPLINE_SAMPLES as f64),
                            &mut out,
                        );
                    }
                }
            }
            WireSegment::ThreePointArc([a, m, b]) => {
                let arc = Arc2::through(*a, *m, *b)?;
                push(*a, &mut out);
                for k in 1..ARC_SAMPLES {
                    push(arc.point_at(k as f64 / ARC_SAMPLES as f64), &mut out);
                }
                push(*b, &mut out);
            }
        }
    }
    if out.len() > 1 && out.first() == out.last() {
        out.pop();
    }
    if out.len() < 3 {
        return Err(KernelError::InvalidProfile {
            reason: format!("wire has {} distinct points, need at least 3", out.len()),
        });
    }
    Ok(out)
}

/// Even-odd point membership. Points exactly on a horizontal edge follow the
/// half-open rule, so adjacent polygons never both claim a point.
pub fn point_in_polygon(p: [f64; 2], poly: &[[f64; 2]]) -> bool {
    let mut inside = false;
    let n = poly.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (poly[i], poly[j]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if p[0] < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Signed shoelace area, positive for counter-clockwise polygons.
pub fn polygon_area(poly: &[[f64; 2]]) -> f64 {
    let n = poly.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += poly[i][0] * poly[j][1] - poly[j][0] * poly[i][1];
    }
    area / 2.0
}

/// Perimeter length of a closed polygon.
pub fn polygon_perimeter(poly: &[[f64; 2]]) -> f64 {
    let n = poly.len();
    (0..n)
        .map(|i| {
            let (a, b) = (poly[i], poly[(i + 1) % n]);
            ((b[0] - a[0]).powi(2) + (b[1] - a[1]).powi(2)).sqrt()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn arc_through_quarter_circle() {
        let arc = Arc2::through([1.0, 0.0], [0.5f64.sqrt(), 0.5f64.sqrt()], [0.0, 1.0]).unwrap();
        assert_abs_diff_eq!(arc.radius, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(arc.sweep, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        let mid = arc.point_at(0.5);
        assert_abs_diff_eq!(mid[0], 0.5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn clockwise_arc_has_negative_sweep() {
        let arc = Arc2::through([0.0, 1.0], [0.5f64.sqrt(), 0.5f64.sqrt()], [1.0, 0.0]).unwrap();
        assert!(arc.sweep < 0.0);
    }

    #[test]
    fn collinear_arc_is_rejected() {
        let err = Arc2::through([0.0, 0.0], [1.0, 1.0], [2.0, 2.0]).unwrap_err();
        assert!(matches!(err, KernelError::InvalidProfile { .. }));
    }

    #[test]
    fn spline_passes_through_its_points() {
        let pts = [[0.0, 0.0], [1.0, 2.0], [3.0, 1.0], [4.0, 0.0]];
        let spans = spline_spans(&pts);
        assert_eq!(spans.len(), 3);
        for (i, span) in spans.iter().enumerate() {
            assert_eq!(bezier_point(span, 0.0), pts[i]);
            let end = bezier_point(span, 1.0);
            assert_abs_diff_eq!(end[0], pts[i + 1][0], epsilon = 1e-12);
            assert_abs_diff_eq!(end[1], pts[i + 1][1], epsilon = 1e-12);
        }
    }

    #[test]
    fn periodic_spline_is_smooth_at_the_seam() {
        let pts = [[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0], [1.0, 0.0]];
        let spans = spline_spans(&pts);
        let first = spans[0];
        let last = spans[spans.len() - 1];
        let out_tangent = [first[1][0] - first[0][0], first[1][1] - first[0][1]];
        let in_tangent = [last[3][0] - last[2][0], last[3][1] - last[2][1]];
        assert_abs_diff_eq!(out_tangent[0], in_tangent[0], epsilon = 1e-12);
        assert_abs_diff_eq!(out_tangent[1], in_tangent[1], epsilon = 1e-12);
    }

    #[test]
    fn flattened_square_membership() {
        let square = flatten(&[WireSegment::Polyline(vec![
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 2.0],
            [0.0, 2.0],
            [0.0, 0.0],
        ])])
        .unwrap();
        assert_eq!(square.len(), 4);
        assert!(point_in_polygon([1.0, 1.0], &square));
        assert!(!point_in_polygon([3.0, 1.0], &square));
        assert_abs_diff_eq!(polygon_area(&square), 4.0);
        assert_abs_diff_eq!(polygon_perimeter(&square), 8.0);
    }

    #[test]
    fn degenerate_wire_is_rejected() {
        let err = flatten(&[WireSegment::Polyline(vec![[0.0, 0.0], [1.0, 0.0]])]).unwrap_err();
        assert!(matches!(err, KernelError::InvalidProfile { .. }));
    }
}
