//! Point-sequence validation and grouping into wire segments.

use reactor_kernel::WireSegment;
use reactor_types::{ConnectionKind, ProfilePoint};

use crate::types::ShapeError;

/// Validate a point sequence and group it into wire segments.
///
/// Each point is joined to its successor by its own connection kind (or
/// `default` for points without one); the last point joins back to the
/// first. A trailing point equal to the first is treated as the explicit
/// closing point. Consecutive points of one kind form one segment, and a
/// segment also takes the first point of the following run so neighbours
/// share endpoints.
pub fn build_segments(
    shape: &str,
    points: &[ProfilePoint],
    default: ConnectionKind,
) -> Result<Vec<WireSegment>, ShapeError> {
    let invalid = |reason: String| ShapeError::InvalidPoints {
        shape: shape.to_string(),
        reason,
    };

    let mut pts: Vec<ProfilePoint> = points.to_vec();
    if pts.len() > 1 && pts[0].same_position(&pts[pts.len() - 1]) {
        pts.pop();
    }
    if pts.len() < 3 {
        return Err(invalid(format!(
            "need at least 3 distinct points, got {}",
            pts.len()
        )));
    }
    if let Some(bad) = pts.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(invalid(format!("non-finite coordinate ({}, {})", bad.x, bad.y)));
    }
    let tagged = pts.iter().filter(|p| p.connection.is_some()).count();
    if tagged != 0 && tagged != pts.len() {
        return Err(invalid(
            "points with and without connection kinds are mixed".to_string(),
        ));
    }
    let n = pts.len();
    for i in 0..n {
        if pts[i].same_position(&pts[(i + 1) % n]) {
            return Err(invalid(format!(
                "consecutive duplicate point ({}, {})",
                pts[i].x, pts[i].y
            )));
        }
    }

    let kind = |i: usize| pts[i].connection.unwrap_or(default);
    let xy = |i: usize| pts[i % n].xy();

    let mut segments = Vec::new();
    let mut start = 0;
    while start < n {
        let run_kind = kind(start);
        let mut end = start + 1;
        while end < n && kind(end) == run_kind {
            end += 1;
        }
        // Points start..=end (end wraps to 0 on the last run).
        let run: Vec<[f64; 2]> = (start..=end).map(xy).collect();
        match run_kind {
            ConnectionKind::Straight => segments.push(WireSegment::Polyline(run)),
            ConnectionKind::Spline => segments.push(WireSegment::Spline(run)),
            ConnectionKind::Circle => {
                let connections = run.len() - 1;
                if connections % 2 != 0 {
                    return Err(invalid(format!(
                        "circle run starting at point {} has {} connections; arcs need 2 each",
                        start, connections
                    )));
                }
                for arc in run.windows(3).step_by(2) {
                    segments.push(WireSegment::ThreePointArc([arc[0], arc[1], arc[2]]));
                }
            }
        }
        start = end;
    }
    Ok(segments)
}
