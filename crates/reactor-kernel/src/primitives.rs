//! Planar wire and face construction on top of truck's builder API.
//!
//! Consecutive edges share vertex objects so the wire is topologically
//! closed; the final edge re-uses the first vertex.

use truck_modeling::builder;
use truck_modeling::topology::{Edge, Face, Vertex, Wire};
use truck_modeling::Point3;

use crate::outline::{self, Arc2};
use crate::types::{KernelError, WireSegment, Workplane};

struct WireBuilder {
    plane: Workplane,
    first: Option<([f64; 2], Vertex)>,
    last: Option<([f64; 2], Vertex)>,
    edges: Vec<Edge>,
}

impl WireBuilder {
    fn new(plane: Workplane) -> Self {
        Self {
            plane,
            first: None,
            last: None,
            edges: Vec::new(),
        }
    }

    fn point(&self, uv: [f64; 2]) -> Point3 {
        let w = self.plane.to_world(uv);
        Point3::new(w[0], w[1], w[2])
    }

    /// Vertex at `uv`, re-using the first vertex when the wire returns to it.
    fn vertex(&self, uv: [f64; 2]) -> Vertex {
        match &self.first {
            Some((p, v)) if *p == uv => v.clone(),
            _ => builder::vertex(self.point(uv)),
        }
    }

    fn move_to(&mut self, uv: [f64; 2]) {
        if self.last.is_none() {
            let v = builder::vertex(self.point(uv));
            self.first = Some((uv, v.clone()));
            self.last = Some((uv, v));
        }
    }

    /// Current end point and vertex, or `None` when `uv` repeats it.
    fn advance(&mut self, uv: [f64; 2]) -> Option<(Vertex, Vertex)> {
        let (prev_uv, prev_v) = self.last.clone()?;
        if prev_uv == uv {
            return None;
        }
        let next = self.vertex(uv);
        self.last = Some((uv, next.clone()));
        Some((prev_v, next))
    }

    fn line_to(&mut self, uv: [f64; 2]) {
        if let Some((a, b)) = self.advance(uv) {
            self.edges.push(builder::line(&a, &b));
        }
    }

    fn bezier_to(&mut self, c1: [f64; 2], c2: [f64; 2], uv: [f64; 2]) {
        let controls = vec![self.point(c1), self.point(c2)];
        if let Some((a, b)) = self.advance(uv) {
            self.edges.push(builder::bezier(&a, &b, controls));
        }
    }

    fn arc_to(&mut self, transit: [f64; 2], uv: [f64; 2]) {
        let transit = self.point(transit);
        if let Some((a, b)) = self.advance(uv) {
            self.edges.push(builder::circle_arc(&a, &b, transit));
        }
    }

    fn close(mut self) -> Result<Wire, KernelError> {
        if let Some((uv, _)) = self.first.clone() {
            self.line_to(uv);
        }
        if self.edges.len() < 2 {
            return Err(KernelError::InvalidProfile {
                reason: format!("wire has {} edges", self.edges.len()),
            });
        }
        Ok(Wire::from_iter(self.edges))
    }
}

/// Build a closed wire from segments on a workplane.
pub fn build_wire(plane: Workplane, segments: &[WireSegment]) -> Result<Wire, KernelError> {
    let mut wb = WireBuilder::new(plane);
    for segment in segments {
        match segment {
            WireSegment::Polyline(points) => {
                for &p in points {
                    wb.move_to(p);
                    wb.line_to(p);
                }
            }
            WireSegment::Spline(points) => {
                if let Some(&p) = points.first() {
                    wb.move_to(p);
                }
                for span in outline::spline_spans(points) {
                    wb.bezier_to(span[1], span[2], span[3]);
                }
            }
            WireSegment::ThreePointArc([a, m, b]) => {
                Arc2::through(*a, *m, *b)?;
                wb.move_to(*a);
                wb.arc_to(*m, *b);
            }
        }
    }
    wb.close()
}

/// Build a planar face bounded by the closed wire.
pub fn build_face(plane: Workplane, segments: &[WireSegment]) -> Result<Face, KernelError> {
    let wire = build_wire(plane, segments)?;
    builder::try_attach_plane(&[wire]).map_err(|e| KernelError::InvalidProfile {
        reason: format!("failed to create planar face: {}", e),
    })
}
