//! Sutherland–Hodgman polygon clipping.
//!
//! Clips a subject polygon against each edge of a convex clip polygon
//! in turn. The clip ring is normalized to counter-clockwise first so
//! the half-plane test always keeps the interior side.

use crate::{Coord, EDGE_EPSILON, Polygon};

/// Intersects `subject` with the convex polygon `clip`.
///
/// Returns `None` when the polygons share no area or the clipped ring
/// degenerates below 3 vertices or to zero area. The clip polygon must
/// be convex; a concave clip yields an approximation.
#[must_use]
pub fn intersect_polygons(subject: &Polygon, clip: &Polygon) -> Option<Polygon> {
    if !subject.bounding_box().intersects(&clip.bounding_box()) {
        return None;
    }

    let clip_ring = ccw_ring(clip);
    let mut output: Vec<Coord> = subject.ring().to_vec();

    for i in 0..clip_ring.len() {
        let edge_start = clip_ring[i];
        let edge_end = clip_ring[(i + 1) % clip_ring.len()];

        let input = std::mem::take(&mut output);
        if input.is_empty() {
            return None;
        }

        for j in 0..input.len() {
            let current = input[j];
            let next = input[(j + 1) % input.len()];

            let current_inside = inside_half_plane(current, edge_start, edge_end);
            let next_inside = inside_half_plane(next, edge_start, edge_end);

            if next_inside {
                if !current_inside {
                    push_vertex(
                        &mut output,
                        line_intersection(current, next, edge_start, edge_end),
                    );
                }
                push_vertex(&mut output, next);
            } else if current_inside {
                push_vertex(
                    &mut output,
                    line_intersection(current, next, edge_start, edge_end),
                );
            }
        }
    }

    Polygon::new(output).ok()
}

/// The clip ring in counter-clockwise order.
fn ccw_ring(polygon: &Polygon) -> Vec<Coord> {
    let mut ring = polygon.ring().to_vec();
    if polygon.signed_area() < 0.0 {
        ring.reverse();
    }
    ring
}

/// Whether `p` is on the interior (left) side of the directed edge
/// `a -> b`, boundary inclusive.
fn inside_half_plane(p: Coord, a: Coord, b: Coord) -> bool {
    (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng) >= -EDGE_EPSILON
}

/// Intersection of the line through `p1`/`p2` with the line through
/// `a`/`b`.
fn line_intersection(p1: Coord, p2: Coord, a: Coord, b: Coord) -> Coord {
    let denom = (p1.lng - p2.lng) * (a.lat - b.lat) - (p1.lat - p2.lat) * (a.lng - b.lng);
    if denom.abs() < EDGE_EPSILON {
        // Near-parallel lines only reach here through float noise in
        // the half-plane test; the segment endpoint is on the edge.
        return p2;
    }

    let t = ((p1.lng - a.lng) * (a.lat - b.lat) - (p1.lat - a.lat) * (a.lng - b.lng)) / denom;
    Coord::new(
        p1.lng + t * (p2.lng - p1.lng),
        p1.lat + t * (p2.lat - p1.lat),
    )
}

/// Appends a vertex, skipping exact duplicates of the previous one.
fn push_vertex(ring: &mut Vec<Coord>, vertex: Coord) {
    if ring.last() != Some(&vertex) {
        ring.push(vertex);
    }
}
