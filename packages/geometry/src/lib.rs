#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Planar polygon kernel for barrio boundary analysis.
//!
//! All geometry is computed directly in decimal-degree space, which is
//! adequate at city scale. Coordinates near the poles or the
//! antimeridian are out of scope. Areas are in degree² and are only
//! ever compared relatively (overlap ratios), never reported as
//! geographic area.

use thiserror::Error;

mod clip;

pub use clip::intersect_polygons;

/// Tolerance for the point-on-edge and clipping half-plane tests.
///
/// Degree-space coordinates for a city span a few hundredths of a
/// degree, so cross products of genuine off-edge points sit far above
/// this.
const EDGE_EPSILON: f64 = 1e-12;

/// Errors produced by polygon validation.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The ring cannot form a usable polygon.
    #[error("Degenerate polygon: {reason}")]
    Degenerate {
        /// What made the ring unusable.
        reason: &'static str,
    },
}

/// A position as (longitude, latitude) in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    /// Longitude in `[-180, 180]`.
    pub lng: f64,
    /// Latitude in `[-90, 90]`.
    pub lat: f64,
}

impl Coord {
    /// Builds a coordinate from longitude and latitude.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// Axis-aligned bounding box over (lng, lat).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum longitude.
    pub min_lng: f64,
    /// Minimum latitude.
    pub min_lat: f64,
    /// Maximum longitude.
    pub max_lng: f64,
    /// Maximum latitude.
    pub max_lat: f64,
}

impl BoundingBox {
    /// Whether this box shares any area (or edge) with `other`.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min_lng <= other.max_lng
            && other.min_lng <= self.max_lng
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    /// Whether the point lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: Coord) -> bool {
        point.lng >= self.min_lng
            && point.lng <= self.max_lng
            && point.lat >= self.min_lat
            && point.lat <= self.max_lat
    }

    /// The smallest box covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_lng: self.min_lng.min(other.min_lng),
            min_lat: self.min_lat.min(other.min_lat),
            max_lng: self.max_lng.max(other.max_lng),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }
}

/// A simple closed ring of at least 3 coordinates with non-zero area.
///
/// Construction validates the ring, so every live [`Polygon`] is usable
/// by the containment and clipping routines. The ring is implicitly
/// closed; an explicit closing point (last == first) is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<Coord>,
}

impl Polygon {
    /// Validates and builds a polygon from a coordinate ring.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::Degenerate`] when the ring has fewer
    /// than 3 distinct points, a non-finite coordinate, or zero
    /// shoelace area (all points collinear or duplicated).
    pub fn new(mut ring: Vec<Coord>) -> Result<Self, GeometryError> {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        if ring.len() < 3 {
            return Err(GeometryError::Degenerate {
                reason: "fewer than 3 distinct points",
            });
        }

        if ring
            .iter()
            .any(|c| !c.lng.is_finite() || !c.lat.is_finite())
        {
            return Err(GeometryError::Degenerate {
                reason: "non-finite coordinate",
            });
        }

        let polygon = Self { ring };
        if polygon.area() <= EDGE_EPSILON {
            return Err(GeometryError::Degenerate {
                reason: "zero area",
            });
        }

        Ok(polygon)
    }

    /// Builds a polygon from `[longitude, latitude]` pairs, the wire
    /// shape of upstream boundary coordinates.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Polygon::new`].
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Result<Self, GeometryError> {
        Self::new(pairs.iter().map(|p| Coord::new(p[0], p[1])).collect())
    }

    /// The validated ring, without an explicit closing point.
    #[must_use]
    pub fn ring(&self) -> &[Coord] {
        &self.ring
    }

    /// Consecutive edges of the ring, including the closing edge.
    fn edges(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        let ring = &self.ring;
        (0..ring.len()).map(move |i| (ring[i], ring[(i + 1) % ring.len()]))
    }

    /// Absolute shoelace area in degree², orientation independent.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Signed shoelace area; positive for counter-clockwise rings.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let sum: f64 = self
            .edges()
            .map(|(a, b)| a.lng * b.lat - b.lng * a.lat)
            .sum();
        sum / 2.0
    }

    /// Axis-aligned bounds of the ring.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox {
            min_lng: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lng: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        };
        for c in &self.ring {
            bbox.min_lng = bbox.min_lng.min(c.lng);
            bbox.min_lat = bbox.min_lat.min(c.lat);
            bbox.max_lng = bbox.max_lng.max(c.lng);
            bbox.max_lat = bbox.max_lat.max(c.lat);
        }
        bbox
    }

    /// Even-odd ray-casting containment test, boundary inclusive.
    ///
    /// A point exactly on an edge counts as inside, so points that
    /// coincide with a drawn border are never silently dropped. The
    /// crossing test is half-open (an edge crosses iff one endpoint's
    /// latitude is `>=` the test latitude and the other's is `<`),
    /// which keeps rays through vertices from double-counting.
    #[must_use]
    pub fn contains(&self, point: Coord) -> bool {
        let mut inside = false;

        for (a, b) in self.edges() {
            if on_segment(point, a, b) {
                return true;
            }

            if (a.lat >= point.lat) != (b.lat >= point.lat) {
                let t = (point.lat - a.lat) / (b.lat - a.lat);
                let crossing_lng = a.lng + t * (b.lng - a.lng);
                if crossing_lng > point.lng {
                    inside = !inside;
                }
            }
        }

        inside
    }
}

/// Whether `p` lies on the closed segment from `a` to `b`.
fn on_segment(p: Coord, a: Coord, b: Coord) -> bool {
    let cross = (b.lng - a.lng) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lng - a.lng);
    if cross.abs() > EDGE_EPSILON {
        return false;
    }

    p.lng >= a.lng.min(b.lng) - EDGE_EPSILON
        && p.lng <= a.lng.max(b.lng) + EDGE_EPSILON
        && p.lat >= a.lat.min(b.lat) - EDGE_EPSILON
        && p.lat <= a.lat.max(b.lat) + EDGE_EPSILON
}

/// A user-marked region of interest.
///
/// The clipper requires a convex clip polygon, so concave regions must
/// arrive pre-decomposed into convex pieces; intersection areas are
/// summed across the pieces. Passing a concave ring as `Convex` yields
/// an approximation, a documented limitation rather than a silent fix.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkedRegion {
    /// A single convex ring.
    Convex(Polygon),
    /// A concave region decomposed into convex pieces.
    Decomposed(Vec<Polygon>),
}

impl MarkedRegion {
    /// The convex pieces to clip against.
    #[must_use]
    pub fn pieces(&self) -> &[Polygon] {
        match self {
            Self::Convex(polygon) => std::slice::from_ref(polygon),
            Self::Decomposed(pieces) => pieces,
        }
    }

    /// Bounds covering every piece.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        let mut pieces = self.pieces().iter();
        let mut bbox = pieces
            .next()
            .map_or(
                BoundingBox {
                    min_lng: 0.0,
                    min_lat: 0.0,
                    max_lng: 0.0,
                    max_lat: 0.0,
                },
                Polygon::bounding_box,
            );
        for piece in pieces {
            bbox = bbox.union(&piece.bounding_box());
        }
        bbox
    }
}
