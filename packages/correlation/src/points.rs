//! Tallies points of interest falling inside a barrio boundary.

use barrio_map_geometry::{Coord, Polygon};
use barrio_map_models::{CategoryTally, PointOfInterest};

/// Counts the points inside `boundary`, per category and in total.
///
/// Categories are tallied under the verbatim `categoria` string; no
/// trimming or case folding, so "Hospital" and "hospital" are distinct
/// keys, matching the case-sensitive upstream contract. A bounding-box
/// pre-filter skips the full containment test for far-away points; the
/// scan is otherwise naive, which is fine at city scale (tens of
/// barrios, low thousands of points).
#[must_use]
pub fn tally_points(boundary: &Polygon, points: &[PointOfInterest]) -> CategoryTally {
    let bbox = boundary.bounding_box();
    let mut tally = CategoryTally::default();

    for point in points {
        let coord = Coord::new(point.lng, point.lat);
        if bbox.contains(coord) && boundary.contains(coord) {
            tally.record(&point.categoria);
        }
    }

    tally
}
