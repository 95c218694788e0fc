//! Classifies a barrio boundary's overlap with the marked region.

use barrio_map_geometry::{MarkedRegion, Polygon, intersect_polygons};
use barrio_map_models::OverlapResult;

/// Overlap ratio at or above which the overlap counts as total.
///
/// Clipping degree-precision input rarely yields an exact 1.0 ratio
/// even for visually total coverage; an exact equality test would
/// misclassify those as partial.
pub const TOTAL_OVERLAP_RATIO: f64 = 0.999;

/// Classifies how much of `boundary` the marked region covers.
///
/// Intersection areas are summed across the region's convex pieces,
/// the ratio against the boundary's own area is clamped to `[0, 1]`,
/// and a partial percentage is rounded to 2 decimal places.
#[must_use]
pub fn classify_overlap(boundary: &Polygon, marked_region: &MarkedRegion) -> OverlapResult {
    if !boundary
        .bounding_box()
        .intersects(&marked_region.bounding_box())
    {
        return OverlapResult::none();
    }

    let overlap_area: f64 = marked_region
        .pieces()
        .iter()
        .filter_map(|piece| intersect_polygons(boundary, piece))
        .map(|intersection| intersection.area())
        .sum();

    if overlap_area <= 0.0 {
        return OverlapResult::none();
    }

    let ratio = (overlap_area / boundary.area()).clamp(0.0, 1.0);
    if ratio >= TOTAL_OVERLAP_RATIO {
        OverlapResult::total()
    } else {
        OverlapResult::partial(round_percentage(ratio * 100.0))
    }
}

/// Rounds a percentage to 2 decimal places.
pub(crate) fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use barrio_map_models::OverlapKind;

    fn unit_square() -> Polygon {
        Polygon::from_pairs(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap()
    }

    #[test]
    fn self_overlap_is_total() {
        let result = classify_overlap(&unit_square(), &MarkedRegion::Convex(unit_square()));
        assert_eq!(result.kind, OverlapKind::Total);
        assert_eq!(result.percentage, None);
    }

    #[test]
    fn disjoint_regions_do_not_overlap() {
        let far =
            Polygon::from_pairs(&[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0], [5.0, 6.0]]).unwrap();
        let result = classify_overlap(&unit_square(), &MarkedRegion::Convex(far));
        assert_eq!(result.kind, OverlapKind::None);
        assert_eq!(result.percentage, None);
    }

    #[test]
    fn half_shifted_square_is_fifty_percent() {
        let shifted =
            Polygon::from_pairs(&[[0.5, 0.0], [1.5, 0.0], [1.5, 1.0], [0.5, 1.0]]).unwrap();
        let result = classify_overlap(&unit_square(), &MarkedRegion::Convex(shifted));

        assert_eq!(result.kind, OverlapKind::Partial);
        assert!((result.percentage.unwrap() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn decomposed_region_sums_piece_areas() {
        // Two convex halves that together cover the whole boundary.
        let left =
            Polygon::from_pairs(&[[0.0, 0.0], [0.5, 0.0], [0.5, 1.0], [0.0, 1.0]]).unwrap();
        let right =
            Polygon::from_pairs(&[[0.5, 0.0], [1.0, 0.0], [1.0, 1.0], [0.5, 1.0]]).unwrap();

        let result = classify_overlap(&unit_square(), &MarkedRegion::Decomposed(vec![left, right]));
        assert_eq!(result.kind, OverlapKind::Total);
    }

    #[test]
    fn partial_percentage_rounds_to_two_decimals() {
        // One ninth of the boundary: 11.111...% rounds to 11.11.
        let corner = Polygon::from_pairs(&[
            [0.0, 0.0],
            [1.0 / 3.0, 0.0],
            [1.0 / 3.0, 1.0 / 3.0],
            [0.0, 1.0 / 3.0],
        ])
        .unwrap();

        let result = classify_overlap(&unit_square(), &MarkedRegion::Convex(corner));
        assert_eq!(result.kind, OverlapKind::Partial);
        assert!((result.percentage.unwrap() - 11.11).abs() < 1e-9);
    }
}
