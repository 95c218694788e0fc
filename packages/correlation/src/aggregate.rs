//! Batch aggregation across a list of barrio records.
//!
//! Runs the overlap classifier and point correlator for every record
//! and merges the outputs. Output order equals input order; that
//! ordering is an observable contract for downstream consumers, so any
//! future parallel map must restore it before returning.

use barrio_map_geometry::{MarkedRegion, Polygon};
use barrio_map_models::{
    Diagnostic, DiagnosticKind, NeighborhoodRecord, NeighborhoodResult, OverlapKind,
    OverlapResult, PointOfInterest,
};

use crate::overlap::{classify_overlap, round_percentage};
use crate::points::tally_points;

/// Correlates every barrio with the marked region and point dataset.
///
/// Either input may be absent: with no marked region the overlap
/// fields stay absent from every record, with no point dataset the
/// tally does. A record whose boundary is missing or degenerate still
/// produces an output record, carrying a diagnostic instead of
/// geometry-derived fields; one bad record never aborts the batch.
#[must_use]
pub fn correlate(
    neighborhoods: &[NeighborhoodRecord],
    marked_region: Option<&MarkedRegion>,
    points: Option<&[PointOfInterest]>,
) -> Vec<NeighborhoodResult> {
    neighborhoods
        .iter()
        .map(|record| correlate_one(record, marked_region, points))
        .collect()
}

fn correlate_one(
    record: &NeighborhoodRecord,
    marked_region: Option<&MarkedRegion>,
    points: Option<&[PointOfInterest]>,
) -> NeighborhoodResult {
    let mut diagnostics = Vec::new();

    let boundary = match &record.barrio_polygon_coordinates {
        None => {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MissingBoundary,
                format!("barrio '{}' has no boundary coordinates", record.barrio_name),
            ));
            None
        }
        Some(pairs) => match Polygon::from_pairs(pairs) {
            Ok(polygon) => Some(polygon),
            Err(err) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DegenerateBoundary,
                    format!("barrio '{}': {err}", record.barrio_name),
                ));
                None
            }
        },
    };

    let overlap = marked_region.and_then(|marked| match &boundary {
        Some(polygon) => Some(classify_overlap(polygon, marked)),
        None => estimated_overlap(record, &mut diagnostics),
    });

    let tally = match (points, &boundary) {
        (Some(dataset), Some(polygon)) => Some(tally_points(polygon, dataset)),
        _ => None,
    };

    NeighborhoodResult {
        barrio_name: record.barrio_name.clone(),
        overlap_type: overlap.as_ref().map(|o| o.kind),
        overlap_percentage: overlap.and_then(|o| o.percentage),
        barrio_polygon_coordinates: record.barrio_polygon_coordinates.clone(),
        puntos_cba_segura: tally,
        diagnostics,
    }
}

/// Falls back to the upstream model's overlap estimate when the record
/// has no usable geometry.
///
/// Geometry always wins when both are available; the estimate is used
/// only here, flagged with a diagnostic so consumers can tell a
/// reproducible computation from a model guess.
fn estimated_overlap(
    record: &NeighborhoodRecord,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<OverlapResult> {
    let kind = record.overlap_type?;

    diagnostics.push(Diagnostic::new(
        DiagnosticKind::EstimatedOverlap,
        format!(
            "barrio '{}': overlap taken from upstream estimate, not geometry",
            record.barrio_name
        ),
    ));

    let percentage = match kind {
        OverlapKind::Partial => record
            .overlap_percentage
            .filter(|p| p.is_finite())
            .map(|p| round_percentage(p.clamp(0.0, 100.0))),
        OverlapKind::Total | OverlapKind::None => None,
    };

    Some(OverlapResult { kind, percentage })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_pairs() -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
    }

    fn record(name: &str, boundary: Option<Vec<[f64; 2]>>) -> NeighborhoodRecord {
        NeighborhoodRecord {
            barrio_name: name.to_string(),
            barrio_polygon_coordinates: boundary,
            overlap_type: None,
            overlap_percentage: None,
        }
    }

    fn shifted_square_region() -> MarkedRegion {
        MarkedRegion::Convex(
            Polygon::from_pairs(&[[0.5, 0.0], [1.5, 0.0], [1.5, 1.0], [0.5, 1.0]]).unwrap(),
        )
    }

    fn hospital_points() -> Vec<PointOfInterest> {
        vec![
            PointOfInterest {
                lat: 0.5,
                lng: 0.5,
                categoria: "Hospital".to_string(),
                nombre: None,
            },
            PointOfInterest {
                lat: 5.0,
                lng: 5.0,
                categoria: "Hospital".to_string(),
                nombre: None,
            },
        ]
    }

    #[test]
    fn empty_batch_yields_empty_output() {
        let results = correlate(&[], None, Some(&hospital_points()));
        assert!(results.is_empty());
    }

    #[test]
    fn output_preserves_input_order() {
        let records = vec![
            record("Centro", Some(unit_square_pairs())),
            record("Alberdi", None),
            record("Güemes", Some(unit_square_pairs())),
        ];

        let results = correlate(&records, None, None);
        let names: Vec<&str> = results.iter().map(|r| r.barrio_name.as_str()).collect();
        assert_eq!(names, vec!["Centro", "Alberdi", "Güemes"]);
    }

    #[test]
    fn no_marked_region_means_no_overlap_fields() {
        let records = vec![record("Centro", Some(unit_square_pairs()))];
        let results = correlate(&records, None, Some(&hospital_points()));

        assert_eq!(results[0].overlap_type, None);
        assert_eq!(results[0].overlap_percentage, None);
        assert!(results[0].puntos_cba_segura.is_some());
    }

    #[test]
    fn no_points_means_no_tally() {
        let records = vec![record("Centro", Some(unit_square_pairs()))];
        let results = correlate(&records, Some(&shifted_square_region()), None);

        assert!(results[0].puntos_cba_segura.is_none());
        assert_eq!(results[0].overlap_type, Some(OverlapKind::Partial));
    }

    #[test]
    fn partial_overlap_reports_percentage() {
        let records = vec![record("Centro", Some(unit_square_pairs()))];
        let results = correlate(&records, Some(&shifted_square_region()), None);

        assert_eq!(results[0].overlap_type, Some(OverlapKind::Partial));
        assert!((results[0].overlap_percentage.unwrap() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tallies_points_inside_boundary() {
        let records = vec![record("Centro", Some(unit_square_pairs()))];
        let points = hospital_points();
        let results = correlate(&records, None, Some(&points));

        let tally = results[0].puntos_cba_segura.as_ref().unwrap();
        assert_eq!(tally.total_puntos, 1);
        assert_eq!(tally.categorias_puntos.get("Hospital"), Some(&1));
    }

    #[test]
    fn degenerate_boundary_is_isolated_with_diagnostic() {
        let records = vec![
            record("Roto", Some(vec![[0.0, 0.0], [0.0, 0.0]])),
            record("Centro", Some(unit_square_pairs())),
        ];
        let points = hospital_points();
        let results = correlate(&records, Some(&shifted_square_region()), Some(&points));

        // The bad record is still present, minus geometry-derived
        // fields, and the rest of the batch is unaffected.
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].barrio_name, "Roto");
        assert_eq!(results[0].overlap_type, None);
        assert!(results[0].puntos_cba_segura.is_none());
        assert_eq!(
            results[0].diagnostics[0].kind,
            DiagnosticKind::DegenerateBoundary
        );

        assert_eq!(results[1].overlap_type, Some(OverlapKind::Partial));
        assert_eq!(
            results[1].puntos_cba_segura.as_ref().unwrap().total_puntos,
            1
        );
    }

    #[test]
    fn missing_boundary_gets_diagnostic() {
        let results = correlate(&[record("SinLimites", None)], None, None);
        assert_eq!(
            results[0].diagnostics[0].kind,
            DiagnosticKind::MissingBoundary
        );
    }

    #[test]
    fn estimate_is_used_only_without_geometry() {
        let mut estimated = record("Estimado", None);
        estimated.overlap_type = Some(OverlapKind::Partial);
        estimated.overlap_percentage = Some(33.333);

        let mut geometric = record("Geométrico", Some(unit_square_pairs()));
        geometric.overlap_type = Some(OverlapKind::None);

        let results = correlate(
            &[estimated, geometric],
            Some(&shifted_square_region()),
            None,
        );

        // Without geometry the upstream estimate stands in, flagged.
        assert_eq!(results[0].overlap_type, Some(OverlapKind::Partial));
        assert!((results[0].overlap_percentage.unwrap() - 33.33).abs() < f64::EPSILON);
        assert!(
            results[0]
                .diagnostics
                .iter()
                .any(|d| d.kind == DiagnosticKind::EstimatedOverlap)
        );

        // With geometry the computation wins over the estimate.
        assert_eq!(results[1].overlap_type, Some(OverlapKind::Partial));
        assert!((results[1].overlap_percentage.unwrap() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn total_estimate_carries_no_percentage() {
        let mut estimated = record("Estimado", None);
        estimated.overlap_type = Some(OverlapKind::Total);
        estimated.overlap_percentage = Some(100.0);

        let results = correlate(&[estimated], Some(&shifted_square_region()), None);
        assert_eq!(results[0].overlap_type, Some(OverlapKind::Total));
        assert_eq!(results[0].overlap_percentage, None);
    }

    #[test]
    fn repeated_runs_serialize_identically() {
        let records = vec![
            record("Centro", Some(unit_square_pairs())),
            record("Alberdi", None),
        ];
        let points = hospital_points();
        let region = shifted_square_region();

        let first = serde_json::to_string(&correlate(&records, Some(&region), Some(&points)))
            .unwrap();
        let second = serde_json::to_string(&correlate(&records, Some(&region), Some(&points)))
            .unwrap();
        assert_eq!(first, second);
    }
}
