#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! External contract types for the barrio correlation engine.
//!
//! These types mirror the JSON shapes exchanged with the upstream
//! barrio-identification service and the points-of-interest source:
//! barrio polygon coordinates are `[longitude, latitude]` pairs while
//! points carry `lat`/`lng` fields (latitude-first). That asymmetry is
//! part of the existing wire contract and is preserved verbatim.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How a barrio's boundary overlaps the user-marked region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapKind {
    /// The marked region is entirely covered by the barrio.
    Total,
    /// The marked region partially covers the barrio.
    Partial,
    /// No shared area.
    None,
}

impl std::fmt::Display for OverlapKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Total => write!(f, "total"),
            Self::Partial => write!(f, "partial"),
            Self::None => write!(f, "none"),
        }
    }
}

/// Result of classifying one barrio boundary against a marked region.
///
/// `percentage` is populated only for [`OverlapKind::Partial`]; a total
/// overlap is semantically 100% but the field stays absent, matching
/// the upstream contract where the percentage expresses partial
/// ambiguity only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlapResult {
    /// Overlap classification.
    pub kind: OverlapKind,
    /// Overlap percentage in `[0, 100]`, present iff `kind` is partial.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub percentage: Option<f64>,
}

impl OverlapResult {
    /// A total overlap (no percentage).
    #[must_use]
    pub const fn total() -> Self {
        Self {
            kind: OverlapKind::Total,
            percentage: None,
        }
    }

    /// A partial overlap with the given percentage.
    #[must_use]
    pub const fn partial(percentage: f64) -> Self {
        Self {
            kind: OverlapKind::Partial,
            percentage: Some(percentage),
        }
    }

    /// No overlap (no percentage).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            kind: OverlapKind::None,
            percentage: None,
        }
    }
}

/// A point of interest from the external points source.
///
/// Field names (`lat`, `lng`, `categoria`, `nombre`) are the Spanish
/// wire names of the upstream dataset and must not be renamed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
    /// Category label, matched case-sensitively and never normalized.
    pub categoria: String,
    /// Optional point name, carried through for display only.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nombre: Option<String>,
}

/// Per-category counts of points falling inside one barrio.
///
/// Serialized under the upstream field name `puntosCbaSegura`. The
/// category map is a [`BTreeMap`] so repeated runs over identical input
/// serialize byte-identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTally {
    /// Total number of points inside the barrio.
    pub total_puntos: u64,
    /// Count per category, keyed by the verbatim category string.
    pub categorias_puntos: BTreeMap<String, u64>,
}

impl CategoryTally {
    /// Records one point of the given category.
    pub fn record(&mut self, categoria: &str) {
        self.total_puntos += 1;
        *self
            .categorias_puntos
            .entry(categoria.to_string())
            .or_insert(0) += 1;
    }
}

/// A barrio record as produced by the upstream identification service.
///
/// The optional `overlap_type`/`overlap_percentage` pair is an upstream
/// model *estimate*; the engine uses it only as a fallback when the
/// record carries no usable boundary geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodRecord {
    /// Barrio name, the unique output key.
    pub barrio_name: String,
    /// Boundary ring as `[longitude, latitude]` pairs, if known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub barrio_polygon_coordinates: Option<Vec<[f64; 2]>>,
    /// Upstream-estimated overlap kind, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overlap_type: Option<OverlapKind>,
    /// Upstream-estimated overlap percentage, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overlap_percentage: Option<f64>,
}

/// What a per-record diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    /// The record's boundary failed geometric validation.
    DegenerateBoundary,
    /// The record carried no boundary at all.
    MissingBoundary,
    /// The overlap result is an upstream estimate, not computed geometry.
    EstimatedOverlap,
}

/// A non-fatal, per-record diagnostic attached to the output.
///
/// The engine never logs on its own behalf; diagnostics ride in the
/// result for the caller to log or display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Diagnostic category.
    pub kind: DiagnosticKind,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Builds a diagnostic of the given kind.
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The unified per-barrio output record.
///
/// Overlap fields are present only when a marked region was supplied to
/// the batch; the tally only when a point dataset was supplied. The
/// boundary is passed through untouched for downstream display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodResult {
    /// Barrio name.
    pub barrio_name: String,
    /// Overlap classification against the marked region.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overlap_type: Option<OverlapKind>,
    /// Overlap percentage, present iff the overlap is partial.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overlap_percentage: Option<f64>,
    /// Pass-through boundary ring, `[longitude, latitude]` pairs.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub barrio_polygon_coordinates: Option<Vec<[f64; 2]>>,
    /// Points-of-interest tally for this barrio.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub puntos_cba_segura: Option<CategoryTally>,
    /// Non-fatal problems encountered while processing this record.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OverlapKind::Partial).unwrap(),
            "\"partial\""
        );
        assert_eq!(
            serde_json::to_string(&OverlapKind::None).unwrap(),
            "\"none\""
        );
    }

    #[test]
    fn tally_record_keeps_categories_case_sensitive() {
        let mut tally = CategoryTally::default();
        tally.record("Hospital");
        tally.record("hospital");
        tally.record("Hospital");

        assert_eq!(tally.total_puntos, 3);
        assert_eq!(tally.categorias_puntos.get("Hospital"), Some(&2));
        assert_eq!(tally.categorias_puntos.get("hospital"), Some(&1));
    }

    #[test]
    fn tally_serializes_with_upstream_field_names() {
        let mut tally = CategoryTally::default();
        tally.record("Comisaría");

        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(
            json,
            "{\"totalPuntos\":1,\"categoriasPuntos\":{\"Comisaría\":1}}"
        );
    }

    #[test]
    fn result_omits_absent_fields() {
        let result = NeighborhoodResult {
            barrio_name: "Alberdi".to_string(),
            overlap_type: None,
            overlap_percentage: None,
            barrio_polygon_coordinates: None,
            puntos_cba_segura: None,
            diagnostics: vec![],
        };

        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, "{\"barrioName\":\"Alberdi\"}");
    }

    #[test]
    fn record_parses_upstream_shape() {
        let json = r#"{
            "barrioName": "Nueva Córdoba",
            "barrioPolygonCoordinates": [[-64.19, -31.42], [-64.18, -31.42], [-64.18, -31.43]],
            "overlapType": "partial",
            "overlapPercentage": 42.5
        }"#;

        let record: NeighborhoodRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.barrio_name, "Nueva Córdoba");
        assert_eq!(record.overlap_type, Some(OverlapKind::Partial));
        assert_eq!(
            record.barrio_polygon_coordinates.as_deref(),
            Some(&[[-64.19, -31.42], [-64.18, -31.42], [-64.18, -31.43]][..])
        );
    }

    #[test]
    fn point_parses_latitude_first_shape() {
        let json = r#"{"lat": -31.41, "lng": -64.18, "categoria": "Comisaría", "nombre": "Central"}"#;
        let point: PointOfInterest = serde_json::from_str(json).unwrap();
        assert!((point.lat - -31.41).abs() < f64::EPSILON);
        assert!((point.lng - -64.18).abs() < f64::EPSILON);
        assert_eq!(point.categoria, "Comisaría");
    }
}
