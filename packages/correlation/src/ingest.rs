//! Parses and validates raw upstream JSON payloads.
//!
//! The upstream collaborators hand the engine its inputs as JSON
//! strings: an array of barrio records and an array of points of
//! interest. Structural problems (the payload is not an array at all)
//! fail the whole call; per-record problems are skipped, counted, and
//! logged, and never abort the batch. This is the only layer that
//! logs; the engine core reports through diagnostics instead.

use barrio_map_models::{NeighborhoodRecord, OverlapKind, PointOfInterest};
use serde_json::Value;
use thiserror::Error;

/// Errors that fail an entire parse call.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The payload is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level payload is not an array.
    #[error("Expected a JSON array of {expected}, got {found}")]
    NotAList {
        /// What the array should have held.
        expected: &'static str,
        /// JSON type actually found.
        found: &'static str,
    },
}

/// Accepted barrio records plus the count of skipped ones.
#[derive(Debug, Clone)]
pub struct ParsedNeighborhoods {
    /// Records that passed validation, in payload order.
    pub records: Vec<NeighborhoodRecord>,
    /// Number of records dropped as malformed.
    pub skipped: usize,
}

/// Accepted points plus the count of skipped ones.
#[derive(Debug, Clone)]
pub struct ParsedPoints {
    /// Points that passed validation, in payload order.
    pub points: Vec<PointOfInterest>,
    /// Number of points dropped as malformed.
    pub skipped: usize,
}

/// Parses the barrio-records payload.
///
/// A record needs a non-empty `barrioName`; anything less is skipped.
/// A malformed `barrioPolygonCoordinates` array (wrong pair arity,
/// non-numeric or out-of-range values) drops the boundary but keeps
/// the record, since a barrio without geometry still belongs in the
/// output.
///
/// # Errors
///
/// Returns [`IngestError::NotAList`] when the top level is not an
/// array, or [`IngestError::Json`] when the payload is not JSON.
pub fn parse_neighborhoods(json: &str) -> Result<ParsedNeighborhoods, IngestError> {
    let value: Value = serde_json::from_str(json)?;
    let Some(items) = value.as_array() else {
        return Err(IngestError::NotAList {
            expected: "barrio records",
            found: json_type(&value),
        });
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for item in items {
        if let Some(record) = normalize_neighborhood(item) {
            records.push(record);
        } else {
            skipped += 1;
            log::warn!("Skipping malformed barrio record: {item}");
        }
    }

    Ok(ParsedNeighborhoods { records, skipped })
}

/// Parses the points-of-interest payload.
///
/// A point needs finite, in-range `lat`/`lng` and a non-empty
/// `categoria`; anything less is skipped. The category string is kept
/// verbatim — trimming or case folding would change tally keys and
/// belongs in an explicit preprocessing step, not here.
///
/// # Errors
///
/// Returns [`IngestError::NotAList`] when the top level is not an
/// array, or [`IngestError::Json`] when the payload is not JSON.
pub fn parse_points(json: &str) -> Result<ParsedPoints, IngestError> {
    let value: Value = serde_json::from_str(json)?;
    let Some(items) = value.as_array() else {
        return Err(IngestError::NotAList {
            expected: "points of interest",
            found: json_type(&value),
        });
    };

    let mut points = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for item in items {
        if let Some(point) = normalize_point(item) {
            points.push(point);
        } else {
            skipped += 1;
            log::warn!("Skipping malformed point of interest: {item}");
        }
    }

    Ok(ParsedPoints { points, skipped })
}

fn normalize_neighborhood(item: &Value) -> Option<NeighborhoodRecord> {
    let obj = item.as_object()?;

    let barrio_name = obj
        .get("barrioName")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let barrio_polygon_coordinates = match obj.get("barrioPolygonCoordinates") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let pairs = coordinate_pairs(value);
            if pairs.is_none() {
                log::warn!("Dropping malformed boundary for barrio '{barrio_name}'");
            }
            pairs
        }
    };

    let overlap_type = obj
        .get("overlapType")
        .and_then(Value::as_str)
        .and_then(|s| match s {
            "total" => Some(OverlapKind::Total),
            "partial" => Some(OverlapKind::Partial),
            "none" => Some(OverlapKind::None),
            _ => None,
        });

    let overlap_percentage = obj
        .get("overlapPercentage")
        .and_then(Value::as_f64)
        .filter(|p| p.is_finite());

    Some(NeighborhoodRecord {
        barrio_name,
        barrio_polygon_coordinates,
        overlap_type,
        overlap_percentage,
    })
}

/// Extracts `[longitude, latitude]` pairs, rejecting the whole array
/// on the first malformed pair.
fn coordinate_pairs(value: &Value) -> Option<Vec<[f64; 2]>> {
    let items = value.as_array()?;
    let mut pairs = Vec::with_capacity(items.len());

    for item in items {
        let pair = item.as_array()?;
        if pair.len() != 2 {
            return None;
        }
        let lng = pair[0].as_f64()?;
        let lat = pair[1].as_f64()?;
        if !lng_in_range(lng) || !lat_in_range(lat) {
            return None;
        }
        pairs.push([lng, lat]);
    }

    Some(pairs)
}

fn normalize_point(item: &Value) -> Option<PointOfInterest> {
    let obj = item.as_object()?;

    let lat = obj.get("lat")?.as_f64()?;
    let lng = obj.get("lng")?.as_f64()?;
    if !lat_in_range(lat) || !lng_in_range(lng) {
        return None;
    }

    let categoria = obj
        .get("categoria")?
        .as_str()
        .filter(|s| !s.is_empty())?
        .to_string();

    let nombre = obj
        .get("nombre")
        .and_then(Value::as_str)
        .map(ToString::to_string);

    Some(PointOfInterest {
        lat,
        lng,
        categoria,
        nombre,
    })
}

fn lat_in_range(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

fn lng_in_range(lng: f64) -> bool {
    (-180.0..=180.0).contains(&lng)
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
