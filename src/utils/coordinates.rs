use crate::error::{ProcessingError, Result};

/// Brings a longitude into the convention used by a grid axis.
///
/// Grids spanning 0..360 get negative longitudes shifted east; grids on
/// -180..180 get longitudes above 180 shifted west.
pub fn normalize_longitude(longitude: f64, axis: &[f64]) -> f64 {
    let uses_360 = axis.iter().any(|&lon| lon > 180.0);
    if uses_360 && longitude < 0.0 {
        longitude + 360.0
    } else if !uses_360 && longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

/// Index of the coordinate closest to `target`.
///
/// Equidistant candidates resolve to the larger coordinate value, whichever
/// way the axis runs. Missing coordinates (NaN) are never selected.
pub fn nearest_index(axis: &[f64], target: f64) -> Result<usize> {
    if !target.is_finite() {
        return Err(ProcessingError::InvalidCoordinate(format!(
            "Cannot look up non-finite coordinate {}",
            target
        )));
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in axis.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        let distance = (value - target).abs();
        let closer = match best {
            None => true,
            Some((best_index, best_distance)) => {
                distance < best_distance
                    || (distance == best_distance && value > axis[best_index])
            }
        };
        if closer {
            best = Some((index, distance));
        }
    }

    best.map(|(index, _)| index).ok_or_else(|| {
        ProcessingError::InvalidCoordinate("Coordinate axis has no valid values".to_string())
    })
}
