//! Nearest-neighbor selection along a single coordinate axis.
//!
//! Each axis is searched independently: the cell chosen for a (lat, lon)
//! target is the nearest latitude index paired with the nearest longitude
//! index, not the cell with the smallest combined distance. Axes may be
//! ascending or descending and need not be evenly spaced.

/// Index of the coordinate closest to `target`.
///
/// Returns `None` for an empty axis or when no coordinate is comparable
/// (every entry NaN). Ties resolve to the lowest index.
pub fn nearest_index(axis: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (idx, &coord) in axis.iter().enumerate() {
        let distance = (coord - target).abs();
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((idx, distance)),
        }
    }

    best.map(|(idx, _)| idx)
}
