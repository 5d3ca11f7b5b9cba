//! Coordinate axes and value patterns for synthetic climate grids.

/// A regular axis of `count` points starting at `start` with spacing `step`.
///
/// ```
/// use test_utils::regular_axis;
///
/// assert_eq!(regular_axis(0.0, 90.0, 4), vec![0.0, 90.0, 180.0, 270.0]);
/// ```
pub fn regular_axis(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// HadCM3 atmosphere latitudes: 73 rows from 90N to 90S at 2.5 degrees.
pub fn hadcm3_latitudes() -> Vec<f64> {
    regular_axis(90.0, -2.5, 73)
}

/// HadCM3 atmosphere longitudes: 96 columns from 0E at 3.75 degrees.
pub fn hadcm3_longitudes() -> Vec<f64> {
    regular_axis(0.0, 3.75, 96)
}

/// Values for a (lat, lon) grid where each cell encodes its own indices.
///
/// Cell value is `base + row * 1000 + col`, in row-major order, so a
/// sampled value identifies the selected cell.
pub fn indexed_field(rows: usize, cols: usize, base: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push(base + (row * 1000 + col) as f64);
        }
    }
    data
}

/// Values for a (time, lat, lon) grid where each time step is offset by
/// `step` from the previous one.
///
/// Cell value is `base + t * step + row * 1000 + col`.
pub fn indexed_series(times: usize, rows: usize, cols: usize, base: f64, step: f64) -> Vec<f64> {
    let mut data = Vec::with_capacity(times * rows * cols);
    for t in 0..times {
        data.extend(indexed_field(rows, cols, base + t as f64 * step));
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hadcm3_axes() {
        let lats = hadcm3_latitudes();
        let lons = hadcm3_longitudes();
        assert_eq!(lats.len(), 73);
        assert_eq!(lats[0], 90.0);
        assert_eq!(lats[72], -90.0);
        assert_eq!(lons.len(), 96);
        assert_eq!(lons[95], 356.25);
    }

    #[test]
    fn test_indexed_series_layout() {
        let data = indexed_series(2, 2, 3, 100.0, 10.0);
        assert_eq!(data.len(), 12);
        assert_eq!(data[0], 100.0);
        assert_eq!(data[5], 1102.0);
        assert_eq!(data[6], 110.0);
    }
}
