//! Reading NetCDF files written with the archive's layouts.

use netcdf_grid::{open_grid, GridDataset, GridError};
use test_utils::{
    assert_approx_eq, hadcm3_latitudes, hadcm3_longitudes, indexed_field, indexed_series,
    regular_axis, temp_archive, NcFixture,
};

#[test]
fn test_hadcm3_climatology_squeezes_to_single_value() {
    let dir = temp_archive().unwrap();
    let path = dir.path().join("tfgbia.pdclann.nc");

    let lats = hadcm3_latitudes();
    let lons = hadcm3_longitudes();
    NcFixture::new()
        .dim("t", vec![0.0])
        .dim("ht", vec![1.5])
        .dim("latitude", lats.clone())
        .dim("longitude", lons.clone())
        .var(
            "temp_mm_1_5m",
            &["t", "ht", "latitude", "longitude"],
            indexed_field(lats.len(), lons.len(), 0.0),
        )
        .write(&path)
        .unwrap();

    let grid = open_grid(&path).unwrap();
    assert!(grid.has_variable("temp_mm_1_5m"));
    assert!(!grid.has_variable("latitude"));

    // 51.5N -> row 15 (52.5N); 359.9E -> col 95 (356.25E)
    let values = grid.sample("temp_mm_1_5m", 51.5, 359.9).unwrap();
    assert_eq!(values, vec![15_095.0]);
}

#[test]
fn test_cmip_series_preserves_time_order() {
    let dir = temp_archive().unwrap();
    let path = dir.path().join("tas_series.nc");

    let lats = regular_axis(-60.0, 30.0, 5);
    let lons = regular_axis(0.0, 60.0, 6);
    NcFixture::new()
        .dim("time", regular_axis(0.0, 1.0, 4))
        .dim("lat", lats.clone())
        .dim("lon", lons.clone())
        .var(
            "tas",
            &["time", "lat", "lon"],
            indexed_series(4, lats.len(), lons.len(), 280.0, 0.5),
        )
        .write(&path)
        .unwrap();

    let grid = open_grid(&path).unwrap();
    let series = grid.sample("tas", 0.0, 125.0).unwrap();

    // row 2 (0N), col 2 (120E)
    assert_eq!(series.len(), 4);
    for (t, value) in series.iter().enumerate() {
        assert_approx_eq!(*value, 280.0 + t as f64 * 0.5 + 2_002.0, 1e-9);
    }
}

#[test]
fn test_missing_value_is_masked() {
    let dir = temp_archive().unwrap();
    let path = dir.path().join("masked.nc");

    NcFixture::new()
        .dim("lat", vec![0.0, 10.0])
        .dim("lon", vec![0.0, 10.0])
        .var("pr", &["lat", "lon"], vec![1.0e-5, -1.0, 2.0e-5, 3.0e-5])
        .attr("missing_value", -1.0)
        .write(&path)
        .unwrap();

    let grid = open_grid(&path).unwrap();
    assert!(grid.sample("pr", 0.0, 10.0).unwrap()[0].is_nan());
    assert_approx_eq!(grid.sample("pr", 10.0, 0.0).unwrap()[0], 2.0e-5, 1e-12);
}

#[test]
fn test_corrupt_file_is_format_error() {
    let dir = temp_archive().unwrap();
    let path = dir.path().join("corrupt.nc");
    std::fs::write(&path, b"definitely not netcdf").unwrap();

    let err = open_grid(&path).unwrap_err();
    assert!(matches!(err, GridError::InvalidFormat(_)), "got {:?}", err);
}
