//! Test data generators for creating synthetic atmosphere-like data.
//!
//! These generators create predictable, verifiable test data patterns
//! that can be used across the test suite.

/// Surface pressure in Pa for a point.
///
/// Ranges from about 70 kPa to 102 kPa: a broad low centred on the
/// equator at 0°E, rising towards the poles. Deterministic in (lat, lon).
pub fn surface_pressure_pa(lat: f64, lon: f64) -> f32 {
    let lat_r = lat.to_radians();
    let lon_r = lon.to_radians();
    let base = 86_000.0 + 14_000.0 * lat_r.sin().abs();
    let wave = 2_000.0 * (2.0 * lon_r).cos() * lat_r.cos();
    (base + wave) as f32
}

/// Zonal (west-east) wind in m/s: westerlies in mid-latitudes, easterly trades.
pub fn zonal_wind_ms(lat: f64, _lon: f64) -> f32 {
    let lat_r = lat.to_radians();
    (-8.0 * lat_r.cos() + 30.0 * (2.0 * lat_r).sin().powi(2)) as f32
}

/// Meridional (south-north) wind in m/s, varying with longitude.
pub fn meridional_wind_ms(lat: f64, lon: f64) -> f32 {
    (12.0 * lon.to_radians().sin() * lat.to_radians().cos()) as f32
}

/// Evaluate `f(lat, lon)` over a grid, row-major with rows following `lats`.
pub fn sample_grid(lats: &[f64], lons: &[f64], f: impl Fn(f64, f64) -> f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(lats.len() * lons.len());
    for &lat in lats {
        for &lon in lons {
            data.push(f(lat, lon));
        }
    }
    data
}

/// Evenly spaced coordinates from `start` to `stop` inclusive.
pub fn coordinate_axis(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![start; n];
    }
    let step = (stop - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates RGBA pixel data for a simple gradient test pattern.
pub fn create_test_rgba_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let r = ((x as f32 / width as f32) * 255.0) as u8;
            let g = ((y as f32 / height as f32) * 255.0) as u8;
            pixels.extend_from_slice(&[r, g, 128, 255]);
        }
    }
    pixels
}
