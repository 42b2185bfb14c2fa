//! Pollutant feature vectors and simple dataset statistics.

use serde::{Deserialize, Serialize};

/// Number of values in a pollutant feature vector.
pub const FEATURE_LEN: usize = 5;

/// Column names of the feature vector, in order.
pub const FEATURE_NAMES: [&str; FEATURE_LEN] = [
    "CO AQI Value",
    "Ozone AQI Value",
    "NO2 AQI Value",
    "PM2.5 AQI Value",
    "Max AQI",
];

/// Per-pollutant AQI sub-indices of a reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutantFeatures {
    pub co: f32,
    pub ozone: f32,
    pub no2: f32,
    pub pm25: f32,
}

impl PollutantFeatures {
    /// Largest sub-index across the four pollutants.
    pub fn max_aqi(&self) -> f32 {
        self.co.max(self.ozone).max(self.no2).max(self.pm25)
    }

    /// `[co, ozone, no2, pm25, max]`, the layout the AQI classifier expects.
    pub fn to_vector(&self) -> Vec<f32> {
        vec![self.co, self.ozone, self.no2, self.pm25, self.max_aqi()]
    }
}

/// Pearson correlation of two equally long series.
///
/// Returns `None` when fewer than two pairs exist or either series is constant.
pub fn pearson_correlation(xs: &[f32], ys: &[f32]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mean_x = xs[..n].iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().map(|&v| v as f64).sum::<f64>() / n as f64;
    let mut cov = 0.0f64;
    let mut var_x = 0.0f64;
    let mut var_y = 0.0f64;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let dx = x as f64 - mean_x;
        let dy = y as f64 - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}
