use serde::Serialize;

/// The nine numeric statistics every dataset row carries: average, minimum and
/// maximum of temperature, wind speed and relative humidity.
///
/// Values are kept exactly as parsed. Rounding happens only when a view model is
/// built, so aggregating the same rows twice gives identical output. A value that
/// could not be parsed is `NaN` under the lenient numeric policy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Measurements {
    pub avg_temp: f64,     // avg_temp (°C)
    pub min_temp: f64,     // min_temp (°C)
    pub max_temp: f64,     // max_temp (°C)
    pub avg_wind: f64,     // avg_wind (km/h)
    pub min_wind: f64,     // min_wind (km/h)
    pub max_wind: f64,     // max_wind (km/h)
    pub avg_humidity: f64, // avg_humidity (%)
    pub min_humidity: f64, // min_humidity (%), parsed but not surfaced
    pub max_humidity: f64, // max_humidity (%), parsed but not surfaced
}
