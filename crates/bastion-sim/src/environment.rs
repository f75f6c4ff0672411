//! Weather-derived effectiveness multipliers.
//!
//! Each multiplier is an independent step function of one weather reading.
//! No weather means every multiplier is 1.0.

use serde::{Deserialize, Serialize};

/// Point-in-time weather at the area of operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature_c: f64,
    pub wind_speed_ms: f64,
    pub visibility_m: f64,
    /// Rain over the last hour (mm).
    pub rain_1h_mm: f64,
    #[serde(default)]
    pub cloud_cover_pct: f64,
}

/// Five multipliers in `[0, 1]` applied by the detection model and available to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentModifiers {
    /// Applied to thermal and visual detection.
    pub visibility_factor: f64,
    pub wind_factor: f64,
    /// Applied to radar detection.
    pub radar_degradation: f64,
    pub laser_efficiency: f64,
    pub drone_range_factor: f64,
}

impl Default for EnvironmentModifiers {
    fn default() -> Self {
        Self {
            visibility_factor: 1.0,
            wind_factor: 1.0,
            radar_degradation: 1.0,
            laser_efficiency: 1.0,
            drone_range_factor: 1.0,
        }
    }
}

impl EnvironmentModifiers {
    pub fn from_weather(weather: Option<&WeatherSnapshot>) -> Self {
        match weather {
            Some(w) => {
                let (radar_degradation, laser_efficiency) = rain_factors(w.rain_1h_mm);
                Self {
                    visibility_factor: visibility_factor(w.visibility_m),
                    wind_factor: wind_factor(w.wind_speed_ms),
                    radar_degradation,
                    laser_efficiency,
                    drone_range_factor: drone_range_factor(w.temperature_c),
                }
            }
            None => Self::default(),
        }
    }
}

fn visibility_factor(visibility_m: f64) -> f64 {
    if visibility_m < 1000.0 {
        0.3
    } else if visibility_m < 2000.0 {
        0.5
    } else if visibility_m < 5000.0 {
        0.7
    } else if visibility_m < 8000.0 {
        0.85
    } else {
        1.0
    }
}

fn wind_factor(wind_speed_ms: f64) -> f64 {
    if wind_speed_ms > 20.0 {
        0.3
    } else if wind_speed_ms > 15.0 {
        0.5
    } else if wind_speed_ms > 10.0 {
        0.7
    } else if wind_speed_ms > 6.0 {
        0.85
    } else {
        1.0
    }
}

/// (radar degradation, laser efficiency)
fn rain_factors(rain_1h_mm: f64) -> (f64, f64) {
    if rain_1h_mm > 10.0 {
        (0.7, 0.2)
    } else if rain_1h_mm > 5.0 {
        (0.85, 0.4)
    } else if rain_1h_mm > 1.0 {
        (0.95, 0.7)
    } else {
        (1.0, 1.0)
    }
}

fn drone_range_factor(temperature_c: f64) -> f64 {
    if temperature_c < -20.0 {
        0.5
    } else if temperature_c < -10.0 {
        0.7
    } else if temperature_c < 0.0 {
        0.85
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One operator-facing weather advisory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEffect {
    pub text: String,
    pub severity: Severity,
}

impl WeatherEffect {
    fn new(text: &str, severity: Severity) -> Self {
        Self {
            text: text.to_string(),
            severity,
        }
    }
}

/// Tactical impact notes for the current weather, most pressing first within each
/// category. Always returns at least one entry.
pub fn describe_effects(weather: &WeatherSnapshot) -> Vec<WeatherEffect> {
    use Severity::*;

    let mut effects = Vec::new();

    if weather.visibility_m < 2000.0 {
        effects.push(WeatherEffect::new(
            "Low visibility: visual and thermal sensors degraded 60%",
            High,
        ));
    } else if weather.visibility_m < 5000.0 {
        effects.push(WeatherEffect::new(
            "Reduced visibility: visual detection -30%",
            Medium,
        ));
    }

    if weather.wind_speed_ms > 15.0 {
        effects.push(WeatherEffect::new(
            "High winds: FPV drones grounded, loitering munitions -40% accuracy",
            High,
        ));
    } else if weather.wind_speed_ms > 8.0 {
        effects.push(WeatherEffect::new(
            "Moderate winds: small drone speed reduced 20%",
            Medium,
        ));
    }

    if weather.rain_1h_mm > 5.0 {
        effects.push(WeatherEffect::new(
            "Heavy rain: laser CUAS ineffective, thermal degraded",
            High,
        ));
    } else if weather.rain_1h_mm > 1.0 {
        effects.push(WeatherEffect::new("Light rain: laser efficiency -30%", Medium));
    }

    if weather.cloud_cover_pct > 80.0 {
        effects.push(WeatherEffect::new(
            "Dense cloud cover: high-altitude threats harder to track visually",
            Medium,
        ));
    }

    if weather.temperature_c < -10.0 {
        effects.push(WeatherEffect::new(
            "Extreme cold: battery-powered drones lose 30% range",
            Medium,
        ));
    }

    if effects.is_empty() {
        effects.push(WeatherEffect::new(
            "Favorable conditions: all systems nominal",
            Low,
        ));
    }
    effects
}
