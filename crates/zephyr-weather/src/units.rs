//! Metric/imperial conversion and display formatting.
//!
//! Everything stored or cached is metric (°C, km/h). Conversion only happens
//! when a value is formatted for display.

use zephyr_core::UnitSystem;

const KM_PER_MILE: f64 = 1.609344;

pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn to_mph(kmh: f64) -> f64 {
    kmh / KM_PER_MILE
}

/// Rounded temperature with unit, e.g. `"21°C"` or `"70°F"`.
pub fn format_temperature(celsius: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => format!("{}°C", celsius.round() as i64),
        UnitSystem::Imperial => format!("{}°F", to_fahrenheit(celsius).round() as i64),
    }
}

/// Speed with two decimals, e.g. `"12.34 km/h"` or `"7.67 mph"`.
pub fn format_speed(kmh: f64, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => format!("{:.2} km/h", kmh),
        UnitSystem::Imperial => format!("{:.2} mph", to_mph(kmh)),
    }
}
