//! Presentation helpers derived from raw provider values: condition labels,
//! emoji, cardinal wind directions and moon phases.

use std::f64::consts::PI;

/// Condition label for a provider `main`/`description` pair.
///
/// Partial cloud cover gets its own labels so it can map to distinct emoji.
pub fn condition_label(main: &str, description: &str) -> String {
    match description {
        "few clouds" => "SunWithCloud".to_string(),
        "broken clouds" => "CloudWithSun".to_string(),
        _ => main.to_string(),
    }
}

/// Provider icon codes end in `d` for day and `n` for night.
pub fn is_night_icon(icon: &str) -> bool {
    icon.ends_with('n')
}

pub fn emoji(condition: &str, is_night: bool) -> &'static str {
    match condition {
        "Thunderstorm" => "⛈️",
        "Drizzle" => "🌦️",
        "Rain" => "🌧️",
        "Snow" => "☃️",
        "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" | "Squall" => "🌫️",
        "Tornado" => "🌪️",
        "Clear" if is_night => "🌙",
        "Clear" => "☀️",
        "Clouds" => "☁️",
        "SunWithCloud" => "🌤️",
        "CloudWithSun" => "🌥️",
        _ => "❓",
    }
}

/// 16-point compass rose, one sector per 22.5°, with the arrow showing where
/// the wind blows towards.
const COMPASS: [(&str, &str); 16] = [
    ("N", "⬇️"),
    ("NNE", "↙️"),
    ("NE", "↙️"),
    ("ENE", "↙️"),
    ("E", "⬅️"),
    ("ESE", "↖️"),
    ("SE", "↖️"),
    ("SSE", "↖️"),
    ("S", "⬆️"),
    ("SSW", "↗️"),
    ("SW", "↗️"),
    ("WSW", "↗️"),
    ("W", "➡️"),
    ("WNW", "↘️"),
    ("NW", "↘️"),
    ("NNW", "↘️"),
];

/// Cardinal direction and arrow for a wind bearing in degrees.
///
/// Bearings outside `[0, 360)` wrap around.
pub fn cardinal_direction(degrees: f64) -> (&'static str, &'static str) {
    let sector = (degrees / 22.5).round() as i64;
    COMPASS[sector.rem_euclid(16) as usize]
}

/// Icon and name for a moon phase value in `[0, 1]`.
///
/// 0 and 1 are new moon, 0.25 first quarter, 0.5 full moon and 0.75 last
/// quarter; the periods in between are the crescent and gibbous phases.
pub fn moon_phase(value: f64) -> (&'static str, &'static str) {
    match value {
        v if v == 0.0 || v == 1.0 => ("🌑", "New Moon"),
        v if v > 0.0 && v < 0.25 => ("🌒", "Waxing Crescent"),
        v if v == 0.25 => ("🌓", "First Quarter"),
        v if v > 0.25 && v < 0.5 => ("🌔", "Waxing Gibbous"),
        v if v == 0.5 => ("🌕", "Full Moon"),
        v if v > 0.5 && v < 0.75 => ("🌖", "Waning Gibbous"),
        v if v == 0.75 => ("🌗", "Last Quarter"),
        v if v > 0.75 && v < 1.0 => ("🌘", "Waning Crescent"),
        _ => ("❓", "Unknown moon phase"),
    }
}

/// Approximate illuminated percentage, `sin²(π·phase)`.
pub fn moon_illumination(value: f64) -> u8 {
    let lit = (PI * value).sin().powi(2);
    (lit * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_label() {
        assert_eq!(condition_label("Clouds", "few clouds"), "SunWithCloud");
        assert_eq!(condition_label("Clouds", "broken clouds"), "CloudWithSun");
        assert_eq!(condition_label("Clouds", "overcast clouds"), "Clouds");
    }

    #[test]
    fn test_emoji() {
        assert_eq!(emoji("Clear", false), "☀️");
        assert_eq!(emoji("Clear", true), "🌙");
        assert_eq!(emoji("Haze", false), "🌫️");
        assert_eq!(emoji("Volcano", false), "❓");
    }

    #[test]
    fn test_night_icon() {
        assert!(is_night_icon("01n"));
        assert!(!is_night_icon("01d"));
    }

    #[test]
    fn test_cardinal_direction_bounded() {
        assert_eq!(cardinal_direction(65.4).0, "ENE");
        assert_eq!(cardinal_direction(0.0), ("N", "⬇️"));
        assert_eq!(cardinal_direction(359.0).0, "N");
    }

    #[test]
    fn test_cardinal_direction_wraps() {
        assert_eq!(cardinal_direction(450.3).0, "E");
        assert_eq!(cardinal_direction(-90.0).0, "W");
    }

    #[test]
    fn test_moon_phase_boundaries() {
        assert_eq!(moon_phase(0.0).1, "New Moon");
        assert_eq!(moon_phase(1.0).1, "New Moon");
        assert_eq!(moon_phase(0.1).1, "Waxing Crescent");
        assert_eq!(moon_phase(0.25).1, "First Quarter");
        assert_eq!(moon_phase(0.4).1, "Waxing Gibbous");
        assert_eq!(moon_phase(0.5).1, "Full Moon");
        assert_eq!(moon_phase(0.6).1, "Waning Gibbous");
        assert_eq!(moon_phase(0.75).1, "Last Quarter");
        assert_eq!(moon_phase(0.9).1, "Waning Crescent");
        assert_eq!(moon_phase(1.5).1, "Unknown moon phase");
    }

    #[test]
    fn test_moon_illumination() {
        assert_eq!(moon_illumination(0.0), 0);
        assert_eq!(moon_illumination(0.5), 100);
        assert_eq!(moon_illumination(0.25), 50);
    }
}
