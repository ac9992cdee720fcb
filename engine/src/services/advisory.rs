//! Deterministic advisory rules: fertilizer, pest/disease, and
//! explanation text
//!
//! Pure functions over plain data; no I/O and no failure modes.
//!
//! Fertilizer guidance table (per nutrient, checked independently):
//!
//! | condition            | sentence                  |
//! |----------------------|---------------------------|
//! | nitrogen < threshold | urea / compost guidance   |
//! | phosphorus < threshold | DAP / bone meal guidance |
//! | potassium < threshold | potash / wood ash guidance |
//! | none deficient       | balanced-soil sentence    |
//!
//! The default threshold (40 mg/kg) comes from
//! `AdvisoryConfig::deficiency_threshold`.

use shared::{normalize_season, WeatherObservation};

/// Humidity above this always dominates the pest rules.
pub const HIGH_HUMIDITY_THRESHOLD: f64 = 80.0;

/// Crops with elevated stem-borer pressure.
const STEM_BORER_CROPS: [&str; 2] = ["rice", "wheat"];

const NITROGEN_ADVICE: &str = "Apply urea or compost to improve nitrogen levels.";
const PHOSPHORUS_ADVICE: &str = "Use DAP or bone meal to increase phosphorus.";
const POTASSIUM_ADVICE: &str = "Add potash or wood ash for potassium boost.";
const BALANCED_ADVICE: &str = "Soil nutrients are balanced. Maintain with organic compost.";

const FUNGAL_WARNING: &str = "High humidity detected. Monitor for fungal diseases like leaf \
    blight and use neem-based bio-fungicides if symptoms appear.";
const STEM_BORER_WARNING: &str = "Watch for stem borers and apply pheromone traps if needed.";
const APHID_WARNING: &str = "Check for aphids and mites. Encourage natural predators.";
const SCOUTING_ADVICE: &str = "Regular field scouting is advised for early pest detection.";

/// One sentence per deficient nutrient, in nitrogen, phosphorus,
/// potassium order; the balanced-soil sentence when none are
/// deficient.
pub fn fertilizer_recommendation(
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    deficiency_threshold: f64,
) -> String {
    let mut recommendations = Vec::new();
    if nitrogen < deficiency_threshold {
        recommendations.push(NITROGEN_ADVICE);
    }
    if phosphorus < deficiency_threshold {
        recommendations.push(PHOSPHORUS_ADVICE);
    }
    if potassium < deficiency_threshold {
        recommendations.push(POTASSIUM_ADVICE);
    }

    if recommendations.is_empty() {
        return BALANCED_ADVICE.to_string();
    }
    recommendations.join(" ")
}

/// Priority-ordered pest/disease rules; exactly one branch fires.
///
/// 1. humidity above the high-humidity threshold: fungal warning,
///    regardless of crop or season
/// 2. crop in the stem-borer set: stem-borer warning
/// 3. season "summer" (case-insensitive): aphid/mite warning
/// 4. otherwise: generic scouting advice
pub fn pest_disease_advisory(crop: &str, humidity: f64, season: &str) -> String {
    if humidity > HIGH_HUMIDITY_THRESHOLD {
        return FUNGAL_WARNING.to_string();
    }

    let crop = crop.trim().to_lowercase();
    if STEM_BORER_CROPS.contains(&crop.as_str()) {
        return STEM_BORER_WARNING.to_string();
    }

    if normalize_season(season) == "summer" {
        return APHID_WARNING.to_string();
    }

    SCOUTING_ADVICE.to_string()
}

/// Compose the human-readable explanation paragraph.
///
/// Names the crop, restates the observation (temperature, rainfall,
/// humidity), states the confidence as a whole percentage when
/// present, and appends the fertilizer text verbatim. Total on all
/// valid input.
pub fn build_explanation(
    crop: &str,
    fertilizer: &str,
    weather: &WeatherObservation,
    confidence: Option<f64>,
) -> String {
    let suitability = match confidence {
        Some(value) => format!(
            "{crop} is a suitable crop (confidence {:.0}%)",
            value * 100.0
        ),
        None => format!("{crop} is a suitable crop"),
    };

    format!(
        "Based on your soil nutrients and current weather, {suitability}. \
         Weather shows temperature {:.1}°C with {:.1}mm rainfall at {:.0}% humidity. \
         Fertilizer guidance: {fertilizer}",
        weather.temperature_celsius, weather.rainfall_mm, weather.humidity_percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fertilizer_all_deficient_concatenates_in_order() {
        let advice = fertilizer_recommendation(10.0, 20.0, 30.0, 40.0);
        assert_eq!(
            advice,
            format!("{NITROGEN_ADVICE} {PHOSPHORUS_ADVICE} {POTASSIUM_ADVICE}")
        );
    }

    #[test]
    fn test_fertilizer_balanced_soil() {
        assert_eq!(fertilizer_recommendation(40.0, 40.0, 40.0, 40.0), BALANCED_ADVICE);
        assert_eq!(fertilizer_recommendation(90.0, 60.0, 55.0, 40.0), BALANCED_ADVICE);
    }

    #[test]
    fn test_fertilizer_single_deficiency() {
        assert_eq!(
            fertilizer_recommendation(39.9, 50.0, 50.0, 40.0),
            NITROGEN_ADVICE
        );
        assert_eq!(
            fertilizer_recommendation(50.0, 50.0, 12.0, 40.0),
            POTASSIUM_ADVICE
        );
    }

    #[test]
    fn test_pest_high_humidity_dominates() {
        assert_eq!(
            pest_disease_advisory("anything", 85.0, "winter"),
            FUNGAL_WARNING
        );
        assert_eq!(pest_disease_advisory("rice", 80.1, "summer"), FUNGAL_WARNING);
    }

    #[test]
    fn test_pest_stem_borer_crops() {
        assert_eq!(
            pest_disease_advisory("rice", 50.0, "winter"),
            STEM_BORER_WARNING
        );
        assert_eq!(
            pest_disease_advisory("Wheat", 50.0, "summer"),
            STEM_BORER_WARNING
        );
    }

    #[test]
    fn test_pest_summer_aphids() {
        assert_eq!(pest_disease_advisory("maize", 50.0, "summer"), APHID_WARNING);
        assert_eq!(pest_disease_advisory("maize", 50.0, "SUMMER"), APHID_WARNING);
    }

    #[test]
    fn test_pest_default_scouting() {
        assert_eq!(
            pest_disease_advisory("maize", 50.0, "winter"),
            SCOUTING_ADVICE
        );
    }

    #[test]
    fn test_explanation_with_confidence() {
        let weather = WeatherObservation {
            temperature_celsius: 27.5,
            rainfall_mm: 120.0,
            humidity_percent: 70.0,
        };
        let text = build_explanation("rice", BALANCED_ADVICE, &weather, Some(0.87));

        assert!(text.contains("rice is a suitable crop (confidence 87%)"));
        assert!(text.contains("27.5°C"));
        assert!(text.contains("120.0mm"));
        assert!(text.contains("70% humidity"));
        assert!(text.ends_with(BALANCED_ADVICE));
    }

    #[test]
    fn test_explanation_without_confidence_omits_the_clause() {
        let weather = WeatherObservation {
            temperature_celsius: 24.0,
            rainfall_mm: 60.0,
            humidity_percent: 55.0,
        };
        let text = build_explanation("maize", NITROGEN_ADVICE, &weather, None);

        assert!(text.contains("maize is a suitable crop."));
        assert!(!text.contains("confidence"));
    }
}
