//! Always-available heuristic classifier for degraded service.
//!
//! Approximates the authoritative output shape without contacting anything.
//! The confidence is a synthetic stand-in, not a model output, and the
//! verdict is a conjunctive plausibility screen, not a trained boundary.

use exovet_core::{
    coarse_planet_type_label, round_confidence, CandidateRecord, ClassificationResult,
    ResultDetails,
};
use rand::Rng;

/// Marker distinguishing a degraded answer from an authoritative one.
pub const FALLBACK_NOTE: &str =
    "This prediction was generated by the local fallback heuristic because the authoritative classifier was unavailable";

/// Synthetic confidence range.
const CONFIDENCE_LOW: f64 = 0.6;
const CONFIDENCE_HIGH: f64 = 0.95;

/// Plausibility screen: all four must hold for a positive verdict.
const MIN_PERIOD_DAYS: f64 = 0.5;
const MIN_DEPTH_PPM: f64 = 50.0;
const MIN_SNR: f64 = 7.0;
const MIN_CONFIDENCE: f64 = 0.7;

/// Radius assumed when the input omits one.
const DEFAULT_RADIUS_EARTH: f64 = 1.0;

/// Where the synthetic confidence comes from. Production draws uniformly;
/// tests pin a value.
pub trait ConfidenceSource: Send + Sync {
    fn draw(&self) -> f64;
}

/// Uniform draw over [0.6, 0.95].
#[derive(Debug, Default)]
pub struct UniformConfidence;

impl ConfidenceSource for UniformConfidence {
    fn draw(&self) -> f64 {
        rand::thread_rng().gen_range(CONFIDENCE_LOW..=CONFIDENCE_HIGH)
    }
}

/// Local heuristic classifier used when the delegated path degrades.
pub struct FallbackClassifier {
    confidence: Box<dyn ConfidenceSource>,
}

impl Default for FallbackClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackClassifier {
    pub fn new() -> Self {
        Self::with_confidence_source(Box::new(UniformConfidence))
    }

    pub fn with_confidence_source(source: Box<dyn ConfidenceSource>) -> Self {
        Self { confidence: source }
    }

    /// Produce a degraded result for the candidate.
    pub fn classify(&self, record: &CandidateRecord) -> ClassificationResult {
        let confidence = round_confidence(self.confidence.draw());

        let radius = record.koi_prad.unwrap_or(DEFAULT_RADIUS_EARTH);
        let planet_type = coarse_planet_type_label(radius);

        let period = record.koi_period.unwrap_or(0.0);
        let depth = record.koi_depth.unwrap_or(0.0);
        let snr = record.koi_model_snr.unwrap_or(0.0);
        let is_exoplanet = period > MIN_PERIOD_DAYS
            && depth > MIN_DEPTH_PPM
            && snr > MIN_SNR
            && confidence > MIN_CONFIDENCE;

        ClassificationResult {
            candidate_identifier: record.candidate_identifier.clone(),
            is_exoplanet: Some(is_exoplanet),
            confidence: Some(confidence),
            details: Some(ResultDetails {
                planet_name: None,
                planet_type: Some(planet_type.to_string()),
                radius_earth: record.koi_prad,
                orbital_period_days: record.koi_period,
                equilibrium_temp_kelvin: record.koi_teq,
            }),
            note: Some(FALLBACK_NOTE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pinned(f64);

    impl ConfidenceSource for Pinned {
        fn draw(&self) -> f64 {
            self.0
        }
    }

    fn pinned(confidence: f64) -> FallbackClassifier {
        FallbackClassifier::with_confidence_source(Box::new(Pinned(confidence)))
    }

    fn strong_candidate() -> CandidateRecord {
        CandidateRecord {
            candidate_identifier: "K00889.01".into(),
            koi_period: Some(35.5),
            koi_time0bk: Some(140.5),
            koi_impact: Some(0.2),
            koi_duration: Some(4.5),
            koi_depth: Some(1550.2),
            koi_prad: Some(2.24),
            koi_teq: Some(793.0),
            koi_insol: Some(93.6),
            koi_model_snr: Some(12.7),
            koi_steff: Some(5912.0),
            koi_slogg: Some(4.45),
            koi_srad: Some(0.92),
            ra: Some(297.0),
            dec: Some(46.9),
            koi_kepmag: Some(15.2),
        }
    }

    #[test]
    fn well_detected_signal_screens_positive() {
        let result = pinned(0.82).classify(&strong_candidate());
        assert_eq!(result.is_exoplanet, Some(true));
        assert_eq!(result.confidence, Some(0.82));
        let details = result.details.unwrap();
        assert_eq!(details.planet_type.as_deref(), Some("Mini-Neptune"));
        assert_eq!(details.radius_earth, Some(2.24));
        assert_eq!(details.orbital_period_days, Some(35.5));
        assert_eq!(details.equilibrium_temp_kelvin, Some(793.0));
        assert_eq!(result.note.as_deref(), Some(FALLBACK_NOTE));
    }

    #[test]
    fn each_screen_condition_is_required() {
        let mut short_period = strong_candidate();
        short_period.koi_period = Some(0.4);
        assert_eq!(pinned(0.82).classify(&short_period).is_exoplanet, Some(false));

        let mut shallow = strong_candidate();
        shallow.koi_depth = Some(40.0);
        assert_eq!(pinned(0.82).classify(&shallow).is_exoplanet, Some(false));

        let mut noisy = strong_candidate();
        noisy.koi_model_snr = Some(5.0);
        assert_eq!(pinned(0.82).classify(&noisy).is_exoplanet, Some(false));

        // Confidence at or below 0.7 fails the screen even for a clean signal.
        assert_eq!(pinned(0.65).classify(&strong_candidate()).is_exoplanet, Some(false));
        assert_eq!(pinned(0.7).classify(&strong_candidate()).is_exoplanet, Some(false));
    }

    #[test]
    fn boundary_values_do_not_pass_strict_comparisons() {
        let mut edge = strong_candidate();
        edge.koi_period = Some(0.5);
        edge.koi_depth = Some(50.0);
        edge.koi_model_snr = Some(7.0);
        assert_eq!(pinned(0.9).classify(&edge).is_exoplanet, Some(false));
    }

    #[test]
    fn missing_radius_defaults_to_rocky() {
        let mut record = strong_candidate();
        record.koi_prad = None;
        let result = pinned(0.82).classify(&record);
        let details = result.details.unwrap();
        assert_eq!(details.planet_type.as_deref(), Some("Rocky Planet"));
        // The reported radius stays absent; only the bucketing used a default.
        assert_eq!(details.radius_earth, None);
    }

    #[test]
    fn coarse_buckets_drive_the_label() {
        let mut giant = strong_candidate();
        giant.koi_prad = Some(11.2);
        let details = pinned(0.82).classify(&giant).details.unwrap();
        assert_eq!(details.planet_type.as_deref(), Some("Gas Giant"));

        let mut super_earth = strong_candidate();
        super_earth.koi_prad = Some(1.5);
        let details = pinned(0.82).classify(&super_earth).details.unwrap();
        // The coarse scheme, not the seven-bucket combined label.
        assert_eq!(details.planet_type.as_deref(), Some("Super-Earth"));
    }

    #[test]
    fn confidence_is_rounded() {
        let result = pinned(0.876_543_219).classify(&strong_candidate());
        assert_eq!(result.confidence, Some(0.876_543));
    }

    #[test]
    fn uniform_draws_stay_in_range() {
        let source = UniformConfidence;
        for _ in 0..200 {
            let value = source.draw();
            assert!((CONFIDENCE_LOW..=CONFIDENCE_HIGH).contains(&value));
        }
    }
}
