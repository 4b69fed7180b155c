//! Planet size categories derived from radius.
//!
//! Two taxonomies exist deliberately: the seven-bucket scheme used by the
//! authoritative pipeline and a coarser four-bucket scheme used by the
//! fallback heuristic. They are kept as separate functions because merging
//! them would change what degraded answers report.

/// Authoritative bucketing: half-open `[low, high)` ranges, contiguous from 0.
///
/// The `[1.25, 2.0)` range carries a combined label because radius alone does
/// not sharply separate super-Earths from small sub-Neptunes.
const PLANET_TYPE_THRESHOLDS: [(f64, f64, &str); 7] = [
    (0.0, 0.5, "Sub-Earth"),
    (0.5, 1.25, "Earth-sized"),
    (1.25, 2.0, "Super-Earth / Mini-Neptune"),
    (2.0, 4.0, "Mini-Neptune"),
    (4.0, 6.0, "Neptune-like"),
    (6.0, 15.0, "Gas Giant"),
    (15.0, f64::INFINITY, "Super-Jupiter"),
];

/// Classify a radius (Earth radii) into the seven-bucket taxonomy.
///
/// Returns `None` for an absent radius or one outside every range
/// (negative or NaN).
pub fn planet_type_label(radius_earth: Option<f64>) -> Option<&'static str> {
    let radius = radius_earth?;
    PLANET_TYPE_THRESHOLDS
        .iter()
        .find(|&&(low, high, _)| low <= radius && radius < high)
        .map(|&(_, _, label)| label)
}

/// Coarse four-bucket taxonomy used by the fallback heuristic.
pub fn coarse_planet_type_label(radius_earth: f64) -> &'static str {
    if radius_earth < 1.25 {
        "Rocky Planet"
    } else if radius_earth < 2.0 {
        "Super-Earth"
    } else if radius_earth < 4.0 {
        "Mini-Neptune"
    } else {
        "Gas Giant"
    }
}
