//! Filename-based behavior classification.
//!
//! The archive encodes each transcript's target behavior in its filename.
//! Classification is a pure, total function: ordered substring checks,
//! first match wins, anything unmatched is `Unknown`.

use crate::types::BehaviorType;

/// Environment-run transcripts carry no behavior name in the filename; they
/// are sycophancy runs and take precedence over every generic pattern.
const ENV_PREFIX_PATTERN: &str = "transcript_env_";

/// Ordered substring patterns. Order matters: the first containing pattern
/// decides the category.
const PATTERNS: &[(&str, BehaviorType)] = &[
    ("economic_exploitation", BehaviorType::EconomicExploitation),
    ("power_seeking", BehaviorType::PowerSeeking),
    ("pro_ai_bias", BehaviorType::ProAiBias),
    ("shutdown_resistance", BehaviorType::ShutdownResistance),
    ("disempowerment", BehaviorType::Disempowerment),
    ("scheming", BehaviorType::Scheming),
    ("sycophancy", BehaviorType::Sycophancy),
];

/// Classify a transcript filename into its behavior category.
pub fn behavior_type(filename: &str) -> BehaviorType {
    if filename.contains(ENV_PREFIX_PATTERN) {
        return BehaviorType::Sycophancy;
    }
    for (pattern, behavior) in PATTERNS {
        if filename.contains(pattern) {
            return *behavior;
        }
    }
    BehaviorType::Unknown
}
