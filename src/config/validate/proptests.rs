//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_config() -> impl Strategy<Value = PipelineConfig> {
    (
        0.01f64..=1.0,   // threshold
        0.0f64..=0.5,    // blend_min
        0.0f64..=0.5,    // blend span
        1usize..50,      // max_iterations
        0.0f64..=0.5,    // warning
    )
        .prop_map(|(threshold, blend_min, span, max_iterations, warning)| PipelineConfig {
            drift: DriftConfig { threshold, ..Default::default() },
            retrain: RetrainConfig {
                blend_min,
                blend_max: blend_min + span,
                max_iterations,
                ..Default::default()
            },
            timeline: TimelineConfig { warning, critical: warning + 0.2, ..Default::default() },
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_config_passes(config in arb_valid_config()) {
        prop_assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn prop_inverted_blend_range_fails(config in arb_valid_config(), gap in 0.01f64..0.4) {
        let mut config = config;
        config.retrain.blend_max = config.retrain.blend_min;
        config.retrain.blend_min += gap;
        prop_assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidBlendRange(_, _))
        ));
    }

    #[test]
    fn prop_threshold_above_one_fails(config in arb_valid_config(), excess in 0.001f64..10.0) {
        let mut config = config;
        config.drift.threshold = 1.0 + excess;
        prop_assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidThreshold(_))
        ));
    }
}
