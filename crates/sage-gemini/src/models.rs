// Gemini model lineup
//
// The tutoring roles map to different Gemini models: planning wants
// strict JSON discipline, tutoring wants fast conversational turns, and
// DSA coaching leans on the stronger reasoning models.

use sage_core::{ModelSettings, SageConfig, SageConfigBuilder};

/// Strong general model, used for plan generation and DSA tutoring
pub const GEMINI_25_PRO: &str = "gemini-2.5-pro";

/// Fast conversational model, used for standard tutoring turns
pub const GEMINI_25_FLASH: &str = "gemini-2.5-flash";

/// Heavyweight model, used to plan sessions around user-supplied problems
pub const GEMINI_30_PRO: &str = "gemini-3.0-pro";

/// The service configuration pinned to the Gemini lineup.
///
/// `SageConfig::default()` already names Gemini models; this builder is
/// the provider-owned source of truth for the lineup, so callers wiring
/// up `GeminiLlmDriver` are not coupled to the core defaults.
pub fn tutoring_config() -> SageConfig {
    SageConfigBuilder::new()
        .planner(ModelSettings::new(GEMINI_25_PRO, 0.3))
        .tutor(ModelSettings::new(GEMINI_25_FLASH, 0.7))
        .dsa(ModelSettings::new(GEMINI_25_PRO, 0.5))
        .dsa_heavy(ModelSettings::new(GEMINI_30_PRO, 0.5))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_core::SessionMode;

    #[test]
    fn test_lineup_by_role() {
        let config = tutoring_config();
        assert_eq!(config.planner.model, GEMINI_25_PRO);
        assert_eq!(config.tutor.model, GEMINI_25_FLASH);
        assert_eq!(
            config.planner_settings(SessionMode::DsaCustom).model,
            GEMINI_30_PRO
        );
    }

    #[test]
    fn test_tutoring_runs_warmer_than_planning() {
        let config = tutoring_config();
        assert!(config.tutor.temperature > config.planner.temperature);
        assert_eq!(config.summarizer_settings().temperature, 0.3);
    }
}
