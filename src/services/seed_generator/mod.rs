mod json_repair;
mod presets;
mod prompt;

pub use json_repair::parse_lenient;
pub use presets::PresetCatalog;
pub use prompt::build_waypoint_prompt;

use crate::config::PlannerConfig;
use crate::error::{AppError, Result};
use crate::models::{TripType, WaypointSeed};
use crate::services::llm::{CompletionRequest, LlmClient};
use std::sync::Arc;

/// Drafts candidate waypoints for a location, either from a curated preset
/// or by asking the language model.
pub struct SeedGenerator {
    llm: Arc<dyn LlmClient>,
    presets: Option<PresetCatalog>,
    config: PlannerConfig,
}

impl SeedGenerator {
    pub fn new(llm: Arc<dyn LlmClient>, presets: Option<PresetCatalog>, config: PlannerConfig) -> Self {
        SeedGenerator {
            llm,
            presets,
            config,
        }
    }

    /// Produce one seed. `is_retry` marks every planning attempt after the
    /// first, which adds a corrective note to the prompt.
    ///
    /// The model is called up to `seed_model_attempts` times; empty answers,
    /// transport errors and unparseable text all count as a failed call.
    /// The first answer that parses as JSON ends the loop, even when it turns
    /// out not to be a waypoint list.
    pub async fn generate(
        &self,
        location: &str,
        trip_type: TripType,
        is_retry: bool,
    ) -> Result<WaypointSeed> {
        if let Some(seed) = self
            .presets
            .as_ref()
            .and_then(|catalog| catalog.pick(location, trip_type))
        {
            return Ok(seed);
        }

        let prompt = build_waypoint_prompt(location, trip_type, &self.config, is_retry);
        let max_attempts = self.config.seed_model_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self
                .llm
                .complete(CompletionRequest::json_only(prompt.clone()))
                .await
            {
                Ok(Some(content)) => match Self::decode_seed(&content) {
                    Some(seed) => {
                        let seed = seed?;
                        tracing::debug!(
                            attempt,
                            waypoints = seed.len(),
                            "Model proposed {} waypoints on call {}",
                            seed.len(), attempt
                        );
                        return Ok(seed);
                    }
                    None => {
                        tracing::warn!(
                            attempt,
                            content_chars = content.len(),
                            "Model call {}/{}: no waypoint JSON in response",
                            attempt, max_attempts
                        );
                    }
                },
                Ok(None) => {
                    tracing::warn!(attempt, "Model call {}/{}: empty response", attempt, max_attempts);
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        error = %e,
                        "Model call {}/{} failed: {}",
                        attempt, max_attempts, e
                    );
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.config.seed_retry_delay).await;
            }
        }

        Err(AppError::SeedGeneration(format!(
            "no parseable waypoints for {} ({}) after {} model calls",
            location, trip_type, max_attempts
        )))
    }

    /// `None` when no JSON could be recovered; otherwise the decoded seed, or
    /// `SeedValidation` when the JSON has the wrong shape.
    fn decode_seed(content: &str) -> Option<Result<WaypointSeed>> {
        let (value, strategy) = parse_lenient(content)?;
        let decoded = serde_json::from_value::<WaypointSeed>(value).map_err(|e| {
            tracing::warn!(strategy, error = %e, "Parsed JSON is not a waypoint list: {}", e);
            AppError::SeedValidation(format!("model JSON is not a waypoint list: {}", e))
        });
        if decoded.is_ok() {
            tracing::debug!(strategy, "Parsed waypoint JSON using {} strategy", strategy);
        }
        Some(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm::mock::MockLlmClient;
    use std::time::Duration;

    const VALID: &str = r#"{"waypoints":[{"lat":46.0,"lng":7.0,"name":"A"},{"lat":46.01,"lng":7.01,"name":"B"},{"lat":46.0,"lng":7.02,"name":"C"}]}"#;

    fn config() -> PlannerConfig {
        PlannerConfig {
            seed_retry_delay: Duration::ZERO,
            ..PlannerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_first_parseable_answer_wins() {
        let llm = Arc::new(MockLlmClient::texts(vec![VALID]));
        let generator = SeedGenerator::new(llm.clone(), None, config());

        let seed = generator.generate("Testville", TripType::Hiking, false).await.unwrap();
        assert_eq!(seed.len(), 3);
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_retries_after_empty_and_garbage() {
        let llm = Arc::new(MockLlmClient::new(vec![
            Ok(None),
            Ok(Some("Sorry, I can't do that".to_string())),
            Ok(Some(format!("Sure!\n```json\n{}\n```", VALID))),
        ]));
        let generator = SeedGenerator::new(llm.clone(), None, config());

        let seed = generator.generate("Testville", TripType::Hiking, false).await.unwrap();
        assert_eq!(seed.waypoints[1].name, "B");
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_three_calls() {
        let llm = Arc::new(MockLlmClient::new(vec![
            Err("timeout".to_string()),
            Ok(Some("no waypoints today".to_string())),
            Ok(None),
            Ok(Some(VALID.to_string())),
        ]));
        let generator = SeedGenerator::new(llm.clone(), None, config());

        let err = generator
            .generate("Testville", TripType::Cycling, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SeedGeneration(_)));
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn test_wrong_json_shape_is_not_retried() {
        let llm = Arc::new(MockLlmClient::new(vec![
            Ok(Some("{\"route\": []}".to_string())),
            Ok(Some(VALID.to_string())),
        ]));
        let generator = SeedGenerator::new(llm.clone(), None, config());

        let err = generator
            .generate("Testville", TripType::Hiking, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SeedValidation(_)));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_non_object_waypoint_is_not_retried() {
        let llm = Arc::new(MockLlmClient::texts(vec![
            r#"{"waypoints":[{"lat":46.0,"lng":7.0,"name":"A"},"B"]}"#,
            VALID,
        ]));
        let generator = SeedGenerator::new(llm.clone(), None, config());

        let err = generator
            .generate("Testville", TripType::Hiking, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SeedValidation(_)));
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_flag_changes_prompt() {
        let llm = Arc::new(MockLlmClient::texts(vec![VALID, VALID]));
        let generator = SeedGenerator::new(llm.clone(), None, config());

        generator.generate("Testville", TripType::Hiking, false).await.unwrap();
        generator.generate("Testville", TripType::Hiking, true).await.unwrap();

        let prompts = llm.prompts();
        assert!(!prompts[0].contains("PREVIOUS ATTEMPT"));
        assert!(prompts[1].contains("PREVIOUS ATTEMPT"));
    }

    #[tokio::test]
    async fn test_preset_bypasses_model() {
        let llm = Arc::new(MockLlmClient::texts(vec![]));
        let generator = SeedGenerator::new(llm.clone(), Some(PresetCatalog::new(1)), config());

        let seed = generator
            .generate("Queenstown", TripType::Hiking, false)
            .await
            .unwrap();
        assert!(seed.len() >= 6);
        assert_eq!(llm.call_count(), 0);
    }
}
