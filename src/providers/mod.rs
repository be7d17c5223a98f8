// Task generation providers
//
// Abstraction over the different ways a weekly plan can be produced: a
// Gemini-backed generator when AI generation is enabled, and the built-in
// rule-based generator that always works. The chain tries generators in
// order and returns the first success.

use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

pub mod gemini;
pub mod rule_based;

pub use gemini::GeminiGenerator;
pub use rule_based::RuleBasedGenerator;

use crate::clock::PlanClock;
use crate::config::Config;
use crate::model::{CalendarEvent, Goal};
use crate::planner::PlanOutcome;

/// Strategy for turning one goal into a week of tasks.
#[async_trait]
pub trait TaskGenerator: Send + Sync {
    async fn generate_tasks(
        &self,
        goal: &Goal,
        profile: &crate::config::UserProfile,
        events: &[CalendarEvent],
        clock: &PlanClock,
    ) -> Result<PlanOutcome>;

    /// Generator name for logs and diagnostics.
    fn name(&self) -> &str;
}

/// Ordered fallback chain of generators.
///
/// Construction guarantees at least one link; `build_generator` always puts
/// the rule-based generator last, so the chain as a whole cannot fail for
/// reasons other than an empty goal set upstream.
pub struct GeneratorChain {
    generators: Vec<Box<dyn TaskGenerator>>,
}

impl GeneratorChain {
    pub fn new(generators: Vec<Box<dyn TaskGenerator>>) -> Self {
        assert!(!generators.is_empty(), "generator chain cannot be empty");
        Self { generators }
    }

    pub async fn generate_tasks(
        &self,
        goal: &Goal,
        profile: &crate::config::UserProfile,
        events: &[CalendarEvent],
        clock: &PlanClock,
    ) -> Result<PlanOutcome> {
        let mut last_err = None;
        for generator in &self.generators {
            match generator.generate_tasks(goal, profile, events, clock).await {
                Ok(outcome) => {
                    tracing::debug!(generator = generator.name(), "plan generated");
                    return Ok(outcome);
                }
                Err(e) => {
                    warn!(
                        generator = generator.name(),
                        error = %e,
                        "generator failed, trying next"
                    );
                    last_err = Some(e);
                }
            }
        }
        // Unreachable with a rule-based tail, but the chain is generic.
        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("no generators configured")))
    }
}

/// Build the generator chain described by the config: Gemini first when AI
/// generation is enabled and a key is available, rule-based always last.
pub fn build_generator(config: &Config) -> Result<GeneratorChain> {
    let mut generators: Vec<Box<dyn TaskGenerator>> = Vec::new();

    if config.features.ai_generation {
        match config.features.gemini_api_key() {
            Some(key) => generators.push(Box::new(GeminiGenerator::new(key)?)),
            None => warn!("ai_generation enabled but no Gemini API key found"),
        }
    }

    generators.push(Box::new(RuleBasedGenerator));
    Ok(GeneratorChain::new(generators))
}
