// Rule-based task generation
//
// Deterministic generator backed by the built-in curriculum and fitness
// templates. Always succeeds, which makes it the terminal link of every
// generator chain.

use anyhow::Result;
use async_trait::async_trait;

use super::TaskGenerator;
use crate::clock::PlanClock;
use crate::config::UserProfile;
use crate::model::{CalendarEvent, Goal};
use crate::planner::{generate_plan, PlanOutcome};

#[derive(Debug, Clone, Default)]
pub struct RuleBasedGenerator;

#[async_trait]
impl TaskGenerator for RuleBasedGenerator {
    async fn generate_tasks(
        &self,
        goal: &Goal,
        profile: &UserProfile,
        events: &[CalendarEvent],
        clock: &PlanClock,
    ) -> Result<PlanOutcome> {
        Ok(generate_plan(goal, profile, events, clock))
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}
