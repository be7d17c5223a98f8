// User goals and the setup-flow draft they are created from

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::PlanClock;
use crate::model::new_id;

/// Goal category. Selects the scheduling policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GoalCategory {
    Study,
    Fitness,
    Project,
    Health,
    Career,
    Personal,
}

impl GoalCategory {
    /// Display color used by goal cards and week views.
    pub fn default_color(&self) -> &'static str {
        match self {
            GoalCategory::Study => "#6366f1",
            GoalCategory::Fitness => "#10b981",
            GoalCategory::Health => "#f43f5e",
            GoalCategory::Project => "#f59e0b",
            GoalCategory::Career => "#06b6d4",
            GoalCategory::Personal => "#8b5cf6",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    High,
    Medium,
    Low,
}

/// A user-declared objective. Created by the setup flow; mutated only by
/// progress updates; never deleted during a planning cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: GoalCategory,
    pub priority: GoalPriority,
    pub target_weeks: u32,
    /// Numeric target (e.g. 5000 steps, 20 chapters).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    /// Derived progress projection: for task-based goals this mirrors the
    /// count of done tasks; for fitness goals, today's step count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    pub is_recurring: bool,
    pub color: String,
}

/// Goal fields supplied by the user at setup time; everything else is
/// filled in by `Goal::create`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: GoalCategory,
    #[serde(default = "default_target_weeks")]
    pub target_weeks: u32,
    #[serde(default)]
    pub target_value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl Default for GoalDraft {
    fn default() -> Self {
        GoalDraft {
            title: String::new(),
            description: String::new(),
            category: default_category(),
            target_weeks: default_target_weeks(),
            target_value: None,
            unit: None,
        }
    }
}

fn default_category() -> GoalCategory {
    GoalCategory::Study
}

fn default_target_weeks() -> u32 {
    4
}

impl Goal {
    /// Materialize a draft into a full goal. Fitness goals recur weekly.
    pub fn create(draft: GoalDraft, clock: &PlanClock) -> Self {
        let is_recurring = draft.category == GoalCategory::Fitness;
        let color = draft.category.default_color().to_string();
        Goal {
            id: new_id("goal"),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            priority: GoalPriority::High,
            target_weeks: draft.target_weeks,
            target_value: draft.target_value,
            current_value: Some(0.0),
            unit: draft.unit,
            created_at: clock.now(),
            deadline: None,
            is_recurring,
            color,
        }
    }
}
