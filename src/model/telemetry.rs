// Engine output records: reasoning trail, agent actions, micro-adjustments,
// coach messages, and plan snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{new_id, Goal, Task};

/// Phase labels for the five-step reasoning trail. The trail is a
/// side-channel audit log, never control flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningPhase {
    Understand,
    Propose,
    Execute,
    Observe,
    Update,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningStep {
    pub id: String,
    pub phase: ReasoningPhase,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl ReasoningStep {
    pub fn new(
        phase: ReasoningPhase,
        title: impl Into<String>,
        description: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        ReasoningStep {
            id: new_id("reason"),
            phase,
            title: title.into(),
            description: description.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentActionKind {
    GeneratePlan,
    Replan,
    CheckProgress,
    AnalyzeBehavior,
    SuggestAdjustment,
    SyncFitness,
}

/// One completed engine invocation, recorded for the activity timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentAction {
    pub id: String,
    pub kind: AgentActionKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl AgentAction {
    pub fn completed(
        kind: AgentActionKind,
        input: impl Into<String>,
        output: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        AgentAction {
            id: new_id("action"),
            kind,
            timestamp,
            input: Some(input.into()),
            output: Some(output.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    ShortenSession,
    AddBreak,
    ReduceDifficulty,
    Reschedule,
    Motivational,
    SwapTask,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

/// A discrete, typed schedule modification suggested by policy. Suggestions
/// are additive; the task mutation happens only when one is applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroAdjustment {
    pub id: String,
    pub kind: AdjustmentKind,
    pub title: String,
    pub description: String,
    pub reason: String,
    pub impact: Impact,
    pub applied: bool,
    pub suggested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<DateTime<Utc>>,
}

impl MicroAdjustment {
    pub fn suggest(
        kind: AdjustmentKind,
        title: impl Into<String>,
        description: impl Into<String>,
        reason: impl Into<String>,
        impact: Impact,
        suggested_at: DateTime<Utc>,
    ) -> Self {
        MicroAdjustment {
            id: new_id("adj"),
            kind,
            title: title.into(),
            description: description.into(),
            reason: reason.into(),
            impact,
            applied: false,
            suggested_at,
            applied_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CoachKind {
    Celebration,
    Encouragement,
    Feedback,
    Suggestion,
    Warning,
}

/// Coaching feedback synthesized once per replan cycle; immutable after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachMessage {
    pub id: String,
    pub message: String,
    pub kind: CoachKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_goal_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotLabel {
    Initial,
    Replan,
    Adjustment,
}

/// Point-in-time value copy of the task and goal collections. Snapshot
/// contents are unaffected by later mutation of the live lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSnapshot {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<Task>,
    pub goals: Vec<Goal>,
    pub label: SnapshotLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PlanSnapshot {
    pub fn capture(
        label: SnapshotLabel,
        tasks: &[Task],
        goals: &[Goal],
        reason: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        PlanSnapshot {
            id: new_id("snap"),
            created_at,
            tasks: tasks.to_vec(),
            goals: goals.to_vec(),
            label,
            reason: Some(reason.into()),
        }
    }
}
