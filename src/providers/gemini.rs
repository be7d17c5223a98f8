// Gemini-backed task generation
//
// Asks the Gemini API for a week of tasks as a JSON array, then validates
// every row before it is allowed into the plan. Any malformed or
// unparseable response is an error so the chain can fall back to the
// rule-based generator.

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TaskGenerator;
use crate::clock::PlanClock;
use crate::config::UserProfile;
use crate::model::{
    new_id, AgentAction, AgentActionKind, CalendarEvent, Goal, ReasoningPhase, ReasoningStep,
    Task, TaskDifficulty, TaskStatus, WallTime,
};
use crate::planner::{slots, PlanOutcome};

const REQUEST_TIMEOUT_SECS: u64 = 60;
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const MIN_SESSION_MINUTES: u32 = 15;
const MAX_SESSION_MINUTES: u32 = 180;

/// Task generator backed by Gemini 2.0 Flash.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model: "gemini-2.0-flash-exp".to_string(),
        })
    }

    /// Create with a custom model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn build_prompt(
        &self,
        goal: &Goal,
        profile: &UserProfile,
        events: &[CalendarEvent],
    ) -> String {
        let busy: Vec<String> = events
            .iter()
            .map(|e| {
                format!(
                    "- {} on {} from {} to {}",
                    e.title,
                    e.start.date(),
                    e.start.time().format("%H:%M"),
                    e.end.time().format("%H:%M"),
                )
            })
            .collect();
        let busy = if busy.is_empty() {
            "none".to_string()
        } else {
            busy.join("\n")
        };

        format!(
            "You are a personal scheduling assistant. Create a 7-day task plan for this goal:\n\
             Goal: {} ({:?}, {} weeks)\n\
             Description: {}\n\n\
             The user has about {} minutes available per day, prefers sessions of \
             {} minutes, and focuses best between {} and {}.\n\n\
             Busy calendar slots to avoid:\n{}\n\n\
             Respond with ONLY a JSON array. Each element must have exactly these \
             fields: \"day\" (integer 0-6, 0 = today), \"title\" (string), \
             \"description\" (string), \"startTime\" (\"HH:MM\", 24-hour), \
             \"durationMinutes\" (integer), \"difficulty\" (\"easy\", \"medium\" \
             or \"hard\"). No markdown, no commentary.",
            goal.title,
            goal.category,
            goal.target_weeks,
            goal.description,
            profile.daily_available_minutes,
            profile.preferences.preferred_session_length,
            profile.preferences.focus_time_start,
            profile.preferences.focus_time_end,
            busy,
        )
    }

    async fn request_plan_text(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.4,
                max_output_tokens: 4096,
            },
        };

        tracing::debug!(model = %self.model, "sending plan request to Gemini");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Gemini API request failed\n\nStatus: {}\nBody: {}",
                status,
                error_body
            );
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        let candidate = gemini_response
            .candidates
            .into_iter()
            .next()
            .context("Gemini returned no candidates in response")?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|p| p.text)
            .collect();

        if text.is_empty() {
            anyhow::bail!("Gemini returned an empty response");
        }
        Ok(text)
    }

    fn parse_tasks(
        &self,
        text: &str,
        goal: &Goal,
        events: &[CalendarEvent],
        clock: &PlanClock,
    ) -> Result<Vec<Task>> {
        let json = extract_json_array(text)
            .context("Gemini response did not contain a JSON array")?;
        let rows: Vec<RawTask> =
            serde_json::from_str(&json).context("Failed to parse task array from Gemini")?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            if row.day > 6 {
                tracing::warn!(day = row.day, "dropping Gemini task outside the week");
                continue;
            }
            let start: WallTime = row
                .start_time
                .parse()
                .with_context(|| format!("Invalid start time '{}' from Gemini", row.start_time))?;
            let minutes = row
                .duration_minutes
                .clamp(MIN_SESSION_MINUTES, MAX_SESSION_MINUTES);

            if slots::has_conflict(start, minutes, row.day as i64, events, clock) {
                tracing::warn!(title = %row.title, "dropping Gemini task that collides with calendar");
                continue;
            }

            tasks.push(Task {
                id: new_id("task"),
                goal_id: goal.id.clone(),
                title: row.title,
                description: row.description,
                day_index: row.day,
                scheduled_date: clock.date_for_day(row.day as i64),
                estimated_minutes: minutes,
                actual_minutes: None,
                start_time: start,
                end_time: Some(start.add_minutes(minutes as i32)),
                status: TaskStatus::Pending,
                difficulty: row.difficulty.unwrap_or(TaskDifficulty::Medium),
                completed_at: None,
                notes: None,
            });
        }

        if tasks.is_empty() {
            anyhow::bail!("Gemini produced no usable tasks");
        }
        tasks.sort_by(|a, b| {
            a.day_index
                .cmp(&b.day_index)
                .then(a.start_time.cmp(&b.start_time))
        });
        Ok(tasks)
    }
}

#[async_trait]
impl TaskGenerator for GeminiGenerator {
    async fn generate_tasks(
        &self,
        goal: &Goal,
        profile: &UserProfile,
        events: &[CalendarEvent],
        clock: &PlanClock,
    ) -> Result<PlanOutcome> {
        let now = clock.now();
        let prompt = self.build_prompt(goal, profile, events);
        let text = self.request_plan_text(&prompt).await?;
        let tasks = self.parse_tasks(&text, goal, events, clock)?;

        let reasoning = vec![
            ReasoningStep::new(
                ReasoningPhase::Understand,
                "Analyzing User State",
                format!(
                    "Delegating plan generation for '{}' to {}.",
                    goal.title, self.model,
                ),
                now,
            ),
            ReasoningStep::new(
                ReasoningPhase::Propose,
                "Designing Schedule Strategy",
                "Asked the model for a 7-day plan around the calendar and focus hours.",
                now,
            ),
            ReasoningStep::new(
                ReasoningPhase::Execute,
                "Generating Task Schedule",
                format!("Received {} candidate tasks from the model.", tasks.len()),
                now,
            ),
            ReasoningStep::new(
                ReasoningPhase::Observe,
                "Validating Schedule",
                "Dropped out-of-range days and calendar collisions, clamped durations.",
                now,
            ),
            ReasoningStep::new(
                ReasoningPhase::Update,
                "Plan Ready",
                format!("Accepted {} tasks into the weekly plan.", tasks.len()),
                now,
            ),
        ];

        let action = AgentAction::completed(
            AgentActionKind::GeneratePlan,
            serde_json::json!({ "goal": goal.title, "category": goal.category }).to_string(),
            format!("Generated {} tasks for 7-day plan", tasks.len()),
            now,
        );

        Ok(PlanOutcome {
            tasks,
            reasoning,
            actions: vec![action],
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Pull the first JSON array out of a model reply, tolerating markdown
/// code fences around it.
fn extract_json_array(text: &str) -> Option<String> {
    let fence = Regex::new(r"```(?:json)?\s*([\s\S]*?)```").ok()?;
    let body = fence
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(text);

    let start = body.find('[')?;
    let end = body.rfind(']')?;
    if end <= start {
        return None;
    }
    Some(body[start..=end].to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    day: u8,
    title: String,
    #[serde(default)]
    description: String,
    start_time: String,
    duration_minutes: u32,
    #[serde(default)]
    difficulty: Option<TaskDifficulty>,
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: i32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
    #[serde(rename = "finishReason")]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GoalDraft;

    fn clock() -> PlanClock {
        PlanClock::fixed_from_ymd(2026, 8, 26)
    }

    fn goal() -> Goal {
        Goal::create(
            GoalDraft {
                title: "Learn Rust".to_string(),
                ..Default::default()
            },
            &clock(),
        )
    }

    #[test]
    fn test_extract_json_array_handles_code_fences() {
        let fenced = "Here is the plan:\n```json\n[{\"day\": 0}]\n```";
        assert_eq!(extract_json_array(fenced).unwrap(), "[{\"day\": 0}]");

        let bare = "[1, 2, 3]";
        assert_eq!(extract_json_array(bare).unwrap(), "[1, 2, 3]");

        assert!(extract_json_array("no array here").is_none());
    }

    #[test]
    fn test_parse_tasks_validates_rows() {
        let gen = GeminiGenerator::new("test-key".to_string()).unwrap();
        let text = r#"[
            {"day": 0, "title": "Read ownership chapter", "description": "Book ch. 4",
             "startTime": "18:00", "durationMinutes": 45, "difficulty": "medium"},
            {"day": 9, "title": "Out of range", "description": "",
             "startTime": "18:00", "durationMinutes": 45},
            {"day": 1, "title": "Tiny session", "description": "",
             "startTime": "19:00", "durationMinutes": 5}
        ]"#;

        let tasks = gen.parse_tasks(text, &goal(), &[], &clock()).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "Read ownership chapter");
        assert_eq!(tasks[0].difficulty, TaskDifficulty::Medium);
        // Durations are clamped into the sane range.
        assert_eq!(tasks[1].estimated_minutes, MIN_SESSION_MINUTES);
        assert_eq!(tasks[1].scheduled_date, clock().date_for_day(1));
    }

    #[test]
    fn test_parse_tasks_rejects_bad_times() {
        let gen = GeminiGenerator::new("test-key".to_string()).unwrap();
        let text = r#"[{"day": 0, "title": "t", "description": "",
            "startTime": "25:00", "durationMinutes": 45}]"#;
        assert!(gen.parse_tasks(text, &goal(), &[], &clock()).is_err());
    }

    #[test]
    fn test_all_rows_invalid_is_an_error() {
        let gen = GeminiGenerator::new("test-key".to_string()).unwrap();
        let text = r#"[{"day": 7, "title": "t", "description": "",
            "startTime": "18:00", "durationMinutes": 45}]"#;
        assert!(gen.parse_tasks(text, &goal(), &[], &clock()).is_err());
    }

    #[test]
    fn test_custom_model() {
        let gen = GeminiGenerator::new("test-key".to_string())
            .unwrap()
            .with_model("gemini-pro");
        assert_eq!(gen.model, "gemini-pro");
    }
}
