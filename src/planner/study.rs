// Study-policy synthesizer
//
// Models a fixed 5-unit × 4-subtopic syllabus distributed over the 7-day
// horizon: 3 tasks/day on days 0–5 and 2 on day 6 (capacity 20). Placement
// starts at the user's focus-window start and dodges busy intervals in
// 30-minute steps, abandoning any slot pushed past 22:00.

use crate::clock::PlanClock;
use crate::config::UserProfile;
use crate::model::{new_id, CalendarEvent, Goal, Task, TaskDifficulty, TaskStatus};
use crate::planner::slots::{has_conflict, LATEST_START, RETRY_STEP_MINUTES};

const UNITS: usize = 5;
const SUBTOPICS_PER_UNIT: usize = 4;

const TOPIC_TITLES: [[&str; SUBTOPICS_PER_UNIT]; UNITS] = [
    ["Introduction to ML", "Types of Learning", "ML Pipeline", "Data Preprocessing"],
    ["Linear Regression", "Logistic Regression", "Gradient Descent", "Model Evaluation"],
    ["Decision Trees", "Random Forests", "SVM Basics", "Ensemble Methods"],
    ["Neural Networks Intro", "Backpropagation", "CNNs Overview", "RNNs Overview"],
    ["Clustering (K-Means)", "Dimensionality Reduction", "PCA", "Final Review"],
];

const TOPIC_DESCRIPTIONS: [[&str; SUBTOPICS_PER_UNIT]; UNITS] = [
    [
        "Understanding what machine learning is and its applications",
        "Supervised, unsupervised, and reinforcement learning",
        "Steps from data collection to deployment",
        "Cleaning, normalizing, and preparing data",
    ],
    [
        "Predicting continuous values with linear models",
        "Classification using sigmoid function",
        "Optimizing model parameters",
        "Accuracy, precision, recall, and F1 score",
    ],
    [
        "Building tree-based classifiers",
        "Ensemble of decision trees",
        "Maximum margin classifiers",
        "Bagging and boosting techniques",
    ],
    [
        "Perceptrons and multi-layer networks",
        "Training neural networks",
        "Image recognition architectures",
        "Sequence modeling networks",
    ],
    [
        "Unsupervised grouping algorithms",
        "Reducing feature dimensions",
        "Principal components analysis",
        "Comprehensive course review",
    ],
];

/// Difficulty from position in the overall sequence: first 30% easy, next
/// 40% medium, final 30% hard. A deterministic proxy for rising complexity.
pub fn difficulty_for_position(index: usize, total: usize) -> TaskDifficulty {
    let progress = index as f64 / total as f64;
    if progress < 0.3 {
        TaskDifficulty::Easy
    } else if progress < 0.7 {
        TaskDifficulty::Medium
    } else {
        TaskDifficulty::Hard
    }
}

pub fn generate_study_plan(
    goal: &Goal,
    profile: &UserProfile,
    events: &[CalendarEvent],
    clock: &PlanClock,
) -> Vec<Task> {
    let total = UNITS * SUBTOPICS_PER_UNIT;
    let mut tasks: Vec<Task> = Vec::with_capacity(total);
    let mut unit = 1usize;
    let mut subtopic = 1usize;

    for day in 0..7i64 {
        let tasks_for_day = if day < 6 { 3 } else { 2 };
        let mut start = profile.preferences.focus_time_start;

        for _ in 0..tasks_for_day {
            if tasks.len() >= total {
                break;
            }
            let duration = profile.preferences.preferred_session_length;

            while has_conflict(start, duration, day, events, clock) {
                start = start.add_minutes(RETRY_STEP_MINUTES);
                if start > LATEST_START {
                    break;
                }
            }
            // Past the cutoff: abandon this slot (and, since the candidate
            // keeps advancing, the rest of the day).
            if start > LATEST_START {
                continue;
            }

            tasks.push(Task {
                id: new_id("task"),
                goal_id: goal.id.clone(),
                title: format!("Unit {unit}: {}", TOPIC_TITLES[unit - 1][subtopic - 1]),
                description: format!(
                    "Study session for Unit {unit}, covering {}",
                    TOPIC_DESCRIPTIONS[unit - 1][subtopic - 1]
                ),
                day_index: day as u8,
                scheduled_date: clock.date_for_day(day),
                estimated_minutes: duration,
                actual_minutes: None,
                start_time: start,
                end_time: Some(start.add_minutes(duration as i32)),
                status: TaskStatus::Pending,
                difficulty: difficulty_for_position(tasks.len(), total),
                completed_at: None,
                notes: None,
            });

            // Next candidate: previous start + session + break. Same-day
            // sessions never overlap by construction.
            start = start.add_minutes((duration + profile.preferences.break_duration) as i32);

            subtopic += 1;
            if subtopic > SUBTOPICS_PER_UNIT {
                unit += 1;
                subtopic = 1;
            }
        }
    }

    tasks
}
