// Fitness/Health-policy synthesizer
//
// One daily step-tracking task per day plus an exercise session on
// even-indexed days, cycling through a fixed 4-type rotation.

use crate::clock::PlanClock;
use crate::model::{new_id, Goal, Task, TaskDifficulty, TaskStatus, WallTime};

const DEFAULT_TARGET_STEPS: u32 = 5000;
const STEPS_START: WallTime = WallTime::new(7, 0);
const EXERCISE_START: WallTime = WallTime::new(17, 30);

const EXERCISE_TYPES: [&str; 4] = ["Cardio", "Strength", "Yoga", "HIIT"];
const EXERCISE_DESCRIPTIONS: [&str; 4] = [
    "20-30 min cardio: jogging, cycling, or brisk walking",
    "Full body strength training with bodyweight exercises",
    "Relaxation and flexibility focused yoga session",
    "High-intensity interval training for maximum calorie burn",
];

pub fn generate_fitness_plan(goal: &Goal, clock: &PlanClock) -> Vec<Task> {
    let target_steps = goal
        .target_value
        .map(|v| v as u32)
        .unwrap_or(DEFAULT_TARGET_STEPS);
    let mut tasks = Vec::with_capacity(11);

    for day in 0..7i64 {
        tasks.push(Task {
            id: new_id("fitness"),
            goal_id: goal.id.clone(),
            title: format!("Daily Steps: {target_steps} steps"),
            description: "Track your daily step count. Break it into: morning walk, \
                          lunch walk, evening activity."
                .to_string(),
            day_index: day as u8,
            scheduled_date: clock.date_for_day(day),
            estimated_minutes: 60,
            actual_minutes: None,
            start_time: STEPS_START,
            end_time: Some(STEPS_START.add_minutes(60)),
            // Today's tracking starts immediately.
            status: if day == 0 {
                TaskStatus::InProgress
            } else {
                TaskStatus::Pending
            },
            difficulty: TaskDifficulty::Medium,
            completed_at: None,
            notes: None,
        });

        if day % 2 == 0 {
            let rotation = (day as usize / 2) % EXERCISE_TYPES.len();
            tasks.push(Task {
                id: new_id("exercise"),
                goal_id: goal.id.clone(),
                title: format!("{} Session", EXERCISE_TYPES[rotation]),
                description: EXERCISE_DESCRIPTIONS[rotation].to_string(),
                day_index: day as u8,
                scheduled_date: clock.date_for_day(day),
                estimated_minutes: 30,
                actual_minutes: None,
                start_time: EXERCISE_START,
                end_time: Some(EXERCISE_START.add_minutes(30)),
                status: TaskStatus::Pending,
                difficulty: if day < 4 {
                    TaskDifficulty::Easy
                } else {
                    TaskDifficulty::Medium
                },
                completed_at: None,
                notes: None,
            });
        }
    }

    tasks
}
