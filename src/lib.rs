// Cadence - adaptive weekly task scheduler
//
// A 7-day personal planner: goals become scheduled tasks around the
// calendar, behavior over the day feeds an end-of-day replan, and a
// policy engine suggests micro-adjustments with coaching feedback.

pub mod adjust;
pub mod behavior;
pub mod clock;
pub mod config;
pub mod model;
pub mod planner;
pub mod providers;
pub mod replan;
pub mod store;
