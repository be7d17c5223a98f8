// Cadence - adaptive weekly task scheduler
// Main entry point

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use cadence::behavior::analyze_behavior;
use cadence::clock::PlanClock;
use cadence::config::load_config;
use cadence::model::{
    AgentAction, AgentActionKind, CalendarEvent, CoachMessage, FitnessSample, Goal, GoalDraft,
    MicroAdjustment, PlanSnapshot, ReasoningStep, SnapshotLabel, Task,
};
use cadence::planner::PlanError;
use cadence::providers::build_generator;
use cadence::replan::replan_week;
use cadence::store::PlanStore;

#[derive(Parser)]
#[command(name = "cadence", about = "Adaptive weekly task scheduler", version)]
struct Cli {
    /// Path to config file (default: ~/.cadence/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Anchor date for day 0 (default: today). Useful for replaying a cycle.
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a 7-day plan from a goals file
    Plan {
        /// JSON file with an array of goal drafts
        goals: PathBuf,
        /// JSON file with calendar events to schedule around
        #[arg(long)]
        events: Option<PathBuf>,
        /// Try AI generation first, falling back to the rule-based planner
        #[arg(long)]
        ai: bool,
        /// Write the plan here instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Replan the week based on today's completions
    Replan {
        /// Plan file produced by `plan`
        plan: PathBuf,
        /// Write the updated plan here (default: overwrite the input)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Show the behavior report for the current plan
    Insights {
        plan: PathBuf,
        /// Emit the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Apply a suggested adjustment by id
    Apply {
        plan: PathBuf,
        /// Adjustment id from the plan file
        id: String,
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

/// On-disk plan state shared by all subcommands.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanFile {
    goals: Vec<Goal>,
    tasks: Vec<Task>,
    #[serde(default)]
    events: Vec<CalendarEvent>,
    #[serde(default)]
    adjustments: Vec<MicroAdjustment>,
    #[serde(default)]
    coach_messages: Vec<CoachMessage>,
    #[serde(default)]
    snapshots: Vec<PlanSnapshot>,
    #[serde(default)]
    reasoning: Vec<ReasoningStep>,
    #[serde(default)]
    actions: Vec<AgentAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fitness: Option<FitnessSample>,
}

impl PlanFile {
    fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse plan file {}", path.display()))
    }

    fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write plan to {}", path.display()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let clock = match cli.today {
        Some(date) => PlanClock::anchored(date),
        None => PlanClock::system(),
    };

    match cli.command {
        Command::Plan {
            goals,
            events,
            ai,
            out,
        } => cmd_plan(cli.config.as_deref(), &goals, events.as_deref(), ai, out, &clock).await,
        Command::Replan { plan, out } => cmd_replan(&plan, out, &clock),
        Command::Insights { plan, json } => cmd_insights(&plan, json, &clock),
        Command::Apply { plan, id, out } => cmd_apply(&plan, &id, out, &clock),
    }
}

async fn cmd_plan(
    config_path: Option<&Path>,
    goals_path: &Path,
    events_path: Option<&Path>,
    ai: bool,
    out: Option<PathBuf>,
    clock: &PlanClock,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if ai {
        config.features.ai_generation = true;
    }

    let drafts: Vec<GoalDraft> = read_json(goals_path).context("Failed to load goals")?;
    if drafts.is_empty() {
        return Err(PlanError::EmptyGoals.into());
    }
    let goals: Vec<Goal> = drafts
        .into_iter()
        .map(|d| Goal::create(d, clock))
        .collect();

    let events: Vec<CalendarEvent> = match events_path {
        Some(path) => read_json(path).context("Failed to load events")?,
        None => Vec::new(),
    };

    let chain = build_generator(&config)?;
    let mut tasks = Vec::new();
    let mut reasoning = Vec::new();
    let mut actions = Vec::new();
    for goal in &goals {
        let outcome = chain
            .generate_tasks(goal, &config.profile, &events, clock)
            .await?;
        tasks.extend(outcome.tasks);
        reasoning.extend(outcome.reasoning);
        actions.extend(outcome.actions);
    }
    tasks.sort_by(|a, b| {
        a.day_index
            .cmp(&b.day_index)
            .then(a.start_time.cmp(&b.start_time))
    });

    let snapshot = PlanSnapshot::capture(
        SnapshotLabel::Initial,
        &tasks,
        &goals,
        "Initial weekly plan",
        clock.now(),
    );

    let plan = PlanFile {
        goals,
        tasks,
        events,
        snapshots: vec![snapshot],
        reasoning,
        actions,
        ..Default::default()
    };

    match out {
        Some(path) => {
            plan.save(&path)?;
            println!(
                "Planned {} tasks across 7 days for {} goal(s) -> {}",
                plan.tasks.len(),
                plan.goals.len(),
                path.display()
            );
            print_week(&plan.tasks);
        }
        None => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}

fn cmd_replan(plan_path: &Path, out: Option<PathBuf>, clock: &PlanClock) -> Result<()> {
    let mut plan = PlanFile::load(plan_path)?;

    let outcome = replan_week(&plan.tasks, &plan.goals, clock);

    plan.tasks = outcome.updated_tasks;
    plan.adjustments.extend(outcome.micro_adjustments.clone());
    plan.coach_messages.push(outcome.coach_message.clone());
    plan.snapshots.push(outcome.snapshot);
    plan.reasoning.extend(outcome.reasoning);
    plan.actions.push(outcome.action);

    let out = out.unwrap_or_else(|| plan_path.to_path_buf());
    plan.save(&out)?;

    println!("Today: {}% complete. {}", outcome.completion_percent, outcome.diff_summary);
    println!("\nCoach: {}", outcome.coach_message.message);
    if !outcome.micro_adjustments.is_empty() {
        println!("\nSuggestions:");
        for adj in &outcome.micro_adjustments {
            println!("  [{}] {} - {}", adj.id, adj.title, adj.description);
        }
    }
    Ok(())
}

fn cmd_insights(plan_path: &Path, json: bool, clock: &PlanClock) -> Result<()> {
    let plan = PlanFile::load(plan_path)?;
    let report = analyze_behavior(&plan.tasks, plan.fitness.as_ref(), clock);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Today: {}/{} tasks done ({}%), {} focus minutes, mood {:?}, energy {:?}",
        report.insight.tasks_completed,
        report.insight.tasks_total,
        report.insight.completion_rate,
        report.insight.focus_minutes,
        report.insight.mood,
        report.insight.energy_level,
    );
    println!(
        "Streak: {} day(s). Preferred slot: {}. Skip pattern: {:?}.",
        report.snapshot.streak_days, report.snapshot.preferred_slot, report.snapshot.skip_pattern,
    );
    if !report.patterns.is_empty() {
        println!("\nPatterns:");
        for pattern in &report.patterns {
            println!(
                "  {} ({:.0}% confidence): {}",
                pattern.title,
                pattern.confidence * 100.0,
                pattern.description
            );
        }
    }
    if !report.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &report.recommendations {
            println!("  - {rec}");
        }
    }
    Ok(())
}

fn cmd_apply(plan_path: &Path, id: &str, out: Option<PathBuf>, clock: &PlanClock) -> Result<()> {
    let mut plan = PlanFile::load(plan_path)?;

    let mut store = PlanStore::new();
    store.set_goals(std::mem::take(&mut plan.goals));
    store.set_tasks(std::mem::take(&mut plan.tasks));
    store.extend_adjustments(std::mem::take(&mut plan.adjustments));

    let applied = store.apply_adjustment(id, clock.now())?;
    println!("Applied: {} - {}", applied.title, applied.description);
    let record = AgentAction::completed(
        AgentActionKind::SuggestAdjustment,
        applied.title.clone(),
        applied.description.clone(),
        clock.now(),
    );
    store.push_action(record);

    store.sync_goal_progress();
    plan.goals = store.goals().to_vec();
    plan.tasks = store.tasks().to_vec();
    plan.adjustments = store.adjustments().to_vec();
    plan.actions.extend(store.actions().iter().cloned());

    let out = out.unwrap_or_else(|| plan_path.to_path_buf());
    plan.save(&out)?;
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_week(tasks: &[Task]) {
    let mut day = None;
    for task in tasks {
        if day != Some(task.day_index) {
            day = Some(task.day_index);
            println!("\nDay {} ({}):", task.day_index, task.scheduled_date);
        }
        println!(
            "  {} ({} min, {:?}) {}",
            task.start_time, task.estimated_minutes, task.difficulty, task.title
        );
    }
}
