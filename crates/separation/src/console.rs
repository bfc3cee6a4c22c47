//! Colored console output for projection runs.
//!
//! Installs a `tracing` subscriber whose layer renders the solver's
//! `solve_start` and `solve_end` events. Other events pass through the
//! filter untouched, so `RUST_LOG=separation_solver=debug` still surfaces
//! the merge/split detail through any additional layer.

use std::fmt::Debug;
use std::io::{self, Write};
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console output.
///
/// Safe to call multiple times; only the first call has effect. Does nothing
/// if another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy();
        let filter = match "separation_solver=info".parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        };

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ProjectionConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats projection lifecycle events.
pub struct ProjectionConsoleLayer;

impl<S: Subscriber> Layer<S> for ProjectionConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("separation_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        if let Some(line) = format_event(&visitor) {
            let _ = writeln!(io::stdout(), "{}", line);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    variable_count: Option<u64>,
    constraint_count: Option<u64>,
    parallel: Option<bool>,
    objective: Option<f64>,
    iterations: Option<u64>,
    merges: Option<u64>,
    splits: Option<u64>,
    duration_ms: Option<u64>,
    terminated_early: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "event" {
            self.event = Some(format!("{:?}", value).trim_matches('"').to_string());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "event" {
            self.event = Some(value.to_string());
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "variable_count" => self.variable_count = Some(value),
            "constraint_count" => self.constraint_count = Some(value),
            "iterations" => self.iterations = Some(value),
            "merges" => self.merges = Some(value),
            "splits" => self.splits = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "objective" {
            self.objective = Some(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "parallel" => self.parallel = Some(value),
            "terminated_early" => self.terminated_early = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor) -> Option<String> {
    match v.event.as_deref()? {
        "solve_start" => Some(format_solve_start(v)),
        "solve_end" => Some(format_solve_end(v)),
        _ => None,
    }
}

fn format_solve_start(v: &EventVisitor) -> String {
    let mode = if v.parallel.unwrap_or(false) {
        "parallel"
    } else {
        "sequential"
    };
    format!(
        "{} {} variables ({}), constraints ({}), {}",
        "INFO".bright_green(),
        "[Projection]".bright_cyan(),
        v.variable_count.unwrap_or(0).bright_yellow(),
        v.constraint_count.unwrap_or(0).bright_yellow(),
        mode.white()
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = if v.terminated_early.unwrap_or(false) {
        "terminated early".yellow().bold().to_string()
    } else {
        "converged".bright_green().bold().to_string()
    };
    format!(
        "{} {} {}: objective ({}), iterations ({}), merges ({}), splits ({}), time spent ({})",
        "INFO".bright_green(),
        "[Projection]".bright_cyan(),
        status,
        format!("{:.6}", v.objective.unwrap_or(0.0)).bright_magenta(),
        v.iterations.unwrap_or(0).white(),
        v.merges.unwrap_or(0).white(),
        v.splits.unwrap_or(0).white(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_unknown_event_is_skipped() {
        let visitor = EventVisitor {
            event: Some("Cycle complete".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&visitor).is_none());
        assert!(format_event(&EventVisitor::default()).is_none());
    }

    #[test]
    fn test_solve_end_reports_counters() {
        let visitor = EventVisitor {
            event: Some("solve_end".to_string()),
            objective: Some(2.0),
            iterations: Some(3),
            merges: Some(4),
            splits: Some(1),
            duration_ms: Some(12),
            terminated_early: Some(false),
            ..EventVisitor::default()
        };
        let line = format_event(&visitor).unwrap();
        assert!(line.contains("converged"));
        assert!(line.contains("2.000000"));
        assert!(line.contains("12ms"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
