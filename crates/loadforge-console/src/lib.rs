//! Colorful console output for solve progress, and text/JSON load reports.
//!
//! [`init`] installs [`LoadConsoleLayer`], a `tracing` layer rendering the
//! solver's structured events as colored progress lines.
//! Console output goes to stderr so that reports written to stdout stay
//! machine-readable.
//!
//! ## Log Levels
//!
//! - **INFO**: Lifecycle events (solve start/end, engine start)
//! - **DEBUG**: Incumbent improvements and engine selection
//! - **TRACE**: Individual search nodes

pub mod report;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use report::{format_amount, render_json, render_text};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Crate version shown in the banner.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Filter applied when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "loadforge_solver=info";

/// Initializes the console output.
///
/// Prints the banner and installs the subscriber on the first call; later
/// calls do nothing.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(LoadConsoleLayer)
            .try_init();
    });
}

// Resets the clock behind the elapsed-time column.
fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    SOLVE_START_NANOS.store(nanos, Ordering::Relaxed);
}

// Seconds since the last `solve_start` event.
fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

fn print_banner() {
    let banner = r#"
 _                    _ _____
| |    ___   __ _  __| |  ___|__  _ __ __ _  ___
| |   / _ \ / _` |/ _` | |_ / _ \| '__/ _` |/ _ \
| |__| (_) | (_| | (_| |  _| (_) | | | (_| |  __/
|_____\___/ \__,_|\__,_|_|  \___/|_|  \__, |\___|
                                      |___/
"#;

    let version_line = format!("                 v{} - Cargo Loading Optimizer\n", VERSION);

    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", banner.bright_cyan());
    let _ = writeln!(stderr, "{}", version_line.bright_white().bold());
    let _ = stderr.flush();
}

/// Renders `loadforge_solver` events on stderr.
pub struct LoadConsoleLayer;

impl<S: Subscriber> Layer<S> for LoadConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("loadforge_solver") && !target.starts_with("loadforge::") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let level = *metadata.level();
        let output = format_event(&visitor, level);
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    engine: Option<String>,
    status: Option<String>,
    reason: Option<String>,
    item_count: Option<u64>,
    slot_count: Option<u64>,
    variable_count: Option<u64>,
    pruned_count: Option<u64>,
    time_limit_ms: Option<u64>,
    assigned: Option<u64>,
    nodes: Option<u64>,
    node: Option<u64>,
    depth: Option<u64>,
    duration_ms: Option<u64>,
    objective: Option<f64>,
    packed: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        let s = s.trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "engine" => self.engine = Some(s),
            "status" => self.status = Some(s),
            "reason" => self.reason = Some(s),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "item_count" => self.item_count = Some(value),
            "slot_count" => self.slot_count = Some(value),
            "variable_count" => self.variable_count = Some(value),
            "pruned_count" => self.pruned_count = Some(value),
            "time_limit_ms" => self.time_limit_ms = Some(value),
            "assigned" => self.assigned = Some(value),
            "nodes" => self.nodes = Some(value),
            "node" => self.node = Some(value),
            "depth" => self.depth = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "objective" => self.objective = Some(value),
            "packed" => self.packed = Some(value),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "engine" => self.engine = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            "reason" => self.reason = Some(value.to_string()),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "engine_start" => format_engine_start(v),
        "improvement" => format_improvement(v),
        "solve_rejected" | "internal_error" => format_failure(v),
        "node" => format_node(v, level),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs()).bright_black().to_string()
}

fn format_count(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    let items = v.item_count.unwrap_or(0);
    let slots = v.slot_count.unwrap_or(0);
    let variables = v.variable_count.unwrap_or(0);
    let pruned = v.pruned_count.unwrap_or(0);

    let mut output = format!(
        "{} {} Solving │ {} items │ {} vehicles │ {} variables",
        format_elapsed(),
        "▶".bright_green().bold(),
        format_count(items).bright_yellow(),
        format_count(slots).bright_yellow(),
        format_count(variables).bright_yellow(),
    );

    if pruned > 0 {
        output.push_str(&format!(" │ {} pairs pruned", format_count(pruned).bright_magenta()));
    }

    if let Some(limit) = v.time_limit_ms.filter(|&ms| ms > 0) {
        output.push_str(&format!(" │ {} limit", format_duration_ms(limit).bright_yellow()));
    }

    output
}

fn format_engine_start(v: &EventVisitor) -> String {
    let engine = v.engine.as_deref().unwrap_or("unknown");
    format!(
        "{} {} {} engine started",
        format_elapsed(),
        "▶".bright_blue(),
        engine.white().bold()
    )
}

fn format_improvement(v: &EventVisitor) -> String {
    let objective = v.objective.unwrap_or(0.0);
    let nodes = v.nodes.unwrap_or(0);
    format!(
        "{} {} {:>18} cm³ │ {:>12} nodes",
        format_elapsed(),
        "⚡".bright_cyan(),
        format_amount(objective).bright_green(),
        format_count(nodes).white(),
    )
}

fn format_failure(v: &EventVisitor) -> String {
    let reason = v.reason.as_deref().unwrap_or("unknown failure");
    format!("{} {} {}", format_elapsed(), "✗".bright_red().bold(), reason.bright_red())
}

fn format_solve_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("UNKNOWN");
    let objective = v.objective.unwrap_or(0.0);
    let nodes = v.nodes.unwrap_or(0);
    let duration = v.duration_ms.unwrap_or(0);

    let status_colored = match status {
        "OPTIMAL" => status.bright_green().bold().to_string(),
        "FEASIBLE" => status.bright_yellow().bold().to_string(),
        _ => status.bright_red().bold().to_string(),
    };

    let mut output = format!(
        "{} {} Solving complete │ {} │ {} │ {} nodes",
        format_elapsed(),
        "■".bright_cyan().bold(),
        status_colored,
        format_duration_ms(duration).yellow(),
        format_count(nodes).white(),
    );

    let inner_width: usize = 58;
    let border = "═".repeat(inner_width);

    output.push_str("\n\n");
    output.push_str(&format!("╔{}╗", border).bright_cyan().to_string());
    output.push('\n');

    let total_pad = inner_width.saturating_sub(status.len());
    let left_pad = total_pad / 2;
    let right_pad = total_pad - left_pad;
    output.push_str(&format!(
        "{}{}{}{}{}",
        "║".bright_cyan(),
        " ".repeat(left_pad),
        status_colored,
        " ".repeat(right_pad),
        "║".bright_cyan()
    ));
    output.push('\n');

    output.push_str(&format!("╠{}╣", border).bright_cyan().to_string());
    output.push('\n');

    let mut row = |label: &str, value: String| {
        output.push_str(&format!(
            "{}  {:<18}{:>36}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    };
    row("Packed volume:", format!("{} cm³", format_amount(objective)));
    if let Some(assigned) = v.assigned {
        row("Items loaded:", format_count(assigned));
    }

    output.push_str(&format!("╚{}╝", border).bright_cyan().to_string());
    output.push('\n');

    output
}

fn format_node(v: &EventVisitor, level: Level) -> String {
    if level != Level::TRACE {
        return String::new();
    }

    let node = v.node.unwrap_or(0);
    let depth = v.depth.unwrap_or(0);
    let packed = v.packed.unwrap_or(0.0);

    format!(
        "{} {} Node {:>10} │ Depth {:>6} │ {}",
        format_elapsed(),
        "·".bright_black(),
        format_count(node).bright_black(),
        format_count(depth).bright_black(),
        format_amount(packed).bright_black()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_duration_formatting() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_solve_start_lists_scale() {
        let v = EventVisitor {
            item_count: Some(1200),
            slot_count: Some(15),
            variable_count: Some(18000),
            pruned_count: Some(0),
            time_limit_ms: Some(30_000),
            ..visitor("solve_start")
        };
        let line = format_event(&v, Level::INFO);

        assert!(line.contains("Solving"));
        assert!(line.contains("1,200"));
        assert!(line.contains("18,000"));
        assert!(line.contains("30.00s"));
        assert!(!line.contains("pruned"));
    }

    #[test]
    fn test_solve_end_box() {
        let v = EventVisitor {
            status: Some("OPTIMAL".to_string()),
            objective: Some(1234567.891),
            assigned: Some(42),
            ..visitor("solve_end")
        };
        let output = format_event(&v, Level::INFO);

        assert!(output.contains("OPTIMAL"));
        assert!(output.contains("1,234,567.89 cm³"));
        assert!(output.contains("Items loaded:"));
    }

    #[test]
    fn test_nodes_only_at_trace() {
        let v = EventVisitor {
            node: Some(7),
            ..visitor("node")
        };
        assert!(format_event(&v, Level::DEBUG).is_empty());
        assert!(format_event(&v, Level::TRACE).contains("Node"));
    }

    #[test]
    fn test_unknown_event_is_silent() {
        assert!(format_event(&visitor("model_built"), Level::DEBUG).is_empty());
        assert!(format_event(&EventVisitor::default(), Level::INFO).is_empty());
    }

    #[test]
    fn test_failure_shows_reason() {
        let v = EventVisitor {
            reason: Some("duplicate item id 3".to_string()),
            ..visitor("solve_rejected")
        };
        assert!(format_event(&v, Level::WARN).contains("duplicate item id 3"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        assert!(INIT.get().is_some());
    }
}
