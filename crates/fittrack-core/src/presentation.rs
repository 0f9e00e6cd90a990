//! Text rendering for terminal front ends.
//!
//! Theme and platform are plain values carried in a [`RenderContext`] and
//! handed to every renderer. The platform picks one [`Surface`]
//! implementation up front; renderers never branch on it themselves.

use crate::activity::{ActivitySummary, TimeFilter};
use crate::signup::Step;
use crate::storage::config::UiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub dark: bool,
}

/// Output capability of the target terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Ansi,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Muted,
    Accent,
    Success,
    Error,
}

/// Low-level styling strategy.
pub trait Surface {
    fn paint(&self, text: &str, tone: Tone) -> String;

    /// `filled` of `total` progress dots.
    fn dots(&self, filled: usize, total: usize) -> String;

    /// Horizontal bar for a 0..=1 ratio (clamped).
    fn bar(&self, ratio: f64, width: usize) -> String;
}

fn filled_cells(ratio: f64, width: usize) -> usize {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    (ratio * width as f64).round() as usize
}

#[derive(Debug, Clone, Copy)]
pub struct PlainSurface;

impl Surface for PlainSurface {
    fn paint(&self, text: &str, _tone: Tone) -> String {
        text.to_string()
    }

    fn dots(&self, filled: usize, total: usize) -> String {
        (0..total)
            .map(|i| if i < filled { "(*)" } else { "( )" })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn bar(&self, ratio: f64, width: usize) -> String {
        let filled = filled_cells(ratio, width);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnsiSurface {
    theme: Theme,
}

impl AnsiSurface {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    fn code(&self, tone: Tone) -> &'static str {
        match (tone, self.theme.dark) {
            (Tone::Normal, true) => "97",
            (Tone::Normal, false) => "30",
            (Tone::Muted, _) => "90",
            (Tone::Accent, true) => "95",
            (Tone::Accent, false) => "35",
            (Tone::Success, true) => "92",
            (Tone::Success, false) => "32",
            (Tone::Error, true) => "91",
            (Tone::Error, false) => "31",
        }
    }
}

impl Surface for AnsiSurface {
    fn paint(&self, text: &str, tone: Tone) -> String {
        format!("\x1b[{}m{text}\x1b[0m", self.code(tone))
    }

    fn dots(&self, filled: usize, total: usize) -> String {
        let done = self.paint(&"●".repeat(filled.min(total)), Tone::Accent);
        let rest = self.paint(&"○".repeat(total.saturating_sub(filled)), Tone::Muted);
        format!("{done}{rest}")
    }

    fn bar(&self, ratio: f64, width: usize) -> String {
        let filled = filled_cells(ratio, width);
        format!(
            "{}{}",
            self.paint(&"█".repeat(filled), Tone::Success),
            self.paint(&"░".repeat(width - filled), Tone::Muted)
        )
    }
}

/// Explicit rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub theme: Theme,
    pub platform: Platform,
}

impl RenderContext {
    pub fn from_ui(ui: &UiConfig) -> Self {
        Self {
            theme: Theme { dark: ui.dark_mode },
            platform: if ui.ansi { Platform::Ansi } else { Platform::Plain },
        }
    }

    pub fn plain() -> Self {
        Self {
            theme: Theme { dark: true },
            platform: Platform::Plain,
        }
    }

    pub fn surface(&self) -> Box<dyn Surface> {
        match self.platform {
            Platform::Ansi => Box::new(AnsiSurface::new(self.theme)),
            Platform::Plain => Box::new(PlainSurface),
        }
    }
}

const BAR_WIDTH: usize = 20;

/// Progress dots plus "Step N of 4: title".
pub fn render_step_header(ctx: &RenderContext, step: Step) -> String {
    let s = ctx.surface();
    format!(
        "{}\n{}\n{}",
        s.dots(step.number() as usize, Step::COUNT as usize),
        s.paint("Create Account", Tone::Normal),
        s.paint(
            &format!("Step {} of {}: {}", step.number(), Step::COUNT, step.title()),
            Tone::Muted
        ),
    )
}

pub fn render_error(ctx: &RenderContext, message: &str) -> String {
    ctx.surface().paint(&format!("Error: {message}"), Tone::Error)
}

pub fn render_success(ctx: &RenderContext, message: &str) -> String {
    ctx.surface().paint(message, Tone::Success)
}

/// Multi-line activity report.
pub fn render_activity(ctx: &RenderContext, summary: &ActivitySummary, filter: TimeFilter) -> String {
    let s = ctx.surface();
    let mut lines = vec![s.paint("My Activity", Tone::Normal)];

    if summary.data_error.is_some() {
        lines.push(s.paint(
            "* Unable to load activity data. Showing cached or zero values.",
            Tone::Error,
        ));
    }

    lines.push(format!(
        "Today's Steps: {} of {}",
        summary.today.steps, summary.steps_goal
    ));
    lines.push(format!(
        "Calories: {}  Distance: {} km",
        summary.today.calories, summary.today.distance
    ));

    lines.push(String::new());
    lines.push(format!(
        "{} ({})",
        s.paint("Progress", Tone::Normal),
        s.paint(filter.period_label(), Tone::Muted)
    ));
    if summary.has_chart_data() {
        let max = summary.chart.iter().map(|p| p.steps).max().unwrap_or(0).max(1);
        for point in &summary.chart {
            lines.push(format!(
                "{:>3} {} {}",
                point.label,
                s.bar(point.steps as f64 / max as f64, BAR_WIDTH),
                point.steps
            ));
        }
        lines.push(s.paint(filter.axis_label(), Tone::Muted));
    } else {
        lines.push(s.paint("No activity data available yet", Tone::Muted));
    }

    lines.push(String::new());
    lines.push(s.paint("Daily Progress", Tone::Normal));
    lines.push(format!(
        "Calories Burned {} {} / {} kcal ({} kcal remaining)",
        s.bar(summary.calories_progress(), BAR_WIDTH),
        summary.today.calories,
        summary.calories_target,
        summary.calories_remaining()
    ));
    lines.push(format!(
        "Steps           {} {} / {} steps ({} steps remaining)",
        s.bar(summary.steps_progress(), BAR_WIDTH),
        summary.today.steps,
        summary.steps_goal,
        summary.steps_remaining()
    ));

    lines.join("\n")
}
