//! Activity summary for the analytics view.
//!
//! Turns the last few days of health samples into chart points, today's
//! totals and progress against the configured goals. When the backend
//! cannot be reached the summary is built from the local cache and flagged
//! with [`ActivitySummary::data_error`].

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::api::HealthApi;
use crate::error::{ApiError, Result};
use crate::storage::config::GoalsConfig;
use crate::storage::session::{SessionKey, SessionStore};
use crate::storage::ActivityDb;

/// Default number of days fetched for the chart.
pub const DEFAULT_DAYS: u32 = 7;

/// One day of health data. Missing numbers count as zero.
///
/// Numbers may arrive as JSON numbers or numeric strings (`"210.50"`). A
/// value that is neither decodes as `None` instead of failing the sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthSample {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub steps: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub calories_burned: Option<f64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub distance: Option<f64>,
}

fn number_of(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_of))
}

/// Non-negative whole count; fractional values are rounded.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| match v {
            serde_json::Value::Number(n) if n.is_u64() => n.as_u64(),
            other => number_of(other)
                .filter(|n| *n >= 0.0 && *n <= u64::MAX as f64)
                .map(|n| n.round() as u64),
        }))
}

impl HealthSample {
    /// `YYYY-MM-DD` part of `date`, accepting plain dates and RFC 3339.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(d);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        raw.get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    }

    /// Chart label: the first three characters of `day`, else the short
    /// weekday of `date`, else empty.
    pub fn label(&self) -> String {
        let from_day: String = self
            .day
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(3)
            .collect();
        if !from_day.is_empty() {
            return from_day;
        }
        self.calendar_date()
            .map(|d| d.format("%a").to_string())
            .unwrap_or_default()
    }
}

/// One point on the steps chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub steps: u64,
}

/// Today's totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TodayActivity {
    pub steps: u64,
    pub calories: f64,
    pub distance: f64,
}

/// Chart period selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    Weekly,
    Monthly,
    Yearly,
}

impl TimeFilter {
    pub fn period_label(self) -> &'static str {
        match self {
            TimeFilter::Weekly => "This Week",
            TimeFilter::Monthly => "This Month",
            TimeFilter::Yearly => "This Year",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            TimeFilter::Weekly => "Days of Week",
            TimeFilter::Monthly => "Weeks of Month",
            TimeFilter::Yearly => "Months of Year",
        }
    }
}

impl std::str::FromStr for TimeFilter {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" => Ok(TimeFilter::Weekly),
            "monthly" => Ok(TimeFilter::Monthly),
            "yearly" => Ok(TimeFilter::Yearly),
            _ => Err(crate::error::ValidationError::UnknownChoice {
                kind: "time filter",
                value: s.to_string(),
            }),
        }
    }
}

/// Everything the analytics view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub chart: Vec<ChartPoint>,
    pub today: TodayActivity,
    pub steps_goal: u32,
    pub calories_target: u32,
    /// Set when fresh data could not be fetched.
    pub data_error: Option<String>,
}

impl ActivitySummary {
    /// Build from samples ordered newest first.
    ///
    /// `cached_today_steps` is used when there are no samples or today's
    /// sample reports zero steps.
    pub fn build(samples: &[HealthSample], cached_today_steps: u64, goals: &GoalsConfig) -> Self {
        Self::assemble(samples, samples.first(), cached_today_steps, goals)
    }

    /// Build from cached samples ordered newest first.
    ///
    /// Only a sample dated `today` supplies today's totals; older rows are
    /// charted but never shown as today.
    pub fn build_from_cache(
        samples: &[HealthSample],
        today: NaiveDate,
        cached_today_steps: u64,
        goals: &GoalsConfig,
    ) -> Self {
        let current = samples.iter().find(|s| s.calendar_date() == Some(today));
        Self::assemble(samples, current, cached_today_steps, goals)
    }

    fn assemble(
        samples: &[HealthSample],
        current: Option<&HealthSample>,
        cached_today_steps: u64,
        goals: &GoalsConfig,
    ) -> Self {
        let chart = samples
            .iter()
            .map(|s| ChartPoint {
                label: s.label(),
                steps: s.steps.unwrap_or(0),
            })
            .collect();

        let today = match current {
            Some(first) => TodayActivity {
                steps: match first.steps.unwrap_or(0) {
                    0 => cached_today_steps,
                    n => n,
                },
                calories: first.calories_burned.unwrap_or(0.0),
                distance: first.distance.unwrap_or(0.0),
            },
            None => TodayActivity {
                steps: cached_today_steps,
                ..TodayActivity::default()
            },
        };

        Self {
            chart,
            today,
            steps_goal: goals.effective_steps_goal(),
            calories_target: goals.calories_target,
            data_error: None,
        }
    }

    pub fn has_chart_data(&self) -> bool {
        !self.chart.is_empty()
    }

    /// Fraction of the step goal reached; may exceed 1.0.
    pub fn steps_progress(&self) -> f64 {
        ratio(self.today.steps as f64, self.steps_goal)
    }

    pub fn calories_progress(&self) -> f64 {
        ratio(self.today.calories, self.calories_target)
    }

    pub fn steps_remaining(&self) -> u64 {
        u64::from(self.steps_goal).saturating_sub(self.today.steps)
    }

    pub fn calories_remaining(&self) -> f64 {
        (f64::from(self.calories_target) - self.today.calories).max(0.0)
    }
}

fn ratio(value: f64, goal: u32) -> f64 {
    if goal == 0 {
        0.0
    } else {
        value / f64::from(goal)
    }
}

/// Fetch fresh samples, refresh the cache, and build the summary.
///
/// Remote failures (including not being signed in) fall back to the cached
/// samples and set `data_error`. Local cache failures are returned.
pub async fn load_activity(
    health: &dyn HealthApi,
    store: &dyn SessionStore,
    db: &ActivityDb,
    goals: &GoalsConfig,
    days: u32,
) -> Result<ActivitySummary> {
    let cached_today_steps = db.today_steps()?.unwrap_or(0);

    match fetch(health, store, days).await {
        Ok(samples) => {
            db.upsert_samples(&samples)?;
            tracing::info!(count = samples.len(), "health data refreshed");
            Ok(ActivitySummary::build(&samples, cached_today_steps, goals))
        }
        Err(err) => {
            tracing::warn!(error = %err, "health data unavailable, using cache");
            let cached = db.recent(days)?;
            let mut summary = ActivitySummary::build_from_cache(
                &cached,
                Local::now().date_naive(),
                cached_today_steps,
                goals,
            );
            summary.data_error = Some(err.to_string());
            Ok(summary)
        }
    }
}

async fn fetch(
    health: &dyn HealthApi,
    store: &dyn SessionStore,
    days: u32,
) -> std::result::Result<Vec<HealthSample>, ApiError> {
    let token = match store.get(SessionKey::AccessToken) {
        Ok(Some(token)) if !token.is_empty() => token,
        Ok(_) => return Err(ApiError::NotAuthenticated),
        Err(e) => {
            tracing::warn!(error = %e, "could not read access token");
            return Err(ApiError::NotAuthenticated);
        }
    };
    health.health_data(days, &token).await
}
