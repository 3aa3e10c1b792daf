use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::models::Job;

/// Most jobs shown in the list at once.
pub const MAX_VISIBLE: usize = 10;
pub const RECENCY_DAYS: i64 = 7;
pub const SUMMARY_CHARS: usize = 200;

/// Highlight glyphs shared by the browser and `show`.
pub const LOCATION_ICON: &str = "⌂";
pub const LEVELS_ICON: &str = "≣";

/// List/detail state for one browsing session.
///
/// `full` never changes after construction. `visible` holds indices into `full`
/// and is replaced wholesale by every filter. `selected` is an index into `full`,
/// so it can point at a job that is no longer visible after a filter.
#[derive(Debug, Clone)]
pub struct JobBoard {
    full: Vec<Job>,
    visible: Vec<usize>,
    selected: Option<usize>,
}

impl JobBoard {
    pub fn new(jobs: Vec<Job>) -> Self {
        let visible = (0..jobs.len().min(MAX_VISIBLE)).collect();
        let selected = if jobs.is_empty() { None } else { Some(0) };
        Self {
            full: jobs,
            visible,
            selected,
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.full
    }

    pub fn visible(&self) -> Vec<&Job> {
        self.visible.iter().map(|&i| &self.full[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.selected.map(|i| &self.full[i])
    }

    pub fn is_selected(&self, job: &Job) -> bool {
        self.selected_job().is_some_and(|s| s.job_id == job.job_id)
    }

    /// Job for the detail panel. Hidden whenever the visible list is empty.
    pub fn detail_job(&self) -> Option<&Job> {
        if self.visible.is_empty() {
            return None;
        }
        self.selected_job()
    }

    pub fn find(&self, job_id: &str) -> Option<&Job> {
        self.full.iter().find(|job| job.job_id == job_id)
    }

    /// Selects the job at `index` in the visible list.
    ///
    /// An out-of-range index is ignored and leaves the selection as it was;
    /// returns whether the selection was applied.
    pub fn select(&mut self, index: usize) -> bool {
        match self.visible.get(index) {
            Some(&i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Case-insensitive substring match on the company name over the full set.
    pub fn filter_by_company(&mut self, text: &str) {
        let needle = text.to_lowercase();
        self.apply_filter(|job| job.company_name.to_lowercase().contains(&needle));
        debug!(filter = text, visible = self.visible.len(), "company filter applied");
    }

    /// Keeps jobs posted within the last seven days of `now`.
    pub fn filter_last_seven_days(&mut self, now: DateTime<Utc>) {
        self.apply_filter(|job| is_recent(&job.posting_date, now));
        debug!(%now, visible = self.visible.len(), "recency filter applied");
    }

    pub fn clear_filter(&mut self) {
        self.filter_by_company("");
    }

    fn apply_filter<F>(&mut self, keep: F)
    where
        F: Fn(&Job) -> bool,
    {
        self.visible = self
            .full
            .iter()
            .enumerate()
            .filter(|(_, job)| keep(job))
            .map(|(i, _)| i)
            .take(MAX_VISIBLE)
            .collect();
    }
}

/// Accepts RFC 3339 timestamps, zone-less timestamps and bare dates (read as UTC).
pub fn parse_posting_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// True when `posting_date` falls inside the recency window ending at `now`.
/// Unparseable dates are never recent.
pub fn is_recent(posting_date: &str, now: DateTime<Utc>) -> bool {
    let cutoff = now - Duration::days(RECENCY_DAYS);
    parse_posting_date(posting_date).is_some_and(|posted| posted >= cutoff)
}

/// List-card description: first 200 characters followed by an ellipsis.
pub fn summary(description: &str) -> String {
    let head: String = description.chars().take(SUMMARY_CHARS).collect();
    format!("{}...", head)
}
