use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};

struct DailyOrigins {
    date: NaiveDate,
    origins: HashSet<String>,
}

/// Decides which post views count as unique.
///
/// An origin is unique once per post and per day. The sets are reset on the first
/// visit of a new day.
pub struct VisitTracker {
    /// Post id -> origins seen today
    visits: HashMap<u64, DailyOrigins>,
    date_provider: Box<dyn Fn() -> NaiveDate + Send>,
}

impl VisitTracker {
    pub fn new() -> Self {
        Self {
            visits: Default::default(),
            date_provider: Box::new(|| -> NaiveDate { Utc::now().date_naive() }),
        }
    }

    #[cfg(test)]
    fn new_for_test(date_provider: Box<dyn Fn() -> NaiveDate + Send>) -> Self {
        Self {
            visits: Default::default(),
            date_provider,
        }
    }

    /// Returns true when this is the first visit of `origin` to the post today.
    pub fn record(&mut self, post_id: u64, origin: &str) -> bool {
        let cur_date = (self.date_provider)();

        let entry = self.visits.entry(post_id).or_insert_with(|| DailyOrigins {
            date: cur_date,
            origins: HashSet::new(),
        });

        if entry.date != cur_date {
            entry.date = cur_date;
            entry.origins.clear();
        }

        entry.origins.insert(origin.to_string())
    }
}

impl Default for VisitTracker {
    fn default() -> Self {
        Self::new()
    }
}
