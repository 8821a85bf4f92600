use chrono::{Duration, NaiveDate, Utc};

use crate::types::{HistoryEntry, Product};

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

/// Calendar date used as "today" by handlers and the scheduler
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Maintains the rolling per-product stock history.
///
/// After every operation a product's history holds at most one entry per date,
/// ordered oldest first, and nothing older than `today - window_days`.
#[derive(Debug, Clone, Copy)]
pub struct HistoryTracker {
    window_days: i64,
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

impl HistoryTracker {
    pub fn new(window_days: i64) -> Self {
        Self { window_days }
    }

    pub fn window_days(&self) -> i64 {
        self.window_days
    }

    /// Make sure `today` has an entry, carrying forward the last known stock.
    ///
    /// An existing entry for `today` is preserved. A `today` older than the newest
    /// entry adds nothing and drops nothing. Returns whether an entry was added.
    pub fn apply_daily_rollup(&self, product: &mut Product, today: NaiveDate) -> bool {
        self.normalize(&mut product.history);

        if product.history.last().is_some_and(|h| h.date > today) {
            return false;
        }

        let added = if product.history.iter().any(|h| h.date == today) {
            false
        } else {
            let stock = product
                .history
                .last()
                .map(|h| h.stock)
                .unwrap_or(product.current_stock);
            product.history.push(HistoryEntry { date: today, stock });
            true
        };

        self.trim(&mut product.history, today);
        added
    }

    /// Record a new stock level for `today`, replacing any same-day entry.
    ///
    /// Entries dated after `today` are dropped since the new level supersedes them.
    pub fn record_stock_change(&self, product: &mut Product, today: NaiveDate, new_stock: i64) {
        product.history.retain(|h| h.date < today);
        self.normalize(&mut product.history);
        product.history.push(HistoryEntry {
            date: today,
            stock: new_stock,
        });
        product.current_stock = new_stock;
        self.trim(&mut product.history, today);
    }

    /// Fresh history for a record created today
    pub fn seed(&self, today: NaiveDate, stock: i64) -> Vec<HistoryEntry> {
        vec![HistoryEntry { date: today, stock }]
    }

    fn trim(&self, history: &mut Vec<HistoryEntry>, today: NaiveDate) {
        let cutoff = today - Duration::days(self.window_days);
        history.retain(|h| h.date >= cutoff && h.date <= today);
    }

    // Hand-edited or legacy files can carry repeated or unordered dates.
    // For a repeated date the later entry in the file wins.
    fn normalize(&self, history: &mut Vec<HistoryEntry>) {
        let mut seen = std::collections::HashSet::new();
        let mut kept: Vec<HistoryEntry> = history
            .drain(..)
            .rev()
            .filter(|h| seen.insert(h.date))
            .collect();
        kept.sort_by_key(|h| h.date);
        *history = kept;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn product(current_stock: i64, history: Vec<(u32, i64)>) -> Product {
        Product {
            product_id: "P001".to_string(),
            product_name: "Widget".to_string(),
            category: "Tools".to_string(),
            warehouse_id: "W1".to_string(),
            warehouse_location: "Central".to_string(),
            current_stock,
            min_threshold: 20,
            max_capacity: 200,
            expected_demand: 30,
            history: history
                .into_iter()
                .map(|(d, stock)| HistoryEntry { date: day(d), stock })
                .collect(),
        }
    }

    fn assert_window(p: &Product, today: NaiveDate) {
        let cutoff = today - Duration::days(DEFAULT_WINDOW_DAYS);
        let mut dates: Vec<_> = p.history.iter().map(|h| h.date).collect();
        assert!(dates.iter().all(|d| *d >= cutoff && *d <= today));
        let len = dates.len();
        dates.dedup();
        assert_eq!(len, dates.len(), "duplicate dates in {:?}", p.history);
    }

    #[test]
    fn rollup_on_empty_history_uses_current_stock() {
        let tracker = HistoryTracker::default();
        let mut p = product(42, vec![]);
        assert!(tracker.apply_daily_rollup(&mut p, day(15)));
        assert_eq!(p.history, vec![HistoryEntry { date: day(15), stock: 42 }]);
    }

    #[test]
    fn rollup_carries_forward_last_entry_not_current_stock() {
        let tracker = HistoryTracker::default();
        let mut p = product(99, vec![(13, 30), (14, 25)]);
        tracker.apply_daily_rollup(&mut p, day(15));
        assert_eq!(p.history.last(), Some(&HistoryEntry { date: day(15), stock: 25 }));
    }

    #[test]
    fn rollup_is_idempotent_for_a_fixed_day() {
        let tracker = HistoryTracker::default();
        let mut p = product(10, vec![(14, 10)]);
        assert!(tracker.apply_daily_rollup(&mut p, day(15)));
        let after_first = p.clone();
        assert!(!tracker.apply_daily_rollup(&mut p, day(15)));
        assert_eq!(p, after_first);
    }

    #[test]
    fn rollup_keeps_existing_same_day_entry() {
        let tracker = HistoryTracker::default();
        let mut p = product(10, vec![(15, 3)]);
        tracker.apply_daily_rollup(&mut p, day(15));
        assert_eq!(p.history, vec![HistoryEntry { date: day(15), stock: 3 }]);
    }

    #[test]
    fn rollup_trims_entries_older_than_window() {
        let tracker = HistoryTracker::default();
        let mut p = product(10, vec![(1, 1), (7, 7), (8, 8), (14, 14)]);
        tracker.apply_daily_rollup(&mut p, day(15));
        let dates: Vec<_> = p.history.iter().map(|h| h.date).collect();
        assert_eq!(dates, vec![day(8), day(14), day(15)]);
        assert_window(&p, day(15));
    }

    #[test]
    fn rollup_collapses_duplicate_dates() {
        let tracker = HistoryTracker::default();
        let mut p = product(10, vec![(14, 1), (14, 2), (15, 5), (15, 6)]);
        tracker.apply_daily_rollup(&mut p, day(15));
        assert_eq!(
            p.history,
            vec![
                HistoryEntry { date: day(14), stock: 2 },
                HistoryEntry { date: day(15), stock: 6 },
            ]
        );
    }

    #[test]
    fn stock_change_overwrites_same_day_entry() {
        let tracker = HistoryTracker::default();
        let mut p = product(50, vec![(14, 50), (15, 40)]);
        tracker.record_stock_change(&mut p, day(15), 10);
        assert_eq!(p.current_stock, 10);
        assert_eq!(p.history.last(), Some(&HistoryEntry { date: day(15), stock: 10 }));
        assert_eq!(p.history.len(), 2);
        assert_window(&p, day(15));
    }

    #[test]
    fn stock_change_is_idempotent() {
        let tracker = HistoryTracker::default();
        let mut p = product(50, vec![(12, 50)]);
        tracker.record_stock_change(&mut p, day(15), 35);
        let after_first = p.clone();
        tracker.record_stock_change(&mut p, day(15), 35);
        assert_eq!(p, after_first);
    }

    #[test]
    fn stock_change_trims_window() {
        let tracker = HistoryTracker::default();
        let mut p = product(50, vec![(2, 50), (9, 45)]);
        tracker.record_stock_change(&mut p, day(20), 30);
        assert_eq!(p.history, vec![HistoryEntry { date: day(20), stock: 30 }]);
    }

    #[test]
    fn custom_window_is_respected() {
        let tracker = HistoryTracker::new(2);
        let mut p = product(5, vec![(12, 5), (13, 5), (14, 5)]);
        tracker.apply_daily_rollup(&mut p, day(15));
        let dates: Vec<_> = p.history.iter().map(|h| h.date).collect();
        assert_eq!(dates, vec![day(13), day(14), day(15)]);
    }

    #[test]
    fn unordered_history_is_sorted_before_rollup() {
        let tracker = HistoryTracker::default();
        let mut p = product(10, vec![(14, 4), (12, 2), (13, 3)]);
        assert!(tracker.apply_daily_rollup(&mut p, day(15)));
        assert_eq!(
            p.history,
            vec![
                HistoryEntry { date: day(12), stock: 2 },
                HistoryEntry { date: day(13), stock: 3 },
                HistoryEntry { date: day(14), stock: 4 },
                HistoryEntry { date: day(15), stock: 4 },
            ]
        );
    }

    #[test]
    fn rollup_for_a_date_behind_the_newest_entry_adds_nothing() {
        let tracker = HistoryTracker::default();
        let mut p = product(10, vec![(13, 3), (15, 5)]);
        assert!(!tracker.apply_daily_rollup(&mut p, day(14)));
        let dates: Vec<_> = p.history.iter().map(|h| h.date).collect();
        assert_eq!(dates, vec![day(13), day(15)]);
    }

    #[test]
    fn stock_change_drops_future_dated_entries() {
        let tracker = HistoryTracker::default();
        let mut p = product(50, vec![(20, 99), (14, 50), (18, 70)]);
        tracker.record_stock_change(&mut p, day(15), 40);
        assert_eq!(
            p.history,
            vec![
                HistoryEntry { date: day(14), stock: 50 },
                HistoryEntry { date: day(15), stock: 40 },
            ]
        );
        assert_window(&p, day(15));
    }
}
