//! Viewer state: the report and the selected month.

use crate::billing::report::ComparisonReport;
use crate::billing::types::MonthlySummary;

pub struct App<'a> {
    pub report: &'a ComparisonReport,
    /// Index into `report.months`.
    pub selected: usize,
    pub quit: bool,
}

impl<'a> App<'a> {
    /// Starts on the most recent month.
    pub fn new(report: &'a ComparisonReport) -> Self {
        Self {
            report,
            selected: report.months.len().saturating_sub(1),
            quit: false,
        }
    }

    pub fn selected_month(&self) -> Option<&'a MonthlySummary> {
        self.report.months.get(self.selected)
    }

    pub fn next(&mut self) {
        if self.selected + 1 < self.report.months.len() {
            self.selected += 1;
        }
    }

    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.report.months.len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::types::{MonthKey, PeriodUsage, Scheme};

    fn report(n: u32) -> ComparisonReport {
        let months = (1..=n)
            .map(|m| MonthlySummary {
                month: MonthKey::new(2024, m),
                total_kwh: 1.0,
                tou_cost: 1.0,
                ulo_cost: 1.0,
                tiered_cost: 1.0,
                best_scheme: Scheme::Tou,
                worst_scheme: Scheme::Tou,
                reading_count: 1,
                tier1_kwh: 1.0,
                tier2_kwh: 0.0,
                tou_usage: PeriodUsage::default(),
                ulo_usage: PeriodUsage::default(),
            })
            .collect();
        ComparisonReport::from_months(months)
    }

    #[test]
    fn starts_on_latest_month() {
        let r = report(3);
        let app = App::new(&r);
        assert_eq!(app.selected_month().map(|m| m.month), Some(MonthKey::new(2024, 3)));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let r = report(3);
        let mut app = App::new(&r);
        app.next();
        assert_eq!(app.selected, 2);
        app.prev();
        app.prev();
        app.prev();
        assert_eq!(app.selected, 0);
        app.last();
        assert_eq!(app.selected, 2);
        app.first();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn empty_report_has_no_selection() {
        let r = report(0);
        let mut app = App::new(&r);
        app.next();
        assert!(app.selected_month().is_none());
    }
}
