// ==========================================
// 整车产线生产跟踪系统 - 日汇总引擎
// ==========================================
// 输入: 仓储层给出的单车型汇总行
// 输出: 带合计行的日汇总
// ==========================================

use crate::domain::plan::{DailySummary, SummaryRow, SummaryTotal};
use chrono::NaiveDate;

/// 日汇总计算器
#[derive(Debug, Default)]
pub struct SummaryCalculator;

impl SummaryCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 组装日汇总：行按车型排序，合计为四个数量列之和
    pub fn build(&self, date: NaiveDate, mut rows: Vec<SummaryRow>) -> DailySummary {
        rows.sort_by(|a, b| a.model.cmp(&b.model));
        let total = self.totals(&rows);
        DailySummary { date, rows, total }
    }

    pub fn totals(&self, rows: &[SummaryRow]) -> SummaryTotal {
        rows.iter().fold(SummaryTotal::default(), |mut acc, r| {
            acc.planned_day = acc.planned_day.saturating_add(r.planned_day);
            acc.actual_day = acc.actual_day.saturating_add(r.actual_day);
            acc.planned_month = acc.planned_month.saturating_add(r.planned_month);
            acc.cumulative = acc.cumulative.saturating_add(r.cumulative);
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(model: &str, pd: i64, ad: i64, pm: i64, cum: i64) -> SummaryRow {
        SummaryRow {
            model: model.to_string(),
            planned_day: pd,
            actual_day: ad,
            planned_month: pm,
            cumulative: cum,
        }
    }

    #[test]
    fn test_build_sums_all_columns() {
        let calc = SummaryCalculator::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        let summary = calc.build(
            date,
            vec![row("KL250", 50, 48, 1200, 500), row("KL199", 100, 95, 3000, 285)],
        );

        assert_eq!(summary.rows[0].model, "KL199");
        assert_eq!(summary.rows[1].model, "KL250");
        assert_eq!(
            summary.total,
            SummaryTotal {
                planned_day: 150,
                actual_day: 143,
                planned_month: 4200,
                cumulative: 785,
            }
        );
    }

    #[test]
    fn test_totals_saturates_instead_of_overflowing() {
        let calc = SummaryCalculator::new();
        let total = calc.totals(&[
            row("KL199", 1, 1, i64::MAX, 0),
            row("KL250", 1, 1, i64::MAX, 0),
        ]);
        assert_eq!(total.planned_month, i64::MAX);
        assert_eq!(total.planned_day, 2);
    }

    #[test]
    fn test_build_empty() {
        let calc = SummaryCalculator::new();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let summary = calc.build(date, Vec::new());
        assert!(summary.rows.is_empty());
        assert_eq!(summary.total, SummaryTotal::default());
    }
}
