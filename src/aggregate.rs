use crate::expense::ExpenseBreakdown;
use crate::types::{AnnualRecord, MonthlyRecord, Summary};

pub const MONTHS_PER_YEAR: usize = 12;

/// Roll monthly records up into years.
///
/// The last year may hold fewer than twelve months.
pub fn annual(monthly: &[MonthlyRecord], num_types: usize) -> Vec<AnnualRecord> {
    let mut cumulative_profit = 0.0;
    monthly
        .chunks(MONTHS_PER_YEAR)
        .enumerate()
        .map(|(year, slice)| {
            let mut record = AnnualRecord {
                year,
                months: slice.len(),
                units: vec![0; num_types],
                new_users: 0,
                commission: 0.0,
                subscription: 0.0,
                revenue: 0.0,
                expenses: ExpenseBreakdown::default(),
                total_expense: 0.0,
                profit: 0.0,
                cumulative_profit: 0.0,
            };

            for month in slice {
                for (sum, &sold) in record.units.iter_mut().zip(&month.units) {
                    *sum += sold;
                }
                record.new_users += month.new_users;
                record.commission += month.commission;
                record.subscription += month.subscription;
                record.revenue += month.revenue;
                record.total_expense += month.total_expense;
                record.expenses += &month.expenses;
            }

            record.profit = record.revenue - record.total_expense;
            cumulative_profit += record.profit;
            record.cumulative_profit = cumulative_profit;

            log::debug!(
                "year {}: revenue {:.0}, expense {:.0}, profit {:.0}, cumulative {:.0}",
                year + 1,
                record.revenue,
                record.total_expense,
                record.profit,
                record.cumulative_profit
            );

            record
        })
        .collect()
}

pub fn summarize(monthly: &[MonthlyRecord]) -> Summary {
    let mut expenses = ExpenseBreakdown::default();
    for month in monthly {
        expenses += &month.expenses;
    }

    let total_revenue: f64 = monthly.iter().map(|m| m.revenue).sum();
    let total_expense: f64 = monthly.iter().map(|m| m.total_expense).sum();

    Summary {
        total_revenue,
        total_subscription: monthly.iter().map(|m| m.subscription).sum(),
        total_commission: monthly.iter().map(|m| m.commission).sum(),
        total_expense,
        total_profit: total_revenue - total_expense,
        final_paying_users: monthly.last().map_or(0.0, |m| m.paying_users),
        expenses,
    }
}
