//! Projection output types.

use crate::expense::ExpenseBreakdown;
use serde::{Deserialize, Serialize};

/// Record of a single simulated month.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Month index, starting at 0.
    pub month: usize,

    pub dealers: u64,
    pub new_companies: u64,
    pub events: u64,

    /// Units sold per robot type.
    pub units: Vec<u64>,
    /// Robot buyers this month, all types.
    pub new_users: u64,
    pub trial_starts: u64,
    pub paying_users: f64,

    pub commission: f64,
    pub subscription: f64,
    pub revenue: f64,

    pub expenses: ExpenseBreakdown,
    pub total_expense: f64,
    /// Staffing headcount.
    pub fte: f64,

    pub profit: f64,
}

/// Sums over the months of one simulated year.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AnnualRecord {
    /// Year index, starting at 0.
    pub year: usize,
    /// Number of months in this year's slice.
    pub months: usize,

    pub units: Vec<u64>,
    pub new_users: u64,

    pub commission: f64,
    pub subscription: f64,
    pub revenue: f64,

    pub expenses: ExpenseBreakdown,
    pub total_expense: f64,

    pub profit: f64,
    /// Profit summed over this and all earlier years.
    pub cumulative_profit: f64,
}

/// Headline figures over the whole horizon.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub total_revenue: f64,
    pub total_subscription: f64,
    pub total_commission: f64,
    pub total_expense: f64,
    pub total_profit: f64,
    pub final_paying_users: f64,
    /// Expense items summed over the horizon.
    pub expenses: ExpenseBreakdown,
}

/// Complete output of one projection run.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Projection {
    pub robot_names: Vec<String>,
    pub monthly: Vec<MonthlyRecord>,
    pub annual: Vec<AnnualRecord>,
    pub summary: Summary,
}
