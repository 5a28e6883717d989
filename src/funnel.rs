use crate::config::AppParams;

/// Subscription state for one month.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct FunnelMonth {
    pub trial_starts: u64,
    /// Paying users carried over from last month after churn.
    pub remaining: f64,
    /// Trial cohort converting to paid this month.
    pub conversions: u64,
    pub paying_users: f64,
}

/// Paying-user cohort with a free trial and monthly churn.
///
/// Feed months in order through [`UserFunnel::step`]. A cohort that starts
/// its trial in month `m` converts in full in month `m + free_months`.
/// Paying users stay fractional between months.
pub struct UserFunnel<'a> {
    app: &'a AppParams,
    trial_history: Vec<u64>,
    paying_users: f64,
}

impl<'a> UserFunnel<'a> {
    pub fn new(app: &'a AppParams) -> Self {
        Self {
            app,
            trial_history: Vec::new(),
            paying_users: 0.0,
        }
    }

    pub fn step(&mut self, trial_starts: u64) -> FunnelMonth {
        let m = self.trial_history.len();
        self.trial_history.push(trial_starts);

        let prev = self.paying_users;
        let remaining = prev - prev * self.app.churn_rate;

        let conversions = match m.checked_sub(self.app.free_months) {
            Some(start) => self.trial_history[start],
            None => 0,
        };

        self.paying_users = (remaining + conversions as f64).max(0.0);

        FunnelMonth {
            trial_starts,
            remaining,
            conversions,
            paying_users: self.paying_users,
        }
    }
}
