use crate::aggregate;
use crate::config::{Drivers, ParameterSet};
use crate::dealer::DealerGrowth;
use crate::error::ConfigError;
use crate::expense::ExpenseModel;
use crate::funnel::UserFunnel;
use crate::revenue;
use crate::sales::RobotSales;
use crate::types::{MonthlyRecord, Projection};

/// Projection engine.
///
/// Holds a validated parameter set and the exogenous drivers. Every call to
/// [`Engine::project`] recomputes the whole horizon from scratch.
pub struct Engine {
    params: ParameterSet,
    drivers: Drivers,
}

impl Engine {
    /// Create a new `Engine` after validating both inputs.
    pub fn new(params: ParameterSet, drivers: Drivers) -> Result<Self, ConfigError> {
        params.validate()?;
        drivers.validate()?;
        Ok(Self { params, drivers })
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn drivers(&self) -> &Drivers {
        &self.drivers
    }

    /// Run every month of the horizon in order and roll the results up.
    pub fn project(&self) -> Projection {
        let monthly = self.simulate_months();
        let annual = aggregate::annual(&monthly, self.params.robots.len());
        let summary = aggregate::summarize(&monthly);

        Projection {
            robot_names: self.params.robots.iter().map(|r| r.name.clone()).collect(),
            monthly,
            annual,
            summary,
        }
    }

    fn simulate_months(&self) -> Vec<MonthlyRecord> {
        let params = &self.params;
        let n_months = self.drivers.months();

        let dealers = DealerGrowth::new(&params.dealer);
        let sales = RobotSales::new(&params.robots, &self.drivers);
        let mut funnel = UserFunnel::new(&params.app);
        let mut expenses = ExpenseModel::new(params);

        let mut records = Vec::with_capacity(n_months);
        let mut prev_paying_users = 0.0;

        for m in 0..n_months {
            let n_dealers = dealers.count(m);
            let new_companies = dealers.new_companies(m);

            let sold = sales.month(m, n_dealers);
            let new_users = sold.total_units();

            let trial_starts = new_users.saturating_add(self.drivers.external_signups_per_month);
            let users = funnel.step(trial_starts);

            let income = revenue::month(&params.app, users.paying_users, sold.commission);
            let spend = expenses.month(m, prev_paying_users, users.paying_users, new_companies);
            let total_expense = spend.items.total();

            records.push(MonthlyRecord {
                month: m,
                dealers: n_dealers,
                new_companies,
                events: sold.events,
                units: sold.units,
                new_users,
                trial_starts,
                paying_users: users.paying_users,
                commission: income.commission,
                subscription: income.subscription,
                revenue: income.total,
                expenses: spend.items,
                total_expense,
                fte: spend.fte,
                profit: income.total - total_expense,
            });

            prev_paying_users = users.paying_users;
        }

        log::debug!("simulated {n_months} months");

        records
    }
}
