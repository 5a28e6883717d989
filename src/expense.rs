use crate::config::{LaborParams, ParameterSet, ScaleStep};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Itemized spend for one month, or a sum of months.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub android_dev: f64,
    pub ios_dev: f64,
    pub robot_if_dev: f64,
    pub android_bugfix: f64,
    pub ios_bugfix: f64,

    pub cloud_initial: f64,
    pub cloud_aws: f64,
    pub cloud_bugfix: f64,
    pub cloud_scale: f64,

    pub shop_acquisition: f64,
    pub customer_support: f64,
    pub staffing: f64,
}

impl ExpenseBreakdown {
    /// App and robot-interface development, including app bugfixes.
    pub fn development(&self) -> f64 {
        self.android_dev + self.ios_dev + self.robot_if_dev + self.android_bugfix + self.ios_bugfix
    }

    pub fn cloud(&self) -> f64 {
        self.cloud_initial + self.cloud_aws + self.cloud_bugfix + self.cloud_scale
    }

    pub fn total(&self) -> f64 {
        self.development()
            + self.cloud()
            + self.shop_acquisition
            + self.customer_support
            + self.staffing
    }

    /// Items paired with their column names.
    pub fn items(&self) -> [(&'static str, f64); 12] {
        [
            ("android_dev", self.android_dev),
            ("ios_dev", self.ios_dev),
            ("robot_if_dev", self.robot_if_dev),
            ("android_bugfix", self.android_bugfix),
            ("ios_bugfix", self.ios_bugfix),
            ("cloud_initial", self.cloud_initial),
            ("cloud_aws", self.cloud_aws),
            ("cloud_bugfix", self.cloud_bugfix),
            ("cloud_scale", self.cloud_scale),
            ("shop_acquisition", self.shop_acquisition),
            ("customer_support", self.customer_support),
            ("staffing", self.staffing),
        ]
    }

    /// Spend grouped the way the summary reports it.
    pub fn categories(&self) -> [(&'static str, f64); 5] {
        [
            ("development", self.development()),
            ("cloud", self.cloud()),
            ("staffing", self.staffing),
            ("shop_acquisition", self.shop_acquisition),
            ("customer_support", self.customer_support),
        ]
    }
}

impl AddAssign<&ExpenseBreakdown> for ExpenseBreakdown {
    fn add_assign(&mut self, rhs: &ExpenseBreakdown) {
        self.android_dev += rhs.android_dev;
        self.ios_dev += rhs.ios_dev;
        self.robot_if_dev += rhs.robot_if_dev;
        self.android_bugfix += rhs.android_bugfix;
        self.ios_bugfix += rhs.ios_bugfix;
        self.cloud_initial += rhs.cloud_initial;
        self.cloud_aws += rhs.cloud_aws;
        self.cloud_bugfix += rhs.cloud_bugfix;
        self.cloud_scale += rhs.cloud_scale;
        self.shop_acquisition += rhs.shop_acquisition;
        self.customer_support += rhs.customer_support;
        self.staffing += rhs.staffing;
    }
}

/// One-shot flags for the cloud scale-up thresholds of a single run.
pub struct ScaleUpLatch<'a> {
    steps: &'a [ScaleStep],
    fired: Vec<bool>,
}

impl<'a> ScaleUpLatch<'a> {
    pub fn new(steps: &'a [ScaleStep]) -> Self {
        Self {
            steps,
            fired: vec![false; steps.len()],
        }
    }

    /// Cost of every threshold crossed from below between `prev` and `now`
    /// that has not fired before.
    pub fn observe(&mut self, m: usize, prev: f64, now: f64) -> u64 {
        let mut cost = 0;
        for (step, fired) in self.steps.iter().zip(self.fired.iter_mut()) {
            if *fired {
                continue;
            }
            let threshold = step.threshold as f64;
            if prev < threshold && threshold <= now {
                log::debug!("month {m}: paying users reached {}", step.threshold);
                cost += step.cost;
                *fired = true;
            }
        }
        cost
    }
}

/// Headcount for a given number of paying users.
///
/// Each started band of `fte_increment_users` above `base_users` adds
/// `fte_increment`.
pub fn staffing_fte(labor: &LaborParams, paying_users: f64) -> f64 {
    let over_base = (paying_users - labor.base_users as f64).max(0.0);
    let increments = if over_base > 0.0 {
        (over_base / labor.fte_increment_users as f64).ceil()
    } else {
        0.0
    };
    labor.base_fte + increments * labor.fte_increment
}

/// Spend and headcount for one month.
#[derive(Debug, PartialEq, Clone)]
pub struct ExpenseMonth {
    pub items: ExpenseBreakdown,
    pub fte: f64,
}

/// Month-by-month expense model.
///
/// Months must be fed in increasing order so the scale-up latch sees every
/// crossing.
pub struct ExpenseModel<'a> {
    params: &'a ParameterSet,
    latch: ScaleUpLatch<'a>,
}

impl<'a> ExpenseModel<'a> {
    /// `params` must have passed [`ParameterSet::validate`]; a zero
    /// `develop.bugfix_cycle_months` panics in [`ExpenseModel::month`].
    pub fn new(params: &'a ParameterSet) -> Self {
        Self {
            params,
            latch: ScaleUpLatch::new(&params.cloud.scale_steps),
        }
    }

    pub fn month(
        &mut self,
        m: usize,
        prev_paying_users: f64,
        paying_users: f64,
        new_companies: u64,
    ) -> ExpenseMonth {
        let p = self.params;
        let dev = &p.develop;
        let mut items = ExpenseBreakdown::default();

        if m == 0 {
            items.android_dev = dev.android_dev_initial as f64;
            items.cloud_initial = p.cloud.initial_cost as f64;
        }
        if m == dev.ios_dev_month {
            items.ios_dev = dev.ios_dev_initial as f64;
        }
        let releases = p.robots.iter().filter(|r| r.release_month == m).count();
        items.robot_if_dev = releases as f64 * dev.robot_if_dev as f64;

        if m % dev.bugfix_cycle_months == 0 {
            if m >= 1 {
                items.android_bugfix = dev.android_bugfix_cost as f64;
                items.cloud_bugfix = p.cloud.bugfix_cost as f64;
            }
            if m > dev.ios_dev_month {
                items.ios_bugfix = dev.ios_bugfix_cost as f64;
            }
        }

        items.cloud_aws = paying_users * p.cloud.aws_cost_per_user_month as f64;
        items.cloud_scale = self.latch.observe(m, prev_paying_users, paying_users) as f64;

        items.shop_acquisition = new_companies as f64 * p.tool.cost_per_new_shop() as f64;
        items.customer_support = paying_users * p.support.cs_cost_per_user_month as f64;

        let fte = staffing_fte(&p.labor, paying_users);
        items.staffing = fte * p.labor.fte_cost_per_month as f64;

        ExpenseMonth { items, fte }
    }
}
