use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, ops::RangeBounds};

/// Share of subscription revenue kept after the app platform's 15% cut.
pub const PLATFORM_NET_SHARE: f64 = 0.85;

/// Longest supported horizon in years.
pub const MAX_YEARS: u32 = 10;

/// Largest robot line-up a snapshot may declare.
pub const MAX_ROBOT_TYPES: u64 = 64;

/// Largest number of cloud scale-up steps a snapshot may declare.
pub const MAX_THRESHOLDS: u64 = 64;

/// Robot model sold through the dealer network.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RobotType {
    pub name: String,
    /// Retail price per unit.
    pub price: u64,
    /// Fraction of the retail price received as commission.
    pub commission_rate: f64,
    /// Fraction of event attendees that buy this robot.
    pub purchase_rate: f64,
    /// Sales start the month after this one.
    pub release_month: usize,
}

/// Subscription app pricing.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AppParams {
    pub monthly_fee: u64,
    pub free_months: usize,
    pub churn_rate: f64,
}

/// One-time infrastructure cost paid the first time paying users reach `threshold`.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ScaleStep {
    pub threshold: u64,
    pub cost: u64,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct CloudParams {
    pub initial_cost: u64,
    pub bugfix_cost: u64,
    pub scale_steps: Vec<ScaleStep>,
    pub aws_cost_per_user_month: u64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DealerParams {
    pub initial_companies: u64,
    pub max_companies: u64,
    pub fixed_months_before_growth: usize,
    pub company_growth_per_month: u64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct DevelopParams {
    pub android_dev_initial: u64,
    pub ios_dev_initial: u64,
    pub ios_dev_month: usize,
    /// Interface development cost, paid once per robot type at its release month.
    pub robot_if_dev: u64,
    pub android_bugfix_cost: u64,
    pub ios_bugfix_cost: u64,
    pub bugfix_cycle_months: usize,
}

/// Equipment handed to every newly contracted dealer.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct ToolParams {
    pub robot_unit_cost: u64,
    pub sales_tool_cost_per_shop: u64,
    pub robots_per_shop: u64,
}

impl ToolParams {
    pub fn cost_per_new_shop(&self) -> u64 {
        self.robots_per_shop
            .saturating_mul(self.robot_unit_cost)
            .saturating_add(self.sales_tool_cost_per_shop)
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct SupportParams {
    pub cs_cost_per_user_month: u64,
}

/// Staffing step function parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct LaborParams {
    pub base_fte: f64,
    pub fte_cost_per_month: u64,
    /// Paying users covered by `base_fte` alone.
    pub base_users: u64,
    /// Width of each staffing band above `base_users`.
    pub fte_increment_users: u64,
    pub fte_increment: f64,
}

/// Complete, unit-normalized business parameters for one projection.
///
/// Currency values are whole base monetary units and rates are fractions
/// in `[0, 1]`. Build one from a snapshot file through
/// [`ParamSnapshot`](crate::snapshot::ParamSnapshot) or start from
/// [`ParameterSet::baseline`].
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    pub robots: Vec<RobotType>,
    pub app: AppParams,
    pub cloud: CloudParams,
    pub dealer: DealerParams,
    pub develop: DevelopParams,
    pub tool: ToolParams,
    pub support: SupportParams,
    pub labor: LaborParams,
}

impl ParameterSet {
    /// Baseline business case: two robot models, a 300/month app with three
    /// free months and a dealer network growing to 50 companies.
    pub fn baseline() -> Self {
        Self {
            robots: vec![
                RobotType {
                    name: "RoBoHoN".into(),
                    price: 230_000,
                    commission_rate: 0.10,
                    purchase_rate: 0.03,
                    release_month: 0,
                },
                RobotType {
                    name: "Poketomo".into(),
                    price: 39_000,
                    commission_rate: 0.10,
                    purchase_rate: 0.09,
                    release_month: 10,
                },
            ],
            app: AppParams {
                monthly_fee: 300,
                free_months: 3,
                churn_rate: 0.03,
            },
            cloud: CloudParams {
                initial_cost: 3_500_000,
                bugfix_cost: 1_000_000,
                scale_steps: [
                    (300, 1_000_000),
                    (1_000, 1_500_000),
                    (3_000, 2_000_000),
                    (10_000, 3_000_000),
                ]
                .into_iter()
                .map(|(threshold, cost)| ScaleStep { threshold, cost })
                .collect(),
                aws_cost_per_user_month: 50,
            },
            dealer: DealerParams {
                initial_companies: 1,
                max_companies: 50,
                fixed_months_before_growth: 6,
                company_growth_per_month: 2,
            },
            develop: DevelopParams {
                android_dev_initial: 4_500_000,
                ios_dev_initial: 6_500_000,
                ios_dev_month: 12,
                robot_if_dev: 2_500_000,
                android_bugfix_cost: 1_000_000,
                ios_bugfix_cost: 1_000_000,
                bugfix_cycle_months: 6,
            },
            tool: ToolParams {
                robot_unit_cost: 230_000 + 39_000,
                sales_tool_cost_per_shop: 200_000,
                robots_per_shop: 3,
            },
            support: SupportParams {
                cs_cost_per_user_month: 10,
            },
            labor: LaborParams {
                base_fte: 1.0,
                fte_cost_per_month: 1_200_000,
                base_users: 2_000,
                fte_increment_users: 4_000,
                fte_increment: 0.5,
            },
        }
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    /// Returns [`ConfigError::Range`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, robot) in self.robots.iter().enumerate() {
            check_num(
                &format!("robot.items.{i}.commission_rate"),
                robot.commission_rate,
                0.0..=1.0,
            )?;
            check_num(
                &format!("robot.items.{i}.purchase_rate"),
                robot.purchase_rate,
                0.0..=1.0,
            )?;
        }

        check_num("app.churn_rate", self.app.churn_rate, 0.0..=1.0)?;

        check_num("dealer.initial_companies", self.dealer.initial_companies, 1..)?;
        check_num(
            "dealer.max_companies",
            self.dealer.max_companies,
            self.dealer.initial_companies..,
        )?;

        check_num(
            "develop.bugfix_cycle_months",
            self.develop.bugfix_cycle_months,
            1..,
        )?;

        check_num("labor.base_fte", self.labor.base_fte, 0.0..f64::INFINITY)?;
        check_num(
            "labor.fte_increment_users",
            self.labor.fte_increment_users,
            1..,
        )?;
        check_num(
            "labor.fte_increment",
            self.labor.fte_increment,
            0.0..f64::INFINITY,
        )?;

        Ok(())
    }
}

/// Exogenous scalars that live outside the parameter snapshot.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Drivers {
    /// Horizon in whole years.
    pub years: u32,
    pub attendees_per_event: u64,
    pub events_per_company_per_month: u64,
    /// Signups per month that do not come from a robot purchase.
    pub external_signups_per_month: u64,
}

impl Drivers {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_num("years", self.years, 1..=MAX_YEARS)
    }

    pub fn months(&self) -> usize {
        self.years as usize * 12
    }
}

impl Default for Drivers {
    fn default() -> Self {
        Self {
            years: 7,
            attendees_per_event: 50,
            events_per_company_per_month: 2,
            external_signups_per_month: 0,
        }
    }
}

pub(crate) fn check_num<T, R>(field: &str, num: T, range: R) -> Result<(), ConfigError>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        return Err(ConfigError::range(
            field,
            format!("number must be in the range {range:?}, but is {num:?}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_is_valid() {
        assert_eq!(ParameterSet::baseline().validate(), Ok(()));
        assert_eq!(Drivers::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_churn_above_one() {
        let mut params = ParameterSet::baseline();
        params.app.churn_rate = 1.5;
        let err = params.validate().unwrap_err();
        assert_eq!(err.field(), "app.churn_rate");
    }

    #[test]
    fn rejects_zero_staffing_band() {
        let mut params = ParameterSet::baseline();
        params.labor.fte_increment_users = 0;
        let err = params.validate().unwrap_err();
        assert_eq!(err.field(), "labor.fte_increment_users");
    }

    #[test]
    fn rejects_ceiling_below_initial_dealers() {
        let mut params = ParameterSet::baseline();
        params.dealer.initial_companies = 5;
        params.dealer.max_companies = 4;
        let err = params.validate().unwrap_err();
        assert_eq!(err.field(), "dealer.max_companies");
    }

    #[test]
    fn rejects_horizon_outside_bounds() {
        let drivers = Drivers {
            years: 11,
            ..Drivers::default()
        };
        assert_eq!(drivers.validate().unwrap_err().field(), "years");
        let drivers = Drivers {
            years: 0,
            ..Drivers::default()
        };
        assert!(drivers.validate().is_err());
        assert_eq!(Drivers::default().months(), 84);
    }

    #[test]
    fn cost_per_new_shop_combines_robots_and_tools() {
        let tool = ToolParams {
            robot_unit_cost: 100,
            sales_tool_cost_per_shop: 50,
            robots_per_shop: 3,
        };
        assert_eq!(tool.cost_per_new_shop(), 350);
    }
}
