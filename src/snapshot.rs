//! External parameter snapshot.
//!
//! A snapshot is the loosely-typed form parameters take on disk: signed
//! integers so negative input can be reported by field, rates that may be
//! given as percentages, explicit entry counts and optional sections. It is
//! turned into a [`ParameterSet`] by [`TryFrom`], which normalizes and
//! validates every value.

use crate::config::{
    AppParams, CloudParams, DealerParams, DevelopParams, LaborParams, ParameterSet, RobotType,
    MAX_ROBOT_TYPES, MAX_THRESHOLDS, ScaleStep, SupportParams, ToolParams, check_num,
};
use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ParamSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robot: Option<RobotSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<AppSection>,
    #[serde(default)]
    pub cloud: CloudSection,
    #[serde(default)]
    pub dealer: DealerSection,
    #[serde(default)]
    pub develop: DevelopSection,
    #[serde(default)]
    pub tool: ToolSection,
    #[serde(default, alias = "sport")]
    pub support: SupportSection,
    #[serde(default)]
    pub labor: LaborSection,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RobotSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_types: Option<i64>,
    #[serde(default)]
    pub items: Vec<RobotItem>,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct RobotItem {
    pub name: String,
    pub price: i64,
    pub commission_rate: f64,
    pub purchase_rate: f64,
    pub release_month: i64,
}

impl RobotItem {
    /// Entry used for robots counted by `num_types` but not listed.
    fn placeholder(i: usize) -> Self {
        Self {
            name: format!("No{}", i + 1),
            price: 230_000,
            commission_rate: 0.10,
            purchase_rate: 0.03,
            release_month: 0,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct AppSection {
    pub monthly_fee: i64,
    pub free_months: i64,
    pub churn_rate: f64,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSection {
    pub initial_cost: i64,
    pub bugfix_cost: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_thresholds: Option<i64>,
    pub thresholds: Vec<i64>,
    pub scale_costs: Vec<i64>,
    pub aws_cost_per_user_month: i64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DealerSection {
    pub initial_companies: i64,
    pub max_companies: i64,
    pub fixed_months_before_growth: i64,
    pub company_growth_per_month: i64,
}

impl Default for DealerSection {
    fn default() -> Self {
        Self {
            initial_companies: 1,
            max_companies: 1,
            fixed_months_before_growth: 0,
            company_growth_per_month: 0,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopSection {
    pub android_dev_initial: i64,
    pub ios_dev_initial: i64,
    pub ios_dev_month: i64,
    pub robot_if_dev: i64,
    pub android_bugfix_cost: i64,
    pub ios_bugfix_cost: i64,
    pub bugfix_cycle_months: i64,
}

impl Default for DevelopSection {
    fn default() -> Self {
        Self {
            android_dev_initial: 0,
            ios_dev_initial: 0,
            ios_dev_month: 0,
            robot_if_dev: 0,
            android_bugfix_cost: 0,
            ios_bugfix_cost: 0,
            bugfix_cycle_months: 1,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSection {
    pub robot_unit_cost: i64,
    pub sales_tool_cost_per_shop: i64,
    pub robots_per_shop: i64,
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportSection {
    pub cs_cost_per_user_month: i64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborSection {
    pub base_fte: f64,
    pub fte_cost_per_month: i64,
    pub base_users: i64,
    pub fte_increment_users: i64,
    pub fte_increment: f64,
}

impl Default for LaborSection {
    fn default() -> Self {
        Self {
            base_fte: 0.0,
            fte_cost_per_month: 0,
            base_users: 0,
            fte_increment_users: 1,
            fte_increment: 0.0,
        }
    }
}

impl ParamSnapshot {
    /// Parse a JSON snapshot. A leading byte order mark is ignored.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        serde_json::from_str(text).context("failed to deserialize JSON snapshot")
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to deserialize TOML snapshot")
    }

    /// Load a snapshot, choosing TOML for `.toml` files and JSON otherwise.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let text = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        if is_toml(file) {
            Self::from_toml_str(&text)
        } else {
            Self::from_json_str(&text)
        }
    }

    pub fn to_file<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let text = if is_toml(file) {
            toml::to_string_pretty(self).context("failed to serialize TOML snapshot")?
        } else {
            serde_json::to_string_pretty(self).context("failed to serialize JSON snapshot")?
        };
        fs::write(file, text).with_context(|| format!("failed to write {file:?}"))?;
        Ok(())
    }
}

impl ParameterSet {
    /// Load, normalize and validate parameters from a snapshot file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or wraps the
    /// [`ConfigError`] produced by normalization.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let snapshot = ParamSnapshot::from_file(file).context("failed to load snapshot")?;
        let params = ParameterSet::try_from(snapshot).context("failed to validate parameters")?;
        Ok(params)
    }

    pub fn to_file<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        ParamSnapshot::from(self).to_file(file)
    }
}

impl TryFrom<ParamSnapshot> for ParameterSet {
    type Error = ConfigError;

    fn try_from(snap: ParamSnapshot) -> Result<Self, Self::Error> {
        let robot = snap.robot.ok_or(ConfigError::Shape { section: "robot" })?;
        let app = snap.app.ok_or(ConfigError::Shape { section: "app" })?;

        let params = ParameterSet {
            robots: convert_robots(robot)?,
            app: AppParams {
                monthly_fee: unsigned("app.monthly_fee", app.monthly_fee)?,
                free_months: month("app.free_months", app.free_months)?,
                churn_rate: normalize_rate("app.churn_rate", app.churn_rate)?,
            },
            cloud: convert_cloud(snap.cloud)?,
            dealer: DealerParams {
                initial_companies: unsigned(
                    "dealer.initial_companies",
                    snap.dealer.initial_companies,
                )?,
                max_companies: unsigned("dealer.max_companies", snap.dealer.max_companies)?,
                fixed_months_before_growth: month(
                    "dealer.fixed_months_before_growth",
                    snap.dealer.fixed_months_before_growth,
                )?,
                company_growth_per_month: unsigned(
                    "dealer.company_growth_per_month",
                    snap.dealer.company_growth_per_month,
                )?,
            },
            develop: DevelopParams {
                android_dev_initial: unsigned(
                    "develop.android_dev_initial",
                    snap.develop.android_dev_initial,
                )?,
                ios_dev_initial: unsigned("develop.ios_dev_initial", snap.develop.ios_dev_initial)?,
                ios_dev_month: month("develop.ios_dev_month", snap.develop.ios_dev_month)?,
                robot_if_dev: unsigned("develop.robot_if_dev", snap.develop.robot_if_dev)?,
                android_bugfix_cost: unsigned(
                    "develop.android_bugfix_cost",
                    snap.develop.android_bugfix_cost,
                )?,
                ios_bugfix_cost: unsigned("develop.ios_bugfix_cost", snap.develop.ios_bugfix_cost)?,
                bugfix_cycle_months: month(
                    "develop.bugfix_cycle_months",
                    snap.develop.bugfix_cycle_months,
                )?,
            },
            tool: ToolParams {
                robot_unit_cost: unsigned("tool.robot_unit_cost", snap.tool.robot_unit_cost)?,
                sales_tool_cost_per_shop: unsigned(
                    "tool.sales_tool_cost_per_shop",
                    snap.tool.sales_tool_cost_per_shop,
                )?,
                robots_per_shop: unsigned("tool.robots_per_shop", snap.tool.robots_per_shop)?,
            },
            support: SupportParams {
                cs_cost_per_user_month: unsigned(
                    "support.cs_cost_per_user_month",
                    snap.support.cs_cost_per_user_month,
                )?,
            },
            labor: LaborParams {
                base_fte: snap.labor.base_fte,
                fte_cost_per_month: unsigned(
                    "labor.fte_cost_per_month",
                    snap.labor.fte_cost_per_month,
                )?,
                base_users: unsigned("labor.base_users", snap.labor.base_users)?,
                fte_increment_users: unsigned(
                    "labor.fte_increment_users",
                    snap.labor.fte_increment_users,
                )?,
                fte_increment: snap.labor.fte_increment,
            },
        };

        params.validate()?;
        Ok(params)
    }
}

impl From<&ParameterSet> for ParamSnapshot {
    fn from(params: &ParameterSet) -> Self {
        let items = params
            .robots
            .iter()
            .map(|robot| RobotItem {
                name: robot.name.clone(),
                price: signed(robot.price),
                commission_rate: robot.commission_rate,
                purchase_rate: robot.purchase_rate,
                release_month: signed(robot.release_month as u64),
            })
            .collect::<Vec<_>>();
        let steps = &params.cloud.scale_steps;

        Self {
            robot: Some(RobotSection {
                num_types: Some(items.len() as i64),
                items,
            }),
            app: Some(AppSection {
                monthly_fee: signed(params.app.monthly_fee),
                free_months: signed(params.app.free_months as u64),
                churn_rate: params.app.churn_rate,
            }),
            cloud: CloudSection {
                initial_cost: signed(params.cloud.initial_cost),
                bugfix_cost: signed(params.cloud.bugfix_cost),
                num_thresholds: Some(steps.len() as i64),
                thresholds: steps.iter().map(|step| signed(step.threshold)).collect(),
                scale_costs: steps.iter().map(|step| signed(step.cost)).collect(),
                aws_cost_per_user_month: signed(params.cloud.aws_cost_per_user_month),
            },
            dealer: DealerSection {
                initial_companies: signed(params.dealer.initial_companies),
                max_companies: signed(params.dealer.max_companies),
                fixed_months_before_growth: signed(params.dealer.fixed_months_before_growth as u64),
                company_growth_per_month: signed(params.dealer.company_growth_per_month),
            },
            develop: DevelopSection {
                android_dev_initial: signed(params.develop.android_dev_initial),
                ios_dev_initial: signed(params.develop.ios_dev_initial),
                ios_dev_month: signed(params.develop.ios_dev_month as u64),
                robot_if_dev: signed(params.develop.robot_if_dev),
                android_bugfix_cost: signed(params.develop.android_bugfix_cost),
                ios_bugfix_cost: signed(params.develop.ios_bugfix_cost),
                bugfix_cycle_months: signed(params.develop.bugfix_cycle_months as u64),
            },
            tool: ToolSection {
                robot_unit_cost: signed(params.tool.robot_unit_cost),
                sales_tool_cost_per_shop: signed(params.tool.sales_tool_cost_per_shop),
                robots_per_shop: signed(params.tool.robots_per_shop),
            },
            support: SupportSection {
                cs_cost_per_user_month: signed(params.support.cs_cost_per_user_month),
            },
            labor: LaborSection {
                base_fte: params.labor.base_fte,
                fte_cost_per_month: signed(params.labor.fte_cost_per_month),
                base_users: signed(params.labor.base_users),
                fte_increment_users: signed(params.labor.fte_increment_users),
                fte_increment: params.labor.fte_increment,
            },
        }
    }
}

fn convert_robots(section: RobotSection) -> Result<Vec<RobotType>, ConfigError> {
    let items = match section.num_types {
        Some(num_types) => {
            let num_types = unsigned("robot.num_types", num_types)?;
            check_num("robot.num_types", num_types, 0..=MAX_ROBOT_TYPES)?;
            let num_types = num_types as usize;
            if section.items.len() < num_types {
                log::warn!(
                    "robot.num_types is {num_types} but only {} items are listed, using placeholders",
                    section.items.len()
                );
            }
            let mut items = section.items;
            items.truncate(num_types);
            for i in items.len()..num_types {
                items.push(RobotItem::placeholder(i));
            }
            items
        }
        None => section.items,
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| -> Result<RobotType, ConfigError> {
            let field = |name: &str| format!("robot.items.{i}.{name}");
            Ok(RobotType {
                name: item.name,
                price: unsigned(&field("price"), item.price)?,
                commission_rate: normalize_rate(&field("commission_rate"), item.commission_rate)?,
                purchase_rate: normalize_rate(&field("purchase_rate"), item.purchase_rate)?,
                release_month: month(&field("release_month"), item.release_month)?,
            })
        })
        .collect()
}

fn convert_cloud(section: CloudSection) -> Result<CloudParams, ConfigError> {
    let mut thresholds = section.thresholds;
    let mut scale_costs = section.scale_costs;

    match section.num_thresholds {
        Some(num_thresholds) => {
            let num_thresholds = unsigned("cloud.num_thresholds", num_thresholds)?;
            check_num("cloud.num_thresholds", num_thresholds, 0..=MAX_THRESHOLDS)?;
            let num_thresholds = num_thresholds as usize;
            if thresholds.len() < num_thresholds || scale_costs.len() < num_thresholds {
                log::warn!("padding cloud thresholds to {num_thresholds} entries with zeros");
            }
            thresholds.resize(num_thresholds, 0);
            scale_costs.resize(num_thresholds, 0);
        }
        None => {
            if thresholds.len() != scale_costs.len() {
                return Err(ConfigError::range(
                    "cloud.scale_costs",
                    format!(
                        "expected {} entries to pair with cloud.thresholds, but found {}",
                        thresholds.len(),
                        scale_costs.len()
                    ),
                ));
            }
        }
    }

    let scale_steps = thresholds
        .into_iter()
        .zip(scale_costs)
        .enumerate()
        .map(|(i, (threshold, cost))| {
            Ok(ScaleStep {
                threshold: unsigned(&format!("cloud.thresholds.{i}"), threshold)?,
                cost: unsigned(&format!("cloud.scale_costs.{i}"), cost)?,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    Ok(CloudParams {
        initial_cost: unsigned("cloud.initial_cost", section.initial_cost)?,
        bugfix_cost: unsigned("cloud.bugfix_cost", section.bugfix_cost)?,
        scale_steps,
        aws_cost_per_user_month: unsigned(
            "cloud.aws_cost_per_user_month",
            section.aws_cost_per_user_month,
        )?,
    })
}

/// Interpret rates above 1 as percentages.
fn normalize_rate(field: &str, value: f64) -> Result<f64, ConfigError> {
    let rate = if value > 1.0 {
        log::warn!("{field} is {value}, reading it as a percentage");
        value / 100.0
    } else {
        value
    };
    check_num(field, rate, 0.0..=1.0)?;
    Ok(rate)
}

fn unsigned(field: &str, value: i64) -> Result<u64, ConfigError> {
    u64::try_from(value).map_err(|_| {
        ConfigError::range(field, format!("number must be non-negative, but is {value}"))
    })
}

fn month(field: &str, value: i64) -> Result<usize, ConfigError> {
    Ok(unsigned(field, value)? as usize)
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn is_toml(file: &Path) -> bool {
    file.extension().is_some_and(|ext| ext == "toml")
}
