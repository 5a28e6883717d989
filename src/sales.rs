use crate::config::{Drivers, RobotType};
use serde::{Deserialize, Serialize};

/// Robot sales and commission for one month.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SalesMonth {
    pub events: u64,
    /// Units sold per robot type, in catalogue order.
    pub units: Vec<u64>,
    pub commission: f64,
}

impl SalesMonth {
    pub fn total_units(&self) -> u64 {
        self.units.iter().sum()
    }
}

/// Event-driven robot sales through the dealer network.
pub struct RobotSales<'a> {
    robots: &'a [RobotType],
    attendees_per_event: u64,
    events_per_company: u64,
}

impl<'a> RobotSales<'a> {
    pub fn new(robots: &'a [RobotType], drivers: &Drivers) -> Self {
        Self {
            robots,
            attendees_per_event: drivers.attendees_per_event,
            events_per_company: drivers.events_per_company_per_month,
        }
    }

    /// Sales in month `m` given that month's dealer count.
    ///
    /// A robot sells nothing up to and including its release month.
    pub fn month(&self, m: usize, dealers: u64) -> SalesMonth {
        let events = dealers.saturating_mul(self.events_per_company);
        let audience = events.saturating_mul(self.attendees_per_event) as f64;

        let units: Vec<u64> = self
            .robots
            .iter()
            .map(|robot| {
                if m > robot.release_month {
                    (audience * robot.purchase_rate).floor() as u64
                } else {
                    0
                }
            })
            .collect();

        let commission = self
            .robots
            .iter()
            .zip(&units)
            .map(|(robot, &sold)| sold as f64 * robot.price as f64 * robot.commission_rate)
            .sum();

        SalesMonth {
            events,
            units,
            commission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn robot(price: u64, commission_rate: f64, purchase_rate: f64, release_month: usize) -> RobotType {
        RobotType {
            name: "R".into(),
            price,
            commission_rate,
            purchase_rate,
            release_month,
        }
    }

    fn drivers() -> Drivers {
        Drivers {
            years: 1,
            attendees_per_event: 50,
            events_per_company_per_month: 2,
            external_signups_per_month: 0,
        }
    }

    #[test]
    fn release_month_itself_sells_nothing() {
        let robots = [robot(230_000, 0.10, 0.03, 0)];
        let drivers = drivers();
        let sales = RobotSales::new(&robots, &drivers);

        let first = sales.month(0, 1);
        assert_eq!(first.events, 2);
        assert_eq!(first.units, [0]);
        assert_eq!(first.commission, 0.0);

        let second = sales.month(1, 1);
        assert_eq!(second.units, [3]);
        assert!((second.commission - 69_000.0).abs() < 1e-6);
    }

    #[test]
    fn units_are_floored_per_type() {
        let robots = [robot(1_000, 0.5, 0.025, 0), robot(2_000, 0.1, 0.09, 3)];
        let drivers = drivers();
        let sales = RobotSales::new(&robots, &drivers);

        let early = sales.month(2, 1);
        assert_eq!(early.units, [2, 0]);
        assert_eq!(early.total_units(), 2);

        let late = sales.month(4, 1);
        assert_eq!(late.units, [2, 9]);
        assert!((late.commission - (2.0 * 1_000.0 * 0.5 + 9.0 * 2_000.0 * 0.1)).abs() < 1e-6);
    }

    #[test]
    fn no_dealers_or_robots_sell_nothing() {
        let robots = [robot(1_000, 0.5, 0.5, 0)];
        let drivers = drivers();
        assert_eq!(RobotSales::new(&robots, &drivers).month(5, 0).total_units(), 0);

        let empty = RobotSales::new(&[], &drivers).month(5, 10);
        assert!(empty.units.is_empty());
        assert_eq!(empty.commission, 0.0);
    }
}
