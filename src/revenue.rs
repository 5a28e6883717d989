use crate::config::{AppParams, PLATFORM_NET_SHARE};

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RevenueMonth {
    pub commission: f64,
    /// Subscription income net of the platform cut.
    pub subscription: f64,
    pub total: f64,
}

/// Monthly revenue: commission plus subscription fees at the 85% net share.
pub fn month(app: &AppParams, paying_users: f64, commission: f64) -> RevenueMonth {
    let subscription = paying_users * app.monthly_fee as f64 * PLATFORM_NET_SHARE;
    RevenueMonth {
        commission,
        subscription,
        total: subscription + commission,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_keeps_fifteen_percent() {
        let app = AppParams {
            monthly_fee: 300,
            free_months: 3,
            churn_rate: 0.03,
        };
        let revenue = month(&app, 100.0, 69_000.0);
        assert!((revenue.subscription - 25_500.0).abs() < 1e-6);
        assert!((revenue.total - 94_500.0).abs() < 1e-6);
        assert_eq!(revenue.commission, 69_000.0);
    }
}
