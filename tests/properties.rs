use bizproj::config::{Drivers, ParameterSet, ScaleStep};
use bizproj::dealer::DealerGrowth;
use bizproj::engine::Engine;
use bizproj::expense::ScaleUpLatch;
use bizproj::types::Projection;
use proptest::prelude::*;

fn project(params: ParameterSet, drivers: Drivers) -> Projection {
    Engine::new(params, drivers)
        .expect("generated inputs are valid")
        .project()
}

fn close_or_below(lower: f64, upper: f64) -> bool {
    lower <= upper + 1e-9 * upper.abs().max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn paying_users_grow_with_external_signups(
        low in 0u64..500,
        extra in 0u64..500,
        churn in 0.0f64..=1.0,
        free_months in 0usize..6,
        years in 1u32..=4,
    ) {
        let mut params = ParameterSet::baseline();
        params.app.churn_rate = churn;
        params.app.free_months = free_months;
        let base = Drivers { years, external_signups_per_month: low, ..Drivers::default() };
        let more = Drivers { external_signups_per_month: low + extra, ..base.clone() };

        let a = project(params.clone(), base);
        let b = project(params, more);
        for (ma, mb) in a.monthly.iter().zip(&b.monthly) {
            prop_assert!(ma.paying_users >= 0.0);
            prop_assert!(close_or_below(ma.paying_users, mb.paying_users));
        }
    }

    #[test]
    fn paying_users_grow_with_purchase_rate(
        rate in 0.0f64..=0.5,
        bump in 0.0f64..=0.5,
        churn in 0.0f64..=1.0,
    ) {
        let mut low = ParameterSet::baseline();
        low.app.churn_rate = churn;
        low.robots[0].purchase_rate = rate;
        let mut high = low.clone();
        high.robots[0].purchase_rate = rate + bump;

        let drivers = Drivers { years: 3, ..Drivers::default() };
        let a = project(low, drivers.clone());
        let b = project(high, drivers);
        for (ma, mb) in a.monthly.iter().zip(&b.monthly) {
            prop_assert!(ma.units[0] <= mb.units[0]);
            prop_assert!(close_or_below(ma.paying_users, mb.paying_users));
        }
    }

    #[test]
    fn dealers_never_shrink_or_exceed_ceiling(
        initial in 1u64..20,
        headroom in 0u64..100,
        fixed in 0usize..24,
        growth in 0u64..10,
    ) {
        let mut params = ParameterSet::baseline();
        params.dealer.initial_companies = initial;
        params.dealer.max_companies = initial + headroom;
        params.dealer.fixed_months_before_growth = fixed;
        params.dealer.company_growth_per_month = growth;

        let dealers = DealerGrowth::new(&params.dealer);
        let counts: Vec<_> = (0..120).map(|m| dealers.count(m)).collect();
        prop_assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        prop_assert!(counts.iter().all(|&c| c <= initial + headroom));

        let added: u64 = (0..120).map(|m| dealers.new_companies(m)).sum();
        prop_assert_eq!(added, counts[119]);
    }

    #[test]
    fn thresholds_fire_at_most_once(
        users in prop::collection::vec(0.0f64..2_000.0, 1..120),
        threshold in 0u64..2_000,
    ) {
        let steps = [ScaleStep { threshold, cost: 1 }];
        let mut latch = ScaleUpLatch::new(&steps);
        let mut prev = 0.0;
        let mut fired = 0;
        for (m, &now) in users.iter().enumerate() {
            fired += latch.observe(m, prev, now);
            prev = now;
        }
        prop_assert!(fired <= 1);
    }

    #[test]
    fn annual_profit_adds_up(
        years in 1u32..=10,
        attendees in 0u64..200,
        events in 0u64..5,
        signups in 0u64..200,
    ) {
        let drivers = Drivers {
            years,
            attendees_per_event: attendees,
            events_per_company_per_month: events,
            external_signups_per_month: signups,
        };
        let projection = project(ParameterSet::baseline(), drivers);

        prop_assert_eq!(projection.monthly.len(), years as usize * 12);
        prop_assert_eq!(projection.annual.len(), years as usize);

        let annual_profit: f64 = projection.annual.iter().map(|y| y.profit).sum();
        let total = projection.summary.total_profit;
        let scale = projection.summary.total_revenue + projection.summary.total_expense;
        prop_assert!((annual_profit - total).abs() <= 1e-9 * scale.max(1.0));

        let last = projection.annual.last().expect("at least one year");
        prop_assert!((last.cumulative_profit - annual_profit).abs() <= 1e-9 * scale.max(1.0));
    }
}
