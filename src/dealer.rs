use crate::config::DealerParams;

/// Contracted dealer companies over time.
///
/// The count stays at `initial_companies` during the proof period, then grows
/// linearly until it reaches `max_companies`.
pub struct DealerGrowth<'a> {
    params: &'a DealerParams,
}

impl<'a> DealerGrowth<'a> {
    pub fn new(params: &'a DealerParams) -> Self {
        Self { params }
    }

    /// Dealer count in month `m` (0-based).
    pub fn count(&self, m: usize) -> u64 {
        let p = self.params;
        if m < p.fixed_months_before_growth {
            return p.initial_companies;
        }
        let months_of_growth = (m - p.fixed_months_before_growth + 1) as u64;
        p.initial_companies
            .saturating_add(p.company_growth_per_month.saturating_mul(months_of_growth))
            .min(p.max_companies)
    }

    /// Companies contracted during month `m`.
    pub fn new_companies(&self, m: usize) -> u64 {
        if m == 0 {
            return self.count(0);
        }
        self.count(m).saturating_sub(self.count(m - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(initial: u64, max: u64, fixed: usize, growth: u64) -> DealerParams {
        DealerParams {
            initial_companies: initial,
            max_companies: max,
            fixed_months_before_growth: fixed,
            company_growth_per_month: growth,
        }
    }

    #[test]
    fn flat_during_proof_period_then_linear() {
        let p = params(1, 50, 6, 2);
        let dealers = DealerGrowth::new(&p);
        let counts: Vec<_> = (0..9).map(|m| dealers.count(m)).collect();
        assert_eq!(counts, [1, 1, 1, 1, 1, 1, 3, 5, 7]);
    }

    #[test]
    fn clamped_at_ceiling() {
        let p = params(1, 6, 0, 2);
        let dealers = DealerGrowth::new(&p);
        let counts: Vec<_> = (0..6).map(|m| dealers.count(m)).collect();
        assert_eq!(counts, [3, 5, 6, 6, 6, 6]);
    }

    #[test]
    fn new_companies_follow_the_delta() {
        let p = params(4, 9, 2, 3);
        let dealers = DealerGrowth::new(&p);
        let new: Vec<_> = (0..6).map(|m| dealers.new_companies(m)).collect();
        assert_eq!(new, [4, 0, 3, 2, 0, 0]);
    }

    #[test]
    fn no_growth_means_single_intake() {
        let p = params(1, 50, 6, 0);
        let dealers = DealerGrowth::new(&p);
        assert!((0..24).all(|m| dealers.count(m) == 1));
        let total: u64 = (0..24).map(|m| dealers.new_companies(m)).sum();
        assert_eq!(total, 1);
    }
}
