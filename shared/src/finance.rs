//! Profit estimates for crop plans

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::EstimatedCosts;

/// Revenue, cost and profit in Rs
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfitSummary {
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub net_profit: Decimal,
}

impl ProfitSummary {
    /// Per size unit figures from cost estimates, yield (kg) and price (Rs/kg)
    pub fn from_estimates(costs: &EstimatedCosts, yield_kg: Decimal, price_per_kg: Decimal) -> Self {
        let total_cost = costs.total();
        let total_revenue = yield_kg * price_per_kg;
        Self {
            total_revenue,
            total_cost,
            net_profit: total_revenue - total_cost,
        }
    }

    /// Scale per size unit figures to the whole land area
    pub fn for_area(&self, area: Decimal) -> Self {
        Self {
            total_revenue: self.total_revenue * area,
            total_cost: self.total_cost * area,
            net_profit: self.net_profit * area,
        }
    }

    /// Net profit as a percentage of cost, None when there is no cost
    pub fn return_on_cost(&self) -> Option<Decimal> {
        if self.total_cost.is_zero() {
            return None;
        }
        Some((self.net_profit / self.total_cost * Decimal::from(100)).round_dp(2))
    }
}

/// Net profit over the whole land area for one season's crop
pub fn total_net_profit(per_unit: &ProfitSummary, area: Decimal) -> Decimal {
    per_unit.for_area(area).net_profit
}

/// Indices ordered by descending net profit; ties keep their input order
pub fn rank_by_profit(profits: &[ProfitSummary]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..profits.len()).collect();
    order.sort_by(|a, b| profits[*b].net_profit.cmp(&profits[*a].net_profit));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn costs(each: i64) -> EstimatedCosts {
        let c = Decimal::from(each);
        EstimatedCosts {
            seed: c,
            fertilizer: c,
            pesticide: c,
            labor: c,
            irrigation: c,
        }
    }

    #[test]
    fn test_profit_from_estimates() {
        let summary = ProfitSummary::from_estimates(&costs(1000), Decimal::from(1200), Decimal::from(25));
        assert_eq!(summary.total_cost, Decimal::from(5000));
        assert_eq!(summary.total_revenue, Decimal::from(30000));
        assert_eq!(summary.net_profit, Decimal::from(25000));
        assert_eq!(summary.return_on_cost(), Some(Decimal::from(500)));
    }

    #[test]
    fn test_total_net_profit_scales_by_area() {
        let summary = ProfitSummary::from_estimates(&costs(100), Decimal::from(10), Decimal::from(100));
        assert_eq!(total_net_profit(&summary, Decimal::new(25, 1)), Decimal::from(1250));
    }

    #[test]
    fn test_loss_is_negative() {
        let summary = ProfitSummary::from_estimates(&costs(1000), Decimal::from(10), Decimal::from(10));
        assert_eq!(summary.net_profit, Decimal::from(-4900));
    }

    #[test]
    fn test_rank_by_profit_is_stable() {
        let p = |n: i64| ProfitSummary {
            net_profit: Decimal::from(n),
            ..Default::default()
        };
        assert_eq!(rank_by_profit(&[p(5), p(9), p(5), p(-1)]), vec![1, 0, 2, 3]);
    }

    proptest! {
        #[test]
        fn prop_net_is_revenue_minus_cost(c in 0i64..10_000, y in 0i64..50_000, pr in 0i64..500) {
            let s = ProfitSummary::from_estimates(&costs(c), Decimal::from(y), Decimal::from(pr));
            prop_assert_eq!(s.net_profit, s.total_revenue - s.total_cost);
            prop_assert_eq!(s.total_cost, Decimal::from(c * 5));
        }
    }
}
