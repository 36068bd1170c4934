use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// BTC has 8 fractional digits; every transfer amount is floored to this scale
const BTC_SCALE: u32 = 8;

const SECONDS_PER_DAY: i64 = 86_400;

/// Floor an amount to the currency's minimum unit
pub fn floor_to_btc(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(BTC_SCALE, RoundingStrategy::ToZero)
}

/// `actual / available * scale`, or 0 when either input is zero or negative.
/// The guard keeps division by zero and nonsensical negative inputs from ever
/// producing a negative reward.
pub fn calculate_percent(available: f64, actual: f64, scale: f64) -> f64 {
    if available <= 0.0 || actual <= 0.0 || scale <= 0.0 {
        return 0.0;
    }
    actual / available * scale
}

/// Percentage of `available` that `actual` represents
pub fn percent_of(available: f64, actual: f64) -> f64 {
    calculate_percent(available, actual, 100.0)
}

/// `total * percent / 100`, or 0 when the percent or total is not positive.
/// Percentages stay floating point; the amount they scale is exact decimal.
pub fn amount_of(percent: f64, total: Decimal) -> Decimal {
    if percent <= 0.0 || total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let percent = Decimal::from_f64(percent).unwrap_or_default();
    total * percent / Decimal::ONE_HUNDRED
}

/// Farm-level split of a wallet balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmAllocation {
    /// Reward shared by all NFT owners, proportional to minted hash power
    pub pool_reward: Decimal,

    /// Hash power the pool reported but no NFT represents yet; paid to the
    /// farm owner's leftover address
    pub leftover: Decimal,
}

/// An NFT's maintenance-fee split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeBreakdown {
    /// Fee actually collected, capped at the gross reward
    pub fee: Decimal,

    /// Platform's cut of the collected fee
    pub platform: Decimal,

    /// Remainder of the fee, paid to the farm's maintenance address
    pub maintenance: Decimal,

    /// Owner reward left after the fee
    pub net_reward: Decimal,
}

/// Turns a farm's wallet balance, pool hash power and minted NFT hash power
/// into per-NFT rewards, maintenance fees and a farm-owner leftover
pub struct RewardAllocator;

impl RewardAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Split the wallet balance into the owners' pool reward and the farm
    /// owner's leftover. The leftover is the exact decimal remainder, so the
    /// two always add back up to the balance.
    pub fn allocate_farm(
        &self,
        current_hash_power: f64,
        minted_hash_power: f64,
        balance: Decimal,
    ) -> FarmAllocation {
        let minted_percent = percent_of(current_hash_power, minted_hash_power);
        let pool_reward = amount_of(minted_percent, balance).min(balance);

        FarmAllocation {
            pool_reward,
            leftover: balance - pool_reward,
        }
    }

    /// Gross reward per NFT, weighted by hash rate. The last NFT receives the
    /// undistributed remainder so the grosses sum to the pool reward exactly.
    pub fn nft_gross_rewards(
        &self,
        minted_hash_power: f64,
        hash_rates: &[f64],
        pool_reward: Decimal,
    ) -> Vec<Decimal> {
        if hash_rates.is_empty() {
            return Vec::new();
        }

        let mut rewards = Vec::with_capacity(hash_rates.len());
        let mut remaining = pool_reward;

        for hash_rate in &hash_rates[..hash_rates.len() - 1] {
            let percent = percent_of(minted_hash_power, *hash_rate);
            let gross = amount_of(percent, pool_reward).min(remaining);
            remaining -= gross;
            rewards.push(gross);
        }
        rewards.push(remaining);

        rewards
    }

    /// Maintenance fee an NFT accrues over its payout period.
    ///
    /// The farm's monthly fee is spread across its reported hash power and
    /// the days of the period-end month into a daily fee, then accrued per
    /// day of the period. The period length is `end - start` (forward): fees
    /// accrue across the payout period.
    pub fn maintenance_fee(
        &self,
        monthly_fee: Decimal,
        current_hash_power: f64,
        period_start: DateTime<Utc>,
        period_end: DateTime<Utc>,
    ) -> Decimal {
        if monthly_fee <= Decimal::ZERO
            || current_hash_power <= 0.0
            || period_end <= period_start
        {
            return Decimal::ZERO;
        }

        let hash_power = Decimal::from_f64(current_hash_power).unwrap_or_default();
        if hash_power <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let days_in_month = Decimal::from(days_in_month(period_end.date_naive()));
        let daily_fee = monthly_fee / hash_power / days_in_month;

        let period_seconds = (period_end - period_start).num_seconds();
        let days_in_period = Decimal::from(period_seconds) / Decimal::from(SECONDS_PER_DAY);

        daily_fee * days_in_period
    }

    /// Cap the fee at the gross reward and split it between the platform and
    /// the farm's maintenance address. Fee has priority over the owner
    /// reward: a fee above the gross zeroes the net reward, never below zero.
    pub fn split_fee(&self, gross: Decimal, fee: Decimal, platform_percent: f64) -> FeeBreakdown {
        let fee = fee.max(Decimal::ZERO).min(gross.max(Decimal::ZERO));
        let platform = amount_of(platform_percent, fee);

        FeeBreakdown {
            fee,
            platform,
            maintenance: fee - platform,
            net_reward: gross - fee,
        }
    }
}

impl Default for RewardAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of days in the month containing `date`
fn days_in_month(date: NaiveDate) -> i64 {
    let (year, month) = (date.year(), date.month());
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => (next - first).num_days(),
        _ => 30,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn btc(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn calculate_percent_scales_actual_against_available() {
        assert_eq!(calculate_percent(10000.0, 1000.0, 100.0), 10.0);
        assert_eq!(calculate_percent(10000.0, 10000.0, 0.0), 0.0);
        assert_eq!(calculate_percent(-1.0, 10000.0, 100.0), 0.0);
        assert_eq!(calculate_percent(10000.0, -5.0, 100.0), 0.0);
        assert_eq!(calculate_percent(0.0, 1.0, 100.0), 0.0);
    }

    #[test]
    fn amount_of_guards_against_nonsense() {
        assert_eq!(amount_of(10.0, Decimal::ZERO), Decimal::ZERO);
        assert_eq!(amount_of(0.0, btc("1")), Decimal::ZERO);
        assert_eq!(amount_of(-3.0, btc("1")), Decimal::ZERO);
        assert_eq!(amount_of(10.0, btc("-1")), Decimal::ZERO);
        assert_eq!(amount_of(10.0, btc("1")), btc("0.1"));
    }

    #[test]
    fn farm_allocation_conserves_the_balance() {
        let allocator = RewardAllocator::new();
        let balance = btc("1.23456789");
        let allocation = allocator.allocate_farm(10000.0, 7500.0, balance);

        assert_eq!(allocation.pool_reward + allocation.leftover, balance);
        assert!(allocation.pool_reward > Decimal::ZERO);
        assert!(allocation.leftover > Decimal::ZERO);
    }

    #[test]
    fn fully_minted_farm_has_no_leftover() {
        let allocator = RewardAllocator::new();
        let balance = btc("2");
        let allocation = allocator.allocate_farm(10000.0, 10000.0, balance);

        assert_eq!(allocation.pool_reward, balance);
        assert_eq!(allocation.leftover, Decimal::ZERO);
    }

    #[test]
    fn zero_hash_power_pays_everything_to_the_farm_owner() {
        let allocator = RewardAllocator::new();
        let balance = btc("2");
        let allocation = allocator.allocate_farm(0.0, 10000.0, balance);

        assert_eq!(allocation.pool_reward, Decimal::ZERO);
        assert_eq!(allocation.leftover, balance);
    }

    #[test]
    fn gross_rewards_sum_to_the_pool_exactly() {
        let allocator = RewardAllocator::new();
        let pool = btc("0.99999999");
        let rates = [100.0, 250.0, 33.0, 617.0];
        let minted: f64 = rates.iter().sum();

        let rewards = allocator.nft_gross_rewards(minted, &rates, pool);

        assert_eq!(rewards.len(), rates.len());
        assert_eq!(rewards.iter().copied().sum::<Decimal>(), pool);
        assert!(rewards.iter().all(|r| *r >= Decimal::ZERO));
    }

    #[test]
    fn single_nft_takes_the_whole_pool() {
        let allocator = RewardAllocator::new();
        let pool = btc("0.5");
        let rewards = allocator.nft_gross_rewards(100.0, &[100.0], pool);
        assert_eq!(rewards, vec![pool]);
    }

    #[test]
    fn maintenance_fee_accrues_per_day() {
        let allocator = RewardAllocator::new();
        // July 2026 has 31 days. 31 BTC/month over 1000 units of hash power
        // is a daily fee of 0.001 BTC; two days accrue 0.002 BTC.
        let start = Utc.with_ymd_and_hms(2026, 7, 10, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 7, 12, 0, 0, 0).unwrap();

        let fee = allocator.maintenance_fee(btc("31"), 1000.0, start, end);
        assert_eq!(fee, btc("0.002"));
    }

    #[test]
    fn maintenance_fee_guards() {
        let allocator = RewardAllocator::new();
        let start = ts(1000);
        let end = ts(2000);

        assert_eq!(
            allocator.maintenance_fee(Decimal::ZERO, 1000.0, start, end),
            Decimal::ZERO
        );
        assert_eq!(
            allocator.maintenance_fee(btc("1"), 0.0, start, end),
            Decimal::ZERO
        );
        assert_eq!(
            allocator.maintenance_fee(btc("1"), 1000.0, end, start),
            Decimal::ZERO
        );
    }

    #[test]
    fn fee_above_gross_zeroes_the_net_reward() {
        let allocator = RewardAllocator::new();
        let gross = btc("0.001");

        let breakdown = allocator.split_fee(gross, btc("0.005"), 10.0);

        assert_eq!(breakdown.fee, gross);
        assert_eq!(breakdown.net_reward, Decimal::ZERO);
        assert_eq!(breakdown.platform + breakdown.maintenance, gross);
    }

    #[test]
    fn fee_split_conserves_the_gross() {
        let allocator = RewardAllocator::new();
        let gross = btc("0.1");
        let fee = btc("0.03");

        let breakdown = allocator.split_fee(gross, fee, 10.0);

        assert_eq!(breakdown.fee, fee);
        assert_eq!(breakdown.platform, btc("0.003"));
        assert_eq!(breakdown.maintenance, btc("0.027"));
        assert_eq!(
            breakdown.net_reward + breakdown.platform + breakdown.maintenance,
            gross
        );
    }

    #[test]
    fn floor_truncates_below_the_minimum_unit() {
        assert_eq!(floor_to_btc(btc("0.123456789")), btc("0.12345678"));
        assert_eq!(floor_to_btc(btc("0.1")), btc("0.1"));
    }

    #[test]
    fn days_in_month_handles_year_boundaries() {
        assert_eq!(
            days_in_month(NaiveDate::from_ymd_opt(2026, 12, 15).unwrap()),
            31
        );
        assert_eq!(
            days_in_month(NaiveDate::from_ymd_opt(2028, 2, 1).unwrap()),
            29
        );
    }
}
