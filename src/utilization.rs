//! Asset utilization: how much of its owned lifetime an asset spent issued to
//! employees.
//!
//! Each `issue` event opens a period that closes at the first later `return`
//! in the log dated strictly after it, or at `now` if there is none. Periods
//! are summed as they are, so overlapping issues count twice and the rate can
//! exceed 100%. A `scrap` event does not close a period.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Asset, Transaction, TransactionType};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Utilization {
    pub days_since_purchase: i64,
    pub issue_days: i64,
    /// Percentage with two decimal places.
    pub utilization_rate: Decimal,
}

/// Computes utilization from a purchase date and a log sorted by
/// `transaction_date` ascending. Returns `None` without a purchase date.
pub fn calculate(
    purchase_date: Option<DateTime<Utc>>,
    transactions: &[Transaction],
    now: DateTime<Utc>,
) -> Option<Utilization> {
    let purchase_date = purchase_date?;
    let days_since_purchase = whole_days(purchase_date, now);

    let issue_days: i64 = transactions
        .iter()
        .enumerate()
        .filter(|(_, tx)| tx.kind == TransactionType::Issue)
        .map(|(position, issue)| {
            let end = transactions[position + 1..]
                .iter()
                .find(|tx| {
                    tx.kind == TransactionType::Return
                        && tx.transaction_date > issue.transaction_date
                })
                .map_or(now, |tx| tx.transaction_date);
            whole_days(issue.transaction_date, end)
        })
        .sum();

    Some(Utilization {
        days_since_purchase,
        issue_days,
        utilization_rate: rate(issue_days, days_since_purchase),
    })
}

pub fn for_asset(
    asset: &Asset,
    transactions: &[Transaction],
    now: DateTime<Utc>,
) -> Option<Utilization> {
    calculate(asset.purchase_date, transactions, now)
}

/// Whole days between two instants, floored toward negative infinity.
fn whole_days(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

fn rate(issue_days: i64, days_since_purchase: i64) -> Decimal {
    if days_since_purchase <= 0 {
        return Decimal::new(0, 2);
    }
    let ratio = Decimal::from(issue_days) / Decimal::from(days_since_purchase);
    let mut rate = (ratio * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rate.rescale(2);
    rate
}
