//! Yearly finance ledger: budget, allocated total and balance per year.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;

use crate::error::Result;
use crate::models::finance;
use crate::models::prelude::*;

/// Balance is budget minus allocation, floored at zero
pub fn balance_for(budget: f64, allocated: f64) -> f64 {
    (budget - allocated).max(0.0)
}

/// Fund report for a single year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundReport {
    pub year: i32,
    pub budget: f64,
    pub allocated: f64,
    pub balance: f64,
}

impl FundReport {
    fn empty(year: i32) -> Self {
        Self {
            year,
            budget: 0.0,
            allocated: 0.0,
            balance: 0.0,
        }
    }
}

impl From<&finance::Model> for FundReport {
    fn from(record: &finance::Model) -> Self {
        Self {
            year: record.year,
            budget: record.budget_amount,
            allocated: record.allocated_amount,
            balance: record.balance_amount,
        }
    }
}

pub async fn find_year<C: ConnectionTrait>(db: &C, year: i32) -> Result<Option<finance::Model>> {
    Ok(Finance::find()
        .filter(finance::Column::Year.eq(year))
        .one(db)
        .await?)
}

/// Return the record for `year`, creating an empty one if absent
pub async fn ensure_year<C: ConnectionTrait>(db: &C, year: i32) -> Result<finance::Model> {
    if let Some(existing) = find_year(db, year).await? {
        return Ok(existing);
    }

    let record = finance::ActiveModel {
        year: Set(year),
        budget_amount: Set(0.0),
        allocated_amount: Set(0.0),
        balance_amount: Set(0.0),
        ..Default::default()
    };
    Ok(record.insert(db).await?)
}

/// Upsert the budget for `year`. Existing allocations are kept.
pub async fn set_budget<C: ConnectionTrait>(
    db: &C,
    year: i32,
    amount: f64,
) -> Result<finance::Model> {
    let existing = ensure_year(db, year).await?;
    let allocated = existing.allocated_amount;

    let mut record: finance::ActiveModel = existing.into();
    record.budget_amount = Set(amount);
    record.balance_amount = Set(balance_for(amount, allocated));
    let saved = record.update(db).await?;

    tracing::info!(
        year,
        budget = saved.budget_amount,
        balance = saved.balance_amount,
        "Finance budget saved"
    );
    Ok(saved)
}

/// Add `amount` to the allocation for `year`.
///
/// Returns `None` without writing when no record exists for the year.
pub async fn record_allocation<C: ConnectionTrait>(
    db: &C,
    year: i32,
    amount: f64,
) -> Result<Option<finance::Model>> {
    let Some(existing) = find_year(db, year).await? else {
        tracing::warn!(year, amount, "No finance record for year, allocation not recorded");
        return Ok(None);
    };

    let allocated = existing.allocated_amount + amount;
    let budget = existing.budget_amount;

    let mut record: finance::ActiveModel = existing.into();
    record.allocated_amount = Set(allocated);
    record.balance_amount = Set(balance_for(budget, allocated));
    let saved = record.update(db).await?;

    tracing::info!(
        year,
        amount,
        allocated = saved.allocated_amount,
        balance = saved.balance_amount,
        "Allocation recorded"
    );
    Ok(Some(saved))
}

/// Fund report for `year`; zeros when there is no record
pub async fn report<C: ConnectionTrait>(db: &C, year: i32) -> Result<FundReport> {
    Ok(find_year(db, year)
        .await?
        .as_ref()
        .map(FundReport::from)
        .unwrap_or_else(|| FundReport::empty(year)))
}

/// All ledger rows, newest year first
pub async fn list_years<C: ConnectionTrait>(db: &C) -> Result<Vec<finance::Model>> {
    Ok(Finance::find()
        .order_by_desc(finance::Column::Year)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::create_test_db;

    #[test]
    fn test_balance_floors_at_zero() {
        assert_eq!(balance_for(500000.0, 20000.0), 480000.0);
        assert_eq!(balance_for(100.0, 100.0), 0.0);
        assert_eq!(balance_for(100.0, 250.0), 0.0);
    }

    #[tokio::test]
    async fn test_ensure_year_creates_once() {
        let db = create_test_db().await;

        let first = ensure_year(&db, 2024).await.unwrap();
        let second = ensure_year(&db, 2024).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.budget_amount, 0.0);
        assert_eq!(first.allocated_amount, 0.0);
        assert_eq!(first.balance_amount, 0.0);
    }

    #[tokio::test]
    async fn test_set_budget_recomputes_balance() {
        let db = create_test_db().await;

        let record = set_budget(&db, 2024, 500000.0).await.unwrap();
        assert_eq!(record.balance_amount, 500000.0);

        record_allocation(&db, 2024, 20000.0).await.unwrap();
        let record = set_budget(&db, 2024, 10000.0).await.unwrap();

        // Allocation survives a budget change; balance never goes negative
        assert_eq!(record.allocated_amount, 20000.0);
        assert_eq!(record.balance_amount, 0.0);
    }

    #[tokio::test]
    async fn test_record_allocation() {
        let db = create_test_db().await;
        set_budget(&db, 2024, 500000.0).await.unwrap();

        let record = record_allocation(&db, 2024, 20000.0).await.unwrap().unwrap();

        assert_eq!(record.allocated_amount, 20000.0);
        assert_eq!(record.balance_amount, 480000.0);

        let record = record_allocation(&db, 2024, 30000.0).await.unwrap().unwrap();
        assert_eq!(record.allocated_amount, 50000.0);
        assert_eq!(record.balance_amount, 450000.0);
    }

    #[tokio::test]
    async fn test_record_allocation_without_year_is_dropped() {
        let db = create_test_db().await;

        let result = record_allocation(&db, 2030, 20000.0).await.unwrap();

        assert!(result.is_none());
        assert!(find_year(&db, 2030).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_report_defaults_to_zeros() {
        let db = create_test_db().await;

        let report = report(&db, 1999).await.unwrap();
        assert_eq!(report, FundReport::empty(1999));
    }

    #[tokio::test]
    async fn test_list_years_newest_first() {
        let db = create_test_db().await;
        for year in [2022, 2024, 2023] {
            set_budget(&db, year, 1000.0).await.unwrap();
        }

        let years: Vec<i32> = list_years(&db).await.unwrap().iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2024, 2023, 2022]);
    }
}
