//! Setting product prices
//!
//! Runs one timeline resolution inside a database transaction. On PostgreSQL the
//! product row is locked for the duration, so resolutions of the same product are
//! serialised while different products proceed independently.

use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, EntityTrait,
    QuerySelect, TransactionTrait,
};
use thiserror::Error;
use tracing::{error, info};

use crate::entities::prelude::*;
use crate::services::price_store::{IntervalStore, SeaOrmIntervalStore};
use crate::services::timeline::{self, PriceInterval, TimelineError};

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("product {0} not found")]
    ProductNotFound(i32),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Insert `proposal` into its product's timeline and return the interval that
/// was finally stored (wider than requested when same-priced neighbours were
/// absorbed).
pub async fn set_price(
    db: &DatabaseConnection,
    proposal: &PriceInterval,
) -> Result<PriceInterval, PricingError> {
    let txn = db.begin().await?;

    lock_product(&txn, proposal.product_id).await?;

    let store = SeaOrmIntervalStore::new(&txn);
    // on error the transaction is dropped, which rolls it back
    let saved = resolve_with(&store, proposal).await.inspect_err(|e| {
        if let PricingError::Timeline(violation) = e {
            error!(product_id = proposal.product_id, error = %violation, "Price timeline precondition violated");
        }
    })?;

    txn.commit().await?;

    info!(
        product_id = saved.product_id,
        price_id = ?saved.id,
        start_date = %saved.start_date,
        end_date = ?saved.end_date,
        "Price interval stored"
    );

    Ok(saved)
}

/// Load, resolve and apply against any store
pub async fn resolve_with<S>(store: &S, proposal: &PriceInterval) -> Result<PriceInterval, PricingError>
where
    S: IntervalStore + Sync + ?Sized,
{
    let current = store.load(proposal.product_id).await?;
    let resolution = timeline::resolve(proposal, &current)?;

    if !resolution.removed.is_empty() {
        info!(
            product_id = proposal.product_id,
            removed = resolution.removed.len(),
            created = resolution.created.len(),
            extended = resolution.was_extended(proposal),
            "Resolved overlapping price intervals"
        );
    }

    Ok(store.apply(&resolution).await?)
}

async fn lock_product(txn: &DatabaseTransaction, product_id: i32) -> Result<(), PricingError> {
    let mut query = Products::find_by_id(product_id);
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }

    query
        .one(txn)
        .await?
        .map(|_| ())
        .ok_or(PricingError::ProductNotFound(product_id))
}
