//! Transit pricing, stamped with the time the calendar was last edited.

use tracing::info;

use crate::models::TransitInformation;
use crate::store::TimelineStore;
use crate::{Error, Result};

/// The user's unit price with `lastModified` taken from their timeline document.
///
/// Falls back to the stored `lastModified` when the user has no timeline yet.
pub async fn transit_information(
    store: &TimelineStore,
    username: &str,
) -> Result<TransitInformation> {
    let stored = store
        .get_transit_information(username)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Transit information for {}", username)))?;

    let last_modified = store
        .timeline_last_modified(username)
        .await?
        .unwrap_or(stored.last_modified);

    info!(user = %username, unit_price = stored.unit_price, "Loaded transit information");

    Ok(TransitInformation {
        unit_price: stored.unit_price,
        last_modified,
    })
}
