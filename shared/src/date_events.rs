//! Read and write paths for a user's date events.

use tracing::info;

use crate::models::DateEvent;
use crate::month::month_boundary;
use crate::store::TimelineStore;
use crate::timeline::{merge, select};
use crate::Result;

/// The user's timeline from the week containing the 1st of `current_month` onwards.
///
/// A user with no stored timeline gets an empty window.
pub async fn load_window(
    store: &TimelineStore,
    username: &str,
    current_month: &str,
) -> Result<Vec<DateEvent>> {
    let boundary = month_boundary(current_month)?;
    let timeline = store.get_timeline(username).await?.unwrap_or_default();
    let stored = timeline.len();

    let window = select(timeline, &boundary);
    info!(
        user = %username,
        current_month = %current_month,
        boundary = %boundary,
        stored,
        returned = window.len(),
        "Loaded date events"
    );
    Ok(window)
}

/// Replace the visible window of the user's timeline with `incoming`.
///
/// Read-modify-write without concurrency control: the last writer wins.
/// Returns the length of the stored timeline.
pub async fn replace_window(
    store: &TimelineStore,
    username: &str,
    current_month: &str,
    incoming: Vec<DateEvent>,
) -> Result<usize> {
    let boundary = month_boundary(current_month)?;
    let existing = store.get_timeline(username).await?.unwrap_or_default();
    let submitted = incoming.len();

    let merged = merge(existing, &boundary, incoming);
    store.put_timeline(username, &merged).await?;

    info!(
        user = %username,
        current_month = %current_month,
        boundary = %boundary,
        submitted,
        stored = merged.len(),
        "Saved date events"
    );
    Ok(merged.len())
}
