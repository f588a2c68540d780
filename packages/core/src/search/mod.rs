//! Resolver search
//!
//! Turns raw resolver records into validated [`VncRecord`]s, either from a
//! filtered search or from the random endpoint.

pub mod de;
pub mod provider;
pub mod types;

#[cfg(test)]
pub mod mock_source;

pub use provider::VncSource;
pub use types::{SearchFilter, VncRecord};

use serde_json::Value;

use crate::error::AppError;
use crate::services::resolver::VncInfo;

/// Search several hosts by filtering. Fails with
/// [`AppError::MissingFilter`] when `filter` is empty.
pub async fn search_filter<S>(source: &S, filter: &SearchFilter) -> Result<Vec<VncRecord>, AppError>
where
    S: VncSource + Sync + ?Sized,
{
    if filter.is_empty() {
        return Err(AppError::MissingFilter);
    }

    let records = source
        .fetch_filtered(filter)
        .await?
        .into_iter()
        .map(to_record)
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(
        source = source.source_name(),
        count = records.len(),
        "Filtered search finished"
    );

    Ok(records)
}

/// Fetch one random host.
pub async fn search_random<S>(source: &S) -> Result<VncRecord, AppError>
where
    S: VncSource + Sync + ?Sized,
{
    let record = to_record(source.fetch_random().await?)?;
    tracing::debug!(ip = %record.ip, port = record.port, "Random host fetched");
    Ok(record)
}

fn to_record(info: VncInfo) -> Result<VncRecord, AppError> {
    let id = info.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(Value::Object(info))
        .map_err(|err| AppError::Parse(format!("record {}: {}", id, err)))
}
