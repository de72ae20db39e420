use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::config::{tmp_path, write_atomic};
use crate::currency::ExchangeRateTable;
use crate::errors::EngineError;
use crate::subscription::Subscription;

/// Everything a report needs from storage: the subscription rows and the
/// exchange-rate table current at the time of the export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub rates: ExchangeRateTable,
}

/// Writes the snapshot to disk atomically by staging to a temporary file.
pub fn save_snapshot_to_file(snapshot: &Snapshot, path: &Path) -> Result<(), EngineError> {
    let tmp = tmp_path(path);
    let json = serde_json::to_string_pretty(snapshot)?;
    write_atomic(&tmp, &json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Loads a snapshot from disk, returning structured errors on failure.
pub fn load_snapshot_from_file(path: &Path) -> Result<Snapshot, EngineError> {
    let data = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&data)?;
    tracing::debug!(
        path = %path.display(),
        subscriptions = snapshot.subscriptions.len(),
        rates = snapshot.rates.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
