//! Flat-file JSON persistence shared by the item store, the subscription
//! registry and the client outbox.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};

/// Load a JSON array of records from `path`.
///
/// A missing or unreadable file yields an empty list. Records that fail to
/// deserialize are skipped one by one, and the file as found is copied to
/// `<name>.corrupt` so the next rewrite does not erase them.
pub async fn load_json_records<T>(path: &Path) -> Vec<T>
where
    T: DeserializeOwned,
{
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!("{} does not exist yet, starting empty", path.display());
            return Vec::new();
        }
        Err(e) => {
            tracing::error!("Error reading {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    let raw: Vec<Value> = match serde_json::from_slice(&data) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!("Error parsing {}: {}", path.display(), e);
            set_aside(path).await;
            return Vec::new();
        }
    };

    let total = raw.len();
    let records: Vec<T> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping record {} in {}: {}", index, path.display(), e);
                None
            }
        })
        .collect();

    if records.len() < total {
        set_aside(path).await;
    }
    records
}

async fn set_aside(path: &Path) {
    let backup = sibling_path(path, ".corrupt");
    match tokio::fs::copy(path, &backup).await {
        Ok(_) => tracing::warn!("Kept a copy of {} at {}", path.display(), backup.display()),
        Err(e) => tracing::error!("Error copying {} aside: {}", path.display(), e),
    }
}

/// Rewrite `path` with the pretty-printed JSON of `value`.
///
/// The document is written to a sibling temp file first and renamed over the
/// target, so readers never observe a half-written file.
pub async fn write_json_atomic<T>(path: &Path, value: &T) -> io::Result<()>
where
    T: Serialize + ?Sized,
{
    let data = serde_json::to_vec_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    let tmp = sibling_path(path, ".tmp");
    tokio::fs::write(&tmp, &data).await?;
    tokio::fs::rename(&tmp, path).await
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}
