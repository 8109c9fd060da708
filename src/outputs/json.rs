//! JSON output of an [`Edition`].
//!
//! # Output Structure
//!
//! Files are organized by date, one per edition and category:
//! ```text
//! json_output_dir/
//! └── 2025-10-17/
//!     ├── morning-top-stories.json
//!     └── evening-sports.json
//! ```

use crate::models::Edition;
use crate::utils::slugify;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Path of the JSON file for `edition` under `json_output_dir`.
pub fn edition_path(edition: &Edition, json_output_dir: &str) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(&edition.local_date)
        .join(format!(
            "{}-{}.json",
            edition.time_of_day,
            slugify(&edition.category)
        ))
}

/// Write an [`Edition`] as pretty-printed JSON.
///
/// Creates the date directory when missing and returns the written path.
///
/// # Errors
///
/// Serialization, directory creation or file write failures.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_edition(
    edition: &Edition,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(edition)?;
    let path = edition_path(edition, json_output_dir);

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), stories = edition.stories.len(), "Wrote JSON edition");
    Ok(path)
}
