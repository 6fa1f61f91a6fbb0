//! Utility functions for CLI operations.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use carsync_core::{
    HttpRemoteClient, JitterSynthesizer, MockRemoteClient, RemoteClient, SyncEngine, SyncOptions,
};
use time::UtcOffset;

/// Get the plate, with a helpful error message when none was given.
pub fn require_plate(plate: Option<String>) -> Result<String> {
    plate.ok_or_else(|| {
        anyhow::anyhow!(
            "No license plate specified. Pass one as an argument, set CARSYNC_PLATE, \
             or run 'carsync config set plate <PLATE>'."
        )
    })
}

/// Build the remote client: the sample fleet in demo mode, otherwise the
/// telemetry service at `url`.
pub fn build_client(url: &str, demo: bool) -> Result<Arc<dyn RemoteClient>> {
    if demo {
        tracing::debug!("Using demo vehicles");
        return Ok(Arc::new(MockRemoteClient::demo()));
    }
    tracing::debug!("Using telemetry service at {}", url);
    let client = HttpRemoteClient::new(url)
        .with_context(|| format!("Invalid service URL: {}", url))?;
    Ok(Arc::new(client))
}

/// Build an engine refreshing every `refresh_interval`, labelling series
/// points at `label_offset`.
pub fn build_engine(
    client: Arc<dyn RemoteClient>,
    refresh_interval: Duration,
    label_offset: UtcOffset,
) -> Result<SyncEngine> {
    let options = SyncOptions::builder()
        .refresh_interval(refresh_interval)
        .synthesizer(JitterSynthesizer::default().with_label_offset(label_offset))
        .build();
    SyncEngine::with_options(client, options).context("Invalid sync options")
}

/// Write output to file or stdout
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_plate_with_some() {
        let result = require_plate(Some("ABC-123".to_string()));
        assert_eq!(result.unwrap(), "ABC-123");
    }

    #[test]
    fn test_require_plate_with_none() {
        let err = require_plate(None).unwrap_err().to_string();
        assert!(err.contains("No license plate specified"));
        assert!(err.contains("CARSYNC_PLATE"));
    }

    #[test]
    fn test_build_client_rejects_bad_url() {
        assert!(build_client("localhost:3001", false).is_err());
        assert!(build_client("http://localhost:3001", false).is_ok());
        // Demo mode ignores the URL entirely
        assert!(build_client("not a url", true).is_ok());
    }

    #[test]
    fn test_build_engine_rejects_zero_interval() {
        let client = build_client("", true).unwrap();
        assert!(build_engine(client.clone(), Duration::ZERO, UtcOffset::UTC).is_err());
        let engine = build_engine(client, Duration::from_secs(5), UtcOffset::UTC).unwrap();
        assert_eq!(engine.options().refresh_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_output(Some(&path), "{}\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }
}
