//! Operational helpers: logging setup and dashboard artifact output.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chessdash_types::{config::OpsConfig, ChessdashError, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing(config: &OpsConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_level.clone())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| ChessdashError::Ops(format!("failed to create log filter: {err}")))?;

    fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| ChessdashError::Ops(format!("tracing init error: {err}")))?;
    Ok(())
}

/// Make sure the directory that will hold `path` exists.
pub fn prepare_output_path(path: &str) -> Result<PathBuf> {
    let target = PathBuf::from(path);
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            ChessdashError::Ops(format!(
                "failed to create output dir {}: {err}",
                parent.display()
            ))
        })?;
    }
    Ok(target)
}

/// Replace the artifact at `path` with `contents` in full.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|err| {
        ChessdashError::Ops(format!("failed to write {}: {err}", path.display()))
    })?;
    info!("Dashboard written to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_and_overwrite_artifact() {
        let dir = std::env::temp_dir().join("chessdash-ops-test");
        let _ = fs::remove_dir_all(&dir);
        let target = dir.join("nested").join("index.html");

        let path = prepare_output_path(target.to_str().expect("utf-8 path")).expect("prepare");
        assert!(dir.join("nested").is_dir());

        write_artifact(&path, "first").expect("first write");
        write_artifact(&path, "second").expect("second write");
        assert_eq!(fs::read_to_string(&path).expect("read back"), "second");

        fs::remove_dir_all(&dir).expect("cleanup temp dir");
    }

    #[test]
    fn bare_file_name_needs_no_directory() {
        let path = prepare_output_path("index.html").expect("prepare");
        assert_eq!(path, PathBuf::from("index.html"));
    }
}
