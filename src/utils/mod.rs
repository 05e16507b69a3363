//! Shared helpers: tracing setup, application paths, atomic file writes.

use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::Once,
};

use crate::errors::StoreError;

const DEFAULT_DIR_NAME: &str = ".expense_core";
const TMP_SUFFIX: &str = "tmp";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env()
            .add_directive("expense_core=info".parse().expect("valid directive"));

        fmt().with_env_filter(filter).init();
    });
}

/// Returns the application data directory, defaulting to `~/.expense_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("EXPENSE_CORE_HOME") {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes `data` to a sibling tmp file and renames it over `path`, so a crash
/// mid-write never leaves a truncated document behind.
pub fn write_atomic(path: &Path, data: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_atomic_creates_parent_dirs() {
        let temp = TempDir::new().expect("temp dir");
        let target = temp.path().join("nested").join("data.json");
        write_atomic(&target, "{}").expect("write succeeds");
        assert_eq!(fs::read_to_string(&target).expect("read back"), "{}");
        assert!(!tmp_path(&target).exists());
    }
}
