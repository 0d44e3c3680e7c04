//! On-disk layout of the data directory
//!
//! Directory structure:
//! ~/.warroom/
//!   config.yaml          # Session config overrides (rounds, sampling, strategies)
//!   warroom.log          # Rotated application log
//!   exports/
//!     warroom-20261016-141503.csv    # Per-round dataset
//!     warroom-20261016-141503.json   # Dashboard summary

use std::fs;
use std::path::{Path, PathBuf};

use warroom_core::analytics::{Dataset, DashboardMetrics};
use warroom_core::catalog::ScenarioCatalog;
use warroom_core::config::SessionConfig;

use crate::util::io::atomic_write;

/// Error types for storage operations
#[derive(Debug)]
pub enum StorageError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {msg}"),
            StorageError::Parse(msg) => write!(f, "Parse error: {msg}"),
            StorageError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Files written by one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub summary: PathBuf,
}

/// Manages the data directory
#[derive(Debug, Clone)]
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Get the default data directory path (~/.warroom/)
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".warroom")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.root.join("exports")
    }

    /// Create the directory tree
    pub fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| StorageError::Io(format!("Failed to create data directory: {e}")))?;
        fs::create_dir_all(self.exports_dir())
            .map_err(|e| StorageError::Io(format!("Failed to create exports directory: {e}")))?;
        Ok(())
    }

    /// Load `config.yaml`
    ///
    /// On first run the defaults are written there as an editable template.
    /// Failing to write it only costs the template, not the session.
    pub fn load_config(&self) -> Result<SessionConfig, StorageError> {
        let path = self.config_path();
        if path.exists() {
            return load_config_from(&path);
        }

        let config = SessionConfig::default();
        match self.save_config(&config) {
            Ok(()) => tracing::info!(path = %path.display(), "Wrote default config"),
            Err(e) => tracing::warn!(error = %e, "Could not write default config"),
        }
        Ok(config)
    }

    pub fn save_config(&self, config: &SessionConfig) -> Result<(), StorageError> {
        self.init()?;
        let yaml = serde_saphyr::to_string(config)
            .map_err(|e| StorageError::Serialize(format!("Failed to serialize config: {e}")))?;
        atomic_write(&self.config_path(), &yaml)
            .map_err(|e| StorageError::Io(format!("Failed to write config: {e}")))
    }

    /// Write the dataset CSV and a JSON dashboard summary next to it
    ///
    /// Without `dest` both land in `exports/` under a timestamped name. With
    /// `dest` the CSV goes there and the summary takes the same stem with a
    /// `.json` extension.
    pub fn write_export(
        &self,
        dataset: &Dataset,
        dashboard: &DashboardMetrics,
        dest: Option<&Path>,
    ) -> Result<ExportPaths, StorageError> {
        let csv = match dest {
            Some(path) => path.to_path_buf(),
            None => {
                self.init()?;
                let stem = export_stem(&jiff::Zoned::now());
                self.exports_dir().join(format!("{stem}.csv"))
            }
        };
        let summary = csv.with_extension("json");

        let json = serde_json::to_string_pretty(dashboard)
            .map_err(|e| StorageError::Serialize(format!("Failed to serialize summary: {e}")))?;

        atomic_write(&csv, &dataset.to_csv())
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", csv.display())))?;
        atomic_write(&summary, &json).map_err(|e| {
            StorageError::Io(format!("Failed to write {}: {e}", summary.display()))
        })?;

        tracing::info!(
            csv = %csv.display(),
            summary = %summary.display(),
            rows = dataset.len(),
            "Exported session"
        );
        Ok(ExportPaths { csv, summary })
    }
}

/// Parse a session config from a YAML file
pub fn load_config_from(path: &Path) -> Result<SessionConfig, StorageError> {
    let content = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
    serde_saphyr::from_str(&content)
        .map_err(|e| StorageError::Parse(format!("Failed to parse {}: {e}", path.display())))
}

/// Parse a scenario catalog from a YAML file
pub fn load_catalog(path: &Path) -> Result<ScenarioCatalog, StorageError> {
    let content = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let catalog: ScenarioCatalog = serde_saphyr::from_str(&content)
        .map_err(|e| StorageError::Parse(format!("Failed to parse {}: {e}", path.display())))?;

    tracing::info!(
        path = %path.display(),
        fixed = catalog.fixed.len(),
        pool = catalog.pool.len(),
        "Loaded scenario catalog"
    );
    Ok(catalog)
}

/// File stem for an export taken at `now`
pub fn export_stem(now: &jiff::Zoned) -> String {
    format!("warroom-{}", now.strftime("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use warroom_core::config::SessionBuilder;
    use warroom_core::model::{Allocation, AssetClass, RegimeTag};
    use warroom_core::sequencer::SamplingPolicy;

    fn finished_exports() -> (Dataset, DashboardMetrics) {
        let mut session = SessionBuilder::new().seed(21).build().unwrap();
        session.start(1_000_000.0).unwrap();
        while !session.is_finished() {
            session.submit(Allocation::all_in(AssetClass::Gold)).unwrap();
            session.advance().unwrap();
        }
        (
            session.export_dataset().unwrap(),
            session.dashboard().unwrap(),
        )
    }

    #[test]
    fn test_missing_config_writes_defaults() {
        let dir = tempdir().unwrap();
        let data = DataDirectory::new(dir.path().to_path_buf());
        assert_eq!(data.load_config().unwrap(), SessionConfig::default());

        assert!(data.config_path().exists());
        assert_eq!(
            load_config_from(&data.config_path()).unwrap(),
            SessionConfig::default()
        );
    }

    #[test]
    fn test_partial_config_yaml() {
        let dir = tempdir().unwrap();
        let data = DataDirectory::new(dir.path().to_path_buf());
        fs::write(
            data.config_path(),
            "total_rounds: 6\nfixed_round_count: 2\nsampling: WithoutReplacement\nseed: 11\n",
        )
        .unwrap();

        let config = data.load_config().unwrap();
        assert_eq!(config.total_rounds, 6);
        assert_eq!(config.fixed_round_count, 2);
        assert_eq!(config.sampling, SamplingPolicy::WithoutReplacement);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.benchmark, SessionConfig::default().benchmark);
    }

    #[test]
    fn test_save_then_load_config() {
        let dir = tempdir().unwrap();
        let data = DataDirectory::new(dir.path().join("nested"));
        let config = SessionConfig {
            total_rounds: 8,
            seed: Some(5),
            ..SessionConfig::default()
        };

        data.save_config(&config).unwrap();
        let loaded = data.load_config().unwrap();
        assert_eq!(loaded.total_rounds, 8);
        assert_eq!(loaded.seed, Some(5));
    }

    #[test]
    fn test_invalid_config_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let data = DataDirectory::new(dir.path().to_path_buf());
        fs::write(data.config_path(), "total_rounds: [not, a, number]\n").unwrap();
        assert!(matches!(data.load_config(), Err(StorageError::Parse(_))));
    }

    #[test]
    fn test_load_catalog_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        fs::write(
            &path,
            "fixed:\n  - regime: Crisis\n    headline: Test crash\n    \
             returns: [-0.1, -0.1, 0.02, 0.05, -0.2, 0.01]\n\
             pool:\n  - regime: Mixed\n    headline: Sideways\n    \
             returns: [0.0, 0.0, 0.0, 0.0, 0.0, 0.01]\n    \
             concept_note: Nothing happens.\n",
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.fixed.len(), 1);
        assert_eq!(catalog.fixed[0].regime, RegimeTag::Crisis);
        assert_eq!(catalog.fixed[0].concept_note, None);
        assert_eq!(catalog.pool[0].headline, "Sideways");
        assert_eq!(catalog.pool[0].returns[AssetClass::Cash], 0.01);
        assert_eq!(catalog.pool[0].concept_note.as_deref(), Some("Nothing happens."));
    }

    #[test]
    fn test_missing_catalog_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_catalog(&dir.path().join("absent.yaml")),
            Err(StorageError::Io(_))
        ));
    }

    #[test]
    fn test_export_into_exports_dir() {
        let dir = tempdir().unwrap();
        let data = DataDirectory::new(dir.path().to_path_buf());
        let (dataset, dashboard) = finished_exports();

        let paths = data.write_export(&dataset, &dashboard, None).unwrap();
        assert_eq!(paths.csv.parent(), Some(data.exports_dir().as_path()));
        assert_eq!(paths.csv.extension().and_then(|e| e.to_str()), Some("csv"));

        let csv = fs::read_to_string(&paths.csv).unwrap();
        assert_eq!(csv.lines().count(), 11);

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths.summary).unwrap()).unwrap();
        assert!(summary.get("strategies").is_some());
        assert!(summary.get("archetype").is_some());
    }

    #[test]
    fn test_export_to_explicit_path() {
        let dir = tempdir().unwrap();
        let data = DataDirectory::new(dir.path().join("unused"));
        let (dataset, dashboard) = finished_exports();

        let dest = dir.path().join("class-results.csv");
        let paths = data.write_export(&dataset, &dashboard, Some(&dest)).unwrap();

        assert_eq!(paths.csv, dest);
        assert_eq!(paths.summary, dir.path().join("class-results.json"));
        assert!(paths.summary.exists());
        assert!(!data.exports_dir().exists());
    }

    #[test]
    fn test_export_stem_format() {
        let now: jiff::Zoned = "2026-10-16T14:15:03[UTC]".parse().unwrap();
        assert_eq!(export_stem(&now), "warroom-20261016-141503");
    }
}
