// src/config.rs
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Run configuration, loaded from a small YAML document.
///
/// Recognized keys:
/// - `global_dataflow_file_path`: the indicator export.
/// - `raw_data_file_path`: exactly two paths — index 0 is the U5MR status
///   table, index 1 the population prospects table.
///
/// Unknown keys are ignored; missing keys default to empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub global_dataflow_file_path: String,
    pub raw_data_file_path: Vec<String>,
}

impl AppConfig {
    /// Load and validate a configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.raw_data_file_path.len() != 2 {
            bail!(
                "raw_data_file_path must list exactly two paths (status table, population table); found {}",
                self.raw_data_file_path.len()
            );
        }
        Ok(())
    }

    /// Path of the on-track/off-track status table.
    pub fn status_path(&self) -> &Path {
        Path::new(&self.raw_data_file_path[0])
    }

    /// Path of the world population prospects table.
    pub fn population_path(&self) -> &Path {
        Path::new(&self.raw_data_file_path[1])
    }

    /// Path of the global indicator export.
    pub fn dataflow_path(&self) -> &Path {
        Path::new(&self.global_dataflow_file_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn loads_recognized_keys() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "global_dataflow_file_path: data/flow.xlsx\nraw_data_file_path:\n  - data/status.xlsx\n  - data/wpp.xlsx\nsome_unrelated_key: 7"
        )?;

        let config = AppConfig::from_yaml_file(file.path())?;
        assert_eq!(config.dataflow_path(), Path::new("data/flow.xlsx"));
        assert_eq!(config.status_path(), Path::new("data/status.xlsx"));
        assert_eq!(config.population_path(), Path::new("data/wpp.xlsx"));
        Ok(())
    }

    #[test]
    fn rejects_wrong_raw_data_arity() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "global_dataflow_file_path: data/flow.xlsx\nraw_data_file_path:\n  - data/only_one.xlsx"
        )?;

        let err = AppConfig::from_yaml_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("exactly two"));
        Ok(())
    }

    #[test]
    fn rejects_missing_file() {
        let err = AppConfig::from_yaml_file("does/not/exist.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn rejects_malformed_yaml() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "raw_data_file_path: [unterminated")?;

        assert!(AppConfig::from_yaml_file(file.path()).is_err());
        Ok(())
    }
}
