use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::descriptors::AnalysisOptions;
use crate::error::{Error, Result};

/// Run configuration. Every field has a default, so an empty TOML file is
/// a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Report one atom per symmetry class instead of every atom.
    pub suppress_symmetric: bool,
    /// Log and skip molecules that cannot be read or typed.
    pub continue_on_error: bool,
    /// Alternative equidistant termini examined per atom.
    pub max_alternatives: usize,
    /// Appended to the input path to name the report.
    pub output_suffix: String,
    /// Directory for reports; next to the input when unset.
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            suppress_symmetric: false,
            continue_on_error: false,
            max_alternatives: 4,
            output_suffix: "_atomdescriptors.csv".to_string(),
            output_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.output_suffix.is_empty() {
            return Err(Error::Config(
                "output_suffix must not be empty, the report would overwrite its input".into(),
            ));
        }
        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            max_alternatives: self.max_alternatives,
        }
    }

    /// Report path for `input`: `<input><suffix>`, moved into
    /// `output_dir` when one is set.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let mut name = input
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(&self.output_suffix);
        match &self.output_dir {
            Some(dir) => dir.join(name),
            None => input.with_file_name(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config = Config::from_toml(
            r#"
            suppress_symmetric = true
            max_alternatives = 8
            output_dir = "out"
            "#,
        )
        .unwrap();
        assert!(config.suppress_symmetric);
        assert!(!config.continue_on_error);
        assert_eq!(config.max_alternatives, 8);
        assert_eq!(config.analysis_options().max_alternatives, 8);
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn unknown_and_invalid_fields_are_rejected() {
        assert!(matches!(
            Config::from_toml("max_alternative = 3"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("max_alternatives = \"four\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("output_suffix = \"\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn output_paths() {
        let mut config = Config::default();
        assert_eq!(
            config.output_path(Path::new("data/set.smi")),
            PathBuf::from("data/set.smi_atomdescriptors.csv")
        );
        config.output_dir = Some(PathBuf::from("/tmp/out"));
        assert_eq!(
            config.output_path(Path::new("data/set.sdf")),
            PathBuf::from("/tmp/out/set.sdf_atomdescriptors.csv")
        );
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/atomspan.toml"),
            Err(Error::Config(_))
        ));
    }
}
