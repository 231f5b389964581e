//! Registration configuration.

use std::path::Path;

use anyhow::Context;
use lineage::RegisteredGraphs;
use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::estimate::MIN_FIT_POINTS;
use crate::spatial::{create_registration, SpatialRegistration};

/// Strategy used to map positions between the two graphs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SpatialRegistrationMethod {
    /// One transform for all timepoints, fitted on the ends of the paired root branches.
    #[default]
    FixedRoots,
    /// A transform per timepoint pair, fitted on the centroids of the paired root subtrees.
    DynamicRoots,
    /// A transform per timepoint pair, fitted on cells sharing a landmark tag.
    DynamicLandmarks,
}

impl SpatialRegistrationMethod {
    pub fn description(&self) -> &'static str {
        match self {
            SpatialRegistrationMethod::FixedRoots => "fixed, based on the paired roots",
            SpatialRegistrationMethod::DynamicRoots => "dynamic, based on the paired roots",
            SpatialRegistrationMethod::DynamicLandmarks => "dynamic, based on landmark tags",
        }
    }

    pub fn create(
        self,
        graphs: &RegisteredGraphs,
        config: &RegistrationConfig,
    ) -> Result<Box<dyn SpatialRegistration>, RegistrationError> {
        create_registration(graphs, &RegistrationConfig {
            method: self,
            ..config.clone()
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_file_name(file_name: &str) -> anyhow::Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(anyhow::anyhow!(
                "Unsupported file extension for file: {}",
                file_name
            )),
        }
    }
}

/// Registration settings.
///
/// Defaults: fixed registration, at least 3 pairs, smoothing half-window 2
/// (a 5-timepoint moving average), landmarks read from the `landmarks` tag set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub method: SpatialRegistrationMethod,
    /// Fewest paired roots or landmark tags accepted. Values below 3 are rejected.
    pub min_pairs: usize,
    /// Half-width of the moving average applied to landmark trajectories.
    pub smoothing_half_window: usize,
    /// Name of the tag set holding landmarks in both graphs.
    pub landmarks_tag_set: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            method: SpatialRegistrationMethod::default(),
            min_pairs: MIN_FIT_POINTS,
            smoothing_half_window: 2,
            landmarks_tag_set: "landmarks".to_string(),
        }
    }
}

impl RegistrationConfig {
    pub fn with_method(method: SpatialRegistrationMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_pairs < MIN_FIT_POINTS {
            anyhow::bail!(
                "min_pairs must be at least {}, got {}",
                MIN_FIT_POINTS,
                self.min_pairs
            );
        }
        if self.landmarks_tag_set.trim().is_empty() {
            anyhow::bail!("landmarks_tag_set must not be empty");
        }

        Ok(())
    }

    /// Pairs required before a fit is attempted.
    pub fn required_pairs(&self) -> usize {
        self.min_pairs.max(MIN_FIT_POINTS)
    }

    pub fn parse(contents: &str, format: ConfigFormat) -> anyhow::Result<Self> {
        let config: Self = match format {
            ConfigFormat::Yaml => serde_yml::from_str(contents)?,
            ConfigFormat::Json => serde_json::from_str(contents)?,
        };

        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let format = ConfigFormat::from_file_name(path)?;
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read registration config {}", path))?;

        Self::parse(&contents, format)
            .with_context(|| format!("Invalid registration config {}", path))
    }

    pub fn serialize(&self, format: ConfigFormat) -> anyhow::Result<String> {
        Ok(match format {
            ConfigFormat::Yaml => serde_yml::to_string(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn defaults() {
        let config = RegistrationConfig::default();
        assert_eq!(config.method, SpatialRegistrationMethod::FixedRoots);
        assert_eq!(config.min_pairs, 3);
        assert_eq!(config.smoothing_half_window, 2);
        assert_eq!(config.landmarks_tag_set, "landmarks");
        config.validate().unwrap();
    }

    #[test]
    fn yaml_roundtrip_and_partial_files() -> anyhow::Result<()> {
        let config = RegistrationConfig::with_method(SpatialRegistrationMethod::DynamicLandmarks);
        let yaml = config.serialize(ConfigFormat::Yaml)?;
        assert!(yaml.contains("dynamic-landmarks"));
        assert_eq!(RegistrationConfig::parse(&yaml, ConfigFormat::Yaml)?, config);

        let partial = RegistrationConfig::parse("method: dynamic-roots\n", ConfigFormat::Yaml)?;
        assert_eq!(partial.method, SpatialRegistrationMethod::DynamicRoots);
        assert_eq!(partial.smoothing_half_window, 2);

        Ok(())
    }

    #[test]
    fn json_config() -> anyhow::Result<()> {
        let config = RegistrationConfig::parse(
            r#"{ "method": "fixed-roots", "min_pairs": 4 }"#,
            ConfigFormat::Json,
        )?;
        assert_eq!(config.min_pairs, 4);
        assert_eq!(config.required_pairs(), 4);

        Ok(())
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(RegistrationConfig::parse("min_pairs: 2\n", ConfigFormat::Yaml).is_err());
        assert!(
            RegistrationConfig::parse("landmarks_tag_set: \"  \"\n", ConfigFormat::Yaml).is_err()
        );
        assert!(RegistrationConfig::parse("method: sideways\n", ConfigFormat::Yaml).is_err());
    }

    #[test]
    fn config_format_from_file_name() {
        assert_eq!(
            ConfigFormat::from_file_name("registration.YML").unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_file_name("a/b/registration.json").unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_file_name("registration.toml").is_err());
        assert!(ConfigFormat::from_file_name("registration").is_err());
    }

    #[test]
    fn method_names() -> anyhow::Result<()> {
        for method in SpatialRegistrationMethod::iter() {
            let parsed = SpatialRegistrationMethod::from_str(&method.to_string())?;
            assert_eq!(parsed, method);
            assert!(!method.description().is_empty());
        }
        assert_eq!(
            SpatialRegistrationMethod::DynamicRoots.to_string(),
            "dynamic-roots"
        );

        Ok(())
    }
}
