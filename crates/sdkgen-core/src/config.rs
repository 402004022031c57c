use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::TargetLanguage;
use crate::mapping::MAPPING_FILE_NAME;
use crate::pipeline::PipelineOptions;
use crate::render::{GeneratorOptions, Layout};
use crate::typemap::FingerprintMode;

/// Top-level project configuration loaded from `.sdkgen.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SdkgenConfig {
    pub input: String,
    pub output: String,
    pub mapping_file: String,
    pub targets: Vec<TargetLanguage>,
    pub layout: Layout,
    pub fingerprint: FingerprintMode,
    pub client: ClientConfig,
    /// Run biome / ruff over the output.
    pub format: bool,
}

impl Default for SdkgenConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "generated".to_string(),
            mapping_file: MAPPING_FILE_NAME.to_string(),
            targets: vec![TargetLanguage::Typescript, TargetLanguage::Python],
            layout: Layout::Both,
            fingerprint: FingerprintMode::PropertyNames,
            client: ClientConfig::default(),
            format: false,
        }
    }
}

/// Client generation options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Defaults to the document's first server.
    pub base_url: Option<String>,
    pub timeout: u64,
    pub no_docs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: 30,
            no_docs: false,
        }
    }
}

impl SdkgenConfig {
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            layout: self.layout,
            base_url: self.client.base_url.clone(),
            timeout: self.client.timeout,
            no_docs: self.client.no_docs,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            fingerprint: self.fingerprint,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".sdkgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SdkgenConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: SdkgenConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# sdkgen configuration
input: openapi.yaml
output: generated
mapping_file: sdkgen.mapping.json   # written on first run; edit it, then re-run
targets: [typescript, python]

layout: both          # flat | grouped | both
fingerprint: names    # names | typed (typed also compares property types)

client:
  # base_url: https://api.example.com   # defaults to the document's first server
  timeout: 30
  no_docs: false

format: false         # run biome (typescript) / ruff (python) on the output
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SdkgenConfig::default();
        assert_eq!(config.input, "openapi.yaml");
        assert_eq!(config.output, "generated");
        assert_eq!(config.mapping_file, "sdkgen.mapping.json");
        assert_eq!(
            config.targets,
            [TargetLanguage::Typescript, TargetLanguage::Python]
        );
        assert_eq!(config.layout, Layout::Both);
        assert_eq!(config.fingerprint, FingerprintMode::PropertyNames);
        assert_eq!(config.client.timeout, 30);
        assert!(!config.format);
    }

    #[test]
    fn test_default_content_parses_to_defaults() {
        let config: SdkgenConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.mapping_file, SdkgenConfig::default().mapping_file);
        assert_eq!(config.targets.len(), 2);
        assert!(config.client.base_url.is_none());
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
input: spec.json
output: out
mapping_file: names.json
targets: [python]
layout: grouped
fingerprint: typed
client:
  base_url: https://api.example.com
  timeout: 5
  no_docs: true
format: true
"#;
        let config: SdkgenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "spec.json");
        assert_eq!(config.targets, [TargetLanguage::Python]);
        assert_eq!(config.layout, Layout::Grouped);
        assert_eq!(config.fingerprint, FingerprintMode::Typed);
        assert_eq!(
            config.client.base_url,
            Some("https://api.example.com".to_string())
        );

        let options = config.generator_options();
        assert_eq!(options.timeout, 5);
        assert!(options.no_docs);
        assert_eq!(config.pipeline_options().fingerprint, FingerprintMode::Typed);
    }

    #[test]
    fn test_parse_minimal_config() {
        let yaml = "input: api.yaml\n";
        let config: SdkgenConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.input, "api.yaml");
        assert_eq!(config.output, "generated");
        assert_eq!(config.layout, Layout::Both);
    }

    #[test]
    fn test_unknown_layout_is_rejected() {
        assert!(serde_yaml_ng::from_str::<SdkgenConfig>("layout: sideways\n").is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap().is_none());
    }
}
