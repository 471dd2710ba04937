//! Codec configuration from a file and the environment.
//!
//! Precedence, lowest first: built-in defaults, a YAML or JSON file, then the
//! `OOXML_*` environment variables. Files may be partial; missing keys keep
//! the value from the layer below.

use crate::codec::{DEFAULT_MAX_DEPTH, DecodeOptions, EncodeOptions, Strictness};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

const MAX_INDENT: usize = 16;

pub const ENV_STRICT: &str = "OOXML_STRICT";
pub const ENV_MAX_DEPTH: &str = "OOXML_MAX_DEPTH";
pub const ENV_INDENT: &str = "OOXML_INDENT";
pub const ENV_XML_DECLARATION: &str = "OOXML_XML_DECLARATION";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    pub strictness: Strictness,
    pub max_depth: usize,
    pub xml_declaration: bool,
    /// Spaces per level when writing; `None` writes a single line
    pub indent: Option<usize>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Lenient,
            max_depth: DEFAULT_MAX_DEPTH,
            xml_declaration: true,
            indent: None,
        }
    }
}

impl CodecConfig {
    /// Defaults, then the optional file, then the environment; validated
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = path {
            config.merge(load_config_file(path)?);
        }
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the environment only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    fn merge(&mut self, file: PartialConfig) {
        let PartialConfig {
            strictness,
            max_depth,
            xml_declaration,
            indent,
        } = file;

        if let Some(strictness) = strictness {
            self.strictness = strictness;
        }
        if let Some(max_depth) = max_depth {
            self.max_depth = max_depth;
        }
        if let Some(xml_declaration) = xml_declaration {
            self.xml_declaration = xml_declaration;
        }
        if let Some(indent) = indent {
            self.indent = (indent > 0).then_some(indent);
        }
    }

    /// Apply `OOXML_*` overrides; a malformed value is an error, not ignored
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = env::var(ENV_STRICT) {
            self.strictness = if parse_flag(ENV_STRICT, &raw)? {
                Strictness::Strict
            } else {
                Strictness::Lenient
            };
        }
        if let Ok(raw) = env::var(ENV_MAX_DEPTH) {
            self.max_depth = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_DEPTH}={raw:?} is not a number"))?;
        }
        if let Ok(raw) = env::var(ENV_INDENT) {
            let indent: usize = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_INDENT}={raw:?} is not a number"))?;
            self.indent = (indent > 0).then_some(indent);
        }
        if let Ok(raw) = env::var(ENV_XML_DECLARATION) {
            self.xml_declaration = parse_flag(ENV_XML_DECLARATION, &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.max_depth > 0, "max_depth must be at least 1");
        if let Some(indent) = self.indent {
            anyhow::ensure!(
                indent <= MAX_INDENT,
                "indent {} exceeds the maximum of {}",
                indent,
                MAX_INDENT
            );
        }
        Ok(())
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            strictness: self.strictness,
            max_depth: self.max_depth,
        }
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            xml_declaration: self.xml_declaration,
            indent: self.indent,
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "strict" => Ok(true),
        "0" | "false" | "no" | "off" | "lenient" => Ok(false),
        _ => anyhow::bail!("{name}={raw:?} is not a boolean"),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PartialConfig {
    strictness: Option<Strictness>,
    max_depth: Option<usize>,
    xml_declaration: Option<bool>,
    indent: Option<usize>,
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let ext = path
        .extension()
        .and_then(|os| os.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&contents)
            .with_context(|| format!("failed to parse YAML config {:?}", path))?,
        "json" => serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse JSON config {:?}", path))?,
        other => anyhow::bail!("unsupported config extension: {other}"),
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clear_env() {
        unsafe {
            env::remove_var(ENV_STRICT);
            env::remove_var(ENV_MAX_DEPTH);
            env::remove_var(ENV_INDENT);
            env::remove_var(ENV_XML_DECLARATION);
        }
    }

    fn config_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    #[serial]
    fn partial_yaml_merges_over_defaults() {
        clear_env();
        let file = config_file(".yaml", "strictness: strict\nindent: 2\n");
        let config = CodecConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.strictness, Strictness::Strict);
        assert_eq!(config.indent, Some(2));
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.xml_declaration);
    }

    #[test]
    #[serial]
    fn json_is_accepted() {
        clear_env();
        let file = config_file(".json", r#"{"max_depth": 64, "xml_declaration": false}"#);
        let config = CodecConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.decode_options().max_depth, 64);
        assert!(!config.encode_options().xml_declaration);
    }

    #[test]
    #[serial]
    fn environment_wins_over_file() {
        clear_env();
        let file = config_file(".yml", "strictness: strict\nmax_depth: 32\n");
        unsafe {
            env::set_var(ENV_STRICT, "0");
            env::set_var(ENV_MAX_DEPTH, "128");
        }
        let config = CodecConfig::load(Some(file.path())).unwrap();
        clear_env();
        assert_eq!(config.strictness, Strictness::Lenient);
        assert_eq!(config.max_depth, 128);
    }

    #[test]
    #[serial]
    fn malformed_environment_is_an_error() {
        clear_env();
        unsafe {
            env::set_var(ENV_XML_DECLARATION, "maybe");
        }
        let err = CodecConfig::from_env().unwrap_err();
        clear_env();
        assert!(err.to_string().contains(ENV_XML_DECLARATION));
    }

    #[test]
    #[serial]
    fn zero_depth_and_wide_indent_are_rejected() {
        clear_env();
        let file = config_file(".yaml", "max_depth: 0\n");
        assert!(CodecConfig::load(Some(file.path())).is_err());

        let config = CodecConfig {
            indent: Some(MAX_INDENT + 1),
            ..CodecConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_keys_and_extensions_fail() {
        let file = config_file(".yaml", "strict: true\n");
        assert!(load_config_file(file.path()).is_err());
        let file = config_file(".toml", "max_depth = 3\n");
        let err = load_config_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config extension"));
    }
}
