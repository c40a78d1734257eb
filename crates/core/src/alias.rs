//! Aliases: named endpoints used in `alias/bucket/path` targets
//!
//! An alias stores an endpoint URL, static credentials and addressing
//! options. Alias names share the character rules of target parsing, so
//! every stored alias can be addressed from the command line.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigManager};
use crate::error::{Error, Result};
use crate::path::is_valid_alias_name;

/// How the bucket is placed in request URLs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BucketLookup {
    /// Path-style, the safe choice for self-hosted services
    #[default]
    Auto,
    /// `http://endpoint/bucket/key`
    Path,
    /// `http://bucket.endpoint/key`
    Dns,
}

impl BucketLookup {
    /// Whether requests use path-style addressing
    pub fn path_style(self) -> bool {
        !matches!(self, BucketLookup::Dns)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BucketLookup::Auto => "auto",
            BucketLookup::Path => "path",
            BucketLookup::Dns => "dns",
        }
    }
}

impl FromStr for BucketLookup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(BucketLookup::Auto),
            "path" => Ok(BucketLookup::Path),
            "dns" => Ok(BucketLookup::Dns),
            other => Err(Error::Config(format!(
                "unknown bucket lookup '{other}', expected auto, path or dns"
            ))),
        }
    }
}

impl std::fmt::Display for BucketLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named S3-compatible endpoint with its credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub bucket_lookup: BucketLookup,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Alias {
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: default_region(),
            bucket_lookup: BucketLookup::default(),
        }
    }

    /// Check the name is usable in targets and the endpoint is an http(s) URL
    pub fn validate(&self) -> Result<()> {
        if !is_valid_alias_name(&self.name) {
            return Err(Error::Config(format!(
                "alias name '{}' may only contain letters, digits, '-' and '_'",
                self.name
            )));
        }
        let url = url::Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "endpoint '{}' must use http or https",
                self.endpoint
            )));
        }
        Ok(())
    }
}

impl Config {
    /// Look up an alias by name
    pub fn alias(&self, name: &str) -> Result<&Alias> {
        self.aliases
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::AliasNotFound(name.to_string()))
    }

    /// Insert an alias, replacing one with the same name in place
    pub fn upsert_alias(&mut self, alias: Alias) {
        match self.aliases.iter_mut().find(|a| a.name == alias.name) {
            Some(slot) => *slot = alias,
            None => self.aliases.push(alias),
        }
    }

    /// Remove an alias, returning it
    pub fn remove_alias(&mut self, name: &str) -> Result<Alias> {
        let pos = self
            .aliases
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| Error::AliasNotFound(name.to_string()))?;
        Ok(self.aliases.remove(pos))
    }
}

/// Alias operations persisted through a [`ConfigManager`]
pub struct AliasManager {
    config_manager: ConfigManager,
}

impl AliasManager {
    pub fn with_config_manager(config_manager: ConfigManager) -> Self {
        Self { config_manager }
    }

    /// Use the default configuration location
    pub fn new() -> Result<Self> {
        Ok(Self::with_config_manager(ConfigManager::new()?))
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    pub fn list(&self) -> Result<Vec<Alias>> {
        Ok(self.config_manager.load()?.aliases)
    }

    pub fn get(&self, name: &str) -> Result<Alias> {
        self.config_manager.load()?.alias(name).cloned()
    }

    /// Validate and store an alias; nothing is written when validation fails
    pub fn set(&self, alias: Alias) -> Result<()> {
        alias.validate()?;
        self.update(|config| {
            config.upsert_alias(alias);
            Ok(())
        })
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        self.update(|config| config.remove_alias(name).map(drop))
    }

    /// Load, modify and save the configuration
    fn update(&self, change: impl FnOnce(&mut Config) -> Result<()>) -> Result<()> {
        let mut config = self.config_manager.load()?;
        change(&mut config)?;
        self.config_manager.save(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager() -> (AliasManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        (AliasManager::with_config_manager(config_manager), temp_dir)
    }

    #[test]
    fn test_bucket_lookup_parse_and_style() {
        assert_eq!("dns".parse::<BucketLookup>().unwrap(), BucketLookup::Dns);
        assert!(!BucketLookup::Dns.path_style());
        assert!(BucketLookup::Path.path_style());
        assert!(BucketLookup::Auto.path_style());
        assert!(matches!(
            "virtual".parse::<BucketLookup>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_alias_toml_defaults() {
        let alias: Alias = toml::from_str(
            r#"
            name = "local"
            endpoint = "http://localhost:9000"
            access_key = "ak"
            secret_key = "sk"
            "#,
        )
        .unwrap();
        assert_eq!(alias.region, "us-east-1");
        assert_eq!(alias.bucket_lookup, BucketLookup::Auto);

        let text = toml::to_string(&Alias {
            bucket_lookup: BucketLookup::Dns,
            ..alias
        })
        .unwrap();
        assert!(text.contains("bucket_lookup = \"dns\""));
    }

    #[test]
    fn test_validate_rejects_untargetable_name() {
        let alias = Alias::new("my alias", "http://localhost:9000", "a", "b");
        assert!(matches!(alias.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let alias = Alias::new("x", "not a url", "a", "b");
        assert!(matches!(alias.validate(), Err(Error::InvalidUrl(_))));

        let alias = Alias::new("x", "ftp://host", "a", "b");
        assert!(matches!(alias.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_upsert_keeps_position() {
        let mut config = Config::default();
        config.upsert_alias(Alias::new("a", "http://a:9000", "k", "s"));
        config.upsert_alias(Alias::new("b", "http://b:9000", "k", "s"));
        config.upsert_alias(Alias::new("a", "http://a2:9000", "k", "s"));

        let names: Vec<&str> = config.aliases.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(config.alias("a").unwrap().endpoint, "http://a2:9000");
    }

    #[test]
    fn test_manager_round_trip() {
        let (manager, _temp_dir) = manager();
        manager
            .set(Alias::new("minio", "http://localhost:9000", "ak", "sk"))
            .unwrap();

        assert_eq!(manager.get("minio").unwrap().endpoint, "http://localhost:9000");
        assert_eq!(manager.list().unwrap().len(), 1);

        manager.remove("minio").unwrap();
        assert!(matches!(manager.get("minio"), Err(Error::AliasNotFound(_))));
        assert!(matches!(manager.remove("minio"), Err(Error::AliasNotFound(_))));
    }

    #[test]
    fn test_invalid_alias_is_not_saved() {
        let (manager, _temp_dir) = manager();
        assert!(manager.set(Alias::new("bad", "not a url", "a", "b")).is_err());
        assert!(!manager.config_manager().config_path().exists());
    }
}
