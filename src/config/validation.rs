use crate::config::types::{ChallengeConfig, Config, KindConfig, OutputConfig, SiteConfig};
use crate::extract::EntityKind;
use crate::url::{resolve_href, same_site};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let root = validate_site_config(&config.site)?;
    validate_output_config(&config.output)?;
    validate_challenge_config(&config.challenges)?;

    for kind in EntityKind::ALL {
        validate_kind_config(kind, config.kinds.get(kind), &root)?;
    }

    // Resolving the profile also checks every selector in it
    config.profile()?;

    Ok(())
}

/// Validates the site section and returns the parsed root
fn validate_site_config(config: &SiteConfig) -> Result<Url, ConfigError> {
    let root = Url::parse(&config.root)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site root '{}': {}", config.root, e)))?;

    if root.scheme() != "http" && root.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Site root '{}' must use HTTP or HTTPS",
            config.root
        )));
    }

    if root.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Site root '{}' has no host",
            config.root
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.profile.trim().is_empty() {
        return Err(ConfigError::Validation(
            "profile cannot be empty".to_string(),
        ));
    }

    Ok(root)
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.image_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "image_dir cannot be empty".to_string(),
        ));
    }

    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "data_dir cannot be empty".to_string(),
        ));
    }

    if config.image_map.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "image_map cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the challenge category list
fn validate_challenge_config(config: &ChallengeConfig) -> Result<(), ConfigError> {
    if config.categories.is_empty() {
        return Err(ConfigError::Validation(
            "challenge categories cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for category in &config.categories {
        if category.trim().is_empty() {
            return Err(ConfigError::Validation(
                "challenge category names cannot be empty".to_string(),
            ));
        }
        if !seen.insert(category.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate challenge category '{}'",
                category
            )));
        }
    }

    Ok(())
}

/// Validates one kind's seed, ignore list, and output file
fn validate_kind_config(kind: EntityKind, config: &KindConfig, root: &Url) -> Result<(), ConfigError> {
    if config.output_file.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{}: output-file cannot be empty",
            kind
        )));
    }

    if config.output_file.contains('/') || config.output_file.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "{}: output-file '{}' must be a bare filename",
            kind, config.output_file
        )));
    }

    if config.seed.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{}: seed cannot be empty", kind)));
    }

    let seed = resolve_href(root, &config.seed).map_err(|e| {
        ConfigError::InvalidUrl(format!("{}: invalid seed '{}': {}", kind, config.seed, e))
    })?;

    if !same_site(root, &seed) {
        return Err(ConfigError::Validation(format!(
            "{}: seed '{}' is not on site {}",
            kind, seed, root
        )));
    }

    for entry in &config.ignore {
        let pattern = entry.trim_end_matches('*');
        if pattern.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{}: ignore entries cannot be empty",
                kind
            )));
        }
        resolve_href(root, pattern).map_err(|e| {
            ConfigError::InvalidUrl(format!("{}: invalid ignore entry '{}': {}", kind, entry, e))
        })?;
    }

    Ok(())
}
