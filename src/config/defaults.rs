//! Built-in settings for the Risk of Rain 2 wiki

use crate::browser::Engine;
use crate::config::types::{
    BrowserConfig, ChallengeConfig, KindConfig, KindsConfig, OutputConfig, SiteConfig,
};
use std::path::PathBuf;

pub const SITE_ROOT: &str = "https://riskofrain2.fandom.com";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_PROFILE: &str = "fandom";

/// Challenge table order on the challenges page
pub const CHALLENGE_CATEGORIES: &[&str] = &[
    "survivors",
    "items",
    "equipment",
    "skills",
    "skins",
    "artifacts",
];

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: SITE_ROOT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            navigation_timeout_secs: 120,
            navigation_retries: 1,
            profile: DEFAULT_PROFILE.to_string(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Chromium,
            headless: true,
            executable: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("./imgs"),
            data_dir: PathBuf::from("./src/static"),
            image_map: PathBuf::from("./imgs/images.js"),
        }
    }
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            categories: CHALLENGE_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Default for KindsConfig {
    fn default() -> Self {
        Self {
            items: KindConfig {
                seed: wiki("Focus_Crystal"),
                ignore: index_ignores(
                    "Items",
                    &["Common", "Uncommon", "Legendary", "Boss", "Lunar", "Void"],
                ),
                output_file: "gamepedia_item_data.json".to_string(),
                skip_seed: false,
                single_page: false,
            },
            equipment: KindConfig {
                seed: wiki("Equipment"),
                ignore: index_ignores("Equipment", &["Standard", "Lunar", "Elite"]),
                output_file: "gamepedia_eqp_data.json".to_string(),
                skip_seed: true,
                single_page: false,
            },
            survivors: KindConfig {
                seed: wiki("Survivors"),
                ignore: vec![wiki("Survivors")],
                output_file: "gamepedia_survivor_data.json".to_string(),
                skip_seed: true,
                single_page: false,
            },
            challenges: KindConfig {
                seed: wiki("Challenges"),
                ignore: Vec::new(),
                output_file: "challenge_data.json".to_string(),
                skip_seed: false,
                single_page: true,
            },
            artifacts: KindConfig {
                seed: wiki("Artifacts"),
                ignore: Vec::new(),
                output_file: "artifact_data.json".to_string(),
                skip_seed: false,
                single_page: true,
            },
        }
    }
}

fn wiki(title: &str) -> String {
    format!("{}/wiki/{}", SITE_ROOT, title)
}

/// The index page itself plus its section anchors
fn index_ignores(index: &str, sections: &[&str]) -> Vec<String> {
    let page = wiki(index);
    std::iter::once(page.clone())
        .chain(sections.iter().map(|s| format!("{}#{}", page, s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ignores_cover_index_sections() {
        let kinds = KindsConfig::default();
        assert!(kinds
            .items
            .ignore
            .contains(&"https://riskofrain2.fandom.com/wiki/Items".to_string()));
        assert!(kinds
            .items
            .ignore
            .contains(&"https://riskofrain2.fandom.com/wiki/Items#Lunar".to_string()));
    }

    #[test]
    fn test_single_page_kinds() {
        let kinds = KindsConfig::default();
        assert!(kinds.challenges.single_page);
        assert!(kinds.artifacts.single_page);
        assert!(!kinds.items.single_page);
    }
}
