//! Selector profiles
//!
//! A profile describes where a given wiki markup generation keeps each piece
//! of data. Extractors only ever see a compiled profile, so supporting a new
//! markup generation means adding a profile, not code.

use crate::extract::EntityKind;
use crate::ConfigError;
use scraper::Selector;
use serde::Deserialize;

/// Declarative selector set for one markup generation
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelectorProfile {
    /// Infobox container; a page may hold several
    pub infobox: String,

    /// Entity title inside an infobox
    pub title: String,

    /// Main image inside an infobox
    pub image: String,

    /// Attributes tried in order for an image's source URL
    #[serde(default = "default_src_attrs")]
    pub image_src_attrs: Vec<String>,

    /// Attributes tried in order for an image's declared filename
    #[serde(default = "default_name_attrs")]
    pub image_name_attrs: Vec<String>,

    /// Icons inside skill, challenge and artifact tables
    #[serde(default = "default_icon")]
    pub icon: String,

    /// Flavor text caption under the image
    pub caption: String,

    /// Lead paragraph, used when the infobox has no description
    pub summary: String,

    pub fields: FieldLayout,

    #[serde(default)]
    pub keys: FieldKeys,

    /// First cell of every stat row, header row first
    pub stat_cells: String,

    pub skills: SkillLayout,
    pub challenges: ChallengeLayout,
    pub artifacts: ArtifactLayout,
    pub navigation: NavigationSelectors,
}

/// How labelled infobox fields are laid out
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "style", rename_all = "kebab-case")]
pub enum FieldLayout {
    /// Elements carrying a `data-source` attribute, with label and value children
    DataSource { label: String, value: String },

    /// Rows whose first cell is the label and second cell the value
    LabelRows { row: String },
}

/// Field identifiers: `data-source` values or row labels, depending on the layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FieldKeys {
    pub description: String,
    pub rarity: String,
    pub category: String,
    pub id: String,
    pub unlock: String,
    pub cooldown: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            description: "desc".to_string(),
            rarity: "rarity".to_string(),
            category: "category".to_string(),
            id: "ID".to_string(),
            unlock: "unlock".to_string(),
            cooldown: "cooldown".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SkillLayout {
    /// One table per skill: a name row, then label/value rows
    pub table: String,
}

/// Challenge tables, one per category in page order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChallengeLayout {
    pub table: String,
    pub name_column: usize,
    pub description_column: usize,
    pub unlock_column: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ArtifactLayout {
    pub row: String,
    pub name_column: usize,
    pub code_column: usize,
    pub description_column: usize,
}

/// Link-discovery selectors for the crawled kinds
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NavigationSelectors {
    pub items: String,
    pub equipment: String,
    pub survivors: String,
}

fn default_src_attrs() -> Vec<String> {
    vec!["data-src".to_string(), "src".to_string()]
}

fn default_name_attrs() -> Vec<String> {
    vec!["data-image-name".to_string(), "alt".to_string()]
}

fn default_icon() -> String {
    "img".to_string()
}

impl SelectorProfile {
    /// Returns a built-in profile by name
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "fandom" => Some(Self::fandom()),
            "gamepedia" => Some(Self::gamepedia()),
            _ => None,
        }
    }

    /// Current fandom portable-infobox markup
    pub fn fandom() -> Self {
        Self {
            infobox: "aside.portable-infobox".to_string(),
            title: r#"[data-source="title"], h2.pi-title"#.to_string(),
            image: "img.pi-image-thumbnail".to_string(),
            image_src_attrs: default_src_attrs(),
            image_name_attrs: default_name_attrs(),
            icon: default_icon(),
            caption: "figcaption.pi-caption".to_string(),
            summary: ".mw-parser-output > p".to_string(),
            fields: FieldLayout::DataSource {
                label: ".pi-data-label".to_string(),
                value: ".pi-data-value".to_string(),
            },
            keys: FieldKeys::default(),
            stat_cells: r#"[data-source*="stat"]"#.to_string(),
            skills: SkillLayout {
                table: "table.skill".to_string(),
            },
            challenges: ChallengeLayout {
                table: "table.article-table, table.wikitable".to_string(),
                name_column: 1,
                description_column: 2,
                unlock_column: 3,
            },
            artifacts: ArtifactLayout {
                row: "table.article-table tr, table.wikitable tr".to_string(),
                name_column: 1,
                code_column: 2,
                description_column: 3,
            },
            navigation: NavigationSelectors {
                items: ".navbox a".to_string(),
                equipment: "table.article-table td:first-child a, table.wikitable td:first-child a"
                    .to_string(),
                survivors: ".wikia-gallery-item .lightbox-caption a".to_string(),
            },
        }
    }

    /// Older table-based infobox markup
    pub fn gamepedia() -> Self {
        Self {
            infobox: "table.infoboxtable".to_string(),
            title: "th.infoboxname".to_string(),
            image: "td.infoboxpicture img".to_string(),
            image_src_attrs: vec!["src".to_string()],
            image_name_attrs: vec!["alt".to_string()],
            icon: default_icon(),
            caption: "td.infoboxcaption".to_string(),
            summary: ".mw-parser-output > p".to_string(),
            fields: FieldLayout::LabelRows {
                row: "tr".to_string(),
            },
            keys: FieldKeys {
                description: "Description".to_string(),
                rarity: "Rarity".to_string(),
                category: "Category".to_string(),
                id: "ID".to_string(),
                unlock: "Unlock".to_string(),
                cooldown: "Cooldown".to_string(),
            },
            stat_cells: "table.stats tr > :first-child".to_string(),
            skills: SkillLayout {
                table: "table.skillbox".to_string(),
            },
            challenges: ChallengeLayout {
                table: "table.wikitable".to_string(),
                name_column: 1,
                description_column: 2,
                unlock_column: 3,
            },
            artifacts: ArtifactLayout {
                row: "table.wikitable tr".to_string(),
                name_column: 1,
                code_column: 2,
                description_column: 3,
            },
            navigation: NavigationSelectors {
                items: "table.navbox a".to_string(),
                equipment: "table.navbox a".to_string(),
                survivors: "table.navbox a".to_string(),
            },
        }
    }

    /// Discovery selector for a crawled kind; `None` for single-page kinds
    pub fn navigation_for(&self, kind: EntityKind) -> Option<&str> {
        match kind {
            EntityKind::Item => Some(&self.navigation.items),
            EntityKind::Equipment => Some(&self.navigation.equipment),
            EntityKind::Survivor => Some(&self.navigation.survivors),
            EntityKind::Challenge | EntityKind::Artifact => None,
        }
    }

    /// Checks that every selector in the profile parses
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        self.compile(name)?;
        let nav = &self.navigation;
        for (field, selector) in [
            ("navigation.items", &nav.items),
            ("navigation.equipment", &nav.equipment),
            ("navigation.survivors", &nav.survivors),
        ] {
            compile_field(name, field, selector)?;
        }
        Ok(())
    }

    /// Parses every extraction selector once
    pub fn compile(&self, name: &str) -> Result<CompiledProfile, ConfigError> {
        let fields = match &self.fields {
            FieldLayout::DataSource { label, value } => CompiledFields::DataSource {
                any: compile_field(name, "fields", "[data-source]")?,
                label: compile_field(name, "fields.label", label)?,
                value: compile_field(name, "fields.value", value)?,
            },
            FieldLayout::LabelRows { row } => CompiledFields::LabelRows {
                row: compile_field(name, "fields.row", row)?,
            },
        };

        Ok(CompiledProfile {
            infobox: compile_field(name, "infobox", &self.infobox)?,
            title: compile_field(name, "title", &self.title)?,
            image: compile_field(name, "image", &self.image)?,
            image_src_attrs: self.image_src_attrs.clone(),
            image_name_attrs: self.image_name_attrs.clone(),
            icon: compile_field(name, "icon", &self.icon)?,
            caption: compile_field(name, "caption", &self.caption)?,
            summary: compile_field(name, "summary", &self.summary)?,
            fields,
            keys: self.keys.clone(),
            stat_cells: compile_field(name, "stat-cells", &self.stat_cells)?,
            skill_table: compile_field(name, "skills.table", &self.skills.table)?,
            challenge_table: compile_field(name, "challenges.table", &self.challenges.table)?,
            challenge_columns: self.challenges.clone(),
            artifact_row: compile_field(name, "artifacts.row", &self.artifacts.row)?,
            artifact_columns: self.artifacts.clone(),
        })
    }
}

fn compile_field(profile: &str, field: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        profile: profile.to_string(),
        field: field.to_string(),
        message: format!("'{}': {:?}", selector, e),
    })
}

/// Parsed form of a [`SelectorProfile`]
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    pub infobox: Selector,
    pub title: Selector,
    pub image: Selector,
    pub image_src_attrs: Vec<String>,
    pub image_name_attrs: Vec<String>,
    pub icon: Selector,
    pub caption: Selector,
    pub summary: Selector,
    pub fields: CompiledFields,
    pub keys: FieldKeys,
    pub stat_cells: Selector,
    pub skill_table: Selector,
    pub challenge_table: Selector,
    pub challenge_columns: ChallengeLayout,
    pub artifact_row: Selector,
    pub artifact_columns: ArtifactLayout,
}

#[derive(Debug, Clone)]
pub enum CompiledFields {
    DataSource {
        any: Selector,
        label: Selector,
        value: Selector,
    },
    LabelRows {
        row: Selector,
    },
}
