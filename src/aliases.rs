//! Alias catalog: logical field name → ordered physical name candidates.
//!
//! The built-in catalog covers the field names seen across schema revisions of
//! the source store. Operators can prepend or replace entries through
//! configuration; the catalog is built once at startup and never mutated.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::lanes::{LANES, SUB_LANES};

/// Logical keys used by the assembler.
pub mod keys {
    pub const WORKFLOW_LINK: &str = "workflow_link";
    pub const ENTITY_LINK: &str = "entity_link";
    pub const CONTENT_TYPE_LINK: &str = "content_type_link";

    pub const GOAL: &str = "goal";
    pub const TOPIC: &str = "topic";
    pub const USER_INPUT: &str = "user_input";
    pub const NOTES: &str = "notes";

    pub const AUDIENCE: &str = "audience";
    pub const AUDIENCE_PAIN_POINTS: &str = "audience_pain_points";

    pub const ENTITY_NAME: &str = "entity_name";
    pub const ENTITY_DESCRIPTION: &str = "entity_description";
    pub const ENTITY_VOICE: &str = "entity_voice";
    pub const ENTITY_WEBSITE: &str = "entity_website";

    pub const CONTENT_TYPE_NAME: &str = "content_type_name";
    pub const DESTINATION: &str = "destination";
    pub const FIELD_SCHEMA: &str = "field_schema";
    pub const VALIDATORS: &str = "validators";

    pub const WORKFLOW_NAME: &str = "workflow_name";
    pub const WORKFLOW_RULES: &str = "workflow_rules";
    pub const PROVIDER: &str = "provider";
    pub const MODEL: &str = "model";

    pub fn branch_toggle(lane: char) -> String {
        format!("branch_toggle.{lane}")
    }

    pub fn prompt(sub_lane: &str) -> String {
        format!("prompt.{sub_lane}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasCategory {
    Link,
    Toggle,
    Prompt,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub category: AliasCategory,
    pub aliases: Vec<String>,
}

/// Alias adjustments from configuration, keyed by logical name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AliasConfig {
    /// Candidates tried before the built-in list.
    #[serde(default)]
    pub prepend: HashMap<String, Vec<String>>,

    /// Full replacements for the built-in list.
    #[serde(default)]
    pub replace: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct AliasCatalog {
    entries: IndexMap<String, AliasEntry>,
}

const LINKS: &[(&str, &[&str])] = &[
    (
        keys::WORKFLOW_LINK,
        &["Workflow", "Workflows", "Linked Workflow", "workflow", "workflow_id"],
    ),
    (
        keys::ENTITY_LINK,
        &["Entity", "Brand", "Client", "Company", "entity", "entity_id"],
    ),
    (
        keys::CONTENT_TYPE_LINK,
        &["Content Type", "Content Types", "Type", "content_type", "content_type_id"],
    ),
];

const CONTENT: &[(&str, &[&str])] = &[
    (keys::GOAL, &["Goal", "Objective", "Goals", "goal"]),
    (keys::TOPIC, &["Topic", "Title", "Subject", "topic"]),
    (keys::USER_INPUT, &["User Input", "Brief", "Input", "Request", "user_input"]),
    (keys::NOTES, &["Notes", "Additional Notes", "Context", "notes"]),
    (keys::AUDIENCE, &["Audience", "Target Audience", "Audience Profile", "audience"]),
    (
        keys::AUDIENCE_PAIN_POINTS,
        &["Pain Points", "Audience Pain Points", "pain_points"],
    ),
    (keys::ENTITY_NAME, &["Name", "Entity Name", "Brand Name", "Company Name"]),
    (keys::ENTITY_DESCRIPTION, &["Description", "About", "Overview"]),
    (keys::ENTITY_VOICE, &["Voice", "Brand Voice", "Tone", "Tone of Voice"]),
    (keys::ENTITY_WEBSITE, &["Website", "URL", "Site"]),
    (keys::CONTENT_TYPE_NAME, &["Name", "Content Type", "Type Name"]),
    (
        keys::DESTINATION,
        &["Destination", "Publish Destination", "Channel", "Platform"],
    ),
    (
        keys::FIELD_SCHEMA,
        &["Field Schema", "Fields", "Output Fields", "Schema"],
    ),
    (
        keys::VALIDATORS,
        &["Validators", "Validation Rules", "Validation"],
    ),
    (keys::WORKFLOW_NAME, &["Name", "Workflow Name"]),
    (keys::WORKFLOW_RULES, &["Rules", "Workflow Rules", "Guidelines"]),
    (keys::PROVIDER, &["Provider", "Execution Provider", "LLM Provider"]),
    (keys::MODEL, &["Model", "LLM Model", "Model Name"]),
];

impl AliasCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        let mut entries = IndexMap::new();

        for (key, aliases) in LINKS {
            entries.insert(key.to_string(), entry(AliasCategory::Link, aliases));
        }

        for lane in LANES {
            let lower = lane.to_ascii_lowercase();
            entries.insert(
                keys::branch_toggle(lane),
                AliasEntry {
                    category: AliasCategory::Toggle,
                    aliases: vec![
                        format!("Branch {lane}"),
                        format!("branch_{lower}"),
                        format!("Enable {lane}"),
                        format!("{lane} Enabled"),
                    ],
                },
            );
            for suffix in SUB_LANES {
                let sub_lane = format!("{lane}{suffix}");
                entries.insert(
                    keys::prompt(&sub_lane),
                    AliasEntry {
                        category: AliasCategory::Prompt,
                        aliases: vec![
                            format!("{sub_lane} Prompt"),
                            format!("Prompt {sub_lane}"),
                            sub_lane.clone(),
                        ],
                    },
                );
            }
        }

        for (key, aliases) in CONTENT {
            entries.insert(key.to_string(), entry(AliasCategory::Content, aliases));
        }

        Self { entries }
    }

    /// The built-in catalog with configured adjustments applied. Unknown
    /// logical keys in `replace` are added as content fields.
    pub fn with_config(config: &AliasConfig) -> Self {
        let mut catalog = Self::builtin();
        for (key, aliases) in &config.replace {
            let category = catalog
                .entries
                .get(key)
                .map(|e| e.category)
                .unwrap_or(AliasCategory::Content);
            catalog.entries.insert(
                key.clone(),
                AliasEntry {
                    category,
                    aliases: aliases.clone(),
                },
            );
        }
        for (key, extra) in &config.prepend {
            let entry = catalog
                .entries
                .entry(key.clone())
                .or_insert_with(|| AliasEntry {
                    category: AliasCategory::Content,
                    aliases: Vec::new(),
                });
            let mut merged = extra.clone();
            merged.extend(entry.aliases.iter().filter(|a| !extra.contains(a)).cloned());
            entry.aliases = merged;
        }
        catalog
    }

    /// Ordered candidates for a logical key; empty when the key is unknown.
    pub fn aliases(&self, key: &str) -> &[String] {
        self.entries
            .get(key)
            .map(|e| e.aliases.as_slice())
            .unwrap_or(&[])
    }

    pub fn category(&self, key: &str) -> Option<AliasCategory> {
        self.entries.get(key).map(|e| e.category)
    }

    /// Logical keys in a category, in catalog order.
    pub fn keys_in(&self, category: AliasCategory) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |(_, e)| e.category == category)
            .map(|(k, _)| k.as_str())
    }
}

impl Default for AliasCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn entry(category: AliasCategory, aliases: &[&str]) -> AliasEntry {
    AliasEntry {
        category,
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    }
}
