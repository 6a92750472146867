//! Launch-pack catalog: YAML definitions of launch packs and their template
//! milestones, loaded and upserted into the store.
//!
//! Ids are derived from the slug (UUID v5), so re-seeding the same catalog
//! updates rows in place instead of duplicating them.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::projects::models::{LaunchPack, Milestone};
use crate::storage::{StorageError, Store};

/// The catalog shipped with the crate.
pub const DEFAULT_CATALOG: &str = include_str!("../../catalog/launch_packs.yaml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid launch pack '{slug}': {message}")]
    Invalid { slug: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub launch_packs: Vec<PackDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackDefinition {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: String,
    pub duration_weeks: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub milestones: Vec<MilestoneDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneDefinition {
    pub order_index: i32,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_hours: f64,
}

/// Summary of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub packs: usize,
    pub milestones: usize,
}

impl Catalog {
    pub fn parse(content: &str, origin: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(content).map_err(|e| CatalogError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::parse(DEFAULT_CATALOG, "builtin")
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut slugs = HashSet::new();
        for pack in &self.launch_packs {
            let invalid = |message: String| CatalogError::Invalid {
                slug: pack.slug.clone(),
                message,
            };

            if !is_url_safe(&pack.slug) {
                return Err(invalid(
                    "slug must be non-empty lowercase letters, digits and '-'".to_string(),
                ));
            }
            if !slugs.insert(pack.slug.as_str()) {
                return Err(invalid("duplicate slug".to_string()));
            }
            if pack.title.trim().is_empty() {
                return Err(invalid("title is empty".to_string()));
            }
            if pack.duration_weeks == 0 {
                return Err(invalid("duration_weeks must be greater than 0".to_string()));
            }

            let mut orders = HashSet::new();
            for m in &pack.milestones {
                if !orders.insert(m.order_index) {
                    return Err(invalid(format!("duplicate order_index {}", m.order_index)));
                }
                if m.estimated_hours < 0.0 {
                    return Err(invalid(format!(
                        "milestone '{}' has negative estimated_hours",
                        m.title
                    )));
                }
            }
        }
        Ok(())
    }
}

fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Stable id for a launch pack slug.
pub fn pack_id(slug: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("launchpad:pack:{}", slug).as_bytes())
}

/// Stable id for a template milestone.
pub fn milestone_id(pack_slug: &str, order_index: i32) -> Uuid {
    Uuid::new_v5(
        &Uuid::NAMESPACE_URL,
        format!("launchpad:pack:{}:milestone:{}", pack_slug, order_index).as_bytes(),
    )
}

impl PackDefinition {
    pub fn to_models(&self) -> (LaunchPack, Vec<Milestone>) {
        let pack = LaunchPack {
            id: pack_id(&self.slug),
            slug: self.slug.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            duration_weeks: self.duration_weeks,
            difficulty: self.difficulty.clone(),
            tags: self.tags.clone(),
        };
        let mut milestones: Vec<Milestone> = self
            .milestones
            .iter()
            .map(|m| Milestone {
                id: milestone_id(&self.slug, m.order_index),
                launch_pack_id: pack.id,
                title: m.title.clone(),
                description: m.description.clone(),
                order_index: m.order_index,
                estimated_hours: m.estimated_hours,
            })
            .collect();
        milestones.sort_by_key(|m| m.order_index);
        (pack, milestones)
    }
}

/// Load and validate a catalog file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    Catalog::parse(&content, &path.display().to_string())
}

/// Upsert every pack in the catalog, keyed by slug.
pub async fn seed(store: &dyn Store, catalog: &Catalog) -> Result<SeedReport, CatalogError> {
    let mut report = SeedReport::default();
    for definition in &catalog.launch_packs {
        let (pack, milestones) = definition.to_models();
        store.upsert_launch_pack(&pack, &milestones).await?;
        tracing::info!(
            slug = %pack.slug,
            milestones = milestones.len(),
            "Seeded launch pack"
        );
        report.packs += 1;
        report.milestones += milestones.len();
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let slugs: Vec<&str> = catalog
            .launch_packs
            .iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(
            slugs,
            vec![
                "webapp-todo-dashboard",
                "dataproject-iris-classifier",
                "startupmvp-local-services"
            ]
        );
        let counts: Vec<usize> = catalog
            .launch_packs
            .iter()
            .map(|p| p.milestones.len())
            .collect();
        assert_eq!(counts, vec![4, 4, 6]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "launch_packs:\n  - slug: cli-notes\n    title: Notes CLI\n    difficulty: beginner\n    duration_weeks: 2\n    milestones:\n      - order_index: 2\n        title: Sync\n      - order_index: 1\n        title: Parse\n"
        )
        .unwrap();

        let catalog = load(file.path()).unwrap();
        let (pack, milestones) = catalog.launch_packs[0].to_models();
        assert_eq!(pack.id, pack_id("cli-notes"));
        assert_eq!(milestones[0].title, "Parse");
        assert_eq!(milestones[1].title, "Sync");
    }

    fn one_pack(slug: &str, weeks: u32, orders: &[i32]) -> Catalog {
        Catalog {
            launch_packs: vec![PackDefinition {
                slug: slug.to_string(),
                title: "Pack".to_string(),
                description: String::new(),
                difficulty: "beginner".to_string(),
                duration_weeks: weeks,
                tags: vec![],
                milestones: orders
                    .iter()
                    .map(|&order_index| MilestoneDefinition {
                        order_index,
                        title: format!("M{}", order_index),
                        description: String::new(),
                        estimated_hours: 1.0,
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn test_validation() {
        assert!(one_pack("good-pack", 2, &[1, 2]).validate().is_ok());
        assert!(one_pack("Bad Slug", 2, &[1]).validate().is_err());
        assert!(one_pack("", 2, &[1]).validate().is_err());
        assert!(one_pack("zero-weeks", 0, &[1]).validate().is_err());
        assert!(one_pack("dup-order", 2, &[1, 1]).validate().is_err());

        let mut dup = one_pack("same", 1, &[1]);
        dup.launch_packs.push(dup.launch_packs[0].clone());
        assert!(matches!(dup.validate(), Err(CatalogError::Invalid { .. })));
    }

    #[test]
    fn test_parse_error_names_origin() {
        let err = Catalog::parse("launch_packs: [", "broken.yaml").unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[tokio::test]
    async fn test_seed_is_repeatable() {
        let store = MemoryStore::new();
        let catalog = Catalog::builtin().unwrap();

        let first = seed(&store, &catalog).await.unwrap();
        let second = seed(&store, &catalog).await.unwrap();
        assert_eq!(first, SeedReport { packs: 3, milestones: 14 });
        assert_eq!(first, second);

        assert_eq!(store.list_launch_packs().await.unwrap().len(), 3);
        let pack = store
            .get_launch_pack_by_slug("startupmvp-local-services")
            .await
            .unwrap()
            .unwrap();
        let milestones = store.list_milestones(pack.id).await.unwrap();
        assert_eq!(milestones.len(), 6);
        assert_eq!(milestones[0].title, "Project Setup & Database Schema");
    }
}
