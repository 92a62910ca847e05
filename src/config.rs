//! # Configuration
//!
//! Scanner settings loaded from JSON. Everything the scan needs is passed
//! explicitly from here into the workers; nothing is read from global state.
//!
//! The target catalog is a list of named groups, each a list of items. An
//! item names a block type and the data values it may carry; every
//! combination becomes one `BlockValue` in the target set, and every item is
//! one output category.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::voxels::block::block_type::{cotton_data, BlockType};
use crate::voxels::block::{BlockValue, TargetSet};
use crate::voxels::generation::GenerationMode;

pub const DEFAULT_SCAN_RANGE: f32 = 100.0;
pub const DEFAULT_MIN_TARGET_BLOCK_SUM: usize = 1800;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScannerConfig {
    pub generation_mode: GenerationMode,
    pub scan_range: f32,
    pub min_target_block_sum: usize,
    pub targets: Vec<TargetGroup>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TargetGroup {
    pub name: String,
    pub items: Vec<TargetItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TargetItem {
    pub name: String,
    pub block: String,
    #[serde(default = "default_item_data")]
    pub data: Vec<u32>,
}

fn default_item_data() -> Vec<u32> {
    vec![0]
}

impl TargetItem {
    fn new(name: &str, block: &str, data: Vec<u32>) -> Self {
        TargetItem {
            name: name.to_string(),
            block: block.to_string(),
            data,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            generation_mode: GenerationMode::default(),
            scan_range: DEFAULT_SCAN_RANGE,
            min_target_block_sum: DEFAULT_MIN_TARGET_BLOCK_SUM,
            targets: default_targets(),
        }
    }
}

fn default_targets() -> Vec<TargetGroup> {
    let ores = ["coal", "copper", "iron", "sulphur", "diamond", "germanium", "saltpeter"]
        .iter()
        .map(|name| TargetItem::new(name, &format!("{}_ore", name), default_item_data()))
        .collect();
    vec![
        TargetGroup {
            name: "Ores".to_string(),
            items: ores,
        },
        TargetGroup {
            name: "Plants".to_string(),
            items: vec![
                TargetItem::new("pumpkin", "pumpkin", default_item_data()),
                TargetItem::new("cotton", "cotton", vec![cotton_data(2, true)]),
            ],
        },
        TargetGroup {
            name: "Items".to_string(),
            items: vec![TargetItem::new("gravestone", "gravestone", (0..16).collect())],
        },
    ]
}

impl ScannerConfig {
    /// Reads a config from a JSON file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let text = fs::read_to_string(path)?;
        let config: ScannerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ScanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if !self.scan_range.is_finite() || self.scan_range <= 0.0 {
            return Err(ScanError::InvalidSettings(format!(
                "scan_range must be a positive number, got {}",
                self.scan_range
            )));
        }
        if self.targets.iter().all(|group| group.items.is_empty()) {
            return Err(ScanError::InvalidSettings("target catalog is empty".to_string()));
        }
        Ok(())
    }

    /// Resolves block names in the catalog to categories of block values.
    pub fn resolve_targets(&self) -> Result<TargetCategories, ScanError> {
        let mut categories = Vec::new();
        for group in &self.targets {
            for item in &group.items {
                let block_type = BlockType::from_name(&item.block).ok_or_else(|| ScanError::UnknownBlock {
                    group: group.name.clone(),
                    item: item.name.clone(),
                    block: item.block.clone(),
                })?;
                categories.push(TargetCategory {
                    name: item.name.clone(),
                    values: item.data.iter().map(|data| block_type.with_data(*data)).collect(),
                });
            }
        }
        Ok(TargetCategories { categories })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TargetCategory {
    pub name: String,
    pub values: Vec<BlockValue>,
}

/// Output categories in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetCategories {
    pub categories: Vec<TargetCategory>,
}

impl TargetCategories {
    /// Every block value of every category.
    pub fn target_set(&self) -> TargetSet {
        self.categories
            .iter()
            .flat_map(|category| category.values.iter().copied())
            .collect()
    }

    /// The CSV header: `seed,total` followed by one column per category.
    pub fn header(&self) -> String {
        let mut header = String::from("seed,total");
        for category in &self.categories {
            header.push(',');
            header.push_str(&category.name);
        }
        header
    }

    /// Sums per-value counts into per-category counts.
    pub fn sums(&self, blocks_count: &HashMap<BlockValue, usize>) -> Vec<usize> {
        self.categories
            .iter()
            .map(|category| {
                category
                    .values
                    .iter()
                    .filter_map(|value| blocks_count.get(value))
                    .sum()
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_catalog_header() {
        let categories = ScannerConfig::default().resolve_targets().unwrap();
        assert_eq!(
            categories.header(),
            "seed,total,coal,copper,iron,sulphur,diamond,germanium,saltpeter,pumpkin,cotton,gravestone"
        );
        assert_eq!(categories.target_set().len(), 7 + 2 + 16);
    }

    #[test]
    fn sums_follow_categories() {
        let categories = ScannerConfig::default().resolve_targets().unwrap();
        let mut counts = HashMap::new();
        counts.insert(BlockType::COAL_ORE.value(), 5);
        counts.insert(BlockType::GRAVESTONE.with_data(0), 1);
        counts.insert(BlockType::GRAVESTONE.with_data(15), 2);
        counts.insert(BlockType::COTTON.with_data(cotton_data(2, false)), 9);
        let sums = categories.sums(&counts);
        assert_eq!(sums, vec![5, 0, 0, 0, 0, 0, 0, 0, 0, 3]);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: ScannerConfig =
            serde_json::from_str(r#"{ "generation_mode": "flat", "scan_range": 40.0 }"#).unwrap();
        assert_eq!(config.generation_mode, GenerationMode::Flat);
        assert_eq!(config.scan_range, 40.0);
        assert_eq!(config.min_target_block_sum, DEFAULT_MIN_TARGET_BLOCK_SUM);
        assert_eq!(config.targets, default_targets());
    }

    #[test]
    fn unknown_block_is_reported() {
        let config: ScannerConfig = serde_json::from_str(
            r#"{ "targets": [ { "name": "Ores", "items": [ { "name": "gold", "block": "gold_ore" } ] } ] }"#,
        )
        .unwrap();
        match config.resolve_targets() {
            Err(ScanError::UnknownBlock { block, .. }) => assert_eq!(block, "gold_ore"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn config_round_trips_through_file() {
        let path = std::env::temp_dir().join(format!("terrain_scanner_config_{}.json", std::process::id()));
        let mut config = ScannerConfig::default();
        config.min_target_block_sum = 12;
        fs::write(&path, config.to_json().unwrap()).unwrap();
        let loaded = ScannerConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn invalid_range_is_rejected() {
        let config = ScannerConfig {
            scan_range: -1.0,
            ..ScannerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ScanError::InvalidSettings(_))));
    }
}
