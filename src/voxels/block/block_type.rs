//! # Block Type Module
//!
//! This module defines the block contents the built-in generators place and
//! the name table used to resolve target catalogs from configuration files.

use num_derive::FromPrimitive;
use phf::phf_map;

use super::{extract_contents, make_block_value, BlockValue};

/// Enumerates every block contents index the generators produce.
///
/// The discriminant is the value stored in the contents bits of a
/// `BlockValue`. The `FromPrimitive` derive allows conversion back from the
/// packed integer.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An empty cell.
    AIR,
    BEDROCK,
    STONE,
    DIRT,
    GRASS,
    SAND,
    GRAVEL,
    /// Water is not air: the crawler treats it as solid.
    WATER,
    WOOD,
    LEAVES,
    COAL_ORE,
    COPPER_ORE,
    IRON_ORE,
    SULPHUR_ORE,
    DIAMOND_ORE,
    GERMANIUM_ORE,
    SALTPETER_ORE,
    PUMPKIN,
    /// Data bits hold the growth size (bits 0..2) and the wild flag (bit 3).
    COTTON,
    CAIRN,
    /// Data bits hold one of 16 carving variants.
    GRAVESTONE,
}

/// Maps configuration names to block types.
static BLOCK_TYPE_NAMES: phf::Map<&'static str, BlockType> = phf_map! {
    "air" => BlockType::AIR,
    "bedrock" => BlockType::BEDROCK,
    "stone" => BlockType::STONE,
    "dirt" => BlockType::DIRT,
    "grass" => BlockType::GRASS,
    "sand" => BlockType::SAND,
    "gravel" => BlockType::GRAVEL,
    "water" => BlockType::WATER,
    "wood" => BlockType::WOOD,
    "leaves" => BlockType::LEAVES,
    "coal_ore" => BlockType::COAL_ORE,
    "copper_ore" => BlockType::COPPER_ORE,
    "iron_ore" => BlockType::IRON_ORE,
    "sulphur_ore" => BlockType::SULPHUR_ORE,
    "diamond_ore" => BlockType::DIAMOND_ORE,
    "germanium_ore" => BlockType::GERMANIUM_ORE,
    "saltpeter_ore" => BlockType::SALTPETER_ORE,
    "pumpkin" => BlockType::PUMPKIN,
    "cotton" => BlockType::COTTON,
    "cairn" => BlockType::CAIRN,
    "gravestone" => BlockType::GRAVESTONE,
};

/// Maximum growth size a cotton plant can reach.
pub const COTTON_MAX_SIZE: u32 = 7;
const COTTON_WILD_FLAG: u32 = 0b1000;

impl BlockType {
    /// Looks up a block type by its lowercase configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_TYPE_NAMES.get(name).copied()
    }

    /// Converts the contents bits of a value back to a block type.
    ///
    /// # Returns
    /// `None` if the contents index is not one the generators know about.
    pub fn from_value(value: BlockValue) -> Option<Self> {
        num::FromPrimitive::from_u32(extract_contents(value))
    }

    /// The value of this block with no light and the given data bits.
    pub fn with_data(self, data: u32) -> BlockValue {
        make_block_value(self as u32, 0, data)
    }

    /// The value of this block with no light and no data.
    pub fn value(self) -> BlockValue {
        self.with_data(0)
    }

    /// Whether the block is one of the seven ore types.
    pub fn is_ore(self) -> bool {
        matches!(
            self,
            BlockType::COAL_ORE
                | BlockType::COPPER_ORE
                | BlockType::IRON_ORE
                | BlockType::SULPHUR_ORE
                | BlockType::DIAMOND_ORE
                | BlockType::GERMANIUM_ORE
                | BlockType::SALTPETER_ORE
        )
    }
}

/// Builds the data bits of a cotton plant.
pub fn cotton_data(size: u32, wild: bool) -> u32 {
    let mut data = size.min(COTTON_MAX_SIZE);
    if wild {
        data |= COTTON_WILD_FLAG;
    }
    data
}
