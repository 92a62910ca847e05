//! # Block Module
//!
//! This module provides the block value encoding used by every terrain cell.
//! It includes block type definitions, block face handling, and the target set
//! consumed by the scanner.
//!
//! ## Value Layout
//!
//! A block value is a packed 32-bit integer:
//! - bits 0..9: contents (the `BlockType` index)
//! - bits 10..13: light level
//! - bits 14..31: type-specific data (growth stage, orientation, variant, ...)
//!
//! The scanner treats values as opaque. It only ever asks two questions: is the
//! cell air (contents equal to zero) and is the full value in the target set.

use std::collections::HashSet;

pub mod block_side;
pub mod block_type;

/// The packed value stored in a single terrain cell.
pub type BlockValue = u32;

/// The set of block values a dig or scan is interested in.
pub type TargetSet = HashSet<BlockValue>;

/// The value of an empty cell.
pub const AIR: BlockValue = 0;

const CONTENTS_MASK: BlockValue = 0x3FF;
const LIGHT_SHIFT: u32 = 10;
const LIGHT_MASK: BlockValue = 0xF;
const DATA_SHIFT: u32 = 14;
const DATA_MASK: BlockValue = 0x3FFFF;

/// Packs contents, light and data into a single block value.
///
/// Out-of-range inputs are masked to their field width.
pub fn make_block_value(contents: u32, light: u32, data: u32) -> BlockValue {
    (contents & CONTENTS_MASK)
        | ((light & LIGHT_MASK) << LIGHT_SHIFT)
        | ((data & DATA_MASK) << DATA_SHIFT)
}

/// Returns the contents (block type index) of a value.
#[inline]
pub fn extract_contents(value: BlockValue) -> u32 {
    value & CONTENTS_MASK
}

/// Returns the light level of a value.
#[inline]
pub fn extract_light(value: BlockValue) -> u32 {
    (value >> LIGHT_SHIFT) & LIGHT_MASK
}

/// Returns the type-specific data of a value.
#[inline]
pub fn extract_data(value: BlockValue) -> u32 {
    (value >> DATA_SHIFT) & DATA_MASK
}

/// Whether the value describes an empty cell, regardless of its light bits.
#[inline]
pub fn is_air(value: BlockValue) -> bool {
    extract_contents(value) == 0
}
