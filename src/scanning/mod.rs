//! # Scanning Module
//!
//! Surface crawling over solid terrain. The scanner only touches cells next
//! to surface it has already discovered, so sealed interior volumes are never
//! visited.

pub mod cell_face;
pub mod terrain_scanner;

pub use cell_face::CellFace;
pub use terrain_scanner::TerrainScanner;
