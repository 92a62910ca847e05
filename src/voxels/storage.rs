//! # Chunk Storage
//!
//! Persistent chunk storage is an external collaborator. The materialization
//! state machine only asks it one question when a chunk is first touched: can
//! you fill this chunk from disk?

use super::chunk::Chunk;

pub trait ChunkStorage {
    /// Fills `chunk` from stored data.
    ///
    /// # Returns
    /// `true` if stored data existed and the chunk's cells were replaced,
    /// `false` if the chunk has to be generated.
    fn load_chunk(&mut self, chunk: &mut Chunk) -> bool;
}

/// Storage that never has data, so every chunk is generated.
#[derive(Default)]
pub struct NoChunkStorage;

impl ChunkStorage for NoChunkStorage {
    fn load_chunk(&mut self, _chunk: &mut Chunk) -> bool {
        false
    }
}
