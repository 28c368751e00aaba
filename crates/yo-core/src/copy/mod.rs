mod chunk;
mod parallel;
mod partition;
mod stats;

pub use chunk::{copy_chunk, ChunkError, ChunkOp, ReadAt, WriteAt};
pub use parallel::{copy, Copier};
pub use partition::{partition, WorkRange};
pub use stats::CopyOutcome;
