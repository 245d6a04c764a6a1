//! Runtime: chunk streaming, pooling, background meshing and the per-tick driver.
#![forbid(unsafe_code)]

pub mod driver;
pub mod handoff;
pub mod pool;
pub mod resources;
pub mod streamer;
pub mod workers;

pub use driver::{DriverConfig, FrameDriver, FrameStats};
pub use handoff::{HandoffReceiver, HandoffSender};
pub use pool::{AtomicBag, Pool, Pooled};
pub use resources::{ChunkPopulator, MeshSink, RenderResources};
pub use streamer::{ChunkStreamer, StreamTick, StreamerConfig, TickBudget};
pub use workers::{MeshJob, MeshOut, MeshWorkers};
