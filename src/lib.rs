//! Shared host/shader layout contract for a deferred rendering pipeline
//!
//! Everything crossing the CPU/GPU boundary in the pipeline is declared here,
//! once, for both sides:
//! - [`slots`]: binding slot enumerations (`@group`/`@binding`/`@location`
//!   values) shared with the WGSL sources
//! - [`uniforms`]: the per-frame uniform block, transferred as raw bytes
//! - [`gbuffer`]: the G-buffer pixel record and its color attachment mapping
//! - [`vertex`]: mesh vertex streams and their buffer layouts
//! - [`validate`]: load-time checks that a WGSL module agrees with the host
//!   definitions, catching layout drift before a pipeline is built
//!
//! The crate deliberately creates no GPU resources; it only produces the
//! descriptors and byte layouts that pipeline construction elsewhere consumes.

pub mod gbuffer;
pub mod slots;
pub mod uniforms;
pub mod validate;
pub mod vertex;

pub use gbuffer::GBufferData;
pub use slots::{BufferIndex, TextureIndex, VertexAttribute};
pub use uniforms::Uniforms;
pub use validate::{InterfaceError, InterfaceResult};
pub use vertex::{MeshGeneric, MeshPosition};

/// WGSL source of the G-buffer and deferred lighting passes. Shipped with the
/// crate so the interface checks and the shaders can never drift apart
/// silently.
pub const DEFERRED_SHADER: &str = include_str!("../shaders/deferred.wgsl");
