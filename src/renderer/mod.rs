//! WebGPU rendering module
//!
//! Draws textured quads for every sprite and beam, with a small set of
//! fragment shader variants selected per batch.

pub mod pipeline;
pub mod shader;
pub mod shapes;
pub mod textures;
pub mod vertex;

pub use pipeline::RenderState;
pub use shader::{FadePhase, ShaderKind};
pub use shapes::{Batch, Frame, FrameEffects, build_frame};
pub use textures::TextureCache;
pub use vertex::Vertex;
