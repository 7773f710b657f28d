//! Fragment shader variants
//!
//! Every draw uses the same pipeline; the variant is a small uniform the
//! fragment shader branches on.

use bytemuck::{Pod, Zeroable};

/// Phase increment per fading draw
pub const FADE_STEP: f32 = 0.1;
/// Phase wraps at (roughly) 2π
pub const FADE_PERIOD: f32 = 6.283;

/// Which effect a batch is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ShaderKind {
    /// Texture as-is
    #[default]
    Plain,
    /// Per-fragment flicker, reseeded every frame
    Noisy { seed: u32 },
    /// Alpha pulsing with a phase
    Fading { phase: f32 },
}

impl ShaderKind {
    /// Number of distinct variants (one uniform slot each)
    pub const COUNT: usize = 3;

    /// Uniform slot for this variant
    pub fn slot(&self) -> usize {
        match self {
            ShaderKind::Plain => 0,
            ShaderKind::Noisy { .. } => 1,
            ShaderKind::Fading { .. } => 2,
        }
    }

    pub fn uniform(&self) -> EffectUniform {
        match *self {
            ShaderKind::Plain => EffectUniform::new(0, 0, 0.0),
            ShaderKind::Noisy { seed } => EffectUniform::new(1, seed, 0.0),
            ShaderKind::Fading { phase } => EffectUniform::new(2, 0, phase),
        }
    }
}

// Must match `Effect` in sprite.wgsl
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct EffectUniform {
    kind: u32,
    seed: u32,
    phase: f32,
    _pad: u32,
}

impl EffectUniform {
    fn new(kind: u32, seed: u32, phase: f32) -> Self {
        Self {
            kind,
            seed,
            phase,
            _pad: 0,
        }
    }
}

/// Running phase for the fading variant
#[derive(Debug, Clone, Copy, Default)]
pub struct FadePhase(f32);

impl FadePhase {
    pub fn value(&self) -> f32 {
        self.0
    }

    /// Advance one draw and return the new phase
    pub fn advance(&mut self) -> f32 {
        self.0 = (self.0 + FADE_STEP) % FADE_PERIOD;
        self.0
    }

    /// Advance once per fading draw; the frame shows the last phase
    pub fn advance_draws(&mut self, draws: usize) -> f32 {
        for _ in 0..draws {
            self.advance();
        }
        self.0
    }
}
