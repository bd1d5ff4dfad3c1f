pub(crate) mod clip_preview;
pub(crate) mod cpu;
#[cfg(feature = "gpu")]
pub(crate) mod gpu;
pub(crate) mod mesh;
pub(crate) mod options;
pub(crate) mod playback;
pub(crate) mod shader;
pub(crate) mod target;
