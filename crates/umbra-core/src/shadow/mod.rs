pub mod blob;
mod capture;
mod surface;

pub use capture::{CaptureBatch, CaptureState, ShadowCaptureEngine, ShadowSource, ShadowTexture};
pub use surface::ShadowSurface;
