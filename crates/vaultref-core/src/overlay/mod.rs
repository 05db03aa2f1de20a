//! Layered configuration and the full-pass resolution orchestrator

mod layers;
mod orchestrator;

pub use layers::{ConfigLayer, LayeredConfig};
pub use orchestrator::{OverlayError, OverlayResult, ResolutionOrchestrator, ResolutionOverlay};
