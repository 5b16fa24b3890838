//! Convolutional Q-network for stacked pixel observations.
mod base;
mod config;
pub use base::PixelCnn;
pub use config::PixelCnnConfig;
