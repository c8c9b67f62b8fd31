//! Sparkline rasterization for the notification-area icons.
//!
//! - [`Canvas`]: clipped RGBA8 drawing primitives
//! - [`font`]: tiny bitmap font for the value overlay
//! - [`ChartRenderer`]: history → [`ChartImage`](meter_core::ChartImage)

pub mod canvas;
pub mod chart;
pub mod font;

pub use canvas::Canvas;
pub use chart::{ChartRenderer, ChartRequest};
