pub mod error;
pub mod event;
pub mod image;
pub mod presenter;
pub mod state;

pub use error::{MeterError, Result};
pub use event::Message;
pub use image::ChartImage;
pub use presenter::{Indicator, Presenter};
pub use state::{MetricKind, Readings};
