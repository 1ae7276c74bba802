pub mod app;
pub mod cli;
pub mod clock;
pub mod display;
pub mod edit;
pub mod error;
pub mod estimate;
pub mod export;
pub mod model;
pub mod plan;
pub mod rollover;
pub mod snapshot;
pub mod storage;
pub mod summary;
pub mod util;

pub use app::run;
pub use error::{PlannerError, Result};
