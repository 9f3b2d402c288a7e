pub mod climate_routes;
mod error;

pub use climate_routes::*;
pub use error::{ApiError, INVALID_DATE_MESSAGE};
