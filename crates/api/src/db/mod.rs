pub mod climate_data;
pub mod sqlite;

pub use climate_data::{
    ClimateAccess, ClimateData, DateRange, Error as ClimateDataError, Precipitation, Station,
    TemperatureObservation, TemperatureStats,
};
pub use sqlite::Database;
