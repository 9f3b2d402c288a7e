use async_trait::async_trait;
use climate_api_core::{
    format_iso_date, parse_iso_date, round_hundredths, trailing_year_start, DateError,
};
use log::debug;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use sqlx::SqliteConnection;
use std::{borrow::Cow, sync::Arc};
use time::Date;
use utoipa::{
    openapi::{
        schema::{AdditionalProperties, ObjectBuilder, Schema, SchemaType, Type},
        RefOr,
    },
    PartialSchema, ToSchema,
};

use super::Database;

pub struct ClimateAccess {
    db: Arc<Database>,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query sqlite: {0}")]
    Query(#[from] sqlx::Error),
    #[error("Stored measurement date is malformed: {0}")]
    StoredDate(#[from] DateError),
    #[error("Database is unhealthy: {0}")]
    Unhealthy(String),
}

#[async_trait]
pub trait ClimateData: Sync + Send {
    /// Every (date, precipitation) pair in the trailing year ending at the
    /// most recent measurement date.
    async fn latest_year_precipitation(&self) -> Result<Vec<Precipitation>, Error>;
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    /// Temperature observations for the station with the most measurements,
    /// limited to the trailing year ending at that station's last date.
    async fn most_active_station_tobs(&self) -> Result<Vec<TemperatureObservation>, Error>;
    async fn temperature_stats(&self, range: &DateRange) -> Result<TemperatureStats, Error>;
    async fn health_check(&self) -> Result<(), Error>;
}

/// Inclusive date filter; an open `end` means "through the last measurement".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Date,
    pub end: Option<Date>,
}

impl DateRange {
    pub fn from_start(start: Date) -> Self {
        Self { start, end: None }
    }

    pub fn between(start: Date, end: Date) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }
}

/// A single day's precipitation, serialized as `{"<date>": <prcp>}`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Precipitation {
    pub date: String,
    pub prcp: Option<f64>,
}

impl Serialize for Precipitation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.date, &self.prcp)?;
        map.end()
    }
}

impl PartialSchema for Precipitation {
    fn schema() -> RefOr<Schema> {
        let prcp = ObjectBuilder::new()
            .schema_type(SchemaType::from_iter([Type::Number, Type::Null]))
            .description(Some("Precipitation for the day, null when not recorded"));

        RefOr::T(Schema::Object(
            ObjectBuilder::new()
                .schema_type(Type::Object)
                .description(Some(
                    "Single-key object mapping a YYYY-MM-DD date to its precipitation",
                ))
                .additional_properties(Some(AdditionalProperties::RefOr(RefOr::T(
                    Schema::Object(prcp.build()),
                ))))
                .max_properties(Some(1))
                .min_properties(Some(1))
                .build(),
        ))
    }
}

impl ToSchema for Precipitation {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Precipitation")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Station {
    pub station_id: String,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct TemperatureObservation {
    /// Observation date (YYYY-MM-DD)
    pub date: String,
    pub tobs: Option<f64>,
}

/// Aggregate temperatures over a date range; all `None` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureStats {
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    /// Rounded to two decimal places
    pub avg_temp: Option<f64>,
}

impl ClimateAccess {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

/// Most recent measurement date, optionally scoped to one station.
async fn latest_date(
    conn: &mut SqliteConnection,
    station_id: Option<&str>,
) -> Result<Option<Date>, Error> {
    let last: Option<String> = match station_id {
        Some(station_id) => {
            sqlx::query_scalar("SELECT MAX(date) FROM measurement WHERE station = ?")
                .bind(station_id)
                .fetch_one(&mut *conn)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT MAX(date) FROM measurement")
                .fetch_one(&mut *conn)
                .await?
        }
    };

    Ok(last.as_deref().map(parse_iso_date).transpose()?)
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn latest_year_precipitation(&self) -> Result<Vec<Precipitation>, Error> {
        let mut conn = self.db.acquire().await?;

        let Some(last_date) = latest_date(&mut conn, None).await? else {
            debug!("no measurements stored, precipitation window is empty");
            return Ok(vec![]);
        };
        let window_start = format_iso_date(trailing_year_start(last_date));
        debug!("precipitation window starts at {}", window_start);

        let readings =
            sqlx::query_as::<_, Precipitation>("SELECT date, prcp FROM measurement WHERE date >= ?")
                .bind(&window_start)
                .fetch_all(&mut *conn)
                .await?;

        Ok(readings)
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let mut conn = self.db.acquire().await?;

        let stations = sqlx::query_as::<_, Station>(
            "SELECT station AS station_id, name, latitude, longitude, elevation FROM station",
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(stations)
    }

    async fn most_active_station_tobs(&self) -> Result<Vec<TemperatureObservation>, Error> {
        let mut conn = self.db.acquire().await?;

        // Ties resolve to whichever group SQLite emits first.
        let most_active: Option<String> = sqlx::query_scalar(
            "SELECT station FROM measurement GROUP BY station ORDER BY COUNT(*) DESC LIMIT 1",
        )
        .fetch_optional(&mut *conn)
        .await?;
        let Some(station_id) = most_active else {
            debug!("no measurements stored, no most active station");
            return Ok(vec![]);
        };

        let Some(last_date) = latest_date(&mut conn, Some(&station_id)).await? else {
            return Ok(vec![]);
        };
        let window_start = format_iso_date(trailing_year_start(last_date));
        debug!(
            "most active station {} window starts at {}",
            station_id, window_start
        );

        let observations = sqlx::query_as::<_, TemperatureObservation>(
            "SELECT date, tobs FROM measurement WHERE station = ? AND date >= ?",
        )
        .bind(&station_id)
        .bind(&window_start)
        .fetch_all(&mut *conn)
        .await?;

        Ok(observations)
    }

    async fn temperature_stats(&self, range: &DateRange) -> Result<TemperatureStats, Error> {
        let mut conn = self.db.acquire().await?;
        let start = format_iso_date(range.start);

        let (max_temp, min_temp, avg_temp): (Option<f64>, Option<f64>, Option<f64>) =
            match range.end {
                Some(end) => {
                    sqlx::query_as(
                        "SELECT CAST(MAX(tobs) AS REAL), CAST(MIN(tobs) AS REAL), AVG(tobs)
                         FROM measurement WHERE date >= ? AND date <= ?",
                    )
                    .bind(&start)
                    .bind(format_iso_date(end))
                    .fetch_one(&mut *conn)
                    .await?
                }
                None => {
                    sqlx::query_as(
                        "SELECT CAST(MAX(tobs) AS REAL), CAST(MIN(tobs) AS REAL), AVG(tobs)
                         FROM measurement WHERE date >= ?",
                    )
                    .bind(&start)
                    .fetch_one(&mut *conn)
                    .await?
                }
            };

        Ok(TemperatureStats {
            max_temp,
            min_temp,
            avg_temp: avg_temp.map(round_hundredths),
        })
    }

    async fn health_check(&self) -> Result<(), Error> {
        self.db
            .health_check()
            .await
            .map_err(|e| Error::Unhealthy(format!("{:#}", e)))
    }
}
