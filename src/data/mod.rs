/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, repair zip codes, attach colours → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  day → schedule codes, + neighborhoods → active indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  mode, cross-tab, category shares, map centre
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ dashboard  │  guarded render specs for the map, charts and table
///   └───────────┘
/// ```

pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod test_support {
    use super::model::{Record, ScheduleCode};

    /// A minimal record in `neighborhood` with schedule token `code`.
    pub fn record(neighborhood: &str, code: &str) -> Record {
        let schedule = ScheduleCode::parse(code);
        Record {
            full_address: format!("1 {neighborhood} St"),
            mailing_neighborhood: neighborhood.to_string(),
            zip_code: "02116".to_string(),
            pwd_district: None,
            recollect: None,
            trashday: code.to_string(),
            schedule,
            x_coord: -71.0,
            y_coord: 42.0,
            color: schedule.map(ScheduleCode::rgb),
        }
    }
}
