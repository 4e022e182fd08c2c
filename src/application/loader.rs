use crate::domain::errors::LoadError;
use crate::domain::series::{Observation, ObservationSeries, Requirement, SeriesSchema};
use crate::domain::validation::SeriesValidator;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

/// Reads a recorded observation series from a JSON file.
///
/// The file is one JSON array of objects, or one object per line. Each
/// object carries a `timestamp`
/// plus the price columns named by the schema; the recorder writes prices
/// as JSON numbers or decimal strings interchangeably, so both are
/// accepted. Optional columns fall back to their declared default.
pub struct SeriesLoader {
    schema: SeriesSchema,
}

impl SeriesLoader {
    pub fn new(schema: SeriesSchema) -> Self {
        Self { schema }
    }

    pub fn load(&self, path: &Path) -> Result<ObservationSeries, LoadError> {
        let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let records = parse_records(path, &raw)?;

        if records.is_empty() {
            return Err(LoadError::EmptySeries {
                path: path.to_path_buf(),
            });
        }

        let mut observations = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            observations.push(self.parse_record(index, record)?);
        }

        let series = ObservationSeries {
            schema: self.schema.clone(),
            observations,
        };
        SeriesValidator::validate(&series)?;

        info!(
            "Loaded {} observations with {} price columns from {}",
            series.len(),
            series.schema.columns.len(),
            path.display()
        );
        Ok(series)
    }

    fn parse_record(&self, index: usize, record: &Value) -> Result<Observation, LoadError> {
        let object = record
            .as_object()
            .ok_or(LoadError::NotAnObject { index })?;

        let timestamp_raw = object
            .get("timestamp")
            .ok_or_else(|| LoadError::MissingField {
                index,
                field: "timestamp".to_string(),
            })?;
        let timestamp = parse_timestamp(index, timestamp_raw)?;

        let mut values = Vec::with_capacity(self.schema.columns.len());
        for column in &self.schema.columns {
            let value = match (object.get(&column.key), column.requirement) {
                (Some(raw), _) => numeric_field(index, &column.key, raw)?,
                (None, Requirement::OptionalWithDefault(default)) => default,
                (None, Requirement::Required) => {
                    return Err(LoadError::MissingField {
                        index,
                        field: column.key.clone(),
                    });
                }
            };
            values.push(value);
        }

        Ok(Observation { timestamp, values })
    }
}

/// The recorder writes one JSON array; hand-edited recordings sometimes
/// arrive as one object per line instead, so both layouts parse.
fn parse_records(path: &Path, raw: &str) -> Result<Vec<Value>, LoadError> {
    let json_err = |source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    };

    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw).map_err(json_err);
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| serde_json::from_str(line).map_err(json_err))
        .collect()
}

/// Accepts a price as a JSON number or a numeric string.
fn numeric_field(index: usize, field: &str, raw: &Value) -> Result<f64, LoadError> {
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| LoadError::NonNumericField {
        index,
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Accepts a timestamp as epoch seconds (number or numeric string) or an
/// ISO-8601 datetime/date string.
fn parse_timestamp(index: usize, raw: &Value) -> Result<DateTime<Utc>, LoadError> {
    let bad = || LoadError::BadTimestamp {
        index,
        value: raw.to_string(),
    };

    match raw {
        Value::Number(n) => {
            let seconds = n.as_i64().ok_or_else(bad)?;
            DateTime::from_timestamp(seconds, 0).ok_or_else(bad)
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(seconds) = s.parse::<i64>() {
                return DateTime::from_timestamp(seconds, 0).ok_or_else(bad);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                return Ok(naive.and_utc());
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                let naive = date.and_hms_opt(0, 0, 0).ok_or_else(bad)?;
                return Ok(naive.and_utc());
            }
            Err(bad())
        }
        _ => Err(bad()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_fixture(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("perfchart_loader_{}_{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_defaults_optional_columns() {
        let path = write_fixture(
            "optional.json",
            r#"[
                {"timestamp": 0, "price0": 1.0, "price1": "2000.5", "pricePerShareBlend": "1.0"},
                {"timestamp": 86400, "price0": 1.0, "price1": 2100, "pricePerShareBlend": "1.01", "pricePerShareCharm": "1.002"}
            ]"#,
        );

        let loader = SeriesLoader::new(SeriesSchema::comparison_default());
        let series = loader.load(&path).unwrap();

        assert_eq!(series.len(), 2);
        // Charm is absent from the first record and defaults to 1.0
        assert_eq!(series.column("pricePerShareCharm").unwrap(), vec![1.0, 1.002]);
        // String-encoded prices parse like numeric ones
        assert_eq!(series.column("price1").unwrap(), vec![2000.5, 2100.0]);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_rejects_missing_required_field() {
        let path = write_fixture(
            "missing.json",
            r#"[{"timestamp": 0, "price0": 1.0, "price1": 2000}]"#,
        );

        let loader = SeriesLoader::new(SeriesSchema::comparison_default());
        let err = loader.load(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField { index: 0, ref field } if field == "pricePerShareBlend"
        ));

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_accepts_one_object_per_line() {
        let path = write_fixture(
            "lines.json",
            "{\"timestamp\": 0, \"price0\": 1, \"price1\": 2000, \"pricePerShareBlend\": 1.0}\n\
             {\"timestamp\": 60, \"price0\": 1, \"price1\": 2001, \"pricePerShareBlend\": 1.0}\n",
        );

        let loader = SeriesLoader::new(SeriesSchema::comparison_default());
        let series = loader.load(&path).unwrap();
        assert_eq!(series.len(), 2);

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_rejects_empty_file() {
        let path = write_fixture("empty.json", "[]");

        let loader = SeriesLoader::new(SeriesSchema::comparison_default());
        assert!(matches!(
            loader.load(&path),
            Err(LoadError::EmptySeries { .. })
        ));

        fs::remove_file(path).ok();
    }

    #[test]
    fn test_timestamp_formats() {
        for (name, raw) in [
            ("epoch_num", json!(1633622400)),
            ("epoch_str", json!("1633622400")),
            ("rfc3339", json!("2021-10-07T16:00:00Z")),
            ("naive", json!("2021-10-07T16:00:00")),
        ] {
            let parsed = parse_timestamp(0, &raw)
                .unwrap_or_else(|e| panic!("{} failed: {}", name, e));
            assert_eq!(parsed.timestamp(), 1_633_622_400, "{}", name);
        }

        let date_only = parse_timestamp(0, &json!("2021-10-07")).unwrap();
        assert_eq!(date_only.timestamp(), 1_633_564_800);

        assert!(parse_timestamp(0, &json!("not a time")).is_err());
        assert!(parse_timestamp(0, &json!(true)).is_err());
    }
}
