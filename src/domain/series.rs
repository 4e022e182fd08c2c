use chrono::{DateTime, Utc};

/// Whether a price column must be present in every record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requirement {
    Required,
    /// Absent values fall back to the given default so ratio math over
    /// optional series stays well-defined.
    OptionalWithDefault(f64),
}

/// One named price column in the recorded series.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// JSON field name in each record
    pub key: String,
    /// Human-readable label used in charts and CSV headers
    pub label: String,
    pub requirement: Requirement,
}

impl ColumnSpec {
    pub fn required(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            requirement: Requirement::Required,
        }
    }

    pub fn optional(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            requirement: Requirement::OptionalWithDefault(1.0),
        }
    }
}

/// Schema of the price columns expected in each record.
///
/// The first two columns are the spot prices of the pair; every further
/// column is a price-per-share series for one strategy.
#[derive(Debug, Clone)]
pub struct SeriesSchema {
    pub columns: Vec<ColumnSpec>,
}

impl SeriesSchema {
    /// Column set written by the comparison recorder: both spot prices plus
    /// the tracked strategy vaults. Strategies that joined the recording late
    /// are optional and default to 1.0 before their first sample.
    pub fn comparison_default() -> Self {
        Self {
            columns: vec![
                ColumnSpec::required("price0", "Token0 Price"),
                ColumnSpec::required("price1", "Token1 Price"),
                ColumnSpec::required("pricePerShareBlend", "Blend Vault"),
                ColumnSpec::optional("pricePerShareCharm", "Charm Vault"),
                ColumnSpec::optional("pricePerShareVisor", "Visor Vault"),
            ],
        }
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }
}

/// One sampled instant: a timestamp plus values aligned with the schema columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub values: Vec<f64>,
}

/// An ordered recording of observations sharing one schema.
///
/// Immutable after load; every derived series is a pure function of it.
#[derive(Debug, Clone)]
pub struct ObservationSeries {
    pub schema: SeriesSchema,
    pub observations: Vec<Observation>,
}

impl ObservationSeries {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.observations.iter().map(|o| o.timestamp).collect()
    }

    /// Timestamps as fractional epoch seconds, the unit the rate math runs in.
    pub fn epoch_seconds(&self) -> Vec<f64> {
        self.observations
            .iter()
            .map(|o| o.timestamp.timestamp() as f64)
            .collect()
    }

    /// Extracts one column by JSON field name.
    pub fn column(&self, key: &str) -> Option<Vec<f64>> {
        let idx = self.schema.column_index(key)?;
        Some(self.observations.iter().map(|o| o.values[idx]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_series() -> ObservationSeries {
        let schema = SeriesSchema {
            columns: vec![
                ColumnSpec::required("price0", "Token0"),
                ColumnSpec::optional("pps", "Vault"),
            ],
        };
        let observations = vec![
            Observation {
                timestamp: Utc.timestamp_opt(0, 0).unwrap(),
                values: vec![1.0, 1.0],
            },
            Observation {
                timestamp: Utc.timestamp_opt(86_400, 0).unwrap(),
                values: vec![1.1, 1.01],
            },
        ];
        ObservationSeries {
            schema,
            observations,
        }
    }

    #[test]
    fn test_column_extraction() {
        let series = sample_series();
        assert_eq!(series.column("pps"), Some(vec![1.0, 1.01]));
        assert_eq!(series.column("missing"), None);
    }

    #[test]
    fn test_epoch_seconds() {
        let series = sample_series();
        assert_eq!(series.epoch_seconds(), vec![0.0, 86_400.0]);
    }
}
