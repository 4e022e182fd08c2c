use crate::domain::errors::LoadError;
use crate::domain::series::ObservationSeries;
use tracing::warn;

/// Structural checks applied to a series right after load.
///
/// The rate math assumes time moves forward; a recording with a backwards
/// timestamp is rejected outright. Suspect but structurally valid values
/// (non-positive prices) are only logged.
pub struct SeriesValidator;

impl SeriesValidator {
    pub fn validate(series: &ObservationSeries) -> Result<(), LoadError> {
        let mut previous: Option<i64> = None;
        for (index, obs) in series.observations.iter().enumerate() {
            let current = obs.timestamp.timestamp();
            if let Some(prev) = previous {
                if current < prev {
                    return Err(LoadError::NonMonotonicTimestamp {
                        index,
                        previous: prev,
                        current,
                    });
                }
            }
            previous = Some(current);

            for (column, value) in series.schema.columns.iter().zip(&obs.values) {
                if *value <= 0.0 {
                    warn!(
                        "Record {} has non-positive value {} for '{}'; derived ratios will be meaningless",
                        index, value, column.key
                    );
                }
            }
        }
        Ok(())
    }
}
