use crate::error::{BenchError, Result};
use crate::schema::{DataPoint, ResultSeries, SizeRecord};

/// Pivots per-size records into one series per candidate.
///
/// Series follow the candidate order of the first record; each series holds
/// one point per record, in record order. A record without an entry for one
/// of those candidates is an [`BenchError::AggregationInconsistency`].
pub fn aggregate(records: &[SizeRecord]) -> Result<Vec<ResultSeries>> {
    let Some(first) = records.first() else {
        return Ok(Vec::new());
    };

    first
        .per_candidate
        .iter()
        .map(|entry| {
            let results = records
                .iter()
                .map(|record| {
                    record
                        .per_candidate
                        .iter()
                        .find(|c| c.name == entry.name)
                        .map(|c| DataPoint {
                            size: record.size,
                            stats: c.stats.clone(),
                        })
                        .ok_or_else(|| BenchError::AggregationInconsistency {
                            candidate: entry.name.clone(),
                            size: record.size,
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(ResultSeries {
                name: entry.name.clone(),
                results,
            })
        })
        .collect()
}
