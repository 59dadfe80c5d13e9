//! Per-Unit Lag Features

use crate::table::SensorTable;
use data_validator::ValidationError;
use std::num::NonZeroUsize;
use tracing::debug;

/// Name of the lag column for `column`
pub fn lag_column_name(column: &str, lag: NonZeroUsize) -> String {
    format!("{}_lag_{}", column, lag)
}

/// Append `<col>_lag_<n>` for every listed column and drop rows whose lag is
/// undefined.
///
/// The shift is applied within each unit block, so a value never crosses from
/// one unit into the next. The first `lag` rows of each unit are removed; a
/// unit shorter than that disappears entirely.
pub fn add_lag_features<S: AsRef<str>>(
    table: &SensorTable,
    columns: &[S],
    lag: NonZeroUsize,
) -> Result<SensorTable, ValidationError> {
    let n = table.len();
    let shift = lag.get();

    let mut source = vec![None; n];
    for block in table.unit_blocks() {
        for row in block.rows.clone().skip(shift) {
            source[row] = Some(row - shift);
        }
    }
    let keep: Vec<bool> = source.iter().map(Option::is_some).collect();

    let mut lagged = table.clone();
    for column in columns {
        let column = column.as_ref();
        let values = table.column(column)?;
        let shifted = source
            .iter()
            .map(|src| src.map_or(f64::NAN, |i| values[i]))
            .collect();
        lagged = lagged.with_column(lag_column_name(column, lag), shifted)?;
    }

    let out = lagged.retain_rows(&keep);
    debug!(
        "Added {} lag-{} columns, kept {} of {} rows",
        columns.len(),
        shift,
        out.len(),
        n
    );
    Ok(out)
}
