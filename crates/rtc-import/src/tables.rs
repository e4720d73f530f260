//! Loading record tables into series and lookup tables.

use rtc_core::{
    DiagnosticsSink, Extrapolation, Interpolation, LookupTable, TimeSeries, parse_period,
};
use rtc_records::{LookupRow, TimeValueRow};

/// Load `(time, value)` rows; later duplicates of a time are dropped with a warning.
pub fn time_series_from_rows(
    subject: &str,
    rows: &[TimeValueRow],
    interpolation: Interpolation,
    extrapolation: Extrapolation,
    sink: &mut dyn DiagnosticsSink,
) -> TimeSeries<f64> {
    let mut series = TimeSeries::new(interpolation, extrapolation);
    for row in rows {
        match series.insert_first(row.time, row.value) {
            Ok(true) => {}
            Ok(false) => sink.warn(
                subject,
                format!("Duplicate time {} in table of '{subject}'; first value kept", row.time),
            ),
            Err(err) => sink.warn(subject, format!("Row of '{subject}' skipped: {err}")),
        }
    }
    series
}

/// Load `(argument, value)` rows; later duplicates of an argument are dropped with a warning.
pub fn lookup_table_from_rows(
    subject: &str,
    rows: &[LookupRow],
    interpolation: Interpolation,
    sink: &mut dyn DiagnosticsSink,
) -> LookupTable {
    let mut table = LookupTable::new(interpolation, Extrapolation::Constant);
    for row in rows {
        match table.insert_first(row.argument, row.value) {
            Ok(true) => {}
            Ok(false) => sink.warn(
                subject,
                format!(
                    "Duplicate argument {} in table of '{subject}'; first value kept",
                    row.argument
                ),
            ),
            Err(err) => sink.warn(subject, format!("Row of '{subject}' skipped: {err}")),
        }
    }
    table
}

/// Make `series` periodic with the legacy period string.
///
/// A missing, unparsable or too short period leaves the series without
/// extrapolation and reports a warning.
pub fn apply_periodic<V>(
    subject: &str,
    series: &mut TimeSeries<V>,
    period: &str,
    sink: &mut dyn DiagnosticsSink,
) {
    let result = match parse_period(period) {
        Ok(Some(period)) => series.set_periodic(period),
        Ok(None) => {
            series.extrapolation = Extrapolation::None;
            sink.warn(
                subject,
                format!("No period given for periodic extrapolation of '{subject}'; extrapolation set to none"),
            );
            return;
        }
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        series.extrapolation = Extrapolation::None;
        sink.warn(subject, format!("{err}; extrapolation of '{subject}' set to none"));
    }
}
