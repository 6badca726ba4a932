//! CSV export of a user's reading history.

use std::io::Write;

use anyhow::Result;
use time::format_description::FormatItem;
use time::macros::format_description;

use water_core::MeterReading;

const DATE_FMT: &'static [FormatItem<'static>] = format_description!("[day]/[month]/[year]");
const TIME_FMT: &'static [FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Writes the history as CSV with one row per reading, newest last.
pub fn write_history_csv<W: Write>(writer: W, history: &[MeterReading]) -> Result<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["date", "time", "source", "amount_liters", "raw_meter_m3"])?;
    for r in history {
        w.write_record([
            r.recorded_at.format(DATE_FMT)?,
            r.recorded_at.format(TIME_FMT)?,
            r.kind.to_string(),
            format!("{}", r.consumption_liters),
            format!("{}", r.raw_m3),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Renders the history CSV into a string, for the export endpoint.
pub fn history_csv_string(history: &[MeterReading]) -> Result<String> {
    let mut buf = Vec::new();
    write_history_csv(&mut buf, history)?;
    Ok(String::from_utf8(buf)?)
}
