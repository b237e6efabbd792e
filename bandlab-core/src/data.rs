//! Candle loading from CSV.
//!
//! Expected header: `open_time,close_time,open,high,low,close`, timestamps in
//! RFC 3339. Rows are numbered from 1, not counting the header.

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::domain::Candle;
use crate::error::DataError;

/// Load and validate candles from a CSV file.
pub fn load_candles_csv(path: &Path) -> Result<Vec<Candle>, DataError> {
    let file = std::fs::File::open(path)?;
    let candles = parse_candles_csv(file)?;
    debug!(path = %path.display(), candles = candles.len(), "loaded candles");
    Ok(candles)
}

/// Parse candles from any CSV reader.
///
/// Rejects a row that fails [`Candle::is_sane`] or opens before the row above.
pub fn parse_candles_csv<R: Read>(reader: R) -> Result<Vec<Candle>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut candles: Vec<Candle> = Vec::new();

    for (i, record) in rdr.deserialize::<Candle>().enumerate() {
        let row = i + 1;
        let candle = record?;
        if !candle.is_sane() {
            return Err(DataError::InsaneCandle { row });
        }
        if let Some(prev) = candles.last() {
            if candle.open_time < prev.open_time {
                return Err(DataError::OutOfOrder { row });
            }
        }
        candles.push(candle);
    }

    Ok(candles)
}
