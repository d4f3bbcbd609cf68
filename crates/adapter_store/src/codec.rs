//! CSV encoding of price histories and trial tables.
//!
//! Both formats carry a leading label column:
//! - price history: first column holds the row label (usually a date), the
//!   remaining columns are asset prices
//! - trial table: first column holds the trial index under an empty header,
//!   the remaining columns are final prices with two decimals

use sim_core::history::PriceHistory;
use sim_paths::TrialResultTable;

use crate::error::CodecError;

/// A decoded document: data column names, row labels and numeric rows.
struct LabelledTable {
    columns: Vec<String>,
    labels: Vec<String>,
    rows: Vec<Vec<f64>>,
}

fn read_labelled(bytes: &[u8]) -> Result<LabelledTable, CodecError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let header = reader.headers()?.clone();
    if header.is_empty() {
        return Err(CodecError::MissingHeader);
    }
    if header.len() < 2 {
        return Err(CodecError::NoDataColumns);
    }
    let columns: Vec<String> = header.iter().skip(1).map(str::to_string).collect();

    let mut labels = Vec::new();
    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != header.len() {
            return Err(CodecError::RaggedRow {
                row: row_idx,
                got: record.len(),
                expected: header.len(),
            });
        }

        labels.push(record.get(0).unwrap_or_default().to_string());
        let row = record
            .iter()
            .skip(1)
            .zip(&columns)
            .map(|(cell, column)| {
                cell.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| CodecError::InvalidNumber {
                        row: row_idx,
                        column: column.clone(),
                        value: cell.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }

    Ok(LabelledTable {
        columns,
        labels,
        rows,
    })
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, CodecError> {
    writer
        .into_inner()
        .map_err(|e| CodecError::Output(e.error().to_string()))
}

/// Decodes a historical price table.
///
/// # Errors
///
/// - `CodecError::Csv` for malformed CSV
/// - `CodecError::MissingHeader` / `CodecError::NoDataColumns` for an
///   unusable header
/// - `CodecError::RaggedRow` / `CodecError::InvalidNumber` for bad rows,
///   including empty, `NaN` and infinite cells
/// - `CodecError::Table` if the table violates a price invariant
///
/// # Examples
///
/// ```rust
/// use adapter_store::codec::decode_price_history;
///
/// let csv = b"Date,AAPL,MSFT\n2024-01-02,185.6,370.9\n2024-01-03,184.2,370.6\n";
/// let history = decode_price_history(csv).unwrap();
///
/// assert_eq!(history.assets(), &["AAPL".to_string(), "MSFT".to_string()]);
/// assert_eq!(history.labels()[1], "2024-01-03");
/// ```
pub fn decode_price_history(bytes: &[u8]) -> Result<PriceHistory, CodecError> {
    let table = read_labelled(bytes)?;
    Ok(PriceHistory::new(table.columns, table.labels, table.rows)?)
}

/// Decodes a worker's trial table. The index column is ignored.
///
/// # Errors
///
/// Same as [`decode_price_history`]; a header without asset columns maps to
/// `CodecError::NoDataColumns`.
pub fn decode_trial_table(bytes: &[u8]) -> Result<TrialResultTable, CodecError> {
    let table = read_labelled(bytes)?;
    Ok(TrialResultTable::from_rows(table.columns, table.rows)?)
}

/// Encodes a trial table with a leading trial-index column and values
/// printed with two decimals.
///
/// # Errors
///
/// `CodecError::Csv` or `CodecError::Output` if writing fails.
///
/// # Examples
///
/// ```rust
/// use adapter_store::codec::encode_trial_table;
/// use sim_paths::TrialResultTable;
///
/// let table = TrialResultTable::from_rows(
///     vec!["AAPL".to_string()],
///     vec![vec![101.5], vec![99.0]],
/// )
/// .unwrap();
///
/// let csv = String::from_utf8(encode_trial_table(&table).unwrap()).unwrap();
/// assert_eq!(csv, ",AAPL\n0,101.50\n1,99.00\n");
/// ```
pub fn encode_trial_table(table: &TrialResultTable) -> Result<Vec<u8>, CodecError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![String::new()];
    header.extend(table.assets().iter().cloned());
    writer.write_record(&header)?;

    for (idx, row) in table.rows().enumerate() {
        let mut record = vec![idx.to_string()];
        record.extend(row.iter().map(|v| format!("{:.2}", v)));
        writer.write_record(&record)?;
    }

    finish(writer)
}
