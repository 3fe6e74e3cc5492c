use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{EnergyUnit, ExcitationLine, LineSet};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an excitation table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – header row, then alternating strength / energy columns
/// * `.json`         – `[[{ "oscillator_strength": f, "transition_energy": f }, ...], ...]`
/// * `.parquet`      – flat numeric columns alternating strength / energy
///
/// The energy unit is guessed from the first energy value (see
/// [`EnergyUnit::detect`]); override it with [`LineSet::with_source_unit`].
pub fn load_file(path: &Path) -> Result<LineSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let lines = match ext.as_str() {
        "csv" | "txt" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(Error::malformed(
            None,
            format!("unsupported file extension: .{other}"),
        )),
    }?;

    log::info!(
        "Loaded {} excitation lines in {} rows from {} (energies in {})",
        lines.len(),
        lines.row_count(),
        path.display(),
        lines.source_unit()
    );
    Ok(lines)
}

/// Unit of a freshly parsed table, guessed from its first energy.
fn detected_unit(rows: &[Vec<ExcitationLine>]) -> EnergyUnit {
    rows.iter()
        .flatten()
        .next()
        .map(|line| EnergyUnit::detect(line.transition_energy))
        .unwrap_or(EnergyUnit::ElectronVolt)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<LineSet> {
    let file = std::fs::File::open(path)?;
    parse_csv(file)
}

/// CSV layout:  header row with column names
/// `oscillator_strength_1, wavelength_1, oscillator_strength_2, wavelength_2, ...`
/// and one snapshot per data row holding interleaved numeric pairs:
///   `2.3247,535.23,0.1338,339.79`
///
/// Ragged rows and empty or non-numeric cells are rejected.
pub fn parse_csv<R: Read>(input: R) -> Result<LineSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(Error::malformed(None, "missing header row"));
    }
    if headers.iter().any(|h| h.parse::<f64>().is_ok()) {
        return Err(Error::malformed(
            None,
            "header row contains numbers; the first line must name the columns",
        ));
    }
    if headers.len() % 2 != 0 {
        return Err(Error::malformed(
            None,
            format!(
                "header has {} columns; expected strength/energy pairs",
                headers.len()
            ),
        ));
    }

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row_no = i + 1;
        let record = result?;

        if record.len() != headers.len() {
            return Err(Error::malformed(
                Some(row_no),
                format!("expected {} cells, found {}", headers.len(), record.len()),
            ));
        }

        let values = record
            .iter()
            .enumerate()
            .map(|(col, cell)| parse_cell(cell, row_no, &headers[col]))
            .collect::<Result<Vec<f64>>>()?;

        rows.push(
            values
                .chunks_exact(2)
                .map(|pair| ExcitationLine::new(pair[0], pair[1]))
                .collect(),
        );
    }

    let unit = detected_unit(&rows);
    Ok(LineSet::from_rows(rows, unit))
}

fn parse_cell(cell: &str, row: usize, column: &str) -> Result<f64> {
    if cell.is_empty() {
        return Err(Error::malformed(Some(row), format!("column '{column}' is empty")));
    }
    cell.parse::<f64>().map_err(|_| {
        Error::malformed(
            Some(row),
            format!("column '{column}': '{cell}' is not a number"),
        )
    })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema, one inner array per snapshot:
///
/// ```json
/// [
///   [
///     { "oscillator_strength": 2.32, "transition_energy": 535.2 },
///     { "oscillator_strength": 0.13, "transition_energy": 339.8 }
///   ],
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LineSet> {
    let text = std::fs::read_to_string(path)?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<LineSet> {
    let rows: Vec<Vec<ExcitationLine>> = serde_json::from_str(text)?;
    let unit = detected_unit(&rows);
    Ok(LineSet::from_rows(rows, unit))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one snapshot per row.
///
/// Expected schema: an even number of numeric columns (Float64, Float32,
/// Int64 or Int32) alternating oscillator strength and energy, as written by
/// `df.to_parquet()` from the same wide table the CSV loader reads.
fn load_parquet(path: &Path) -> Result<LineSet> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let n_cols = batch.num_columns();
        if n_cols == 0 || n_cols % 2 != 0 {
            return Err(Error::malformed(
                None,
                format!("parquet file has {n_cols} columns; expected strength/energy pairs"),
            ));
        }

        let names: Vec<String> = batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();

        for row in 0..batch.num_rows() {
            let row_no = rows.len() + 1;
            let values = (0..n_cols)
                .map(|col| extract_f64(batch.column(col), row, row_no, &names[col]))
                .collect::<Result<Vec<f64>>>()?;

            rows.push(
                values
                    .chunks_exact(2)
                    .map(|pair| ExcitationLine::new(pair[0], pair[1]))
                    .collect(),
            );
        }
    }

    let unit = detected_unit(&rows);
    Ok(LineSet::from_rows(rows, unit))
}

// -- Parquet / Arrow helpers --

/// Read a single numeric cell as `f64`.
fn extract_f64(col: &Arc<dyn Array>, row: usize, row_no: usize, name: &str) -> Result<f64> {
    if col.is_null(row) {
        return Err(Error::malformed(Some(row_no), format!("column '{name}' is null")));
    }

    let value = match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        other => {
            return Err(Error::malformed(
                Some(row_no),
                format!("column '{name}' has type {other:?}, expected a number"),
            ))
        }
    };

    value.ok_or_else(|| {
        Error::malformed(
            Some(row_no),
            format!("column '{name}' does not match its declared type"),
        )
    })
}
