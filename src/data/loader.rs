//! Data loader for EM-DAT exports in CSV or Parquet form

use super::event::*;
use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Seek;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Loader for a single EM-DAT data file
pub struct DataLoader {
    path: PathBuf,
}

impl DataLoader {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load every event that carries a start year
    pub fn load(&self) -> Result<Dataset> {
        if !self.path.exists() {
            bail!(
                "Data file '{}' not found. Place it next to the dashboard or point data.path at it",
                self.path.display()
            );
        }

        let batches = if self.is_parquet() {
            self.read_parquet()?
        } else {
            self.read_csv()?
        };

        let mut events = Vec::new();
        let mut dropped = 0;
        for batch in &batches {
            dropped += process_batch(batch, &mut events)?;
        }

        if events.is_empty() {
            bail!(
                "Data file '{}' contains no events with a start year",
                self.path.display()
            );
        }

        info!(
            "Loaded {} events from {} ({} rows without a start year dropped)",
            events.len(),
            self.path.display(),
            dropped
        );

        Ok(Dataset::new(events, self.path.clone()))
    }

    fn is_parquet(&self) -> bool {
        self.path
            .extension()
            .map_or(false, |e| e.eq_ignore_ascii_case("parquet"))
    }

    fn read_csv(&self) -> Result<Vec<RecordBatch>> {
        let mut file = File::open(&self.path).context("Failed to open CSV file")?;

        let (schema, rows) = Format::default()
            .with_header(true)
            .infer_schema(&mut file, None)
            .context("Failed to infer CSV schema")?;
        debug!("Inferred {} columns over {} rows", schema.fields().len(), rows);

        file.rewind().context("Failed to rewind CSV file")?;

        let reader = ReaderBuilder::new(Arc::new(schema))
            .with_header(true)
            .build(file)
            .context("Failed to build CSV reader")?;

        reader
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read CSV records")
    }

    fn read_parquet(&self) -> Result<Vec<RecordBatch>> {
        let file = File::open(&self.path).context("Failed to open parquet file")?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let reader = builder.build()?;

        reader
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read parquet records")
    }
}

/// Append the batch's usable rows to `events`, returning how many were dropped
fn process_batch(batch: &RecordBatch, events: &mut Vec<DisasterEvent>) -> Result<usize> {
    let years = float_column(batch, COL_START_YEAR)?;
    let groups = text_column(batch, COL_GROUP)?;
    let types = text_column(batch, COL_TYPE)?;
    let countries = text_column(batch, COL_COUNTRY)?;
    let isos = text_column(batch, COL_ISO)?;
    let deaths = float_column(batch, COL_DEATHS)?;
    let affected = float_column(batch, COL_AFFECTED)?;
    let damage = float_column(batch, COL_DAMAGE)?;

    // Event names are sparse and some exports leave the column out
    let names = if batch.column_by_name(COL_EVENT_NAME).is_some() {
        text_column(batch, COL_EVENT_NAME)?
    } else {
        vec![None; batch.num_rows()]
    };

    let mut dropped = 0;
    for i in 0..batch.num_rows() {
        let start_year = match years[i].filter(|y| y.is_finite()) {
            Some(year) => year.trunc() as i32,
            None => {
                dropped += 1;
                continue;
            }
        };

        events.push(DisasterEvent {
            start_year,
            disaster_group: groups[i].clone(),
            disaster_type: types[i].clone(),
            country: countries[i].clone(),
            iso: isos[i].clone(),
            event_name: names[i].clone(),
            total_deaths: to_count(deaths[i]),
            total_affected: to_count(affected[i]),
            total_damage: damage[i]
                .filter(|v| v.is_finite())
                .and_then(|v| Decimal::try_from(v).ok()),
        });
    }

    Ok(dropped)
}

fn to_count(value: Option<f64>) -> Option<u64> {
    value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.trunc() as u64)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .context(format!("Missing {} column", name))
}

/// Read a column of any numeric or text type as floats; unparsable values become null
fn float_column(batch: &RecordBatch, name: &str) -> Result<Vec<Option<f64>>> {
    let casted = cast(column(batch, name)?, &DataType::Float64)
        .context(format!("{} column is not numeric", name))?;
    let values = casted
        .as_any()
        .downcast_ref::<Float64Array>()
        .context(format!("{} column is not Float64", name))?;

    Ok(values.iter().collect())
}

/// Read a column as trimmed text; empty strings become null
fn text_column(batch: &RecordBatch, name: &str) -> Result<Vec<Option<String>>> {
    let casted = cast(column(batch, name)?, &DataType::Utf8)
        .context(format!("{} column is not text", name))?;
    let values = casted
        .as_any()
        .downcast_ref::<StringArray>()
        .context(format!("{} column is not String", name))?;

    Ok((0..values.len())
        .map(|i| {
            if values.is_null(i) {
                return None;
            }
            let value = values.value(i).trim();
            (!value.is_empty()).then(|| value.to_string())
        })
        .collect())
}
