//! Write events back out in the column layout the loader reads

use super::event::*;
use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_decimal::prelude::ToPrimitive;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

fn events_to_batch(events: &[DisasterEvent]) -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_START_YEAR, DataType::Int64, false),
        Field::new(COL_GROUP, DataType::Utf8, true),
        Field::new(COL_TYPE, DataType::Utf8, true),
        Field::new(COL_EVENT_NAME, DataType::Utf8, true),
        Field::new(COL_ISO, DataType::Utf8, true),
        Field::new(COL_COUNTRY, DataType::Utf8, true),
        Field::new(COL_DEATHS, DataType::Int64, true),
        Field::new(COL_AFFECTED, DataType::Int64, true),
        Field::new(COL_DAMAGE, DataType::Float64, true),
    ]));

    let year_array: ArrayRef = Arc::new(Int64Array::from(
        events.iter().map(|e| e.start_year as i64).collect::<Vec<_>>(),
    ));
    let text = |f: fn(&DisasterEvent) -> Option<&str>| -> ArrayRef {
        Arc::new(StringArray::from(events.iter().map(f).collect::<Vec<_>>()))
    };
    let count = |f: fn(&DisasterEvent) -> Option<u64>| -> ArrayRef {
        Arc::new(Int64Array::from(
            events
                .iter()
                .map(|e| f(e).map(|v| v as i64))
                .collect::<Vec<_>>(),
        ))
    };
    let damage_array: ArrayRef = Arc::new(Float64Array::from(
        events
            .iter()
            .map(|e| e.total_damage.and_then(|d| d.to_f64()))
            .collect::<Vec<_>>(),
    ));

    RecordBatch::try_new(
        schema,
        vec![
            year_array,
            text(|e| e.disaster_group.as_deref()),
            text(|e| e.disaster_type.as_deref()),
            text(|e| e.event_name.as_deref()),
            text(|e| e.iso.as_deref()),
            text(|e| e.country.as_deref()),
            count(|e| e.total_deaths),
            count(|e| e.total_affected),
            damage_array,
        ],
    )
    .context("Failed to create record batch")
}

/// Write events to a Snappy-compressed parquet file
pub fn write_parquet(events: &[DisasterEvent], path: &Path) -> Result<()> {
    let batch = events_to_batch(events)?;

    let file = File::create(path).context("Failed to create parquet file")?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("Failed to create parquet writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;

    info!("Saved {} events to {}", events.len(), path.display());
    Ok(())
}

/// Write events to a CSV file with a header row
pub fn write_csv(events: &[DisasterEvent], path: &Path) -> Result<()> {
    let batch = events_to_batch(events)?;

    let file = File::create(path).context("Failed to create CSV file")?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch).context("Failed to write CSV records")?;

    info!("Saved {} events to {}", events.len(), path.display());
    Ok(())
}
