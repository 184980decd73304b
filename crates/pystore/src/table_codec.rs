//! Low-level Parquet encoding of data tables.
//!
//! A table becomes one Parquet file with a nanosecond timestamp column named
//! [`INDEX_COLUMN`] followed by one nullable `Float64` column per value
//! column. A zero-row table is written as a schema-only file so its column
//! names survive the round trip.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray, Float64Array, RecordBatch, TimestampNanosecondArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Float64Type, Schema, SchemaRef, TimeUnit, TimestampNanosecondType};
use chrono::{DateTime, NaiveDateTime};
use hydrostore_obs::DataTable;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::properties::WriterProperties;
use tracing::warn;

use crate::error::StoreError;
use crate::layout::INDEX_COLUMN;

fn index_type() -> DataType {
    DataType::Timestamp(TimeUnit::Nanosecond, None)
}

/// Builds the Arrow schema for a table: the index column followed by the
/// value columns in table order.
pub(crate) fn build_schema(table: &DataTable) -> Schema {
    let mut fields = vec![Field::new(INDEX_COLUMN, index_type(), false)];
    fields.extend(
        table
            .columns()
            .iter()
            .map(|c| Field::new(c.name(), DataType::Float64, true)),
    );
    Schema::new(fields)
}

/// Converts a table into a single [`RecordBatch`] matching `schema`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidTime`] if a timestamp does not fit in
/// nanoseconds since the epoch, or [`StoreError::Parquet`] if the batch
/// cannot be assembled.
pub(crate) fn table_to_record_batch(
    table: &DataTable,
    schema: SchemaRef,
) -> Result<RecordBatch, StoreError> {
    let nanos = table
        .index()
        .iter()
        .map(|t| {
            t.and_utc()
                .timestamp_nanos_opt()
                .ok_or_else(|| StoreError::InvalidTime {
                    reason: format!("{t} is outside the nanosecond timestamp range"),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns: Vec<ArrayRef> = vec![Arc::new(TimestampNanosecondArray::from(nanos))];
    for col in table.columns() {
        columns.push(Arc::new(Float64Array::from(col.values().to_vec())));
    }

    Ok(RecordBatch::try_new(schema, columns)?)
}

/// A table converted to Arrow, ready to be written.
#[derive(Debug)]
pub(crate) struct EncodedTable {
    schema: SchemaRef,
    batch: Option<RecordBatch>,
}

/// Converts `table` to Arrow without touching the filesystem.
///
/// A zero-row table keeps only its schema.
///
/// # Errors
///
/// Returns [`StoreError::InvalidTime`] or [`StoreError::Parquet`] as
/// [`table_to_record_batch`] does.
pub(crate) fn encode_table(table: &DataTable) -> Result<EncodedTable, StoreError> {
    let schema = Arc::new(build_schema(table));
    let batch = if table.is_empty() {
        None
    } else {
        Some(table_to_record_batch(table, Arc::clone(&schema))?)
    };
    Ok(EncodedTable { schema, batch })
}

/// Writes an encoded table to a Parquet file at `path`.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be created, or
/// [`StoreError::Parquet`] if writing fails.
pub(crate) fn write_table(
    path: &Path,
    encoded: &EncodedTable,
    props: WriterProperties,
) -> Result<(), StoreError> {
    let file = std::fs::File::create(path).map_err(|e| StoreError::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, Arc::clone(&encoded.schema), Some(props))?;
    if let Some(batch) = &encoded.batch {
        writer.write(batch)?;
    }
    writer.close()?;
    Ok(())
}

/// Reads a Parquet file written by [`write_table`] back into a table.
///
/// Column names come from the file schema, so a schema-only file yields an
/// empty table with its columns intact. Other numeric columns are cast to
/// `Float64`; non-numeric columns are skipped. Nulls become `NaN`.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be opened,
/// [`StoreError::Parquet`] on decoding failures, or [`StoreError::Table`]
/// if the file has no index column.
pub(crate) fn read_table(path: &Path) -> Result<DataTable, StoreError> {
    let file = std::fs::File::open(path).map_err(|e| StoreError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = Arc::clone(builder.schema());

    let index_pos = schema
        .index_of(INDEX_COLUMN)
        .map_err(|_| StoreError::Table {
            reason: format!("{} has no '{INDEX_COLUMN}' column", path.display()),
        })?;

    let mut value_cols: Vec<(usize, String)> = Vec::new();
    for (i, field) in schema.fields().iter().enumerate() {
        if i == index_pos {
            continue;
        }
        if field.data_type().is_numeric() {
            value_cols.push((i, field.name().clone()));
        } else {
            warn!(
                column = %field.name(),
                datatype = %field.data_type(),
                path = %path.display(),
                "skipping non-numeric column"
            );
        }
    }

    let reader = builder.build()?;
    let batches: Vec<RecordBatch> = reader.collect::<Result<Vec<_>, _>>()?;

    let n_rows: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut index: Vec<NaiveDateTime> = Vec::with_capacity(n_rows);
    let mut values: Vec<Vec<f64>> = vec![Vec::with_capacity(n_rows); value_cols.len()];

    for batch in &batches {
        let ts = cast(batch.column(index_pos), &index_type())?;
        let ts = ts.as_primitive::<TimestampNanosecondType>();
        if ts.null_count() > 0 {
            return Err(StoreError::Table {
                reason: format!("{} has null timestamps", path.display()),
            });
        }
        index.extend(
            ts.values()
                .iter()
                .map(|&n| DateTime::from_timestamp_nanos(n).naive_utc()),
        );

        for ((pos, _), out) in value_cols.iter().zip(values.iter_mut()) {
            let col = cast(batch.column(*pos), &DataType::Float64)?;
            let col = col.as_primitive::<Float64Type>();
            out.extend(col.iter().map(|v| v.unwrap_or(f64::NAN)));
        }
    }

    let columns = value_cols
        .into_iter()
        .map(|(_, name)| name)
        .zip(values)
        .collect();
    Ok(DataTable::new(index, columns)?)
}
