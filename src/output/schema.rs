//! Arrow schema building and JSON <-> Arrow conversion
//!
//! The clean artifact's columns come from an explicit [`SchemaBuilder`] pass
//! over every record, so the column set and types are a pure function of
//! the input:
//!
//! - Columns appear in first-seen order across records
//! - Every column is nullable; a record without a column contributes null
//! - Conflicting types merge (`Null` + T = T, Int64 + Float64 = Float64,
//!   lists and structs merge element-wise, anything else widens to Utf8)

use crate::error::{Error, Result};
use crate::types::JsonObject;
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, LargeStringArray, ListArray,
    NullArray, StringArray, StructArray,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

// ============================================================================
// Schema Builder
// ============================================================================

/// Accumulates column names and types across records
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    columns: Vec<(String, DataType)>,
    positions: HashMap<String, usize>,
}

impl SchemaBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record's fields into the schema
    pub fn observe(&mut self, record: &JsonObject) {
        for (key, value) in record {
            let inferred = infer_type(value);
            match self.positions.get(key) {
                Some(&idx) => {
                    let merged = merge_types(&self.columns[idx].1, &inferred);
                    self.columns[idx].1 = merged;
                }
                None => {
                    self.positions.insert(key.clone(), self.columns.len());
                    self.columns.push((key.clone(), inferred));
                }
            }
        }
    }

    /// Number of columns seen so far
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no column has been seen
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Finish into an Arrow schema
    pub fn build(self) -> Schema {
        let fields: Vec<Field> = self
            .columns
            .into_iter()
            .map(|(name, dtype)| Field::new(name, dtype, true))
            .collect();
        Schema::new(fields)
    }
}

/// Infer an Arrow schema from a set of JSON records
pub fn infer_schema(records: &[&JsonObject]) -> Schema {
    let mut builder = SchemaBuilder::new();
    for record in records {
        builder.observe(record);
    }
    builder.build()
}

/// Infer Arrow DataType from a JSON value
fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        Value::String(_) => DataType::Utf8,
        Value::Array(arr) => {
            let element_type = arr
                .iter()
                .map(infer_type)
                .reduce(|a, b| merge_types(&a, &b))
                .unwrap_or(DataType::Null);
            list_of(element_type)
        }
        // A struct needs at least one child
        Value::Object(obj) if obj.is_empty() => DataType::Utf8,
        Value::Object(obj) => {
            let fields: Vec<Field> = obj
                .iter()
                .map(|(k, v)| Field::new(k, infer_type(v), true))
                .collect();
            DataType::Struct(Fields::from(fields))
        }
    }
}

fn list_of(element_type: DataType) -> DataType {
    DataType::List(Arc::new(Field::new("item", element_type, true)))
}

/// Merge two data types into a compatible type
fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        (a, b) if a == b => a.clone(),

        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        (DataType::List(a), DataType::List(b)) => list_of(merge_types(a.data_type(), b.data_type())),

        (DataType::Struct(a), DataType::Struct(b)) => DataType::Struct(merge_struct_fields(a, b)),

        _ => DataType::Utf8,
    }
}

/// Union of struct children, keeping the left side's order
fn merge_struct_fields(left: &Fields, right: &Fields) -> Fields {
    let mut merged: Vec<Field> = left.iter().map(|f| f.as_ref().clone()).collect();

    for field in right {
        match merged.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => {
                let dtype = merge_types(existing.data_type(), field.data_type());
                *existing = Field::new(existing.name(), dtype, true);
            }
            None => merged.push(field.as_ref().clone()),
        }
    }

    Fields::from(merged)
}

// ============================================================================
// JSON -> Arrow
// ============================================================================

/// Convert JSON records to an Arrow RecordBatch
///
/// Uses the provided schema or builds one from the data.
pub fn json_to_arrow(records: &[&JsonObject], schema: Option<&Schema>) -> Result<RecordBatch> {
    let schema = match schema {
        Some(schema) => schema.clone(),
        None => infer_schema(records),
    };
    let schema = Arc::new(schema);

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let values: Vec<Option<&Value>> = records.iter().map(|r| r.get(field.name())).collect();
        columns.push(build_array(&values, field.data_type())?);
    }

    RecordBatch::try_new(schema, columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

fn is_present(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),

        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        other => Err(Error::output(format!(
            "Unsupported column type for JSON input: {other}"
        ))),
    }
}

/// Build a list array from JSON arrays
fn build_list_array(values: &[Option<&Value>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = Vec::with_capacity(values.len() + 1);
    offsets.push(0);

    for value in values {
        if let Some(Value::Array(arr)) = value {
            items.extend(arr.iter().map(Some));
        }
        let offset = i32::try_from(items.len())
            .map_err(|_| Error::output("Array too large for i32 offset"))?;
        offsets.push(offset);
    }

    let validity: Vec<bool> = values
        .iter()
        .map(|v| matches!(v, Some(Value::Array(_))))
        .collect();

    let items_array = build_array(&items, field.data_type())?;
    let list = ListArray::try_new(
        Arc::clone(field),
        OffsetBuffer::new(offsets.into()),
        items_array,
        Some(NullBuffer::from(validity)),
    )?;
    Ok(Arc::new(list))
}

/// Build a struct array from JSON objects
fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut children: Vec<ArrayRef> = Vec::with_capacity(fields.len());

    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| match v {
                Some(Value::Object(obj)) => obj.get(field.name()),
                _ => None,
            })
            .collect();
        children.push(build_array(&child_values, field.data_type())?);
    }

    let validity: Vec<bool> = values.iter().map(|v| is_present(*v)).collect();
    let array = StructArray::try_new(fields.clone(), children, Some(NullBuffer::from(validity)))?;
    Ok(Arc::new(array))
}

// ============================================================================
// Arrow -> JSON
// ============================================================================

/// Convert an Arrow RecordBatch to JSON records
///
/// Returns one object per row with every column present; nulls become
/// `Value::Null`.
pub fn arrow_to_json(batch: &RecordBatch) -> Result<Vec<JsonObject>> {
    let schema = batch.schema();
    let mut records = Vec::with_capacity(batch.num_rows());

    for row in 0..batch.num_rows() {
        let mut record = JsonObject::new();
        for (col_idx, field) in schema.fields().iter().enumerate() {
            let value = array_value_to_json(batch.column(col_idx).as_ref(), row)?;
            record.insert(field.name().clone(), value);
        }
        records.push(record);
    }

    Ok(records)
}

/// Convert several batches, concatenating their rows
pub fn batches_to_records(batches: &[RecordBatch]) -> Result<Vec<JsonObject>> {
    let mut records = Vec::new();
    for batch in batches {
        records.extend(arrow_to_json(batch)?);
    }
    Ok(records)
}

fn downcast<'a, T: 'static>(array: &'a dyn Array, name: &str) -> Result<&'a T> {
    array
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| Error::output(format!("Failed to downcast to {name}")))
}

/// Convert a single array element to JSON
fn array_value_to_json(array: &dyn Array, row: usize) -> Result<Value> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }

    match array.data_type() {
        DataType::Null => Ok(Value::Null),

        DataType::Boolean => {
            let arr = downcast::<BooleanArray>(array, "BooleanArray")?;
            Ok(Value::Bool(arr.value(row)))
        }

        DataType::Int64 => {
            let arr = downcast::<Int64Array>(array, "Int64Array")?;
            Ok(Value::Number(arr.value(row).into()))
        }

        DataType::Float64 => {
            let arr = downcast::<Float64Array>(array, "Float64Array")?;
            Ok(serde_json::Number::from_f64(arr.value(row)).map_or(Value::Null, Value::Number))
        }

        DataType::Utf8 => {
            let arr = downcast::<StringArray>(array, "StringArray")?;
            Ok(Value::String(arr.value(row).to_string()))
        }

        DataType::LargeUtf8 => {
            let arr = downcast::<LargeStringArray>(array, "LargeStringArray")?;
            Ok(Value::String(arr.value(row).to_string()))
        }

        DataType::List(_) => {
            let arr = downcast::<ListArray>(array, "ListArray")?;
            let values = arr.value(row);
            let items = (0..values.len())
                .map(|i| array_value_to_json(values.as_ref(), i))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(items))
        }

        DataType::Struct(_) => {
            let arr = downcast::<StructArray>(array, "StructArray")?;
            let mut obj = JsonObject::new();
            for (i, field) in arr.fields().iter().enumerate() {
                let val = array_value_to_json(arr.column(i).as_ref(), row)?;
                obj.insert(field.name().clone(), val);
            }
            Ok(Value::Object(obj))
        }

        // Types this crate never writes; render them as text
        _ => Ok(Value::String(array_value_to_string(array, row)?)),
    }
}
