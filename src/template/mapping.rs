//! Caller-supplied mapping of placeholder names to values.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Mapping-specific error type
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Mapping must be a JSON object")]
    NotAnObject,
}

/// Placeholder name → value. Scalars substitute into text; objects are
/// table specs.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    values: Map<String, Value>,
}

impl Mapping {
    pub fn from_value(value: Value) -> Result<Self, MappingError> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(MappingError::NotAnObject),
        }
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, MappingError> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Replacement text for a key; `None` when the key is absent or the
    /// value is not a scalar
    pub fn scalar(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(render_scalar)
    }

    /// Table spec stored under a key, if it is a well-formed one
    pub fn table_spec(&self, key: &str) -> Option<TableSpec> {
        self.values.get(key).and_then(TableSpec::from_value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for Mapping {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// String form of a scalar; booleans render as `True`/`False`, null renders
/// empty, objects and arrays are not scalars
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("True".to_string()),
        Value::Bool(false) => Some("False".to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Text of a single table cell, accepted from any JSON scalar
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct CellText(pub String);

impl TryFrom<Value> for CellText {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        render_scalar(&value)
            .map(CellText)
            .ok_or_else(|| "table cells must be scalars".to_string())
    }
}

/// `{headers: [..], rows: [[..], ..]}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenericTable {
    #[serde(default)]
    pub headers: Vec<CellText>,
    #[serde(default)]
    pub rows: Vec<Vec<CellText>>,
}

/// `{years: [..], rows: [{item, values: [..]}, ..]}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FinancialTable {
    pub years: Vec<CellText>,
    pub rows: Vec<FinancialRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FinancialRow {
    #[serde(default)]
    pub item: CellText,
    #[serde(default)]
    pub values: Vec<CellText>,
}

/// Structured table content found in the mapping
#[derive(Debug, Clone, PartialEq)]
pub enum TableSpec {
    Generic(GenericTable),
    Financial(FinancialTable),
}

impl TableSpec {
    /// Classify and parse a table spec. Anything malformed yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if object.contains_key("years") && object.contains_key("rows") {
            return serde_json::from_value(value.clone())
                .ok()
                .map(TableSpec::Financial);
        }
        if object.get("rows").is_some_and(Value::is_array) {
            return serde_json::from_value(value.clone())
                .ok()
                .map(TableSpec::Generic);
        }
        None
    }

    pub fn kind(&self) -> TableKind {
        match self {
            TableSpec::Generic(_) => TableKind::Generic,
            TableSpec::Financial(_) => TableKind::Financial,
        }
    }

    /// Column count of the table this spec builds
    pub fn columns(&self) -> usize {
        match self {
            TableSpec::Generic(table) => table.headers.len(),
            TableSpec::Financial(table) => 1 + table.years.len(),
        }
    }

    /// Header row followed by data rows, each exactly `columns()` wide
    pub fn grid(&self) -> Vec<Vec<String>> {
        let columns = self.columns();
        let mut grid = Vec::new();

        match self {
            TableSpec::Generic(table) => {
                grid.push(fit_row(table.headers.iter().cloned(), columns));
                for row in &table.rows {
                    grid.push(fit_row(row.iter().cloned(), columns));
                }
            }
            TableSpec::Financial(table) => {
                let header = std::iter::once(CellText::default()).chain(table.years.iter().cloned());
                grid.push(fit_row(header, columns));
                for row in &table.rows {
                    let cells = std::iter::once(row.item.clone()).chain(row.values.iter().cloned());
                    grid.push(fit_row(cells, columns));
                }
            }
        }
        grid
    }
}

/// Table flavour, used for logging and metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Generic,
    Financial,
}

impl TableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Generic => "generic",
            TableKind::Financial => "financial",
        }
    }
}

/// Clip or pad a row to exactly `columns` cells
fn fit_row(cells: impl Iterator<Item = CellText>, columns: usize) -> Vec<String> {
    let mut row: Vec<String> = cells.take(columns).map(|cell| cell.0).collect();
    row.resize(columns, String::new());
    row
}
