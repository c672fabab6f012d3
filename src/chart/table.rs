//! Tabular chart input in the chart library's DataTable JSON literal form:
//!
//! ```text
//! { "cols": [{ "id": "Start", "label": "", "type": "datetime" }, ...],
//!   "rows": [{ "c": [{ "v": "Mon" }, { "v": "Date(...)", "f": "08:00:00" }] }, ...] }
//! ```

use serde::Serialize;

use crate::codec::ChartTimeValue;
use crate::error::{DashboardError, DashboardResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Datetime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl Column {
    #[must_use]
    pub fn labeled(label: &str, column_type: ColumnType) -> Self {
        Self {
            id: None,
            label: label.to_string(),
            column_type,
        }
    }

    #[must_use]
    pub fn with_id(id: &str, column_type: ColumnType) -> Self {
        Self {
            id: Some(id.to_string()),
            label: String::new(),
            column_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Time(ChartTimeValue),
}

impl CellValue {
    fn column_type(&self) -> ColumnType {
        match self {
            Self::Text(_) => ColumnType::String,
            Self::Time(_) => ColumnType::Datetime,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub v: CellValue,
    /// Display text produced by a column formatter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub c: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataTable {
    cols: Vec<Column>,
    rows: Vec<Row>,
}

impl DataTable {
    #[must_use]
    pub fn new(cols: Vec<Column>) -> Self {
        Self {
            cols,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.cols
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Value at (`row`, `col`), if present.
    #[must_use]
    pub fn value(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.c.get(col).map(|cell| &cell.v)
    }

    /// Append a row; cell count and types must match the columns.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::DataContractViolation` on a shape mismatch.
    pub fn add_row(&mut self, values: Vec<CellValue>) -> DashboardResult<()> {
        if values.len() != self.cols.len() {
            return Err(DashboardError::DataContractViolation(format!(
                "row has {} cells, table has {} columns",
                values.len(),
                self.cols.len()
            )));
        }
        if let Some((index, _)) = values
            .iter()
            .zip(&self.cols)
            .enumerate()
            .find(|(_, (value, col))| value.column_type() != col.column_type)
        {
            return Err(DashboardError::DataContractViolation(format!(
                "cell {index} does not match column type {:?}",
                self.cols[index].column_type
            )));
        }

        self.rows.push(Row {
            c: values.into_iter().map(|v| Cell { v, f: None }).collect(),
        });
        Ok(())
    }

    /// Fill the display text of every time cell in column `col` using a
    /// strftime pattern. Non-time cells are left untouched.
    pub fn format_column(&mut self, col: usize, pattern: &str) {
        for row in &mut self.rows {
            if let Some(cell) = row.c.get_mut(col)
                && let CellValue::Time(time) = &cell.v
            {
                cell.f = Some(time.format(pattern));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::seconds_to_time_of_day;

    fn weekday_table() -> DataTable {
        DataTable::new(vec![
            Column::labeled("Weekday", ColumnType::String),
            Column::with_id("Start", ColumnType::Datetime),
        ])
    }

    #[test]
    fn rejects_rows_of_the_wrong_shape() {
        let mut table = weekday_table();

        let err = table
            .add_row(vec![CellValue::Text("Mon".to_string())])
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataContractViolation(_)));

        let err = table
            .add_row(vec![
                CellValue::Text("Mon".to_string()),
                CellValue::Text("09:00".to_string()),
            ])
            .unwrap_err();
        assert!(matches!(err, DashboardError::DataContractViolation(_)));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn serializes_in_data_table_literal_form() {
        let mut table = weekday_table();
        table
            .add_row(vec![
                CellValue::Text("Mon".to_string()),
                CellValue::Time(seconds_to_time_of_day(28_800.0).unwrap()),
            ])
            .unwrap();
        table.format_column(1, "%H:%M:%S");

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "cols": [
                    { "label": "Weekday", "type": "string" },
                    { "id": "Start", "label": "", "type": "datetime" }
                ],
                "rows": [
                    { "c": [
                        { "v": "Mon" },
                        { "v": "Date(1970, 0, 1, 8, 0, 0, 0)", "f": "08:00:00" }
                    ] }
                ]
            })
        );
    }

    #[test]
    fn formatting_a_text_column_is_a_no_op() {
        let mut table = weekday_table();
        table
            .add_row(vec![
                CellValue::Text("Tue".to_string()),
                CellValue::Time(seconds_to_time_of_day(60.0).unwrap()),
            ])
            .unwrap();
        table.format_column(0, "%H:%M:%S");
        assert_eq!(table.rows()[0].c[0].f, None);
    }
}
