use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use super::tree::{Widget, WidgetKind};
use super::Interface;
use crate::error::{Error, Result};

/// In-memory document: a widget tree plus named 1-D datasets.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    root: Widget,
    datasets: BTreeMap<String, Vec<f64>>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            root: Widget::new("", WidgetKind::Document),
            datasets: BTreeMap::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, name: &str, values: Vec<f64>) -> Self {
        self.datasets.insert(name.to_string(), values);
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the named datasets as CSV columns, padding short columns with
    /// empty cells.
    pub fn export_csv<W: Write>(&self, names: &[&str], out: W) -> Result<()> {
        let columns = names
            .iter()
            .map(|name| self.dataset(name))
            .collect::<Result<Vec<_>>>()?;
        let rows = columns.iter().map(|c| c.len()).max().unwrap_or(0);

        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(names).map_err(csv_error)?;
        for row in 0..rows {
            let record: Vec<String> = columns
                .iter()
                .map(|c| c.get(row).map(|v| v.to_string()).unwrap_or_default())
                .collect();
            writer.write_record(&record).map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn dataset(&self, name: &str) -> Result<&Vec<f64>> {
        self.datasets
            .get(name)
            .ok_or_else(|| Error::Host(format!("no dataset named '{name}'")))
    }
}

fn csv_error(err: csv::Error) -> Error {
    match err.into_kind() {
        csv::ErrorKind::Io(io) => Error::Io(io),
        other => Error::Host(format!("CSV export failed: {other:?}")),
    }
}

impl Interface for Document {
    fn get_data(&self, name: &str) -> Result<Vec<f64>> {
        self.dataset(name).cloned()
    }

    fn set_data(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::Host("dataset name must not be empty".into()));
        }
        self.datasets.insert(name.to_string(), values);
        Ok(())
    }

    fn dataset_names(&self) -> Vec<String> {
        self.datasets.keys().cloned().collect()
    }

    fn root(&self) -> &Widget {
        &self.root
    }

    fn root_mut(&mut self) -> &mut Widget {
        &mut self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datasets_round_trip_through_interface() {
        let mut doc = Document::new();
        doc.set_data("x", vec![1.0, 2.0]).unwrap();
        assert_eq!(doc.get_data("x").unwrap(), vec![1.0, 2.0]);
        assert!(matches!(doc.get_data("nope"), Err(Error::Host(_))));
        assert!(doc.set_data("", vec![]).is_err());
    }

    #[test]
    fn names_are_sorted() {
        let doc = Document::new()
            .with_dataset("b", vec![])
            .with_dataset("a", vec![]);
        assert_eq!(doc.dataset_names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn csv_export_pads_short_columns() {
        let doc = Document::new()
            .with_dataset("x", vec![1.0, 2.0, 3.0])
            .with_dataset("y", vec![0.5]);
        let mut out = Vec::new();
        doc.export_csv(&["x", "y"], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "x,y\n1,0.5\n2,\n3,\n");
    }

    #[test]
    fn json_contains_tree_and_data() {
        let mut doc = Document::new().with_dataset("x", vec![1.0]);
        doc.root_mut().add(WidgetKind::Page);
        let json = doc.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["root"]["children"][0]["name"], "page1");
        assert_eq!(value["datasets"]["x"][0], 1.0);
    }
}
