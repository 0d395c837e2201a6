/// Host-facing plugins.
///
/// Architecture:
/// ```text
///   host UI ──► PluginRegistry ──► resolve fields ──► ToolsPlugin::apply(&mut dyn Interface)
///                     │
///                     └─ by extension ──► ImportPlugin::do_import ──► Vec<ImportDataset1D>
/// ```
///
/// Nothing registers itself; the host calls [`crate::register`] once.

pub mod clone_datasets;
pub mod fields;
pub mod linear_fit;
pub mod poly_fit;
pub mod registry;
pub mod spa_import;

use std::path::PathBuf;

use crate::error::Result;
use crate::host::{Interface, SettingValue, WidgetKind};
use fields::{Field, FieldValues};

/// A plugin that operates on the open document.
pub trait ToolsPlugin {
    fn name(&self) -> &'static str;

    /// Menu path under the host's tools menu.
    fn menu(&self) -> Vec<&'static str> {
        vec![self.name()]
    }

    fn description_short(&self) -> &'static str;

    fn description_full(&self) -> &'static str {
        self.description_short()
    }

    fn fields(&self) -> Vec<Field>;

    /// Run the tool. `fields` has already been resolved against [`Self::fields`].
    fn apply(&self, interface: &mut dyn Interface, fields: &FieldValues) -> Result<()>;
}

/// What the host passes to an import plugin.
#[derive(Debug, Clone)]
pub struct ImportParams {
    pub filename: PathBuf,
    pub field_results: FieldValues,
}

/// A named 1-D dataset produced by an import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDataset1D {
    pub name: String,
    pub data: Vec<f64>,
}

impl ImportDataset1D {
    pub fn new(name: &str, data: Vec<f64>) -> Self {
        ImportDataset1D {
            name: name.to_string(),
            data,
        }
    }
}

/// A plugin that turns a file into datasets.
pub trait ImportPlugin {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Lower-case extensions including the dot, e.g. `".spa"`.
    fn file_types(&self) -> &'static [&'static str];

    fn fields(&self) -> Vec<Field>;

    /// A short human-readable summary of the file, and whether it looks importable.
    fn preview(&self, params: &ImportParams) -> (String, bool);

    fn do_import(&self, params: &ImportParams) -> Result<Vec<ImportDataset1D>>;
}

/// Add `page → graph → function` under the document root, plotting `expr`.
/// Returns the path of the new function widget.
pub(crate) fn plot_function(interface: &mut dyn Interface, expr: &str) -> String {
    let page = interface.root_mut().add(WidgetKind::Page);
    let page_name = page.name.clone();
    let graph = page.add(WidgetKind::Graph);
    let graph_name = graph.name.clone();
    let function = graph.add(WidgetKind::Function);
    function.set("function", SettingValue::Text(expr.to_string()));
    format!("/{page_name}/{graph_name}/{}", function.name)
}
