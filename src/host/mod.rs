/// The boundary between plugins and the plotting host.
///
/// Plugins only ever see a `&mut dyn Interface`. [`Document`] is an in-memory
/// implementation used for standalone runs and tests.

pub mod document;
pub mod tree;

pub use document::Document;
pub use tree::{Setting, SettingNode, SettingValue, Widget, WidgetKind};

use crate::error::Result;

/// Data access and mutation offered by the host to a running plugin.
pub trait Interface {
    /// Values of the named 1-D dataset.
    fn get_data(&self, name: &str) -> Result<Vec<f64>>;

    /// Create or replace a 1-D dataset.
    fn set_data(&mut self, name: &str, values: Vec<f64>) -> Result<()>;

    /// Names of all datasets currently in the document, sorted.
    fn dataset_names(&self) -> Vec<String>;

    /// Root of the widget tree.
    fn root(&self) -> &Widget;

    fn root_mut(&mut self) -> &mut Widget;
}
