//! Plugins for an interactive plotting host: linear and polynomial fit tools,
//! a Thermo Scientific OMNIC `.spa` importer and a tool that clones a widget
//! once per replacement dataset.
//!
//! The host owns the document and calls [`register`] once at start-up:
//!
//! ```
//! use plot_plugins::plugins::registry::PluginRegistry;
//!
//! let mut registry = PluginRegistry::new();
//! plot_plugins::register(&mut registry);
//! assert!(registry.tool("Polynomial fit").is_some());
//! ```

pub mod data;
pub mod error;
pub mod host;
pub mod plugins;

pub use error::{Error, Result};

use plugins::clone_datasets::CloneForDatasets;
use plugins::linear_fit::LinearFit;
use plugins::poly_fit::PolynomialFit;
use plugins::registry::PluginRegistry;
use plugins::spa_import::SpaImport;

/// Register every plugin in this crate with the host's registry.
pub fn register(registry: &mut PluginRegistry) {
    registry.register_tool(Box::new(LinearFit));
    registry.register_tool(Box::new(PolynomialFit));
    registry.register_tool(Box::new(CloneForDatasets));
    registry.register_import(Box::new(SpaImport));
}
