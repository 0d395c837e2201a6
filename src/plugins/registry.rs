use std::path::Path;

use super::fields::FieldValues;
use super::{ImportParams, ImportPlugin, ToolsPlugin};
use crate::error::{Error, Result};
use crate::host::Interface;

/// The set of plugins known to a host session.
#[derive(Default)]
pub struct PluginRegistry {
    tools: Vec<Box<dyn ToolsPlugin>>,
    imports: Vec<Box<dyn ImportPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_tool(&mut self, plugin: Box<dyn ToolsPlugin>) {
        log::debug!("Registered tool plugin '{}'", plugin.name());
        self.tools.push(plugin);
    }

    pub fn register_import(&mut self, plugin: Box<dyn ImportPlugin>) {
        log::debug!("Registered import plugin '{}'", plugin.name());
        self.imports.push(plugin);
    }

    pub fn tools(&self) -> impl Iterator<Item = &dyn ToolsPlugin> {
        self.tools.iter().map(|p| p.as_ref() as &dyn ToolsPlugin)
    }

    pub fn imports(&self) -> impl Iterator<Item = &dyn ImportPlugin> {
        self.imports.iter().map(|p| p.as_ref() as &dyn ImportPlugin)
    }

    pub fn tool(&self, name: &str) -> Option<&dyn ToolsPlugin> {
        self.tools().find(|p| p.name() == name)
    }

    pub fn import(&self, name: &str) -> Option<&dyn ImportPlugin> {
        self.imports().find(|p| p.name() == name)
    }

    /// First import plugin claiming the file's extension (case-insensitive).
    pub fn import_for_path(&self, path: &Path) -> Option<&dyn ImportPlugin> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))?;
        self.imports()
            .find(|p| p.file_types().iter().any(|t| *t == ext))
    }

    /// Resolve `supplied` against the tool's fields and apply it.
    pub fn run_tool(
        &self,
        name: &str,
        interface: &mut dyn Interface,
        supplied: &FieldValues,
    ) -> Result<()> {
        let plugin = self
            .tool(name)
            .ok_or_else(|| Error::Host(format!("no tool plugin named '{name}'")))?;
        let fields = FieldValues::resolve(&plugin.fields(), supplied)?;
        plugin.apply(interface, &fields)
    }

    /// Import `path` with the matching plugin and store every dataset it
    /// produces. Returns the stored names.
    pub fn run_import(
        &self,
        path: &Path,
        interface: &mut dyn Interface,
        supplied: &FieldValues,
    ) -> Result<Vec<String>> {
        let plugin = self.import_for_path(path).ok_or_else(|| {
            Error::Host(format!("no import plugin for {}", path.display()))
        })?;
        let params = ImportParams {
            filename: path.to_path_buf(),
            field_results: FieldValues::resolve(&plugin.fields(), supplied)?,
        };
        let datasets = plugin.do_import(&params)?;
        let mut names = Vec::with_capacity(datasets.len());
        for ds in datasets {
            interface.set_data(&ds.name, ds.data)?;
            names.push(ds.name);
        }
        log::info!(
            "Imported {} with '{}': {:?}",
            path.display(),
            plugin.name(),
            names
        );
        Ok(names)
    }
}
