use super::fields::{Field, FieldValues};
use super::ToolsPlugin;
use crate::data::expand::{expand_patterns, pair};
use crate::error::{Error, Result};
use crate::host::tree::split_path;
use crate::host::Interface;

/// Clones a widget once per dataset replacement, rewriting the dataset
/// references inside each copy.
#[derive(Debug, Default)]
pub struct CloneForDatasets;

impl ToolsPlugin for CloneForDatasets {
    fn name(&self) -> &'static str {
        "Clone for datasets"
    }

    fn menu(&self) -> Vec<&'static str> {
        vec!["Widgets", "Clone for datasets"]
    }

    fn description_short(&self) -> &'static str {
        "Make copies of a widget for other datasets"
    }

    fn description_full(&self) -> &'static str {
        "Clone a widget and its children once for each replacement dataset. \
         Every reference to the first or second dataset inside a copy is changed \
         to the replacement. Replacements may use * and ? wildcards. If one list \
         is shorter than the other it is repeated."
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::widget("widget", "Widget to clone"),
            Field::dataset("ds1", "Dataset 1 to change"),
            Field::dataset_multi("ds1repl", "Replacement(s) for dataset 1"),
            Field::dataset("ds2", "Dataset 2 to change (optional)"),
            Field::dataset_multi("ds2repl", "Replacement(s) for dataset 2"),
            Field::bool("names", "Create new names", false),
        ]
    }

    fn apply(&self, interface: &mut dyn Interface, fields: &FieldValues) -> Result<()> {
        let path = fields.text("widget")?;
        let (parent_path, _) = split_path(path)
            .ok_or_else(|| Error::field("widget", "cannot clone the document root"))?;
        let original = interface
            .root()
            .find(path)
            .cloned()
            .ok_or_else(|| Error::Host(format!("no widget at {path}")))?;

        let universe = interface.dataset_names();
        let before1 = fields.text("ds1")?;
        let before2 = fields.text("ds2")?;
        let repl1 = expand_patterns(fields.list("ds1repl")?, &universe)?;
        let repl2 = expand_patterns(fields.list("ds2repl")?, &universe)?;
        let new_names = fields.bool("names")?;

        let parent = interface
            .root_mut()
            .find_mut(&parent_path)
            .ok_or_else(|| Error::Host(format!("no widget at {parent_path}")))?;

        let mut clones = 0;
        for (r1, r2) in pair(repl1, repl2) {
            let mut copy = original.clone();
            copy.name = if new_names {
                let wanted = derived_name(&original.name, &[r1.as_str(), r2.as_str()]);
                parent.unique_child_name(&wanted)
            } else {
                parent.auto_child_name(&original.kind)
            };

            let mut rewritten = 0;
            // An empty name on either side leaves that reference alone.
            for (before, after) in [(before1, &r1), (before2, &r2)] {
                if !before.is_empty() && !after.is_empty() {
                    rewritten += copy.replace_dataset(before, after);
                }
            }
            log::debug!(
                "Cloned {path} as {} ({rewritten} dataset references rewritten)",
                copy.name
            );

            parent.add_child(copy);
            clones += 1;
        }

        log::info!("Made {clones} clones of {path}");
        Ok(())
    }
}

/// `base` followed by each non-empty replacement, with `/` made name-safe.
fn derived_name(base: &str, tokens: &[&str]) -> String {
    let mut name = base.to_string();
    for token in tokens.iter().filter(|t| !t.is_empty()) {
        name.push('_');
        name.push_str(&token.replace('/', "_"));
    }
    name
}
