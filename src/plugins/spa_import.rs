use super::fields::Field;
use super::{ImportDataset1D, ImportParams, ImportPlugin};
use crate::data::spa::SpaRecord;
use crate::error::Result;

/// Placeholder for the y dataset name meaning "use the spectrum title".
pub const AUTO_NAME: &str = "{auto}";

/// Imports a Thermo Scientific OMNIC `.spa` spectrum as two datasets.
#[derive(Debug, Default)]
pub struct SpaImport;

impl ImportPlugin for SpaImport {
    fn name(&self) -> &'static str {
        "OMNIC SPA"
    }

    fn description(&self) -> &'static str {
        "Import a Thermo Scientific OMNIC .spa spectrum"
    }

    fn file_types(&self) -> &'static [&'static str] {
        &[".spa"]
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::text("x_name", "x name", "wavenumber"),
            Field::text("y_name", "y name", AUTO_NAME),
        ]
    }

    fn preview(&self, params: &ImportParams) -> (String, bool) {
        match SpaRecord::from_path(&params.filename) {
            Ok(rec) => (
                format!(
                    "Title: {}\nPoints: {}\nWavenumbers: {} to {}\nData offset: {}",
                    rec.title,
                    rec.data_point_count,
                    rec.max_wavenumber,
                    rec.min_wavenumber,
                    rec.data_offset
                ),
                true,
            ),
            Err(e) => (e.to_string(), false),
        }
    }

    fn do_import(&self, params: &ImportParams) -> Result<Vec<ImportDataset1D>> {
        let fields = &params.field_results;
        let record = SpaRecord::from_path(&params.filename)?;

        let x_name = fields.text("x_name")?;
        let y_name = match fields.text("y_name")? {
            AUTO_NAME => record.title.clone(),
            name => name.to_string(),
        };

        log::info!(
            "Imported SPA spectrum '{}' ({} points) as '{x_name}' / '{y_name}'",
            record.title,
            record.data_point_count
        );

        Ok(vec![
            ImportDataset1D::new(x_name, record.wavenumbers),
            ImportDataset1D::new(&y_name, record.intensities),
        ])
    }
}
