use super::fields::{Field, FieldValues};
use super::{plot_function, ToolsPlugin};
use crate::data::fit::{linear_fit, polynomial_expression};
use crate::error::Result;
use crate::host::Interface;

/// Straight-line least-squares fit, plotted as a function widget.
#[derive(Debug, Default)]
pub struct LinearFit;

impl ToolsPlugin for LinearFit {
    fn name(&self) -> &'static str {
        "Linear fit"
    }

    fn description_short(&self) -> &'static str {
        "Fit a straight line to two datasets."
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::dataset("xs_name", "x dataset"),
            Field::dataset("ys_name", "y dataset"),
        ]
    }

    fn apply(&self, interface: &mut dyn Interface, fields: &FieldValues) -> Result<()> {
        let xs = interface.get_data(fields.text("xs_name")?)?;
        let ys = interface.get_data(fields.text("ys_name")?)?;

        let (slope, intercept) = linear_fit(&xs, &ys)?;
        let expr = polynomial_expression(&[intercept, slope]);
        let path = plot_function(interface, &expr);

        log::info!("Linear fit slope={slope} intercept={intercept} plotted at {path}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::host::{Document, SettingValue};

    fn run(doc: &mut Document) -> Result<()> {
        let fields = FieldValues::resolve(
            &LinearFit.fields(),
            &FieldValues::new().with("xs_name", "x").with("ys_name", "y"),
        )?;
        LinearFit.apply(doc, &fields)
    }

    #[test]
    fn plots_line() {
        let mut doc = Document::new()
            .with_dataset("x", vec![0.0, 1.0, 2.0])
            .with_dataset("y", vec![1.0, 3.0, 5.0]);
        run(&mut doc).unwrap();
        assert_eq!(
            doc.root()
                .find("/page1/graph1/function1")
                .and_then(|w| w.setting("function")),
            Some(&SettingValue::Text("1.0 + 2.0 * x**1".into()))
        );
    }

    #[test]
    fn second_fit_gets_its_own_page() {
        let mut doc = Document::new()
            .with_dataset("x", vec![0.0, 1.0])
            .with_dataset("y", vec![0.0, 1.0]);
        run(&mut doc).unwrap();
        run(&mut doc).unwrap();
        assert!(doc.root().find("/page2/graph1/function1").is_some());
    }

    #[test]
    fn constant_x_is_fit_error() {
        let mut doc = Document::new()
            .with_dataset("x", vec![1.0, 1.0, 1.0])
            .with_dataset("y", vec![0.0, 1.0, 2.0]);
        assert!(matches!(run(&mut doc), Err(Error::Fit(_))));
    }
}
