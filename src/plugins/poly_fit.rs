use super::fields::{Field, FieldValues};
use super::{plot_function, ToolsPlugin};
use crate::data::fit::{polynomial_expression, polynomial_fit};
use crate::error::{Error, Result};
use crate::host::Interface;

/// Fits a polynomial of configurable degree and plots it as a function widget.
#[derive(Debug, Default)]
pub struct PolynomialFit;

impl ToolsPlugin for PolynomialFit {
    fn name(&self) -> &'static str {
        "Polynomial fit"
    }

    fn description_short(&self) -> &'static str {
        "Do polynomial fit."
    }

    fn description_full(&self) -> &'static str {
        "Press \"Apply\" to fit data."
    }

    fn fields(&self) -> Vec<Field> {
        vec![
            Field::int("dim", "dimension", 1).with_range(Some(0), None),
            Field::dataset("xs_name", "x dataset"),
            Field::dataset("ys_name", "y dataset"),
        ]
    }

    fn apply(&self, interface: &mut dyn Interface, fields: &FieldValues) -> Result<()> {
        let dim = fields.int("dim")?;
        let degree =
            usize::try_from(dim).map_err(|_| Error::field("dim", format!("invalid degree {dim}")))?;
        let xs = interface.get_data(fields.text("xs_name")?)?;
        let ys = interface.get_data(fields.text("ys_name")?)?;

        let coeffs = polynomial_fit(&xs, &ys, degree)?;
        let expr = polynomial_expression(&coeffs);
        let path = plot_function(interface, &expr);

        log::info!("Polynomial fit of degree {degree} plotted at {path}: {expr}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Document, SettingValue};

    #[test]
    fn plots_fitted_polynomial() {
        let mut doc = Document::new()
            .with_dataset("x", vec![-1.0, 0.0, 1.0, 2.0])
            .with_dataset("y", vec![2.0, 1.0, 2.0, 5.0]);
        let fields = FieldValues::resolve(
            &PolynomialFit.fields(),
            &FieldValues::new().with("dim", 2i64).with("xs_name", "x").with("ys_name", "y"),
        )
        .unwrap();
        PolynomialFit.apply(&mut doc, &fields).unwrap();

        let function = doc.root().find("/page1/graph1/function1").unwrap();
        let Some(SettingValue::Text(expr)) = function.setting("function") else {
            panic!("function setting missing");
        };
        assert!(expr.contains(" * x**1 + ") && expr.ends_with(" * x**2"), "{expr}");
    }

    #[test]
    fn unknown_dataset_fails_without_touching_tree() {
        let mut doc = Document::new().with_dataset("x", vec![0.0, 1.0]);
        let fields = FieldValues::resolve(
            &PolynomialFit.fields(),
            &FieldValues::new().with("xs_name", "x").with("ys_name", "missing"),
        )
        .unwrap();
        assert!(PolynomialFit.apply(&mut doc, &fields).is_err());
        assert!(doc.root().children.is_empty());
    }
}
