//! Plotters-powered SVG charts for family results.
//!
//! Why Plotters alongside the ASCII renderer?
//! - nicer axis + mesh rendering for reports
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, other backends, etc.)
//!
//! The SVG backend keeps the dependency surface small: no font
//! rasterization or native libraries, and the output is a plain string.

use plotters::prelude::*;

use crate::domain::FamilyResult;
use crate::error::AppError;
use crate::math::neg_log10_p;

const POINT_COLOR: RGBColor = RGBColor(30, 90, 180);
const BASE_LINE_COLOR: RGBColor = RGBColor(200, 40, 40);
const FAINT_LINE_COLOR: RGBColor = RGBColor(190, 190, 190);

/// Render the scatter mode (response vs primary with fit-line overlays) as
/// an SVG document.
pub fn scatter_svg(result: &FamilyResult, size: (u32, u32)) -> Result<String, AppError> {
    let (x_min, x_max) = padded_range(&result.predictor).unwrap_or((0.0, 1.0));

    let mut ys: Vec<f64> = result.response.clone();
    for line in std::iter::once(&result.base.line)
        .chain(result.augmented.iter().map(|a| &a.fit.line))
    {
        ys.push(line.y_at(x_min));
        ys.push(line.y_at(x_max));
    }
    let (y_min, y_max) = padded_range(&ys).unwrap_or((0.0, 1.0));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(
                format!("{} vs {}", result.response_name, result.predictor_name),
                ("sans-serif", 16),
            )
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc(result.predictor_name.clone())
            .y_desc(result.response_name.clone())
            .draw()
            .map_err(chart_err)?;

        // Faint augmented lines under the base line under the points.
        for aug in &result.augmented {
            let line = aug.fit.line;
            chart
                .draw_series(LineSeries::new(
                    [(x_min, line.y_at(x_min)), (x_max, line.y_at(x_max))],
                    &FAINT_LINE_COLOR,
                ))
                .map_err(chart_err)?;
        }
        let base = result.base.line;
        chart
            .draw_series(LineSeries::new(
                [(x_min, base.y_at(x_min)), (x_max, base.y_at(x_max))],
                ShapeStyle::from(&BASE_LINE_COLOR).stroke_width(2),
            ))
            .map_err(chart_err)?;

        chart
            .draw_series(
                result
                    .predictor
                    .iter()
                    .zip(result.response.iter())
                    .map(|(&x, &y)| Circle::new((x, y), 3, POINT_COLOR.filled())),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(svg)
}

/// Render the dual-log-p-value mode as an SVG document.
///
/// One labelled point per auxiliary coefficient; the base model's primary
/// p-value appears as a vertical reference line.
pub fn pvalues_svg(result: &FamilyResult, size: (u32, u32)) -> Result<String, AppError> {
    let ref_x = neg_log10_p(result.base.primary_p_value());

    let mut points: Vec<(f64, f64, String)> = Vec::new();
    for aug in &result.augmented {
        let p1 = neg_log10_p(aug.fit.primary_p_value());
        for coef in &aug.fit.auxiliary {
            let label = if aug.fit.auxiliary.len() == 1 {
                aug.name.clone()
            } else {
                coef.term.clone()
            };
            points.push((p1, neg_log10_p(coef.p_value), label));
        }
    }

    let mut xs = vec![ref_x];
    let mut ys = vec![0.0];
    for (x, y, _) in &points {
        xs.push(*x);
        ys.push(*y);
    }
    let (x_min, x_max) = padded_range(&xs).unwrap_or((ref_x - 0.5, ref_x + 0.5));
    let (y_min, y_max) = padded_range(&ys).unwrap_or((0.0, 1.0));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption("-log10 p-values: primary vs secondary", ("sans-serif", 16))
            .x_label_area_size(30)
            .y_label_area_size(45)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc("-log10 p (primary)")
            .y_desc("-log10 p (secondary)")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(LineSeries::new(
                [(ref_x, y_min), (ref_x, y_max)],
                ShapeStyle::from(&BASE_LINE_COLOR).stroke_width(2),
            ))
            .map_err(chart_err)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|(x, y, _)| Circle::new((*x, *y), 4, POINT_COLOR.filled())),
            )
            .map_err(chart_err)?;

        // Labels offset slightly right of each marker.
        let dx = (x_max - x_min) * 0.01;
        chart
            .draw_series(points.iter().map(|(x, y, label)| {
                Text::new(label.clone(), (*x + dx, *y), ("sans-serif", 12))
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    Ok(svg)
}

fn chart_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::numeric(format!("Chart rendering error: {e}"))
}

fn padded_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if v.is_finite() {
            lo = lo.min(v);
            hi = hi.max(v);
        }
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return None;
    }
    if hi <= lo {
        // Constant series: open a unit window around the value.
        return Some((lo - 0.5, lo + 0.5));
    }
    let pad = (hi - lo) * 0.05;
    Some((lo - pad, hi + pad))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::{SampleConfig, generate_dataset};
    use crate::domain::{AnalyzeOptions, PrimarySpec};
    use crate::fit::analyze;

    fn run_default() -> FamilyResult {
        let data = generate_dataset(&SampleConfig::default()).unwrap();
        analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            None,
            &AnalyzeOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn scatter_svg_contains_all_series() {
        let svg = scatter_svg(&run_default(), (640, 480)).unwrap();
        assert!(svg.starts_with("<?xml") || svg.starts_with("<svg"));
        // One circle per observation.
        assert!(svg.matches("<circle").count() >= 120);
        assert!(svg.contains("polyline"));
    }

    #[test]
    fn pvalues_svg_labels_every_entry() {
        let svg = pvalues_svg(&run_default(), (640, 480)).unwrap();
        for name in ["w1", "w2", "w3", "w4", "w5", "w6"] {
            assert!(svg.contains(name), "missing label {name}");
        }
    }

    #[test]
    fn empty_family_still_renders() {
        let data = generate_dataset(&SampleConfig::default()).unwrap();
        let result = analyze(
            &data,
            "y",
            PrimarySpec::column("x"),
            Some(crate::domain::ModelFamily::new()),
            &AnalyzeOptions::default(),
        )
        .unwrap();

        assert!(!scatter_svg(&result, (320, 240)).unwrap().is_empty());
        assert!(!pvalues_svg(&result, (320, 240)).unwrap().is_empty());
    }
}
