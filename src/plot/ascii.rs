//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Scatter mode elements:
//! - observed points: `o`
//! - base fit line: `-`
//! - augmented fit lines (visually subordinate): `.`
//!
//! P-value mode elements:
//! - one `*` per auxiliary coefficient at (-log10 p1, -log10 p2), labelled
//! - base reference: a `|` column at the base fit's -log10 p1

use crate::domain::{FamilyResult, FitLine};
use crate::math::neg_log10_p;

/// Render the scatter plot: response vs primary, base line prominent,
/// augmented lines faint, in stored order.
pub fn render_scatter(result: &FamilyResult, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = value_range(&result.predictor).unwrap_or((0.0, 1.0));

    // The y-range covers observed responses and every fit line's endpoints,
    // so no overlay gets clipped.
    let mut y_lo = f64::INFINITY;
    let mut y_hi = f64::NEG_INFINITY;
    for &y in &result.response {
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }
    // Base line first: the line drawer only writes blank cells, so the
    // first layer keeps visual priority over later (faint) layers.
    let mut lines: Vec<(FitLine, char)> = vec![(result.base.line, '-')];
    lines.extend(result.augmented.iter().map(|a| (a.fit.line, '.')));
    for (line, _) in &lines {
        for x in [x_min, x_max] {
            let y = line.y_at(x);
            if y.is_finite() {
                y_lo = y_lo.min(y);
                y_hi = y_hi.max(y);
            }
        }
    }
    let (y_min, y_max) = if y_lo.is_finite() && y_hi > y_lo {
        pad_range(y_lo, y_hi, 0.05)
    } else {
        (0.0, 1.0)
    };

    let mut grid = vec![vec![' '; width]; height];

    // Lines first (base, then augmented), observed points on top.
    for (line, ch) in &lines {
        draw_fit_line(&mut grid, line, *ch, x_min, x_max, y_min, y_max);
    }
    for (&x, &y) in result.predictor.iter().zip(result.response.iter()) {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        grid[cy][cx] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Scatter: {}=[{x_min:.3}, {x_max:.3}] | {}=[{y_min:.2}, {y_max:.2}] | fits={}\n",
        result.predictor_name,
        result.response_name,
        result.augmented.len() + 1
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Render the dual-log-p-value plot.
///
/// One labelled point per auxiliary coefficient; the base model has no
/// secondary term, so it appears as a vertical reference line at its
/// primary -log10 p-value.
pub fn render_pvalues(result: &FamilyResult, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let ref_x = neg_log10_p(result.base.primary_p_value());

    // (x, y, label) per auxiliary coefficient.
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

    let mut x_lo = ref_x;
    let mut x_hi = ref_x;
    let mut y_lo = 0.0_f64;
    let mut y_hi = 1.0_f64;
    for (x, y, _) in &points {
        x_lo = x_lo.min(*x);
        x_hi = x_hi.max(*x);
        y_lo = y_lo.min(*y);
        y_hi = y_hi.max(*y);
    }
    let (x_min, x_max) = pad_range(x_lo, x_hi, 0.05);
    let (y_min, y_max) = pad_range(y_lo, y_hi, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Reference column for the base model.
    let ref_col = map_x(ref_x, x_min, x_max, width);
    for row in grid.iter_mut() {
        row[ref_col] = '|';
    }

    for (x, y, label) in &points {
        let cx = map_x(*x, x_min, x_max, width);
        let cy = map_y(*y, y_min, y_max, height);
        grid[cy][cx] = '*';
        // Write the label to the right of the marker where room allows.
        for (k, ch) in label.chars().enumerate() {
            let col = cx + 2 + k;
            if col >= width {
                break;
            }
            if grid[cy][col] == ' ' {
                grid[cy][col] = ch;
            }
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "P-values: -log10(p) primary vs secondary | base ref at {ref_x:.2}\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if lo.is_finite() && hi.is_finite() && hi > lo {
        Some((lo, hi))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_fit_line(
    grid: &mut [Vec<char>],
    line: &FitLine,
    ch: char,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev: Option<(usize, usize)> = None;
    for i in 0..width {
        let u = i as f64 / (width as f64 - 1.0);
        let x = x_min + u * (x_max - x_min);
        let y = line.y_at(x);
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        if let Some((px, py)) = prev {
            draw_line(grid, px, py, cx, cy, ch);
        } else if grid[cy][cx] == ' ' {
            grid[cy][cx] = ch;
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written, so
/// earlier layers keep visual priority.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
