use plotters::prelude::*;
use std::error::Error as StdError;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const PLOT_FILE_NAME: &str = "energy_efficiency.png";

const FIGURE_SIZE: (u32, u32) = (1000, 500);
const FONT: &str = "sans-serif";

struct Panel<'a> {
    title: &'a str,
    x_desc: &'a str,
    values: &'a [f64],
}

/// Empirical CDF of `values`: each distinct value paired with the fraction of
/// samples less than or equal to it, in ascending order.
pub fn ecdf(values: &[f64]) -> Vec<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as f64;
    let mut points: Vec<(f64, f64)> = Vec::with_capacity(sorted.len());
    for (i, &v) in sorted.iter().enumerate() {
        let fraction = (i + 1) as f64 / n;
        if let Some(last) = points.last_mut() {
            if last.0 == v {
                last.1 = fraction;
                continue;
            }
        }
        points.push((v, fraction));
    }
    points
}

/// Horizontal extent of a panel with a little room on both sides.
fn x_range(points: &[(f64, f64)]) -> (f64, f64) {
    let min = points.first().map(|p| p.0).unwrap_or(0.0);
    let max = points.last().map(|p| p.0).unwrap_or(1.0);
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { 0.5 };
    (min - pad, max + pad)
}

/// Turns ECDF points into a staircase that starts at 0 on the left edge and
/// reaches 1 on the right edge.
fn staircase(points: &[(f64, f64)], x_min: f64, x_max: f64) -> Vec<(f64, f64)> {
    let mut steps = Vec::with_capacity(points.len() * 2 + 2);
    steps.push((x_min, 0.0));
    let mut level = 0.0;
    for &(x, y) in points {
        steps.push((x, level));
        steps.push((x, y));
        level = y;
    }
    steps.push((x_max, level));
    steps
}

fn draw(path: &Path, title: &str, panels: &[Panel]) -> std::result::Result<(), Box<dyn StdError>> {
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, (FONT, 24))?;
    let areas = root.split_evenly((1, panels.len()));

    for (area, panel) in areas.iter().zip(panels) {
        let points = ecdf(panel.values);
        let (x_min, x_max) = x_range(&points);

        let mut chart = ChartBuilder::on(area)
            .caption(panel.title, (FONT, 18))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0.0..1.05)?;

        chart
            .configure_mesh()
            .x_desc(panel.x_desc)
            .y_desc("CDF")
            .axis_desc_style((FONT, 16))
            .draw()?;

        chart.draw_series(LineSeries::new(staircase(&points, x_min, x_max), BLUE.stroke_width(2)))?;
    }

    root.present()?;
    Ok(())
}

/// Renders the energy-ratio and power-ratio ECDFs side by side into
/// `<dir>/energy_efficiency.png` and returns the file path.
pub fn plot_energy_efficiency(dir: &Path, k: u32, r: u32, energy_ratios: &[f64], power_ratios: &[f64]) -> Result<PathBuf> {
    if energy_ratios.is_empty() || power_ratios.is_empty() {
        return Err(Error::Plot("no ratios to plot".to_string()));
    }

    let path = dir.join(PLOT_FILE_NAME);
    let title = format!("Energy efficiency comparison (k={}, r={})", k, r);
    let panels = [
        Panel { title: "Consumed energy ratio", x_desc: "E_RS / E_RLC", values: energy_ratios },
        Panel { title: "Power draw ratio", x_desc: "P_RS / P_RLC", values: power_ratios },
    ];

    draw(&path, &title, &panels).map_err(|e| Error::Plot(e.to_string()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecdf_is_sorted_and_ends_at_one() {
        let points = ecdf(&[3.0, 1.0, 2.0, 4.0]);
        assert_eq!(points, vec![(1.0, 0.25), (2.0, 0.5), (3.0, 0.75), (4.0, 1.0)]);
    }

    #[test]
    fn ecdf_merges_ties() {
        let points = ecdf(&[1.5, 0.5, 1.5, 1.5]);
        assert_eq!(points, vec![(0.5, 0.25), (1.5, 1.0)]);
        assert!(ecdf(&[]).is_empty());
    }

    #[test]
    fn x_range_pads_degenerate_span() {
        assert_eq!(x_range(&[(2.0, 1.0)]), (1.5, 2.5));
        let (lo, hi) = x_range(&[(0.0, 0.5), (10.0, 1.0)]);
        assert!(lo < 0.0 && hi > 10.0);
    }

    #[test]
    fn staircase_spans_the_axis() {
        let steps = staircase(&[(1.0, 0.5), (2.0, 1.0)], 0.0, 3.0);
        assert_eq!(
            steps,
            vec![(0.0, 0.0), (1.0, 0.0), (1.0, 0.5), (2.0, 0.5), (2.0, 1.0), (3.0, 1.0)]
        );
    }

    #[test]
    fn renders_png_into_output_dir() {
        let dir = std::env::temp_dir().join(format!("energy_efficiency_rs_plot_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let path = plot_energy_efficiency(&dir, 2000, 40, &[1.0, 2.0, 1.5], &[0.8, 0.9, 1.1]).unwrap();
        assert_eq!(path, dir.join(PLOT_FILE_NAME));
        assert!(path.is_file());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn refuses_to_plot_nothing() {
        let dir = std::env::temp_dir();
        assert!(matches!(plot_energy_efficiency(&dir, 2000, 40, &[], &[1.0]), Err(Error::Plot(_))));
    }
}
