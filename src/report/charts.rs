//! Chart rendering.
//!
//! The analysis hands pre-aggregated series to a [`ChartSink`]. The bundled
//! [`TextChartSink`] draws them as character grids that can be printed or
//! saved next to the report.

use std::fmt::Write as _;

/// Receiver for chart drawing calls. Drawing never fails from the caller's
/// point of view.
pub trait ChartSink {
    /// Histogram of `series` with `bin_count` equal-width bins.
    fn draw_histogram(&mut self, series: &[f64], bin_count: usize, title: &str);

    /// Scatter plot of `series_a` (x axis) against `series_b` (y axis).
    fn draw_scatter(&mut self, series_a: &[f64], series_b: &[f64], label_a: &str, label_b: &str);
}

/// One histogram bin. `end` is exclusive except on the last bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split `series` into equal-width bins spanning its minimum and maximum.
///
/// The maximum lands in the last bin. A constant series yields a single bin
/// holding every value; an empty series yields no bins.
pub fn histogram_bins(series: &[f64], bin_count: usize) -> Vec<Bin> {
    let finite: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if min == max {
        return vec![Bin {
            start: min,
            end: max,
            count: finite.len(),
        }];
    }

    let bin_count = bin_count.max(1);
    let width = (max - min) / bin_count as f64;
    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| Bin {
            start: min + i as f64 * width,
            end: if i + 1 == bin_count {
                max
            } else {
                min + (i + 1) as f64 * width
            },
            count: 0,
        })
        .collect();

    for value in finite {
        let idx = (((value - min) / width).floor() as usize).min(bin_count - 1);
        bins[idx].count += 1;
    }

    bins
}

/// Renders charts into an in-memory text buffer.
#[derive(Debug, Clone)]
pub struct TextChartSink {
    buffer: String,
    /// Columns available to bars and the scatter grid.
    width: usize,
    /// Rows of the scatter grid.
    height: usize,
    charts: usize,
}

impl Default for TextChartSink {
    fn default() -> Self {
        Self::new(50, 20)
    }
}

impl TextChartSink {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffer: String::new(),
            width: width.max(10),
            height: height.max(5),
            charts: 0,
        }
    }

    /// Everything drawn so far.
    pub fn output(&self) -> &str {
        &self.buffer
    }

    /// Number of charts drawn.
    pub fn chart_count(&self) -> usize {
        self.charts
    }

    fn begin(&mut self, title: &str) {
        if self.charts > 0 {
            self.buffer.push('\n');
        }
        self.charts += 1;
        let _ = writeln!(self.buffer, "== {} ==", title);
    }
}

impl ChartSink for TextChartSink {
    fn draw_histogram(&mut self, series: &[f64], bin_count: usize, title: &str) {
        self.begin(title);

        let bins = histogram_bins(series, bin_count);
        if bins.is_empty() {
            self.buffer.push_str("(no data)\n");
            return;
        }

        let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
        let last = bins.len() - 1;
        for (i, bin) in bins.iter().enumerate() {
            let bar = bin.count * self.width / peak;
            let close = if i == last { ']' } else { ')' };
            let _ = writeln!(
                self.buffer,
                "[{:>10.2}, {:>10.2}{} {:<w$} {}",
                bin.start,
                bin.end,
                close,
                "#".repeat(bar),
                bin.count,
                w = self.width
            );
        }
    }

    fn draw_scatter(&mut self, series_a: &[f64], series_b: &[f64], label_a: &str, label_b: &str) {
        self.begin(&format!("{} vs {}", label_b, label_a));

        let points: Vec<(f64, f64)> = series_a
            .iter()
            .zip(series_b)
            .map(|(x, y)| (*x, *y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        if points.is_empty() {
            self.buffer.push_str("(no data)\n");
            return;
        }

        let (x_min, x_max) = bounds(points.iter().map(|p| p.0));
        let (y_min, y_max) = bounds(points.iter().map(|p| p.1));

        let mut grid = vec![vec![' '; self.width]; self.height];
        for (x, y) in &points {
            let col = scale(*x, x_min, x_max, self.width);
            let row = self.height - 1 - scale(*y, y_min, y_max, self.height);
            grid[row][col] = '*';
        }

        let _ = writeln!(self.buffer, "{:>10.2} +", y_max);
        for row in &grid {
            let line: String = row.iter().collect();
            let _ = writeln!(self.buffer, "{:>10} |{}", "", line.trim_end());
        }
        let _ = writeln!(self.buffer, "{:>10.2} +{}", y_min, "-".repeat(self.width));
        let _ = writeln!(
            self.buffer,
            "{:>11}{:<.2}{:>w$.2}",
            "",
            x_min,
            x_max,
            w = self.width.saturating_sub(format!("{:.2}", x_min).len())
        );
        let _ = writeln!(self.buffer, "x: {}, y: {} ({} points)", label_a, label_b, points.len());
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

/// Map `value` in `[min, max]` to a cell index in `0..cells`.
fn scale(value: f64, min: f64, max: f64, cells: usize) -> usize {
    if max <= min {
        return cells / 2;
    }
    let pos = ((value - min) / (max - min) * (cells - 1) as f64).round() as usize;
    pos.min(cells - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_bins_cover_range() {
        let series = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let bins = histogram_bins(&series, 5);

        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 10.0);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), series.len());
        assert_eq!(bins[0].count, 2);
        assert_eq!(bins[4].count, 1);
    }

    #[test]
    fn test_histogram_bins_max_in_last_bin() {
        let bins = histogram_bins(&[1.0, 2.0], 10);
        assert_eq!(bins[9].count, 1);
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn test_histogram_bins_constant_series() {
        let bins = histogram_bins(&[4.0, 4.0, 4.0], 10);
        assert_eq!(
            bins,
            vec![Bin {
                start: 4.0,
                end: 4.0,
                count: 3
            }]
        );
    }

    #[test]
    fn test_histogram_bins_empty() {
        assert!(histogram_bins(&[], 10).is_empty());
        assert!(histogram_bins(&[f64::NAN], 10).is_empty());
    }

    #[test]
    fn test_draw_histogram() {
        let mut sink = TextChartSink::new(20, 10);
        sink.draw_histogram(&[1.0, 2.0, 2.0, 3.0], 2, "Scores for Sales");

        let out = sink.output();
        assert!(out.starts_with("== Scores for Sales =="));
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains(']'));
        assert_eq!(sink.chart_count(), 1);
    }

    #[test]
    fn test_draw_empty_series() {
        let mut sink = TextChartSink::default();
        sink.draw_histogram(&[], 10, "Scores for Marketing");
        sink.draw_scatter(&[], &[], "salary", "performance_score");

        assert_eq!(sink.output().matches("(no data)").count(), 2);
        assert_eq!(sink.chart_count(), 2);
    }

    #[test]
    fn test_draw_scatter() {
        let mut sink = TextChartSink::new(20, 5);
        sink.draw_scatter(
            &[1.0, 2.0, 3.0],
            &[10.0, 20.0, 30.0],
            "years_with_company",
            "performance_score",
        );

        let out = sink.output();
        assert!(out.contains("performance_score vs years_with_company"));
        assert_eq!(out.matches('*').count(), 3);
        assert!(out.contains("(3 points)"));
    }

    #[test]
    fn test_draw_scatter_single_point() {
        let mut sink = TextChartSink::new(20, 5);
        sink.draw_scatter(&[5.0], &[5.0], "a", "b");
        assert_eq!(sink.output().matches('*').count(), 1);
    }
}
