//! Text previews of noise maps for terminals and logs.

use std::fmt::Write;

use crate::noise_field::NoiseMap;

/// Low to high.
const HEIGHT_CHARS: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Get ASCII character for a normalized height
pub fn height_char(value: f32) -> char {
    let idx = (value.clamp(0.0, 1.0) * (HEIGHT_CHARS.len() - 1) as f32).round() as usize;
    HEIGHT_CHARS[idx.min(HEIGHT_CHARS.len() - 1)]
}

/// Render the map one character per cell, skipping cells so at most
/// `max_columns` characters are used per line.
///
/// Rows are subsampled twice as coarsely as columns since terminal cells are
/// roughly twice as tall as they are wide.
pub fn render_height(map: &NoiseMap, max_columns: usize) -> String {
    let step = map.width.div_ceil(max_columns.max(1)).max(1);
    let row_step = step * 2;

    let mut out = String::new();
    for y in (0..map.height).step_by(row_step) {
        let line: String = map.row(y).iter().step_by(step).map(|&v| height_char(v)).collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

pub fn height_legend() -> String {
    let ramp: String = HEIGHT_CHARS.iter().map(|c| format!("'{c}' ")).collect();
    format!("=== HEIGHT LEGEND ===\nLow -> high: {}\n", ramp.trim_end())
}

/// Histogram of cell values with summary statistics.
pub fn height_histogram(map: &NoiseMap, num_bins: usize) -> String {
    let num_bins = num_bins.clamp(2, 50);
    let mut out = String::new();

    let mut values: Vec<f32> = map.values().to_vec();
    if values.is_empty() {
        return out;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let count = values.len();
    let (min_v, max_v) = (values[0], values[count - 1]);
    let mean = map.mean();
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    };

    let range = max_v - min_v;
    let mut bins = vec![0usize; num_bins];
    for &v in &values {
        let idx = if range > 0.0 {
            ((v - min_v) / range * num_bins as f32) as usize
        } else {
            0
        };
        bins[idx.min(num_bins - 1)] += 1;
    }

    let max_bin = bins.iter().copied().max().unwrap_or(1).max(1);
    let bar_max_width = 40;

    let _ = writeln!(out, "cells: {count}  min: {min_v:.4}  max: {max_v:.4}  mean: {mean:.4}  median: {median:.4}");
    for (i, &bin_count) in bins.iter().enumerate() {
        let bin_start = i as f32 / num_bins as f32;
        let bin_end = (i + 1) as f32 / num_bins as f32;
        let bar_len = bin_count * bar_max_width / max_bin;
        let pct = 100.0 * bin_count as f64 / count as f64;
        let _ = writeln!(
            out,
            "{bin_start:.2}-{bin_end:.2} |{:<width$}| {pct:>5.1}%",
            "#".repeat(bar_len),
            width = bar_max_width
        );
    }

    out
}
