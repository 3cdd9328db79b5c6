//! Comparison chart export to PNG (plotters bitmap) and EPS (minimal
//! PostScript, no deps). Two side-by-side panels, one bar per target
//! category, every bar labeled with its percentage.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use teledash_cli::ChartFormat;

use crate::chart_data::ComparisonChart;

/// Escape a string for PostScript ( and ) and \.
fn ps_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Generate "nice" tick values in [0, max] with roughly max_ticks steps.
fn nice_ticks(max: f64, max_ticks: usize) -> Vec<f64> {
    let range = if max > 0.0 { max } else { 1.0 };
    if max_ticks == 0 {
        return vec![0.0];
    }
    let raw_step = range / max_ticks as f64;
    let mag = 10.0_f64.powf(raw_step.log10().floor());
    let norm = if mag > 0.0 { raw_step / mag } else { raw_step };
    let step = if norm <= 1.0 {
        mag
    } else if norm <= 2.0 {
        2.0 * mag
    } else if norm <= 5.0 {
        5.0 * mag
    } else {
        10.0 * mag
    };
    let step = step.max(f64::EPSILON);
    let mut ticks = Vec::new();
    let mut v = 0.0;
    while v <= max + step * 0.001 {
        ticks.push(v);
        v += step;
        if ticks.len() > max_ticks + 2 {
            break;
        }
    }
    ticks
}

/// Format a tick value for display (integer when whole, else one decimal).
fn format_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-10 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Format a bar's percentage label, one decimal place.
fn format_percentage(v: f64) -> String {
    format!("{:.1}", v)
}

/// Write the comparison chart to `path` in the requested format.
pub fn write_chart(
    path: &Path,
    chart: &ComparisonChart,
    format: ChartFormat,
    size: (u32, u32),
) -> Result<()> {
    match format {
        ChartFormat::Png => write_chart_png(path, chart, size),
        ChartFormat::Eps => write_chart_eps(path, chart),
    }
}

/// Write the chart to PNG using the plotters bitmap backend.
pub fn write_chart_png(path: &Path, chart: &ComparisonChart, size: (u32, u32)) -> Result<()> {
    use plotters::prelude::*;

    if chart.panels.iter().all(|p| p.bars.is_empty()) {
        return Err(eyre!("No data to export"));
    }

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((1, 2));

    for (panel, area) in chart.panels.iter().zip(areas.iter()) {
        let n = panel.bars.len().max(1);
        let labels: Vec<String> = panel.bars.iter().map(|b| b.label.clone()).collect();

        let mut cc = ChartBuilder::on(area)
            .caption(panel.title.as_str(), ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5_f64..(n as f64 - 0.5), 0.0_f64..chart.y_max)?;

        cc.configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| {
                let i = x.round();
                if (x - i).abs() > 0.01 || i < 0.0 {
                    return String::new();
                }
                labels.get(i as usize).cloned().unwrap_or_default()
            })
            .x_desc(chart.target.as_str())
            .y_desc("percentage")
            .draw()?;

        cc.draw_series(panel.bars.iter().enumerate().map(|(i, bar)| {
            Rectangle::new(
                [(i as f64 - 0.3, 0.0), (i as f64 + 0.3, bar.percentage)],
                BLUE.filled(),
            )
        }))?;

        // Percentage label above each bar
        cc.draw_series(panel.bars.iter().enumerate().map(|(i, bar)| {
            Text::new(
                format_percentage(bar.percentage),
                (i as f64 - 0.1, bar.percentage + chart.y_max * 0.02),
                ("sans-serif", 14),
            )
        }))?;
    }

    root.present()?;
    Ok(())
}

/// Write the chart to EPS (Encapsulated PostScript). No external dependencies.
pub fn write_chart_eps(path: &Path, chart: &ComparisonChart) -> Result<()> {
    if chart.panels.iter().all(|p| p.bars.is_empty()) {
        return Err(eyre!("No data to export"));
    }

    const PANEL_W: f64 = 400.0;
    const H: f64 = 300.0;
    const MARGIN_LEFT: f64 = 50.0;
    const MARGIN_BOTTOM: f64 = 42.0;
    const PLOT_W: f64 = PANEL_W - MARGIN_LEFT - 30.0;
    const PLOT_H: f64 = H - MARGIN_BOTTOM - 40.0;

    let mut f = File::create(path)?;

    writeln!(f, "%!PS-Adobe-3.0 EPSF-3.0")?;
    writeln!(f, "%%BoundingBox: 0 0 {} {}", (PANEL_W * 2.0) as i32, H as i32)?;
    writeln!(f, "%%Creator: teledash")?;
    writeln!(f, "%%EndComments")?;

    let to_y = |v: f64| MARGIN_BOTTOM + v / chart.y_max * PLOT_H;
    let y_ticks = nice_ticks(chart.y_max, 6);
    let char_w: f64 = 5.0;

    for (panel_idx, panel) in chart.panels.iter().enumerate() {
        writeln!(f, "gsave")?;
        writeln!(f, "{} 0 translate", panel_idx as f64 * PANEL_W)?;

        // Grid and y tick labels
        writeln!(f, "/Helvetica findfont 9 scalefont setfont")?;
        for &v in &y_ticks {
            let py = to_y(v);
            if py > MARGIN_BOTTOM + PLOT_H + 0.5 {
                continue;
            }
            writeln!(f, "0.9 setgray 0.5 setlinewidth")?;
            writeln!(f, "{} {} moveto {} 0 rlineto stroke", MARGIN_LEFT, py, PLOT_W)?;
            writeln!(f, "0 setgray 1 setlinewidth")?;
            writeln!(f, "{} {} moveto {} 0 rlineto stroke", MARGIN_LEFT, py, -4.0)?;
            let s = format_tick(v);
            writeln!(
                f,
                "{} {} moveto ({}) show",
                (MARGIN_LEFT - 4.0 - s.len() as f64 * char_w).max(2.0),
                py - 3.0,
                ps_escape(&s)
            )?;
        }

        // Axis box
        writeln!(f, "0 setgray 1 setlinewidth")?;
        writeln!(f, "{} {} moveto", MARGIN_LEFT, MARGIN_BOTTOM)?;
        writeln!(f, "{} 0 rlineto", PLOT_W)?;
        writeln!(f, "0 {} rlineto", PLOT_H)?;
        writeln!(f, "{} 0 rlineto", -PLOT_W)?;
        writeln!(f, "closepath stroke")?;

        // Bars, percentage labels, category labels
        let n = panel.bars.len();
        if n > 0 {
            let slot = PLOT_W / n as f64;
            let bar_w = (slot * 0.6).min(80.0);
            for (i, bar) in panel.bars.iter().enumerate() {
                let cx = MARGIN_LEFT + slot * (i as f64 + 0.5);
                let bar_h = (bar.percentage / chart.y_max * PLOT_H).max(0.0);
                writeln!(f, "0.2 0.4 0.8 setrgbcolor")?;
                writeln!(
                    f,
                    "{} {} {} {} rectfill",
                    cx - bar_w / 2.0,
                    MARGIN_BOTTOM,
                    bar_w,
                    bar_h
                )?;
                writeln!(f, "0 setgray")?;
                let pct = format_percentage(bar.percentage);
                writeln!(
                    f,
                    "{} {} moveto ({}) show",
                    cx - pct.len() as f64 * char_w / 2.0,
                    MARGIN_BOTTOM + bar_h + 4.0,
                    ps_escape(&pct)
                )?;
                writeln!(
                    f,
                    "{} {} moveto ({}) show",
                    cx - bar.label.len() as f64 * char_w / 2.0,
                    MARGIN_BOTTOM - 12.0,
                    ps_escape(&bar.label)
                )?;
            }
        }

        // X-axis title and panel title
        writeln!(f, "/Helvetica findfont 10 scalefont setfont")?;
        writeln!(
            f,
            "{} {} moveto ({}) show",
            MARGIN_LEFT + PLOT_W / 2.0 - chart.target.len() as f64 * char_w / 2.0,
            MARGIN_BOTTOM - 26.0,
            ps_escape(&chart.target)
        )?;
        writeln!(f, "/Helvetica-Bold findfont 13 scalefont setfont")?;
        writeln!(
            f,
            "{} {} moveto ({}) show",
            MARGIN_LEFT + PLOT_W / 2.0 - panel.title.len() as f64 * 3.2,
            MARGIN_BOTTOM + PLOT_H + 14.0,
            ps_escape(&panel.title)
        )?;
        writeln!(f, "grestore")?;
    }

    writeln!(f, "%%EOF")?;
    f.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_ticks_cover_range() {
        let ticks = nice_ticks(92.0, 6);
        assert_eq!(ticks[0], 0.0);
        assert!(*ticks.last().unwrap() >= 80.0);
        assert!(ticks.len() <= 9);
    }

    #[test]
    fn tick_formatting() {
        assert_eq!(format_tick(20.0), "20");
        assert_eq!(format_tick(12.5), "12.5");
        assert_eq!(format_percentage(60.0), "60.0");
    }

    #[test]
    fn ps_escape_parens() {
        assert_eq!(ps_escape("a(b)c"), "a\\(b\\)c");
    }
}
