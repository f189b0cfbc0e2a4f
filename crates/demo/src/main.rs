// File: crates/demo/src/main.rs
// Summary: Demo loads labelled series from CSV and renders line, bar and pie charts to PNGs at two
//          viewport widths, printing the SVG path data of every line.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use sextant_core::options::PartialChartOptions;
use sextant_core::{
    Chart, ChartData, ChartEvent, ChartOptions, ChartRect, DrawEvent, LabelFormatter, PartialAxisOptions, RawPoint,
    RawSeries, ResponsiveOptions, Viewport,
};
use sextant_render_skia::{theme, SkiaSurface};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Space around the plot area for labels.
const INSET_LEFT: f64 = 50.0;
const INSET_TOP: f64 = 15.0;
const INSET_RIGHT: f64 = 15.0;
const INSET_BOTTOM: f64 = 40.0;

const WIDE: (f64, f64) = (1024.0, 480.0);
const NARROW: (f64, f64) = (480.0, 360.0);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Accept path from CLI or fall back to the bundled sample
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("data/weekly.csv"));
    let theme = std::env::args().nth(2).map(|name| theme::find(&name)).unwrap_or_default();
    println!("Using input file: {}", path.display());

    let data = load_series_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?;
    println!("Loaded {} series over {} labels", data.series.len(), data.labels.len());
    if data.series.is_empty() {
        anyhow::bail!("no series loaded; expected a label column followed by value columns");
    }

    let options = ChartOptions::from_json(
        r#"{
            "showArea": true,
            "fullWidth": true,
            "lineSmooth": {"type": "monotone", "fillHoles": true},
            "axisY": {"onlyInteger": true}
        }"#,
    )?;

    let out_dir = PathBuf::from("target/out");
    let surface = Rc::new(RefCell::new(SkiaSurface::new(WIDE.0 as i32, WIDE.1 as i32, theme)?));

    // Line chart, rendered wide then narrow so the responsive rules kick in
    let mut line = Chart::line(data.clone(), options.clone())
        .with_viewport(Viewport::new(WIDE.0, WIDE.1))
        .with_rect(plot_rect(WIDE)?)
        .with_responsive_options(responsive_rules()?);
    SkiaSurface::attach(&surface, &mut line);
    line.on(print_paths);

    let report = line.render()?;
    info!(?report, "rendered wide line chart");
    surface.borrow_mut().write_png(out_dir.join("line_wide.png"))?;
    println!("Wrote {}", out_dir.join("line_wide.png").display());

    surface.borrow_mut().resize(NARROW.0 as i32, NARROW.1 as i32)?;
    let report = line.resize(Viewport::new(NARROW.0, NARROW.1), plot_rect(NARROW)?)?;
    info!(?report, "rendered narrow line chart");
    surface.borrow_mut().write_png(out_dir.join("line_narrow.png"))?;
    println!("Wrote {}", out_dir.join("line_narrow.png").display());

    // Bars of the same data
    surface.borrow_mut().resize(WIDE.0 as i32, WIDE.1 as i32)?;
    let mut bar = Chart::bar(data.clone(), ChartOptions::default()).with_rect(plot_rect(WIDE)?);
    SkiaSurface::attach(&surface, &mut bar);
    bar.render()?;
    surface.borrow_mut().write_png(out_dir.join("bar.png"))?;
    println!("Wrote {}", out_dir.join("bar.png").display());

    // One slice per series, sized by its total
    let totals = ChartData::from_rows(data.series.iter().map(|s| vec![series_total(s)]));
    let mut pie = Chart::pie(totals, ChartOptions::from_json(r#"{"donut": true, "donutWidth": 40}"#)?)
        .with_rect(ChartRect::from_ltwh(0.0, 0.0, WIDE.1, WIDE.1)?);
    SkiaSurface::attach(&surface, &mut pie);
    pie.render()?;
    surface.borrow_mut().write_png(out_dir.join("pie.png"))?;
    println!("Wrote {}", out_dir.join("pie.png").display());

    Ok(())
}

fn plot_rect((width, height): (f64, f64)) -> Result<ChartRect> {
    Ok(ChartRect::from_ltwh(
        INSET_LEFT,
        INSET_TOP,
        width - INSET_LEFT - INSET_RIGHT,
        height - INSET_TOP - INSET_BOTTOM,
    )?)
}

/// Narrow screens drop points, draw straight segments and label every other day.
fn responsive_rules() -> Result<ResponsiveOptions> {
    let mut narrow = PartialChartOptions::from_json(r#"{"showPoint": false, "lineSmooth": false}"#)?;
    narrow.axis_x = Some(PartialAxisOptions {
        label_interpolation: Some(LabelFormatter::every_nth(2)),
        ..Default::default()
    });
    Ok(ResponsiveOptions::new().with("screen and (max-width: 640px)", narrow))
}

fn print_paths(event: &ChartEvent) -> anyhow::Result<()> {
    match event {
        ChartEvent::Draw(DrawEvent::Line(d)) => println!("  series {}: {}", d.series_index, d.path),
        ChartEvent::OptionsChanged { current, .. } => {
            println!("  options changed (showPoint = {})", current.show_point)
        }
        ChartEvent::Created(c) => println!("  pass {} done: {} draws", c.pass, c.draw_count),
        _ => {}
    }
    Ok(())
}

fn series_total(series: &RawSeries) -> f64 {
    series
        .data
        .iter()
        .filter_map(|p| match p.value {
            sextant_core::series::RawValue::Number(v) if v.is_finite() => Some(v),
            _ => None,
        })
        .sum()
}

/// Load a CSV whose first column holds labels and every further column one named series.
/// Empty cells become holes.
fn load_series_csv(path: &Path) -> Result<ChartData> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.clone();
    println!("Headers: {:?}", headers.iter().collect::<Vec<_>>());
    let mut series: Vec<RawSeries> =
        headers.iter().skip(1).map(|name| RawSeries::named(name, Vec::<RawPoint>::new())).collect();

    let mut labels = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        labels.push(rec.get(0).unwrap_or_default().to_string());
        for (i, s) in series.iter_mut().enumerate() {
            let cell = rec.get(i + 1).unwrap_or_default();
            let point = if cell.is_empty() {
                RawPoint::hole()
            } else {
                let value = cell.parse::<f64>().with_context(|| format!("bad number '{cell}' in column {}", i + 2))?;
                RawPoint::number(value)
            };
            s.data.push(point);
        }
    }
    Ok(ChartData::new(labels, series))
}
