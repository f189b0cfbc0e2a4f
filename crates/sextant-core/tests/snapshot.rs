// File: crates/sextant-core/tests/snapshot.rs
// Purpose: Golden snapshot of the series descriptors of a small line chart, with bless flow.
// Behavior:
// - Renders a deterministic chart and prints its point, line and area events one per line.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot file.
// - Else, if the snapshot exists, compares text exactly.
// - Else, logs a note and returns without failing.

use std::cell::RefCell;
use std::rc::Rc;

use sextant_core::{Chart, ChartData, ChartEvent, ChartOptions, ChartRect, DrawEvent};

fn render_lines() -> String {
    let data = ChartData::from_rows([vec![0.0, 2.0, 1.0, 4.0]]).with_labels(["a", "b", "c", "d"]);
    let options = ChartOptions::from_json(
        r#"{
            "fullWidth": true,
            "showArea": true,
            "lineSmooth": false,
            "axisX": {"showGrid": false, "showLabel": false},
            "axisY": {"type": "fixed", "ticks": [0, 4], "showGrid": false, "showLabel": false}
        }"#,
    )
    .expect("options");
    let rect = ChartRect::from_ltwh(0.0, 0.0, 300.0, 100.0).expect("rect");
    let mut chart = Chart::line(data, options).with_rect(rect);

    let out = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&out);
    chart.on(move |event| {
        let line = match event {
            ChartEvent::Draw(DrawEvent::Point(p)) => format!("point {} {},{}", p.series_index, p.x, p.y),
            ChartEvent::Draw(DrawEvent::Line(d)) => format!("line {} {}", d.series_index, d.path),
            ChartEvent::Draw(DrawEvent::Area(d)) => format!("area {} {}", d.series_index, d.path),
            _ => return Ok(()),
        };
        let mut out = sink.borrow_mut();
        out.push_str(&line);
        out.push('\n');
        Ok(())
    });
    chart.render().expect("render");
    let text = out.borrow().clone();
    text
}

#[test]
fn golden_line_with_area() {
    let text = render_lines();
    let snap_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__");
    let snap_path = snap_dir.join("line_area.txt");

    let update = std::env::var("UPDATE_SNAPSHOTS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if update {
        std::fs::create_dir_all(&snap_dir).expect("create snapshots dir");
        std::fs::write(&snap_path, &text).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} lines)", snap_path.display(), text.lines().count());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read_to_string(&snap_path).expect("read snapshot");
        assert_eq!(text, want, "series descriptors differ from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}
