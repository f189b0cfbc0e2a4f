// File: crates/sextant-core/tests/pipeline.rs
// Purpose: End-to-end render passes: event order, error surfacing, listener isolation and update supersession.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::anyhow;
use sextant_core::event::{BarDraw, PointDraw, SliceDraw};
use sextant_core::{
    Chart, ChartData, ChartError, ChartEvent, ChartOptions, ChartRect, DrawEvent, DrawKind, PartialChartOptions,
    PipelineState, RawPoint, RawSeries, ResponsiveOptions, Viewport,
};

type Log = Rc<RefCell<Vec<ChartEvent>>>;

fn record(chart: &mut Chart) -> Log {
    let log: Log = Rc::default();
    let sink = Rc::clone(&log);
    chart.on(move |event| {
        sink.borrow_mut().push(event.clone());
        Ok(())
    });
    log
}

fn rect(width: f64, height: f64) -> ChartRect {
    ChartRect::from_ltwh(0.0, 0.0, width, height).unwrap()
}

fn sample() -> ChartData {
    ChartData::from_rows([vec![1.0, 5.0, 3.0]]).with_labels(["a", "b", "c"])
}

fn kinds(log: &Log) -> Vec<Option<DrawKind>> {
    log.borrow().iter().map(|e| e.as_draw().map(DrawEvent::kind)).collect()
}

fn points(log: &Log) -> Vec<PointDraw> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            ChartEvent::Draw(DrawEvent::Point(p)) => Some(p.clone()),
            _ => None,
        })
        .collect()
}

fn created_count(log: &Log) -> usize {
    log.borrow().iter().filter(|e| matches!(e, ChartEvent::Created(_))).count()
}

#[test]
fn line_pass_emits_decorations_then_series_then_created() {
    let mut chart = Chart::line(sample(), ChartOptions::default()).with_rect(rect(300.0, 200.0));
    let log = record(&mut chart);
    let report = chart.render().unwrap();

    assert_eq!(report.completed, 1);
    assert_eq!(report.superseded, 0);
    assert_eq!(report.emitted, log.borrow().len());
    assert!(matches!(log.borrow().last(), Some(ChartEvent::Created(c)) if c.pass == 1));

    let kinds = kinds(&log);
    let first_point = kinds.iter().position(|k| *k == Some(DrawKind::Point)).unwrap();
    let line = kinds.iter().position(|k| *k == Some(DrawKind::Line)).unwrap();
    assert!(kinds[..first_point].iter().all(|k| matches!(k, Some(DrawKind::Grid | DrawKind::Label))));
    assert!(first_point < line);
    let labels = kinds.iter().filter(|k| **k == Some(DrawKind::Label)).count();
    assert!(labels >= 5, "three x labels plus at least two y labels, got {labels}");

    let pts = points(&log);
    let xs: Vec<f64> = pts.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![0.0, 100.0, 200.0]);
    // larger values sit higher on screen
    assert!(pts[1].y < pts[2].y && pts[2].y < pts[0].y);
    assert_eq!(chart.state(), PipelineState::Idle);
}

#[test]
fn identical_inputs_give_identical_passes() {
    let run = || {
        let mut chart = Chart::line(sample(), ChartOptions::default()).with_rect(rect(300.0, 200.0));
        let log = record(&mut chart);
        chart.render().unwrap();
        log.take()
    };
    assert_eq!(run(), run());
}

#[test]
fn configuration_errors_surface_before_any_draw() {
    let mut options = ChartOptions::default();
    options.axis_y.low = Some(10.0);
    options.axis_y.high = Some(5.0);
    let mut chart = Chart::line(sample(), options).with_rect(rect(300.0, 200.0));
    let log = record(&mut chart);

    let err = chart.render().unwrap_err();
    assert!(matches!(err, ChartError::InvertedRange { .. }), "{err}");
    assert!(log.borrow().is_empty());
    assert_eq!(chart.state(), PipelineState::Idle);
}

#[test]
fn failing_listeners_do_not_starve_the_rest() {
    let mut chart = Chart::line(sample(), ChartOptions::default());
    chart.on(|_| Err(anyhow!("listener refused")));
    chart.on(|event| {
        if matches!(event, ChartEvent::Created(_)) {
            panic!("listener blew up");
        }
        Ok(())
    });
    let log = record(&mut chart);

    let report = chart.render().unwrap();
    assert_eq!(report.completed, 1);
    assert_eq!(report.listener_failures, report.emitted + 1);
    assert_eq!(log.borrow().len(), report.emitted);
    assert_eq!(created_count(&log), 1);
}

#[test]
fn removed_listeners_see_nothing() {
    let mut chart = Chart::line(sample(), ChartOptions::default());
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let id = chart.on(move |_| {
        counter.set(counter.get() + 1);
        Ok(())
    });
    assert!(chart.off(id));
    assert!(!chart.off(id));
    chart.render().unwrap();
    assert_eq!(calls.get(), 0);
    assert_eq!(chart.listener_count(), 0);
}

#[test]
fn update_during_emission_supersedes_the_pass() {
    let mut chart = Chart::line(sample(), ChartOptions::default()).with_rect(rect(300.0, 200.0));
    let handle = chart.handle();
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    chart.on(move |event| {
        if !flag.get() && event.as_draw().is_some() {
            flag.set(true);
            handle.update_data(ChartData::from_rows([vec![2.0, 4.0]]).with_labels(["x", "y"]));
        }
        Ok(())
    });
    let log = record(&mut chart);

    let report = chart.render().unwrap();
    assert_eq!(report.superseded, 1);
    assert_eq!(report.completed, 1);
    assert_eq!(report.stages.first(), Some(&PipelineState::Normalizing));
    assert_eq!(created_count(&log), 1);
    assert!(matches!(log.borrow().last(), Some(ChartEvent::Created(c)) if c.pass == 2));
    // one stale draw got out before the update; the completed pass accounts for the rest
    let total = log.borrow().len();
    assert!(matches!(log.borrow().last(), Some(ChartEvent::Created(c)) if c.draw_count == total - 2));

    // everything after the stale draw is the new data
    let values: Vec<Option<f64>> = points(&log).iter().map(|p| p.value.y).collect();
    assert_eq!(values, vec![Some(2.0), Some(4.0)]);
    assert_eq!(chart.data().labels, vec!["x".to_string(), "y".to_string()]);
    assert!(!chart.handle().is_pending());
}

#[test]
fn resize_reenters_at_resolving() {
    let mut chart = Chart::line(sample(), ChartOptions::default());
    let first = chart.render().unwrap();
    assert_eq!(
        first.stages,
        vec![
            PipelineState::Normalizing,
            PipelineState::Resolving,
            PipelineState::Projecting,
            PipelineState::Interpolating,
            PipelineState::Drawing,
        ]
    );

    let resized = chart.resize(Viewport::new(400.0, 300.0), rect(400.0, 300.0)).unwrap();
    assert_eq!(resized.stages.first(), Some(&PipelineState::Resolving));
    assert!(!resized.stages.contains(&PipelineState::Normalizing));
    assert_eq!(chart.chart_rect(), rect(400.0, 300.0));

    let updated = chart.update_data(sample()).unwrap();
    assert_eq!(updated.stages.first(), Some(&PipelineState::Normalizing));
}

#[test]
fn viewport_change_announces_new_options() {
    let responsive = ResponsiveOptions::new()
        .with("(max-width: 600px)", PartialChartOptions::from_json(r#"{"showPoint": false}"#).unwrap());
    let mut chart = Chart::line(sample(), ChartOptions::default()).with_responsive_options(responsive);
    let log = record(&mut chart);
    chart.render().unwrap();
    assert!(!log.borrow().iter().any(|e| matches!(e, ChartEvent::OptionsChanged { .. })));
    assert!(!points(&log).is_empty());

    log.borrow_mut().clear();
    chart.resize(Viewport::new(500.0, 400.0), rect(500.0, 400.0)).unwrap();
    match log.borrow().first() {
        Some(ChartEvent::OptionsChanged { previous, current }) => {
            assert!(previous.show_point);
            assert!(!current.show_point);
        }
        other => panic!("expected OptionsChanged first, got {other:?}"),
    }
    assert!(points(&log).is_empty());
    assert!(!chart.resolved_options().unwrap().show_point);
    assert!(chart.options().show_point);

    // same viewport again: nothing changed
    log.borrow_mut().clear();
    chart.resize(Viewport::new(500.0, 400.0), rect(500.0, 400.0)).unwrap();
    assert!(!log.borrow().iter().any(|e| matches!(e, ChartEvent::OptionsChanged { .. })));
}

#[test]
fn holes_split_lines_and_count_coercions() {
    let data = ChartData::new(
        vec![],
        vec![RawSeries::new([RawPoint::number(1.0), RawPoint::hole(), RawPoint::number(f64::NAN), RawPoint::number(2.0), RawPoint::number(3.0)])],
    );
    let mut options = ChartOptions::default();
    options.show_area = true;
    let mut chart = Chart::line(data, options).with_rect(rect(500.0, 100.0));
    let log = record(&mut chart);
    let report = chart.render().unwrap();
    assert_eq!(report.coerced, 1);

    let events = log.borrow();
    let line = events
        .iter()
        .find_map(|e| match e {
            ChartEvent::Draw(DrawEvent::Line(d)) => Some(d.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(line.path.split_by_move().len(), 2);
    // the single-point run has no area, the two-point run has one
    let areas: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ChartEvent::Draw(DrawEvent::Area(d)) => Some(d),
            _ => None,
        })
        .collect();
    assert_eq!(areas.len(), 1);
    let pts = points(&log);
    assert_eq!(pts.len(), 3);

    // path draws carry their start point and first data index
    assert_eq!((line.index, line.x, line.y), (0, pts[0].x, pts[0].y));
    assert_eq!(areas[0].index, 3);
    assert_eq!(areas[0].x, pts[1].x);
}

#[test]
fn empty_data_still_completes() {
    let mut chart = Chart::line(ChartData::default(), ChartOptions::default());
    let log = record(&mut chart);
    let report = chart.render().unwrap();
    assert_eq!(report.completed, 1);
    assert!(points(&log).is_empty());
    match log.borrow().last() {
        Some(ChartEvent::Created(created)) => assert_eq!(created.axis_x.as_ref().map(|a| a.ticks.len()), Some(1)),
        other => panic!("expected Created, got {other:?}"),
    };
}

fn bars(log: &Log) -> Vec<BarDraw> {
    log.borrow()
        .iter()
        .filter_map(|e| match e {
            ChartEvent::Draw(DrawEvent::Bar(b)) => Some(b.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn bars_grow_from_zero() {
    let data = ChartData::from_rows([vec![1.0, -2.0]]).with_labels(["a", "b"]);
    let mut chart = Chart::bar(data, ChartOptions::default()).with_rect(rect(200.0, 100.0));
    let log = record(&mut chart);
    chart.render().unwrap();

    let bars = bars(&log);
    assert_eq!(bars.len(), 2);
    assert_eq!((bars[0].x1, bars[1].x1), (50.0, 150.0));
    assert_eq!(bars[0].y1, bars[1].y1);
    assert!(bars[0].y2 < bars[0].y1, "positive bar grows up");
    assert!(bars[1].y2 > bars[1].y1, "negative bar grows down");
}

#[test]
fn stacked_bars_continue_from_the_previous_series() {
    let data = ChartData::from_rows([vec![1.0], vec![2.0]]).with_labels(["a"]);
    let options =
        ChartOptions::from_json(r#"{"stackBars": true, "axisY": {"type": "fixed", "ticks": [0, 4]}}"#).unwrap();
    let mut chart = Chart::bar(data, options).with_rect(rect(100.0, 100.0));
    let log = record(&mut chart);
    chart.render().unwrap();

    let bars = bars(&log);
    assert_eq!(bars.len(), 2);
    assert_eq!((bars[0].y1, bars[0].y2), (100.0, 75.0));
    assert_eq!((bars[1].y1, bars[1].y2), (75.0, 25.0));
    assert_eq!(bars[0].x1, bars[1].x1);
}

#[test]
fn pie_slices_share_the_circle() {
    let data = ChartData::from_rows([vec![1.0], vec![1.0], vec![2.0]]);
    let mut chart = Chart::pie(data, ChartOptions::default()).with_rect(rect(100.0, 100.0));
    let log = record(&mut chart);
    chart.render().unwrap();

    let slices: Vec<SliceDraw> = log
        .borrow()
        .iter()
        .filter_map(|e| match e {
            ChartEvent::Draw(DrawEvent::Slice(s)) => Some(s.clone()),
            _ => None,
        })
        .collect();
    let angles: Vec<(f64, f64)> = slices.iter().map(|s| (s.start_angle, s.end_angle)).collect();
    assert_eq!(angles, vec![(0.0, 90.0), (90.0, 180.0), (180.0, 360.0)]);
    assert_eq!(slices[0].path.to_string(), "M100,50A50,50,0,0,0,50,0L50,50Z");
    match log.borrow().last() {
        Some(ChartEvent::Created(created)) => assert!(created.axis_x.is_none() && created.axis_y.is_none()),
        other => panic!("expected Created, got {other:?}"),
    };
}
