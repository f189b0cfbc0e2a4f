// File: crates/sextant-core/tests/interpolation.rs
// Purpose: Path strategies: exact outputs for small inputs, hole handling and option parsing.

use sextant_core::path::PathElement;
use sextant_core::{DataValue, Interpolation, PathPoint, SegmentData, SvgPath};

fn points(coords: &[Option<(f64, f64)>]) -> Vec<PathPoint> {
    coords
        .iter()
        .enumerate()
        .map(|(index, c)| PathPoint {
            coords: *c,
            data: SegmentData { value: c.map_or(DataValue::HOLE, |(_, y)| DataValue::single(y)), index, meta: None },
        })
        .collect()
}

fn solid(coords: &[(f64, f64)]) -> Vec<PathPoint> {
    points(&coords.iter().copied().map(Some).collect::<Vec<_>>())
}

fn moves(path: &SvgPath) -> usize {
    path.commands.iter().filter(|c| matches!(c.element, PathElement::Move { .. })).count()
}

#[test]
fn step_postponed() {
    let path = Interpolation::step().interpolate(&solid(&[(0.0, 0.0), (1.0, 5.0), (2.0, 2.0)]));
    assert_eq!(path.to_string(), "M0,0L1,0L1,5L2,5L2,2");
    let indices: Vec<usize> = path.segment_data().map(|d| d.index).collect();
    assert_eq!(indices, vec![0, 1, 1, 2, 2]);
}

#[test]
fn step_not_postponed() {
    let step = Interpolation::Step { postpone: false, fill_holes: false };
    let path = step.interpolate(&solid(&[(0.0, 0.0), (1.0, 5.0), (2.0, 2.0)]));
    assert_eq!(path.to_string(), "M0,0L0,5L1,5L1,2L2,2");
}

#[test]
fn straight_lines() {
    let path = Interpolation::none().interpolate(&solid(&[(0.0, 0.0), (1.0, 5.0), (2.0, 2.0)]));
    assert_eq!(path.to_string(), "M0,0L1,5L2,2");
    let indices: Vec<usize> = path.segment_data().map(|d| d.index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn holes_split_paths_unless_filled() {
    let pts = points(&[Some((0.0, 0.0)), Some((1.0, 1.0)), None, Some((3.0, 3.0)), Some((4.0, 4.0))]);

    let split = Interpolation::none().interpolate(&pts);
    assert_eq!(split.to_string(), "M0,0L1,1M3,3L4,4");
    assert!(split.commands[2].after_hole);
    assert!(!split.commands[3].after_hole);

    let filled = Interpolation::None { fill_holes: true }.interpolate(&pts);
    assert_eq!(filled.to_string(), "M0,0L1,1L3,3L4,4");
    assert!(filled.commands[2].after_hole);
}

#[test]
fn every_strategy_keeps_hole_separated_runs_apart() {
    let pts = points(&[Some((0.0, 1.0)), Some((1.0, 3.0)), Some((2.0, 2.0)), None, Some((4.0, 1.0)), Some((5.0, 5.0)), Some((6.0, 0.0))]);
    for strategy in [
        Interpolation::none(),
        Interpolation::simple(),
        Interpolation::step(),
        Interpolation::cardinal(),
        Interpolation::monotone(),
    ] {
        let path = strategy.interpolate(&pts);
        assert_eq!(moves(&path), 2, "{strategy:?}: {path}");
        let filled = match strategy {
            Interpolation::None { .. } => Interpolation::None { fill_holes: true },
            Interpolation::Simple { divisor, .. } => Interpolation::Simple { divisor, fill_holes: true },
            Interpolation::Step { postpone, .. } => Interpolation::Step { postpone, fill_holes: true },
            Interpolation::Cardinal { tension, monotone, .. } => Interpolation::Cardinal { tension, fill_holes: true, monotone },
        };
        assert_eq!(moves(&filled.interpolate(&pts)), 1, "{filled:?}");
    }
}

#[test]
fn only_holes_give_an_empty_path() {
    for strategy in [Interpolation::none(), Interpolation::cardinal(), Interpolation::step()] {
        assert!(strategy.interpolate(&points(&[None, None])).is_empty());
        assert!(strategy.interpolate(&[]).is_empty());
    }
}

#[test]
fn cardinal_passes_through_every_point() {
    let input = [(0.0, 0.0), (10.0, 20.0), (20.0, 5.0), (30.0, 15.0)];
    let path = Interpolation::cardinal().interpolate(&solid(&input));
    let ends: Vec<(f64, f64)> = path.commands.iter().map(|c| c.element.end()).collect();
    assert_eq!(ends, input.to_vec());
    assert!(matches!(path.commands[1].element, PathElement::Curve { .. }));
}

#[test]
fn cardinal_control_points() {
    let path = Interpolation::cardinal().interpolate(&solid(&[(0.0, 0.0), (6.0, 6.0), (12.0, 0.0)]));
    // first segment: p0 = p1 = (0,0), p2 = (6,6), p3 = (12,0)
    match path.commands[1].element {
        PathElement::Curve { x1, y1, x2, y2, x, y } => {
            assert_eq!((x1, y1), (1.0, 1.0));
            assert_eq!((x2, y2), (4.0, 6.0));
            assert_eq!((x, y), (6.0, 6.0));
        }
        other => panic!("expected a curve, got {other:?}"),
    }
}

#[test]
fn cardinal_with_two_points_is_a_line() {
    let path = Interpolation::cardinal().interpolate(&solid(&[(0.0, 0.0), (5.0, 5.0)]));
    assert_eq!(path.to_string(), "M0,0L5,5");
}

#[test]
fn monotone_never_overshoots() {
    let input = [(0.0, 0.0), (1.0, 10.0), (2.0, 10.0), (3.0, 0.0), (4.0, 5.0)];
    let path = Interpolation::monotone().interpolate(&solid(&input));
    for window in path.commands.windows(2) {
        let (x0, y0) = window[0].element.end();
        if let PathElement::Curve { x1, y1, x2, y2, x, y } = window[1].element {
            let (lo, hi) = (y0.min(y), y0.max(y));
            assert!(y1 >= lo - 1e-9 && y1 <= hi + 1e-9, "control y1 {y1} outside [{lo}, {hi}]");
            assert!(y2 >= lo - 1e-9 && y2 <= hi + 1e-9, "control y2 {y2} outside [{lo}, {hi}]");
            assert!(x0 < x1 && x1 < x2 && x2 < x);
        }
    }
}

#[test]
fn simple_averages_windows() {
    let path = Interpolation::simple().interpolate(&solid(&[(0.0, 0.0), (2.0, 2.0), (4.0, 4.0), (6.0, 6.0)]));
    assert_eq!(path.len(), 2);
    assert_eq!(path.commands[0].element.end(), (1.0, 1.0));
    assert_eq!(path.commands[1].element.end(), (5.0, 5.0));
    // each average carries the last point of its window
    assert_eq!(path.commands[1].data.as_ref().map(|d| d.index), Some(3));
}

#[test]
fn parses_all_option_forms() {
    let parse = |json: &str| serde_json::from_str::<Interpolation>(json);
    assert_eq!(parse("true").unwrap(), Interpolation::cardinal());
    assert_eq!(parse("false").unwrap(), Interpolation::none());
    assert_eq!(parse(r#""monotone""#).unwrap(), Interpolation::monotone());
    assert_eq!(
        parse(r#"{"type": "step", "postpone": false, "fillHoles": true}"#).unwrap(),
        Interpolation::Step { postpone: false, fill_holes: true }
    );
    assert_eq!(
        parse(r#"{"type": "cardinal", "tension": 0.2}"#).unwrap(),
        Interpolation::Cardinal { tension: 0.2, fill_holes: false, monotone: false }
    );
    assert_eq!(parse(r#"{"type": "simple", "divisor": 3}"#).unwrap(), Interpolation::Simple { divisor: 3, fill_holes: false });

    let err = parse(r#""wiggly""#).unwrap_err();
    assert!(err.to_string().contains("lineSmooth"), "{err}");
    assert!("bezier".parse::<Interpolation>().is_err());
}
