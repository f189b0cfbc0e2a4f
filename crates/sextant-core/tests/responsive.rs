// File: crates/sextant-core/tests/responsive.rs
// Purpose: Media query evaluation and responsive option resolution.

use sextant_core::media::MediaType;
use sextant_core::responsive::resolve_detailed;
use sextant_core::{
    resolve, ChartOptions, Interpolation, LabelFormatter, MediaMatcher, PartialAxisOptions, PartialChartOptions,
    ResponsiveOptions, Viewport,
};

fn partial(json: &str) -> PartialChartOptions {
    PartialChartOptions::from_json(json).unwrap()
}

#[test]
fn later_matching_rules_win() {
    let base = ChartOptions::default();
    assert!(base.show_point);
    let responsive = ResponsiveOptions::new()
        .with("(min-width:0px)", partial(r#"{"showPoint": false}"#))
        .with("(min-width:9999px)", partial(r#"{"showPoint": true}"#));
    let resolved = resolve(&base, &responsive, &Viewport::new(500.0, 400.0));
    assert!(!resolved.show_point);

    let wide = resolve(&base, &responsive, &Viewport::new(10_000.0, 400.0));
    assert!(wide.show_point);
}

#[test]
fn nested_groups_merge_and_lists_replace() {
    let mut base = ChartOptions::default();
    base.axis_x.ticks = Some(vec![1.0, 2.0, 3.0]);
    base.axis_x.offset = 50.0;
    let responsive = ResponsiveOptions::new().with("all", partial(r#"{"axisX": {"ticks": [9], "showGrid": false}}"#));
    let resolved = resolve(&base, &responsive, &Viewport::default());
    assert_eq!(resolved.axis_x.ticks, Some(vec![9.0]));
    assert!(!resolved.axis_x.show_grid);
    assert_eq!(resolved.axis_x.offset, 50.0);
    assert!(resolved.axis_x.show_label);
}

#[test]
fn formatters_are_replaced_wholesale() {
    let mut base = ChartOptions::default();
    let original = LabelFormatter::every_nth(1);
    base.axis_x.label_interpolation = Some(original.clone());
    let replacement = LabelFormatter::every_nth(3);
    let overrides = PartialChartOptions {
        axis_x: Some(PartialAxisOptions { label_interpolation: Some(replacement.clone()), ..Default::default() }),
        ..Default::default()
    };
    let responsive = ResponsiveOptions::new().with("screen", overrides);
    let resolved = resolve(&base, &responsive, &Viewport::default());
    assert_eq!(resolved.axis_x.label_interpolation, Some(replacement));

    let printed = resolve(&base, &responsive, &Viewport::default().with_media(MediaType::Print));
    assert_eq!(printed.axis_x.label_interpolation, Some(original));
}

#[test]
fn resolution_is_pure() {
    let base = ChartOptions::default();
    let responsive = ResponsiveOptions::new().with("(max-width: 600px)", partial(r#"{"lineSmooth": "step"}"#));
    let vp = Viewport::new(320.0, 480.0);
    let a = resolve(&base, &responsive, &vp);
    let b = resolve(&base, &responsive, &vp);
    assert_eq!(a, b);
    assert_eq!(a.line_smooth, Interpolation::step());
    assert_eq!(base, ChartOptions::default());
}

#[test]
fn unsupported_queries_do_not_match() {
    let responsive = ResponsiveOptions::new()
        .with("(prefers-color-scheme: dark)", partial(r#"{"showArea": true}"#))
        .with("screen and (min-width: 40em)", partial(r#"{"fullWidth": true}"#));
    let r = resolve_detailed(&ChartOptions::default(), &responsive, &Viewport::new(800.0, 600.0));
    assert!(!r.options.show_area);
    assert!(r.options.full_width);
    assert_eq!(r.matched, vec![1]);
    assert_eq!(r.unsupported, vec!["(prefers-color-scheme: dark)".to_string()]);
}

#[test]
fn responsive_rules_from_json() {
    let responsive = ResponsiveOptions::from_json(
        r#"[
            ["screen and (max-width: 640px)", {"showPoint": false, "axisX": {"offset": 10}}],
            ["print", {"showArea": true}]
        ]"#,
    )
    .unwrap();
    assert_eq!(responsive.len(), 2);
    let small = resolve(&ChartOptions::default(), &responsive, &Viewport::new(600.0, 800.0));
    assert!(!small.show_point);
    assert_eq!(small.axis_x.offset, 10.0);
    assert!(!small.show_area);
}

#[test]
fn media_features() {
    let landscape = Viewport::new(800.0, 600.0);
    let portrait = Viewport::new(600.0, 800.0);
    let cases = [
        ("(orientation: landscape)", Some(true), Some(false)),
        ("(orientation: portrait)", Some(false), Some(true)),
        ("(min-aspect-ratio: 4/3)", Some(true), Some(false)),
        ("(aspect-ratio: 4/3)", Some(true), Some(false)),
        ("(max-height: 700px)", Some(true), Some(false)),
        ("(width: 800px)", Some(true), Some(false)),
        ("not screen and (min-width: 700px)", Some(false), Some(true)),
        ("only screen", Some(true), Some(true)),
        ("tv", Some(false), Some(false)),
        ("(min-width: 10vw)", None, None),
        ("", Some(true), Some(true)),
    ];
    for (query, want_landscape, want_portrait) in cases {
        assert_eq!(landscape.matches(query), want_landscape, "{query} on landscape");
        assert_eq!(portrait.matches(query), want_portrait, "{query} on portrait");
    }
}
