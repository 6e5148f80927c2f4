//! # Geometry Properties
//!
//! Checks that hold for whole families of inputs rather than single cases:
//! arc bisection continuity, corner clamping, wrap bounds, easing bounds and
//! barrier ordering.

use std::f64::consts::PI;

use luckydraw_core::geometry::{
    clamp_corner_radius, point_on_circle, round_rect, sector, trace_arc,
};
use luckydraw_core::text::layout_lines;
use luckydraw_core::{Easing, ImageLoadBarrier, Path, PathOp, Point, Rect};

/// Splits a traced arc into its `(first, last)` leaf endpoints.
fn leaf_endpoints(path: &Path) -> Vec<(Point, Point)> {
    let mut leaves = Vec::new();
    let mut from = None;
    for op in path.ops() {
        match *op {
            PathOp::LineTo(p) => from = Some(p),
            PathOp::ArcTo { to, .. } => {
                if let Some(p) = from.take() {
                    leaves.push((p, to));
                }
            }
            _ => {}
        }
    }
    leaves
}

/// Test: consecutive leaves of a bisected arc share their endpoints.
#[test]
fn test_bisected_arcs_are_continuous() {
    let radius = 120.0;
    for span_deg in [181.0, 200.0, 270.0, 359.0, 360.0, 540.0, 720.0] {
        for start_deg in [-90.0, 0.0, 33.0] {
            let start = start_deg * PI / 180.0;
            let end = start + span_deg * PI / 180.0;

            for forward in [true, false] {
                let mut path = Path::new();
                trace_arc(&mut path, radius, start, end, forward);
                let leaves = leaf_endpoints(&path);
                assert!(leaves.len() >= 2, "span {span_deg} was not bisected");

                for pair in leaves.windows(2) {
                    assert!(
                        pair[0].1.approx_eq(pair[1].0),
                        "gap between leaves for span {span_deg} forward={forward}"
                    );
                }

                let (first, last) = if forward { (start, end) } else { (end, start) };
                assert!(leaves[0].0.approx_eq(point_on_circle(first, radius)));
                assert!(leaves[leaves.len() - 1].1.approx_eq(point_on_circle(last, radius)));
            }
        }
    }
}

/// Test: every leaf of a bisected arc is below a half-turn and matches a
/// direct construction of that leaf.
#[test]
fn test_leaves_match_direct_construction() {
    let radius = 80.0;
    let start = 0.25;
    let end = start + 1.5 * PI;
    let mut path = Path::new();
    trace_arc(&mut path, radius, start, end, true);

    for (from, to) in leaf_endpoints(&path) {
        let a = from.y.atan2(from.x);
        let b = to.y.atan2(to.x);
        let mut span = (b - a).rem_euclid(2.0 * PI);
        if span > PI {
            span = 2.0 * PI - span;
        }
        assert!(span < PI, "leaf spans {span} rad");

        let mut direct = Path::new();
        trace_arc(&mut direct, radius, a, a + (b - a).rem_euclid(2.0 * PI), true);
        let direct = leaf_endpoints(&direct);
        assert_eq!(direct.len(), 1);
        assert!(direct[0].0.distance(from) < 1e-6);
        assert!(direct[0].1.distance(to) < 1e-6);
    }
}

/// Test: a full-circle sector stays closed and finite.
#[test]
fn test_full_turn_sector_is_finite() {
    let path = sector(40.0, 200.0, -PI / 2.0, 1.5 * PI, 4.0);
    assert_eq!(path.ops().last(), Some(&PathOp::Close));
    for op in path.ops() {
        let points: Vec<Point> = match *op {
            PathOp::MoveTo(p) | PathOp::LineTo(p) => vec![p],
            PathOp::ArcTo { control, to, .. } => vec![control, to],
            _ => Vec::new(),
        };
        for p in points {
            assert!(p.x.is_finite() && p.y.is_finite(), "{op:?}");
        }
    }
}

/// Test: corner radii never exceed half the shorter side.
#[test]
fn test_corner_radius_is_clamped() {
    for (w, h) in [(10.0, 10.0), (300.0, 20.0), (15.0, 90.0), (0.0, 40.0)] {
        for requested in [0.0, 3.0, 50.0, 1e6] {
            let limit = f64::min(w, h) / 2.0;
            assert!(clamp_corner_radius(w, h, requested) <= limit);

            let path = round_rect(Rect::new(0.0, 0.0, w, h), requested);
            for op in path.ops() {
                if let PathOp::ArcTo { radius, .. } = op {
                    assert!(*radius <= limit);
                }
            }
        }
    }
}

/// Test: wrapped lines respect a fixed bound unless a lone character is wider.
#[test]
fn test_wrapped_lines_respect_bound() {
    // Wide glyphs for digits, narrow for everything else.
    let measure = |s: &str| {
        s.chars()
            .map(|c| if c.is_ascii_digit() { 30.0 } else { 8.0 })
            .sum::<f64>()
    };
    let text = "grand prize 1000 coins and a 2 night stay";
    for bound in [20.0, 25.0, 48.0, 100.0] {
        let lines = layout_lines(text, true, measure, |_| bound);
        let rebuilt: String = lines.concat();
        assert_eq!(rebuilt, text);
        for line in &lines {
            assert!(!line.is_empty());
            let width = measure(line);
            assert!(
                width <= bound || line.chars().count() == 1,
                "`{line}` is {width} wide against {bound}"
            );
        }
    }
}

/// Test: easing never overshoots and lands exactly on both ends.
#[test]
fn test_easing_bounds() {
    for easing in [Easing::QuadIn, Easing::QuadOut] {
        for duration in [1.0, 16.0, 2500.0] {
            assert_eq!(easing.tween(0.0, 4.0, 10.0, duration), 4.0);
            assert_eq!(easing.tween(duration, 4.0, 10.0, duration), 14.0);
            assert_eq!(easing.tween(duration * 3.0, 4.0, 10.0, duration), 14.0);
            for step in 0..=50 {
                let v = easing.tween(duration * f64::from(step) / 50.0, 4.0, 10.0, duration);
                assert!((4.0..=14.0).contains(&v));
            }
        }
    }
}

/// Test: the barrier fires once, after the last completion.
#[test]
fn test_barrier_fires_after_kth_completion() {
    for k in 1..=6 {
        let mut barrier = ImageLoadBarrier::new(k);
        let releases: Vec<bool> = (0..k).map(|_| barrier.complete()).collect();
        assert_eq!(releases.iter().filter(|&&r| r).count(), 1);
        assert_eq!(releases.last(), Some(&true));
        assert!(!barrier.complete());
        assert!(!barrier.release_now());
    }
}
