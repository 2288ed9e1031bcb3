#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use perch_core::{Insets, Rect, Size};
use perch_layout::{ArrowBounds, PlacementRequest, PreferredSide, UsableArea, solve};

#[derive(Debug, Arbitrary)]
struct Input {
    target: [f64; 4],
    container: [f64; 2],
    tooltip: [f64; 2],
    preferred: u8,
    gap: f64,
    margins: [f64; 4],
    safe_area: [f64; 4],
    keyboard_height: f64,
    bounds: [f64; 2],
}

fn insets(v: [f64; 4]) -> Insets {
    Insets::new(v[0], v[1], v[2], v[3])
}

fuzz_target!(|input: Input| {
    let preferred = match input.preferred % 5 {
        0 => PreferredSide::Top,
        1 => PreferredSide::Bottom,
        2 => PreferredSide::Leading,
        3 => PreferredSide::Trailing,
        _ => PreferredSide::Auto,
    };
    let request = PlacementRequest::new(
        Rect::new(input.target[0], input.target[1], input.target[2], input.target[3]),
        Size::new(input.container[0], input.container[1]),
        Size::new(input.tooltip[0], input.tooltip[1]),
    )
    .preferred(preferred)
    .gap(input.gap)
    .margins(insets(input.margins))
    .safe_area(insets(input.safe_area))
    .keyboard_height(input.keyboard_height)
    .arrow_bounds(ArrowBounds::new(input.bounds[0], input.bounds[1]));

    // Must never panic, whatever the numbers.
    let placement = solve(&request);

    assert!(
        request.arrow_bounds.contains(placement.arrow_fraction),
        "arrow fraction {} escapes {:?}",
        placement.arrow_fraction,
        request.arrow_bounds
    );

    let all_finite = input
        .target
        .iter()
        .chain(&input.container)
        .chain(&input.tooltip)
        .chain(&input.margins)
        .chain(&input.safe_area)
        .chain([&input.gap, &input.keyboard_height])
        .all(|v| v.is_finite() && v.abs() < 1e9);
    if !all_finite {
        return;
    }

    let area = UsableArea::from_request(&request);
    if area.fits(request.tooltip) && request.tooltip.width >= 0.0 && request.tooltip.height >= 0.0 {
        let tolerance = 1e-6 * area.width().max(area.height()).max(1.0);
        assert!(
            area.rect().contains_rect(&placement.frame, tolerance),
            "frame {:?} escapes {:?}",
            placement.frame,
            area
        );
    }
});
