// Copyright 2025 the Ripple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple geometry: sizing, scale, and translation formulas.
//!
//! Pure functions over [`kurbo`] types. The engine recomputes these on every
//! layout pass; nothing here holds state.
//!
//! - Bounded surfaces clip the ripple to their rectangle, so the foreground
//!   circle must grow past the bounding diagonal to cover the corners.
//! - Unbounded surfaces (icon buttons and the like) use a centered square
//!   ripple whose radius is simply the largest surface dimension.
//!
//! Zero-sized surfaces degenerate to zero-sized ripples; no formula here
//! produces NaN or infinity for finite non-negative input.

use kurbo::{Point, Rect, Size, Vec2};

/// Fraction of the largest surface dimension used as the starting diameter of
/// the foreground circle.
pub const INITIAL_ORIGIN_SCALE: f64 = 0.6;

/// Extra radius past the bounding diagonal, so the fully grown circle covers
/// the corners of a bounded surface with margin.
pub const PADDING: f64 = 10.0;

/// Derived sizing for one surface, recomputed on every layout pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RippleGeometry {
    /// Starting diameter of the foreground circle.
    pub initial_size: f64,
    /// Target radius the circle grows to.
    pub max_radius: f64,
    /// Scale factor `max_radius / initial_size` applied by the stylesheet.
    pub fg_scale: f64,
}

/// Compute sizing for a surface of the given dimensions.
///
/// The starting diameter is floored to an integer, and additionally floored to
/// an *even* integer when unbounded: unbounded ripples are centered by the
/// host stylesheet, and an odd diameter lands half a pixel off the grid.
pub fn compute(frame: Size, unbounded: bool) -> RippleGeometry {
    let max_dim = frame.width.max(frame.height);
    let mut initial_size = (max_dim * INITIAL_ORIGIN_SCALE).floor();
    if unbounded && initial_size % 2.0 != 0.0 {
        initial_size -= 1.0;
    }
    let max_radius = if unbounded {
        max_dim
    } else {
        let hypotenuse = (frame.width * frame.width + frame.height * frame.height).sqrt();
        hypotenuse + PADDING
    };
    let fg_scale = if initial_size > 0.0 {
        max_radius / initial_size
    } else {
        0.0
    };
    RippleGeometry {
        initial_size,
        max_radius,
        fg_scale,
    }
}

/// Centering offset for an unbounded ripple's foreground circle.
pub fn unbounded_center_offset(frame: Size, initial_size: f64) -> Point {
    Point::new(
        ((frame.width / 2.0) - (initial_size / 2.0)).round(),
        ((frame.height / 2.0) - (initial_size / 2.0)).round(),
    )
}

/// Convert a page-coordinate press position into surface-relative coordinates.
///
/// `page_offset` is the window scroll offset and `rect` the surface's
/// viewport-relative bounding rectangle at press time.
pub fn normalized_press_point(page_point: Point, page_offset: Vec2, rect: Rect) -> Point {
    Point::new(
        page_point.x - (page_offset.x + rect.x0),
        page_point.y - (page_offset.y + rect.y0),
    )
}

/// Start and end translations for the foreground circle of a bounded ripple.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FgTranslation {
    /// Translation at animation start: the press point, or the surface center
    /// for keyboard/programmatic activation.
    pub start: Point,
    /// Translation at animation end: always the surface center.
    pub end: Point,
}

/// Compute the foreground translation pair for a bounded surface.
///
/// `press` is the surface-relative press point for pointer activation, `None`
/// for keyboard or programmatic activation. Both coordinates are offset by
/// half the starting diameter so the circle is centered on its origin.
pub fn fg_translation(frame: Size, initial_size: f64, press: Option<Point>) -> FgTranslation {
    let center = Point::new(frame.width / 2.0, frame.height / 2.0);
    let origin = press.unwrap_or(center);
    let half = initial_size / 2.0;
    FgTranslation {
        start: Point::new(origin.x - half, origin.y - half),
        end: Point::new(center.x - half, center.y - half),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_geometry_uses_diagonal_plus_padding() {
        let geo = compute(Size::new(200.0, 100.0), false);

        assert_eq!(geo.initial_size, (200.0_f64 * INITIAL_ORIGIN_SCALE).floor());
        assert_eq!(geo.initial_size, 120.0);
        let expected_radius = (200.0_f64 * 200.0 + 100.0 * 100.0).sqrt() + PADDING;
        assert_eq!(geo.max_radius, expected_radius);
        assert_eq!(geo.fg_scale, expected_radius / 120.0);
    }

    #[test]
    fn unbounded_geometry_uses_max_dimension_without_padding() {
        let geo = compute(Size::new(200.0, 100.0), true);

        assert_eq!(geo.max_radius, 200.0);
        // floor(200 * 0.6) = 120 is already even.
        assert_eq!(geo.initial_size, 120.0);
    }

    #[test]
    fn unbounded_initial_size_is_floored_to_an_even_integer() {
        // floor(205 * 0.6) = 123, odd, so it drops to 122.
        let geo = compute(Size::new(205.0, 40.0), true);
        assert_eq!(geo.initial_size, 122.0);

        // The bounded formula keeps the odd floor.
        let bounded = compute(Size::new(205.0, 40.0), false);
        assert_eq!(bounded.initial_size, 123.0);
    }

    #[test]
    fn zero_sized_surface_degenerates_without_nan() {
        for unbounded in [false, true] {
            let geo = compute(Size::ZERO, unbounded);
            assert_eq!(geo.initial_size, 0.0);
            assert_eq!(geo.fg_scale, 0.0);
            assert!(geo.max_radius.is_finite());
        }
    }

    #[test]
    fn center_offset_rounds_to_whole_pixels() {
        let offset = unbounded_center_offset(Size::new(48.0, 48.0), 28.0);
        assert_eq!(offset, Point::new(10.0, 10.0));

        // 25/2 - 14/2 = 5.5 rounds up.
        let offset = unbounded_center_offset(Size::new(25.0, 25.0), 14.0);
        assert_eq!(offset, Point::new(6.0, 6.0));
    }

    #[test]
    fn press_point_is_normalized_against_scroll_and_rect_origin() {
        let rect = Rect::new(30.0, 50.0, 230.0, 150.0);
        let p = normalized_press_point(Point::new(140.0, 95.0), Vec2::new(100.0, 20.0), rect);
        assert_eq!(p, Point::new(10.0, 25.0));
    }

    #[test]
    fn pointer_translation_starts_at_the_press_point() {
        let t = fg_translation(Size::new(200.0, 100.0), 120.0, Some(Point::new(10.0, 25.0)));
        assert_eq!(t.start, Point::new(-50.0, -35.0));
        assert_eq!(t.end, Point::new(40.0, -10.0));
    }

    #[test]
    fn keyboard_translation_starts_at_the_center() {
        let t = fg_translation(Size::new(200.0, 100.0), 120.0, None);
        assert_eq!(t.start, t.end);
        assert_eq!(t.end, Point::new(40.0, -10.0));
    }
}
