//! Drawable shapes
//!
//! A closed set of primitives, each drawn straight onto a 1-bit target.
//! Curves are approximated with short line segments.
//!
//! This is the whole drawing vocabulary of the face, public so firmware and
//! host tools can draw extra decorations. The eye renderer itself only needs
//! `Disc`, `Triangle` and `Box`; `RoundedBox`, `Line`, `Lemniscate` and
//! `Curve` are for outlines such as frames, brows or a "dizzy" figure-eight.

use core::f32::consts::TAU;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Line, PrimitiveStyle, Rectangle, RoundedRectangle, Triangle,
};

/// Parameter step used when tracing the lemniscate (radians)
const LEMNISCATE_STEP: f32 = 0.1;

/// Segments used for a quadratic curve
const CURVE_SEGMENTS: u32 = 10;

/// One drawable primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Filled circle; `Off` erases
    Disc {
        center: Point,
        radius: u32,
        color: BinaryColor,
    },
    /// Rounded rectangle outline
    RoundedBox {
        top_left: Point,
        size: Size,
        corner: u32,
    },
    /// Single-pixel line
    Line { from: Point, to: Point },
    /// Filled triangle; `Off` erases
    Triangle {
        a: Point,
        b: Point,
        c: Point,
        color: BinaryColor,
    },
    /// Filled rectangle; `Off` erases
    Box {
        top_left: Point,
        size: Size,
        color: BinaryColor,
    },
    /// Figure-eight (lemniscate of Bernoulli) outline
    Lemniscate { center: Point, size: i32 },
    /// Quadratic Bézier outline
    Curve {
        start: Point,
        control: Point,
        end: Point,
    },
}

impl Shape {
    /// Draw onto `target`
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
        match *self {
            Shape::Disc {
                center,
                radius,
                color,
            } => Circle::with_center(center, radius * 2 + 1)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(target),
            Shape::RoundedBox {
                top_left,
                size,
                corner,
            } => RoundedRectangle::with_equal_corners(
                Rectangle::new(top_left, size),
                Size::new(corner, corner),
            )
            .into_styled(stroke)
            .draw(target),
            Shape::Line { from, to } => Line::new(from, to).into_styled(stroke).draw(target),
            Shape::Triangle { a, b, c, color } => Triangle::new(a, b, c)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(target),
            Shape::Box {
                top_left,
                size,
                color,
            } => Rectangle::new(top_left, size)
                .into_styled(PrimitiveStyle::with_fill(color))
                .draw(target),
            Shape::Lemniscate { center, size } => {
                polyline(lemniscate_points(center, size), target)
            }
            Shape::Curve {
                start,
                control,
                end,
            } => polyline(curve_points(start, control, end), target),
        }
    }
}

/// Join consecutive points with lines
fn polyline<D, I>(points: I, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
    I: IntoIterator<Item = Point>,
{
    let stroke = PrimitiveStyle::with_stroke(BinaryColor::On, 1);
    let mut points = points.into_iter();
    let Some(mut prev) = points.next() else {
        return Ok(());
    };
    for next in points {
        Line::new(prev, next).into_styled(stroke).draw(target)?;
        prev = next;
    }
    Ok(())
}

fn lemniscate_points(center: Point, size: i32) -> impl Iterator<Item = Point> {
    let steps = (TAU / LEMNISCATE_STEP) as u32;
    let a = size as f32;
    (0..=steps).map(move |i| {
        let t = i as f32 * LEMNISCATE_STEP;
        let (s, c) = (libm::sinf(t), libm::cosf(t));
        let den = 1.0 + s * s;
        Point::new(
            center.x + (a * c / den) as i32,
            center.y + (a * c * s / den) as i32,
        )
    })
}

fn curve_points(p0: Point, p1: Point, p2: Point) -> impl Iterator<Item = Point> {
    (0..=CURVE_SEGMENTS).map(move |i| {
        let t = i as f32 / CURVE_SEGMENTS as f32;
        let a = (1.0 - t) * (1.0 - t);
        let b = 2.0 * (1.0 - t) * t;
        let c = t * t;
        Point::new(
            (a * p0.x as f32 + b * p1.x as f32 + c * p2.x as f32) as i32,
            (a * p0.y as f32 + b * p1.y as f32 + c * p2.y as f32) as i32,
        )
    })
}
