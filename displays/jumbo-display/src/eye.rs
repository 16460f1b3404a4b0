//! Eye renderer
//!
//! Draws one [`EyeFrame`] as a stack of shapes: the white of the eye, the
//! pupil, black lid masks cut along the four lid points, and finally the
//! blink lid coming down from the top.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use jumbo_core::face::EyeFrame;

use crate::shapes::Shape;

/// Horizontal reach of the lid masks past the eye edge (px)
const MASK_OVERHANG_X: i32 = 5;

/// Vertical reach of the lid masks past the eye edge (px)
const MASK_OVERHANG_Y: i32 = 10;

/// Extra width of the blink lid on each side (px)
const BLINK_OVERHANG_X: i32 = 2;

/// Renders eye frames onto a 1-bit target
#[derive(Debug, Default, Clone, Copy)]
pub struct EyeRenderer;

impl EyeRenderer {
    pub fn draw<D>(&self, frame: &EyeFrame, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        for shape in Self::shapes(frame).iter().flatten() {
            shape.draw(target)?;
        }
        Ok(())
    }

    /// Shapes making up one eye, in draw order
    pub fn shapes(frame: &EyeFrame) -> [Option<Shape>; 7] {
        let geo = &frame.geometry;
        let r = geo.radius as i32;
        let cx = geo.center.x;
        let cy = geo.center.y + frame.bounce_px;
        let center = Point::new(cx, cy);

        let sclera = Shape::Disc {
            center,
            radius: geo.radius as u32,
            color: BinaryColor::On,
        };

        let pupil = frame.pupil_visible().then(|| Shape::Disc {
            center: center
                + Point::new(
                    libm::roundf(frame.gaze.dx) as i32,
                    libm::roundf(frame.gaze.dy) as i32,
                ),
            radius: frame.scaled_pupil_radius(),
            color: BinaryColor::Off,
        });

        // Outer side is away from the nose: left for the left eye
        let (outer_x, inner_x) = if geo.is_left {
            (cx - r - MASK_OVERHANG_X, cx + r + MASK_OVERHANG_X)
        } else {
            (cx + r + MASK_OVERHANG_X, cx - r - MASK_OVERHANG_X)
        };
        let lid_y = |offset: f32| cy + (r as f32 * offset) as i32;
        let p = &frame.params;
        let top_outer = Point::new(outer_x, lid_y(p.top_outer));
        let top_inner = Point::new(inner_x, lid_y(p.top_inner));
        let bottom_outer = Point::new(outer_x, lid_y(p.bottom_outer));
        let bottom_inner = Point::new(inner_x, lid_y(p.bottom_inner));

        let top = cy - r - MASK_OVERHANG_Y;
        let bottom = cy + r + MASK_OVERHANG_Y;
        let mask = |a, b, c| Shape::Triangle {
            a,
            b,
            c,
            color: BinaryColor::Off,
        };

        let blink = (frame.blink_percent > 0.0).then(|| Shape::Box {
            top_left: Point::new(cx - r - BLINK_OVERHANG_X, cy - r),
            size: Size::new(
                (2 * r + 2 * BLINK_OVERHANG_X) as u32,
                (2.0 * r as f32 * frame.blink_percent.min(1.0)) as u32,
            ),
            color: BinaryColor::Off,
        });

        [
            Some(sclera),
            pupil,
            Some(mask(
                Point::new(outer_x, top),
                Point::new(inner_x, top),
                top_inner,
            )),
            Some(mask(Point::new(outer_x, top), top_inner, top_outer)),
            Some(mask(
                Point::new(outer_x, bottom),
                Point::new(inner_x, bottom),
                bottom_inner,
            )),
            Some(mask(Point::new(outer_x, bottom), bottom_inner, bottom_outer)),
            blink,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FrameBuffer;
    use jumbo_core::face::{EyeGeometry, Expression, Offset, Point as FacePoint};

    fn frame(expression: Expression, blink_percent: f32) -> EyeFrame {
        EyeFrame {
            geometry: EyeGeometry::new(FacePoint::new(32, 26), 20, true),
            expression,
            params: expression.params(),
            blink_percent,
            gaze: Offset::ZERO,
            bounce_px: 0,
        }
    }

    fn render(frame: &EyeFrame) -> FrameBuffer {
        let mut fb = FrameBuffer::new();
        EyeRenderer.draw(frame, &mut fb).unwrap();
        fb
    }

    #[test]
    fn test_open_eye_has_pupil_hole() {
        let fb = render(&frame(Expression::Shocked, 0.0));
        assert!(!fb.is_on(32, 26));
        // Shocked pupil is half size, so 9px out is white
        assert!(fb.is_on(41, 26));
        assert!(fb.is_on(48, 20));
    }

    #[test]
    fn test_calm_pupil_is_full_size() {
        let fb = render(&frame(Expression::Calm, 0.0));
        assert!(!fb.is_on(41, 26));
        assert!(fb.is_on(48, 26));
    }

    #[test]
    fn test_top_lid_masks_above_line() {
        // Calm top lid sits 2px above centre
        let fb = render(&frame(Expression::Calm, 0.0));
        assert!(!fb.is_on(48, 12));
        assert!(!fb.is_on(20, 20));
    }

    #[test]
    fn test_blink_lid_covers_from_top() {
        let open = render(&frame(Expression::Shocked, 0.0));
        let half = render(&frame(Expression::Shocked, 0.5));
        assert!(open.is_on(48, 20));
        assert!(!half.is_on(48, 20));
        assert!(half.is_on(48, 30));
    }

    #[test]
    fn test_closed_eye_hides_pupil() {
        let f = frame(Expression::Sleep, 1.0);
        let shapes = EyeRenderer::shapes(&f);
        assert!(shapes[1].is_none());

        let open = render(&frame(Expression::Calm, 0.0));
        let shut = render(&f);
        assert!(shut.lit() * 10 < open.lit());
    }

    #[test]
    fn test_masks_mirror_for_right_eye() {
        let mut f = frame(Expression::Sad, 0.0);
        f.geometry = EyeGeometry::new(FacePoint::new(96, 26), 20, false);
        match EyeRenderer::shapes(&f)[3] {
            Some(Shape::Triangle { c, .. }) => assert_eq!(c.x, 96 + 20 + MASK_OVERHANG_X),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bounce_shifts_eye() {
        let mut f = frame(Expression::Happy, 0.0);
        f.bounce_px = -1;
        match EyeRenderer::shapes(&f)[0] {
            Some(Shape::Disc { center, .. }) => assert_eq!(center, Point::new(32, 25)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_gaze_moves_pupil() {
        let mut f = frame(Expression::Calm, 0.0);
        f.gaze = Offset::new(5.6, -0.4);
        match EyeRenderer::shapes(&f)[1] {
            Some(Shape::Disc { center, .. }) => assert_eq!(center, Point::new(38, 26)),
            other => panic!("unexpected {:?}", other),
        }
    }
}
