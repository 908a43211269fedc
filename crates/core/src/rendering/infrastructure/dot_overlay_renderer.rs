use crate::rendering::domain::overlay_renderer::OverlayRenderer;
use crate::shared::frame::Frame;

pub const DEFAULT_RADIUS: f64 = 1.0;

/// Cyan (#32EEDB).
pub const DEFAULT_COLOR: [u8; 3] = [0x32, 0xEE, 0xDB];

/// Draws a filled circle per point, clipped to the frame.
///
/// A pixel is filled when its center lies within `radius` of the point.
pub struct DotOverlayRenderer {
    radius: f64,
    color: [u8; 3],
}

impl DotOverlayRenderer {
    pub fn new(radius: f64, color: [u8; 3]) -> Self {
        Self {
            radius: radius.max(0.0),
            color,
        }
    }

    fn fill_circle(
        &self,
        data: &mut [u8],
        (fw, fh, channels): (usize, usize, usize),
        (cx, cy): (f64, f64),
    ) {
        let r = self.radius;
        let x_min = (cx - r).floor().max(0.0) as usize;
        let y_min = (cy - r).floor().max(0.0) as usize;
        let x_max = ((cx + r).ceil() as i64).min(fw as i64 - 1);
        let y_max = ((cy + r).ceil() as i64).min(fh as i64 - 1);
        if x_max < 0 || y_max < 0 {
            return;
        }
        let r_sq = r * r;

        for py in y_min..=y_max as usize {
            let dy = py as f64 + 0.5 - cy;
            for px in x_min..=x_max as usize {
                let dx = px as f64 + 0.5 - cx;
                if dx * dx + dy * dy > r_sq {
                    continue;
                }
                let offset = (py * fw + px) * channels;
                let pixel = &mut data[offset..offset + channels];
                match channels {
                    1 | 2 => pixel[0] = luma(self.color),
                    _ => pixel[..3].copy_from_slice(&self.color),
                }
                if channels == 2 || channels == 4 {
                    pixel[channels - 1] = u8::MAX;
                }
            }
        }
    }
}

impl Default for DotOverlayRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS, DEFAULT_COLOR)
    }
}

impl OverlayRenderer for DotOverlayRenderer {
    fn draw_points(&self, frame: &mut Frame, points: &[(f64, f64)]) {
        let fw = frame.width() as usize;
        let fh = frame.height() as usize;
        let channels = frame.channels() as usize;
        if fw == 0 || fh == 0 || channels == 0 {
            return;
        }
        let data = frame.data_mut();
        for &(x, y) in points {
            if x.is_finite() && y.is_finite() {
                self.fill_circle(data, (fw, fh, channels), (x, y));
            }
        }
    }
}

fn luma([r, g, b]: [u8; 3]) -> u8 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black(w: u32, h: u32, channels: u8) -> Frame {
        Frame::new(vec![0; (w * h * channels as u32) as usize], w, h, channels, 0)
    }

    fn pixel(frame: &Frame, x: usize, y: usize) -> &[u8] {
        let c = frame.channels() as usize;
        let offset = (y * frame.width() as usize + x) * c;
        &frame.data()[offset..offset + c]
    }

    fn painted(frame: &Frame) -> usize {
        let c = frame.channels() as usize;
        frame.data().chunks(c).filter(|p| p.iter().any(|&v| v != 0)).count()
    }

    #[test]
    fn test_default_radius_paints_four_pixels_around_a_corner() {
        let mut frame = black(10, 10, 3);

        DotOverlayRenderer::default().draw_points(&mut frame, &[(5.0, 5.0)]);

        // Pixel centers (4.5|5.5, 4.5|5.5) are ~0.71 from (5, 5).
        assert_eq!(painted(&frame), 4);
        assert_eq!(pixel(&frame, 4, 4), &DEFAULT_COLOR);
        assert_eq!(pixel(&frame, 5, 5), &DEFAULT_COLOR);
        assert_eq!(pixel(&frame, 6, 5), &[0, 0, 0]);
    }

    #[test]
    fn test_larger_radius_is_a_filled_disc() {
        let mut frame = black(20, 20, 3);

        DotOverlayRenderer::new(3.0, [255, 0, 0]).draw_points(&mut frame, &[(10.0, 10.0)]);

        assert_eq!(pixel(&frame, 10, 10), &[255, 0, 0]);
        assert_eq!(pixel(&frame, 7, 9), &[255, 0, 0]);
        assert_eq!(pixel(&frame, 7, 7), &[0, 0, 0]); // corner outside the disc
    }

    #[test]
    fn test_points_outside_frame_are_clipped() {
        let mut frame = black(4, 4, 3);

        let points = [(-0.5, -0.5), (100.0, 2.0)];
        DotOverlayRenderer::new(2.0, [9, 9, 9]).draw_points(&mut frame, &points);

        assert_eq!(pixel(&frame, 0, 0), &[9, 9, 9]);
        assert_eq!(pixel(&frame, 3, 3), &[0, 0, 0]);
    }

    #[test]
    fn test_rgba_frame_gets_opaque_alpha() {
        let mut frame = black(4, 4, 4);

        DotOverlayRenderer::default().draw_points(&mut frame, &[(2.0, 2.0)]);

        assert_eq!(pixel(&frame, 2, 2), &[0x32, 0xEE, 0xDB, 255]);
    }

    #[test]
    fn test_non_finite_points_are_ignored() {
        let mut frame = black(4, 4, 3);

        let points = [(f64::NAN, 1.0), (1.0, f64::INFINITY)];
        DotOverlayRenderer::default().draw_points(&mut frame, &points);

        assert_eq!(painted(&frame), 0);
    }

    #[test]
    fn test_empty_frame_is_noop() {
        let mut frame = Frame::empty();
        DotOverlayRenderer::default().draw_points(&mut frame, &[(0.0, 0.0)]);
        assert!(frame.data().is_empty());
    }
}
