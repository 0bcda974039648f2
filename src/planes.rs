//! Contains the Viewport struct, which describes a relationship
//! between the integral pixel plane of the output image and a
//! rectangular region of the complex plane.  Unlike a corner-to-corner
//! mapping, the viewport is described by its center and the size of a
//! single pixel, because zooming replaces the whole mapping anyway and
//! a center point is the natural thing to carry across a zoom.

use num::Complex;

/// An axis-aligned rectangle on the complex plane.  `x1` is always the
/// smaller of the two x bounds.  The y bounds follow screen
/// orientation: `y1` is the *top* of the rectangle, which on the
/// complex plane is the numerically larger value, and `y2` is the
/// bottom.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneRect {
    /// Left bound (smallest x).
    pub x1: f64,
    /// Right bound (largest x).
    pub x2: f64,
    /// Top bound (largest y).
    pub y1: f64,
    /// Bottom bound (smallest y).
    pub y2: f64,
}

impl PlaneRect {
    /// The center of the rectangle.
    pub fn midpoint(&self) -> Complex<f64> {
        Complex::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }
}

/// Describes the x, y of a point on the integral pixel plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(
    /// Column, from 0 at the left edge.
    pub usize,
    /// Row, from 0 at the top edge.
    pub usize,
);

/// The viewport: a `width` x `height` pixel image laid over the
/// complex plane, centered on `center`, where each pixel edge spans
/// `pixel_size` plane units.
///
/// A viewport is a value, not a place.  Zooming or recentering
/// produces a brand-new viewport and the old one is discarded, since
/// every pixel's mapping goes stale the moment the center or the pixel
/// size changes.  Nothing in this struct is ever mutated in place.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Image width in pixels, > 0.
    pub width: usize,
    /// Image height in pixels, > 0.
    pub height: usize,
    /// The plane point under the exact center of the image.
    pub center: Complex<f64>,
    /// Plane distance spanned by one pixel edge, > 0.
    pub pixel_size: f64,
}

impl Viewport {
    /// Constructor.  Validation of the dimensions happens where the
    /// configuration is assembled; this just records the values.
    pub fn new(width: usize, height: usize, center: Complex<f64>, pixel_size: f64) -> Viewport {
        Viewport {
            width,
            height,
            center,
            pixel_size,
        }
    }

    /// The plane point under the top-left corner of pixel (0, 0).
    pub fn top_left(&self) -> Complex<f64> {
        Complex::new(
            self.center.re - self.pixel_size * (self.width as f64) / 2.0,
            self.center.im + self.pixel_size * (self.height as f64) / 2.0,
        )
    }

    /// Given the column and row of a pixel, return the plane rectangle
    /// that pixel covers.  Exact up to IEEE-754 double arithmetic; no
    /// rounding of its own.
    pub fn pixel_rect(&self, px: usize, py: usize) -> PlaneRect {
        let tl = self.top_left();
        let x1 = tl.re + self.pixel_size * (px as f64);
        let y1 = tl.im - self.pixel_size * (py as f64);
        PlaneRect {
            x1,
            x2: x1 + self.pixel_size,
            y1,
            y2: y1 - self.pixel_size,
        }
    }

    /// The continuous pixel-to-plane mapping: fractional pixel
    /// coordinates are meaningful, and `plane_point(px, py)` is the
    /// top-left corner of `pixel_rect(px, py)` for whole numbers.
    /// The zoom operation goes through this mapping, which keeps zoom
    /// consistent with `pixel_rect`.
    pub fn plane_point(&self, px: f64, py: f64) -> Complex<f64> {
        let tl = self.top_left();
        Complex::new(tl.re + self.pixel_size * px, tl.im - self.pixel_size * py)
    }

    /// Given a point on the complex plane, map that as closely as
    /// possible to a pixel of this viewport.  Returns `None` for
    /// points that fall outside the image.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let tl = self.top_left();
        let left = (point.re - tl.re) / self.pixel_size;
        let top = (tl.im - point.im) / self.pixel_size;
        if left < 0.0 || left >= self.width as f64 || top < 0.0 || top >= self.height as f64 {
            return None;
        }
        Some(Pixel(left as usize, top as usize))
    }

    /// Builds the viewport for a zoom request: the click pixel is the
    /// center of a requested sub-rectangle of `req_w` x `req_h`
    /// pixels, and the new viewport shows that sub-rectangle across
    /// the full image.  The new pixel size takes the *max* of the two
    /// per-axis ratios, so the requested region is fully covered
    /// without distorting the aspect ratio.
    ///
    /// A click on the exact center pixel with `req_w = width / 4`
    /// recenters onto the same center, four times magnified.
    pub fn zoom_to(&self, px: usize, py: usize, req_w: usize, req_h: usize) -> Viewport {
        let center = self.plane_point(px as f64, py as f64);
        let dx = self.pixel_size * (req_w as f64);
        let dy = self.pixel_size * (req_h as f64);
        let pixel_size = f64::max(dx / (self.width as f64), dy / (self.height as f64));
        Viewport {
            width: self.width,
            height: self.height,
            center,
            pixel_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(100, 100, Complex::new(-0.5, 0.0), 0.03)
    }

    #[test]
    fn top_left_is_half_an_image_away_from_center() {
        let vp = viewport();
        assert_eq!(vp.top_left(), Complex::new(-2.0, 1.5));
    }

    #[test]
    fn pixel_rect_spans_one_pixel_size() {
        let vp = viewport();
        let rect = vp.pixel_rect(0, 0);
        assert_eq!(rect.x1, -2.0);
        assert_eq!(rect.x2, -2.0 + 0.03);
        assert_eq!(rect.y1, 1.5);
        assert_eq!(rect.y2, 1.5 - 0.03);
    }

    #[test]
    fn pixel_rect_agrees_with_plane_point() {
        let vp = viewport();
        let rect = vp.pixel_rect(42, 17);
        let corner = vp.plane_point(42.0, 17.0);
        assert_eq!(rect.x1, corner.re);
        assert_eq!(rect.y1, corner.im);
    }

    #[test]
    fn point_to_pixel_inverts_the_rect_midpoint() {
        let vp = viewport();
        for &(px, py) in &[(0, 0), (42, 17), (99, 99)] {
            let mid = vp.pixel_rect(px, py).midpoint();
            assert_eq!(vp.point_to_pixel(&mid), Some(Pixel(px, py)));
        }
    }

    #[test]
    fn point_to_pixel_rejects_points_off_the_image() {
        let vp = viewport();
        assert_eq!(vp.point_to_pixel(&Complex::new(2.0, 2.0)), None);
        assert_eq!(vp.point_to_pixel(&Complex::new(-2.1, 0.0)), None);
    }

    #[test]
    fn zoom_on_center_pixel_recenters_onto_the_same_center() {
        let vp = viewport();
        let zoomed = vp.zoom_to(50, 50, 25, 25);
        assert_eq!(zoomed.center, vp.center);
        assert_eq!(zoomed.pixel_size, 0.03 / 4.0);
        assert_eq!(zoomed.width, vp.width);
        assert_eq!(zoomed.height, vp.height);
    }

    #[test]
    fn zoom_takes_the_larger_axis_ratio() {
        let vp = Viewport::new(200, 100, Complex::new(0.0, 0.0), 0.01);
        // A square request on a 2:1 image: the vertical ratio wins.
        let zoomed = vp.zoom_to(100, 50, 50, 50);
        assert_eq!(zoomed.pixel_size, 0.01 * 50.0 / 100.0);
    }

    #[test]
    fn zoom_produces_a_fresh_value() {
        let vp = viewport();
        let zoomed = vp.zoom_to(10, 10, 25, 25);
        // The original mapping is untouched.
        assert_eq!(vp.pixel_size, 0.03);
        assert_ne!(zoomed.center, vp.center);
    }
}
