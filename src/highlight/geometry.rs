//! Page-space to PDF user-space geometry
//!
//! Block rectangles come out of MuPDF in page space: origin at the top-left of
//! the visible page, y pointing down, page rotation already applied. PDF
//! annotations want unrotated user space with y pointing up. MuPDF builds its
//! page transform as "rotate by -Rotate, flip y, translate the box to the
//! origin"; the rotate-and-flip part is its own inverse, which is what
//! `to_user_space` relies on.

use crate::document::Rect;

/// A point in PDF user space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Four corners of a highlighted region in PDF user space
///
/// Corner names refer to the page as displayed, so the quad follows the
/// `/QuadPoints` convention for rotated pages too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    pub ul: Point,
    pub ur: Point,
    pub ll: Point,
    pub lr: Point,
}

impl Quad {
    /// Axis-aligned bounds as `[x0, y0, x1, y1]`
    pub fn bounds(&self) -> [f32; 4] {
        let xs = [self.ul.x, self.ur.x, self.ll.x, self.lr.x];
        let ys = [self.ul.y, self.ur.y, self.ll.y, self.lr.y];
        [
            xs.iter().copied().fold(f32::INFINITY, f32::min),
            ys.iter().copied().fold(f32::INFINITY, f32::min),
            xs.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            ys.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        ]
    }

    /// Flattened `/QuadPoints` order: UL, UR, LL, LR
    pub fn points(&self) -> [f32; 8] {
        [
            self.ul.x, self.ul.y, self.ur.x, self.ur.y, self.ll.x, self.ll.y, self.lr.x,
            self.lr.y,
        ]
    }
}

/// Effective page box and rotation of one PDF page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    /// `[x0, y0, x1, y1]` with x0 <= x1 and y0 <= y1
    pub bbox: [f32; 4],
    /// 0, 90, 180 or 270
    pub rotation: i32,
}

impl PageFrame {
    pub fn new(bbox: [f32; 4], rotation: i64) -> Self {
        Self {
            bbox: normalize_box(bbox),
            rotation: snap_rotation(rotation),
        }
    }

    fn sin_cos(&self) -> (f32, f32) {
        match self.rotation {
            90 => (1.0, 0.0),
            180 => (0.0, -1.0),
            270 => (-1.0, 0.0),
            _ => (0.0, 1.0),
        }
    }

    /// Rotate-and-flip without translation
    fn turn(&self, x: f32, y: f32) -> (f32, f32) {
        let (sin, cos) = self.sin_cos();
        (x * cos + y * sin, x * sin - y * cos)
    }

    /// Offset that moves the turned page box onto the origin
    fn origin(&self) -> (f32, f32) {
        let [x0, y0, x1, y1] = self.bbox;
        let corners = [
            self.turn(x0, y0),
            self.turn(x0, y1),
            self.turn(x1, y0),
            self.turn(x1, y1),
        ];
        corners.iter().fold((f32::INFINITY, f32::INFINITY), |acc, c| {
            (acc.0.min(c.0), acc.1.min(c.1))
        })
    }

    /// Map a PDF user-space point to page space
    pub fn to_page_space(&self, point: Point) -> (f32, f32) {
        let (ox, oy) = self.origin();
        let (u, v) = self.turn(point.x, point.y);
        (u - ox, v - oy)
    }

    /// Map a page-space point to PDF user space
    pub fn to_user_space(&self, x: f32, y: f32) -> Point {
        let (ox, oy) = self.origin();
        let (ux, uy) = self.turn(x + ox, y + oy);
        Point { x: ux, y: uy }
    }

    /// Map a page-space rectangle to a user-space quad
    pub fn quad(&self, rect: &Rect) -> Quad {
        let [left, top, right, bottom] = rect.to_ltrb();
        Quad {
            ul: self.to_user_space(left, top),
            ur: self.to_user_space(right, top),
            ll: self.to_user_space(left, bottom),
            lr: self.to_user_space(right, bottom),
        }
    }
}

fn normalize_box([x0, y0, x1, y1]: [f32; 4]) -> [f32; 4] {
    [x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)]
}

/// Snap `/Rotate` to 0, 90, 180 or 270
pub fn snap_rotation(rotation: i64) -> i32 {
    let normalized = rotation.rem_euclid(360);
    let snapped = ((normalized + 45) / 90 * 90) % 360;
    snapped as i32
}

/// Intersection of CropBox and MediaBox, falling back to MediaBox
pub fn effective_box(media: [f32; 4], crop: Option<[f32; 4]>) -> [f32; 4] {
    let media = normalize_box(media);
    let Some(crop) = crop else {
        return media;
    };
    let crop = normalize_box(crop);
    let clipped = [
        media[0].max(crop[0]),
        media[1].max(crop[1]),
        media[2].min(crop[2]),
        media[3].min(crop[3]),
    ];
    if clipped[0] < clipped[2] && clipped[1] < clipped[3] {
        clipped
    } else {
        media
    }
}
