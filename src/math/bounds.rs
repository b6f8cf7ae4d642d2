//! Axis-aligned bounding boxes.

use super::point::Point;

/// An axis-aligned box, possibly empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    extent: Option<(Point, Point)>,
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// The smallest box containing every point in `points`.
    pub fn points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bounds = Self::new();
        for p in points {
            bounds.add(*p);
        }
        bounds
    }

    pub fn xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::xyzwhd(x, y, 0.0, w, h, 0.0)
    }

    pub fn xyzwhd(x: f32, y: f32, z: f32, w: f32, h: f32, d: f32) -> Self {
        let mut bounds = Self::new();
        bounds
            .add(Point::new(x, y, z))
            .add(Point::new(x + w, y + h, z + d));
        bounds
    }

    /// Extend the box to include `p`.
    pub fn add(&mut self, p: Point) -> &mut Self {
        self.extent = Some(match self.extent {
            None => (p, p),
            Some((min, max)) => (
                Point::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Point::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            ),
        });
        self
    }

    /// True if the box holds at least one point.
    pub fn is_valid(&self) -> bool {
        self.extent.is_some()
    }

    pub fn min(&self) -> Option<Point> {
        self.extent.map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<Point> {
        self.extent.map(|(_, max)| max)
    }

    /// Shrink to the intersection with `other`. Disjoint boxes become empty.
    pub fn intersect(&mut self, other: &Bounds) -> &mut Self {
        if let (Some((amin, amax)), Some((bmin, bmax))) = (self.extent, other.extent) {
            let min = Point::new(amin.x.max(bmin.x), amin.y.max(bmin.y), amin.z.max(bmin.z));
            let max = Point::new(amax.x.min(bmax.x), amax.y.min(bmax.y), amax.z.min(bmax.z));
            self.extent = if min.x > max.x || min.y > max.y || min.z > max.z {
                None
            } else {
                Some((min, max))
            };
        } else {
            self.extent = None;
        }
        self
    }

    /// Grow the box by `x`, `y`, `z` on every side.
    pub fn pad(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        if let Some((min, max)) = self.extent.as_mut() {
            min.translate(-x, -y, -z);
            max.translate(x, y, z);
        }
        self
    }

    pub fn reset(&mut self) -> &mut Self {
        self.extent = None;
        self
    }

    /// True iff `p` lies inside the box. Points on the boundary count.
    pub fn contains(&self, p: Point) -> bool {
        match self.extent {
            None => false,
            Some((min, max)) => {
                min.x <= p.x
                    && p.x <= max.x
                    && min.y <= p.y
                    && p.y <= max.y
                    && min.z <= p.z
                    && p.z <= max.z
            }
        }
    }

    /// Center of the box, or the origin when empty.
    pub fn center(&self) -> Point {
        let min = self.min().unwrap_or(Point::ZERO);
        Point::new(
            min.x + self.width() / 2.0,
            min.y + self.height() / 2.0,
            min.z + self.depth() / 2.0,
        )
    }

    pub fn width(&self) -> f32 {
        self.extent.map_or(0.0, |(min, max)| max.x - min.x)
    }

    pub fn height(&self) -> f32 {
        self.extent.map_or(0.0, |(min, max)| max.y - min.y)
    }

    pub fn depth(&self) -> f32 {
        self.extent.map_or(0.0, |(min, max)| max.z - min.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_every_input_point_and_corners() {
        let points = [
            Point::new(1.0, -2.0, 3.0),
            Point::new(-4.0, 5.0, 0.5),
            Point::new(0.0, 0.0, -7.0),
        ];
        let bounds = Bounds::points(&points);
        for p in &points {
            assert!(bounds.contains(*p));
        }
        assert!(bounds.contains(bounds.min().unwrap()));
        assert!(bounds.contains(bounds.max().unwrap()));
        assert!(!bounds.contains(Point::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn empty_box_contains_nothing() {
        let bounds = Bounds::new();
        assert!(!bounds.is_valid());
        assert!(!bounds.contains(Point::ZERO));
        assert_eq!(bounds.center(), Point::ZERO);
    }

    #[test]
    fn intersect_overlapping_boxes() {
        let mut a = Bounds::xywh(0.0, 0.0, 10.0, 10.0);
        a.intersect(&Bounds::xywh(5.0, 5.0, 10.0, 10.0));
        assert_eq!(a.min(), Some(Point::new(5.0, 5.0, 0.0)));
        assert_eq!(a.max(), Some(Point::new(10.0, 10.0, 0.0)));
    }

    #[test]
    fn intersect_disjoint_boxes_is_empty() {
        let mut a = Bounds::xywh(0.0, 0.0, 1.0, 1.0);
        a.intersect(&Bounds::xywh(5.0, 5.0, 1.0, 1.0));
        assert!(!a.is_valid());
    }

    #[test]
    fn pad_and_center() {
        let mut b = Bounds::xyzwhd(0.0, 0.0, 0.0, 2.0, 4.0, 6.0);
        assert_eq!(b.center(), Point::new(1.0, 2.0, 3.0));
        b.pad(1.0, 1.0, 1.0);
        assert_eq!(b.width(), 4.0);
        assert_eq!(b.height(), 6.0);
        assert_eq!(b.depth(), 8.0);
        assert_eq!(b.center(), Point::new(1.0, 2.0, 3.0));
    }
}
