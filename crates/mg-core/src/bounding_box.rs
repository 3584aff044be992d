use glam::Vec3;

/// Axis-aligned bounds of a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;

        Some(points.fold(Self { min: first, max: first }, |bounds, p| Self {
            min: bounds.min.min(*p),
            max: bounds.max.max(*p),
        }))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_of_points() {
        let points = [Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, -2.0, 0.0)];
        let bounds = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 0.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(1.0, -1.0, 1.0));
        assert_eq!(bounds.size(), Vec3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn test_no_points_no_bounds() {
        assert!(BoundingBox::from_points(&Vec::<Vec3>::new()).is_none());
    }
}
