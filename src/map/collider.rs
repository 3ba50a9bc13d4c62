//! Axis-aligned boxes and the collider sets movement is resolved against.

use glam::Vec3;

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict overlap test; boxes that only touch do not intersect, so sliding flush
    /// against a wall is not treated as a collision.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

/// Anything that can say whether a box overlaps solid geometry.
pub trait ColliderSet {
    fn blocks(&self, aabb: &Aabb) -> bool;
}

impl ColliderSet for [Aabb] {
    fn blocks(&self, aabb: &Aabb) -> bool {
        self.iter().any(|wall| wall.intersects(aabb))
    }
}

impl ColliderSet for Vec<Aabb> {
    fn blocks(&self, aabb: &Aabb) -> bool {
        self.as_slice().blocks(aabb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_boxes_intersect() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_size(Vec3::new(0.5, 0.0, 0.5), Vec3::ONE);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_boxes_do_not_intersect() {
        let a = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_center_size(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn test_slice_collider_set() {
        let walls = vec![Aabb::from_center_size(Vec3::new(5.0, 0.0, 0.0), Vec3::ONE)];
        assert!(walls.blocks(&Aabb::from_center_size(Vec3::new(4.6, 0.0, 0.0), Vec3::ONE)));
        assert!(!walls.blocks(&Aabb::from_center_size(Vec3::ZERO, Vec3::ONE)));
    }
}
