use crate::entity::Bounds;

/// Strict AABB overlap; boxes that only share an edge do not collide.
#[inline]
pub fn overlaps(a: &Bounds, b: &Bounds) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}
