/// Rotation counters of an [`AvlTree`](crate::AvlTree).
///
/// Only compiled with the `stats` feature.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RotationStats {
    pub left: u64,
    pub right: u64,
    pub left_right: u64,
    pub right_left: u64,
    /// Double rotations that left their lower pivot unbalanced and had to
    /// repair it before finishing.
    pub nested_repairs: u64,
}

impl RotationStats {
    /// Single and double rotations together, nested repairs excluded.
    pub fn total(&self) -> u64 {
        self.left + self.right + self.left_right + self.right_left
    }
}
