//! Eye-contour vertex indices in the 468-point face mesh.
//!
//! Each eye is described by two arcs. The upper arc supplies the box's
//! top-left corner and the lower arc its bottom-right corner, so the order
//! in which the arcs are assigned matters and must not be swapped.

/// Upper and lower eyelid arcs of one eye.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyeIndexSet {
    name: &'static str,
    upper_arc: &'static [usize],
    lower_arc: &'static [usize],
}

impl EyeIndexSet {
    pub const fn new(
        name: &'static str,
        upper_arc: &'static [usize],
        lower_arc: &'static [usize],
    ) -> Self {
        Self {
            name,
            upper_arc,
            lower_arc,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn upper_arc(&self) -> &'static [usize] {
        self.upper_arc
    }

    pub fn lower_arc(&self) -> &'static [usize] {
        self.lower_arc
    }
}

/// Left eye as numbered by the mesh, regardless of which image side it lands on.
pub const LEFT_EYE: EyeIndexSet = EyeIndexSet::new(
    "left",
    &[25, 33, 246, 161, 160, 159, 158, 157, 173, 243],
    &[25, 110, 24, 23, 22, 26, 112, 243],
);

pub const RIGHT_EYE: EyeIndexSet = EyeIndexSet::new(
    "right",
    &[463, 398, 384, 385, 386, 387, 388, 466, 263, 255],
    &[463, 341, 256, 252, 253, 254, 339, 255],
);
