pub mod bounding_box;
pub mod eye_index_set;
pub mod eye_patch;
