pub mod extract_eye_patches_use_case;
pub mod eye_patch_tracker;
