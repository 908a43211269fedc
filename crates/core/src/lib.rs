pub mod detection;
pub mod extraction;
pub mod media;
pub mod pipeline;
pub mod rendering;
pub mod shared;
