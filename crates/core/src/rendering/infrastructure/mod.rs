pub mod dot_overlay_renderer;
