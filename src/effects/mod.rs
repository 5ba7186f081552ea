pub(crate) mod ambient;
pub(crate) mod parallax;
pub(crate) mod particle_layer;
pub(crate) mod progress_bar;
pub(crate) mod reveal;
