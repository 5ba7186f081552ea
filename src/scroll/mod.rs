pub(crate) mod in_view;
pub(crate) mod progress;
