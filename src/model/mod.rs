pub(crate) mod canvas;
pub(crate) mod overlay;
pub(crate) mod session;
