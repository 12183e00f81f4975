pub(crate) mod gesture;
pub(crate) mod history;
pub(crate) mod input;
