pub(crate) mod canvas_editor;
pub(crate) mod command;
pub(crate) mod config;
