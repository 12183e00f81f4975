pub(crate) mod blob;
pub(crate) mod store;
