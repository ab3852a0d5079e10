pub(crate) mod decode;
pub(crate) mod library;
pub(crate) mod store;
