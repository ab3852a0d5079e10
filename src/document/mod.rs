pub(crate) mod codec;
pub(crate) mod history;
pub(crate) mod input;
pub(crate) mod model;
