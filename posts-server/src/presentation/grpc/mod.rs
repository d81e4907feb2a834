pub(crate) mod interceptors;
pub(crate) mod proto;
pub(crate) mod service;
pub(crate) mod status;
