pub(crate) mod error;
pub(crate) mod grpc;
pub(crate) mod identity_client;
pub(crate) mod media_client;
