pub(crate) mod media {
    tonic::include_proto!("media");
}

pub(crate) mod users {
    tonic::include_proto!("users");
}
