pub(crate) mod engagement;
pub(crate) mod feed;
pub(crate) mod materializer;
pub(crate) mod post_service;
pub(crate) mod tags;

#[cfg(test)]
pub(crate) mod test_support;
