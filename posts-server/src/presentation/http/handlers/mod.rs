pub(crate) mod moderation;
pub(crate) mod posts;
