use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub(crate) enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Self::Like => Self::Dislike,
            Self::Dislike => Self::Like,
        }
    }

    pub(crate) fn already_exists_message(self) -> &'static str {
        match self {
            Self::Like => "already liked",
            Self::Dislike => "already disliked",
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Reaction {
    pub(crate) id: i64,
    pub(crate) viewer_email: String,
    pub(crate) post_id: i64,
}
