//! Mention handling: `@name` tokens become profile links when the identity
//! service says `name` may be tagged.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::warn;

use crate::clients::identity_client::IdentityClient;

static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_.]+").expect("invalid mention regex"));

/// Links produced by [`profile_link`]; their inner `@name` is never re-linked.
static PROFILE_LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<a href='/users/[A-Za-z0-9_.]+' >@[A-Za-z0-9_.]+</a>")
        .expect("invalid profile link regex")
});

static MENTION_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]+$").expect("invalid mention name regex"));

#[derive(Clone)]
pub(crate) struct TagResolver {
    identity: Arc<dyn IdentityClient>,
}

impl TagResolver {
    pub(crate) fn new(identity: Arc<dyn IdentityClient>) -> Self {
        Self { identity }
    }

    /// Replaces every taggable mention with a profile link. Each distinct
    /// name is checked once; a failed check counts as "not taggable".
    pub(crate) async fn resolve_tags(&self, text: &str) -> String {
        let mentions = unlinked_mentions(text);
        if mentions.is_empty() {
            return text.to_string();
        }

        let mut taggable: HashMap<&str, bool> = HashMap::new();
        for range in &mentions {
            let name = &text[range.start + 1..range.end];
            if taggable.contains_key(name) {
                continue;
            }
            let allowed = match self.identity.is_taggable(name).await {
                Ok(allowed) => allowed,
                Err(err) => {
                    warn!(mention = name, error = %err, "taggable check failed, leaving mention as text");
                    false
                }
            };
            taggable.insert(name, allowed);
        }

        let mut resolved = String::with_capacity(text.len());
        let mut cursor = 0;
        for range in mentions {
            let name = &text[range.start + 1..range.end];
            if !taggable.get(name).copied().unwrap_or(false) {
                continue;
            }
            resolved.push_str(&text[cursor..range.start]);
            resolved.push_str(&profile_link(name));
            cursor = range.end;
        }
        resolved.push_str(&text[cursor..]);
        resolved
    }
}

pub(crate) fn profile_link(name: &str) -> String {
    format!("<a href='/users/{name}' >@{name}</a>")
}

pub(crate) fn is_mention_name(name: &str) -> bool {
    MENTION_NAME_REGEX.is_match(name)
}

/// Whether `text` mentions `@name` as a whole token. Sentence-final dots
/// after the token are ignored, so `@alice.` still mentions `alice`.
pub(crate) fn mentions(text: &str, name: &str) -> bool {
    MENTION_REGEX.find_iter(text).any(|found| {
        let token = &found.as_str()[1..];
        token == name || token.trim_end_matches('.') == name
    })
}

fn unlinked_mentions(text: &str) -> Vec<Range<usize>> {
    let links: Vec<Range<usize>> = PROFILE_LINK_REGEX
        .find_iter(text)
        .map(|found| found.range())
        .collect();

    MENTION_REGEX
        .find_iter(text)
        .map(|found| found.range())
        .filter(|range| !links.iter().any(|link| link.contains(&range.start)))
        .collect()
}
