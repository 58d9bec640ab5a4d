//! Reddit post processing: pain-signal matching and post conversion.

use oppfinder_core::PainPointSignal;

use super::reddit::Post;
use super::PAIN_KEYWORDS;

/// Characters of post body kept after the title.
const BODY_SNIPPET_CHARS: usize = 500;

pub(super) fn search_params(keyword: &str, limit: u32) -> Vec<(&'static str, String)> {
    vec![
        ("q", keyword.to_string()),
        ("restrict_sr", "true".to_string()),
        ("sort", "relevance".to_string()),
        ("t", "month".to_string()),
        ("limit", limit.to_string()),
        ("type", "link".to_string()),
    ]
}

/// True when the text contains any pain keyword, case-insensitively.
pub(crate) fn contains_pain_signal(text: &str) -> bool {
    let lower = text.to_lowercase();
    PAIN_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

fn usable_body(body: Option<&str>) -> Option<&str> {
    body.map(str::trim)
        .filter(|b| !b.is_empty() && *b != "[deleted]" && *b != "[removed]")
}

pub(super) fn to_signal(post: &Post, subreddit: &str) -> Option<PainPointSignal> {
    let permalink = post.data.permalink.as_ref()?;
    let title = post
        .data
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())?;
    let body = usable_body(post.data.selftext.as_deref());

    let full_text = match body {
        Some(body) => format!("{title} {body}"),
        None => title.to_string(),
    };
    if !contains_pain_signal(&full_text) {
        return None;
    }

    let text = match body {
        Some(body) => {
            let snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
            format!("{title} {snippet}")
        }
        None => title.to_string(),
    };

    Some(PainPointSignal {
        source: format!("r/{subreddit}"),
        text,
        url: Some(format!("https://reddit.com{permalink}")),
        external_score: post.data.score.unwrap_or(0),
        comment_count: post.data.num_comments.unwrap_or(0),
    })
}
