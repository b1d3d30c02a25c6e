use chrono::{NaiveDateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

const UNCATEGORIZED: &str = "Uncategorized";
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A post from the WP REST `posts` collection, fetched with `_embed=true`.
/// Everything beyond `id` is display payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: Rendered,
    pub content: Rendered,
    #[serde(default)]
    pub excerpt: Option<Rendered>,
    /// Site-local timestamp, `yyyy-MM-ddTHH:mm:ss` with no offset.
    pub date: String,
    pub link: String,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(rename = "_embedded", default)]
    embedded: Option<Embedded>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Rendered {
    pub rendered: String,
    #[serde(default)]
    pub protected: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct Embedded {
    #[serde(rename = "wp:featuredmedia", default)]
    featured_media: Option<Vec<Media>>,
    #[serde(rename = "wp:term", default)]
    terms: Option<Vec<Vec<Term>>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Media {
    #[serde(default)]
    source_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Term {
    id: i64,
    name: String,
}

impl Post {
    pub fn featured_media_url(&self) -> Option<&str> {
        self.embedded
            .as_ref()?
            .featured_media
            .as_ref()?
            .first()?
            .source_url
            .as_deref()
    }

    /// First embedded term that is not the feed's root category, falling
    /// back to the first term of the primary taxonomy.
    pub fn sub_category(&self, root_category: i64) -> &str {
        let terms = match self
            .embedded
            .as_ref()
            .and_then(|e| e.terms.as_ref())
            .and_then(|t| t.first())
        {
            Some(terms) => terms,
            None => return UNCATEGORIZED,
        };
        terms
            .iter()
            .find(|t| t.id != root_category)
            .or_else(|| terms.first())
            .map(|t| t.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn published_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT).ok()
    }

    /// Coarse humanized age ("3d ago"). Empty when the date fails to parse.
    pub fn time_ago(&self) -> String {
        self.time_ago_at(Utc::now().naive_utc())
    }

    fn time_ago_at(&self, now: NaiveDateTime) -> String {
        let date = match self.published_at() {
            Some(date) => date,
            None => return String::new(),
        };
        let delta = now - date;
        let days = delta.num_days();
        if days >= 365 {
            format!("{}y ago", days / 365)
        } else if days >= 30 {
            format!("{}mo ago", days / 30)
        } else if days >= 1 {
            format!("{}d ago", days)
        } else if delta.num_hours() >= 1 {
            format!("{}h ago", delta.num_hours())
        } else {
            format!("{}m ago", delta.num_minutes().max(1))
        }
    }
}

/// Strip tags and HTML entities from WP `rendered` markup for plain-text
/// display (list rows, excerpts).
pub fn strip_html(input: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();
    static ENTITY_RE: OnceLock<Regex> = OnceLock::new();
    let tags = TAG_RE.get_or_init(|| Regex::new("<[^>]+>").expect("tag regex"));
    let entities = ENTITY_RE.get_or_init(|| Regex::new("&[^;]+;").expect("entity regex"));

    let without_tags = tags.replace_all(input, "");
    let without_entities = entities.replace_all(&without_tags, "");
    without_entities.trim().to_string()
}

#[cfg(test)]
impl Post {
    pub(crate) fn stub(id: i64) -> Self {
        Self {
            id,
            title: Rendered {
                rendered: format!("Post {id}"),
                protected: None,
            },
            content: Rendered::default(),
            excerpt: None,
            date: "2025-01-01T00:00:00".to_string(),
            link: format!("https://swiftgg.org/?p={id}"),
            categories: vec![44],
            embedded: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post_json() -> serde_json::Value {
        serde_json::json!({
            "id": 9210,
            "title": { "rendered": "Swift 6 &#8211; Typed Throws" },
            "content": { "rendered": "<p>body</p>", "protected": false },
            "excerpt": { "rendered": "<p>An intro to typed throws.</p>", "protected": false },
            "date": "2025-03-14T08:30:00",
            "link": "https://swiftgg.org/archives/9210.html",
            "categories": [44, 97],
            "_embedded": {
                "wp:featuredmedia": [
                    { "source_url": "https://swiftgg.org/img/9210.png" }
                ],
                "wp:term": [
                    [
                        { "id": 44, "name": "Articles", "taxonomy": "category" },
                        { "id": 97, "name": "Concurrency", "taxonomy": "category" }
                    ]
                ]
            }
        })
    }

    #[test]
    fn test_deserializes_embedded_fields() {
        let post: Post = serde_json::from_value(sample_post_json()).unwrap();
        assert_eq!(post.id, 9210);
        assert_eq!(
            post.featured_media_url(),
            Some("https://swiftgg.org/img/9210.png")
        );
        assert_eq!(post.sub_category(44), "Concurrency");
    }

    #[test]
    fn test_sub_category_falls_back_to_first_term() {
        let mut json = sample_post_json();
        json["_embedded"]["wp:term"] =
            serde_json::json!([[{ "id": 44, "name": "Articles" }]]);
        let post: Post = serde_json::from_value(json).unwrap();
        assert_eq!(post.sub_category(44), "Articles");
    }

    #[test]
    fn test_sub_category_without_embed() {
        let post = Post::stub(1);
        assert_eq!(post.sub_category(44), "Uncategorized");
    }

    #[test]
    fn test_time_ago_buckets() {
        let mut post = Post::stub(1);
        post.date = "2025-03-14T08:30:00".to_string();
        let parse = |s: &str| NaiveDateTime::parse_from_str(s, DATE_FORMAT).unwrap();

        assert_eq!(post.time_ago_at(parse("2025-03-14T08:30:20")), "1m ago");
        assert_eq!(post.time_ago_at(parse("2025-03-14T08:45:00")), "15m ago");
        assert_eq!(post.time_ago_at(parse("2025-03-14T11:30:00")), "3h ago");
        assert_eq!(post.time_ago_at(parse("2025-03-16T09:00:00")), "2d ago");
        assert_eq!(post.time_ago_at(parse("2025-05-20T08:30:00")), "2mo ago");
        assert_eq!(post.time_ago_at(parse("2027-04-01T08:30:00")), "2y ago");
    }

    #[test]
    fn test_time_ago_unparseable_date() {
        let mut post = Post::stub(1);
        post.date = "not-a-date".to_string();
        assert_eq!(post.time_ago(), "");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Swift &#8211; notes</p>\n"),
            "Swift  notes"
        );
        assert_eq!(strip_html("plain"), "plain");
        assert_eq!(strip_html("  <b>x</b>  "), "x");
    }
}
