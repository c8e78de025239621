//! Engagement metrics over extracted records
//!
//! Computed offline from captured tap output by the `analyze` command.

use crate::error::{Error, Result};
use crate::output::TapOutput;
use crate::stream::EntityKind;
use crate::types::JsonValue;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Minimum comment count for reporting a median
const MEDIAN_MIN_COMMENTS: usize = 3;

/// Post bodies under this many words are short
const SHORT_POST_WORDS: usize = 100;
/// Post bodies under this many words (and not short) are medium
const LONG_POST_WORDS: usize = 200;

const TOP_EMAIL_DOMAINS: usize = 5;
const TOP_WORDS: usize = 10;
const TOP_POSTS: usize = 5;

const POSITIVE_WORDS: [&str; 6] = ["good", "great", "awesome", "excellent", "happy", "thanks"];
const NEGATIVE_WORDS: [&str; 6] = ["bad", "poor", "terrible", "awful", "sad", "wrong"];

/// Comment statistics for one post
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostMetrics {
    /// Number of comments
    pub comment_count: usize,
    /// Distinct commenter emails
    pub unique_commenters: usize,
    /// Sum of comment body lengths (characters)
    pub total_comment_length: usize,
    /// Mean comment body length
    pub average_comment_length: f64,
    /// Longest comment body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_comment_length: Option<usize>,
    /// Shortest comment body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_comment_length: Option<usize>,
    /// Median comment body length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_comment_length: Option<f64>,
}

/// Posting and engagement figures for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserActivity {
    /// Username, or `User <id>` when the user is unknown
    pub username: String,
    /// Posts authored
    pub post_count: usize,
    /// Comments on the user's posts
    pub total_comments_received: usize,
    /// Comments per post
    pub avg_comments_per_post: f64,
    /// Whitespace-separated words across the user's post bodies
    pub total_words_in_posts: usize,
    /// Words per post
    pub avg_post_length: f64,
}

/// A term and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// Crude tone markers across all comments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentIndicators {
    /// Positive lexicon words found, counted once per comment
    pub positive_words: usize,
    /// Negative lexicon words found, counted once per comment
    pub negative_words: usize,
    /// Comments containing a `?`
    pub question_comments: usize,
}

/// Commenting patterns across all comments
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommentPatterns {
    pub total_comments: usize,
    /// Mean comment body length (characters)
    pub avg_comment_length: f64,
    /// Most frequent commenter email domains, most frequent first
    pub common_email_domains: Vec<TermCount>,
    /// Most frequent lowercased body words, most frequent first
    pub most_common_words: Vec<TermCount>,
    pub sentiment_indicators: SentimentIndicators,
}

/// Posts bucketed by body word count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LengthBuckets {
    /// Under 100 words
    pub short: usize,
    /// 100 to 199 words
    pub medium: usize,
    /// 200 words or more
    pub long: usize,
}

/// Title length distribution (characters), all zero without posts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TitleLengthStats {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
    pub median: f64,
}

/// A post ranked by the comments it drew
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagingPost {
    pub post_id: i64,
    pub title: String,
    pub user_id: i64,
    pub comment_count: usize,
}

/// How posts are shaped and how much discussion they draw
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostEngagement {
    pub total_posts: usize,
    pub posts_by_length: LengthBuckets,
    pub title_length_stats: TitleLengthStats,
    /// Most commented posts, ties kept in input order
    pub most_engaging_posts: Vec<EngagingPost>,
    /// Comments received by user id, for users with at least one post
    pub engagement_by_user: BTreeMap<i64, usize>,
}

/// Everything `analyze` prints
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Metrics by post id
    pub posts: BTreeMap<i64, PostMetrics>,
    /// Activity by user id
    pub users: BTreeMap<i64, UserActivity>,
    pub comment_patterns: CommentPatterns,
    pub post_engagement: PostEngagement,
}

fn required<'a>(record: &'a JsonValue, field: &str, what: &str) -> Result<&'a JsonValue> {
    record
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| Error::metrics(format!("Missing required field in {what} data: '{field}'")))
}

fn required_str<'a>(record: &'a JsonValue, field: &str, what: &str) -> Result<&'a str> {
    required(record, field, what)?
        .as_str()
        .ok_or_else(|| Error::metrics(format!("Field '{field}' in {what} data is not a string")))
}

fn required_id(record: &JsonValue, field: &str, what: &str) -> Result<i64> {
    required(record, field, what)?
        .as_i64()
        .ok_or_else(|| Error::metrics(format!("Field '{field}' in {what} data is not an integer")))
}

/// Top `n` terms by count; equal counts order by term
fn top_terms(counts: HashMap<String, usize>, n: usize) -> Vec<TermCount> {
    let mut ranked: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    ranked.truncate(n);
    ranked
}

fn comments_by_post(comments: &[JsonValue]) -> Result<BTreeMap<i64, usize>> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for comment in comments {
        *counts
            .entry(required_id(comment, "postId", "comment")?)
            .or_default() += 1;
    }
    Ok(counts)
}

fn median(sorted: &[usize]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    } else {
        sorted[mid] as f64
    }
}

/// Compute comment statistics for a post
///
/// Every comment must carry a string `body` and `email`.
pub fn calculate_post_metrics(_post: &JsonValue, comments: &[JsonValue]) -> Result<PostMetrics> {
    if comments.is_empty() {
        return Ok(PostMetrics::default());
    }

    let mut lengths = Vec::with_capacity(comments.len());
    let mut commenters = HashSet::new();
    for comment in comments {
        lengths.push(required_str(comment, "body", "comment")?.chars().count());
        commenters.insert(required_str(comment, "email", "comment")?);
    }

    let total: usize = lengths.iter().sum();
    lengths.sort_unstable();

    Ok(PostMetrics {
        comment_count: comments.len(),
        unique_commenters: commenters.len(),
        total_comment_length: total,
        average_comment_length: total as f64 / lengths.len() as f64,
        max_comment_length: lengths.last().copied(),
        min_comment_length: lengths.first().copied(),
        median_comment_length: (lengths.len() >= MEDIAN_MIN_COMMENTS).then(|| median(&lengths)),
    })
}

/// Aggregate posting activity per user
///
/// Only users with at least one post appear. No users at all yields an empty map.
pub fn analyze_user_activity(
    users: &[JsonValue],
    posts: &[JsonValue],
    comments: &[JsonValue],
) -> Result<BTreeMap<i64, UserActivity>> {
    if users.is_empty() {
        return Ok(BTreeMap::new());
    }

    let mut usernames = BTreeMap::new();
    for user in users {
        let id = required_id(user, "id", "user")?;
        if let Some(name) = user.get("username").and_then(JsonValue::as_str) {
            usernames.insert(id, name.to_string());
        }
    }

    let comments_per_post = comments_by_post(comments)?;

    let mut activity: BTreeMap<i64, UserActivity> = BTreeMap::new();
    for post in posts {
        let user_id = required_id(post, "userId", "post")?;
        let post_id = required_id(post, "id", "post")?;
        let words = required_str(post, "body", "post")?.split_whitespace().count();

        let entry = activity.entry(user_id).or_default();
        entry.post_count += 1;
        entry.total_words_in_posts += words;
        entry.total_comments_received += comments_per_post.get(&post_id).copied().unwrap_or(0);
    }

    for (user_id, entry) in &mut activity {
        let count = entry.post_count as f64;
        entry.avg_comments_per_post = entry.total_comments_received as f64 / count;
        entry.avg_post_length = entry.total_words_in_posts as f64 / count;
        entry.username = usernames
            .get(user_id)
            .cloned()
            .unwrap_or_else(|| format!("User {user_id}"));
    }

    Ok(activity)
}

/// Email domains, vocabulary and tone of the comments
///
/// Sentiment words match anywhere in the lowercased body, so `goodbye`
/// counts as `good`. Every comment must carry a string `body` and `email`.
pub fn analyze_comment_patterns(comments: &[JsonValue]) -> Result<CommentPatterns> {
    if comments.is_empty() {
        return Ok(CommentPatterns::default());
    }

    let mut total_length = 0;
    let mut domains: HashMap<String, usize> = HashMap::new();
    let mut words: HashMap<String, usize> = HashMap::new();
    let mut sentiment = SentimentIndicators::default();

    for comment in comments {
        let body = required_str(comment, "body", "comment")?;
        let email = required_str(comment, "email", "comment")?.to_lowercase();
        total_length += body.chars().count();

        let domain = email.rsplit('@').next().unwrap_or_default();
        *domains.entry(domain.to_string()).or_default() += 1;

        let lower = body.to_lowercase();
        for word in lower.split_whitespace() {
            *words.entry(word.to_string()).or_default() += 1;
        }

        sentiment.positive_words += POSITIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
        sentiment.negative_words += NEGATIVE_WORDS.iter().filter(|w| lower.contains(*w)).count();
        if body.contains('?') {
            sentiment.question_comments += 1;
        }
    }

    Ok(CommentPatterns {
        total_comments: comments.len(),
        avg_comment_length: total_length as f64 / comments.len() as f64,
        common_email_domains: top_terms(domains, TOP_EMAIL_DOMAINS),
        most_common_words: top_terms(words, TOP_WORDS),
        sentiment_indicators: sentiment,
    })
}

/// Body length buckets, title lengths and comment counts of the posts
///
/// Every post must carry `id`, `userId`, `title` and `body`; every comment a
/// `postId`.
pub fn analyze_post_engagement(
    posts: &[JsonValue],
    comments: &[JsonValue],
) -> Result<PostEngagement> {
    if posts.is_empty() {
        return Ok(PostEngagement::default());
    }

    let comments_per_post = comments_by_post(comments)?;
    let mut engagement = PostEngagement {
        total_posts: posts.len(),
        ..Default::default()
    };
    let mut title_lengths = Vec::with_capacity(posts.len());
    let mut ranked = Vec::with_capacity(posts.len());

    for post in posts {
        let words = required_str(post, "body", "post")?.split_whitespace().count();
        match words {
            w if w < SHORT_POST_WORDS => engagement.posts_by_length.short += 1,
            w if w < LONG_POST_WORDS => engagement.posts_by_length.medium += 1,
            _ => engagement.posts_by_length.long += 1,
        }

        let title = required_str(post, "title", "post")?;
        title_lengths.push(title.chars().count());

        let post_id = required_id(post, "id", "post")?;
        let user_id = required_id(post, "userId", "post")?;
        let comment_count = comments_per_post.get(&post_id).copied().unwrap_or(0);
        *engagement.engagement_by_user.entry(user_id).or_default() += comment_count;
        ranked.push(EngagingPost {
            post_id,
            title: title.to_string(),
            user_id,
            comment_count,
        });
    }

    title_lengths.sort_unstable();
    engagement.title_length_stats = TitleLengthStats {
        min: title_lengths[0],
        max: title_lengths[title_lengths.len() - 1],
        avg: title_lengths.iter().sum::<usize>() as f64 / title_lengths.len() as f64,
        median: median(&title_lengths),
    };

    ranked.sort_by(|a, b| b.comment_count.cmp(&a.comment_count));
    ranked.truncate(TOP_POSTS);
    engagement.most_engaging_posts = ranked;

    Ok(engagement)
}

/// Every metric for a captured tap output
pub fn analyze(output: &TapOutput) -> Result<AnalysisReport> {
    let comments = output.records(EntityKind::Comment);
    let mut by_post: BTreeMap<i64, Vec<JsonValue>> = BTreeMap::new();
    for comment in comments {
        by_post
            .entry(required_id(comment, "postId", "comment")?)
            .or_default()
            .push(comment.clone());
    }

    let mut posts = BTreeMap::new();
    for post in output.records(EntityKind::Post) {
        let id = required_id(post, "id", "post")?;
        let on_post = by_post.get(&id).map_or(&[][..], Vec::as_slice);
        posts.insert(id, calculate_post_metrics(post, on_post)?);
    }

    Ok(AnalysisReport {
        posts,
        users: analyze_user_activity(
            output.records(EntityKind::User),
            output.records(EntityKind::Post),
            comments,
        )?,
        comment_patterns: analyze_comment_patterns(comments)?,
        post_engagement: analyze_post_engagement(output.records(EntityKind::Post), comments)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::parse_tap_output;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn comment(post_id: i64, email: &str, body: &str) -> JsonValue {
        json!({"postId": post_id, "email": email, "body": body})
    }

    #[test]
    fn test_post_metrics_no_comments() {
        let metrics = calculate_post_metrics(&json!({"id": 1}), &[]).unwrap();
        assert_eq!(metrics, PostMetrics::default());

        let json = serde_json::to_value(&metrics).unwrap();
        assert_eq!(json["comment_count"], 0);
        assert!(json.get("max_comment_length").is_none());
    }

    #[test]
    fn test_post_metrics_two_comments_has_no_median() {
        let comments = [comment(1, "a@x.io", "abcd"), comment(1, "a@x.io", "ab")];
        let metrics = calculate_post_metrics(&json!({"id": 1}), &comments).unwrap();

        assert_eq!(metrics.comment_count, 2);
        assert_eq!(metrics.unique_commenters, 1);
        assert_eq!(metrics.total_comment_length, 6);
        assert_eq!(metrics.average_comment_length, 3.0);
        assert_eq!(metrics.max_comment_length, Some(4));
        assert_eq!(metrics.min_comment_length, Some(2));
        assert_eq!(metrics.median_comment_length, None);
    }

    #[test]
    fn test_post_metrics_median() {
        let comments = [
            comment(1, "a@x.io", "a"),
            comment(1, "b@x.io", "abc"),
            comment(1, "c@x.io", "abcdefgh"),
            comment(1, "d@x.io", "abcde"),
        ];
        let metrics = calculate_post_metrics(&json!({"id": 1}), &comments).unwrap();
        assert_eq!(metrics.unique_commenters, 4);
        assert_eq!(metrics.median_comment_length, Some(4.0));
    }

    #[test]
    fn test_post_metrics_counts_characters() {
        let comments = [
            comment(1, "a@x.io", "héllo"),
            comment(1, "b@x.io", "日本"),
            comment(1, "c@x.io", "ok"),
        ];
        let metrics = calculate_post_metrics(&json!({"id": 1}), &comments).unwrap();
        assert_eq!(metrics.total_comment_length, 9);
        assert_eq!(metrics.median_comment_length, Some(2.0));
    }

    #[test]
    fn test_post_metrics_missing_field() {
        let err = calculate_post_metrics(&json!({"id": 1}), &[json!({"email": "a@x.io"})])
            .unwrap_err();
        match err {
            Error::Metrics { message } => assert!(message.contains("'body'"), "{message}"),
            other => panic!("Expected Metrics, got {other:?}"),
        }
    }

    #[test]
    fn test_user_activity() {
        let users = [
            json!({"id": 1, "username": "Bret"}),
            json!({"id": 2, "username": "Antonette"}),
        ];
        let posts = [
            json!({"id": 1, "userId": 1, "body": "one two three"}),
            json!({"id": 2, "userId": 1, "body": "four five"}),
            json!({"id": 3, "userId": 7, "body": "lonely"}),
        ];
        let comments = [
            comment(1, "a@x.io", "x"),
            comment(1, "b@x.io", "y"),
            comment(2, "c@x.io", "z"),
        ];

        let activity = analyze_user_activity(&users, &posts, &comments).unwrap();
        assert_eq!(activity.len(), 2);

        let bret = &activity[&1];
        assert_eq!(bret.username, "Bret");
        assert_eq!(bret.post_count, 2);
        assert_eq!(bret.total_comments_received, 3);
        assert_eq!(bret.avg_comments_per_post, 1.5);
        assert_eq!(bret.total_words_in_posts, 5);
        assert_eq!(bret.avg_post_length, 2.5);

        assert_eq!(activity[&7].username, "User 7");
        assert_eq!(activity[&7].total_comments_received, 0);
    }

    #[test]
    fn test_user_activity_without_users() {
        let posts = [json!({"id": 1, "userId": 1, "body": "x"})];
        assert!(analyze_user_activity(&[], &posts, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_analyze_tap_output() {
        let body = [
            r#"{"type": "RECORD", "stream": "users", "record": {"id": 1, "username": "Bret"}, "time_extracted": "2024-01-01T00:00:00Z"}"#,
            r#"{"type": "RECORD", "stream": "posts", "record": {"id": 2, "userId": 1, "title": "qui est", "body": "a b c"}, "time_extracted": "2024-01-01T00:00:00Z"}"#,
            r#"{"type": "RECORD", "stream": "comments", "record": {"id": 9, "postId": 2, "email": "e@x.io", "body": "nice"}, "time_extracted": "2024-01-01T00:00:00Z"}"#,
        ]
        .join("\n");

        let report = analyze(&parse_tap_output(&body).unwrap()).unwrap();
        assert_eq!(report.posts[&2].comment_count, 1);
        assert_eq!(report.users[&1].total_words_in_posts, 3);

        assert_eq!(report.comment_patterns.total_comments, 1);
        assert_eq!(report.post_engagement.engagement_by_user[&1], 1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["posts"]["2"]["unique_commenters"], 1);
        assert_eq!(
            json["comment_patterns"]["common_email_domains"],
            json!([{"term": "x.io", "count": 1}])
        );
        assert_eq!(json["post_engagement"]["posts_by_length"]["short"], 1);
    }

    fn term(term: &str, count: usize) -> TermCount {
        TermCount {
            term: term.to_string(),
            count,
        }
    }

    #[test]
    fn test_comment_patterns() {
        let comments = [
            comment(1, "Eliseo@Gardner.biz", "Great post, thanks!"),
            comment(1, "jayne@gardner.biz", "great point? not bad"),
            comment(2, "nikita@garfield.biz", "Is this wrong?"),
            comment(3, "no-at-sign", "ok"),
        ];

        let patterns = analyze_comment_patterns(&comments).unwrap();
        assert_eq!(patterns.total_comments, 4);
        assert_eq!(patterns.avg_comment_length, 55.0 / 4.0);
        assert_eq!(
            patterns.common_email_domains,
            vec![
                term("gardner.biz", 2),
                term("garfield.biz", 1),
                term("no-at-sign", 1),
            ]
        );
        assert_eq!(patterns.most_common_words[0], term("great", 2));
        assert_eq!(
            patterns.sentiment_indicators,
            SentimentIndicators {
                positive_words: 3,
                negative_words: 2,
                question_comments: 2,
            }
        );
    }

    #[test]
    fn test_comment_patterns_keeps_top_ten_words() {
        let body = (0..12)
            .flat_map(|i| std::iter::repeat(format!("w{i:02}")).take(12 - i))
            .collect::<Vec<_>>()
            .join(" ");
        let patterns = analyze_comment_patterns(&[comment(1, "a@x.io", &body)]).unwrap();

        assert_eq!(patterns.most_common_words.len(), 10);
        assert_eq!(patterns.most_common_words[0], term("w00", 12));
        assert_eq!(patterns.most_common_words[9], term("w09", 3));
    }

    #[test]
    fn test_comment_patterns_empty() {
        let patterns = analyze_comment_patterns(&[]).unwrap();
        assert_eq!(patterns, CommentPatterns::default());
        assert_eq!(patterns.avg_comment_length, 0.0);
    }

    #[test]
    fn test_comment_patterns_missing_email() {
        let err = analyze_comment_patterns(&[json!({"postId": 1, "body": "x"})]).unwrap_err();
        assert!(matches!(err, Error::Metrics { .. }));
    }

    fn post(id: i64, user_id: i64, title: &str, words: usize) -> JsonValue {
        let body = vec!["lorem"; words].join(" ");
        json!({"id": id, "userId": user_id, "title": title, "body": body})
    }

    #[test]
    fn test_post_engagement() {
        let posts = [
            post(1, 1, "abc", 99),
            post(2, 1, "abcdef", 100),
            post(3, 2, "abcdefghij", 199),
            post(4, 2, "ab", 200),
        ];
        let comments = [
            comment(3, "a@x.io", "x"),
            comment(3, "b@x.io", "y"),
            comment(2, "c@x.io", "z"),
            comment(9, "d@x.io", "orphan"),
        ];

        let engagement = analyze_post_engagement(&posts, &comments).unwrap();
        assert_eq!(engagement.total_posts, 4);
        assert_eq!(
            engagement.posts_by_length,
            LengthBuckets {
                short: 1,
                medium: 2,
                long: 1,
            }
        );
        assert_eq!(
            engagement.title_length_stats,
            TitleLengthStats {
                min: 2,
                max: 10,
                avg: 5.25,
                median: 4.5,
            }
        );

        let order: Vec<(i64, usize)> = engagement
            .most_engaging_posts
            .iter()
            .map(|p| (p.post_id, p.comment_count))
            .collect();
        assert_eq!(order, vec![(3, 2), (2, 1), (1, 0), (4, 0)]);
        assert_eq!(engagement.most_engaging_posts[0].title, "abcdefghij");
        assert_eq!(engagement.most_engaging_posts[0].user_id, 2);

        assert_eq!(engagement.engagement_by_user, BTreeMap::from([(1, 1), (2, 2)]));
    }

    #[test]
    fn test_post_engagement_keeps_top_five() {
        let posts: Vec<_> = (1..=7).map(|id| post(id, 1, "t", 1)).collect();
        let comments: Vec<_> = (1..=7)
            .flat_map(|id| std::iter::repeat(comment(id, "a@x.io", "x")).take(id as usize))
            .collect();

        let engagement = analyze_post_engagement(&posts, &comments).unwrap();
        let ids: Vec<i64> = engagement
            .most_engaging_posts
            .iter()
            .map(|p| p.post_id)
            .collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
        assert_eq!(engagement.engagement_by_user[&1], 28);
    }

    #[test]
    fn test_post_engagement_without_posts() {
        let engagement = analyze_post_engagement(&[], &[comment(1, "a@x.io", "x")]).unwrap();
        assert_eq!(engagement, PostEngagement::default());
        assert_eq!(engagement.title_length_stats.median, 0.0);
    }
}
