//! # Tweet Evaluation Prompt
//!
//! The single prompt used to ask the model whether a tweet should be deleted.

use crate::types::{Criteria, Tweet};

/// The evaluation prompt.
///
/// Placeholders: `{tweet_id}`, `{tweet_content}`, `{criteria_list}`, `{additional}`
pub const TWEET_EVALUATION_PROMPT: &str = r#"You are evaluating tweets for a professional's Twitter cleanup.

Tweet ID: {tweet_id}
Tweet: "{tweet_content}"

Mark for deletion if it violates any of these criteria:
{criteria_list}{additional}

Respond in JSON format:
{
  "decision": "DELETE" or "KEEP",
  "reason": "brief explanation"
}"#;

/// Renders the evaluation prompt for one tweet.
///
/// Criteria are numbered in a fixed order: topics to exclude, then tone
/// requirements, then one line listing every forbidden word (only when there
/// are any). The additional guidance line is appended only when non-empty.
pub fn build_evaluation_prompt(tweet: &Tweet, criteria: &Criteria) -> String {
    let mut criteria_parts: Vec<String> = Vec::new();
    criteria_parts.extend(criteria.topics_to_exclude.iter().cloned());
    criteria_parts.extend(criteria.tone_requirements.iter().cloned());

    if !criteria.forbidden_words.is_empty() {
        criteria_parts.push(format!(
            "Contains any of these words: {}",
            criteria.forbidden_words.join(", ")
        ));
    }

    let criteria_list = criteria_parts
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {c}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let additional = if criteria.additional_instructions.is_empty() {
        String::new()
    } else {
        format!(
            "\n\nAdditional guidance: {}",
            criteria.additional_instructions
        )
    };

    // Substitute the tweet last so braces inside its text are never re-expanded.
    TWEET_EVALUATION_PROMPT
        .replace("{criteria_list}", &criteria_list)
        .replace("{additional}", &additional)
        .replace("{tweet_id}", &tweet.id)
        .replace("{tweet_content}", &tweet.content)
}
