//! # Prompt Rendering Tests

use tweet_audit::prompts::build_evaluation_prompt;
use tweet_audit::{Criteria, Tweet};

fn criteria(forbidden: &[&str], additional: &str) -> Criteria {
    Criteria {
        topics_to_exclude: vec!["Profanity".to_string(), "Politics".to_string()],
        tone_requirements: vec!["Professional language only".to_string()],
        forbidden_words: forbidden.iter().map(|w| w.to_string()).collect(),
        additional_instructions: additional.to_string(),
    }
}

#[test]
fn test_prompt_numbers_criteria_in_order() {
    let tweet = Tweet::new("123", "Hello world");
    let prompt = build_evaluation_prompt(&tweet, &criteria(&["crypto", "moon"], ""));

    assert!(prompt.contains("Tweet ID: 123"));
    assert!(prompt.contains("Tweet: \"Hello world\""));
    assert!(prompt.contains(
        "1. Profanity\n2. Politics\n3. Professional language only\n4. Contains any of these words: crypto, moon"
    ));
    assert!(prompt.contains("\"decision\": \"DELETE\" or \"KEEP\""));
}

#[test]
fn test_prompt_omits_forbidden_words_line_when_empty() {
    let tweet = Tweet::new("1", "text");
    let prompt = build_evaluation_prompt(&tweet, &criteria(&[], ""));

    assert!(prompt.contains("3. Professional language only"));
    assert!(!prompt.contains("4."));
    assert!(!prompt.contains("Contains any of these words"));
}

#[test]
fn test_prompt_additional_guidance_only_when_present() {
    let tweet = Tweet::new("1", "text");

    let without = build_evaluation_prompt(&tweet, &criteria(&[], ""));
    assert!(!without.contains("Additional guidance"));

    let with = build_evaluation_prompt(&tweet, &criteria(&[], "Be strict"));
    assert!(with.contains("3. Professional language only\n\nAdditional guidance: Be strict"));
}

#[test]
fn test_prompt_keeps_placeholder_text_inside_tweet() {
    let tweet = Tweet::new("9", "my {criteria_list} and {additional} stay literal");
    let prompt = build_evaluation_prompt(&tweet, &criteria(&[], "extra"));

    assert!(prompt.contains("Tweet: \"my {criteria_list} and {additional} stay literal\""));
}

#[test]
fn test_prompt_is_deterministic() {
    let tweet = Tweet::new("5", "same input");
    let criteria = Criteria::defaults();

    assert_eq!(
        build_evaluation_prompt(&tweet, &criteria),
        build_evaluation_prompt(&tweet, &criteria)
    );
}
