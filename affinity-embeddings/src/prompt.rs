//! Prompt construction for the chat-completion analysis call.

use affinity_core::models::Message;

/// System instruction sent ahead of every analysis prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are an analyzer that responds only with precise, \
comma-separated traits and characteristics. No explanations or full sentences.";

/// Render messages as `ROLE: content` lines, oldest first.
pub fn format_conversation(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str().to_uppercase(), m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the analysis prompt for one batch.
pub fn build_analysis_prompt(messages: &[Message]) -> String {
    format!(
        "Analyze only the USER's messages in this conversation:\n\
         {}\n\n\
         Respond only with three comma-separated lists:\n\
         1. Core traits shown: [direct personality traits, no explanations]\n\
         2. Topics & interests mentioned: [specific subjects discussed]\n\
         3. Match indicators: [traits for ideal social matching]",
        format_conversation(messages)
    )
}
