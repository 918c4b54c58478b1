//! # Extraction Prompts
//!
//! Prompt templates sent to the text-generation service.

/// Prompt used to check that a credential is accepted.
pub const KEY_CHECK_PROMPT: &str = "Say 'OK' if you receive this message.";

const EXTRACTION_INTRO: &str = "You are an AI assistant helping to extract information from insurance photo reports to fill out a claim form.";

const EXTRACTION_INSTRUCTIONS: &str = r#"Please analyze the text and extract the appropriate value for each field. Return your response as a JSON object with the field names as keys and the extracted values as values.

If a field cannot be found in the text, use "Not Found" as the value.

Important guidelines:
- Extract exact values when available
- For dates, use a consistent format (YYYY-MM-DD if possible)
- For monetary amounts, include currency symbols
- For names, use full names if available
- Be concise and accurate

Return ONLY the JSON object, no additional text or explanation.

Example format:
{
    "ClaimantName": "John Doe",
    "AccidentDate": "2025-01-15",
    "DamageEstimate": "$4,200"
}"#;

/// Build the extraction prompt for a field list and source text.
pub fn extraction_prompt(fields: &[String], source_text: &str) -> String {
    format!(
        "{}\n\nI have the following fields that need to be filled:\n{}\n\nHere is the text extracted from the insurance photo reports:\n\n---\n{}\n---\n\n{}",
        EXTRACTION_INTRO,
        fields.join(", "),
        source_text,
        EXTRACTION_INSTRUCTIONS
    )
}
