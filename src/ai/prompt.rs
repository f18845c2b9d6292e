//! Prompt text and trigger parsing for the AI solver.

/// Instructions sent with every question.
pub const SYSTEM_PROMPT: &str = "You are a high-precision mathematical assistant. \
Solve the user's math problem or answer their math-related question concisely.

Rules:
1. If the user asks for a calculation (e.g. \"square root of 144\", \"15% of 850\"), \
return only the numeric result, with units if applicable. Do not explain unless asked.
2. For a word problem, give the final answer clearly, followed by at most one short \
sentence of explanation if necessary.
3. Prefer plain text suitable for a calculator display over LaTeX.
4. If the input is not math-related, politely refuse and ask for a math problem.";

const TRIGGERS: &[&str] = &["!ai", "?"];

/// Extract the question from a line like `!ai 15% of 850` or `? 15% of 850`.
///
/// Returns `None` when the line does not start with a trigger. A bare
/// trigger yields an empty question.
pub fn parse_trigger(input: &str) -> Option<&str> {
    let trimmed = input.trim_start();
    TRIGGERS.iter().find_map(|trigger| {
        let rest = trimmed.strip_prefix(trigger)?;
        // `!aisle` is not a trigger.
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            Some(rest.trim())
        } else {
            None
        }
    })
}
