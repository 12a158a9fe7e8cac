// Shared prompt fragments.
// Each feature that needs LLM calls defines its own prompts.rs alongside it;
// this file holds the pieces they all reuse.

/// Appended to every prompt that expects a JSON shape back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only, matching the structure above exactly. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Fills `{name}` placeholders in a template in one pass. Inserted values are
/// copied verbatim, so placeholder-like text inside them is never expanded.
/// Unknown placeholders are left as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut filled = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        filled.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replacement = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                filled.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                filled.push('{');
                rest = after;
            }
        }
    }
    filled.push_str(rest);
    filled
}
