// Shared prompt fragments. Feature prompts live in a prompts.rs next to the
// code that sends them.

/// Appended to every prompt that must come back as a bare JSON object.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Prompt used to repair a malformed JSON answer. Replace `{broken}`.
pub const JSON_REPAIR_PROMPT: &str = "The following text was supposed to be a single valid JSON object \
    but it is malformed. Fix it and return ONLY the corrected JSON object, \
    keeping every field and value that is present.\n\n{broken}";
