// Cross-cutting prompt fragments shared by every capability that talks to the model.
// Each capability keeps its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps tailoring from inventing facts.
pub const FACTUAL_INTEGRITY_INSTRUCTION: &str = "\
    FACTUAL INTEGRITY (CRITICAL): \
    - DO NOT change the candidate's total years of experience, even if the job asks for fewer or more. \
    - DO NOT change company names, job titles, degrees, or dates. \
    - DO NOT invent skills, employers, or qualifications the candidate does not have. \
    - You may emphasize relevant experience, but never delete or alter the truth.";
