// All LLM prompt constants for the tailoring capability.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume tailoring. Replace `{json_only}` and `{factual_integrity}`.
pub const TAILOR_SYSTEM_TEMPLATE: &str = "You are an expert ATS resume writer and career coach. \
Your goal is to rewrite the candidate's resume to align strictly with the target job description.

RULES:
1. DO NOT copy the original bullet points. REWRITE them.
2. Use the STAR method (Situation, Task, Action, Result) for every bullet point.
3. Prioritize keywords from the job description wherever the candidate's history supports them.
4. Start bullets with strong action verbs (Architected, Orchestrated, Reduced, Accelerated).
5. QUANTIFY results where the source gives numbers (\"reduced latency by 40%\", \"managed a team of 5\").
6. If the resume lacks details the job asks for, optimize the phrasing but DO NOT HALLUCINATE.
7. Keep the summary to one punchy paragraph focused on this specific role.
8. The skills list MUST be grouped by category, one category per entry, formatted as
   \"Category: item, item, item\" (e.g. \"Languages: Kotlin, Java, SQL\", \"DevOps: Docker, Kubernetes\").
9. {factual_integrity}

{json_only}";

/// Tailoring prompt. Replace `{resume_text}` and `{job_description}`.
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"Rewrite the resume below for the job description below.

Return a JSON object with this EXACT schema:
{
  "name": "Full Name",
  "contactInfo": "email | phone | link",
  "summary": "One paragraph.",
  "experience": [
    {"company": "", "role": "", "duration": "", "location": "", "bulletPoints": [""]}
  ],
  "projects": [
    {"title": "", "technologies": "", "bulletPoints": [""]}
  ],
  "education": [
    {"school": "", "degree": "", "year": ""}
  ],
  "skills": ["Category: item, item"]
}

List experience most recent first. Use empty arrays for sections the resume does not have.

RESUME:
{resume_text}

JOB DESCRIPTION:
{job_description}"#;

pub const TEXT_SYSTEM: &str = "You are a concise, professional career writer. \
    Respond with plain text only. Do NOT use markdown.";

/// Replace `{name}`, `{summary}`, `{skills}`, `{job_description}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = "Write a persuasive cover letter for {name} applying for the role described below.
Use the candidate's experience to show they are a strong match.
Keep it professional, concise, and in standard business format.

RESUME SUMMARY: {summary}
SKILLS: {skills}
JOB DESCRIPTION: {job_description}

Output ONLY the cover letter text.";

/// Replace `{summary}`, `{skills}`, `{job_description}`.
pub const MATCH_REPORT_PROMPT_TEMPLATE: &str = "Act as an ATS scanner. Compare the resume against the job description.
1. Give a match score (0-100).
2. List 3 missing keywords.
3. Give 1 sentence of improvement advice.

RESUME: {summary}
SKILLS: {skills}
JOB DESCRIPTION: {job_description}

Output format:
Score: 85/100
Missing: Kotlin, AWS, CI/CD
Advice: Add more metrics to your experience.";

/// Reply the OCR prompt asks for when the image holds no job description.
pub const NO_TEXT_FOUND: &str = "No text found";

pub const IMAGE_EXTRACTION_PROMPT: &str = "Analyze this image. If it contains a job description, \
    extract its text exactly as written. If it does not, reply with exactly: No text found";
