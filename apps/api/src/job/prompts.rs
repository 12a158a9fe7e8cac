// All LLM prompt templates for the job module.
// Placeholders are filled with llm_client::prompts::fill_template.

/// Replace: {resume_text}, {job_description}, {json_only}
pub const MATCH_PROMPT_TEMPLATE: &str = r#"You are an expert Technical Recruiter and Hiring Manager.
Compare the following Resume against the Job Description (JD).

RESUME:
"{resume_text}"

JOB DESCRIPTION:
"{job_description}"

Provide a JSON response with this matching analysis:
{
  "matchPercentage": number (0-100),
  "matchStatus": "High" | "Medium" | "Low",
  "missingSkills": ["skill1", "skill2"],
  "matchingSkills": ["skill1", "skill2"],
  "cultureFitScore": number (0-10),
  "advice": "Detailed advice on how to convert this application into an interview."
}

{json_only}"#;

/// Replace: {resume_text}, {job_description}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert Career Coach. Write a professional cover letter for the candidate below, tailored to the job description.

RESUME:
"{resume_text}"

JOB DESCRIPTION:
"{job_description}"

Rules:
- Use only facts present in the resume. Do NOT invent employers, titles or numbers.
- Three to four short paragraphs.
- Return ONLY the body of the letter: no subject line, no placeholders, no markdown."#;

/// Replace: {resume_text}, {json_only}
pub const LINKEDIN_PROMPT_TEMPLATE: &str = r#"You are a LinkedIn Branding Expert. Generate optimized LinkedIn profile content from this resume.

RESUME:
"{resume_text}"

Return a JSON object with this EXACT structure:
{
  "headline": "under 220 characters, keyword-rich",
  "about": "first-person summary, 3 short paragraphs",
  "experience": [
    { "company": "Company name", "bulletPoints": "• achievement one\n• achievement two" }
  ],
  "skills": ["skill1", "skill2"]
}

{json_only}"#;
