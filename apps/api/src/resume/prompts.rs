// All LLM prompt templates for the resume module.
// Placeholders are filled with llm_client::prompts::fill_template.

/// Replace: {resume_text}, {json_only}
pub const ANALYZE_TEXT_PROMPT_TEMPLATE: &str = r#"You are an expert ATS (Applicant Tracking System) and Technical Recruiter.
Analyze the following resume text.

RESUME TEXT:
"{resume_text}"

Return the response in this exact JSON structure:
{
  "score": number (0-100),
  "candidateName": "inferred name",
  "summary": "2 sentence professional summary",
  "strengths": ["skill1", "skill2"],
  "improvements": ["Specific advice 1", "Specific advice 2"]
}

{json_only}"#;

/// Sent with the document attached. Replace: {json_only}
pub const ANALYZE_DOCUMENT_PROMPT_TEMPLATE: &str = r#"You are an expert ATS. Analyze the attached resume document (it may be a scanned PDF or an image).
Read every section of the document before answering.

Return the response in this exact JSON structure:
{
  "score": number (0-100),
  "candidateName": "inferred name",
  "summary": "2 sentence professional summary",
  "strengths": ["skill1", "skill2"],
  "improvements": ["Specific advice 1", "Specific advice 2"]
}

{json_only}"#;

/// Replace: {raw_text}, {json_only}
pub const AUTOFILL_PROMPT_TEMPLATE: &str = r#"You are a resume parser. Convert the free text below into structured resume data.

TEXT:
"{raw_text}"

Return a JSON object with this EXACT structure:
{
  "personal": {
    "fullName": "", "email": "", "phone": "", "linkedin": "",
    "github": "", "website": "", "summary": ""
  },
  "experience": [ { "role": "", "company": "", "date": "", "description": "" } ],
  "education": [ { "degree": "", "school": "", "date": "" } ],
  "skills": ["skill1", "skill2"],
  "projects": [ { "title": "", "link": "", "description": "" } ]
}

Use an empty string for anything the text does not mention. Do NOT invent details.

{json_only}"#;
