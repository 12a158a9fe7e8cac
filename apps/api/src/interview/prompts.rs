// All LLM prompt templates for the interview module.
// Placeholders are filled with llm_client::prompts::fill_template.

/// Replace: {question_count}, {job_description}, {resume_section}, {json_only}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"You are a Senior Hiring Manager preparing a mock interview.
Write {question_count} interview questions for the role below: a mix of technical and behavioral questions, ordered from warm-up to hardest.

JOB DESCRIPTION:
"{job_description}"
{resume_section}
Return a JSON object with this EXACT structure:
{
  "questions": ["question 1", "question 2"]
}

{json_only}"#;

/// Replace: {resume_text}
pub const QUESTIONS_RESUME_SECTION: &str = r#"
CANDIDATE RESUME (tailor some questions to this background):
"{resume_text}"
"#;

/// Replace: {question}, {answer}, {job_section}, {json_only}
pub const EVALUATE_PROMPT_TEMPLATE: &str = r#"You are an expert Interview Coach. Evaluate the candidate's answer to an interview question.

QUESTION:
"{question}"

CANDIDATE ANSWER:
"{answer}"
{job_section}
Return a JSON object with this EXACT structure:
{
  "score": number (0-10),
  "feedback": "what was good and what was missing, 2-4 sentences",
  "improvedAnswer": "a stronger version of the same answer, in the candidate's voice"
}

{json_only}"#;

/// Replace: {job_description}
pub const EVALUATE_JOB_SECTION: &str = r#"
ROLE CONTEXT:
"{job_description}"
"#;
