// src/chains/prompts.rs
// Prompt templates for the two LLM round trips. Wording is fixed: the
// email post-processing in `chains` matches against the exact phrases
// the email prompt dictates.

pub fn extraction_prompt(page_data: &str) -> String {
    format!(
        r#"### SCRAPED TEXT FROM WEBSITE:
{page_data}

### INSTRUCTION:
Your job is to extract the main job posting from the scraped page content above.

Only extract **one** job posting (the primary one).

Return a valid JSON object with exactly these keys:
- `role`: The job title as exactly written on the page (e.g., "Software Development Engineer I 2025").
- `experience`: A very brief summary (1-2 sentences) of the required or preferred experience.
- `skills`: A list or sentence of key skills required (e.g., "Python, AWS, microservices").
- `description`: A clean, short paragraph summarizing the role and its responsibilities.

Do not invent or guess any values.
Do not return arrays. Return a single JSON object.

### OUTPUT (STRICTLY VALID JSON, NO PREAMBLE):
"#
    )
}

pub fn email_prompt(role: &str, job_description: &str, experience: &str) -> String {
    format!(
        r#"### JOB DESCRIPTION:
{job_description}

### YOUR EXPERIENCE:
{experience}

### INSTRUCTION:
You are an enthusiastic job seeker writing a cold email for the role above.

Only use the experience and job description provided. Do **not** invent any job titles, numbers, or achievements not mentioned. Stick to facts.

Write an email that:
- Begins with: "Hey, I hope you are doing well."
- Then says: "Hi, I just came across the {role} position and I believe I'd be a great fit. Here's why:"
- Includes **3 bullet points**, each 2-3 lines.
    - Start each bullet with: "Your role is focused on...", "The job mentions...", or "You're looking for someone skilled in..."
    - Back it up using only the provided experience.
- Ends with: "Would you be open to a quick coffee chat this week to explore this further?"
- Then write:
    Thank you and warm regards,
    Isha Agrawal
    Email: ishaagrawal2000@gmail.com
    GitHub: https://github.com/IshaAg07

Keep it real and natural. Avoid buzzwords or exaggeration.

### EMAIL (NO PREAMBLE):
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_prompt_embeds_page_data() {
        let prompt = extraction_prompt("Job Title: Data Analyst II");
        assert!(prompt.contains("Job Title: Data Analyst II"));
        assert!(prompt.contains("Return a single JSON object"));
    }

    #[test]
    fn test_email_prompt_embeds_all_inputs() {
        let prompt = email_prompt("Backend Developer", "Build APIs", "software engineer: built services");
        assert!(prompt.contains("the Backend Developer position"));
        assert!(prompt.contains("Build APIs"));
        assert!(prompt.contains("built services"));
    }
}
