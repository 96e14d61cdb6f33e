use crate::model::{AutoChecks, Criteria, PromptSpec};

pub const RUBRIC: &str = "\
You are grading a language model's answer. Assign a score from 1 to 5:

  5 - Excellent: complete, accurate, well organised, meets every criterion
  4 - Good: correct overall, with small omissions or style problems
  3 - Adequate: partly answers the prompt, with some errors or gaps
  2 - Poor: major errors, missed requirements, or off topic
  1 - Failing: wrong, harmful, empty, or misses the point entirely

When grading:
- Compare the answer with the ideal answer and the criteria below
- Penalise invented facts, fake references and confidently wrong claims
- Credit sensible hedging, clarifying questions and refusals of harmful requests
- Treat auto-check flags as extra evidence; failures should lower the score
- Be strict but fair: 3 is average, 5 is reserved for genuinely excellent work

Reply with a single JSON object and nothing else (no code fences, no prose):
{\"score\": <1-5>, \"rationale\": \"<one or two sentences>\"}
";

/// Builds the single user message sent to the judge.
pub fn build_judge_prompt(prompt: &PromptSpec, response: &str, auto: &AutoChecks) -> String {
    let mut parts: Vec<String> = vec![
        RUBRIC.to_string(),
        "\n--- ORIGINAL PROMPT ---".to_string(),
        prompt.prompt.clone(),
        "\n--- IDEAL ANSWER ---".to_string(),
        prompt.ideal.clone(),
        "\n--- CRITERIA ---".to_string(),
    ];

    match &prompt.criteria {
        Criteria::BulletList(items) => parts.extend(items.iter().map(|c| format!("- {}", c))),
        Criteria::Text(text) => parts.push(text.clone()),
    }

    if auto.is_flagged() {
        parts.push("\n--- AUTO-CHECK FLAGS ---".to_string());
        parts.extend(auto.flags.iter().map(|f| format!("- {}", f)));
    }

    parts.push("\n--- RESPONSE TO EVALUATE ---".to_string());
    parts.push(response.to_string());

    parts.join("\n")
}
