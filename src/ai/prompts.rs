use super::{AiError, GenerationConfig};

pub const STUDY_SYSTEM_INSTRUCTION: &str = "You are an elite study strategist for high-performance \
engineering students. You despise generic advice. You provide precise, science-backed technical \
study protocols.";

#[derive(Debug, Clone)]
pub struct StudyRequest {
    pub struggle: String,
    pub exam_date: Option<String>,
    pub subject_focus: String,
    pub daily_hours: u32,
}

impl Default for StudyRequest {
    fn default() -> Self {
        Self {
            struggle: String::new(),
            exam_date: None,
            subject_focus: "theory".to_string(),
            daily_hours: 2,
        }
    }
}

/// Prompt and sampling settings for the study-strategy generator.
pub fn study_strategy_prompt(request: &StudyRequest) -> Result<(String, GenerationConfig), AiError> {
    let struggle = request.struggle.trim();
    if struggle.is_empty() {
        return Err(AiError::InvalidPrompt("Describe what you are struggling with.".to_string()));
    }

    let exam_date = request
        .exam_date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("Not specified");

    let prompt = format!(
        "STRATEGIC CONTEXT:
- Struggle: {struggle}
- Exam Date: {exam_date}
- Subject Focus: {subject}
- Daily Capacity: {hours} hours

INSTRUCTIONS:
1. Classify the user's struggle into one category: [Planning, Motivation, Focus, Memory, Time Management].
2. Provide a 3-part strategic breakdown:
   - STRATEGIC SUMMARY: Concise diagnosis. Use **bolding** for critical insights.
   - TECHNICAL DRILL: One advanced study technique (e.g., Blurting, Interleaved Practice, Active Recall) tailored to their subject. Explain the \"How\" and \"Why\".
   - THE DAILY ROUTINE: A timestamped plan based on their {hours} hour capacity.

STYLE: Professional, technical, zero-fluff, actionable. Use standard bullet points for lists.",
        struggle = struggle,
        exam_date = exam_date,
        subject = request.subject_focus,
        hours = request.daily_hours,
    );

    let config = GenerationConfig {
        temperature: Some(0.4),
        top_p: Some(0.8),
        system_instruction: Some(STUDY_SYSTEM_INSTRUCTION.to_string()),
    };

    Ok((prompt, config))
}

pub fn task_breakdown_prompt(title: &str) -> String {
    format!(
        "Break down this task into 3 specific actionable sub-steps: \"{}\"",
        title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_study_prompt_fills_context() {
        let (prompt, config) = study_strategy_prompt(&StudyRequest {
            struggle: "  I forget formulas ".into(),
            daily_hours: 3,
            ..Default::default()
        })
        .unwrap();

        assert!(prompt.contains("- Struggle: I forget formulas\n"));
        assert!(prompt.contains("- Exam Date: Not specified"));
        assert!(prompt.contains("- Subject Focus: theory"));
        assert!(prompt.contains("based on their 3 hour capacity"));
        assert_eq!(config.temperature, Some(0.4));
        assert_eq!(config.top_p, Some(0.8));
        assert_eq!(config.system_instruction.as_deref(), Some(STUDY_SYSTEM_INSTRUCTION));
    }

    #[test]
    fn test_blank_struggle_is_rejected() {
        let err = study_strategy_prompt(&StudyRequest::default()).unwrap_err();
        assert!(matches!(err, AiError::InvalidPrompt(_)));
    }

    #[test]
    fn test_breakdown_prompt_quotes_title() {
        assert_eq!(
            task_breakdown_prompt("Ship v1"),
            "Break down this task into 3 specific actionable sub-steps: \"Ship v1\""
        );
    }
}
