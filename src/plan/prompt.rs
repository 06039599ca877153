use super::types::ValidatedRequest;

const MARKDOWN_PREAMBLE: &str =
    "Please generate a detailed study plan and format the response in markdown syntax. Here are the details:";
const PLAIN_PREAMBLE: &str =
    "Please generate a detailed study plan with the following information:";
const MARKDOWN_CLOSING: &str = "FORMAT THE ENTIRE RESPONSE IN MARKDOWN SYNTAX with proper headings, lists, and emphasis where appropriate.";

/// Builds the single instruction sent upstream.
///
/// Output depends only on the request and `markdown`; identical inputs give
/// byte-identical prompts.
pub fn compose_prompt(request: &ValidatedRequest, markdown: bool) -> String {
    let mut details = vec![
        format!("Subjects: {}", request.subjects),
        format!("Exam Date: {}", request.exam_date),
        format!("Daily Study Hours: {}", request.study_hours),
    ];
    if let Some(style) = &request.learning_style {
        details.push(format!("Learning Style: {style}"));
    }
    if let Some(strengths) = &request.strengths {
        details.push(format!("Strengths: {strengths}"));
    }
    if let Some(weaknesses) = &request.weaknesses {
        details.push(format!("Weaknesses: {weaknesses}"));
    }
    details.push(format!("Goals: {}", request.goals));

    let mut asks = vec!["Distribution of study hours across subjects"];
    asks.push(if request.learning_style.is_some() {
        "Learning activities based on the specified learning style"
    } else {
        "Suggested learning activities for each subject"
    });
    asks.extend([
        "Breaks and revision periods",
        "Measurable milestones",
        "Timeline adaptation for the exam",
    ]);
    if request.strengths.is_some() {
        asks.push("Strategies leveraging strengths");
    }
    if request.weaknesses.is_some() {
        asks.push("Plans to improve weak areas");
    }

    let mut prompt = String::new();
    if markdown {
        prompt.push_str(MARKDOWN_PREAMBLE);
        prompt.push_str("\n\n# Study Plan Details\n");
    } else {
        prompt.push_str(PLAIN_PREAMBLE);
        prompt.push_str("\n\n");
    }
    for line in &details {
        prompt.push_str("- ");
        prompt.push_str(line);
        prompt.push('\n');
    }

    prompt.push_str("\nPlease create a comprehensive study schedule that includes:\n\n");
    for (idx, ask) in asks.iter().enumerate() {
        prompt.push_str(&format!("{}. {ask}\n", idx + 1));
    }

    if markdown {
        prompt.push('\n');
        prompt.push_str(MARKDOWN_CLOSING);
    }

    prompt
}
