use crate::session::extract::QuestionRecord;

/// Question request sent at startup, after reset, and after every answer.
/// The service is stateless per call, so this is sent in full each time.
pub const DEFAULT_QUESTION_PROMPT: &str = "Give one speed math question for Indian banking exams, \
including approximation and simplification. The question should have options, which may be \
incorrect. Wait for the user's answer before showing the solution and steps. Do not evaluate or \
provide solutions unless asked. Format the reply exactly as: **Question:** <question> \
**Options:** <options> **Note:** <note>";

/// Build the follow-up request that asks the service to judge `answer`.
///
/// The request carries the question, its options, and the raw answer
/// verbatim because no conversation history is kept between calls.
pub fn verification_request(record: &QuestionRecord, answer: &str) -> String {
    format!(
        "Check the user's answer '{answer}' for the question: '{question}' with the options: \
         '{options}'. Provide the solution with steps, and finish with a line of the form \
         **Correct Answer:** <answer>.",
        question = record.question_text,
        options = record.options_text,
    )
}
