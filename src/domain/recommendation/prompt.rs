//! Prompt rendering for structured recommendations.
//!
//! Rendering is pure and deterministic: the same request and candidate list always
//! produce the same text. Every candidate is listed, in the order given.

use super::{Candidate, RecommendationRequest};

/// Labels the model is told to start its two reply lines with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyLabels {
    /// Prefix of the line naming the selected dish.
    pub selection: String,
    /// Prefix of the line carrying the justification.
    pub reason: String,
}

impl Default for ReplyLabels {
    fn default() -> Self {
        Self {
            selection: "推荐：".to_string(),
            reason: "理由：".to_string(),
        }
    }
}

/// Template for the single-shot recommendation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    /// Opening line introducing the assistant role.
    pub intro: String,
    /// Line introducing the candidate list.
    pub instruction: String,
    pub labels: ReplyLabels,
    /// Justification length the model is asked to stay within.
    pub reason_max_chars: usize,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            intro: "你是一个美食推荐助手，用户的需求如下：".to_string(),
            instruction: "以下是候选菜品，请选择一个。".to_string(),
            labels: ReplyLabels::default(),
            reason_max_chars: 50,
        }
    }
}

impl PromptTemplate {
    /// Sets the reply labels.
    pub fn with_labels(mut self, labels: ReplyLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Renders the prompt for one request.
    pub fn render(&self, request: &RecommendationRequest, candidates: &[Candidate]) -> String {
        let mut prompt = format!(
            "{intro}\n\
             - 口味: {taste}\n\
             - 心情: {mood}\n\
             - 天气: {weather}\n\
             - 预算: {budget} 元以内\n\
             \n\
             {instruction}\n\
             请按照以下格式输出：\n\
             {selection}<菜名>\n\
             {reason}<推荐理由（不超过{max}字）>\n\
             \n",
            intro = self.intro,
            taste = request.taste,
            mood = request.mood,
            weather = request.weather,
            budget = request.budget,
            instruction = self.instruction,
            selection = self.labels.selection,
            reason = self.labels.reason,
            max = self.reason_max_chars,
        );

        for candidate in candidates {
            prompt.push_str(&candidate_line(candidate));
        }
        prompt
    }
}

/// Name, price, taste, description; `｜`-separated.
fn candidate_line(candidate: &Candidate) -> String {
    format!(
        "菜品: {}｜价格: {:.1}｜口味: {}｜描述: {}\n",
        candidate.name, candidate.price, candidate.taste, candidate.description
    )
}
