//! Grounding a free-text model reply back to a catalog candidate.
//!
//! Matching is exact and case-sensitive against candidate names. A reply that
//! names a dish with stray punctuation or different spacing does not match; that
//! brittleness is deliberate and surfaces as `SelectionNotFound`.

use super::{Candidate, PromptTemplate, ReplyLabels, ResolveError};

/// Labeled values captured from a reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReply {
    pub selection: Option<String>,
    pub reason: Option<String>,
}

/// A reply grounded to one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub candidate: Candidate,
    pub reason: String,
}

impl ReplyLabels {
    /// Captures the labeled lines of a reply. Later lines overwrite earlier ones.
    pub fn parse(&self, reply: &str) -> ParsedReply {
        let mut parsed = ParsedReply::default();
        for line in reply.lines() {
            if let Some(rest) = line.strip_prefix(self.selection.as_str()) {
                parsed.selection = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix(self.reason.as_str()) {
                parsed.reason = Some(rest.trim().to_string());
            }
        }
        parsed
    }

    /// Parses a reply and grounds its selection against `candidates`.
    ///
    /// The first candidate whose name equals the captured selection wins.
    pub fn resolve(
        &self,
        reply: &str,
        candidates: &[Candidate],
    ) -> Result<Resolution, ResolveError> {
        let parsed = self.parse(reply);

        let name = match parsed.selection {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ResolveError::EmptySelection),
        };

        let candidate = candidates
            .iter()
            .find(|c| c.name == name)
            .ok_or(ResolveError::SelectionNotFound { name })?;

        Ok(Resolution {
            candidate: candidate.clone(),
            reason: parsed.reason.unwrap_or_default(),
        })
    }
}

impl PromptTemplate {
    /// Resolves a reply using this template's labels.
    pub fn resolve(
        &self,
        reply: &str,
        candidates: &[Candidate],
    ) -> Result<Resolution, ResolveError> {
        self.labels.resolve(reply, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dish(id: i64, name: &str) -> Candidate {
        Candidate {
            id,
            name: name.to_string(),
            price: 20.0,
            description: String::new(),
            taste: String::new(),
            score: 0.0,
            image_url: String::new(),
        }
    }

    fn candidates() -> Vec<Candidate> {
        vec![dish(1, "宫保鸡丁"), dish(2, "鱼香肉丝"), dish(3, "麻婆豆腐")]
    }

    #[test]
    fn resolves_named_candidate_with_reason() {
        let labels = ReplyLabels::default();
        let resolution = labels
            .resolve("推荐：鱼香肉丝\n理由：经典下饭", &candidates())
            .unwrap();

        assert_eq!(resolution.candidate.id, 2);
        assert_eq!(resolution.candidate.name, "鱼香肉丝");
        assert_eq!(resolution.reason, "经典下饭");
    }

    #[test]
    fn absent_dish_is_selection_not_found() {
        let labels = ReplyLabels::default();
        let err = labels
            .resolve("推荐：北京烤鸭\n理由：好吃", &candidates())
            .unwrap_err();

        assert_eq!(
            err,
            ResolveError::SelectionNotFound {
                name: "北京烤鸭".to_string()
            }
        );
    }

    #[test]
    fn missing_selection_line_is_empty_selection() {
        let labels = ReplyLabels::default();
        let err = labels
            .resolve("我觉得都不错\n理由：随便", &candidates())
            .unwrap_err();
        assert_eq!(err, ResolveError::EmptySelection);
    }

    #[test]
    fn blank_selection_is_empty_selection() {
        let labels = ReplyLabels::default();
        let err = labels.resolve("推荐：   \n", &candidates()).unwrap_err();
        assert_eq!(err, ResolveError::EmptySelection);
    }

    #[test]
    fn last_labeled_line_wins() {
        let labels = ReplyLabels::default();
        let reply = "推荐：宫保鸡丁\n理由：第一版\n推荐：麻婆豆腐\n理由：第二版";
        let resolution = labels.resolve(reply, &candidates()).unwrap();

        assert_eq!(resolution.candidate.name, "麻婆豆腐");
        assert_eq!(resolution.reason, "第二版");
    }

    #[test]
    fn values_are_trimmed_and_crlf_tolerated() {
        let labels = ReplyLabels::default();
        let resolution = labels
            .resolve("好的。\r\n推荐：  宫保鸡丁  \r\n理由： 香辣 \r\n", &candidates())
            .unwrap();

        assert_eq!(resolution.candidate.id, 1);
        assert_eq!(resolution.reason, "香辣");
    }

    #[test]
    fn missing_reason_yields_empty_reason() {
        let labels = ReplyLabels::default();
        let resolution = labels.resolve("推荐：宫保鸡丁", &candidates()).unwrap();
        assert_eq!(resolution.reason, "");
    }

    #[test]
    fn match_is_exact() {
        let labels = ReplyLabels::default();
        assert!(matches!(
            labels.resolve("推荐：鱼香肉丝。", &candidates()),
            Err(ResolveError::SelectionNotFound { .. })
        ));
        assert!(matches!(
            labels.resolve("推荐：鱼香 肉丝", &candidates()),
            Err(ResolveError::SelectionNotFound { .. })
        ));
    }

    #[test]
    fn indented_label_is_not_a_label() {
        let labels = ReplyLabels::default();
        let err = labels.resolve("  推荐：宫保鸡丁", &candidates()).unwrap_err();
        assert_eq!(err, ResolveError::EmptySelection);
    }

    #[test]
    fn first_matching_candidate_wins_on_duplicate_names() {
        let labels = ReplyLabels::default();
        let dup = vec![dish(10, "凉面"), dish(11, "凉面")];
        let resolution = labels.resolve("推荐：凉面", &dup).unwrap();
        assert_eq!(resolution.candidate.id, 10);
    }

    #[test]
    fn parse_captures_both_labels() {
        let parsed = ReplyLabels::default().parse("推荐：A\n其他\n理由：B");
        assert_eq!(parsed.selection.as_deref(), Some("A"));
        assert_eq!(parsed.reason.as_deref(), Some("B"));
    }

    #[test]
    fn custom_labels_are_honored() {
        let labels = ReplyLabels {
            selection: "Dish:".to_string(),
            reason: "Why:".to_string(),
        };
        let resolution = labels
            .resolve("Dish: 麻婆豆腐\nWhy: numbing", &candidates())
            .unwrap();
        assert_eq!(resolution.candidate.id, 3);
        assert_eq!(resolution.reason, "numbing");
    }
}
