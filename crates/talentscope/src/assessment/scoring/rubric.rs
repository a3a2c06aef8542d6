//! Deterministic scoring for structured answer kinds.

use super::{QuizQuestion, NEUTRAL_SCORE};

/// Rubric lookup for a chosen option. Options absent from the rubric score
/// neutral rather than failing the submission.
pub(crate) fn score_multiple_choice(question: &QuizQuestion, choice: &str) -> (u8, String) {
    match question.scoring_rubric.get(choice) {
        Some(score) => (
            (*score).min(100),
            format!("rubric value for '{choice}'"),
        ),
        None => (
            NEUTRAL_SCORE,
            format!("'{choice}' missing from rubric; neutral score applied"),
        ),
    }
}

/// Linear rescale of a slider value into [0, 100] given the question's
/// declared range. A degenerate range scores neutral.
pub(crate) fn score_slider(question: &QuizQuestion, value: f64) -> (u8, String) {
    let min = question.slider_min.unwrap_or(0.0);
    let max = question.slider_max.unwrap_or(100.0);
    if max <= min {
        return (
            NEUTRAL_SCORE,
            "slider range is degenerate; neutral score applied".to_string(),
        );
    }

    let scaled = ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0);
    (
        scaled.round() as u8,
        format!("slider value {value} rescaled from [{min}, {max}]"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::scoring::QuestionKind;
    use std::collections::BTreeMap;

    fn slider_question(min: f64, max: f64) -> QuizQuestion {
        QuizQuestion {
            id: "q1".to_string(),
            kind: QuestionKind::Slider,
            prompt: "How energized are you by group work?".to_string(),
            dimension: "Social".to_string(),
            scoring_rubric: BTreeMap::new(),
            options: Vec::new(),
            slider_min: Some(min),
            slider_max: Some(max),
        }
    }

    #[test]
    fn slider_rescales_into_percentage() {
        let question = slider_question(1.0, 5.0);
        assert_eq!(score_slider(&question, 1.0).0, 0);
        assert_eq!(score_slider(&question, 3.0).0, 50);
        assert_eq!(score_slider(&question, 5.0).0, 100);
    }

    #[test]
    fn slider_clamps_out_of_range_values() {
        let question = slider_question(0.0, 10.0);
        assert_eq!(score_slider(&question, -4.0).0, 0);
        assert_eq!(score_slider(&question, 25.0).0, 100);
    }

    #[test]
    fn degenerate_slider_range_scores_neutral() {
        let question = slider_question(5.0, 5.0);
        assert_eq!(score_slider(&question, 5.0).0, NEUTRAL_SCORE);
    }

    #[test]
    fn unknown_choice_scores_neutral() {
        let mut rubric = BTreeMap::new();
        rubric.insert("strongly_agree".to_string(), 90);
        let question = QuizQuestion {
            id: "q2".to_string(),
            kind: QuestionKind::MultipleChoice,
            prompt: "I enjoy organizing shared plans.".to_string(),
            dimension: "Conventional".to_string(),
            scoring_rubric: rubric,
            options: vec!["strongly_agree".to_string()],
            slider_min: None,
            slider_max: None,
        };

        assert_eq!(score_multiple_choice(&question, "strongly_agree").0, 90);
        assert_eq!(score_multiple_choice(&question, "maybe").0, NEUTRAL_SCORE);
    }
}
