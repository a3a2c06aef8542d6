use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use talentscope::assessment::domain::{
    ActionType, AgentState, ConfidenceSource, Priority, SourceType,
};
use talentscope::assessment::scoring::{AnswerValue, UnavailableTextService};
use talentscope::assessment::{
    build_computed_profile, build_confidence_profile, evaluate_state, identify_gaps,
    ProfileInputs, QuizAnswer, QuizDimensionScore, QuizQuestion, QuizScorer,
    DEFAULT_TARGET_CONFIDENCE,
};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 15, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

fn question(id: &str, dimension: &str, rubric: &[(&str, u8)]) -> QuizQuestion {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "type": "multiple_choice",
        "question": "How strongly does this describe you?",
        "dimension": dimension,
        "scoringRubric": rubric
            .iter()
            .map(|(option, score)| (option.to_string(), score))
            .collect::<BTreeMap<String, &u8>>(),
        "options": rubric.iter().map(|(option, _)| option).collect::<Vec<_>>(),
    }))
    .expect("valid question payload")
}

#[test]
fn quiz_results_flow_through_to_a_ranked_action_plan() {
    // Score a small structured submission with no text service configured.
    let scorer = QuizScorer::new(Arc::new(UnavailableTextService));
    let rubric: &[(&str, u8)] = &[("yes", 85), ("somewhat", 55), ("no", 20)];
    let questions = vec![
        question("q1", "Investigative", rubric),
        question("q2", "Artistic", rubric),
        question("q3", "communication", rubric),
    ];
    let answers = vec![
        QuizAnswer {
            question_id: "q1".to_string(),
            answer: AnswerValue::Text("yes".to_string()),
        },
        QuizAnswer {
            question_id: "q2".to_string(),
            answer: AnswerValue::Text("somewhat".to_string()),
        },
        QuizAnswer {
            question_id: "q3".to_string(),
            answer: AnswerValue::Text("no".to_string()),
        },
    ];

    let outcome = scorer
        .score_submission(&questions, &answers)
        .expect("scoring succeeds without the text service");
    assert_eq!(outcome.dimension_summary.get("Investigative"), Some(&85));

    // Turn quiz output into evidence atoms and derive the confidence profile.
    let atoms: Vec<ConfidenceSource> = outcome
        .scores
        .iter()
        .map(|score| {
            ConfidenceSource::new(
                SourceType::Quiz,
                score.dimension.clone(),
                score.score,
                score.rationale.clone(),
                now(),
            )
        })
        .collect();
    let confidence_profile = build_confidence_profile(&atoms, now());
    assert_eq!(confidence_profile.dimensions.len(), 3);

    // Build the computed profile from the same quiz evidence.
    let inputs = ProfileInputs {
        quiz_dimension_scores: outcome
            .dimension_summary
            .iter()
            .map(|(dimension, score)| QuizDimensionScore {
                dimension: dimension.clone(),
                score: *score as f64,
            })
            .collect(),
        dimension_confidence: outcome.dimension_confidence.clone(),
        ..ProfileInputs::default()
    };
    let computed = build_computed_profile(&inputs);
    assert_eq!(computed.riasec_code.len(), 3);
    assert!(computed.riasec_code.starts_with('I'));

    // Single-atom dimensions stay well under target, so gaps and follow-up
    // actions must appear.
    let gaps = identify_gaps(&confidence_profile, DEFAULT_TARGET_CONFIDENCE);
    assert!(!gaps.is_empty());

    let state = AgentState {
        connected_sources: vec![],
        quiz_completed_modules: vec!["interests_core".to_string()],
        overall_confidence: confidence_profile.overall_confidence,
        confidence_profile: Some(confidence_profile),
        gaps,
        ..AgentState::default()
    };

    let actions = evaluate_state(&state);
    assert_eq!(actions[0].action, ActionType::RequestAdditionalData);
    assert_eq!(actions[0].priority, Priority::Critical);
    for pair in actions.windows(2) {
        assert!(pair[0].priority <= pair[1].priority);
    }

    // Re-planning from the identical snapshot reproduces the identical plan.
    assert_eq!(evaluate_state(&state), actions);
}

#[test]
fn five_runs_agree_on_the_riasec_code() {
    let inputs = ProfileInputs {
        quiz_dimension_scores: vec![
            QuizDimensionScore { dimension: "Realistic".into(), score: 42.0 },
            QuizDimensionScore { dimension: "Investigative".into(), score: 88.0 },
            QuizDimensionScore { dimension: "Artistic".into(), score: 61.0 },
            QuizDimensionScore { dimension: "Social".into(), score: 57.0 },
            QuizDimensionScore { dimension: "Enterprising".into(), score: 33.0 },
            QuizDimensionScore { dimension: "Conventional".into(), score: 49.0 },
        ],
        ..ProfileInputs::default()
    };

    let codes: Vec<String> = (0..5)
        .map(|_| build_computed_profile(&inputs).riasec_code)
        .collect();

    assert!(codes.iter().all(|code| code == &codes[0]));
    assert_eq!(codes[0], "IAS");
}
