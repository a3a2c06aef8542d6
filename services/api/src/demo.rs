use chrono::Utc;
use clap::Args;
use std::sync::Arc;
use talentscope::assessment::domain::SourceType;
use talentscope::assessment::scoring::{QuestionKind, UnavailableTextService};
use talentscope::assessment::{
    build_computed_profile, build_confidence_profile, evaluate_state, identify_gaps, AgentState,
    AnswerValue, ConfidenceProfile, ConfidenceSource, ProfileInputs, QuizAnswer,
    QuizDimensionScore, QuizQuestion, QuizScorer, SessionInsight, TalentSignal,
    DEFAULT_TARGET_CONFIDENCE,
};
use talentscope::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the confidence target used for gap analysis (default 60).
    #[arg(long)]
    pub(crate) target_confidence: Option<u8>,
    /// Include the raw evidence atoms behind each dimension in the output.
    #[arg(long)]
    pub(crate) list_evidence: bool,
    /// Skip the action-planning portion of the demo.
    #[arg(long)]
    pub(crate) skip_plan: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        target_confidence,
        list_evidence,
        skip_plan,
    } = args;

    let target = target_confidence.unwrap_or(DEFAULT_TARGET_CONFIDENCE);
    let now = Utc::now();

    println!("Assessment engine demo");

    // Free-text grading degrades to the neutral fallback in the demo; no
    // network calls are made.
    let scorer = QuizScorer::new(Arc::new(UnavailableTextService));
    let outcome = scorer.score_submission(&demo_questions(), &demo_answers())?;

    println!("\nQuiz scoring ({} answers scored)", outcome.scores.len());
    for (dimension, score) in &outcome.dimension_summary {
        let confidence = outcome.dimension_confidence.get(dimension).copied().unwrap_or(0);
        println!("- {}: score {} | confidence {}", dimension, score, confidence);
    }

    let evidence = demo_evidence(&outcome.dimension_summary, now);
    let profile = build_confidence_profile(&evidence, now);
    render_confidence_profile(&profile, list_evidence);

    let gaps = identify_gaps(&profile, target);
    if gaps.is_empty() {
        println!("\nConfidence gaps: none below target {}", target);
    } else {
        println!("\nConfidence gaps (target {})", target);
        for gap in &gaps {
            let missing: Vec<&str> = gap
                .missing_source_types
                .iter()
                .map(|source| source.label())
                .collect();
            println!(
                "- {}: {} -> {} (importance {:.1}, missing: {})",
                gap.dimension,
                gap.current_confidence,
                gap.target_confidence,
                gap.importance,
                if missing.is_empty() {
                    "none".to_string()
                } else {
                    missing.join(", ")
                }
            );
        }
    }

    let inputs = demo_profile_inputs(&outcome.dimension_summary, &outcome.dimension_confidence);
    let computed = build_computed_profile(&inputs);
    println!("\nComputed profile");
    println!("- Aptitude code: {}", computed.riasec_code);
    for (dimension, score) in &computed.dimension_scores {
        let confidence = computed.confidence_scores.get(dimension).copied().unwrap_or(0);
        println!("  - {}: {} (confidence {})", dimension, score, confidence);
    }

    if skip_plan {
        return Ok(());
    }

    let state = AgentState {
        connected_sources: vec!["resume".to_string()],
        quiz_completed_modules: vec!["interests_core".to_string()],
        session_completed: false,
        session_insights_count: 0,
        overall_confidence: profile.overall_confidence,
        confidence_profile: Some(profile),
        gaps,
        report_generated: false,
        ..AgentState::default()
    };

    let actions = evaluate_state(&state);
    println!("\nRecommended next steps");
    for action in &actions {
        println!(
            "- [{}] {} (+{} confidence): {}",
            action.priority.label(),
            action.action.label(),
            action.confidence_impact,
            action.reason
        );
    }

    Ok(())
}

fn render_confidence_profile(profile: &ConfidenceProfile, list_evidence: bool) {
    println!(
        "\nConfidence profile (overall {})",
        profile.overall_confidence
    );
    for (dimension, entry) in &profile.dimensions {
        let types: Vec<&str> = entry
            .source_types
            .iter()
            .map(|source| source.label())
            .collect();
        println!(
            "- {}: {} ({} sources: {})",
            dimension,
            entry.confidence,
            entry.source_count,
            types.join(", ")
        );
        if list_evidence {
            for source in &entry.sources {
                println!(
                    "    - [{}] score {}: {}",
                    source.source_type.label(),
                    source.score,
                    source.evidence
                );
            }
        }
    }
}

fn demo_questions() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion {
            id: "q1".to_string(),
            kind: QuestionKind::MultipleChoice,
            prompt: "Which weekend project sounds most appealing?".to_string(),
            dimension: "Investigative".to_string(),
            scoring_rubric: [
                ("Build a data model of my reading habits".to_string(), 90),
                ("Repaint the spare room".to_string(), 40),
                ("Host a dinner party".to_string(), 25),
            ]
            .into_iter()
            .collect(),
            options: vec![
                "Build a data model of my reading habits".to_string(),
                "Repaint the spare room".to_string(),
                "Host a dinner party".to_string(),
            ],
            slider_min: None,
            slider_max: None,
        },
        QuizQuestion {
            id: "q2".to_string(),
            kind: QuestionKind::Slider,
            prompt: "How energized do you feel leading a group discussion?".to_string(),
            dimension: "leadership".to_string(),
            scoring_rubric: Default::default(),
            options: Vec::new(),
            slider_min: Some(0.0),
            slider_max: Some(10.0),
        },
        QuizQuestion {
            id: "q3".to_string(),
            kind: QuestionKind::Freetext,
            prompt: "Describe a problem you solved that you are proud of.".to_string(),
            dimension: "analytical_thinking".to_string(),
            scoring_rubric: Default::default(),
            options: Vec::new(),
            slider_min: None,
            slider_max: None,
        },
    ]
}

fn demo_answers() -> Vec<QuizAnswer> {
    vec![
        QuizAnswer {
            question_id: "q1".to_string(),
            answer: AnswerValue::Text("Build a data model of my reading habits".to_string()),
        },
        QuizAnswer {
            question_id: "q2".to_string(),
            answer: AnswerValue::Number(7.0),
        },
        QuizAnswer {
            question_id: "q3".to_string(),
            answer: AnswerValue::Text(
                "I untangled our team's duplicated invoicing data by tracing each record \
                 back to its source system and writing a reconciliation script."
                    .to_string(),
            ),
        },
    ]
}

fn demo_evidence(
    quiz_summary: &std::collections::BTreeMap<String, u8>,
    now: chrono::DateTime<Utc>,
) -> Vec<ConfidenceSource> {
    let mut atoms: Vec<ConfidenceSource> = quiz_summary
        .iter()
        .map(|(dimension, score)| {
            ConfidenceSource::new(
                SourceType::Quiz,
                dimension.clone(),
                *score,
                "interests_core module answer",
                now,
            )
        })
        .collect();

    atoms.push(
        ConfidenceSource::new(
            SourceType::DataSource,
            "analytical_thinking",
            74,
            "resume: four years in data engineering roles",
            now,
        )
        .with_origin("resume"),
    );
    atoms.push(
        ConfidenceSource::new(
            SourceType::DataSource,
            "Investigative",
            78,
            "resume: self-directed research projects listed",
            now,
        )
        .with_origin("resume"),
    );

    atoms
}

fn demo_profile_inputs(
    quiz_summary: &std::collections::BTreeMap<String, u8>,
    quiz_confidence: &std::collections::BTreeMap<String, u8>,
) -> ProfileInputs {
    ProfileInputs {
        quiz_dimension_scores: quiz_summary
            .iter()
            .map(|(dimension, score)| QuizDimensionScore {
                dimension: dimension.clone(),
                score: *score as f64,
            })
            .collect(),
        signals: vec![TalentSignal {
            label: "systems thinking".to_string(),
            dimensions: vec!["Investigative".to_string(), "analytical_thinking".to_string()],
            confidence: 0.8,
        }],
        session_insights: vec![SessionInsight {
            category: "reflection_depth".to_string(),
            confidence: 0.7,
            summary: "Connected past decisions to stated values without prompting".to_string(),
        }],
        constraints: None,
        dimension_confidence: quiz_confidence.clone(),
    }
}
