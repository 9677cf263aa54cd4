use async_trait::async_trait;
use rank_insights::SubmissionRecord;
use rank_insights::analyzers::types::Trend;
use rank_insights::analyzers::{
    CollegePrediction, RankFeatures, TierTable, analyze, fit_rank_model, generate_insights,
    predict_college, predict_rank,
};
use rank_insights::source::{JsonSource, SubmissionSource, parse_history, parse_submission};

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_full_pipeline() {
    let history = parse_history(include_bytes!("fixtures/historical_data.json"))
        .expect("Failed to parse history");
    let current = parse_submission(include_bytes!("fixtures/submission_data.json"))
        .expect("Failed to parse submission")
        .expect("Submission missing");

    let analysis = analyze(&history);
    assert_eq!(analysis.total_quizzes, 5);
    assert_eq!(analysis.total_score, 260);
    assert_eq!(analysis.total_rank, 1365);
    assert_eq!(analysis.total_mistakes_corrected, 23);
    assert_eq!(analysis.total_final_score, 247.0);
    assert_eq!(analysis.total_negative_score, 13.0);
    assert_eq!(analysis.accuracy_trends.len(), 5);
    // the untitled practice quiz has no topic
    assert_eq!(analysis.topic_performance.len(), 2);

    let insights = generate_insights(&analysis).unwrap();
    assert_eq!(insights.trend, Trend::Improved);
    assert!((insights.overall.average_accuracy - 0.64).abs() < 1e-12);
    assert_eq!(insights.overall.average_score, 52.0);
    assert_eq!(insights.overall.average_rank, 273.0);
    assert_eq!(insights.weak_areas.len(), 1);
    let weak = &insights.weak_areas["Body Fluids and Circulation"];
    assert_eq!(weak.correct_answers, 16);
    assert_eq!(weak.total_questions, 40);
    assert_eq!(weak.accuracy, 0.4);
    assert_eq!(weak.mistakes, 24);

    let json = serde_json::to_value(&insights).unwrap();
    assert_eq!(json["Overall Performance"]["Average Accuracy"], "64.00%");

    let model = fit_rank_model(&history).unwrap();
    let predicted = predict_rank(&RankFeatures::from_record(&current).to_array(), &model).unwrap();
    assert!((predicted - 335.0).abs() < 0.5, "predicted {predicted}");

    // a training row is reproduced by the fit
    let replay = predict_rank(&RankFeatures::from_record(&history[1]).to_array(), &model).unwrap();
    assert!((replay - 410.0).abs() < 0.5, "replayed {replay}");

    assert_eq!(
        predict_college(predicted, &TierTable::default()),
        CollegePrediction::Matched("College A".to_string())
    );
}

#[test]
fn test_empty_history_pipeline() {
    let history = parse_history(b"[]").unwrap();

    let analysis = analyze(&history);
    assert_eq!(analysis.total_quizzes, 0);
    assert!(generate_insights(&analysis).is_err());
    assert!(fit_rank_model(&history).is_err());
}

#[tokio::test]
async fn test_json_source_reads_fixtures() {
    let source = JsonSource::new(
        fixture("historical_data.json"),
        fixture("submission_data.json"),
    )
    .unwrap();

    let history = source.history().await.unwrap();
    let current = source.current().await.unwrap().unwrap();

    assert_eq!(history.len(), 5);
    assert_eq!(history[0].accuracy(), 0.45);
    assert_eq!(current.topic(), Some("Plant Kingdom"));
}

struct InMemorySource {
    history: Vec<SubmissionRecord>,
}

#[async_trait]
impl SubmissionSource for InMemorySource {
    async fn history(&self) -> anyhow::Result<Vec<SubmissionRecord>> {
        Ok(self.history.clone())
    }

    async fn current(&self) -> anyhow::Result<Option<SubmissionRecord>> {
        Ok(self.history.last().cloned())
    }
}

#[tokio::test]
async fn test_injected_source() {
    let source = InMemorySource {
        history: parse_history(include_bytes!("fixtures/historical_data.json")).unwrap(),
    };

    let history = source.history().await.unwrap();
    let current = source.current().await.unwrap().unwrap();
    let model = fit_rank_model(&history).unwrap();
    let predicted = predict_rank(&RankFeatures::from_record(&current).to_array(), &model).unwrap();

    assert!((predicted - current.better_than() as f64).abs() < 0.5);
}
