//! Integration tests for the train / save / load / predict / evaluate workflow.

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};

use spamsift::dataset::cache::load_arff;
use spamsift::prelude::*;
use spamsift::store::ModelStore;
use tempfile::TempDir;

const TRAIN: &str = "\
spam\tWINNER!! You have been selected to receive a cash prize. Call now
ham\tOk lar... Joking wif u oni...
spam\tFree entry in a weekly competition to win FA Cup final tickets, txt now
ham\tI'm gonna be home soon and i don't want to talk about this stuff anymore tonight
ham\tEven my brother is not like to speak with me
spam\tURGENT! Your mobile number has been awarded a prize. Claim now
ham\tAre we still meeting for lunch tomorrow?
not-a-label\tthis row is skipped
ham
";

const TEST: &str = "\
spam\tClaim your free cash prize now
ham\tSee you at home tonight, joking aside
spam\tTxt WIN to enter the weekly competition
ham\tLunch with my brother tomorrow
";

const TEXTS: &[&str] = &[
    "Claim your prize now",
    "are we meeting tonight",
    "completely unknown words here",
    "FREE CASH",
];

fn pipeline_config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        train_data: dir.join("dataset").join("train.txt"),
        train_cache: dir.join("dataset").join("train.arff"),
        test_data: dir.join("dataset").join("test.txt"),
        test_cache: dir.join("dataset").join("test.arff"),
        model_path: dir.join("models").join("sms.dat"),
        ..PipelineConfig::default()
    }
}

fn setup() -> (TempDir, PipelineConfig) {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("dataset")).unwrap();
    fs::write(dir.path().join("dataset").join("train.txt"), TRAIN).unwrap();
    fs::write(dir.path().join("dataset").join("test.txt"), TEST).unwrap();
    let config = pipeline_config(dir.path());
    (dir, config)
}

#[test]
fn test_load_or_train_trains_then_loads() -> Result<()> {
    let (_dir, config) = setup();

    let mut first = Pipeline::new(config.clone());
    assert_eq!(first.load_or_train()?, ModelSource::Trained);
    assert!(config.model_path.exists());
    assert!(config.train_cache.exists());

    let mut second = Pipeline::new(config);
    assert_eq!(second.load_or_train()?, ModelSource::Loaded);

    for text in TEXTS {
        assert_eq!(first.classify(text)?, second.classify(text)?);
    }
    Ok(())
}

#[test]
fn test_training_cache_contents() -> Result<()> {
    let (_dir, config) = setup();
    let mut pipeline = Pipeline::new(config.clone());
    pipeline.train()?;

    let cached = load_arff(&config.train_cache)?;
    assert_eq!(cached.len(), 7);
    assert!(cached.iter().all(|r| !r.text.is_empty()));
    assert_eq!(
        cached.records()[3].text,
        "I'm gonna be home soon and i don't want to talk about this stuff anymore tonight"
    );
    assert_eq!(pipeline.model().unwrap().classifier().class_counts(), [3, 4]);
    Ok(())
}

#[test]
fn test_save_load_round_trip_fidelity() -> Result<()> {
    let (dir, config) = setup();
    let mut pipeline = Pipeline::new(config);
    pipeline.train()?;

    let other_path = dir.path().join("elsewhere").join("copy.dat");
    pipeline.save_model_to(&other_path)?;

    let mut restored = Pipeline::default();
    restored.load_model_from(&other_path)?;

    for text in TEXTS {
        assert_eq!(pipeline.predict(text)?, restored.predict(text)?);
    }
    assert_eq!(pipeline.evaluate()?, {
        let test = Dataset::load_raw(dir.path().join("dataset").join("test.txt"))?;
        restored.evaluate_on(&test)?
    });
    Ok(())
}

#[test]
fn test_evaluation_report() -> Result<()> {
    let (_dir, config) = setup();
    let mut pipeline = Pipeline::new(config.clone());
    pipeline.train()?;

    let report = pipeline.evaluate()?;
    let matrix = &report.confusion_matrix;
    assert_eq!(report.total, 4);
    assert_eq!(matrix.total(), 4);
    assert_eq!(
        matrix.true_positives()
            + matrix.false_negatives()
            + matrix.false_positives()
            + matrix.true_negatives(),
        4
    );
    assert_eq!(report.correct + report.incorrect, report.total);
    assert!(config.test_cache.exists());

    let text = report.to_string();
    assert!(text.contains("\n=== Confusion Matrix ===\n\n\tspam\tham\t<-- classified as\n"));
    Ok(())
}

#[test]
fn test_runs_are_deterministic() -> Result<()> {
    let (_dir, config) = setup();

    let mut a = Pipeline::new(config.clone());
    a.train()?;
    let mut b = Pipeline::new(config);
    b.train()?;

    assert_eq!(a.evaluate()?.confusion_matrix, b.evaluate()?.confusion_matrix);
    for text in TEXTS {
        assert_eq!(a.predict(text)?, b.predict(text)?);
    }
    Ok(())
}

#[test]
fn test_corrupt_artifact_falls_back_to_training() -> Result<()> {
    let (_dir, config) = setup();
    fs::create_dir_all(config.model_path.parent().unwrap()).unwrap();
    fs::write(&config.model_path, b"definitely not a model").unwrap();

    let mut pipeline = Pipeline::new(config.clone());
    assert_eq!(pipeline.load_or_train()?, ModelSource::Trained);

    // The bad artifact was replaced by a loadable one.
    assert!(ModelStore::load(&config.model_path).is_ok());
    Ok(())
}

#[test]
fn test_oversized_length_field_falls_back_to_training() -> Result<()> {
    let (_dir, config) = setup();
    let mut artifact = Vec::new();
    artifact.extend_from_slice(spamsift::store::MAGIC);
    artifact.extend_from_slice(&spamsift::store::FORMAT_VERSION.to_le_bytes());
    artifact.push(1);
    artifact.extend_from_slice(&(1u64 << 40).to_le_bytes());
    artifact.extend_from_slice(br"\W+");
    fs::create_dir_all(config.model_path.parent().unwrap()).unwrap();
    fs::write(&config.model_path, &artifact).unwrap();

    let mut pipeline = Pipeline::new(config.clone());
    assert_eq!(pipeline.load_or_train()?, ModelSource::Trained);
    assert!(ModelStore::load(&config.model_path).is_ok());
    Ok(())
}

#[test]
fn test_training_data_with_invalid_utf8() -> Result<()> {
    let (_dir, config) = setup();
    let mut raw = TRAIN.as_bytes().to_vec();
    raw.extend_from_slice(b"ham caf\xe9 later\n");
    fs::write(&config.train_data, &raw).unwrap();

    let mut pipeline = Pipeline::new(config);
    pipeline.train()?;
    assert_eq!(pipeline.model().unwrap().classifier().class_counts(), [3, 5]);
    Ok(())
}

#[test]
fn test_garbled_test_cache_is_rebuilt() -> Result<()> {
    let (_dir, config) = setup();
    fs::write(&config.test_cache, "garbage").unwrap();
    File::options()
        .write(true)
        .open(&config.test_cache)
        .unwrap()
        .set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let mut pipeline = Pipeline::new(config.clone());
    pipeline.train()?;
    assert_eq!(pipeline.evaluate()?.total, 4);
    assert_eq!(load_arff(&config.test_cache)?.len(), 4);
    Ok(())
}

#[test]
fn test_missing_training_data() {
    let dir = TempDir::new().unwrap();
    let mut pipeline = Pipeline::new(pipeline_config(dir.path()));

    let err = pipeline.load_or_train().unwrap_err();
    assert!(err.is_io());
    assert!(!pipeline.is_fitted());
    assert!(pipeline.predict("hello").unwrap_err().is_not_fitted());
}

#[test]
fn test_empty_input_is_rejected() -> Result<()> {
    let (_dir, config) = setup();
    let mut pipeline = Pipeline::new(config);
    pipeline.train()?;

    assert!(matches!(pipeline.predict(""), Err(SpamsiftError::EmptyInput)));
    assert!(matches!(pipeline.predict("   "), Err(SpamsiftError::EmptyInput)));
    Ok(())
}

#[test]
fn test_memorized_training_examples() -> Result<()> {
    let train = Dataset::from_records(
        "train",
        vec![
            Record::new(Label::Spam, "win money now"),
            Record::new(Label::Ham, "let's meet for lunch"),
        ],
    );
    let mut pipeline = Pipeline::default();
    pipeline.train_on(&train)?;

    assert_eq!(pipeline.predict("win money now")?, Label::Spam);
    assert_eq!(pipeline.predict("let's meet for lunch")?, Label::Ham);

    let report = pipeline.evaluate_on(&train)?;
    let m = &report.confusion_matrix;
    assert_eq!(
        (
            m.true_positives(),
            m.false_negatives(),
            m.false_positives(),
            m.true_negatives()
        ),
        (1, 0, 0, 1)
    );
    assert_eq!(report.accuracy_pct(), 100.0);
    Ok(())
}
