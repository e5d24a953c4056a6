//! Command implementations for the spamsift CLI.

use log::{info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PipelineConfig;
use crate::dataset::Label;
use crate::error::Result;
use crate::pipeline::Pipeline;

/// Execute a CLI command.
///
/// With no subcommand this performs the default run.
pub fn execute_command(args: SpamsiftArgs) -> Result<()> {
    let command = args.command.clone().unwrap_or_default();
    let config = load_config(&args, &command)?;

    match &command {
        Command::Run(_) => run(config, &args),
        Command::Train(_) => train(config, &args),
        Command::Predict(predict_args) => predict(config, predict_args, &args),
        Command::Evaluate(evaluate_args) => evaluate(config, evaluate_args, &args),
    }
}

/// Read the configuration file, if any, and apply the command's path flags.
fn load_config(args: &SpamsiftArgs, command: &Command) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    command.apply_overrides(&mut config);
    Ok(config)
}

fn label_name(label: Label) -> String {
    label.as_str().to_uppercase()
}

/// Load or train the model, classify the sample message and evaluate.
///
/// Failures past configuration are logged and the run carries on with
/// whatever is still possible.
fn run(config: PipelineConfig, args: &SpamsiftArgs) -> Result<()> {
    let message = config.sample_message.clone();
    let mut pipeline = Pipeline::new(config);

    let model_source = match pipeline.load_or_train() {
        Ok(source) => Some(source),
        Err(e) => {
            warn!("Error preparing model: {e}");
            None
        }
    };

    let prediction = match pipeline.predict(&message) {
        Ok(label) => {
            info!("Message: {}, Prediction: {}", message, label_name(label));
            Some(label)
        }
        Err(e) => {
            warn!("Error classifying message: {e}");
            None
        }
    };

    let evaluation = match pipeline.evaluate() {
        Ok(report) => {
            info!("Evaluation: {report}");
            Some(report)
        }
        Err(e) => {
            warn!("Error evaluating: {e}");
            None
        }
    };

    if args.output_format == OutputFormat::Json {
        output_json(
            &RunResult {
                model_source,
                message,
                prediction,
                evaluation,
            },
            args,
        )?;
    }
    Ok(())
}

/// Train a new model from the training data and save it.
fn train(config: PipelineConfig, args: &SpamsiftArgs) -> Result<()> {
    let mut pipeline = Pipeline::new(config);
    pipeline.train()?;
    pipeline.save_model()?;

    let Some(model) = pipeline.model() else {
        return Ok(());
    };
    let [spam_records, ham_records] = model.classifier().class_counts();
    output_result(
        &TrainResult {
            model_path: pipeline.config().model_path.display().to_string(),
            spam_records,
            ham_records,
            vocabulary_size: model.vectorizer().vocabulary_size(),
        },
        args,
    )
}

/// Classify each message given on the command line.
fn predict(config: PipelineConfig, predict_args: &PredictArgs, args: &SpamsiftArgs) -> Result<()> {
    let mut pipeline = Pipeline::new(config);
    let model_source = pipeline.load_or_train()?;

    let mut predictions = Vec::with_capacity(predict_args.texts.len());
    for text in &predict_args.texts {
        let prediction = pipeline.classify(text)?;
        info!("Message: {}, Prediction: {}", text, label_name(prediction.label));
        predictions.push(PredictionResult {
            text: text.clone(),
            label: prediction.label,
            spam_probability: prediction.distribution.probability(Label::Spam),
            ham_probability: prediction.distribution.probability(Label::Ham),
        });
    }

    output_result(
        &PredictionResults {
            model_source,
            predictions,
        },
        args,
    )
}

/// Evaluate the model on the test set.
fn evaluate(
    config: PipelineConfig,
    evaluate_args: &EvaluateArgs,
    args: &SpamsiftArgs,
) -> Result<()> {
    let mut pipeline = Pipeline::new(config);
    let model_source = pipeline.load_or_train()?;
    let report = pipeline.evaluate()?;

    output_result(
        &EvaluationResult {
            model_source,
            report,
            details: evaluate_args.details,
        },
        args,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn write_data(dir: &std::path::Path) {
        fs::write(
            dir.join("train.txt"),
            "spam win money now\nham let's meet for lunch\n",
        )
        .unwrap();
        fs::write(dir.join("test.txt"), "spam win a prize\nham lunch at noon\n").unwrap();
    }

    fn args(dir: &std::path::Path, extra: &[&str]) -> SpamsiftArgs {
        let config = serde_json::json!({
            "train_data": dir.join("train.txt"),
            "train_cache": dir.join("train.arff"),
            "test_data": dir.join("test.txt"),
            "test_cache": dir.join("test.arff"),
            "model_path": dir.join("models").join("sms.dat"),
        });
        let config_path = dir.join("config.json");
        fs::write(&config_path, config.to_string()).unwrap();

        let mut argv = vec![
            "spamsift".to_string(),
            "-q".to_string(),
            "-c".to_string(),
            config_path.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        SpamsiftArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_train_then_predict() {
        let dir = tempdir().unwrap();
        write_data(dir.path());

        execute_command(args(dir.path(), &["train"])).unwrap();
        assert!(dir.path().join("models").join("sms.dat").exists());
        assert!(dir.path().join("train.arff").exists());

        execute_command(args(dir.path(), &["predict", "win money"])).unwrap();
        execute_command(args(dir.path(), &["evaluate", "--details"])).unwrap();
    }

    #[test]
    fn test_run_without_data_does_not_fail() {
        let dir = tempdir().unwrap();
        execute_command(args(dir.path(), &[])).unwrap();
        execute_command(args(dir.path(), &["-f", "json", "run"])).unwrap();
    }

    #[test]
    fn test_predict_without_data_fails() {
        let dir = tempdir().unwrap();
        assert!(execute_command(args(dir.path(), &["predict", "hello"])).is_err());
    }

    #[test]
    fn test_missing_config_is_fatal() {
        let dir = tempdir().unwrap();
        let parsed = SpamsiftArgs::try_parse_from([
            "spamsift",
            "-c",
            dir.path().join("absent.json").to_str().unwrap(),
        ])
        .unwrap();
        assert!(execute_command(parsed).unwrap_err().is_io());
    }
}
