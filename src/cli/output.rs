//! Output formatting for CLI commands.

use serde::Serialize;

use crate::cli::args::{OutputFormat, SpamsiftArgs};
use crate::dataset::Label;
use crate::error::Result;
use crate::evaluation::EvaluationReport;
use crate::pipeline::ModelSource;

/// Types that have a plain-text rendering for human output.
pub trait HumanReadable {
    fn to_human(&self) -> String;
}

/// Result structure for training.
#[derive(Debug, Serialize)]
pub struct TrainResult {
    pub model_path: String,
    pub spam_records: usize,
    pub ham_records: usize,
    pub vocabulary_size: usize,
}

impl HumanReadable for TrainResult {
    fn to_human(&self) -> String {
        format!(
            "Model: {}\nTraining records: {} spam, {} ham\nVocabulary size: {}\n",
            self.model_path, self.spam_records, self.ham_records, self.vocabulary_size
        )
    }
}

/// One classified message.
#[derive(Debug, Serialize)]
pub struct PredictionResult {
    pub text: String,
    pub label: Label,
    pub spam_probability: f64,
    pub ham_probability: f64,
}

/// Result structure for prediction.
#[derive(Debug, Serialize)]
pub struct PredictionResults {
    pub model_source: ModelSource,
    pub predictions: Vec<PredictionResult>,
}

impl HumanReadable for PredictionResults {
    fn to_human(&self) -> String {
        let mut out = String::new();
        for p in &self.predictions {
            let confidence = p.spam_probability.max(p.ham_probability);
            out.push_str(&format!(
                "{}\t{:.4}\t{}\n",
                p.label.as_str().to_uppercase(),
                confidence,
                p.text
            ));
        }
        out
    }
}

/// Result structure for evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluationResult {
    pub model_source: ModelSource,
    #[serde(flatten)]
    pub report: EvaluationReport,
    #[serde(skip)]
    pub details: bool,
}

impl HumanReadable for EvaluationResult {
    fn to_human(&self) -> String {
        let mut out = self.report.to_string();
        if self.details {
            out.push_str(&self.report.class_details_string());
        }
        out
    }
}

/// Result structure for the default run.
///
/// The run reports through the log in human mode, so this only has a JSON
/// rendering.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub model_source: Option<ModelSource>,
    pub message: String,
    pub prediction: Option<Label>,
    pub evaluation: Option<EvaluationReport>,
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanReadable>(result: &T, args: &SpamsiftArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(result),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: HumanReadable>(result: &T) -> Result<()> {
    print!("{}", result.to_human());
    Ok(())
}

/// Output in JSON format.
pub fn output_json<T: Serialize>(result: &T, args: &SpamsiftArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
