//! Evaluation of a fitted model on a labeled dataset.
//!
//! [`Evaluator`] accumulates one prediction at a time into a
//! [`ConfusionMatrix`] together with the error terms of the predicted class
//! distributions, and [`Evaluator::report`] turns the totals into an
//! [`EvaluationReport`]. Spam is the positive class wherever a metric needs
//! one.
//!
//! # Examples
//!
//! ```
//! use spamsift::dataset::{Dataset, Label, Record};
//! use spamsift::evaluation::Evaluator;
//! use spamsift::trainer::Trainer;
//!
//! let train = Dataset::from_records(
//!     "train",
//!     vec![
//!         Record::new(Label::Spam, "win money now"),
//!         Record::new(Label::Ham, "let's meet for lunch"),
//!     ],
//! );
//! let model = Trainer::default().fit(&train).unwrap();
//!
//! let report = Evaluator::evaluate(&model, &train).unwrap();
//! assert_eq!(report.correct, 2);
//! assert!(report.to_string().contains("=== Confusion Matrix ==="));
//! ```

use std::fmt;

use log::debug;
use serde::Serialize;

use crate::classifier::{ClassDistribution, Classifier};
use crate::dataset::{Dataset, Label};
use crate::error::{Result, SpamsiftError};
use crate::model::Model;

/// Counts of actual (rows) against predicted (columns) labels, indexed in
/// [`Label::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    counts: [[usize; Label::COUNT]; Label::COUNT],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one prediction.
    pub fn add(&mut self, actual: Label, predicted: Label) {
        self.counts[actual.index()][predicted.index()] += 1;
    }

    /// Records of class `actual` predicted as `predicted`.
    pub fn count(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    /// Records whose actual class is `label`.
    pub fn actual_total(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }

    /// Records predicted as `label`.
    pub fn predicted_total(&self, label: Label) -> usize {
        self.counts.iter().map(|row| row[label.index()]).sum()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Records on the diagonal.
    pub fn correct(&self) -> usize {
        Label::ALL.iter().map(|&l| self.count(l, l)).sum()
    }

    pub fn true_positives(&self) -> usize {
        self.count(Label::Spam, Label::Spam)
    }

    pub fn false_negatives(&self) -> usize {
        self.count(Label::Spam, Label::Ham)
    }

    pub fn false_positives(&self) -> usize {
        self.count(Label::Ham, Label::Spam)
    }

    pub fn true_negatives(&self) -> usize {
        self.count(Label::Ham, Label::Ham)
    }

    /// Cohen's kappa: agreement beyond what the marginals predict by chance.
    ///
    /// When chance agreement is already perfect the statistic is undefined;
    /// 1.0 is reported for a perfect result and 0.0 otherwise.
    pub fn kappa(&self) -> f64 {
        let total = self.total() as f64;
        if total == 0.0 {
            return 0.0;
        }
        let observed = self.correct() as f64 / total;
        let expected: f64 = Label::ALL
            .iter()
            .map(|&l| self.actual_total(l) as f64 * self.predicted_total(l) as f64)
            .sum::<f64>()
            / (total * total);

        if (1.0 - expected).abs() < f64::EPSILON {
            return if observed >= 1.0 { 1.0 } else { 0.0 };
        }
        (observed - expected) / (1.0 - expected)
    }

    /// Per-class rates treating `label` as the positive class.
    pub fn class_detail(&self, label: Label) -> ClassDetail {
        let tp = self.count(label, label) as f64;
        let fn_ = self.actual_total(label) as f64 - tp;
        let fp = self.predicted_total(label) as f64 - tp;
        let tn = self.total() as f64 - tp - fn_ - fp;

        let recall = ratio(tp, tp + fn_);
        let precision = ratio(tp, tp + fp);
        ClassDetail {
            label,
            tp_rate: recall,
            fp_rate: ratio(fp, fp + tn),
            precision,
            recall,
            f_measure: ratio(2.0 * precision * recall, precision + recall),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Detailed accuracy for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassDetail {
    pub label: Label,
    pub tp_rate: f64,
    pub fp_rate: f64,
    pub precision: f64,
    pub recall: f64,
    pub f_measure: f64,
}

/// Results of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Fraction of correctly classified records.
    pub accuracy: f64,
    pub kappa: f64,
    pub mean_absolute_error: f64,
    pub root_mean_squared_error: f64,
    pub confusion_matrix: ConfusionMatrix,
    pub class_details: Vec<ClassDetail>,
}

impl EvaluationReport {
    /// Correctly classified records as a percentage.
    pub fn accuracy_pct(&self) -> f64 {
        self.accuracy * 100.0
    }

    /// Incorrectly classified records as a percentage.
    pub fn error_pct(&self) -> f64 {
        ratio(self.incorrect as f64, self.total as f64) * 100.0
    }

    /// Summary statistics block.
    pub fn summary_string(&self) -> String {
        let mut out = String::from("\n");
        out.push_str(&format!(
            "{:<40}{:>8}{:>16.4} %\n",
            "Correctly Classified Instances",
            self.correct,
            self.accuracy_pct()
        ));
        out.push_str(&format!(
            "{:<40}{:>8}{:>16.4} %\n",
            "Incorrectly Classified Instances",
            self.incorrect,
            self.error_pct()
        ));
        out.push_str(&format!("{:<40}{:>10.4}\n", "Kappa statistic", self.kappa));
        out.push_str(&format!(
            "{:<40}{:>10.4}\n",
            "Mean absolute error", self.mean_absolute_error
        ));
        out.push_str(&format!(
            "{:<40}{:>10.4}\n",
            "Root mean squared error", self.root_mean_squared_error
        ));
        out.push_str(&format!("{:<40}{:>8}\n", "Total Number of Instances", self.total));
        out
    }

    /// The confusion matrix in its tab-separated text form.
    pub fn confusion_matrix_string(&self) -> String {
        let m = &self.confusion_matrix;
        format!(
            "\n=== Confusion Matrix ===\n\n\tspam\tham\t<-- classified as\nspam\t{}\t{}\nham\t{}\t{}\n",
            m.true_positives(),
            m.false_negatives(),
            m.false_positives(),
            m.true_negatives()
        )
    }

    /// Per-class rates as a table.
    pub fn class_details_string(&self) -> String {
        let mut out = String::from("\n=== Detailed Accuracy By Class ===\n\n");
        out.push_str("TP Rate\tFP Rate\tPrecision\tRecall\tF-Measure\tClass\n");
        for detail in &self.class_details {
            out.push_str(&format!(
                "{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{}\n",
                detail.tp_rate,
                detail.fp_rate,
                detail.precision,
                detail.recall,
                detail.f_measure,
                detail.label
            ));
        }
        out
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary_string())?;
        f.write_str(&self.confusion_matrix_string())
    }
}

/// Accumulates predictions into an [`EvaluationReport`].
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    matrix: ConfusionMatrix,
    absolute_error: f64,
    squared_error: f64,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `model` on every record of `dataset`.
    pub fn evaluate(model: &Model, dataset: &Dataset) -> Result<EvaluationReport> {
        if dataset.is_empty() {
            return Err(SpamsiftError::empty_dataset(dataset.name()));
        }

        let mut evaluator = Evaluator::new();
        for record in dataset {
            let features = model.vectorize(&record.text)?;
            let distribution = model.classifier().distribution(&features)?;
            evaluator.record(record.label, &distribution);
        }

        debug!("Evaluated {} records", dataset.len());
        evaluator.report()
    }

    /// Add one prediction, given as the full class distribution.
    pub fn record(&mut self, actual: Label, distribution: &ClassDistribution) {
        self.matrix.add(actual, distribution.label());

        let n = Label::COUNT as f64;
        let (mut abs, mut sq) = (0.0, 0.0);
        for label in Label::ALL {
            let target = if label == actual { 1.0 } else { 0.0 };
            let diff = distribution.probability(label) - target;
            abs += diff.abs();
            sq += diff * diff;
        }
        self.absolute_error += abs / n;
        self.squared_error += sq / n;
    }

    pub fn confusion_matrix(&self) -> &ConfusionMatrix {
        &self.matrix
    }

    /// Summarize everything recorded so far.
    pub fn report(&self) -> Result<EvaluationReport> {
        let total = self.matrix.total();
        if total == 0 {
            return Err(SpamsiftError::empty_dataset("no predictions recorded"));
        }
        let n = total as f64;
        let correct = self.matrix.correct();

        Ok(EvaluationReport {
            total,
            correct,
            incorrect: total - correct,
            accuracy: correct as f64 / n,
            kappa: self.matrix.kappa(),
            mean_absolute_error: self.absolute_error / n,
            root_mean_squared_error: (self.squared_error / n).sqrt(),
            confusion_matrix: self.matrix,
            class_details: Label::ALL
                .iter()
                .map(|&l| self.matrix.class_detail(l))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use crate::trainer::Trainer;

    fn two_row() -> Dataset {
        Dataset::from_records(
            "t",
            vec![
                Record::new(Label::Spam, "win money now"),
                Record::new(Label::Ham, "let's meet for lunch"),
            ],
        )
    }

    #[test]
    fn test_perfect_two_row_evaluation() {
        let dataset = two_row();
        let model = Trainer::default().fit(&dataset).unwrap();
        let report = Evaluator::evaluate(&model, &dataset).unwrap();

        let m = &report.confusion_matrix;
        assert_eq!(
            (m.true_positives(), m.false_negatives(), m.false_positives(), m.true_negatives()),
            (1, 0, 0, 1)
        );
        assert_eq!(report.accuracy, 1.0);
        assert_eq!(report.accuracy_pct(), 100.0);
        assert_eq!(report.kappa, 1.0);
        assert_eq!(
            report.confusion_matrix_string(),
            "\n=== Confusion Matrix ===\n\n\tspam\tham\t<-- classified as\nspam\t1\t0\nham\t0\t1\n"
        );
    }

    #[test]
    fn test_empty_dataset() {
        let model = Trainer::default().fit(&two_row()).unwrap();
        assert!(matches!(
            Evaluator::evaluate(&model, &Dataset::new("test")),
            Err(SpamsiftError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_matrix_metrics() {
        let mut matrix = ConfusionMatrix::new();
        // 3 spam: 2 caught, 1 missed; 5 ham: 1 flagged, 4 passed
        for (actual, predicted, times) in [
            (Label::Spam, Label::Spam, 2),
            (Label::Spam, Label::Ham, 1),
            (Label::Ham, Label::Spam, 1),
            (Label::Ham, Label::Ham, 4),
        ] {
            for _ in 0..times {
                matrix.add(actual, predicted);
            }
        }

        assert_eq!(matrix.total(), 8);
        assert_eq!(matrix.correct(), 6);

        // po = 6/8, pe = (3*3 + 5*5) / 64
        let expected = (0.75 - 34.0 / 64.0) / (1.0 - 34.0 / 64.0);
        assert!((matrix.kappa() - expected).abs() < 1e-12);

        let spam = matrix.class_detail(Label::Spam);
        assert!((spam.tp_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((spam.fp_rate - 1.0 / 5.0).abs() < 1e-12);
        assert!((spam.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((spam.f_measure - 2.0 / 3.0).abs() < 1e-12);

        let ham = matrix.class_detail(Label::Ham);
        assert!((ham.recall - 4.0 / 5.0).abs() < 1e-12);
        assert!((ham.precision - 4.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_errors_from_distributions() {
        let mut evaluator = Evaluator::new();
        evaluator.record(Label::Spam, &ClassDistribution::new([0.75, 0.25]));
        evaluator.record(Label::Ham, &ClassDistribution::new([0.75, 0.25]));
        let report = evaluator.report().unwrap();

        // per record: (0.25 + 0.25) / 2 and (0.75 + 0.75) / 2
        assert!((report.mean_absolute_error - 0.5).abs() < 1e-12);
        // per record: (0.0625 * 2) / 2 and (0.5625 * 2) / 2
        assert!((report.root_mean_squared_error - (0.3125f64).sqrt()).abs() < 1e-12);
        assert_eq!(report.correct, 1);
        assert_eq!(report.incorrect, 1);
    }

    #[test]
    fn test_single_class_kappa() {
        let mut evaluator = Evaluator::new();
        evaluator.record(Label::Ham, &ClassDistribution::new([0.1, 0.9]));
        assert_eq!(evaluator.report().unwrap().kappa, 1.0);
    }

    #[test]
    fn test_report_text_and_json() {
        let dataset = two_row();
        let model = Trainer::default().fit(&dataset).unwrap();
        let report = Evaluator::evaluate(&model, &dataset).unwrap();

        let text = report.to_string();
        assert!(text.contains("Correctly Classified Instances"));
        assert!(text.contains("Total Number of Instances"));
        assert!(text.ends_with("ham\t0\t1\n"));
        assert!(report.class_details_string().contains("spam"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["class_details"][0]["label"], "spam");
    }
}
