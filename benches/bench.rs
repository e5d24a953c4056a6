//! Criterion benchmarks for spamsift.
//!
//! Covers the hot paths of the pipeline:
//! - Text analysis
//! - Training (vocabulary fit plus Naive Bayes)
//! - Prediction
//! - Model artifact encoding and decoding

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use spamsift::analysis::analyzer::analyzer::Analyzer;
use spamsift::dataset::{Dataset, Label, Record};
use spamsift::evaluation::Evaluator;
use spamsift::store::ModelStore;
use spamsift::trainer::Trainer;
use spamsift::vectorizer::VectorizerConfig;
use std::hint::black_box;

const SPAM_WORDS: &[&str] = &[
    "free", "win", "prize", "claim", "urgent", "cash", "txt", "now", "offer", "call", "winner",
    "guaranteed", "reply", "stop", "mobile", "award",
];

const HAM_WORDS: &[&str] = &[
    "ok", "lunch", "later", "home", "see", "you", "tonight", "meet", "sorry", "call", "love",
    "dinner", "work", "now", "going", "tomorrow",
];

/// Generate a labeled corpus with a deterministic word mix.
fn generate_dataset(count: usize) -> Dataset {
    let records = (0..count)
        .map(|i| {
            let (label, words) = if i % 4 == 0 {
                (Label::Spam, SPAM_WORDS)
            } else {
                (Label::Ham, HAM_WORDS)
            };
            let length = 5 + (i % 20);
            let text: Vec<&str> = (0..length)
                .map(|j| words[(i * 7 + j * 13) % words.len()])
                .collect();
            Record::new(label, text.join(" "))
        })
        .collect();
    Dataset::from_records("bench", records)
}

fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");
    let analyzer = VectorizerConfig::default().build_analyzer().unwrap();
    let dataset = generate_dataset(100);

    group.throughput(Throughput::Elements(100));
    group.bench_function("analyze_batch_messages", |b| {
        b.iter(|| {
            for record in &dataset {
                let tokens: Vec<_> = analyzer.analyze(black_box(&record.text)).unwrap().collect();
                black_box(tokens);
            }
        })
    });

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(20);
    let dataset = generate_dataset(5000);
    let trainer = Trainer::default();

    group.throughput(Throughput::Elements(dataset.len() as u64));
    group.bench_function("fit_5000_messages", |b| {
        b.iter(|| black_box(trainer.fit(black_box(&dataset)).unwrap()))
    });

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");
    let dataset = generate_dataset(5000);
    let model = Trainer::default().fit(&dataset).unwrap();
    let test = generate_dataset(500);

    group.bench_function("predict_single_message", |b| {
        b.iter(|| black_box(model.predict(black_box("URGENT! claim your free prize now"))))
    });

    group.throughput(Throughput::Elements(test.len() as u64));
    group.bench_function("evaluate_500_messages", |b| {
        b.iter(|| black_box(Evaluator::evaluate(&model, black_box(&test)).unwrap()))
    });

    group.finish();
}

fn bench_model_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("model_store");
    let model = Trainer::default().fit(&generate_dataset(5000)).unwrap();
    let mut encoded = Vec::new();
    ModelStore::write(&model, &mut encoded).unwrap();

    group.bench_function("encode_model", |b| {
        b.iter(|| {
            let mut buffer = Vec::with_capacity(encoded.len());
            ModelStore::write(black_box(&model), &mut buffer).unwrap();
            black_box(buffer)
        })
    });

    group.bench_function("decode_model", |b| {
        b.iter(|| black_box(ModelStore::read(&mut black_box(encoded.as_slice())).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_text_analysis,
    bench_training,
    bench_prediction,
    bench_model_store
);
criterion_main!(benches);
