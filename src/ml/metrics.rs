//! Evaluation metrics for classification models.

use super::{Classifier, TrainDataset};

#[derive(Debug, Clone)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f32,
    /// `TP / (TP + FN)`.
    pub recall: f32,
    /// Harmonic mean of precision and recall.
    pub f1: f32,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Run `model` over every row of `dataset` and tally the results.
pub fn evaluate<M: Classifier + ?Sized>(model: &M, dataset: &TrainDataset) -> ConfusionMatrix {
    let mut cm = ConfusionMatrix::new(dataset.classes.len());
    for (row, &truth) in dataset.x.iter().zip(dataset.y.iter()) {
        cm.add(truth, model.predict_class_index(row));
    }
    cm
}

/// Compute per-class precision, recall and F1 from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    let mut stats = Vec::with_capacity(k);
    for class_idx in 0..k {
        let tp = cm.get(class_idx, class_idx) as f32;
        let mut fp = 0f32;
        let mut fn_ = 0f32;
        let mut support = 0u32;
        for j in 0..k {
            let v = cm.get(class_idx, j);
            support = support.saturating_add(v);
            if j != class_idx {
                fn_ += v as f32;
            }
        }
        for i in 0..k {
            if i != class_idx {
                fp += cm.get(i, class_idx) as f32;
            }
        }
        let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
        let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        stats.push(PerClassStats {
            precision,
            recall,
            f1,
            support,
        });
    }
    stats
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f32 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes).map(|i| cm.get(i, i) as u64).sum();
    (correct as f32) / (total as f32)
}

/// Text table of per-class precision/recall/F1 followed by overall accuracy.
pub fn classification_report(cm: &ConfusionMatrix, classes: &[String]) -> String {
    let width = classes
        .iter()
        .map(String::len)
        .chain(std::iter::once("weighted avg".len()))
        .max()
        .unwrap_or(0);
    let stats = precision_recall_by_class(cm);
    let mut out = format!(
        "{:>width$}  {:>9} {:>9} {:>9} {:>9}\n\n",
        "", "precision", "recall", "f1-score", "support"
    );
    for (name, class) in classes.iter().zip(&stats) {
        out.push_str(&format!(
            "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
            name, class.precision, class.recall, class.f1, class.support
        ));
    }
    out.push_str(&format!(
        "\n{:>width$}  {:>9} {:>9} {:>9.2} {:>9}\n",
        "accuracy",
        "",
        "",
        accuracy(cm),
        cm.total()
    ));
    for (label, avg) in [
        ("macro avg", macro_average(&stats)),
        ("weighted avg", weighted_average(&stats)),
    ] {
        out.push_str(&format!(
            "{:>width$}  {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
            label,
            avg.precision,
            avg.recall,
            avg.f1,
            cm.total()
        ));
    }
    out
}

/// Unweighted mean of the per-class statistics.
pub fn macro_average(stats: &[PerClassStats]) -> PerClassStats {
    average_by(stats, |_| 1.0)
}

/// Per-class statistics averaged with each class weighted by its support.
pub fn weighted_average(stats: &[PerClassStats]) -> PerClassStats {
    average_by(stats, |class| class.support as f32)
}

fn average_by(stats: &[PerClassStats], weight: impl Fn(&PerClassStats) -> f32) -> PerClassStats {
    let total_weight: f32 = stats.iter().map(&weight).sum();
    let support = stats.iter().map(|class| class.support).sum();
    if total_weight == 0.0 {
        return PerClassStats {
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
            support,
        };
    }
    let mean = |field: fn(&PerClassStats) -> f32| {
        stats.iter().map(|class| weight(class) * field(class)).sum::<f32>() / total_weight
    };
    PerClassStats {
        precision: mean(|class| class.precision),
        recall: mean(|class| class.recall),
        f1: mean(|class| class.f1),
        support,
    }
}

/// Render the matrix with rows as truth and columns as predictions.
pub fn format_confusion_matrix(cm: &ConfusionMatrix) -> String {
    let mut out = String::new();
    for truth in 0..cm.n_classes {
        for pred in 0..cm.n_classes {
            out.push_str(&format!("{:6}", cm.get(truth, pred)));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> ConfusionMatrix {
        let mut cm = ConfusionMatrix::new(2);
        // 3 true positives for class 0, 1 miss, 1 false alarm.
        for _ in 0..3 {
            cm.add(0, 0);
        }
        cm.add(0, 1);
        cm.add(1, 0);
        cm.add(1, 1);
        cm.add(5, 0);
        cm
    }

    #[test]
    fn accuracy_counts_diagonal() {
        let cm = matrix();
        assert_eq!(cm.total(), 6);
        assert!((accuracy(&cm) - 4.0 / 6.0).abs() < 1e-6);
        assert_eq!(accuracy(&ConfusionMatrix::new(3)), 0.0);
    }

    #[test]
    fn per_class_stats_match_hand_computation() {
        let stats = precision_recall_by_class(&matrix());
        assert!((stats[0].precision - 0.75).abs() < 1e-6);
        assert!((stats[0].recall - 0.75).abs() < 1e-6);
        assert!((stats[0].f1 - 0.75).abs() < 1e-6);
        assert_eq!(stats[0].support, 4);
        assert!((stats[1].precision - 0.5).abs() < 1e-6);
        assert_eq!(stats[1].support, 2);
    }

    #[test]
    fn report_lists_every_class_and_accuracy() {
        let classes = vec!["Good".to_string(), "Moderate".to_string()];
        let report = classification_report(&matrix(), &classes);
        assert!(report.contains("precision"));
        assert!(report.lines().any(|l| l.trim_start().starts_with("Good")));
        assert!(report.lines().any(|l| l.trim_start().starts_with("Moderate")));
        let accuracy_line = report
            .lines()
            .find(|l| l.trim_start().starts_with("accuracy"))
            .unwrap();
        assert!(accuracy_line.contains("0.67"));
        assert!(accuracy_line.trim_end().ends_with('6'));
        let macro_line = report
            .lines()
            .find(|l| l.trim_start().starts_with("macro avg"))
            .unwrap();
        assert!(macro_line.contains("0.62"));
        assert!(report.lines().last().unwrap().trim_start().starts_with("weighted avg"));
    }

    #[test]
    fn averages_weight_classes_as_expected() {
        let stats = precision_recall_by_class(&matrix());
        let macro_avg = macro_average(&stats);
        assert!((macro_avg.precision - 0.625).abs() < 1e-6);
        assert!((macro_avg.recall - 0.625).abs() < 1e-6);
        assert_eq!(macro_avg.support, 6);
        let weighted = weighted_average(&stats);
        // (4 * 0.75 + 2 * 0.5) / 6
        assert!((weighted.recall - 4.0 / 6.0).abs() < 1e-6);
        assert!((weighted.precision - 4.0 / 6.0).abs() < 1e-6);
        assert_eq!(weighted_average(&[]).f1, 0.0);
    }

    #[test]
    fn confusion_matrix_renders_rows() {
        let text = format_confusion_matrix(&matrix());
        assert_eq!(text, "     3     1\n     1     1\n");
    }
}
