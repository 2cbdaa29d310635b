//! Metrics report handed to reporting collaborators.

use crate::eval::{ClassificationScores, SegmentationScores};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final corpus report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Boundary metrics and corpus counts.
    pub segmentation: SegmentationScores,
    /// Ranking and classification metrics, when class scores were supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationScores>,
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seg = &self.segmentation;
        writeln!(f, "Segmentation")?;
        writeln!(f, "  documents            {}", seg.documents)?;
        writeln!(f, "  sentences            {}", seg.sentences)?;
        writeln!(f, "  expected segments    {}", seg.expected_segments)?;
        writeln!(f, "  predicted segments   {}", seg.predicted_segments)?;
        match seg.window_size {
            Some(k) => writeln!(f, "  window size          {}", k)?,
            None => writeln!(f, "  window size          per document")?,
        }
        writeln!(f, "  Pk                   {:.4}", seg.pk)?;
        writeln!(f, "  WindowDiff           {:.4}", seg.window_diff)?;
        writeln!(
            f,
            "  boundary P/R/F1      {:.4} / {:.4} / {:.4}",
            seg.boundary_precision, seg.boundary_recall, seg.boundary_f1
        )?;

        if let Some(cls) = &self.classification {
            writeln!(f)?;
            writeln!(f, "Classification ({} examples)", cls.examples)?;
            writeln!(f, "  MAP                  {:.4}", cls.map)?;
            writeln!(f, "  MRR                  {:.4}", cls.mrr)?;
            writeln!(f, "  P@1 / P@{:<2}          {:.4} / {:.4}", cls.k, cls.precision_at_1, cls.precision_at_k)?;
            writeln!(f, "  R@1 / R@{:<2}          {:.4} / {:.4}", cls.k, cls.recall_at_1, cls.recall_at_k)?;
            writeln!(f, "  Acc@1 / Acc@{:<2}      {:.4} / {:.4}", cls.k, cls.accuracy_at_1, cls.accuracy_at_k)?;
            writeln!(
                f,
                "  micro P/R/F1         {:.4} / {:.4} / {:.4}",
                cls.micro_precision, cls.micro_recall, cls.micro_f1
            )?;
            writeln!(
                f,
                "  macro P/R/F1         {:.4} / {:.4} / {:.4}",
                cls.macro_precision, cls.macro_recall, cls.macro_f1
            )?;
            writeln!(f, "  per class")?;
            for class in &cls.per_class {
                let name = class
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("#{}", class.class));
                writeln!(
                    f,
                    "    {:<20} P {:.4}  R {:.4}  F1 {:.4}  (tp {}, fp {}, fn {})",
                    name,
                    class.precision,
                    class.recall,
                    class.f1,
                    class.counts.tp,
                    class.counts.fp,
                    class.counts.fn_
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_classification() {
        let report = EvaluationReport::default();
        let text = report.to_string();
        assert!(text.contains("WindowDiff"));
        assert!(!text.contains("Classification"));
    }

    #[test]
    fn test_json_skips_missing_classification() {
        let json = serde_json::to_string(&EvaluationReport::default()).unwrap();
        assert!(json.contains("\"segmentation\""));
        assert!(!json.contains("classification"));
    }
}
