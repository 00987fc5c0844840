//! JSON Output

use crate::report::BatchReport;

/// Serialize a report as a single line of JSON.
pub fn generate_json_line(report: &BatchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::{sample_meta, sample_outcome};
    use latchbench_core::Strategy;

    #[test]
    fn test_json_line_fields() {
        let outcome = sample_outcome(Strategy::Pooled { size: 15 }, 668_214);
        let line = generate_json_line(&BatchReport::new(&outcome, sample_meta())).unwrap();
        assert!(!line.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["strategy"], "pooled");
        assert_eq!(value["pool_size"], 15);
        assert_eq!(value["elapsed_ms"], 668_214);
        assert_eq!(value["meta"]["system"]["cpu_cores"], 16);
    }

    #[test]
    fn test_json_omits_pool_size_for_lightweight() {
        let outcome = sample_outcome(Strategy::Lightweight, 1_043);
        let line = generate_json_line(&BatchReport::new(&outcome, sample_meta())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(value.get("pool_size").is_none());
    }
}
