//! Read/write model input JSON (binning tables + estimator coefficients).

use std::fs::File;
use std::path::Path;

use crate::domain::ModelInput;
use crate::error::ScorecardError;

pub fn read_model_json(path: &Path) -> Result<ModelInput, ScorecardError> {
    let file = File::open(path)
        .map_err(|e| ScorecardError::io(format!("Failed to open model JSON '{}'", path.display()), e))?;
    serde_json::from_reader(file).map_err(|e| ScorecardError::input(format!("Invalid model JSON: {e}")))
}

pub fn write_model_json(path: &Path, input: &ModelInput) -> Result<(), ScorecardError> {
    let file = File::create(path)
        .map_err(|e| ScorecardError::io(format!("Failed to create model JSON '{}'", path.display()), e))?;
    serde_json::to_writer_pretty(file, input)
        .map_err(|e| ScorecardError::io("Failed to write model JSON", e.into()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::domain::{ModelInput, TargetKind};

    #[test]
    fn optional_fields_default_to_none() {
        let json = r#"{
            "target": "binary",
            "variables": [
                {"name": "age", "bins": [{"bin": "(-inf, 25.00)", "statistic": -0.4, "count": 120},
                                         {"bin": "[25.00, inf)", "statistic": 0.3}]}
            ]
        }"#;
        let input: ModelInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.target, TargetKind::Binary);
        assert_eq!(input.intercept, None);
        assert_eq!(input.coefficients, None);
        assert_eq!(input.variables[0].bins[0].count, Some(120));
        assert_eq!(input.variables[0].bins[1].count, None);
    }

    #[test]
    fn unknown_target_is_rejected() {
        let json = r#"{"target": "multiclass", "variables": []}"#;
        assert!(serde_json::from_str::<ModelInput>(json).is_err());
    }
}
