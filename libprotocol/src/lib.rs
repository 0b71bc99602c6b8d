mod protocol_error;
mod semantic_validator;
mod wire;

pub use crate::protocol_error::{JsonError, ProtocolError, ValidationError, ValidationErrors};
pub use crate::semantic_validator::{Rule, Validator};
pub use crate::wire::{LoadTestRequest, SampleBatch};

use crate::semantic_validator::{QpsRule, TargetUrlRule, WebProtocolRule};

pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Input-boundary validation for a submitted test request. Everything past
/// this point assumes a well-formed url and a qps of at least 1.
pub fn validate(request: &LoadTestRequest) -> Result<()> {
    let validator = Validator::new()
        .with_rule(TargetUrlRule::new())
        .with_rule(WebProtocolRule::new())
        .with_rule(QpsRule::new());

    let mut errors: Vec<ValidationError> = Vec::new();
    validator.validate(request, &mut errors);

    if !errors.is_empty() {
        return Err(ValidationErrors { items: errors }.into());
    }

    Ok(())
}

/// Decodes one `POST /loadtest` response body.
pub fn parse_batch(body: &str) -> Result<SampleBatch> {
    let batch: SampleBatch = serde_json::from_str(body).map_err(|e| JsonError {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;
    Ok(batch)
}
