use crate::{LoadTestRequest, ValidationError};

pub struct Validator {
    rules: Vec<Box<dyn Rule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn validate(&self, request: &LoadTestRequest, errors: &mut Vec<ValidationError>) {
        for r in &self.rules {
            r.validate(request, errors);
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Rule: Send + Sync {
    fn validate(&self, request: &LoadTestRequest, errors: &mut Vec<ValidationError>);
}

pub(crate) struct TargetUrlRule {
    message: String,
}

impl TargetUrlRule {
    pub(crate) fn new() -> Self {
        TargetUrlRule { message: "url is required".to_string() }
    }
}

impl Rule for TargetUrlRule {
    fn validate(&self, request: &LoadTestRequest, errors: &mut Vec<ValidationError>) {
        if request.url.is_empty() {
            errors.push(ValidationError {
                path: "/url".to_string(),
                code: "required".to_string(),
                message: self.message.clone(),
            });
        }
    }
}

pub(crate) struct WebProtocolRule {
    message: String,
}

impl WebProtocolRule {
    pub(crate) fn new() -> Self {
        WebProtocolRule { message: "url must start with http or https".to_string() }
    }
}

impl Rule for WebProtocolRule {
    fn validate(&self, request: &LoadTestRequest, errors: &mut Vec<ValidationError>) {
        if request.url.is_empty() {
            return; // already reported by TargetUrlRule
        }
        if !request.url.starts_with("http") {
            errors.push(ValidationError {
                path: "/url".to_string(),
                code: "unsupported_protocol".to_string(),
                message: self.message.clone(),
            });
        }
    }
}

/// The window capacity is derived from qps, so a qps below 1 never reaches
/// the engine.
pub(crate) struct QpsRule {
    message: String,
}

impl QpsRule {
    pub(crate) fn new() -> Self {
        QpsRule { message: "qps must be >= 1".to_string() }
    }
}

impl Rule for QpsRule {
    fn validate(&self, request: &LoadTestRequest, errors: &mut Vec<ValidationError>) {
        if request.qps < 1 {
            errors.push(ValidationError {
                path: "/qps".to_string(),
                code: "out_of_range".to_string(),
                message: self.message.clone(),
            });
        }
    }
}
