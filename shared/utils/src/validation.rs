use crate::config::AppConfig;
use crate::error::{PipelineError, PipelineResult};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

pub fn validate_config(config: &AppConfig) -> PipelineResult<()> {
    config.validate().map_err(|errors| {
        let mut messages = Vec::new();
        collect_messages("", &errors, &mut messages);
        PipelineError::configuration(messages.join(", "))
    })?;

    if config
        .extraction
        .keyword_priority_list
        .iter()
        .any(|k| k.trim().is_empty())
    {
        return Err(PipelineError::configuration(
            "Column keywords must not be blank",
        ));
    }

    Ok(())
}

fn collect_messages(prefix: &str, errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(message) => format!("{}: {}", path, message),
                        None => format!("Validation failed for field '{}': {}", path, error.code),
                    };
                    messages.push(message);
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(&path, nested, messages),
            ValidationErrorsKind::List(items) => {
                for (idx, nested) in items {
                    collect_messages(&format!("{}[{}]", path, idx), nested, messages);
                }
            }
        }
    }
}
