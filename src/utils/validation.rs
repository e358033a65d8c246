use crate::utils::error::{Result, SantaError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid name regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\(?([0-9]{3})\)?[-. ]?([0-9]{3})[-. ]?([0-9]{4})$").expect("valid phone regex")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Letters and inner whitespace only; at least one letter.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || !NAME_RE.is_match(name) {
        return Err(SantaError::validation(
            "name",
            name,
            "Name may only contain letters and spaces",
        ));
    }
    Ok(())
}

/// North American style: `555-123-4567`, `(555) 123-4567`, `555.123.4567`, `5551234567`.
pub fn validate_phone_number(number: &str) -> Result<()> {
    if !PHONE_RE.is_match(number) {
        return Err(SantaError::validation(
            "number",
            number,
            "Expected a 10 digit phone number such as 555-123-4567",
        ));
    }
    Ok(())
}

pub fn validate_txt_file(path: &str) -> Result<()> {
    let file = Path::new(path);
    let has_txt_extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "txt")
        .unwrap_or(false);

    if !has_txt_extension {
        return Err(SantaError::validation(
            "txt file",
            path,
            "File name must end with .txt",
        ));
    }

    if !file.is_file() {
        return Err(SantaError::validation("txt file", path, "File does not exist"));
    }

    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SantaError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SantaError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SantaError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SantaError::validation(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}
