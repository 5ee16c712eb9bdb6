use crate::utils::error::{GeoError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub const SUPPORTED_FORMATS: [&str; 2] = ["csv", "json"];

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(GeoError::invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(GeoError::invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(GeoError::invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GeoError::invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    for format in formats {
        if !SUPPORTED_FORMATS.contains(&format.as_str()) {
            return Err(GeoError::invalid(
                field_name,
                format,
                format!(
                    "Unsupported format. Valid formats: {}",
                    SUPPORTED_FORMATS.join(", ")
                ),
            ));
        }
    }
    Ok(())
}

/// The series bound has to stay under the recursion ceiling, otherwise the
/// last sizes of a series would fail with a resource error.
pub fn validate_headroom(max_n: u64, recursion_limit: u64) -> Result<()> {
    if max_n >= recursion_limit {
        return Err(GeoError::invalid(
            "max_n",
            max_n,
            format!(
                "max_n must stay below the recursion limit ({})",
                recursion_limit
            ),
        ));
    }
    Ok(())
}
