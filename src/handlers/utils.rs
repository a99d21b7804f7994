use uuid::Uuid;

use crate::error::ApiError;

/// Path or query identity that must be a UUID
pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::invalid_field(field, format!("'{}' is not a valid id", raw)))
}

/// Integer department code
pub fn parse_code(field: &str, raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::invalid_field(field, format!("'{}' is not a department code", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_validation_errors() {
        assert_eq!(parse_uuid("id", "123").unwrap_err().status_code(), 400);
        assert_eq!(parse_code("id", "abc").unwrap_err().status_code(), 400);
        assert_eq!(parse_code("id", " 7 ").unwrap(), 7);
    }
}
