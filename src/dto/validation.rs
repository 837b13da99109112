//! Validation helpers for DTOs.

use validator::ValidationError;

/// Longest accepted player name, counted after trimming.
pub const MAX_PLAYER_NAME_LENGTH: usize = 20;

/// Validates a player display name: non-empty and at most
/// [`MAX_PLAYER_NAME_LENGTH`] characters after trimming.
///
/// # Examples
///
/// ```ignore
/// validate_player_name("Ada")        // Ok
/// validate_player_name("   ")        // Err - empty after trimming
/// validate_player_name(&"x".repeat(21)) // Err - too long
/// ```
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        let mut err = ValidationError::new("player_name_empty");
        err.message = Some("Player name cannot be empty".into());
        return Err(err);
    }

    if trimmed.chars().count() > MAX_PLAYER_NAME_LENGTH {
        let mut err = ValidationError::new("player_name_length");
        err.message = Some(
            format!("Player name must be {MAX_PLAYER_NAME_LENGTH} characters or less").into(),
        );
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_name_valid() {
        assert!(validate_player_name("Ada").is_ok());
        assert!(validate_player_name("  Bert  ").is_ok());
        assert!(validate_player_name(&"x".repeat(20)).is_ok());
    }

    #[test]
    fn test_validate_player_name_empty() {
        assert!(validate_player_name("").is_err());
        assert!(validate_player_name("   ").is_err());
        assert!(validate_player_name("\t\n").is_err());
    }

    #[test]
    fn test_validate_player_name_too_long() {
        assert!(validate_player_name(&"x".repeat(21)).is_err());
        // Trailing whitespace does not count against the limit.
        let padded = format!("  {}  ", "x".repeat(20));
        assert!(validate_player_name(&padded).is_ok());
    }
}
