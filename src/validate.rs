/// Validates a user-supplied roll identifier and returns the trimmed form.
/// The Err string is the user-facing form message.
pub fn validate_roll_no(raw: &str) -> Result<String, String> {
    let roll = raw.trim();
    if roll.is_empty() {
        return Err("Roll number cannot be empty".to_string());
    }
    if roll.chars().count() < 2 || roll.chars().count() > 20 {
        return Err("Roll number must be between 2 and 20 characters".to_string());
    }
    // Hyphens and underscores are allowed separators; everything else
    // must be alphanumeric, and separators alone are not an identifier.
    let stripped: Vec<char> = roll.chars().filter(|c| *c != '-' && *c != '_').collect();
    if stripped.is_empty() || !stripped.iter().all(|c| c.is_alphanumeric()) {
        return Err(
            "Roll number should contain only letters, numbers, hyphens, or underscores"
                .to_string(),
        );
    }
    Ok(roll.to_string())
}
