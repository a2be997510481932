use thiserror::Error;

/// Validation errors for form field values.
///
/// The first group is produced live while typing; the second by the
/// pre-submission checks in [`Submission::check`](super::Submission::check).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No spaces in username")]
    UsernameSpace,
    #[error("No spaces in Speed")]
    SpeedSpace,
    #[error("No spaces in password")]
    PasswordSpace,
    #[error("nothing between decimals")]
    EmptyOctets,
    #[error("too many octets")]
    TooManyOctets,
    #[error("{0} is not a valid octet")]
    InvalidOctet(String),

    #[error("username cannot be null")]
    BlankUsername,
    #[error("wanIp cannot be null")]
    BlankWanIp,
    #[error("invalid wan ip")]
    InvalidWanIp,
    #[error("speed cannot be null")]
    BlankSpeed,
    #[error("password cannot be null")]
    BlankPassword,
}

/// Maximum number of dot-separated segments in a WAN IP.
const MAX_OCTETS: usize = 4;
/// Maximum length of a single WAN IP segment.
const MAX_OCTET_LEN: usize = 3;

/// Validates a username: any value without a space is accepted.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.contains(' ') {
        Err(ValidationError::UsernameSpace)
    } else {
        Ok(())
    }
}

/// Validates a speed value such as `100M`.
pub fn validate_speed(speed: &str) -> Result<(), ValidationError> {
    if speed.contains(' ') {
        Err(ValidationError::SpeedSpace)
    } else {
        Ok(())
    }
}

/// Validates a password: any value without a space is accepted.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.contains(' ') {
        Err(ValidationError::PasswordSpace)
    } else {
        Ok(())
    }
}

/// Validates a (possibly partially typed) WAN IP.
///
/// A single empty segment is tolerated so that values like `10.` or `10..`
/// can be typed; two or more are rejected. Empty segments are not checked
/// for range.
pub fn validate_wan_ip(wan_ip: &str) -> Result<(), ValidationError> {
    let segments: Vec<&str> = wan_ip.split('.').collect();

    if segments.iter().filter(|s| s.is_empty()).count() > 1 {
        return Err(ValidationError::EmptyOctets);
    }
    if segments.len() > MAX_OCTETS {
        return Err(ValidationError::TooManyOctets);
    }

    match segments
        .iter()
        .find(|s| !s.is_empty() && !is_valid_octet(s))
    {
        Some(bad) => Err(ValidationError::InvalidOctet((*bad).to_string())),
        None => Ok(()),
    }
}

fn is_valid_octet(segment: &str) -> bool {
    segment.len() <= MAX_OCTET_LEN
        && segment.bytes().all(|b| b.is_ascii_digit())
        && segment.parse::<u16>().is_ok_and(|n| n <= 255)
}
