use super::field::FieldId;
use super::validation::ValidationError;

/// A row snapshotted from the form at the moment the user confirms.
///
/// Values are stored exactly as typed; they are inserted positionally in
/// the order `username, wan_ip, speed, password`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub username: String,
    pub wan_ip: String,
    pub speed: String,
    pub password: String,
}

/// A pre-submission check failure, tied to the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: FieldId,
    pub error: ValidationError,
}

impl FieldFailure {
    fn new(field: FieldId, error: ValidationError) -> Self {
        Self { field, error }
    }
}

impl Submission {
    /// Returns the value for the given field.
    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::Username => &self.username,
            FieldId::WanIp => &self.wan_ip,
            FieldId::Speed => &self.speed,
            FieldId::Password => &self.password,
        }
    }

    /// Runs the required-field checks in order, stopping at the first failure.
    ///
    /// Order: username, wan_ip, wan_ip first segment, speed, password.
    pub fn check(&self) -> Result<(), FieldFailure> {
        if is_blank(&self.username) {
            return Err(FieldFailure::new(
                FieldId::Username,
                ValidationError::BlankUsername,
            ));
        }
        if is_blank(&self.wan_ip) {
            return Err(FieldFailure::new(FieldId::WanIp, ValidationError::BlankWanIp));
        }
        if first_segment_starts_with_zero(&self.wan_ip) {
            return Err(FieldFailure::new(
                FieldId::WanIp,
                ValidationError::InvalidWanIp,
            ));
        }
        if is_blank(&self.speed) {
            return Err(FieldFailure::new(FieldId::Speed, ValidationError::BlankSpeed));
        }
        if is_blank(&self.password) {
            return Err(FieldFailure::new(
                FieldId::Password,
                ValidationError::BlankPassword,
            ));
        }
        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Rejects anything in 0.0.0.0/8, and leading-zero forms like `010.x`.
/// The value is checked as typed, without trimming.
fn first_segment_starts_with_zero(wan_ip: &str) -> bool {
    wan_ip
        .split('.')
        .next()
        .is_some_and(|first| first.starts_with('0'))
}
