use super::validation::{
    ValidationError, validate_password, validate_speed, validate_username, validate_wan_ip,
};

/// Live validator attached to a form field.
pub type Validator = fn(&str) -> Result<(), ValidationError>;

/// The four fields of the form, in display and insert order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Username,
    WanIp,
    Speed,
    Password,
}

impl FieldId {
    /// All fields in order. A field's position here is its focus index.
    pub const ALL: [FieldId; 4] = [
        FieldId::Username,
        FieldId::WanIp,
        FieldId::Speed,
        FieldId::Password,
    ];

    /// Number of fields in the form.
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this field in [`FieldId::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Username => 0,
            Self::WanIp => 1,
            Self::Speed => 2,
            Self::Password => 3,
        }
    }

    /// Label shown to the left of the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::WanIp => "Wan IP",
            Self::Speed => "Speed",
            Self::Password => "Password",
        }
    }

    /// Hint shown while the field is empty.
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Username => "Username...",
            Self::WanIp => "Wan Ip...",
            Self::Speed => "Speed (100M)",
            Self::Password => "Password...",
        }
    }

    /// Maximum number of characters the field accepts.
    pub fn char_limit(self) -> usize {
        match self {
            Self::Username | Self::Password => 30,
            Self::WanIp => 16,
            Self::Speed => 6,
        }
    }

    /// Live validator run on every edit.
    pub fn validator(self) -> Validator {
        match self {
            Self::Username => validate_username,
            Self::WanIp => validate_wan_ip,
            Self::Speed => validate_speed,
            Self::Password => validate_password,
        }
    }

    /// Whether the value is masked when rendered.
    pub fn is_secret(self) -> bool {
        self == Self::Password
    }
}
