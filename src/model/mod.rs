mod field;
mod submission;
mod validation;

pub use field::{FieldId, Validator};
pub use submission::{FieldFailure, Submission};
pub use validation::{
    ValidationError, validate_password, validate_speed, validate_username, validate_wan_ip,
};
