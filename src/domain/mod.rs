use std::borrow::Cow;
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

pub mod todo_item;
pub mod todo_list;

#[cfg(test)]
pub mod test_util;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input was invalid: {0}")]
    Invalid(ValidationErrors),
    #[error("requested data does not exist")]
    DoesNotExist,
    #[error("the change conflicts with existing data")]
    Conflict,
    #[error("failed to {action} due to a communication failure: {cause}")]
    RetrieveFailure {
        action: String,
        #[source]
        cause: anyhow::Error,
    },
}

impl From<ValidationErrors> for Error {
    fn from(value: ValidationErrors) -> Self {
        Self::Invalid(value)
    }
}

impl Error {
    /// Builds an [Error::Invalid] holding a single failed check on [field]
    pub(crate) fn invalid_field(
        field: &'static str,
        code: &'static str,
        message: &'static str,
    ) -> Self {
        let mut field_error = ValidationError::new(code);
        field_error.message = Some(Cow::Borrowed(message));

        let mut errors = ValidationErrors::new();
        errors.add(field, field_error);
        Self::Invalid(errors)
    }

    /// Wraps a plain communication failure, noting the [action] that was being attempted
    pub(crate) fn failed_to(action: &str, cause: anyhow::Error) -> Self {
        Self::RetrieveFailure {
            action: action.into(),
            cause,
        }
    }
}


#[derive(Error, Debug)]
pub enum DrivenPortError {
    #[error("a communication failure occurred: {0}")]
    CommsFailure(anyhow::Error),
    #[error("the requested data does not exist")]
    DoesNotExist,
    #[error("the data conflicts with a uniqueness constraint")]
    Conflict,
}

impl From<anyhow::Error> for DrivenPortError {
    fn from(value: anyhow::Error) -> Self {
        Self::CommsFailure(value)
    }
}

impl DrivenPortError {
    /// Converts this DrivenPortError to a domain error with some extra info on the [action]
    /// being taken when communicating over the port
    fn into_error_trying_to(self, action: &str) -> Error {
        match self {
            Self::DoesNotExist => Error::DoesNotExist,
            Self::Conflict => Error::Conflict,
            Self::CommsFailure(err) => Error::failed_to(action, err),
        }
    }
}

/// Validator for text fields which must contain something other than whitespace
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut blank = ValidationError::new("required");
        blank.message = Some(Cow::Borrowed("This field is required."));
        return Err(blank);
    }

    Ok(())
}
