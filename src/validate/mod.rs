//! Validation of deserialized forms and configuration.
//!
//! Deserialization only checks the shape of the data; everything
//! that depends on values (lengths, formats, reserved names) goes
//! through [`Validate`] before a service gets to see the form.
mod error;

pub use error::*;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidateError>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            Some(inner) => inner.validate(),
            None => Ok(()),
        }
    }
}
