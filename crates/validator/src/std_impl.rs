use crate::{HasLength, Validate, ValidateError};
use std::borrow::Cow;

impl HasLength for String {
    fn length(&self) -> usize {
        self.len()
    }
}

impl HasLength for str {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<'a> HasLength for &'a str {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<'a> HasLength for Cow<'a, str> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> HasLength for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<T> HasLength for [T] {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<'a> HasLength for &'a String {
    fn length(&self) -> usize {
        self.len()
    }
}

// ------------------------------------------------ //

impl<T: Validate> Validate for [T] {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut slice = ValidateError::slice_builder();
        for element in self.iter() {
            if let Err(err) = element.validate() {
                slice.insert(err);
            } else {
                slice.insert_empty();
            }
        }
        slice.build().into_result()
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ValidateError> {
        self.as_slice().validate()
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidateError> {
        match self {
            Some(value) => value.validate(),
            None => Ok(()),
        }
    }
}

impl<T: Validate> Validate for Box<T> {
    fn validate(&self) -> Result<(), ValidateError> {
        T::validate(self)
    }
}

impl<'a, T: Validate> Validate for &'a T {
    fn validate(&self) -> Result<(), ValidateError> {
        T::validate(self)
    }
}
