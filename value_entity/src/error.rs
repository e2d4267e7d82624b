use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("Field \"{field}\" of {entity} has type {field_type}, which supplies no equality operation")]
    MissingEquality {
        entity: &'static str,
        field: &'static str,
        field_type: &'static str,
    },
}
