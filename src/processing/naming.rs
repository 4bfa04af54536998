use crate::meta::{ContainerName, ContainerNameSource};
use uuid::Uuid;

pub const MIN_CONTAINER_NAME_LEN: usize = 3;
pub const MAX_CONTAINER_NAME_LEN: usize = 24;

/// Length-only naming policy. The character set is not checked.
///
/// Length is counted in UTF-16 code units, so a character outside the Basic
/// Multilingual Plane counts twice.
pub fn is_valid_container_name(name: &str) -> bool {
    let len = name.encode_utf16().count();
    (MIN_CONTAINER_NAME_LEN..=MAX_CONTAINER_NAME_LEN).contains(&len)
}

/// Lower-case the person name, or fall back to a random identifier if the
/// result does not satisfy the naming policy.
pub fn derive_container_name(person_name: &str) -> ContainerName {
    let lowered = person_name.to_lowercase();
    if is_valid_container_name(&lowered) {
        ContainerName::new(lowered, ContainerNameSource::PersonName)
    } else {
        ContainerName::new(
            Uuid::new_v4().hyphenated().to_string(),
            ContainerNameSource::Generated,
        )
    }
}
