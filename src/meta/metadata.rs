use crate::error::{Result, UploadError};
use base64::Engine;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// A batch of photos uploaded on behalf of one person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadRequest {
    #[serde(rename = "personName", alias = "PersonName", default)]
    pub person_name: String,

    /// Blob name to raw content. `None` marks a photo sent as `null`.
    #[serde(
        rename = "photos",
        alias = "Photos",
        default,
        deserialize_with = "deserialize_photos"
    )]
    pub photos: BTreeMap<String, Option<Vec<u8>>>,
}

impl UploadRequest {
    /// Decode a raw request body. A literal `null` body is treated as malformed.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let parsed: Option<UploadRequest> = serde_json::from_slice(body)
            .map_err(|e| UploadError::MalformedRequest(e.to_string()))?;

        parsed.ok_or_else(|| UploadError::MalformedRequest("request body is null".into()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.person_name.is_empty() || self.photos.is_empty() {
            return Err(UploadError::InvalidFields);
        }
        Ok(())
    }

    pub fn total_bytes(&self) -> usize {
        self.photos.values().flatten().map(Vec::len).sum()
    }
}

// Photo content arrives either as a JSON byte array or as a base64 string.
#[derive(Deserialize)]
#[serde(untagged)]
enum PhotoContent {
    Bytes(Vec<u8>),
    Base64(String),
}

impl PhotoContent {
    fn into_bytes(self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        match self {
            PhotoContent::Bytes(bytes) => Ok(bytes),
            PhotoContent::Base64(encoded) => {
                base64::engine::general_purpose::STANDARD.decode(encoded.as_bytes())
            }
        }
    }
}

type PhotoMap = BTreeMap<String, Option<Vec<u8>>>;

fn deserialize_photos<'de, D>(deserializer: D) -> std::result::Result<PhotoMap, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Option<PhotoContent>>::deserialize(deserializer)?;

    raw.into_iter()
        .map(|(name, content)| match content {
            None => Ok((name, None)),
            Some(content) => match content.into_bytes() {
                Ok(bytes) => Ok((name, Some(bytes))),
                Err(e) => Err(serde::de::Error::custom(format!(
                    "photo {} is not valid base64: {}",
                    name, e
                ))),
            },
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerNameSource {
    /// Lower-cased person name that passed the naming policy.
    PersonName,
    /// Random identifier substituted for a name that failed the policy.
    Generated,
}

/// Name of the storage container a request's photos are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerName {
    name: String,
    source: ContainerNameSource,
}

impl ContainerName {
    pub(crate) fn new(name: String, source: ContainerNameSource) -> Self {
        ContainerName { name, source }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> ContainerNameSource {
        self.source
    }

    pub fn is_generated(&self) -> bool {
        self.source == ContainerNameSource::Generated
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for ContainerName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
