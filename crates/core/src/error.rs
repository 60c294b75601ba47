use schemeconv_plist::StructureError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error("settings entry {index} has no keys")]
    MalformedRule { index: usize },
    #[error("failed to serialize color scheme: {0}")]
    Serialize(#[from] serde_json::Error),
}
