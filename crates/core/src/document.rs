use serde::ser::Error as _;
use serde::Serialize;
use tracing::warn;

use crate::dict::OrderedDict;
use crate::error::ConvertError;
use crate::palette::Palette;

const SECTION_KEYS: [&str; 3] = ["variables", "globals", "rules"];

/// A converted `.sublime-color-scheme` document.
///
/// Serializes as the metadata keys followed by `variables`, `globals` and `rules`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeDocument {
    #[serde(flatten)]
    pub info: OrderedDict,
    pub variables: OrderedDict,
    pub globals: OrderedDict,
    pub rules: Vec<OrderedDict>,
}

impl ThemeDocument {
    pub fn to_json_string(&self) -> Result<String, ConvertError> {
        serialize(self)
    }
}

/// Merges the extracted sections into one document.
///
/// Metadata keys that would shadow a section name are dropped.
pub fn assemble(
    mut info: OrderedDict,
    palette: &Palette,
    globals: OrderedDict,
    rules: Vec<OrderedDict>,
) -> ThemeDocument {
    info.retain(|key, _| {
        let reserved = SECTION_KEYS.contains(&key.as_str());
        if reserved {
            warn!(key = %key, "dropping metadata key that collides with a section name");
        }
        !reserved
    });

    ThemeDocument {
        info,
        variables: palette.variables(),
        globals,
        rules,
    }
}

/// Renders the document as JSON with four-space indentation and a trailing newline.
pub fn serialize(document: &ThemeDocument) -> Result<String, ConvertError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    let mut text = String::from_utf8(buf).map_err(serde_json::Error::custom)?;
    text.push('\n');
    Ok(text)
}
