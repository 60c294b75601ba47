use indexmap::IndexMap;
use schemeconv_plist::{StructureError, TreeNode};

use crate::error::ConvertError;
use crate::palette::Palette;

/// Insertion-ordered string map used for every section of a color scheme.
pub type OrderedDict = IndexMap<String, String>;

/// Pairs `keys` with `values` positionally.
/// 依位置將鍵與值配對成有序對照表。
///
/// Values without text are consumed without producing an entry. When values
/// outnumber keys, the last value is written to the last key, replacing whatever
/// that key held. With a palette, known color literals become `var(<id>)`.
pub fn build_ordered_dict(
    keys: &[String],
    values: &[&TreeNode],
    palette: Option<&Palette>,
) -> Result<OrderedDict, ConvertError> {
    let mut dict = OrderedDict::new();

    for (key, value) in keys.iter().zip(values) {
        let Some(text) = value.text() else {
            continue;
        };
        let text = text.trim();
        let resolved = match palette.and_then(|palette| palette.resolve(text)) {
            Some(id) => format!("var({id})"),
            None => text.to_string(),
        };
        dict.insert(key.clone(), resolved);
    }

    if values.len() > keys.len() {
        let last_key = keys
            .last()
            .ok_or_else(|| StructureError::new("a key before each value", "a value without key"))?;
        if let Some(text) = values.last().and_then(|value| value.text()) {
            dict.insert(last_key.clone(), text.trim().to_string());
        }
    }

    Ok(dict)
}
