use schemeconv_plist::{NodeKind, PlistView, StructureError, TreeNode};
use tracing::warn;

use crate::dict::{build_ordered_dict, OrderedDict};
use crate::error::ConvertError;
use crate::keys::format_key;
use crate::palette::Palette;

const SETTINGS_KEY: &str = "settings";
const UUID_KEY: &str = "uuid";

/// The `settings` array split into the global block and the scope rules.
#[derive(Debug, Default)]
pub struct SettingsLayout<'a> {
    pub globals: Option<&'a TreeNode>,
    /// Rule entries with their position in the `settings` array.
    pub rules: Vec<(usize, &'a TreeNode)>,
}

/// Top-level metadata (`name`, `author`, ...), without `settings` and `uuid`.
pub fn extract_theme_info(view: &PlistView<'_>) -> Result<OrderedDict, ConvertError> {
    let root = view.root();
    let mut keys: Vec<String> = view
        .keys_of(root)
        .into_iter()
        .map(key_text)
        .filter(|key| key != SETTINGS_KEY)
        .map(|key| format_key(&key))
        .collect();
    let mut values = view.strings_of(root);

    if let Some(index) = keys.iter().position(|key| key == UUID_KEY) {
        keys.remove(index);
        if index < values.len() {
            values.remove(index);
        }
    }

    build_ordered_dict(&keys, &values, None)
}

/// Locates the `settings` array and picks out the first settings-only block.
///
/// Every other entry is a rule, kept in source order.
pub fn split_settings<'a>(view: &PlistView<'a>) -> Result<SettingsLayout<'a>, ConvertError> {
    let Some(settings) = view.value_of(view.root(), SETTINGS_KEY) else {
        warn!("theme has no settings array; globals and rules will be empty");
        return Ok(SettingsLayout::default());
    };
    if settings.kind() != &NodeKind::Array {
        return Err(StructureError::new("settings array", settings.kind().tag()).into());
    }

    let mut layout = SettingsLayout::default();
    for (index, entry) in settings.children().iter().enumerate() {
        if layout.globals.is_none() && is_global_block(view, entry) {
            layout.globals = Some(entry);
        } else {
            layout.rules.push((index, entry));
        }
    }
    Ok(layout)
}

fn is_global_block(view: &PlistView<'_>, entry: &TreeNode) -> bool {
    let keys = view.keys_of(entry);
    let leads_with_settings = keys.first().and_then(|key| key.text()) == Some(SETTINGS_KEY);
    leads_with_settings
        && !keys
            .iter()
            .any(|key| matches!(key.text(), Some("scope" | "name")))
}

/// Builds the `globals` section with palette references.
pub fn extract_global_settings(
    view: &PlistView<'_>,
    entry: Option<&TreeNode>,
    palette: &Palette,
) -> Result<OrderedDict, ConvertError> {
    let Some(entry) = entry else {
        return Ok(OrderedDict::new());
    };
    let Some(settings) = view.value_of(entry, SETTINGS_KEY) else {
        return Ok(OrderedDict::new());
    };
    if settings.kind() != &NodeKind::Dict {
        return Err(StructureError::new("global settings dict", settings.kind().tag()).into());
    }
    resolved_settings(view, settings, palette)
}

/// Builds one rule per entry, preserving source order.
pub fn extract_rules(
    view: &PlistView<'_>,
    entries: &[(usize, &TreeNode)],
    palette: &Palette,
) -> Result<Vec<OrderedDict>, ConvertError> {
    entries
        .iter()
        .map(|&(index, entry)| extract_rule(view, index, entry, palette))
        .collect()
}

fn extract_rule(
    view: &PlistView<'_>,
    index: usize,
    entry: &TreeNode,
    palette: &Palette,
) -> Result<OrderedDict, ConvertError> {
    let keys = view.keys_of(entry);
    if keys.is_empty() {
        return Err(ConvertError::MalformedRule { index });
    }
    let direct_keys: Vec<String> = keys
        .into_iter()
        .map(key_text)
        .filter(|key| key != SETTINGS_KEY)
        .collect();

    let mut rule = build_ordered_dict(&direct_keys, &view.strings_of(entry), None)?;
    for settings in view.dicts_of(entry) {
        rule.extend(resolved_settings(view, settings, palette)?);
    }
    Ok(rule)
}

fn resolved_settings(
    view: &PlistView<'_>,
    settings: &TreeNode,
    palette: &Palette,
) -> Result<OrderedDict, ConvertError> {
    let keys: Vec<String> = view
        .keys_of(settings)
        .into_iter()
        .map(|key| format_key(key.text().unwrap_or_default()))
        .collect();
    build_ordered_dict(&keys, &view.strings_of(settings), Some(palette))
}

fn key_text(key: &TreeNode) -> String {
    key.text().unwrap_or_default().to_string()
}
