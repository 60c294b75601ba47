mod dict;
mod document;
mod error;
mod extract;
mod keys;
mod palette;

use schemeconv_plist::{NodeKind, PlistView, StructureError, TreeNode};
use tracing::debug;

pub use dict::{build_ordered_dict, OrderedDict};
pub use document::{assemble, serialize, ThemeDocument};
pub use error::ConvertError;
pub use extract::{
    extract_global_settings, extract_rules, extract_theme_info, split_settings, SettingsLayout,
};
pub use keys::format_key;
pub use palette::{ColorLiteral, Palette, PaletteEntry};

/// Converts a parsed tmTheme tree into a color scheme document.
/// 將解析後的 tmTheme 樹轉換為色彩配置文件。
///
/// The palette is built first; globals and rules are then resolved against it.
pub fn convert(root: &TreeNode) -> Result<ThemeDocument, ConvertError> {
    let view = PlistView::new(root)?;
    if root.kind() != &NodeKind::Dict {
        return Err(StructureError::new("theme dictionary", root.kind().tag()).into());
    }

    let palette = Palette::build(root);
    let info = extract_theme_info(&view)?;
    let layout = split_settings(&view)?;
    let globals = extract_global_settings(&view, layout.globals, &palette)?;
    let rules = extract_rules(&view, &layout.rules, &palette)?;

    debug!(
        metadata = info.len(),
        colors = palette.len(),
        globals = globals.len(),
        rules = rules.len(),
        "converted theme"
    );
    Ok(assemble(info, &palette, globals, rules))
}
