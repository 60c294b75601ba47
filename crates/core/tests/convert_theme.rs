use pretty_assertions::assert_eq;
use schemeconv_core::{convert, serialize, ConvertError};
use schemeconv_plist::{parse_document, TreeNode};

const MONOKAI_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>name</key>
    <string>Monokai Sample</string>
    <key>author</key>
    <string>Wimer Hazenberg</string>
    <key>settings</key>
    <array>
        <dict>
            <key>settings</key>
            <dict>
                <key>background</key>
                <string>#272822</string>
                <key>foreground</key>
                <string>#F8F8F2</string>
                <key>lineHighlight</key>
                <string>#3E3D3280</string>
                <key>findHighlightForeground</key>
                <string>#000000</string>
                <key>selection</key>
                <string>#49483E</string>
            </dict>
        </dict>
        <dict>
            <key>name</key>
            <string>Comment</string>
            <key>scope</key>
            <string>comment</string>
            <key>settings</key>
            <dict>
                <key>foreground</key>
                <string>#75715E</string>
            </dict>
        </dict>
        <dict>
            <key>name</key>
            <string>String</string>
            <key>scope</key>
            <string>string</string>
            <key>settings</key>
            <dict>
                <key>foreground</key>
                <string>#E6DB74</string>
            </dict>
        </dict>
        <dict>
            <key>name</key>
            <string>Invalid</string>
            <key>scope</key>
            <string>invalid</string>
            <key>settings</key>
            <dict>
                <key>background</key>
                <string>#F92672</string>
                <key>fontStyle</key>
                <string></string>
                <key>foreground</key>
                <string>#F8F8F0</string>
            </dict>
        </dict>
        <dict>
            <key>name</key>
            <string>Selection tint</string>
            <key>scope</key>
            <string>meta.selection</string>
            <key>settings</key>
            <dict>
                <key>background</key>
                <string>#F9267240</string>
            </dict>
        </dict>
    </array>
    <key>uuid</key>
    <string>D8D5E82E-3D5B-46B5-B38E-8C841C21347D</string>
    <key>colorSpaceName</key>
    <string>sRGB</string>
</dict>
</plist>
"#;

const MONOKAI_EXPECTED: &str = r##"{
    "name": "Monokai Sample",
    "author": "Wimer Hazenberg",
    "color_space_name": "sRGB",
    "variables": {
        "color00": "#272822",
        "color01": "#F8F8F2",
        "color02": "color(#3E3D32 alpha(0.50))",
        "color03": "#000000",
        "color04": "#49483E",
        "color05": "#75715E",
        "color06": "#E6DB74",
        "color07": "#F92672",
        "color08": "#F8F8F0",
        "color09": "color(var(color07) alpha(0.25))"
    },
    "globals": {
        "background": "var(color00)",
        "foreground": "var(color01)",
        "line_highlight": "var(color02)",
        "find_highlight_foreground": "var(color03)",
        "selection": "var(color04)"
    },
    "rules": [
        {
            "name": "Comment",
            "scope": "comment",
            "foreground": "var(color05)"
        },
        {
            "name": "String",
            "scope": "string",
            "foreground": "var(color06)"
        },
        {
            "name": "Invalid",
            "scope": "invalid",
            "background": "var(color07)",
            "foreground": "var(color08)"
        },
        {
            "name": "Selection tint",
            "scope": "meta.selection",
            "background": "var(color09)"
        }
    ]
}
"##;

fn convert_text(xml: &str) -> Result<String, ConvertError> {
    let root = parse_document(xml).expect("valid plist");
    serialize(&convert(&root)?)
}

#[test]
fn converts_full_theme() {
    assert_eq!(convert_text(MONOKAI_SAMPLE).unwrap(), MONOKAI_EXPECTED);
}

#[test]
fn conversion_is_idempotent() {
    let root = parse_document(MONOKAI_SAMPLE).unwrap();
    let first = serialize(&convert(&root).unwrap()).unwrap();
    let second = serialize(&convert(&root).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn uuid_and_references_never_reach_output() {
    let root = parse_document(MONOKAI_SAMPLE).unwrap();
    let document = convert(&root).unwrap();
    assert!(!document.info.contains_key("uuid"));
    assert!(!document.variables.contains_key("references"));

    let json: serde_json::Value = serde_json::from_str(&serialize(&document).unwrap()).unwrap();
    assert!(json.get("uuid").is_none());
    assert!(json["variables"].get("references").is_none());
    let top_level: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(
        top_level,
        ["name", "author", "color_space_name", "variables", "globals", "rules"]
    );
}

#[test]
fn rules_keep_source_order() {
    let rule = |name: &str| {
        TreeNode::dict(vec![
            TreeNode::key("name"),
            TreeNode::string(name),
            TreeNode::key("scope"),
            TreeNode::string(format!("scope.{name}")),
            TreeNode::key("settings"),
            TreeNode::dict(Vec::new()),
        ])
    };
    let root = TreeNode::dict(vec![
        TreeNode::key("settings"),
        TreeNode::array(vec![rule("R1"), rule("R2"), rule("R3")]),
    ]);
    let document = convert(&root).unwrap();
    let names: Vec<_> = document
        .rules
        .iter()
        .map(|rule| rule["name"].as_str())
        .collect();
    assert_eq!(names, ["R1", "R2", "R3"]);
    assert!(document.globals.is_empty());
}

#[test]
fn trailing_value_overwrites_last_global() {
    let root = TreeNode::dict(vec![
        TreeNode::key("settings"),
        TreeNode::array(vec![TreeNode::dict(vec![
            TreeNode::key("settings"),
            TreeNode::dict(vec![
                TreeNode::key("background"),
                TreeNode::string("#101010"),
                TreeNode::key("foreground"),
                TreeNode::string("#FAFAFA"),
                TreeNode::string("#FAFAFA80"),
            ]),
        ])]),
    ]);
    let document = convert(&root).unwrap();
    assert_eq!(document.globals["background"], "var(color00)");
    assert_eq!(document.globals["foreground"], "#FAFAFA80");
    assert_eq!(
        document.variables["color02"],
        "color(var(color01) alpha(0.50))"
    );
}

#[test]
fn non_dictionary_root_is_rejected() {
    let root = TreeNode::array(vec![TreeNode::string("#FFFFFF")]);
    assert!(matches!(
        convert(&root).unwrap_err(),
        ConvertError::Structure(error) if error.expected == "theme dictionary"
    ));

    let leaf = TreeNode::string("#FFFFFF");
    assert!(matches!(
        convert(&leaf).unwrap_err(),
        ConvertError::Structure(_)
    ));
}

#[test]
fn hash_prefixed_metadata_stays_plain_text() {
    let root = TreeNode::dict(vec![
        TreeNode::key("name"),
        TreeNode::string("#Monokai Dark"),
        TreeNode::key("comment"),
        TreeNode::string("#todo"),
        TreeNode::key("settings"),
        TreeNode::array(vec![
            TreeNode::dict(vec![
                TreeNode::key("settings"),
                TreeNode::dict(vec![
                    TreeNode::key("background"),
                    TreeNode::string("#272822"),
                ]),
            ]),
            TreeNode::dict(vec![
                TreeNode::key("name"),
                TreeNode::string("#region marker"),
                TreeNode::key("scope"),
                TreeNode::string("comment.region"),
                TreeNode::key("settings"),
                TreeNode::dict(Vec::new()),
            ]),
        ]),
    ]);
    let document = convert(&root).unwrap();
    assert_eq!(document.info["name"], "#Monokai Dark");
    assert_eq!(document.info["comment"], "#todo");
    assert_eq!(document.variables.len(), 1);
    assert_eq!(document.variables["color00"], "#272822");
    assert_eq!(document.globals["background"], "var(color00)");
    assert_eq!(document.rules[0]["name"], "#region marker");
}
