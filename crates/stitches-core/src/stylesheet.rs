use crate::model::Layout;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StylesheetOptions {
    /// Class prefix; every sprite class is `prefix-name`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Value placed inside `url(...)`: a path or a data URI.
    #[serde(default = "default_image_url")]
    pub image_url: String,
}

impl Default for StylesheetOptions {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            image_url: default_image_url(),
        }
    }
}

fn default_prefix() -> String {
    "sprite".into()
}
fn default_image_url() -> String {
    "spritesheet.png".into()
}

/// Turns a sprite name into a CSS class fragment: the file extension is
/// dropped and anything outside `[A-Za-z0-9_-]` becomes `-`, so directory
/// separators turn into dashes (`ui/icon.png` gives `ui-icon`).
pub fn css_class_name(name: &str) -> String {
    let base_start = name.rfind(['/', '\\']).map_or(0, |i| i + 1);
    let stem = match name[base_start..].rfind('.') {
        Some(i) if i > 0 => &name[..base_start + i],
        _ => name,
    };
    stem.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Class fragment for every placed sprite, keyed by sprite name.
///
/// Names that sanitise to the same fragment get `-2`, `-3`, ... in name
/// order, so each selector matches exactly one sprite.
pub fn class_names(layout: &Layout) -> HashMap<&str, String> {
    let mut names: Vec<&str> = layout.placed().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    let mut taken: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = HashMap::with_capacity(names.len());
    for name in names {
        let base = css_class_name(name);
        let mut class = base.clone();
        let mut n = 2;
        while taken.contains(&class) {
            class = format!("{base}-{n}");
            n += 1;
        }
        taken.insert(class.clone());
        out.insert(name, class);
    }
    out
}

/// Renders the stylesheet for `layout`: one base rule carrying the sheet
/// image, then one rule per placed sprite sorted by name.
pub fn to_css(layout: &Layout, opts: &StylesheetOptions) -> String {
    let prefix = &opts.prefix;
    let classes = class_names(layout);
    let mut placed: Vec<_> = layout.placed().collect();
    placed.sort_by(|a, b| a.name.cmp(&b.name));

    let mut css = format!(
        ".{prefix} {{\n    background: url({}) no-repeat;\n}}\n",
        opts.image_url
    );
    for p in placed {
        css.push_str(&format!(
            "\n.{prefix}-{} {{\n    width: {}px;\n    height: {}px;\n    background-position: -{}px -{}px;\n}}\n",
            classes[p.name.as_str()],
            p.frame.w,
            p.frame.h,
            p.frame.x,
            p.frame.y,
        ));
    }
    css
}
