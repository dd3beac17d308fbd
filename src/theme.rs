//! Theme definitions: slug list, `theme.json` loading and metadata extraction.
//!
//! A theme lives at `<themes-root>/<slug>/theme.json`. Only the `meta` object
//! is interpreted; the rest of the document is carried through untouched and
//! stored as `preset_data`.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use log::debug;
use regex::Regex;
use serde_json::{Map, Value};

/// Themes seeded by default, in `sort_order` sequence.
pub const DEFAULT_THEMES: &[&str] = &[
    "modern-bistro",
    "warm-comfort",
    "vibrant-energy",
    "elegant-simplicity",
    "urban-fresh",
    "coastal-breeze",
    "spicy-fusion",
    "garden-fresh",
    "premium-dark",
    "playful-pop",
];

/// Category used when `meta.category` is absent.
pub const DEFAULT_CATEGORY: &str = "professional";

/// File name of a theme definition inside its slug directory.
pub const THEME_FILE: &str = "theme.json";

/// Lowercase words separated by single hyphens.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").unwrap());

/// Slugs are embedded verbatim in SQL and used as directory names, so only
/// the kebab-case form is accepted.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// Path of the definition file for `slug` under `themes_dir`.
pub fn theme_path(themes_dir: &Path, slug: &str) -> PathBuf {
    themes_dir.join(slug).join(THEME_FILE)
}

/// A parsed `theme.json`.
#[derive(Debug, Clone)]
pub struct ThemeDefinition {
    pub slug: String,
    pub path: PathBuf,
    pub document: Map<String, Value>,
}

/// Display metadata with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeMeta {
    pub name: String,
    pub category: String,
    pub description: String,
}

/// Load the definition for `slug`.
///
/// Returns `Ok(None)` when the file does not exist. Any other read failure,
/// invalid JSON, or a non-object document is an error.
pub fn load(themes_dir: &Path, slug: &str) -> Result<Option<ThemeDefinition>> {
    let path = theme_path(themes_dir, slug);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    debug!("theme: read {} ({} bytes)", path.display(), text.len());

    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let Value::Object(document) = value else {
        bail!("{}: top-level value must be a JSON object", path.display());
    };

    Ok(Some(ThemeDefinition {
        slug: slug.to_string(),
        path,
        document,
    }))
}

impl ThemeDefinition {
    /// The `meta` object, if present. `null` counts as absent.
    fn meta_object(&self) -> Result<Option<&Map<String, Value>>> {
        match self.document.get("meta") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(meta)) => Ok(Some(meta)),
            Some(_) => bail!("{}: `meta` must be an object", self.path.display()),
        }
    }

    fn meta_str(&self, key: &str) -> Result<Option<&str>> {
        let Some(meta) = self.meta_object()? else {
            return Ok(None);
        };
        match meta.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => bail!("{}: `meta.{key}` must be a string", self.path.display()),
        }
    }

    /// Resolve `name`, `category` and `description`, falling back to the
    /// slug, [`DEFAULT_CATEGORY`] and the empty string.
    pub fn meta(&self) -> Result<ThemeMeta> {
        Ok(ThemeMeta {
            name: self.meta_str("name")?.unwrap_or(&self.slug).to_string(),
            category: self
                .meta_str("category")?
                .unwrap_or(DEFAULT_CATEGORY)
                .to_string(),
            description: self.meta_str("description")?.unwrap_or_default().to_string(),
        })
    }

    /// Compact JSON of the whole document. Key order follows the source
    /// file and non-ASCII text is kept literal.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.document)
            .with_context(|| format!("failed to serialize {}", self.path.display()))
    }

    /// Advisory checks for fields the storefront expects. Findings never
    /// block seeding.
    pub fn lint(&self) -> Vec<String> {
        let mut issues = Vec::new();

        let meta = self.document.get("meta").and_then(Value::as_object);
        let field = |obj: Option<&Map<String, Value>>, key: &str| {
            obj.and_then(|o| o.get(key))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        if field(meta, "name").is_none() {
            issues.push("meta.name is required".to_string());
        }
        match field(meta, "slug") {
            None => issues.push("meta.slug is required".to_string()),
            Some(s) if s != self.slug => issues.push(format!(
                "meta.slug '{s}' does not match directory '{}'",
                self.slug
            )),
            Some(_) => {}
        }

        let colors = self.document.get("colors").and_then(Value::as_object);
        if field(colors, "primary").is_none() {
            issues.push("colors.primary is required".to_string());
        }
        if field(colors, "background").is_none() {
            issues.push("colors.background is required".to_string());
        }

        let has_components = self
            .document
            .get("components")
            .and_then(Value::as_array)
            .is_some_and(|c| !c.is_empty());
        if !has_components {
            issues.push("at least one component is required".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition(slug: &str, value: Value) -> ThemeDefinition {
        let Value::Object(document) = value else {
            panic!("test document must be an object");
        };
        ThemeDefinition {
            slug: slug.to_string(),
            path: PathBuf::from(format!("themes/{slug}/theme.json")),
            document,
        }
    }

    #[test]
    fn default_list_has_ten_valid_slugs() {
        assert_eq!(DEFAULT_THEMES.len(), 10);
        assert!(DEFAULT_THEMES.iter().all(|s| is_valid_slug(s)));
        assert_eq!(DEFAULT_THEMES[0], "modern-bistro");
        assert_eq!(DEFAULT_THEMES[9], "playful-pop");
    }

    #[test]
    fn slug_validation() {
        assert!(is_valid_slug("garden-fresh"));
        assert!(is_valid_slug("v2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Garden-Fresh"));
        assert!(!is_valid_slug("garden--fresh"));
        assert!(!is_valid_slug("-garden"));
        assert!(!is_valid_slug("garden fresh"));
        assert!(!is_valid_slug("x'); DROP TABLE theme_presets; --"));
        assert!(!is_valid_slug("../etc"));
    }

    #[test]
    fn path_layout() {
        let p = theme_path(Path::new("themes"), "urban-fresh");
        assert_eq!(p, Path::new("themes/urban-fresh/theme.json"));
    }

    #[test]
    fn meta_defaults() {
        let def = definition("urban-fresh", json!({"colors": {}}));
        let meta = def.meta().unwrap();
        assert_eq!(meta.name, "urban-fresh");
        assert_eq!(meta.category, "professional");
        assert_eq!(meta.description, "");
    }

    #[test]
    fn meta_values() {
        let def = definition(
            "modern-bistro",
            json!({
                "meta": {"name": "Modern Bistro", "category": "casual", "description": "Clean"}
            }),
        );
        let meta = def.meta().unwrap();
        assert_eq!(meta.name, "Modern Bistro");
        assert_eq!(meta.category, "casual");
        assert_eq!(meta.description, "Clean");
    }

    #[test]
    fn null_meta_fields_use_defaults() {
        let def = definition("warm-comfort", json!({"meta": {"name": null, "category": null}}));
        let meta = def.meta().unwrap();
        assert_eq!(meta.name, "warm-comfort");
        assert_eq!(meta.category, "professional");
    }

    #[test]
    fn non_string_name_is_error() {
        let def = definition("warm-comfort", json!({"meta": {"name": 42}}));
        let err = def.meta().unwrap_err();
        assert!(format!("{err:#}").contains("meta.name"));
    }

    #[test]
    fn non_object_meta_is_error() {
        let def = definition("warm-comfort", json!({"meta": ["name"]}));
        assert!(def.meta().is_err());
    }

    #[test]
    fn to_json_keeps_key_order_and_unicode() {
        let text = r#"{"zeta":1,"alpha":{"name":"مطعم","b":2,"a":1}}"#;
        let Value::Object(document) = serde_json::from_str(text).unwrap() else {
            unreachable!()
        };
        let def = ThemeDefinition {
            slug: "x".into(),
            path: PathBuf::from("x/theme.json"),
            document,
        };
        assert_eq!(def.to_json().unwrap(), text);
    }

    #[test]
    fn lint_complete_theme() {
        let def = definition(
            "premium-dark",
            json!({
                "meta": {"name": "Premium Dark", "slug": "premium-dark"},
                "colors": {"primary": "#111", "background": "#000"},
                "components": [{"type": "hero"}]
            }),
        );
        assert!(def.lint().is_empty());
    }

    #[test]
    fn lint_reports_missing_fields() {
        let def = definition("premium-dark", json!({"meta": {"slug": "other"}}));
        let issues = def.lint();
        assert_eq!(issues.len(), 5);
        assert!(issues.iter().any(|i| i.contains("meta.name")));
        assert!(issues.iter().any(|i| i.contains("'other' does not match")));
        assert!(issues.iter().any(|i| i.contains("colors.primary")));
        assert!(issues.iter().any(|i| i.contains("colors.background")));
        assert!(issues.iter().any(|i| i.contains("component")));
    }
}
