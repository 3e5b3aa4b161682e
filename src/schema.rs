use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::ops::Deref;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::color::ColorToken;
use crate::foundation::error::{ShowroomError, ShowroomResult};

/// How a category's options are applied to the product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Options are color tokens painted onto the category's target entity.
    Color,
    /// Options name alternative entities; selecting one makes it visible.
    Design,
}

/// One selectable entry in a category's catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionDef {
    /// Display name shown on the swatch.
    pub name: String,
    /// Color token (color kind) or design entity identifier (design kind).
    pub value: String,
    /// Preview image stem for design options; falls back to `value`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// One configurable aspect of the product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    /// Entity the category's color commands are addressed to.
    #[serde(default)]
    pub target: String,
    pub kind: CategoryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub options: Vec<OptionDef>,
    #[serde(rename = "default", default)]
    pub default_index: usize,
}

impl Category {
    /// Tab label, defaulting to the category id.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// The option selected when the session starts.
    pub fn default_option(&self) -> Option<&OptionDef> {
        self.options.get(self.default_index)
    }

    /// Return `true` when `color` is one of this category's own catalog values.
    pub fn offers_color(&self, color: &ColorToken) -> bool {
        self.options.iter().any(|o| o.value == color.as_str())
    }
}

/// Directed color dependency: the follower repaints with the source until overridden.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeLink {
    pub source: String,
    pub follower: String,
}

impl Default for CascadeLink {
    fn default() -> Self {
        Self {
            source: "body_colors".to_owned(),
            follower: "mirror_colors".to_owned(),
        }
    }
}

fn default_preview_root() -> String {
    "assets/aventador".to_owned()
}

/// The fetched configuration schema. Immutable for the session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationSchema {
    pub categories: Vec<Category>,
    #[serde(default)]
    pub cascade: CascadeLink,
    #[serde(default = "default_preview_root")]
    pub preview_root: String,
}

impl ConfigurationSchema {
    /// Parse a schema from a JSON reader (not yet validated).
    pub fn from_reader<R: std::io::Read>(r: R) -> ShowroomResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ShowroomError::serde(format!("parse configuration schema JSON: {e}")))
    }

    /// Parse a schema from a JSON file on disk (not yet validated).
    pub fn from_path(path: impl AsRef<Path>) -> ShowroomResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ShowroomError::load(format!("open schema JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Look up a category by id.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Look up a category the UI is wired to; absence is a schema violation.
    pub fn require_category(&self, id: &str) -> ShowroomResult<&Category> {
        self.category(id).ok_or_else(|| {
            ShowroomError::schema_violation(format!("category '{id}' is not defined by the schema"))
        })
    }

    /// `(source, follower)` when both ends of the cascade link exist.
    pub fn cascade_pair(&self) -> Option<(&Category, &Category)> {
        let source = self.category(&self.cascade.source)?;
        let follower = self.category(&self.cascade.follower)?;
        Some((source, follower))
    }

    /// Preview image path for a design option.
    pub fn preview_path(&self, option: &OptionDef) -> String {
        let stem = option.thumb.as_deref().unwrap_or(&option.value);
        format!("{}/{stem}.png", self.preview_root.trim_end_matches('/'))
    }

    pub fn validate(&self) -> ShowroomResult<()> {
        if self.categories.is_empty() {
            return Err(ShowroomError::validation(
                "schema must define at least one category",
            ));
        }

        let mut seen = BTreeSet::new();
        for cat in &self.categories {
            if cat.id.trim().is_empty() {
                return Err(ShowroomError::validation("category id must be non-empty"));
            }
            if !seen.insert(cat.id.as_str()) {
                return Err(ShowroomError::validation(format!(
                    "duplicate category id '{}'",
                    cat.id
                )));
            }
            if cat.options.is_empty() {
                return Err(ShowroomError::validation(format!(
                    "category '{}' has no options",
                    cat.id
                )));
            }
            if cat.default_index >= cat.options.len() {
                return Err(ShowroomError::validation(format!(
                    "category '{}' default index {} is out of range (len {})",
                    cat.id,
                    cat.default_index,
                    cat.options.len()
                )));
            }
            match cat.kind {
                CategoryKind::Color => {
                    if cat.target.trim().is_empty() {
                        return Err(ShowroomError::validation(format!(
                            "color category '{}' must name a target entity",
                            cat.id
                        )));
                    }
                    for opt in &cat.options {
                        ColorToken::new(opt.value.as_str()).map_err(|e| {
                            ShowroomError::validation(format!(
                                "category '{}' option '{}': {e}",
                                cat.id, opt.name
                            ))
                        })?;
                    }
                }
                CategoryKind::Design => {
                    if let Some(opt) = cat.options.iter().find(|o| o.value.trim().is_empty()) {
                        return Err(ShowroomError::validation(format!(
                            "category '{}' option '{}' has an empty design identifier",
                            cat.id, opt.name
                        )));
                    }
                }
            }
        }

        if let Some((source, follower)) = self.cascade_pair() {
            if source.id == follower.id {
                return Err(ShowroomError::validation(
                    "cascade source and follower must differ",
                ));
            }
            if source.kind != CategoryKind::Color || follower.kind != CategoryKind::Color {
                return Err(ShowroomError::validation(format!(
                    "cascade '{}' -> '{}' must link two color categories",
                    source.id, follower.id
                )));
            }
        }

        Ok(())
    }
}

/// Shared read-only handle to a validated schema.
///
/// Cloning is cheap; the palette and the lifecycle controller hold clones of the same store.
#[derive(Clone, Debug)]
pub struct SchemaStore(Rc<ConfigurationSchema>);

impl SchemaStore {
    /// Validate `schema` and wrap it for sharing.
    pub fn new(schema: ConfigurationSchema) -> ShowroomResult<Self> {
        schema.validate()?;
        Ok(Self(Rc::new(schema)))
    }

    /// Read, parse and validate a schema file.
    pub fn load(path: impl AsRef<Path>) -> ShowroomResult<Self> {
        Self::new(ConfigurationSchema::from_path(path)?)
    }
}

impl Deref for SchemaStore {
    type Target = ConfigurationSchema;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
#[path = "../tests/unit/schema.rs"]
mod tests;
