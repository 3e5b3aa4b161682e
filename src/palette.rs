//! Configuration palette: tab exclusivity, swatch generation and the color cascade.
//!
//! The palette owns all mutable selection state of a session. It never talks to the renderer
//! directly; every command leaves through the two registration points
//! [`ConfiguratorPalette::on_entity_color_change`] and
//! [`ConfiguratorPalette::on_entity_visibility_change`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::{ColorToken, Rgba8};
use crate::foundation::error::{ShowroomError, ShowroomResult};
use crate::schema::{Category, CategoryKind, ConfigurationSchema, SchemaStore};

/// Label of the synthetic leading swatch offered on the cascade follower.
pub const CURRENT_SWATCH_LABEL: &str = "Current";

type ColorCallback = Box<dyn FnMut(&str, &ColorToken)>;
type VisibilityCallback = Box<dyn FnMut(&str)>;

/// Wiring of one tab control to a schema category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabDef {
    pub id: String,
    pub label: String,
}

/// Ordered tab wiring for the palette.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteLayout {
    pub tabs: Vec<TabDef>,
}

impl PaletteLayout {
    /// One tab per schema category, in schema order.
    pub fn from_schema(schema: &ConfigurationSchema) -> Self {
        Self {
            tabs: schema
                .categories
                .iter()
                .map(|c| TabDef {
                    id: c.id.clone(),
                    label: c.label().to_owned(),
                })
                .collect(),
        }
    }

    /// The fixed five-tab layout of the automobile showcase.
    pub fn automobile() -> Self {
        let tab = |id: &str, label: &str| TabDef {
            id: id.to_owned(),
            label: label.to_owned(),
        };
        Self {
            tabs: vec![
                tab("body_colors", "BODY COLOR"),
                tab("mirror_colors", "SIDE MIRRORS"),
                tab("wheel_designs", "WHEELS"),
                tab("wheel_colors", "WHEEL COLOR"),
                tab("caliper_colors", "CALIPERS"),
            ],
        }
    }
}

/// What a swatch looks like.
#[derive(Clone, Debug, PartialEq)]
pub enum SwatchFace {
    /// Solid fill; `rgba` is set when the token is a hex color.
    Color {
        token: ColorToken,
        rgba: Option<Rgba8>,
    },
    /// Preview image of a design option.
    Preview { image: String },
}

/// Command a swatch issues when clicked.
#[derive(Clone, Debug, PartialEq)]
pub enum SwatchAction {
    Paint {
        category: String,
        target: String,
        color: ColorToken,
    },
    Show {
        entity: String,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Swatch {
    pub label: String,
    pub face: SwatchFace,
    pub action: SwatchAction,
}

/// Option list belonging to one tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OptionPanel {
    pub visible: bool,
    pub swatches: Vec<Swatch>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tab {
    pub id: String,
    pub label: String,
    pub active: bool,
    pub panel: OptionPanel,
}

/// Mutable selection state of one session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PaletteState {
    active_tab: Option<String>,
    current_colors: BTreeMap<String, ColorToken>,
}

impl PaletteState {
    /// Id of the open tab, if any.
    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    /// Last recorded color of a color category.
    pub fn current_color(&self, category: &str) -> Option<&ColorToken> {
        self.current_colors.get(category)
    }

    pub fn current_colors(&self) -> &BTreeMap<String, ColorToken> {
        &self.current_colors
    }
}

/// The configuration cascade engine.
///
/// Constructed once per session; [`ConfiguratorPalette::initialize`] attaches the schema when the
/// session turns interactive. Callbacks may be registered before or after initialization.
#[derive(Default)]
pub struct ConfiguratorPalette {
    layout: Option<PaletteLayout>,
    schema: Option<SchemaStore>,
    tabs: Vec<Tab>,
    state: PaletteState,
    on_color: Option<ColorCallback>,
    on_visibility: Option<VisibilityCallback>,
}

impl std::fmt::Debug for ConfiguratorPalette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguratorPalette")
            .field("initialized", &self.schema.is_some())
            .field("tabs", &self.tabs.len())
            .field("state", &self.state)
            .finish()
    }
}

impl ConfiguratorPalette {
    /// A palette that builds one tab per schema category.
    pub fn new() -> Self {
        Self::default()
    }

    /// A palette with explicit tab wiring, checked against the schema at initialization.
    pub fn with_layout(layout: PaletteLayout) -> Self {
        Self {
            layout: Some(layout),
            ..Self::default()
        }
    }

    /// Register the receiver of `(target entity, color)` commands.
    pub fn on_entity_color_change(&mut self, cb: impl FnMut(&str, &ColorToken) + 'static) {
        self.on_color = Some(Box::new(cb));
    }

    /// Register the receiver of `(entity)` visibility commands.
    pub fn on_entity_visibility_change(&mut self, cb: impl FnMut(&str) + 'static) {
        self.on_visibility = Some(Box::new(cb));
    }

    pub fn is_initialized(&self) -> bool {
        self.schema.is_some()
    }

    /// Seed the selection state from the schema and build the tab controls.
    ///
    /// Every color category starts at its default option, except the cascade follower, which
    /// starts out tracking the source's default color.
    #[tracing::instrument(skip_all)]
    pub fn initialize(&mut self, schema: SchemaStore) -> ShowroomResult<()> {
        if self.schema.is_some() {
            return Err(ShowroomError::invariant("palette is already initialized"));
        }

        self.check_layout(&schema)?;
        let layout = match &self.layout {
            Some(layout) => layout.clone(),
            None => PaletteLayout::from_schema(&schema),
        };

        let mut current_colors = BTreeMap::new();
        for cat in schema
            .categories
            .iter()
            .filter(|c| c.kind == CategoryKind::Color)
        {
            if let Some(opt) = cat.default_option() {
                current_colors.insert(cat.id.clone(), ColorToken::new(opt.value.as_str())?);
            }
        }
        if let Some((source, follower)) = schema.cascade_pair() {
            if let Some(seed) = current_colors.get(&source.id).cloned() {
                current_colors.insert(follower.id.clone(), seed);
            }
        }

        self.tabs = layout
            .tabs
            .into_iter()
            .map(|t| Tab {
                id: t.id,
                label: t.label,
                active: false,
                panel: OptionPanel::default(),
            })
            .collect();
        self.state = PaletteState {
            active_tab: None,
            current_colors,
        };
        self.schema = Some(schema);
        tracing::debug!(tabs = self.tabs.len(), "palette initialized");
        Ok(())
    }

    /// Fail with a schema violation if the explicit layout wires a tab to a category `schema`
    /// does not define.
    pub fn check_layout(&self, schema: &ConfigurationSchema) -> ShowroomResult<()> {
        if let Some(layout) = &self.layout {
            for tab in &layout.tabs {
                schema.require_category(&tab.id)?;
            }
        }
        Ok(())
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn state(&self) -> &PaletteState {
        &self.state
    }

    /// Toggle a tab. Opening a tab closes whichever tab was open before.
    #[tracing::instrument(skip(self))]
    pub fn click_tab(&mut self, tab_id: &str) -> ShowroomResult<()> {
        let schema = self.require_schema()?;
        let idx = self.tab_index(tab_id)?;

        if self.tabs[idx].active {
            let tab = &mut self.tabs[idx];
            tab.panel.swatches.clear();
            tab.panel.visible = false;
            tab.active = false;
            self.state.active_tab = None;
            return Ok(());
        }

        for tab in &mut self.tabs {
            tab.active = false;
            tab.panel.visible = false;
        }

        let category = schema.require_category(tab_id)?;
        let swatches = self.build_swatches(&schema, category)?;

        let tab = &mut self.tabs[idx];
        tab.panel.swatches = swatches;
        tab.panel.visible = true;
        tab.active = true;
        self.state.active_tab = Some(tab.id.clone());
        Ok(())
    }

    /// Click the `index`-th swatch of the open tab `tab_id`.
    #[tracing::instrument(skip(self))]
    pub fn click_swatch(&mut self, tab_id: &str, index: usize) -> ShowroomResult<()> {
        let schema = self.require_schema()?;
        let tab = &self.tabs[self.tab_index(tab_id)?];
        if !tab.active {
            return Err(ShowroomError::invariant(format!(
                "swatch clicked on closed tab '{tab_id}'"
            )));
        }
        let action = tab
            .panel
            .swatches
            .get(index)
            .map(|s| s.action.clone())
            .ok_or_else(|| {
                ShowroomError::invariant(format!(
                    "tab '{tab_id}' has no swatch at index {index} (len {})",
                    tab.panel.swatches.len()
                ))
            })?;

        match action {
            SwatchAction::Show { entity } => {
                if let Some(cb) = self.on_visibility.as_mut() {
                    cb(&entity);
                }
            }
            SwatchAction::Paint {
                category,
                target,
                color,
            } => self.paint(&schema, &category, &target, color),
        }
        Ok(())
    }

    /// Open `tab_id` unless it is already open, then click its `index`-th swatch.
    pub fn choose(&mut self, tab_id: &str, index: usize) -> ShowroomResult<()> {
        if self.state.active_tab() != Some(tab_id) {
            self.click_tab(tab_id)?;
        }
        self.click_swatch(tab_id, index)
    }

    fn paint(&mut self, schema: &ConfigurationSchema, category: &str, target: &str, color: ColorToken) {
        self.emit_color(target, &color);
        self.state
            .current_colors
            .insert(category.to_owned(), color.clone());

        let Some((source, follower)) = schema.cascade_pair() else {
            return;
        };
        if source.id != category {
            return;
        }
        // Tracking is decided by catalog membership alone: a follower color that is one of its
        // own options is an override even when it equals the source color.
        let tracking = self
            .state
            .current_colors
            .get(&follower.id)
            .is_none_or(|c| !follower.offers_color(c));
        if tracking {
            tracing::debug!(follower = %follower.id, %color, "cascade repaint");
            self.emit_color(&follower.target, &color);
        }
    }

    fn emit_color(&mut self, target: &str, color: &ColorToken) {
        if let Some(cb) = self.on_color.as_mut() {
            cb(target, color);
        }
    }

    fn build_swatches(
        &self,
        schema: &ConfigurationSchema,
        category: &Category,
    ) -> ShowroomResult<Vec<Swatch>> {
        match category.kind {
            CategoryKind::Design => Ok(category
                .options
                .iter()
                .map(|opt| Swatch {
                    label: opt.name.clone(),
                    face: SwatchFace::Preview {
                        image: schema.preview_path(opt),
                    },
                    action: SwatchAction::Show {
                        entity: opt.value.clone(),
                    },
                })
                .collect()),
            CategoryKind::Color => {
                let mut entries: Vec<(String, ColorToken)> = Vec::with_capacity(category.options.len() + 1);
                if let Some((source, follower)) = schema.cascade_pair() {
                    if follower.id == category.id {
                        if let Some(live) = self.state.current_color(&source.id) {
                            entries.push((CURRENT_SWATCH_LABEL.to_owned(), live.clone()));
                        }
                    }
                }
                for opt in &category.options {
                    entries.push((opt.name.clone(), ColorToken::new(opt.value.as_str())?));
                }

                Ok(entries
                    .into_iter()
                    .map(|(label, token)| Swatch {
                        label,
                        face: SwatchFace::Color {
                            rgba: token.rgba8(),
                            token: token.clone(),
                        },
                        action: SwatchAction::Paint {
                            category: category.id.clone(),
                            target: category.target.clone(),
                            color: token,
                        },
                    })
                    .collect())
            }
        }
    }

    fn require_schema(&self) -> ShowroomResult<SchemaStore> {
        self.schema
            .clone()
            .ok_or_else(|| ShowroomError::invariant("palette used before initialization"))
    }

    fn tab_index(&self, tab_id: &str) -> ShowroomResult<usize> {
        self.tabs.iter().position(|t| t.id == tab_id).ok_or_else(|| {
            ShowroomError::schema_violation(format!("tab '{tab_id}' is not wired to the palette"))
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;
