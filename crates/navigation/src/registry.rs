//! Role and navigation registry
//!
//! Declarative description of roles, role groups, static navigation menus,
//! entity schemas and hotkeys. The registry is plain immutable data with a few
//! lookup accessors; anything derived from it lives in [`crate::resolve`].
//!
//! Registries serialize to camelCase JSON, so a deployment can ship its own
//! registry document and load it with [`Registry::from_json_str`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{NavigationError, Result};

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !*value
}

// =============================================================================
// Contexts
// =============================================================================

/// Coarse permission / UI-mode bucket derived from a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextName {
    /// Rated pilots flying club or rental aircraft
    Pilot,
    /// Student pilots in training
    Student,
    /// Flight instructors
    Instructor,
    /// Mechanics and inspectors
    Maintenance,
    /// Dispatch and front desk
    Dispatch,
    /// Aircraft owners
    Owner,
    /// Administrators
    Admin,
    /// No specific context
    General,
}

impl ContextName {
    /// Every context, in declaration order
    pub const ALL: [ContextName; 8] = [
        ContextName::Pilot,
        ContextName::Student,
        ContextName::Instructor,
        ContextName::Maintenance,
        ContextName::Dispatch,
        ContextName::Owner,
        ContextName::Admin,
        ContextName::General,
    ];

    /// Wire name of the context
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextName::Pilot => "pilot",
            ContextName::Student => "student",
            ContextName::Instructor => "instructor",
            ContextName::Maintenance => "maintenance",
            ContextName::Dispatch => "dispatch",
            ContextName::Owner => "owner",
            ContextName::Admin => "admin",
            ContextName::General => "general",
        }
    }

    /// Parse a wire name
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|context| context.as_str() == value)
    }
}

impl fmt::Display for ContextName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Role navigation overrides
// =============================================================================

/// Per-role customisation of one navigation entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomNav {
    /// Route replacing the entity's default route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Icon identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Show in constrained / small-screen navigation
    #[serde(default, rename = "main", skip_serializing_if = "Option::is_none")]
    pub is_main: Option<bool>,
    /// Entry maps to a custom screen rather than a generated entity view
    #[serde(default, rename = "customPage", skip_serializing_if = "Option::is_none")]
    pub is_custom_page: Option<bool>,
    /// Visibility (defaults to visible)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// Display priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl CustomNav {
    /// Empty customisation
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the route
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Set the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the icon
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Mark as a main (small-screen) entry
    pub fn main(mut self) -> Self {
        self.is_main = Some(true);
        self
    }

    /// Mark as a custom page
    pub fn custom_page(mut self) -> Self {
        self.is_custom_page = Some(true);
        self
    }

    /// Set visibility
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Set display priority
    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

/// How a role treats one entity or page key
///
/// In JSON this is either a boolean enable flag or a [`CustomNav`] object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOverride", into = "RawOverride")]
pub enum NavOverride {
    /// Hidden for this role
    Disabled,
    /// Shown with the entity's defaults
    Enabled,
    /// Shown with role-specific overrides
    Customized(CustomNav),
}

impl NavOverride {
    /// The customisation, if any
    pub fn custom(&self) -> Option<&CustomNav> {
        match self {
            NavOverride::Customized(custom) => Some(custom),
            _ => None,
        }
    }

    /// Whether the override makes the entry visible
    pub fn is_visible(&self) -> bool {
        match self {
            NavOverride::Disabled => false,
            NavOverride::Enabled => true,
            NavOverride::Customized(custom) => custom.visible.unwrap_or(true),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawOverride {
    Flag(bool),
    Custom(CustomNav),
}

impl From<RawOverride> for NavOverride {
    fn from(raw: RawOverride) -> Self {
        match raw {
            RawOverride::Flag(true) => NavOverride::Enabled,
            RawOverride::Flag(false) => NavOverride::Disabled,
            RawOverride::Custom(custom) => NavOverride::Customized(custom),
        }
    }
}

impl From<NavOverride> for RawOverride {
    fn from(value: NavOverride) -> Self {
        match value {
            NavOverride::Enabled => RawOverride::Flag(true),
            NavOverride::Disabled => RawOverride::Flag(false),
            NavOverride::Customized(custom) => RawOverride::Custom(custom),
        }
    }
}

// =============================================================================
// Roles
// =============================================================================

/// A user persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Unique key
    pub id: String,
    /// Full name
    pub name: String,
    /// Icon identifier
    pub icon: String,
    /// Short display label
    pub label: String,
    /// Offered in the role picker
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Selecting the role requires an extra permission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_required: Option<bool>,
    /// Explicit context; otherwise inherited from the group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextName>,
    /// Entity / page key to override, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub navigation: IndexMap<String, NavOverride>,
}

impl Role {
    /// Create a visible role with no navigation overrides
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            label: label.into(),
            visible: true,
            permission_required: None,
            context: None,
            navigation: IndexMap::new(),
        }
    }

    /// Parse a role from loosely typed JSON
    ///
    /// Anything other than a JSON object is rejected up front.
    pub fn from_value(value: &serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(NavigationError::InvalidRole(format!(
                "expected an object, found {}",
                json_type_name(value)
            )));
        }
        serde_json::from_value(value.clone()).map_err(|e| NavigationError::InvalidRole(e.to_string()))
    }

    /// Set the explicit context
    pub fn with_context(mut self, context: ContextName) -> Self {
        self.context = Some(context);
        self
    }

    /// Hide the role from the picker
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Require an extra permission to select the role
    pub fn permission_required(mut self) -> Self {
        self.permission_required = Some(true);
        self
    }

    /// Add a navigation override
    pub fn with_nav(mut self, key: impl Into<String>, value: NavOverride) -> Self {
        self.navigation.insert(key.into(), value);
        self
    }

    /// Enable entities with their defaults
    pub fn enable<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        for key in keys {
            self.navigation.insert(key.into(), NavOverride::Enabled);
        }
        self
    }

    /// Add a customised navigation entry
    pub fn customize(self, key: impl Into<String>, custom: CustomNav) -> Self {
        self.with_nav(key, NavOverride::Customized(custom))
    }

    /// Hide an entity for this role
    pub fn disable(self, key: impl Into<String>) -> Self {
        self.with_nav(key, NavOverride::Disabled)
    }
}

/// Named group of roles shown together in the role picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleGroup {
    /// Group name
    pub name: String,
    /// Group icon
    pub icon: String,
    /// Context inherited by roles without their own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextName>,
    /// Roles in display order
    pub roles: Vec<Role>,
}

/// All role groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleConfig {
    /// Groups in display order
    pub groups: Vec<RoleGroup>,
}

// =============================================================================
// Static navigation
// =============================================================================

/// A statically defined navigable entry (tab, menu row, top-level page)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    /// Unique key within its list
    pub id: String,
    /// Display name
    pub name: String,
    /// Route, or `None` for action-only entries such as sign-out
    pub href: Option<String>,
    /// Icon identifier
    pub icon: String,
    /// Shown at all
    pub visible: bool,
    /// Display priority
    pub order: u32,
    /// Page description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Only for the admin context
    #[serde(default, skip_serializing_if = "is_false")]
    pub admin_only: bool,
    /// Hidden from the admin context
    #[serde(default, skip_serializing_if = "is_false")]
    pub user_only: bool,
}

impl NavigationItem {
    /// Create a visible item
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        href: Option<&str>,
        icon: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            href: href.map(str::to_string),
            icon: icon.into(),
            visible: true,
            order,
            description: None,
            admin_only: false,
            user_only: false,
        }
    }

    /// Set the description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Restrict to the admin context
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Hide from the admin context
    pub fn user_only(mut self) -> Self {
        self.user_only = true;
        self
    }

    /// Action entries execute something instead of navigating
    pub fn is_action(&self) -> bool {
        self.href.is_none()
    }
}

/// Static navigation menus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfig {
    /// Bottom tab bar
    pub tab_bar: Vec<NavigationItem>,
    /// Profile / account menu
    pub profile_menu: Vec<NavigationItem>,
    /// Other top-level pages reachable without an entity
    #[serde(default)]
    pub top_level: Vec<NavigationItem>,
}

impl NavigationConfig {
    /// Every list with its name
    pub fn lists(&self) -> [(&'static str, &[NavigationItem]); 3] {
        [
            ("tabBar", self.tab_bar.as_slice()),
            ("profileMenu", self.profile_menu.as_slice()),
            ("topLevel", self.top_level.as_slice()),
        ]
    }
}

// =============================================================================
// Entities and hotkeys
// =============================================================================

/// Display metadata for an entity screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySchema {
    /// Title; the entity key is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Page description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Icon identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// URL path segment
    pub route: String,
    /// Display priority
    pub order: u32,
    /// Shown to roles that do not mention the entity
    #[serde(default)]
    pub visible_by_default: bool,
    /// Shown in constrained / small-screen navigation
    #[serde(default)]
    pub main: bool,
}

impl EntitySchema {
    /// Create a schema with a title and route
    pub fn new(title: impl Into<String>, route: impl Into<String>, order: u32) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
            icon: None,
            route: route.into(),
            order,
            visible_by_default: false,
            main: false,
        }
    }

    /// Set the description
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the icon
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Show to every role unless disabled
    pub fn visible_by_default(mut self) -> Self {
        self.visible_by_default = true;
        self
    }

    /// Mark as a main entry
    pub fn main(mut self) -> Self {
        self.main = true;
        self
    }
}

/// Keyboard shortcut bound to an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotkeyBinding {
    /// Action identifier
    pub action: String,
    /// Key combinations, e.g. `mod+shift+a`
    pub keys: Vec<String>,
    /// Help text
    pub description: String,
    /// Entity the action navigates to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl HotkeyBinding {
    /// Create a binding
    pub fn new(action: impl Into<String>, keys: &[&str], description: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            keys: keys.iter().map(|k| k.to_string()).collect(),
            description: description.into(),
            entity: None,
        }
    }

    /// Bind to an entity
    pub fn for_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Single source of truth for roles, menus, entities and hotkeys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    /// Role groups
    pub roles: RoleConfig,
    /// Static menus
    pub navigation: NavigationConfig,
    /// Entity schemas in declaration order
    pub entities: IndexMap<String, EntitySchema>,
    /// Keyboard shortcuts
    #[serde(default)]
    pub hotkeys: Vec<HotkeyBinding>,
}

impl Registry {
    /// Load a registry from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// All roles across groups, in display order
    pub fn roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.groups.iter().flat_map(|group| group.roles.iter())
    }

    /// Look up a role by id
    pub fn role_by_id(&self, id: &str) -> Option<&Role> {
        self.roles().find(|role| role.id == id)
    }

    /// The group containing a role
    pub fn group_of(&self, role_id: &str) -> Option<&RoleGroup> {
        self.roles
            .groups
            .iter()
            .find(|group| group.roles.iter().any(|role| role.id == role_id))
    }

    /// First role offered in the picker
    pub fn default_role(&self) -> Option<&Role> {
        self.roles().find(|role| role.visible)
    }

    /// Roles offered in the picker
    pub fn visible_roles(&self) -> impl Iterator<Item = &Role> {
        self.roles().filter(|role| role.visible)
    }

    /// Look up an entity schema
    pub fn entity(&self, key: &str) -> Option<&EntitySchema> {
        self.entities.get(key)
    }

    /// Entity keys in declaration order
    pub fn entity_keys(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }
}

/// Human-readable JSON type name for diagnostics
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
