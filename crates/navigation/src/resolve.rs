//! Role-based navigation resolution
//!
//! Pure functions over the [`Registry`] that derive what a role may navigate
//! to and how pages are titled. Results are memoized in [`NavigationCache`]s;
//! the caches never change an answer, only how fast it arrives.
//!
//! Every field follows the same precedence:
//!
//! 1. the role's override ([`NavOverride::Customized`])
//! 2. the entity schema
//! 3. global defaults (`file` icon, entity key as title)

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use storage::cache::{CacheConfig, NavigationCache};
use tokio::task::JoinHandle;

use crate::registry::{
    ContextName, CustomNav, HotkeyBinding, NavOverride, NavigationItem, Registry, Role,
};
use crate::Result;

/// Icon used when neither the role nor the schema names one
pub const DEFAULT_ICON: &str = "file";

/// Description used when the schema has none
pub const DEFAULT_DESCRIPTION: &str = "Page content coming soon...";

/// Order given to entries without any order
pub const DEFAULT_ORDER: u32 = 999;

// =============================================================================
// Derived types
// =============================================================================

/// Role-resolved, render-ready navigation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedNavItem {
    /// Entity or page key
    pub id: String,
    /// Canonical name of the entity
    pub name: String,
    /// Display label for this role
    pub label: String,
    /// Route to navigate to
    pub href: Option<String>,
    /// Icon identifier
    pub icon: String,
    /// Always true for generated items
    pub visible: bool,
    /// Display priority
    pub order: u32,
    /// Maps to a custom screen rather than a generated entity view
    pub custom_page: bool,
    /// Shown in constrained / small-screen navigation
    pub main: bool,
}

/// Display metadata for a screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Screen title
    pub title: String,
    /// Screen description
    pub description: String,
    /// Icon identifier
    pub icon: String,
}

impl PageInfo {
    /// Page info used when nothing describes `entity_name`
    pub fn fallback(entity_name: &str) -> Self {
        Self {
            title: entity_name.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            icon: DEFAULT_ICON.to_string(),
        }
    }

    fn from_item(item: &NavigationItem) -> Self {
        Self {
            title: item.name.clone(),
            description: item
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            icon: item.icon.clone(),
        }
    }
}

/// Resolution mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NavigationOptions {
    /// Keep only entries flagged for small screens
    pub main_only: bool,
}

impl NavigationOptions {
    /// Full navigation
    pub fn all() -> Self {
        Self { main_only: false }
    }

    /// Small-screen navigation
    pub fn main_only() -> Self {
        Self { main_only: true }
    }

    fn cache_mode(&self) -> &'static str {
        if self.main_only {
            "main"
        } else {
            "all"
        }
    }
}

/// Cache presets for the resolver
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Role navigation lists
    pub navigation_items: CacheConfig,
    /// Resolved contexts
    pub contexts: CacheConfig,
    /// Page metadata
    pub page_info: CacheConfig,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            navigation_items: CacheConfig::navigation_items(),
            contexts: CacheConfig::contexts(),
            page_info: CacheConfig::page_info(),
        }
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Cache-backed resolution over an injected registry
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<Registry>,
    route_index: Arc<HashMap<String, String>>,
    nav_cache: NavigationCache<Vec<GeneratedNavItem>>,
    context_cache: NavigationCache<ContextName>,
    page_cache: NavigationCache<PageInfo>,
}

impl Resolver {
    /// Create a resolver with the default cache presets
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, ResolverConfig::default())
    }

    /// Create a resolver with custom cache configuration
    pub fn with_config(registry: Arc<Registry>, config: ResolverConfig) -> Self {
        Self::with_caches(
            registry,
            NavigationCache::new(config.navigation_items),
            NavigationCache::new(config.contexts),
            NavigationCache::new(config.page_info),
        )
    }

    /// Create a resolver around existing caches
    pub fn with_caches(
        registry: Arc<Registry>,
        nav_cache: NavigationCache<Vec<GeneratedNavItem>>,
        context_cache: NavigationCache<ContextName>,
        page_cache: NavigationCache<PageInfo>,
    ) -> Self {
        let route_index = Arc::new(build_route_index(&registry));
        Self { registry, route_index, nav_cache, context_cache, page_cache }
    }

    /// The registry this resolver reads
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Cache of role navigation lists
    pub fn navigation_cache(&self) -> &NavigationCache<Vec<GeneratedNavItem>> {
        &self.nav_cache
    }

    /// Cache of resolved contexts
    pub fn context_cache(&self) -> &NavigationCache<ContextName> {
        &self.context_cache
    }

    /// Cache of page metadata
    pub fn page_cache(&self) -> &NavigationCache<PageInfo> {
        &self.page_cache
    }

    /// Navigation entries visible to `role`, ordered by `order`
    pub fn generate_navigation_for_role(
        &self,
        role: &Role,
        options: NavigationOptions,
    ) -> Vec<GeneratedNavItem> {
        let key = format!("nav:{}:{}", role.id, options.cache_mode());
        if let Some(items) = self.nav_cache.get(&key) {
            return items;
        }

        tracing::debug!(role = %role.id, mode = options.cache_mode(), "computing role navigation");
        let items = self.compute_navigation(role, options);
        self.nav_cache.set(key, items.clone());
        items
    }

    /// Uncached form of [`generate_navigation_for_role`](Self::generate_navigation_for_role)
    pub fn compute_navigation(&self, role: &Role, options: NavigationOptions) -> Vec<GeneratedNavItem> {
        let registry_keys = self.registry.entity_keys();
        let extra_keys = role
            .navigation
            .keys()
            .map(String::as_str)
            .filter(|key| self.registry.entity(key).is_none());

        let mut items: Vec<GeneratedNavItem> = registry_keys
            .chain(extra_keys)
            .filter_map(|key| self.resolve_item(role, key))
            .filter(|item| !options.main_only || item.main)
            .collect();

        // Stable: equal orders keep declaration order
        items.sort_by_key(|item| item.order);
        items
    }

    fn resolve_item(&self, role: &Role, key: &str) -> Option<GeneratedNavItem> {
        let schema = self.registry.entity(key);
        let nav_override = role.navigation.get(key);

        let visible = match nav_override {
            Some(nav_override) => nav_override.is_visible(),
            None => schema.map(|s| s.visible_by_default).unwrap_or(false),
        };
        if !visible {
            return None;
        }

        let custom: Option<&CustomNav> = nav_override.and_then(NavOverride::custom);

        let name = schema
            .and_then(|s| s.title.clone())
            .unwrap_or_else(|| key.to_string());
        let label = custom
            .and_then(|c| c.label.clone())
            .unwrap_or_else(|| name.clone());
        let icon = custom
            .and_then(|c| c.icon.clone())
            .or_else(|| schema.and_then(|s| s.icon.clone()))
            .unwrap_or_else(|| DEFAULT_ICON.to_string());
        let href = custom
            .and_then(|c| c.route.as_deref())
            .map(normalize_href)
            .or_else(|| schema.map(|s| normalize_href(&s.route)))
            .unwrap_or_else(|| format!("/{}", key));
        let order = custom
            .and_then(|c| c.order)
            .or_else(|| schema.map(|s| s.order))
            .unwrap_or(DEFAULT_ORDER);
        let main = custom
            .and_then(|c| c.is_main)
            .or_else(|| schema.map(|s| s.main))
            .unwrap_or(false);
        let custom_page = custom
            .and_then(|c| c.is_custom_page)
            .unwrap_or(schema.is_none());

        Some(GeneratedNavItem {
            id: key.to_string(),
            name,
            label,
            href: Some(href),
            icon,
            visible: true,
            order,
            custom_page,
            main,
        })
    }

    /// Title, description and icon for an entity screen
    ///
    /// Unknown entities resolve to [`PageInfo::fallback`].
    pub fn get_page_info_for_entity(&self, entity_name: &str, role: &Role) -> PageInfo {
        let key = format!("page:{}:{}", role.id, entity_name);
        if let Some(info) = self.page_cache.get(&key) {
            return info;
        }

        let info = self.compute_page_info(entity_name, role);
        self.page_cache.set(key, info.clone());
        info
    }

    fn compute_page_info(&self, entity_name: &str, role: &Role) -> PageInfo {
        let schema = self.registry.entity(entity_name);
        let custom = role.navigation.get(entity_name).and_then(NavOverride::custom);
        let fallback = PageInfo::fallback(entity_name);

        PageInfo {
            title: custom
                .and_then(|c| c.label.clone())
                .or_else(|| schema.and_then(|s| s.title.clone()))
                .unwrap_or(fallback.title),
            description: schema
                .and_then(|s| s.description.clone())
                .unwrap_or(fallback.description),
            icon: custom
                .and_then(|c| c.icon.clone())
                .or_else(|| schema.and_then(|s| s.icon.clone()))
                .unwrap_or(fallback.icon),
        }
    }

    /// Page info from the static menus, or `None` when no entry matches
    ///
    /// `route_key` may be an item id or its href, with or without slashes.
    pub fn get_page_info_from_nav_config(&self, route_key: &str) -> Option<PageInfo> {
        let wanted = route_key.trim_matches('/');
        self.registry
            .navigation
            .lists()
            .into_iter()
            .flat_map(|(_, items)| items.iter())
            .find(|item| {
                item.id == wanted
                    || item
                        .href
                        .as_deref()
                        .map(|href| href.trim_matches('/') == wanted)
                        .unwrap_or(false)
            })
            .map(PageInfo::from_item)
    }

    /// Canonical entity key for a URL path segment
    ///
    /// Unknown segments are returned decoded but otherwise unchanged.
    pub fn get_entity_name_for_route(&self, route_segment: &str) -> String {
        let decoded = urlencoding::decode(route_segment)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| route_segment.to_string());
        let segment = decoded.trim_matches('/');

        self.route_index
            .get(segment)
            .or_else(|| self.route_index.get(&segment.to_lowercase()))
            .cloned()
            .unwrap_or_else(|| segment.to_string())
    }

    /// Page info for a dynamic route: static menus first, then entities
    pub fn resolve_page_info(&self, route_segment: &str, role: &Role) -> PageInfo {
        if let Some(info) = self.get_page_info_from_nav_config(route_segment) {
            return info;
        }
        let entity = self.get_entity_name_for_route(route_segment);
        self.get_page_info_for_entity(&entity, role)
    }

    /// UI context of a role
    ///
    /// The role's own context wins, then its group's, then
    /// [`ContextName::General`].
    pub fn resolve_context_for_role(&self, role: &Role) -> ContextName {
        let key = format!("ctx:{}", role.id);
        if let Some(context) = self.context_cache.get(&key) {
            return context;
        }

        let context = role
            .context
            .or_else(|| self.registry.group_of(&role.id).and_then(|g| g.context))
            .unwrap_or(ContextName::General);
        self.context_cache.set(key, context);
        context
    }

    /// Tab bar entries for a role
    pub fn tab_bar_for_role(&self, role: &Role) -> Vec<NavigationItem> {
        self.static_items_for_role(&self.registry.navigation.tab_bar, role)
    }

    /// Profile menu entries for a role
    pub fn profile_menu_for_role(&self, role: &Role) -> Vec<NavigationItem> {
        self.static_items_for_role(&self.registry.navigation.profile_menu, role)
    }

    fn static_items_for_role(&self, items: &[NavigationItem], role: &Role) -> Vec<NavigationItem> {
        let is_admin = self.resolve_context_for_role(role) == ContextName::Admin;
        let mut visible: Vec<NavigationItem> = items
            .iter()
            .filter(|item| item.visible)
            .filter(|item| !item.admin_only || is_admin)
            .filter(|item| !item.user_only || !is_admin)
            .cloned()
            .collect();
        visible.sort_by_key(|item| item.order);
        visible
    }

    /// Hotkeys usable by a role
    ///
    /// Bindings that target an entity are kept only when the entity is in the
    /// role's navigation.
    pub fn hotkeys_for_role(&self, role: &Role) -> Vec<HotkeyBinding> {
        let navigable: HashSet<String> = self
            .generate_navigation_for_role(role, NavigationOptions::all())
            .into_iter()
            .map(|item| item.id)
            .collect();

        self.registry
            .hotkeys
            .iter()
            .filter(|binding| {
                binding
                    .entity
                    .as_ref()
                    .map(|entity| navigable.contains(entity))
                    .unwrap_or(true)
            })
            .cloned()
            .collect()
    }

    /// Drop every cached artefact of a role
    pub fn invalidate_role(&self, role_id: &str) -> usize {
        self.nav_cache.invalidate_prefix(&format!("nav:{}:", role_id))
            + self.page_cache.invalidate_prefix(&format!("page:{}:", role_id))
            + usize::from(self.context_cache.delete(&format!("ctx:{}", role_id)))
    }

    /// Clear all caches
    pub fn clear_caches(&self) {
        self.nav_cache.clear();
        self.context_cache.clear();
        self.page_cache.clear();
    }

    /// Start the background expiry sweep of every cache
    pub fn spawn_sweepers(&self) -> Result<Vec<JoinHandle<()>>> {
        Ok(vec![
            self.nav_cache.spawn_sweeper()?,
            self.context_cache.spawn_sweeper()?,
            self.page_cache.spawn_sweeper()?,
        ])
    }
}

fn normalize_href(route: &str) -> String {
    if route.starts_with('/') || route.starts_with("http") {
        route.to_string()
    } else {
        format!("/{}", route)
    }
}

/// Reverse lookup from route segment (and entity key) to entity key
fn build_route_index(registry: &Registry) -> HashMap<String, String> {
    let mut index = HashMap::new();
    for (key, schema) in &registry.entities {
        let route = schema.route.trim_matches('/');
        index.entry(route.to_string()).or_insert_with(|| key.clone());
        index.entry(route.to_lowercase()).or_insert_with(|| key.clone());
        index.entry(key.clone()).or_insert_with(|| key.clone());
        index.entry(key.to_lowercase()).or_insert_with(|| key.clone());
    }
    index
}
