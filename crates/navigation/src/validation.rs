//! Registry validation
//!
//! Structural checks over roles, static menus and hotkeys. Validation never
//! fails: every problem becomes a [`ValidationIssue`] in a
//! [`ValidationResult`], split into errors (the data is wrong) and warnings
//! (the data is suspicious). Input is taken as [`serde_json::Value`] so that
//! documents which would not even deserialize can still be reported on.
//!
//! # Example
//!
//! ```
//! use navigation::{NavigationValidator, ValidationCode, builtin_registry};
//! use serde_json::json;
//!
//! let registry = builtin_registry();
//! let validator = NavigationValidator::new(&registry);
//!
//! let result = validator.validate_role(&json!({}));
//! assert!(!result.is_valid);
//! assert_eq!(result.errors.len(), 4);
//! assert!(result.has_code(ValidationCode::MissingRequiredField));
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

use crate::registry::{json_type_name, ContextName, Registry};

/// Order values outside this range are reported as suspicious
pub const ORDER_RANGE: (f64, f64) = (0.0, 1000.0);

const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Stable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    /// A required field is absent, null or empty
    MissingRequiredField,
    /// A field has the wrong JSON type
    InvalidFieldType,
    /// A whole value has the wrong JSON type
    InvalidType,
    /// An id appears more than once
    DuplicateId,
    /// A context name is not one of [`ContextName::ALL`]
    InvalidContext,
    /// A role navigation value is neither a boolean nor an object
    InvalidNavigationValue,
    /// Validation itself could not run
    ValidationError,
    /// An order lies outside [`ORDER_RANGE`]
    OrderOutOfRange,
    /// An href is neither absolute nor a URL
    InvalidHref,
    /// A list is not sorted by order
    UnsortedOrder,
    /// A navigation key names no known entity
    UnknownEntity,
    /// A hotkey combination is not `modifier+key` syntax
    InvalidKeyCombination,
}

impl ValidationCode {
    /// Wire form of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            ValidationCode::InvalidFieldType => "INVALID_FIELD_TYPE",
            ValidationCode::InvalidType => "INVALID_TYPE",
            ValidationCode::DuplicateId => "DUPLICATE_ID",
            ValidationCode::InvalidContext => "INVALID_CONTEXT",
            ValidationCode::InvalidNavigationValue => "INVALID_NAVIGATION_VALUE",
            ValidationCode::ValidationError => "VALIDATION_ERROR",
            ValidationCode::OrderOutOfRange => "ORDER_OUT_OF_RANGE",
            ValidationCode::InvalidHref => "INVALID_HREF",
            ValidationCode::UnsortedOrder => "UNSORTED_ORDER",
            ValidationCode::UnknownEntity => "UNKNOWN_ENTITY",
            ValidationCode::InvalidKeyCombination => "INVALID_KEY_COMBINATION",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Stable code
    pub code: ValidationCode,
    /// Human-readable explanation
    pub message: String,
    /// Path of the offending field, e.g. `navigation.tabBar[2].order`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The offending value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// How to fix it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    /// Create an issue
    pub fn new(code: ValidationCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), field: None, value: None, suggestion: None }
    }

    /// Set the field path
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach the offending value
    pub fn value(mut self, value: &Value) -> Self {
        self.value = Some(value.clone());
        self
    }

    /// Attach a suggestion
    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {}: {}", self.code, field, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Outcome of a validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when there are no errors
    pub is_valid: bool,
    /// Problems that make the data wrong
    pub errors: Vec<ValidationIssue>,
    /// Problems that make the data suspicious
    pub warnings: Vec<ValidationIssue>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self { is_valid: true, errors: Vec::new(), warnings: Vec::new() }
    }
}

impl ValidationResult {
    /// Empty, valid result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn error(&mut self, issue: ValidationIssue) {
        self.is_valid = false;
        self.errors.push(issue);
    }

    /// Record a warning
    pub fn warn(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Codes of all errors, in report order
    pub fn error_codes(&self) -> Vec<ValidationCode> {
        self.errors.iter().map(|issue| issue.code).collect()
    }

    /// Codes of all warnings, in report order
    pub fn warning_codes(&self) -> Vec<ValidationCode> {
        self.warnings.iter().map(|issue| issue.code).collect()
    }

    /// Whether any error or warning carries `code`
    pub fn has_code(&self, code: ValidationCode) -> bool {
        self.errors.iter().chain(&self.warnings).any(|issue| issue.code == code)
    }
}

// =============================================================================
// Field helpers
// =============================================================================

fn path(context: &str, field: &str) -> String {
    if context.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", context, field)
    }
}

fn wrong_type(field: &str, expected: &str, value: &Value) -> ValidationIssue {
    ValidationIssue::new(
        ValidationCode::InvalidFieldType,
        format!("expected {}, found {}", expected, json_type_name(value)),
    )
    .field(field)
    .value(value)
}

fn missing(field: &str) -> ValidationIssue {
    ValidationIssue::new(ValidationCode::MissingRequiredField, "required field is missing")
        .field(field)
}

fn require_string(result: &mut ValidationResult, object: &Map<String, Value>, key: &str, context: &str) {
    let field = path(context, key);
    match object.get(key) {
        None | Some(Value::Null) => result.error(missing(&field)),
        Some(Value::String(s)) if s.trim().is_empty() => result.error(
            ValidationIssue::new(ValidationCode::MissingRequiredField, "must not be empty")
                .field(field),
        ),
        Some(Value::String(_)) => {}
        Some(other) => result.error(wrong_type(&field, "string", other)),
    }
}

fn require_bool(result: &mut ValidationResult, object: &Map<String, Value>, key: &str, context: &str) {
    let field = path(context, key);
    match object.get(key) {
        None | Some(Value::Null) => result.error(missing(&field)),
        Some(Value::Bool(_)) => {}
        Some(other) => result.error(wrong_type(&field, "boolean", other)),
    }
}

fn optional_bool(result: &mut ValidationResult, object: &Map<String, Value>, key: &str, context: &str) {
    match object.get(key) {
        None | Some(Value::Null) | Some(Value::Bool(_)) => {}
        Some(other) => result.error(wrong_type(&path(context, key), "boolean", other)),
    }
}

fn optional_string(result: &mut ValidationResult, object: &Map<String, Value>, key: &str, context: &str) {
    match object.get(key) {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(other) => result.error(wrong_type(&path(context, key), "string", other)),
    }
}

fn check_order(result: &mut ValidationResult, value: &Value, field: &str) {
    match value.as_f64() {
        Some(order) if order < ORDER_RANGE.0 || order > ORDER_RANGE.1 => result.warn(
            ValidationIssue::new(
                ValidationCode::OrderOutOfRange,
                format!("order {} is outside {}..={}", order, ORDER_RANGE.0, ORDER_RANGE.1),
            )
            .field(field)
            .value(value),
        ),
        Some(_) => {}
        None => result.error(wrong_type(field, "number", value)),
    }
}

fn check_context(result: &mut ValidationResult, value: Option<&Value>, field: &str) {
    let value = match value {
        None | Some(Value::Null) => return,
        Some(value) => value,
    };
    if value.as_str().and_then(ContextName::parse).is_none() {
        let known: Vec<&str> = ContextName::ALL.iter().map(ContextName::as_str).collect();
        result.error(
            ValidationIssue::new(ValidationCode::InvalidContext, "unknown context")
                .field(field)
                .value(value)
                .suggest(format!("use one of: {}", known.join(", "))),
        );
    }
}

fn key_combination_regex() -> &'static Regex {
    static KEY_COMBINATION: OnceLock<Regex> = OnceLock::new();
    KEY_COMBINATION.get_or_init(|| {
        // Zero or more modifiers, then exactly one key
        Regex::new(
            r"^(?:(?:mod|ctrl|alt|shift|meta|cmd)\+)*(?:[a-z0-9]|f[1-9][0-9]?|enter|escape|space|tab|backspace|delete|arrow(?:up|down|left|right)|[/?,.\[\]\\;'`=-])$",
        )
        .unwrap()
    })
}

// =============================================================================
// Validator
// =============================================================================

/// Validator bound to the registry whose entities it checks against
#[derive(Debug, Clone, Copy)]
pub struct NavigationValidator<'a> {
    registry: &'a Registry,
}

impl<'a> NavigationValidator<'a> {
    /// Create a validator for `registry`
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Validate every part of a registry
    pub fn validate_registry(registry: &Registry) -> ValidationResult {
        NavigationValidator::new(registry).validate_all()
    }

    /// Validate one static navigation item
    pub fn validate_navigation_item(item: &Value, context: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        let object = match item.as_object() {
            Some(object) => object,
            None => {
                result.error(
                    ValidationIssue::new(
                        ValidationCode::InvalidType,
                        format!("navigation item must be an object, found {}", json_type_name(item)),
                    )
                    .field(context)
                    .value(item),
                );
                return result;
            }
        };

        for key in ["id", "name", "icon"] {
            require_string(&mut result, object, key, context);
        }
        require_bool(&mut result, object, "visible", context);

        match object.get("order") {
            None | Some(Value::Null) => result.error(missing(&path(context, "order"))),
            Some(order) => check_order(&mut result, order, &path(context, "order")),
        }

        match object.get("href") {
            None | Some(Value::Null) => {}
            Some(Value::String(href)) if href.starts_with('/') || href.starts_with("http") => {}
            Some(Value::String(href)) => result.warn(
                ValidationIssue::new(ValidationCode::InvalidHref, "href should start with / or http")
                    .field(path(context, "href"))
                    .value(&Value::String(href.clone()))
                    .suggest(format!("/{}", href)),
            ),
            Some(other) => result.error(wrong_type(&path(context, "href"), "string or null", other)),
        }

        optional_string(&mut result, object, "description", context);
        optional_bool(&mut result, object, "adminOnly", context);
        optional_bool(&mut result, object, "userOnly", context);
        result
    }

    /// Validate a list of static navigation items
    ///
    /// Each repeat of an id is one `DUPLICATE_ID` error. A list out of order
    /// gets a single `UNSORTED_ORDER` warning.
    pub fn validate_navigation_items(items: &Value, context: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        let items = match items.as_array() {
            Some(items) => items,
            None => {
                result.error(
                    ValidationIssue::new(
                        ValidationCode::InvalidType,
                        format!("navigation list must be an array, found {}", json_type_name(items)),
                    )
                    .field(context)
                    .value(items),
                );
                return result;
            }
        };

        let mut seen = HashSet::new();
        let mut previous_order: Option<f64> = None;
        let mut unsorted = false;

        for (index, item) in items.iter().enumerate() {
            let item_context = format!("{}[{}]", context, index);
            result.merge(Self::validate_navigation_item(item, &item_context));

            if let Some(id) = item.get("id").and_then(Value::as_str) {
                if !seen.insert(id) {
                    result.error(
                        ValidationIssue::new(ValidationCode::DuplicateId, format!("duplicate id '{}'", id))
                            .field(path(&item_context, "id"))
                            .value(&Value::String(id.to_string())),
                    );
                }
            }

            if let Some(order) = item.get("order").and_then(Value::as_f64) {
                if previous_order.map(|prev| order < prev).unwrap_or(false) {
                    unsorted = true;
                }
                previous_order = Some(order);
            }
        }

        if unsorted {
            result.warn(
                ValidationIssue::new(ValidationCode::UnsortedOrder, "items are not sorted by order")
                    .field(context)
                    .suggest("sort the list by ascending order"),
            );
        }
        result
    }

    /// Validate hotkey bindings
    pub fn validate_hotkeys(hotkeys: &Value, context: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        let bindings = match hotkeys.as_array() {
            Some(bindings) => bindings,
            None => {
                result.error(
                    ValidationIssue::new(
                        ValidationCode::InvalidType,
                        format!("hotkeys must be an array, found {}", json_type_name(hotkeys)),
                    )
                    .field(context)
                    .value(hotkeys),
                );
                return result;
            }
        };

        let mut actions = HashSet::new();
        for (index, binding) in bindings.iter().enumerate() {
            let binding_context = format!("{}[{}]", context, index);
            let object = match binding.as_object() {
                Some(object) => object,
                None => {
                    result.error(
                        ValidationIssue::new(ValidationCode::InvalidType, "hotkey must be an object")
                            .field(binding_context)
                            .value(binding),
                    );
                    continue;
                }
            };

            require_string(&mut result, object, "action", &binding_context);
            require_string(&mut result, object, "description", &binding_context);
            optional_string(&mut result, object, "entity", &binding_context);
            if let Some(action) = object.get("action").and_then(Value::as_str) {
                if !actions.insert(action) {
                    result.error(
                        ValidationIssue::new(
                            ValidationCode::DuplicateId,
                            format!("duplicate hotkey action '{}'", action),
                        )
                        .field(path(&binding_context, "action")),
                    );
                }
            }

            let keys_field = path(&binding_context, "keys");
            let keys = match object.get("keys") {
                None | Some(Value::Null) => {
                    result.error(missing(&keys_field));
                    continue;
                }
                Some(Value::Array(keys)) => keys,
                Some(other) => {
                    result.error(wrong_type(&keys_field, "array of strings", other));
                    continue;
                }
            };

            for (key_index, key) in keys.iter().enumerate() {
                let key_field = format!("{}[{}]", keys_field, key_index);
                match key.as_str() {
                    Some(combination) if key_combination_regex().is_match(combination) => {}
                    Some(_) => result.warn(
                        ValidationIssue::new(
                            ValidationCode::InvalidKeyCombination,
                            "key combination should look like modifier+key",
                        )
                        .field(key_field)
                        .value(key)
                        .suggest("e.g. mod+shift+k"),
                    ),
                    None => result.error(wrong_type(&key_field, "string", key)),
                }
            }
        }
        result
    }

    /// Validate one role
    ///
    /// `id`, `name`, `icon` and `label` are required non-empty strings.
    pub fn validate_role(&self, role: &Value) -> ValidationResult {
        let context = match role.get("id").and_then(Value::as_str) {
            Some(id) => format!("role[{}]", id),
            None => "role".to_string(),
        };
        self.validate_role_at(role, &context)
    }

    fn validate_role_at(&self, role: &Value, context: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        let object = match role.as_object() {
            Some(object) => object,
            None => {
                result.error(
                    ValidationIssue::new(
                        ValidationCode::InvalidType,
                        format!("role must be an object, found {}", json_type_name(role)),
                    )
                    .field(context)
                    .value(role),
                );
                return result;
            }
        };

        for key in ["id", "name", "icon", "label"] {
            require_string(&mut result, object, key, context);
        }
        optional_bool(&mut result, object, "visible", context);
        optional_bool(&mut result, object, "permissionRequired", context);
        check_context(&mut result, object.get("context"), &path(context, "context"));

        match object.get("navigation") {
            None | Some(Value::Null) => {}
            Some(navigation) => result.merge(
                self.validate_role_navigation(navigation, &path(context, "navigation")),
            ),
        }
        result
    }

    /// Validate a role's navigation map
    ///
    /// Unknown keys containing `-` or `_` are treated as custom pages. Other
    /// unknown keys are warned about as likely typos.
    pub fn validate_role_navigation(&self, navigation: &Value, context: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        let entries = match navigation.as_object() {
            Some(entries) => entries,
            None => {
                result.error(
                    ValidationIssue::new(
                        ValidationCode::InvalidType,
                        format!("navigation must be an object, found {}", json_type_name(navigation)),
                    )
                    .field(context)
                    .value(navigation),
                );
                return result;
            }
        };

        for (key, value) in entries {
            let field = path(context, key);
            match value {
                Value::Bool(_) => {}
                Value::Object(custom) => {
                    for name in ["route", "label", "icon"] {
                        optional_string(&mut result, custom, name, &field);
                    }
                    for name in ["main", "customPage", "visible"] {
                        optional_bool(&mut result, custom, name, &field);
                    }
                    match custom.get("order") {
                        None | Some(Value::Null) => {}
                        Some(order) => check_order(&mut result, order, &path(&field, "order")),
                    }
                }
                other => result.error(
                    ValidationIssue::new(
                        ValidationCode::InvalidNavigationValue,
                        format!("expected boolean or object, found {}", json_type_name(other)),
                    )
                    .field(&field)
                    .value(other),
                ),
            }

            if self.registry.entity(key).is_none() && !key.contains(['-', '_']) {
                result.warn(self.unknown_entity(key, &field));
            }
        }
        result
    }

    fn unknown_entity(&self, key: &str, field: &str) -> ValidationIssue {
        let known: Vec<&str> = self.registry.entity_keys().collect();
        let issue = ValidationIssue::new(
            ValidationCode::UnknownEntity,
            format!("unknown entity '{}'; known entities: {}", key, known.join(", ")),
        )
        .field(field)
        .value(&Value::String(key.to_string()));

        let lowered = key.to_lowercase();
        let closest = known
            .iter()
            .map(|candidate| (*candidate, strsim::jaro_winkler(&lowered, &candidate.to_lowercase())))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1));

        match closest {
            Some((candidate, _)) => issue.suggest(format!("did you mean '{}'?", candidate)),
            None => issue.suggest("use a known entity, or a custom key containing '-' or '_'"),
        }
    }

    /// Validate the whole registry this validator is bound to
    pub fn validate_all(&self) -> ValidationResult {
        let document = match serde_json::to_value(self.registry) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(error = %e, "registry could not be serialized for validation");
                let mut result = ValidationResult::new();
                result.error(ValidationIssue::new(
                    ValidationCode::ValidationError,
                    format!("validation failed: {}", e),
                ));
                return result;
            }
        };

        let mut result = ValidationResult::new();
        result.merge(self.validate_role_groups(&document["roles"]["groups"]));

        for (name, _) in self.registry.navigation.lists() {
            let context = format!("navigation.{}", name);
            result.merge(Self::validate_navigation_items(&document["navigation"][name], &context));
        }

        result.merge(Self::validate_entity_schemas(&document["entities"], "entities"));
        result.merge(Self::validate_hotkeys(&document["hotkeys"], "hotkeys"));
        for (index, binding) in self.registry.hotkeys.iter().enumerate() {
            if let Some(entity) = &binding.entity {
                if self.registry.entity(entity).is_none() {
                    let field = format!("hotkeys[{}].entity", index);
                    result.warn(self.unknown_entity(entity, &field));
                }
            }
        }

        tracing::debug!(
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "registry validated"
        );
        result
    }

    fn validate_role_groups(&self, groups: &Value) -> ValidationResult {
        let mut result = ValidationResult::new();
        let groups = match groups.as_array() {
            Some(groups) => groups,
            None => {
                result.error(
                    ValidationIssue::new(ValidationCode::InvalidType, "role groups must be an array")
                        .field("roles.groups")
                        .value(groups),
                );
                return result;
            }
        };

        let mut role_ids = HashSet::new();
        for (group_index, group) in groups.iter().enumerate() {
            let group_context = format!("roles.groups[{}]", group_index);
            let object = match group.as_object() {
                Some(object) => object,
                None => {
                    result.error(
                        ValidationIssue::new(ValidationCode::InvalidType, "role group must be an object")
                            .field(group_context)
                            .value(group),
                    );
                    continue;
                }
            };

            require_string(&mut result, object, "name", &group_context);
            require_string(&mut result, object, "icon", &group_context);
            check_context(&mut result, object.get("context"), &path(&group_context, "context"));

            let roles = match object.get("roles").and_then(Value::as_array) {
                Some(roles) => roles,
                None => {
                    result.error(missing(&path(&group_context, "roles")));
                    continue;
                }
            };

            for (role_index, role) in roles.iter().enumerate() {
                let role_context = format!("{}.roles[{}]", group_context, role_index);
                result.merge(self.validate_role_at(role, &role_context));

                if let Some(id) = role.get("id").and_then(Value::as_str) {
                    if !role_ids.insert(id) {
                        result.error(
                            ValidationIssue::new(
                                ValidationCode::DuplicateId,
                                format!("duplicate role id '{}'", id),
                            )
                            .field(path(&role_context, "id")),
                        );
                    }
                }
            }
        }
        result
    }

    /// Validate the entity schema map
    ///
    /// Every schema needs a `route` and an `order`; two entities may not share
    /// a route.
    pub fn validate_entity_schemas(entities: &Value, context: &str) -> ValidationResult {
        let mut result = ValidationResult::new();
        let entities = match entities.as_object() {
            Some(entities) => entities,
            None => {
                result.error(
                    ValidationIssue::new(
                        ValidationCode::InvalidType,
                        format!("entities must be an object, found {}", json_type_name(entities)),
                    )
                    .field(context)
                    .value(entities),
                );
                return result;
            }
        };

        let mut routes = HashSet::new();
        for (key, schema) in entities {
            let context = path(context, key);
            let object = match schema.as_object() {
                Some(object) => object,
                None => {
                    result.error(
                        ValidationIssue::new(
                            ValidationCode::InvalidType,
                            format!("entity schema must be an object, found {}", json_type_name(schema)),
                        )
                        .field(context)
                        .value(schema),
                    );
                    continue;
                }
            };

            require_string(&mut result, object, "route", &context);
            match object.get("order") {
                None | Some(Value::Null) => result.error(missing(&path(&context, "order"))),
                Some(order) => check_order(&mut result, order, &path(&context, "order")),
            }
            optional_string(&mut result, object, "title", &context);
            optional_string(&mut result, object, "icon", &context);
            if let Some(route) = object.get("route").and_then(Value::as_str) {
                if !routes.insert(route.trim_matches('/')) {
                    result.error(
                        ValidationIssue::new(
                            ValidationCode::DuplicateId,
                            format!("route '{}' is used by more than one entity", route),
                        )
                        .field(path(&context, "route")),
                    );
                }
            }
        }
        result
    }
}
