//! Navigation integration tests
//!
//! End-to-end checks across the registry, resolver, validator and the
//! persisted role selection.

use navigation::{
    builtin_registry, ContextName, NavigationOptions, NavigationValidator, PageInfo, Registry,
    Resolver, RoleSelection, ValidationCode,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use storage::{CacheConfig, KvConfig, KvStore, ManualClock, NavigationCache};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A deployment-supplied registry document
fn flight_school_json() -> serde_json::Value {
    json!({
        "roles": {
            "groups": [{
                "name": "School",
                "icon": "graduation-cap",
                "context": "instructor",
                "roles": [
                    {
                        "id": "chief-instructor",
                        "name": "Chief Instructor",
                        "icon": "award",
                        "label": "Chief",
                        "navigation": {
                            "students": { "label": "Roster", "main": true, "order": 1 },
                            "aircraft": true,
                            "stage-checks": { "route": "stage-checks", "customPage": true }
                        }
                    },
                    {
                        "id": "renter",
                        "name": "Renter",
                        "icon": "key",
                        "label": "Renter",
                        "context": "pilot",
                        "navigation": { "aircraft": true, "syllabus": false }
                    }
                ]
            }]
        },
        "navigation": {
            "tabBar": [
                { "id": "home", "name": "Home", "href": "/", "icon": "home", "visible": true, "order": 0 }
            ],
            "profileMenu": [
                { "id": "sign-out", "name": "Sign Out", "href": null, "icon": "log-out", "visible": true, "order": 0 }
            ]
        },
        "entities": {
            "aircraft": { "title": "Aircraft", "route": "aircraft", "order": 10, "main": true },
            "students": { "title": "Students", "route": "students", "order": 20 },
            "syllabus": { "title": "Syllabus", "route": "syllabus", "order": 30, "visibleByDefault": true }
        }
    })
}

#[test]
fn test_builtin_registry_json_round_trip() {
    let registry = builtin_registry();
    let json = serde_json::to_string(&registry).unwrap();

    let loaded = Registry::from_json_str(&json).unwrap();
    assert_eq!(loaded, registry);

    let result = NavigationValidator::validate_registry(&loaded);
    assert!(result.is_valid, "{:?}", result.errors);
}

#[test]
fn test_custom_registry_document() {
    init_tracing();
    let registry = Registry::from_json_str(&flight_school_json().to_string()).unwrap();

    let validation = NavigationValidator::validate_registry(&registry);
    assert!(validation.is_valid, "{:?}", validation.errors);
    assert!(validation.warnings.is_empty(), "{:?}", validation.warnings);

    let resolver = Resolver::new(Arc::new(registry));
    let chief = resolver.registry().role_by_id("chief-instructor").cloned().unwrap();
    let renter = resolver.registry().role_by_id("renter").cloned().unwrap();

    let items = resolver.generate_navigation_for_role(&chief, NavigationOptions::all());
    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, ["students", "aircraft", "syllabus", "stage-checks"]);
    assert_eq!(items[0].label, "Roster");
    assert_eq!(items[3].href.as_deref(), Some("/stage-checks"));
    assert_eq!(items[3].icon, "file");
    assert_eq!(items[3].order, 999);

    let main: Vec<String> = resolver
        .generate_navigation_for_role(&chief, NavigationOptions::main_only())
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(main, ["students", "aircraft"]);

    let renter_ids: Vec<String> = resolver
        .generate_navigation_for_role(&renter, NavigationOptions::all())
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(renter_ids, ["aircraft"]);

    assert_eq!(resolver.resolve_context_for_role(&chief), ContextName::Instructor);
    assert_eq!(resolver.resolve_context_for_role(&renter), ContextName::Pilot);
}

#[test]
fn test_validator_flags_broken_document() {
    let mut document = flight_school_json();
    document["roles"]["groups"][0]["roles"][1]["navigation"]["aircarft"] = json!(true);
    document["roles"]["groups"][0]["roles"][1]["context"] = json!("airline");
    document["navigation"]["tabBar"][0]["order"] = json!("first");

    let registry = builtin_registry();
    let validator = NavigationValidator::new(&registry);

    let role = validator.validate_role(&document["roles"]["groups"][0]["roles"][1]);
    assert!(role.has_code(ValidationCode::InvalidContext));
    assert!(role.has_code(ValidationCode::UnknownEntity));

    let tabs = NavigationValidator::validate_navigation_items(&document["navigation"]["tabBar"], "tabBar");
    assert_eq!(tabs.error_codes(), [ValidationCode::InvalidFieldType]);

    // The typed loader rejects what the validator only reports
    assert!(Registry::from_json_str(&document.to_string()).is_err());
}

#[test]
fn test_role_selection_survives_restart() {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("kv").to_string_lossy().to_string();
    let registry = Arc::new(builtin_registry());

    {
        let store = KvStore::new(KvConfig::new(&path).flush_every_ms(None)).unwrap();
        let mut selection = RoleSelection::load(Arc::clone(&registry), store).unwrap();
        assert_eq!(selection.current().id, "student-pilot");

        selection.select("aircraft-owner").unwrap();
        selection.store().flush().unwrap();
    }

    let store = KvStore::new(KvConfig::new(&path)).unwrap();
    let selection = RoleSelection::load(Arc::clone(&registry), store).unwrap();
    assert_eq!(selection.current().id, "aircraft-owner");

    let resolver = Resolver::new(registry);
    let owner = selection.current();
    let items = resolver.generate_navigation_for_role(owner, NavigationOptions::main_only());
    assert_eq!(items.iter().map(|i| i.label.as_str()).collect::<Vec<_>>(), ["Dashboard", "My Aircraft"]);
    assert_eq!(resolver.resolve_page_info("aircraft", owner).title, "My Aircraft");
}

#[test]
fn test_dynamic_route_resolution() {
    let resolver = Resolver::new(Arc::new(builtin_registry()));
    let mechanic = resolver.registry().role_by_id("mechanic").cloned().unwrap();

    assert_eq!(resolver.resolve_page_info("settings", &mechanic).title, "Settings");
    assert_eq!(resolver.resolve_page_info("work-orders", &mechanic).title, "Work Orders");
    assert_eq!(
        resolver.resolve_page_info("hangar-space", &mechanic),
        PageInfo::fallback("hangar-space")
    );
}

#[test]
fn test_expired_navigation_is_recomputed() {
    let clock = ManualClock::new(0);
    let config = CacheConfig::navigation_items().default_ttl(Duration::from_secs(300));
    let resolver = Resolver::with_caches(
        Arc::new(builtin_registry()),
        NavigationCache::with_clock(config, Arc::new(clock.clone())),
        NavigationCache::new(CacheConfig::contexts()),
        NavigationCache::new(CacheConfig::page_info()),
    );
    let pilot = resolver.registry().role_by_id("private-pilot").cloned().unwrap();

    let first = resolver.generate_navigation_for_role(&pilot, NavigationOptions::all());
    let cached = resolver.generate_navigation_for_role(&pilot, NavigationOptions::all());
    clock.advance(Duration::from_secs(301));
    let recomputed = resolver.generate_navigation_for_role(&pilot, NavigationOptions::all());

    assert_eq!(first, cached);
    assert_eq!(first, recomputed);
    let stats = resolver.navigation_cache().stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.evictions, 1);
}

#[tokio::test(start_paused = true)]
async fn test_sweepers_drop_expired_entries() {
    let clock = ManualClock::new(0);
    let config = CacheConfig::contexts()
        .default_ttl(Duration::from_secs(10))
        .sweep_interval(Duration::from_secs(30));
    let resolver = Resolver::with_caches(
        Arc::new(builtin_registry()),
        NavigationCache::new(CacheConfig::navigation_items()),
        NavigationCache::with_clock(config, Arc::new(clock.clone())),
        NavigationCache::new(CacheConfig::page_info()),
    );

    for role in resolver.registry().roles() {
        resolver.resolve_context_for_role(role);
    }
    assert_eq!(resolver.context_cache().size(), 9);

    let sweepers = resolver.spawn_sweepers().unwrap();
    clock.advance(Duration::from_secs(11));
    tokio::time::sleep(Duration::from_secs(31)).await;

    assert!(resolver.context_cache().is_empty());
    assert_eq!(resolver.context_cache().stats().evictions, 9);
    for sweeper in sweepers {
        sweeper.abort();
    }
}
