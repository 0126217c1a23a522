//! Built-in aviation registry
//!
//! Roles, menus, entities and hotkeys shipped with the application. The
//! process-wide statics are read-only; components that need an injectable
//! registry should call [`builtin_registry`] and wrap the result in an `Arc`.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::registry::{
    ContextName, CustomNav, EntitySchema, HotkeyBinding, NavigationConfig, NavigationItem,
    Registry, Role, RoleConfig, RoleGroup,
};

/// Built-in role groups
pub static ROLE_CONFIG: Lazy<RoleConfig> = Lazy::new(role_config);

/// Built-in static menus
pub static NAVIGATION_CONFIG: Lazy<NavigationConfig> = Lazy::new(navigation_config);

/// Built-in registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(builtin_registry);

impl Registry {
    /// The built-in aviation registry
    pub fn builtin() -> Self {
        builtin_registry()
    }
}

/// Build a fresh copy of the built-in registry
pub fn builtin_registry() -> Registry {
    Registry {
        roles: role_config(),
        navigation: navigation_config(),
        entities: entity_schemas(),
        hotkeys: hotkeys(),
    }
}

fn entity_schemas() -> IndexMap<String, EntitySchema> {
    let schemas = [
        (
            "dashboard",
            EntitySchema::new("Dashboard", "dashboard", 0)
                .describe("Today's flights, open squawks and alerts")
                .icon("grid")
                .visible_by_default()
                .main(),
        ),
        (
            "aircraft",
            EntitySchema::new("Aircraft", "aircraft", 10)
                .describe("Fleet status, hours and airworthiness")
                .icon("plane")
                .main(),
        ),
        (
            "reservations",
            EntitySchema::new("Reservations", "reservations", 20)
                .describe("Book and manage aircraft reservations")
                .icon("calendar")
                .main(),
        ),
        (
            "flights",
            EntitySchema::new("Flights", "flights", 30)
                .describe("Dispatched flights and Hobbs times")
                .icon("navigation"),
        ),
        (
            "logbook",
            EntitySchema::new("Logbook", "logbook", 40)
                .describe("Personal flight time records")
                .icon("book-open"),
        ),
        (
            "squawks",
            EntitySchema::new("Squawks", "squawks", 50)
                .describe("Reported aircraft discrepancies")
                .icon("alert-triangle"),
        ),
        (
            "maintenance",
            EntitySchema::new("Maintenance", "maintenance", 60)
                .describe("Scheduled and completed maintenance")
                .icon("tool"),
        ),
        (
            "workOrders",
            EntitySchema::new("Work Orders", "work-orders", 70)
                .describe("Open and closed work orders")
                .icon("clipboard"),
        ),
        (
            "inspections",
            EntitySchema::new("Inspections", "inspections", 80)
                .describe("Annual, 100-hour and AD compliance inspections")
                .icon("check-square"),
        ),
        (
            "members",
            EntitySchema::new("Members", "members", 90)
                .describe("Club members and renters")
                .icon("users"),
        ),
        (
            "instructors",
            EntitySchema::new("Instructors", "instructors", 100)
                .describe("Instructor availability and ratings")
                .icon("user-check"),
        ),
        (
            "students",
            EntitySchema::new("Students", "students", 110)
                .describe("Enrolled students and their progress")
                .icon("graduation-cap"),
        ),
        (
            "training",
            EntitySchema::new("Training Records", "training", 120)
                .describe("Lessons, endorsements and stage checks")
                .icon("award"),
        ),
        (
            "documents",
            EntitySchema::new("Documents", "documents", 130).visible_by_default(),
        ),
        (
            "billing",
            EntitySchema::new("Billing", "billing", 140)
                .describe("Invoices, account balance and payments")
                .icon("credit-card"),
        ),
        (
            "fuelLogs",
            EntitySchema::new("Fuel Logs", "fuel-logs", 150)
                .describe("Fuel uplift by aircraft")
                .icon("droplet"),
        ),
        (
            "weather",
            EntitySchema::new("Weather", "weather", 160)
                .describe("METARs, TAFs and briefings")
                .icon("cloud"),
        ),
        (
            "notams",
            EntitySchema {
                title: None,
                description: None,
                icon: None,
                route: "notams".to_string(),
                order: 170,
                visible_by_default: false,
                main: false,
            },
        ),
        (
            "reports",
            EntitySchema::new("Reports", "reports", 180)
                .describe("Utilisation and revenue reports")
                .icon("bar-chart"),
        ),
    ];

    schemas
        .into_iter()
        .map(|(key, schema)| (key.to_string(), schema))
        .collect()
}

fn role_config() -> RoleConfig {
    let flight_operations = RoleGroup {
        name: "Flight Operations".to_string(),
        icon: "plane".to_string(),
        context: Some(ContextName::Pilot),
        roles: vec![
            Role::new("student-pilot", "Student Pilot", "graduation-cap", "Student")
                .with_context(ContextName::Student)
                .enable(["reservations", "aircraft"])
                .customize("logbook", CustomNav::new().label("My Logbook").main())
                .enable(["training", "weather"])
                .disable("billing"),
            Role::new("private-pilot", "Private Pilot", "plane", "Pilot")
                .enable([
                    "aircraft",
                    "reservations",
                    "flights",
                    "logbook",
                    "squawks",
                    "fuelLogs",
                    "weather",
                    "notams",
                    "billing",
                ]),
            Role::new("flight-instructor", "Flight Instructor", "user-check", "CFI")
                .with_context(ContextName::Instructor)
                .enable(["reservations", "aircraft", "students"])
                .customize(
                    "training",
                    CustomNav::new().label("Student Progress").icon("award").main().order(5),
                )
                .enable(["logbook", "flights", "weather"])
                .customize(
                    "lesson-plans",
                    CustomNav::new()
                        .route("/lesson-plans")
                        .label("Lesson Plans")
                        .icon("book")
                        .custom_page()
                        .order(125),
                ),
        ],
    };

    let maintenance = RoleGroup {
        name: "Maintenance".to_string(),
        icon: "tool".to_string(),
        context: Some(ContextName::Maintenance),
        roles: vec![
            Role::new("mechanic", "Aircraft Mechanic", "wrench", "A&P Mechanic")
                .enable(["aircraft"])
                .customize("squawks", CustomNav::new().main().order(1))
                .enable(["maintenance", "workOrders", "inspections", "documents"])
                .customize(
                    "parts-inventory",
                    CustomNav::new()
                        .route("/parts")
                        .label("Parts Inventory")
                        .icon("package")
                        .custom_page()
                        .order(75),
                ),
            Role::new("inspector", "Inspector", "clipboard-check", "IA Inspector")
                .customize("inspections", CustomNav::new().main().order(2))
                .enable(["maintenance", "aircraft", "squawks"])
                .disable("dashboard"),
        ],
    };

    let operations = RoleGroup {
        name: "Operations".to_string(),
        icon: "briefcase".to_string(),
        context: None,
        roles: vec![
            Role::new("dispatcher", "Dispatcher", "radio", "Dispatch")
                .with_context(ContextName::Dispatch)
                .customize("reservations", CustomNav::new().main().order(1))
                .enable(["flights", "aircraft", "weather", "notams", "members"]),
            Role::new("aircraft-owner", "Aircraft Owner", "key", "Owner")
                .with_context(ContextName::Owner)
                .customize("aircraft", CustomNav::new().label("My Aircraft").main())
                .enable(["maintenance", "billing", "reports", "documents"]),
            Role::new("administrator", "Administrator", "shield", "Admin")
                .with_context(ContextName::Admin)
                .permission_required()
                .enable([
                    "aircraft",
                    "reservations",
                    "flights",
                    "squawks",
                    "maintenance",
                    "workOrders",
                    "inspections",
                    "members",
                    "instructors",
                    "students",
                    "training",
                    "billing",
                    "fuelLogs",
                    "reports",
                ])
                .customize(
                    "audit-log",
                    CustomNav::new()
                        .route("/admin/audit-log")
                        .label("Audit Log")
                        .icon("shield")
                        .custom_page()
                        .order(200),
                ),
            Role::new("guest", "Guest", "eye", "Guest")
                .hidden()
                .enable(["weather"])
                .disable("documents"),
        ],
    };

    RoleConfig { groups: vec![flight_operations, maintenance, operations] }
}

fn navigation_config() -> NavigationConfig {
    NavigationConfig {
        tab_bar: vec![
            NavigationItem::new("home", "Home", Some("/"), "home", 0)
                .describe("Your operations at a glance"),
            NavigationItem::new("schedule", "Schedule", Some("/schedule"), "calendar", 1)
                .describe("Reservations and instructor availability"),
            NavigationItem::new("messages", "Messages", Some("/messages"), "message-circle", 2)
                .describe("Conversations with members and staff"),
            NavigationItem::new("admin", "Admin", Some("/admin"), "shield", 3)
                .describe("Organisation settings and user management")
                .admin_only(),
            NavigationItem::new("more", "More", Some("/more"), "menu", 4),
        ],
        profile_menu: vec![
            NavigationItem::new("profile", "Profile", Some("/profile"), "user", 0)
                .describe("Your certificates, medical and contact details"),
            NavigationItem::new("settings", "Settings", Some("/settings"), "settings", 1)
                .describe("Preferences and notifications"),
            NavigationItem::new("switch-role", "Switch Role", Some("/switch-role"), "repeat", 2),
            NavigationItem::new("membership", "Membership", Some("/membership"), "star", 3)
                .describe("Plans and dues")
                .user_only(),
            NavigationItem::new("help", "Help", Some("/help"), "help-circle", 4)
                .describe("Guides and support"),
            NavigationItem::new("sign-out", "Sign Out", None, "log-out", 5),
        ],
        top_level: vec![
            NavigationItem::new("notifications", "Notifications", Some("/notifications"), "bell", 0)
                .describe("Alerts about your flights and aircraft"),
            NavigationItem::new("search", "Search", Some("/search"), "search", 1),
        ],
    }
}

fn hotkeys() -> Vec<HotkeyBinding> {
    vec![
        HotkeyBinding::new("open-search", &["mod+k", "/"], "Open search"),
        HotkeyBinding::new("toggle-sidebar", &["mod+b"], "Toggle the sidebar"),
        HotkeyBinding::new("go-dashboard", &["mod+shift+d"], "Go to dashboard")
            .for_entity("dashboard"),
        HotkeyBinding::new("go-aircraft", &["mod+shift+a"], "Go to aircraft")
            .for_entity("aircraft"),
        HotkeyBinding::new("go-reservations", &["mod+shift+r"], "Go to reservations")
            .for_entity("reservations"),
        HotkeyBinding::new("new-reservation", &["mod+n"], "Create a reservation")
            .for_entity("reservations"),
        HotkeyBinding::new("go-squawks", &["mod+shift+s"], "Go to squawks").for_entity("squawks"),
        HotkeyBinding::new("go-maintenance", &["mod+shift+m"], "Go to maintenance")
            .for_entity("maintenance"),
    ]
}
