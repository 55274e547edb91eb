//! Handler factories example for type-injector.
//!
//! Demonstrates:
//! - Building an injector once from long-lived values
//! - Injecting handler factories that capture their dependencies
//! - Wrapping handlers with an injected middleware
//! - Fallible factories with `try_inject()`
//! - Reporting a missing dependency
//!
//! Run with: `RUST_LOG=type_injector=debug cargo run --example handler_factories`

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;
use type_injector::{must, InjectError, Injector};

type Handler = Box<dyn Fn(&str) -> String>;

#[derive(Debug)]
struct Templates {
    pages: HashMap<&'static str, &'static str>,
}

impl Templates {
    fn render(&self, page: &str, name: &str) -> String {
        self.pages
            .get(page)
            .map(|t| t.replace("{}", name))
            .unwrap_or_else(|| format!("no template: {page}"))
    }
}

#[derive(Debug, Default)]
struct Database {
    users: Mutex<Vec<String>>,
}

#[derive(Debug, Clone)]
struct AccessLog(Arc<Mutex<Vec<String>>>);

fn home(templates: Arc<Templates>) -> Handler {
    Box::new(move |visitor: &str| templates.render("home", visitor))
}

fn signup(templates: Arc<Templates>, db: Arc<Database>) -> Handler {
    Box::new(move |user: &str| {
        let mut users = db.users.lock().unwrap();
        users.push(user.to_string());
        format!("{} (#{})", templates.render("welcome", user), users.len())
    })
}

fn logged(log: AccessLog) -> impl Fn(&'static str, Handler) -> Handler {
    move |route, next| {
        let log = log.clone();
        Box::new(move |arg: &str| {
            log.0.lock().unwrap().push(format!("{route} {arg}"));
            next(arg)
        })
    }
}

fn admin(templates: Arc<Templates>) -> Result<Handler, String> {
    if !templates.pages.contains_key("admin") {
        return Err("admin template is not configured".to_string());
    }
    Ok(Box::new(move |user: &str| templates.render("admin", user)))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== type-injector: Handler Factories ===\n");

    // -------------------------------------------------------------------------
    // 1. Build the injector from long-lived values
    // -------------------------------------------------------------------------
    println!("1. Building the injector...");

    let templates = Templates {
        pages: HashMap::from([("home", "Hello, {}!"), ("welcome", "Welcome aboard, {}")]),
    };
    let log = AccessLog(Arc::default());

    let di = Injector::builder()
        .provide(Arc::new(templates))
        .provide(Arc::new(Database::default()))
        .provide(log.clone())
        .build()
        .unwrap();

    println!("   {:?}", di);

    // -------------------------------------------------------------------------
    // 2. Inject handler factories
    // -------------------------------------------------------------------------
    println!("\n2. Injecting handler factories...");

    let wrap = must(di.inject(logged));
    let routes: Vec<(&str, Handler)> = vec![
        ("/", wrap("/", must(di.inject(home)))),
        ("/signup", wrap("/signup", must(di.inject(signup)))),
    ];

    for (route, handler) in &routes {
        for arg in ["alice", "bob"] {
            println!("   {route:<8} {arg:<6} -> {}", handler(arg));
        }
    }

    println!("   access log: {:?}", log.0.lock().unwrap());

    // -------------------------------------------------------------------------
    // 3. Fallible factories
    // -------------------------------------------------------------------------
    println!("\n3. Injecting a fallible factory with try_inject()...");

    match di.try_inject(admin) {
        Ok(handler) => println!("   admin -> {}", handler("root")),
        Err(e) => println!("   Error (expected): {}", e),
    }

    // -------------------------------------------------------------------------
    // 4. Missing dependencies
    // -------------------------------------------------------------------------
    println!("\n4. Injecting a factory with a missing dependency...");

    match di.inject(|port: u16| format!("listening on {port}")) {
        Err(e @ InjectError::MissingDependency { .. }) => println!("   Error (expected): {}", e),
        other => println!("   Unexpected: {:?}", other),
    }

    println!("\n=== Example Complete ===");
}
