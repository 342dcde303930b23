use waypoint::config::Config;
use waypoint::http::response::StatusCode;
use waypoint::{json, Engine};

#[tokio::main]
async fn main() -> anyhow::Result<()>{
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    let engine = build(&cfg);

    tokio::select! {
        res = engine.run(&cfg.server.listen_addr) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

fn build(cfg: &Config) -> Engine {
    let engine = Engine::with_default_middleware();

    if let Some(assets) = &cfg.static_files {
        engine.static_files(&assets.mount, assets.root.clone());
    }

    engine.get("/", |c| {
        c.html(StatusCode::Ok, "<h1>Hello Waypoint</h1>");
    });

    engine.get("/panic", |c| {
        let names = vec!["waypoint".to_string()];
        // index out of range, answered by recovery
        c.string(StatusCode::Ok, &names[100]);
    });

    let v1 = engine.group("/v1");
    v1.get("/hello", |c| {
        let name = c.query("name").unwrap_or_default();
        let body = format!("hello {}, you're at {}\n", name, c.path);
        c.string(StatusCode::Ok, body);
    });
    v1.get("/hello/:name", |c| {
        let body = format!("hello {}, you're at {}\n", c.param("name").unwrap_or_default(), c.path);
        c.string(StatusCode::Ok, body);
    });
    v1.post("/login", |c| {
        let body = json!({
            "username": c.post_form("username"),
            "password": c.post_form("password"),
        });
        c.json(StatusCode::Ok, &body);
    });

    let v2 = engine.group("/v2");
    v2.use_middleware([waypoint::handler(|c| {
        if c.header("Authorization").is_none() {
            c.fail(StatusCode::Unauthorized, "unauthorized");
        }
    })]);
    v2.get("/assets/*filepath", |c| {
        let body = json!({ "filepath": c.param("filepath") });
        c.json(StatusCode::Ok, &body);
    });

    engine
}
