//! Form stub server: standalone development server.
//!
//! In-memory implementation of the endpoints `formkit-client` calls. It
//! serves one form schema and validates every create/update with the
//! same engine the client-side session uses.
//!
//! Storage is in-memory (DashMap) with no persistence; data is lost on
//! restart.
//!
//! | Variable              | Default                  |
//! |-----------------------|--------------------------|
//! | `FORMKIT_STUB_PORT`   | `3000`                   |
//! | `FORMKIT_SCHEMA_PATH` | bundled onboarding form  |
//! | `RUST_LOG`            | `info`                   |

mod routes;
mod store;

use std::net::SocketAddr;

use anyhow::Context;
use formkit_core::FormSchema;
use formkit_validate::SchemaValidator;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

const BUNDLED_SCHEMA: &str = include_str!("../schema/onboarding.json");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("FORMKIT_STUB_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(3000);

    let schema = load_schema(std::env::var("FORMKIT_SCHEMA_PATH").ok().as_deref())?;
    let validator = SchemaValidator::new(schema).context("schema has invalid field rules")?;
    tracing::info!(
        title = %validator.schema().title,
        fields = validator.schema().fields.len(),
        "schema loaded"
    );

    let state = store::AppState::new(validator);
    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("formkit-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;
    Ok(())
}

fn load_schema(path: Option<&str>) -> anyhow::Result<FormSchema> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schema file {path}"))?,
        None => BUNDLED_SCHEMA.to_string(),
    };
    serde_json::from_str(&text).context("schema file is not a valid form schema")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_schema_loads_and_compiles() {
        let schema = load_schema(None).unwrap();
        assert_eq!(schema.title, "Employee Onboarding");
        assert!(SchemaValidator::new(schema).is_ok());
    }

    #[test]
    fn missing_schema_file_is_an_error() {
        let err = load_schema(Some("/nonexistent/formkit/schema.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read schema file"));
    }
}
