//! fieldgraph: GraphQL schema synthesis for custom-field content models.
//!
//! Loads a content model (post types, taxonomies, field groups and stored
//! field values) from JSON, runs the schema construction pass and prints
//! the SDL of the resulting GraphQL schema. With `--item`, also resolves
//! every custom field of that item and prints the values as JSON. With
//! `--query`, executes a GraphQL query against the schema instead.
//!
//! Usage:
//!   fieldgraph --model library.json --config fieldgraph.toml
//!   fieldgraph --model library.json --item 42
//!   fieldgraph --model library.json --query '{ book(id: 42) { coverImage { raw } } }'

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fieldgraph_model::{ContentItem, ItemId};
use fieldgraph_schema::{
    BoundSchema, DynamicSchemaRegistry, InMemorySchemaRegistry, SchemaBinder, SchemaConfig,
    StaticContentModel,
};
use serde_json::{Map, Value};
use tracing::{Level, debug, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "fieldgraph")]
#[command(about = "Synthesize a GraphQL schema from a custom-field content model")]
struct Args {
    /// Path to the JSON content model
    #[arg(short, long)]
    model: PathBuf,

    /// Path to the TOML schema config
    #[arg(short, long, default_value = "fieldgraph.toml")]
    config: PathBuf,

    /// Resolve all custom fields of this content item
    #[arg(short, long, conflicts_with = "query")]
    item: Option<ItemId>,

    /// Execute a GraphQL query and print the response
    #[arg(short, long)]
    query: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = SchemaConfig::load_from(&args.config);
    let model = StaticContentModel::load(&args.model)
        .with_context(|| format!("failed to load content model {:?}", args.model))?;

    let mut registry = DynamicSchemaRegistry::new();
    let bound = SchemaBinder::with_config(config)
        .bind(&model, &model, &mut registry)
        .context("schema construction failed")?;
    let schema = registry
        .finish()
        .context("failed to assemble the GraphQL schema")?;
    info!(
        types = bound.types().len(),
        fields = bound.field_count(),
        "Schema ready"
    );
    debug!(types = ?bound.types().type_names().collect::<Vec<_>>(), "Composite types");

    if let Some(query) = args.query {
        let response = schema.execute(query.as_str()).await;
        for error in &response.errors {
            warn!("Query error: {}", error.message);
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&response).context("failed to encode the response")?
        );
        return Ok(());
    }

    print!("{}", schema.sdl());

    if let Some(item_id) = args.item {
        let values = resolve_item(registry.declarations(), &bound, item_id);
        println!();
        println!(
            "{}",
            serde_json::to_string_pretty(&values).context("failed to encode field values")?
        );
    }

    Ok(())
}

/// Resolves every custom field of every exposed post type for one item,
/// keyed by post type and field name. Fields that fail to resolve are
/// logged and reported as null.
fn resolve_item(
    registry: &InMemorySchemaRegistry,
    schema: &BoundSchema,
    item_id: ItemId,
) -> Value {
    let mut by_post_type = Map::new();
    for post_type in schema.exposed() {
        let item = ContentItem {
            id: item_id,
            post_type: post_type.slug.clone(),
        };
        let mut fields = Map::new();
        for field in registry.fields_of(&post_type.single_name) {
            let value = match (field.resolver)(&item) {
                Ok(value) => value,
                Err(e) => {
                    warn!(owner = %post_type.single_name, field = %field.name, "Failed to resolve field: {}", e);
                    Value::Null
                }
            };
            fields.insert(field.name.clone(), value);
        }
        if !fields.is_empty() {
            by_post_type.insert(post_type.single_name.clone(), Value::Object(fields));
        }
    }
    Value::Object(by_post_type)
}
