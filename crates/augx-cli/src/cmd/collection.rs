use crate::output::{print_json, print_table};
use anyhow::Context;
use augx_core::collection::{Collection, CreateOptions, MetadataUpdate, ModuleRef};
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand)]
pub enum CollectionSubcommand {
    /// Create a new collection manifest (overwrites an existing one)
    Create {
        name: String,
        /// Manifest version
        #[arg(long, default_value = "1.0.0")]
        version: String,
        /// Human-readable title (default: title-cased name)
        #[arg(long = "display-name")]
        display_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Initial module ids (repeatable: --module core/logging --module web/http)
        #[arg(long = "module")]
        modules: Vec<String>,
    },
    /// List all collections
    List,
    /// Show a collection and its modules
    Info { name: String },
    /// Append a module reference (duplicates are allowed)
    AddModule {
        name: String,
        /// Module id, conventionally <category>/<name>
        id: String,
        /// Accepted semver range
        #[arg(long, default_value = ModuleRef::DEFAULT_VERSION_RANGE)]
        version: String,
        /// Mark the module as optional instead of required
        #[arg(long)]
        optional: bool,
    },
    /// Remove every module entry with the given id
    RemoveModule { name: String, id: String },
    /// Update top-level metadata fields
    Update {
        name: String,
        #[arg(long)]
        version: Option<String>,
        #[arg(long = "display-name")]
        display_name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a collection and its directory (idempotent)
    Delete { name: String },
}

pub fn run(root: &Path, subcmd: CollectionSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CollectionSubcommand::Create {
            name,
            version,
            display_name,
            description,
            modules,
        } => create(root, &name, version, display_name, description, modules, json),
        CollectionSubcommand::List => list(root, json),
        CollectionSubcommand::Info { name } => info(root, &name, json),
        CollectionSubcommand::AddModule {
            name,
            id,
            version,
            optional,
        } => add_module(root, &name, &id, &version, optional, json),
        CollectionSubcommand::RemoveModule { name, id } => remove_module(root, &name, &id, json),
        CollectionSubcommand::Update {
            name,
            version,
            display_name,
            description,
        } => update(root, &name, version, display_name, description, json),
        CollectionSubcommand::Delete { name } => delete(root, &name, json),
    }
}

fn create(
    root: &Path,
    name: &str,
    version: String,
    display_name: Option<String>,
    description: Option<String>,
    modules: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let collection = Collection::create(
        root,
        name,
        CreateOptions {
            version: Some(version),
            display_name,
            description,
            modules,
        },
    )
    .with_context(|| format!("failed to create collection '{name}'"))?;

    if json {
        print_json(&serde_json::json!({
            "path": Collection::manifest_path(root, name),
            "collection": collection,
        }))
    } else {
        println!(
            "created collection '{}' with {} module(s) at {}",
            collection.name,
            collection.modules.len(),
            Collection::manifest_path(root, name).display()
        );
        Ok(())
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let collections = Collection::list(root).context("failed to list collections")?;

    if json {
        return print_json(&collections);
    }

    let rows = collections
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.version.clone(),
                c.modules.len().to_string(),
                c.display_name.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["NAME", "VERSION", "MODULES", "DISPLAY NAME"], rows);
    Ok(())
}

fn info(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let collection = Collection::load(root, name)
        .with_context(|| format!("failed to load collection '{name}'"))?;

    if json {
        return print_json(&collection);
    }

    println!("{} v{}", collection.name, collection.version);
    if let Some(display_name) = &collection.display_name {
        println!("  display name: {display_name}");
    }
    if let Some(description) = &collection.description {
        println!("  description:  {description}");
    }
    let rows = collection
        .modules
        .iter()
        .map(|m| {
            vec![
                m.id.clone(),
                m.version.clone(),
                if m.required { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect();
    print_table(&["MODULE", "VERSION", "REQUIRED"], rows);
    Ok(())
}

fn add_module(
    root: &Path,
    name: &str,
    id: &str,
    version: &str,
    optional: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut collection = Collection::load(root, name)
        .with_context(|| format!("failed to load collection '{name}'"))?;
    collection.add_module(ModuleRef::with_version(id, version, !optional));
    collection.save(root).context("failed to save collection")?;

    if json {
        print_json(&collection)
    } else {
        println!("added module '{id}' ({version}) to '{name}'");
        Ok(())
    }
}

fn remove_module(root: &Path, name: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let mut collection = Collection::load(root, name)
        .with_context(|| format!("failed to load collection '{name}'"))?;
    let removed = collection.remove_module(id);
    collection.save(root).context("failed to save collection")?;

    if json {
        print_json(&serde_json::json!({
            "removed": removed,
            "collection": collection,
        }))
    } else {
        println!("removed {removed} entry(s) for '{id}' from '{name}'");
        Ok(())
    }
}

fn update(
    root: &Path,
    name: &str,
    version: Option<String>,
    display_name: Option<String>,
    description: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let update = MetadataUpdate {
        version,
        display_name,
        description,
    };
    anyhow::ensure!(!update.is_empty(), "nothing to update: pass at least one field");

    let mut collection = Collection::load(root, name)
        .with_context(|| format!("failed to load collection '{name}'"))?;
    collection.update_metadata(update);
    collection.save(root).context("failed to save collection")?;

    if json {
        print_json(&collection)
    } else {
        println!("updated collection '{name}'");
        Ok(())
    }
}

fn delete(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    Collection::delete(root, name)
        .with_context(|| format!("failed to delete collection '{name}'"))?;

    if json {
        print_json(&serde_json::json!({ "deleted": name }))
    } else {
        println!("deleted collection '{name}'");
        Ok(())
    }
}
