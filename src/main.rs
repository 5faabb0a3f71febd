use std::path::PathBuf;

use anyhow::{Context, anyhow};
use boucherie_cms::{
    ContentStore, SiteDocument,
    config::Config,
    image::{ImageSource, attach_image},
    patch::{CategoryPatch, ContactPatch, HeroPatch, NewCategory, NewProduct, ProductPatch},
    storage::SqliteStorage,
};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

#[derive(Parser)]
struct Opts {
    #[clap(short, long, env = "BOUCHERIE_CMS_CONFIG")]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the catalog summary
    Show,
    /// Print one product as JSON
    Product { id: String },
    /// Write data-YYYY-MM-DD.json
    Export {
        #[clap(long)]
        out_dir: Option<PathBuf>,
    },
    /// Replace the whole document with the content of a JSON file
    Import { file: PathBuf },
    /// Replace cached content with the baseline document
    Reset,
    /// Patch the hero section, e.g. '{"title":"…"}'
    Hero { patch: String },
    /// Patch the contact block, e.g. '{"phone":"…"}'
    Contact { patch: String },
    AddCategory {
        #[clap(long)]
        title: String,
        #[clap(long)]
        description: String,
        #[clap(long, default_value = "")]
        image: String,
        #[clap(long = "item")]
        items: Vec<String>,
    },
    UpdateCategory { id: String, patch: String },
    DeleteCategory { id: String },
    AddProduct {
        #[clap(long)]
        category: String,
        /// Product draft as JSON, e.g. '{"name":"…","description":"…"}'
        draft: String,
    },
    UpdateProduct { id: String, patch: String },
    DeleteProduct { id: String },
    /// Print an image file as an embedded data URL
    AttachImage { path: PathBuf },
}

fn print_summary(document: &SiteDocument) {
    println!("{}", document.hero_section.title);
    println!("  {}", document.hero_section.subtitle);
    println!(
        "  background: {}",
        ImageSource::classify(&document.hero_section.background_image)
    );
    for category in &document.categories {
        println!(
            "[{}] {} ({} products, image: {})",
            category.id,
            category.title,
            category.products.len(),
            ImageSource::classify(&category.image)
        );
        for product in &category.products {
            println!(
                "    [{}] {} {} {}",
                product.id, product.name, product.weight, product.price_per_kg
            );
        }
    }
    for service in &document.services {
        println!("* {}: {}", service.title, service.description);
    }
    let contact = &document.contact;
    println!("{} / {} / {}", contact.address, contact.phone, contact.email);
    println!(
        "  weekdays {} | saturday {} | sunday {}",
        contact.hours.weekdays, contact.hours.saturday, contact.hours.sunday
    );
}

fn parse_json<T: serde::de::DeserializeOwned>(text: &str, what: &str) -> anyhow::Result<T> {
    serde_json::from_str(text).with_context(|| format!("parse {what}"))
}

fn changed(applied: bool, what: &str) -> anyhow::Result<()> {
    if applied {
        info!("{what}: saved to local storage; export to publish");
        Ok(())
    } else {
        Err(anyhow!("{what}: no matching entry"))
    }
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    let config = match &opts.config {
        Some(path) => {
            let config = tokio::fs::read_to_string(path)
                .await
                .with_context(|| "read config")?;
            serde_yaml::from_str::<Config>(&config)
                .with_context(|| format!("parse config from {}", path.display()))?
        }
        None => Config::default(),
    };
    config.validate().map_err(|msg| anyhow!("{msg}"))?;

    let storage = SqliteStorage::open(&config.storage)
        .await
        .with_context(|| format!("open storage {}", config.storage))?;
    let mut store = ContentStore::init(storage, config.store_options()).await;

    let result = execute(&mut store, opts.command, &config).await;
    if store.has_unsaved_changes() {
        warn!(
            key = store.storage_key(),
            "unsaved changes: kept in local storage but not exported; run `export` to publish"
        );
    }
    store.dispose().close().await;
    result
}

async fn execute(
    store: &mut ContentStore<SqliteStorage>,
    command: Command,
    config: &Config,
) -> anyhow::Result<()> {
    match command {
        Command::Show => print_summary(store.export_data()?),
        Command::Product { id } => {
            let product = store
                .get_product_by_id(&id)
                .ok_or_else(|| anyhow!("no product with id {id}"))?;
            println!("{}", serde_json::to_string_pretty(product)?);
        }
        Command::Export { out_dir } => {
            store.save_all_changes();
            let dir = out_dir.unwrap_or_else(|| config.export_dir.clone());
            let path = store.export_to_dir(&dir).await?;
            println!("{}", path.display());
        }
        Command::Import { file } => {
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("read {}", file.display()))?;
            store.import_json(&text).await?;
        }
        Command::Reset => store.reset_to_baseline().await?,
        Command::Hero { patch } => {
            let patch: HeroPatch = parse_json(&patch, "hero patch")?;
            changed(store.update_hero_section(&patch).await, "hero")?;
        }
        Command::Contact { patch } => {
            let patch: ContactPatch = parse_json(&patch, "contact patch")?;
            changed(store.update_contact(&patch).await, "contact")?;
        }
        Command::AddCategory {
            title,
            description,
            image,
            items,
        } => {
            let draft = NewCategory {
                title,
                description,
                image,
                items,
                products: Vec::new(),
            };
            draft.validate()?;
            let id = store
                .add_category(draft)
                .await
                .ok_or_else(|| anyhow!("category was not added"))?;
            println!("{id}");
        }
        Command::UpdateCategory { id, patch } => {
            let patch: CategoryPatch = parse_json(&patch, "category patch")?;
            changed(store.update_category(&id, &patch).await, "category")?;
        }
        Command::DeleteCategory { id } => {
            changed(store.delete_category(&id).await, "category")?;
        }
        Command::AddProduct { category, draft } => {
            let draft = parse_json::<NewProduct>(&draft, "product draft")?.validate()?;
            let id = store
                .add_product(&category, draft)
                .await
                .ok_or_else(|| anyhow!("no category with id {category}"))?;
            println!("{id}");
        }
        Command::UpdateProduct { id, patch } => {
            let patch: ProductPatch = parse_json(&patch, "product patch")?;
            changed(store.update_product(&id, &patch).await, "product")?;
        }
        Command::DeleteProduct { id } => {
            changed(store.delete_product(&id).await, "product")?;
        }
        Command::AttachImage { path } => {
            let attachment = attach_image(&path).await?;
            info!(?attachment, "attached");
            println!("{}", attachment.data_url);
        }
    }
    Ok(())
}

fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(?e, "failed to start runtime");
            std::process::exit(1);
        }
    };
    if let Err(e) = runtime.block_on(run(opts)) {
        error!(?e, "critical error");
        std::process::exit(1);
    }
}
