use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use formadmin::config::{ClientConfig, ENV_BASE_URL, ENV_CSRF_HEADER, ENV_CSRF_TOKEN, ENV_TIMEOUT_SECS};
use formadmin::services::assignments::{assign_to_many, AssignmentTemplate};
use formadmin::services::categories::{self, CategoryUpdate, NewCategory};
use formadmin::services::fields::post_fields_batch;
use formadmin::services::forms;
use formadmin::services::pages::{self, NewPage};
use formadmin::services::http::{ApiClient, RequestOptions};
use formadmin::services::{BatchOptions, Record};

#[derive(Parser)]
#[command(name = "formadmin", about = "Forms admin backend client")]
struct Cli {
    /// Backend URL [env: FORMADMIN_BASE_URL]
    #[arg(long)]
    base_url: Option<String>,

    /// [env: FORMADMIN_CSRF_TOKEN]
    #[arg(long)]
    csrf_token: Option<String>,

    /// [env: FORMADMIN_CSRF_HEADER]
    #[arg(long)]
    csrf_header: Option<String>,

    /// [env: FORMADMIN_TIMEOUT_SECS]
    #[arg(long)]
    timeout_secs: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the fields listed in a JSON array file under a page
    Fields {
        #[arg(long)]
        page: String,
        #[arg(long)]
        file: PathBuf,
        /// Requests in flight at once (sequential when omitted)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Assign forms to several users, one request per user
    Assign {
        #[arg(long = "user", required = true)]
        users: Vec<String>,
        #[arg(long = "form", required = true)]
        forms: Vec<String>,
        #[arg(long)]
        replace: bool,
        #[arg(long)]
        concurrency: Option<usize>,
    },
    #[command(subcommand)]
    Forms(FormsCommand),
    #[command(subcommand)]
    Pages(PagesCommand),
    #[command(subcommand)]
    Categories(CategoriesCommand),
}

#[derive(Subcommand)]
enum FormsCommand {
    List,
    Get { id: String },
    Duplicate { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum PagesCommand {
    List {
        #[arg(long)]
        form: Option<String>,
    },
    Add {
        #[arg(long)]
        form: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Keep the form's index version
        #[arg(long)]
        no_bump: bool,
    },
}

#[derive(Subcommand)]
enum CategoriesCommand {
    List,
    Get { id: String },
    Create {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        descripcion: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        descripcion: Option<String>,
    },
    Delete { id: String },
}

impl Cli {
    /// Command-line value for a config key; the environment fills the rest.
    fn setting(&self, key: &str) -> Option<String> {
        let flag = match key {
            ENV_BASE_URL => &self.base_url,
            ENV_CSRF_TOKEN => &self.csrf_token,
            ENV_CSRF_HEADER => &self.csrf_header,
            ENV_TIMEOUT_SECS => &self.timeout_secs,
            _ => return None,
        };
        flag.clone().or_else(|| std::env::var(key).ok())
    }
}

fn batch_options(cancel: &CancellationToken, concurrency: Option<usize>) -> BatchOptions {
    let options = BatchOptions::new().with_cancel(cancel.clone());
    match concurrency {
        Some(limit) => options.with_concurrency(limit),
        None => options,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_lookup(|key| cli.setting(key)).context("reading configuration")?;

    let client = ApiClient::new(&config).context("building API client")?;
    tracing::info!(base_url = client.base_url(), "formadmin ready");

    // Ctrl+C cancels whatever is in flight.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            on_signal.cancel();
        }
    });

    match cli.command {
        Command::Fields { page, file, concurrency } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let records: Vec<Record> = serde_json::from_str(&raw)
                .with_context(|| format!("{} must hold a JSON array of objects", file.display()))?;

            let outcome = post_fields_batch(&client, &page, &records, &batch_options(&cancel, concurrency)).await?;
            print_json(&outcome)?;
        }
        Command::Assign { users, forms, replace, concurrency } => {
            let template = AssignmentTemplate {
                formularios: forms,
                replace: replace.then_some(true),
            };
            let outcome = assign_to_many(&client, &users, &template, &batch_options(&cancel, concurrency)).await?;
            print_json(&outcome)?;
        }
        Command::Forms(cmd) => {
            let options = RequestOptions::with_cancel(cancel.clone());
            match cmd {
                FormsCommand::List => print_json(&forms::list_forms(&client, options).await?)?,
                FormsCommand::Get { id } => print_json(&forms::get_form(&client, &id, options).await?)?,
                FormsCommand::Duplicate { id } => print_json(&forms::duplicate_form(&client, &id, options).await?)?,
                FormsCommand::Delete { id } => {
                    forms::delete_form(&client, &id, options).await?;
                    tracing::info!(id = %id, "form deleted");
                }
            }
        }
        Command::Pages(cmd) => {
            let options = RequestOptions::with_cancel(cancel.clone());
            match cmd {
                PagesCommand::List { form } => print_json(&pages::list_pages(&client, form.as_deref(), options).await?)?,
                PagesCommand::Add { form, title, description, no_bump } => {
                    let mut page = NewPage::new(title, description);
                    if no_bump {
                        page = page.without_bump();
                    }
                    print_json(&pages::create_page(&client, &form, &page, options).await?)?
                }
            }
        }
        Command::Categories(cmd) => {
            let options = RequestOptions::with_cancel(cancel.clone());
            match cmd {
                CategoriesCommand::List => print_json(&categories::list_categories(&client, options).await?)?,
                CategoriesCommand::Get { id } => match categories::get_category(&client, &id, options).await? {
                    Some(category) => print_json(&category)?,
                    None => anyhow::bail!("category {} not found", id),
                },
                CategoriesCommand::Create { nombre, descripcion } => {
                    let category = NewCategory { nombre, descripcion };
                    print_json(&categories::create_category(&client, &category, options).await?)?
                }
                CategoriesCommand::Update { id, nombre, descripcion } => {
                    let changes = CategoryUpdate { nombre, descripcion };
                    print_json(&categories::update_category(&client, &id, &changes, options).await?)?
                }
                CategoriesCommand::Delete { id } => {
                    categories::delete_category(&client, &id, options).await?;
                    tracing::info!(id = %id, "category deleted");
                }
            }
        }
    }

    Ok(())
}
