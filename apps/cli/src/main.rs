use std::{process::ExitCode, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    query::collect_all_tags, ContactsController, ControllerEvent, HttpContactStore, PhoneKey,
    UiErrorCategory,
};
use shared::domain::ContactId;
use tokio::sync::broadcast;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "contacts", about = "Manage contacts stored on a contacts server")]
struct Args {
    /// Overrides the configured server base url.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every contact.
    List,
    /// Show a single contact.
    Show { id: ContactId },
    /// Find contacts whose name starts with QUERY.
    Search { query: String },
    /// List every tag in use.
    Tags,
    /// Show contacts carrying TAG.
    Filter { tag: String },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    Edit {
        id: ContactId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Tags to add.
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Drop existing tags before adding any given with --tag.
        #[arg(long)]
        clear_tags: bool,
    },
    Delete {
        id: ContactId,
        /// Confirms the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let mut settings = load_settings();
    if let Some(url) = &args.server_url {
        settings.api_base_url = url.clone();
    }
    init_tracing(&settings.log_filter);

    match run(args.command, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, settings: &Settings) -> Result<()> {
    let store = HttpContactStore::new(&settings.api_base_url, settings.request_timeout())
        .context("failed to set up contacts client")?;
    debug!(
        api_base_url = %settings.api_base_url,
        timeout_secs = settings.request_timeout_secs,
        "cli: connecting to contacts server"
    );
    let mut controller = ContactsController::new(Arc::new(store), settings.search_snapshot_ttl());
    let mut events = controller.subscribe_events();
    controller.start().await?;

    let result = execute(&mut controller, command).await;
    print_notices(&mut events);
    result
}

async fn execute(controller: &mut ContactsController, command: Command) -> Result<()> {
    match command {
        Command::List => print_main(controller),
        Command::Show { id } => {
            let contact = controller.select_search_result(&id).await?;
            println!("{}", render::card(&contact));
        }
        Command::Search { query } => {
            controller.open_search();
            controller.search_input(&query).await?;
            if let Some(surface) = controller.views().search_surface() {
                println!("{}", render::search_surface(surface));
            }
        }
        Command::Tags => {
            let tags = collect_all_tags(controller.views().snapshot());
            println!("{}", render::tags(&tags));
        }
        Command::Filter { tag } => {
            controller.filter_by_tag(&tag).await?;
            print_main(controller);
        }
        Command::Add {
            name,
            email,
            phone,
            tags,
        } => {
            controller.open_add_form().await?;
            let form = controller.form_mut();
            form.set_full_name(name);
            form.set_email(email);
            for c in phone.chars() {
                form.phone_key(PhoneKey::Char(c));
            }
            for tag in &tags {
                form.select_tag(tag);
            }
            submit(controller).await?;
        }
        Command::Edit {
            id,
            name,
            email,
            phone,
            tags,
            clear_tags,
        } => {
            controller.open_edit_form(&id).await?;
            let form = controller.form_mut();
            if let Some(name) = name {
                form.set_full_name(name);
            }
            if let Some(email) = email {
                form.set_email(email);
            }
            if let Some(phone) = phone {
                form.set_phone(&phone);
            }
            if clear_tags {
                form.clear_tags();
            }
            for tag in &tags {
                form.select_tag(tag);
            }
            submit(controller).await?;
        }
        Command::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete contact {id} without --yes");
            }
            controller.delete_contact(&id).await?;
            print_main(controller);
        }
    }
    Ok(())
}

async fn submit(controller: &mut ContactsController) -> Result<()> {
    match controller.submit_form().await {
        Ok(contact) => {
            println!("{}", render::card(&contact));
            Ok(())
        }
        Err(err) if err.category() == UiErrorCategory::Validation => {
            let inline = render::field_errors(controller.form());
            controller.cancel_form();
            if inline.is_empty() {
                bail!(err);
            }
            bail!("{inline}");
        }
        Err(err) => {
            controller.cancel_form();
            Err(err.into())
        }
    }
}

fn print_main(controller: &ContactsController) {
    let views = controller.views();
    println!(
        "{}",
        render::main_surface(views.base_view(), &views.main_surface())
    );
}

fn print_notices(events: &mut broadcast::Receiver<ControllerEvent>) {
    while let Ok(event) = events.try_recv() {
        if let ControllerEvent::Notice(notice) = event {
            println!("{notice}");
        }
    }
}
