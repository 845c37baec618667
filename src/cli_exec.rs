use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};

use appreg::graph::{ApplicationQuery, DirectoryApi, GraphClient};
use appreg::model::{ApplicationSummary, SettingKey, Settings};
use appreg::services::FILTER_NEEDS_EVENTUAL;
use appreg::tree::sort_by_display_name;

use crate::cli_commands::{ListArgs, LoginArgs, ManifestArgs};
use crate::{Commands, Globals, SettingsCommands};

pub(crate) fn handle_command(globals: &Globals, command: Commands) -> Result<()> {
    match command {
        Commands::List(args) => handle_list_command(globals, args),
        Commands::Manifest(args) => handle_manifest_command(globals, args),
        Commands::Login(args) => handle_login_command(globals, args),
        Commands::Settings { command } => handle_settings_command(globals, command),
    }
}

fn client(globals: &Globals) -> Result<GraphClient> {
    GraphClient::new(&globals.graph_url, globals.credentials())
}

/// The listing the tree would show for these settings, in display order.
fn list_query(settings: &Settings, args: &ListArgs) -> Result<ApplicationQuery> {
    let name_prefix = args
        .filter
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    if name_prefix.is_some() && !settings.use_eventual_consistency {
        bail!(FILTER_NEEDS_EVENTUAL);
    }
    Ok(ApplicationQuery {
        owned_only: !(args.all || settings.show_all_applications),
        name_prefix,
        max_results: settings.maximum_results,
        eventual_consistency: settings.use_eventual_consistency,
    })
}

fn handle_list_command(globals: &Globals, args: ListArgs) -> Result<()> {
    let settings = globals.store.read()?;
    let query = list_query(&settings, &args)?;
    let api = client(globals)?;
    let mut apps: Vec<ApplicationSummary> = api
        .list_applications(&query)
        .context("list applications")?;
    if !query.eventual_consistency {
        sort_by_display_name(&mut apps);
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&apps).context("serialize applications json")?
        );
        return Ok(());
    }
    if apps.is_empty() {
        println!("No applications");
    }
    for app in apps {
        println!("{} {}", app.id, app.display_name.unwrap_or_default());
    }
    Ok(())
}

fn handle_manifest_command(globals: &Globals, args: ManifestArgs) -> Result<()> {
    let api = client(globals)?;
    let manifest = api
        .get_manifest(&args.object_id)
        .with_context(|| format!("load manifest of {}", args.object_id))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&manifest).context("serialize manifest")?
    );
    Ok(())
}

fn handle_login_command(globals: &Globals, args: LoginArgs) -> Result<()> {
    let credentials = globals.credentials();
    credentials.sign_in(args.tenant.as_deref(), &|line| eprintln!("{}", line))?;
    let api: Arc<dyn DirectoryApi> = Arc::new(GraphClient::new(
        &globals.graph_url,
        Arc::clone(&credentials),
    )?);
    match api.signed_in_user() {
        Ok(me) => println!("Signed in as {}", me.label()),
        Err(err) => {
            tracing::warn!(error = %format!("{:#}", err), "could not read the signed-in user");
            println!("Signed in");
        }
    }
    Ok(())
}

fn handle_settings_command(globals: &Globals, command: SettingsCommands) -> Result<()> {
    match command {
        SettingsCommands::Show { json } => {
            let settings = globals.store.read()?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&settings).context("serialize settings json")?
                );
            } else {
                println!("file: {}", globals.store.path().display());
                for key in SettingKey::ALL {
                    println!("{}: {}", key.name(), settings.get(key));
                }
            }
        }
        SettingsCommands::Set { key, value } => {
            let parsed = SettingKey::parse(&key).ok_or_else(|| {
                let known: Vec<&str> = SettingKey::ALL.iter().map(|k| k.name()).collect();
                anyhow!("unknown setting '{}' (one of: {})", key, known.join(", "))
            })?;
            let mut settings = globals.store.read()?;
            settings.set(parsed, &value).map_err(|msg| anyhow!(msg))?;
            globals.store.write(&settings)?;
            println!("{} = {}", parsed.name(), settings.get(parsed));
        }
    }
    Ok(())
}
