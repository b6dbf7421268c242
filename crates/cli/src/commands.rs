//! Command definitions and execution
//!
//! Every command opens the entity's panel in a [`NavigationShell`] backed by
//! headless widgets, then drives its [`GridController`] exactly as the
//! console buttons would.

use crate::config::ConsoleConfig;
use crate::render;
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use gridkeeper_client::{ApiClient, OptionLoader};
use gridkeeper_core::{ConsoleResult, Identifier};
use gridkeeper_grid::{GridController, GridWidget, HeadlessWidgets, NavigationShell, Outcome};
use gridkeeper_schema::{Catalog, EntityDescriptor, FieldInput, FormInput};
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================================
// Command line
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "gridkeeper",
    version,
    about = "Manage users, permissions and organizational units from the terminal"
)]
pub struct Cli {
    /// Configuration file (defaults to ./gridkeeper.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "GRIDKEEPER_BASE_URL")]
    pub base_url: Option<String>,

    /// Session token sent as the auth cookie
    #[arg(long, global = true, env = "GRIDKEEPER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the entity types the console manages
    Entities,

    /// Show the grid of an entity type
    List {
        /// Entity type, e.g. `divisions` or `roles`
        entity: String,
    },

    /// Create a record through the add form
    Create {
        entity: String,

        #[command(flatten)]
        input: FormArgs,
    },

    /// Edit a record through the edit form
    Update {
        entity: String,

        /// Identifier of the row (id, or username for users)
        id: String,

        #[command(flatten)]
        input: FormArgs,
    },

    /// Delete a record
    Delete { entity: String, id: String },

    /// Show the records related to a row
    Related {
        entity: String,
        id: String,

        /// Relation field, e.g. `users` or `roles`
        relation: String,
    },
}

/// Form input given on the command line
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FormArgs {
    /// Set a form field
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Select picker values, comma separated
    #[arg(long = "pick", value_name = "PICKER=V1,V2", value_parser = parse_assignment)]
    pub pick: Vec<(String, String)>,
}

fn parse_assignment(input: &str) -> std::result::Result<(String, String), String> {
    match input.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", input)),
    }
}

impl Cli {
    /// Configuration file merged with command-line overrides
    pub fn load_config(&self) -> ConsoleResult<ConsoleConfig> {
        Ok(ConsoleConfig::load(self.config.as_deref())?
            .with_overrides(self.base_url.clone(), self.token.clone()))
    }
}

// ============================================================================
// Execution
// ============================================================================

/// Run a parsed command
pub async fn execute(command: Command, config: ConsoleConfig) -> Result<()> {
    let catalog = Catalog::builtin().context("Failed to build the entity catalog")?;
    let api = config.api_client();
    tracing::debug!("Using backend {}", api.base_url());

    match command {
        Command::Entities => {
            print!("{}", render::entity_table(&catalog));
            Ok(())
        }
        Command::List { entity } => {
            let mut panel = Panel::open(&catalog, &api, &config, &entity)?;
            panel.reveal().await?;
            panel.print_grid();
            Ok(())
        }
        Command::Create { entity, input } => {
            let mut panel = Panel::open(&catalog, &api, &config, &entity)?;
            panel.reveal().await?;
            let opened = panel.controller()?.open_add().await;
            panel.require(opened, "open the add form")?;
            panel.fill(&input)?;
            let outcome = panel.controller()?.save().await;
            panel.finish(outcome, "create")
        }
        Command::Update { entity, id, input } => {
            let mut panel = Panel::open(&catalog, &api, &config, &entity)?;
            panel.reveal().await?;
            let id = panel.identifier(&id)?;
            let opened = panel.controller()?.open_edit(&id).await;
            panel.require(opened, &format!("edit '{}'", id))?;
            panel.fill(&input)?;
            let outcome = panel.controller()?.save().await;
            panel.finish(outcome, "update")
        }
        Command::Delete { entity, id } => {
            let mut panel = Panel::open(&catalog, &api, &config, &entity)?;
            panel.reveal().await?;
            let id = panel.identifier(&id)?;
            let asked = panel.controller()?.request_delete(&id);
            panel.require(asked, &format!("delete '{}'", id))?;
            let outcome = panel.controller()?.confirm_delete().await;
            panel.finish(outcome, "delete")
        }
        Command::Related {
            entity,
            id,
            relation,
        } => {
            let mut panel = Panel::open(&catalog, &api, &config, &entity)?;
            panel.reveal().await?;
            let id = panel.identifier(&id)?;
            let shown = panel.controller()?.show_related(&id, &relation);
            panel.require(shown, &format!("show {} of '{}'", relation, id))?;
            if let Some(listing) = panel.handles.viewer.last() {
                print!("{}", render::listing_text(&listing));
            }
            Ok(())
        }
    }
}

/// One entity panel driven from the command line
struct Panel {
    key: String,
    descriptor: EntityDescriptor,
    shell: NavigationShell,
    handles: HeadlessWidgets,
}

impl Panel {
    fn open(
        catalog: &Catalog,
        api: &ApiClient,
        config: &ConsoleConfig,
        name: &str,
    ) -> Result<Self> {
        let entry = catalog.find(name)?;
        let descriptor = entry.descriptor.clone();

        let mut options = OptionLoader::new();
        for source in descriptor.picker_sources() {
            match catalog.get(source) {
                Some(other) => {
                    options.register(source, Arc::new(api.collection(&other.descriptor)))
                }
                None => tracing::warn!("Picker source '{}' is not a known entity type", source),
            }
        }

        let handles = HeadlessWidgets::new();
        let controller = GridController::for_entry(
            entry,
            Arc::new(api.collection(&descriptor)),
            handles.widgets(),
        )?
        .with_option_loader(options)
        .with_update_failure(config.behaviour.update_failure);

        let mut shell =
            NavigationShell::new().with_reload_on_reveal(config.behaviour.reload_on_reveal);
        shell.add_panel(controller);

        Ok(Self {
            key: descriptor.key.clone(),
            descriptor,
            shell,
            handles,
        })
    }

    fn controller(&mut self) -> Result<&mut GridController> {
        self.shell
            .controller_mut(&self.key)
            .ok_or_else(|| anyhow!("No panel for '{}'", self.key))
    }

    /// Resolve operator input against the loaded rows
    fn identifier(&mut self, input: &str) -> Result<Identifier> {
        let controller = self.controller()?;
        Ok(controller
            .find_row(input)
            .unwrap_or_else(|| Identifier::parse(input)))
    }

    /// Show and load the panel
    async fn reveal(&mut self) -> Result<()> {
        let outcome = self.shell.reveal(&self.key).await?;
        self.print_notices();
        if outcome == Outcome::Failed {
            bail!("Could not load {}", self.descriptor.name);
        }
        Ok(())
    }

    /// Type the command-line input into the open form and pickers
    fn fill(&mut self, input: &FormArgs) -> Result<()> {
        for (name, value) in &input.set {
            let Some(field) = self.descriptor.field(name) else {
                if self.descriptor.picker(name).is_some() {
                    bail!("'{}' is a picker, use --pick {}=...", name, name);
                }
                bail!("{} has no field '{}'", self.descriptor.name, name);
            };
            let value = match field.input {
                FieldInput::Checkbox { .. } => FormInput::Checked(parse_flag(value)?),
                _ => FormInput::Text(value.clone()),
            };
            self.handles.form.set(name, value);
        }

        for (name, values) in &input.pick {
            if self.descriptor.picker(name).is_none() {
                bail!("{} has no picker '{}'", self.descriptor.name, name);
            }
            let values: Vec<String> = values
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            if !self.handles.pickers.select(name, values) {
                bail!("Options for picker '{}' could not be loaded", name);
            }
        }
        Ok(())
    }

    /// Require an applied outcome for a step that talks to no server
    fn require(&self, outcome: Outcome, what: &str) -> Result<()> {
        self.print_notices();
        match outcome {
            Outcome::Applied => Ok(()),
            _ => bail!("Cannot {} on {}", what, self.descriptor.name),
        }
    }

    /// Report the result of a write
    fn finish(&self, outcome: Outcome, what: &str) -> Result<()> {
        self.print_notices();
        match outcome {
            Outcome::Applied => {
                println!("{} {}d.", self.descriptor.name, what);
                self.print_grid();
                Ok(())
            }
            Outcome::Invalid => bail!("{} input rejected", self.descriptor.name),
            Outcome::Failed => bail!("{} {} failed", self.descriptor.name, what),
            Outcome::Ignored => bail!("Nothing to {}", what),
        }
    }

    fn print_grid(&self) {
        if !self.handles.grid.is_created() || self.handles.grid.column_count() == 0 {
            println!("No {} records.", self.descriptor.name.to_lowercase());
            return;
        }
        print!(
            "{}",
            render::grid_table(&self.handles.grid.columns(), &self.handles.grid.cells())
        );
    }

    fn print_notices(&self) {
        for notice in self.handles.notifier.drain() {
            eprintln!("{}", render::notice_line(&notice));
        }
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" | "" => Ok(false),
        other => Err(anyhow!("expected true or false, got '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "gridkeeper",
            "create",
            "divisions",
            "--set",
            "code=D1",
            "--set",
            "name=Division One",
            "--pick",
            "users=jdoe,asmith",
        ])
        .unwrap();
        match cli.command {
            Command::Create { entity, input } => {
                assert_eq!(entity, "divisions");
                assert_eq!(
                    input.set,
                    vec![
                        ("code".to_string(), "D1".to_string()),
                        ("name".to_string(), "Division One".to_string())
                    ]
                );
                assert_eq!(input.pick, vec![("users".to_string(), "jdoe,asmith".to_string())]);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gridkeeper",
            "delete",
            "users",
            "jdoe",
            "--base-url",
            "http://10.0.0.5:9000",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.5:9000"));
        assert!(matches!(cli.command, Command::Delete { ref id, .. } if id == "jdoe"));
    }

    #[test]
    fn test_bad_assignment_is_refused() {
        let parsed = Cli::try_parse_from(["gridkeeper", "create", "roles", "--set", "rolename"]);
        assert!(parsed.is_err());
        assert!(Cli::try_parse_from(["gridkeeper", "create", "roles", "--set", "=x"]).is_err());
    }

    #[test]
    fn test_related_requires_relation() {
        assert!(Cli::try_parse_from(["gridkeeper", "related", "divisions", "1"]).is_err());
        assert!(Cli::try_parse_from(["gridkeeper", "related", "divisions", "1", "users"]).is_ok());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("Yes").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_unknown_field_is_refused() {
        let catalog = Catalog::builtin().unwrap();
        let config = ConsoleConfig::default();
        let mut panel = Panel::open(&catalog, &config.api_client(), &config, "roles").unwrap();
        let input = FormArgs {
            set: vec![("colour".into(), "red".into())],
            pick: Vec::new(),
        };
        let err = panel.fill(&input).unwrap_err();
        assert!(err.to_string().contains("has no field 'colour'"));
    }
}
