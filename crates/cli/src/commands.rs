//! Command handlers.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to the service layer.
//! - Wrap the full-set-replace write API in read-modify-write for the
//!   single-variable commands.
//!
//! Does NOT handle:
//! - Argument definitions (see `args` module).
//! - Rendering (see `output` module).

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use stackenv_core::Variable;
use stackenv_service::paths::{default_store_path, resolve_stacks_dir};
use stackenv_service::{
    EnvVarService, FileSync, JsonFileStore, StackScope, VariableStore, WriteOutcome,
};

use crate::args::{Cli, Commands};
use crate::output::{OutputFormat, render_variables};

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let format = OutputFormat::parse(&cli.output)?;
    let store_path = match cli.store_path {
        Some(path) => path,
        None => default_store_path()?,
    };
    let stacks_dir = match cli.stacks_dir {
        Some(dir) => dir,
        None => resolve_stacks_dir()?,
    };
    let service = EnvVarService::new(JsonFileStore::new(store_path), stacks_dir);

    match cli.command {
        Commands::List { stack } => {
            let scope = scope(stack, cli.env);
            let view = service.variables(&scope)?;
            println!("{}", render_variables(&view, format)?);
        }
        Commands::Get { stack, key } => {
            let scope = scope(stack, cli.env);
            let view = service.variables(&scope)?;
            let var = view
                .iter()
                .find(|v| v.key == key)
                .with_context(|| format!("Variable '{}' is not set for {}", key, scope))?;
            println!("{}", var.value);
        }
        Commands::Set {
            stack,
            key,
            value,
            secret,
        } => {
            let scope = scope(stack, cli.env);
            let outcome = upsert(&service, &scope, key, value, secret)?;
            report_write(&scope, &outcome);
        }
        Commands::Unset { stack, key } => {
            let scope = scope(stack, cli.env);
            let outcome = remove(&service, &scope, &key)?;
            report_write(&scope, &outcome);
        }
        Commands::Apply { stack, file } => {
            let scope = scope(stack, cli.env);
            let vars = read_apply_input(file)?;
            let outcome = service.set_variables(&scope, vars)?;
            report_write(&scope, &outcome);
        }
    }

    Ok(())
}

fn scope(stack: String, environment: Option<i64>) -> StackScope {
    StackScope {
        stack,
        environment,
    }
}

/// Adds or updates one variable by submitting the full current set with
/// the entry upserted. Masked secrets in the fetched view pass through
/// untouched; the service resolves them against stored values.
fn upsert<S: VariableStore>(
    service: &EnvVarService<S>,
    scope: &StackScope,
    key: String,
    value: String,
    secret: bool,
) -> Result<WriteOutcome> {
    let mut vars = service.variables(scope)?;
    match vars.iter_mut().find(|v| v.key == key) {
        Some(var) => {
            var.value = value;
            var.is_secret = secret;
        }
        None => vars.push(Variable {
            key,
            value,
            is_secret: secret,
        }),
    }
    Ok(service.set_variables(scope, vars)?)
}

/// Removes one variable by submitting the full current set without it.
fn remove<S: VariableStore>(
    service: &EnvVarService<S>,
    scope: &StackScope,
    key: &str,
) -> Result<WriteOutcome> {
    let mut vars = service.variables(scope)?;
    let before = vars.len();
    vars.retain(|v| v.key != key);
    if vars.len() == before {
        anyhow::bail!("Variable '{}' is not set for {}", key, scope);
    }
    Ok(service.set_variables(scope, vars)?)
}

/// Reads the `apply` payload from a file or stdin.
fn read_apply_input(file: Option<PathBuf>) -> Result<Vec<Variable>> {
    let input = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read variables from stdin")?;
            buf
        }
    };
    serde_json::from_str(&input)
        .context("Invalid variables JSON: expected an array of {key, value, isSecret} objects")
}

fn report_write(scope: &StackScope, outcome: &WriteOutcome) {
    match outcome.file_sync {
        FileSync::Written => {}
        FileSync::SkippedNoStackDir => {
            tracing::warn!(
                scope = %scope,
                "Stack directory not found; variables saved to the store only"
            );
        }
        // The service already logged the failure with the path.
        FileSync::Failed => {}
    }
    println!("Saved {} variable(s) for {}", outcome.count, scope);
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackenv_core::MASK_PLACEHOLDER;
    use stackenv_service::MemoryStore;
    use tempfile::TempDir;

    fn service_with_stack(stack: &str) -> (EnvVarService<MemoryStore>, TempDir) {
        let stacks = TempDir::new().unwrap();
        std::fs::create_dir_all(stacks.path().join(stack)).unwrap();
        (
            EnvVarService::new(MemoryStore::new(), stacks.path().to_path_buf()),
            stacks,
        )
    }

    #[test]
    fn test_upsert_keeps_other_variables_and_secrets() {
        let (service, _stacks) = service_with_stack("web");
        let scope = StackScope::new("web");

        service
            .set_variables(
                &scope,
                vec![
                    Variable::secret("TOKEN", "raw-token"),
                    Variable::plain("PORT", "8080"),
                ],
            )
            .unwrap();

        upsert(&service, &scope, "HOST".to_string(), "0.0.0.0".to_string(), false).unwrap();

        let view = service.variables(&scope).unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(
            view.iter().find(|v| v.key == "TOKEN").unwrap().value,
            MASK_PLACEHOLDER
        );
        assert_eq!(view.iter().find(|v| v.key == "HOST").unwrap().value, "0.0.0.0");

        // The untouched secret still holds its raw value in the store.
        let raw = service.store().read_variables(&scope, true).unwrap();
        assert_eq!(
            raw.iter().find(|v| v.key == "TOKEN").unwrap().value,
            "raw-token"
        );
    }

    #[test]
    fn test_upsert_updates_existing_value() {
        let (service, _stacks) = service_with_stack("web");
        let scope = StackScope::new("web");

        service
            .set_variables(&scope, vec![Variable::plain("PORT", "8080")])
            .unwrap();
        upsert(&service, &scope, "PORT".to_string(), "9090".to_string(), false).unwrap();

        let view = service.variables(&scope).unwrap();
        assert_eq!(view, vec![Variable::plain("PORT", "9090")]);
    }

    #[test]
    fn test_remove_drops_only_the_named_key() {
        let (service, _stacks) = service_with_stack("web");
        let scope = StackScope::new("web");

        service
            .set_variables(
                &scope,
                vec![Variable::plain("A", "1"), Variable::plain("B", "2")],
            )
            .unwrap();
        remove(&service, &scope, "A").unwrap();

        let view = service.variables(&scope).unwrap();
        assert_eq!(view, vec![Variable::plain("B", "2")]);
    }

    #[test]
    fn test_remove_unknown_key_fails_without_writing() {
        let (service, _stacks) = service_with_stack("web");
        let scope = StackScope::new("web");

        service
            .set_variables(&scope, vec![Variable::plain("A", "1")])
            .unwrap();

        assert!(remove(&service, &scope, "MISSING").is_err());
        let view = service.variables(&scope).unwrap();
        assert_eq!(view, vec![Variable::plain("A", "1")]);
    }

    #[test]
    fn test_apply_input_accepts_wire_shape() {
        let vars: Vec<Variable> = serde_json::from_str(
            r#"[{"key":"A","value":"1"},{"key":"S","value":"***","isSecret":true}]"#,
        )
        .unwrap();
        assert_eq!(vars[0], Variable::plain("A", "1"));
        assert_eq!(vars[1], Variable::secret("S", "***"));
    }
}
