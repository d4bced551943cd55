//! End-to-end reconciliation tests over the JSON-backed store.
//!
//! These drive the full read and write paths the way a caller would:
//! persistent store on disk, a real stack directory, and an env file that
//! users edit out-of-band.

use stackenv_core::{MASK_PLACEHOLDER, Variable};
use stackenv_service::{EnvVarService, FileSync, JsonFileStore, StackScope};
use tempfile::TempDir;

struct Fixture {
    service: EnvVarService<JsonFileStore>,
    _root: TempDir,
    stack_dir: std::path::PathBuf,
}

fn fixture(stack: &str) -> Fixture {
    let root = TempDir::new().unwrap();
    let stacks_dir = root.path().join("stacks");
    let stack_dir = stacks_dir.join(stack);
    std::fs::create_dir_all(&stack_dir).unwrap();

    let store = JsonFileStore::new(root.path().join("variables.json"));
    Fixture {
        service: EnvVarService::new(store, stacks_dir),
        _root: root,
        stack_dir,
    }
}

#[test]
fn full_write_read_cycle_with_persistent_store() {
    let fx = fixture("web");
    let scope = StackScope::new("web");

    let outcome = fx
        .service
        .set_variables(
            &scope,
            vec![
                Variable::plain("DATABASE_URL", "postgres://localhost/app"),
                Variable::secret("API_KEY", "k-123"),
            ],
        )
        .unwrap();
    assert_eq!(outcome.count, 2);
    assert_eq!(outcome.file_sync, FileSync::Written);

    let view = fx.service.variables(&scope).unwrap();
    assert_eq!(
        view,
        vec![
            Variable::plain("DATABASE_URL", "postgres://localhost/app"),
            Variable::secret("API_KEY", MASK_PLACEHOLDER),
        ]
    );

    // The file mirror carries raw values so the stack can actually run.
    let env = std::fs::read_to_string(fx.stack_dir.join(".env")).unwrap();
    assert!(env.contains("API_KEY=k-123"));
}

#[test]
fn user_comments_survive_repeated_writes() {
    let fx = fixture("web");
    let scope = StackScope::new("web");
    std::fs::write(
        fx.stack_dir.join(".env"),
        "# database settings\nDATABASE_URL=old\n\n# api\nAPI_KEY=old-key\n",
    )
    .unwrap();

    for value in ["first", "second"] {
        fx.service
            .set_variables(
                &scope,
                vec![
                    Variable::plain("DATABASE_URL", value),
                    Variable::plain("API_KEY", "fixed"),
                ],
            )
            .unwrap();
    }

    let env = std::fs::read_to_string(fx.stack_dir.join(".env")).unwrap();
    assert!(env.starts_with("# database settings\n"));
    assert!(env.contains("\n# api\n"));
    assert!(env.contains("DATABASE_URL=second"));
}

#[test]
fn masked_secret_survives_echoed_update_across_processes() {
    let root = TempDir::new().unwrap();
    let stacks_dir = root.path().join("stacks");
    std::fs::create_dir_all(stacks_dir.join("web")).unwrap();
    let store_path = root.path().join("variables.json");
    let scope = StackScope::new("web");

    // First "process" stores the secret.
    {
        let service = EnvVarService::new(
            JsonFileStore::new(store_path.clone()),
            stacks_dir.clone(),
        );
        service
            .set_variables(&scope, vec![Variable::secret("TOKEN", "raw-token")])
            .unwrap();
    }

    // A second "process" echoes the masked view back.
    let service = EnvVarService::new(JsonFileStore::new(store_path), stacks_dir.clone());
    let view = service.variables(&scope).unwrap();
    assert_eq!(view[0].value, MASK_PLACEHOLDER);
    service.set_variables(&scope, view).unwrap();

    let env = std::fs::read_to_string(stacks_dir.join("web").join(".env")).unwrap();
    assert_eq!(env, "TOKEN=raw-token\n");
}

#[test]
fn unreadable_env_file_degrades_to_store_only_view() {
    let fx = fixture("web");
    let scope = StackScope::new("web");

    fx.service
        .set_variables(&scope, vec![Variable::plain("PORT", "8080")])
        .unwrap();

    // An env path that cannot be read as a file (here: a directory) must
    // fall back to the store-only view, not error.
    let env_path = fx.stack_dir.join(".env");
    std::fs::remove_file(&env_path).unwrap();
    std::fs::create_dir(&env_path).unwrap();

    let view = fx.service.variables(&scope).unwrap();
    assert_eq!(view, vec![Variable::plain("PORT", "8080")]);
}

#[test]
fn unwritable_env_file_reports_failed_file_sync_but_write_succeeds() {
    let fx = fixture("web");
    let scope = StackScope::new("web");

    // A directory squatting on the env path makes the mirror write fail.
    std::fs::create_dir(fx.stack_dir.join(".env")).unwrap();

    let outcome = fx
        .service
        .set_variables(&scope, vec![Variable::plain("A", "1")])
        .unwrap();
    assert_eq!(outcome.file_sync, FileSync::Failed);

    // The store write still took effect.
    let raw = fx
        .service
        .variables(&scope)
        .unwrap();
    assert_eq!(raw, vec![Variable::plain("A", "1")]);
}
