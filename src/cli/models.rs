//! Models command implementation

use crate::cli::output::{format_models_json, format_models_table, model_views};
use crate::cli::{IdArgs, ListArgs, ModelsAddArgs, ModelsEditArgs};
use crate::config::{SettingsStore, VidnoteConfig};

/// Handle `vidnote models list`
pub fn handle_models_list(
    args: &ListArgs,
    config: &VidnoteConfig,
) -> Result<String, Box<dyn std::error::Error>> {
    let views = model_views(config);
    if args.json {
        Ok(format_models_json(&views)?)
    } else {
        Ok(format_models_table(&views))
    }
}

/// Handle `vidnote models add`
pub fn handle_models_add(
    args: &ModelsAddArgs,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let model = store.add_model(&args.name, &args.value, args.description.as_deref())?;
    Ok(format!(
        "✓ Added model {} ({}) as {}",
        model.name, model.value, model.id
    ))
}

/// Handle `vidnote models edit`
pub fn handle_models_edit(
    args: &ModelsEditArgs,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    if args.name.is_none() && args.value.is_none() && args.description.is_none() {
        return Err("Nothing to change. Pass --name, --value or --description.".into());
    }
    let model = store.edit_model(
        &args.id,
        args.name.as_deref(),
        args.value.as_deref(),
        args.description.as_deref(),
    )?;
    Ok(format!("✓ Updated model {} ({})", model.name, model.value))
}

/// Handle `vidnote models remove`
pub fn handle_models_remove(
    args: &IdArgs,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    let removed = store.remove_model(&args.id)?;
    Ok(format!(
        "✓ Removed model {} (default: {})",
        removed.name,
        store.config().generation.default_model
    ))
}

/// Handle `vidnote models enable` / `vidnote models disable`
pub fn handle_models_set_enabled(
    args: &IdArgs,
    enabled: bool,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    store.set_model_enabled(&args.id, enabled)?;
    let state = if enabled { "Enabled" } else { "Disabled" };
    Ok(format!("✓ {} model {}", state, args.id))
}

/// Handle `vidnote models default`
pub fn handle_models_default(
    args: &IdArgs,
    store: &mut SettingsStore,
) -> Result<String, Box<dyn std::error::Error>> {
    store.set_default_model(&args.id)?;
    Ok(format!(
        "✓ Default model is now {}",
        store.config().generation.default_model
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SettingsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("vidnote.toml")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_models_list_table() {
        let output =
            handle_models_list(&ListArgs { json: false }, &VidnoteConfig::default()).unwrap();
        assert!(output.contains("API Value"));
        assert!(output.contains("sora-2"));
    }

    #[test]
    fn test_models_add_edit_default_remove() {
        let (_dir, mut store) = temp_store();
        handle_models_add(
            &ModelsAddArgs {
                name: "Veo".to_string(),
                value: "veo-2".to_string(),
                description: None,
            },
            &mut store,
        )
        .unwrap();
        let id = store.config().models.last().unwrap().id.clone();

        handle_models_edit(
            &ModelsEditArgs {
                id: id.clone(),
                name: None,
                value: Some("veo-3".to_string()),
                description: None,
            },
            &mut store,
        )
        .unwrap();

        let out = handle_models_default(&IdArgs { id: "veo-3".to_string() }, &mut store).unwrap();
        assert!(out.ends_with("veo-3"));

        let out = handle_models_remove(&IdArgs { id }, &mut store).unwrap();
        assert!(out.contains("default: sora-2"));
    }

    #[test]
    fn test_models_edit_requires_a_change() {
        let (_dir, mut store) = temp_store();
        let err = handle_models_edit(
            &ModelsEditArgs {
                id: "x".to_string(),
                name: None,
                value: None,
                description: None,
            },
            &mut store,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Nothing to change"));
    }

    #[test]
    fn test_models_remove_builtin_fails() {
        let (_dir, mut store) = temp_store();
        assert!(handle_models_remove(
            &IdArgs {
                id: "sora-2".to_string()
            },
            &mut store
        )
        .is_err());
    }
}
