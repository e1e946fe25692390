use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use directories::ProjectDirs;
use galerie_application::ViewController;
use galerie_core::Catalog;
use galerie_storage::{Storage, read_catalog_file};
use galerie_ui::{Ui, UiExit};

const CATALOG_ENV: &str = "GALERIE_CATALOG";

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let project_dirs =
        ProjectDirs::from("dev", "galerie", "galerie").context("resolve project dirs")?;

    let config_dir = project_dirs.config_dir();
    fs::create_dir_all(config_dir)
        .with_context(|| format!("create config dir {}", config_dir.display()))?;

    let db_path = config_dir.join("galerie.db");
    let mut storage = Storage::open(&db_path)?;
    log::info!("using database {}", db_path.display());

    let import = catalog_import_path(std::env::var_os(CATALOG_ENV));
    let catalog = Arc::new(load_catalog(&mut storage, import.as_deref())?);
    let mut settings = storage.load_settings()?;

    loop {
        let controller = ViewController::new(Arc::clone(&catalog), settings.page_size);
        let mut ui = Ui::new(controller, settings);
        let outcome = ui.run()?;
        settings = outcome.settings;
        storage.save_settings(&settings)?;

        match outcome.exit {
            UiExit::Quit => break,
            UiExit::Reload => {
                log::info!("restarting session with page size {}", settings.page_size);
            }
        }
    }

    Ok(())
}

/// Path named by `GALERIE_CATALOG`, ignoring an empty value.
fn catalog_import_path(raw: Option<OsString>) -> Option<PathBuf> {
    raw.filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn load_catalog(storage: &mut Storage, import: Option<&Path>) -> anyhow::Result<Catalog> {
    let Some(path) = import else {
        return storage.load_or_seed_catalog();
    };

    let catalog = read_catalog_file(path)?;
    log::info!(
        "importing catalog from {} ({} items)",
        path.display(),
        catalog.items().len()
    );
    storage.replace_catalog(&catalog)?;
    Ok(catalog)
}
