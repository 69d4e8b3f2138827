mod bootstrap;
mod console;
mod report;

use std::io;

use anyhow::{bail, Context, Result};
use sales_core::settings::Settings;
use sales_data::reader::load_sales_file;
use sales_data::store::RecordStore;
use sales_runtime::store_cache::StoreCache;
use sales_ui::app::App;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let logs_dir = bootstrap::ensure_directories()?;
    let log_file = bootstrap::resolve_log_file(&settings.mode, settings.log_file.as_deref(), &logs_dir);
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("UrbanMart v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data: {}, Mode: {}, Top N: {}, Theme: {}",
        settings.data_file.display(),
        settings.mode,
        settings.top_n,
        settings.theme
    );

    let top_n = settings.top_n as usize;

    match settings.mode.as_str() {
        "dashboard" => {
            let app = App::new(&settings.theme, StoreCache::new(settings.data_file.clone()), top_n);
            app.run()?;
        }

        "summary" => {
            let store = load(&settings)?;
            let mut out = io::stdout().lock();
            report::print_full_report(&mut out, &store)?;
            if store.report().has_issues() {
                report::print_data_quality(&mut out, store.report())?;
            }
        }

        "console" => {
            let store = load(&settings)?;
            let mut out = io::stdout().lock();
            report::print_full_report(&mut out, &store)?;
            let ctx = console::MenuContext { store: &store, top_n };
            console::run_menu(&ctx, io::stdin().lock(), &mut out)?;
        }

        unknown => bail!("unknown mode: {unknown}"),
    }

    tracing::info!("UrbanMart exiting");
    Ok(())
}

/// Load the data file for the printing modes; a failure ends the process
/// with a non-zero status.
fn load(settings: &Settings) -> Result<RecordStore> {
    load_sales_file(&settings.data_file).with_context(|| {
        format!(
            "could not load sales data from '{}'; place the file there or pass --data-file",
            settings.data_file.display()
        )
    })
}
