pub mod analyze;
pub mod ids;
pub mod serve;

use std::path::Path;

use collabhub_core::ErrorCode;
use collabhub_core::config::{CollabConfig, load_config};

use crate::output::{CliError, OutputMode, render_error};

/// Print `err` as a coded CLI error and hand it back for propagation.
pub fn report<E>(output: OutputMode, code: ErrorCode, err: E) -> anyhow::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    if let Err(render_err) = render_error(output, &CliError::from_code(code, err.to_string())) {
        return render_err;
    }
    anyhow::Error::new(err)
}

/// Load `--config`, else `./collabhub.toml`, else defaults.
///
/// # Errors
///
/// Returns the config error after reporting it.
pub fn load_settings(
    explicit: Option<&Path>,
    cwd: &Path,
    output: OutputMode,
) -> anyhow::Result<CollabConfig> {
    load_config(explicit, cwd).map_err(|err| report(output, err.code(), err))
}
