use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the data directory with:
/// - An initial `config.json` file with default settings
/// - A `finance.sqlite` database at the current schema version
///
/// # Arguments
/// - `finance_home` - The directory that will be the root of data directory, e.g. `$HOME/finance`
///
/// # Errors
/// - Returns an error if any file operations fail or if the directory was already initialized.
pub async fn init(finance_home: &Path) -> Result<Out<()>> {
    let config = Config::create(finance_home).await?;
    Ok(format!(
        "Successfully created the finance directory at '{}'",
        config.root().display()
    )
    .into())
}
