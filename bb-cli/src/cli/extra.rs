use bb_api::{auth::Credentials, bwfilter::BWFilter};
use dialoguer::{theme::ColorfulTheme, Password};
use log::debug;

use crate::error::CliError;

/// Filter built from `--include`/`--exclude` style flags.
///
/// When neither flag was used, the filter from the config file is kept as is.
pub fn filter_from_flags(
    include: &[String],
    exclude: &[String],
    configured: &BWFilter,
) -> BWFilter {
    if include.is_empty() && exclude.is_empty() {
        return configured.clone();
    }

    debug!("Filter overridden from command line: +{include:?} -{exclude:?}");

    let non_empty = |list: &[String]| (!list.is_empty()).then(|| list.to_vec());
    BWFilter::new(non_empty(include), non_empty(exclude))
}

/// Asks for the cookie header of a logged in browser session.
pub fn prompt_cookie() -> Result<Credentials, CliError> {
    let cookie: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt("Session cookie")
        .interact()?;

    Ok(Credentials::new(cookie)?)
}
