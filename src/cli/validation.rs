use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid page, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive number of seconds".to_string());
        }
    }
    if let Some(raw) = args.site.as_deref() {
        reqwest::Url::parse(raw.trim()).map_err(|e| format!("invalid --site '{raw}': {e}"))?;
    }
    if let Some(raw) = args.output_format.as_deref() {
        if crate::output::OutputFormat::parse(raw).is_none() {
            return Err(format!(
                "invalid --output-format '{raw}', expected text, json or html"
            ));
        }
    }
    if let Some(raw) = args.error_mode.as_deref() {
        if crate::view::ErrorMode::parse(raw).is_none() {
            return Err(format!(
                "invalid --error-mode '{raw}', expected fallback or surface"
            ));
        }
    }
    if let Some(raw) = args.header.as_deref() {
        crate::runner::parse_header(raw).map_err(|e| e.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::validate;
    use crate::cli::args::CliArgs;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["recipe-feed"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn accepts_defaults() {
        assert!(validate(&args(&[])).is_ok());
    }

    #[test]
    fn rejects_page_zero_and_zero_timeout() {
        assert!(validate(&args(&["--page", "0"])).is_err());
        assert!(validate(&args(&["--timeout", "0"])).is_err());
    }

    #[test]
    fn rejects_unknown_modes_and_formats() {
        assert!(validate(&args(&["--error-mode", "loud"])).is_err());
        assert!(validate(&args(&["--output-format", "xml"])).is_err());
        assert!(validate(&args(&["-e", "surface", "-f", "html"])).is_ok());
    }

    #[test]
    fn rejects_malformed_header_and_site() {
        assert!(validate(&args(&["--header", "nocolon"])).is_err());
        assert!(validate(&args(&["--site", "postmanoil"])).is_err());
    }
}
