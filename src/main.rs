//! locale-kit - look up countries, currencies, area codes and language tags
//!
//! Usage:
//!   locale-kit country <code> [locale]         # alpha-2, alpha-3 or numeric
//!   locale-kit currency <code>                 # alpha-3 or numeric
//!   locale-kit area-code [code]                # countries sharing a calling code
//!   locale-kit language <tag> [display-locale]
//!   locale-kit accept [header]                 # defaults to HTTP_ACCEPT_LANGUAGE
//!
//! Optional environment variables:
//! - LOCALE_KIT_DEFAULT_LOCALE (overrides the OS locale)
//! - LOCALE_KIT_FALLBACK_LOCALE (defaults to en)
//! - HTTP_ACCEPT_LANGUAGE
//!
//! Results are printed to stdout as JSON.

use anyhow::{Context, Result};
use locale_kit::{AreaCode, Country, Currency, Language};
use serde_json::{json, Value};
use tracing::info;

fn print_usage() {
    println!(
        r#"locale-kit - country, currency, area-code and language-tag lookups

USAGE:
    locale-kit <COMMAND> [ARGS]

COMMANDS:
    country <code> [locale]          Country by alpha-2, alpha-3 or numeric code
    currency <code>                  Currency by alpha-3 or numeric code
    area-code [code]                 Countries sharing a telephone area code,
                                     or every area code when omitted
    language <tag> [display-locale]  Canonical form, subtags and display names
    accept [header]                  Negotiate an Accept-Language header
    help                             Show this message
"#
    );
}

fn country_command(code: &str, locale: Option<&str>) -> Result<Value> {
    let country = Country::new(code).with_context(|| format!("Unknown country '{}'", code))?;
    Ok(json!({
        "country": country,
        "name": country.name(locale),
        "area_code": country.area_code().ok(),
    }))
}

fn currency_command(code: &str) -> Result<Value> {
    let currency = Currency::new(code).with_context(|| format!("Unknown currency '{}'", code))?;
    let countries: Vec<String> = currency
        .countries()
        .context("Failed to resolve currency countries")?
        .iter()
        .map(|country| country.name(None))
        .collect();

    Ok(json!({
        "currency": currency,
        "country_names": countries,
    }))
}

fn area_code_command(code: Option<&str>) -> Result<Value> {
    let Some(code) = code else {
        let codes: Vec<u32> = AreaCode::codes().collect();
        return Ok(json!({ "area_codes": codes }));
    };

    let code: u32 = code
        .parse()
        .with_context(|| format!("Area code must be a number, got '{}'", code))?;
    let countries = AreaCode::by_code(code).context("Area code lookup failed")?;
    Ok(json!({
        "area_code": code,
        "countries": countries,
    }))
}

fn language_command(tag: &str, display_locale: Option<&str>) -> Value {
    let language = Language::new(tag);
    json!({
        "language": language,
        "display": {
            "language": language.display_language(display_locale),
            "region": language.display_region(display_locale),
            "script": language.display_script(display_locale),
        },
        "spoken_primary": Language::spoken_primary(Some(&language)),
    })
}

fn accept_command(header: Option<&str>) -> Value {
    let language = Language::from_http_header(header);
    json!({ "language": language })
}

fn main() -> Result<()> {
    // Load .env file (optional)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_kit=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return Ok(());
    }

    let command = &args[1];
    let arg = |idx: usize| args.get(idx).map(String::as_str);
    let required = |idx: usize, name: &str| {
        arg(idx).with_context(|| format!("Missing <{}> for '{}'", name, command))
    };

    let output = match command.as_str() {
        "country" => country_command(required(2, "code")?, arg(3))?,
        "currency" => currency_command(required(2, "code")?)?,
        "area-code" => area_code_command(arg(2))?,
        "language" => language_command(required(2, "tag")?, arg(3)),
        "accept" => accept_command(arg(2)),
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            std::process::exit(1);
        }
    };

    info!("Resolved {} lookup", command);
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to serialize output")?
    );
    Ok(())
}
