//! Conversion of a scanner report into editor-runnable HTTP requests.
//!
//! Secrets go only into `http-client.env.json`; the generated requests
//! reference them as `{{variable}}` placeholders so the request file can be
//! shared or committed without leaking anything.

use std::{collections::BTreeMap, fs, io::Write as _, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    cli::commands::convert::ConvertArgs,
    report::{self, Finding},
};

const ENV_SCHEMA: &str =
    "https://raw.githubusercontent.com/mistweaverco/kulala.nvim/main/schemas/http-client.env.schema.json";

/// Variable placeholder used in endpoint templates.
const VAR: &str = "{{var}}";

/// Verification endpoint for one detector type. `{{var}}` marks where the
/// secret's variable reference goes.
struct Endpoint {
    method: &'static str,
    url: &'static str,
    headers: &'static [(&'static str, &'static str)],
    body: Option<&'static str>,
}

const JSONRPC_BLOCK_NUMBER: &str =
    r#"{"jsonrpc":"2.0","method":"eth_blockNumber","params":[],"id":1}"#;

/// Detector types with a known cheap read-only verification call, keyed by
/// the normalized detector name.
static ENDPOINTS: &[(&str, Endpoint)] = &[
    (
        "openai",
        Endpoint {
            method: "GET",
            url: "https://api.openai.com/v1/models",
            headers: &[("Authorization", "Bearer {{var}}")],
            body: None,
        },
    ),
    (
        "telegrambottoken",
        Endpoint {
            method: "GET",
            url: "https://api.telegram.org/bot{{var}}/getMe",
            headers: &[],
            body: None,
        },
    ),
    (
        "alchemy",
        Endpoint {
            method: "POST",
            url: "https://eth-mainnet.g.alchemy.com/v2/{{var}}",
            headers: &[("Content-Type", "application/json")],
            body: Some(JSONRPC_BLOCK_NUMBER),
        },
    ),
    (
        "infura",
        Endpoint {
            method: "POST",
            url: "https://mainnet.infura.io/v3/{{var}}",
            headers: &[("Content-Type", "application/json")],
            body: Some(JSONRPC_BLOCK_NUMBER),
        },
    ),
    (
        "openweather",
        Endpoint {
            method: "GET",
            url: "https://api.openweathermap.org/data/2.5/weather?q=London&appid={{var}}",
            headers: &[],
            body: None,
        },
    ),
    (
        "cryptocompare",
        Endpoint {
            method: "GET",
            url: "https://min-api.cryptocompare.com/data/price?fsym=BTC&tsyms=USD&api_key={{var}}",
            headers: &[],
            body: None,
        },
    ),
    (
        "weatherstack",
        Endpoint {
            method: "GET",
            url: "http://api.weatherstack.com/current?access_key={{var}}&query=London",
            headers: &[],
            body: None,
        },
    ),
    (
        "flickr",
        Endpoint {
            method: "GET",
            url: "https://api.flickr.com/services/rest/?method=flickr.test.echo&api_key={{var}}&format=json&nojsoncallback=1",
            headers: &[],
            body: None,
        },
    ),
    (
        "newsapi",
        Endpoint {
            method: "GET",
            url: "https://newsapi.org/v2/top-headlines?country=us&apiKey={{var}}",
            headers: &[],
            body: None,
        },
    ),
    (
        "miro",
        Endpoint {
            method: "GET",
            url: "https://api.miro.com/v1/boards",
            headers: &[("Authorization", "Bearer {{var}}")],
            body: None,
        },
    ),
    (
        "twitchaccesstoken",
        Endpoint {
            method: "GET",
            url: "https://id.twitch.tv/oauth2/validate",
            headers: &[("Authorization", "OAuth {{var}}")],
            body: None,
        },
    ),
    (
        "onesignal",
        Endpoint {
            method: "GET",
            url: "https://onesignal.com/api/v1/apps",
            headers: &[("Authorization", "Basic {{var}}")],
            body: None,
        },
    ),
    (
        "rapidapi",
        Endpoint {
            method: "GET",
            url: "https://rapidapi.com/api/health",
            headers: &[("X-RapidAPI-Key", "{{var}}")],
            body: None,
        },
    ),
    (
        "snykkey",
        Endpoint {
            method: "GET",
            url: "https://api.snyk.io/v1/user/me",
            headers: &[("Authorization", "token {{var}}")],
            body: None,
        },
    ),
    (
        "ipstack",
        Endpoint {
            method: "GET",
            url: "http://api.ipstack.com/check?access_key={{var}}",
            headers: &[],
            body: None,
        },
    ),
    (
        "fixerio",
        Endpoint {
            method: "GET",
            url: "http://data.fixer.io/api/latest?access_key={{var}}",
            headers: &[],
            body: None,
        },
    ),
    (
        "sumologickey",
        Endpoint {
            method: "GET",
            url: "https://api.sumologic.com/api/v1/users",
            headers: &[("Authorization", "Basic {{var}}")],
            body: None,
        },
    ),
    (
        "atlassian",
        Endpoint {
            method: "GET",
            url: "https://api.atlassian.com/me",
            headers: &[("Authorization", "Bearer {{var}}")],
            body: None,
        },
    ),
];

fn endpoint_for(finding: &Finding) -> Option<&'static Endpoint> {
    let key = finding.normalized_detector();
    ENDPOINTS.iter().find(|(name, _)| *name == key).map(|(_, ep)| ep)
}

#[derive(Debug)]
pub struct ConvertSummary {
    pub total: usize,
    pub unique: usize,
    pub known: usize,
    pub unknown: usize,
}

#[derive(Serialize)]
struct HttpClientEnv<'a> {
    #[serde(rename = "$schema")]
    schema: &'a str,
    dev: BTreeMap<String, &'a str>,
}

/// Convert a report into the request file, environment file, unknown
/// listing, and per-extension response directories.
pub fn run(args: &ConvertArgs) -> Result<ConvertSummary> {
    let findings = report::load_report(&args.report)?;
    let total = findings.len();
    let findings = report::dedup_by_raw(findings);
    let unique = findings.len();
    info!("Parsed {total} findings ({unique} unique) from {}", args.report.display());

    let (known, unknown): (Vec<_>, Vec<_>) =
        findings.into_iter().partition(|f| endpoint_for(f).is_some());

    write_http_requests(&args.http_out, &known)
        .with_context(|| format!("Failed to write {}", args.http_out.display()))?;
    write_env_file(&args.env_out, &known)
        .with_context(|| format!("Failed to write {}", args.env_out.display()))?;
    write_unknown_listing(&args.unknown_out, &unknown)
        .with_context(|| format!("Failed to write {}", args.unknown_out.display()))?;
    create_response_dirs(&args.responses_dir, &known)
        .with_context(|| format!("Failed to create {}", args.responses_dir.display()))?;

    Ok(ConvertSummary { total, unique, known: known.len(), unknown: unknown.len() })
}

/// One templated request per finding, secrets referenced by variable only.
fn write_http_requests(path: &Path, findings: &[Finding]) -> Result<()> {
    let mut out = String::new();
    for finding in findings {
        let Some(endpoint) = endpoint_for(finding) else { continue };
        let var_ref = format!("{{{{{}}}}}", finding.variable_name());
        let ext_id = finding.extension_id();

        out.push_str(&format!("### {} ({ext_id})\n", finding.detector));
        out.push_str(&format!(
            "{} {} HTTP/1.1\n",
            endpoint.method,
            endpoint.url.replace(VAR, &var_ref)
        ));
        for (header, value) in endpoint.headers {
            out.push_str(&format!("{header}: {}\n", value.replace(VAR, &var_ref)));
        }
        out.push_str(&format!(
            ">> responses/{ext_id}/{}.json\n",
            finding.normalized_detector()
        ));
        if let Some(body) = endpoint.body {
            let value: serde_json::Value =
                serde_json::from_str(body).context("endpoint body template is not JSON")?;
            out.push('\n');
            out.push_str(&serde_json::to_string_pretty(&value)?);
            out.push('\n');
        }
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// The variable-to-secret map; the only place raw values land.
fn write_env_file(path: &Path, findings: &[Finding]) -> Result<()> {
    let mut dev = BTreeMap::new();
    for finding in findings {
        dev.insert(finding.variable_name(), finding.raw.as_str());
    }
    let env = HttpClientEnv { schema: ENV_SCHEMA, dev };
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, &env)?;
    writeln!(file)?;
    Ok(())
}

fn write_unknown_listing(path: &Path, findings: &[Finding]) -> Result<()> {
    let mut out = String::new();
    for finding in findings {
        out.push_str(&format!("Unknown Secret Type: {}\n", finding.detector));
        out.push_str(&format!("Extension: {}\n", finding.extension_id()));
        out.push_str(&format!("Raw Value: {}\n", finding.raw));
        out.push_str(&format!("File: {}\n", finding.file));
        if let Some(line) = finding.line {
            out.push_str(&format!("Line: {line}\n"));
        }
        for (key, value) in &finding.extra {
            out.push_str(&format!("{key}: {value}\n"));
        }
        out.push_str(&format!("Verified: {}\n\n", if finding.verified { "Yes" } else { "No" }));
    }
    fs::write(path, out)?;
    Ok(())
}

fn create_response_dirs(base: &Path, findings: &[Finding]) -> Result<()> {
    for finding in findings {
        let dir = base.join(finding.extension_id());
        debug!("Ensuring response directory {}", dir.display());
        fs::create_dir_all(&dir)?;
    }
    Ok(())
}
