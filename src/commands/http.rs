use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};

use utilbox::http;

use super::{read_json_arg, read_text_arg, CmdResult};

#[derive(Args)]
pub struct HttpArgs {
    #[command(subcommand)]
    command: HttpCommand,
}

#[derive(Subcommand)]
enum HttpCommand {
    /// Parse a raw header block (inline, @file, or - for stdin)
    Headers {
        raw: String,
        /// Treat bare LF line endings as CRLF
        #[arg(long)]
        lf: bool,
    },
    /// Parse the query parameters of a URL
    Query {
        url: String,
        /// Map these names to a single value (default: every name maps to a list)
        #[arg(long, value_name = "NAME")]
        collapse: Vec<String>,
        /// Map every name to a single value
        #[arg(long, conflicts_with = "collapse")]
        collapsed: bool,
        /// With --collapsed, names allowed to repeat
        #[arg(long, value_name = "NAME", requires = "collapsed")]
        array: Vec<String>,
    },
    /// Build a query string from a JSON object (inline, @file, or -)
    BuildQuery { params: String },
}

#[derive(Debug, Serialize)]
pub struct HttpOutput {
    command: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    headers: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
}

pub fn run(args: HttpArgs) -> CmdResult<HttpOutput> {
    match args.command {
        HttpCommand::Headers { raw, lf } => headers(&raw, lf),
        HttpCommand::Query {
            url,
            collapse,
            collapsed,
            array,
        } => query(&url, &collapse, collapsed, &array),
        HttpCommand::BuildQuery { params } => build_query(&params),
    }
}

fn as_strs(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).collect()
}

fn headers(raw: &str, lf: bool) -> CmdResult<HttpOutput> {
    let mut raw = read_text_arg(raw, "headers")?;
    if lf {
        raw = raw.replace("\r\n", "\n").replace('\n', "\r\n");
    }

    Ok((
        HttpOutput {
            command: "http.headers".to_string(),
            headers: Some(http::parse_headers(&raw)?),
            params: None,
            query: None,
        },
        0,
    ))
}

fn query(url: &str, collapse: &[String], collapsed: bool, array: &[String]) -> CmdResult<HttpOutput> {
    let params = if collapsed {
        http::get_query_params_collapsed(url, &as_strs(array))?
    } else {
        http::get_query_params(url, &as_strs(collapse))?
    };

    Ok((
        HttpOutput {
            command: "http.query".to_string(),
            headers: None,
            params: Some(params),
            query: None,
        },
        0,
    ))
}

fn build_query(spec: &str) -> CmdResult<HttpOutput> {
    let params = match read_json_arg(spec, "params")? {
        Value::Object(map) => map,
        _ => {
            return Err(utilbox::Error::validation_invalid_argument(
                "params",
                "params must be a JSON object",
                None,
                None,
            ))
        }
    };

    Ok((
        HttpOutput {
            command: "http.build_query".to_string(),
            headers: None,
            params: None,
            query: Some(http::build_query_string(&params)?),
        },
        0,
    ))
}
