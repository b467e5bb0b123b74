//! # motordocs CLI
//!
//! Usage:
//!   motordocs request.json
//!   echo '{ "type": "invoice", ... }' | motordocs
//!   motordocs --example estimate > estimate.json
//!
//! Prints one JSON line: `{"success":true,"path":"..."}` or `{"error":"..."}`.

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use motordocs::config::RenderConfig;
use motordocs::model::{DocumentKind, RenderResponse};
use motordocs::{handle_request, samples};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    if let Some(pos) = args.iter().position(|a| a == "--example") {
        let kind = args.get(pos + 1).map(String::as_str).unwrap_or("invoice");
        return match kind.parse::<DocumentKind>() {
            Ok(kind) => {
                println!("{}", samples::request_json(kind));
                ExitCode::SUCCESS
            }
            Err(e) => respond(RenderResponse::failure(&e)),
        };
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map(|_| buf)
    };
    let input = match input {
        Ok(text) => text,
        Err(e) => {
            return respond(RenderResponse::Failure {
                error: format!("Failed to read request: {}", e),
            })
        }
    };

    let config = match RenderConfig::from_env() {
        Ok(config) => config,
        Err(e) => return respond(RenderResponse::failure(&e)),
    };

    respond(handle_request(&input, &config))
}

fn respond(response: RenderResponse) -> ExitCode {
    let line = serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"error":"Failed to encode response"}"#.to_string());
    println!("{}", line);
    match response {
        RenderResponse::Success { .. } => ExitCode::SUCCESS,
        RenderResponse::Failure { .. } => ExitCode::FAILURE,
    }
}
