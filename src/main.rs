// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! easyhttp CLI - demonstration of the easyhttp library

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use easyhttp::{HttpRequest, Method, ResponseData};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("easyhttp=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "fetch" | "head" if args.len() >= 3 => {
            let method = if args[1] == "head" {
                Method::Head
            } else {
                Method::Get
            };
            run(&args[2], method, None, args.get(3).map(String::as_str)).await
        }
        "post" if args.len() >= 4 => {
            run(&args[2], Method::Post, Some(&args[3]), args.get(4).map(String::as_str)).await
        }
        "fetch" | "head" | "post" => {
            eprintln!("Missing arguments for {}", args[1]);
            print_usage();
            return ExitCode::from(1);
        }
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("easyhttp {}", easyhttp::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Request failed: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"easyhttp - HTTP requests with a synchronized cookie jar

USAGE:
    easyhttp <COMMAND> [ARGS]

COMMANDS:
    fetch <url> [cookies]         GET a URL and print the response
    head <url> [cookies]          HEAD a URL and print the response headers
    post <url> <data> [cookies]   POST raw data (e.g. "a=1&b=2")
    help                          Show this help message
    version                       Show version information

EXAMPLES:
    easyhttp fetch https://example.com
    easyhttp fetch https://example.com "session=abc; lang=en"
    easyhttp post https://httpbin.org/post "user=alice&pass=secret"

Set RUST_LOG=easyhttp=debug for request tracing.
"#
    );
}

async fn run(url: &str, method: Method, data: Option<&str>, cookies: Option<&str>) -> anyhow::Result<()> {
    let mut request = HttpRequest::new(url, method);
    request.set_follow_redirects(true);
    if let Some(cookies) = cookies {
        request.set_cookie_string(cookies);
    }

    match data {
        Some(body) => request.send_body(body).await,
        None => request.send().await,
    }
    .with_context(|| format!("{} {}", method, url))?;

    let response = request
        .response()
        .context("request finished without a response")?;
    print_response(response);
    Ok(())
}

fn print_response(response: &ResponseData) {
    println!("=== Request ===");
    println!("URL: {}", response.url);
    for line in &response.request_headers {
        println!("  {}", line);
    }

    println!("\n=== Response ===");
    println!("Status: {}", response.status_code);
    println!("Content-Type: {:?}", response.content_type());
    println!("Size: {} bytes", response.body_len());
    println!("Time: {}ms", response.elapsed.as_millis());

    println!("\n=== Headers ===");
    print!("{}", response.response_headers_raw);

    let set_cookies = response.set_cookies();
    if !set_cookies.is_empty() {
        println!("=== Set-Cookie ({}) ===", set_cookies.len());
        for cookie in set_cookies {
            println!("  - {}", cookie);
        }
    }

    println!("\n=== Cookie Jar ===");
    println!("{}", response.cookie_string);

    if !response.body.is_empty() {
        println!("\n=== Body ===");
        println!("{}", response.text_lossy());
    }
}
