#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Interactive CLI entry point for the safepath toolchain.
//!
//! Provides a unified entry point that lets users interactively select
//! which tool to run: the API server, a scripted demo of the report
//! session, or a stats summary of the demo dataset.

mod demo;

use dialoguer::Select;

/// Top-level tool selection.
enum Tool {
    Server,
    Demo,
    Stats,
}

impl Tool {
    const ALL: &[Self] = &[Self::Server, Self::Demo, Self::Stats];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::Demo => "Run scripted report demo",
            Self::Stats => "Show demo dataset stats",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("SafePath Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Server => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(safepath_server::interactive::run())
            })
            .await??;
        }
        Tool::Demo => {
            pretty_env_logger::init();
            demo::run().await?;
        }
        Tool::Stats => {
            pretty_env_logger::init();
            demo::stats()?;
        }
    }

    Ok(())
}
