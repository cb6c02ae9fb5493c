//! Chromebar - toolbar presentation engine frame driver
//!
//! Usage: chromebar [--config <PATH>] --script <PATH> | --demo

mod script;

use std::env;
use std::error::Error;
use std::fs;
use std::process::ExitCode;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use chromebar_engine::{Toolbar, ToolbarConfig};

use crate::script::Script;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Frame interval in milliseconds
const FRAME_MS: u64 = 16;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let config = match take_config(&mut args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.is_empty() {
        print_usage(&program);
        return ExitCode::FAILURE;
    }

    let script = match args[0].as_str() {
        "--help" | "-h" => {
            print_usage(&program);
            return ExitCode::SUCCESS;
        }
        "--version" | "-V" => {
            println!("Chromebar {}", VERSION);
            return ExitCode::SUCCESS;
        }
        "--demo" => Script::demo().map_err(|e| Box::new(e) as Box<dyn Error>),
        "--script" => {
            if args.len() < 2 {
                eprintln!("Usage: {} --script <PATH>", program);
                return ExitCode::FAILURE;
            }
            load_script(&args[1])
        }
        other => {
            eprintln!("Unknown option: {}", other);
            print_usage(&program);
            return ExitCode::FAILURE;
        }
    };

    let result = match script {
        Ok(script) => run(config, script).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_usage(program: &str) {
    println!(
        r#"Chromebar {} - Toolbar presentation engine frame driver

USAGE:
    {} [--config <PATH>] <COMMAND>

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version information
    --config <PATH>     Load toolbar configuration from a JSON file

COMMANDS:
    --demo              Run the built-in walkthrough
    --script <PATH>     Run a JSON event script

Each frame is printed to stdout as one JSON line.

EXAMPLES:
    {} --demo
    {} --config tablet.json --script session.json

"#,
        VERSION, program, program, program
    );
}

/// Strip `--config <PATH>` from the arguments and load it
fn take_config(args: &mut Vec<String>) -> Result<ToolbarConfig, Box<dyn Error>> {
    let Some(index) = args.iter().position(|arg| arg == "--config") else {
        return Ok(ToolbarConfig::default());
    };
    if index + 1 >= args.len() {
        return Err("--config requires a path".into());
    }
    let path = args.remove(index + 1);
    args.remove(index);

    let json = fs::read_to_string(&path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let config = ToolbarConfig::from_json(&json)?;
    log::info!("Loaded configuration from {}", path);
    Ok(config)
}

fn load_script(path: &str) -> Result<Script, Box<dyn Error>> {
    let json = fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    Ok(Script::from_json(&json)?)
}

/// Feed the script into a toolbar frame by frame until everything settles
async fn run(config: ToolbarConfig, mut script: Script) -> Result<(), Box<dyn Error>> {
    let mut toolbar = Toolbar::new(config);
    toolbar.set_tab_switcher_click_handler(|| log::info!("Tab switcher button clicked"));
    toolbar.set_new_entry_click_handler(|| log::info!("New entry button clicked"));

    log::info!("Running {} script steps", script.len());

    let mut frames = interval(Duration::from_millis(FRAME_MS));
    frames.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut now_ms = 0;
    loop {
        frames.tick().await;

        for step in script.take_due(now_ms) {
            step.apply(&mut toolbar);
        }
        toolbar.tick(FRAME_MS as f32);
        println!("{}", serde_json::to_string(&toolbar.frame())?);

        if script.is_exhausted() && !toolbar.is_animating() {
            break;
        }
        now_ms += FRAME_MS;
    }

    log::info!("Settled after {} ms", now_ms);
    Ok(())
}
