use gantry::{init_subscriber, version_info, CliError, Gantry, Options};
use gantry_plugin_sdk::prelude::*;
use serde_json::json;
use std::time::Duration;

// ============================================
// Plugins
// ============================================

/// Provider plugin: contributes the `deploy` command tree and does the
/// actual (simulated) work.
fn cloud_plugin() -> StaticPlugin {
    StaticPlugin::new("cloud")
        .command(
            CommandNode::new("deploy", "Deploy to the default infrastructure")
                .lifecycle_events(["resources", "functions"])
                .option("stage", "The stage to deploy to (e.g. --stage production)")
                .subcommand(
                    CommandNode::new("onpremises", "Deploy to your on-premises infrastructure")
                        .lifecycle_events(["resources", "functions"]),
                ),
        )
        .command(CommandNode::new("info", "Show deployment information").lifecycle_event("display"))
        .hook("deploy:resources", |ctx| async move {
            let stage = ctx
                .options()
                .get("stage")
                .unwrap_or_else(|| json!("development"));
            gantry::info!(stage = %stage, "provisioning resources");
            tokio::time::sleep(Duration::from_millis(150)).await;
            ctx.options().insert("stack_id", json!("stack-1234"));
            Ok(())
        })
        .hook("deploy:functions", |ctx| async move {
            gantry::info!("uploading functions");
            tokio::time::sleep(Duration::from_millis(100)).await;
            ctx.options().insert("functions_deployed", json!(2));
            Ok(())
        })
        .hook_sync("info:display", |ctx| {
            println!("service: demo  stage: {}", ctx.options().get("stage").unwrap_or(json!("development")));
            Ok(())
        })
}

/// Core plugin: observes every deploy through before/after hooks.
fn audit_plugin() -> StaticPlugin {
    StaticPlugin::new("audit")
        .hook_sync("before:deploy:resources", |_| {
            gantry::info!("deploy starting");
            Ok(())
        })
        .hook_sync("after:deploy:functions", |ctx| {
            gantry::info!(
                functions = %ctx.options().get("functions_deployed").unwrap_or(json!(0)),
                "deploy finished"
            );
            Ok(())
        })
}

// ============================================
// Argument splitting (front-end concern, kept deliberately dumb)
// ============================================

/// Tokens before the first `--flag` are the command path; the rest are
/// `--key value` pairs (a bare trailing `--flag` becomes `true`).
fn split_args(args: &[String]) -> (Vec<String>, Options) {
    let mut commands = Vec::new();
    let options = Options::new();

    let mut i = 0;
    while i < args.len() {
        if let Some(key) = args[i].strip_prefix("--") {
            if i + 1 < args.len() && !args[i + 1].starts_with("--") {
                options.insert(key, json!(args[i + 1]));
                i += 2;
                continue;
            }
            options.insert(key, json!(true));
        } else {
            commands.push(args[i].clone());
        }
        i += 1;
    }

    (commands, options)
}

// ============================================
// Main Entry Point
// ============================================

#[tokio::main]
async fn main() {
    // Initialize tracing (controlled by RUST_LOG environment variable)
    init_subscriber();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", version_info());
        return;
    }

    let engine = match Gantry::builder()
        .core_plugin(audit_plugin())
        .plugin(cloud_plugin())
        .build()
    {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{}", format_error(&e));
            std::process::exit(e.exit_code());
        }
    };

    let (commands, options) = split_args(&args);
    if commands.is_empty() {
        print!("{}", engine.help());
        return;
    }

    match engine.run(&commands, options).await {
        Ok(final_options) => {
            println!("{}", serde_json::Value::Object(final_options.snapshot()));
        }
        Err(e) if e.is_command_not_found() => {
            eprintln!("{}", format_error(&e));
            eprintln!();
            eprint!("{}", engine.help());
            std::process::exit(e.exit_code());
        }
        Err(e) => {
            eprintln!("{}", format_error(&e));
            std::process::exit(e.exit_code());
        }
    }
}

fn format_error(e: &CliError) -> String {
    match e {
        CliError::User(user_err) => format!("{}", user_err),
        CliError::System(sys_err) => format!("{}", sys_err),
    }
}
