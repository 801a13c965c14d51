use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{value_parser, Arg, ArgAction, Command};

use hwmon_charts::commands;

fn switch_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("ON|OFF")
        .help(help)
        .value_parser(BoolishValueParser::new())
}

fn build_cli() -> Command {
    Command::new("hwmon-charts")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live hardware telemetry charts for the terminal")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .value_name("URL")
                .help("Monitor server URL (defaults to the configured one)")
                .global(true),
        )
        .subcommand(
            Command::new("watch")
                .about("Show live charts of the server's telemetry")
                .arg(
                    Arg::new("pixel-ratio")
                        .long("pixel-ratio")
                        .value_name("RATIO")
                        .help("Device pixel ratio used for the chart backing surfaces")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print one JSON line of metric values per snapshot instead of the TUI")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("gpus")
                        .long("gpus")
                        .value_name("N")
                        .help("Chart N GPUs instead of asking the server")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(Command::new("gpus").about("List GPUs reported by the server"))
        .subcommand(
            Command::new("settings")
                .about("Change the server's sampling rate and collection switches")
                .arg(
                    Arg::new("rate")
                        .long("rate")
                        .value_name("SECONDS")
                        .help("Seconds between samples (0 stops sampling)")
                        .value_parser(value_parser!(f64)),
                )
                .arg(switch_arg("cpu", "Collect CPU utilization"))
                .arg(switch_arg("ram", "Collect RAM usage"))
                .arg(switch_arg("transfer-speed", "Measure VRAM and shared GPU transfer speeds"))
                .arg(switch_arg("shared-gpu-memory", "Collect shared GPU memory usage")),
        )
        .subcommand(
            Command::new("gpu")
                .about("Change the sensors collected for one GPU")
                .arg(
                    Arg::new("index")
                        .help("GPU index as listed by 'hwmon-charts gpus'")
                        .required(true)
                        .index(1)
                        .value_parser(value_parser!(usize)),
                )
                .arg(switch_arg("utilization", "Collect GPU utilization"))
                .arg(switch_arg("vram", "Collect VRAM usage"))
                .arg(switch_arg("temperature", "Collect GPU temperature")),
        )
        .subcommand(
            Command::new("switch")
                .about("Start or stop the server-side monitor")
                .arg(
                    Arg::new("state")
                        .help("on or off")
                        .required(true)
                        .index(1)
                        .value_parser(["on", "off"]),
                ),
        )
        .subcommand(
            Command::new("transfer-info")
                .about("Show how the server measures transfer speeds"),
        )
        .subcommand(
            Command::new("config")
                .about("Manage stored settings (use 'hwmon-charts config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show the stored configuration"))
                .subcommand(Command::new("reset").about("Restore the default configuration"))
                .subcommand(
                    Command::new("set-url")
                        .about("Set the monitor server URL")
                        .arg(
                            Arg::new("server-url")
                                .value_name("URL")
                                .help("http(s) URL of the server")
                                .required(true)
                                .index(1),
                        ),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate completions for (bash, zsh, fish, powershell, elvish)")
                        .required(true)
                        .index(1),
                ),
        )
        .subcommand(Command::new("version").about("Shows version information"))
}

fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    // Log lines would tear through the TUI, so the dashboard stays quiet by default
    let tui = matches
        .subcommand()
        .is_some_and(|(name, sub)| name == "watch" && !sub.get_flag("json"));
    let level = match matches.get_count("verbose") {
        0 if tui => log::LevelFilter::Error,
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    hwmon_charts::init_logging(level);

    match matches.subcommand() {
        Some(("watch", sub_matches)) => commands::watch(sub_matches),
        Some(("gpus", sub_matches)) => commands::server::execute_gpus(sub_matches),
        Some(("settings", sub_matches)) => commands::server::execute_settings(sub_matches),
        Some(("gpu", sub_matches)) => commands::server::execute_gpu(sub_matches),
        Some(("switch", sub_matches)) => commands::server::execute_switch(sub_matches),
        Some(("transfer-info", sub_matches)) => {
            commands::server::execute_transfer_info(sub_matches)
        }
        Some(("config", sub_matches)) => commands::config::handle_config(sub_matches),
        Some(("completions", sub_matches)) => {
            let mut cli = build_cli();
            commands::completions::execute(sub_matches, &mut cli)
        }
        Some(("version", _)) => commands::version(),
        _ => {
            println!("Use 'hwmon-charts --help' for more information.");
            Ok(())
        }
    }
}
