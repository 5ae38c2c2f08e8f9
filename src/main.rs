use clap::Parser;
use raffle_kit::adapters::gemini::build_text_generator;
use raffle_kit::adapters::ingest::read_names_from_file;
use raffle_kit::app::session::{render_groups, render_roster, HELP};
use raffle_kit::config::cli::{Command, DrawArgs, GroupArgs, RosterArgs, TeamNamesArgs};
use raffle_kit::core::state::{Action, Effect};
use raffle_kit::domain::model::CongratulationMode;
use raffle_kit::utils::{logger, validation::Validate};
use raffle_kit::{
    CliConfig, Congratulator, Controller, GroupExporter, LocalStorage, Result, Session, TomlConfig,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting raffle-kit");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ raffle-kit failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        std::process::exit(e.exit_code());
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    cli.validate()?;

    // 載入 TOML 配置 (可選)
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };
    config.apply_env_defaults();
    config.validate()?;

    let generator = build_text_generator(&config.collaborator)?;
    let congratulator = Arc::new(Congratulator::new(generator));
    let mut controller = Controller::new(congratulator, cli.seed);
    controller.dispatch(Action::SetAllowRepeat(config.raffle.allow_repeat()));
    controller.dispatch(Action::SetCongratulation {
        mode: config.raffle.mode(),
        text: config.raffle.template().to_string(),
    });
    controller.dispatch(Action::SetGroupSize(config.grouping.group_size()));
    controller.dispatch(Action::SetTheme(config.grouping.theme().to_string()));

    match cli.command {
        Command::Draw(args) => run_draw(controller, &config, args).await,
        Command::Group(args) => run_group(controller, &config, args).await,
        Command::Dedupe(args) => run_dedupe(controller, args).await,
        Command::TeamNames(args) => run_team_names(controller, args).await,
        Command::Session(args) => run_session(controller, &config, args).await,
    }
}

async fn load_roster(controller: &mut Controller, args: &RosterArgs) -> Result<()> {
    for path in &args.inputs {
        let names = read_names_from_file(path).await?;
        controller.dispatch(Action::AddNames(names));
    }
    if !args.names.is_empty() {
        controller.dispatch(Action::AddNames(args.names.clone()));
    }
    if args.sample {
        controller.dispatch(Action::LoadSample);
    }

    let duplicates = controller.state().roster.find_duplicate_names();
    tracing::info!(
        "👥 Roster loaded: {} entries, {} duplicated names",
        controller.state().roster.len(),
        duplicates.len()
    );
    Ok(())
}

async fn play_rolling(frames: &[String], interval: Duration) {
    let mut err = std::io::stderr();
    for name in frames {
        let _ = write!(err, "\r\x1b[2K🎲 {}", name);
        let _ = err.flush();
        tokio::time::sleep(interval).await;
    }
    if !frames.is_empty() {
        let _ = write!(err, "\r\x1b[2K");
        let _ = err.flush();
    }
}

async fn run_draw(mut controller: Controller, config: &TomlConfig, args: DrawArgs) -> Result<()> {
    load_roster(&mut controller, &args.roster).await?;
    if controller.state().roster.is_empty() {
        println!("暂时还没有人哦 (roster is empty)");
        return Ok(());
    }

    if args.allow_repeat {
        controller.dispatch(Action::SetAllowRepeat(true));
    }
    if args.ai || args.template.is_some() {
        let current = controller.state().congratulation.clone();
        controller.dispatch(Action::SetCongratulation {
            mode: if args.ai {
                CongratulationMode::Generated
            } else {
                current.mode
            },
            text: args.template.clone().unwrap_or(current.text),
        });
    }

    let frame_count = if args.no_animation {
        0
    } else {
        config.raffle.rolling_frames()
    };
    let interval = Duration::from_millis(config.raffle.rolling_interval_ms());

    for round in 1..=args.count {
        let frames = controller.rolling_frames(frame_count);
        play_rolling(&frames, interval).await;

        match controller.dispatch(Action::Draw) {
            Effect::Winner(winner) => {
                println!("🎉 #{} {}", round, winner.name);
                if let Some(message) = controller.settle().await {
                    println!("   {}", message);
                }
            }
            Effect::PoolExhausted => {
                println!("Pool exhausted after {} draws", round - 1);
                break;
            }
            other => tracing::debug!("Unexpected draw effect: {:?}", other),
        }
    }
    Ok(())
}

async fn run_group(mut controller: Controller, config: &TomlConfig, args: GroupArgs) -> Result<()> {
    load_roster(&mut controller, &args.roster).await?;
    if let Some(size) = args.size {
        controller.dispatch(Action::SetGroupSize(size));
    }
    if let Some(theme) = args.theme.clone() {
        controller.dispatch(Action::SetTheme(theme));
    }

    match controller.dispatch(Action::Partition) {
        Effect::Grouped(count) => {
            println!("✅ {} groups", count);
            for line in render_groups(&controller.state().groups) {
                println!("{}", line);
            }
        }
        _ => {
            println!("暂时还没有人哦 (roster is empty)");
            return Ok(());
        }
    }

    if args.export {
        let output_path = args
            .output_path
            .clone()
            .unwrap_or_else(|| config.export.output_path().to_string());
        let exporter = GroupExporter::new(LocalStorage::new(output_path));
        let path = exporter.export(&controller.state().groups).await?;
        println!("📁 Output saved to: {}", path);
    }
    Ok(())
}

async fn run_dedupe(mut controller: Controller, args: RosterArgs) -> Result<()> {
    load_roster(&mut controller, &args).await?;
    let duplicates = controller.state().roster.find_duplicate_names();
    if duplicates.is_empty() {
        println!("No duplicate names");
    } else {
        let names: Vec<&str> = duplicates.iter().map(String::as_str).collect();
        println!("Duplicate names: {}", names.join(", "));
    }

    if let Effect::DuplicatesRemoved(n) = controller.dispatch(Action::RemoveDuplicates) {
        println!("Removed {} entries", n);
    }
    for line in render_roster(controller.state()) {
        println!("{}", line);
    }
    Ok(())
}

async fn run_team_names(controller: Controller, args: TeamNamesArgs) -> Result<()> {
    let names = controller
        .congratulator()
        .suggest_team_names(args.count, &args.theme)
        .await;
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

async fn run_session(mut controller: Controller, config: &TomlConfig, args: RosterArgs) -> Result<()> {
    load_roster(&mut controller, &args).await?;
    let exporter = GroupExporter::new(LocalStorage::new(config.export.output_path()));
    let mut session = Session::new(controller, exporter, config.raffle.rolling_frames());
    let interval = Duration::from_millis(config.raffle.rolling_interval_ms());

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let reply = session.handle_line(&line).await;
        play_rolling(&reply.rolling, interval).await;
        for line in &reply.lines {
            println!("{}", line);
        }
        if reply.awaiting_message {
            if let Some(message) = session.winner_message().await {
                println!("   {}", message);
            }
        }
        if reply.quit {
            break;
        }
    }
    tracing::info!("Session ended");
    Ok(())
}
