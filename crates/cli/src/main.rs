mod logging;

use anyhow::Result;
use bulk_renamer_core::{
    app_paths, apply_plan_with_options, generate_plan, load_config, save_config, ApplyOptions,
    NameSlice, RenamePlan, RenameRule,
};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "bulk-renamer-cli")]
#[command(about = "フォルダ内の同じ拡張子のファイルを連番付きの名前へ一括リネームします")]
struct Cli {
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Rename(RenameArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    Init,
}

#[derive(Debug, Args)]
struct RenameArgs {
    #[arg(long)]
    dir: String,
    #[arg(long, default_value = "")]
    new_name: String,
    #[arg(long)]
    digits: Option<usize>,
    #[arg(long)]
    from_ext: String,
    #[arg(long)]
    to_ext: String,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    start: i64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    end: i64,
    #[arg(long, default_value_t = false)]
    include_directories: bool,
    #[arg(long, default_value_t = false)]
    no_rollback: bool,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Rename(args) => cmd_rename(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Init => cmd_config_init(),
        },
    }
}

fn cmd_rename(args: RenameArgs) -> Result<()> {
    let config = load_config()?;
    let slice = NameSlice::new(args.start, args.end)?;

    let rule = RenameRule::new(
        args.dir,
        args.new_name,
        args.digits.unwrap_or(config.digits),
        args.from_ext,
        args.to_ext,
        slice,
    )
    .with_directories(args.include_directories || config.include_directories);
    tracing::debug!(?rule, "rename rule resolved");

    let plan = generate_plan(&rule)?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Table => {
            print_table(&plan);
        }
    }

    if args.apply {
        let options = ApplyOptions {
            rollback_on_failure: config.rollback_on_failure && !args.no_rollback,
        };
        let result = apply_plan_with_options(&plan, &options)?;
        eprintln!(
            "適用完了: {}件 (変更なし {}件)",
            result.applied, result.unchanged
        );
    } else {
        eprintln!("dry-runモード: 実ファイルは変更していません。適用するには --apply を指定してください。");
    }

    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let paths = app_paths()?;
    if paths.config_path.exists() {
        anyhow::bail!(
            "設定ファイルは既に存在します: {}",
            paths.config_path.display()
        );
    }
    let config = load_config()?;
    save_config(&config)?;
    println!("設定ファイルを作成しました: {}", paths.config_path.display());
    Ok(())
}

fn print_table(plan: &RenamePlan) {
    println!("#  元ファイル -> 新ファイル");
    for candidate in &plan.candidates {
        let marker = if candidate.changed { "" } else { " (変更なし)" };
        println!(
            "{}  {} -> {}{}",
            candidate.counter, candidate.original_name, candidate.target_name, marker
        );
    }

    println!(
        "\n集計: scanned={} dir_skip={} ext_skip={} non_utf8_skip={} planned={} unchanged={}",
        plan.stats.scanned_entries,
        plan.stats.skipped_directories,
        plan.stats.skipped_extension,
        plan.stats.skipped_non_utf8,
        plan.stats.planned,
        plan.stats.unchanged
    );
}
