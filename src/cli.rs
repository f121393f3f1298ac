/// CLI引数の定義とコマンドへのディスパッチ
use crate::api::{PollOptions, TokioClock};
use crate::commands::{self, CommandResult};
use crate::config::{Settings, UserConfig};
use crate::domain::job::{VideoDuration, VideoSize};
use crate::domain::progress::JobProgress;
use crate::presentation::{input, output, progress};
use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(
    name = "vidgen",
    version,
    about = "Generate videos with Sora-2 on Azure OpenAI from the command line"
)]
pub struct Cli {
    /// Output machine-readable JSON to stdout (success and error cases)
    #[arg(long, global = true)]
    pub machine: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Submit a video generation job
    Create(CreateArgs),

    /// Show the status of a job, waiting until it finishes unless --no-wait is given
    Status {
        /// Job ID returned by 'create'
        id: String,

        /// Print the current status only
        #[arg(long)]
        no_wait: bool,

        #[command(flatten)]
        poll: PollArgs,

        /// Show progress while waiting
        #[arg(long)]
        progress: bool,
    },

    /// List all jobs
    List,

    /// Download the video of a completed job
    Download {
        /// Job ID
        id: String,

        /// Output file (missing parent directories are created)
        output: PathBuf,
    },

    /// Delete a job
    Delete {
        /// Job ID
        id: String,
    },

    /// Save and verify the API key and resource name
    Login {
        /// Read credentials from stdin (line 1 = API key, line 2 = resource name)
        #[arg(long)]
        stdin: bool,
    },

    /// Remove stored credentials
    Logout,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Text prompt describing the video
    #[arg(long, conflicts_with = "prompt_file", required_unless_present = "prompt_file")]
    pub prompt: Option<String>,

    /// Read the prompt from a file
    #[arg(long, value_name = "PATH")]
    pub prompt_file: Option<PathBuf>,

    /// Reference image used as the first frame (jpg, png or webp)
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Output size: 720x1280, 1280x720, 1024x1792 or 1792x1024
    #[arg(long, default_value = "720x1280")]
    pub size: String,

    /// Duration in seconds: 4, 8 or 12
    #[arg(long, default_value = "4")]
    pub seconds: String,

    /// Model deployment name
    #[arg(long)]
    pub model: Option<String>,

    /// Wait until the job finishes
    #[arg(long)]
    pub wait: bool,

    /// Download the video to this file when the job completes (implies --wait)
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub poll: PollArgs,

    /// Show progress
    #[arg(long)]
    pub progress: bool,

    /// Do not check that the reference image matches the requested size
    #[arg(long)]
    pub skip_dimension_check: bool,
}

#[derive(Args, Debug)]
pub struct PollArgs {
    /// Seconds between status checks
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Give up waiting after this many seconds (0 = wait forever)
    #[arg(long, value_name = "SECONDS")]
    pub max_wait: Option<u64>,
}

impl PollArgs {
    fn to_options(&self, settings: &Settings) -> PollOptions {
        let mut options = PollOptions::from_settings(settings);
        if let Some(secs) = self.interval {
            options = options.with_interval(Duration::from_secs(secs.max(1)));
        }
        if let Some(secs) = self.max_wait {
            options = options.with_max_wait(crate::config::settings::max_wait_from_secs(secs));
        }
        options
    }
}

/// コマンドを実行し、結果を出力する
///
/// 待機したジョブが failed / cancelled で終わった場合は、結果を出力した後に
/// JobUnsuccessful エラーを返す（終了コード 4）。
/// --machine では結果と失敗情報を1つのJSONにまとめ、`ReportedError` で返す。
pub async fn run(cli: Cli) -> Result<()> {
    let machine = cli.machine;

    let user_config = UserConfig::load()
        .context("Failed to load user configuration. Please check your config.toml file.")?;

    let result = match cli.command {
        Command::Create(args) => create(args, &resolve_settings(&user_config)?, machine).await?,
        Command::Status {
            id,
            no_wait,
            poll,
            progress,
        } => {
            let settings = resolve_settings(&user_config)?;
            let mut options = poll.to_options(&settings);
            if !no_wait {
                options = options.with_cancel(cancel_on_ctrl_c());
            }

            commands::status::execute(
                &settings,
                &id,
                !no_wait,
                &options,
                &TokioClock,
                reporter(progress, machine),
            )
            .await
            .context("Status command failed")?
        }
        Command::List => commands::list::execute(&resolve_settings(&user_config)?)
            .await
            .context("List command failed")?,
        Command::Download { id, output } => {
            commands::download::execute(
                &resolve_settings(&user_config)?,
                &id,
                &output,
                reporter(!machine, machine),
            )
            .await
            .context("Download command failed")?
        }
        Command::Delete { id } => commands::delete::execute(&resolve_settings(&user_config)?, &id)
            .await
            .context("Delete command failed")?,
        Command::Login { stdin } => {
            let credentials = if stdin {
                input::read_credentials_from_stdin()?
            } else {
                input::read_credentials_interactive()?
            };
            commands::login::execute(credentials)
                .await
                .context("Login command failed")?
        }
        Command::Logout => commands::logout::execute().context("Logout command failed")?,
    };

    match result.unsuccessful_job() {
        Some(err) if machine => {
            output::output_unsuccessful_json(&result, &err)?;
            Err(output::ReportedError(err).into())
        }
        Some(err) => {
            output::output_result(&result, false, user_config.timezone_offset_seconds)?;
            Err(err.into())
        }
        None => output::output_result(&result, machine, user_config.timezone_offset_seconds),
    }
}

/// 環境変数（.env含む）と設定ファイルから接続設定を解決する
fn resolve_settings(user_config: &UserConfig) -> Result<Settings> {
    let settings =
        Settings::from_environment(user_config).context("Failed to resolve API settings")?;
    tracing::debug!(?settings, "settings resolved");
    Ok(settings)
}

async fn create(args: CreateArgs, settings: &Settings, machine: bool) -> Result<CommandResult> {
    let prompt = input::read_prompt(args.prompt, args.prompt_file.as_deref())?;
    let size: VideoSize = args.size.parse()?;
    let seconds: VideoDuration = args.seconds.parse()?;

    let mut poll = args.poll.to_options(settings);
    if args.wait || args.output.is_some() {
        poll = poll.with_cancel(cancel_on_ctrl_c());
    }

    let options = commands::create::CreateOptions {
        prompt,
        image: args.image,
        size,
        seconds,
        model: args.model,
        wait: args.wait,
        output: args.output,
        poll,
        skip_dimension_check: args.skip_dimension_check,
    };

    commands::create::execute(settings, options, &TokioClock, reporter(args.progress, machine))
        .await
        .context("Create command failed")
}

/// 進捗イベントの出力先
fn reporter(enabled: bool, machine: bool) -> impl FnMut(JobProgress) {
    move |event| {
        if enabled {
            progress::report(&event, machine);
        } else {
            tracing::debug!(phase = ?event.phase, "progress");
        }
    }
}

/// Ctrl-C でポーリングを止めるトークン
///
/// 1回目はポーリングの区切りで中断（終了コード 130）、2回目は即座に終了する。
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted. Stopping after the current status check (Ctrl-C again to exit now).");
            child.cancel();
            if tokio::signal::ctrl_c().await.is_ok() {
                std::process::exit(130);
            }
        }
    });

    token
}
