//! 命令行入口

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

use medact_core::{EntityLabel, Language, RedactionLevel, RedactionRequest, ReplacementMode};
use medact_ocr::{detect_tesseract_status, TesseractStatus};
use medact_vision::FfmpegTools;

use crate::config::{config_path, load_config, save_config, AppConfig};
use crate::pipeline::{build_redactor, FrameTextMode, MediaPipeline, ProcessOptions};

/// Medact：文档、图片与视频的个人信息脱敏
#[derive(Parser, Debug)]
#[command(name = "medact", version, about, long_about = None)]
pub struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 配置文件路径，默认 `<配置目录>/medact/config.json`
    #[arg(short, long, global = true, env = "MEDACT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 处理单个文件（pdf / docx / txt / md / jpg / png / mp4）
    Process(ProcessArgs),
    /// 直接对一段文本脱敏
    RedactText(RedactTextArgs),
    /// 检查 Tesseract、ffmpeg 与人脸级联文件
    Status {
        #[arg(long)]
        json: bool,
    },
    /// 查看或初始化配置
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印当前生效的配置
    Show,
    /// 写入默认配置
    Init {
        /// 覆盖已有配置文件
        #[arg(long)]
        force: bool,
    },
}

/// 文本脱敏相关参数，未指定时取配置中的默认值
#[derive(Args, Debug, Clone)]
pub struct RedactArgs {
    /// 需要替换的实体类型，逗号分隔，例如 PERSON,ORG
    #[arg(long, value_delimiter = ',')]
    pub entities: Vec<EntityLabel>,

    /// full | partial
    #[arg(long)]
    pub level: Option<RedactionLevel>,

    /// literal | span
    #[arg(long)]
    pub mode: Option<ReplacementMode>,

    /// 合成文本随机种子
    #[arg(long)]
    pub seed: Option<u64>,

    /// 跳过语言检测，直接按指定语言处理（en / hi）
    #[arg(long)]
    pub lang: Option<Language>,

    /// 以 JSON 输出
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProcessArgs {
    pub input: PathBuf,

    /// 对提取出的文本做脱敏
    #[arg(long)]
    pub redact: bool,

    /// 输出目录，默认与输入文件同目录
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// 图片与视频帧中的文字：skip | redact
    #[arg(long)]
    pub frame_text: Option<FrameTextMode>,

    #[command(flatten)]
    pub redact_args: RedactArgs,
}

#[derive(Args, Debug)]
pub struct RedactTextArgs {
    /// 待脱敏文本
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// 从文件读取文本；与 --text 都未指定时读取标准输入
    #[arg(long)]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub redact_args: RedactArgs,
}

pub fn run(cli: Cli) -> Result<()> {
    let path = match cli.config {
        Some(path) => path,
        None => config_path()?,
    };

    match cli.command {
        Commands::Process(args) => {
            let config = load_config(&path)?;
            process(&config, args)
        }
        Commands::RedactText(args) => {
            let config = load_config(&path)?;
            redact_text(&config, args)
        }
        Commands::Status { json } => {
            let config = load_config(&path)?;
            status(&config, json)
        }
        Commands::Config(ConfigCommand::Show) => {
            let config = load_config(&path)?;
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Config(ConfigCommand::Init { force }) => init_config(&path, force),
    }
}

/// 命令行参数覆盖配置文件
fn apply_overrides(config: &AppConfig, args: &RedactArgs) -> AppConfig {
    let mut config = config.clone();
    if let Some(mode) = args.mode {
        config.replacement_mode = Some(mode);
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config
}

fn redact_options(config: &AppConfig, args: &RedactArgs) -> ProcessOptions {
    let mut options = ProcessOptions::from_config(config);
    if !args.entities.is_empty() {
        options.entities = args.entities.iter().copied().collect();
    }
    if let Some(level) = args.level {
        options.level = level;
    }
    options
}

fn process(config: &AppConfig, args: ProcessArgs) -> Result<()> {
    let config = apply_overrides(config, &args.redact_args);
    let mut options = redact_options(&config, &args.redact_args);
    options.redact = args.redact;
    if let Some(dir) = args.output_dir {
        options.output_dir = Some(dir);
    }
    if let Some(mode) = args.frame_text {
        options.frame_text = mode;
    }

    let redactor = build_redactor(&config, args.redact_args.lang)?;
    let mut pipeline = MediaPipeline::from_config(&config, redactor);
    let report = pipeline
        .process(&args.input, &options)
        .with_context(|| format!("处理失败: {}", args.input.display()))?;

    if args.redact_args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

fn read_input(args: &RedactTextArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    if let Some(file) = &args.file {
        return std::fs::read_to_string(file)
            .with_context(|| format!("读取文件失败: {}", file.display()));
    }
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("读取标准输入失败")?;
    Ok(text)
}

fn redact_text(config: &AppConfig, args: RedactTextArgs) -> Result<()> {
    let text = read_input(&args)?;
    if text.trim().is_empty() {
        bail!("输入文本为空");
    }

    let config = apply_overrides(config, &args.redact_args);
    let options = redact_options(&config, &args.redact_args);
    let redactor = build_redactor(&config, args.redact_args.lang)?;
    let request = RedactionRequest::new(text)
        .with_labels(options.entities)
        .with_level(options.level);
    let redacted = redactor.redact(request)?;

    if args.redact_args.json {
        println!("{}", serde_json::to_string_pretty(&redacted)?);
    } else {
        println!("{}", redacted.text);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    tesseract: TesseractStatus,
    ffmpeg: Option<String>,
    ffmpeg_error: Option<String>,
    cascade_path: Option<String>,
    cascade_found: bool,
}

fn status(config: &AppConfig, json: bool) -> Result<()> {
    let tesseract = detect_tesseract_status(&config.tesseract_or_default());
    let tools = FfmpegTools {
        ffmpeg: config
            .ffmpeg_path
            .clone()
            .unwrap_or_else(|| FfmpegTools::default().ffmpeg),
        ffprobe: config
            .ffprobe_path
            .clone()
            .unwrap_or_else(|| FfmpegTools::default().ffprobe),
    };
    let (ffmpeg, ffmpeg_error) = match tools.version() {
        Ok(version) => (Some(version), None),
        Err(e) => (None, Some(e.to_string())),
    };
    let cascade = config.cascade_path_or_default();
    let report = StatusReport {
        tesseract,
        ffmpeg,
        ffmpeg_error,
        cascade_found: cascade.as_deref().is_some_and(Path::exists),
        cascade_path: cascade.map(|p| p.to_string_lossy().to_string()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let t = &report.tesseract;
    if t.installed {
        println!(
            "Tesseract: {} ({})",
            t.version.as_deref().unwrap_or("?"),
            t.binary_path.as_deref().unwrap_or("?")
        );
        if !t.missing_langs.is_empty() {
            println!("  缺少语言包: {}", t.missing_langs.join(", "));
        }
    } else {
        println!(
            "Tesseract: 未安装 ({})",
            t.error.as_deref().unwrap_or("unknown")
        );
    }
    match (&report.ffmpeg, &report.ffmpeg_error) {
        (Some(version), _) => println!("ffmpeg: {}", version),
        (None, error) => println!("ffmpeg: 不可用 ({})", error.as_deref().unwrap_or("unknown")),
    }
    match &report.cascade_path {
        Some(path) if report.cascade_found => println!("人脸级联: {}", path),
        Some(path) => println!("人脸级联: 未找到 {}", path),
        None => println!("人脸级联: 未配置"),
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("配置文件已存在: {}（使用 --force 覆盖）", path.display());
    }
    save_config(path, &AppConfig::with_defaults())?;
    log::info!("[Config] 已写入默认配置: {}", path.display());
    println!("{}", path.display());
    Ok(())
}
