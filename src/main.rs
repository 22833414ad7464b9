use clap::Parser;

use snapocr::capture::host::CropHost;
use snapocr::cli::{Cli, Commands};
use snapocr::config::Config;
use snapocr::core::app::{self, App};
use snapocr::ocr::{TesseractEngine, TesseractOptions};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{:#}", e);
        eprintln!("snapocr: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref());
    cli.overrides.apply(&mut config);

    match cli.command {
        Commands::Scan { photo } => {
            if !photo.is_file() {
                anyhow::bail!("No such photo: {}", photo.display());
            }
            let engine = TesseractEngine::new(TesseractOptions {
                psm: config.psm,
                oem: config.oem,
            });
            let sources = app::language_sources(&config);
            let mut app = App::new(config, engine);
            app.on_create(&sources);
            app.on_capture_clicked(&mut CropHost::new(photo));
            println!("{}", app.view().render(cli.json));
        }
        Commands::Install => {
            let report = app::prepare_tesseract(&config, &app::language_sources(&config));
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "copied": report.copied,
                        "skipped": report.skipped,
                        "failed": report.failed,
                        "bytes_copied": report.bytes_copied,
                    })
                );
            } else {
                for name in &report.copied {
                    println!("copied  {name}");
                }
                for name in &report.skipped {
                    println!("present {name}");
                }
                for name in &report.failed {
                    println!("failed  {name}");
                }
            }
        }
        Commands::Config { save } => {
            if save {
                config.save(cli.config.as_deref());
            }
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
