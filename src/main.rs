use clap::Parser;
use dialoguer::{Confirm, Select};
use indicatif::{ProgressBar, ProgressStyle};
use solar_diag::analyzer::{self, AnalysisController};
use solar_diag::{cli, config, error, export, presenter, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::{DiagError, Result};
use solar_diag_common::fleet::sample_panels;
use solar_diag_common::{
    AlertBoard, AnalysisError, AnalysisResult, FleetSummary, HealthBand, ImageClass, PanelFilter,
    ReportEntry,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load()?;
    let backend_kind = cli.backend.unwrap_or(config.backend);

    match cli.command {
        Commands::Analyze { file, class, output, no_prompt } => {
            println!("🔆 solar-diag - パネル画像解析\n");

            // 1. 画像読み込み
            println!("[1/3] 画像を読み込み中...");
            let selection = scanner::load_selection(&file, config.max_file_size_mb)?;
            let image_class = match class {
                Some(class) => class,
                None if no_prompt => return Err(DiagError::MissingImageClass),
                None => prompt_image_class()?,
            };
            println!("{}", presenter::render_selection(&selection, Some(image_class)));
            println!("✔ 読み込み完了\n");

            // 2. 解析
            println!("[2/3] 解析中... (バックエンド: {})", backend_kind.name());
            let file_name = selection.file_name.clone();
            let controller = AnalysisController::new(
                analyzer::build_backend(backend_kind, &config)?,
                config.timeout(),
            );
            controller.select_file(selection);
            controller.select_image_class(image_class);
            controller.submit()?;

            let result = loop {
                wait_with_spinner(&controller, "解析中...").await;
                match controller.outcome() {
                    Some(Ok(result)) => break result,
                    Some(Err(error)) => {
                        println!("{}", presenter::render_failure(&error));
                        if error.is_retryable() && !no_prompt && confirm_retry()? {
                            controller.retry()?;
                            continue;
                        }
                        return Err(error.into());
                    }
                    None => {
                        println!("解析をキャンセルしました");
                        return Ok(());
                    }
                }
            };
            println!("✔ 解析完了\n");

            // 3. 結果表示
            println!("[3/3] 解析結果");
            println!("{}", presenter::render_result(Some(&result)));

            if let Some(output) = output {
                let entry = ReportEntry::new(file_name, image_class, result);
                let output = export::resolve_output_path(&output, "result.json");
                let json = serde_json::to_string_pretty(&entry)?;
                std::fs::write(&output, json)?;
                println!("\n✔ 結果を保存: {}", output.display());
            }
        }

        Commands::Batch { folder, class, recursive, output } => {
            println!("🔆 solar-diag - 一括解析\n");

            // 1. Scan
            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_folder(&folder, recursive)?;
            if images.is_empty() {
                return Err(DiagError::NoImagesFound(folder.display().to_string()));
            }
            println!("✔ {}枚の画像を検出\n", images.len());

            // 2. Analyze
            println!("[2/3] 解析中... (バックエンド: {}, 種別: {})", backend_kind.name(), class.label());
            let controller = AnalysisController::new(
                analyzer::build_backend(backend_kind, &config)?,
                config.timeout(),
            );
            controller.select_image_class(class);

            let progress = ProgressBar::new(images.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                progress.set_style(style.progress_chars("#>-"));
            }

            let mut entries = Vec::new();
            let mut failed = 0usize;
            for image in &images {
                progress.set_message(image.file_name.clone());

                let selection = match scanner::load_selection(&image.path, config.max_file_size_mb) {
                    Ok(selection) => selection,
                    Err(e) => {
                        progress.println(format!("⚠ スキップ {}: {}", image.file_name, e));
                        failed += 1;
                        progress.inc(1);
                        continue;
                    }
                };
                controller.select_file(selection);
                controller.submit()?;

                match wait_for_outcome(&controller).await {
                    Some(Ok(result)) => {
                        let band = HealthBand::for_score(result.health_score());
                        progress.println(format!(
                            "{} {} {}% ({})",
                            band.marker(),
                            image.file_name,
                            result.health_score(),
                            result.faults().join(", ")
                        ));
                        entries.push(ReportEntry::new(image.file_name.clone(), class, result));
                    }
                    Some(Err(error)) => {
                        progress.println(format!("⚠ {}: {}", image.file_name, error));
                        failed += 1;
                    }
                    None => {
                        progress.println("解析をキャンセルしました。ここまでの結果を保存します");
                        break;
                    }
                }
                progress.inc(1);
            }
            progress.finish_and_clear();
            println!("✔ 解析完了 (成功: {}, 失敗: {})\n", entries.len(), failed);

            // 3. Report
            println!("[3/3] レポートを出力中...");
            let output = export::resolve_output_path(
                &output.unwrap_or_else(|| folder.clone()),
                "report.json",
            );
            export::write_report(&entries, &output)?;
            println!("✔ レポート出力: {}", output.display());

            println!("\n✅ 完了");
        }

        Commands::Dashboard { fault, urgency, export: export_path } => {
            println!("📊 solar-diag - パネル一覧\n");

            let panels = sample_panels();
            let summary = FleetSummary::from_panels(&panels);
            let filter = PanelFilter { fault, urgency };
            let visible = filter.apply(&panels);
            println!("{}", presenter::render_fleet(&summary, &visible));

            if let Some(path) = export_path {
                let path = export::resolve_output_path(&path, "fleet.xlsx");
                export::write_fleet_excel(&visible, &path)?;
                println!("\n✔ Excel出力: {}", path.display());
            }
        }

        Commands::Alerts { resolve, today } => {
            println!("🔔 solar-diag - アラート\n");

            let mut board = AlertBoard::with_samples();
            for id in resolve {
                if board.mark_resolved(id) {
                    println!("✔ アラート #{} を解決済みにしました", id);
                } else {
                    println!("⚠ アラート #{} はアクティブではありません", id);
                }
            }

            let day = today.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
            println!("{}", presenter::render_alerts(&board, &day));
        }

        Commands::Config { set_api_key, set_endpoint, set_backend, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(backend) = set_backend {
                config.set_backend(backend)?;
                println!("✔ バックエンドを {} に設定しました", backend.name());
            }

            if show {
                println!("設定:");
                println!("  パス: {}", Config::config_path()?.display());
                println!("  バックエンド: {}", config.backend.name());
                println!("  エンドポイント: {}", config.endpoint.as_deref().unwrap_or("未設定"));
                println!("  APIキー: {}", if config.get_api_key().is_some() { "設定済み" } else { "未設定" });
                println!("  モック待ち時間: {}ms", config.mock_delay_ms);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  最大ファイルサイズ: {}MB", config.max_file_size_mb);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("solar_diag=debug,solar_diag_common=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn prompt_image_class() -> Result<ImageClass> {
    let labels: Vec<&str> = ImageClass::ALL.iter().map(|c| c.label()).collect();
    let index = Select::new()
        .with_prompt("画像種別を選択")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| DiagError::Prompt(e.to_string()))?;
    Ok(ImageClass::ALL[index])
}

fn confirm_retry() -> Result<bool> {
    Confirm::new()
        .with_prompt("再試行しますか？")
        .default(true)
        .interact()
        .map_err(|e| DiagError::Prompt(e.to_string()))
}

/// 解析中はスピナーを回し、Ctrl-Cでキャンセルする
async fn wait_with_spinner(controller: &AnalysisController, message: &str) {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    wait_or_cancel(controller).await;
    spinner.finish_and_clear();
}

async fn wait_or_cancel(controller: &AnalysisController) {
    tokio::select! {
        _ = controller.wait() => {}
        _ = tokio::signal::ctrl_c() => {
            controller.cancel();
        }
    }
}

/// 完了/失敗ならその結果、キャンセルなら None
async fn wait_for_outcome(
    controller: &AnalysisController,
) -> Option<std::result::Result<AnalysisResult, AnalysisError>> {
    wait_or_cancel(controller).await;
    controller.outcome()
}
