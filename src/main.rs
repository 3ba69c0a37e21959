use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, error, info, warn};

// 从 lib.rs 导入模块
use rust_srsystem_next::config::AppConfig;
use rust_srsystem_next::services::grading::GradingService;
use rust_srsystem_next::storage;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv().ok();

    // 记录程序启动时间
    let start_datetime = chrono::Utc::now();

    // 启动前预处理 //

    // 初始化配置
    setup_panic!();
    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    // 打印信息
    warn!(
        "Starting grade recomputation pass...
        Project: {}
        Version: {}
        Authors: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let storage = match storage::create_storage().await {
        Ok(storage) => storage,
        Err(e) => {
            error!("存储初始化失败: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    // 输出预处理时间
    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(start_datetime)
            .num_milliseconds()
    );

    // 预处理完成 //

    // 全量重算：逐班级提交总评成绩，单班失败不中断整体
    let service = GradingService::new(storage.clone());

    let class_ids = match storage.list_class_ids().await {
        Ok(class_ids) => class_ids,
        Err(e) => {
            error!("查询班级列表失败: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let mut processed = 0usize;
    let mut failed = 0usize;
    for class_id in class_ids {
        match service.batch_recompute_for_class(class_id).await {
            Ok(outcome) => {
                debug!(
                    "班级 {} 重算完成: {} 成功, {} 失败",
                    class_id, outcome.processed, outcome.failed
                );
                processed += outcome.processed;
                failed += outcome.failed;
            }
            Err(e) => {
                error!("班级 {} 重算失败: {e}", class_id);
                failed += 1;
            }
        }
    }

    info!(
        "Recomputation pass finished in {} ms: {} enrollments processed, {} failed",
        chrono::Utc::now()
            .signed_duration_since(start_datetime)
            .num_milliseconds(),
        processed,
        failed
    );

    if failed > 0 {
        std::process::ExitCode::FAILURE
    } else {
        std::process::ExitCode::SUCCESS
    }
}
