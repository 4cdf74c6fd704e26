use clap::Parser;
use quote_budget_rust::{create_pool, db, service, AppConfig, BudgetEngine, BudgetService};
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// 本地处理一份报价单/采购清单，打印逐行匹配结果与总价
#[derive(Parser, Debug)]
#[command(name = "budget-cli", version, about)]
struct Args {
    /// 文档路径 (.txt / .pdf / .docx / 图片)
    file: PathBuf,

    /// 同时导出 CSV
    #[arg(long, value_name = "OUT")]
    csv: Option<PathBuf>,

    /// 以 JSON 输出完整报告
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = AppConfig::load()?;

    let pool = create_pool(&config.database.url).await?;
    db::ensure_schema(&pool).await?;

    let engine = BudgetEngine::new(&config.rules, config.matching)?;
    let budget = BudgetService::new(pool, engine, config.ocr.clone());
    let report = budget.process_file(&args.file).await?;

    if let Some(out) = &args.csv {
        service::export_to_csv(&report, out)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for item in report.items() {
        match &item.catalog_entry {
            Some(product) => println!(
                "✔ {} x{} -> {} (R$ {}) = R$ {}",
                item.original_line,
                item.quantity,
                product.name,
                product.unit_price.with_scale(2),
                item.line_amount
                    .as_ref()
                    .map(|a| a.with_scale(2).to_string())
                    .unwrap_or_default()
            ),
            None => match (&item.best_candidate, item.similarity_score) {
                (Some(candidate), Some(score)) => println!(
                    "❌ {} (melhor candidato: {}, {:.0}%)",
                    item.original_line,
                    candidate,
                    score * 100.0
                ),
                _ => println!("❌ {}", item.original_line),
            },
        }
    }
    println!(
        "Total: R$ {} ({} encontrados, {} não encontrados)",
        report.total().with_scale(2),
        report.matched_count(),
        report.unmatched_count()
    );

    Ok(())
}
