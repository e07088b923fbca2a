use budget_allocator::utils::{logger, validation::Validate};
use budget_allocator::{
    AllocationEngine, AllocationRequestBuilder, ArtifactModel, CliConfig, ScenarioProvider,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting budget-allocator CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    println!("Loading pre-trained model...");
    let model = match ArtifactModel::load(config.model_path()) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!("❌ Model loading failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(3);
        }
    };
    println!("✅ Model loaded successfully!");
    println!(
        "   {} (trained {})",
        model.name(),
        model.trained_at().format("%Y-%m-%d")
    );

    let engine = AllocationEngine::new(model);

    // "Plot Response Curves" action: render the curves and stop.
    if config.curves {
        let max_daily_spend = config.total_budget / config.time_period as f64;
        match engine
            .plot_response_curves(max_daily_spend, config.curve_samples)
            .await
        {
            Ok(chart) => {
                println!("{}", chart);
                println!("Response curves indicate each channel's point of diminishing returns.");
            }
            Err(e) => {
                tracing::error!("❌ Curve sampling failed: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // "Predict" action: validate the inputs, then ask the optimizer.
    let builder = AllocationRequestBuilder::new(config.channels().to_vec());
    let bounds = match config.bounds() {
        Ok(bounds) => bounds,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(2);
        }
    };

    let request = match builder.collect_and_validate(
        config.total_budget(),
        config.time_period(),
        &bounds,
    ) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("❌ Input validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(2);
        }
    };

    match engine.run(&request).await {
        Ok(report) => {
            println!("{}", report);
            tracing::info!("✅ Allocation completed successfully!");
            println!("✅ Allocation completed successfully!");
        }
        Err(e) => {
            tracing::error!(
                "❌ Allocation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                budget_allocator::utils::error::ErrorSeverity::Low => 0,
                budget_allocator::utils::error::ErrorSeverity::Medium => 2,
                budget_allocator::utils::error::ErrorSeverity::High => 1,
                budget_allocator::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
