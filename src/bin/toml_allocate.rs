use budget_allocator::config::scenario::TomlScenario;
use budget_allocator::utils::{logger, validation::Validate};
use budget_allocator::{
    AllocationEngine, AllocationRequestBuilder, ArtifactModel, ScenarioProvider,
};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-allocate")]
#[command(about = "Budget allocation predictor driven by a TOML scenario file")]
struct Args {
    /// Path to the TOML scenario file
    #[arg(short, long, default_value = "scenario.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Plot response curves instead of predicting an allocation
    #[arg(long)]
    curves: bool,

    /// Dry run - validate the scenario and show its summary without calling the optimizer
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-driven budget allocator");
    tracing::info!("📁 Loading scenario from: {}", args.config);

    let scenario = match TomlScenario::from_file(&args.config) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("❌ Failed to load scenario file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Err(e) = scenario.validate() {
        tracing::error!("❌ Scenario validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Scenario loaded and validated successfully");
    display_scenario_summary(&scenario);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the optimizer will not be called");
        let bounds = scenario.bounds()?;
        for (channel, (min, max)) in &bounds {
            println!("  would allocate {} within £{:.2}..£{:.2}", channel, min, max);
        }
        return Ok(());
    }

    println!("Loading pre-trained model...");
    let model = match ArtifactModel::load(scenario.model_path()) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(3);
        }
    };
    println!("✅ Model loaded successfully!");

    let engine = AllocationEngine::new(model);

    if args.curves {
        let max_daily_spend = scenario.total_budget() / scenario.time_period() as f64;
        let chart = match engine.plot_response_curves(max_daily_spend, 20).await {
            Ok(chart) => chart,
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        };
        println!("{}", chart);
        return Ok(());
    }

    let builder = AllocationRequestBuilder::new(scenario.channels().to_vec());
    let bounds = scenario.bounds()?;
    let request = match builder.collect_and_validate(
        scenario.total_budget(),
        scenario.time_period(),
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
            println!("✅ Allocation completed successfully!");
        }
        Err(e) => {
            tracing::error!(
                "❌ Allocation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
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

fn display_scenario_summary(scenario: &TomlScenario) {
    println!("📋 Scenario: {}", scenario.scenario.name);
    if let Some(description) = &scenario.scenario.description {
        println!("   {}", description);
    }
    println!("   Model:       {}", scenario.model_path());
    println!("   Budget:      £{:.2}", scenario.total_budget());
    println!("   Period:      {} days", scenario.time_period());
    println!("   Channels:    {}", scenario.channels().join(", "));
}
