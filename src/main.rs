use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

use healthetl::config::EtlConfig;
use healthetl::domain::Entity;
use healthetl::logging;
use healthetl::pipeline::{
    run_pipeline, EntityLoadOutcome, Extractor, LoadReport, Loader, Transformer,
};
use healthetl::store::ArtifactStore;
use healthetl::warehouse::SqliteWarehouse;

#[derive(Parser)]
#[command(name = "healthetl")]
#[command(about = "Healthcare operational records ETL pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the pipeline config file (defaults to healthetl.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract raw entity data into the bronze layer
    Extract {
        /// Claims source CSV (overrides config)
        #[arg(long)]
        claims: Option<PathBuf>,
        /// Patients source CSV (overrides config)
        #[arg(long)]
        patients: Option<PathBuf>,
        /// Providers source CSV (overrides config)
        #[arg(long)]
        providers: Option<PathBuf>,
        /// Prescriptions source CSV (overrides config)
        #[arg(long)]
        prescriptions: Option<PathBuf>,
    },
    /// Transform bronze artifacts into the silver layer
    Transform,
    /// Load silver artifacts into the warehouse
    Load,
    /// Run extract, transform and load sequentially
    Run,
    /// Report warehouse row counts per entity
    Verify,
}

fn print_load_report(report: &LoadReport, counts: &BTreeMap<Entity, u64>) {
    println!("\n📊 Load results:");
    for (entity, outcome) in &report.outcomes {
        match outcome {
            EntityLoadOutcome::Loaded {
                rows,
                unresolved_medications,
            } => {
                println!("   {entity}: {rows} rows loaded");
                if !unresolved_medications.is_empty() {
                    println!(
                        "   ⚠️  {entity}: {} unmapped medication names kept with sentinel id",
                        unresolved_medications.len()
                    );
                }
            }
            EntityLoadOutcome::Failed { message } => {
                println!("   {entity}: FAILED ({message})");
            }
        }
    }
    println!("\n   Warehouse row counts:");
    for (entity, count) in counts {
        println!("   {entity}: {count} records");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = EtlConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract {
            claims,
            patients,
            providers,
            prescriptions,
        } => {
            println!("🔄 Running extraction...");
            if claims.is_some() {
                config.sources.claims = claims;
            }
            if patients.is_some() {
                config.sources.patients = patients;
            }
            if providers.is_some() {
                config.sources.providers = providers;
            }
            if prescriptions.is_some() {
                config.sources.prescriptions = prescriptions;
            }

            let extractor = Extractor::new(
                ArtifactStore::from_config(&config),
                config.sources.clone(),
            );
            let reports = extractor.extract_all().await?;
            println!("Extraction completed. Data saved to bronze layer:");
            for report in reports {
                println!(
                    "   {}: {} rows, {} columns (source: {})",
                    report.entity, report.rows, report.columns, report.source
                );
            }
        }
        Commands::Transform => {
            println!("🔄 Running transformation...");
            let transformer = Transformer::new(ArtifactStore::from_config(&config));
            match transformer.transform_all().await {
                Ok(reports) => {
                    println!("Transformation completed. Data saved to silver layer:");
                    for report in reports {
                        println!(
                            "   {}: {} in, {} duplicates removed, {} rejected, {} out",
                            report.entity,
                            report.rows_in,
                            report.duplicates_removed,
                            report.rows_rejected,
                            report.rows_out
                        );
                    }
                }
                Err(e) => {
                    error!("Transformation failed: {e}");
                    println!("⚠️  Transformation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Load => {
            println!("🔄 Running load...");
            let warehouse = Arc::new(SqliteWarehouse::open(&config.warehouse.path)?);
            let loader = Loader::new(
                ArtifactStore::from_config(&config),
                warehouse,
                config.load.batch_size,
            );
            let report = loader.load_all().await?;
            let counts = loader.verify_data_integrity().await?;
            print_load_report(&report, &counts);
            if !report.success() {
                std::process::exit(1);
            }
        }
        Commands::Run => {
            println!("🔄 Running full pipeline...");
            let outcome = run_pipeline(&config).await?;
            print_load_report(&outcome.load, &outcome.warehouse_counts);
            if !outcome.success() {
                println!("\n⚠️  Pipeline finished with failures; see logs for details.");
                std::process::exit(1);
            }
            println!("\n✅ Pipeline completed successfully.");
        }
        Commands::Verify => {
            let warehouse = Arc::new(SqliteWarehouse::open(&config.warehouse.path)?);
            let loader = Loader::new(
                ArtifactStore::from_config(&config),
                warehouse,
                config.load.batch_size,
            );
            let counts = loader.verify_data_integrity().await?;
            println!("Data integrity verification:");
            for (entity, count) in counts {
                println!("   {entity}: {count} records");
            }
        }
    }

    Ok(())
}
