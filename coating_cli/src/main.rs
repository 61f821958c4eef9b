//! # Horizon Suite Coating Estimator CLI
//!
//! Terminal front end for the coating cost calculator. Prompts for a quote
//! form, prints the breakdown, and saves the quote to a quote book when
//! `HORIZON_BOOK` is set.
//!
//! ## Environment
//!
//! - `HORIZON_BOOK` - path of the `.hzq` quote book to save into
//! - `HORIZON_USER`, `HORIZON_USER_NAME`, `HORIZON_ROLE` - who is quoting
//! - `RUST_LOG` - log filter (default `info`)
//! - `LOG_FORMAT` - `pretty` or `json`

mod config;

use std::io::{self, BufRead, Write};
use std::path::Path;

use coating_core::calculations::{calculate, CalculationItem, CoatingCostInput, CoatingCostResult, TaxSummary};
use coating_core::desk::QuoteDesk;
use coating_core::events::TracingSink;
use coating_core::file_io::{load_book, load_or_create_book, save_book, FileLock};
use coating_core::formatting::{format_area, format_percentage, format_rupiah, format_thickness};
use coating_core::permissions::{role_has_permission, Permission, User};
use coating_core::quote::CustomerRef;
use coating_core::{CalcResult, EstimatorSettings};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::CliConfig;

fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so stdout stays clean for the JSON output
    if config.log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr).with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .init();
    }
}

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn prompt_string(prompt: &str, default: &str) -> String {
    prompt_line(prompt).unwrap_or_else(|| default.to_string())
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|s| s.replace(',', ".").parse().ok())
        .unwrap_or(default)
}

fn prompt_u32(prompt: &str, default: u32) -> u32 {
    prompt_line(prompt).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn read_form(settings: &EstimatorSettings) -> CoatingCostInput {
    let defaults = settings.prefill();

    let customer_id = prompt_string("Customer ID [CUST-001]: ", "CUST-001");
    let project_name = prompt_string("Project name [Demo Project]: ", "Demo Project");

    CoatingCostInput {
        customer_id: Some(customer_id),
        project_name,
        surface_area: prompt_f64("Surface area (m²) [100]: ", 100.0),
        coating_thickness: prompt_f64("Dry film thickness per coat (µm) [150]: ", 150.0),
        number_of_coats: prompt_u32("Number of coats [2]: ", 2),
        material_cost_per_unit: prompt_f64("Material cost per m² per coat (IDR) [50000]: ", 50_000.0),
        labor_cost_per_unit: prompt_f64(
            &format!("Labor cost per m² per coat (IDR) [{}]: ", defaults.labor_cost_per_unit),
            defaults.labor_cost_per_unit,
        ),
        overhead_percentage: prompt_f64(
            &format!("Overhead % [{}]: ", defaults.overhead_percentage),
            defaults.overhead_percentage,
        ),
        profit_margin: prompt_f64(
            &format!("Profit margin % [{}]: ", defaults.profit_margin),
            defaults.profit_margin,
        ),
        tax_percentage: Some(prompt_f64(
            &format!("PPN % [{}]: ", settings.default_tax_percentage),
            settings.default_tax_percentage,
        )),
    }
}

fn print_result(input: &CoatingCostInput, result: &CoatingCostResult) {
    println!("═══════════════════════════════════════");
    println!("  COATING QUOTE");
    println!("═══════════════════════════════════════");
    println!();
    println!("Input:");
    println!("  Project:   {}", input.project_name);
    println!("  Area:      {}", format_area(input.surface_area));
    println!(
        "  System:    {} coat(s) × {}",
        input.number_of_coats,
        format_thickness(input.coating_thickness)
    );
    println!();
    println!("Costs:");
    println!("  Material:             {}", format_rupiah(result.material_total));
    println!("  Labor:                {}", format_rupiah(result.labor_total));
    println!("  Subtotal:             {}", format_rupiah(result.subtotal));
    println!(
        "  Overhead ({}):       {}",
        format_percentage(input.overhead_percentage, 0),
        format_rupiah(result.overhead_amount)
    );
    println!("  Total with overhead:  {}", format_rupiah(result.total_with_overhead));
    println!(
        "  Profit ({}):         {}",
        format_percentage(input.profit_margin, 0),
        format_rupiah(result.profit_amount)
    );
    println!();
    println!("═══════════════════════════════════════");
    println!("  QUOTE: {}", format_rupiah(result.final_quote));
    println!("  per m²: {}   per coat: {}", format_rupiah(result.cost_per_sqm), format_rupiah(result.cost_per_coat));

    if let Some(rate) = input.tax_percentage {
        let tax = TaxSummary::from_result(result, rate);
        println!(
            "  PPN {}: {}   incl. PPN: {}",
            format_percentage(rate, 0),
            format_rupiah(tax.tax_amount),
            format_rupiah(tax.total_with_tax)
        );
    }
    println!("═══════════════════════════════════════");
}

fn save_to_book(config: &CliConfig, path: &Path, input: CoatingCostInput) -> CalcResult<String> {
    let _lock = FileLock::acquire(path, config.user_id.clone())?;

    let book = load_or_create_book(path, config.user_id.clone(), config.user_name.clone())?;
    let mut desk = QuoteDesk::new(book, TracingSink);

    let user = User::new(config.user_id.clone(), config.user_name.clone(), config.role);
    let customer_id = input.customer_id.clone().unwrap_or_default();
    let customer = CustomerRef::new(customer_id.clone(), customer_id);
    let id = desk.create_quote(&user, customer, CalculationItem::Quick(input))?;

    let book = desk.into_book();
    let number = book
        .get_quote(&id)
        .map(|q| q.quote_number.clone())
        .unwrap_or_default();
    save_book(&book, path)?;
    Ok(number)
}

/// Estimator defaults from the configured book, falling back to built-ins
fn load_settings(config: &CliConfig) -> EstimatorSettings {
    config
        .book_path
        .as_deref()
        .filter(|path| path.exists())
        .and_then(|path| match load_book(path) {
            Ok(book) => Some(book.settings),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default settings");
                None
            }
        })
        .unwrap_or_default()
}

fn main() {
    let config = CliConfig::from_env();
    init_tracing(&config);
    tracing::debug!(user = %config.user_id, role = %config.role, book = ?config.book_path, "estimator started");

    println!("Horizon Suite - Coating Estimator");
    println!("=================================");
    println!();

    if !role_has_permission(config.role, Permission::UseCalculator) {
        eprintln!("Role '{}' cannot use the calculator.", config.role);
        std::process::exit(2);
    }

    if let Some(holder) = config.book_path.as_deref().and_then(FileLock::check) {
        if holder.user_id != config.user_id {
            println!(
                "Note: the quote book is being edited by {} on {} since {}; saving may fail.",
                holder.user_id,
                holder.machine,
                holder.locked_at.format("%Y-%m-%d %H:%M")
            );
            println!();
        }
    }

    let settings = load_settings(&config);
    let input = read_form(&settings);
    println!();

    let warnings = input.validate();
    if !warnings.is_empty() {
        println!("Please check the form:");
        for warning in &warnings {
            println!("  - {}", warning);
        }
        println!();
    }

    match calculate(&input) {
        Ok(result) => {
            print_result(&input, &result);

            println!();
            println!("JSON Output:");
            if let Ok(json) = serde_json::to_string_pretty(&result) {
                println!("{}", json);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            std::process::exit(1);
        }
    }

    let Some(path) = config.book_path.clone() else {
        return;
    };
    if !warnings.is_empty() {
        println!();
        println!("Quote not saved: fix the form first.");
        return;
    }
    if !role_has_permission(config.role, Permission::ManageQuotes) {
        println!();
        println!("Quote not saved: role '{}' cannot manage quotes.", config.role);
        return;
    }

    match save_to_book(&config, &path, input) {
        Ok(number) => {
            println!();
            println!("Saved quote {} to {}", number, path.display());
        }
        Err(e) => {
            eprintln!("Could not save quote: {}", e);
            std::process::exit(1);
        }
    }
}
