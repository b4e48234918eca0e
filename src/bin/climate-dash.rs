use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use climate_dash::format::{
    format_count, format_number_short, format_percent, format_signed_number_short,
};
use climate_dash::views::{self, DashboardView};
use climate_dash::{DashboardBundle, DashboardConfig, IndicatorWindow, SelectionPatch, Store};
use climate_dash::{SelectionState, bundle, stats, storage};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser, Debug)]
#[command(
    name = "climate-dash",
    version,
    about = "Compare a reference country's climate-policy indicators against the world or another country"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// JSON config file (data location, reference country, file names).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory or http(s) base URL holding the five CSV tables.
    #[arg(long, global = true)]
    data: Option<String>,
    /// ISO3 code of the fixed reference country (default AUT).
    #[arg(long, global = true)]
    reference: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load all datasets and print coverage statistics.
    Summary,
    /// Apply a selection and print what each chart would show.
    Compare(CompareArgs),
    /// Write every series (countries and world averages) as a tidy table.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// ISO3 code of the comparison country; omit for the world average.
    #[arg(short, long)]
    country: Option<String>,
    /// Year for the bar chart and discrepancy marker.
    #[arg(short, long)]
    year: Option<i32>,
    /// Time window for the line charts: full, 20y, 30y or 35y.
    #[arg(short, long, default_value = "full")]
    window: IndicatorWindow,
    /// Print the view models as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output file.
    #[arg(long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = resolve_config(&cli.common)?;
    match cli.cmd {
        Command::Summary => cmd_summary(&config),
        Command::Compare(args) => cmd_compare(&config, args),
        Command::Export(args) => cmd_export(&config, args),
    }
}

fn resolve_config(args: &CommonArgs) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(data) = &args.data {
        config.data_location = data.clone();
    }
    if let Some(reference) = &args.reference {
        config.reference_iso3 = reference.trim().to_ascii_uppercase();
    }
    Ok(config)
}

fn fmt_year(y: Option<i32>) -> String {
    y.map(|y| y.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn cmd_summary(config: &DashboardConfig) -> Result<()> {
    let data = bundle::load_dashboard(config)?;
    for s in stats::metric_summaries(&data) {
        println!(
            "{:<13} countries={} with_data={}  years={}..{}  latest world={}",
            s.metric.key(),
            format_count(s.countries),
            format_count(s.with_data),
            fmt_year(s.first_year),
            fmt_year(s.last_year),
            format_number_short(s.latest_world)
        );
    }
    println!("scatter year: {}", fmt_year(data.scatter_year));
    let missing = data.missing_reference_metrics(&config.reference_iso3);
    if missing.is_empty() {
        println!("{}: present in all datasets", config.reference_iso3);
    } else {
        let names: Vec<&str> = missing.iter().map(|m| m.key()).collect();
        println!("{}: missing in {}", config.reference_iso3, names.join(", "));
    }
    Ok(())
}

fn cmd_compare(config: &DashboardConfig, args: CompareArgs) -> Result<()> {
    let data = Rc::new(bundle::load_dashboard(config)?);
    let store = Store::new(SelectionState::default());

    // Render on every notification, like a view would; keep the latest frame.
    let latest: Rc<RefCell<Option<DashboardView>>> = Rc::new(RefCell::new(None));
    let sub = {
        let data = Rc::clone(&data);
        let latest = Rc::clone(&latest);
        let reference = config.reference_iso3.clone();
        store.subscribe(move |state| {
            *latest.borrow_mut() = Some(views::dashboard_view(&data, state, &reference));
        })
    };

    let mut patch = SelectionPatch::new().year(args.year).window(args.window);
    if let Some(country) = &args.country {
        patch = patch.country(country.trim().to_ascii_uppercase());
    }
    store.set_state(patch);
    sub.unsubscribe();

    let Some(view) = latest.borrow_mut().take() else {
        anyhow::bail!("no view was rendered");
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&data, &view);
    }
    Ok(())
}

fn print_view(data: &DashboardBundle, view: &DashboardView) {
    println!(
        "Comparing {} vs {} (window {})",
        view.reference_label, view.comparison_label, view.state.indicator_window
    );

    println!("\nScatter, year {}: {} countries", fmt_year(view.scatter.year), view.scatter.points.len());
    for p in view
        .scatter
        .points
        .iter()
        .filter(|p| p.role != views::DotRole::Other)
    {
        println!(
            "  {:?} {}: subsidies {}, taxes {}",
            p.role,
            p.country,
            format_percent(Some(p.subsidies)),
            format_percent(Some(p.taxes))
        );
    }

    for pair in &view.small_multiples {
        let last = |s: &[climate_dash::DataPoint]| s.last().map(|d| (d.year, d.value));
        println!(
            "\n{}: {} points vs {} points; latest {:?} vs {:?}",
            pair.title,
            pair.reference.len(),
            pair.comparison.len(),
            last(&pair.reference),
            last(&pair.comparison)
        );
    }

    let latest_gap = |s: &[views::DiscrepancyPoint]| {
        s.last()
            .map(|d| format!("{} ({})", format_signed_number_short(Some(d.value)), d.year))
            .unwrap_or_else(|| "No data".to_string())
    };
    println!(
        "\nDiscrepancy (taxes - expenditure): {} {}, {} {}",
        view.reference_label,
        latest_gap(&view.discrepancy.reference),
        view.comparison_label,
        latest_gap(&view.discrepancy.comparison)
    );

    println!("\nTaxes vs expenditures, year {}", fmt_year(view.bars.year));
    for g in &view.bars.groups {
        println!(
            "  {}: taxes {}, expenditures {}",
            g.label,
            format_percent(g.taxes),
            format_percent(g.expenditures)
        );
    }

    if let Some(iso3) = view.state.selected_country() {
        if !data.country_name_by_iso3.contains_key(iso3) {
            eprintln!("note: {iso3} is not a known country code");
        }
    }
}

fn cmd_export(config: &DashboardConfig, args: ExportArgs) -> Result<()> {
    let data = bundle::load_dashboard(config)?;
    let path = &args.out;
    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&data, path)?,
        "json" => storage::save_json(&data, path)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!(
        "Saved {} rows to {}",
        format_count(storage::tidy_rows(&data).len()),
        path.display()
    );
    Ok(())
}
