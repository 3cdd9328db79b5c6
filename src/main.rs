use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use log::info;

use teledash::chart_data::prepare_comparison;
use teledash::chart_export::write_chart;
use teledash::config::{AppConfig, ConfigManager};
use teledash::export::{write_csv, ExportOptions};
use teledash::filter::{CriteriaSet, FacetCriterion, RangeCriterion, FACET_COLUMNS};
use teledash::loader::{load_table, LoadOptions};
use teledash::template::TemplateManager;
use teledash::{render_report, Args, ChartFormat, CompressionFormat, Session, APP_NAME};

/// Build the criteria set from the command-line facet selections, in the
/// fixed facet order.
fn criteria_from_args(args: &Args, age_column: &str) -> Result<CriteriaSet> {
    let age = match &args.ages {
        Some(spec) => Some(RangeCriterion::parse(age_column, spec)?),
        None => None,
    };
    let selections: [&String; 8] = [
        &args.job,
        &args.marital,
        &args.default_flag,
        &args.housing,
        &args.loan,
        &args.contact,
        &args.month,
        &args.day_of_week,
    ];
    let facets = FACET_COLUMNS
        .iter()
        .zip(selections)
        .map(|(column, values)| FacetCriterion::parse(column, values))
        .collect();
    Ok(CriteriaSet { age, facets })
}

fn load_options_from(args: &Args, config: &AppConfig) -> LoadOptions {
    let mut options = LoadOptions::new();
    if let Some(delimiter) = args.delimiter.or(config.file_loading.delimiter) {
        options = options.with_delimiter(delimiter);
    }
    if args.no_header {
        options = options.with_has_header(false);
    } else if let Some(has_header) = config.file_loading.has_header {
        options = options.with_has_header(has_header);
    }
    if let Some(compression) = args.compression {
        options = options.with_compression(compression);
    }
    if let Some(format) = args.format {
        options = options.with_format(format);
    }
    if let Some(sheet) = args.sheet.as_ref().or(config.file_loading.sheet.as_ref()) {
        options = options.with_sheet(sheet.clone());
    }
    options
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.init_config {
        let config = ConfigManager::new(APP_NAME)?;
        let path = config.write_default_config(args.force)?;
        println!("Wrote default config to {}", path.display());
        return Ok(Some(()));
    }

    if args.list_templates {
        let config = ConfigManager::new(APP_NAME)?;
        let manager = TemplateManager::new(&config)?;
        if manager.all_templates().is_empty() {
            println!("No templates saved");
        }
        for template in manager.all_templates() {
            match &template.description {
                Some(description) => println!("{} - {}", template.name, description),
                None => println!("{}", template.name),
            }
        }
        return Ok(Some(()));
    }

    if args.remove_templates {
        let config = ConfigManager::new(APP_NAME)?;
        let mut manager = TemplateManager::new(&config)?;
        manager.remove_all_templates()?;
        println!("All templates removed successfully");
        return Ok(Some(()));
    }

    Ok(None)
}

fn run(args: &Args) -> Result<()> {
    let path = args
        .path
        .as_deref()
        .ok_or_else(|| eyre!("no dataset path given"))?;

    let config_manager = ConfigManager::new(APP_NAME)?;
    let config = AppConfig::load(&config_manager)?;

    let options = load_options_from(args, &config);
    let raw = load_table(path, &options)?;

    let target = args
        .target
        .clone()
        .unwrap_or_else(|| config.analysis.target.clone());
    let mut criteria = criteria_from_args(args, &config.analysis.age_column)?;

    let mut template_manager = TemplateManager::new(&config_manager)?;
    if let Some(name) = &args.template {
        let template = template_manager
            .get_template_by_name(name)
            .ok_or_else(|| eyre!("template not found: {}", name))?;
        criteria = template.criteria.clone();
        info!("applied template '{}'", name);
    }
    if let Some(name) = &args.save_template {
        let template =
            template_manager.create_template(name.clone(), None, criteria.clone(), Some(target.clone()))?;
        info!("saved template '{}' ({})", template.name, template.id);
    }

    let mut session = Session::new(raw, target);
    session.set_criteria(criteria);
    let comparison = session.comparison()?;
    print!("{}", render_report(&comparison));

    if let Some(export_path) = &args.export_raw {
        let export_options = ExportOptions {
            delimiter: config.export_delimiter(),
            include_header: config.export.include_header,
            compression: CompressionFormat::from_extension(export_path),
        };
        write_csv(session.raw(), export_path, &export_options)?;
        println!("Exported raw dataset to {}", export_path.display());
    }

    if let Some(chart_path) = &args.chart {
        let format = args
            .chart_format
            .or_else(|| ChartFormat::from_path(chart_path))
            .unwrap_or_else(|| config.chart_format());
        let chart = prepare_comparison(&comparison.raw, comparison.filtered.as_ref());
        write_chart(
            chart_path,
            &chart,
            format,
            (config.chart.width, config.chart.height),
        )?;
        println!("Wrote comparison chart to {}", chart_path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
