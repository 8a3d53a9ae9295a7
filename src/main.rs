use hair_density::config::{self, RuntimeConfig};
use hair_density::image::io::{load_color_image, write_json_file};
use hair_density::{AnalysisResult, HairAnalyzer, View};
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = config::load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;

    let images = View::ALL
        .into_iter()
        .map(|view| load_color_image(config.inputs.path(view)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;

    let analyzer_config = config.resolved_analyzer();
    let sink = analyzer_config.heatmap.fs_sink();
    let analyzer = HairAnalyzer::new(analyzer_config);
    let result = analyzer
        .analyze(&images, config.inputs.labels.as_deref(), &sink)
        .map_err(|e| e.to_string())?;

    print_text_summary(&result);
    write_report(&config, &result)?;
    Ok(())
}

fn write_report(config: &RuntimeConfig, result: &AnalysisResult) -> Result<(), String> {
    if let Some(path) = config.output.result_path() {
        write_json_file(&path, result).map_err(|e| e.to_string())?;
        println!("\nJSON report written to {}", path.display());
    }
    Ok(())
}

fn print_text_summary(result: &AnalysisResult) {
    println!("Hair density summary");
    println!("  total_hairs: {}", result.total_hairs);
    println!("  confidence: {:.3}", result.confidence);
    println!("  analysis_time: {}", result.analysis_time);

    println!("\nContributions");
    for c in &result.view_contributions {
        println!("  {:<6} hairs={:<8} weight={:.1}", c.view, c.hairs, c.weight);
    }

    println!("\nViews");
    for (report, heatmap) in result.diagnostics.iter().zip(&result.heatmaps) {
        println!(
            "  {}: {}x{} via {:?} hair_px={} regions={} cells analyzed={}/{} failed={} mean_density={:.4} max_density={:.4} mean_conf={:.4}",
            report.label,
            report.input_width,
            report.input_height,
            report.resize,
            report.segment.hair_pixels,
            report.segment.regions_kept,
            report.density.cells_analyzed,
            report.density.cells_total,
            report.density.cells_failed,
            report.mean_density,
            report.max_density,
            report.mean_confidence,
        );
        println!("    heatmap: {heatmap}");
    }

    println!("\nTimings (ms): total={:.3}", result.timings.total_ms);
    for stage in &result.timings.stages {
        println!("  {:<18} {:.3}", stage.label, stage.elapsed_ms);
    }
}

fn usage() -> String {
    "Usage: hair_density <config.json>".to_string()
}
