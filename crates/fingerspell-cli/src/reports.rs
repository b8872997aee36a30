use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fingerspell_core::dataset::EvalReport;
use fingerspell_core::model::Model;
use fingerspell_core::replay::ReplayReport;
use fingerspell_core::session::{CommitEvent, RecognizerSession};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_model_summary(model: &Model) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Layer").add_attribute(Attribute::Bold),
        Cell::new("Shape"),
        Cell::new("Activation"),
    ]);
    for (i, layer) in model.layers.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i),
            Cell::new(format!("{} x {}", layer.weights.len(), layer.biases.len())),
            Cell::new(layer.activation),
        ]);
    }
    println!("\n{}", table);
    println!(
        "Fingerprint: {}\nLabels ({}): {}",
        model.short_fingerprint(),
        model.labels.len(),
        model.labels.join(" ")
    );
}

pub fn print_eval_report(report: &EvalReport, skipped_rows: usize) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Label").add_attribute(Attribute::Bold),
        Cell::new("Hits").set_alignment(CellAlignment::Right),
        Cell::new("Total").set_alignment(CellAlignment::Right),
        Cell::new("Accuracy").set_alignment(CellAlignment::Right),
    ]);
    for stats in &report.per_label {
        let accuracy = stats.accuracy();
        let color = if accuracy >= 0.9 {
            Color::Green
        } else if accuracy >= 0.7 {
            Color::Yellow
        } else {
            Color::Red
        };
        table.add_row(vec![
            Cell::new(&stats.label).add_attribute(Attribute::Bold),
            Cell::new(stats.hits).set_alignment(CellAlignment::Right),
            Cell::new(stats.total).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", accuracy * 100.0))
                .fg(color)
                .set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\n{}", table);
    println!(
        "Overall: {}/{} = {:.1}% ({} rows skipped)",
        report.hits,
        report.total,
        report.accuracy() * 100.0,
        skipped_rows
    );
}

pub fn print_replay_report(report: &ReplayReport, session: &RecognizerSession) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").set_alignment(CellAlignment::Right),
    ]);
    let mode = match session.model_fingerprint() {
        Some(fp) => format!("model {}", fp),
        None => "rules".to_string(),
    };
    for (name, value) in [
        ("Classifier", mode),
        ("Frames processed", report.frames.to_string()),
        ("Frames rejected", report.invalid_frames.to_string()),
        ("Frames suppressed", report.suppressed_frames.to_string()),
        ("Predictions received", report.predictions.to_string()),
        ("Decisions", report.decisions.to_string()),
        ("Commits", report.commits.len().to_string()),
        ("Channel drops", report.channel.rejected_total().to_string()),
    ] {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("\n{}", table);

    if !report.commits.is_empty() {
        let trace: Vec<String> = report
            .commits
            .iter()
            .map(|c| match c {
                CommitEvent::Letter(label) => label.clone(),
                CommitEvent::Space => "␣".to_string(),
                CommitEvent::Delete => "⌫".to_string(),
            })
            .collect();
        println!("Commit trace: {}", trace.join(" "));
    }
}
