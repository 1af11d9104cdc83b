//! Charts for optimizer runs and dosing plans.

use alloyforge_core::logger::{read_generation_log, GenerationLogEntry};
use alloyforge_schemas::dosing::DosingPlan;
use anyhow::Result;
use plotters::prelude::*;

/// Best, mean and best-so-far fitness per generation, read back from the generation log.
pub fn plot_convergence(path: &str, log_path: &str) -> Result<()> {
    let entries = read_generation_log(log_path)?;
    if entries.is_empty() {
        println!("[Plotting] Warning: No generations to plot.");
        return Ok(());
    }

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let last_generation = entries.last().map_or(1, |e| e.generation.max(1));
    let (min_fitness, max_fitness) = entries
        .iter()
        .flat_map(|e| [e.best_fitness, e.mean_fitness, e.best_so_far_fitness])
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let padding = ((max_fitness - min_fitness) * 0.05).max(1e-6);

    let mut chart = ChartBuilder::on(&root)
        .caption("Fitness Convergence", ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(70)
        .build_cartesian_2d(0usize..last_generation, (min_fitness - padding)..(max_fitness + padding))?;

    chart
        .configure_mesh()
        .x_desc("Generation")
        .y_desc("Fitness")
        .draw()?;

    let series: [(&str, RGBColor, fn(&GenerationLogEntry) -> f64); 3] = [
        ("Best of generation", RED, |e| e.best_fitness),
        ("Mean", BLUE, |e| e.mean_fitness),
        ("Best so far", GREEN, |e| e.best_so_far_fitness),
    ];
    for (label, color, value) in series {
        chart
            .draw_series(LineSeries::new(
                entries.iter().map(|e| (e.generation, value(e))),
                color.stroke_width(2),
            ))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Required feedstock mass per element as a bar chart.
pub fn plot_dosing_plan(path: &str, plan: &DosingPlan) -> Result<()> {
    let elements: Vec<String> = plan.line_items.iter().map(|item| item.element.clone()).collect();
    let max_mass = plan
        .line_items
        .iter()
        .map(|item| item.required_feedstock_kg)
        .fold(0.0, f64::max);

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Required Feedstock per Element", ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((0usize..elements.len()).into_segmented(), 0f64..max_mass.max(1.0) * 1.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Element")
        .y_desc("Feedstock (kg)")
        .x_label_formatter(&|segment| match segment {
            SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => elements.get(*i).cloned().unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.filled())
            .margin(20)
            .data(
                plan.line_items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i, item.required_feedstock_kg)),
            ),
    )?;

    root.present()?;
    Ok(())
}
