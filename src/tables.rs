use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use itertools::Itertools;

use crate::core::{
    constraint::MAX_CONSTRAINT_SCORE,
    evaluation::{Evaluation, MAX_PROFIT_SCORE, MAX_WASTE_SCORE, Outcome},
};

pub fn build_results_table(results: &[Evaluation]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Case", "Total", "Profit", "Waste", "Constraints", "Notes"]);
    for result in results {
        let id = Cell::new(&result.id).add_attribute(Attribute::Bold);
        let total = Cell::new(format!("{:.2}", result.total_score))
            .set_alignment(CellAlignment::Right)
            .fg(score_color(result.total_score, 100.0));
        match &result.outcome {
            Outcome::Scored(breakdown) => {
                table.add_row(vec![
                    id,
                    total,
                    score_cell(breakdown.profit_score, MAX_PROFIT_SCORE),
                    score_cell(breakdown.waste_score, MAX_WASTE_SCORE),
                    score_cell(breakdown.constraint_score, MAX_CONSTRAINT_SCORE),
                    Cell::new(breakdown.constraint_failures.iter().join(", ")).fg(Color::Red),
                ]);
            }
            Outcome::Rejected(rejection) => {
                table.add_row(vec![
                    id,
                    total,
                    Cell::new("—").add_attribute(Attribute::Dim),
                    Cell::new("—").add_attribute(Attribute::Dim),
                    Cell::new("—").add_attribute(Attribute::Dim),
                    Cell::new(rejection.tag()).fg(Color::Red),
                ]);
            }
        }
    }
    table
}

fn score_cell(score: f64, max_score: f64) -> Cell {
    Cell::new(format!("{score:.2}"))
        .set_alignment(CellAlignment::Right)
        .fg(score_color(score, max_score))
}

fn score_color(score: f64, max_score: f64) -> Color {
    if score >= max_score * 0.75 {
        Color::Green
    } else if score >= max_score * 0.25 {
        Color::DarkYellow
    } else {
        Color::Red
    }
}
