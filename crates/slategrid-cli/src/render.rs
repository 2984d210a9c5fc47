use slategrid::core::models::item::ItemCategory;
use slategrid::engine::scoring::Evaluation;
use slategrid::engine::session::PlacementSession;

const EMPTY_CELL: &str = ".";

pub fn render_score(evaluation: &Evaluation) -> String {
    format!(
        "Score: {:.2} / 100 (raw total {:.2})",
        evaluation.score, evaluation.raw_total
    )
}

/// Draws the grid row by row, one symbol per slot, followed by one line per placed copy.
///
/// `S` marks a slate, `A` a contributing artifact and `!` an artifact that breaks its
/// placement condition. Cells receiving buffs show the buff level after the symbol.
pub fn render_grid(session: &PlacementSession, evaluation: &Evaluation) -> String {
    let grid = session.grid();
    let mut lines = Vec::new();

    let mut row = Vec::with_capacity(grid.width());
    for slot in 0..grid.slot_count() {
        let report = evaluation.slots.get(slot);
        let symbol = match grid.get(slot).map(|item| item.category()) {
            None => EMPTY_CELL,
            Some(ItemCategory::Slate) => "S",
            Some(ItemCategory::Artifact) if report.is_some_and(|r| r.violated) => "!",
            Some(ItemCategory::Artifact) => "A",
        };
        let level = report.map_or(0, |r| r.level);
        row.push(if level > 0 {
            format!("{symbol}+{level:<2}")
        } else {
            format!("{symbol:<4}")
        });
        if row.len() == grid.width() || slot + 1 == grid.slot_count() {
            lines.push(row.join(" ").trim_end().to_string());
            row.clear();
        }
    }

    if grid.occupied_count() > 0 {
        lines.push(String::new());
    }
    for (slot, _, item) in grid.occupied() {
        let report = evaluation.slots.get(slot).cloned().unwrap_or_default();
        let mut line = format!("{slot:>4}  {:<24}", item.item_id);
        match item.category() {
            ItemCategory::Artifact => {
                line.push_str(&format!(
                    " lvl {}+{}  p{}  {:>8.2}",
                    report.level,
                    item.upgrade_level,
                    item.priority().unwrap_or(1),
                    report.contribution
                ));
                if report.violated {
                    line.push_str("  violated");
                }
            }
            ItemCategory::Slate => {
                line.push_str(&format!(" rot {}", item.rotation()));
            }
        }
        if let Some(effect) = &report.effect {
            line.push_str(&format!("  [{effect}]"));
        }
        lines.push(line);
    }

    lines.join("\n")
}
