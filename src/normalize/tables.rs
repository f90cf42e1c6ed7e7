//! Table and cell repair.

use crate::dom::{Document, Element};

const CELL_BORDER: &str = "1px solid #000";

/// Fill in table width/border and cell border/padding defaults.
///
/// Returns the number of `table`, `td` and `th` elements changed.
pub(crate) fn repair_tables(doc: &mut Document, min_padding_px: u32) -> usize {
    let mut touched = 0;
    doc.walk_mut(&mut |el| {
        let changed = if el.is("table") {
            repair_table(el)
        } else if el.is("td") || el.is("th") {
            repair_cell(el, min_padding_px)
        } else {
            false
        };
        if changed {
            touched += 1;
        }
    });
    touched
}

fn repair_table(table: &mut Element) -> bool {
    let mut changed = false;
    if !table.has_attr("width") && table.style("width").is_none() {
        table.set_attr("width", "100%");
        changed = true;
    }
    if !table.has_attr("border") {
        table.set_attr("border", "1");
        changed = true;
    }
    changed
}

fn repair_cell(cell: &mut Element, min_padding_px: u32) -> bool {
    let mut changed = false;

    if !cell.has_style_matching(|k| k.starts_with("border")) {
        cell.set_style("border", CELL_BORDER);
        changed = true;
    }

    if needs_padding(cell, min_padding_px) {
        cell.set_style("padding", &format!("{}px", min_padding_px));
        changed = true;
    }

    if let Some(align) = cell.attr("align").map(|a| a.trim().to_ascii_lowercase()) {
        if matches!(align.as_str(), "left" | "center" | "right" | "justify") {
            changed |= cell.add_class(&format!("text-{}", align));
        }
    }

    changed
}

/// No padding at all, or a `padding` made only of px values under the minimum.
fn needs_padding(cell: &Element, min_padding_px: u32) -> bool {
    if cell.has_style_matching(|k| k.starts_with("padding-")) {
        return false;
    }
    let Some(padding) = cell.style("padding") else {
        return true;
    };
    padding.split_whitespace().all(|token| {
        token
            .strip_suffix("px")
            .and_then(|n| n.trim().parse::<f64>().ok())
            .is_some_and(|px| px < f64::from(min_padding_px))
    })
}
