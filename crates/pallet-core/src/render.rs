use crate::types::PackReport;
use std::fmt::Write;

/// Fill colors, assigned to item types in breakdown order.
const PALETTE: [&str; 16] = [
    "#FFADAD", "#FFD6A5", "#FDFFB6", "#CAFFBF", "#9BF6FF", "#A0C4FF", "#BDB2FF", "#FFC6FF",
    "#FFC8DD", "#FFD700", "#F0E68C", "#98FB98", "#AFEEEE", "#DDA0DD", "#F5DEB3", "#E6E6FA",
];

/// Draws the bin and every placement as an SVG document.
pub fn render_svg(report: &PackReport) -> Result<String, std::fmt::Error> {
    let mut svg = String::new();
    let margin = 20.0;
    let scale = 2.0;

    let bin_width = report.bin.width / scale;
    let bin_length = report.bin.length / scale;
    let svg_width = bin_width + (2.0 * margin);
    let svg_height = bin_length + (2.0 * margin) + 20.0;

    writeln!(&mut svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(
        &mut svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        svg_width, svg_height, svg_width, svg_height
    )?;
    writeln!(
        &mut svg,
        r##"  <rect width="100%" height="100%" fill="#f5f5f5"/>"##
    )?;
    writeln!(
        &mut svg,
        r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="#fff" stroke="#000" stroke-width="2"/>"##,
        margin, margin, bin_width, bin_length
    )?;

    for placement in &report.placements {
        let color_index = report
            .breakdown
            .iter()
            .position(|b| b.rid == placement.rid)
            .unwrap_or(0);
        let px = margin + (placement.x / scale);
        let py = margin + (placement.y / scale);
        let pw = placement.width / scale;
        let ph = placement.height / scale;

        writeln!(
            &mut svg,
            r##"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="#000" stroke-width="1"/>"##,
            px,
            py,
            pw,
            ph,
            PALETTE[color_index % PALETTE.len()]
        )?;

        let label = if placement.rotated {
            format!("{} (R)", placement.rid)
        } else {
            placement.rid.clone()
        };

        writeln!(
            &mut svg,
            r##"  <text x="{}" y="{}" font-family="Arial" font-size="10" fill="#000" text-anchor="middle">{}</text>"##,
            px + pw / 2.0,
            py + ph / 2.0 + 3.0,
            escape(&label)
        )?;
    }

    writeln!(
        &mut svg,
        r##"  <text x="{}" y="{}" font-family="Arial" font-size="12" fill="#666">{} | Boxes: {} | Waste: {:.1}%</text>"##,
        margin,
        svg_height - margin + 5.0,
        escape(&report.winning_combo.to_string()),
        report.total_placed,
        report.summary.waste_percentage
    )?;

    writeln!(&mut svg, "</svg>")?;

    Ok(svg)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
