use crate::web::pages::escape;
use f1core::model::Compound;
use f1core::stints::SegmentColor;
use f1core::TyreChart;

const LABEL_WIDTH: f32 = 80.0;
const PLOT_WIDTH: f32 = 800.0;
const RIGHT_MARGIN: f32 = 40.0;
const TOP_MARGIN: f32 = 20.0;
const ROW_HEIGHT: f32 = 28.0;
const BAR_HEIGHT: f32 = 20.0;
const AXIS_HEIGHT: f32 = 30.0;
const LEGEND_HEIGHT: f32 = 40.0;
const LEGEND_BORDER: &str = "#a3a8b6";

fn tick_step(total_laps: u32) -> u32 {
    match total_laps {
        0..=20 => 5,
        21..=60 => 10,
        _ => 20,
    }
}

/// Draws the chart as horizontal stacked bars, one per row, on a lap axis
/// running from 0 to the session's lap count.
pub fn render_chart(chart: &TyreChart) -> String {
    let total_laps = chart.total_laps.max(1);
    let scale = PLOT_WIDTH / total_laps as f32;
    let plot_height = ROW_HEIGHT * chart.rows.len() as f32;
    let axis_y = TOP_MARGIN + plot_height;
    let width = LABEL_WIDTH + PLOT_WIDTH + RIGHT_MARGIN;
    let height = axis_y + AXIS_HEIGHT + LEGEND_HEIGHT;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {width} {height}\" \
         width=\"100%\" font-size=\"12\" role=\"img\">"
    );

    let step = tick_step(total_laps);
    let mut lap = 0;
    while lap <= total_laps {
        let x = LABEL_WIDTH + lap as f32 * scale;
        svg.push_str(&format!(
            "<line x1=\"{x}\" y1=\"{TOP_MARGIN}\" x2=\"{x}\" y2=\"{axis_y}\" stroke=\"#e5e7eb\"/>\
             <line x1=\"{x}\" y1=\"{axis_y}\" x2=\"{x}\" y2=\"{}\" stroke=\"#000\"/>\
             <text x=\"{x}\" y=\"{}\" text-anchor=\"middle\">{lap}</text>",
            axis_y + 6.0,
            axis_y + 20.0
        ));
        lap += step;
    }

    for (row_index, row) in chart.rows.iter().enumerate() {
        let y = TOP_MARGIN + row_index as f32 * ROW_HEIGHT + (ROW_HEIGHT - BAR_HEIGHT) / 2.0;
        let label = row.label();
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" text-anchor=\"end\">{}</text>",
            LABEL_WIDTH - 10.0,
            y + BAR_HEIGHT * 0.7,
            escape(&label)
        ));

        let mut x = LABEL_WIDTH;
        for (segment_index, &laps) in row.segments.iter().enumerate() {
            let bar_width = laps as f32 * scale;
            if let SegmentColor::Tyre(compound) = chart.colors.color_at(segment_index, row_index) {
                if laps > 0 {
                    svg.push_str(&format!(
                        "<rect x=\"{x}\" y=\"{y}\" width=\"{bar_width}\" height=\"{BAR_HEIGHT}\" \
                         rx=\"5\" fill=\"{}\" stroke=\"{LEGEND_BORDER}\">\
                         <title>{}: {} ({} laps)</title></rect>",
                        compound.color(),
                        escape(&label),
                        escape(compound.label()),
                        laps
                    ));
                }
            }
            x += bar_width;
        }
    }

    let legend_y = axis_y + AXIS_HEIGHT + 10.0;
    let mut legend_x = LABEL_WIDTH;
    for compound in Compound::REGISTERED.iter() {
        svg.push_str(&format!(
            "<rect x=\"{legend_x}\" y=\"{legend_y}\" width=\"14\" height=\"14\" rx=\"2\" \
             fill=\"{}\" stroke=\"{LEGEND_BORDER}\"/>\
             <text x=\"{}\" y=\"{}\">{}</text>",
            compound.color(),
            legend_x + 20.0,
            legend_y + 11.0,
            compound.label()
        ));
        legend_x += 130.0;
    }

    svg.push_str("</svg>");
    svg
}
