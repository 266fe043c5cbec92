//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for spending data:
//! - **Spending by category**: Pie chart of the period's spending
//! - **Spending over time**: Spending per time bucket
//! - **Net income over time**: Income minus spending per time bucket
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title, VisualMap, VisualMapPiece},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    api::SpendingData,
    category::CustomCategory,
    html::HeadElement,
};

use super::aggregation::{labels_and_values, net_income_over_time, spending_by_category};

/// A dashboard chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the spending charts for `data`.
///
/// Custom categories are needed to name their pie slices.
pub fn spending_charts(
    data: &SpendingData,
    custom_categories: &[CustomCategory],
) -> Vec<DashboardChart> {
    vec![
        DashboardChart {
            id: "spending-by-category-chart",
            options: spending_pie_chart(data, custom_categories).to_string(),
        },
        DashboardChart {
            id: "spending-over-time-chart",
            options: spending_chart(data).to_string(),
        },
        DashboardChart {
            id: "net-income-chart",
            options: net_income_chart(data).to_string(),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn spending_pie_chart(data: &SpendingData, custom_categories: &[CustomCategory]) -> Chart {
    let slices: Vec<(f64, String)> =
        spending_by_category(&data.highlights.by_cat, custom_categories)
            .into_iter()
            .map(|(name, amount)| (amount, name))
            .collect();

    Chart::new()
        .title(Title::new().text("Spending").subtext("By category"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .series(Pie::new().name("Spending").radius("60%").data(slices))
}

fn spending_chart(data: &SpendingData) -> Chart {
    let (labels, values) = labels_and_values(&data.spending_over_time);
    // Spending arrives negative; plot it as positive amounts.
    let values: Vec<f64> = values.into_iter().map(|value| -value).collect();

    Chart::new()
        .title(Title::new().text("Spending").subtext("Over time"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Spending").data(values))
}

fn net_income_chart(data: &SpendingData) -> Chart {
    let (labels, values) = net_income_over_time(&data.income_over_time, &data.spending_over_time);

    Chart::new()
        .title(Title::new().text("Net income").subtext("Over time"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .visual_map(VisualMap::new().show(false).pieces(vec![
            VisualMapPiece::new().lte(-1).color("red"),
            VisualMapPiece::new().gte(0).color("green"),
        ]))
        .series(Line::new().name("Net Income").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
