//! View Selector
//! Maps a menu choice and the current selection to a render model.

use super::model::{
    palette_color, point_radius, BarSeries, GroupedBars, PieChart, ScatterChart, ScatterPoint,
    View, PLASMA, REDS,
};
use crate::data::{
    float_values, label, AccidentTable, DataProcessor, ProcessorError, ACCIDENTS, FATALITY_RATE,
    METRIC_COLUMNS, MINOR_INJURY_RATE, REGION, SUB_REGION,
};
use crate::stats::{RateCalculator, Summary};
use polars::prelude::PolarsError;
use thiserror::Error;
use tracing::{debug, warn};

pub const COMPARISON_PROMPT: &str = "비교할 시도를 선택하세요.";
pub const SCATTER_PROMPT: &str = "분석할 시도를 선택해주세요.";

#[derive(Error, Debug)]
pub enum ViewError {
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Sidebar menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewKind {
    #[default]
    Home,
    RegionOverview,
    SubRegionDetail,
    Comparison,
    RateScatter,
}

impl ViewKind {
    pub const ALL: [ViewKind; 5] = [
        ViewKind::Home,
        ViewKind::RegionOverview,
        ViewKind::SubRegionDetail,
        ViewKind::Comparison,
        ViewKind::RateScatter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Home => "HOME",
            ViewKind::RegionOverview => "시도별 분석",
            ViewKind::SubRegionDetail => "시군구별 분석",
            ViewKind::Comparison => "상세 비교 분석",
            ViewKind::RateScatter => "사망률/경상률 분석",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            ViewKind::Home => "🚗 교통사고 데이터 분석 대시보드",
            ViewKind::RegionOverview => "🚦 시도별 교통사고 통계",
            ViewKind::SubRegionDetail => "🏙️ 시군구별 교통사고 통계",
            ViewKind::Comparison => "📊 시도 간 상세 비교 분석",
            ViewKind::RateScatter => "⚡ 사망률 vs 경상률 비교 산점도",
        }
    }

    /// File stem used when exporting the view as an image.
    pub fn file_stem(self) -> &'static str {
        match self {
            ViewKind::Home => "home",
            ViewKind::RegionOverview => "region_overview",
            ViewKind::SubRegionDetail => "sub_region_detail",
            ViewKind::Comparison => "comparison",
            ViewKind::RateScatter => "rate_scatter",
        }
    }
}

/// Current widget selections.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    /// Region for the sub-region view. `None` means the first region.
    pub region: Option<String>,
    pub comparison: Vec<String>,
    pub scatter: Vec<String>,
}

impl Selection {
    /// Initial selection: configured comparison regions that exist in the
    /// data, and the first `scatter_count` regions.
    pub fn with_defaults(
        regions: &[String],
        comparison_defaults: &[String],
        scatter_count: usize,
    ) -> Self {
        let comparison = comparison_defaults
            .iter()
            .filter(|r| {
                let known = regions.contains(*r);
                if !known {
                    warn!(region = %r, "Default comparison region not in data");
                }
                known
            })
            .cloned()
            .collect();

        Self {
            region: regions.first().cloned(),
            comparison,
            scatter: regions.iter().take(scatter_count).cloned().collect(),
        }
    }
}

/// Build the render model for `kind` from the base table.
pub fn build_view(
    table: &AccidentTable,
    kind: ViewKind,
    selection: &Selection,
) -> Result<View, ViewError> {
    match kind {
        ViewKind::Home => Ok(View::Home(Summary::of(table)?)),
        ViewKind::RegionOverview => region_overview(table),
        ViewKind::SubRegionDetail => sub_region_detail(table, selection.region.as_deref()),
        ViewKind::Comparison => comparison(table, &selection.comparison),
        ViewKind::RateScatter => rate_scatter(table, &selection.scatter),
    }
}

fn region_overview(table: &AccidentTable) -> Result<View, ViewError> {
    let aggregate = DataProcessor::aggregate_by_region(table, None)?;
    let totals = DataProcessor::region_totals(&aggregate)?;

    let bars = BarSeries::shaded(
        "시도별 교통사고 건수".to_string(),
        label(REGION),
        label(ACCIDENTS),
        totals
            .iter()
            .map(|t| (t.region.clone(), t.accidents as f64))
            .collect(),
        &REDS,
    );
    let pie = PieChart::from_values(
        "시도별 사망자 비율".to_string(),
        totals
            .iter()
            .map(|t| (t.region.clone(), t.fatalities as f64))
            .collect(),
    );

    Ok(View::RegionOverview { totals, bars, pie })
}

fn sub_region_detail(table: &AccidentTable, region: Option<&str>) -> Result<View, ViewError> {
    let region = match region {
        Some(r) => r.to_string(),
        None => DataProcessor::regions(table)?
            .into_iter()
            .next()
            .unwrap_or_default(),
    };

    let rows = DataProcessor::sub_regions_of(table, &region)?;
    let bars = BarSeries::shaded(
        format!("{} 내 시군구별 교통사고 건수", region),
        label(SUB_REGION),
        label(ACCIDENTS),
        rows.iter()
            .map(|r| (r.sub_region.clone(), r.accidents as f64))
            .collect(),
        &PLASMA,
    );

    Ok(View::SubRegionDetail { region, rows, bars })
}

fn comparison(table: &AccidentTable, selected: &[String]) -> Result<View, ViewError> {
    if selected.is_empty() {
        return Ok(View::Prompt(COMPARISON_PROMPT));
    }

    let aggregate = DataProcessor::aggregate_by_region(table, Some(selected))?;
    let totals = DataProcessor::region_totals(&aggregate)?;
    let chart = GroupedBars {
        title: "시도별 교통사고 현황 비교".to_string(),
        groups: totals.iter().map(|t| t.region.clone()).collect(),
        metrics: METRIC_COLUMNS.to_vec(),
        values: DataProcessor::melt_metrics(&totals),
    };

    Ok(View::Comparison { totals, chart })
}

fn rate_scatter(table: &AccidentTable, selected: &[String]) -> Result<View, ViewError> {
    if selected.is_empty() {
        return Ok(View::Prompt(SCATTER_PROMPT));
    }

    let filtered = DataProcessor::filter_regions(table, selected)?;
    let with_rates = RateCalculator::with_rates(&filtered)?;
    let fatality_rates = float_values(&with_rates, FATALITY_RATE)?;
    let minor_rates = float_values(&with_rates, MINOR_INJURY_RATE)?;
    let records = AccidentTable::from_frame(filtered).records()?;

    let color_of = |region: &str| {
        let idx = selected.iter().position(|s| s == region).unwrap_or(0);
        palette_color(idx)
    };
    let max_accidents = records.iter().map(|r| r.accidents).max().unwrap_or(0);

    let mut points = Vec::new();
    let mut excluded = Vec::new();
    for ((record, fatality), minor) in records.into_iter().zip(fatality_rates).zip(minor_rates) {
        match (fatality, minor) {
            (Some(y), Some(x)) => points.push(ScatterPoint {
                radius: point_radius(record.accidents, max_accidents),
                color: color_of(&record.region),
                x,
                y,
                accidents: record.accidents,
                fatalities: record.fatalities,
                minor_injuries: record.minor_injuries,
                region: record.region,
                sub_region: record.sub_region,
            }),
            _ => excluded.push(record),
        }
    }

    if !excluded.is_empty() {
        debug!(count = excluded.len(), "Rows without accidents left out of scatter");
    }

    Ok(View::RateScatter(ScatterChart {
        title: "지역별 사망률 vs 경상률 비교 산점도".to_string(),
        regions: selected
            .iter()
            .enumerate()
            .map(|(i, r)| (r.clone(), palette_color(i)))
            .collect(),
        points: points.into(),
        excluded,
    }))
}

/// Remembers the last built view so unchanged selections are not
/// recomputed every frame.
#[derive(Default)]
pub struct ViewCache {
    entry: Option<((ViewKind, Selection), View)>,
    builds: usize,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(
        &mut self,
        table: &AccidentTable,
        kind: ViewKind,
        selection: &Selection,
    ) -> Result<&View, ViewError> {
        let key = (kind, selection.clone());
        let entry = match self.entry.take() {
            Some((cached, view)) if cached == key => (cached, view),
            _ => {
                debug!(view = kind.label(), "Rebuilding view");
                let view = build_view(table, kind, selection)?;
                self.builds += 1;
                (key, view)
            }
        };
        Ok(&self.entry.insert(entry).1)
    }

    /// Number of times a view was actually computed.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AccidentRecord, MetricValue, RegionTotals};

    fn table() -> AccidentTable {
        AccidentTable::from_records(&[
            AccidentRecord::new("A", "X", [10, 1, 2, 3, 4]),
            AccidentRecord::new("A", "Y", [5, 0, 1, 2, 1]),
            AccidentRecord::new("B", "Z", [8, 2, 1, 1, 0]),
            AccidentRecord::new("B", "Q", [0, 0, 0, 0, 0]),
            AccidentRecord::new("C", "W", [4, 1, 0, 2, 1]),
        ])
        .unwrap()
    }

    fn selection(comparison: &[&str], scatter: &[&str]) -> Selection {
        Selection {
            region: None,
            comparison: comparison.iter().map(|s| s.to_string()).collect(),
            scatter: scatter.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_home_summary() {
        let view = build_view(&table(), ViewKind::Home, &Selection::default()).unwrap();
        let View::Home(summary) = view else {
            panic!("expected home view");
        };
        assert_eq!(summary.total_accidents, 27);
        assert_eq!(summary.total_fatalities, 4);
        assert_eq!(summary.total_serious_injuries, 4);
    }

    #[test]
    fn test_region_overview_totals() {
        let view = build_view(&table(), ViewKind::RegionOverview, &Selection::default()).unwrap();
        let View::RegionOverview { totals, bars, pie } = view else {
            panic!("expected region overview");
        };

        assert_eq!(
            totals[0],
            RegionTotals {
                region: "A".into(),
                accidents: 15,
                fatalities: 1,
                serious_injuries: 3,
                minor_injuries: 5,
                injury_reports: 5,
            }
        );
        let labels: Vec<&str> = bars.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert_eq!(bars.bars[0].color, REDS[2]);
        assert_eq!(pie.slices[1].share, 0.5);
    }

    #[test]
    fn test_sub_region_detail_defaults_to_first_region() {
        let view = build_view(&table(), ViewKind::SubRegionDetail, &Selection::default()).unwrap();
        let View::SubRegionDetail { region, rows, bars } = view else {
            panic!("expected sub-region view");
        };
        assert_eq!(region, "A");
        assert_eq!(rows.len(), 2);
        assert_eq!(bars.bars[0].label, "X");
        assert_eq!(bars.bars[0].value, 10.0);
    }

    #[test]
    fn test_comparison_melts_two_regions() {
        let view = build_view(&table(), ViewKind::Comparison, &selection(&["A", "B"], &[])).unwrap();
        let View::Comparison { totals, chart } = view else {
            panic!("expected comparison view");
        };

        assert_eq!(totals.len(), 2);
        assert_eq!(chart.values.len(), 10);
        assert_eq!(chart.groups, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(
            chart.values[5],
            MetricValue {
                region: "B".into(),
                metric: ACCIDENTS,
                value: 8.0
            }
        );
        assert_eq!(chart.values[9].value, 0.0);
    }

    #[test]
    fn test_empty_comparison_is_prompt() {
        let view = build_view(&table(), ViewKind::Comparison, &selection(&[], &["A"])).unwrap();
        assert_eq!(view, View::Prompt(COMPARISON_PROMPT));
    }

    #[test]
    fn test_empty_scatter_is_prompt() {
        let view = build_view(&table(), ViewKind::RateScatter, &selection(&["A"], &[])).unwrap();
        assert_eq!(view, View::Prompt(SCATTER_PROMPT));
    }

    #[test]
    fn test_scatter_excludes_zero_accident_rows() {
        let view = build_view(&table(), ViewKind::RateScatter, &selection(&[], &["A", "B"])).unwrap();
        let View::RateScatter(chart) = view else {
            panic!("expected scatter view");
        };

        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.excluded.len(), 1);
        assert_eq!(chart.excluded[0].sub_region, "Q");
        assert!(chart.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));

        let z = chart.points.iter().find(|p| p.sub_region == "Z").unwrap();
        assert_eq!(z.y, 2.0 / 8.0);
        assert_eq!(z.x, 1.0 / 8.0);
        assert_eq!(z.color, palette_color(1));

        let x = chart.points.iter().find(|p| p.sub_region == "X").unwrap();
        assert_eq!(x.radius, crate::views::MAX_POINT_RADIUS);
    }

    #[test]
    fn test_scatter_is_deterministic() {
        let sel = selection(&[], &["B", "A"]);
        let first = build_view(&table(), ViewKind::RateScatter, &sel).unwrap();
        let second = build_view(&table(), ViewKind::RateScatter, &sel).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_selection_defaults() {
        let regions: Vec<String> = ["서울", "부산", "대구", "인천", "광주", "대전"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let defaults = vec!["서울".to_string(), "경기".to_string()];

        let sel = Selection::with_defaults(&regions, &defaults, 5);
        assert_eq!(sel.region.as_deref(), Some("서울"));
        assert_eq!(sel.comparison, vec!["서울".to_string()]);
        assert_eq!(sel.scatter, regions[..5].to_vec());
    }

    #[test]
    fn test_cache_rebuilds_only_on_change() {
        let table = table();
        let mut cache = ViewCache::new();
        let sel = selection(&["A"], &["A"]);

        cache.get_or_build(&table, ViewKind::Comparison, &sel).unwrap();
        cache.get_or_build(&table, ViewKind::Comparison, &sel).unwrap();
        assert_eq!(cache.builds(), 1);

        cache.get_or_build(&table, ViewKind::RateScatter, &sel).unwrap();
        let changed = selection(&["A", "B"], &["A"]);
        cache.get_or_build(&table, ViewKind::Comparison, &changed).unwrap();
        assert_eq!(cache.builds(), 3);
    }
}
