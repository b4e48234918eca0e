mod common;

use climate_dash::models::{DataPoint, IndicatorWindow, Metric};
use climate_dash::store::{SelectionPatch, SelectionState, Store};
use climate_dash::views::{
    self, DotRole, WORLD_LABEL, bars_view, clip_to_window, dashboard_view, default_bar_year,
    discrepancy_series, discrepancy_view, scatter_view, search_options, small_multiples,
    window_start,
};
use std::cell::RefCell;
use std::rc::Rc;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn selecting(iso3: &str) -> SelectionState {
    SelectionState {
        selected_country_iso3: Some(iso3.into()),
        ..Default::default()
    }
}

fn series(points: &[(i32, f64)]) -> Vec<DataPoint> {
    points.iter().map(|&(y, v)| DataPoint::new(y, v)).collect()
}

#[test]
fn scatter_marks_reference_and_selection() {
    let b = common::fixture_bundle();
    let v = scatter_view(&b, &selecting("DEU"), "AUT");
    assert_eq!(v.year, Some(2002));

    let roles: Vec<(&str, DotRole)> = v.points.iter().map(|p| (p.iso3.as_str(), p.role)).collect();
    assert_eq!(
        roles,
        vec![
            ("AUT", DotRole::Reference),
            ("DEU", DotRole::Selected),
            ("FRA", DotRole::Other)
        ]
    );
    let aut = &v.points[0];
    assert!(close(aut.subsidies, 1.6));
    assert!(close(aut.taxes, 2.4));
}

#[test]
fn search_options_follow_scatter_and_sort_by_name() {
    let b = common::fixture_bundle();
    let names: Vec<String> = search_options(&b).into_iter().map(|o| o.name).collect();
    assert_eq!(names, vec!["Austria", "France", "Germany"]);
}

#[test]
fn window_start_clamps_to_first_year() {
    let a = series(&[(1961, 0.0), (2023, 1.0)]);
    let b = series(&[(1990, 0.0), (2020, 1.0)]);
    assert_eq!(window_start(&a, &b, IndicatorWindow::Full), None);
    assert_eq!(window_start(&a, &b, IndicatorWindow::Last20), Some(2003));
    assert_eq!(window_start(&a, &b, IndicatorWindow::Last35), Some(1988));

    let short = series(&[(2010, 0.0), (2015, 1.0)]);
    assert_eq!(window_start(&short, &[], IndicatorWindow::Last30), Some(2010));
    assert_eq!(window_start(&[], &[], IndicatorWindow::Last30), None);

    let (ca, cb) = clip_to_window(&a, &b, IndicatorWindow::Last20);
    assert_eq!(ca, series(&[(2023, 1.0)]));
    assert_eq!(cb, series(&[(2020, 1.0)]));
}

#[test]
fn small_multiples_compare_against_world_or_selection() {
    let b = common::fixture_bundle();

    let world = small_multiples(&b, &SelectionState::default(), "AUT");
    let metrics: Vec<Metric> = world.iter().map(|p| p.metric).collect();
    assert_eq!(metrics, vec![Metric::Temperature, Metric::Disasters, Metric::Taxes]);
    assert_eq!(world[0].comparison_label, WORLD_LABEL);
    assert_eq!(world[0].reference.len(), 3);
    assert_eq!(world[0].comparison, b.world.temperature);

    let deu = small_multiples(&b, &selecting("DEU"), "AUT");
    assert_eq!(deu[0].comparison_label, "Germany");
    // Germany has no temperature row: empty, not world.
    assert!(deu[0].comparison.is_empty());
    assert_eq!(deu[2].comparison.len(), 3);
}

#[test]
fn small_multiples_apply_indicator_window() {
    let b = common::fixture_bundle();
    let state = SelectionState {
        indicator_window: IndicatorWindow::Last20,
        ..Default::default()
    };
    let temp = &small_multiples(&b, &state, "AUT")[0];
    // 1990..2003 fits inside twenty years.
    assert_eq!(temp.reference.first().map(|d| d.year), Some(1990));
}

#[test]
fn discrepancy_needs_both_components() {
    let taxes = series(&[(2000, 3.0), (2001, 4.0), (2003, 1.0)]);
    let exp = series(&[(2001, 1.5), (2002, 2.0), (2003, 2.0)]);
    let d = discrepancy_series(&taxes, &exp);
    assert_eq!(d.iter().map(|p| p.year).collect::<Vec<_>>(), vec![2001, 2003]);
    assert!(close(d[0].value, 2.5));
    assert!(close(d[1].value, -1.0));
    assert!(close(d[1].taxes, 1.0));
    assert!(close(d[1].expenditures, 2.0));
}

#[test]
fn discrepancy_view_for_reference_and_world() {
    let b = common::fixture_bundle();
    let state = SelectionState {
        selected_year: Some(2001),
        ..Default::default()
    };
    let v = discrepancy_view(&b, &state, "AUT");
    assert_eq!(v.reference.len(), 3);
    assert!(close(v.reference[0].value, 1.5));
    assert_eq!(v.comparison.len(), 3);
    assert!(close(v.comparison[0].value, 1.0));
    assert_eq!(v.marker_year, Some(2001));
    assert_eq!(v.comparison_label, WORLD_LABEL);
}

#[test]
fn bars_default_to_latest_complete_reference_year() {
    let b = common::fixture_bundle();
    let v = bars_view(&b, &SelectionState::default(), "AUT");
    assert_eq!(v.year, Some(2002));
    assert_eq!(v.groups[0].label, "Austria");
    assert!(close(v.groups[0].taxes.unwrap(), 2.4));
    assert!(close(v.groups[0].expenditures.unwrap(), 0.7));
    assert_eq!(v.groups[1].iso3, None);
    assert!(close(v.groups[1].expenditures.unwrap(), 0.8));
}

#[test]
fn bars_use_selected_year_even_with_gaps() {
    let b = common::fixture_bundle();
    let state = SelectionState {
        selected_country_iso3: Some("DEU".into()),
        selected_year: Some(2000),
        ..Default::default()
    };
    let v = bars_view(&b, &state, "AUT");
    assert_eq!(v.year, Some(2000));
    assert_eq!(v.groups[1].label, "Germany");
    assert!(close(v.groups[1].taxes.unwrap(), 1.0));
    assert_eq!(v.groups[1].expenditures, None);
}

#[test]
fn blank_selection_reads_as_world() {
    let b = common::fixture_bundle();
    let state = selecting("");
    let v = dashboard_view(&b, &state, "AUT");
    assert_eq!(v.comparison_label, WORLD_LABEL);
    assert_eq!(v.bars.groups[1].label, WORLD_LABEL);
    assert_eq!(v.bars.groups[1].iso3, None);
    assert!(v.scatter.points.iter().all(|p| p.role != DotRole::Selected));
    assert_eq!(views::comparison_label(&b.country_name_by_iso3, Some("")), WORLD_LABEL);
}

#[test]
fn default_bar_year_none_without_overlap() {
    let taxes = series(&[(2000, 1.0)]);
    let exp = series(&[(2001, 1.0)]);
    assert_eq!(default_bar_year(&taxes, &exp), None);
}

#[test]
fn views_follow_the_store() {
    let b = Rc::new(common::fixture_bundle());
    let store = Store::new(SelectionState::default());
    let labels = Rc::new(RefCell::new(Vec::new()));
    let _sub = {
        let b = Rc::clone(&b);
        let labels = Rc::clone(&labels);
        store.subscribe(move |s| {
            let v = dashboard_view(&b, s, "AUT");
            labels.borrow_mut().push(v.comparison_label);
        })
    };

    store.set_state(SelectionPatch::new().country("FRA"));
    store.set_state(SelectionPatch::new().country("FRA"));
    store.set_state(SelectionPatch::new().country("ZZZ"));
    store.reset();

    assert_eq!(
        *labels.borrow(),
        vec![WORLD_LABEL, "France", "ZZZ", WORLD_LABEL]
    );
    assert_eq!(views::comparison_label(&b.country_name_by_iso3, None), WORLD_LABEL);
}
