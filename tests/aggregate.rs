use climate_dash::aggregate::{
    collect_years, compute_world_average, count_countries_with_both, pick_scatter_year,
};
use climate_dash::models::{CountryMetric, DataPoint};
use std::collections::BTreeMap;

fn metric(iso3: &str, points: &[(i32, f64)]) -> CountryMetric {
    CountryMetric {
        iso3: iso3.into(),
        iso2: iso3[..2].into(),
        country: format!("{iso3}land"),
        indicator: "Dummy".into(),
        unit: "Pct".into(),
        series: points.iter().map(|&(y, v)| DataPoint::new(y, v)).collect(),
    }
}

fn dataset(rows: Vec<CountryMetric>) -> BTreeMap<String, CountryMetric> {
    rows.into_iter().map(|m| (m.iso3.clone(), m)).collect()
}

#[test]
fn world_average_skips_missing_countries_instead_of_zero_filling() {
    let ds = dataset(vec![
        metric("AAA", &[(2000, 10.0), (2001, 20.0)]),
        metric("BBB", &[(2000, 30.0)]),
    ]);
    assert_eq!(
        compute_world_average(&ds),
        vec![DataPoint::new(2000, 20.0), DataPoint::new(2001, 20.0)]
    );
}

#[test]
fn world_average_of_empty_dataset_is_empty() {
    assert!(compute_world_average(&BTreeMap::new()).is_empty());
    let ds = dataset(vec![metric("AAA", &[])]);
    assert!(compute_world_average(&ds).is_empty());
}

#[test]
fn world_average_is_pure() {
    let ds = dataset(vec![
        metric("AAA", &[(1999, 1.5), (2003, -2.0)]),
        metric("BBB", &[(2003, 4.0)]),
    ]);
    let before = ds.clone();
    let a = compute_world_average(&ds);
    let b = compute_world_average(&ds);
    assert_eq!(a, b);
    assert_eq!(ds, before);
    assert_eq!(a, vec![DataPoint::new(1999, 1.5), DataPoint::new(2003, 1.0)]);
}

#[test]
fn scatter_year_prefers_later_year_on_ties() {
    let codes = ["AAA", "BBB", "CCC", "DDD", "EEE"];
    let taxes = dataset(
        codes
            .iter()
            .map(|c| metric(c, &[(2010, 1.0), (2011, 1.0), (2012, 1.0)]))
            .collect(),
    );
    // 2011 only has three countries with subsidies data.
    let subsidies = dataset(
        codes
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i < 3 {
                    metric(c, &[(2010, 2.0), (2011, 2.0), (2012, 2.0)])
                } else {
                    metric(c, &[(2010, 2.0), (2012, 2.0)])
                }
            })
            .collect(),
    );

    assert_eq!(count_countries_with_both(&taxes, &subsidies, 2010), 5);
    assert_eq!(count_countries_with_both(&taxes, &subsidies, 2011), 3);
    assert_eq!(pick_scatter_year(&taxes, &subsidies), Some(2012));
}

#[test]
fn scatter_year_maximises_overlap() {
    let taxes = dataset(vec![
        metric("AAA", &[(2015, 1.0), (2020, 1.0)]),
        metric("BBB", &[(2015, 1.0)]),
        metric("CCC", &[(2015, 1.0)]),
    ]);
    let subsidies = dataset(vec![
        metric("AAA", &[(2015, 1.0), (2020, 1.0)]),
        metric("BBB", &[(2015, 1.0)]),
        metric("ZZZ", &[(2015, 1.0), (2020, 1.0)]),
    ]);
    assert_eq!(pick_scatter_year(&taxes, &subsidies), Some(2015));
}

#[test]
fn scatter_year_only_considers_shared_years() {
    let taxes = dataset(vec![metric("AAA", &[(2000, 1.0)])]);
    let subsidies = dataset(vec![metric("AAA", &[(2001, 1.0)])]);
    assert_eq!(pick_scatter_year(&taxes, &subsidies), None);
    assert_eq!(pick_scatter_year(&BTreeMap::new(), &subsidies), None);
}

#[test]
fn shared_year_without_common_countries_is_still_a_candidate() {
    let taxes = dataset(vec![metric("AAA", &[(2000, 1.0), (2005, 1.0)])]);
    let subsidies = dataset(vec![metric("BBB", &[(2000, 1.0), (2005, 1.0)])]);
    // Every candidate has zero countries; the latest one wins the tie.
    assert_eq!(pick_scatter_year(&taxes, &subsidies), Some(2005));
}

#[test]
fn collect_years_is_union() {
    let ds = dataset(vec![
        metric("AAA", &[(2000, 1.0), (2002, 1.0)]),
        metric("BBB", &[(2001, 1.0), (2002, 1.0)]),
    ]);
    assert_eq!(
        collect_years(&ds).into_iter().collect::<Vec<_>>(),
        vec![2000, 2001, 2002]
    );
}
