use climate_dash::access::{get_series_for_country_or_world, get_value_at_year};
use climate_dash::models::{CountryMetric, DataPoint};
use std::collections::BTreeMap;

fn by_iso3() -> BTreeMap<String, CountryMetric> {
    let m = CountryMetric {
        iso3: "DEU".into(),
        iso2: "DE".into(),
        country: "Germany".into(),
        indicator: "Tax".into(),
        unit: "Pct".into(),
        series: vec![DataPoint::new(2000, 1.0), DataPoint::new(2001, 2.0)],
    };
    BTreeMap::from([("DEU".to_string(), m)])
}

#[test]
fn no_selection_returns_the_world_series_itself() {
    let metrics = by_iso3();
    let world = vec![DataPoint::new(2000, 5.0)];
    let got = get_series_for_country_or_world(&metrics, &world, None);
    assert_eq!(got, world.as_slice());
    assert!(std::ptr::eq(got.as_ptr(), world.as_ptr()));

    let blank = get_series_for_country_or_world(&metrics, &world, Some(""));
    assert!(std::ptr::eq(blank.as_ptr(), world.as_ptr()));
}

#[test]
fn known_and_unknown_countries() {
    let metrics = by_iso3();
    let world = vec![DataPoint::new(2000, 5.0)];
    assert_eq!(
        get_series_for_country_or_world(&metrics, &world, Some("DEU")).len(),
        2
    );
    assert!(get_series_for_country_or_world(&metrics, &world, Some("XXX")).is_empty());
}

#[test]
fn value_at_year() {
    let series = vec![DataPoint::new(2000, 1.0), DataPoint::new(2002, 3.0)];
    assert_eq!(get_value_at_year(&series, Some(2002)), Some(3.0));
    assert_eq!(get_value_at_year(&series, Some(2001)), None);
    assert_eq!(get_value_at_year(&series, None), None);
    assert_eq!(get_value_at_year(&[], Some(2000)), None);
}
