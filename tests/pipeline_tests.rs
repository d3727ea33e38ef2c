/// Pipeline property tests.
///
/// Exercises filtering and the three chart projections through the public
/// API only: identity, conjunction, year asymmetry, topic membership and the
/// count/subset relationship.
use insightdash::charts::{self, GroupBy, Palette};
use insightdash::filter::{FilterField, FilterSet, FilterUpdate};
use insightdash::model::{Record, parse_records};
use insightdash::pipeline::{ChartInputs, PipelineCache, compute};
use insightdash::store::RecordStore;

fn record(country: &str, region: &str, topics: &[&str]) -> Record {
    Record {
        country: Some(country.into()),
        region: Some(region.into()),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

fn dataset() -> Vec<Record> {
    parse_records(
        r#"[
        {"startyear": 2016, "endyear": 2018, "topics": ["oil"], "sector": "Energy",
         "region": "Northern America", "pestle": "Industries", "source": "EIA",
         "swot": "Strength", "country": "United States of America", "city": "Houston",
         "intensity": 6, "likelihood": 3, "relevance": 2},
        {"startyear": 2017, "endyear": 2022, "topics": ["gas", "policy"], "sector": "Energy",
         "region": "Western Asia", "pestle": "Economic", "source": "OPEC",
         "swot": "Weakness", "country": "Iran", "intensity": 12, "likelihood": 4, "relevance": 3},
        {"startyear": "", "endyear": 2018, "topics": ["policy"], "sector": "Government",
         "region": "Northern America", "pestle": "Political", "source": "EIA",
         "country": "United States of America", "intensity": 2, "likelihood": "", "relevance": 1},
        {"startyear": 2018, "endyear": 2018, "topics": "market", "sector": "",
         "region": "Southern Asia", "pestle": "Economic", "source": "Reuters",
         "country": "India", "intensity": 8, "likelihood": 2, "relevance": 4}
    ]"#,
    )
    .unwrap()
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

#[test]
fn empty_filter_set_keeps_every_record_in_order() {
    let records = dataset();
    let matched = FilterSet::default().apply(&records);
    assert_eq!(matched.len(), records.len());
    for (got, want) in matched.iter().zip(&records) {
        assert_eq!(*got, want);
    }
}

#[test]
fn value_absent_from_store_matches_nothing() {
    let records = dataset();
    let filters = FilterSet::default()
        .with(FilterField::Country, "Atlantis")
        .unwrap();
    assert!(filters.apply(&records).is_empty());
}

#[test]
fn sequential_filtering_equals_simultaneous() {
    let records = dataset();
    let region = FilterSet::default()
        .with(FilterField::Region, "Northern America")
        .unwrap();
    let source = FilterSet::default().with(FilterField::Source, "EIA").unwrap();
    let pestle = FilterSet::default()
        .with(FilterField::Pestle, "Political")
        .unwrap();

    let step1: Vec<Record> = region.apply(&records).into_iter().cloned().collect();
    let step2: Vec<Record> = source.apply(&step1).into_iter().cloned().collect();
    let sequential: Vec<Record> = pestle.apply(&step2).into_iter().cloned().collect();

    let all = region
        .with(FilterField::Source, "EIA")
        .unwrap()
        .with(FilterField::Pestle, "Political")
        .unwrap();
    let simultaneous: Vec<Record> = all.apply(&records).into_iter().cloned().collect();

    assert_eq!(sequential, simultaneous);
    assert_eq!(simultaneous.len(), 1);
    assert_eq!(simultaneous[0].sector.as_deref(), Some("Government"));
}

#[test]
fn both_years_set_means_containment() {
    let inside = Record {
        start_year: Some(2015),
        end_year: Some(2020),
        ..Default::default()
    };
    let outside = Record {
        start_year: Some(2012),
        end_year: Some(2018),
        ..Default::default()
    };
    let filters = FilterSet::default()
        .with(FilterField::StartYear, "2014")
        .unwrap()
        .with(FilterField::EndYear, "2020")
        .unwrap();

    assert!(filters.matches(&inside));
    assert!(!filters.matches(&outside));
}

#[test]
fn year_rule_is_asymmetric() {
    let records = vec![
        Record {
            start_year: Some(2015),
            end_year: Some(2020),
            ..Default::default()
        },
        Record {
            start_year: Some(2012),
            end_year: Some(2018),
            ..Default::default()
        },
    ];

    let start_only = FilterSet::default()
        .with(FilterField::StartYear, "2015")
        .unwrap();
    assert_eq!(start_only.apply(&records), vec![&records[0]]);

    let range = FilterSet::default()
        .with(FilterField::StartYear, "2012")
        .unwrap()
        .with(FilterField::EndYear, "2020")
        .unwrap();
    assert_eq!(range.apply(&records).len(), 2);
}

#[test]
fn single_year_means_equality() {
    let records = dataset();

    let start = FilterSet::default()
        .with(FilterField::StartYear, "2016")
        .unwrap();
    let matched = start.apply(&records);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].source.as_deref(), Some("EIA"));

    let end = FilterSet::default().with(FilterField::EndYear, "2018").unwrap();
    assert_eq!(end.apply(&records).len(), 3);
}

#[test]
fn missing_year_is_excluded_by_year_filters() {
    let records = dataset();
    let both = FilterSet::default()
        .with(FilterField::StartYear, "2000")
        .unwrap()
        .with(FilterField::EndYear, "2030")
        .unwrap();
    let matched = both.apply(&records);
    assert_eq!(matched.len(), 3);
    assert!(matched.iter().all(|r| r.start_year.is_some()));
}

#[test]
fn topic_is_exact_membership() {
    let records = dataset();

    let policy = FilterSet::default().with(FilterField::Topic, "policy").unwrap();
    assert_eq!(policy.apply(&records).len(), 2);

    let partial = FilterSet::default().with(FilterField::Topic, "polic").unwrap();
    assert!(partial.apply(&records).is_empty());

    // A bare-string topic is a one-element sequence, not a substring target.
    let market = FilterSet::default().with(FilterField::Topic, "market").unwrap();
    assert_eq!(market.apply(&records).len(), 1);
    let mark = FilterSet::default().with(FilterField::Topic, "mark").unwrap();
    assert!(mark.apply(&records).is_empty());
}

#[test]
fn absent_field_never_matches_a_set_filter() {
    let records = dataset();
    // Only the first record carries a city or a SWOT value.
    let city = FilterSet::default().with(FilterField::City, "Houston").unwrap();
    assert_eq!(city.apply(&records).len(), 1);
    let swot = FilterSet::default().with(FilterField::Swot, "Weakness").unwrap();
    assert_eq!(swot.apply(&records).len(), 1);

    // An empty control value resets the filter instead of matching "".
    let empty = FilterSet::default().with(FilterField::Sector, "").unwrap();
    assert!(empty.is_empty());
}

#[test]
fn clearing_a_filter_restores_the_wider_subset() {
    let records = dataset();
    let mut filters = FilterSet::default();
    filters
        .update(FilterUpdate::Set(FilterField::Country, "India".into()))
        .unwrap();
    assert_eq!(filters.apply(&records).len(), 1);

    filters
        .update(FilterUpdate::Clear(FilterField::Country))
        .unwrap();
    assert_eq!(filters.apply(&records).len(), records.len());
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

#[test]
fn counts_sum_to_subset_size() {
    let records = dataset();
    let palette = Palette::default();
    for filters in [
        FilterSet::default(),
        FilterSet::default().with(FilterField::Sector, "Energy").unwrap(),
        FilterSet::default().with(FilterField::Topic, "policy").unwrap(),
        FilterSet::default().with(FilterField::Country, "Nowhere").unwrap(),
    ] {
        let inputs = compute(&records, &filters, &palette);
        assert_eq!(inputs.by_country.total(), inputs.matched_records);
        assert_eq!(inputs.by_region.total(), inputs.matched_records);
        assert_eq!(inputs.series.labels.len(), inputs.matched_records);
    }
}

#[test]
fn series_is_one_bar_per_record() {
    let records = dataset();
    let subset: Vec<&Record> = records.iter().collect();
    let chart = charts::series(&subset);

    assert_eq!(chart.labels.len(), 4);
    assert_eq!(chart.labels[0], chart.labels[2]);
    assert_eq!(chart.datasets.len(), 3);
    assert_eq!(chart.datasets[0].label, "Intensity");
    assert_eq!(chart.datasets[0].data, vec![Some(6.0), Some(12.0), Some(2.0), Some(8.0)]);
    assert_eq!(chart.datasets[1].data[2], None);
}

#[test]
fn region_counts_follow_first_appearance() {
    let records = dataset();
    let subset: Vec<&Record> = records.iter().collect();
    let counts = charts::count_by(&subset, GroupBy::Region, &Palette::default());

    assert_eq!(
        counts.labels,
        vec![
            Some("Northern America".to_string()),
            Some("Western Asia".to_string()),
            Some("Southern Asia".to_string()),
        ]
    );
    assert_eq!(counts.counts(), &[2, 1, 1]);
}

#[test]
fn empty_store_yields_empty_outputs() {
    let inputs = compute(&[], &FilterSet::default(), &Palette::default());
    assert_eq!(inputs, ChartInputs::empty());
    assert!(inputs.series.labels.is_empty());
    assert!(inputs.series.datasets.is_empty());
    assert!(inputs.by_country.labels.is_empty());
    assert!(inputs.by_country.datasets.is_empty());
    assert!(inputs.by_region.datasets.is_empty());
}

#[test]
fn everything_filtered_out_keeps_empty_datasets() {
    let records = dataset();
    let filters = FilterSet::default().with(FilterField::City, "Lagos").unwrap();
    let inputs = compute(&records, &filters, &Palette::default());

    assert_eq!(inputs.matched_records, 0);
    assert_eq!(inputs.series.datasets.len(), 3);
    assert!(inputs.series.datasets.iter().all(|d| d.data.is_empty()));
    assert!(inputs.by_country.labels.is_empty());
    assert_eq!(inputs.by_country.counts(), &[] as &[usize]);
}

#[test]
fn topic_filter_end_to_end() {
    let records = vec![
        record("USA", "Northern America", &["oil"]),
        record("USA", "Northern America", &["policy"]),
        record("India", "Southern Asia", &["policy", "gas"]),
    ];
    let filters = FilterSet::default().with(FilterField::Topic, "policy").unwrap();

    let matched = filters.apply(&records);
    assert_eq!(matched, vec![&records[1], &records[2]]);

    let inputs = compute(&records, &filters, &Palette::default());
    assert_eq!(
        inputs.by_country.labels,
        vec![Some("USA".to_string()), Some("India".to_string())]
    );
    assert_eq!(inputs.by_country.counts(), &[1, 1]);
    assert_eq!(inputs.by_region.counts(), &[1, 1]);
}

#[test]
fn palette_is_reused_round_robin() {
    let countries = ["A", "B", "C", "D", "E", "F", "G", "H"];
    let records: Vec<Record> = countries.iter().map(|c| record(c, "R", &[])).collect();
    let inputs = compute(&records, &FilterSet::default(), &Palette::default());

    assert_eq!(inputs.by_country.labels.len(), 8);
    assert_eq!(inputs.by_country.datasets[0].background_color.len(), 6);
    assert_eq!(inputs.by_country.color_of(6), inputs.by_country.color_of(0));
    assert_eq!(inputs.by_country.color_of(7), inputs.by_country.color_of(1));
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[test]
fn cached_pipeline_matches_direct_compute() {
    let store = RecordStore::from_records(dataset());
    let palette = Palette::default();
    let mut cache = PipelineCache::default();

    let filters = FilterSet::from_query("/api/charts?sector=Energy&start_year=2016");
    for _ in 0..3 {
        assert_eq!(
            cache.get_or_compute(&store, &filters, &palette),
            compute(store.records(), &filters, &palette)
        );
    }
    assert_eq!(cache.stats(), (2, 1));
}
