use super::*;
use chrono::NaiveDate;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_test_record(sector: Option<&str>, dept: Option<&str>, date: Option<NaiveDate>) -> Record {
    let mut record = Record::new();
    record.sector = sector.map(str::to_string);
    record.department_code = dept.map(str::to_string);
    record.observed_at = date.map(|d| d.and_hms_opt(0, 0, 0).unwrap());
    record
}

#[test]
fn test_group_and_count_sorted_by_key() {
    let records = vec![
        create_test_record(Some("WASH"), Some("HT03"), None),
        create_test_record(Some("Health"), Some("HT01"), None),
        create_test_record(Some("WASH"), Some("HT01"), None),
        create_test_record(Some("Éducation"), None, None),
    ];

    let groups = group_and_count(&records, &Dimension::Sector);
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["Health", "WASH", "Éducation"]);
    assert_eq!(groups[1].count, 2);
}

#[test]
fn test_group_and_count_drops_missing() {
    let records = vec![
        create_test_record(Some("WASH"), Some("A"), None),
        create_test_record(Some("WASH"), None, None),
        create_test_record(None, None, None),
    ];

    let groups = group_and_count(&records, &Dimension::DepartmentCode);
    assert_eq!(
        groups,
        vec![GroupCount {
            key: "A".to_string(),
            count: 1
        }]
    );

    let total: usize = group_and_count(&records, &Dimension::Sector)
        .iter()
        .map(|g| g.count)
        .sum();
    assert_eq!(total, 2);
}

#[test]
fn test_group_and_count_empty() {
    assert!(group_and_count(&[], &Dimension::Sector).is_empty());

    let all_missing = vec![create_test_record(None, None, None)];
    assert!(group_and_count(&all_missing, &Dimension::OrganizationType).is_empty());
}

#[test]
fn test_group_by_attribute() {
    let records = vec![
        Record::new().with_attribute("Zone", Some("Nord".to_string())),
        Record::new().with_attribute("Zone", Some("Nord".to_string())),
        Record::new().with_attribute("Zone", None),
    ];
    let groups = group_and_count(&records, &Dimension::Attribute("Zone".to_string()));
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].count, 2);
}

#[test]
fn test_time_series_truncates_time_of_day() {
    let mut morning = create_test_record(Some("WASH"), None, None);
    morning.observed_at = day(2023, 1, 5).and_hms_opt(8, 0, 0);
    let mut evening = create_test_record(Some("WASH"), None, None);
    evening.observed_at = day(2023, 1, 5).and_hms_opt(22, 15, 0);

    let records = vec![
        create_test_record(None, None, Some(day(2023, 2, 1))),
        morning,
        evening,
        create_test_record(None, None, None),
    ];

    let series = time_series(&records, &DateDimension::ObservedAt);
    assert_eq!(
        series,
        vec![
            DateCount {
                date: day(2023, 1, 5),
                count: 2
            },
            DateCount {
                date: day(2023, 2, 1),
                count: 1
            },
        ]
    );
}

#[test]
fn test_pie_slices_shares() {
    let records = vec![
        create_test_record(Some("WASH"), None, None),
        create_test_record(Some("WASH"), None, None),
        create_test_record(Some("WASH"), None, None),
        create_test_record(Some("Health"), None, None),
    ];

    let slices = pie_slices(&records, &Dimension::Sector);
    assert_eq!(slices.len(), 2);
    assert_eq!(slices[0].label, "Health");
    assert!((slices[0].share - 0.25).abs() < 1e-9);
    assert!((slices[1].share - 0.75).abs() < 1e-9);

    assert!(pie_slices(&[], &Dimension::Sector).is_empty());
}

#[test]
fn test_count_distinct() {
    let records = vec![
        create_test_record(Some("WASH"), Some("A"), None),
        create_test_record(Some("WASH"), Some("B"), None),
        create_test_record(None, Some("B"), None),
    ];
    assert_eq!(count_distinct(&records, &Dimension::Sector), 1);
    assert_eq!(count_distinct(&records, &Dimension::DepartmentCode), 2);
    assert_eq!(count_distinct(&records, &Dimension::OrganizationType), 0);
}

#[test]
fn test_series_conversions() {
    let records = vec![
        create_test_record(Some("WASH"), None, Some(day(2023, 1, 5))),
        create_test_record(Some("Health"), None, Some(day(2023, 1, 5))),
    ];

    let bars: CategorySeries = group_and_count(&records, &Dimension::Sector).into();
    assert_eq!(bars.categories, vec!["Health".to_string(), "WASH".to_string()]);
    assert_eq!(bars.values, vec![1, 1]);
    assert_eq!(bars.total(), 2);

    let line: DateSeries = time_series(&records, &DateDimension::ObservedAt).into();
    assert_eq!(line.dates, vec![day(2023, 1, 5)]);
    assert_eq!(line.values, vec![2]);
    assert!(DateSeries::default().is_empty());
}
