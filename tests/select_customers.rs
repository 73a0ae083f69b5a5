use std::fs;
use std::path::Path;

use customer_radius::{
    great_circle_distance, run_files, Coordinates, PipelineConfig, PipelineError, Rejection,
};
use serde_json::Value as JsonValue;

const CUSTOMERS: &str = concat!(
    "{\"latitude\": \"52.986375\", \"user_id\": 12, \"name\": \"Christina McArdle\", \"longitude\": \"-6.043701\"}\n",
    "{\"latitude\": \"51.92893\", \"user_id\": 1, \"name\": \"Alice Cahill\", \"longitude\": \"-10.27699\"}\n",
    "{\"latitude\": \"51.8856167\", \"user_id\": 2, \"name\": \"Ian McArdle\", \"longitude\": \"-10.4240951\"}\n",
    "{\"latitude\": \"52.3191841\", \"user_id\": 3, \"name\": \"Jack Enright\", \"longitude\": \"-8.5072391\"}\n",
    "{\"latitude\": \"53.807778\", \"user_id\": 28, \"name\": \"Charlie Halligan\", \"longitude\": \"-7.714444\"}\n",
    "{\"latitude\": \"53.4692815\", \"user_id\": 7, \"name\": \"Frank Kehoe\", \"longitude\": \"-9.436036\"}\n",
    "{\"latitude\": \"54.0894797\", \"user_id\": 8, \"name\": \"Eoin Ahearn\", \"longitude\": \"-6.18671\"}\n",
    "{\"latitude\": \"53.038056\", \"user_id\": 26, \"name\": \"Stephen McArdle\", \"longitude\": \"-7.653889\"}\n",
    "{\"latitude\": \"54.1225\", \"user_id\": 27, \"name\": \"Enid Gallagher\", \"longitude\": \"-8.143333\"}\n",
    "{\"latitude\": \"53.1229599\", \"user_id\": 6, \"name\": \"Theresa Enright\", \"longitude\": \"-6.2705202\"}\n",
    "{\"latitude\": \"53.2451022\", \"user_id\": 4, \"name\": \"Ian Kehoe\", \"longitude\": \"-6.238335\"}\n",
    "{\"latitude\": \"53.1302756\", \"user_id\": 5, \"name\": \"Nora Dempsey\", \"longitude\": \"-6.2397222\"}\n",
    "{\"latitude\": \"53.008769\", \"user_id\": 11, \"name\": \"Richard Finnegan\", \"longitude\": \"-6.1056711\"}\n",
    "{\"latitude\": \"53.74452\", \"user_id\": 29, \"name\": \"Oliver Ahearn\", \"longitude\": \"-7.11167\"}\n",
    "{\"latitude\": \"53.761389\", \"user_id\": 30, \"name\": \"Nick Enright\", \"longitude\": \"-7.2875\"}\n",
    "{\"latitude\": \"54.080556\", \"user_id\": 23, \"name\": \"Eoin Gallagher\", \"longitude\": \"-6.361944\"}\n",
    "{\"latitude\": \"54.133333\", \"user_id\": 24, \"name\": \"Rose Enright\", \"longitude\": \"-6.433333\"}\n",
    "{\"latitude\": \"55.033\", \"user_id\": 19, \"name\": \"Enid Cahill\", \"longitude\": \"-8.112\"}\n",
    "{\"latitude\": \"53.521111\", \"user_id\": 20, \"name\": \"Enid Enright\", \"longitude\": \"-9.831111\"}\n",
    "{\"latitude\": \"51.802\", \"user_id\": 21, \"name\": \"David Ahearn\", \"longitude\": \"-9.442\"}\n",
    "{\"latitude\": \"54.374458\", \"user_id\": 22, \"name\": \"Charlie McArdle\", \"longitude\": \"-8.371491\"}\n",
    "{\"latitude\": \"53.74452\", \"user_id\": 29, \"name\": \"Oliver Ahearn\", \"longitude\": \"-7.11167\"}\n",
    "{\"latitude\": \"53.761389\", \"user_id\": 31, \"name\": \"Alan Behan\", \"longitude\": \"-7.2875\"}\n",
    "{\"latitude\": \"54.180238\", \"user_id\": 17, \"name\": \"Patricia Cahill\", \"longitude\": \"-5.920898\"}\n",
    "{\"latitude\": \"53.0033946\", \"user_id\": 39, \"name\": \"Lisa Ahearn\", \"longitude\": \"-6.3877505\"}\n",
    "{\"latitude\": \"52.228056\", \"user_id\": 18, \"name\": \"Bob Larkin\", \"longitude\": \"-7.915833\"}\n",
    "{\"latitude\": \"54.133333\", \"user_id\": 24, \"name\": \"Rose Enright\", \"longitude\": \"-6.433333\"}\n",
    "{\"latitude\": \"55.033\", \"user_id\": 19, \"name\": \"Enid Cahill\", \"longitude\": \"-8.112\"}\n",
    "{\"latitude\": \"53.521111\", \"user_id\": 20, \"name\": \"Enid Enright\", \"longitude\": \"-9.831111\"}\n",
    "{\"latitude\": \"51.802\", \"user_id\": 21, \"name\": \"David Ahearn\", \"longitude\": \"-9.442\"}\n",
    "{\"latitude\": \"54.374458\", \"user_id\": 22, \"name\": \"Charlie McArdle\", \"longitude\": \"-8.371491\"}\n",
    "{\"latitude\": \"53.2451022\", \"user_id\": 4, \"name\": \"Ian Kehoe\", \"longitude\": \"-6.238335\"}\n",
);

fn run_on(input: &str, config: &PipelineConfig) -> (String, customer_radius::RunReport) {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("customers.txt");
    let output_path = dir.path().join("customers_outfile.txt");
    fs::write(&input_path, input).unwrap();

    let report = run_files(&input_path, &output_path, config).unwrap();
    (fs::read_to_string(&output_path).unwrap(), report)
}

fn parse_lines(output: &str) -> Vec<JsonValue> {
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn user_ids(output: &str) -> Vec<i64> {
    parse_lines(output)
        .iter()
        .map(|v| v["user_id"].as_i64().unwrap())
        .collect()
}

fn position(value: &JsonValue) -> Coordinates {
    let coord = |key: &str| value[key].as_str().unwrap().parse::<f64>().unwrap();
    Coordinates::new(coord("latitude"), coord("longitude"))
}

#[test]
fn selects_dublin_area_customers_in_id_order() {
    let config = PipelineConfig::default();
    let (output, report) = run_on(CUSTOMERS, &config);

    assert_eq!(report.lines_read, 32);
    assert_eq!(report.rejected(), 0);
    assert_eq!(
        user_ids(&output),
        [4, 4, 5, 6, 8, 11, 12, 17, 23, 24, 24, 26, 29, 29, 30, 31, 39]
    );

    for value in parse_lines(&output) {
        let d = great_circle_distance(position(&value), config.reference);
        assert!(d <= config.max_distance_km, "{value} is {d} km away");
    }
}

#[test]
fn output_lines_are_copied_verbatim() {
    let (output, _) = run_on(CUSTOMERS, &PipelineConfig::default());
    let input_lines: Vec<&str> = CUSTOMERS.lines().collect();
    for line in output.lines() {
        assert!(input_lines.contains(&line), "{line} not found in input");
    }
}

#[test]
fn extra_fields_pass_through() {
    let input = "{\"user_id\": \"7\", \"tier\": {\"level\": 2}, \"latitude\": 53.3, \"longitude\": -6.3, \"name\": \"A\", \"tags\": [\"x\"]}\n";
    let (output, _) = run_on(input, &PipelineConfig::default());
    assert_eq!(output, input);
}

#[test]
fn rerun_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("customers.txt");
    let output_path = dir.path().join("out.txt");
    fs::write(&input_path, CUSTOMERS).unwrap();
    let config = PipelineConfig::default();

    run_files(&input_path, &output_path, &config).unwrap();
    let first = fs::read(&output_path).unwrap();
    run_files(&input_path, &output_path, &config).unwrap();
    let second = fs::read(&output_path).unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn previous_output_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("customers.txt");
    let output_path = dir.path().join("out.txt");
    fs::write(&input_path, "{\"user_id\": 5, \"latitude\": 0.0, \"longitude\": 0.0, \"name\": \"B\"}\n").unwrap();
    fs::write(&output_path, "stale content that is longer than nothing\n").unwrap();

    let report = run_files(&input_path, &output_path, &PipelineConfig::default()).unwrap();
    assert_eq!(report.retained, 0);
    assert_eq!(fs::read_to_string(&output_path).unwrap(), "");
}

#[test]
fn bad_lines_never_reach_the_output() {
    let input = concat!(
        "{\"user_id\": 1, \"latitude\": 53.3, \"longitude\": -6.3, \"name\": \"ok\"}\n",
        "{\"user_id\": 2, \"latitude\": 53.3, \"longitude\": -6.3, \"name\": \"broken\"\n",
        "{\"user_id\": 3, \"latitude\": 53.3, \"longitude\": -6.3}\n",
        "{\"user_id\": null, \"latitude\": 53.3, \"longitude\": -6.3, \"name\": \"nullid\"}\n",
        "{\"user_id\": 4, \"latitude\": 53.3, \"longitude\": 120.0, \"name\": \"range\"}\n",
        "[1, 2]\n",
        "{\"user_id\": 6, \"latitude\": 53.3, \"longitude\": -6.3, \"name\": \"ok too\"}\n",
    );
    let (output, report) = run_on(input, &PipelineConfig::default());

    assert_eq!(user_ids(&output), [1, 6]);
    assert!(!output.contains("broken"));

    let lines: Vec<usize> = report.diagnostics.iter().map(|d| d.line_number).collect();
    assert_eq!(lines, [2, 3, 4, 5, 6]);
    assert!(matches!(report.diagnostics[0].rejection, Rejection::Malformed(_)));
    assert!(matches!(report.diagnostics[1].rejection, Rejection::MissingField { field: "name" }));
    assert!(matches!(report.diagnostics[2].rejection, Rejection::MissingPrimaryKey));
    assert!(matches!(
        report.diagnostics[3].rejection,
        Rejection::OutOfRange { field: "longitude", .. }
    ));
    assert!(matches!(report.diagnostics[4].rejection, Rejection::NotAnObject { .. }));
}

#[test]
fn out_of_bounds_record_is_excluded_even_at_the_reference_point() {
    let mut config = PipelineConfig::default();
    config.reference = Coordinates::new(10.0, 100.0);
    let input = "{\"user_id\": 1, \"latitude\": 10.0, \"longitude\": 100.0, \"name\": \"here\"}\n";

    let (output, report) = run_on(input, &config);
    assert_eq!(output, "");
    assert_eq!(report.accepted, 0);
}

#[test]
fn radius_can_be_widened() {
    let config = PipelineConfig {
        max_distance_km: 20_000.0,
        ..PipelineConfig::default()
    };
    let input = concat!(
        "{\"user_id\": 5, \"latitude\": 0.0, \"longitude\": 0.0, \"name\": \"B\"}\n",
        "{\"user_id\": 3, \"latitude\": 53.35, \"longitude\": -6.26, \"name\": \"A\"}\n",
    );
    let (output, _) = run_on(input, &config);
    assert_eq!(user_ids(&output), [3, 5]);
}

#[test]
fn missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output_path = dir.path().join("out.txt");
    let err = run_files(
        Path::new("/definitely/not/here/customers.txt"),
        &output_path,
        &PipelineConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    assert!(!output_path.exists());
}
